//! Plugin instance configuration: loose fields plus tables of rows.
//!
//! `fields` and `tables` hold what the user configured. The server may
//! return more, including defaults for every field the plugin defines; those
//! land in the computed `fields_all` and `tables_all`.

use serde_json::{json, Map, Value};

use super::json;
use super::values::get_str;
use crate::client::models::{ConfigField, ConfigRow, ConfigTable, PluginConfiguration};
use crate::schema::{Attribute, Block, NestedBlock};

fn field_block(computed: bool) -> Block {
    let string = |required: bool| match (computed, required) {
        (true, _) => Attribute::computed_string(),
        (false, true) => Attribute::required_string(),
        (false, false) => Attribute::optional_string(),
    };
    let inherited = if computed {
        Attribute::computed_bool()
    } else {
        Attribute::optional_bool()
    };

    Block::new()
        .with_attribute(
            "name",
            string(true).with_description("The name of the configuration field."),
        )
        .with_attribute(
            "value",
            string(false).with_description(
                "The value for the configuration field. For encrypted or hashed fields, GETs will \
                 not return this attribute.",
            ),
        )
        .with_attribute(
            "encrypted_value",
            string(false).with_description(
                "For encrypted or hashed fields, this attribute contains the encrypted \
                 representation of the field's value, if a value is defined.",
            ),
        )
        .with_attribute(
            "inherited",
            inherited.with_description(
                "Whether this field is inherited from its parent instance. If true, the \
                 value/encrypted value properties become read-only. The default value is false.",
            ),
        )
}

fn table_block(computed: bool) -> Block {
    let (name, flag) = if computed {
        (Attribute::computed_string(), Attribute::computed_bool())
    } else {
        (Attribute::required_string(), Attribute::optional_bool())
    };
    let row_fields = NestedBlock::set(field_block(computed))
        .with_description("The configuration fields in the row.");
    let row = Block::new()
        .with_attribute(
            "default_row",
            flag.clone().with_description("Whether this row is the default."),
        )
        .with_block(
            "fields",
            if computed {
                row_fields.with_computed()
            } else {
                row_fields.with_default(json!([]))
            },
        );
    let rows = NestedBlock::list(row).with_description("List of table rows.");

    Block::new()
        .with_attribute("name", name.with_description("The name of the table."))
        .with_block(
            "rows",
            if computed {
                rows.with_computed()
            } else {
                rows.with_default(json!([]))
            },
        )
        .with_attribute(
            "inherited",
            flag.with_description(
                "Whether this table is inherited from its parent instance. If true, the rows \
                 become read-only. The default value is false.",
            ),
        )
}

// The request subset of the resource block: only what the user configured.
fn client_block() -> Block {
    Block::new()
        .with_block("fields", NestedBlock::set(field_block(false)))
        .with_block("tables", NestedBlock::list(table_block(false)))
}

/// The `configuration` block of a plugin instance resource.
pub fn nested_block() -> NestedBlock {
    NestedBlock::single(
        Block::new()
            .with_block(
                "fields",
                NestedBlock::set(field_block(false))
                    .with_default(json!([]))
                    .with_description("List of configuration fields."),
            )
            .with_block(
                "tables",
                NestedBlock::list(table_block(false))
                    .with_default(json!([]))
                    .with_description("List of configuration tables."),
            )
            .with_block(
                "fields_all",
                NestedBlock::set(field_block(true))
                    .with_computed()
                    .with_use_state_for_unknown()
                    .with_description(
                        "List of configuration fields. This attribute will include any values set \
                         by default by PingFederate.",
                    ),
            )
            .with_block(
                "tables_all",
                NestedBlock::list(table_block(true))
                    .with_computed()
                    .with_use_state_for_unknown()
                    .with_description(
                        "List of configuration tables. This attribute will include any values set \
                         by default by PingFederate.",
                    ),
            ),
    )
    .required()
    .with_description("Plugin instance configuration.")
}

fn data_source_block() -> Block {
    Block::new()
        .with_block(
            "fields",
            NestedBlock::list(field_block(true))
                .with_computed()
                .with_description("List of configuration fields."),
        )
        .with_block(
            "tables",
            NestedBlock::list(table_block(true))
                .with_computed()
                .with_description("List of configuration tables."),
        )
}

/// The read-only `configuration` block of a data source.
pub fn data_source_nested_block() -> NestedBlock {
    NestedBlock::single(data_source_block())
        .with_computed()
        .with_description("Plugin instance configuration.")
}

/// Request struct for a configuration in state.
pub fn client_struct(config: &Value) -> Result<PluginConfiguration, serde_json::Error> {
    json::from_state(&client_block(), config)
}

/// Drop the computed `*_all` values when the user changed the matching half.
pub fn mark_computed_attrs_unknown_on_change(
    plan_config: &mut Value,
    state_config: Option<&Value>,
) {
    let Some(state_config) = state_config.filter(|v| !v.is_null()) else {
        return;
    };
    let Some(plan) = plan_config.as_object_mut() else {
        return;
    };
    for (configured, computed) in [("fields", "fields_all"), ("tables", "tables_all")] {
        let planned = plan.get(configured).unwrap_or(&Value::Null);
        let prior = state_config.get(configured).unwrap_or(&Value::Null);
        if planned != prior {
            plan.insert(computed.to_string(), Value::Null);
        }
    }
}

fn field_state(field: &ConfigField) -> Value {
    json!({
        "name": field.name,
        "value": field.value,
        "encrypted_value": field.encrypted_value,
        "inherited": field.inherited,
    })
}

fn row_state(row: &ConfigRow) -> Value {
    json!({
        "default_row": row.default_row,
        "fields": row.fields.iter().map(field_state).collect::<Vec<_>>(),
    })
}

fn table_state(table: &ConfigTable) -> Value {
    json!({
        "name": table.name,
        "rows": table.rows.iter().flatten().map(row_state).collect::<Vec<_>>(),
        "inherited": table.inherited,
    })
}

// Planned fields keep their shape; only `value` is refreshed from the server.
// Encrypted fields come back without a value, so the planned one is kept.
fn merge_fields(planned: Option<&Value>, response: &[ConfigField]) -> Value {
    let Some(planned) = planned.and_then(Value::as_array) else {
        return Value::Array(Vec::new());
    };
    Value::Array(
        planned
            .iter()
            .map(|field| {
                let mut merged = field.clone();
                let found = get_str(field, "name")
                    .and_then(|name| response.iter().find(|f| f.name == name));
                if let (Some(found), Some(merged)) = (found, merged.as_object_mut()) {
                    if let Some(value) = &found.value {
                        merged.insert("value".to_string(), Value::String(value.clone()));
                    }
                }
                merged
            })
            .collect(),
    )
}

fn merge_tables(planned: Option<&Value>, response: &[ConfigTable]) -> Value {
    let Some(planned) = planned.and_then(Value::as_array) else {
        return Value::Array(Vec::new());
    };
    Value::Array(
        planned
            .iter()
            .map(|table| {
                let found = get_str(table, "name")
                    .and_then(|name| response.iter().find(|t| t.name == name));
                let Some(found) = found else {
                    return table.clone();
                };
                let response_rows = found.rows.as_deref().unwrap_or_default();
                let rows: Vec<Value> = table
                    .get("rows")
                    .and_then(Value::as_array)
                    .map(|rows| {
                        rows.iter()
                            .enumerate()
                            .map(|(i, row)| match response_rows.get(i) {
                                Some(response_row) => json!({
                                    "default_row": response_row.default_row.map_or_else(
                                        || row.get("default_row").cloned().unwrap_or(Value::Null),
                                        Value::Bool,
                                    ),
                                    "fields": merge_fields(row.get("fields"), &response_row.fields),
                                }),
                                None => row.clone(),
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                let mut merged = Map::new();
                merged.insert("name".to_string(), Value::String(found.name.clone()));
                merged.insert("rows".to_string(), Value::Array(rows));
                merged.insert(
                    "inherited".to_string(),
                    table.get("inherited").cloned().unwrap_or(Value::Null),
                );
                Value::Object(merged)
            })
            .collect(),
    )
}

/// State value for a configuration returned by the API.
///
/// On an import read there is no plan to follow, so everything the server
/// returned is reported as configured.
pub fn to_state(
    plan_config: &Value,
    response: &PluginConfiguration,
    is_import_read: bool,
) -> Value {
    let fields_all: Vec<Value> = response.fields.iter().map(field_state).collect();
    let tables_all: Vec<Value> = response.tables.iter().map(table_state).collect();

    let (fields, tables) = if is_import_read || plan_config.is_null() {
        (Value::Array(fields_all.clone()), Value::Array(tables_all.clone()))
    } else {
        (
            merge_fields(plan_config.get("fields"), &response.fields),
            merge_tables(plan_config.get("tables"), &response.tables),
        )
    };

    json!({
        "fields": fields,
        "tables": tables,
        "fields_all": fields_all,
        "tables_all": tables_all,
    })
}

/// State value for a configuration read by a data source.
pub fn to_data_source_state(response: &PluginConfiguration) -> Value {
    json!({
        "fields": response.fields.iter().map(field_state).collect::<Vec<_>>(),
        "tables": response.tables.iter().map(table_state).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::plan_resource;
    use crate::schema::Schema;

    fn response() -> PluginConfiguration {
        serde_json::from_value(json!({
            "fields": [
                {"name": "From Address", "value": "noreply@example.com"},
                {"name": "Password", "encryptedValue": "OBF:JWE:eyJhbGciOiJkaXIi"},
                {"name": "SMTP Port", "value": "25"}
            ],
            "tables": [
                {"name": "Networks", "rows": [
                    {
                        "defaultRow": false,
                        "fields": [{"name": "Network Range (CIDR notation)", "value": "10.0.0.0/8"}]
                    }
                ]}
            ]
        }))
        .unwrap()
    }

    fn planned() -> Value {
        json!({
            "fields": [
                {
                    "name": "From Address",
                    "value": "noreply@example.com",
                    "encrypted_value": null,
                    "inherited": null
                },
                {
                    "name": "Password",
                    "value": "2FederateM0re",
                    "encrypted_value": null,
                    "inherited": null
                }
            ],
            "tables": [],
            "fields_all": null,
            "tables_all": null
        })
    }

    #[test]
    fn test_client_struct() {
        let config = client_struct(&planned()).unwrap();
        assert_eq!(config.fields.len(), 2);
        assert_eq!(config.fields[1].value.as_deref(), Some("2FederateM0re"));
        assert_eq!(config.fields[1].inherited, None);
        assert!(config.tables.is_empty());
    }

    #[test]
    fn test_to_state_keeps_planned_fields() {
        let state = to_state(&planned(), &response(), false);

        let fields = state["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1]["value"], "2FederateM0re");
        assert!(fields[1]["encrypted_value"].is_null());

        assert_eq!(state["fields_all"].as_array().unwrap().len(), 3);
        assert_eq!(state["fields_all"][1]["encrypted_value"], "OBF:JWE:eyJhbGciOiJkaXIi");
        assert_eq!(state["tables_all"][0]["rows"][0]["fields"][0]["value"], "10.0.0.0/8");
        assert_eq!(state["tables"], json!([]));
    }

    #[test]
    fn test_to_state_on_import_reports_everything() {
        let state = to_state(&Value::Null, &response(), true);
        assert_eq!(state["fields"], state["fields_all"]);
        assert_eq!(state["tables"][0]["name"], "Networks");
    }

    #[test]
    fn test_tables_are_merged_by_name_and_row_index() {
        let plan = json!({
            "fields": [],
            "tables": [{
                "name": "Networks",
                "inherited": null,
                "rows": [{"default_row": null, "fields": [
                    {
                        "name": "Network Range (CIDR notation)",
                        "value": "10.0.0.0/8",
                        "encrypted_value": null,
                        "inherited": null
                    }
                ]}]
            }]
        });
        let state = to_state(&plan, &response(), false);
        assert_eq!(state["tables"][0]["rows"][0]["default_row"], json!(false));
        assert_eq!(state["tables"][0]["rows"][0]["fields"][0]["value"], "10.0.0.0/8");
    }

    #[test]
    fn test_mark_computed_attrs_unknown_on_change() {
        let state = to_state(&planned(), &response(), false);

        let mut unchanged = state.clone();
        mark_computed_attrs_unknown_on_change(&mut unchanged, Some(&state));
        assert!(!unchanged["fields_all"].is_null());

        let mut changed = state.clone();
        changed["fields"][0]["value"] = json!("admin@example.com");
        mark_computed_attrs_unknown_on_change(&mut changed, Some(&state));
        assert!(changed["fields_all"].is_null());
        assert!(!changed["tables_all"].is_null());

        let mut created = planned();
        mark_computed_attrs_unknown_on_change(&mut created, None);
        assert_eq!(created, planned());
    }

    #[test]
    fn test_plan_keeps_computed_halves_for_unchanged_config() {
        let schema = Schema::v0().with_block("configuration", nested_block());
        let prior = json!({"configuration": to_state(&planned(), &response(), false)});
        let config = json!({"configuration": {"fields": planned()["fields"].clone()}});

        let plan = plan_resource(&schema, Some(&prior), &config, &config);
        assert_eq!(plan.planned_state, prior);
    }

    #[test]
    fn test_data_source_state() {
        let state = to_data_source_state(&response());
        assert_eq!(state["fields"].as_array().unwrap().len(), 3);
        assert_eq!(state["tables"][0]["rows"][0]["default_row"], json!(false));
        assert!(data_source_nested_block().computed);
    }
}
