//! Schema-driven planning.
//!
//! Unknown values are represented as `null` in the planned state. Planning
//! runs in two passes: the first keeps prior values for computed attributes
//! the configuration leaves out; if the result still differs from the prior
//! state, a second pass marks those computed values unknown unless they are
//! flagged `use_state_for_unknown`.
//!
//! Sets compare without regard to element order, and a set whose elements
//! are unchanged keeps the order recorded in prior state.

use serde_json::{Map, Value};

use crate::schema::{AttributeType, Block, BlockNestingMode, NestedBlock, Schema};
use crate::types::{AttributeChange, PlanResult};

/// Plan a resource change.
///
/// `prior` is `None` (or `null`) on create. A `null` `proposed` state plans a
/// destroy.
pub fn plan_resource(
    schema: &Schema,
    prior: Option<&Value>,
    proposed: &Value,
    config: &Value,
) -> PlanResult {
    let prior = prior.and_then(Value::as_object);

    if proposed.is_null() {
        let changes = prior
            .map(|prior| {
                prior
                    .iter()
                    .filter(|(_, value)| !value.is_null())
                    .map(|(key, value)| AttributeChange::removed(key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        return PlanResult::with_changes(Value::Null, changes, false);
    }

    let mut planned = plan_block(&schema.block, prior, config, false);
    if let Some(prior) = prior {
        let prior_state = Value::Object(prior.clone());
        if block_differs(&schema.block, &prior_state, &planned, false) {
            planned = plan_block(&schema.block, Some(prior), config, true);
        }
    }

    let requires_replace = prior
        .map(|prior| requires_replace(&schema.block, prior, &planned))
        .unwrap_or(false);
    let changes = diff(&schema.block, prior, &planned);

    PlanResult::with_changes(planned, changes, requires_replace)
}

fn plan_block(
    block: &Block,
    prior: Option<&Map<String, Value>>,
    config: &Value,
    mark_unknown: bool,
) -> Value {
    let mut planned = Map::new();

    for (name, attr) in &block.attributes {
        let configured = config.get(name).unwrap_or(&Value::Null);
        let value = if !configured.is_null() {
            match prior.and_then(|p| p.get(name)) {
                // Sets keep the prior element order when only the order changed.
                Some(before)
                    if matches!(attr.attr_type, AttributeType::Set(_))
                        && !attr_differs(&attr.attr_type, before, configured, false) =>
                {
                    before.clone()
                },
                _ => configured.clone(),
            }
        } else if let Some(default) = &attr.default {
            default.clone()
        } else if attr.flags.computed && (!mark_unknown || attr.use_state_for_unknown) {
            prior_value(prior, name)
        } else {
            Value::Null
        };
        planned.insert(name.clone(), value);
    }

    for (name, nested) in &block.blocks {
        let configured = config.get(name).unwrap_or(&Value::Null);
        let prior_nested = prior.and_then(|p| p.get(name));
        let value = if !configured.is_null() {
            plan_nested(nested, prior_nested, configured, mark_unknown)
        } else if let Some(default) = &nested.default {
            default.clone()
        } else if nested.computed && (!mark_unknown || nested.use_state_for_unknown) {
            prior_value(prior, name)
        } else {
            Value::Null
        };
        planned.insert(name.clone(), value);
    }

    Value::Object(planned)
}

fn plan_nested(
    nested: &NestedBlock,
    prior: Option<&Value>,
    configured: &Value,
    mark_unknown: bool,
) -> Value {
    match nested.nesting_mode {
        BlockNestingMode::Single => plan_block(
            &nested.block,
            prior.and_then(Value::as_object),
            configured,
            mark_unknown,
        ),
        BlockNestingMode::List => {
            let prior_items = prior.and_then(Value::as_array);
            match configured.as_array() {
                Some(items) => Value::Array(
                    items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| {
                            let prior_item = prior_items
                                .and_then(|items| items.get(i))
                                .and_then(Value::as_object);
                            plan_block(&nested.block, prior_item, item, mark_unknown)
                        })
                        .collect(),
                ),
                None => configured.clone(),
            }
        },
        BlockNestingMode::Set => match configured.as_array() {
            Some(items) => {
                let planned = Value::Array(plan_set_items(nested, prior, items, mark_unknown));
                match prior {
                    Some(before) if !nested_differs(nested, before, &planned, false) => {
                        before.clone()
                    },
                    _ => planned,
                }
            },
            None => configured.clone(),
        },
        BlockNestingMode::Map => {
            let prior_entries = prior.and_then(Value::as_object);
            match configured.as_object() {
                Some(entries) => Value::Object(
                    entries
                        .iter()
                        .map(|(key, item)| {
                            let prior_item = prior_entries
                                .and_then(|entries| entries.get(key))
                                .and_then(Value::as_object);
                            (
                                key.clone(),
                                plan_block(&nested.block, prior_item, item, mark_unknown),
                            )
                        })
                        .collect(),
                ),
                None => configured.clone(),
            }
        },
    }
}

// Each configured element is paired with the first unused prior element it
// plans identically to. Unpaired elements plan without prior state.
fn plan_set_items(
    nested: &NestedBlock,
    prior: Option<&Value>,
    items: &[Value],
    mark_unknown: bool,
) -> Vec<Value> {
    let prior_items: Vec<&Value> = prior
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|item| item.is_object()).collect())
        .unwrap_or_default();
    let mut used = vec![false; prior_items.len()];

    items
        .iter()
        .map(|item| {
            let matched = (0..prior_items.len()).find(|&i| {
                let candidate = prior_items[i];
                !used[i]
                    && !block_differs(
                        &nested.block,
                        candidate,
                        &plan_block(&nested.block, candidate.as_object(), item, false),
                        false,
                    )
            });
            if let Some(i) = matched {
                used[i] = true;
            }
            let prior_item = matched.and_then(|i| prior_items[i].as_object());
            plan_block(&nested.block, prior_item, item, mark_unknown)
        })
        .collect()
}

fn prior_value(prior: Option<&Map<String, Value>>, name: &str) -> Value {
    prior
        .and_then(|p| p.get(name))
        .cloned()
        .unwrap_or(Value::Null)
}

// Unknown planned values never force replacement on their own.
fn requires_replace(block: &Block, prior: &Map<String, Value>, planned: &Value) -> bool {
    let before = |name: &str| prior.get(name).unwrap_or(&Value::Null);
    let after = |name: &str| planned.get(name).unwrap_or(&Value::Null);

    block
        .attributes
        .iter()
        .filter(|(name, attr)| attr.force_new && !before(name.as_str()).is_null())
        .any(|(name, attr)| {
            attr_differs(&attr.attr_type, before(name.as_str()), after(name.as_str()), true)
        })
        || block
            .blocks
            .iter()
            .filter(|(name, nested)| nested.force_new && !before(name.as_str()).is_null())
            .any(|(name, nested)| {
                nested_differs(nested, before(name.as_str()), after(name.as_str()), true)
            })
}

/// Whether two values of an attribute differ, comparing sets without regard to order.
///
/// With `known_only`, a `null` (unknown) value on the `after` side never
/// counts as a difference.
fn attr_differs(
    attr_type: &AttributeType,
    before: &Value,
    after: &Value,
    known_only: bool,
) -> bool {
    if known_only && after.is_null() {
        return false;
    }
    match (attr_type, before, after) {
        (AttributeType::Set(element), Value::Array(b), Value::Array(a)) => {
            !same_elements(b, a, |x, y| !attr_differs(element, x, y, known_only))
        },
        (AttributeType::List(element), Value::Array(b), Value::Array(a)) => {
            b.len() != a.len()
                || b.iter()
                    .zip(a)
                    .any(|(x, y)| attr_differs(element, x, y, known_only))
        },
        (AttributeType::Map(element), Value::Object(b), Value::Object(a)) => {
            entries_differ(b, a, known_only, |x, y| attr_differs(element, x, y, known_only))
        },
        (AttributeType::Object(attrs), Value::Object(b), Value::Object(a)) => {
            attrs.iter().any(|(name, attr_type)| {
                attr_differs(attr_type, field(b, name), field(a, name), known_only)
            })
        },
        _ => value_differs(before, after, known_only),
    }
}

fn block_differs(block: &Block, before: &Value, after: &Value, known_only: bool) -> bool {
    if known_only && after.is_null() {
        return false;
    }
    match (before.as_object(), after.as_object()) {
        (Some(b), Some(a)) => {
            block.attributes.iter().any(|(name, attr)| {
                attr_differs(&attr.attr_type, field(b, name), field(a, name), known_only)
            }) || block.blocks.iter().any(|(name, nested)| {
                nested_differs(nested, field(b, name), field(a, name), known_only)
            })
        },
        _ => value_differs(before, after, known_only),
    }
}

fn nested_differs(nested: &NestedBlock, before: &Value, after: &Value, known_only: bool) -> bool {
    if known_only && after.is_null() {
        return false;
    }
    let item_differs = |x: &Value, y: &Value| block_differs(&nested.block, x, y, known_only);
    match (&nested.nesting_mode, before, after) {
        (BlockNestingMode::Single, _, _) => item_differs(before, after),
        (BlockNestingMode::List, Value::Array(b), Value::Array(a)) => {
            b.len() != a.len() || b.iter().zip(a).any(|(x, y)| item_differs(x, y))
        },
        (BlockNestingMode::Set, Value::Array(b), Value::Array(a)) => {
            !same_elements(b, a, |x, y| !item_differs(x, y))
        },
        (BlockNestingMode::Map, Value::Object(b), Value::Object(a)) => {
            entries_differ(b, a, known_only, item_differs)
        },
        _ => value_differs(before, after, known_only),
    }
}

fn field<'a>(object: &'a Map<String, Value>, name: &str) -> &'a Value {
    object.get(name).unwrap_or(&Value::Null)
}

// Multiset comparison: every element of `after` pairs with a distinct element of `before`.
fn same_elements(before: &[Value], after: &[Value], eq: impl Fn(&Value, &Value) -> bool) -> bool {
    if before.len() != after.len() {
        return false;
    }
    let mut used = vec![false; before.len()];
    after.iter().all(|a| {
        match (0..before.len()).find(|&i| !used[i] && eq(&before[i], a)) {
            Some(i) => {
                used[i] = true;
                true
            },
            None => false,
        }
    })
}

fn entries_differ(
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    known_only: bool,
    differs: impl Fn(&Value, &Value) -> bool,
) -> bool {
    let dropped = !known_only
        && before
            .iter()
            .any(|(key, value)| !value.is_null() && !after.contains_key(key));
    dropped || after.iter().any(|(key, value)| differs(field(before, key), value))
}

// Untyped, order-sensitive comparison for values the schema does not describe.
fn value_differs(before: &Value, after: &Value, known_only: bool) -> bool {
    match (before, after) {
        (_, Value::Null) if known_only => false,
        (Value::Object(b), Value::Object(a)) => {
            entries_differ(b, a, known_only, |x, y| value_differs(x, y, known_only))
        },
        (Value::Array(b), Value::Array(a)) => {
            b.len() != a.len()
                || b.iter()
                    .zip(a)
                    .any(|(x, y)| value_differs(x, y, known_only))
        },
        (before, after) => before != after,
    }
}

fn diff(
    block: &Block,
    prior: Option<&Map<String, Value>>,
    planned: &Value,
) -> Vec<AttributeChange> {
    let mut names: Vec<&String> = block.attributes.keys().chain(block.blocks.keys()).collect();
    names.sort();

    names
        .into_iter()
        .filter_map(|name| {
            let after = planned.get(name).cloned().unwrap_or(Value::Null);
            let before = prior
                .and_then(|p| p.get(name))
                .cloned()
                .unwrap_or(Value::Null);
            let changed = !before.is_null()
                && !after.is_null()
                && match (block.attributes.get(name), block.blocks.get(name)) {
                    (Some(attr), _) => attr_differs(&attr.attr_type, &before, &after, false),
                    (None, Some(nested)) => nested_differs(nested, &before, &after, false),
                    (None, None) => before != after,
                };
            match (before.is_null(), after.is_null()) {
                (true, true) => None,
                (true, false) => Some(AttributeChange::added(name.clone(), after)),
                (false, true) => Some(AttributeChange::removed(name.clone(), before)),
                (false, false) if changed => {
                    Some(AttributeChange::modified(name.clone(), before, after))
                },
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, AttributeFlags, Block, NestedBlock};
    use serde_json::json;

    fn publisher_schema() -> Schema {
        Schema::v0()
            .with_attribute(
                "id",
                Attribute::computed_string().with_use_state_for_unknown(),
            )
            .with_attribute(
                "publisher_id",
                Attribute::required_string().with_force_new(),
            )
            .with_attribute("name", Attribute::required_string())
            .with_attribute("enabled", Attribute::optional_bool().with_default(json!(true)))
            .with_attribute("modification_date", Attribute::computed_string())
            .with_block(
                "plugin_descriptor_ref",
                NestedBlock::single(
                    Block::new()
                        .with_attribute("id", Attribute::required_string())
                        .with_attribute("location", Attribute::computed_string()),
                )
                .required()
                .with_force_new(),
            )
    }

    fn prior_state() -> Value {
        json!({
            "id": "smtp",
            "publisher_id": "smtp",
            "name": "SMTP",
            "enabled": true,
            "modification_date": "2024-01-01T00:00:00Z",
            "plugin_descriptor_ref": {
                "id": "com.pingidentity.email.SmtpNotificationPlugin",
                "location": "https://localhost:9999/pf-admin-api/v1/notificationPublishers/descriptors/smtp"
            }
        })
    }

    fn config(name: &str, descriptor: &str) -> Value {
        json!({
            "publisher_id": "smtp",
            "name": name,
            "plugin_descriptor_ref": {"id": descriptor}
        })
    }

    #[test]
    fn test_create_fills_defaults_and_leaves_computed_unknown() {
        let cfg = config("SMTP", "com.pingidentity.email.SmtpNotificationPlugin");
        let plan = plan_resource(&publisher_schema(), None, &cfg, &cfg);

        assert_eq!(plan.planned_state["enabled"], json!(true));
        assert!(plan.planned_state["id"].is_null());
        assert!(plan.planned_state["plugin_descriptor_ref"]["location"].is_null());
        assert!(!plan.requires_replace);
        assert!(plan
            .changes
            .iter()
            .any(|c| c.path == "name" && c.after == Some(json!("SMTP"))));
        assert!(!plan.changes.iter().any(|c| c.path == "id"));
    }

    #[test]
    fn test_no_change_keeps_computed_values() {
        let prior = prior_state();
        let cfg = config("SMTP", "com.pingidentity.email.SmtpNotificationPlugin");
        let plan = plan_resource(&publisher_schema(), Some(&prior), &cfg, &cfg);

        assert_eq!(plan.planned_state, prior);
        assert!(plan.changes.is_empty());
        assert!(!plan.requires_replace);
    }

    #[test]
    fn test_update_marks_computed_unknown() {
        let prior = prior_state();
        let cfg = config("Renamed", "com.pingidentity.email.SmtpNotificationPlugin");
        let plan = plan_resource(&publisher_schema(), Some(&prior), &cfg, &cfg);

        assert_eq!(plan.planned_state["id"], json!("smtp"));
        assert!(plan.planned_state["modification_date"].is_null());
        assert!(plan.planned_state["plugin_descriptor_ref"]["location"].is_null());
        assert!(!plan.requires_replace);

        let name_change = plan.changes.iter().find(|c| c.path == "name").unwrap();
        assert_eq!(name_change.before, Some(json!("SMTP")));
        assert_eq!(name_change.after, Some(json!("Renamed")));
    }

    #[test]
    fn test_force_new_block_requires_replace() {
        let prior = prior_state();
        let cfg = config("SMTP", "com.pingidentity.email.OtherPlugin");
        let plan = plan_resource(&publisher_schema(), Some(&prior), &cfg, &cfg);
        assert!(plan.requires_replace);
    }

    #[test]
    fn test_unknown_nested_values_do_not_require_replace() {
        let prior = prior_state();
        let cfg = config("Renamed", "com.pingidentity.email.SmtpNotificationPlugin");
        let plan = plan_resource(&publisher_schema(), Some(&prior), &cfg, &cfg);
        assert!(plan.planned_state["plugin_descriptor_ref"]["location"].is_null());
        assert!(!plan.requires_replace);
    }

    #[test]
    fn test_force_new_attribute_requires_replace() {
        let prior = prior_state();
        let mut cfg = config("SMTP", "com.pingidentity.email.SmtpNotificationPlugin");
        cfg["publisher_id"] = json!("smtp2");
        let plan = plan_resource(&publisher_schema(), Some(&prior), &cfg, &cfg);
        assert!(plan.requires_replace);
    }

    #[test]
    fn test_destroy_plan() {
        let prior = prior_state();
        let plan = plan_resource(&publisher_schema(), Some(&prior), &Value::Null, &Value::Null);

        assert!(plan.is_destroy());
        assert!(!plan.requires_replace);
        assert_eq!(plan.changes.len(), 6);
        assert!(plan.changes.iter().all(|c| c.after.is_none()));
    }

    #[test]
    fn test_list_blocks_match_prior_by_index() {
        let schema = Schema::v0().with_block(
            "auth_sources",
            NestedBlock::list(
                Block::new()
                    .with_attribute("id", Attribute::optional_computed_string())
                    .with_attribute("source", Attribute::required_string()),
            )
            .with_default(json!([])),
        );
        let prior = json!({"auth_sources": [{"id": "a1", "source": "ldap"}]});
        let cfg = json!({"auth_sources": [{"source": "ldap"}, {"source": "kerberos"}]});

        let plan = plan_resource(&schema, Some(&prior), &cfg, &cfg);
        let sources = plan.planned_state["auth_sources"].as_array().unwrap();
        // The list changed, so server-assigned ids become unknown.
        assert!(sources[0]["id"].is_null());
        assert!(sources[1]["id"].is_null());

        let unchanged = json!({"auth_sources": [{"source": "ldap"}]});
        let plan = plan_resource(&schema, Some(&prior), &unchanged, &unchanged);
        assert_eq!(plan.planned_state["auth_sources"][0]["id"], json!("a1"));
        assert!(plan.changes.is_empty());
    }

    #[test]
    fn test_map_blocks_match_prior_by_key() {
        let schema = Schema::v0()
            .with_attribute("name", Attribute::required_string())
            .with_block(
                "extended_parameters",
                NestedBlock::map(
                    Block::new()
                        .with_attribute("values", Attribute::string_set(Default::default()))
                        .with_attribute(
                            "location",
                            Attribute::computed_string().with_use_state_for_unknown(),
                        ),
                ),
            );
        let prior = json!({
            "name": "a",
            "extended_parameters": {"tenant": {"values": ["x"], "location": "l"}}
        });
        let cfg = json!({"name": "b", "extended_parameters": {"tenant": {"values": ["x"]}}});

        let plan = plan_resource(&schema, Some(&prior), &cfg, &cfg);
        assert_eq!(
            plan.planned_state["extended_parameters"]["tenant"]["location"],
            json!("l")
        );
    }

    #[test]
    fn test_null_block_uses_default_or_prior() {
        let schema = Schema::v0()
            .with_attribute("name", Attribute::required_string())
            .with_block(
                "client_auth",
                NestedBlock::single(
                    Block::new().with_attribute("type", Attribute::optional_string()),
                )
                .with_default(json!({"type": "NONE"})),
            )
            .with_block(
                "fields_all",
                NestedBlock::list(
                    Block::new().with_attribute("name", Attribute::computed_string()),
                )
                .with_computed()
                .with_use_state_for_unknown(),
            );
        let prior = json!({
            "name": "a",
            "client_auth": {"type": "NONE"},
            "fields_all": [{"name": "f"}]
        });
        let cfg = json!({"name": "b"});

        let plan = plan_resource(&schema, Some(&prior), &cfg, &cfg);
        assert_eq!(plan.planned_state["client_auth"], json!({"type": "NONE"}));
        assert_eq!(plan.planned_state["fields_all"], json!([{"name": "f"}]));
    }

    fn client_schema() -> Schema {
        Schema::v0()
            .with_attribute(
                "grant_types",
                Attribute::string_set(AttributeFlags::required()),
            )
            .with_attribute(
                "client_id",
                Attribute::required_string().with_force_new(),
            )
            .with_block(
                "core_attributes",
                NestedBlock::set(
                    Block::new()
                        .with_attribute("name", Attribute::required_string())
                        .with_attribute(
                            "masked",
                            Attribute::optional_computed_bool().with_default(json!(false)),
                        )
                        .with_attribute(
                            "location",
                            Attribute::computed_string().with_use_state_for_unknown(),
                        ),
                ),
            )
    }

    #[test]
    fn test_reordered_sets_plan_no_changes() {
        let schema = client_schema();
        let prior = json!({
            "client_id": "app",
            "grant_types": ["AUTHORIZATION_CODE", "REFRESH_TOKEN"],
            "core_attributes": [
                {"name": "subject", "masked": false, "location": "l1"},
                {"name": "mail", "masked": true, "location": "l2"}
            ]
        });
        let cfg = json!({
            "client_id": "app",
            "grant_types": ["REFRESH_TOKEN", "AUTHORIZATION_CODE"],
            "core_attributes": [
                {"name": "mail", "masked": true},
                {"name": "subject"}
            ]
        });

        let plan = plan_resource(&schema, Some(&prior), &cfg, &cfg);
        assert!(plan.changes.is_empty(), "{:?}", plan.changes);
        assert!(!plan.requires_replace);
        assert_eq!(plan.planned_state, prior);
    }

    #[test]
    fn test_set_blocks_match_prior_by_value() {
        let schema = client_schema();
        let prior = json!({
            "client_id": "app",
            "grant_types": ["CLIENT_CREDENTIALS"],
            "core_attributes": [
                {"name": "subject", "masked": false, "location": "l1"},
                {"name": "mail", "masked": false, "location": "l2"}
            ]
        });
        let cfg = json!({
            "client_id": "app",
            "grant_types": ["CLIENT_CREDENTIALS"],
            "core_attributes": [{"name": "phone"}, {"name": "mail"}]
        });

        let plan = plan_resource(&schema, Some(&prior), &cfg, &cfg);
        let items = plan.planned_state["core_attributes"].as_array().unwrap();
        assert_eq!(items[0]["location"], Value::Null);
        assert_eq!(items[1]["location"], json!("l2"));
        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.changes[0].path, "core_attributes");
    }

    #[test]
    fn test_set_membership_change_is_a_change() {
        let schema = client_schema();
        let prior = json!({
            "client_id": "app",
            "grant_types": ["IMPLICIT", "CIBA"],
            "core_attributes": null
        });
        let cfg = json!({"client_id": "app", "grant_types": ["CIBA", "DEVICE_CODE"]});

        let plan = plan_resource(&schema, Some(&prior), &cfg, &cfg);
        assert_eq!(plan.planned_state["grant_types"], json!(["CIBA", "DEVICE_CODE"]));
        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.changes[0].path, "grant_types");
    }
}
