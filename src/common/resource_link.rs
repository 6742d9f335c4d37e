//! References to other configuration objects.

use serde_json::{json, Value};

use super::values::get_str;
use crate::client::models::ResourceLink;
use crate::schema::{Attribute, Block, NestedBlock};

/// `{id, location}` block.
pub fn block() -> Block {
    Block::new()
        .with_attribute(
            "id",
            Attribute::required_string().with_description("The ID of the resource."),
        )
        .with_attribute(
            "location",
            Attribute::computed_string()
                .with_description("A read-only URL that references the resource.")
                .with_use_state_for_unknown(),
        )
}

/// An optional link.
pub fn optional(description: &str) -> NestedBlock {
    NestedBlock::single(block()).with_description(description)
}

/// A required link.
pub fn required(description: &str) -> NestedBlock {
    optional(description).required()
}

/// Request struct for a link in state. `None` when unset.
pub fn client_struct(value: Option<&Value>) -> Option<ResourceLink> {
    let id = get_str(value?, "id")?;
    Some(ResourceLink::new(id))
}

/// State value for a link returned by the API.
pub fn to_state(link: Option<&ResourceLink>) -> Value {
    match link {
        Some(link) => json!({
            "id": link.id,
            "location": link.location,
        }),
        None => Value::Null,
    }
}
