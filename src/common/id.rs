//! The `id` attribute and user-chosen identifiers.

use crate::schema::Attribute;

/// Computed `id` that stays stable across updates.
pub fn id_attribute() -> Attribute {
    Attribute::computed_string()
        .with_description("The ID of this resource.")
        .with_use_state_for_unknown()
}

/// An identifier chosen by the user, such as `publisher_id`.
///
/// When not required the server generates one, and the generated value is
/// kept across plans. Changing it always replaces the object.
pub fn custom_id_attribute(required: bool, description: &str) -> Attribute {
    let attr = if required {
        Attribute::required_string()
    } else {
        Attribute::optional_computed_string().with_use_state_for_unknown()
    };
    attr.with_description(description).with_force_new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_attribute() {
        let attr = id_attribute();
        assert!(attr.flags.computed);
        assert!(!attr.flags.optional);
        assert!(attr.use_state_for_unknown);
    }

    #[test]
    fn test_custom_id_attribute() {
        let required = custom_id_attribute(true, "The ID of the plugin instance.");
        assert!(required.flags.required);
        assert!(required.force_new);
        assert!(!required.use_state_for_unknown);

        let generated = custom_id_attribute(false, "The persistent, unique ID for the data store.");
        assert!(generated.flags.optional);
        assert!(generated.flags.computed);
        assert!(generated.force_new);
        assert!(generated.use_state_for_unknown);
    }
}
