//! Schema fragments and conversions shared by several resources.

pub mod attribute_sources;
pub mod id;
pub mod json;
pub mod plugin_configuration;
pub mod resource_link;
pub mod source_type_id_key;
pub mod values;
