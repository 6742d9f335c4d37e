//! Request and response bodies of the administrative API.
//!
//! Field names follow the API's camelCase JSON. Optional fields are left out
//! of request bodies when unset.

mod common;
mod data_stores;
mod idp;
mod key_pairs;
mod local_identity;
mod oauth;
mod plugins;
mod settings;

pub use common::*;
pub use data_stores::*;
pub use idp::*;
pub use key_pairs::*;
pub use local_identity::*;
pub use oauth::*;
pub use plugins::*;
pub use settings::*;
