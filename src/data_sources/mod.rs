//! Read-only lookups.

mod key_pair_signing_import;

use std::sync::Arc;

use crate::resource::DataSource;

pub use key_pair_signing_import::KeyPairSigningImportDataSource;

/// Every data source the provider serves.
pub fn all() -> Vec<Arc<dyn DataSource>> {
    vec![Arc::new(KeyPairSigningImportDataSource)]
}
