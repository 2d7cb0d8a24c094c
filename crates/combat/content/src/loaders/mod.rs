//! Content loaders for reading combat data from files.
//!
//! Loaders deserialize the formats in [`crate::formats`] and resolve them into
//! `combat-core` definitions.

pub mod catalog;
pub mod config;
pub mod factory;

pub use catalog::{Catalog, CatalogLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Reads a whole data file, naming it in the error.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
