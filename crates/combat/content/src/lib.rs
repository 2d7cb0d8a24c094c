//! Data-driven combat content and loaders.
//!
//! This crate turns authored RON/TOML files into the shared definitions the
//! combat engine runs on:
//! - Categories and their parent chains
//! - Tags with priorities and stack policies
//! - Status definitions and the effects they apply
//! - Category interaction rules
//! - Engine configuration (retention windows, fixed timestep)
//!
//! Authored files refer to each other by name; [`CatalogLoader`] resolves those
//! names once so the engine only ever sees `combat-core` handles.

pub mod formats;
pub mod loaders;

pub use formats::{
    CatalogFile, CategorySpec, EffectKindSpec, EffectSpec, InteractionSpec, StatusDef, TagSpec,
    TimingSpec,
};
pub use loaders::{Catalog, CatalogLoader, ConfigLoader, ContentFactory, LoadResult};
