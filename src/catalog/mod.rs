//! Species catalog wiring.
//!
//! This module wraps the bundled species JSON so callers can load a validated
//! snapshot and resolve records by id. Types here mirror the record schema;
//! callers use `CatalogStore` for the backing sequence and `CategoryRegistry`
//! for the filter controls.

pub mod identity;
pub mod model;
pub mod registry;
pub mod store;

pub use identity::{ALL_SENTINEL, CategoryId, CategorySelector, SpeciesId};
pub use model::{RawSpeciesRecord, RecordError, SpeciesCard, SpeciesRecord};
pub use registry::{CategoryDefinition, CategoryRegistry, FilterControl};
pub use store::CatalogStore;
