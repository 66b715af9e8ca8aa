//! Core catalog model for discograph.
//!
//! This crate defines the album data model, the JSON and XML loaders, the
//! query engine with its filter-expression language, and the random
//! playlist sampler. Everything here is pure: nothing prints, and a loaded
//! [`Catalog`] is never mutated.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod filter;
pub mod load;
pub mod model;
pub mod playlist;
pub mod query;

pub use error::{Error, Result};
pub use filter::{Filter, REFERENCE_FILTER};
pub use load::CatalogFormat;
pub use model::{Album, Catalog, Composition};
pub use playlist::TrackEntry;
