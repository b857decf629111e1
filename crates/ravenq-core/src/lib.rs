//! ravenq Core - Spatial query construction and callback composition
//!
//! This crate contains the spatial index query model, its canonical
//! query-string rendering, the callback combinator used to chain observers,
//! and the layered configuration that seeds spatial query defaults.

pub mod closure;
pub mod config;
pub mod encoding;
pub mod error;
pub mod models;

pub use closure::{combine, noop, Action, Action1, Action2, Action3};
pub use error::{QueryError, Result};
pub use models::{
    query_shape_from_lat_lon, IndexQuery, QueryStringVariables, SpatialIndexQuery,
    SpatialRelation, SpatialUnits,
};
