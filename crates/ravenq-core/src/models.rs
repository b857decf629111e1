pub mod index_query;
pub mod spatial;

pub use index_query::{HighlightedField, IndexQuery, QueryStringVariables, SortedField};
pub use spatial::{
    query_shape_from_lat_lon, SpatialIndexQuery, SpatialRelation, SpatialUnits,
    DEFAULT_SPATIAL_DISTANCE_ERROR_PCT, DEFAULT_SPATIAL_FIELD_NAME,
};
