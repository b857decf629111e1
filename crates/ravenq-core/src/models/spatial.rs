//! Spatial index query and its query-string rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::index_query::{IndexQuery, QueryStringVariables};
use crate::encoding::{escape_data_string, WireToken};
use crate::error::{QueryError, Result};

/// Index field spatial data is stored under unless overridden
pub const DEFAULT_SPATIAL_FIELD_NAME: &str = "__spatial";

/// Default tolerance for approximating query shapes
pub const DEFAULT_SPATIAL_DISTANCE_ERROR_PCT: f64 = 0.025;

/// Relation between the query shape and indexed geometries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SpatialRelation {
    /// Indexed geometry lies within the query shape
    #[default]
    Within,
    /// Indexed geometry contains the query shape
    Contains,
    /// Indexed geometry does not touch the query shape
    Disjoint,
    /// Indexed geometry overlaps the query shape
    Intersects,
    /// Indexed geometry lies near the query shape, ordered by distance
    Nearby,
}

impl WireToken for SpatialRelation {
    fn wire_token(&self) -> &'static str {
        match self {
            SpatialRelation::Within => "Within",
            SpatialRelation::Contains => "Contains",
            SpatialRelation::Disjoint => "Disjoint",
            SpatialRelation::Intersects => "Intersects",
            SpatialRelation::Nearby => "Nearby",
        }
    }
}

impl fmt::Display for SpatialRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_token())
    }
}

/// Radius units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpatialUnits {
    /// Radius is given in kilometers
    Kilometers,
    /// Radius is given in statute miles
    Miles,
}

impl WireToken for SpatialUnits {
    fn wire_token(&self) -> &'static str {
        match self {
            SpatialUnits::Kilometers => "Kilometers",
            SpatialUnits::Miles => "Miles",
        }
    }
}

impl fmt::Display for SpatialUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_token())
    }
}

/// Build a circle shape descriptor, `Circle(<lng> <lat> d=<radius>)`.
///
/// Longitude comes first. The radius is in the units of the target index.
pub fn query_shape_from_lat_lon(lat: f64, lng: f64, radius: f64) -> String {
    format!("Circle({:.6} {:.6} d={:.6})", lng, lat, radius)
}

/// Index query constrained by a spatial shape
///
/// Deserialization applies the same checks as the setters, except that an
/// empty shape is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSpatialIndexQuery")]
pub struct SpatialIndexQuery {
    #[serde(flatten)]
    base: IndexQuery,

    /// Pre-formatted shape; empty until set
    query_shape: String,

    spatial_relation: SpatialRelation,

    distance_error_percentage: f64,

    /// Overrides the units defined in the spatial index
    radius_unit_override: Option<SpatialUnits>,

    spatial_field_name: String,
}

impl Default for SpatialIndexQuery {
    fn default() -> Self {
        Self {
            base: IndexQuery::default(),
            query_shape: String::new(),
            spatial_relation: SpatialRelation::default(),
            distance_error_percentage: DEFAULT_SPATIAL_DISTANCE_ERROR_PCT,
            radius_unit_override: None,
            spatial_field_name: DEFAULT_SPATIAL_FIELD_NAME.to_string(),
        }
    }
}

impl SpatialIndexQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a spatial query from a general one.
    ///
    /// Paging, sorting, projection, highlighting and transformer settings are
    /// carried over; spatial settings start at their defaults.
    pub fn from_index_query(query: &IndexQuery) -> Self {
        let base = IndexQuery {
            query: query.query.clone(),
            start: query.start,
            cutoff: query.cutoff,
            page_size: query.page_size,
            fields_to_fetch: query.fields_to_fetch.clone(),
            sorted_fields: query.sorted_fields.clone(),
            highlighter_pre_tags: query.highlighter_pre_tags.clone(),
            highlighter_post_tags: query.highlighter_post_tags.clone(),
            highlighted_fields: query.highlighted_fields.clone(),
            results_transformer: query.results_transformer.clone(),
        };

        Self { base, ..Self::default() }
    }

    pub fn base(&self) -> &IndexQuery {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut IndexQuery {
        &mut self.base
    }

    pub fn query_shape(&self) -> &str {
        &self.query_shape
    }

    pub fn set_query_shape(&mut self, shape: impl Into<String>) -> Result<()> {
        let shape = shape.into();
        if shape.is_empty() {
            return Err(QueryError::EmptyQueryShape);
        }
        self.query_shape = shape;
        Ok(())
    }

    /// Use a circle around the given point as the query shape
    pub fn with_circle(mut self, lat: f64, lng: f64, radius: f64) -> Self {
        self.query_shape = query_shape_from_lat_lon(lat, lng, radius);
        self
    }

    pub fn spatial_relation(&self) -> SpatialRelation {
        self.spatial_relation
    }

    pub fn set_spatial_relation(&mut self, relation: SpatialRelation) {
        self.spatial_relation = relation;
    }

    pub fn distance_error_percentage(&self) -> f64 {
        self.distance_error_percentage
    }

    pub fn set_distance_error_percentage(&mut self, value: f64) -> Result<()> {
        self.distance_error_percentage = check_distance_error_percentage(value)?;
        Ok(())
    }

    pub fn radius_unit_override(&self) -> Option<SpatialUnits> {
        self.radius_unit_override
    }

    pub fn set_radius_unit_override(&mut self, units: Option<SpatialUnits>) {
        self.radius_unit_override = units;
    }

    pub fn spatial_field_name(&self) -> &str {
        &self.spatial_field_name
    }

    pub fn set_spatial_field_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        check_spatial_field_name(&name)?;
        self.spatial_field_name = name;
        Ok(())
    }

    /// Check every invariant, including that a shape has been set.
    pub fn validate(&self) -> Result<()> {
        if self.query_shape.is_empty() {
            return Err(QueryError::EmptyQueryShape);
        }
        check_spatial_field_name(&self.spatial_field_name)?;
        check_distance_error_percentage(self.distance_error_percentage).map(|_| ())
    }
}

impl QueryStringVariables for SpatialIndexQuery {
    /// Render `queryShape`, `spatialRelation`, `spatialField` and `distErrPrc`
    /// in that order, followed by `spatialUnits` only when an override is set.
    fn custom_query_string_variables(&self) -> String {
        let mut params = format!(
            "queryShape={}&spatialRelation={}&spatialField={}&distErrPrc={:.5}",
            escape_data_string(&self.query_shape),
            self.spatial_relation.wire_token(),
            self.spatial_field_name,
            self.distance_error_percentage,
        );

        if let Some(units) = self.radius_unit_override {
            params.push_str("&spatialUnits=");
            params.push_str(units.wire_token());
        }

        tracing::debug!(field = %self.spatial_field_name, "Rendered spatial query parameters: {}", params);

        params
    }
}

/// Serialized form of [`SpatialIndexQuery`], checked on conversion
#[derive(Deserialize)]
#[serde(default)]
struct RawSpatialIndexQuery {
    #[serde(flatten)]
    base: IndexQuery,
    query_shape: String,
    spatial_relation: SpatialRelation,
    distance_error_percentage: f64,
    radius_unit_override: Option<SpatialUnits>,
    spatial_field_name: String,
}

impl Default for RawSpatialIndexQuery {
    fn default() -> Self {
        Self {
            base: IndexQuery::default(),
            query_shape: String::new(),
            spatial_relation: SpatialRelation::default(),
            distance_error_percentage: DEFAULT_SPATIAL_DISTANCE_ERROR_PCT,
            radius_unit_override: None,
            spatial_field_name: DEFAULT_SPATIAL_FIELD_NAME.to_string(),
        }
    }
}

impl TryFrom<RawSpatialIndexQuery> for SpatialIndexQuery {
    type Error = QueryError;

    fn try_from(raw: RawSpatialIndexQuery) -> Result<Self> {
        check_spatial_field_name(&raw.spatial_field_name)?;

        Ok(Self {
            base: raw.base,
            query_shape: raw.query_shape,
            spatial_relation: raw.spatial_relation,
            distance_error_percentage: check_distance_error_percentage(
                raw.distance_error_percentage,
            )?,
            radius_unit_override: raw.radius_unit_override,
            spatial_field_name: raw.spatial_field_name,
        })
    }
}

pub(crate) fn check_spatial_field_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(QueryError::EmptySpatialFieldName);
    }
    Ok(())
}

/// Returns the value to store; negative zero becomes zero so no sign is rendered.
pub(crate) fn check_distance_error_percentage(value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(QueryError::InvalidDistanceErrorPercentage { value });
    }
    Ok(if value == 0.0 { 0.0 } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: &str = "Circle(20.000000 10.000000 d=5.000000)";

    #[test]
    fn test_shape_puts_longitude_first() {
        assert_eq!(query_shape_from_lat_lon(10.0, 20.0, 5.0), SHAPE);
    }

    #[test]
    fn test_shape_rounds_to_six_decimals() {
        assert_eq!(
            query_shape_from_lat_lon(-33.8688197, 151.2093, 0.5),
            "Circle(151.209300 -33.868820 d=0.500000)"
        );
    }

    #[test]
    fn test_defaults() {
        let query = SpatialIndexQuery::new();
        assert_eq!(query.distance_error_percentage(), DEFAULT_SPATIAL_DISTANCE_ERROR_PCT);
        assert_eq!(query.spatial_field_name(), DEFAULT_SPATIAL_FIELD_NAME);
        assert_eq!(query.spatial_relation(), SpatialRelation::Within);
        assert!(query.radius_unit_override().is_none());
        assert!(query.query_shape().is_empty());
    }

    #[test]
    fn test_render_without_units() {
        let mut query = SpatialIndexQuery::new();
        query.set_query_shape(SHAPE).unwrap();
        query.set_spatial_field_name("spatial").unwrap();

        assert_eq!(
            query.custom_query_string_variables(),
            "queryShape=Circle%2820.000000%2010.000000%20d%3D5.000000%29\
             &spatialRelation=Within&spatialField=spatial&distErrPrc=0.02500"
        );
    }

    #[test]
    fn test_render_with_units_appends_one_fragment() {
        let mut query = SpatialIndexQuery::new().with_circle(10.0, 20.0, 5.0);
        query.set_spatial_relation(SpatialRelation::Intersects);
        query.set_radius_unit_override(Some(SpatialUnits::Miles));

        let params = query.custom_query_string_variables();
        assert!(params.ends_with("&distErrPrc=0.02500&spatialUnits=Miles"));
        assert!(params.contains("&spatialRelation=Intersects&"));
        assert_eq!(params.matches("spatialUnits=").count(), 1);
    }

    #[test]
    fn test_render_empty_shape() {
        let query = SpatialIndexQuery::new();
        assert_eq!(
            query.custom_query_string_variables(),
            "queryShape=&spatialRelation=Within&spatialField=__spatial&distErrPrc=0.02500"
        );
        assert!(matches!(query.validate(), Err(QueryError::EmptyQueryShape)));
    }

    #[test]
    fn test_setters_reject_invalid_values() {
        let mut query = SpatialIndexQuery::new();

        assert!(matches!(query.set_query_shape(""), Err(QueryError::EmptyQueryShape)));
        assert!(matches!(
            query.set_spatial_field_name(""),
            Err(QueryError::EmptySpatialFieldName)
        ));
        for value in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                query.set_distance_error_percentage(value),
                Err(QueryError::InvalidDistanceErrorPercentage { .. })
            ));
        }

        // Rejected values leave the previous state untouched
        assert_eq!(query.spatial_field_name(), DEFAULT_SPATIAL_FIELD_NAME);
        assert_eq!(query.distance_error_percentage(), DEFAULT_SPATIAL_DISTANCE_ERROR_PCT);
    }

    #[test]
    fn test_zero_error_percentage_is_valid() {
        let mut query = SpatialIndexQuery::new().with_circle(0.0, 0.0, 1.0);
        query.set_distance_error_percentage(0.0).unwrap();
        assert!(query.validate().is_ok());
        assert!(query.custom_query_string_variables().ends_with("distErrPrc=0.00000"));
    }

    #[test]
    fn test_negative_zero_error_percentage_renders_unsigned() {
        let mut query = SpatialIndexQuery::new().with_circle(0.0, 0.0, 1.0);
        query.set_distance_error_percentage(-0.0).unwrap();

        assert!(query.distance_error_percentage().is_sign_positive());
        assert!(query.custom_query_string_variables().ends_with("&distErrPrc=0.00000"));
    }

    #[test]
    fn test_deserialize_rejects_empty_field_name() {
        let result = serde_json::from_str::<SpatialIndexQuery>(
            r#"{"query_shape": "Circle(1 2 d=3)", "spatial_field_name": ""}"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Spatial field name must not be empty"), "{err}");
    }

    #[test]
    fn test_deserialize_rejects_invalid_error_percentage() {
        for pct in ["-1.0", "-0.001"] {
            let json = format!(
                r#"{{"query_shape": "Circle(1 2 d=3)", "distance_error_percentage": {pct}}}"#
            );
            let err = serde_json::from_str::<SpatialIndexQuery>(&json).unwrap_err();
            assert!(err.to_string().contains("Invalid distance error percentage"), "{err}");
        }
    }

    #[test]
    fn test_deserialize_normalizes_negative_zero() {
        let query: SpatialIndexQuery =
            serde_json::from_str(r#"{"distance_error_percentage": -0.0}"#).unwrap();
        assert!(query.distance_error_percentage().is_sign_positive());
    }

    #[test]
    fn test_deserialize_accepts_empty_shape_with_defaults() {
        let query: SpatialIndexQuery = serde_json::from_str(r#"{"query": "Tag:rust"}"#).unwrap();

        assert_eq!(query.base().query, "Tag:rust");
        assert!(query.query_shape().is_empty());
        assert_eq!(query.spatial_field_name(), DEFAULT_SPATIAL_FIELD_NAME);
        assert_eq!(query.distance_error_percentage(), DEFAULT_SPATIAL_DISTANCE_ERROR_PCT);
        assert!(matches!(query.validate(), Err(QueryError::EmptyQueryShape)));
    }

    #[test]
    fn test_wire_tokens() {
        assert_eq!(SpatialRelation::Disjoint.to_string(), "Disjoint");
        assert_eq!(SpatialRelation::Nearby.wire_token(), "Nearby");
        assert_eq!(SpatialUnits::Kilometers.to_string(), "Kilometers");
    }
}
