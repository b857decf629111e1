use crate::error::{QueryError, Result};
use crate::models::spatial::{
    check_distance_error_percentage, check_spatial_field_name, SpatialIndexQuery,
    SpatialRelation, SpatialUnits, DEFAULT_SPATIAL_DISTANCE_ERROR_PCT, DEFAULT_SPATIAL_FIELD_NAME,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered spatial query defaults
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub spatial_field: ConfigValue<String>,
    pub distance_error_pct: ConfigValue<f64>,
    pub spatial_relation: ConfigValue<SpatialRelation>,
    pub radius_units: ConfigValue<Option<SpatialUnits>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            spatial_field: ConfigValue::new(
                DEFAULT_SPATIAL_FIELD_NAME.to_string(),
                ConfigSource::Default,
            ),
            distance_error_pct: ConfigValue::new(
                DEFAULT_SPATIAL_DISTANCE_ERROR_PCT,
                ConfigSource::Default,
            ),
            spatial_relation: ConfigValue::new(SpatialRelation::default(), ConfigSource::Default),
            radius_units: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| QueryError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| QueryError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(spatial_field) = file_config.spatial_field {
            self.spatial_field.update(parse_spatial_field(&spatial_field)?, ConfigSource::File);
        }

        if let Some(pct) = file_config.distance_error_pct {
            self.distance_error_pct.update(check_distance_error_pct(pct)?, ConfigSource::File);
        }

        if let Some(relation) = file_config.spatial_relation {
            self.spatial_relation.update(parse_spatial_relation(&relation)?, ConfigSource::File);
        }

        if let Some(units) = file_config.radius_units {
            self.radius_units.update(Some(parse_spatial_units(&units)?), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // RAVENQ_SPATIAL_FIELD
        if let Ok(field) = env::var("RAVENQ_SPATIAL_FIELD") {
            match parse_spatial_field(&field) {
                Ok(field) => self.spatial_field.update(field, ConfigSource::Environment),
                Err(_) => tracing::warn!("Ignoring empty RAVENQ_SPATIAL_FIELD"),
            }
        }

        // RAVENQ_DISTANCE_ERROR_PCT
        if let Ok(pct_str) = env::var("RAVENQ_DISTANCE_ERROR_PCT") {
            match pct_str.parse::<f64>().ok().map(check_distance_error_pct) {
                Some(Ok(pct)) => self.distance_error_pct.update(pct, ConfigSource::Environment),
                _ => tracing::warn!(
                    "Invalid RAVENQ_DISTANCE_ERROR_PCT value '{}': expected a non-negative number",
                    pct_str
                ),
            }
        }

        // RAVENQ_SPATIAL_RELATION
        if let Ok(relation_str) = env::var("RAVENQ_SPATIAL_RELATION") {
            match parse_spatial_relation(&relation_str) {
                Ok(relation) => self.spatial_relation.update(relation, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid RAVENQ_SPATIAL_RELATION value '{}': expected within, contains, disjoint, intersects, or nearby",
                    relation_str
                ),
            }
        }

        // RAVENQ_SPATIAL_UNITS
        if let Ok(units_str) = env::var("RAVENQ_SPATIAL_UNITS") {
            match parse_spatial_units(&units_str) {
                Ok(units) => self.radius_units.update(Some(units), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid RAVENQ_SPATIAL_UNITS value '{}': expected kilometers or miles",
                    units_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(spatial_field) = overrides.spatial_field {
            self.spatial_field.update(spatial_field, ConfigSource::Cli);
        }

        if let Some(pct) = overrides.distance_error_pct {
            self.distance_error_pct.update(pct, ConfigSource::Cli);
        }

        if let Some(relation) = overrides.spatial_relation {
            self.spatial_relation.update(relation, ConfigSource::Cli);
        }

        if let Some(units) = overrides.radius_units {
            self.radius_units.update(Some(units), ConfigSource::Cli);
        }
    }

    /// Build a spatial query seeded with the resolved values.
    ///
    /// Values set programmatically through `update_from_cli` are validated
    /// here.
    pub fn spatial_query(&self) -> Result<SpatialIndexQuery> {
        let mut query = SpatialIndexQuery::new();
        query.set_spatial_field_name(self.spatial_field.value.clone())?;
        query.set_distance_error_percentage(self.distance_error_pct.value)?;
        query.set_spatial_relation(self.spatial_relation.value);
        query.set_radius_unit_override(self.radius_units.value);
        Ok(query)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "spatial_field".to_string(),
            (self.spatial_field.value.clone(), self.spatial_field.source),
        );

        map.insert(
            "distance_error_pct".to_string(),
            (format!("{:.5}", self.distance_error_pct.value), self.distance_error_pct.source),
        );

        map.insert(
            "spatial_relation".to_string(),
            (self.spatial_relation.value.to_string(), self.spatial_relation.source),
        );

        let units = match self.radius_units.value {
            Some(units) => units.to_string(),
            None => "(index default)".to_string(),
        };
        map.insert("radius_units".to_string(), (units, self.radius_units.source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    spatial_field: Option<String>,
    distance_error_pct: Option<f64>,
    spatial_relation: Option<String>,
    radius_units: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub spatial_field: Option<String>,
    pub distance_error_pct: Option<f64>,
    pub spatial_relation: Option<SpatialRelation>,
    pub radius_units: Option<SpatialUnits>,
}

/// Parse spatial relation from string
pub fn parse_spatial_relation(s: &str) -> Result<SpatialRelation> {
    match s.to_lowercase().as_str() {
        "within" => Ok(SpatialRelation::Within),
        "contains" => Ok(SpatialRelation::Contains),
        "disjoint" => Ok(SpatialRelation::Disjoint),
        "intersects" => Ok(SpatialRelation::Intersects),
        "nearby" => Ok(SpatialRelation::Nearby),
        _ => Err(QueryError::ConfigInvalid {
            key: "spatial_relation".to_string(),
            reason: format!(
                "Invalid spatial relation: {}. Use within, contains, disjoint, intersects, or nearby",
                s
            ),
        }),
    }
}

/// Parse radius units from string
pub fn parse_spatial_units(s: &str) -> Result<SpatialUnits> {
    match s.to_lowercase().as_str() {
        "kilometers" | "km" => Ok(SpatialUnits::Kilometers),
        "miles" | "mi" => Ok(SpatialUnits::Miles),
        _ => Err(QueryError::ConfigInvalid {
            key: "radius_units".to_string(),
            reason: format!("Invalid radius units: {}. Use kilometers or miles", s),
        }),
    }
}

fn parse_spatial_field(s: &str) -> Result<String> {
    check_spatial_field_name(s).map_err(|e| config_invalid("spatial_field", e))?;
    Ok(s.to_string())
}

fn check_distance_error_pct(pct: f64) -> Result<f64> {
    check_distance_error_percentage(pct).map_err(|e| config_invalid("distance_error_pct", e))
}

fn config_invalid(key: &str, err: QueryError) -> QueryError {
    QueryError::ConfigInvalid { key: key.to_string(), reason: err.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.spatial_field.value, "__spatial");
        assert_eq!(config.spatial_field.source, ConfigSource::Default);
        assert_eq!(config.distance_error_pct.value, 0.025);
        assert_eq!(config.spatial_relation.value, SpatialRelation::Within);
        assert!(config.radius_units.value.is_none());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
spatial_field = "Location"
distance_error_pct = 0.1
spatial_relation = "intersects"
radius_units = "miles"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.spatial_field.value, "Location");
        assert_eq!(config.spatial_field.source, ConfigSource::File);
        assert_eq!(config.distance_error_pct.value, 0.1);
        assert_eq!(config.spatial_relation.value, SpatialRelation::Intersects);
        assert_eq!(config.radius_units.value, Some(SpatialUnits::Miles));
    }

    #[test]
    fn test_file_rejects_negative_error_pct() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "distance_error_pct = -0.5").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(
            result,
            Err(QueryError::ConfigInvalid { ref key, .. }) if key == "distance_error_pct"
        ));
    }

    #[test]
    fn test_file_rejects_empty_spatial_field() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "spatial_field = \"\"").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        match result {
            Err(QueryError::ConfigInvalid { key, reason }) => {
                assert_eq!(key, "spatial_field");
                assert_eq!(reason, QueryError::EmptySpatialFieldName.to_string());
            }
            other => panic!("expected ConfigInvalid, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_file_normalizes_negative_zero_error_pct() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "distance_error_pct = -0.0").unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();
        assert_eq!(config.distance_error_pct.source, ConfigSource::File);
        assert!(config.distance_error_pct.value.is_sign_positive());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            spatial_field: Some("Coordinates".to_string()),
            radius_units: Some(SpatialUnits::Kilometers),
            ..Default::default()
        };

        config.update_from_cli(overrides);

        assert_eq!(config.spatial_field.value, "Coordinates");
        assert_eq!(config.spatial_field.source, ConfigSource::Cli);
        assert_eq!(config.radius_units.value, Some(SpatialUnits::Kilometers));
        // These should still be defaults
        assert_eq!(config.distance_error_pct.source, ConfigSource::Default);
        assert_eq!(config.spatial_relation.source, ConfigSource::Default);
    }

    #[test]
    fn test_spatial_query_from_config() {
        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(CliConfigOverrides {
            distance_error_pct: Some(0.05),
            spatial_relation: Some(SpatialRelation::Disjoint),
            ..Default::default()
        });

        let query = config.spatial_query().unwrap();
        assert_eq!(query.spatial_field_name(), DEFAULT_SPATIAL_FIELD_NAME);
        assert_eq!(query.distance_error_percentage(), 0.05);
        assert_eq!(query.spatial_relation(), SpatialRelation::Disjoint);
        assert!(query.radius_unit_override().is_none());
    }

    #[test]
    fn test_spatial_query_rejects_invalid_cli_value() {
        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(CliConfigOverrides {
            distance_error_pct: Some(f64::NAN),
            ..Default::default()
        });

        assert!(config.spatial_query().is_err());
    }

    #[test]
    fn test_parse_spatial_relation() {
        assert_eq!(parse_spatial_relation("within").unwrap(), SpatialRelation::Within);
        assert_eq!(parse_spatial_relation("INTERSECTS").unwrap(), SpatialRelation::Intersects);
        assert_eq!(parse_spatial_relation("Nearby").unwrap(), SpatialRelation::Nearby);
        assert!(parse_spatial_relation("overlaps").is_err());
    }

    #[test]
    fn test_parse_spatial_units() {
        assert_eq!(parse_spatial_units("km").unwrap(), SpatialUnits::Kilometers);
        assert_eq!(parse_spatial_units("Miles").unwrap(), SpatialUnits::Miles);
        assert!(parse_spatial_units("feet").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("spatial_field"));
        assert!(map.contains_key("distance_error_pct"));
        assert!(map.contains_key("spatial_relation"));

        let (units, source) = &map["radius_units"];
        assert_eq!(units, "(index default)");
        assert_eq!(*source, ConfigSource::Default);

        let (pct, _) = &map["distance_error_pct"];
        assert_eq!(pct, "0.02500");
    }
}
