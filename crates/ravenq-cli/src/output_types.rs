use serde::Serialize;
use tabled::Tabled;

/// Output for shape command
#[derive(Debug, Serialize)]
pub struct ShapeOutput {
    pub shape: String,
    pub lat: f64,
    pub lng: f64,
    pub radius: f64,
}

/// Output for query command
#[derive(Debug, Serialize)]
pub struct QueryOutput {
    pub query_shape: String,
    pub spatial_relation: String,
    pub spatial_field: String,
    pub distance_error_pct: f64,
    pub radius_units: Option<String>,
    pub parameters: String,
    pub explanation: Option<Vec<ParameterRow>>,
}

/// One rendered query-string parameter
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ParameterRow {
    #[tabled(rename = "Parameter")]
    pub name: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

/// One configuration entry for the config command
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
