use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ravenq - Spatial query builder for the indexing service
#[derive(Parser, Debug)]
#[command(name = "ravenq")]
#[command(about = "Build spatial query parameters for the indexing service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the circle shape for a point and radius
    Shape(ShapeArgs),

    /// Render the spatial query-string parameters
    Query(QueryArgs),

    /// Show resolved configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct ShapeArgs {
    /// Latitude of the circle center
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude of the circle center
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    /// Radius, in the units of the target index
    #[arg(long)]
    pub radius: f64,
}

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Pre-formatted query shape (e.g. "Circle(20 10 d=5)")
    #[arg(long, conflicts_with_all = ["lat", "lng", "radius"])]
    pub shape: Option<String>,

    /// Latitude of the circle center
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the circle center
    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Radius, in the units of the target index
    #[arg(long)]
    pub radius: Option<f64>,

    /// Spatial relation (within, contains, disjoint, intersects, nearby)
    #[arg(long)]
    pub relation: Option<String>,

    /// Spatial index field
    #[arg(long)]
    pub field: Option<String>,

    /// Distance error percentage
    #[arg(long)]
    pub error_pct: Option<f64>,

    /// Radius unit override (kilometers or miles)
    #[arg(long)]
    pub units: Option<String>,

    /// Show each parameter with the value it was rendered from
    #[arg(long)]
    pub explain: bool,
}
