use crate::cli::QueryArgs;
use crate::output::OutputWriter;
use crate::output_types::{ParameterRow, QueryOutput};
use anyhow::{bail, Context, Result};
use ravenq_core::config::{
    parse_spatial_relation, parse_spatial_units, CliConfigOverrides, ConfigSource, LayeredConfig,
};
use ravenq_core::{QueryStringVariables, SpatialIndexQuery};

pub fn execute(args: QueryArgs, mut config: LayeredConfig, output: &OutputWriter) -> Result<()> {
    let overrides = CliConfigOverrides {
        spatial_field: args.field.clone(),
        distance_error_pct: args.error_pct,
        spatial_relation: args
            .relation
            .as_deref()
            .map(parse_spatial_relation)
            .transpose()
            .context("Invalid --relation")?,
        radius_units: args
            .units
            .as_deref()
            .map(parse_spatial_units)
            .transpose()
            .context("Invalid --units")?,
    };
    config.update_from_cli(overrides);

    let query = build_query(&args, &config)?;
    let parameters = query.custom_query_string_variables();

    let explanation = args.explain.then(|| explain(&query, &parameters, &config));
    if let Some(ref rows) = explanation {
        output.section("Spatial Query");
        output.table(rows.clone());
        output.info(format!("{} parameters", rows.len()));
    }

    output.plain(&parameters);
    output.result(QueryOutput {
        query_shape: query.query_shape().to_string(),
        spatial_relation: query.spatial_relation().to_string(),
        spatial_field: query.spatial_field_name().to_string(),
        distance_error_pct: query.distance_error_percentage(),
        radius_units: query.radius_unit_override().map(|units| units.to_string()),
        parameters,
        explanation,
    })
}

fn build_query(args: &QueryArgs, config: &LayeredConfig) -> Result<SpatialIndexQuery> {
    let mut query = config.spatial_query().context("Invalid spatial query settings")?;

    match (&args.shape, args.lat, args.lng, args.radius) {
        (Some(shape), _, _, _) => query.set_query_shape(shape.as_str())?,
        (None, Some(lat), Some(lng), Some(radius)) => {
            query = query.with_circle(lat, lng, radius);
        }
        _ => bail!("Provide either --shape or all of --lat, --lng and --radius"),
    }

    query.validate()?;
    Ok(query)
}

/// Pair each rendered parameter with where its value came from
fn explain(query: &SpatialIndexQuery, parameters: &str, config: &LayeredConfig) -> Vec<ParameterRow> {
    parameters
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| {
            let source = match name {
                "queryShape" => return row(name, query.query_shape(), "Cli".to_string()),
                "spatialRelation" => config.spatial_relation.source,
                "spatialField" => config.spatial_field.source,
                "distErrPrc" => config.distance_error_pct.source,
                "spatialUnits" => config.radius_units.source,
                _ => ConfigSource::Default,
            };
            row(name, value, format!("{:?}", source))
        })
        .collect()
}

fn row(name: &str, value: &str, source: String) -> ParameterRow {
    ParameterRow {
        name: name.to_string(),
        value: value.to_string(),
        source,
    }
}
