use crate::cli::ShapeArgs;
use crate::output::OutputWriter;
use crate::output_types::ShapeOutput;
use anyhow::Result;
use ravenq_core::query_shape_from_lat_lon;

pub fn execute(args: ShapeArgs, output: &OutputWriter) -> Result<()> {
    let shape = query_shape_from_lat_lon(args.lat, args.lng, args.radius);

    output.plain(&shape);
    output.result(ShapeOutput {
        shape,
        lat: args.lat,
        lng: args.lng,
        radius: args.radius,
    })
}
