//! Slices a square tube and prints the per-layer loops and perimeters.
//!
//! Usage:
//! ```text
//! cargo run --example slice_report
//! RUST_LOG=strata=debug cargo run --example slice_report
//! ```

use strata::math::Point3;
use strata::operations::{InsetLoops, SliceLayers};
use strata::{MeshModel, SliceParams, StrataError};

fn main() -> Result<(), StrataError> {
    // Default: WARN for everything, INFO for strata.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("strata=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let (vertices, faces) = square_tube(10.0, 4.0, 3.0);
    let mesh = MeshModel::build(&vertices, &faces)?;
    let params = SliceParams::default().with_layer_height(0.5);

    for layer in SliceLayers::new(params).execute(&mesh)? {
        let perimeters = InsetLoops::new(layer.loops.clone(), params.perimeter_inset()).execute();
        println!(
            "layer {:>2} z={:.2} {:?}: {} loops, {} perimeters, {} defects",
            layer.index,
            layer.z,
            layer.strategy,
            layer.loops.len(),
            perimeters.len(),
            layer.defects.len()
        );
        for l in &layer.loops {
            println!(
                "    depth {:?} points {:>3} area {:>8.3}",
                l.depth,
                l.len(),
                l.signed_area()
            );
        }
    }
    Ok(())
}

/// Square tube of the given outer and inner side, standing on z = 0.
fn square_tube(outer: f64, inner: f64, height: f64) -> (Vec<Point3>, Vec<[usize; 3]>) {
    let ring = |side: f64| {
        let h = 0.5 * side;
        [(-h, -h), (h, -h), (h, h), (-h, h)]
    };
    let mut vertices = Vec::with_capacity(16);
    for (side, z) in [(outer, 0.0), (outer, height), (inner, 0.0), (inner, height)] {
        vertices.extend(ring(side).iter().map(|&(x, y)| Point3::new(x, y, z)));
    }

    let (ob, ot, ib, it) = (0, 4, 8, 12);
    let mut faces = Vec::with_capacity(32);
    for i in 0..4 {
        let j = (i + 1) % 4;
        faces.extend([
            [ob + i, ob + j, ot + j],
            [ob + i, ot + j, ot + i],
            [ib + i, it + j, ib + j],
            [ib + i, it + i, it + j],
            [ot + i, ot + j, it + j],
            [ot + i, it + j, it + i],
            [ob + i, ib + j, ob + j],
            [ob + i, ib + i, ib + j],
        ]);
    }
    (vertices, faces)
}
