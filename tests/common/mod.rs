#![allow(dead_code)]

use strata::math::Point3;

/// Installs a test-writer subscriber filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Vertex array and index triples.
#[derive(Debug, Clone, Default)]
pub struct Soup {
    pub vertices: Vec<Point3>,
    pub faces: Vec<[usize; 3]>,
}

impl Soup {
    /// Appends `other`, offsetting its indices.
    pub fn merge(mut self, other: Soup) -> Soup {
        let base = self.vertices.len();
        self.vertices.extend(other.vertices);
        self.faces
            .extend(other.faces.into_iter().map(|[a, b, c]| [a + base, b + base, c + base]));
        self
    }
}

/// Extrudes a convex counter-clockwise polygon between `z0` and `z1`, with
/// faces wound counter-clockwise seen from outside.
pub fn prism(polygon: &[(f64, f64)], z0: f64, z1: f64) -> Soup {
    let n = polygon.len();
    let mut vertices: Vec<Point3> = polygon.iter().map(|&(x, y)| Point3::new(x, y, z0)).collect();
    vertices.extend(polygon.iter().map(|&(x, y)| Point3::new(x, y, z1)));

    let mut faces = Vec::new();
    for i in 0..n {
        let j = (i + 1) % n;
        faces.push([i, j, n + j]);
        faces.push([i, n + j, n + i]);
    }
    for i in 1..n - 1 {
        faces.push([0, i + 1, i]);
        faces.push([n, n + i, n + i + 1]);
    }
    Soup { vertices, faces }
}

/// Extrudes the region between two convex counter-clockwise polygons with
/// the same vertex count, the inner one strictly inside the outer.
pub fn ring_prism(outer: &[(f64, f64)], inner: &[(f64, f64)], z0: f64, z1: f64) -> Soup {
    let n = outer.len();
    let (ob, ot, ib, it) = (0, n, 2 * n, 3 * n);
    let mut vertices = Vec::with_capacity(4 * n);
    for (ring, z) in [(outer, z0), (outer, z1), (inner, z0), (inner, z1)] {
        vertices.extend(ring.iter().map(|&(x, y)| Point3::new(x, y, z)));
    }

    let mut faces = Vec::new();
    for i in 0..n {
        let j = (i + 1) % n;
        faces.push([ob + i, ob + j, ot + j]);
        faces.push([ob + i, ot + j, ot + i]);
        faces.push([ib + i, it + j, ib + j]);
        faces.push([ib + i, it + i, it + j]);
        faces.push([ot + i, ot + j, it + j]);
        faces.push([ot + i, it + j, it + i]);
        faces.push([ob + i, ib + j, ob + j]);
        faces.push([ob + i, ib + i, ib + j]);
    }
    Soup { vertices, faces }
}

/// Counter-clockwise axis-aligned square.
pub fn square(cx: f64, cy: f64, half: f64) -> Vec<(f64, f64)> {
    vec![
        (cx - half, cy - half),
        (cx + half, cy - half),
        (cx + half, cy + half),
        (cx - half, cy + half),
    ]
}

/// Regular counter-clockwise polygon with `n` vertices on a circle of
/// `radius` around the origin.
pub fn ngon(n: u32, radius: f64) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let a = std::f64::consts::TAU * f64::from(i) / f64::from(n);
            (radius * a.cos(), radius * a.sin())
        })
        .collect()
}

/// Cube of side `2 * half` centred at the origin.
pub fn cube(half: f64) -> Soup {
    prism(&square(0.0, 0.0, half), -half, half)
}
