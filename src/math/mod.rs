/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// One millimetre in model units. Point equality, segment degeneracy and
/// panel planarity are all judged against this distance.
pub const TOLERANCE: f64 = 1e-3;

/// Returns `true` if two points are within [`TOLERANCE`] of each other.
#[must_use]
pub fn points_coincident(a: &Point3, b: &Point3) -> bool {
    (b - a).norm() < TOLERANCE
}

/// Returns `true` if all coordinates of a point are finite.
#[must_use]
pub fn is_finite_point(p: &Point3) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

/// Quantizes a point onto the tolerance grid.
///
/// Points closer than [`TOLERANCE`] map to the same key, giving a hashable
/// identity that matches the crate's distance-based point equality.
#[must_use]
pub fn point_key(p: &Point3) -> [i64; 3] {
    [
        (p.x / TOLERANCE).round() as i64,
        (p.y / TOLERANCE).round() as i64,
        (p.z / TOLERANCE).round() as i64,
    ]
}

/// Computes the unit normal of a polygon using Newell's method.
///
/// Returns `None` for degenerate polygons (fewer than 3 points or
/// near-zero area).
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Option<Vector3> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let mut normal = Vector3::new(0.0, 0.0, 0.0);
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    let len = normal.norm();
    if len < TOLERANCE * TOLERANCE {
        return None;
    }
    Some(normal / len)
}

/// Returns the left-pointing unit normal of a direction in the horizontal
/// plane, or `None` if the direction has no horizontal extent.
#[must_use]
pub fn horizontal_left_normal(dir: &Vector3) -> Option<Vector3> {
    let h = Vector3::new(-dir.y, dir.x, 0.0);
    let len = h.norm();
    if len < TOLERANCE {
        return None;
    }
    Some(h / len)
}
