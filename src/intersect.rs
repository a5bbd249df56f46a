//! Low-level geometric tests backing the line-segment queries.

use crate::float_types::{Real, APPROX_ZERO};
use nalgebra::{Point3, Vector3};

/// Möller-Trumbore ray/triangle test.
///
/// Returns the barycentric coordinates `(u, v)` and the distance `t` along
/// `dir` when the ray hits; `None` on a miss. One-sided tests reject
/// back-facing triangles (negative determinant).
pub fn triangle_ray_intersect(
    vert0: &Point3<Real>,
    vert1: &Point3<Real>,
    vert2: &Point3<Real>,
    orig: &Point3<Real>,
    dir: &Vector3<Real>,
    two_sided: bool,
) -> Option<(Real, Real, Real)> {
    let edge1 = vert1 - vert0;
    let edge2 = vert2 - vert0;

    let pvec = dir.cross(&edge2);

    // A determinant near zero means the ray lies in the triangle's plane.
    let det = edge1.dot(&pvec);

    if !two_sided {
        if det < APPROX_ZERO {
            return None;
        }

        let tvec = orig - vert0;

        let u = tvec.dot(&pvec);
        if u < 0.0 || u > det {
            return None;
        }

        let qvec = tvec.cross(&edge1);

        let v = dir.dot(&qvec);
        if v < 0.0 || u + v > det {
            return None;
        }

        let inv_det = 1.0 / det;
        let t = edge2.dot(&qvec) * inv_det;
        Some((u * inv_det, v * inv_det, t))
    } else {
        if det > -APPROX_ZERO && det < APPROX_ZERO {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = orig - vert0;

        let u = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(&edge1);

        let v = dir.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(&qvec) * inv_det;
        Some((u, v, t))
    }
}

/// Separating-axis test of a line segment against an axis-aligned box.
pub fn segment_box_intersect(
    start: &Point3<Real>,
    end: &Point3<Real>,
    center: &Point3<Real>,
    half_extents: &Vector3<Real>,
) -> bool {
    let dir = (end - start) * 0.5;
    let diff = Point3::from((start.coords + end.coords) * 0.5) - center;
    let awd = dir.abs();

    for i in 0..3 {
        if diff[i].abs() > half_extents[i] + awd[i] {
            return false;
        }
    }

    let f = dir.y * diff.z - dir.z * diff.y;
    if f.abs() > half_extents.y * awd.z + half_extents.z * awd.y {
        return false;
    }
    let f = dir.z * diff.x - dir.x * diff.z;
    if f.abs() > half_extents.x * awd.z + half_extents.z * awd.x {
        return false;
    }
    let f = dir.x * diff.y - dir.y * diff.x;
    if f.abs() > half_extents.x * awd.y + half_extents.y * awd.x {
        return false;
    }

    true
}
