//! Whole-volume triangle index list and triangle-soup cleanup.
//!
//! Faces keep their own index buffers for rendering; the list built here
//! spans the entire swept mesh in one go, as collision and silhouette
//! consumers want it. Counter-clockwise triangles are forward facing.

use crate::errors::VolumeError;
use crate::float_types::{Real, VERTEX_SLOP, VERTEX_SLOP_SQRD};
use crate::path::Path;
use crate::profile::Profile;
use nalgebra::Point3;
use std::cmp::Ordering;

/// Hard cap on the whole-volume index list.
pub const MAX_VOLUME_TRIANGLE_INDICES: usize = 10000;

/// Triangulates one cap rim by walking a pointer in from each end of the
/// profile, choosing at each step the candidate triangle with correct
/// facing (by signed area) and, when both work, the shorter chord.
///
/// `offset` shifts the emitted indices to the cap's mesh row; `top` caps
/// wind opposite bottom ones.
pub(crate) fn triangulate_cap_rim(
    profile_points: &[Point3<Real>],
    size_s: usize,
    offset: usize,
    top: bool,
    out: &mut Vec<u32>,
) {
    let mut pt1 = 0usize;
    let mut pt2 = size_s - 1;

    while pt2 - pt1 > 1 {
        // Use the profile points instead of the mesh, since we want the
        // un-transformed profile distances.
        let p1 = profile_points[pt1].xy();
        let p2 = profile_points[pt2].xy();
        let pa = profile_points[pt1 + 1].xy();
        let pb = profile_points[pt2 - 1].xy();

        let area = |a: &nalgebra::Point2<Real>,
                    b: &nalgebra::Point2<Real>,
                    c: &nalgebra::Point2<Real>| {
            (a.x * b.y - b.x * a.y) + (b.x * c.y - c.x * b.y) + (c.x * a.y - a.x * c.y)
        };

        // Signed area determines backfacing.
        let area_1a2 = area(&p1, &pa, &p2);
        let area_1ba = area(&p1, &pb, &pa);
        let area_21b = area(&p2, &p1, &pb);
        let area_2ab = area(&p2, &pa, &pb);

        // area_2ab < 0 means triangle 1a2 would contain point b, and
        // area_1ba < 0 likewise poisons 21b.
        let tri_1a2 = area_1a2 >= 0.0 && area_2ab >= 0.0;
        let tri_21b = area_21b >= 0.0 && area_1ba >= 0.0;

        let use_tri1a2 = if !tri_1a2 {
            false
        } else if !tri_21b {
            true
        } else {
            let d1 = p1 - pa;
            let d2 = p2 - pb;
            d1.norm_squared() < d2.norm_squared()
        };

        if use_tri1a2 {
            if top {
                out.push((pt1 + offset) as u32);
                out.push((pt1 + 1 + offset) as u32);
                out.push((pt2 + offset) as u32);
            } else {
                out.push((pt1 + offset) as u32);
                out.push((pt2 + offset) as u32);
                out.push((pt1 + 1 + offset) as u32);
            }
            pt1 += 1;
        } else {
            if top {
                out.push((pt1 + offset) as u32);
                out.push((pt2 - 1 + offset) as u32);
                out.push((pt2 + offset) as u32);
            } else {
                out.push((pt1 + offset) as u32);
                out.push((pt2 + offset) as u32);
                out.push((pt2 - 1 + offset) as u32);
            }
            pt2 -= 1;
        }
    }
}

/// Emits the two triangles of one side quad at profile column `s`, path
/// row `t`.
fn push_quad(out: &mut Vec<u32>, s: usize, t: usize, size_s: usize) {
    let i = (s + t * size_s) as u32;
    let size_s = size_s as u32;

    out.push(i); // x, y
    out.push(i + 1); // x+1, y
    out.push(i + size_s); // x, y+1

    out.push(i + size_s); // x, y+1
    out.push(i + 1); // x+1, y
    out.push(i + size_s + 1); // x+1, y+1
}

/// Predicts the length of [`triangle_indices`]' output for the current
/// tessellation without building it.
pub fn num_triangle_indices(profile: &Profile, path: &Path) -> usize {
    let profile_open = profile.is_open();
    let hollow = profile.is_hollow();
    let path_open = path.is_open();

    let size_s = profile.total();
    let size_s_out = profile.total_out();
    let size_t = path.len();

    let mut count = if profile_open {
        // The cut adds one stitching quad per row.
        (size_t - 1) * ((size_s - 1) * 6 + 6)
    } else if hollow {
        // Outer plus inner wall.
        (size_t - 1) * (size_s_out - 1) * 6 + (size_t - 1) * ((size_s - 1) - size_s_out) * 6
    } else {
        (size_t - 1) * (size_s - 1) * 6
    };

    if path_open {
        let cap_triangle_count = if profile_open || hollow {
            size_s as isize - 2
        } else {
            size_s as isize - 3
        };
        if cap_triangle_count > 0 {
            // Top and bottom caps.
            count += cap_triangle_count as usize * 2 * 3;
        }
    }
    count
}

/// Builds the whole-volume triangle index list into the swept mesh grid
/// (row-major, `s + t * size_s`).
pub fn triangle_indices(profile: &Profile, path: &Path) -> Result<Vec<u32>, VolumeError> {
    let expected = num_triangle_indices(profile, path);
    if expected > MAX_VOLUME_TRIANGLE_INDICES {
        log::warn!("couldn't allocate triangle indices");
        return Err(VolumeError::TooManyTriangleIndices { required: expected });
    }

    let open = profile.is_open();
    let hollow = profile.is_hollow();
    let path_open = path.is_open();

    let size_s = profile.total();
    let size_s_out = profile.total_out();
    let size_t = path.len();

    let mut index = Vec::with_capacity(expected);

    if open {
        if hollow {
            // Open hollow: much like the closed solid, except we need to
            // stitch up the gap between s=0 and s=size_s-1.
            for t in 0..size_t - 1 {
                // The outer face, first cut, and inner face.
                for s in 0..size_s - 1 {
                    push_quad(&mut index, s, t, size_s);
                }

                // The other cut face.
                let s = size_s - 1;
                index.push((s + t * size_s) as u32);
                index.push((t * size_s) as u32);
                index.push((s + (t + 1) * size_s) as u32);

                index.push((s + (t + 1) * size_s) as u32);
                index.push((t * size_s) as u32);
                index.push(((t + 1) * size_s) as u32);
            }

            if path_open {
                let top_offset = (size_t - 1) * size_s;
                triangulate_cap_rim(profile.points(), size_s, top_offset, true, &mut index);
                triangulate_cap_rim(profile.points(), size_s, 0, false, &mut index);
            }
        } else {
            // Open solid.
            for t in 0..size_t - 1 {
                // Outer face plus one cut face.
                for s in 0..size_s - 1 {
                    push_quad(&mut index, s, t, size_s);
                }

                // The other cut face.
                index.push((size_s - 1 + t * size_s) as u32);
                index.push((t * size_s) as u32);
                index.push((size_s - 1 + (t + 1) * size_s) as u32);

                index.push((size_s - 1 + (t + 1) * size_s) as u32);
                index.push((t * size_s) as u32);
                index.push(((t + 1) * size_s) as u32);
            }

            if path_open {
                // Bottom cap fans around the center point at size_s-1.
                for s in 0..size_s - 2 {
                    index.push((s + 1) as u32);
                    index.push(s as u32);
                    index.push((size_s - 1) as u32);
                }

                // Top cap, inverted ordering from the bottom.
                let offset = (size_t - 1) * size_s;
                for s in 0..size_s - 2 {
                    index.push((offset + size_s - 1) as u32);
                    index.push((offset + s) as u32);
                    index.push((offset + s + 1) as u32);
                }
            }
        }
    } else if hollow {
        // Closed hollow: outer face...
        for t in 0..size_t - 1 {
            for s in 0..size_s_out - 1 {
                push_quad(&mut index, s, t, size_s);
            }
        }

        // ...then the inner face, whose reversed profile points invert
        // its facing.
        for t in 0..size_t - 1 {
            for s in size_s_out..size_s - 1 {
                push_quad(&mut index, s, t, size_s);
            }
        }

        if path_open {
            let top_offset = (size_t - 1) * size_s;
            triangulate_cap_rim(profile.points(), size_s, top_offset, true, &mut index);
            triangulate_cap_rim(profile.points(), size_s, 0, false, &mut index);
        }
    } else {
        // Closed solid. Easy case.
        for t in 0..size_t - 1 {
            for s in 0..size_s - 1 {
                push_quad(&mut index, s, t, size_s);
            }
        }

        if path_open {
            // Bottom cap fans around vertex 0.
            for s in 1..size_s - 2 {
                index.push((s + 1) as u32);
                index.push(s as u32);
                index.push(0);
            }

            // Top cap, inverted ordering from the bottom.
            let offset = ((size_t - 1) * size_s) as u32;
            for s in 1..size_s - 2 {
                index.push(offset);
                index.push(offset + s as u32);
                index.push(offset + s as u32 + 1);
            }
        }
    }

    if index.len() != expected {
        return Err(VolumeError::IndexCountMismatch {
            expected,
            actual: index.len(),
        });
    }

    Ok(index)
}

/// Lexicographic vertex order with a slop band per axis, so that
/// nearly-coincident vertices sort adjacently.
fn slop_compare(a: &Point3<Real>, b: &Point3<Real>) -> Ordering {
    for i in 0..3 {
        if a[i] + VERTEX_SLOP < b[i] {
            return Ordering::Less;
        }
        if a[i] - VERTEX_SLOP > b[i] {
            return Ordering::Greater;
        }
    }
    Ordering::Equal
}

/// Welds nearly-coincident vertices, drops degenerate triangles, rotates
/// each remaining triangle so its smallest index leads (preserving
/// winding) and removes exact duplicate triangles.
pub fn cleanup_triangle_data(
    vertices: &[Point3<Real>],
    triangles: &[[u32; 3]],
) -> Result<(Vec<Point3<Real>>, Vec<[u32; 3]>), VolumeError> {
    // Stable sort keeps equal-within-slop vertices in input order, so the
    // weld target is the first of each cluster to appear.
    let mut order: Vec<usize> = (0..vertices.len()).collect();
    order.sort_by(|&a, &b| slop_compare(&vertices[a], &vertices[b]));

    let mut mapping = vec![0u32; vertices.len()];
    let mut welded: Vec<Point3<Real>> = Vec::with_capacity(vertices.len());
    for &orig in &order {
        let v = vertices[orig];
        let keep = match welded.last() {
            None => true,
            Some(prev) => (v - prev).norm_squared() >= VERTEX_SLOP_SQRD,
        };
        if keep {
            welded.push(v);
        }
        mapping[orig] = (welded.len() - 1) as u32;
    }

    let mut out_tris: Vec<[u32; 3]> = Vec::with_capacity(triangles.len());
    for tri in triangles {
        let v1 = mapping[tri[0] as usize];
        let v2 = mapping[tri[1] as usize];
        let v3 = mapping[tri[2] as usize];

        if v1 == v2 || v1 == v3 || v2 == v3 {
            // Degenerate triangle, skip.
            continue;
        }

        // Cyclic rotation only, so winding survives.
        let rotated = if v1 < v2 {
            if v1 < v3 {
                [v1, v2, v3]
            } else {
                [v3, v1, v2]
            }
        } else if v2 < v3 {
            [v2, v3, v1]
        } else {
            [v3, v1, v2]
        };
        out_tris.push(rotated);
    }

    if out_tris.is_empty() {
        log::warn!("created volume object with 0 faces");
        return Err(VolumeError::NoTrianglesAfterCleanup);
    }

    out_tris.sort_unstable();
    out_tris.dedup();

    Ok((welded, out_tris))
}
