//! Renderable faces split off the swept mesh grid.
//!
//! Each face owns its vertex, index and edge-adjacency buffers. Caps are
//! triangulated flat faces across the cross-section; sides are quad strips
//! over the grid with smoothed, wrap-stitched normals.

use crate::float_types::Real;
use crate::grid::MeshGrid;
use crate::indexer::triangulate_cap_rim;
use crate::params::{PathKind, ProfileKind, Stitching, VolumeParams};
use crate::path::Path;
use crate::profile::Profile;
use nalgebra::{Point3, Vector2, Vector3};

/// One vertex of a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexData {
    pub position: Point3<Real>,
    pub normal: Vector3<Real>,
    pub binormal: Vector3<Real>,
    pub tex_coord: Vector2<Real>,
}

impl Default for VertexData {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            normal: Vector3::zeros(),
            binormal: Vector3::zeros(),
            tex_coord: Vector2::zeros(),
        }
    }
}

/// Finds the binormal of a triangle from its texture coordinates; falls
/// back to +Y when the texture mapping is degenerate.
pub fn calc_binormal_from_triangle(
    pos0: &Point3<Real>,
    tex0: &Vector2<Real>,
    pos1: &Point3<Real>,
    tex1: &Vector2<Real>,
    pos2: &Point3<Real>,
    tex2: &Vector2<Real>,
) -> Vector3<Real> {
    let r = |a: Real, b: Real, c: Real, ta: &Vector2<Real>, tb: &Vector2<Real>, tc: &Vector2<Real>| {
        let v0 = Vector3::new(a, ta.x, ta.y);
        let v1 = Vector3::new(b, tb.x, tb.y);
        let v2 = Vector3::new(c, tc.x, tc.y);
        (v0 - v1).cross(&(v0 - v2))
    };

    let r0 = r(pos0.x, pos1.x, pos2.x, tex0, tex1, tex2);
    let r1 = r(pos0.y, pos1.y, pos2.y, tex0, tex1, tex2);
    let r2 = r(pos0.z, pos1.z, pos2.z, tex0, tex1, tex2);

    if r0.x != 0.0 && r1.x != 0.0 && r2.x != 0.0 {
        Vector3::new(-r0.z / r0.x, -r1.z / r1.x, -r2.z / r2.x)
    } else {
        Vector3::new(0.0, 1.0, 0.0)
    }
}

/// Bilinear interpolation across a planar quad spanned by `v0 -> v1` and
/// `v0 -> v2`; normal and binormal are copied from `v0`.
fn lerp_planar_vertex(
    v0: &VertexData,
    v1: &VertexData,
    v2: &VertexData,
    coef01: Real,
    coef02: Real,
) -> VertexData {
    VertexData {
        position: v0.position
            + (v1.position - v0.position) * coef01
            + (v2.position - v0.position) * coef02,
        tex_coord: v0.tex_coord
            + (v1.tex_coord - v0.tex_coord) * coef01
            + (v2.tex_coord - v0.tex_coord) * coef02,
        normal: v0.normal,
        binormal: v0.binormal,
    }
}

fn update_min_max(min: &mut Point3<Real>, max: &mut Point3<Real>, pos: &Point3<Real>) {
    for i in 0..3 {
        if min[i] > pos[i] {
            min[i] = pos[i];
        }
        if max[i] < pos[i] {
            max[i] = pos[i];
        }
    }
}

fn update_min_max_uv(min: &mut Vector2<Real>, max: &mut Vector2<Real>, uv: &Vector2<Real>) {
    for i in 0..2 {
        if min[i] > uv[i] {
            min[i] = uv[i];
        }
        if max[i] < uv[i] {
            max[i] = uv[i];
        }
    }
}

/// Borrowed generation state a face is built from.
pub struct FaceBuildContext<'a> {
    pub mesh: &'a MeshGrid,
    pub profile: &'a Profile,
    pub path: &'a Path,
    pub params: &'a VolumeParams,
}

/// One renderable face of a volume.
#[derive(Debug, Clone, Default)]
pub struct VolumeFace {
    /// Index of this face within its volume.
    pub id: usize,
    /// Combination of the `VolumeFace` mask constants.
    pub type_mask: u16,
    pub begin_s: usize,
    pub begin_t: usize,
    pub num_s: usize,
    pub num_t: usize,
    pub vertices: Vec<VertexData>,
    pub indices: Vec<u32>,
    /// Per triangle edge, the index of the neighboring triangle within
    /// this face, or -1 on a boundary.
    pub edge: Vec<i32>,
    /// Axis-aligned bounds of the face, `[min, max]`.
    pub extents: [Point3<Real>; 2],
    pub center: Point3<Real>,
    has_binormals: bool,
}

impl VolumeFace {
    pub const SINGLE_MASK: u16 = 0x0001;
    pub const CAP_MASK: u16 = 0x0002;
    pub const END_MASK: u16 = 0x0004;
    pub const SIDE_MASK: u16 = 0x0008;
    pub const TOP_MASK: u16 = 0x0010;
    pub const BOTTOM_MASK: u16 = 0x0020;
    pub const OPEN_MASK: u16 = 0x0040;
    pub const FLAT_MASK: u16 = 0x0080;
    pub const INNER_MASK: u16 = 0x0100;
    pub const OUTER_MASK: u16 = 0x0200;
    pub const HOLLOW_MASK: u16 = 0x0400;

    pub const fn is_cap(&self) -> bool {
        self.type_mask & Self::CAP_MASK != 0
    }

    pub const fn is_flat(&self) -> bool {
        self.type_mask & Self::FLAT_MASK != 0
    }

    pub const fn has_binormals(&self) -> bool {
        self.has_binormals
    }

    /// (Re)builds the face's buffers. A partial build refreshes vertex
    /// positions only, keeping the previous triangulation.
    pub fn build(&mut self, ctx: &FaceBuildContext<'_>, partial_build: bool) -> bool {
        if self.type_mask & Self::CAP_MASK != 0 {
            self.create_cap(ctx, partial_build)
        } else if self.type_mask & (Self::END_MASK | Self::SIDE_MASK) != 0 {
            self.create_side(ctx, partial_build)
        } else {
            log::error!("unknown face type mask {:#x}", self.type_mask);
            false
        }
    }

    /// Grid-subdivided cap for the uncut, solid, straight-path box. The
    /// interior vertices let lighting vary across what would otherwise be
    /// two large triangles.
    fn create_uncut_cube_cap(&mut self, ctx: &FaceBuildContext<'_>, partial_build: bool) -> bool {
        let mesh = ctx.mesh.points();
        let profile = ctx.profile.points();
        let max_s = ctx.profile.total();
        let max_t = ctx.path.len();

        let grid_size = (profile.len() - 1) / 4;

        let offset = if self.type_mask & Self::TOP_MASK != 0 {
            (max_t - 1) * max_s
        } else {
            self.begin_s
        };

        let mut corners = [VertexData::default(); 4];
        for (t, corner) in corners.iter_mut().enumerate() {
            corner.position = mesh[offset + grid_size * t];
            corner.tex_coord = Vector2::new(
                profile[grid_size * t].x + 0.5,
                0.5 - profile[grid_size * t].y,
            );
        }

        let mut base_normal = (corners[1].position - corners[0].position)
            .cross(&(corners[2].position - corners[1].position));
        base_normal.normalize_mut();
        if self.type_mask & Self::TOP_MASK == 0 {
            base_normal = -base_normal;
        } else {
            // Swap the UVs on the U axis for the top face.
            let swap = corners[0].tex_coord;
            corners[0].tex_coord = corners[3].tex_coord;
            corners[3].tex_coord = swap;
            let swap = corners[1].tex_coord;
            corners[1].tex_coord = corners[2].tex_coord;
            corners[2].tex_coord = swap;
        }
        let base_binormal = calc_binormal_from_triangle(
            &corners[0].position,
            &corners[0].tex_coord,
            &corners[1].position,
            &corners[1].tex_coord,
            &corners[2].position,
            &corners[2].tex_coord,
        );
        for corner in &mut corners {
            corner.binormal = base_binormal;
            corner.normal = base_normal;
        }
        self.has_binormals = true;

        if partial_build {
            self.vertices.clear();
        }

        let vtop = self.vertices.len() as u32;
        let mut min = Point3::origin();
        let mut max = Point3::origin();
        for gx in 0..grid_size + 1 {
            for gy in 0..grid_size + 1 {
                let new_vert = lerp_planar_vertex(
                    &corners[0],
                    &corners[1],
                    &corners[3],
                    gx as Real / grid_size as Real,
                    gy as Real / grid_size as Real,
                );

                if gx == 0 && gy == 0 {
                    min = new_vert.position;
                    max = new_vert.position;
                } else {
                    update_min_max(&mut min, &mut max, &new_vert.position);
                }
                self.vertices.push(new_vert);
            }
        }

        self.extents = [min, max];
        self.center = nalgebra::center(&min, &max);

        if !partial_build {
            let row = (grid_size + 1) as u32;
            let idxs = [0, 1, row + 1, row + 1, row, 0];
            for gx in 0..grid_size as u32 {
                for gy in 0..grid_size as u32 {
                    let base = vtop + gy * row + gx;
                    if self.type_mask & Self::TOP_MASK != 0 {
                        for idx in idxs.iter().rev() {
                            self.indices.push(base + idx);
                        }
                    } else {
                        for idx in &idxs {
                            self.indices.push(base + idx);
                        }
                    }
                }
            }
        }

        true
    }

    /// Builds a cap across the cross-section at one end of the path.
    fn create_cap(&mut self, ctx: &FaceBuildContext<'_>, partial_build: bool) -> bool {
        let params = ctx.params;
        if self.type_mask & Self::HOLLOW_MASK == 0
            && self.type_mask & Self::OPEN_MASK == 0
            && params.path().begin() == 0.0
            && params.path().end() == 1.0
            && params.profile().curve() == ProfileKind::Square
            && params.path().curve() == PathKind::Line
        {
            return self.create_uncut_cube_cap(ctx, partial_build);
        }

        let mesh = ctx.mesh.points();
        let profile = ctx.profile.points();

        // All types of caps have the same number of vertices and indices.
        let mut num_vertices = profile.len();
        self.vertices.clear();
        self.vertices.resize(num_vertices, VertexData::default());

        let max_s = ctx.profile.total();
        let max_t = ctx.path.len();

        let offset = if self.type_mask & Self::TOP_MASK != 0 {
            (max_t - 1) * max_s
        } else {
            self.begin_s
        };

        let mut min = Point3::origin();
        let mut max = Point3::origin();
        let mut min_uv = Vector2::zeros();
        let mut max_uv = Vector2::zeros();

        for i in 0..num_vertices {
            let uv = if self.type_mask & Self::TOP_MASK != 0 {
                Vector2::new(profile[i].x + 0.5, profile[i].y + 0.5)
            } else {
                // Mirror for the underside.
                Vector2::new(profile[i].x + 0.5, 0.5 - profile[i].y)
            };

            let pos = mesh[i + offset];
            self.vertices[i].tex_coord = uv;
            self.vertices[i].position = pos;

            if i == 0 {
                min = pos;
                max = pos;
                min_uv = uv;
                max_uv = uv;
            } else {
                update_min_max(&mut min, &mut max, &pos);
                update_min_max_uv(&mut min_uv, &mut max_uv, &uv);
            }
        }

        self.extents = [min, max];
        self.center = nalgebra::center(&min, &max);
        let cuv = (min_uv + max_uv) * 0.5;

        // Caps are flat faces; one normal and binormal for everything.
        let mut binormal = calc_binormal_from_triangle(
            &self.center,
            &cuv,
            &self.vertices[0].position,
            &self.vertices[0].tex_coord,
            &self.vertices[1].position,
            &self.vertices[1].tex_coord,
        );
        binormal.normalize_mut();

        let d0 = self.center - self.vertices[0].position;
        let d1 = self.center - self.vertices[1].position;
        let mut normal = if self.type_mask & Self::TOP_MASK != 0 {
            d0.cross(&d1)
        } else {
            d1.cross(&d0)
        };
        normal.normalize_mut();

        if self.type_mask & Self::HOLLOW_MASK == 0 && self.type_mask & Self::OPEN_MASK == 0 {
            // Solid closed caps get a center vertex to fan around.
            self.vertices.push(VertexData {
                position: self.center,
                normal,
                binormal,
                tex_coord: cuv,
            });
            num_vertices += 1;
        }

        for vertex in &mut self.vertices {
            vertex.binormal = binormal;
            vertex.normal = normal;
        }

        self.has_binormals = true;

        if partial_build {
            return true;
        }

        self.indices.clear();

        if self.type_mask & Self::HOLLOW_MASK != 0 {
            // A hollow cap is a ring; triangulate it with the same
            // two-pointer walk the whole-volume indexer uses.
            let top = self.type_mask & Self::TOP_MASK != 0;
            triangulate_cap_rim(profile, num_vertices, 0, top, &mut self.indices);
        } else {
            // Not hollow, generate the triangle fan from the center point.
            let apex = (num_vertices - 1) as u32;
            if self.type_mask & Self::TOP_MASK != 0 {
                for i in 0..num_vertices as u32 - 2 {
                    self.indices.push(apex);
                    self.indices.push(i);
                    self.indices.push(i + 1);
                }
            } else {
                for i in 0..num_vertices as u32 - 2 {
                    self.indices.push(apex);
                    self.indices.push(i + 1);
                    self.indices.push(i);
                }
            }
        }

        true
    }

    /// Builds a side face: a quad strip over the face's window of the
    /// mesh grid, with smoothed normals and per-triangle edge adjacency.
    fn create_side(&mut self, ctx: &FaceBuildContext<'_>, partial_build: bool) -> bool {
        let flat = self.type_mask & Self::FLAT_MASK != 0;

        let sculpt_type = ctx.params.sculpt_type();
        let sculpt_stitching = sculpt_type.stitching();
        let sculpt_reverse_horizontal = sculpt_type.reverse_horizontal();

        let mesh = ctx.mesh.points();
        let profile = ctx.profile.points();
        let path_data = ctx.path.samples();

        let max_s = ctx.profile.total();

        let num_vertices = self.num_s * self.num_t;
        let num_indices = (self.num_s - 1) * (self.num_t - 1) * 6;

        self.vertices.clear();
        self.vertices.resize(num_vertices, VertexData::default());

        if !partial_build {
            self.indices.clear();
            self.indices.resize(num_indices, 0);
            self.edge.clear();
            self.edge.resize(num_indices, 0);
        } else {
            self.has_binormals = false;
        }

        let mut face_min = Point3::origin();
        let mut face_max = Point3::origin();

        let begin_stex = profile[self.begin_s].z.floor();
        let inner_flat = self.type_mask & Self::INNER_MASK != 0 && flat && self.num_s > 2;
        let num_s = if inner_flat { self.num_s / 2 } else { self.num_s };

        let mut cur_vertex = 0;
        for t in self.begin_t..self.begin_t + self.num_t {
            let tt = path_data[t].tex_t;
            for s in 0..num_s {
                let mut ss = if self.type_mask & Self::END_MASK != 0 {
                    if s != 0 { 1.0 } else { 0.0 }
                } else if !flat {
                    profile[self.begin_s + s].z
                } else {
                    profile[self.begin_s + s].z - begin_stex
                };

                if sculpt_reverse_horizontal {
                    ss = 1.0 - ss;
                }

                // Faces at the profile seam wrap back to the row start.
                let i = if self.begin_s + s >= max_s {
                    self.begin_s + s + max_s * t - max_s
                } else {
                    self.begin_s + s + max_s * t
                };

                let pos = mesh[i];
                self.vertices[cur_vertex].position = pos;
                self.vertices[cur_vertex].tex_coord = Vector2::new(ss, tt);

                if cur_vertex == 0 {
                    face_min = pos;
                    face_max = pos;
                } else {
                    update_min_max(&mut face_min, &mut face_max, &pos);
                }

                cur_vertex += 1;

                // Flat inner walls duplicate each vertex so every quad can
                // carry its own hard-edged texture seam.
                if inner_flat && s > 0 {
                    self.vertices[cur_vertex].position = pos;
                    self.vertices[cur_vertex].tex_coord = Vector2::new(ss, tt);
                    cur_vertex += 1;
                }
            }

            if inner_flat {
                let s = if self.type_mask & Self::OPEN_MASK != 0 {
                    num_s - 1
                } else {
                    0
                };

                let i = self.begin_s + s + max_s * t;
                let ss = profile[self.begin_s + s].z - begin_stex;
                let pos = mesh[i];
                self.vertices[cur_vertex].position = pos;
                self.vertices[cur_vertex].tex_coord = Vector2::new(ss, tt);

                update_min_max(&mut face_min, &mut face_max, &pos);

                cur_vertex += 1;
            }
        }

        self.extents = [face_min, face_max];
        self.center = nalgebra::center(&face_min, &face_max);

        if !partial_build {
            let flat_face = flat;
            let path_open = ctx.path.is_open();
            let profile_open = ctx.profile.is_open();
            let num_s = self.num_s;
            let num_t = self.num_t;

            let mut cur_index = 0;
            let mut cur_edge = 0;
            for t in 0..num_t - 1 {
                for s in 0..num_s - 1 {
                    self.indices[cur_index] = (s + num_s * t) as u32; // bottom left
                    self.indices[cur_index + 1] = (s + 1 + num_s * (t + 1)) as u32; // top right
                    self.indices[cur_index + 2] = (s + num_s * (t + 1)) as u32; // top left
                    self.indices[cur_index + 3] = (s + num_s * t) as u32; // bottom left
                    self.indices[cur_index + 4] = (s + 1 + num_s * t) as u32; // bottom right
                    self.indices[cur_index + 5] = (s + 1 + num_s * (t + 1)) as u32; // top right
                    cur_index += 6;

                    let row = ((num_s - 1) * 2) as i32;
                    let (s, t) = (s as i32, t as i32);

                    // bottom left / top right neighbor
                    self.edge[cur_edge] = row * t + s * 2 + 1;
                    // top right / top left neighbor
                    self.edge[cur_edge + 1] = if t < num_t as i32 - 2 {
                        row * (t + 1) + s * 2 + 1
                    } else if num_t <= 3 || path_open {
                        -1
                    } else {
                        // wrap on T
                        s * 2 + 1
                    };
                    // top left / bottom left neighbor
                    self.edge[cur_edge + 2] = if s > 0 {
                        row * t + s * 2 - 1
                    } else if flat_face || profile_open {
                        -1
                    } else {
                        // wrap on S
                        row * t + (num_s as i32 - 2) * 2 + 1
                    };
                    // bottom left / bottom right neighbor
                    self.edge[cur_edge + 3] = if t > 0 {
                        row * (t - 1) + s * 2
                    } else if num_t <= 3 || path_open {
                        -1
                    } else {
                        // wrap on T
                        row * (num_t as i32 - 2) + s * 2
                    };
                    // bottom right / top right neighbor
                    self.edge[cur_edge + 4] = if s < num_s as i32 - 2 {
                        row * t + (s + 1) * 2
                    } else if flat_face || profile_open {
                        -1
                    } else {
                        // wrap on S
                        row * t
                    };
                    // top right / bottom left neighbor
                    self.edge[cur_edge + 5] = row * t + s * 2;
                    cur_edge += 6;
                }
            }
        }

        // Accumulate smoothed normals from every triangle.
        for i in 0..self.indices.len() / 3 {
            let i0 = self.indices[i * 3] as usize;
            let i1 = self.indices[i * 3 + 1] as usize;
            let i2 = self.indices[i * 3 + 2] as usize;

            let v0 = self.vertices[i0].position;
            let v1 = self.vertices[i1].position;
            let v2 = self.vertices[i2].position;

            let norm = (v0 - v1).cross(&(v0 - v2));

            self.vertices[i0].normal += norm;
            self.vertices[i1].normal += norm;
            self.vertices[i2].normal += norm;

            // Even out quad contributions.
            if i & 1 == 0 {
                self.vertices[i2].normal += norm;
            } else {
                self.vertices[i1].normal += norm;
            }
        }

        // Adjust normals based on wrapping and stitching.
        let num_s = self.num_s;
        let num_t = self.num_t;
        // A two-row face compares a vertex against itself here, which
        // would falsely report a pole and leave the seam unsmoothed.
        let s_bottom_converges = num_t > 2
            && (self.vertices[0].position - self.vertices[num_s * (num_t - 2)].position)
                .norm_squared()
                < 0.000001;
        let s_top_converges = num_t > 2
            && (self.vertices[num_s - 1].position
                - self.vertices[num_s * (num_t - 2) + num_s - 1].position)
                .norm_squared()
                < 0.000001;

        if sculpt_stitching == Stitching::None {
            if !ctx.path.is_open() {
                // Wrap normals on T.
                for i in 0..num_s {
                    let norm = self.vertices[i].normal + self.vertices[num_s * (num_t - 1) + i].normal;
                    self.vertices[i].normal = norm;
                    self.vertices[num_s * (num_t - 1) + i].normal = norm;
                }
            }

            if !ctx.profile.is_open() && !s_bottom_converges {
                // Wrap normals on S.
                for i in 0..num_t {
                    let norm =
                        self.vertices[num_s * i].normal + self.vertices[num_s * i + num_s - 1].normal;
                    self.vertices[num_s * i].normal = norm;
                    self.vertices[num_s * i + num_s - 1].normal = norm;
                }
            }

            if ctx.params.path().curve() == PathKind::Circle
                && ctx.params.profile().curve() == ProfileKind::HalfCircle
            {
                // Sphere poles collapse to a point; pin their normals to
                // the axis.
                if s_bottom_converges {
                    for i in 0..num_t {
                        self.vertices[num_s * i].normal = Vector3::new(1.0, 0.0, 0.0);
                    }
                }

                if s_top_converges {
                    for i in 0..num_t {
                        self.vertices[num_s * i + num_s - 1].normal = Vector3::new(-1.0, 0.0, 0.0);
                    }
                }
            }
        } else {
            // Stitching for sculpt volumes.
            let average_poles = sculpt_stitching == Stitching::Sphere;
            let wrap_s = matches!(
                sculpt_stitching,
                Stitching::Sphere | Stitching::Torus | Stitching::Cylinder
            );
            let wrap_t = sculpt_stitching == Stitching::Torus;

            if average_poles {
                let mut average = Vector3::zeros();
                for i in 0..num_s {
                    average += self.vertices[i].normal;
                }
                for i in 0..num_s {
                    self.vertices[i].normal = average;
                }

                let mut average = Vector3::zeros();
                for i in 0..num_s {
                    average += self.vertices[i + num_s * (num_t - 1)].normal;
                }
                for i in 0..num_s {
                    self.vertices[i + num_s * (num_t - 1)].normal = average;
                }
            }

            if wrap_s {
                for i in 0..num_t {
                    let norm =
                        self.vertices[num_s * i].normal + self.vertices[num_s * i + num_s - 1].normal;
                    self.vertices[num_s * i].normal = norm;
                    self.vertices[num_s * i + num_s - 1].normal = norm;
                }
            }

            if wrap_t {
                for i in 0..num_s {
                    let norm = self.vertices[i].normal + self.vertices[num_s * (num_t - 1) + i].normal;
                    self.vertices[i].normal = norm;
                    self.vertices[num_s * (num_t - 1) + i].normal = norm;
                }
            }
        }

        true
    }

    /// Fills in binormals by accumulating per-triangle binormals, then
    /// normalizes both binormals and normals. Side faces defer this until
    /// a consumer asks.
    pub fn create_binormals(&mut self) {
        if self.has_binormals {
            return;
        }

        for i in 0..self.indices.len() / 3 {
            let i0 = self.indices[i * 3] as usize;
            let i1 = self.indices[i * 3 + 1] as usize;
            let i2 = self.indices[i * 3 + 2] as usize;

            let v0 = self.vertices[i0];
            let v1 = self.vertices[i1];
            let v2 = self.vertices[i2];

            let binorm = calc_binormal_from_triangle(
                &v0.position,
                &v0.tex_coord,
                &v1.position,
                &v1.tex_coord,
                &v2.position,
                &v2.tex_coord,
            );

            self.vertices[i0].binormal += binorm;
            self.vertices[i1].binormal += binorm;
            self.vertices[i2].binormal += binorm;

            // Even out quad contributions.
            if i % 2 == 0 {
                self.vertices[i2].binormal += binorm;
            } else {
                self.vertices[i1].binormal += binorm;
            }
        }

        for vertex in &mut self.vertices {
            vertex.binormal.normalize_mut();
            vertex.normal.normalize_mut();
        }

        self.has_binormals = true;
    }
}
