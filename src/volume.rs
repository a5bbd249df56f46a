//! The volume aggregate: parameters in, swept mesh grid and renderable
//! faces out.

use crate::errors::VolumeError;
use crate::face::{FaceBuildContext, VertexData, VolumeFace};
use crate::float_types::{Real, PI, TAU};
use crate::grid::MeshGrid;
use crate::indexer;
use crate::intersect::{segment_box_intersect, triangle_ray_intersect};
use crate::params::{PathKind, ProfileKind, Stitching, VolumeParams};
use crate::path::Path;
use crate::profile::{self, Profile};
use nalgebra::{Point3, Vector2, Vector3};

/// A sculpt map with less surface variation than this is considered blank
/// and replaced by the placeholder shape.
pub const SCULPT_MIN_AREA: Real = 0.002;

// Mesh resolutions for the four sculpt LOD steps.
const SCULPT_REZ_1: usize = 6;
const SCULPT_REZ_2: usize = 8;
const SCULPT_REZ_3: usize = 16;
const SCULPT_REZ_4: usize = 32;

fn sculpt_sides(detail: Real) -> usize {
    // Detail is usually one of 1, 1.5, 2.5, 4.0.
    if detail <= 1.0 {
        SCULPT_REZ_1
    } else if detail <= 2.0 {
        SCULPT_REZ_2
    } else if detail <= 3.0 {
        SCULPT_REZ_3
    } else {
        SCULPT_REZ_4
    }
}

/// Picks the mesh resolution for a sculpt: the aspect ratio tracks the
/// map's ratio as closely as possible while spending all the vertices the
/// LOD and the map allow.
fn sculpt_calc_mesh_resolution(width: u16, height: u16, detail: Real) -> (usize, usize) {
    let max_vertices_lod = sculpt_sides(detail).pow(2);
    let max_vertices_map = width as usize * height as usize / 4;

    let vertices = if max_vertices_map > 0 {
        max_vertices_lod.min(max_vertices_map)
    } else {
        max_vertices_lod
    };

    let ratio = if width == 0 || height == 0 {
        1.0
    } else {
        width as Real / height as Real
    };

    let mut s = (vertices as Real / ratio).sqrt() as usize;
    s = s.max(4); // no degenerate sizes, please
    let mut t = vertices / s;
    t = t.max(4);
    s = vertices / t;
    (s, t)
}

/// Maps sculpt texel channels [0..255] to coordinates [-0.5..0.5].
fn sculpt_rgb_to_vector(r: u8, g: u8, b: u8) -> Vector3<Real> {
    Vector3::new(
        r as Real / 255.0 - 0.5,
        g as Real / 255.0 - 0.5,
        b as Real / 255.0 - 0.5,
    )
}

fn sculpt_xy_to_vector(
    x: u32,
    y: u32,
    width: u16,
    components: u8,
    data: &[u8],
) -> Vector3<Real> {
    let index = (x as usize + y as usize * width as usize) * components as usize;
    sculpt_rgb_to_vector(data[index], data[index + 1], data[index + 2])
}

/// Result of a [`Volume::line_segment_intersect`] query.
#[derive(Debug, Clone, Copy)]
pub struct LineHit {
    /// Face the segment hit.
    pub face: usize,
    /// Parametric distance along the segment, in [0, 1].
    pub t: Real,
    pub position: Point3<Real>,
    pub tex_coord: Vector2<Real>,
    pub normal: Vector3<Real>,
    pub binormal: Vector3<Real>,
}

/// A generated volume: the profile/path tessellation, the swept mesh grid
/// and the per-face buffers derived from it.
#[derive(Debug, Clone)]
pub struct Volume {
    params: VolumeParams,
    detail: Real,
    profile: Profile,
    path: Path,
    mesh: MeshGrid,
    faces: Vec<VolumeFace>,
    face_mask: u16,
    sculpt_level: i32,
}

impl Volume {
    /// Generates a volume at the given level of detail. Sculpted volumes
    /// get their faces once [`Volume::sculpt`] supplies map data.
    pub fn new(params: VolumeParams, detail: Real) -> Result<Self, VolumeError> {
        let dynamic = params.path().curve() == PathKind::Flexible;
        let mut volume = Self {
            params,
            detail,
            profile: Profile::new(),
            path: Path::new(dynamic),
            mesh: MeshGrid::default(),
            faces: Vec::new(),
            face_mask: 0,
            sculpt_level: -2,
        };

        volume.generate()?;
        if !volume.params.is_sculpted() {
            volume.create_volume_faces();
        }
        Ok(volume)
    }

    pub const fn params(&self) -> &VolumeParams {
        &self.params
    }

    pub const fn detail(&self) -> Real {
        self.detail
    }

    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// Mutable sweep access for externally animated (flexible) paths.
    pub fn path_mut(&mut self) -> &mut Path {
        &mut self.path
    }

    pub const fn mesh(&self) -> &MeshGrid {
        &self.mesh
    }

    pub fn faces(&self) -> &[VolumeFace] {
        &self.faces
    }

    pub fn face(&self, i: usize) -> &VolumeFace {
        &self.faces[i]
    }

    pub fn num_faces(&self) -> usize {
        self.profile.faces().len()
    }

    /// Union of the `profile::FACE_*` bits present on this volume.
    pub const fn face_mask(&self) -> u16 {
        self.face_mask
    }

    /// LOD the current sculpt data was decoded at; -1 for placeholder
    /// geometry, -2 before any sculpt data arrives.
    pub const fn sculpt_level(&self) -> i32 {
        self.sculpt_level
    }

    pub fn is_cap(&self, face: usize) -> bool {
        self.profile.faces()[face].cap
    }

    pub fn is_flat(&self, face: usize) -> bool {
        self.profile.faces()[face].flat
    }

    pub fn is_unique(&self) -> bool {
        self.path.is_dynamic()
    }

    /// Regenerates the tessellation and the mesh grid. `Ok(true)` when
    /// geometry actually changed.
    pub fn generate(&mut self) -> Result<bool, VolumeError> {
        // Split tessellates profile edges so triangles stretched by
        // twisting or path scaling don't show lighting seams.
        let mut split = (self.detail * 0.66) as usize;

        let path_params = *self.params.path();
        let profile_params = *self.params.profile();

        if path_params.curve() == PathKind::Line
            && (path_params.scale_x() != 1.0 || path_params.scale_y() != 1.0)
            && (profile_params.curve() == ProfileKind::Square
                || profile_params.curve().is_triangle())
        {
            split = 0;
        }

        let regen_path = self.path.generate(&path_params, self.detail, split, false, 0);
        let regen_prof = self.profile.generate(
            &profile_params,
            self.path.is_open(),
            self.detail,
            split,
            false,
            0,
        );

        if !(regen_path || regen_prof) {
            return Ok(false);
        }

        self.sweep_mesh()?;

        for face in self.profile.faces() {
            self.face_mask |= face.face_id;
        }

        Ok(true)
    }

    /// Runs along the path, sweeping the scaled profile through each
    /// sample's frame.
    fn sweep_mesh(&mut self) -> Result<(), VolumeError> {
        let size_s = self.path.len();
        let size_t = self.profile.total();
        self.mesh.resize(size_s, size_t)?;

        for s in 0..size_s {
            let sample = self.path.samples()[s];
            for t in 0..size_t {
                let p = self.profile.points()[t];
                let local = Vector3::new(p.x * sample.scale.x, p.y * sample.scale.y, 0.0);
                *self.mesh.point_mut(s, t) = sample.pos + sample.rot * local;
            }
        }

        Ok(())
    }

    /// Marks the tessellation dirty and rebuilds everything.
    pub fn regenerate(&mut self) -> Result<(), VolumeError> {
        self.path.mark_dirty();
        self.profile.mark_dirty();
        self.generate()?;
        self.create_volume_faces();
        Ok(())
    }

    /// Resizes a flexible path's sample list; faces must be rebuilt after
    /// the animator fills the samples in.
    pub fn resize_path(&mut self, length: usize) {
        self.path.resize(length);
        self.faces.clear();
    }

    /// Builds (or refreshes) the per-face buffers from the current mesh
    /// grid. When the face list shape is unchanged, only vertex data is
    /// rebuilt and existing triangulations are kept.
    pub fn create_volume_faces(&mut self) {
        // Dynamic paths are refilled by an animator between builds; the
        // mesh grid has to follow the current samples. Sculpted grids are
        // filled from the map instead, bent through the samples already.
        if self.path.is_dynamic() && !self.params.is_sculpted() {
            if let Err(err) = self.sweep_mesh() {
                log::error!("flexible mesh rebuild failed: {err}");
                self.faces.clear();
                return;
            }
        }

        let num_faces = self.num_faces();
        let partial_build = num_faces == self.faces.len();
        if !partial_build {
            self.faces = vec![VolumeFace::default(); num_faces];
        }

        // Initialize the faces with tessellation data.
        for (i, pf) in self.profile.faces().iter().enumerate() {
            let vf = &mut self.faces[i];
            vf.begin_s = pf.index;
            vf.num_s = pf.count;
            vf.begin_t = 0;
            vf.num_t = self.path.len();
            vf.id = i;

            let mut mask = 0u16;
            if self.params.profile().hollow() > 0.0 {
                mask |= VolumeFace::HOLLOW_MASK;
            }
            if self.profile.is_open() {
                mask |= VolumeFace::OPEN_MASK;
            }
            if pf.cap {
                mask |= VolumeFace::CAP_MASK;
                if pf.face_id == profile::FACE_PATH_BEGIN {
                    mask |= VolumeFace::TOP_MASK;
                } else {
                    mask |= VolumeFace::BOTTOM_MASK;
                }
            } else if pf.face_id & (profile::FACE_PROFILE_BEGIN | profile::FACE_PROFILE_END) != 0 {
                mask |= VolumeFace::FLAT_MASK | VolumeFace::END_MASK;
            } else {
                mask |= VolumeFace::SIDE_MASK;
                if pf.flat {
                    mask |= VolumeFace::FLAT_MASK;
                }
                if pf.face_id & profile::FACE_INNER_SIDE != 0 {
                    mask |= VolumeFace::INNER_MASK;
                    if pf.flat && vf.num_s > 2 {
                        // Flat inner faces duplicate their vertices.
                        vf.num_s *= 2;
                    }
                } else {
                    mask |= VolumeFace::OUTER_MASK;
                }
            }
            vf.type_mask = mask;
        }

        let mut faces = std::mem::take(&mut self.faces);
        let ctx = FaceBuildContext {
            mesh: &self.mesh,
            profile: &self.profile,
            path: &self.path,
            params: &self.params,
        };
        for face in &mut faces {
            face.build(&ctx, partial_build);
        }
        self.faces = faces;
    }

    /// Replaces the swept geometry with positions read from a sculpt map;
    /// takes the place of [`Volume::generate`] for sculpted volumes.
    ///
    /// Blank or unusable data produces the placeholder sphere and records
    /// a sculpt level of -1.
    pub fn sculpt(
        &mut self,
        sculpt_width: u16,
        sculpt_height: u16,
        sculpt_components: u8,
        sculpt_data: &[u8],
        sculpt_level: i32,
        is_flexible: bool,
    ) -> Result<(), VolumeError> {
        let mut sculpt_level = sculpt_level;
        let texel_bytes =
            sculpt_width as usize * sculpt_height as usize * sculpt_components as usize;
        let mut data_is_empty = false;

        if sculpt_width == 0
            || sculpt_height == 0
            || sculpt_components < 3
            || sculpt_data.len() < texel_bytes
        {
            sculpt_level = -1;
            data_is_empty = true;
        }

        // Oblong sculpt maps always mesh at the highest LOD.
        let mut sculpt_detail = self.detail;
        if sculpt_width != sculpt_height && sculpt_detail < 4.0 {
            sculpt_detail = 4.0;
        }

        let (requested_size_s, requested_size_t) =
            sculpt_calc_mesh_resolution(sculpt_width, sculpt_height, sculpt_detail);

        let path_params = *self.params.path();
        let profile_params = *self.params.profile();
        self.path
            .generate(&path_params, sculpt_detail, 0, true, requested_size_s);
        self.profile.generate(
            &profile_params,
            self.path.is_open(),
            sculpt_detail,
            0,
            true,
            requested_size_t,
        );

        // We requested a specific size; see what we really got.
        let size_s = self.path.len();
        let size_t = self.profile.total();

        if size_s == 0 || size_t == 0 {
            log::warn!("sculpt bad mesh size {size_s} {size_t}");
        }

        self.mesh.resize(size_s, size_t)?;

        if !data_is_empty {
            self.sculpt_generate_map_vertices(
                sculpt_width,
                sculpt_height,
                sculpt_components,
                sculpt_data,
                is_flexible,
            );

            if self.sculpt_surface_area() < SCULPT_MIN_AREA {
                data_is_empty = true;
            }
        }

        if data_is_empty {
            self.sculpt_generate_placeholder();
        }

        for face in self.profile.faces() {
            self.face_mask |= face.face_id;
        }

        self.sculpt_level = sculpt_level;

        // Drop any existing faces so they get rebuilt from scratch.
        self.faces.clear();
        self.create_volume_faces();
        Ok(())
    }

    /// Fills the mesh grid from sculpt map texels, applying stitching and
    /// the invert/mirror flags.
    fn sculpt_generate_map_vertices(
        &mut self,
        sculpt_width: u16,
        sculpt_height: u16,
        sculpt_components: u8,
        sculpt_data: &[u8],
        is_flexible: bool,
    ) {
        let sculpt_type = self.params.sculpt_type();
        let stitching = sculpt_type.stitching();
        let mirror = sculpt_type.mirror();
        let reverse_horizontal = sculpt_type.reverse_horizontal();

        let size_s = self.path.len();
        let size_t = self.profile.total();

        for s in 0..size_s {
            // Run along the profile.
            for t in 0..size_t {
                let reversed_t = if reverse_horizontal { size_t - t - 1 } else { t };

                let mut x =
                    (reversed_t as Real / (size_t - 1) as Real * sculpt_width as Real) as u32;
                let mut y = (s as Real / (size_s - 1) as Real * sculpt_height as Real) as u32;

                // Top row stitching: spheres pinch to a pole.
                if y == 0 && stitching == Stitching::Sphere {
                    x = sculpt_width as u32 / 2;
                }

                // Bottom row stitching.
                if y == sculpt_height as u32 {
                    y = if stitching == Stitching::Torus {
                        0
                    } else {
                        sculpt_height as u32 - 1
                    };
                    if stitching == Stitching::Sphere {
                        x = sculpt_width as u32 / 2;
                    }
                }

                // Side stitching.
                if x == sculpt_width as u32 {
                    x = if matches!(
                        stitching,
                        Stitching::Sphere | Stitching::Torus | Stitching::Cylinder
                    ) {
                        0
                    } else {
                        sculpt_width as u32 - 1
                    };
                }

                let mut pos: Point3<Real> =
                    sculpt_xy_to_vector(x, y, sculpt_width, sculpt_components, sculpt_data).into();

                if mirror {
                    pos.x = -pos.x;
                }

                if is_flexible {
                    // Bend the sculpt along the animated path. The texel's
                    // height selects the path sample.
                    let path_dist = pos.z + 0.5; // in [0, 1]
                    let samples = self.path.samples();

                    let p1 = ((size_s - 1) as Real * path_dist) as usize;
                    let (rotation, position) = if p1 >= size_s - 1 {
                        (samples[size_s - 1].rot, samples[size_s - 1].pos)
                    } else {
                        let p2 = p1 + 1;
                        let remainder = path_dist * (size_s - 1) as Real - p1 as Real;
                        (
                            samples[p1].rot.nlerp(&samples[p2].rot, remainder),
                            samples[p1].pos + (samples[p2].pos - samples[p1].pos) * remainder,
                        )
                    };

                    // Scale doesn't vary; sculpts ignore taper.
                    let scale = samples[0].scale;

                    let local = Vector3::new(pos.x * scale.x, pos.y * scale.y, 0.0);
                    pos = position + rotation * local;
                }

                *self.mesh.point_mut(s, t) = pos;
            }
        }
    }

    /// Sums the quad areas of the current mesh grid; used to detect sculpt
    /// maps without enough variation to make real geometry.
    fn sculpt_surface_area(&self) -> Real {
        let size_s = self.path.len();
        let size_t = self.profile.total();

        let mut area = 0.0;
        for s in 0..size_s - 1 {
            for t in 0..size_t - 1 {
                let p1 = self.mesh.point(s, t);
                let p2 = self.mesh.point(s + 1, t);
                let p3 = self.mesh.point(s, t + 1);
                let p4 = self.mesh.point(s + 1, t + 1);

                let cross1 = (p1 - p2).cross(&(p1 - p3));
                let cross2 = (p4 - p2).cross(&(p4 - p3));
                area += (cross1.norm() + cross2.norm()) / 2.0;
            }
        }
        area
    }

    /// Fills the mesh grid with a small sphere, shown while real sculpt
    /// data is missing or blank.
    fn sculpt_generate_placeholder(&mut self) {
        const RADIUS: Real = 0.3;

        let size_s = self.path.len();
        let size_t = self.profile.total();

        for s in 0..size_s {
            for t in 0..size_t {
                let u = s as Real / (size_s - 1) as Real;
                let v = t as Real / (size_t - 1) as Real;

                *self.mesh.point_mut(s, t) = Point3::new(
                    (PI * v).sin() * (TAU * u).cos() * RADIUS,
                    (PI * v).sin() * (TAU * u).sin() * RADIUS,
                    (PI * v).cos() * RADIUS,
                );
            }
        }
    }

    /// Length of [`Volume::triangle_indices`]' output for the current
    /// tessellation.
    pub fn num_triangle_indices(&self) -> usize {
        indexer::num_triangle_indices(&self.profile, &self.path)
    }

    /// Whole-volume triangle index list over the mesh grid.
    pub fn triangle_indices(&self) -> Result<Vec<u32>, VolumeError> {
        indexer::triangle_indices(&self.profile, &self.path)
    }

    /// Generates binormals for one face if it doesn't have them yet.
    pub fn gen_binormals(&mut self, face: usize) {
        self.faces[face].create_binormals();
    }

    /// Finds the closest intersection of the segment `start..end` with the
    /// volume's faces (or just `face` when given). Faces are one-sided.
    pub fn line_segment_intersect(
        &mut self,
        start: &Point3<Real>,
        end: &Point3<Real>,
        face: Option<usize>,
    ) -> Option<LineHit> {
        let (start_face, end_face) = match face {
            Some(f) => (f, f),
            None => (0, self.faces.len().checked_sub(1)?),
        };

        let dir = end - start;

        let mut closest_t = 2.0; // must be larger than 1
        let mut hit = None;

        for i in start_face..=end_face {
            let extents = self.faces[i].extents;
            let box_center = nalgebra::center(&extents[0], &extents[1]);
            let box_half = (extents[1] - extents[0]) * 0.5;

            if !segment_box_intersect(start, end, &box_center, &box_half) {
                continue;
            }

            // Interpolated binormals come back with the hit, so the face
            // needs them now.
            self.faces[i].create_binormals();
            let face = &self.faces[i];

            for tri in face.indices.chunks_exact(3) {
                let v1 = &face.vertices[tri[0] as usize];
                let v2 = &face.vertices[tri[1] as usize];
                let v3 = &face.vertices[tri[2] as usize];

                if let Some((a, b, t)) = triangle_ray_intersect(
                    &v1.position,
                    &v2.position,
                    &v3.position,
                    start,
                    &dir,
                    false,
                ) {
                    // Hit must lie within the segment and beat the best.
                    if (0.0..=1.0).contains(&t) && t < closest_t {
                        closest_t = t;

                        let w = 1.0 - a - b;
                        let bary = |f: fn(&VertexData) -> Vector3<Real>| {
                            f(v1) * w + f(v2) * a + f(v3) * b
                        };
                        hit = Some(LineHit {
                            face: i,
                            t,
                            position: start + dir * t,
                            tex_coord: v1.tex_coord * w + v2.tex_coord * a + v3.tex_coord * b,
                            normal: bary(|v| v.normal),
                            binormal: bary(|v| v.binormal),
                        });
                    }
                }
            }
        }

        hit
    }
}
