//! Cross-section generation.
//!
//! A profile is a list of 2-D outline points (carried as `Point3` whose z
//! holds the texture parameter) plus face records describing how those
//! points split into caps, outer sides and hollow inner walls.

use crate::float_types::{Real, TAU};
use crate::params::{HoleKind, ProfileKind, ProfileParams};
use crate::{MIN_DETAIL_FACES, MIN_LOD};
use nalgebra::Point3;

pub const FACE_PATH_BEGIN: u16 = 1 << 0;
pub const FACE_PATH_END: u16 = 1 << 1;
pub const FACE_INNER_SIDE: u16 = 1 << 2;
pub const FACE_PROFILE_BEGIN: u16 = 1 << 3;
pub const FACE_PROFILE_END: u16 = 1 << 4;
pub const FACE_OUTER_SIDE_0: u16 = 1 << 5;
pub const FACE_OUTER_SIDE_1: u16 = 1 << 6;
pub const FACE_OUTER_SIDE_2: u16 = 1 << 7;
pub const FACE_OUTER_SIDE_3: u16 = 1 << 8;

/// One renderable face's slice of the profile point list.
#[derive(Debug, Clone, Copy)]
pub struct ProfileFace {
    /// First profile point of the face.
    pub index: usize,
    /// Number of profile points the face spans.
    pub count: usize,
    /// Texture repeat along the profile direction.
    pub scale_u: Real,
    /// Identity bit from the `FACE_*` constants.
    pub face_id: u16,
    /// Cap faces span the whole cross-section.
    pub cap: bool,
    /// Flat faces get per-face normals rather than smoothed ones.
    pub flat: bool,
}

/// Generated cross-section outline.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    points: Vec<Point3<Real>>,
    faces: Vec<ProfileFace>,
    total: usize,
    /// Points on the outer outline when hollow; 0 otherwise.
    total_out: usize,
    open: bool,
    concave: bool,
    dirty: bool,
}

impl Profile {
    pub fn new() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    pub fn points(&self) -> &[Point3<Real>] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Point3<Real>] {
        &mut self.points
    }

    pub fn faces(&self) -> &[ProfileFace] {
        &self.faces
    }

    /// Total outline points, including any hollow inner wall.
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Points on the outer outline; 0 when the profile is not hollow.
    pub const fn total_out(&self) -> usize {
        self.total_out
    }

    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub const fn is_concave(&self) -> bool {
        self.concave
    }

    pub const fn is_hollow(&self) -> bool {
        self.total_out > 0
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Walks an n-sided "circular" outline counter-clockwise from (1,0),
    /// honoring the cut range with fractional first/last edges.
    ///
    /// `offset` rotates the outline (in turns), `ang_scale` compresses the
    /// swept angle (0.5 for half circles) and `split` inserts that many
    /// extra interpolated points per edge.
    fn gen_ngon(
        &mut self,
        params: &ProfileParams,
        sides: usize,
        offset: Real,
        ang_scale: Real,
        split: usize,
    ) {
        // Fill factor compensating small side counts so the outline still
        // roughly fills the bounding box.
        const TABLE_SCALE: [Real; 8] = [1.0, 1.0, 1.0, 0.5, 0.707107, 0.53, 0.525, 0.5];
        let mut scale = 0.5;

        let begin = params.begin();
        let end = params.end();

        let t_step = 1.0 / sides as Real;
        let ang_step = TAU * t_step * ang_scale;

        let total_sides = (sides as Real / ang_scale).round() as usize;
        if total_sides < 8 {
            scale = TABLE_SCALE[total_sides];
        }

        let t_first = (begin * sides as Real).floor() / sides as Real;

        // pt1/pt2 bracket the fractional first edge.
        let mut t = t_first;
        let mut ang = TAU * (t * ang_scale + offset);
        let mut pt1 = Point3::new(ang.cos() * scale, ang.sin() * scale, t);

        t += t_step;
        ang += ang_step;
        let pt2 = Point3::new(ang.cos() * scale, ang.sin() * scale, t);

        let t_fraction = (begin - t_first) * sides as Real;

        // Only use it if it's not almost exactly on an edge.
        if t_fraction < 0.9999 {
            self.points.push(pt1.lerp(&pt2, t_fraction));
        }

        while t < end {
            pt1 = Point3::new(ang.cos() * scale, ang.sin() * scale, t);

            if let Some(&prev) = self.points.last() {
                for i in 0..split {
                    let f = (i + 1) as Real / (split + 1) as Real;
                    self.points.push(prev + (pt1 - prev) * f);
                }
            }
            self.points.push(pt1);

            t += t_step;
            ang += ang_step;
        }

        // Fractional last edge, between the last whole edge and `end`.
        let pt2 = Point3::new(ang.cos() * scale, ang.sin() * scale, t);
        let t_fraction = (end - (t - t_step)) * sides as Real;
        if t_fraction > 0.0001 {
            let new_pt = pt1.lerp(&pt2, t_fraction);

            if let Some(&prev) = self.points.last() {
                for i in 0..split {
                    let f = (i + 1) as Real / (split + 1) as Real;
                    self.points.push(prev + (new_pt - prev) * f);
                }
            }
            self.points.push(new_pt);
        }

        // If we're sliced, the profile is open.
        if (end - begin) * ang_scale < 0.99 {
            self.concave = (end - begin) * ang_scale > 0.5;
            self.open = true;
            if params.hollow() <= 0.0 {
                // Put a center point if not hollow.
                self.points.push(Point3::origin());
            }
        } else {
            self.open = false;
            self.concave = false;
        }

        self.total = self.points.len();
    }

    fn add_cap(&mut self, face_id: u16) {
        self.faces.push(ProfileFace {
            index: 0,
            count: self.total,
            scale_u: 1.0,
            face_id,
            cap: true,
            flat: false,
        });
    }

    fn add_face(&mut self, index: usize, count: usize, scale_u: Real, face_id: u16, flat: bool) {
        self.faces.push(ProfileFace {
            index,
            count,
            scale_u,
            face_id,
            cap: false,
            flat,
        });
    }

    /// Appends a hollow inner wall. The hole outline is generated like an
    /// outer n-gon, scaled by `box_hollow` (a fraction of the bounding box,
    /// not of this profile's geometry) and reversed so it winds opposite
    /// the outer wall. Cap faces then cover both walls.
    ///
    /// Only meaningful for the "circular" outlines generated above.
    fn add_hole(
        &mut self,
        params: &ProfileParams,
        flat: bool,
        sides: Real,
        offset: Real,
        box_hollow: Real,
        ang_scale: Real,
        split: usize,
    ) {
        self.total_out = self.total;

        self.gen_ngon(params, sides.floor() as usize, offset, ang_scale, split);

        let inner_count = self.total - self.total_out;
        self.add_face(self.total_out, inner_count, 0.0, FACE_INNER_SIDE, flat);

        let scaled: Vec<Point3<Real>> = self.points[self.total_out..self.total]
            .iter()
            .rev()
            .map(|p| Point3::new(p.x * box_hollow, p.y * box_hollow, p.z * box_hollow))
            .collect();
        self.points[self.total_out..self.total].copy_from_slice(&scaled);

        for face in &mut self.faces {
            if face.cap {
                face.count *= 2;
            }
        }
    }

    /// Regenerates the outline and face records; `false` when nothing
    /// needed doing or the cut range is inverted.
    pub fn generate(
        &mut self,
        params: &ProfileParams,
        path_open: bool,
        detail: Real,
        split: usize,
        is_sculpted: bool,
        sculpt_size: usize,
    ) -> bool {
        if !self.dirty && !is_sculpted {
            return false;
        }
        self.dirty = false;

        let mut detail = detail;
        if detail < MIN_LOD {
            log::info!("generating profile with detail under the minimum, clamping");
            detail = MIN_LOD;
        }

        self.points.clear();
        self.faces.clear();
        self.total = 0;
        self.total_out = 0;

        let begin = params.begin();
        let end = params.end();
        let hollow = params.hollow();

        // Quick validation to eliminate crashes on corrupt input.
        if begin > end - 0.01 {
            log::warn!("profile cut begin {begin} overlaps end {end}");
            return false;
        }

        let mut face_num = 0;

        match params.curve() {
            ProfileKind::Square => {
                self.gen_ngon(params, 4, -0.375, 1.0, split);
                if path_open {
                    self.add_cap(FACE_PATH_BEGIN);
                }

                let first = (begin * 4.0).floor() as i32;
                let last = (end * 4.0 + 0.999).floor() as i32;
                for i in first..last {
                    self.add_face(
                        face_num * (split + 1),
                        split + 2,
                        1.0,
                        FACE_OUTER_SIDE_0 << i,
                        true,
                    );
                    face_num += 1;
                }

                // Scale by 4 to generate proper tex coords.
                for p in &mut self.points {
                    p.z *= 4.0;
                }

                if hollow > 0.0 {
                    match params.hole() {
                        HoleKind::Triangle => {
                            // This offset carries over a historical
                            // misalignment that content now depends on.
                            self.add_hole(params, true, 3.0, -0.375, hollow, 1.0, split);
                        },
                        HoleKind::Circle => {
                            self.add_hole(
                                params,
                                false,
                                MIN_DETAIL_FACES * detail,
                                -0.375,
                                hollow,
                                1.0,
                                0,
                            );
                        },
                        HoleKind::Same | HoleKind::Square => {
                            self.add_hole(params, true, 4.0, -0.375, hollow, 1.0, split);
                        },
                    }
                }

                if path_open {
                    self.faces[0].count = self.total;
                }
            },
            ProfileKind::IsoscelesTriangle
            | ProfileKind::RightTriangle
            | ProfileKind::EquilateralTriangle => {
                self.gen_ngon(params, 3, 0.0, 1.0, split);
                // Scale by 3 to generate proper tex coords.
                for p in &mut self.points {
                    p.z *= 3.0;
                }

                if path_open {
                    self.add_cap(FACE_PATH_BEGIN);
                }

                let first = (begin * 3.0).floor() as i32;
                let last = (end * 3.0 + 0.999).floor() as i32;
                for i in first..last {
                    self.add_face(
                        face_num * (split + 1),
                        split + 2,
                        1.0,
                        FACE_OUTER_SIDE_0 << i,
                        true,
                    );
                    face_num += 1;
                }

                if hollow > 0.0 {
                    // Swept triangles need smaller hollowness values,
                    // because the triangle doesn't fill the bounding box.
                    let triangle_hollow = hollow / 2.0;

                    match params.hole() {
                        HoleKind::Circle => {
                            self.add_hole(
                                params,
                                false,
                                MIN_DETAIL_FACES * detail,
                                0.0,
                                triangle_hollow,
                                1.0,
                                0,
                            );
                        },
                        HoleKind::Square => {
                            self.add_hole(params, true, 4.0, 0.0, triangle_hollow, 1.0, split);
                        },
                        HoleKind::Same | HoleKind::Triangle => {
                            self.add_hole(params, true, 3.0, 0.0, triangle_hollow, 1.0, split);
                        },
                    }
                }
            },
            ProfileKind::Circle => {
                let mut hole_type = HoleKind::Same;
                let mut circle_detail = MIN_DETAIL_FACES * detail;
                if hollow > 0.0 {
                    hole_type = params.hole();
                    if hole_type == HoleKind::Square {
                        // Snap to the next multiple of four sides so the
                        // hole's corners line up with the outer wall.
                        circle_detail = (circle_detail / 4.0).ceil() * 4.0;
                    }
                }

                let sides = if is_sculpted {
                    sculpt_size
                } else {
                    circle_detail as usize
                };

                self.gen_ngon(params, sides, 0.0, 1.0, 0);

                if path_open {
                    self.add_cap(FACE_PATH_BEGIN);
                }

                if self.open && hollow <= 0.0 {
                    self.add_face(0, self.total - 1, 0.0, FACE_OUTER_SIDE_0, false);
                } else {
                    self.add_face(0, self.total, 0.0, FACE_OUTER_SIDE_0, false);
                }

                if hollow > 0.0 {
                    match hole_type {
                        HoleKind::Square => {
                            self.add_hole(params, true, 4.0, 0.0, hollow, 1.0, split);
                        },
                        HoleKind::Triangle => {
                            self.add_hole(params, true, 3.0, 0.0, hollow, 1.0, split);
                        },
                        HoleKind::Circle | HoleKind::Same => {
                            self.add_hole(params, false, circle_detail, 0.0, hollow, 1.0, 0);
                        },
                    }
                }
            },
            ProfileKind::HalfCircle => {
                let mut hole_type = HoleKind::Same;
                // Number of faces is cut in half because it's only a
                // half-circle.
                let mut circle_detail = MIN_DETAIL_FACES * detail * 0.5;
                if hollow > 0.0 {
                    hole_type = params.hole();
                    if hole_type == HoleKind::Square {
                        // Snap to the next multiple of two sides.
                        circle_detail = (circle_detail / 2.0).ceil() * 2.0;
                    }
                }
                self.gen_ngon(params, circle_detail.floor() as usize, 0.5, 0.5, 0);
                if path_open {
                    self.add_cap(FACE_PATH_BEGIN);
                }
                if self.open && hollow <= 0.0 {
                    self.add_face(0, self.total - 1, 0.0, FACE_OUTER_SIDE_0, false);
                } else {
                    self.add_face(0, self.total, 0.0, FACE_OUTER_SIDE_0, false);
                }

                if hollow > 0.0 {
                    match hole_type {
                        HoleKind::Square => {
                            self.add_hole(params, true, 2.0, 0.5, hollow, 0.5, split);
                        },
                        HoleKind::Triangle => {
                            self.add_hole(params, true, 3.0, 0.5, hollow, 0.5, split);
                        },
                        HoleKind::Circle | HoleKind::Same => {
                            self.add_hole(params, false, circle_detail, 0.5, hollow, 0.5, 0);
                        },
                    }
                }

                // Special case for openness of the sphere.
                if end - begin < 1.0 {
                    self.open = true;
                } else if hollow <= 0.0 {
                    self.open = false;
                    self.points.push(self.points[0]);
                    self.total += 1;
                }
            },
        }

        if path_open {
            self.add_cap(FACE_PATH_END); // bottom
        }

        if self.open {
            // Interior edge caps along the cut.
            self.add_face(self.total - 1, 2, 0.5, FACE_PROFILE_BEGIN, true);

            if hollow > 0.0 {
                self.add_face(self.total_out - 1, 2, 0.5, FACE_PROFILE_END, true);
            } else {
                self.add_face(self.total - 2, 2, 0.5, FACE_PROFILE_END, true);
            }
        }

        true
    }
}
