//! Sweep generation.
//!
//! A path is the list of frames the profile is swept along: a position,
//! an orientation, a per-sample profile scale and a texture parameter.

use crate::float_types::{lerp, Real, PI, TAU};
use crate::params::{PathKind, PathParams};
use crate::{MIN_DETAIL_FACES, MIN_LOD};
use nalgebra::{Point3, UnitQuaternion, Vector2, Vector3};

/// One frame of the sweep.
#[derive(Debug, Clone, Copy)]
pub struct PathSample {
    pub pos: Point3<Real>,
    pub rot: UnitQuaternion<Real>,
    pub scale: Vector2<Real>,
    pub tex_t: Real,
}

impl Default for PathSample {
    fn default() -> Self {
        Self {
            pos: Point3::origin(),
            rot: UnitQuaternion::identity(),
            scale: Vector2::new(1.0, 1.0),
            tex_t: 0.0,
        }
    }
}

/// Generated sweep.
#[derive(Debug, Clone, Default)]
pub struct Path {
    samples: Vec<PathSample>,
    open: bool,
    step: Real,
    dirty: bool,
    /// Externally animated: generation only seeds the sample list, the
    /// caller writes the frames.
    dynamic: bool,
}

impl Path {
    pub fn new(dynamic: bool) -> Self {
        Self {
            open: true,
            step: 1.0,
            dirty: true,
            dynamic,
            ..Self::default()
        }
    }

    pub fn samples(&self) -> &[PathSample] {
        &self.samples
    }

    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub const fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Grows or shrinks a dynamic path's sample list.
    pub fn resize(&mut self, length: usize) {
        self.samples.resize(length, PathSample::default());
    }

    /// Mutable frame access for dynamic paths.
    pub fn sample_mut(&mut self, i: usize) -> &mut PathSample {
        &mut self.samples[i]
    }

    /// Generates a circular sweep, starting at (1, 0, 0) and walking
    /// counterclockwise in the xz plane.
    fn gen_ngon(&mut self, params: &PathParams, sides: usize) {
        const TABLE_SCALE: [Real; 8] = [1.0, 1.0, 1.0, 0.5, 0.707107, 0.53, 0.525, 0.5];

        let revolutions = params.revolutions();
        let skew = params.skew();
        let skew_mag = skew.abs();
        let hole_x = params.scale_x() * (1.0 - skew_mag);
        let hole_y = params.scale_y();

        // Taper begin/end for x,y; negative taper moves to the beginning.
        let mut taper_x_begin = 1.0;
        let mut taper_x_end = 1.0 - params.taper_x();
        let mut taper_y_begin = 1.0;
        let mut taper_y_end = 1.0 - params.taper_y();

        if taper_x_end > 1.0 {
            // Flip tapering.
            taper_x_begin = 2.0 - taper_x_end;
            taper_x_end = 1.0;
        }
        if taper_y_end > 1.0 {
            taper_y_begin = 2.0 - taper_y_end;
            taper_y_end = 1.0;
        }

        // For spheres, the radius is usually zero.
        let mut radius_start = 0.5;
        if sides < 8 {
            radius_start = TABLE_SCALE[sides];
        }

        // Scale the radius to take the hole size into account.
        radius_start *= 1.0 - hole_y;

        // Radius offset shrinks one end of the sweep toward the axis;
        // negative values shrink the start instead of the end.
        let mut radius_end = radius_start;
        let radius_offset = params.radius_offset();
        if radius_offset < 0.0 {
            radius_start *= 1.0 + radius_offset;
        } else {
            radius_end *= 1.0 - radius_offset;
        }

        // Is the path NOT a closed loop?
        self.open = params.end() - params.begin() < 1.0
            || skew_mag > 0.001
            || (taper_x_end - taper_x_begin).abs() > 0.001
            || (taper_y_end - taper_y_begin).abs() > 0.001
            || (radius_end - radius_start).abs() > 0.001;

        let twist_begin = params.twist_begin();
        let twist_end = params.twist_end();
        let shear = params.shear();

        let sample_at = |t: Real| {
            let ang = TAU * revolutions * t;
            let radius = lerp(radius_start, radius_end, t);
            let c = ang.cos() * radius;
            let s = ang.sin() * radius;

            // Twist spins the profile in its own plane; the sweep angle
            // then carries it around the circle's center. The twist is
            // applied first.
            let twist = UnitQuaternion::from_axis_angle(
                &Vector3::z_axis(),
                lerp(twist_begin, twist_end, t) * TAU - PI,
            );
            let qang = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), ang);

            PathSample {
                pos: Point3::new(
                    shear.x * s + lerp(-skew, skew, t) * 0.5,
                    c + shear.y * s,
                    s,
                ),
                rot: qang * twist,
                scale: Vector2::new(
                    hole_x * lerp(taper_x_begin, taper_x_end, t),
                    hole_y * lerp(taper_y_begin, taper_y_end, t),
                ),
                tex_t: t,
            }
        };

        // One sample exactly at the begin cut...
        self.samples.push(sample_at(params.begin()));

        // ...then walk the quantized parameters strictly inside the cut,
        // so the cut does not move the interior sample points. Stepping by
        // index keeps accumulated rounding from emitting an extra sample
        // on a full revolution.
        let mut k = (params.begin() * sides as Real) as usize + 1;
        let mut t = k as Real / sides as Real;
        while t < params.end() {
            self.samples.push(sample_at(t));
            k += 1;
            t = k as Real / sides as Real;
        }

        // One final sample for the end cut.
        self.samples.push(sample_at(params.end()));
    }

    /// Regenerates the sweep; `false` when the path was already current.
    pub fn generate(
        &mut self,
        params: &PathParams,
        detail: Real,
        split: usize,
        is_sculpted: bool,
        sculpt_size: usize,
    ) -> bool {
        if !self.dirty && !is_sculpted {
            return false;
        }
        self.dirty = false;

        if self.dynamic {
            self.open = true; // draw end caps
            if self.samples.is_empty() {
                // Not filled in by the animator yet; the mesh builders
                // assume at least two samples.
                self.samples.resize(2, PathSample::default());
            }
            return true;
        }

        let mut detail = detail;
        if detail < MIN_LOD {
            log::info!("generating path with detail under the minimum, clamping");
            detail = MIN_LOD;
        }

        self.samples.clear();
        self.open = true;

        match params.curve() {
            PathKind::Line | PathKind::Flexible => {
                // Twist adds path samples so the sides stay smooth.
                let twist_mag = (params.twist_begin() - params.twist_end()).abs();
                let mut np = (twist_mag * 3.5 * (detail - 0.5)).floor() as usize + 2;
                if np < split + 2 {
                    np = split + 2;
                }

                self.step = 1.0 / (np - 1) as Real;

                let start_scale = params.begin_scale();
                let end_scale = params.end_scale();

                for i in 0..np {
                    let t = lerp(params.begin(), params.end(), i as Real * self.step);
                    self.samples.push(PathSample {
                        pos: Point3::new(
                            lerp(0.0, params.shear().x, t),
                            lerp(0.0, params.shear().y, t),
                            t - 0.5,
                        ),
                        rot: UnitQuaternion::from_axis_angle(
                            &Vector3::z_axis(),
                            lerp(PI * params.twist_begin(), PI * params.twist_end(), t),
                        ),
                        scale: Vector2::new(
                            lerp(start_scale.x, end_scale.x, t),
                            lerp(start_scale.y, end_scale.y, t),
                        ),
                        tex_t: t,
                    });
                }
            },

            PathKind::Circle => {
                // Increase the detail as the revolutions and twist increase.
                let twist_mag = (params.twist_begin() - params.twist_end()).abs();

                let mut sides = ((MIN_DETAIL_FACES * detail + twist_mag * 3.5 * (detail - 0.5))
                    .floor()
                    * params.revolutions()) as usize;

                if is_sculpted {
                    sides = sculpt_size;
                }

                self.gen_ngon(params, sides);
            },

            PathKind::Circle2 => {
                self.gen_ngon(params, (MIN_DETAIL_FACES * detail).floor() as usize);

                if params.end() - params.begin() >= 0.99 && params.scale_x() >= 0.99 {
                    self.open = false;
                }

                // Flatten the loop into a zig-zag ribbon.
                let mut toggle = 0.5;
                for sample in &mut self.samples {
                    sample.pos.x = toggle;
                    toggle = -toggle;
                }
            },

            PathKind::Test => {
                let np = 5;
                self.step = 1.0 / (np - 1) as Real;
                let twist = params.twist_end();

                for i in 0..np {
                    let t = i as Real * self.step;
                    self.samples.push(PathSample {
                        pos: Point3::new(
                            0.0,
                            lerp(0.0, -(PI * twist * t).sin() * 0.5, t),
                            lerp(-0.5, (PI * twist * t).cos() * 0.5, t),
                        ),
                        rot: UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI * twist * t),
                        scale: Vector2::new(
                            lerp(1.0, params.scale_x(), t),
                            lerp(1.0, params.scale_y(), t),
                        ),
                        tex_t: t,
                    });
                }
            },
        }

        if params.twist_end() != params.twist_begin() {
            self.open = true;
        }

        true
    }
}
