//! Parameter blocks describing a volume: the 2-D cross-section (profile),
//! the 3-D sweep (path), and the optional sculpt-map override.
//!
//! All mutation goes through the clamping setters on [`VolumeParams`].
//! A setter never fails; it clamps the value into its legal range and
//! returns `false` when the input was outside that range by more than a
//! small tolerance, so wire decoders can flag bad data without aborting.

use crate::float_types::Real;
use nalgebra::Vector2;
use std::cmp::Ordering;
use std::fmt;

/// Minimum separation between a cut begin and end, in cut units.
pub const MIN_CUT_DELTA: Real = 0.02;

pub const HOLLOW_MIN: Real = 0.0;
pub const HOLLOW_MAX: Real = 0.95;
/// Square holes through circular or triangular profiles overlap the outer
/// wall sooner, so they get a lower hollow ceiling.
pub const HOLLOW_MAX_SQUARE: Real = 0.7;

pub const TWIST_MIN: Real = -1.0;
pub const TWIST_MAX: Real = 1.0;

pub const RATIO_MIN: Real = 0.0;
pub const RATIO_MAX: Real = 2.0;

pub const HOLE_X_MIN: Real = 0.05;
pub const HOLE_X_MAX: Real = 1.0;
pub const HOLE_Y_MIN: Real = 0.05;
pub const HOLE_Y_MAX: Real = 0.5;

pub const SHEAR_MIN: Real = -0.5;
pub const SHEAR_MAX: Real = 0.5;

pub const TAPER_MIN: Real = -1.0;
pub const TAPER_MAX: Real = 1.0;

pub const REV_MIN: Real = 1.0;
pub const REV_MAX: Real = 4.0;

pub const SKEW_MIN: Real = -0.95;
pub const SKEW_MAX: Real = 0.95;

/// How far outside a legal range a value may sit before the setter
/// reports it as invalid.
const RANGE_TOLERANCE: Real = 0.001;

fn approx_zero(f: Real, tolerance: Real) -> bool {
    f >= -tolerance && f <= tolerance
}

/// Clamps `v` into `[min, max]`; true if it was already within tolerance
/// of that range.
fn limit_range(v: &mut Real, min: Real, max: Real, tolerance: Real) -> bool {
    let valid = *v >= min - tolerance && *v <= max + tolerance;
    *v = v.clamp(min, max);
    valid
}

// ---------------------------------------------------------------------
// curve-type bytes
// ---------------------------------------------------------------------

/// Cross-section outline, stored in the low nibble of the profile wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum ProfileKind {
    Circle = 0x00,
    #[default]
    Square = 0x01,
    IsoscelesTriangle = 0x02,
    EquilateralTriangle = 0x03,
    RightTriangle = 0x04,
    HalfCircle = 0x05,
}

impl ProfileKind {
    /// Decodes the low nibble of a profile wire byte.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte & 0x0f {
            0x00 => Some(Self::Circle),
            0x01 => Some(Self::Square),
            0x02 => Some(Self::IsoscelesTriangle),
            0x03 => Some(Self::EquilateralTriangle),
            0x04 => Some(Self::RightTriangle),
            0x05 => Some(Self::HalfCircle),
            _ => None,
        }
    }

    pub const fn is_triangle(self) -> bool {
        matches!(
            self,
            Self::IsoscelesTriangle | Self::EquilateralTriangle | Self::RightTriangle
        )
    }
}

/// Hollow cross-section shape, stored in the high nibble of the profile
/// wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum HoleKind {
    /// Hole matches the outer profile shape.
    #[default]
    Same = 0x00,
    Circle = 0x10,
    Square = 0x20,
    Triangle = 0x30,
}

impl HoleKind {
    /// Decodes the high nibble of a profile wire byte.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte & 0xf0 {
            0x00 => Some(Self::Same),
            0x10 => Some(Self::Circle),
            0x20 => Some(Self::Square),
            0x30 => Some(Self::Triangle),
            _ => None,
        }
    }
}

/// Sweep curve, stored in the high nibble of the path wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum PathKind {
    /// Straight extrusion along +Z.
    #[default]
    Line = 0x10,
    /// Circular sweep (torus/tube/sphere family).
    Circle = 0x20,
    /// Circular sweep with samples flattened into a zig-zag ribbon.
    Circle2 = 0x30,
    /// Fixed 5-sample bend used for development.
    Test = 0x40,
    /// Externally animated path; samples are supplied by the caller.
    Flexible = 0x80,
}

impl PathKind {
    /// Decodes the high nibble of a path wire byte.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte & 0xf0 {
            0x10 => Some(Self::Line),
            0x20 => Some(Self::Circle),
            0x30 => Some(Self::Circle2),
            0x40 => Some(Self::Test),
            0x80 => Some(Self::Flexible),
            _ => None,
        }
    }
}

/// Identifier of the texture a sculpted volume reads its geometry from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SculptId(pub [u8; 16]);

/// Sculpt topology byte: bits 0-2 select the stitching, bit 6 inverts the
/// surface and bit 7 mirrors it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SculptType(u8);

impl SculptType {
    pub const NONE: SculptType = SculptType(0);
    pub const SPHERE: SculptType = SculptType(1);
    pub const TORUS: SculptType = SculptType(2);
    pub const PLANE: SculptType = SculptType(3);
    pub const CYLINDER: SculptType = SculptType(4);

    pub const FLAG_INVERT: u8 = 64;
    pub const FLAG_MIRROR: u8 = 128;

    pub const fn from_byte(byte: u8) -> Self {
        SculptType(byte)
    }

    pub const fn byte(self) -> u8 {
        self.0
    }

    /// How the sculpt map's borders connect to each other.
    pub const fn stitching(self) -> Stitching {
        match self.0 & 0x07 {
            1 => Stitching::Sphere,
            2 => Stitching::Torus,
            3 => Stitching::Plane,
            4 => Stitching::Cylinder,
            _ => Stitching::None,
        }
    }

    pub const fn invert(self) -> bool {
        self.0 & Self::FLAG_INVERT != 0
    }

    pub const fn mirror(self) -> bool {
        self.0 & Self::FLAG_MIRROR != 0
    }

    /// Inverted-but-not-mirrored (or mirrored-but-not-inverted) maps read
    /// their rows right to left.
    pub const fn reverse_horizontal(self) -> bool {
        self.invert() != self.mirror()
    }

    pub const fn with_flags(self, invert: bool, mirror: bool) -> Self {
        let mut b = self.0 & 0x07;
        if invert {
            b |= Self::FLAG_INVERT;
        }
        if mirror {
            b |= Self::FLAG_MIRROR;
        }
        SculptType(b)
    }
}

/// Border topology of a sculpt map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stitching {
    None,
    Sphere,
    Torus,
    Plane,
    Cylinder,
}

// ---------------------------------------------------------------------
// profile parameters
// ---------------------------------------------------------------------

/// Cross-section description: outline kind, cut range and hollow amount.
#[derive(Debug, Clone, Copy)]
pub struct ProfileParams {
    curve: ProfileKind,
    hole: HoleKind,
    begin: Real,
    end: Real,
    hollow: Real,
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self {
            curve: ProfileKind::Square,
            hole: HoleKind::Same,
            begin: 0.0,
            end: 1.0,
            hollow: 0.0,
        }
    }
}

impl ProfileParams {
    pub const fn curve(&self) -> ProfileKind {
        self.curve
    }

    pub const fn hole(&self) -> HoleKind {
        self.hole
    }

    pub const fn begin(&self) -> Real {
        self.begin
    }

    pub const fn end(&self) -> Real {
        self.end
    }

    pub const fn hollow(&self) -> Real {
        self.hollow
    }

    /// Re-encodes the profile wire byte (outline nibble | hole nibble).
    pub const fn curve_byte(&self) -> u8 {
        self.curve as u8 | self.hole as u8
    }

    // Unclamped setters; the VolumeParams setters validate before
    // delegating here.

    pub fn set_curve(&mut self, curve: ProfileKind) {
        self.curve = curve;
    }

    pub fn set_hole(&mut self, hole: HoleKind) {
        self.hole = hole;
    }

    pub fn set_begin(&mut self, begin: Real) {
        self.begin = begin;
    }

    pub fn set_end(&mut self, end: Real) {
        self.end = end;
    }

    pub fn set_hollow(&mut self, hollow: Real) {
        self.hollow = hollow;
    }
}

impl PartialEq for ProfileParams {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ProfileParams {}

impl PartialOrd for ProfileParams {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProfileParams {
    // Setters keep every scalar clamped and finite, so total_cmp agrees
    // with the numeric order here.
    fn cmp(&self, other: &Self) -> Ordering {
        self.curve
            .cmp(&other.curve)
            .then(self.hole.cmp(&other.hole))
            .then(self.begin.total_cmp(&other.begin))
            .then(self.end.total_cmp(&other.end))
            .then(self.hollow.total_cmp(&other.hollow))
    }
}

impl fmt::Display for ProfileParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{type={:#04x}, begin={}, end={}, hollow={}}}",
            self.curve_byte(),
            self.begin,
            self.end,
            self.hollow
        )
    }
}

// ---------------------------------------------------------------------
// path parameters
// ---------------------------------------------------------------------

/// Sweep description: curve kind, cut range and the knobs that deform the
/// sweep (twist, taper, shear, skew, radius offset, revolutions).
#[derive(Debug, Clone, Copy)]
pub struct PathParams {
    curve: PathKind,
    begin: Real,
    end: Real,
    scale: Vector2<Real>,
    shear: Vector2<Real>,
    twist_begin: Real,
    twist_end: Real,
    radius_offset: Real,
    taper: Vector2<Real>,
    revolutions: Real,
    skew: Real,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            curve: PathKind::Line,
            begin: 0.0,
            end: 1.0,
            scale: Vector2::new(1.0, 1.0),
            shear: Vector2::new(0.0, 0.0),
            twist_begin: 0.0,
            twist_end: 0.0,
            radius_offset: 0.0,
            taper: Vector2::new(0.0, 0.0),
            revolutions: 1.0,
            skew: 0.0,
        }
    }
}

impl PathParams {
    pub const fn curve(&self) -> PathKind {
        self.curve
    }

    pub const fn begin(&self) -> Real {
        self.begin
    }

    pub const fn end(&self) -> Real {
        self.end
    }

    pub const fn scale(&self) -> Vector2<Real> {
        self.scale
    }

    pub fn scale_x(&self) -> Real {
        self.scale.x
    }

    pub fn scale_y(&self) -> Real {
        self.scale.y
    }

    pub const fn shear(&self) -> Vector2<Real> {
        self.shear
    }

    pub const fn twist_begin(&self) -> Real {
        self.twist_begin
    }

    pub const fn twist_end(&self) -> Real {
        self.twist_end
    }

    pub const fn radius_offset(&self) -> Real {
        self.radius_offset
    }

    pub const fn taper(&self) -> Vector2<Real> {
        self.taper
    }

    pub fn taper_x(&self) -> Real {
        self.taper.x
    }

    pub fn taper_y(&self) -> Real {
        self.taper.y
    }

    pub const fn revolutions(&self) -> Real {
        self.revolutions
    }

    pub const fn skew(&self) -> Real {
        self.skew
    }

    /// Re-encodes the path wire byte.
    pub const fn curve_byte(&self) -> u8 {
        self.curve as u8
    }

    /// Profile scale at the start of a straight sweep: the over-unity half
    /// of each scale ratio shrinks the begin end instead of growing the
    /// far end.
    pub fn begin_scale(&self) -> Vector2<Real> {
        let mut begin_scale = Vector2::new(1.0, 1.0);
        if self.scale.x > 1.0 {
            begin_scale.x = 2.0 - self.scale.x;
        }
        if self.scale.y > 1.0 {
            begin_scale.y = 2.0 - self.scale.y;
        }
        begin_scale
    }

    /// Profile scale at the end of a straight sweep.
    pub fn end_scale(&self) -> Vector2<Real> {
        let mut end_scale = Vector2::new(1.0, 1.0);
        if self.scale.x < 1.0 {
            end_scale.x = self.scale.x;
        }
        if self.scale.y < 1.0 {
            end_scale.y = self.scale.y;
        }
        end_scale
    }

    // Unclamped setters, see ProfileParams.

    pub fn set_curve(&mut self, curve: PathKind) {
        self.curve = curve;
    }

    pub fn set_begin(&mut self, begin: Real) {
        self.begin = begin;
    }

    pub fn set_end(&mut self, end: Real) {
        self.end = end;
    }

    pub fn set_scale(&mut self, x: Real, y: Real) {
        self.scale = Vector2::new(x, y);
    }

    pub fn set_shear(&mut self, x: Real, y: Real) {
        self.shear = Vector2::new(x, y);
    }

    pub fn set_twist_begin(&mut self, twist_begin: Real) {
        self.twist_begin = twist_begin;
    }

    pub fn set_twist_end(&mut self, twist_end: Real) {
        self.twist_end = twist_end;
    }

    pub fn set_radius_offset(&mut self, radius_offset: Real) {
        self.radius_offset = radius_offset;
    }

    pub fn set_taper(&mut self, x: Real, y: Real) {
        self.taper = Vector2::new(x, y);
    }

    pub fn set_revolutions(&mut self, revolutions: Real) {
        self.revolutions = revolutions;
    }

    pub fn set_skew(&mut self, skew: Real) {
        self.skew = skew;
    }
}

impl PartialEq for PathParams {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathParams {}

impl PartialOrd for PathParams {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathParams {
    fn cmp(&self, other: &Self) -> Ordering {
        self.curve
            .cmp(&other.curve)
            .then(self.begin.total_cmp(&other.begin))
            .then(self.end.total_cmp(&other.end))
            .then(self.scale.x.total_cmp(&other.scale.x))
            .then(self.scale.y.total_cmp(&other.scale.y))
            .then(self.shear.x.total_cmp(&other.shear.x))
            .then(self.shear.y.total_cmp(&other.shear.y))
            .then(self.twist_begin.total_cmp(&other.twist_begin))
            .then(self.twist_end.total_cmp(&other.twist_end))
            .then(self.radius_offset.total_cmp(&other.radius_offset))
            .then(self.taper.x.total_cmp(&other.taper.x))
            .then(self.taper.y.total_cmp(&other.taper.y))
            .then(self.revolutions.total_cmp(&other.revolutions))
            .then(self.skew.total_cmp(&other.skew))
    }
}

impl fmt::Display for PathParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{type={:#04x}, begin={}, end={}, twist={}, twist_begin={}, scale=({}, {}), \
             shear=({}, {}), radius_offset={}, taper=({}, {}), revolutions={}, skew={}}}",
            self.curve_byte(),
            self.begin,
            self.end,
            self.twist_end,
            self.twist_begin,
            self.scale.x,
            self.scale.y,
            self.shear.x,
            self.shear.y,
            self.radius_offset,
            self.taper.x,
            self.taper.y,
            self.revolutions,
            self.skew
        )
    }
}

// ---------------------------------------------------------------------
// volume parameters
// ---------------------------------------------------------------------

/// Everything needed to generate one volume. Orderable so it can key a
/// shape cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolumeParams {
    profile: ProfileParams,
    path: PathParams,
    sculpt_id: Option<SculptId>,
    sculpt_type: SculptType,
}

impl PartialOrd for VolumeParams {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VolumeParams {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path
            .cmp(&other.path)
            .then_with(|| self.profile.cmp(&other.profile))
            .then_with(|| self.sculpt_id.cmp(&other.sculpt_id))
            .then_with(|| self.sculpt_type.cmp(&other.sculpt_type))
    }
}

impl fmt::Display for VolumeParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{profileparams = {}, pathparams = {}}}",
            self.profile, self.path
        )
    }
}

impl VolumeParams {
    /// Unit cube: square profile swept along a straight path.
    pub fn cube() -> Self {
        let mut params = Self::default();
        params.profile.set_curve(ProfileKind::Square);
        params.path.set_curve(PathKind::Line);
        params
    }

    pub const fn profile(&self) -> &ProfileParams {
        &self.profile
    }

    pub const fn path(&self) -> &PathParams {
        &self.path
    }

    pub const fn sculpt_id(&self) -> Option<SculptId> {
        self.sculpt_id
    }

    pub const fn sculpt_type(&self) -> SculptType {
        self.sculpt_type
    }

    pub const fn is_sculpted(&self) -> bool {
        self.sculpt_id.is_some()
    }

    /// Decodes the profile and path wire bytes. Unknown bytes fall back to
    /// a square profile / straight path and report `false`.
    pub fn set_type(&mut self, profile_byte: u8, path_byte: u8) -> bool {
        let mut result = true;

        match (
            ProfileKind::from_byte(profile_byte),
            HoleKind::from_byte(profile_byte),
        ) {
            (Some(curve), Some(hole)) => {
                self.profile.set_curve(curve);
                self.profile.set_hole(hole);
            },
            (Some(curve), None) => {
                // Bad hole. Make it the same.
                log::warn!(
                    "changing bad hole type ({:#04x}) to HoleKind::Same",
                    profile_byte & 0xf0
                );
                self.profile.set_curve(curve);
                self.profile.set_hole(HoleKind::Same);
                result = false;
            },
            (None, _) => {
                // Bad profile. Make it square.
                log::warn!(
                    "changing bad profile type ({:#04x}) to ProfileKind::Square",
                    profile_byte & 0x0f
                );
                self.profile.set_curve(ProfileKind::Square);
                self.profile.set_hole(HoleKind::Same);
                result = false;
            },
        }

        match PathKind::from_byte(path_byte) {
            Some(curve) => self.path.set_curve(curve),
            None => {
                // Bad path. Make it linear.
                log::warn!("changing bad path ({:#04x}) to PathKind::Line", path_byte);
                self.path.set_curve(PathKind::Line);
                result = false;
            },
        }

        result
    }

    /// Sets the profile cut. `false` if either bound had to be clamped.
    pub fn set_begin_and_end_s(&mut self, b: Real, e: Real) -> bool {
        let mut valid = true;

        let mut begin = b;
        valid &= limit_range(&mut begin, 0.0, 1.0 - MIN_CUT_DELTA, RANGE_TOLERANCE);

        let mut end = e;
        if end >= 0.0149 && end < MIN_CUT_DELTA {
            // eliminate warning for common rounding error
            end = MIN_CUT_DELTA;
        }
        valid &= limit_range(&mut end, MIN_CUT_DELTA, 1.0, RANGE_TOLERANCE);

        valid &= limit_range(&mut begin, 0.0, end - MIN_CUT_DELTA, 0.01);

        self.profile.set_begin(begin);
        self.profile.set_end(end);
        valid
    }

    /// Sets the path cut.
    pub fn set_begin_and_end_t(&mut self, b: Real, e: Real) -> bool {
        let mut valid = true;

        let mut begin = b;
        valid &= limit_range(&mut begin, 0.0, 1.0 - MIN_CUT_DELTA, RANGE_TOLERANCE);

        let mut end = e;
        valid &= limit_range(&mut end, MIN_CUT_DELTA, 1.0, RANGE_TOLERANCE);

        valid &= limit_range(&mut begin, 0.0, end - MIN_CUT_DELTA, 0.01);

        self.path.set_begin(begin);
        self.path.set_end(end);
        valid
    }

    /// Sets the hollow fraction; the ceiling depends on the profile/hole
    /// combination.
    pub fn set_hollow(&mut self, h: Real) -> bool {
        let mut max_hollow = HOLLOW_MAX;

        // Only square holes have trouble.
        if self.profile.hole() == HoleKind::Square {
            match self.profile.curve() {
                ProfileKind::Circle
                | ProfileKind::HalfCircle
                | ProfileKind::EquilateralTriangle => max_hollow = HOLLOW_MAX_SQUARE,
                _ => {},
            }
        }

        let mut hollow = h;
        let valid = limit_range(&mut hollow, HOLLOW_MIN, max_hollow, RANGE_TOLERANCE);
        self.profile.set_hollow(hollow);
        valid
    }

    pub fn set_twist_begin(&mut self, b: Real) -> bool {
        let mut twist_begin = b;
        let valid = limit_range(&mut twist_begin, TWIST_MIN, TWIST_MAX, RANGE_TOLERANCE);
        self.path.set_twist_begin(twist_begin);
        valid
    }

    pub fn set_twist_end(&mut self, e: Real) -> bool {
        let mut twist_end = e;
        let valid = limit_range(&mut twist_end, TWIST_MIN, TWIST_MAX, RANGE_TOLERANCE);
        self.path.set_twist_end(twist_end);
        valid
    }

    /// Sets the path scale ratio. On circular paths (other than spheres)
    /// the ratio doubles as the hole size and gets the tighter hole range.
    pub fn set_ratio(&mut self, x: Real, y: Real) -> bool {
        let mut min_x = RATIO_MIN;
        let mut max_x = RATIO_MAX;
        let mut min_y = RATIO_MIN;
        let mut max_y = RATIO_MAX;

        if self.path.curve() == PathKind::Circle
            && self.profile.curve() != ProfileKind::HalfCircle
        {
            // Holes are more restricted...
            min_x = HOLE_X_MIN;
            max_x = HOLE_X_MAX;
            min_y = HOLE_Y_MIN;
            max_y = HOLE_Y_MAX;
        }

        let mut ratio_x = x;
        let mut valid = limit_range(&mut ratio_x, min_x, max_x, RANGE_TOLERANCE);
        let mut ratio_y = y;
        valid &= limit_range(&mut ratio_y, min_y, max_y, RANGE_TOLERANCE);

        self.path.set_scale(ratio_x, ratio_y);
        valid
    }

    pub fn set_shear(&mut self, x: Real, y: Real) -> bool {
        let mut shear_x = x;
        let mut valid = limit_range(&mut shear_x, SHEAR_MIN, SHEAR_MAX, RANGE_TOLERANCE);
        let mut shear_y = y;
        valid &= limit_range(&mut shear_y, SHEAR_MIN, SHEAR_MAX, RANGE_TOLERANCE);
        self.path.set_shear(shear_x, shear_y);
        valid
    }

    pub fn set_taper_x(&mut self, v: Real) -> bool {
        let mut taper = v;
        let valid = limit_range(&mut taper, TAPER_MIN, TAPER_MAX, RANGE_TOLERANCE);
        self.path.set_taper(taper, self.path.taper_y());
        valid
    }

    pub fn set_taper_y(&mut self, v: Real) -> bool {
        let mut taper = v;
        let valid = limit_range(&mut taper, TAPER_MIN, TAPER_MAX, RANGE_TOLERANCE);
        self.path.set_taper(self.path.taper_x(), taper);
        valid
    }

    pub fn set_taper(&mut self, x: Real, y: Real) -> bool {
        let valid_x = self.set_taper_x(x);
        let valid_y = self.set_taper_y(y);
        valid_x && valid_y
    }

    pub fn set_revolutions(&mut self, r: Real) -> bool {
        let mut revolutions = r;
        let valid = limit_range(&mut revolutions, REV_MIN, REV_MAX, RANGE_TOLERANCE);
        self.path.set_revolutions(revolutions);
        valid
    }

    /// Sets the radius offset. Spheres and straight paths force it to zero;
    /// elsewhere the magnitude is capped by taper and hole size so the tube
    /// cannot cross its own axis.
    pub fn set_radius_offset(&mut self, offset: Real) -> bool {
        // If this is a sphere, just set it to 0 and get out.
        if self.profile.curve() == ProfileKind::HalfCircle
            || self.path.curve() != PathKind::Circle
        {
            self.path.set_radius_offset(0.0);
            return true;
        }

        let mut valid = true;
        let mut radius_offset = offset;
        let taper_y = self.path.taper_y();
        let radius_mag = radius_offset.abs();
        let hole_y_mag = self.path.scale_y().abs();
        let mut taper_y_mag = taper_y.abs();

        // Check to see if the taper effects us.
        if (radius_offset > 0.0 && taper_y < 0.0) || (radius_offset < 0.0 && taper_y > 0.0) {
            // The taper does not help increase the radius offset range.
            taper_y_mag = 0.0;
        }

        let max_radius_mag = 1.0 - hole_y_mag * (1.0 - taper_y_mag) / (1.0 - hole_y_mag);

        // Enforce the maximum magnitude.
        let delta = max_radius_mag - radius_mag;
        if delta < 0.0 {
            radius_offset = if radius_offset < 0.0 {
                -max_radius_mag
            } else {
                max_radius_mag
            };
            valid = approx_zero(delta, 0.1);
        }

        self.path.set_radius_offset(radius_offset);
        valid
    }

    /// Sets the skew, capped so the tube's revolutions still fit beside
    /// each other.
    pub fn set_skew(&mut self, skew_value: Real) -> bool {
        let mut valid = true;

        let mut skew = skew_value.clamp(SKEW_MIN, SKEW_MAX);
        let skew_mag = skew.abs();
        let revolutions = self.path.revolutions();
        let scale_x = self.path.scale_x();
        let mut min_skew_mag = 1.0 - 1.0 / (revolutions * scale_x + 1.0);
        // Discontinuity; a revolution of 1 allows skews below 0.5.
        if (revolutions - 1.0).abs() < 0.001 {
            min_skew_mag = 0.0;
        }

        let delta = skew_mag - min_skew_mag;
        if delta < 0.0 {
            skew = if skew < 0.0 { -min_skew_mag } else { min_skew_mag };
            valid = approx_zero(delta, 0.01);
        }

        self.path.set_skew(skew);
        valid
    }

    pub fn set_sculpt(&mut self, sculpt_id: Option<SculptId>, sculpt_type: SculptType) -> bool {
        self.sculpt_id = sculpt_id;
        self.sculpt_type = sculpt_type;
        true
    }

    /// Dry-runs every setter against a scratch block; true when all of
    /// them accept their input unclamped.
    #[allow(clippy::too_many_arguments)]
    pub fn validate(
        prof_byte: u8,
        prof_begin: Real,
        prof_end: Real,
        hollow: Real,
        path_byte: u8,
        path_begin: Real,
        path_end: Real,
        scale_x: Real,
        scale_y: Real,
        shear_x: Real,
        shear_y: Real,
        twist_end: Real,
        twist_begin: Real,
        radius_offset: Real,
        taper_x: Real,
        taper_y: Real,
        revolutions: Real,
        skew: Real,
    ) -> bool {
        let mut test = VolumeParams::default();
        test.set_type(prof_byte, path_byte)
            && test.set_begin_and_end_s(prof_begin, prof_end)
            && test.set_begin_and_end_t(path_begin, path_end)
            && test.set_hollow(hollow)
            && test.set_twist_begin(twist_begin)
            && test.set_twist_end(twist_end)
            && test.set_ratio(scale_x, scale_y)
            && test.set_shear(shear_x, shear_y)
            && test.set_taper(taper_x, taper_y)
            && test.set_revolutions(revolutions)
            && test.set_radius_offset(radius_offset)
            && test.set_skew(skew)
    }

    /// Narrows the profile cut to a sub-range of its current span.
    pub fn reduce_s(&mut self, begin: Real, end: Real) {
        let mut begin = begin.clamp(0.0, 1.0);
        let mut end = end.clamp(0.0, 1.0);
        if begin > end {
            std::mem::swap(&mut begin, &mut end);
        }
        let a = self.profile.begin();
        let b = self.profile.end();
        self.profile.set_begin(a + begin * (b - a));
        self.profile.set_end(a + end * (b - a));
    }

    /// Narrows the path cut to a sub-range of its current span.
    pub fn reduce_t(&mut self, begin: Real, end: Real) {
        let mut begin = begin.clamp(0.0, 1.0);
        let mut end = end.clamp(0.0, 1.0);
        if begin > end {
            std::mem::swap(&mut begin, &mut end);
        }
        let a = self.path.begin();
        let b = self.path.end();
        self.path.set_begin(a + begin * (b - a));
        self.path.set_end(a + end * (b - a));
    }

    /// Conservative convexity check used by collision approximation.
    pub fn is_convex(&self) -> bool {
        // A cut wedge this narrow (or narrower) is treated as convex.
        const MIN_CONCAVE_PROFILE_WEDGE: Real = 0.125; // 1/8 unity
        const MIN_CONCAVE_PATH_WEDGE: Real = 0.111111; // 1/9 unity

        let path_length = self.path.end() - self.path.begin();
        let hollow = self.profile.hollow();

        let path_type = self.path.curve();
        if path_length > MIN_CONCAVE_PATH_WEDGE
            && (self.path.twist_end() != self.path.twist_begin()
                || (hollow > 0.0 && path_type != PathKind::Line))
        {
            // twist along a "not too short" path is concave
            return false;
        }

        let profile_length = self.profile.end() - self.profile.begin();
        let same_hole = hollow == 0.0 || self.profile.hole() == HoleKind::Same;

        let mut min_profile_wedge = MIN_CONCAVE_PROFILE_WEDGE;
        let profile_type = self.profile.curve();
        if profile_type == ProfileKind::HalfCircle {
            // it is a sphere and spheres get twice the minimum profile wedge
            min_profile_wedge = 2.0 * MIN_CONCAVE_PROFILE_WEDGE;
        }

        let convex_profile =
            // trivially convex
            ((profile_length == 1.0 || profile_length <= 0.5) && hollow == 0.0)
            // effectively convex (even when hollow)
            || (profile_length <= min_profile_wedge && same_hole);

        if !convex_profile {
            // profile is concave
            return false;
        }

        if path_type == PathKind::Line {
            // straight paths with convex profile
            return true;
        }

        let concave_path = path_length < 1.0 && path_length > 0.5;
        if concave_path {
            return false;
        }

        // we're left with spheres, toroids and tubes
        if profile_type == ProfileKind::HalfCircle {
            // at this stage all spheres must be convex
            return true;
        }

        // it's a toroid or tube
        path_length <= MIN_CONCAVE_PATH_WEDGE
    }
}
