//! Scalar selection and the geometric tolerances used across the crate.

// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

// Pi
/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;

// Tau
/// The full circle constant (τ)
#[cfg(feature = "f32")]
pub const TAU: Real = core::f32::consts::TAU;
/// The full circle constant (τ)
#[cfg(feature = "f64")]
pub const TAU: Real = core::f64::consts::TAU;

/// "Effectively zero" threshold for ray-test determinants and other
/// near-degenerate quantities.
pub const APPROX_ZERO: Real = 1e-5;

/// Vertices closer than this are treated as the same point when cleaning
/// up triangle soup.
pub const VERTEX_SLOP: Real = 1e-5;

/// Squared form of [`VERTEX_SLOP`].
pub const VERTEX_SLOP_SQRD: Real = VERTEX_SLOP * VERTEX_SLOP;

/// Linear interpolation: `t = 0` gives `a`, `t = 1` gives `b`.
#[inline]
pub fn lerp(a: Real, b: Real, t: Real) -> Real {
    a + (b - a) * t
}
