//! Procedural volume meshing.
//!
//! A volume is described by a small parameter block: a 2-D cross-section
//! (the profile) swept along a 3-D curve (the path), with cut, hollow,
//! twist, taper and skew knobs, or alternatively a sculpt map that
//! supplies vertex positions directly. This crate turns those parameters
//! into triangle meshes at a chosen level of detail and answers
//! line-segment queries against the result.
//!
//! # Features
//! - **f64**: use f64 as Real (default)
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **image-io**: decode sculpt maps from image files
//!
//! ```
//! use primvol::{Volume, VolumeParams};
//!
//! let params = VolumeParams::cube();
//! let volume = Volume::new(params, 1.0).unwrap();
//! assert_eq!(volume.num_faces(), 6);
//! ```

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod params;
pub mod grid;
pub mod profile;
pub mod path;
pub mod face;
pub mod volume;
pub mod indexer;
pub mod intersect;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::VolumeError;
pub use face::{VertexData, VolumeFace};
pub use params::{
    HoleKind, PathKind, PathParams, ProfileKind, ProfileParams, SculptId, SculptType, Stitching,
    VolumeParams,
};
pub use volume::{LineHit, Volume};

#[cfg(feature = "image-io")]
pub mod image_io;

use float_types::Real;

/// Lowest level of detail a volume can be generated at.
pub const MIN_LOD: Real = 0.5;

/// Faces per revolution of a circular profile or path at detail 1.
pub const MIN_DETAIL_FACES: Real = 6.0;
