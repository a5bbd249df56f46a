//! Point grid a volume is generated into before faces are split off.

use crate::errors::VolumeError;
use crate::float_types::Real;
use nalgebra::Point3;

/// Hard cap on generated mesh points. Tessellation requests beyond this
/// are corrupt or hostile.
pub const MAX_MESH_POINTS: usize = 1 << 20;

/// Row-major grid of swept profile points: one row per path sample, one
/// column per profile point.
#[derive(Debug, Clone, Default)]
pub struct MeshGrid {
    size_s: usize,
    size_t: usize,
    points: Vec<Point3<Real>>,
}

impl MeshGrid {
    /// Allocates a `path_samples` x `profile_points` grid of origin points,
    /// refusing sizes over [`MAX_MESH_POINTS`].
    pub fn resize(&mut self, path_samples: usize, profile_points: usize) -> Result<(), VolumeError> {
        let total = path_samples
            .checked_mul(profile_points)
            .filter(|&n| n <= MAX_MESH_POINTS)
            .ok_or(VolumeError::MeshGridTooLarge {
                size_s: path_samples,
                size_t: profile_points,
            })?;
        self.size_s = path_samples;
        self.size_t = profile_points;
        self.points.clear();
        self.points.resize(total, Point3::origin());
        Ok(())
    }

    /// Path samples (rows).
    pub const fn size_s(&self) -> usize {
        self.size_s
    }

    /// Profile points per row (columns).
    pub const fn size_t(&self) -> usize {
        self.size_t
    }

    pub const fn len(&self) -> usize {
        self.points.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, path_idx: usize, profile_idx: usize) -> &Point3<Real> {
        &self.points[path_idx * self.size_t + profile_idx]
    }

    pub fn point_mut(&mut self, path_idx: usize, profile_idx: usize) -> &mut Point3<Real> {
        &mut self.points[path_idx * self.size_t + profile_idx]
    }

    /// Flat row-major view; index `path_idx * size_t + profile_idx`.
    pub fn points(&self) -> &[Point3<Real>] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Point3<Real>] {
        &mut self.points
    }
}
