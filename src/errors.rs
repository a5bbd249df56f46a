//! Generation and cleanup errors

/// All the ways volume generation can fail structurally.
///
/// Parameter problems never land here; the setters clamp out-of-range
/// values and report them through their `bool` return instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VolumeError {
    /// The profile/path tessellation would exceed the mesh point cap (2^20).
    #[error("mesh grid of {size_s} path samples x {size_t} profile points exceeds the point cap")]
    MeshGridTooLarge { size_s: usize, size_t: usize },

    /// The triangle index builder produced a different number of indices
    /// than was predicted for the same topology.
    #[error("triangle index build produced {actual} indices, predicted {expected}")]
    IndexCountMismatch { expected: usize, actual: usize },

    /// The whole-volume index list would be larger than the allocation limit.
    #[error("volume needs {required} triangle indices, over the allocation limit")]
    TooManyTriangleIndices { required: usize },

    /// Triangle-soup cleanup removed every triangle as degenerate.
    #[error("no triangles survived cleanup")]
    NoTrianglesAfterCleanup,
}
