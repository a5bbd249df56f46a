//! Test support library
//! Provides parameter builders and helpers shared by the test binaries.
#![allow(dead_code)]

use primvol::float_types::Real;
use primvol::VolumeParams;
use nalgebra::Point3;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// of a point set.
pub fn bounding_box(points: &[Point3<Real>]) -> [Real; 6] {
    let mut bb = [
        Real::MAX,
        Real::MAX,
        Real::MAX,
        Real::MIN,
        Real::MIN,
        Real::MIN,
    ];
    for p in points {
        for i in 0..3 {
            if p[i] < bb[i] {
                bb[i] = p[i];
            }
            if p[i] > bb[i + 3] {
                bb[i + 3] = p[i];
            }
        }
    }
    bb
}

/// Square profile swept along a straight path: the unit cube.
pub fn cube_params() -> VolumeParams {
    VolumeParams::cube()
}

/// Circle profile swept along a straight path.
pub fn cylinder_params() -> VolumeParams {
    let mut params = VolumeParams::default();
    assert!(params.set_type(0x00, 0x10));
    params
}

/// Circle profile swept along a circular path with a 0.25 hole.
pub fn torus_params() -> VolumeParams {
    let mut params = VolumeParams::default();
    assert!(params.set_type(0x00, 0x20));
    assert!(params.set_ratio(1.0, 0.25));
    params
}

/// Half-circle profile swept along a circular path: the sphere.
pub fn sphere_params() -> VolumeParams {
    let mut params = VolumeParams::default();
    assert!(params.set_type(0x05, 0x20));
    params
}

/// Cube with a square hole through it.
pub fn hollow_cube_params(hollow: Real) -> VolumeParams {
    let mut params = cube_params();
    assert!(params.set_hollow(hollow));
    params
}

/// Tightly packed RGB texels where every texel differs from its
/// neighbors; decodes to a tilted, clearly non-degenerate surface.
pub fn gradient_sculpt_data(width: u16, height: u16) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height as usize {
        for x in 0..width as usize {
            data.push((x * 255 / width as usize) as u8);
            data.push((y * 255 / height as usize) as u8);
            data.push(((x + y) * 127 / (width + height) as usize) as u8);
        }
    }
    data
}

/// RGB texels that all decode to the same point in space.
pub fn uniform_sculpt_data(width: u16, height: u16) -> Vec<u8> {
    vec![128; width as usize * height as usize * 3]
}
