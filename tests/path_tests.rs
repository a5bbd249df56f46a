mod support;

use primvol::params::{PathKind, PathParams};
use primvol::path::Path;
use primvol::float_types::PI;
use nalgebra::Vector3;

fn generate(params: &PathParams, detail: f64) -> Path {
    let mut path = Path::new(false);
    assert!(path.generate(params, detail, 0, false, 0));
    path
}

#[test]
fn straight_path_is_two_samples() {
    let params = PathParams::default();
    let path = generate(&params, 1.0);

    assert!(path.is_open());
    assert!(!path.is_dynamic());
    assert_eq!(path.len(), 2);

    let first = &path.samples()[0];
    let last = &path.samples()[1];
    assert!(support::approx_eq(first.pos.z, -0.5, 1e-9));
    assert!(support::approx_eq(last.pos.z, 0.5, 1e-9));
    assert_eq!(first.tex_t, 0.0);
    assert_eq!(last.tex_t, 1.0);
    assert_eq!(first.scale, nalgebra::Vector2::new(1.0, 1.0));
}

#[test]
fn twist_adds_samples_and_rotates_about_z() {
    let mut params = PathParams::default();
    params.set_twist_end(0.5);
    let path = generate(&params, 2.0);

    // floor(0.5 * 3.5 * 1.5) + 2
    assert_eq!(path.len(), 4);

    let last = &path.samples()[path.len() - 1];
    let (axis, angle) = last.rot.axis_angle().unwrap();
    assert!(support::approx_eq(axis.z.abs(), 1.0, 1e-9));
    assert!(support::approx_eq(angle, PI * 0.5, 1e-9));
}

#[test]
fn line_scale_ratio_tapers_the_ends() {
    let mut params = PathParams::default();
    params.set_scale(0.5, 1.5);
    let path = generate(&params, 1.0);

    let first = &path.samples()[0];
    let last = &path.samples()[path.len() - 1];

    // Under-unity ratios shrink the far end, over-unity ones the start.
    assert!(support::approx_eq(first.scale.x, 1.0, 1e-9));
    assert!(support::approx_eq(last.scale.x, 0.5, 1e-9));
    assert!(support::approx_eq(first.scale.y, 0.5, 1e-9));
    assert!(support::approx_eq(last.scale.y, 1.0, 1e-9));
}

#[test]
fn taper_scales_along_a_circular_path() {
    let mut params = PathParams::default();
    params.set_curve(PathKind::Circle);
    params.set_scale(1.0, 0.25);
    params.set_taper(0.5, -0.5);
    let path = generate(&params, 1.0);

    let first = &path.samples()[0];
    let last = &path.samples()[path.len() - 1];

    // Positive taper shrinks the end; negative taper shrinks the start.
    assert!(support::approx_eq(first.scale.x, 1.0, 1e-9));
    assert!(support::approx_eq(last.scale.x, 0.5, 1e-9));
    assert!(support::approx_eq(first.scale.y, 0.25 * 0.5, 1e-9));
    assert!(support::approx_eq(last.scale.y, 0.25, 1e-9));
}

#[test]
fn shear_offsets_the_samples() {
    let mut params = PathParams::default();
    params.set_shear(0.25, -0.25);
    let path = generate(&params, 1.0);

    let last = &path.samples()[path.len() - 1];
    assert!(support::approx_eq(last.pos.x, 0.25, 1e-9));
    assert!(support::approx_eq(last.pos.y, -0.25, 1e-9));
}

#[test]
fn circle_path_closes_at_full_cut() {
    let mut params = PathParams::default();
    params.set_curve(PathKind::Circle);
    params.set_scale(1.0, 0.25);
    let path = generate(&params, 1.0);

    assert_eq!(path.len(), 7);
    assert!(!path.is_open());

    // Samples walk a circle of radius 0.5 * (1 - hole_y) in the yz plane.
    for sample in path.samples() {
        let r = (sample.pos.y * sample.pos.y + sample.pos.z * sample.pos.z).sqrt();
        assert!(support::approx_eq(r, 0.375, 1e-6));
        assert!(support::approx_eq(sample.pos.x, 0.0, 1e-9));
    }

    // First and last sample coincide.
    let first = path.samples()[0].pos;
    let last = path.samples()[path.len() - 1].pos;
    assert!((last - first).norm() < 1e-6);
}

#[test]
fn circle_path_cut_is_open_and_snaps_interior_samples() {
    let mut params = PathParams::default();
    params.set_curve(PathKind::Circle);
    params.set_scale(1.0, 0.25);
    params.set_begin(0.25);
    params.set_end(0.75);
    let path = generate(&params, 1.0);

    assert!(path.is_open());
    assert_eq!(path.len(), 5);

    // End samples sit exactly on the cut; interior ones on the sixths.
    assert_eq!(path.samples()[0].tex_t, 0.25);
    assert!(support::approx_eq(path.samples()[1].tex_t, 2.0 / 6.0, 1e-9));
    assert_eq!(path.samples()[path.len() - 1].tex_t, 0.75);
}

#[test]
fn skew_and_taper_open_the_loop() {
    let mut params = PathParams::default();
    params.set_curve(PathKind::Circle);
    params.set_scale(1.0, 0.25);

    params.set_skew(0.3);
    assert!(generate(&params, 1.0).is_open());

    params.set_skew(0.0);
    params.set_taper(0.0, 0.5);
    assert!(generate(&params, 1.0).is_open());

    params.set_taper(0.0, 0.0);
    params.set_radius_offset(0.25);
    assert!(generate(&params, 1.0).is_open());
}

#[test]
fn revolutions_multiply_the_sample_count() {
    let mut params = PathParams::default();
    params.set_curve(PathKind::Circle);
    params.set_scale(1.0, 0.25);
    params.set_revolutions(2.0);
    let path = generate(&params, 1.0);

    // Twice the sides of a single revolution.
    assert_eq!(path.len(), 13);
}

#[test]
fn circle2_flattens_into_a_ribbon() {
    let mut params = PathParams::default();
    params.set_curve(PathKind::Circle2);
    let path = generate(&params, 1.0);

    assert!(!path.is_open());
    for (i, sample) in path.samples().iter().enumerate() {
        let expected = if i % 2 == 0 { 0.5 } else { -0.5 };
        assert_eq!(sample.pos.x, expected);
    }
}

#[test]
fn test_path_has_five_samples() {
    let mut params = PathParams::default();
    params.set_curve(PathKind::Test);
    let path = generate(&params, 1.0);
    assert_eq!(path.len(), 5);
}

#[test]
fn dynamic_path_seeds_defaults() {
    let mut path = Path::new(true);
    assert!(path.is_dynamic());
    assert!(path.generate(&PathParams::default(), 1.0, 0, false, 0));

    // The animator hasn't run yet; two identity frames stand in.
    assert_eq!(path.len(), 2);
    assert!(path.is_open());

    path.resize(4);
    assert_eq!(path.len(), 4);
    path.sample_mut(3).pos = nalgebra::Point3::new(0.0, 0.0, 2.0);
    assert_eq!(path.samples()[3].pos.z, 2.0);
}

#[test]
fn differing_twist_forces_open() {
    let mut params = PathParams::default();
    params.set_curve(PathKind::Circle);
    params.set_scale(1.0, 0.25);
    params.set_twist_begin(0.0);
    params.set_twist_end(0.25);
    let path = generate(&params, 1.0);
    assert!(path.is_open());
}

#[test]
fn regenerate_only_when_dirty() {
    let params = PathParams::default();
    let mut path = Path::new(false);
    assert!(path.generate(&params, 1.0, 0, false, 0));
    assert!(!path.generate(&params, 1.0, 0, false, 0));
    path.mark_dirty();
    assert!(path.generate(&params, 1.0, 0, false, 0));
}

#[test]
fn sweep_rotation_carries_the_profile_around() {
    let mut params = PathParams::default();
    params.set_curve(PathKind::Circle);
    params.set_scale(1.0, 0.25);
    let path = generate(&params, 1.0);

    // Half-way around, the frame's z axis is flipped.
    let half = &path.samples()[3];
    assert!(support::approx_eq(half.tex_t, 0.5, 1e-9));
    let spun = half.rot * Vector3::z();
    assert!(support::approx_eq(spun.z, -1.0, 1e-6));
}
