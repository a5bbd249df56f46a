mod support;

use primvol::{SculptId, SculptType, Volume, VolumeParams};

fn sculpt_params(sculpt_type: SculptType) -> VolumeParams {
    let mut params = VolumeParams::default();
    assert!(params.set_type(0x00, 0x20));
    assert!(params.set_sculpt(Some(SculptId([1; 16])), sculpt_type));
    params
}

#[test]
fn sculpted_volume_waits_for_map_data() {
    let volume = Volume::new(sculpt_params(SculptType::PLANE), 1.0).unwrap();

    assert!(volume.params().is_sculpted());
    assert_eq!(volume.sculpt_level(), -2);
    assert!(volume.faces().is_empty());
}

#[test]
fn plane_map_positions_come_from_texels() {
    let mut volume = Volume::new(sculpt_params(SculptType::PLANE), 1.0).unwrap();
    let data = support::gradient_sculpt_data(8, 8);
    volume.sculpt(8, 8, 3, &data, 0, false).unwrap();

    assert_eq!(volume.sculpt_level(), 0);

    // An 8x8 map at the lowest sculpt LOD meshes as a 5x5 grid.
    assert_eq!(volume.path().len(), 5);
    assert_eq!(volume.profile().total(), 5);
    assert_eq!(volume.mesh().len(), 25);

    // One smooth face over the whole grid.
    assert_eq!(volume.faces().len(), 1);
    assert_eq!(volume.face(0).vertices.len(), 25);

    // Grid point (1, 1) reads texel (2, 2).
    let expected_x = (2 * 255 / 8) as f64 / 255.0 - 0.5;
    let expected_y = (2 * 255 / 8) as f64 / 255.0 - 0.5;
    let expected_z = (4 * 127 / 16) as f64 / 255.0 - 0.5;
    let p = volume.mesh().point(1, 1);
    assert!(support::approx_eq(p.x, expected_x, 1e-9));
    assert!(support::approx_eq(p.y, expected_y, 1e-9));
    assert!(support::approx_eq(p.z, expected_z, 1e-9));

    // The gradient increases along both grid axes.
    assert!(volume.mesh().point(0, 0).x < volume.mesh().point(0, 4).x);
    assert!(volume.mesh().point(0, 0).y < volume.mesh().point(4, 0).y);
}

#[test]
fn sphere_stitching_pinches_the_poles() {
    let mut volume = Volume::new(sculpt_params(SculptType::SPHERE), 1.0).unwrap();
    let data = support::gradient_sculpt_data(8, 8);
    volume.sculpt(8, 8, 3, &data, 0, false).unwrap();

    let size_s = volume.path().len();
    let size_t = volume.profile().total();

    // Every point of the top and bottom rows reads the same pole texel.
    for t in 1..size_t {
        assert_eq!(volume.mesh().point(0, t), volume.mesh().point(0, 0));
        assert_eq!(
            volume.mesh().point(size_s - 1, t),
            volume.mesh().point(size_s - 1, 0)
        );
    }
}

#[test]
fn torus_stitching_wraps_the_rows() {
    let mut volume = Volume::new(sculpt_params(SculptType::TORUS), 1.0).unwrap();
    let data = support::gradient_sculpt_data(8, 8);
    volume.sculpt(8, 8, 3, &data, 0, false).unwrap();

    let size_s = volume.path().len();
    let size_t = volume.profile().total();

    // The last row wraps back onto the first.
    for t in 0..size_t {
        assert_eq!(volume.mesh().point(size_s - 1, t), volume.mesh().point(0, t));
    }
}

#[test]
fn cylinder_stitching_wraps_the_columns() {
    let mut volume = Volume::new(sculpt_params(SculptType::CYLINDER), 1.0).unwrap();
    let data = support::gradient_sculpt_data(8, 8);
    volume.sculpt(8, 8, 3, &data, 0, false).unwrap();

    let size_s = volume.path().len();
    let size_t = volume.profile().total();

    // The last column wraps back onto the first; a plane's does not.
    for s in 0..size_s {
        assert_eq!(volume.mesh().point(s, size_t - 1), volume.mesh().point(s, 0));
    }

    let mut plane = Volume::new(sculpt_params(SculptType::PLANE), 1.0).unwrap();
    plane.sculpt(8, 8, 3, &data, 0, false).unwrap();
    assert_ne!(plane.mesh().point(0, size_t - 1), plane.mesh().point(0, 0));
}

#[test]
fn mirror_flips_x_and_reverses_rows() {
    let data = support::gradient_sculpt_data(8, 8);

    let mut plain = Volume::new(sculpt_params(SculptType::PLANE), 1.0).unwrap();
    plain.sculpt(8, 8, 3, &data, 0, false).unwrap();

    let mirrored_type = SculptType::PLANE.with_flags(false, true);
    let mut mirrored = Volume::new(sculpt_params(mirrored_type), 1.0).unwrap();
    mirrored.sculpt(8, 8, 3, &data, 0, false).unwrap();

    let size_s = plain.path().len();
    let size_t = plain.profile().total();

    for s in 0..size_s {
        for t in 0..size_t {
            let m = mirrored.mesh().point(s, t);
            let p = plain.mesh().point(s, size_t - 1 - t);
            assert!(support::approx_eq(m.x, -p.x, 1e-9));
            assert!(support::approx_eq(m.y, p.y, 1e-9));
            assert!(support::approx_eq(m.z, p.z, 1e-9));
        }
    }
}

#[test]
fn blank_data_produces_the_placeholder_sphere() {
    let mut volume = Volume::new(sculpt_params(SculptType::SPHERE), 1.0).unwrap();
    volume.sculpt(0, 0, 0, &[], 0, false).unwrap();

    assert_eq!(volume.sculpt_level(), -1);
    assert!(!volume.faces().is_empty());
    for p in volume.mesh().points() {
        assert!(support::approx_eq(p.coords.norm(), 0.3, 1e-6));
    }
}

#[test]
fn short_data_counts_as_blank() {
    let mut volume = Volume::new(sculpt_params(SculptType::SPHERE), 1.0).unwrap();
    let data = vec![128u8; 10];
    volume.sculpt(8, 8, 3, &data, 3, false).unwrap();
    assert_eq!(volume.sculpt_level(), -1);
}

#[test]
fn featureless_data_produces_the_placeholder_sphere() {
    let mut volume = Volume::new(sculpt_params(SculptType::PLANE), 1.0).unwrap();
    let data = support::uniform_sculpt_data(8, 8);
    volume.sculpt(8, 8, 3, &data, 2, false).unwrap();

    // The data decoded, so the LOD sticks, but the geometry is the
    // placeholder.
    assert_eq!(volume.sculpt_level(), 2);
    for p in volume.mesh().points() {
        assert!(support::approx_eq(p.coords.norm(), 0.3, 1e-6));
    }
}

#[test]
fn oblong_maps_mesh_at_full_detail() {
    let mut volume = Volume::new(sculpt_params(SculptType::PLANE), 1.0).unwrap();
    let data = support::gradient_sculpt_data(16, 8);
    volume.sculpt(16, 8, 3, &data, 1, false).unwrap();

    // 16x8 texels cap the budget at 32 vertices, split 4x8 to match the
    // map's aspect ratio.
    assert_eq!(volume.path().len(), 5);
    assert_eq!(volume.profile().total(), 9);
}

#[test]
fn higher_lod_meshes_more_vertices() {
    let data = support::gradient_sculpt_data(64, 64);

    let mut low = Volume::new(sculpt_params(SculptType::PLANE), 1.0).unwrap();
    low.sculpt(64, 64, 3, &data, 0, false).unwrap();

    let mut high = Volume::new(sculpt_params(SculptType::PLANE), 4.0).unwrap();
    high.sculpt(64, 64, 3, &data, 2, false).unwrap();

    assert!(high.mesh().len() > low.mesh().len());
    assert_eq!(high.sculpt_level(), 2);
}
