mod support;

use primvol::profile::{FACE_OUTER_SIDE_0, FACE_PATH_BEGIN, FACE_PATH_END};
use primvol::{Volume, VolumeFace};

#[test]
fn cube() {
    let volume = Volume::new(support::cube_params(), 1.0).unwrap();

    assert_eq!(volume.num_faces(), 6);
    assert_eq!(volume.faces().len(), 6);
    assert_eq!(volume.profile().total(), 5);
    assert_eq!(volume.path().len(), 2);
    assert_eq!(volume.mesh().len(), 10);
    assert!(!volume.is_unique());

    // Path-begin cap on top, path-end cap on the bottom, flat sides.
    assert!(volume.is_cap(0));
    assert!(volume.is_cap(5));
    assert!(volume.is_flat(1));
    assert_ne!(volume.face(0).type_mask & VolumeFace::TOP_MASK, 0);
    assert_ne!(volume.face(5).type_mask & VolumeFace::BOTTOM_MASK, 0);
    for i in 1..5 {
        let mask = volume.face(i).type_mask;
        assert_ne!(mask & VolumeFace::SIDE_MASK, 0);
        assert_ne!(mask & VolumeFace::FLAT_MASK, 0);
        assert_ne!(mask & VolumeFace::OUTER_MASK, 0);
        assert_eq!(volume.face(i).id, i);
    }

    let mask = volume.face_mask();
    assert_ne!(mask & FACE_PATH_BEGIN, 0);
    assert_ne!(mask & FACE_PATH_END, 0);
    for i in 0..4 {
        assert_ne!(mask & (FACE_OUTER_SIDE_0 << i), 0);
    }

    // Unit box extents.
    let mut points = Vec::new();
    for face in volume.faces() {
        points.extend(face.vertices.iter().map(|v| v.position));
    }
    let bb = support::bounding_box(&points);
    for i in 0..3 {
        assert!(support::approx_eq(bb[i], -0.5, 1e-4));
        assert!(support::approx_eq(bb[i + 3], 0.5, 1e-4));
    }
}

#[test]
fn cube_caps_are_planar_quads() {
    let volume = Volume::new(support::cube_params(), 1.0).unwrap();

    let top = volume.face(0);
    assert_eq!(top.vertices.len(), 4);
    assert_eq!(top.indices.len(), 6);
    for v in &top.vertices {
        assert!(support::approx_eq(v.position.z, 0.5, 1e-4));
        assert!(support::approx_eq(v.normal.z, 1.0, 1e-6));
        // The square profile's corner constant overshoots +-0.5 by a few
        // 1e-7, so the cap UVs need the same slack.
        assert!(v.tex_coord.x > -1e-6 && v.tex_coord.x < 1.0 + 1e-6);
        assert!(v.tex_coord.y > -1e-6 && v.tex_coord.y < 1.0 + 1e-6);
    }
    assert!(top.has_binormals());

    let bottom = volume.face(5);
    assert_eq!(bottom.vertices.len(), 4);
    for v in &bottom.vertices {
        assert!(support::approx_eq(v.position.z, -0.5, 1e-4));
        assert!(support::approx_eq(v.normal.z, -1.0, 1e-6));
    }

    // Cap extents are flat in z.
    assert!(support::approx_eq(top.extents[0].z, 0.5, 1e-4));
    assert!(support::approx_eq(top.extents[1].z, 0.5, 1e-4));
    assert!(support::approx_eq(top.center.z, 0.5, 1e-4));
}

#[test]
fn cube_sides_are_outward_quads() {
    let mut volume = Volume::new(support::cube_params(), 1.0).unwrap();
    volume.gen_binormals(1);

    let side = volume.face(1);
    assert_eq!(side.vertices.len(), 4);
    assert_eq!(side.indices.len(), 6);
    assert_eq!(side.edge.len(), 6);
    assert!(side.has_binormals());

    // Face 1 spans the y = -0.5 wall; its normals point out of the box.
    for v in &side.vertices {
        assert!(support::approx_eq(v.position.y, -0.5, 1e-4));
        assert!(support::approx_eq(v.normal.norm(), 1.0, 1e-6));
        assert!(v.normal.y < -0.9);
        assert!(support::approx_eq(v.binormal.norm(), 1.0, 1e-6));
    }
}

#[test]
fn cube_detail_subdivides_caps_and_sides() {
    let volume = Volume::new(support::cube_params(), 4.0).unwrap();

    // split 2: each profile side carries two extra points, and the line
    // path grows to match.
    assert_eq!(volume.profile().total(), 13);
    assert_eq!(volume.path().len(), 4);

    let top = volume.face(0);
    assert_eq!(top.vertices.len(), 16);
    assert_eq!(top.indices.len(), 54);

    let side = volume.face(1);
    assert_eq!(side.num_s, 4);
    assert_eq!(side.num_t, 4);
    assert_eq!(side.vertices.len(), 16);
}

#[test]
fn cylinder() {
    let volume = Volume::new(support::cylinder_params(), 1.0).unwrap();

    assert_eq!(volume.num_faces(), 3);
    assert_eq!(volume.profile().total(), 7);
    assert_eq!(volume.path().len(), 2);

    // One smooth barrel between two caps.
    assert!(volume.is_cap(0));
    assert!(!volume.is_cap(1));
    assert!(!volume.is_flat(1));
    assert!(volume.is_cap(2));
    assert_eq!(volume.face(1).num_s, 7);
}

#[test]
fn torus() {
    let volume = Volume::new(support::torus_params(), 1.0).unwrap();

    assert_eq!(volume.num_faces(), 1);
    assert!(!volume.path().is_open());
    assert!(!volume.profile().is_open());
    assert_eq!(volume.profile().total(), 7);
    assert_eq!(volume.path().len(), 7);
    assert_eq!(volume.mesh().len(), 49);

    // The tube's cross-section carries the 6-sided fill factor, so the
    // whole thing fits in a slightly padded unit box.
    let bb = support::bounding_box(volume.mesh().points());
    for i in 0..3 {
        assert!(bb[i] >= -0.55);
        assert!(bb[i + 3] <= 0.55);
    }
}

#[test]
fn sphere() {
    let volume = Volume::new(support::sphere_params(), 1.0).unwrap();

    assert_eq!(volume.num_faces(), 1);
    assert!(!volume.path().is_open());
    assert!(!volume.profile().is_open());
    assert_eq!(volume.profile().total(), 6);
    assert_eq!(volume.path().len(), 7);
    assert_eq!(volume.num_triangle_indices(), 180);
}

#[test]
fn hollow_cube_gets_an_inner_wall() {
    let volume = Volume::new(support::hollow_cube_params(0.5), 1.0).unwrap();

    assert_eq!(volume.num_faces(), 7);

    let inner = volume.face(5);
    assert_ne!(inner.type_mask & VolumeFace::INNER_MASK, 0);
    assert_ne!(inner.type_mask & VolumeFace::HOLLOW_MASK, 0);
    // Flat inner walls duplicate their vertex columns.
    assert_eq!(inner.num_s, 10);
    assert_eq!(inner.vertices.len(), 20);

    // Hollow caps are rings without a center vertex.
    let cap = volume.face(0);
    assert_ne!(cap.type_mask & VolumeFace::CAP_MASK, 0);
    assert_eq!(cap.vertices.len(), 10);
    assert_eq!(cap.indices.len(), 8 * 3);
}

#[test]
fn generate_is_idempotent_until_dirty() {
    let mut volume = Volume::new(support::cube_params(), 1.0).unwrap();
    assert!(!volume.generate().unwrap());
    volume.regenerate().unwrap();
    assert_eq!(volume.num_faces(), 6);
    assert_eq!(volume.faces().len(), 6);
}

#[test]
fn flexible_path_volume_is_unique() {
    let mut params = support::cube_params();
    assert!(params.set_type(0x01, 0x80));
    let mut volume = Volume::new(params, 1.0).unwrap();

    assert!(volume.is_unique());
    assert!(volume.path().is_open());
    assert_eq!(volume.path().len(), 2);
    assert_eq!(volume.num_faces(), 6);

    // The animator drives the sample list; faces rebuild afterwards.
    volume.resize_path(4);
    assert!(volume.faces().is_empty());
    for i in 0..4 {
        volume.path_mut().sample_mut(i).pos = nalgebra::Point3::new(0.0, 0.0, i as f64 * 0.25);
    }
    volume.create_volume_faces();
    assert_eq!(volume.faces().len(), 6);
    assert_eq!(volume.face(1).num_t, 4);

    // The mesh grid followed the resized sample list, and the face
    // vertices sit on the animated frames.
    assert_eq!(volume.mesh().len(), 4 * 5);
    let side = volume.face(1);
    let min_z = side.vertices.iter().map(|v| v.position.z).fold(f64::MAX, f64::min);
    let max_z = side.vertices.iter().map(|v| v.position.z).fold(f64::MIN, f64::max);
    assert!(support::approx_eq(min_z, 0.0, 1e-9));
    assert!(support::approx_eq(max_z, 0.75, 1e-9));
}

#[test]
fn line_path_scale_disables_profile_split() {
    let mut params = support::cube_params();
    assert!(params.set_ratio(0.5, 1.0));
    let volume = Volume::new(params, 4.0).unwrap();

    // A scaled straight box keeps the plain 4-corner profile even at
    // high detail.
    assert_eq!(volume.profile().total(), 5);
}
