mod support;

use primvol::face::calc_binormal_from_triangle;
use primvol::{Volume, VolumeFace};
use nalgebra::{Point3, Vector2};

#[test]
fn binormal_follows_the_texture_v_axis() {
    // Planar mapping with u along +x and v along +z.
    let binormal = calc_binormal_from_triangle(
        &Point3::new(0.0, 0.0, 0.0),
        &Vector2::new(0.0, 0.0),
        &Point3::new(1.0, 0.0, 0.0),
        &Vector2::new(1.0, 0.0),
        &Point3::new(0.0, 0.0, 1.0),
        &Vector2::new(0.0, 1.0),
    );

    let n = binormal.normalize();
    assert!(support::approx_eq(n.x, 0.0, 1e-6));
    assert!(support::approx_eq(n.y, 0.0, 1e-6));
    assert!(support::approx_eq(n.z, 1.0, 1e-6));
}

#[test]
fn degenerate_texture_mapping_falls_back() {
    let uv = Vector2::new(0.25, 0.25);
    let binormal = calc_binormal_from_triangle(
        &Point3::new(0.0, 0.0, 0.0),
        &uv,
        &Point3::new(1.0, 0.0, 0.0),
        &uv,
        &Point3::new(0.0, 1.0, 0.0),
        &uv,
    );
    assert_eq!(binormal, nalgebra::Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn side_edges_mark_boundaries_and_neighbors() {
    let volume = Volume::new(support::cube_params(), 4.0).unwrap();

    // A 3x3-quad side: interior edges point at a neighbor triangle,
    // boundary edges are -1.
    let side = volume.face(1);
    assert_eq!(side.edge.len(), side.indices.len());
    let triangle_count = (side.indices.len() / 3) as i32;
    let mut boundary = 0;
    for &e in &side.edge {
        assert!(e >= -1 && e < triangle_count);
        if e == -1 {
            boundary += 1;
        }
    }
    assert!(boundary > 0);
    assert!(boundary < side.edge.len());
}

#[test]
fn smooth_barrel_normals_point_outward() {
    let mut volume = Volume::new(support::cylinder_params(), 1.0).unwrap();
    volume.gen_binormals(1);

    let barrel = volume.face(1);
    assert_ne!(barrel.type_mask & VolumeFace::SIDE_MASK, 0);
    assert_eq!(barrel.type_mask & VolumeFace::FLAT_MASK, 0);

    for v in &barrel.vertices {
        // Unit normals, radially aligned, no z component on a straight
        // barrel.
        assert!(support::approx_eq(v.normal.norm(), 1.0, 1e-6));
        assert!(support::approx_eq(v.normal.z, 0.0, 1e-6));
        let radial = nalgebra::Vector2::new(v.position.x, v.position.y).normalize();
        let n = nalgebra::Vector2::new(v.normal.x, v.normal.y);
        assert!(radial.dot(&n) > 0.9);
    }
}

#[test]
fn partial_rebuild_keeps_the_triangulation() {
    let mut volume = Volume::new(support::cube_params(), 1.0).unwrap();
    let before: Vec<u32> = volume.face(1).indices.clone();

    // Same face layout, refreshed vertex data.
    volume.regenerate().unwrap();
    assert_eq!(volume.face(1).indices, before);
}

#[test]
fn face_extents_cover_their_vertices() {
    let volume = Volume::new(support::torus_params(), 1.0).unwrap();

    for face in volume.faces() {
        let [min, max] = face.extents;
        for v in &face.vertices {
            for i in 0..3 {
                assert!(v.position[i] >= min[i] - 1e-9);
                assert!(v.position[i] <= max[i] + 1e-9);
            }
        }
        let center = nalgebra::center(&min, &max);
        assert!((face.center - center).norm() < 1e-9);
    }
}
