use bevy::prelude::*;
use fortune_dice::plugins::faces::{
    icosahedron_face_markers, icosahedron_face_normals, icosahedron_vertices, FaceMarker, FaceNormal, FaceNormals,
    FaceTableError, FACE_COUNT, FALLBACK_FACE,
};

#[test]
fn identity_orientation_is_face_one() {
    let table = FaceNormals::icosahedron();
    assert_eq!(table.len(), FACE_COUNT);
    assert_eq!(table.resolve_top_face(Quat::IDENTITY), 1);
}

#[test]
fn flipped_about_x_is_face_fourteen() {
    let table = FaceNormals::icosahedron();
    let flipped = Quat::from_rotation_x(std::f32::consts::PI);
    assert_eq!(table.resolve_top_face(flipped), 14);
}

#[test]
fn rotating_each_face_up_resolves_that_face() {
    let table = FaceNormals::icosahedron();
    for f in table.iter() {
        let up = Quat::from_rotation_arc(f.normal, Vec3::Y);
        assert_eq!(table.resolve_top_face(up), f.face, "face {} rotated up", f.face);
        // Deterministic: same input, same answer.
        assert_eq!(table.resolve_top_face(up), table.resolve_top_face(up));
    }
}

#[test]
fn empty_table_falls_back_to_face_one() {
    let table = FaceNormals::empty();
    assert!(table.is_empty());
    assert_eq!(table.resolve_top_face(Quat::from_rotation_z(1.3)), FALLBACK_FACE);
}

#[test]
fn markers_rebuild_the_builtin_table() {
    let from_markers = FaceNormals::from_markers(&icosahedron_face_markers()).expect("valid markers");
    let builtin = FaceNormals::icosahedron();
    for f in builtin.iter() {
        let n = from_markers.normal(f.face).expect("face present");
        assert!(n.dot(f.normal) > 0.9999, "face {} normal mismatch", f.face);
    }
    let q = Quat::from_euler(EulerRot::XYZ, 0.4, 1.9, -0.7);
    assert_eq!(from_markers.resolve_top_face(q), builtin.resolve_top_face(q));
}

#[test]
fn unrelated_marker_names_are_skipped() {
    let mut markers = icosahedron_face_markers();
    markers.push(FaceMarker { name: "Body".into(), rotation: Quat::IDENTITY });
    markers.push(FaceMarker { name: "Face_x".into(), rotation: Quat::IDENTITY });
    assert!(FaceNormals::from_markers(&markers).is_ok());
}

#[test]
fn validation_rejects_bad_tables() {
    let normals = icosahedron_face_normals();
    let good: Vec<FaceNormal> =
        normals.iter().enumerate().map(|(i, n)| FaceNormal { face: i as u8 + 1, normal: *n }).collect();

    let short = good[..19].to_vec();
    assert_eq!(FaceNormals::new(short).unwrap_err(), FaceTableError::WrongCount { expected: 20, got: 19 });

    let mut dup = good.clone();
    dup[1].face = 1;
    assert_eq!(FaceNormals::new(dup).unwrap_err(), FaceTableError::DuplicateFace { face: 1 });

    let mut out_of_range = good.clone();
    out_of_range[19].face = 21;
    assert_eq!(FaceNormals::new(out_of_range).unwrap_err(), FaceTableError::FaceOutOfRange { face: 21, max: 20 });

    let mut not_unit = good.clone();
    not_unit[3].normal *= 2.0;
    assert!(matches!(FaceNormals::new(not_unit), Err(FaceTableError::NotUnit { face: 4, .. })));

    let mut coincident = good;
    coincident[5].normal = coincident[4].normal;
    assert!(matches!(FaceNormals::new(coincident), Err(FaceTableError::CoincidentNormals { a: 5, b: 6 })));
}

#[test]
fn opposite_faces_are_antiparallel() {
    let table = FaceNormals::icosahedron();
    let pairs = [(1, 14), (2, 13), (3, 12), (4, 11), (5, 15), (6, 18), (7, 19), (8, 20), (9, 16), (10, 17)];
    for (a, b) in pairs {
        let na = table.normal(a).expect("a");
        let nb = table.normal(b).expect("b");
        assert!(na.dot(nb) < -0.999, "faces {a} and {b} should be opposite");
    }
}

#[test]
fn vertices_sit_on_the_circumsphere() {
    for v in icosahedron_vertices(0.5) {
        assert!((v.length() - 0.5).abs() < 1e-5);
    }
}

#[test]
fn degenerate_marker_is_rejected() {
    let mut markers = icosahedron_face_markers();
    markers[3].rotation = Quat::from_xyzw(0.0, 0.0, 0.0, 0.0);
    assert!(matches!(FaceNormals::from_markers(&markers), Err(FaceTableError::NotUnit { face: 4, .. })));

    let mut normals: Vec<FaceNormal> = icosahedron_face_normals()
        .iter()
        .enumerate()
        .map(|(i, n)| FaceNormal { face: i as u8 + 1, normal: *n })
        .collect();
    normals[7].normal = Vec3::NAN;
    assert!(matches!(FaceNormals::new(normals), Err(FaceTableError::NotUnit { face: 8, .. })));
}
