// Top-face resolution for the d20: face normal table, built-in icosahedron asset,
// and the pure "which face points up" query.
use bevy::prelude::*;
use thiserror::Error;

/// Number of faces on the die.
pub const FACE_COUNT: usize = 20;
/// Circumradius of the die (collider + visual).
pub const DIE_RADIUS: f32 = 0.5;
/// Face reported when the normal table is empty.
pub const FALLBACK_FACE: u8 = 1;

const PHI: f32 = 1.618_034;
// Two normals closer than this (cosine) count as the same direction.
const DUPLICATE_DOT: f32 = 0.999;
const UNIT_TOLERANCE: f32 = 1e-3;

// Unscaled icosahedron vertices; face numbering follows ICO_TRIANGLES order.
const ICO_VERTICES: [[f32; 3]; 12] = [
    [-1.0, PHI, 0.0],
    [1.0, PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI],
    [0.0, 1.0, PHI],
    [0.0, -1.0, -PHI],
    [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, -1.0],
    [-PHI, 0.0, 1.0],
];

const ICO_TRIANGLES: [[usize; 3]; FACE_COUNT] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

#[derive(Debug, Error, PartialEq)]
pub enum FaceTableError {
    #[error("expected {expected} face normals, got {got}")]
    WrongCount { expected: usize, got: usize },
    #[error("face {face} is outside 1..={max}")]
    FaceOutOfRange { face: u8, max: usize },
    #[error("face {face} appears more than once")]
    DuplicateFace { face: u8 },
    #[error("normal of face {face} is not unit length (len={length})")]
    NotUnit { face: u8, length: f32 },
    #[error("faces {a} and {b} point in nearly the same direction")]
    CoincidentNormals { a: u8, b: u8 },
}

/// One outward face direction in the die's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceNormal {
    pub face: u8,
    pub normal: Vec3,
}

/// A named marker node of the die asset (local rotation relative to the die root).
#[derive(Debug, Clone)]
pub struct FaceMarker {
    pub name: String,
    pub rotation: Quat,
}

/// Markers read from a die asset. When present at plugin build, the face table is built from them.
#[derive(Resource, Debug, Clone, Default)]
pub struct DieFaceMarkers(pub Vec<FaceMarker>);

/// Immutable face-number -> local normal table.
#[derive(Resource, Debug, Clone, Default)]
pub struct FaceNormals {
    faces: Vec<FaceNormal>,
}

impl FaceNormals {
    /// Validated table; entries are sorted by face number.
    pub fn new(mut faces: Vec<FaceNormal>) -> Result<Self, FaceTableError> {
        if faces.len() != FACE_COUNT {
            return Err(FaceTableError::WrongCount { expected: FACE_COUNT, got: faces.len() });
        }
        faces.sort_by_key(|f| f.face);
        for f in &faces {
            if f.face == 0 || f.face as usize > FACE_COUNT {
                return Err(FaceTableError::FaceOutOfRange { face: f.face, max: FACE_COUNT });
            }
            let length = f.normal.length();
            // NaN lengths (degenerate marker rotations) must fail too.
            if !f.normal.is_finite() || (length - 1.0).abs() > UNIT_TOLERANCE {
                return Err(FaceTableError::NotUnit { face: f.face, length });
            }
        }
        for pair in faces.windows(2) {
            if pair[0].face == pair[1].face {
                return Err(FaceTableError::DuplicateFace { face: pair[0].face });
            }
        }
        for (i, a) in faces.iter().enumerate() {
            for b in &faces[i + 1..] {
                if a.normal.dot(b.normal) > DUPLICATE_DOT {
                    return Err(FaceTableError::CoincidentNormals { a: a.face, b: b.face });
                }
            }
        }
        Ok(Self { faces })
    }

    /// Degraded table: every query answers [`FALLBACK_FACE`].
    pub fn empty() -> Self {
        Self { faces: Vec::new() }
    }

    /// Build from asset markers named `Face_<n>`; the marker's local +Z axis is the face normal.
    pub fn from_markers(markers: &[FaceMarker]) -> Result<Self, FaceTableError> {
        let faces = markers
            .iter()
            .filter_map(|m| {
                let face = m.name.strip_prefix("Face_")?.parse::<u8>().ok()?;
                Some(FaceNormal { face, normal: (m.rotation * Vec3::Z).normalize() })
            })
            .collect();
        Self::new(faces)
    }

    /// Table for the built-in d20.
    pub fn icosahedron() -> Self {
        let faces = icosahedron_face_normals()
            .into_iter()
            .enumerate()
            .map(|(i, normal)| FaceNormal { face: i as u8 + 1, normal })
            .collect();
        // Geometry is fixed, validation only fails if the constants above are edited badly.
        Self::new(faces).unwrap_or_else(|e| {
            warn!("FACES built-in table rejected error={e}");
            Self::empty()
        })
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FaceNormal> {
        self.faces.iter()
    }

    pub fn normal(&self, face: u8) -> Option<Vec3> {
        self.faces.iter().find(|f| f.face == face).map(|f| f.normal)
    }

    /// Face whose rotated normal is most aligned with world up. First entry wins ties.
    pub fn resolve_top_face(&self, orientation: Quat) -> u8 {
        let mut best_dot = f32::NEG_INFINITY;
        let mut best = FALLBACK_FACE;
        for f in &self.faces {
            let dot = (orientation * f.normal).dot(Vec3::Y);
            if dot > best_dot {
                best_dot = dot;
                best = f.face;
            }
        }
        best
    }
}

/// Rotation applied to the raw icosahedron so that face 1 points up in the reference pose.
pub fn icosahedron_alignment() -> Quat {
    Quat::from_rotation_arc(raw_face_direction(0), Vec3::Y)
}

fn raw_face_direction(face_index: usize) -> Vec3 {
    let [a, b, c] = ICO_TRIANGLES[face_index];
    let centroid = Vec3::from(ICO_VERTICES[a]) + Vec3::from(ICO_VERTICES[b]) + Vec3::from(ICO_VERTICES[c]);
    centroid.normalize()
}

/// Aligned vertices at the given circumradius.
pub fn icosahedron_vertices(radius: f32) -> Vec<Vec3> {
    let align = icosahedron_alignment();
    ICO_VERTICES
        .iter()
        .map(|v| align * (Vec3::from(*v).normalize() * radius))
        .collect()
}

/// Triangle index list matching [`icosahedron_vertices`]; triangle `i` is face `i + 1`.
pub fn icosahedron_triangles() -> &'static [[usize; 3]; FACE_COUNT] {
    &ICO_TRIANGLES
}

/// Outward unit normals (aligned frame), index `i` is face `i + 1`.
pub fn icosahedron_face_normals() -> Vec<Vec3> {
    let align = icosahedron_alignment();
    (0..FACE_COUNT).map(|i| (align * raw_face_direction(i)).normalize()).collect()
}

/// Marker nodes as an exported d20 asset would carry them.
pub fn icosahedron_face_markers() -> Vec<FaceMarker> {
    icosahedron_face_normals()
        .into_iter()
        .enumerate()
        .map(|(i, n)| FaceMarker {
            name: format!("Face_{}", i + 1),
            rotation: Quat::from_rotation_arc(Vec3::Z, n),
        })
        .collect()
}
