//! 3D rotation matrices and the rotation group of the cube.
//!
//! A cube has 24 proper rotations (the chiral octahedral group). Rather than
//! listing them by hand, the group is generated by closing the three quarter
//! turns about the x, y and z axes under multiplication, which also gives each
//! element a readable label such as `Rx(90)*Ry(90)`.

use std::collections::VecDeque;
use std::fmt;
use std::ops::Mul;

use rustc_hash::FxHashSet;

use crate::error::PuzzleError;
use crate::pieces::Coord;

/// Order of the rotation group of the cube.
pub const OCTAHEDRAL_ORDER: usize = 24;

/// Index of the orientation used for the first piece when breaking symmetry.
pub const CANONICAL_ROTATION: usize = 0;

/// Label of the identity rotation.
pub const IDENTITY_LABEL: &str = "Id";

/// A 3x3 integer matrix, stored row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotationMatrix([[i32; 3]; 3]);

impl RotationMatrix {
    pub const IDENTITY: Self = Self([[1, 0, 0], [0, 1, 0], [0, 0, 1]]);

    /// Quarter turn about x: y -> z, z -> -y.
    pub const ROT_X_90: Self = Self([[1, 0, 0], [0, 0, -1], [0, 1, 0]]);

    /// Quarter turn about y: x -> -z, z -> x.
    pub const ROT_Y_90: Self = Self([[0, 0, 1], [0, 1, 0], [-1, 0, 0]]);

    /// Quarter turn about z: x -> y, y -> -x.
    pub const ROT_Z_90: Self = Self([[0, -1, 0], [1, 0, 0], [0, 0, 1]]);

    pub const fn from_rows(rows: [[i32; 3]; 3]) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[[i32; 3]; 3] {
        &self.0
    }

    pub fn transpose(&self) -> Self {
        let m = &self.0;
        Self([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    pub fn trace(&self) -> i32 {
        self.0[0][0] + self.0[1][1] + self.0[2][2]
    }

    pub fn determinant(&self) -> i32 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// True for an orthogonal matrix with entries in {-1, 0, 1} and determinant +1.
    pub fn is_proper_rotation(&self) -> bool {
        let unit_entries = self.0.iter().flatten().all(|v| (-1..=1).contains(v));
        unit_entries && *self * self.transpose() == Self::IDENTITY && self.determinant() == 1
    }

    /// Rotates a lattice vector (`M * v`).
    #[inline]
    pub fn apply(&self, (x, y, z): Coord) -> Coord {
        let m = &self.0;
        (
            m[0][0] * x + m[0][1] * y + m[0][2] * z,
            m[1][0] * x + m[1][1] * y + m[1][2] * z,
            m[2][0] * x + m[2][1] * y + m[2][2] * z,
        )
    }

    /// Describes how the basis is remapped, one signed axis per row, e.g. `(+x, -z, +y)`.
    pub fn signed_permutation(&self) -> String {
        const AXES: [char; 3] = ['x', 'y', 'z'];
        let parts: Vec<String> = self
            .0
            .iter()
            .flat_map(|row| {
                row.iter().enumerate().filter_map(|(col, &v)| match v {
                    1 => Some(format!("+{}", AXES[col])),
                    -1 => Some(format!("-{}", AXES[col])),
                    _ => None,
                })
            })
            .collect();
        format!("({})", parts.join(", "))
    }
}

impl Mul for RotationMatrix {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [[0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.0[i][k] * rhs.0[k][j]).sum();
            }
        }
        Self(out)
    }
}

/// Conjugacy class of a cube rotation, in Schoenflies notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SymmetryClass {
    #[display("E")]
    Identity,
    /// 90 degree turn about a face axis.
    #[display("C4")]
    Quarter,
    /// 120 degree turn about a body diagonal.
    #[display("C3")]
    Third,
    /// 180 degree turn about a face axis.
    #[display("C2")]
    FaceHalf,
    /// 180 degree turn about an edge axis.
    #[display("C2'")]
    EdgeHalf,
    #[display("?")]
    Unknown,
}

impl SymmetryClass {
    /// Classifies a rotation by its trace (`1 + 2 cos θ`).
    pub fn classify(matrix: &RotationMatrix) -> Self {
        match matrix.trace() {
            3 => Self::Identity,
            1 => Self::Quarter,
            0 => Self::Third,
            -1 => {
                // face-axis half turns keep their axis fixed, so one diagonal entry is +1
                let rows = matrix.rows();
                if (0..3).any(|i| rows[i][i] == 1) {
                    Self::FaceHalf
                } else {
                    Self::EdgeHalf
                }
            }
            _ => Self::Unknown,
        }
    }
}

/// A rotation together with the generator path that produced it.
#[derive(Debug, Clone)]
pub struct NamedRotation {
    pub matrix: RotationMatrix,
    pub label: String,
    pub signed_permutation: String,
    pub symmetry_class: SymmetryClass,
}

impl NamedRotation {
    pub fn new(matrix: RotationMatrix, label: impl Into<String>) -> Self {
        Self {
            matrix,
            label: label.into(),
            signed_permutation: matrix.signed_permutation(),
            symmetry_class: SymmetryClass::classify(&matrix),
        }
    }

    pub fn identity() -> Self {
        Self::new(RotationMatrix::IDENTITY, IDENTITY_LABEL)
    }

    /// Element-wise comparison of the underlying matrices; labels are ignored.
    pub fn same_rotation(&self, other: &RotationMatrix) -> bool {
        self.matrix == *other
    }

    /// Right-multiplies by `generator`, composing the labels.
    fn then(&self, generator: &NamedRotation) -> Self {
        let label = if self.label == IDENTITY_LABEL {
            generator.label.clone()
        } else if generator.label == IDENTITY_LABEL {
            self.label.clone()
        } else {
            format!("{}*{}", self.label, generator.label)
        };
        Self::new(self.matrix * generator.matrix, label)
    }
}

impl fmt::Display for NamedRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.label, self.signed_permutation, self.symmetry_class
        )
    }
}

/// The quarter turns that generate the cube's rotation group.
pub fn generators() -> [NamedRotation; 3] {
    [
        NamedRotation::new(RotationMatrix::ROT_X_90, "Rx(90)"),
        NamedRotation::new(RotationMatrix::ROT_Y_90, "Ry(90)"),
        NamedRotation::new(RotationMatrix::ROT_Z_90, "Rz(90)"),
    ]
}

/// An indexed, closed set of rotations.
///
/// Index 0 is always the identity; the remaining order is the breadth-first
/// discovery order, which is what placement row ids are derived from.
#[derive(Debug, Clone)]
pub struct RotationGroup {
    rotations: Vec<NamedRotation>,
}

impl RotationGroup {
    /// The 24 proper rotations of the cube.
    pub fn octahedral() -> Result<Self, PuzzleError> {
        Self::from_generators(&generators(), OCTAHEDRAL_ORDER)
    }

    /// Closes `generators` under right multiplication, starting from the identity.
    ///
    /// Fails if the closure does not have exactly `expected` elements, which
    /// points at a defective generator set.
    pub fn from_generators(
        generators: &[NamedRotation],
        expected: usize,
    ) -> Result<Self, PuzzleError> {
        let identity = NamedRotation::identity();
        let mut seen: FxHashSet<RotationMatrix> = FxHashSet::default();
        seen.insert(identity.matrix);

        let mut rotations = vec![identity.clone()];
        let mut queue = VecDeque::from([identity]);

        while let Some(current) = queue.pop_front() {
            for generator in generators {
                let next = current.then(generator);
                if seen.insert(next.matrix) {
                    rotations.push(next.clone());
                    queue.push_back(next);
                }
            }
        }

        if rotations.len() != expected {
            return Err(PuzzleError::IncompleteRotationGroup {
                found: rotations.len(),
                expected,
            });
        }

        log::debug!("rotation group closed with {} elements", rotations.len());
        Ok(Self { rotations })
    }

    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NamedRotation> {
        self.rotations.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedRotation> {
        self.rotations.iter()
    }

    /// Finds a rotation by its generator-path label.
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.rotations.iter().position(|r| r.label == label)
    }

    /// Checks that multiplying any element by `generator` stays inside the group.
    pub fn is_closed_under(&self, generator: &RotationMatrix) -> bool {
        self.rotations.iter().all(|r| {
            let product = r.matrix * *generator;
            self.rotations.iter().any(|s| s.same_rotation(&product))
        })
    }
}

impl<'a> IntoIterator for &'a RotationGroup {
    type Item = &'a NamedRotation;
    type IntoIter = std::slice::Iter<'a, NamedRotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.rotations.iter()
    }
}
