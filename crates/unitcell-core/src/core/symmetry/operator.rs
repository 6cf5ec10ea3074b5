use std::fmt;

use nalgebra::{Matrix2, Matrix3, Rotation3, UnitQuaternion, Vector2, Vector3};
use thiserror::Error;

use crate::core::expr::{CoordExpr, ExprParseError};

#[derive(Debug, Error)]
pub enum OperatorParseError {
    #[error("operator triplet '{triplet}' must have {expected} components")]
    WrongComponentCount { triplet: String, expected: usize },
    #[error("component '{component}' of '{triplet}': {source}")]
    Component {
        triplet: String,
        component: String,
        source: ExprParseError,
    },
    #[error("component '{component}' of '{triplet}' uses the z axis in a plane-group operator")]
    SpatialAxisInPlaneOperator { triplet: String, component: String },
}

fn parse_components(triplet: &str, expected: usize) -> Result<Vec<CoordExpr>, OperatorParseError> {
    let parts: Vec<&str> = triplet.split(',').collect();
    if parts.len() != expected {
        return Err(OperatorParseError::WrongComponentCount {
            triplet: triplet.to_string(),
            expected,
        });
    }
    parts
        .into_iter()
        .map(|part| {
            CoordExpr::parse(part).map_err(|source| OperatorParseError::Component {
                triplet: triplet.to_string(),
                component: part.to_string(),
                source,
            })
        })
        .collect()
}

/// A space-group symmetry operation: fractional rotation matrix plus
/// translation vector.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryOperator {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl SymmetryOperator {
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Parse a coordinate triplet such as `-x+1/2,-y,z+1/2`.
    pub fn parse(triplet: &str) -> Result<Self, OperatorParseError> {
        let comps = parse_components(triplet, 3)?;
        let mut rotation = Matrix3::zeros();
        let mut translation = Vector3::zeros();
        for (i, comp) in comps.iter().enumerate() {
            for j in 0..3 {
                rotation[(i, j)] = comp.coeffs[j];
            }
            translation[i] = comp.constant;
        }
        Ok(Self {
            rotation,
            translation,
        })
    }

    /// Apply to a fractional position, without wrapping.
    pub fn apply(&self, position: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * position + self.translation
    }

    /// A proper operation preserves handedness (`det = +1`); improper
    /// operations (reflections, rotoinversions) have `det = -1`.
    pub fn is_proper(&self) -> bool {
        self.rotation.determinant() > 0.0
    }

    pub fn is_identity(&self) -> bool {
        self.rotation == Matrix3::identity() && self.translation == Vector3::zeros()
    }

    /// Quaternion form of the rotation part. Only meaningful for proper
    /// operations.
    pub fn rotation_quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(self.rotation))
    }
}

impl fmt::Display for SymmetryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..3 {
            if i > 0 {
                f.write_str(",")?;
            }
            write_component(
                f,
                &[
                    self.rotation[(i, 0)],
                    self.rotation[(i, 1)],
                    self.rotation[(i, 2)],
                ],
                self.translation[i],
            )?;
        }
        Ok(())
    }
}

/// A plane-group symmetry operation in two dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneOperator {
    pub rotation: Matrix2<f64>,
    pub translation: Vector2<f64>,
}

impl PlaneOperator {
    /// Parse a coordinate pair such as `x+1/2,-y+1/2`.
    pub fn parse(pair: &str) -> Result<Self, OperatorParseError> {
        let comps = parse_components(pair, 2)?;
        let mut rotation = Matrix2::zeros();
        let mut translation = Vector2::zeros();
        for (i, comp) in comps.iter().enumerate() {
            if comp.coeffs[2] != 0.0 {
                return Err(OperatorParseError::SpatialAxisInPlaneOperator {
                    triplet: pair.to_string(),
                    component: pair.split(',').nth(i).unwrap_or("").to_string(),
                });
            }
            for j in 0..2 {
                rotation[(i, j)] = comp.coeffs[j];
            }
            translation[i] = comp.constant;
        }
        Ok(Self {
            rotation,
            translation,
        })
    }

    /// Embed into three dimensions, acting as the identity on the third
    /// axis. The orbit engine operates on the embedded form.
    pub fn to_spatial(&self) -> SymmetryOperator {
        let mut rotation = Matrix3::identity();
        for i in 0..2 {
            for j in 0..2 {
                rotation[(i, j)] = self.rotation[(i, j)];
            }
        }
        SymmetryOperator {
            rotation,
            translation: Vector3::new(self.translation[0], self.translation[1], 0.0),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.rotation == Matrix2::identity() && self.translation == Vector2::zeros()
    }
}

impl fmt::Display for PlaneOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..2 {
            if i > 0 {
                f.write_str(",")?;
            }
            write_component(
                f,
                &[self.rotation[(i, 0)], self.rotation[(i, 1)], 0.0],
                self.translation[i],
            )?;
        }
        Ok(())
    }
}

fn write_component(f: &mut fmt::Formatter<'_>, coeffs: &[f64; 3], constant: f64) -> fmt::Result {
    let names = ['x', 'y', 'z'];
    let mut wrote = false;
    for (j, &coeff) in coeffs.iter().enumerate() {
        if coeff == 0.0 {
            continue;
        }
        if coeff < 0.0 {
            f.write_str("-")?;
        } else if wrote {
            f.write_str("+")?;
        }
        if coeff.abs() != 1.0 {
            write!(f, "{}", format_fraction(coeff.abs()))?;
        }
        write!(f, "{}", names[j])?;
        wrote = true;
    }
    if constant != 0.0 {
        if wrote {
            f.write_str("+")?;
        }
        write!(f, "{}", format_fraction(constant))?;
        wrote = true;
    }
    if !wrote {
        f.write_str("0")?;
    }
    Ok(())
}

fn format_fraction(value: f64) -> String {
    for denominator in [1u32, 2, 3, 4, 6, 8, 12] {
        let scaled = value * f64::from(denominator);
        if (scaled - scaled.round()).abs() < 1e-9 {
            let numerator = scaled.round() as i64;
            return if denominator == 1 {
                format!("{numerator}")
            } else {
                format!("{numerator}/{denominator}")
            };
        }
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_screw_operation() {
        let op = SymmetryOperator::parse("-x+1/2,-y,z+1/2").unwrap();
        assert_eq!(op.rotation[(0, 0)], -1.0);
        assert_eq!(op.translation[0], 0.5);
        assert_eq!(op.translation[2], 0.5);
        assert!(op.is_proper());
    }

    #[test]
    fn improper_operator_is_detected() {
        let mirror = SymmetryOperator::parse("y,x,z").unwrap();
        assert!(!mirror.is_proper());
    }

    #[test]
    fn apply_rotates_and_translates() {
        let op = SymmetryOperator::parse("-y,x,z+1/2").unwrap();
        let p = op.apply(&Vector3::new(0.1, 0.2, 0.3));
        assert!((p - Vector3::new(-0.2, 0.1, 0.8)).norm() < 1e-12);
    }

    #[test]
    fn display_round_trips_triplets() {
        for triplet in ["x,y,z", "-x+1/2,-y,z+1/2", "x-y,x,z", "-y+3/4,x+1/4,z+1/4"] {
            let op = SymmetryOperator::parse(triplet).unwrap();
            assert_eq!(op.to_string(), triplet);
        }
    }

    #[test]
    fn plane_operator_embeds_into_three_dimensions() {
        let op = PlaneOperator::parse("x+1/2,-y+1/2").unwrap();
        let spatial = op.to_spatial();
        assert_eq!(spatial.rotation[(2, 2)], 1.0);
        assert_eq!(spatial.translation[2], 0.0);
        assert_eq!(spatial.rotation[(1, 1)], -1.0);
    }

    #[test]
    fn plane_operator_rejects_z() {
        assert!(PlaneOperator::parse("x,z").is_err());
    }

    #[test]
    fn identity_quaternion_for_identity_rotation() {
        let op = SymmetryOperator::identity();
        let q = op.rotation_quaternion();
        assert!((q.w - 1.0).abs() < 1e-12);
    }
}
