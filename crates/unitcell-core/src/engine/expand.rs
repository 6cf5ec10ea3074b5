use nalgebra::{UnitQuaternion, Vector2, Vector3};
use tracing::warn;

use super::error::ExpandError;
use super::warnings::ExpansionWarning;
use crate::core::symmetry::operator::{PlaneOperator, SymmetryOperator};

/// Two wrapped fractional positions closer than this are the same particle.
pub const DISTANCE_TOLERANCE: f64 = 1e-6;

const DEFAULT_TYPE: &str = "A";

/// Wrap each fractional coordinate into `[0, 1)`.
///
/// A single correction step suffices: symmetry-operator translations keep
/// coordinates within `[-1, 2)`.
pub fn wrap(position: &Vector3<f64>) -> Vector3<f64> {
    position.map(|c| {
        if c >= 1.0 {
            c - 1.0
        } else if c < 0.0 {
            c + 1.0
        } else {
            c
        }
    })
}

/// Expansion controls; the defaults reproduce the plain position-only orbit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandOptions {
    /// The caller asserts that the base set is already a complete orbit;
    /// fail with [`ExpandError::IncompleteBasis`] if expansion disagrees.
    pub require_complete: bool,
    /// Transport orientations through the proper rotations of the group.
    pub propagate_orientation: bool,
}

/// Result of a 3D orbit expansion. Row `i` of `positions`, `type_labels`,
/// and `orientations` (when present) always refer to the same particle.
#[derive(Debug, Clone)]
pub struct BasisExpansion {
    pub positions: Vec<Vector3<f64>>,
    pub type_labels: Vec<String>,
    pub orientations: Option<Vec<UnitQuaternion<f64>>>,
    pub warnings: Vec<ExpansionWarning>,
}

/// Result of a plane-group orbit expansion.
#[derive(Debug, Clone)]
pub struct PlaneBasisExpansion {
    pub positions: Vec<Vector2<f64>>,
    pub type_labels: Vec<String>,
    pub orientations: Option<Vec<UnitQuaternion<f64>>>,
    pub warnings: Vec<ExpansionWarning>,
}

/// Expand a base coordinate set into the full orbit under `operators`.
///
/// Operators are applied in table order, the identity conventionally first.
/// Every generated position is wrapped into `[0, 1)^3` and compared against
/// all previously accepted positions by direct Euclidean distance in
/// fractional coordinates (not minimum-image distance); among duplicates,
/// the candidate generated by the lowest-indexed operator wins. Both the
/// distance convention and the first-acceptance order are fixed: tabulated
/// reference structures depend on them.
pub fn expand_basis(
    operators: &[SymmetryOperator],
    base_positions: &[Vector3<f64>],
    base_types: Option<&[String]>,
    base_orientations: Option<&[UnitQuaternion<f64>]>,
    options: ExpandOptions,
) -> Result<BasisExpansion, ExpandError> {
    let n = base_positions.len();
    if let Some(types) = base_types {
        if types.len() != n {
            return Err(ExpandError::TypeCountMismatch {
                expected: n,
                got: types.len(),
            });
        }
    }
    let orientations_in = if options.propagate_orientation {
        let orientations = base_orientations.ok_or(ExpandError::MissingOrientations)?;
        if orientations.len() != n {
            return Err(ExpandError::OrientationCountMismatch {
                expected: n,
                got: orientations.len(),
            });
        }
        Some(orientations)
    } else {
        None
    };

    let type_of = |i: usize| -> String {
        base_types
            .map(|t| t[i].clone())
            .unwrap_or_else(|| DEFAULT_TYPE.to_string())
    };

    let mut positions: Vec<Vector3<f64>> = Vec::new();
    let mut type_labels: Vec<String> = Vec::new();
    let mut orientations: Vec<UnitQuaternion<f64>> = Vec::new();
    let mut reflection_seen = false;
    let mut ambiguous_seen = false;

    for (k, op) in operators.iter().enumerate() {
        let proper = op.is_proper();
        let op_quat = (options.propagate_orientation && proper)
            .then(|| op.rotation_quaternion());
        if options.propagate_orientation && !proper {
            reflection_seen = true;
        }
        for i in 0..n {
            let candidate = wrap(&op.apply(&base_positions[i]));
            let orientation = orientations_in.map(|base| match &op_quat {
                Some(q) => q * base[i],
                None => base[i],
            });
            if k == 0 {
                positions.push(candidate);
                type_labels.push(type_of(i));
                if let Some(q) = orientation {
                    orientations.push(q);
                }
                continue;
            }
            let matches = positions
                .iter()
                .filter(|p| (candidate - *p).norm() <= DISTANCE_TOLERANCE)
                .count();
            if matches == 0 {
                positions.push(candidate);
                type_labels.push(type_of(i));
                if let Some(q) = orientation {
                    orientations.push(q);
                }
            } else if options.propagate_orientation && matches > 1 {
                ambiguous_seen = true;
            }
        }
    }

    let mut warnings = Vec::new();
    if reflection_seen {
        warn!("{}", ExpansionWarning::ReflectionIgnoresOrientation);
        warnings.push(ExpansionWarning::ReflectionIgnoresOrientation);
    }
    if ambiguous_seen {
        warn!("{}", ExpansionWarning::AmbiguousOrientation);
        warnings.push(ExpansionWarning::AmbiguousOrientation);
    }

    if options.require_complete && positions.len() != n {
        return Err(ExpandError::IncompleteBasis {
            expected: n,
            generated: positions.len(),
        });
    }

    Ok(BasisExpansion {
        positions,
        type_labels,
        orientations: orientations_in.map(|_| orientations),
        warnings,
    })
}

/// Plane-group variant of [`expand_basis`].
///
/// The 2D problem is lifted into three dimensions (third coordinate zero,
/// rotations embedded with identity on the z axis) so both dimensionalities
/// share one implementation; orientation transport already happens in the
/// embedded 3D form, exactly as for space groups.
pub fn expand_basis_2d(
    operators: &[PlaneOperator],
    base_positions: &[Vector2<f64>],
    base_types: Option<&[String]>,
    base_orientations: Option<&[UnitQuaternion<f64>]>,
    options: ExpandOptions,
) -> Result<PlaneBasisExpansion, ExpandError> {
    let spatial_ops: Vec<SymmetryOperator> = operators.iter().map(|op| op.to_spatial()).collect();
    let spatial_positions: Vec<Vector3<f64>> = base_positions
        .iter()
        .map(|p| Vector3::new(p[0], p[1], 0.0))
        .collect();
    let expansion = expand_basis(
        &spatial_ops,
        &spatial_positions,
        base_types,
        base_orientations,
        options,
    )?;
    Ok(PlaneBasisExpansion {
        positions: expansion
            .positions
            .iter()
            .map(|p| Vector2::new(p[0], p[1]))
            .collect(),
        type_labels: expansion.type_labels,
        orientations: expansion.orientations,
        warnings: expansion.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symmetry::tables::SymmetryTables;
    use nalgebra::Quaternion;

    fn ops(number: u16) -> &'static [SymmetryOperator] {
        &SymmetryTables::get()
            .space_group(number)
            .unwrap()
            .operators
    }

    fn unit_quat(w: f64, x: f64, y: f64, z: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z))
    }

    #[test]
    fn space_group_220_expands_two_sites_to_96_positions() {
        let base = vec![
            Vector3::new(0.1, 0.12, 0.13),
            Vector3::new(0.14, 0.15, 0.17),
        ];
        let types = vec!["B".to_string(), "A".to_string()];
        let quats = vec![unit_quat(0.0, 0.0, 0.0, 1.0), unit_quat(0.0, 0.0, 1.0, 0.0)];
        let expansion = expand_basis(
            ops(220),
            &base,
            Some(&types),
            Some(&quats),
            ExpandOptions {
                propagate_orientation: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(expansion.positions.len(), 96);
        let expected_types: Vec<String> = ["B", "A"]
            .iter()
            .cycle()
            .take(96)
            .map(|s| s.to_string())
            .collect();
        assert_eq!(expansion.type_labels, expected_types);
        let last = expansion.positions[95];
        assert!((last - Vector3::new(0.61, 0.92, 0.1)).norm() < 1e-6, "{last}");
        let orientations = expansion.orientations.unwrap();
        assert_eq!(orientations.len(), 96);
        // I-43d contains improper operations, which are skipped for
        // orientation transport.
        assert!(
            expansion
                .warnings
                .contains(&ExpansionWarning::ReflectionIgnoresOrientation)
        );
    }

    #[test]
    fn every_returned_coordinate_is_wrapped() {
        let base = vec![Vector3::new(0.9, 0.95, 0.99)];
        let expansion = expand_basis(ops(227), &base, None, None, ExpandOptions::default()).unwrap();
        for p in &expansion.positions {
            for c in p.iter() {
                assert!((0.0..1.0).contains(c), "{c}");
            }
        }
    }

    #[test]
    fn default_type_label_is_a() {
        let base = vec![Vector3::new(0.1, 0.2, 0.3)];
        let expansion = expand_basis(ops(2), &base, None, None, ExpandOptions::default()).unwrap();
        assert_eq!(expansion.positions.len(), 2);
        assert!(expansion.type_labels.iter().all(|t| t == "A"));
    }

    #[test]
    fn special_positions_deduplicate() {
        // The origin is the 16a site of Ia-3d: one position per coset.
        let base = vec![Vector3::new(0.0, 0.0, 0.0)];
        let expansion = expand_basis(ops(230), &base, None, None, ExpandOptions::default()).unwrap();
        assert_eq!(expansion.positions.len(), 16);
    }

    #[test]
    fn expanding_a_complete_orbit_is_idempotent() {
        let base = vec![Vector3::new(0.1, 0.2, 0.3)];
        let first = expand_basis(ops(19), &base, None, None, ExpandOptions::default()).unwrap();
        assert_eq!(first.positions.len(), 4);
        let second = expand_basis(
            ops(19),
            &first.positions,
            None,
            None,
            ExpandOptions {
                require_complete: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(second.positions.len(), first.positions.len());
    }

    #[test]
    fn incomplete_basis_assertion_fails() {
        let base = vec![Vector3::new(0.1, 0.2, 0.3)];
        let err = expand_basis(
            ops(19),
            &base,
            None,
            None,
            ExpandOptions {
                require_complete: true,
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            ExpandError::IncompleteBasis {
                expected: 1,
                generated: 4
            }
        );
    }

    #[test]
    fn mismatched_type_list_is_rejected() {
        let base = vec![Vector3::new(0.1, 0.2, 0.3)];
        let types = vec!["A".to_string(), "B".to_string()];
        let err =
            expand_basis(ops(2), &base, Some(&types), None, ExpandOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ExpandError::TypeCountMismatch {
                expected: 1,
                got: 2
            }
        );
    }

    #[test]
    fn orientation_propagation_requires_quaternions() {
        let base = vec![Vector3::new(0.1, 0.2, 0.3)];
        let err = expand_basis(
            ops(2),
            &base,
            None,
            None,
            ExpandOptions {
                propagate_orientation: true,
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err, ExpandError::MissingOrientations);
    }

    #[test]
    fn rotations_compose_onto_base_orientations() {
        // P4 (group 75): the z-axis 4-fold should rotate orientations about z.
        let base = vec![Vector3::new(0.1, 0.2, 0.3)];
        let quats = vec![UnitQuaternion::identity()];
        let expansion = expand_basis(
            ops(75),
            &base,
            None,
            Some(&quats),
            ExpandOptions {
                propagate_orientation: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(expansion.positions.len(), 4);
        assert!(expansion.warnings.is_empty());
        let orientations = expansion.orientations.unwrap();
        let angles: Vec<f64> = orientations.iter().map(|q| q.angle()).collect();
        assert!((angles[0] - 0.0).abs() < 1e-9);
        assert!(angles[1..].iter().any(|a| (a - std::f64::consts::PI).abs() < 1e-9));
    }

    #[test]
    fn plane_group_9_expands_two_sites_to_16_positions() {
        let tables = SymmetryTables::get();
        let operators = &tables.plane_group(9).unwrap().operators;
        let base = vec![Vector2::new(0.1, 0.12), Vector2::new(0.14, 0.15)];
        let types = vec!["B".to_string(), "A".to_string()];
        let quats = vec![unit_quat(0.0, 0.0, 0.0, 1.0), unit_quat(0.0, 0.0, 1.0, 0.0)];
        let expansion = expand_basis_2d(
            operators,
            &base,
            Some(&types),
            Some(&quats),
            ExpandOptions {
                propagate_orientation: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(expansion.positions.len(), 16);
        let expected_types: Vec<String> = ["B", "A"]
            .iter()
            .cycle()
            .take(16)
            .map(|s| s.to_string())
            .collect();
        assert_eq!(expansion.type_labels, expected_types);
        let last = expansion.positions[15];
        assert!((last - Vector2::new(0.64, 0.35)).norm() < 1e-6, "{last}");
        assert_eq!(expansion.orientations.unwrap().len(), 16);
    }

    #[test]
    fn wrap_folds_coordinates_into_the_unit_interval() {
        let wrapped = wrap(&Vector3::new(-0.25, 1.5, 0.999));
        assert!((wrapped - Vector3::new(0.75, 0.5, 0.999)).norm() < 1e-12);
    }
}
