use nalgebra::{Matrix2, Matrix3, Vector3};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LatticeError {
    #[error(
        "cell lengths and angles are not jointly realizable: \
         1 - cos^2(alpha) - cos^2(beta) - cos^2(gamma) \
         + 2 cos(alpha) cos(beta) cos(gamma) = {radicand} < 0 \
         (angles are in radians)"
    )]
    InfeasibleCell { radicand: f64 },
}

/// Convert cell parameters `a, b, c, alpha, beta, gamma` (angles in radians)
/// to lattice vectors `[a1; a2; a3]` stored as matrix rows, following the
/// standard fractional-coordinate convention.
pub fn translate_to_vector(
    a: f64,
    b: f64,
    c: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
) -> Result<Matrix3<f64>, LatticeError> {
    let (cg, sg) = (gamma.cos(), gamma.sin());
    let ca = alpha.cos();
    let cb = beta.cos();
    let cy = (ca - cb * cg) / sg;
    let radicand = 1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg;
    if radicand < 0.0 {
        return Err(LatticeError::InfeasibleCell { radicand });
    }
    let cz = radicand.sqrt() / sg;
    Ok(Matrix3::new(
        a,
        0.0,
        0.0,
        b * cg,
        b * sg,
        0.0,
        c * cb,
        c * cy,
        c * cz,
    ))
}

/// Convert cell parameters `a, b, theta` (radians) to 2D lattice vectors
/// `[a1; a2]` stored as matrix rows.
pub fn translate_to_vector_2d(a: f64, b: f64, theta: f64) -> Matrix2<f64> {
    Matrix2::new(a, 0.0, b * theta.cos(), b * theta.sin())
}

/// Simulation-box parameters `Lx, Ly, Lz, xy, xz, yz` for a right-handed
/// triclinic cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxParameters {
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,
    pub xy: f64,
    pub xz: f64,
    pub yz: f64,
}

/// Convert lattice vectors (matrix rows) to box parameters.
pub fn convert_to_box(lattice_vectors: &Matrix3<f64>) -> BoxParameters {
    let v0 = Vector3::new(
        lattice_vectors[(0, 0)],
        lattice_vectors[(0, 1)],
        lattice_vectors[(0, 2)],
    );
    let v1 = Vector3::new(
        lattice_vectors[(1, 0)],
        lattice_vectors[(1, 1)],
        lattice_vectors[(1, 2)],
    );
    let v2 = Vector3::new(
        lattice_vectors[(2, 0)],
        lattice_vectors[(2, 1)],
        lattice_vectors[(2, 2)],
    );
    let lx = v0.norm();
    let a2x = v0.dot(&v1) / lx;
    let ly = (v1.dot(&v1) - a2x * a2x).sqrt();
    let xy = a2x / ly;
    let v0xv1 = v0.cross(&v1);
    let lz = v2.dot(&v0xv1) / v0xv1.norm();
    let a3x = v0.dot(&v2) / lx;
    let xz = a3x / lz;
    let yz = (v1.dot(&v2) - a2x * a3x) / (ly * lz);
    BoxParameters {
        lx,
        ly,
        lz,
        xy,
        xz,
        yz,
    }
}

/// Convert box parameters back to lattice vectors (matrix rows).
pub fn convert_to_vectors(box_params: &BoxParameters) -> Matrix3<f64> {
    let BoxParameters {
        lx,
        ly,
        lz,
        xy,
        xz,
        yz,
    } = *box_params;
    Matrix3::new(
        lx,
        0.0,
        0.0,
        xy * ly,
        ly,
        0.0,
        xz * lz,
        yz * lz,
        lz,
    )
}

/// Unit-cell volume via the scalar triple product.
pub fn volume(lattice_vectors: &Matrix3<f64>) -> f64 {
    lattice_vectors.determinant().abs()
}

/// Unit-cell area of a 2D lattice.
pub fn area(lattice_vectors: &Matrix2<f64>) -> f64 {
    lattice_vectors.determinant().abs()
}

/// Convert fractional coordinates to cartesian coordinates for the given
/// lattice vectors (matrix rows).
pub fn fractional_to_cartesian(
    basis_vectors: &[Vector3<f64>],
    lattice_vectors: &Matrix3<f64>,
) -> Vec<Vector3<f64>> {
    basis_vectors
        .iter()
        .map(|p| lattice_vectors.transpose() * p)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn matrix_approx_equal(a: &Matrix3<f64>, b: &Matrix3<f64>) -> bool {
        (a - b).abs().max() < TOLERANCE
    }

    #[test]
    fn triclinic_cell_matches_reference_values() {
        let m = translate_to_vector(1.0, 2.0, 3.0, 0.5, 0.75, 1.0).unwrap();
        let reference = Matrix3::new(
            1.0, 0.0, 0.0, 1.08060461, 1.68294197, 0.0, 2.19506661, 1.7193084, 1.10709584,
        );
        assert!(matrix_approx_equal(&m, &reference));
    }

    #[test]
    fn infeasible_angles_raise_geometry_error() {
        let result = translate_to_vector(1.0, 1.0, 1.0, 0.2, 0.2, 3.0);
        assert!(matches!(result, Err(LatticeError::InfeasibleCell { .. })));
    }

    #[test]
    fn right_angles_give_a_diagonal_cell() {
        use std::f64::consts::FRAC_PI_2;
        let m = translate_to_vector(2.0, 3.0, 4.0, FRAC_PI_2, FRAC_PI_2, FRAC_PI_2).unwrap();
        assert!(matrix_approx_equal(
            &m,
            &Matrix3::new(2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0)
        ));
    }

    #[test]
    fn box_parameters_round_trip() {
        let m = Matrix3::new(
            1.0, 0.0, 0.0, 1.08060461, 1.68294197, 0.0, 2.19506661, 1.7193084, 1.10709584,
        );
        let round_tripped = convert_to_vectors(&convert_to_box(&m));
        assert!(matrix_approx_equal(&m, &round_tripped));
    }

    #[test]
    fn volume_is_the_absolute_triple_product() {
        let m = Matrix3::new(2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0);
        assert!((volume(&m) - 24.0).abs() < TOLERANCE);
    }

    #[test]
    fn area_of_a_sheared_cell_ignores_the_shear() {
        let m = Matrix2::new(2.0, 0.0, 1.3, 3.0);
        assert!((area(&m) - 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn two_dimensional_cell_uses_theta() {
        use std::f64::consts::FRAC_PI_2;
        let m = translate_to_vector_2d(1.0, 2.0, FRAC_PI_2);
        assert!((m[(1, 0)]).abs() < TOLERANCE);
        assert!((m[(1, 1)] - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn fractional_to_cartesian_with_identity_cell_is_identity() {
        let cell = Matrix3::identity();
        let fractional = vec![Vector3::new(0.25, 0.5, 0.75)];
        let cartesian = fractional_to_cartesian(&fractional, &cell);
        assert!((cartesian[0] - fractional[0]).norm() < TOLERANCE);
    }
}
