use std::f64::consts::FRAC_PI_2;
use std::fmt;

use nalgebra::{Matrix2, Matrix3};
use tracing::warn;

use super::geometry::{LatticeError, translate_to_vector, translate_to_vector_2d};

/// Optional overrides for the 3D cell parameters. Unset fields fall back to
/// the lattice-system defaults (unit lengths, right angles); fields that the
/// system does not use are reported as unused and ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellParams3d {
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub c: Option<f64>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

impl CellParams3d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn a(mut self, value: f64) -> Self {
        self.a = Some(value);
        self
    }

    pub fn b(mut self, value: f64) -> Self {
        self.b = Some(value);
        self
    }

    pub fn c(mut self, value: f64) -> Self {
        self.c = Some(value);
        self
    }

    pub fn alpha(mut self, value: f64) -> Self {
        self.alpha = Some(value);
        self
    }

    pub fn beta(mut self, value: f64) -> Self {
        self.beta = Some(value);
        self
    }

    pub fn gamma(mut self, value: f64) -> Self {
        self.gamma = Some(value);
        self
    }

    /// Fields set in `self` win; unset fields are taken from `fallback`.
    pub(crate) fn overlaid_on(&self, fallback: &Self) -> Self {
        Self {
            a: self.a.or(fallback.a),
            b: self.b.or(fallback.b),
            c: self.c.or(fallback.c),
            alpha: self.alpha.or(fallback.alpha),
            beta: self.beta.or(fallback.beta),
            gamma: self.gamma.or(fallback.gamma),
        }
    }
}

/// Optional overrides for the 2D cell parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellParams2d {
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub theta: Option<f64>,
}

impl CellParams2d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn a(mut self, value: f64) -> Self {
        self.a = Some(value);
        self
    }

    pub fn b(mut self, value: f64) -> Self {
        self.b = Some(value);
        self
    }

    pub fn theta(mut self, value: f64) -> Self {
        self.theta = Some(value);
        self
    }
}

/// The seven 3D lattice systems. Each variant knows its free parameters and
/// maps them onto the general cell constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatticeSystem3d {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Hexagonal,
    Rhombohedral,
    Cubic,
}

impl LatticeSystem3d {
    /// Names of the parameters this system actually uses.
    pub fn free_params(&self) -> &'static [&'static str] {
        match self {
            Self::Triclinic => &["a", "b", "c", "alpha", "beta", "gamma"],
            Self::Monoclinic => &["a", "b", "c", "beta"],
            Self::Orthorhombic => &["a", "b", "c"],
            Self::Tetragonal | Self::Hexagonal => &["a", "c"],
            Self::Rhombohedral => &["a", "alpha"],
            Self::Cubic => &["a"],
        }
    }

    /// Pearson-symbol lattice prefix for this system.
    pub fn pearson_prefix(&self) -> &'static str {
        match self {
            Self::Triclinic => "a",
            Self::Monoclinic => "m",
            Self::Orthorhombic => "o",
            Self::Tetragonal => "t",
            Self::Hexagonal => "hP",
            Self::Rhombohedral => "hR",
            Self::Cubic => "c",
        }
    }

    /// Apply `overrides` to the defaults, returning the effective parameters
    /// together with the names of supplied-but-unused overrides.
    fn resolve(&self, overrides: &CellParams3d) -> (ResolvedCell3d, Vec<&'static str>) {
        let free = self.free_params();
        let mut unused = Vec::new();
        let mut resolved = ResolvedCell3d::default();
        let supplied = [
            ("a", overrides.a),
            ("b", overrides.b),
            ("c", overrides.c),
            ("alpha", overrides.alpha),
            ("beta", overrides.beta),
            ("gamma", overrides.gamma),
        ];
        for (name, value) in supplied {
            let Some(value) = value else { continue };
            if !free.contains(&name) {
                unused.push(name);
                continue;
            }
            match name {
                "a" => resolved.a = value,
                "b" => resolved.b = value,
                "c" => resolved.c = value,
                "alpha" => resolved.alpha = value,
                "beta" => resolved.beta = value,
                "gamma" => resolved.gamma = value,
                _ => unreachable!(),
            }
        }
        (resolved, unused)
    }

    /// Build the lattice vectors (matrix rows) for this system. Unrecognized
    /// overrides are reported via a warning and otherwise ignored.
    pub fn lattice_vectors(&self, overrides: &CellParams3d) -> Result<Matrix3<f64>, LatticeError> {
        let (p, unused) = self.resolve(overrides);
        for name in unused {
            warn!(param = name, lattice_system = %self, "parameter is not used to define this lattice system");
        }
        let sqrt3_half = 3.0_f64.sqrt() / 2.0;
        match self {
            Self::Triclinic => translate_to_vector(p.a, p.b, p.c, p.alpha, p.beta, p.gamma),
            Self::Monoclinic => translate_to_vector(p.a, p.b, p.c, FRAC_PI_2, p.beta, FRAC_PI_2),
            Self::Orthorhombic => Ok(Matrix3::new(
                p.a, 0.0, 0.0, 0.0, p.b, 0.0, 0.0, 0.0, p.c,
            )),
            Self::Tetragonal => Ok(Matrix3::new(
                p.a, 0.0, 0.0, 0.0, p.a, 0.0, 0.0, 0.0, p.c,
            )),
            Self::Hexagonal => Ok(Matrix3::new(
                p.a,
                0.0,
                0.0,
                -0.5 * p.a,
                sqrt3_half * p.a,
                0.0,
                0.0,
                0.0,
                p.c,
            )),
            Self::Rhombohedral => {
                translate_to_vector(p.a, p.a, p.a, p.alpha, p.alpha, p.alpha)
            }
            Self::Cubic => Ok(Matrix3::new(
                p.a, 0.0, 0.0, 0.0, p.a, 0.0, 0.0, 0.0, p.a,
            )),
        }
    }
}

impl fmt::Display for LatticeSystem3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Triclinic => "triclinic",
            Self::Monoclinic => "monoclinic",
            Self::Orthorhombic => "orthorhombic",
            Self::Tetragonal => "tetragonal",
            Self::Hexagonal => "hexagonal",
            Self::Rhombohedral => "rhombohedral",
            Self::Cubic => "cubic",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedCell3d {
    a: f64,
    b: f64,
    c: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
}

impl Default for ResolvedCell3d {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            alpha: FRAC_PI_2,
            beta: FRAC_PI_2,
            gamma: FRAC_PI_2,
        }
    }
}

/// The four 2D lattice systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatticeSystem2d {
    Oblique,
    Rectangular,
    Square,
    Hexagonal,
}

impl LatticeSystem2d {
    pub fn free_params(&self) -> &'static [&'static str] {
        match self {
            Self::Oblique => &["a", "b", "theta"],
            Self::Rectangular => &["a", "b"],
            Self::Square | Self::Hexagonal => &["a"],
        }
    }

    pub fn lattice_vectors(&self, overrides: &CellParams2d) -> Matrix2<f64> {
        let free = self.free_params();
        let mut a = 1.0;
        let mut b = 1.0;
        let mut theta = FRAC_PI_2;
        let supplied = [
            ("a", overrides.a),
            ("b", overrides.b),
            ("theta", overrides.theta),
        ];
        for (name, value) in supplied {
            let Some(value) = value else { continue };
            if !free.contains(&name) {
                warn!(param = name, lattice_system = %self, "parameter is not used to define this lattice system");
                continue;
            }
            match name {
                "a" => a = value,
                "b" => b = value,
                "theta" => theta = value,
                _ => unreachable!(),
            }
        }
        let sqrt3_half = 3.0_f64.sqrt() / 2.0;
        match self {
            Self::Oblique => translate_to_vector_2d(a, b, theta),
            Self::Rectangular => Matrix2::new(a, 0.0, 0.0, b),
            Self::Square => Matrix2::new(a, 0.0, 0.0, a),
            Self::Hexagonal => Matrix2::new(a, 0.0, -0.5 * a, sqrt3_half * a),
        }
    }
}

impl fmt::Display for LatticeSystem2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Oblique => "oblique",
            Self::Rectangular => "rectangular",
            Self::Square => "square",
            Self::Hexagonal => "hexagonal",
        };
        f.write_str(name)
    }
}
