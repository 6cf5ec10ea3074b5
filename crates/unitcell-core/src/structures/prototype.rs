use std::collections::BTreeMap;
use std::fmt;

use nalgebra::{Matrix3, Vector3};
use thiserror::Error;
use tracing::warn;

use crate::core::lattice::geometry::LatticeError;
use crate::core::lattice::systems::{CellParams3d, LatticeSystem3d};
use crate::core::symmetry::SymmetryError;
use crate::core::wyckoff::{WyckoffError, WyckoffSite, WyckoffTable};
use crate::engine::error::ExpandError;
use crate::engine::expand::{BasisExpansion, ExpandOptions, wrap};
use crate::structures::groups::SpaceGroup;

#[derive(Debug, Error)]
pub enum PrototypeError {
    #[error(transparent)]
    Symmetry(#[from] SymmetryError),
    #[error(transparent)]
    Wyckoff(#[from] WyckoffError),
    #[error(transparent)]
    Lattice(#[from] LatticeError),
    #[error(transparent)]
    Expand(#[from] ExpandError),
    #[error("wyckoff site list '{0}' must be a non-empty string of site letters")]
    InvalidSiteList(String),
    #[error("type list '{0}' must be one type letter per wyckoff site")]
    InvalidTypeList(String),
    #[error("{sites} wyckoff sites but {types} type letters")]
    TypeCountMismatch { sites: usize, types: usize },
    #[error("missing required basis parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),
}

/// Named free-parameter values for the occupied Wyckoff sites, keyed by the
/// site-scoped names `x1, y1, z1, x2, ...` (1-based occurrence order).
#[derive(Debug, Clone, Default)]
pub struct BasisParams {
    values: BTreeMap<String, f64>,
}

impl BasisParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Values in `self` win; missing names are taken from `fallback`.
    pub(crate) fn overlaid_on(&self, fallback: &Self) -> Self {
        let mut merged = fallback.clone();
        for (name, value) in &self.values {
            merged.values.insert(name.clone(), *value);
        }
        merged
    }
}

struct SiteOccurrence {
    letter: char,
    site: &'static WyckoffSite,
    ordinal: usize,
}

/// A crystal structure described by the minimal symmetry-based information:
/// a space group, the occupied Wyckoff sites (repeats mean independently
/// occupied instances of the same site), and a particle type per site.
///
/// Construction resolves the site templates once; [`Self::basis_vectors`]
/// and [`Self::lattice_vectors`] are pure queries that can be called
/// repeatedly with different parameter values.
pub struct Prototype {
    space_group: SpaceGroup,
    sites: Vec<SiteOccurrence>,
    type_by_site: Vec<String>,
    required_params: Vec<String>,
}

impl Prototype {
    /// `wyckoff_sites` is a string of site letters, e.g. `"abcc"` for one
    /// occupied site each at `a` and `b` and two at `c`; `type_by_site`
    /// optionally assigns one type letter per site (default all `A`).
    pub fn new(
        space_group_number: u16,
        wyckoff_sites: &str,
        type_by_site: Option<&str>,
    ) -> Result<Self, PrototypeError> {
        let space_group = SpaceGroup::new(space_group_number)?;
        if wyckoff_sites.is_empty() || !wyckoff_sites.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PrototypeError::InvalidSiteList(wyckoff_sites.to_string()));
        }
        let types: Vec<String> = match type_by_site {
            Some(types) => {
                if !types.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(PrototypeError::InvalidTypeList(types.to_string()));
                }
                if types.chars().count() != wyckoff_sites.chars().count() {
                    return Err(PrototypeError::TypeCountMismatch {
                        sites: wyckoff_sites.chars().count(),
                        types: types.chars().count(),
                    });
                }
                types
                    .chars()
                    .map(|c| c.to_ascii_uppercase().to_string())
                    .collect()
            }
            None => std::iter::repeat_n("A".to_string(), wyckoff_sites.chars().count()).collect(),
        };
        let table = WyckoffTable::get();
        let mut sites = Vec::new();
        let mut required_params = Vec::new();
        for (index, letter) in wyckoff_sites.chars().enumerate() {
            let ordinal = index + 1;
            let site = table.site(space_group_number, letter)?;
            for var in site.free_variables() {
                required_params.push(format!("{var}{ordinal}"));
            }
            sites.push(SiteOccurrence {
                letter: site.letter,
                site,
                ordinal,
            });
        }
        Ok(Self {
            space_group,
            sites,
            type_by_site: types,
            required_params,
        })
    }

    pub fn space_group(&self) -> &SpaceGroup {
        &self.space_group
    }

    pub fn lattice_system(&self) -> LatticeSystem3d {
        self.space_group.lattice_system()
    }

    /// Occupied site letters, in occurrence order.
    pub fn site_letters(&self) -> String {
        self.sites.iter().map(|s| s.letter).collect()
    }

    pub fn type_labels(&self) -> &[String] {
        &self.type_by_site
    }

    /// Names of every free parameter that must be supplied to
    /// [`Self::basis_vectors`].
    pub fn required_basis_params(&self) -> &[String] {
        &self.required_params
    }

    /// Evaluate the site templates and expand through the full operator
    /// table. Every required parameter must be present; extraneous
    /// parameters are reported as unused and ignored.
    pub fn basis_vectors(&self, params: &BasisParams) -> Result<BasisExpansion, PrototypeError> {
        let missing: Vec<String> = self
            .required_params
            .iter()
            .filter(|name| params.get(name.as_str()).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PrototypeError::MissingParameters(missing));
        }
        for name in params.names() {
            if !self.required_params.iter().any(|r| r == name) {
                warn!(param = name, "parameter is not required and not used to define this structure");
            }
        }
        let mut base_positions = Vec::with_capacity(self.sites.len());
        for occurrence in &self.sites {
            let value = |var: char| {
                params
                    .get(&format!("{var}{}", occurrence.ordinal))
                    .unwrap_or(0.0)
            };
            let p = occurrence.site.evaluate(value('x'), value('y'), value('z'));
            base_positions.push(wrap(&Vector3::new(p[0], p[1], p[2])));
        }
        let expansion = self.space_group.basis_vectors(
            &base_positions,
            Some(&self.type_by_site),
            None,
            ExpandOptions::default(),
        )?;
        Ok(expansion)
    }

    /// Lattice vectors for the group's lattice system, with overrides.
    pub fn lattice_vectors(&self, params: &CellParams3d) -> Result<Matrix3<f64>, PrototypeError> {
        Ok(self.space_group.lattice_vectors(params)?)
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "prototype in {}; sites [{}], types [{}], basis parameters [{}]",
            self.space_group,
            self.site_letters(),
            self.type_by_site.join(", "),
            self.required_params.join(", ")
        )
    }
}
