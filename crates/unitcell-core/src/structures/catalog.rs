use std::fmt;
use std::sync::LazyLock;

use nalgebra::Matrix3;
use serde::Deserialize;
use thiserror::Error;

use crate::core::lattice::systems::{CellParams3d, LatticeSystem3d};
use crate::engine::expand::BasisExpansion;
use crate::structures::prototype::{BasisParams, Prototype, PrototypeError};

static CATALOG_DATA: &str = include_str!("../../data/aflow_prototypes.csv");

/// Number of records in the bundled prototype catalog.
pub const CATALOG_SIZE: usize = 590;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("prototype index must be between 0 and 589, got {0}")]
    IndexOutOfRange(usize),
    #[error(transparent)]
    Prototype(#[from] PrototypeError),
}

#[derive(Debug, Deserialize)]
struct RawCatalogRecord {
    id: String,
    pearson_symbol: String,
    prototype: String,
    space_group: u16,
    wyckoff_sites: String,
    lattice_params: String,
    basis_params: String,
}

/// One catalog record: identification plus the tabulated parameter values.
#[derive(Debug)]
pub struct CatalogEntry {
    pub id: String,
    pub pearson_symbol: String,
    pub prototype: String,
    pub space_group: u16,
    /// Wyckoff site letters grouped by chemical type, in type order.
    pub sites_by_type: Vec<String>,
    /// Tabulated lattice parameters as stored (`b/a`, `c/a` ratios, angles
    /// in degrees).
    pub lattice_params: Vec<(String, f64)>,
    /// Tabulated basis parameters, named by sorted-site ordinal.
    pub basis_params: Vec<(String, f64)>,
}

impl CatalogEntry {
    /// Atom count encoded in the Pearson symbol.
    pub fn pearson_atom_count(&self) -> usize {
        self.pearson_symbol
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .unwrap_or(0)
    }
}

/// The bundled read-only catalog of known crystal prototypes.
#[derive(Debug)]
pub struct PrototypeCatalog {
    entries: Vec<CatalogEntry>,
}

static CATALOG: LazyLock<PrototypeCatalog> =
    LazyLock::new(|| PrototypeCatalog::load().expect("embedded prototype catalog is well-formed"));

impl PrototypeCatalog {
    pub fn get() -> &'static PrototypeCatalog {
        &CATALOG
    }

    fn load() -> Result<Self, String> {
        let mut reader = csv::Reader::from_reader(CATALOG_DATA.as_bytes());
        let mut entries = Vec::with_capacity(CATALOG_SIZE);
        for record in reader.deserialize::<RawCatalogRecord>() {
            let raw = record.map_err(|e| e.to_string())?;
            entries.push(CatalogEntry {
                sites_by_type: raw
                    .wyckoff_sites
                    .split_whitespace()
                    .map(str::to_string)
                    .collect(),
                lattice_params: parse_params(&raw.lattice_params)?,
                basis_params: parse_params(&raw.basis_params)?,
                id: raw.id,
                pearson_symbol: raw.pearson_symbol,
                prototype: raw.prototype,
                space_group: raw.space_group,
            });
        }
        if entries.len() != CATALOG_SIZE {
            return Err(format!(
                "expected {CATALOG_SIZE} catalog records, found {}",
                entries.len()
            ));
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Result<&CatalogEntry, CatalogError> {
        self.entries
            .get(index)
            .ok_or(CatalogError::IndexOutOfRange(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Indices of the entries matching every supplied filter.
    pub fn matching_indices(
        &self,
        pearson_symbol: Option<&str>,
        space_group: Option<u16>,
        prototype: Option<&str>,
    ) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                pearson_symbol.is_none_or(|p| e.pearson_symbol == p)
                    && space_group.is_none_or(|g| e.space_group == g)
                    && prototype.is_none_or(|p| e.prototype == p)
            })
            .map(|(i, _)| i)
            .collect()
    }
}

fn parse_params(field: &str) -> Result<Vec<(String, f64)>, String> {
    if field.trim().is_empty() {
        return Ok(Vec::new());
    }
    field
        .split(',')
        .map(|pair| {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("malformed parameter '{pair}'"))?;
            let value: f64 = value
                .parse()
                .map_err(|_| format!("bad value in parameter '{pair}'"))?;
            Ok((name.to_string(), value))
        })
        .collect()
}

/// A ready-to-use prototype resolved from the catalog: tabulated lattice and
/// basis parameter values are pre-filled and can be selectively overridden
/// on each query.
pub struct AflowPrototype {
    entry: &'static CatalogEntry,
    prototype: Prototype,
    lattice_params: CellParams3d,
    basis_params: BasisParams,
}

impl AflowPrototype {
    /// Resolve the catalog record at `index`. With `set_type`, distinct
    /// chemical types in the record get type letters `A, B, C, ...` in
    /// first-seen order; otherwise every site is type `A`.
    pub fn new(index: usize, set_type: bool) -> Result<Self, CatalogError> {
        let entry = PrototypeCatalog::get().entry(index)?;
        let (sorted_sites, type_by_site) = assign_types(&entry.sites_by_type, set_type);
        let prototype = Prototype::new(entry.space_group, &sorted_sites, Some(&type_by_site))
            .map_err(CatalogError::Prototype)?;
        let lattice_params = resolve_lattice_params(entry, prototype.lattice_system());
        let mut basis_params = BasisParams::new();
        for (name, value) in &entry.basis_params {
            basis_params.insert(name, *value);
        }
        Ok(Self {
            entry,
            prototype,
            lattice_params,
            basis_params,
        })
    }

    /// Resolve every catalog record matching the given query.
    pub fn from_query(
        pearson_symbol: Option<&str>,
        space_group: Option<u16>,
        prototype: Option<&str>,
        set_type: bool,
    ) -> Result<Vec<AflowPrototype>, CatalogError> {
        PrototypeCatalog::get()
            .matching_indices(pearson_symbol, space_group, prototype)
            .into_iter()
            .map(|index| Self::new(index, set_type))
            .collect()
    }

    pub fn id(&self) -> &str {
        &self.entry.id
    }

    pub fn pearson_symbol(&self) -> &str {
        &self.entry.pearson_symbol
    }

    pub fn prototype_label(&self) -> &str {
        &self.entry.prototype
    }

    pub fn space_group_number(&self) -> u16 {
        self.entry.space_group
    }

    pub fn pearson_atom_count(&self) -> usize {
        self.entry.pearson_atom_count()
    }

    /// Resolved lattice parameters: radians, absolute lengths, and for the
    /// rhombohedral groups the primitive `(a, alpha)` pair.
    pub fn lattice_params(&self) -> &CellParams3d {
        &self.lattice_params
    }

    pub fn as_prototype(&self) -> &Prototype {
        &self.prototype
    }

    /// Basis vectors from the tabulated parameter values, with optional
    /// overrides taking precedence.
    pub fn basis_vectors(&self, overrides: &BasisParams) -> Result<BasisExpansion, PrototypeError> {
        let merged = overrides.overlaid_on(&self.basis_params);
        self.prototype.basis_vectors(&merged)
    }

    /// Lattice vectors from the tabulated cell parameters, with optional
    /// overrides taking precedence.
    pub fn lattice_vectors(&self, overrides: &CellParams3d) -> Result<Matrix3<f64>, PrototypeError> {
        let merged = overrides.overlaid_on(&self.lattice_params);
        self.prototype.lattice_vectors(&merged)
    }
}

impl fmt::Display for AflowPrototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, space group {}, {} atoms per cell)",
            self.entry.id,
            self.entry.prototype,
            self.entry.space_group,
            self.pearson_atom_count()
        )
    }
}

/// Sort the occupied site letters and assign type letters the way the
/// catalog records group them: each chemical grouping claims its letters in
/// the sorted list in order, first grouping becoming type `A`, the second
/// `B`, and so on.
fn assign_types(sites_by_type: &[String], set_type: bool) -> (String, String) {
    let mut sorted_sites: Vec<char> = sites_by_type.concat().chars().collect();
    sorted_sites.sort_unstable();
    let mut type_by_site = vec!['A'; sorted_sites.len()];
    if set_type {
        let mut claimed = vec![false; sorted_sites.len()];
        for (group_index, grouping) in sites_by_type.iter().enumerate() {
            let label = char::from(b'A' + group_index as u8);
            for site in grouping.chars() {
                if let Some(slot) = sorted_sites
                    .iter()
                    .enumerate()
                    .position(|(i, &s)| s == site && !claimed[i])
                {
                    claimed[slot] = true;
                    type_by_site[slot] = label;
                }
            }
        }
    }
    (
        sorted_sites.into_iter().collect(),
        type_by_site.into_iter().collect(),
    )
}

/// Groups tabulated with hexagonal axes that must be converted to the
/// primitive rhombohedral `(a, alpha)` description.
fn resolve_lattice_params(entry: &CatalogEntry, system: LatticeSystem3d) -> CellParams3d {
    let value = |name: &str| {
        entry
            .lattice_params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    };
    let a = value("a").unwrap_or(1.0);
    if system == LatticeSystem3d::Rhombohedral {
        // The catalog stores rhombohedral entries in the hexagonal-axes
        // convention (a, c/a); fold them into the primitive cell.
        let c = value("c/a").unwrap_or(1.0) * a;
        let a_rh = (a * a / 3.0 + c * c / 9.0).sqrt();
        let alpha = ((2.0 * c * c - 3.0 * a * a) / (2.0 * (c * c + 3.0 * a * a))).acos();
        return CellParams3d::new().a(a_rh).alpha(alpha);
    }
    let mut params = CellParams3d::new().a(a);
    if let Some(ratio) = value("b/a") {
        params = params.b(ratio * a);
    }
    if let Some(ratio) = value("c/a") {
        params = params.c(ratio * a);
    }
    if let Some(degrees) = value("alpha") {
        params = params.alpha(degrees.to_radians());
    }
    if let Some(degrees) = value("beta") {
        params = params.beta(degrees.to_radians());
    }
    if let Some(degrees) = value("gamma") {
        params = params.gamma(degrees.to_radians());
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn catalog_holds_exactly_590_records() {
        assert_eq!(PrototypeCatalog::get().len(), CATALOG_SIZE);
    }

    #[test]
    fn index_is_range_checked() {
        assert!(matches!(
            AflowPrototype::new(CATALOG_SIZE, false),
            Err(CatalogError::IndexOutOfRange(_))
        ));
        assert!(AflowPrototype::new(0, false).is_ok());
    }

    #[test]
    fn rocksalt_resolves_to_eight_atoms_with_two_types() {
        let matches = AflowPrototype::from_query(Some("cF8"), Some(225), Some("NaCl"), true).unwrap();
        assert_eq!(matches.len(), 1);
        let rocksalt = &matches[0];
        assert_eq!(rocksalt.id(), "AB_cF8_225_b_a");
        let expansion = rocksalt.basis_vectors(&BasisParams::new()).unwrap();
        assert_eq!(expansion.positions.len(), 8);
        // sorted sites are (a, b); the catalog groups the b site first, so a
        // carries the second label
        assert_eq!(expansion.type_labels[0], "B");
        assert!((expansion.positions[0] - Vector3::new(0.0, 0.0, 0.0)).norm() < 1e-9);
        let cell = rocksalt.lattice_vectors(&CellParams3d::new()).unwrap();
        assert!((cell[(0, 0)] - 5.6402).abs() < 1e-9);
    }

    #[test]
    fn without_set_type_every_site_is_type_a() {
        let matches = AflowPrototype::from_query(Some("cF8"), Some(225), Some("NaCl"), false).unwrap();
        let expansion = matches[0].basis_vectors(&BasisParams::new()).unwrap();
        assert!(expansion.type_labels.iter().all(|t| t == "A"));
    }

    #[test]
    fn rhombohedral_entries_fold_into_the_primitive_cell() {
        let matches = AflowPrototype::from_query(Some("hR2"), Some(166), Some("As"), false).unwrap();
        assert_eq!(matches.len(), 1);
        let arsenic = &matches[0];
        let params = arsenic.lattice_params();
        assert!(params.b.is_none());
        assert!((params.a.unwrap() - 4.132031634094381).abs() < 1e-6);
        assert!((params.alpha.unwrap() - 0.9446496384422338).abs() < 1e-6);
        let expansion = arsenic.basis_vectors(&BasisParams::new()).unwrap();
        assert_eq!(expansion.positions.len(), 2);
    }

    #[test]
    fn tabulated_angles_are_converted_to_radians() {
        // every triclinic record stores its angles in degrees
        let catalog = PrototypeCatalog::get();
        let index = catalog
            .matching_indices(None, Some(2), None)
            .into_iter()
            .next()
            .unwrap();
        let entry = catalog.entry(index).unwrap();
        let stored_alpha = entry
            .lattice_params
            .iter()
            .find(|(n, _)| n == "alpha")
            .map(|(_, v)| *v)
            .unwrap();
        let resolved = AflowPrototype::new(index, false).unwrap();
        let alpha = resolved.lattice_params().alpha.unwrap();
        assert!((alpha - stored_alpha.to_radians()).abs() < 1e-12);
        assert!(alpha < std::f64::consts::TAU);
    }

    #[test]
    fn rutile_free_parameter_can_be_overridden() {
        let matches = AflowPrototype::from_query(Some("tP6"), Some(136), Some("TiO2"), true).unwrap();
        let rutile = &matches[0];
        let tabulated = rutile.basis_vectors(&BasisParams::new()).unwrap();
        assert_eq!(tabulated.positions.len(), 6);
        let shifted = rutile
            .basis_vectors(&BasisParams::new().set("x2", 0.32))
            .unwrap();
        assert_eq!(shifted.positions.len(), 6);
        assert!(tabulated.positions != shifted.positions);
    }

    #[test]
    fn every_record_expands_to_its_pearson_atom_count() {
        for index in 0..CATALOG_SIZE {
            let prototype = AflowPrototype::new(index, false)
                .unwrap_or_else(|e| panic!("entry {index}: {e}"));
            let expansion = prototype
                .basis_vectors(&BasisParams::new())
                .unwrap_or_else(|e| panic!("entry {index}: {e}"));
            assert_eq!(
                expansion.positions.len(),
                prototype.pearson_atom_count(),
                "entry {index} ({})",
                prototype.id()
            );
            let cell = prototype.lattice_vectors(&CellParams3d::new()).unwrap();
            assert!(cell.iter().all(|v| v.is_finite()), "entry {index}");
        }
    }

    #[test]
    fn lattice_param_names_match_the_lattice_system() {
        for index in 0..CATALOG_SIZE {
            let entry = PrototypeCatalog::get().entry(index).unwrap();
            let prototype = AflowPrototype::new(index, false).unwrap();
            let system = prototype.as_prototype().lattice_system();
            let expected: &[&str] = match system {
                LatticeSystem3d::Triclinic => &["a", "b/a", "c/a", "alpha", "beta", "gamma"],
                LatticeSystem3d::Monoclinic => &["a", "b/a", "c/a", "beta"],
                LatticeSystem3d::Orthorhombic => &["a", "b/a", "c/a"],
                LatticeSystem3d::Tetragonal | LatticeSystem3d::Hexagonal => &["a", "c/a"],
                LatticeSystem3d::Rhombohedral => &["a", "c/a"],
                LatticeSystem3d::Cubic => &["a"],
            };
            let names: Vec<&str> = entry
                .lattice_params
                .iter()
                .map(|(n, _)| n.as_str())
                .collect();
            assert_eq!(names, expected, "entry {index} ({})", entry.id);
        }
    }

    #[test]
    fn pearson_symbols_carry_the_lattice_system_prefix() {
        use crate::core::symmetry::tables::space_group_lattice_system;
        for index in 0..CATALOG_SIZE {
            let entry = PrototypeCatalog::get().entry(index).unwrap();
            let system = space_group_lattice_system(entry.space_group).unwrap();
            assert!(
                entry.pearson_symbol.starts_with(system.pearson_prefix()),
                "entry {index} ({}): {} vs prefix {}",
                entry.id,
                entry.pearson_symbol,
                system.pearson_prefix()
            );
        }
    }

    #[test]
    fn set_type_assigns_labels_in_first_seen_group_order() {
        let (sites, types) = assign_types(
            &["b".to_string(), "a".to_string(), "c".to_string()],
            true,
        );
        assert_eq!(sites, "abc");
        assert_eq!(types, "BAC");
        let (_, untyped) = assign_types(&["b".to_string(), "a".to_string()], false);
        assert_eq!(untyped, "AA");
    }
}
