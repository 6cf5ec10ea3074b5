use std::fmt;

use nalgebra::{Matrix2, Matrix3, UnitQuaternion, Vector2, Vector3};

use crate::core::lattice::geometry::LatticeError;
use crate::core::lattice::systems::{
    CellParams2d, CellParams3d, LatticeSystem2d, LatticeSystem3d,
};
use crate::core::symmetry::SymmetryError;
use crate::core::symmetry::operator::{PlaneOperator, SymmetryOperator};
use crate::core::symmetry::point_group::{PointGroupRecord, point_group_number};
use crate::core::symmetry::tables::{
    PlaneGroupRecord, SpaceGroupRecord, SymmetryTables, plane_group_lattice_system,
    space_group_lattice_system,
};
use crate::engine::error::ExpandError;
use crate::engine::expand::{
    BasisExpansion, ExpandOptions, PlaneBasisExpansion, expand_basis, expand_basis_2d,
};

/// A handle on one of the 230 space groups: its operator table and the
/// lattice system it constrains the unit cell to.
#[derive(Debug, Clone, Copy)]
pub struct SpaceGroup {
    record: &'static SpaceGroupRecord,
    lattice_system: LatticeSystem3d,
}

impl SpaceGroup {
    pub fn new(number: u16) -> Result<Self, SymmetryError> {
        Self::with_tables(SymmetryTables::get(), number)
    }

    /// Construct against an explicit table store reference.
    pub fn with_tables(tables: &'static SymmetryTables, number: u16) -> Result<Self, SymmetryError> {
        let record = tables.space_group(number)?;
        let lattice_system = space_group_lattice_system(number)?;
        Ok(Self {
            record,
            lattice_system,
        })
    }

    pub fn number(&self) -> u16 {
        self.record.number
    }

    /// Hermann-Mauguin short symbol, e.g. `I-43d`.
    pub fn symbol(&self) -> &str {
        &self.record.symbol
    }

    pub fn operators(&self) -> &[SymmetryOperator] {
        &self.record.operators
    }

    pub fn lattice_system(&self) -> LatticeSystem3d {
        self.lattice_system
    }

    /// Expand base fractional positions into the full orbit under this
    /// group. See [`expand_basis`] for the dedup and orientation semantics.
    pub fn basis_vectors(
        &self,
        base_positions: &[Vector3<f64>],
        base_types: Option<&[String]>,
        base_orientations: Option<&[UnitQuaternion<f64>]>,
        options: ExpandOptions,
    ) -> Result<BasisExpansion, ExpandError> {
        expand_basis(
            self.operators(),
            base_positions,
            base_types,
            base_orientations,
            options,
        )
    }

    /// Lattice vectors for this group's lattice system, with named parameter
    /// overrides.
    pub fn lattice_vectors(&self, params: &CellParams3d) -> Result<Matrix3<f64>, LatticeError> {
        self.lattice_system.lattice_vectors(params)
    }
}

impl fmt::Display for SpaceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "space group {} ({}), {} lattice, free parameters {:?}",
            self.number(),
            self.symbol(),
            self.lattice_system,
            self.lattice_system.free_params()
        )
    }
}

/// A handle on one of the 17 plane groups.
#[derive(Debug, Clone, Copy)]
pub struct PlaneGroup {
    record: &'static PlaneGroupRecord,
    lattice_system: LatticeSystem2d,
}

impl PlaneGroup {
    pub fn new(number: u8) -> Result<Self, SymmetryError> {
        Self::with_tables(SymmetryTables::get(), number)
    }

    pub fn with_tables(tables: &'static SymmetryTables, number: u8) -> Result<Self, SymmetryError> {
        let record = tables.plane_group(number)?;
        let lattice_system = plane_group_lattice_system(number)?;
        Ok(Self {
            record,
            lattice_system,
        })
    }

    pub fn number(&self) -> u8 {
        self.record.number
    }

    pub fn symbol(&self) -> &str {
        &self.record.symbol
    }

    pub fn operators(&self) -> &[PlaneOperator] {
        &self.record.operators
    }

    pub fn lattice_system(&self) -> LatticeSystem2d {
        self.lattice_system
    }

    pub fn basis_vectors(
        &self,
        base_positions: &[Vector2<f64>],
        base_types: Option<&[String]>,
        base_orientations: Option<&[UnitQuaternion<f64>]>,
        options: ExpandOptions,
    ) -> Result<PlaneBasisExpansion, ExpandError> {
        expand_basis_2d(
            self.operators(),
            base_positions,
            base_types,
            base_orientations,
            options,
        )
    }

    pub fn lattice_vectors(&self, params: &CellParams2d) -> Matrix2<f64> {
        self.lattice_system.lattice_vectors(params)
    }
}

impl fmt::Display for PlaneGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plane group {} ({}), {} lattice, free parameters {:?}",
            self.number(),
            self.symbol(),
            self.lattice_system,
            self.lattice_system.free_params()
        )
    }
}

/// A handle on one of the 32 crystallographic point groups, exposing the
/// rotation matrices and their precomputed quaternion equivalents.
#[derive(Debug, Clone, Copy)]
pub struct PointGroup {
    record: &'static PointGroupRecord,
}

impl PointGroup {
    pub fn new(number: u8) -> Result<Self, SymmetryError> {
        Self::with_tables(SymmetryTables::get(), number)
    }

    pub fn with_tables(tables: &'static SymmetryTables, number: u8) -> Result<Self, SymmetryError> {
        Ok(Self {
            record: tables.point_group(number)?,
        })
    }

    /// Look up a point group by its Hermann-Mauguin label, e.g. `m-3`.
    pub fn from_name(name: &str) -> Result<Self, SymmetryError> {
        let number = point_group_number(name)
            .ok_or_else(|| SymmetryError::UnknownPointGroupName(name.to_string()))?;
        Self::new(number)
    }

    pub fn number(&self) -> u8 {
        self.record.number
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn rotation_matrices(&self) -> &[Matrix3<f64>] {
        &self.record.operations
    }

    /// Unit quaternions order-matched to [`Self::rotation_matrices`].
    pub fn quaternions(&self) -> &[UnitQuaternion<f64>] {
        &self.record.quaternions
    }
}

impl fmt::Display for PointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "point group {} ({}), {} operations",
            self.number(),
            self.name(),
            self.record.operations.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_group_220_has_a_cubic_unit_lattice_by_default() {
        let group = SpaceGroup::new(220).unwrap();
        assert_eq!(group.symbol(), "I-43d");
        let cell = group.lattice_vectors(&CellParams3d::new()).unwrap();
        assert_eq!(cell, Matrix3::identity());
    }

    #[test]
    fn plane_group_9_builds_a_rectangular_lattice() {
        let group = PlaneGroup::new(9).unwrap();
        let cell = group.lattice_vectors(&CellParams2d::new().a(1.0).b(2.0));
        assert_eq!(cell, Matrix2::new(1.0, 0.0, 0.0, 2.0));
    }

    #[test]
    fn group_numbers_are_validated_at_construction() {
        assert!(SpaceGroup::new(0).is_err());
        assert!(SpaceGroup::new(231).is_err());
        assert!(PlaneGroup::new(18).is_err());
        assert!(PointGroup::new(0).is_err());
    }

    #[test]
    fn point_group_lookup_by_name() {
        let group = PointGroup::from_name("m-3").unwrap();
        assert_eq!(group.number(), 29);
        assert_eq!(group.rotation_matrices().len(), 24);
        assert!(PointGroup::from_name("nonsense").is_err());
    }

    #[test]
    fn rhombohedral_groups_expose_a_and_alpha() {
        let group = SpaceGroup::new(166).unwrap();
        assert_eq!(group.lattice_system(), LatticeSystem3d::Rhombohedral);
        assert_eq!(group.lattice_system().free_params(), &["a", "alpha"]);
    }
}
