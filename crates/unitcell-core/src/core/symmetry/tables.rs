use std::sync::LazyLock;

use super::SymmetryError;
use super::operator::{PlaneOperator, SymmetryOperator};
use super::point_group::{PointGroupRecord, parse_point_groups};
use crate::core::lattice::systems::{LatticeSystem2d, LatticeSystem3d};

static SPACE_GROUP_DATA: &str = include_str!("../../../data/space_group_symops.dat");
static PLANE_GROUP_DATA: &str = include_str!("../../../data/plane_group_symops.dat");

/// Space groups whose standard setting uses rhombohedral axes.
const RHOMBOHEDRAL_GROUPS: [u16; 7] = [146, 148, 155, 160, 161, 166, 167];

#[derive(Debug)]
pub struct SpaceGroupRecord {
    pub number: u16,
    pub symbol: String,
    pub operators: Vec<SymmetryOperator>,
}

#[derive(Debug)]
pub struct PlaneGroupRecord {
    pub number: u8,
    pub symbol: String,
    pub operators: Vec<PlaneOperator>,
}

/// The process-wide symmetry table store. Loaded from the embedded snapshot
/// on first use and immutable afterwards, so shared references can be read
/// concurrently without synchronization.
#[derive(Debug)]
pub struct SymmetryTables {
    space_groups: Vec<SpaceGroupRecord>,
    plane_groups: Vec<PlaneGroupRecord>,
    point_groups: Vec<PointGroupRecord>,
}

static TABLES: LazyLock<SymmetryTables> =
    LazyLock::new(|| SymmetryTables::load().expect("embedded symmetry tables are well-formed"));

impl SymmetryTables {
    /// Shared reference to the singleton table store.
    pub fn get() -> &'static SymmetryTables {
        &TABLES
    }

    fn load() -> Result<Self, String> {
        let space_groups = parse_group_blocks(SPACE_GROUP_DATA, 230, |triplet| {
            SymmetryOperator::parse(triplet).map_err(|e| e.to_string())
        })?
        .into_iter()
        .map(|(number, symbol, operators)| SpaceGroupRecord {
            number,
            symbol,
            operators,
        })
        .collect();
        let plane_groups = parse_group_blocks(PLANE_GROUP_DATA, 17, |pair| {
            PlaneOperator::parse(pair).map_err(|e| e.to_string())
        })?
        .into_iter()
        .map(|(number, symbol, operators)| PlaneGroupRecord {
            number: number as u8,
            symbol,
            operators,
        })
        .collect();
        let point_groups = parse_point_groups()?;
        Ok(Self {
            space_groups,
            plane_groups,
            point_groups,
        })
    }

    pub fn space_group(&self, number: u16) -> Result<&SpaceGroupRecord, SymmetryError> {
        if number == 0 || number > 230 {
            return Err(SymmetryError::SpaceGroupOutOfRange(number));
        }
        Ok(&self.space_groups[usize::from(number) - 1])
    }

    pub fn plane_group(&self, number: u8) -> Result<&PlaneGroupRecord, SymmetryError> {
        if number == 0 || number > 17 {
            return Err(SymmetryError::PlaneGroupOutOfRange(number));
        }
        Ok(&self.plane_groups[usize::from(number) - 1])
    }

    pub fn point_group(&self, number: u8) -> Result<&PointGroupRecord, SymmetryError> {
        if number == 0 || number > 32 {
            return Err(SymmetryError::PointGroupOutOfRange(number));
        }
        Ok(&self.point_groups[usize::from(number) - 1])
    }
}

/// Lattice system of a (range-checked) space group number.
pub fn space_group_lattice_system(number: u16) -> Result<LatticeSystem3d, SymmetryError> {
    if number == 0 || number > 230 {
        return Err(SymmetryError::SpaceGroupOutOfRange(number));
    }
    Ok(if RHOMBOHEDRAL_GROUPS.contains(&number) {
        LatticeSystem3d::Rhombohedral
    } else if number <= 2 {
        LatticeSystem3d::Triclinic
    } else if number <= 15 {
        LatticeSystem3d::Monoclinic
    } else if number <= 74 {
        LatticeSystem3d::Orthorhombic
    } else if number <= 142 {
        LatticeSystem3d::Tetragonal
    } else if number <= 194 {
        LatticeSystem3d::Hexagonal
    } else {
        LatticeSystem3d::Cubic
    })
}

/// Lattice system of a (range-checked) plane group number.
pub fn plane_group_lattice_system(number: u8) -> Result<LatticeSystem2d, SymmetryError> {
    if number == 0 || number > 17 {
        return Err(SymmetryError::PlaneGroupOutOfRange(number));
    }
    Ok(if number <= 2 {
        LatticeSystem2d::Oblique
    } else if number <= 9 {
        LatticeSystem2d::Rectangular
    } else if number <= 12 {
        LatticeSystem2d::Square
    } else {
        LatticeSystem2d::Hexagonal
    })
}

fn parse_group_blocks<Op>(
    data: &str,
    expected: usize,
    parse_op: impl Fn(&str) -> Result<Op, String>,
) -> Result<Vec<(u16, String, Vec<Op>)>, String> {
    let mut groups = Vec::with_capacity(expected);
    for block in data.split("\n\n").filter(|b| !b.trim().is_empty()) {
        let mut lines = block.lines().filter(|l| !l.trim().is_empty());
        let header = lines.next().ok_or("missing group header")?;
        let mut parts = header.split_whitespace();
        let number: u16 = parts
            .next()
            .ok_or("missing group number")?
            .parse()
            .map_err(|_| format!("bad group number in header '{header}'"))?;
        let symbol = parts.next().unwrap_or("").to_string();
        let operators = lines.map(&parse_op).collect::<Result<Vec<Op>, _>>()?;
        if operators.is_empty() {
            return Err(format!("group {number} has no operators"));
        }
        groups.push((number, symbol, operators));
    }
    if groups.len() != expected {
        return Err(format!(
            "expected {expected} group blocks, found {}",
            groups.len()
        ));
    }
    for (i, (number, _, _)) in groups.iter().enumerate() {
        if usize::from(*number) != i + 1 {
            return Err(format!("group blocks out of order at {number}"));
        }
    }
    Ok(groups)
}
