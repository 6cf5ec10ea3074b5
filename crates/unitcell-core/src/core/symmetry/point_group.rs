use nalgebra::{Matrix3, Quaternion, UnitQuaternion};
use phf::phf_map;
use serde::Deserialize;

use super::operator::SymmetryOperator;

static POINT_GROUP_DATA: &str = include_str!("../../../data/point_groups.toml");

/// Hermann-Mauguin label to point-group number.
static POINT_GROUP_NUMBERS: phf::Map<&'static str, u8> = phf_map! {
    "1" => 1u8,
    "-1" => 2u8,
    "2" => 3u8,
    "m" => 4u8,
    "2/m" => 5u8,
    "222" => 6u8,
    "mm2" => 7u8,
    "mmm" => 8u8,
    "4" => 9u8,
    "-4" => 10u8,
    "4/m" => 11u8,
    "422" => 12u8,
    "4mm" => 13u8,
    "-42m" => 14u8,
    "4/mmm" => 15u8,
    "3" => 16u8,
    "-3" => 17u8,
    "32" => 18u8,
    "3m" => 19u8,
    "-3m" => 20u8,
    "6" => 21u8,
    "-6" => 22u8,
    "6/m" => 23u8,
    "622" => 24u8,
    "6mm" => 25u8,
    "-6m2" => 26u8,
    "6/mmm" => 27u8,
    "23" => 28u8,
    "m-3" => 29u8,
    "432" => 30u8,
    "-43m" => 31u8,
    "m-3m" => 32u8,
};

pub fn point_group_number(name: &str) -> Option<u8> {
    POINT_GROUP_NUMBERS.get(name).copied()
}

/// One point group: rotation matrices in table order and the order-matched
/// precomputed unit quaternions.
#[derive(Debug)]
pub struct PointGroupRecord {
    pub number: u8,
    pub name: String,
    pub operations: Vec<Matrix3<f64>>,
    pub quaternions: Vec<UnitQuaternion<f64>>,
}

#[derive(Deserialize)]
struct PointGroupFile {
    point_group: Vec<RawPointGroup>,
}

#[derive(Deserialize)]
struct RawPointGroup {
    number: u8,
    name: String,
    operations: Vec<String>,
    quaternions: Vec<[f64; 4]>,
}

pub(super) fn parse_point_groups() -> Result<Vec<PointGroupRecord>, String> {
    let file: PointGroupFile = toml::from_str(POINT_GROUP_DATA).map_err(|e| e.to_string())?;
    if file.point_group.len() != 32 {
        return Err(format!(
            "expected 32 point groups, found {}",
            file.point_group.len()
        ));
    }
    file.point_group
        .into_iter()
        .map(|raw| {
            if raw.operations.len() != raw.quaternions.len() {
                return Err(format!(
                    "point group {}: {} operations but {} quaternions",
                    raw.number,
                    raw.operations.len(),
                    raw.quaternions.len()
                ));
            }
            let operations = raw
                .operations
                .iter()
                .map(|triplet| {
                    SymmetryOperator::parse(triplet)
                        .map(|op| op.rotation)
                        .map_err(|e| e.to_string())
                })
                .collect::<Result<Vec<_>, _>>()?;
            let quaternions = raw
                .quaternions
                .iter()
                .map(|&[w, x, y, z]| {
                    UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z))
                })
                .collect();
            Ok(PointGroupRecord {
                number: raw.number,
                name: raw.name,
                operations,
                quaternions,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symmetry::tables::SymmetryTables;

    #[test]
    fn group_29_is_m3_with_the_reference_third_operation() {
        let record = SymmetryTables::get().point_group(29).unwrap();
        assert_eq!(record.name, "m-3");
        let expected = Matrix3::new(-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0);
        assert_eq!(record.operations[2], expected);
        let q = record.quaternions[2];
        for (got, want) in [q.w, q.i, q.j, q.k].iter().zip([0.0, 0.0, -1.0, 0.0]) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn names_resolve_back_to_numbers() {
        assert_eq!(point_group_number("m-3"), Some(29));
        assert_eq!(point_group_number("6/mmm"), Some(27));
        assert_eq!(point_group_number("bogus"), None);
    }

    #[test]
    fn quaternions_stay_in_lockstep_with_operations() {
        let tables = SymmetryTables::get();
        for number in 1..=32 {
            let record = tables.point_group(number).unwrap();
            assert_eq!(record.operations.len(), record.quaternions.len());
            assert!(!record.operations.is_empty());
            assert_eq!(record.operations[0], Matrix3::identity());
        }
    }

    #[test]
    fn known_point_group_orders() {
        let tables = SymmetryTables::get();
        for (number, order) in [(1u8, 1usize), (8, 8), (15, 16), (20, 12), (29, 24), (32, 48)] {
            assert_eq!(tables.point_group(number).unwrap().operations.len(), order);
        }
    }
}
