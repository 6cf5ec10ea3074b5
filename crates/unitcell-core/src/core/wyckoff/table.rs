use std::sync::LazyLock;

use serde::Deserialize;
use thiserror::Error;

use crate::core::expr::CoordExpr;

static WYCKOFF_DATA: &str = include_str!("../../../data/wyckoff_sites.csv");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WyckoffError {
    #[error("space group number must be between 1 and 230, got {0}")]
    SpaceGroupOutOfRange(u16),
    #[error("space group {space_group} has no Wyckoff site '{letter}'")]
    UnknownSite { space_group: u16, letter: char },
}

/// One Wyckoff position: letter, multiplicity, and the coordinate template.
#[derive(Debug, Clone)]
pub struct WyckoffSite {
    pub letter: char,
    pub multiplicity: u32,
    pub coordinates: [CoordExpr; 3],
}

impl WyckoffSite {
    /// Free parameters (subset of `x`, `y`, `z`) used by this template, in
    /// axis order.
    pub fn free_variables(&self) -> Vec<char> {
        let mut vars = Vec::new();
        for expr in &self.coordinates {
            for var in expr.variables() {
                if !vars.contains(&var) {
                    vars.push(var);
                }
            }
        }
        vars.sort_unstable();
        vars
    }

    /// Evaluate the template at the given free-parameter values.
    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        [
            self.coordinates[0].evaluate(x, y, z),
            self.coordinates[1].evaluate(x, y, z),
            self.coordinates[2].evaluate(x, y, z),
        ]
    }
}

#[derive(Deserialize)]
struct RawSiteRecord {
    space_group: u16,
    letter: String,
    multiplicity: u32,
    coordinates: String,
}

/// Per-space-group Wyckoff site templates, loaded once from the embedded
/// snapshot.
#[derive(Debug)]
pub struct WyckoffTable {
    sites_by_group: Vec<Vec<WyckoffSite>>,
}

static TABLE: LazyLock<WyckoffTable> =
    LazyLock::new(|| WyckoffTable::load().expect("embedded Wyckoff table is well-formed"));

impl WyckoffTable {
    /// Shared reference to the singleton template store.
    pub fn get() -> &'static WyckoffTable {
        &TABLE
    }

    fn load() -> Result<Self, String> {
        let mut sites_by_group: Vec<Vec<WyckoffSite>> = (0..230).map(|_| Vec::new()).collect();
        let mut reader = csv::Reader::from_reader(WYCKOFF_DATA.as_bytes());
        for record in reader.deserialize::<RawSiteRecord>() {
            let record = record.map_err(|e| e.to_string())?;
            if record.space_group == 0 || record.space_group > 230 {
                return Err(format!("bad space group {}", record.space_group));
            }
            let letter = record
                .letter
                .chars()
                .next()
                .ok_or_else(|| format!("empty site letter in group {}", record.space_group))?;
            let parts: Vec<&str> = record.coordinates.split(',').collect();
            if parts.len() != 3 {
                return Err(format!(
                    "site {}{} must have three coordinates",
                    record.space_group, letter
                ));
            }
            let parse = |s: &str| CoordExpr::parse(s).map_err(|e| e.to_string());
            let coordinates = [parse(parts[0])?, parse(parts[1])?, parse(parts[2])?];
            sites_by_group[usize::from(record.space_group) - 1].push(WyckoffSite {
                letter,
                multiplicity: record.multiplicity,
                coordinates,
            });
        }
        for (i, sites) in sites_by_group.iter().enumerate() {
            if sites.is_empty() {
                return Err(format!("space group {} has no Wyckoff sites", i + 1));
            }
        }
        Ok(Self { sites_by_group })
    }

    /// All sites of a space group, in letter order (general position last).
    pub fn sites(&self, space_group: u16) -> Result<&[WyckoffSite], WyckoffError> {
        if space_group == 0 || space_group > 230 {
            return Err(WyckoffError::SpaceGroupOutOfRange(space_group));
        }
        Ok(&self.sites_by_group[usize::from(space_group) - 1])
    }

    /// Look up a site by letter. Lookups are case-insensitive: `H` finds the
    /// site `h` when no exact match exists.
    pub fn site(&self, space_group: u16, letter: char) -> Result<&WyckoffSite, WyckoffError> {
        let sites = self.sites(space_group)?;
        sites
            .iter()
            .find(|s| s.letter == letter)
            .or_else(|| {
                sites
                    .iter()
                    .find(|s| s.letter == letter.to_ascii_lowercase())
            })
            .ok_or(WyckoffError::UnknownSite {
                space_group,
                letter,
            })
    }
}
