//! Driver code to canonical name lookup.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Provider code → canonical full name.
///
/// Resolution never fails: a code with no entry resolves to itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverMapping {
    names: BTreeMap<String, String>,
}

impl DriverMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a mapping from a JSON object file (`{"VER": "Max Verstappen", ...}`).
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse a mapping from a JSON object string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Built-in mapping covering the 2024 and 2025 grids.
    pub fn default_grid() -> Self {
        DEFAULT_GRID
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        self.names.insert(code.into(), name.into());
    }

    /// Canonical name for a code, if mapped.
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Canonical name for a code, falling back to the code itself.
    pub fn resolve(&self, code: &str) -> String {
        self.lookup(code).map_or_else(
            || {
                warn!(code, "no canonical name for driver code, using code");
                code.to_string()
            },
            str::to_string,
        )
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over (code, name) pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(c, n)| (c.as_str(), n.as_str()))
    }
}

impl FromIterator<(String, String)> for DriverMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

const DEFAULT_GRID: &[(&str, &str)] = &[
    ("ALB", "Alexander Albon"),
    ("ALO", "Fernando Alonso"),
    ("ANT", "Andrea Kimi Antonelli"),
    ("BEA", "Oliver Bearman"),
    ("BOR", "Gabriel Bortoleto"),
    ("BOT", "Valtteri Bottas"),
    ("COL", "Franco Colapinto"),
    ("DOO", "Jack Doohan"),
    ("GAS", "Pierre Gasly"),
    ("HAD", "Isack Hadjar"),
    ("HAM", "Lewis Hamilton"),
    ("HUL", "Nico Hulkenberg"),
    ("LAW", "Liam Lawson"),
    ("LEC", "Charles Leclerc"),
    ("MAG", "Kevin Magnussen"),
    ("NOR", "Lando Norris"),
    ("OCO", "Esteban Ocon"),
    ("PER", "Sergio Perez"),
    ("PIA", "Oscar Piastri"),
    ("RIC", "Daniel Ricciardo"),
    ("RUS", "George Russell"),
    ("SAI", "Carlos Sainz"),
    ("SAR", "Logan Sargeant"),
    ("STR", "Lance Stroll"),
    ("TSU", "Yuki Tsunoda"),
    ("VER", "Max Verstappen"),
    ("ZHO", "Zhou Guanyu"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("VER", "Max Verstappen")]
    #[case("NOR", "Lando Norris")]
    #[case("ANT", "Andrea Kimi Antonelli")]
    fn test_default_grid_resolves(#[case] code: &str, #[case] name: &str) {
        assert_eq!(DriverMapping::default_grid().resolve(code), name);
    }

    #[rstest]
    #[case("XYZ")]
    #[case("")]
    #[case("ver")]
    fn test_unmapped_code_falls_back_to_itself(#[case] code: &str) {
        let mapping = DriverMapping::default_grid();
        assert_eq!(mapping.lookup(code), None);
        assert_eq!(mapping.resolve(code), code);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"VER": "Max Verstappen", "XXX": "Test Driver"}}"#).unwrap();

        let mapping = DriverMapping::from_json_file(file.path()).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.resolve("XXX"), "Test Driver");
        assert_eq!(mapping.resolve("NOR"), "NOR");
    }

    #[test]
    fn test_workspace_mapping_matches_default_grid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../driver_mapping.json");
        let mapping = DriverMapping::from_json_file(path).unwrap();
        assert_eq!(mapping, DriverMapping::default_grid());
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(DriverMapping::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_insert_and_iter() {
        let mut mapping = DriverMapping::new();
        assert!(mapping.is_empty());
        mapping.insert("B", "Bee");
        mapping.insert("A", "Ay");

        let pairs: Vec<_> = mapping.iter().collect();
        assert_eq!(pairs, vec![("A", "Ay"), ("B", "Bee")]);
    }
}
