//! Alias table collapsing known region-name variants onto canonical keys

use super::normalize::{normalize, RegionKey};
use config::{File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Alias data compiled into the binary; used when no alias file is configured
const BUILTIN_ALIASES: &str = include_str!("../../data/region_aliases.toml");

/// Alias table loading errors
#[derive(Debug, thiserror::Error)]
pub enum AliasError {
    #[error("Failed to load alias table: {0}")]
    Load(String),

    #[error("Alias entry '{0}' normalizes to an empty key")]
    EmptyKey(String),

    #[error("Variant '{variant}' is listed under both '{first}' and '{second}'")]
    Conflict {
        variant: String,
        first: String,
        second: String,
    },

    #[error("Canonical key '{canonical}' is itself an alias of '{target}'")]
    Chained { canonical: String, target: String },
}

#[derive(Debug, Deserialize)]
struct AliasFile {
    #[serde(default)]
    aliases: HashMap<String, Vec<String>>,
}

/// Immutable mapping from a normalized variant to its canonical region key.
///
/// Lookup is a single step: a canonical key is never itself aliased, which
/// the constructor enforces.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<RegionKey, RegionKey>,
    canonical: Vec<RegionKey>,
}

impl AliasTable {
    /// Table with no aliases; every key is its own canonical form
    pub fn empty() -> Self {
        Self::default()
    }

    /// The alias table shipped with the crate
    pub fn builtin() -> Result<Self, AliasError> {
        Self::from_toml_str(BUILTIN_ALIASES)
    }

    /// Parse an `[aliases]` table from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, AliasError> {
        let file: AliasFile = config::Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AliasError::Load(e.to_string()))?;
        Self::from_groups(file.aliases)
    }

    /// Load from a file; the format follows the extension (toml, json, yaml)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AliasError> {
        let path = path.as_ref();
        let file: AliasFile = config::Config::builder()
            .add_source(File::from(path))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AliasError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_groups(file.aliases)
    }

    /// Build from `(canonical, variants)` groups. Names are normalized here.
    pub fn from_groups<I, C, V, S>(groups: I) -> Result<Self, AliasError>
    where
        I: IntoIterator<Item = (C, V)>,
        C: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: HashMap<RegionKey, RegionKey> = HashMap::new();
        let mut canonical = Vec::new();

        for (raw_canonical, variants) in groups {
            let target = normalize(raw_canonical.as_ref());
            if target.is_empty() {
                return Err(AliasError::EmptyKey(raw_canonical.as_ref().to_string()));
            }

            for raw_variant in variants {
                let variant = normalize(raw_variant.as_ref());
                if variant.is_empty() {
                    return Err(AliasError::EmptyKey(raw_variant.as_ref().to_string()));
                }
                if variant == target {
                    continue;
                }
                if let Some(existing) = entries.get(&variant) {
                    if existing != &target {
                        return Err(AliasError::Conflict {
                            variant: variant.to_string(),
                            first: existing.to_string(),
                            second: target.to_string(),
                        });
                    }
                }
                entries.insert(variant, target.clone());
            }

            if !canonical.contains(&target) {
                canonical.push(target);
            }
        }

        for key in &canonical {
            if let Some(other) = entries.get(key) {
                return Err(AliasError::Chained {
                    canonical: key.to_string(),
                    target: other.to_string(),
                });
            }
        }

        debug!(
            "Loaded alias table: {} variants over {} canonical regions",
            entries.len(),
            canonical.len()
        );

        Ok(Self { entries, canonical })
    }

    /// Map a key to its canonical form; unknown keys map to themselves
    pub fn canonicalize(&self, key: &RegionKey) -> RegionKey {
        self.entries.get(key).cloned().unwrap_or_else(|| key.clone())
    }

    /// Normalize then canonicalize a raw region name
    pub fn canonical_key(&self, name: &str) -> RegionKey {
        self.canonicalize(&normalize(name))
    }

    /// Canonical keys declared by the table
    pub fn canonical_keys(&self) -> &[RegionKey] {
        &self.canonical
    }

    /// Number of variant entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_loads() {
        let table = AliasTable::builtin().unwrap();
        assert!(!table.is_empty());
        assert_eq!(table.canonical_keys().len(), 15);
        assert_eq!(table.canonical_key("Techiman Municipal").as_str(), "bono");
        assert_eq!(table.canonical_key("Brong-Ahafo").as_str(), "bono");
        assert_eq!(table.canonical_key("Tema West Municipal").as_str(), "greateraccra");
        assert_eq!(table.canonical_key("Ghana").as_str(), "greateraccra");
        assert_eq!(table.canonical_key("Western North").as_str(), "western");
    }

    #[test]
    fn test_unknown_key_maps_to_itself() {
        let table = AliasTable::builtin().unwrap();
        assert_eq!(table.canonical_key("Bono East Region").as_str(), "bonoeast");
        assert_eq!(table.canonical_key("Atlantis").as_str(), "atlantis");
        assert_eq!(table.canonical_key("").as_str(), "");
    }

    #[test]
    fn test_free_text_keys_with_dots_load() {
        let table = AliasTable::from_toml_str(
            "[aliases]\n\"St. Mary's Region\" = [\"St. Mary Hospital Area\"]\n",
        )
        .unwrap();
        assert_eq!(table.canonical_keys()[0].as_str(), "stmarys");
        assert_eq!(table.canonical_key("St. Mary Hospital Area").as_str(), "stmarys");
    }

    #[test]
    fn test_conflicting_variant_rejected() {
        let result = AliasTable::from_groups([
            ("bono", vec!["Dormaa East"]),
            ("ahafo", vec!["Dormaa East"]),
        ]);
        assert!(matches!(result, Err(AliasError::Conflict { .. })));
    }

    #[test]
    fn test_duplicate_variant_same_target_allowed() {
        let table = AliasTable::from_groups([
            ("bono", vec!["Dormaa East", "dormaa-east"]),
        ])
        .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_chained_alias_rejected() {
        let result = AliasTable::from_groups([
            ("western", vec!["Western North"]),
            ("westernnorth", vec!["Sefwi Wiawso"]),
        ]);
        assert!(matches!(result, Err(AliasError::Chained { .. })));
    }

    #[test]
    fn test_empty_variant_rejected() {
        let result = AliasTable::from_groups([("oti", vec!["123"])]);
        assert!(matches!(result, Err(AliasError::EmptyKey(_))));
    }

    #[test]
    fn test_from_toml_str() {
        let table = AliasTable::from_toml_str(
            r#"
            [aliases]
            northern = ["Tamale Metro", "Northern Region"]
            "#,
        )
        .unwrap();
        assert_eq!(table.canonical_key("Tamale Metro").as_str(), "northern");
        // "Northern Region" normalizes to the canonical key and is skipped
        assert_eq!(table.len(), 1);
    }
}
