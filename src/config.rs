//! Project configuration boundary.
//!
//! A project config is the JSON-facing, human-edited description of a
//! generation run: the canvas format, the ordered layer list with per-layer
//! slot counts, the rarity marker table, and the requested edition count.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Format;
use crate::foundation::error::{StrataError, StrataResult};

/// One configured layer: a trait category with its own asset folder.
///
/// Order in [`ProjectConfig::layers`] is the draw order, background first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDef {
    /// Layer name; doubles as the asset folder name under the layers root.
    pub name: String,
    /// Selection denominator for this layer.
    ///
    /// Each element is chosen with probability `1 / slots` per draw; a draw
    /// landing on an index with no element yields no selection for the
    /// layer. Configuring more slots than the folder has files is the
    /// intended way to make a layer optional.
    pub slots: u32,
}

/// A rarity marker: a filename substring mapped to a rarity label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarityDef {
    /// Substring looked up in trait file names, e.g. `"(rare)"`.
    pub marker: String,
    /// Label recorded in attribute metadata, e.g. `"Rare"`.
    pub label: String,
}

/// Root configuration object for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Output canvas dimensions.
    pub format: Format,
    /// Number of unique editions to produce.
    pub editions: u32,
    /// Ordered layer definitions, background first.
    pub layers: Vec<LayerDef>,
    /// Ordered rarity marker table; first matching marker wins.
    #[serde(default)]
    pub rarity: Vec<RarityDef>,
    /// Optional RNG seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ProjectConfig {
    /// Parse a project config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StrataResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StrataError::serde(format!("parse project config JSON: {e}")))
    }

    /// Parse a project config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> StrataResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StrataError::filesystem(format!("open project config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate structural invariants the generator depends on.
    pub fn validate(&self) -> StrataResult<()> {
        if self.format.width == 0 || self.format.height == 0 {
            return Err(StrataError::validation("format dimensions must be > 0"));
        }
        if self.editions == 0 {
            return Err(StrataError::validation("editions must be > 0"));
        }
        if self.layers.is_empty() {
            return Err(StrataError::validation("layers must not be empty"));
        }
        for layer in &self.layers {
            if layer.name.is_empty() {
                return Err(StrataError::validation("layer name must be non-empty"));
            }
            if layer.slots == 0 {
                return Err(StrataError::validation(format!(
                    "layer '{}' slots must be > 0",
                    layer.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json() -> &'static str {
        r#"{
            "format": { "width": 100, "height": 100 },
            "editions": 5,
            "layers": [
                { "name": "Background", "slots": 1 },
                { "name": "Eyes", "slots": 3 }
            ],
            "rarity": [
                { "marker": "(rare)", "label": "Rare" }
            ]
        }"#
    }

    #[test]
    fn parses_and_validates_minimal_config() {
        let cfg = ProjectConfig::from_reader(minimal_json().as_bytes()).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.editions, 5);
        assert_eq!(cfg.layers.len(), 2);
        assert_eq!(cfg.layers[1].slots, 3);
        assert_eq!(cfg.rarity[0].label, "Rare");
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ProjectConfig::from_reader("{not json".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("serialization error:"));
    }

    #[test]
    fn validate_rejects_zero_slots() {
        let mut cfg = ProjectConfig::from_reader(minimal_json().as_bytes()).unwrap();
        cfg.layers[0].slots = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("slots must be > 0"));
    }

    #[test]
    fn validate_rejects_empty_layer_list() {
        let mut cfg = ProjectConfig::from_reader(minimal_json().as_bytes()).unwrap();
        cfg.layers.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_editions() {
        let mut cfg = ProjectConfig::from_reader(minimal_json().as_bytes()).unwrap();
        cfg.editions = 0;
        assert!(cfg.validate().is_err());
    }
}
