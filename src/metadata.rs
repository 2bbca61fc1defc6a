//! Edition metadata: attribute records, combination identity, and the
//! write-once metadata file.

use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::foundation::error::{StrataError, StrataResult};

/// File name of the batch metadata document inside the build directory.
pub const METADATA_FILE: &str = "_metadata.json";

/// One selected trait of one edition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttributeRecord {
    /// Element id within its layer.
    pub id: u32,
    /// Layer name.
    pub layer: String,
    /// Cleaned trait display name.
    pub name: String,
    /// Rarity label; absent from JSON when unresolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
}

/// One `(layer id, element id)` selection, serialized as a single-entry
/// `{layerId: elementId}` map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectedPair {
    /// Layer order index.
    pub layer: u32,
    /// Selected element id.
    pub element: u32,
}

impl Serialize for SelectedPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.layer, &self.element)?;
        map.end()
    }
}

/// Ordered `(layer id, element id)` pairs identifying an edition's artwork.
///
/// Two editions with equal combinations are the same artwork; only the
/// first is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Combination {
    pairs: Vec<SelectedPair>,
}

impl Combination {
    /// Append a selection in layer order.
    pub fn push(&mut self, layer: u32, element: u32) {
        self.pairs.push(SelectedPair { layer, element });
    }

    /// `true` when no layer contributed a selection.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Deduplication key: the flat id sequence joined with commas,
    /// e.g. `"0,2,1,1"`.
    pub fn key(&self) -> String {
        self.pairs
            .iter()
            .flat_map(|p| [p.layer, p.element])
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Metadata hash string: the flat id sequence concatenated without a
    /// separator, e.g. `"0211"`.
    pub fn hash_string(&self) -> String {
        self.pairs
            .iter()
            .flat_map(|p| [p.layer, p.element])
            .map(|v| v.to_string())
            .collect()
    }

    /// The pairs in layer order.
    pub fn pairs(&self) -> &[SelectedPair] {
        &self.pairs
    }
}

/// Metadata of one accepted edition. Never mutated after creation.
#[derive(Clone, Debug, Serialize)]
pub struct EditionRecord {
    /// Combination hash string, see [`Combination::hash_string`].
    pub hash: String,
    /// Per-layer selection map in layer order.
    #[serde(rename = "decodedHash")]
    pub decoded_hash: Vec<SelectedPair>,
    /// Edition number.
    pub edition: u32,
    /// Creation time in epoch milliseconds (UTC).
    pub date: i64,
    /// Selected trait attributes in layer order.
    pub attributes: Vec<AttributeRecord>,
}

/// Write the batch metadata as pretty-printed JSON, exactly once.
///
/// An existing file is left untouched and the write skipped; a stat failure
/// other than not-found is logged and skipped as well. Neither case aborts
/// the run.
pub fn write_metadata(build_dir: &Path, records: &[EditionRecord]) -> StrataResult<()> {
    let path = build_dir.join(METADATA_FILE);
    match std::fs::metadata(&path) {
        Ok(_) => {
            tracing::warn!(path = %path.display(), "metadata file already exists, skipping write");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let json = serde_json::to_string_pretty(records)
                .map_err(|e| StrataError::serde(format!("encode metadata: {e}")))?;
            std::fs::write(&path, json).map_err(|e| {
                StrataError::filesystem(format!("write metadata '{}': {e}", path.display()))
            })
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not stat metadata file, skipping write");
            Ok(())
        }
    }
}
