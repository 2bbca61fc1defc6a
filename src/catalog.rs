//! Layer catalog loading.
//!
//! Scans one asset folder per configured layer and builds the ordered trait
//! element lists the selector draws from. Element order is load-bearing: the
//! element at index `i` is exactly the one a draw landing on slot `i`
//! selects, so the catalog pins listing order to lexicographic file-name
//! order to keep runs reproducible across platforms.

use std::path::{Path, PathBuf};

use crate::config::{ProjectConfig, RarityDef};
use crate::foundation::core::{Position, Size};
use crate::foundation::error::{StrataError, StrataResult};

/// One selectable trait asset inside a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitElement {
    /// 1-based id, contiguous in listing order and stable for the run.
    pub id: u32,
    /// Display name: file name minus extension and rarity markers.
    pub name: String,
    /// Source file name inside the layer folder.
    pub file_name: String,
    /// Rarity label from the first matching marker; `None` when no marker
    /// matched (left unresolved rather than defaulted).
    pub rarity: Option<String>,
}

/// A trait category with its loaded elements and draw parameters.
#[derive(Debug, Clone)]
pub struct Layer {
    /// Order index within the configured layer list.
    pub id: u32,
    /// Layer name.
    pub name: String,
    /// Asset folder this layer was loaded from.
    pub location: PathBuf,
    /// Elements in listing order; index position is part of the rarity model.
    pub elements: Vec<TraitElement>,
    /// Top-left position the layer is drawn at.
    pub position: Position,
    /// Extent the layer is drawn at.
    pub size: Size,
    /// Selection denominator, see [`crate::config::LayerDef::slots`].
    pub slots: u32,
}

/// Derive the display name for a trait file.
pub fn clean_name(file_name: &str, rarity: &[RarityDef]) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_owned());
    rarity
        .iter()
        .filter(|r| !r.marker.is_empty())
        .fold(stem, |name, r| name.replace(&r.marker, ""))
}

/// Resolve the rarity label for a trait file name.
///
/// The first configured marker found as a substring wins; no match leaves
/// the rarity unresolved.
pub fn rarity_for(file_name: &str, rarity: &[RarityDef]) -> Option<String> {
    rarity
        .iter()
        .find(|r| file_name.contains(&r.marker))
        .map(|r| r.label.clone())
}

/// Load the ordered trait elements of one layer folder.
///
/// Hidden (dot-prefixed) entries are skipped. Ids are assigned 1..=K in
/// listing order. A missing or unreadable folder is fatal to the run.
pub fn load_elements(dir: &Path, rarity: &[RarityDef]) -> StrataResult<Vec<TraitElement>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        StrataError::filesystem(format!("read layer directory '{}': {e}", dir.display()))
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            StrataError::filesystem(format!("list layer directory '{}': {e}", dir.display()))
        })?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') {
            continue;
        }
        names.push(file_name);
    }
    names.sort();

    Ok(names
        .into_iter()
        .enumerate()
        .map(|(index, file_name)| TraitElement {
            id: index as u32 + 1,
            name: clean_name(&file_name, rarity),
            rarity: rarity_for(&file_name, rarity),
            file_name,
        })
        .collect())
}

/// Build the full layer catalog for a run.
///
/// One [`Layer`] per configured layer definition, in configured order, each
/// positioned at the canvas origin and sized to the full format.
pub fn layers_setup(config: &ProjectConfig, layers_root: &Path) -> StrataResult<Vec<Layer>> {
    config
        .layers
        .iter()
        .enumerate()
        .map(|(index, def)| {
            let location = layers_root.join(&def.name);
            let elements = load_elements(&location, &config.rarity)?;
            Ok(Layer {
                id: index as u32,
                name: def.name.clone(),
                location,
                elements,
                position: Position::default(),
                size: Size::from(config.format),
                slots: def.slots,
            })
        })
        .collect()
}
