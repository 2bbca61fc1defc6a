//! Edition generation session.
//!
//! A session owns the loaded layer catalog, the shared canvas, the
//! duplicate index, and the accepted metadata records. It front-loads
//! config validation and catalog loading, then generates editions 1..=N
//! sequentially with duplicate detection and a bounded retry budget.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::catalog::{Layer, layers_setup};
use crate::config::ProjectConfig;
use crate::foundation::error::{StrataError, StrataResult};
use crate::metadata::{AttributeRecord, Combination, EditionRecord, write_metadata};
use crate::render::{EditionCanvas, decode_image_fit};
use crate::sample::{Sampler, select_element};

/// What happens to the canvas between editions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CanvasPolicy {
    /// Clear to transparent before each edition.
    #[default]
    Fresh,
    /// Keep the previous edition's pixels; later editions paint over them
    /// and earlier imagery shows through transparent regions.
    Carry,
}

/// Options controlling one generation run.
#[derive(Clone, Copy, Debug)]
pub struct GenerateOpts {
    /// Number of unique editions to produce.
    pub editions: u32,
    /// Canvas handling between editions.
    pub canvas_policy: CanvasPolicy,
}

impl GenerateOpts {
    /// Options for `editions` unique editions with a fresh canvas each.
    pub fn new(editions: u32) -> Self {
        Self {
            editions,
            canvas_policy: CanvasPolicy::default(),
        }
    }
}

/// Outcome counters of a generation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerateStats {
    /// Editions accepted and recorded.
    pub editions_created: u32,
    /// Renders discarded as duplicate combinations.
    pub duplicates: u32,
}

/// Per-edition artifacts accumulated while rendering, finalized into an
/// [`EditionRecord`] once the combination is known to be unique.
#[derive(Debug, Default)]
struct EditionDraft {
    combination: Combination,
    attributes: Vec<AttributeRecord>,
}

impl EditionDraft {
    fn finalize(self, edition: u32) -> EditionRecord {
        EditionRecord {
            hash: self.combination.hash_string(),
            decoded_hash: self.combination.pairs().to_vec(),
            edition,
            date: chrono::Utc::now().timestamp_millis(),
            attributes: self.attributes,
        }
    }
}

/// Sequential generator for one batch of editions.
#[derive(Debug)]
pub struct GenerateSession {
    layers: Vec<Layer>,
    canvas: EditionCanvas,
    build_dir: PathBuf,
    duplicate_index: HashMap<String, u32>,
    records: Vec<EditionRecord>,
    opts: GenerateOpts,
}

impl GenerateSession {
    /// Validate the config, load the layer catalog, and set up a session
    /// writing into `build_dir`.
    pub fn new(
        config: &ProjectConfig,
        layers_root: impl AsRef<Path>,
        build_dir: impl Into<PathBuf>,
        opts: GenerateOpts,
    ) -> StrataResult<Self> {
        config.validate()?;
        let layers = layers_setup(config, layers_root.as_ref())?;
        Ok(Self {
            layers,
            canvas: EditionCanvas::new(config.format),
            build_dir: build_dir.into(),
            duplicate_index: HashMap::new(),
            records: Vec::new(),
            opts,
        })
    }

    /// The loaded layer catalog, in draw order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Accepted edition records, in acceptance order.
    pub fn records(&self) -> &[EditionRecord] {
        &self.records
    }

    /// Wipe and recreate the build directory.
    ///
    /// Runs once before any edition is generated.
    pub fn build_setup(&self) -> StrataResult<()> {
        if self.build_dir.exists() {
            std::fs::remove_dir_all(&self.build_dir).map_err(|e| {
                StrataError::filesystem(format!(
                    "remove build directory '{}': {e}",
                    self.build_dir.display()
                ))
            })?;
        }
        std::fs::create_dir_all(&self.build_dir).map_err(|e| {
            StrataError::filesystem(format!(
                "create build directory '{}': {e}",
                self.build_dir.display()
            ))
        })
    }

    /// Generate editions until the requested count is reached or the
    /// duplicate budget runs out.
    ///
    /// Each edition renders all layers in order, then its combination key is
    /// checked against everything accepted so far. A collision logs the
    /// edition it collides with and re-renders the same edition number; once
    /// the total collision count exceeds the requested edition count the
    /// trait space is considered exhausted and generation stops early.
    #[tracing::instrument(skip_all, fields(editions = self.opts.editions))]
    pub fn generate(&mut self, sampler: &mut dyn Sampler) -> StrataResult<GenerateStats> {
        self.build_setup()?;

        let mut stats = GenerateStats::default();
        let mut edition = 1u32;
        while edition <= self.opts.editions {
            let draft = self.render_edition(edition, sampler)?;
            let key = draft.combination.key();

            if let Some(&first) = self.duplicate_index.get(&key) {
                stats.duplicates += 1;
                tracing::warn!(
                    edition,
                    collides_with = first,
                    "duplicate combination, retrying"
                );
                if stats.duplicates > self.opts.editions {
                    tracing::warn!(
                        duplicates = stats.duplicates,
                        "duplicate budget exhausted, stopping generation early"
                    );
                    break;
                }
                continue;
            }

            self.duplicate_index.insert(key, edition);
            self.records.push(draft.finalize(edition));
            tracing::info!(edition, "created edition");
            stats.editions_created += 1;
            edition += 1;
        }
        Ok(stats)
    }

    /// Write the accumulated metadata document, see
    /// [`crate::metadata::write_metadata`].
    pub fn write_metadata(&self) -> StrataResult<()> {
        write_metadata(&self.build_dir, &self.records)
    }

    /// Render all layers of one edition onto the shared canvas.
    ///
    /// Every drawn layer persists the cumulative canvas state to
    /// `<edition>.png`, overwriting any prior partial write for that
    /// edition. Layers whose draw selects nothing contribute neither pixels
    /// nor attributes.
    fn render_edition(
        &mut self,
        edition: u32,
        sampler: &mut dyn Sampler,
    ) -> StrataResult<EditionDraft> {
        if self.opts.canvas_policy == CanvasPolicy::Fresh {
            self.canvas.clear();
        }

        let out_path = self.build_dir.join(format!("{edition}.png"));
        let mut draft = EditionDraft::default();

        let Self { layers, canvas, .. } = self;
        for layer in layers.iter() {
            let Some(element) = select_element(layer, sampler.draw()) else {
                continue;
            };

            draft.combination.push(layer.id, element.id);
            draft.attributes.push(AttributeRecord {
                id: element.id,
                layer: layer.name.clone(),
                name: element.name.clone(),
                rarity: element.rarity.clone(),
            });

            let src_path = layer.location.join(&element.file_name);
            let bytes = std::fs::read(&src_path).map_err(|e| {
                StrataError::filesystem(format!(
                    "read trait image '{}': {e}",
                    src_path.display()
                ))
            })?;
            let img = decode_image_fit(&bytes, layer.size)?;
            canvas.draw(&img, layer.position)?;
            canvas.save_png(&out_path)?;
        }
        Ok(draft)
    }
}
