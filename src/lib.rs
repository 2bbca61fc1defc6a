//! Strata assembles unique image editions from stacked PNG trait layers.
//!
//! A run is config-driven: a [`ProjectConfig`] names the ordered layers,
//! their slot counts, the canvas format, and the rarity marker table. A
//! [`GenerateSession`] loads the layer catalog, draws one trait per layer
//! through a [`Sampler`], composites the selected PNGs onto a shared
//! canvas, and records each accepted (non-duplicate) combination as an
//! edition with attribute metadata.
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod foundation;
pub mod metadata;
pub mod render;
pub mod sample;
pub mod session;

pub use catalog::{Layer, TraitElement};
pub use config::{LayerDef, ProjectConfig, RarityDef};
pub use foundation::core::{Format, Position, Size};
pub use foundation::error::{StrataError, StrataResult};
pub use metadata::{AttributeRecord, Combination, EditionRecord, METADATA_FILE};
pub use sample::{RngSampler, Sampler, ScriptedSampler};
pub use session::{CanvasPolicy, GenerateOpts, GenerateSession, GenerateStats};
