//! Trait selection.
//!
//! A layer contributes zero or one element per edition. The draw is a
//! uniform fraction in `[0, 1)` scaled by the layer's slot count; an index
//! inside the element list selects that element, anything past the end means
//! the layer sits this edition out.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::catalog::{Layer, TraitElement};

/// Source of uniform draws in `[0, 1)`.
pub trait Sampler {
    /// Produce the next draw.
    fn draw(&mut self) -> f64;
}

/// Production sampler backed by a seedable RNG.
pub struct RngSampler {
    rng: StdRng,
}

impl RngSampler {
    /// Sampler seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sampler for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for RngSampler {
    fn draw(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Sampler replaying a fixed draw sequence, wrapping around at the end.
///
/// Used by tests and deterministic scenario runs.
pub struct ScriptedSampler {
    draws: Vec<f64>,
    next: usize,
}

impl ScriptedSampler {
    /// Build a sampler from a non-empty draw sequence.
    ///
    /// # Panics
    ///
    /// Panics if `draws` is empty.
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "ScriptedSampler needs at least one draw");
        Self { draws, next: 0 }
    }
}

impl Sampler for ScriptedSampler {
    fn draw(&mut self) -> f64 {
        let v = self.draws[self.next % self.draws.len()];
        self.next += 1;
        v
    }
}

/// Map one draw onto a layer's element list.
///
/// `index = floor(draw * slots)`. Element order from the catalog load is
/// part of the rarity model: each element is picked with probability
/// `1 / slots`, and slots beyond the element count yield no selection.
pub fn select_element(layer: &Layer, draw: f64) -> Option<&TraitElement> {
    let index = (draw * f64::from(layer.slots)).floor() as usize;
    layer.elements.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Position, Size};

    fn layer(slots: u32, element_count: u32) -> Layer {
        Layer {
            id: 0,
            name: "bg".into(),
            location: "layers/bg".into(),
            elements: (1..=element_count)
                .map(|id| TraitElement {
                    id,
                    name: format!("e{id}"),
                    file_name: format!("e{id}.png"),
                    rarity: None,
                })
                .collect(),
            position: Position::default(),
            size: Size {
                width: 1,
                height: 1,
            },
            slots,
        }
    }

    #[test]
    fn draw_maps_to_slot_index() {
        let l = layer(2, 2);
        assert_eq!(select_element(&l, 0.0).unwrap().id, 1);
        assert_eq!(select_element(&l, 0.49).unwrap().id, 1);
        assert_eq!(select_element(&l, 0.5).unwrap().id, 2);
        assert_eq!(select_element(&l, 0.99).unwrap().id, 2);
    }

    #[test]
    fn slot_past_element_count_selects_nothing() {
        let l = layer(4, 2);
        assert_eq!(select_element(&l, 0.1).unwrap().id, 1);
        assert_eq!(select_element(&l, 0.3).unwrap().id, 2);
        assert!(select_element(&l, 0.6).is_none());
        assert!(select_element(&l, 0.99).is_none());
    }

    #[test]
    fn rng_sampler_is_reproducible_for_a_seed() {
        let mut a = RngSampler::seeded(7);
        let mut b = RngSampler::seeded(7);
        for _ in 0..16 {
            let d = a.draw();
            assert!((0.0..1.0).contains(&d));
            assert_eq!(d.to_bits(), b.draw().to_bits());
        }
    }

    #[test]
    fn scripted_sampler_wraps_around() {
        let mut s = ScriptedSampler::new(vec![0.1, 0.9]);
        assert_eq!(s.draw(), 0.1);
        assert_eq!(s.draw(), 0.9);
        assert_eq!(s.draw(), 0.1);
    }
}
