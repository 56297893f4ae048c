//! Biome classification and smooth boundary blending.
//!
//! A biome matches a rectangle in (elevation, moisture) space and fades
//! out toward the rectangle border with a pyramid-shaped falloff; the
//! per-vertex falloff strengths are normalized into four splatmap channel
//! weights, which is what keeps biome borders free of hard seams.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::NoiseParams;
use crate::world::vegetation::DecorationDefinition;

/// The fixed set of per-biome height modifications.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TerrainShaping {
    /// Leave the base height untouched.
    Flat,
    /// Gentle additive undulation.
    RollingHills { noise: NoiseParams, amplitude: f32 },
    /// Sharp creases from inverted-absolute noise.
    Ridged { noise: NoiseParams, amplitude: f32 },
    /// Rounded crests from absolute noise.
    Dunes { noise: NoiseParams, amplitude: f32 },
}

impl TerrainShaping {
    pub fn apply(&self, base_height: f32, world_x: f32, world_z: f32) -> f32 {
        match self {
            TerrainShaping::Flat => base_height,
            TerrainShaping::RollingHills { noise, amplitude } => {
                base_height + noise.sample_2d(world_x, world_z) * amplitude
            }
            TerrainShaping::Ridged { noise, amplitude } => {
                base_height + (1.0 - noise.sample_2d(world_x, world_z).abs()) * amplitude
            }
            TerrainShaping::Dunes { noise, amplitude } => {
                base_height + noise.sample_2d(world_x, world_z).abs() * amplitude
            }
        }
    }
}

/// One biome: a match rectangle in (elevation, moisture) space, a splatmap
/// channel, a height-shaping rule and the decorations it spawns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomeData {
    pub name: String,
    /// Higher priority wins first-match classification.
    pub priority: i32,
    /// Target channel 0..=3 of the per-vertex weight vector.
    pub splatmap_channel: usize,
    /// Closed range of normalized elevation [0, 1].
    pub elevation_range: (f32, f32),
    /// Closed range of moisture [0, 1].
    pub moisture_range: (f32, f32),
    pub shaping: TerrainShaping,
    pub decorations: Vec<DecorationDefinition>,
}

impl BiomeData {
    pub fn new(
        name: &str,
        priority: i32,
        splatmap_channel: usize,
        elevation_range: (f32, f32),
        moisture_range: (f32, f32),
    ) -> Self {
        Self {
            name: name.to_string(),
            priority,
            splatmap_channel: splatmap_channel.min(3),
            elevation_range,
            moisture_range,
            shaping: TerrainShaping::Flat,
            decorations: Vec::new(),
        }
    }

    pub fn with_shaping(mut self, shaping: TerrainShaping) -> Self {
        self.shaping = shaping;
        self
    }

    pub fn with_decorations(mut self, decorations: Vec<DecorationDefinition>) -> Self {
        self.decorations = decorations;
        self
    }

    /// True iff both values lie within this biome's closed ranges.
    pub fn matches(&self, elevation: f32, moisture: f32) -> bool {
        elevation >= self.elevation_range.0
            && elevation <= self.elevation_range.1
            && moisture >= self.moisture_range.0
            && moisture <= self.moisture_range.1
    }

    /// Pyramid falloff from the range center: 1 at the center, 0 at the
    /// border and outside. Used for boundary blending.
    pub fn match_strength(&self, elevation: f32, moisture: f32) -> f32 {
        if !self.matches(elevation, moisture) {
            return 0.0;
        }
        let distance = |value: f32, range: (f32, f32)| {
            let half = (range.1 - range.0) * 0.5;
            if half <= 0.0 {
                return 0.0;
            }
            let center = (range.0 + range.1) * 0.5;
            (value - center).abs() / half
        };
        let e = distance(elevation, self.elevation_range);
        let m = distance(moisture, self.moisture_range);
        (1.0 - e.max(m)).clamp(0.0, 1.0)
    }

    pub fn modify_height(&self, base_height: f32, world_x: f32, world_z: f32) -> f32 {
        self.shaping.apply(base_height, world_x, world_z)
    }

    // Ready-made biomes. Channel assignment is stable so splatmaps stay
    // comparable across worlds: plains=0, forest=1, mountains=2, desert=3.

    pub fn plains(seed: i32) -> Self {
        BiomeData::new("plains", 0, 0, (0.0, 0.55), (0.2, 0.7))
            .with_shaping(TerrainShaping::RollingHills {
                noise: NoiseParams::simplex(seed.wrapping_add(101), 0.01),
                amplitude: 1.5,
            })
            .with_decorations(vec![
                DecorationDefinition::grass_bush().with_density(0.02),
            ])
    }

    pub fn forest(seed: i32) -> Self {
        BiomeData::new("forest", 1, 1, (0.15, 0.7), (0.45, 1.0))
            .with_shaping(TerrainShaping::RollingHills {
                noise: NoiseParams::simplex(seed.wrapping_add(102), 0.02),
                amplitude: 3.0,
            })
            .with_decorations(vec![
                DecorationDefinition::tree(),
                DecorationDefinition::grass_bush(),
            ])
    }

    pub fn mountains(seed: i32) -> Self {
        BiomeData::new("mountains", 2, 2, (0.55, 1.0), (0.0, 1.0))
            .with_shaping(TerrainShaping::Ridged {
                noise: NoiseParams::fbm(seed.wrapping_add(103), 0.008),
                amplitude: 12.0,
            })
            .with_decorations(vec![DecorationDefinition::rock()])
    }

    pub fn desert(seed: i32) -> Self {
        BiomeData::new("desert", 1, 3, (0.0, 0.5), (0.0, 0.3))
            .with_shaping(TerrainShaping::Dunes {
                noise: NoiseParams::simplex(seed.wrapping_add(104), 0.015),
                amplitude: 4.0,
            })
            .with_decorations(vec![DecorationDefinition::rock().with_density(0.002)])
    }
}

/// Owns the biome list plus a fallback used when nothing matches.
/// The list is kept priority-descending so first-match lookups are
/// deterministic; blending always considers every matching biome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiomeMap {
    biomes: Vec<BiomeData>,
    fallback: Option<BiomeData>,
}

impl BiomeMap {
    pub fn new(mut biomes: Vec<BiomeData>, fallback: Option<BiomeData>) -> Self {
        biomes.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { biomes, fallback }
    }

    /// The default four-biome world: plains fallback, forest, mountains,
    /// desert.
    pub fn standard(seed: i32) -> Self {
        BiomeMap::new(
            vec![
                BiomeData::plains(seed),
                BiomeData::forest(seed),
                BiomeData::mountains(seed),
                BiomeData::desert(seed),
            ],
            Some(BiomeData::plains(seed)),
        )
    }

    pub fn push(&mut self, biome: BiomeData) {
        self.biomes.push(biome);
        self.biomes.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    pub fn biomes(&self) -> &[BiomeData] {
        &self.biomes
    }

    pub fn fallback(&self) -> Option<&BiomeData> {
        self.fallback.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty() && self.fallback.is_none()
    }

    /// First matching biome in priority-descending order, else the
    /// fallback, else `None` with a diagnostic warning.
    pub fn get_biome(&self, elevation: f32, moisture: f32) -> Option<&BiomeData> {
        self.biomes
            .iter()
            .find(|b| b.matches(elevation, moisture))
            .or(self.fallback.as_ref())
            .or_else(|| {
                warn!(elevation, moisture, "no biome matches and no fallback is set");
                None
            })
    }

    /// Blend weights over the four splatmap channels, non-negative and
    /// summing to 1. Accumulates every matching biome's strength into its
    /// channel and normalizes by the total; with no match the fallback's
    /// channel gets full weight, and channel 0 is the last resort.
    pub fn get_biome_weights(&self, elevation: f32, moisture: f32) -> [f32; 4] {
        let mut weights = [0.0f32; 4];
        let mut total = 0.0;
        for biome in &self.biomes {
            let strength = biome.match_strength(elevation, moisture);
            if strength > 0.0 {
                weights[biome.splatmap_channel.min(3)] += strength;
                total += strength;
            }
        }

        if total > 0.0 {
            for w in &mut weights {
                *w /= total;
            }
        } else if let Some(fallback) = &self.fallback {
            weights[fallback.splatmap_channel.min(3)] = 1.0;
        } else {
            weights[0] = 1.0;
        }
        weights
    }

    /// Blend the per-biome modified heights proportionally to match
    /// strength. With no matching biome the fallback's shaping applies,
    /// or the base height passes through unchanged.
    pub fn blended_height(
        &self,
        base_height: f32,
        elevation: f32,
        moisture: f32,
        world_x: f32,
        world_z: f32,
    ) -> f32 {
        let mut total = 0.0;
        let mut accumulated = 0.0;
        for biome in &self.biomes {
            let strength = biome.match_strength(elevation, moisture);
            if strength > 0.0 {
                accumulated += biome.modify_height(base_height, world_x, world_z) * strength;
                total += strength;
            }
        }
        if total > 0.0 {
            accumulated / total
        } else if let Some(fallback) = &self.fallback {
            fallback.modify_height(base_height, world_x, world_z)
        } else {
            base_height
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> BiomeMap {
        BiomeMap::standard(7)
    }

    #[test]
    fn matches_uses_closed_ranges() {
        let biome = BiomeData::new("b", 0, 0, (0.2, 0.6), (0.0, 1.0));
        assert!(biome.matches(0.2, 0.5));
        assert!(biome.matches(0.6, 1.0));
        assert!(!biome.matches(0.61, 0.5));
    }

    #[test]
    fn match_strength_peaks_at_center_and_dies_at_border() {
        let biome = BiomeData::new("b", 0, 0, (0.0, 1.0), (0.0, 1.0));
        assert_eq!(biome.match_strength(0.5, 0.5), 1.0);
        assert_eq!(biome.match_strength(0.0, 0.5), 0.0);
        assert!(biome.match_strength(0.25, 0.5) > 0.0);
        assert_eq!(biome.match_strength(1.5, 0.5), 0.0);
    }

    #[test]
    fn zero_width_range_matches_only_exact_value() {
        let biome = BiomeData::new("b", 0, 0, (0.5, 0.5), (0.0, 1.0));
        assert_eq!(biome.match_strength(0.5, 0.5), 1.0);
        assert_eq!(biome.match_strength(0.51, 0.5), 0.0);
    }

    #[test]
    fn first_match_follows_priority_descending() {
        let low = BiomeData::new("low", 0, 0, (0.0, 1.0), (0.0, 1.0));
        let high = BiomeData::new("high", 5, 1, (0.0, 1.0), (0.0, 1.0));
        let map = BiomeMap::new(vec![low, high], None);
        assert_eq!(map.get_biome(0.5, 0.5).unwrap().name, "high");
    }

    #[test]
    fn fallback_is_used_when_nothing_matches() {
        let narrow = BiomeData::new("narrow", 0, 0, (0.9, 1.0), (0.9, 1.0));
        let fallback = BiomeData::new("fallback", 0, 2, (0.0, 0.0), (0.0, 0.0));
        let map = BiomeMap::new(vec![narrow], Some(fallback));
        assert_eq!(map.get_biome(0.1, 0.1).unwrap().name, "fallback");
        let weights = map.get_biome_weights(0.1, 0.1);
        assert_eq!(weights, [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn no_biomes_and_no_fallback_defaults_to_channel_zero() {
        let map = BiomeMap::new(Vec::new(), None);
        assert!(map.get_biome(0.5, 0.5).is_none());
        assert_eq!(map.get_biome_weights(0.5, 0.5), [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn weights_are_normalized_everywhere() {
        let map = map();
        for e in 0..=20 {
            for m in 0..=20 {
                let weights = map.get_biome_weights(e as f32 / 20.0, m as f32 / 20.0);
                let sum: f32 = weights.iter().sum();
                assert!((sum - 1.0).abs() < 1e-6, "sum {sum} at ({e}, {m})");
                assert!(weights.iter().all(|&w| w >= 0.0));
            }
        }
    }

    #[test]
    fn blended_height_is_identity_for_flat_shaping() {
        let flat = BiomeData::new("flat", 0, 0, (0.0, 1.0), (0.0, 1.0));
        let map = BiomeMap::new(vec![flat], None);
        assert_eq!(map.blended_height(12.0, 0.5, 0.5, 3.0, 4.0), 12.0);
    }

    #[test]
    fn blended_height_passes_through_without_biomes() {
        let map = BiomeMap::new(Vec::new(), None);
        assert_eq!(map.blended_height(7.5, 0.5, 0.5, 0.0, 0.0), 7.5);
    }
}
