//! Biome classification from terrain and temperature values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Biome of a world cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Mountain,
    Water,
    Desert,
    Tundra,
    Plains,
}

impl Biome {
    pub fn name(self) -> &'static str {
        match self {
            Biome::Mountain => "mountain",
            Biome::Water => "water",
            Biome::Desert => "desert",
            Biome::Tundra => "tundra",
            Biome::Plains => "plains",
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cut-offs for [`BiomeThresholds::classify`]. All comparisons are strict.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeThresholds {
    /// Terrain above this is mountain.
    pub mountain_above: f64,
    /// Terrain below this is water.
    pub water_below: f64,
    /// Temperature above this is desert.
    pub desert_above: f64,
    /// Temperature below this is tundra.
    pub tundra_below: f64,
}

impl Default for BiomeThresholds {
    fn default() -> Self {
        Self {
            mountain_above: 0.7,
            water_below: 0.3,
            desert_above: 0.7,
            tundra_below: 0.3,
        }
    }
}

impl BiomeThresholds {
    /// Classify a cell. Terrain rules are checked before temperature rules;
    /// the first match wins and plains is the fallback.
    pub fn classify(&self, terrain: f64, temperature: f64) -> Biome {
        if terrain > self.mountain_above {
            Biome::Mountain
        } else if terrain < self.water_below {
            Biome::Water
        } else if temperature > self.desert_above {
            Biome::Desert
        } else if temperature < self.tundra_below {
            Biome::Tundra
        } else {
            Biome::Plains
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_classifications() {
        let t = BiomeThresholds::default();
        assert_eq!(t.classify(0.8, 0.5), Biome::Mountain);
        assert_eq!(t.classify(0.2, 0.5), Biome::Water);
        assert_eq!(t.classify(0.5, 0.8), Biome::Desert);
        assert_eq!(t.classify(0.5, 0.2), Biome::Tundra);
        assert_eq!(t.classify(0.5, 0.5), Biome::Plains);
    }

    #[test]
    fn test_terrain_checked_before_temperature() {
        let t = BiomeThresholds::default();
        assert_eq!(t.classify(0.9, 0.9), Biome::Mountain);
        assert_eq!(t.classify(0.9, 0.1), Biome::Mountain);
        assert_eq!(t.classify(0.1, 0.9), Biome::Water);
        assert_eq!(t.classify(0.1, 0.1), Biome::Water);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let t = BiomeThresholds::default();
        assert_eq!(t.classify(0.7, 0.5), Biome::Plains);
        assert_eq!(t.classify(0.3, 0.5), Biome::Plains);
        assert_eq!(t.classify(0.5, 0.7), Biome::Plains);
        assert_eq!(t.classify(0.5, 0.3), Biome::Plains);
    }

    #[test]
    fn test_every_input_resolves() {
        let t = BiomeThresholds::default();
        let steps = 50;
        let mut seen = std::collections::HashSet::new();
        for i in 0..=steps {
            for j in 0..=steps {
                seen.insert(t.classify(i as f64 / steps as f64, j as f64 / steps as f64));
            }
        }
        assert_eq!(seen.len(), 5, "Every biome should be reachable");
    }

    #[test]
    fn test_names() {
        assert_eq!(Biome::Mountain.to_string(), "mountain");
        assert_eq!(Biome::Plains.name(), "plains");
    }
}
