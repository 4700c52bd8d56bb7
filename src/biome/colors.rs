//! Color mapping for biomes

use std::collections::HashMap;

use super::Biome;

/// RGBA color type
pub type TerrainColor = [f32; 4];

/// Bright red, shown for faces that failed classification
pub const ALARM_COLOR: TerrainColor = [1.0, 0.0, 0.0, 1.0];

/// Trait for mapping terrain categories to colors
pub trait ColorMapper<T> {
    /// Map a terrain category to an RGBA color
    fn map_color(&self, terrain: &T) -> TerrainColor;
}

fn rgb(r: u8, g: u8, b: u8) -> TerrainColor {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Default palette for [`Biome`]
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicColorMapper;

impl ColorMapper<Biome> for BasicColorMapper {
    fn map_color(&self, biome: &Biome) -> TerrainColor {
        match biome {
            Biome::FreshWater => rgb(29, 162, 216),
            Biome::SaltWater => rgb(6, 66, 115),
            Biome::Beach => rgb(248, 240, 164),
            Biome::TropicalRainForest => rgb(51, 119, 85),
            Biome::TropicalSeasonalForest => rgb(85, 153, 68),
            Biome::Grassland => rgb(136, 170, 85),
            Biome::SubtropicalDesert => rgb(210, 185, 139),
            Biome::TemperateRainForest => rgb(68, 136, 85),
            Biome::TemperateDeciduousForest => rgb(103, 148, 89),
            Biome::TemperateDesert => rgb(201, 210, 155),
            Biome::Taiga => rgb(153, 170, 119),
            Biome::Shrubland => rgb(136, 153, 119),
            Biome::Snow => rgb(255, 255, 255),
            Biome::Tundra => rgb(187, 187, 170),
            Biome::Bare => rgb(136, 136, 136),
            Biome::Scorched => rgb(85, 85, 85),
            Biome::Error => ALARM_COLOR,
        }
    }
}

/// Color mapper with a user-supplied color per biome
///
/// Biomes without an entry map to [`ALARM_COLOR`].
#[derive(Debug, Clone, Default)]
pub struct CustomColorMapper {
    pub colors: HashMap<Biome, TerrainColor>,
}

impl CustomColorMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the [`BasicColorMapper`] palette
    pub fn from_basic() -> Self {
        let colors = Biome::ALL
            .iter()
            .map(|b| (*b, BasicColorMapper.map_color(b)))
            .collect();
        Self { colors }
    }

    pub fn with_color(mut self, biome: Biome, color: TerrainColor) -> Self {
        self.colors.insert(biome, color);
        self
    }
}

impl ColorMapper<Biome> for CustomColorMapper {
    fn map_color(&self, biome: &Biome) -> TerrainColor {
        self.colors.get(biome).copied().unwrap_or(ALARM_COLOR)
    }
}
