//! Biome classification
//!
//! Assigns every face a [`Biome`] in four passes over the planar graph:
//!
//! 1. elevation/moisture decision table
//! 2. low, flat basins collapse to fresh water
//! 3. fresh water connected to the first fresh-water face becomes ocean
//! 4. gentle coastal land next to the ocean becomes beach

mod colors;

pub use colors::{BasicColorMapper, ColorMapper, CustomColorMapper, TerrainColor, ALARM_COLOR};

use log::{debug, warn};

use crate::graph::{FaceId, PlanarGraph};

/// Faces above this elevation use the alpine rules
pub const VERY_HIGH_ELEVATION: f32 = 22.0;
/// Faces above this elevation use the highland rules
pub const HIGH_ELEVATION: f32 = 12.0;
/// Faces above this elevation use the midland rules, anything lower is lowland
pub const MID_ELEVATION: f32 = 3.0;
/// Faces at or below this elevation (with equally low neighbours) are water
pub const WATER_CUTOFF: f32 = 0.2;
/// Coastal faces whose corner heights span less than this become beach
pub const BEACH_MAX_HEIGHT_SPREAD: f32 = 0.8;

/// Biome categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Biome {
    /// Standing inland water
    FreshWater,
    /// Ocean, connected to the map's main body of water
    SaltWater,
    Beach,

    // Lowland, by decreasing moisture
    TropicalRainForest,
    TropicalSeasonalForest,
    Grassland,
    SubtropicalDesert,

    // Midland
    TemperateRainForest,
    TemperateDeciduousForest,
    TemperateDesert,

    // Highland
    Taiga,
    Shrubland,

    // Alpine
    Snow,
    Tundra,
    Bare,
    Scorched,

    /// Not classified, or classification could not proceed
    #[default]
    Error,
}

impl Biome {
    /// Every category, in declaration order
    pub const ALL: [Biome; 17] = [
        Biome::FreshWater,
        Biome::SaltWater,
        Biome::Beach,
        Biome::TropicalRainForest,
        Biome::TropicalSeasonalForest,
        Biome::Grassland,
        Biome::SubtropicalDesert,
        Biome::TemperateRainForest,
        Biome::TemperateDeciduousForest,
        Biome::TemperateDesert,
        Biome::Taiga,
        Biome::Shrubland,
        Biome::Snow,
        Biome::Tundra,
        Biome::Bare,
        Biome::Scorched,
        Biome::Error,
    ];

    /// Fresh or salt water
    pub fn is_water(&self) -> bool {
        matches!(self, Biome::FreshWater | Biome::SaltWater)
    }

    /// Any classified non-water category
    pub fn is_land(&self) -> bool {
        !self.is_water() && *self != Biome::Error
    }

    pub fn name(&self) -> &'static str {
        match self {
            Biome::FreshWater => "Fresh Water",
            Biome::SaltWater => "Salt Water",
            Biome::Beach => "Beach",
            Biome::TropicalRainForest => "Tropical Rain Forest",
            Biome::TropicalSeasonalForest => "Tropical Seasonal Forest",
            Biome::Grassland => "Grassland",
            Biome::SubtropicalDesert => "Subtropical Desert",
            Biome::TemperateRainForest => "Temperate Rain Forest",
            Biome::TemperateDeciduousForest => "Temperate Deciduous Forest",
            Biome::TemperateDesert => "Temperate Desert",
            Biome::Taiga => "Taiga",
            Biome::Shrubland => "Shrubland",
            Biome::Snow => "Snow",
            Biome::Tundra => "Tundra",
            Biome::Bare => "Bare",
            Biome::Scorched => "Scorched",
            Biome::Error => "Error",
        }
    }

    /// Terrestrial biome for an elevation and moisture
    ///
    /// Bands are checked from the highest down and moisture from the wettest
    /// down; the first matching rule wins.
    pub fn from_elevation_moisture(elevation: f32, moisture: f32) -> Biome {
        if elevation > VERY_HIGH_ELEVATION {
            if moisture >= 0.5 {
                Biome::Snow
            } else if moisture >= 0.33 {
                Biome::Tundra
            } else if moisture >= 0.16 {
                Biome::Bare
            } else {
                Biome::Scorched
            }
        } else if elevation > HIGH_ELEVATION {
            if moisture >= 0.66 {
                Biome::Taiga
            } else if moisture >= 0.33 {
                Biome::Shrubland
            } else {
                Biome::TemperateDesert
            }
        } else if elevation > MID_ELEVATION {
            if moisture >= 0.83 {
                Biome::TemperateRainForest
            } else if moisture >= 0.5 {
                Biome::TemperateDeciduousForest
            } else if moisture >= 0.16 {
                Biome::Grassland
            } else {
                Biome::TemperateDesert
            }
        } else if moisture >= 0.66 {
            Biome::TropicalRainForest
        } else if moisture >= 0.33 {
            Biome::TropicalSeasonalForest
        } else if moisture >= 0.16 {
            Biome::Grassland
        } else {
            Biome::SubtropicalDesert
        }
    }
}

/// Face-level biome classifier for a uniform map moisture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeClassifier {
    pub moisture: f32,
}

impl BiomeClassifier {
    pub fn new(moisture: f32) -> Self {
        Self { moisture }
    }

    /// Run all four passes in order
    pub fn classify(&self, graph: &mut PlanarGraph) {
        self.assign_terrestrial(graph);
        let lakes = collapse_low_faces(graph, WATER_CUTOFF);
        let ocean = fill_ocean(graph);
        let beaches = mark_beaches(graph);
        debug!(
            "biomes: {} faces collapsed to water, {} filled as ocean, {} beaches",
            lakes, ocean, beaches
        );
    }

    /// Pass 1: decision table on every face
    pub fn assign_terrestrial(&self, graph: &mut PlanarGraph) {
        for face in 0..graph.face_count() {
            let biome = Biome::from_elevation_moisture(graph.elevation(face), self.moisture);
            graph.set_biome(face, biome);
        }
    }
}

/// Pass 2: faces at or below `cutoff` whose neighbours are all at or below
/// `cutoff` become fresh water
///
/// `Error` faces are left alone. Returns the number of faces changed.
pub fn collapse_low_faces(graph: &mut PlanarGraph, cutoff: f32) -> usize {
    let low: Vec<FaceId> = (0..graph.face_count())
        .filter(|&face| {
            graph.biome(face) != Biome::Error
                && graph.elevation(face) <= cutoff
                && graph.neighbors(face).all(|n| graph.elevation(n) <= cutoff)
        })
        .collect();

    for &face in &low {
        graph.set_biome(face, Biome::FreshWater);
    }
    low.len()
}

/// Replace `target` with `replacement` on every face reachable from `start`
/// through faces tagged `target`
///
/// Uses an explicit work stack. Returns the number of faces changed.
pub fn flood_fill(graph: &mut PlanarGraph, start: FaceId, target: Biome, replacement: Biome) -> usize {
    if target == replacement || graph.biome(start) != target {
        return 0;
    }

    let mut filled = 0;
    let mut stack = vec![start];
    while let Some(face) = stack.pop() {
        if graph.biome(face) != target {
            continue;
        }
        graph.set_biome(face, replacement);
        filled += 1;
        stack.extend(graph.neighbors(face).filter(|&n| graph.biome(n) == target));
    }
    filled
}

/// Pass 3: flood the fresh water reachable from the first fresh-water face
/// into salt water
///
/// No-op when the map has no fresh water. Returns the number of faces changed.
pub fn fill_ocean(graph: &mut PlanarGraph) -> usize {
    let seed = graph
        .faces()
        .iter()
        .find(|f| f.biome == Biome::FreshWater)
        .map(|f| f.id);

    match seed {
        Some(seed) => flood_fill(graph, seed, Biome::FreshWater, Biome::SaltWater),
        None => {
            warn!("no fresh-water face to seed the ocean from");
            0
        }
    }
}

/// Whether a land face borders the ocean
pub fn is_coastal(graph: &PlanarGraph, face: FaceId) -> bool {
    graph.biome(face).is_land()
        && graph
            .neighbors(face)
            .any(|n| graph.biome(n) == Biome::SaltWater)
}

/// Pass 4: coastal land with a small corner-height spread becomes beach
///
/// Returns the number of faces changed.
pub fn mark_beaches(graph: &mut PlanarGraph) -> usize {
    let view: &PlanarGraph = graph;
    let beaches: Vec<FaceId> = (0..view.face_count())
        .filter(|&face| {
            is_coastal(view, face) && view.height_spread(face) < BEACH_MAX_HEIGHT_SPREAD
        })
        .collect();

    for &face in &beaches {
        graph.set_biome(face, Biome::Beach);
    }
    beaches.len()
}
