//! Procedural island generation over Voronoi-like cell partitions
//!
//! Synthesizes a fractal height field, stitches an externally supplied plane
//! partition into a half-edge graph lifted onto that field, classifies every
//! cell into a biome, and scores the resulting landmass.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voronoi_island::*;
//!
//! let config = IslandConfigBuilder::new()
//!     .seed(42)
//!     .moisture(0.6).unwrap()
//!     .build().unwrap();
//!
//! // Any tessellation works; a regular grid stands in for a Voronoi diagram
//! let partition = Partition::square_grid(config.size() as f32, 50);
//! let island = Island::generate(config, &partition).unwrap();
//!
//! for face in island.graph().faces() {
//!     let color = BasicColorMapper.map_color(&face.biome);
//!     // hand `color` and the face corners to a renderer
//! #   let _ = color;
//! }
//! println!("{}", island.evaluate());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) plane-point-to-face lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and partition input

// Modules
pub mod error;
pub mod config;
pub mod curve;
pub mod terrain;
pub mod partition;
pub mod graph;
pub mod biome;
pub mod evaluation;
pub mod island;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{IslandError, Result};
pub use config::{HeightFieldConfig, IslandConfig, IslandConfigBuilder, ScoreTarget, ScoringConfig};
pub use curve::{Curve, Keyframe, SampledCurve};
pub use terrain::{generate_height_field, generate_height_field_with, HeightField};
pub use partition::{Partition, PartitionCell, Segment};
pub use graph::{build_graph, Face, FaceId, HalfEdge, HalfEdgeId, PlanarGraph, VertexId};
pub use biome::{Biome, BiomeClassifier, BasicColorMapper, ColorMapper, CustomColorMapper, TerrainColor};
pub use evaluation::{CategoryResult, EvaluationResults, TerrainEvaluator};
pub use island::Island;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam vectors for convenience
pub use glam::{Vec2, Vec3};
