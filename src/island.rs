//! Island main structure

use std::collections::HashSet;

use log::info;

use crate::biome::BiomeClassifier;
use crate::config::IslandConfig;
use crate::error::{IslandError, Result};
use crate::evaluation::{EvaluationResults, TerrainEvaluator};
use crate::graph::{build_graph, Face, FaceId, PlanarGraph};
use crate::partition::Partition;
use crate::terrain::{generate_height_field, HeightField};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;
#[cfg(feature = "spatial-index")]
use glam::Vec2;

/// One generated island: height field, classified graph and lookups
///
/// # Examples
///
/// ```
/// use voronoi_island::*;
///
/// let config = IslandConfigBuilder::new()
///     .seed(42)
///     .size(64).unwrap()
///     .scale(16.0).unwrap()
///     .build()
///     .unwrap();
///
/// let partition = Partition::square_grid(64.0, 16);
/// let island = Island::generate(config, &partition).unwrap();
/// assert_eq!(island.face_count(), 256);
///
/// println!("{}", island.evaluate());
/// ```
#[derive(Clone)]
pub struct Island {
    /// Configuration used to generate this island
    config: IslandConfig,

    /// Elevation samples the graph corners were lifted from
    height_field: HeightField,

    /// Faces, half-edges and vertices with biome tags assigned
    graph: PlanarGraph,

    /// Site lookup for plane-point queries (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl Island {
    /// Run the full pipeline: height field, graph, biomes
    ///
    /// # Errors
    ///
    /// Returns `EmptyBoundary` or `DegenerateFace` for a malformed partition.
    pub fn generate(config: IslandConfig, partition: &Partition) -> Result<Self> {
        info!(
            "generating island: seed {}, size {}, {} sites",
            config.height_field.seed,
            config.size(),
            partition.len()
        );
        let height_field = generate_height_field(&config.height_field);
        Self::generate_with_height_field(config, partition, height_field)
    }

    /// Build and classify the graph over an existing height field
    ///
    /// `config.height_field` is kept for reference only.
    pub fn generate_with_height_field(
        config: IslandConfig,
        partition: &Partition,
        height_field: HeightField,
    ) -> Result<Self> {
        let mut graph = build_graph(partition, &height_field)?;
        BiomeClassifier::new(config.moisture).classify(&mut graph);

        info!("island biomes: {:?}", graph.biome_histogram());

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let sites: Vec<Vec2> = graph.faces().iter().map(|f| f.site).collect();
            SpatialIndex::new(&sites)
        };

        Ok(Self {
            config,
            height_field,
            graph,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    #[inline]
    pub fn config(&self) -> &IslandConfig {
        &self.config
    }

    #[inline]
    pub fn height_field(&self) -> &HeightField {
        &self.height_field
    }

    #[inline]
    pub fn graph(&self) -> &PlanarGraph {
        &self.graph
    }

    /// Hand the graph over to the caller, e.g. a renderer
    pub fn into_graph(self) -> PlanarGraph {
        self.graph
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.graph.face_count()
    }

    /// Get a face by ID, `None` if out of range
    #[inline]
    pub fn get_face(&self, id: FaceId) -> Option<&Face> {
        self.graph.face(id)
    }

    /// Get a face by ID
    ///
    /// # Errors
    ///
    /// Returns `FaceNotFound` if the ID is out of range
    pub fn face(&self, id: FaceId) -> Result<&Face> {
        self.graph.face(id).ok_or(IslandError::FaceNotFound(id))
    }

    /// Find the face whose site is nearest to a plane point
    ///
    /// Uses KD-tree nearest-neighbour lookup. Returns `None` on an island
    /// without faces.
    ///
    /// ```
    /// # use voronoi_island::*;
    /// # use glam::Vec2;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let config = IslandConfigBuilder::new().size(20).unwrap().build().unwrap();
    /// let island = Island::generate(config, &Partition::square_grid(20.0, 2)).unwrap();
    /// assert_eq!(island.find_face_at(Vec2::new(18.0, 3.0)), Some(1));
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_face_at(&self, point: Vec2) -> Option<FaceId> {
        self.spatial_index.find_nearest(point)
    }

    /// Faces within `hops` adjacency steps of `center`, including `center`
    ///
    /// Returns an empty vec if `center` is out of range.
    pub fn find_faces_within_hops(&self, center: FaceId, hops: usize) -> Vec<FaceId> {
        if center >= self.graph.face_count() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut current = vec![center];
        visited.insert(center);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &face in &current {
                for neighbor in self.graph.neighbors(face) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            current = next;
        }

        let mut faces: Vec<FaceId> = visited.into_iter().collect();
        faces.sort_unstable();
        faces
    }

    /// Score the island against the configured targets
    pub fn evaluate(&self) -> EvaluationResults {
        TerrainEvaluator::new(self.config.scoring).evaluate(&self.graph)
    }
}
