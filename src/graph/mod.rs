//! Planar half-edge graph
//!
//! Faces (map cells), half-edges and vertices live in three arenas owned by
//! [`PlanarGraph`]. All cross references (`next`, `previous`, `opposite`,
//! `face`, `destination`) are indices into those arenas, so the cyclic
//! structure carries no ownership cycles and traversal stays O(1) per step.

mod builder;

pub use builder::{build_graph, quantize, VertexKey, VERTEX_PRECISION};

use std::collections::BTreeMap;
use std::sync::OnceLock;

use glam::{Vec2, Vec3};

use crate::biome::Biome;

/// Index into [`PlanarGraph::faces`]
pub type FaceId = usize;
/// Index into [`PlanarGraph::half_edges`]
pub type HalfEdgeId = usize;
/// Index into [`PlanarGraph::vertices`]
pub type VertexId = usize;

/// One directed boundary piece of exactly one face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    /// Vertex this half-edge points to
    pub destination: VertexId,
    /// Next half-edge around the same face
    pub next: HalfEdgeId,
    /// Previous half-edge around the same face
    pub previous: HalfEdgeId,
    /// Reverse twin on the neighbouring face, `None` on the map border
    pub opposite: Option<HalfEdgeId>,
    /// Face this half-edge bounds
    pub face: FaceId,
}

impl HalfEdge {
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.opposite.is_none()
    }
}

/// A polygonal map cell
#[derive(Debug, Clone)]
pub struct Face {
    /// Face index, equal to the index of the partition cell it came from
    pub id: FaceId,

    /// Site point of the partition cell
    pub site: Vec2,

    /// Site position lifted to the mean elevation of the face corners
    pub(crate) center: Vec3,

    /// An arbitrary half-edge on this face's boundary ring
    pub start_edge: HalfEdgeId,

    /// Biome tag, [`Biome::Error`] until classified
    pub biome: Biome,

    height_spread: OnceLock<f32>,
}

impl Face {
    pub(crate) fn new(id: FaceId, site: Vec2, center: Vec3, start_edge: HalfEdgeId) -> Self {
        Self {
            id,
            site,
            center,
            start_edge,
            biome: Biome::Error,
            height_spread: OnceLock::new(),
        }
    }

    /// Site position lifted to the face elevation (x/z plane, y up)
    ///
    /// Fixed once the graph is built.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Elevation of the face (y of its centre)
    #[inline]
    pub fn elevation(&self) -> f32 {
        self.center.y
    }
}

/// Doubly-connected half-edge graph of the island surface
#[derive(Debug, Clone, Default)]
pub struct PlanarGraph {
    pub(crate) vertices: Vec<Vec3>,
    pub(crate) faces: Vec<Face>,
    pub(crate) half_edges: Vec<HalfEdge>,
}

impl PlanarGraph {
    /// Unique vertex positions (x/z plane, y elevation)
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> Vec3 {
        self.vertices[id]
    }

    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[inline]
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id)
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    #[inline]
    pub fn half_edge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[id]
    }

    /// Vertex a half-edge starts at (its predecessor's destination)
    #[inline]
    pub fn edge_start(&self, id: HalfEdgeId) -> VertexId {
        self.half_edges[self.half_edges[id].previous].destination
    }

    /// Half-edges around a face, starting at its `start_edge`
    pub fn edges(&self, face: FaceId) -> FaceEdges<'_> {
        let start = self.faces[face].start_edge;
        FaceEdges {
            graph: self,
            start,
            current: Some(start),
        }
    }

    /// Corner positions around a face, in ring order
    pub fn corners(&self, face: FaceId) -> impl Iterator<Item = Vec3> + '_ {
        self.edges(face)
            .map(move |e| self.vertices[self.half_edges[e].destination])
    }

    /// Faces across every non-border edge of `face`
    ///
    /// A neighbour appears once per shared edge.
    pub fn neighbors(&self, face: FaceId) -> impl Iterator<Item = FaceId> + '_ {
        self.edges(face)
            .filter_map(move |e| self.half_edges[e].opposite)
            .map(move |o| self.half_edges[o].face)
    }

    #[inline]
    pub fn biome(&self, face: FaceId) -> Biome {
        self.faces[face].biome
    }

    #[inline]
    pub fn set_biome(&mut self, face: FaceId, biome: Biome) {
        self.faces[face].biome = biome;
    }

    #[inline]
    pub fn elevation(&self, face: FaceId) -> f32 {
        self.faces[face].elevation()
    }

    /// Highest minus lowest of the face centre and its corners, memoized
    pub fn height_spread(&self, face: FaceId) -> f32 {
        let f = &self.faces[face];
        *f.height_spread.get_or_init(|| {
            let (lo, hi) = self
                .corners(face)
                .fold((f.center.y, f.center.y), |(lo, hi), c| (lo.min(c.y), hi.max(c.y)));
            hi - lo
        })
    }

    /// Half-edges without an opposite (the outer map border)
    pub fn boundary_edge_count(&self) -> usize {
        self.half_edges.iter().filter(|e| e.is_boundary()).count()
    }

    /// Number of faces per biome
    pub fn biome_histogram(&self) -> BTreeMap<Biome, usize> {
        let mut counts = BTreeMap::new();
        for face in &self.faces {
            *counts.entry(face.biome).or_insert(0) += 1;
        }
        counts
    }
}

/// Iterator over the half-edge ring of one face
pub struct FaceEdges<'a> {
    graph: &'a PlanarGraph,
    start: HalfEdgeId,
    current: Option<HalfEdgeId>,
}

impl Iterator for FaceEdges<'_> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<HalfEdgeId> {
        let edge = self.current?;
        let next = self.graph.half_edges[edge].next;
        self.current = (next != self.start).then_some(next);
        Some(edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::Partition;
    use crate::terrain::HeightField;

    fn grid_graph(cells: usize) -> PlanarGraph {
        let partition = Partition::square_grid(10.0, cells);
        build_graph(&partition, &HeightField::flat(10, 0.0)).unwrap()
    }

    #[test]
    fn test_ring_traversal() {
        let graph = grid_graph(2);
        for face in 0..graph.face_count() {
            let edges: Vec<HalfEdgeId> = graph.edges(face).collect();
            assert_eq!(edges.len(), 4);
            assert_eq!(edges[0], graph.faces()[face].start_edge);
            assert_eq!(graph.corners(face).count(), 4);
        }
    }

    #[test]
    fn test_neighbors() {
        let graph = grid_graph(3);
        // Centre cell touches four others, a corner cell two
        let mut centre: Vec<FaceId> = graph.neighbors(4).collect();
        centre.sort();
        assert_eq!(centre, vec![1, 3, 5, 7]);

        let mut corner: Vec<FaceId> = graph.neighbors(0).collect();
        corner.sort();
        assert_eq!(corner, vec![1, 3]);
    }

    #[test]
    fn test_boundary_edges() {
        let graph = grid_graph(3);
        // 3 cells per side, 4 sides
        assert_eq!(graph.boundary_edge_count(), 12);
        assert_eq!(graph.half_edges().len(), 36);
    }

    #[test]
    fn test_histogram_starts_unclassified() {
        let graph = grid_graph(2);
        let histogram = graph.biome_histogram();
        assert_eq!(histogram.get(&Biome::Error), Some(&4));
    }

    #[test]
    fn test_graph_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlanarGraph>();
        assert_send_sync::<Face>();
        assert_send_sync::<crate::island::Island>();
    }

    #[test]
    fn test_face_center() {
        let graph = grid_graph(2);
        let face = &graph.faces()[3];
        assert_eq!(face.center(), Vec3::new(7.5, 0.0, 7.5));
        assert_eq!(face.center().y, face.elevation());
    }

    #[test]
    fn test_height_spread() {
        let mut values = vec![0.0; 100];
        values[0] = 2.0;
        let field = HeightField::from_values(10, 10, values);
        let graph = build_graph(&Partition::square_grid(10.0, 2), &field).unwrap();

        // Only the (0, 0) corner of face 0 is raised
        assert!((graph.height_spread(0) - 2.0).abs() < 1e-6);
        assert!((graph.elevation(0) - 0.5).abs() < 1e-6);
        assert_eq!(graph.height_spread(3), 0.0);
        // Memoized value is stable
        assert_eq!(graph.height_spread(0), graph.height_spread(0));
    }
}
