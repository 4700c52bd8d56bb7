//! Planar graph construction from a plane partition
//!
//! Each partition cell's unordered boundary segments are oriented and sorted
//! clockwise around the site, stitched into a closed half-edge ring (bridging
//! any gaps between consecutive segments) and finally every half-edge is
//! paired with its reverse twin on the neighbouring face.

use std::collections::{HashMap, HashSet};

use glam::{Vec2, Vec3};
use log::{debug, info};

use super::{Face, FaceId, HalfEdge, HalfEdgeId, PlanarGraph, VertexId};
use crate::error::{IslandError, Result};
use crate::partition::{Partition, PartitionCell, Segment};
use crate::terrain::HeightField;

/// Decimal places kept when matching vertex positions
pub const VERTEX_PRECISION: i32 = 3;

const PRECISION_SCALE: f32 = 1000.0;

/// Quantized plane position used to identify a vertex
///
/// Two points that agree to [`VERTEX_PRECISION`] decimal places share a key
/// and therefore become the same graph vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey {
    x: i64,
    z: i64,
}

impl VertexKey {
    pub fn new(point: Vec2) -> Self {
        Self {
            x: (point.x * PRECISION_SCALE).round() as i64,
            z: (point.y * PRECISION_SCALE).round() as i64,
        }
    }

    /// The rounded plane position this key stands for
    pub fn position(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 / PRECISION_SCALE,
            self.z as f32 / PRECISION_SCALE,
        )
    }
}

/// Round a plane point to [`VERTEX_PRECISION`] decimal places
#[inline]
pub fn quantize(point: Vec2) -> Vec2 {
    VertexKey::new(point).position()
}

/// Signed angle from `from` to `to`, positive counter-clockwise
#[inline]
fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    from.perp_dot(to).atan2(from.dot(to))
}

/// Angle of `point` around `site`, increasing clockwise
#[inline]
fn clockwise_angle(site: Vec2, point: Vec2) -> f32 {
    let d = point - site;
    -d.y.atan2(d.x)
}

/// Orient every segment clockwise about the site and sort them into
/// perimeter order by the angle of their start point
fn order_boundary(site: Vec2, segments: &[Segment]) -> Vec<Segment> {
    let mut ordered: Vec<Segment> = segments
        .iter()
        .map(|&s| {
            if signed_angle(s.start - site, s.end - site) > 0.0 {
                s.reversed()
            } else {
                s
            }
        })
        .collect();

    // Stable, so ties keep input order
    ordered.sort_by(|a, b| {
        clockwise_angle(site, a.start).total_cmp(&clockwise_angle(site, b.start))
    });
    ordered
}

struct GraphBuilder<'a> {
    heights: &'a HeightField,
    graph: PlanarGraph,
    vertex_ids: HashMap<VertexKey, VertexId>,
    edges_by_start: HashMap<VertexId, Vec<HalfEdgeId>>,
}

impl<'a> GraphBuilder<'a> {
    fn new(heights: &'a HeightField) -> Self {
        Self {
            heights,
            graph: PlanarGraph::default(),
            vertex_ids: HashMap::new(),
            edges_by_start: HashMap::new(),
        }
    }

    /// Resolve a plane point to a vertex, creating it with its elevation
    fn vertex(&mut self, point: Vec2) -> VertexId {
        let key = VertexKey::new(point);
        if let Some(&id) = self.vertex_ids.get(&key) {
            return id;
        }
        let rounded = key.position();
        let elevation = self.heights.elevation_at(rounded);
        let id = self.graph.vertices.len();
        self.graph
            .vertices
            .push(Vec3::new(rounded.x, elevation, rounded.y));
        self.vertex_ids.insert(key, id);
        id
    }

    fn add_face(&mut self, cell: &PartitionCell) -> Result<FaceId> {
        if cell.segments.is_empty() {
            return Err(IslandError::EmptyBoundary { site: cell.site });
        }

        let resolved: Vec<(VertexId, VertexId)> = order_boundary(cell.site, &cell.segments)
            .into_iter()
            .filter(|s| VertexKey::new(s.start) != VertexKey::new(s.end))
            .map(|s| (self.vertex(s.start), self.vertex(s.end)))
            .collect();

        let mut ring: Vec<(VertexId, VertexId)> = Vec::with_capacity(resolved.len() * 2);
        for (i, &(start, end)) in resolved.iter().enumerate() {
            ring.push((start, end));
            let join = resolved[(i + 1) % resolved.len()].0;
            if end != join {
                ring.push((end, join));
            }
        }

        let corners: HashSet<VertexId> = ring.iter().map(|&(_, end)| end).collect();
        if corners.len() < 3 {
            return Err(IslandError::DegenerateFace {
                site: cell.site,
                vertices: corners.len(),
            });
        }

        let face_id = self.graph.faces.len();
        let first = self.graph.half_edges.len();
        let n = ring.len();
        for (k, &(start, end)) in ring.iter().enumerate() {
            let id = first + k;
            self.graph.half_edges.push(HalfEdge {
                destination: end,
                next: first + (k + 1) % n,
                previous: first + (k + n - 1) % n,
                opposite: None,
                face: face_id,
            });
            self.edges_by_start.entry(start).or_default().push(id);
        }

        let site_height = self.heights.elevation_at(quantize(cell.site));
        let center = Vec3::new(cell.site.x, site_height, cell.site.y);
        self.graph.faces.push(Face::new(face_id, cell.site, center, first));
        Ok(face_id)
    }

    /// Pair every half-edge with the half-edge running the opposite way
    /// between the same two vertices on another face
    fn connect_opposites(&mut self) {
        let edges = &mut self.graph.half_edges;
        for id in 0..edges.len() {
            if edges[id].opposite.is_some() {
                continue;
            }
            let start = edges[edges[id].previous].destination;
            let end = edges[id].destination;
            let face = edges[id].face;

            let twin = self.edges_by_start.get(&end).and_then(|candidates| {
                candidates.iter().copied().find(|&c| {
                    let candidate = &edges[c];
                    candidate.destination == start
                        && candidate.face != face
                        && candidate.opposite.is_none()
                })
            });

            if let Some(twin) = twin {
                edges[id].opposite = Some(twin);
                edges[twin].opposite = Some(id);
            }
        }
    }

    /// Replace each face's elevation with the mean of its corners
    fn average_face_elevations(&mut self) {
        for face in 0..self.graph.faces.len() {
            let (sum, count) = self
                .graph
                .corners(face)
                .fold((0.0, 0usize), |(sum, count), c| (sum + c.y, count + 1));
            self.graph.faces[face].center.y = sum / count as f32;
        }
    }

    fn finish(mut self) -> PlanarGraph {
        self.connect_opposites();
        self.average_face_elevations();
        self.graph
    }
}

/// Build the half-edge graph for a partition over a height field
///
/// Produces one face per partition cell, in cell order.
///
/// # Errors
///
/// Fails on the first cell that has no boundary segments
/// ([`IslandError::EmptyBoundary`]) or that resolves to fewer than three
/// distinct corners ([`IslandError::DegenerateFace`]). No partial graph is
/// returned.
pub fn build_graph(partition: &Partition, heights: &HeightField) -> Result<PlanarGraph> {
    let mut builder = GraphBuilder::new(heights);
    for cell in &partition.cells {
        builder.add_face(cell)?;
    }
    let graph = builder.finish();

    info!(
        "planar graph: {} faces, {} half-edges ({} on the border), {} vertices",
        graph.faces.len(),
        graph.half_edges.len(),
        graph.boundary_edge_count(),
        graph.vertices.len()
    );
    debug!(
        "mean ring length {:.2}",
        graph.half_edges.len() as f32 / graph.faces.len().max(1) as f32
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(size: usize) -> HeightField {
        HeightField::flat(size, 0.0)
    }

    /// Checks ring closure in both directions and opposite symmetry
    fn assert_well_formed(graph: &PlanarGraph) {
        for face in graph.faces() {
            let n = graph.edges(face.id).count();
            assert!(n >= 3);

            let mut edge = face.start_edge;
            for _ in 0..n {
                assert_eq!(graph.half_edge(edge).face, face.id);
                edge = graph.half_edge(edge).next;
            }
            assert_eq!(edge, face.start_edge, "next ring must close after {} steps", n);

            for _ in 0..n {
                edge = graph.half_edge(edge).previous;
            }
            assert_eq!(edge, face.start_edge, "previous ring must close after {} steps", n);
        }

        for (id, edge) in graph.half_edges().iter().enumerate() {
            if let Some(opposite) = edge.opposite {
                let twin = graph.half_edge(opposite);
                assert_eq!(twin.opposite, Some(id));
                assert_ne!(twin.face, edge.face);
                assert_eq!(graph.edge_start(opposite), edge.destination);
                assert_eq!(twin.destination, graph.edge_start(id));
            }
        }
    }

    #[test]
    fn test_order_boundary_is_clockwise_and_continuous() {
        let site = Vec2::new(5.0, 5.0);
        let cell = PartitionCell::rectangle(site, Vec2::ZERO, Vec2::splat(10.0));
        // Shuffle and flip a few segments
        let segments = vec![
            cell.segments[2],
            cell.segments[0].reversed(),
            cell.segments[3],
            cell.segments[1].reversed(),
        ];

        let ordered = order_boundary(site, &segments);
        assert_eq!(ordered.len(), 4);
        for i in 0..ordered.len() {
            let next = ordered[(i + 1) % ordered.len()];
            assert_eq!(ordered[i].end, next.start);
            assert!(signed_angle(ordered[i].start - site, ordered[i].end - site) <= 0.0);
        }
    }

    #[test]
    fn test_single_square_face() {
        let partition = Partition::new(vec![PartitionCell::rectangle(
            Vec2::new(5.0, 5.0),
            Vec2::ZERO,
            Vec2::splat(10.0),
        )]);
        let graph = build_graph(&partition, &flat(10)).unwrap();

        assert_eq!(graph.face_count(), 1);
        assert_eq!(graph.half_edges().len(), 4);
        assert_eq!(graph.vertices().len(), 4);
        assert_eq!(graph.boundary_edge_count(), 4);
        assert_well_formed(&graph);
    }

    #[test]
    fn test_grid_is_well_formed() {
        let graph = build_graph(&Partition::square_grid(30.0, 6), &flat(30)).unwrap();
        assert_eq!(graph.face_count(), 36);
        // (n + 1)² shared corners
        assert_eq!(graph.vertices().len(), 49);
        assert_eq!(graph.boundary_edge_count(), 24);
        assert_well_formed(&graph);
    }

    #[test]
    fn test_near_coincident_points_merge() {
        let a = PartitionCell::rectangle(Vec2::new(2.5, 5.0), Vec2::ZERO, Vec2::new(5.0, 10.0));
        // Shared edge supplied with sub-precision jitter
        let b = PartitionCell::new(
            Vec2::new(7.5, 5.0),
            vec![
                Segment::new(Vec2::new(5.0002, 0.0), Vec2::new(10.0, 0.0)),
                Segment::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)),
                Segment::new(Vec2::new(10.0, 10.0), Vec2::new(4.9999, 10.0)),
                Segment::new(Vec2::new(4.9999, 10.0), Vec2::new(5.0002, 0.0)),
            ],
        );
        let graph = build_graph(&Partition::new(vec![a, b]), &flat(10)).unwrap();

        assert_eq!(graph.vertices().len(), 6);
        assert_eq!(graph.boundary_edge_count(), 6);
        assert_eq!(graph.neighbors(0).collect::<Vec<_>>(), vec![1]);
        assert_well_formed(&graph);
    }

    #[test]
    fn test_degenerate_segment_dropped() {
        let mut cell =
            PartitionCell::rectangle(Vec2::new(5.0, 5.0), Vec2::ZERO, Vec2::splat(10.0));
        cell.segments.push(Segment::new(
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0004, 10.0001),
        ));
        let graph = build_graph(&Partition::new(vec![cell]), &flat(10)).unwrap();
        assert_eq!(graph.half_edges().len(), 4);
        assert_well_formed(&graph);
    }

    #[test]
    fn test_degenerate_segment_leaves_no_vertex() {
        let mut cell =
            PartitionCell::rectangle(Vec2::new(5.0, 5.0), Vec2::ZERO, Vec2::splat(10.0));
        cell.segments.push(Segment::new(
            Vec2::new(3.0, 3.0),
            Vec2::new(3.0002, 3.0001),
        ));
        let graph = build_graph(&Partition::new(vec![cell]), &flat(10)).unwrap();
        assert_eq!(graph.vertices().len(), 4);
        assert_eq!(graph.half_edges().len(), 4);
        assert_well_formed(&graph);
    }

    #[test]
    fn test_gap_is_bridged() {
        // Triangle with the closing side missing
        let site = Vec2::new(3.0, 3.0);
        let cell = PartitionCell::new(
            site,
            vec![
                Segment::new(Vec2::new(0.0, 0.0), Vec2::new(9.0, 0.0)),
                Segment::new(Vec2::new(9.0, 0.0), Vec2::new(0.0, 9.0)),
            ],
        );
        let graph = build_graph(&Partition::new(vec![cell]), &flat(10)).unwrap();
        assert_eq!(graph.edges(0).count(), 3);
        assert_eq!(graph.corners(0).count(), 3);
        assert_well_formed(&graph);
    }

    #[test]
    fn test_empty_boundary_is_fatal() {
        let partition = Partition::new(vec![
            PartitionCell::rectangle(Vec2::new(5.0, 5.0), Vec2::ZERO, Vec2::splat(10.0)),
            PartitionCell::new(Vec2::new(1.0, 1.0), vec![]),
        ]);
        let err = build_graph(&partition, &flat(10)).unwrap_err();
        assert_eq!(
            err,
            IslandError::EmptyBoundary {
                site: Vec2::new(1.0, 1.0)
            }
        );
    }

    #[test]
    fn test_too_few_vertices_is_fatal() {
        let cell = PartitionCell::new(
            Vec2::new(1.0, 1.0),
            vec![Segment::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0))],
        );
        let err = build_graph(&Partition::new(vec![cell]), &flat(10)).unwrap_err();
        assert!(matches!(err, IslandError::DegenerateFace { vertices: 2, .. }));
    }

    #[test]
    fn test_vertex_elevation_and_face_average() {
        let values: Vec<f32> = (0..100).map(|i| (i % 10) as f32).collect();
        let field = HeightField::from_values(10, 10, values);
        let graph = build_graph(&Partition::square_grid(10.0, 2), &field).unwrap();

        for v in graph.vertices() {
            let expected = if v.x >= 10.0 || v.z >= 10.0 { 0.0 } else { v.x.floor() };
            assert_eq!(v.y, expected);
        }
        // Face 0 corners sit at x = 0 and x = 5
        assert!((graph.elevation(0) - 2.5).abs() < 1e-6);
        // Face 1 corners sit at x = 5 and x = 10 (off the grid)
        assert!((graph.elevation(1) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(Vec2::new(1.23449, -0.0004)), Vec2::new(1.234, 0.0));
        assert_eq!(VertexKey::new(Vec2::new(5.0002, 1.0)), VertexKey::new(Vec2::new(4.9998, 1.0)));
    }
}
