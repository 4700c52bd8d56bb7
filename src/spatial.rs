//! Spatial indexing for fast plane-point-to-face lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::Vec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// KD-tree over face sites
///
/// Gives O(log n) nearest-site lookups. For a Voronoi partition the nearest
/// site is the cell containing the point.
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f32, usize, 2, 32>>,
}

impl SpatialIndex {
    /// Build the index from sites, indexed by position in the slice
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_island::*;
    /// use glam::Vec2;
    ///
    /// let sites = vec![
    ///     Vec2::new(0.0, 0.0),
    ///     Vec2::new(10.0, 0.0),
    ///     Vec2::new(0.0, 10.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&sites);
    /// assert_eq!(index.find_nearest(Vec2::new(9.0, 1.0)), Some(1));
    /// ```
    pub fn new(sites: &[Vec2]) -> Self {
        if sites.is_empty() {
            return Self { tree: None };
        }
        let points: Vec<[f32; 2]> = sites.iter().map(|s| [s.x, s.y]).collect();
        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&points)),
        }
    }

    /// Index of the site nearest to `point`, `None` if the index is empty
    pub fn find_nearest(&self, point: Vec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[point.x, point.y]);
        Some(result.item as usize)
    }
}
