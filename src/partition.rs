//! Plane partition input
//!
//! The island is built over an externally computed tessellation of the map
//! (typically a clipped Voronoi diagram). Each cell arrives as its site point
//! plus an unordered list of boundary segments in arbitrary orientation.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A straight boundary piece between two plane points
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    #[inline]
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Same segment, opposite direction
    #[inline]
    pub fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// One cell of the partition: its site and boundary segments
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionCell {
    pub site: Vec2,
    pub segments: Vec<Segment>,
}

impl PartitionCell {
    pub fn new(site: Vec2, segments: Vec<Segment>) -> Self {
        Self { site, segments }
    }

    /// Axis-aligned rectangular cell around `site`
    pub fn rectangle(site: Vec2, min: Vec2, max: Vec2) -> Self {
        let a = Vec2::new(min.x, min.y);
        let b = Vec2::new(max.x, min.y);
        let c = Vec2::new(max.x, max.y);
        let d = Vec2::new(min.x, max.y);
        Self::new(
            site,
            vec![
                Segment::new(a, b),
                Segment::new(b, c),
                Segment::new(c, d),
                Segment::new(d, a),
            ],
        )
    }
}

/// All cells of a plane partition
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub cells: Vec<PartitionCell>,
}

impl Partition {
    pub fn new(cells: Vec<PartitionCell>) -> Self {
        Self { cells }
    }

    /// Regular grid of `cells_per_side²` square cells covering `[0, size]²`
    ///
    /// Not a Voronoi diagram of random sites, but a valid partition whose
    /// sites sit at the cell centres.
    pub fn square_grid(size: f32, cells_per_side: usize) -> Self {
        let n = cells_per_side.max(1);
        let step = size / n as f32;
        let mut cells = Vec::with_capacity(n * n);
        for j in 0..n {
            for i in 0..n {
                let min = Vec2::new(i as f32 * step, j as f32 * step);
                let max = min + Vec2::splat(step);
                cells.push(PartitionCell::rectangle((min + max) * 0.5, min, max));
            }
        }
        Self { cells }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Site points in cell order
    pub fn sites(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.cells.iter().map(|c| c.site)
    }
}

impl From<Vec<PartitionCell>> for Partition {
    fn from(cells: Vec<PartitionCell>) -> Self {
        Self::new(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_grid() {
        let partition = Partition::square_grid(10.0, 2);
        assert_eq!(partition.len(), 4);

        let sites: Vec<Vec2> = partition.sites().collect();
        assert_eq!(sites[0], Vec2::new(2.5, 2.5));
        assert_eq!(sites[3], Vec2::new(7.5, 7.5));

        for cell in &partition.cells {
            assert_eq!(cell.segments.len(), 4);
            for segment in &cell.segments {
                assert_eq!(segment.length(), 5.0);
            }
        }
    }

    #[test]
    fn test_segment_reversed() {
        let s = Segment::new(Vec2::ZERO, Vec2::X);
        assert_eq!(s.reversed(), Segment::new(Vec2::X, Vec2::ZERO));
    }
}
