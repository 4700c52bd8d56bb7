//! Error types for island generation

use glam::Vec2;
use thiserror::Error;

/// Errors that can occur during island generation or queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IslandError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A partition cell was supplied without any boundary segments
    #[error("site {site} has no boundary segments")]
    EmptyBoundary {
        /// Site whose boundary is missing
        site: Vec2,
    },

    /// A partition cell resolved to fewer than three distinct corners
    #[error("site {site} resolved to {vertices} boundary vertices, at least 3 are required")]
    DegenerateFace {
        /// Site of the malformed cell
        site: Vec2,
        /// Number of corners left after stitching
        vertices: usize,
    },

    /// Requested face ID does not exist
    #[error("face not found: {0}")]
    FaceNotFound(usize),
}

/// Result type alias for island operations
pub type Result<T> = std::result::Result<T, IslandError>;
