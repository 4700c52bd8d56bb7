//! Island Configuration and Builder
//!
//! This module provides configuration types for deterministic island generation.

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::curve::SampledCurve;
use crate::error::{IslandError, Result};

/// Smallest usable noise scale; anything below is clamped to this
pub const MIN_NOISE_SCALE: f32 = 0.0001;

/// Upper bound on fractal octaves
pub const MAX_OCTAVES: usize = 16;

/// Parameters of the fractal height field
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct HeightFieldConfig {
    /// Seed for the per-octave sampling offsets and the noise hash
    pub seed: u32,

    /// Side length of the square grid (and of the map in plane units)
    pub size: usize,

    /// Noise scale; larger values give broader features
    pub scale: f32,

    /// Number of noise layers
    pub octaves: usize,

    /// Amplitude decay per octave
    pub persistence: f32,

    /// Frequency growth per octave
    pub lacunarity: f32,

    /// Manual offset added to every octave's sampling position
    pub offset: Vec2,

    /// Shapes the normalised distance from the map centre into the falloff mask
    pub falloff_curve: SampledCurve,

    /// Remaps shaped height before the multiplier is applied
    pub height_curve: SampledCurve,

    /// Final elevation multiplier in plane-height units
    pub height_multiplier: f32,
}

impl Default for HeightFieldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            size: 200,
            scale: 50.0,
            octaves: 5,
            persistence: 0.43,
            lacunarity: 2.0,
            offset: Vec2::ZERO,
            falloff_curve: SampledCurve::island_falloff(),
            height_curve: SampledCurve::linear(),
            height_multiplier: 60.0,
        }
    }
}

/// A target coverage ratio and how quickly the score falls off around it
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTarget {
    /// Falloff slope `a`; the score reaches 0 at `target ± 1/slope`
    pub slope: f32,
    /// Target ratio `b` where the score peaks at 1
    pub target: f32,
}

impl ScoreTarget {
    pub const fn new(slope: f32, target: f32) -> Self {
        Self { slope, target }
    }
}

/// Scoring targets for the three coverage categories
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Share of coastal land that should be beach
    pub beach: ScoreTarget,
    /// Share of non-ocean land above the high band
    pub high_elevation: ScoreTarget,
    /// Share of dry land at or below the low band
    pub lowland: ScoreTarget,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            beach: ScoreTarget::new(3.0, 0.85),
            high_elevation: ScoreTarget::new(5.0, 0.15),
            lowland: ScoreTarget::new(3.0, 0.6),
        }
    }
}

/// Configuration for one deterministic island generation run
///
/// The same configuration, fed the same partition, always produces the
/// identical island.
///
/// # Example
///
/// ```rust
/// use voronoi_island::*;
///
/// let config = IslandConfigBuilder::new()
///     .seed(42)
///     .size(64).unwrap()
///     .moisture(0.5).unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.height_field.seed, 42);
/// assert_eq!(config.moisture, 0.5);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct IslandConfig {
    /// Height field synthesis parameters
    pub height_field: HeightFieldConfig,

    /// Map-wide moisture in `[0, 1]`
    pub moisture: f32,

    /// Evaluation targets
    pub scoring: ScoringConfig,
}

impl IslandConfig {
    /// Side length of the map in plane units
    #[inline]
    pub fn size(&self) -> usize {
        self.height_field.size
    }
}

impl Default for IslandConfig {
    fn default() -> Self {
        Self {
            height_field: HeightFieldConfig::default(),
            moisture: 1.0,
            scoring: ScoringConfig::default(),
        }
    }
}

/// Builder for creating IslandConfig with validation
///
/// # Example
///
/// ```rust
/// use voronoi_island::*;
///
/// let config = IslandConfigBuilder::new()
///     .seed(12345)
///     .octaves(4)
///     .unwrap()
///     .persistence(0.5)
///     .unwrap()
///     .height_multiplier(40.0)
///     .unwrap()
///     .beach_target(ScoreTarget::new(3.0, 0.8))
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.height_field.octaves, 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IslandConfigBuilder {
    config: IslandConfig,
}

impl IslandConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: 42, size: 200
    /// - scale 50, 5 octaves, persistence 0.43, lacunarity 2
    /// - island falloff curve, linear height curve, height multiplier 60
    /// - moisture: 1.0
    /// - beach (3, 0.85), high elevation (5, 0.15), lowland (3, 0.6)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.config.height_field.seed = seed;
        self
    }

    /// Set the map size
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if size is 0
    pub fn size(mut self, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(IslandError::InvalidConfig(
                "map size must be at least 1".to_string(),
            ));
        }
        self.config.height_field.size = size;
        Ok(self)
    }

    /// Set the noise scale
    ///
    /// Positive values below [`MIN_NOISE_SCALE`] are clamped up to it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if scale is not positive
    pub fn scale(mut self, scale: f32) -> Result<Self> {
        if scale.is_nan() || scale <= 0.0 {
            return Err(IslandError::InvalidConfig(format!(
                "noise scale must be positive (got {})",
                scale
            )));
        }
        self.config.height_field.scale = scale.max(MIN_NOISE_SCALE);
        Ok(self)
    }

    /// Set the number of noise octaves
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if octaves is 0 or above [`MAX_OCTAVES`]
    pub fn octaves(mut self, octaves: usize) -> Result<Self> {
        if octaves == 0 || octaves > MAX_OCTAVES {
            return Err(IslandError::InvalidConfig(format!(
                "octaves must be in 1..={} (got {})",
                MAX_OCTAVES, octaves
            )));
        }
        self.config.height_field.octaves = octaves;
        Ok(self)
    }

    /// Set the amplitude decay per octave
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if persistence is not finite
    pub fn persistence(mut self, persistence: f32) -> Result<Self> {
        self.config.height_field.persistence = validate_finite("persistence", persistence)?;
        Ok(self)
    }

    /// Set the frequency growth per octave
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if lacunarity is not finite
    pub fn lacunarity(mut self, lacunarity: f32) -> Result<Self> {
        self.config.height_field.lacunarity = validate_finite("lacunarity", lacunarity)?;
        Ok(self)
    }

    /// Set the manual noise offset
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either component is not finite
    pub fn offset(mut self, offset: Vec2) -> Result<Self> {
        if !offset.is_finite() {
            return Err(IslandError::InvalidConfig(format!(
                "noise offset must be finite (got {})",
                offset
            )));
        }
        self.config.height_field.offset = offset;
        Ok(self)
    }

    pub fn falloff_curve(mut self, curve: SampledCurve) -> Self {
        self.config.height_field.falloff_curve = curve;
        self
    }

    pub fn height_curve(mut self, curve: SampledCurve) -> Self {
        self.config.height_field.height_curve = curve;
        self
    }

    /// Set the final elevation multiplier
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the multiplier is not finite
    pub fn height_multiplier(mut self, multiplier: f32) -> Result<Self> {
        self.config.height_field.height_multiplier =
            validate_finite("height multiplier", multiplier)?;
        Ok(self)
    }

    /// Set the map-wide moisture
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if moisture is outside `[0, 1]`
    pub fn moisture(mut self, moisture: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&moisture) {
            return Err(IslandError::InvalidConfig(format!(
                "moisture must be in [0, 1] (got {})",
                moisture
            )));
        }
        self.config.moisture = moisture;
        Ok(self)
    }

    pub fn beach_target(mut self, target: ScoreTarget) -> Result<Self> {
        self.config.scoring.beach = validate_target("beach", target)?;
        Ok(self)
    }

    pub fn high_elevation_target(mut self, target: ScoreTarget) -> Result<Self> {
        self.config.scoring.high_elevation = validate_target("high elevation", target)?;
        Ok(self)
    }

    pub fn lowland_target(mut self, target: ScoreTarget) -> Result<Self> {
        self.config.scoring.lowland = validate_target("lowland", target)?;
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<IslandConfig> {
        Ok(self.config)
    }
}

fn validate_finite(name: &str, value: f32) -> Result<f32> {
    if !value.is_finite() {
        return Err(IslandError::InvalidConfig(format!(
            "{} must be finite (got {})",
            name, value
        )));
    }
    Ok(value)
}

fn validate_target(name: &str, target: ScoreTarget) -> Result<ScoreTarget> {
    if target.slope.is_nan() || target.slope <= 0.0 {
        return Err(IslandError::InvalidConfig(format!(
            "{} score slope must be positive (got {})",
            name, target.slope
        )));
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = IslandConfigBuilder::new().build().unwrap();
        assert_eq!(config.height_field.seed, 42);
        assert_eq!(config.size(), 200);
        assert_eq!(config.height_field.octaves, 5);
        assert_eq!(config.height_field.persistence, 0.43);
        assert_eq!(config.height_field.height_multiplier, 60.0);
        assert_eq!(config.moisture, 1.0);
        assert_eq!(config.scoring.beach, ScoreTarget::new(3.0, 0.85));
        assert_eq!(config.scoring.high_elevation, ScoreTarget::new(5.0, 0.15));
        assert_eq!(config.scoring.lowland, ScoreTarget::new(3.0, 0.6));
    }

    #[test]
    fn test_builder_custom() {
        let config = IslandConfigBuilder::new()
            .seed(7)
            .size(64)
            .unwrap()
            .scale(20.0)
            .unwrap()
            .lacunarity(2.5)
            .unwrap()
            .offset(Vec2::new(10.0, -4.0))
            .unwrap()
            .moisture(0.25)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.height_field.seed, 7);
        assert_eq!(config.size(), 64);
        assert_eq!(config.height_field.scale, 20.0);
        assert_eq!(config.height_field.lacunarity, 2.5);
        assert_eq!(config.height_field.offset, Vec2::new(10.0, -4.0));
        assert_eq!(config.moisture, 0.25);
    }

    #[test]
    fn test_builder_invalid_values() {
        assert!(IslandConfigBuilder::new().size(0).is_err());
        assert!(IslandConfigBuilder::new().scale(0.0).is_err());
        assert!(IslandConfigBuilder::new().scale(f32::NAN).is_err());
        assert!(IslandConfigBuilder::new().octaves(0).is_err());
        assert!(IslandConfigBuilder::new().octaves(MAX_OCTAVES + 1).is_err());
        assert!(IslandConfigBuilder::new().moisture(1.5).is_err());
        assert!(IslandConfigBuilder::new().moisture(-0.1).is_err());
        assert!(IslandConfigBuilder::new()
            .lowland_target(ScoreTarget::new(0.0, 0.5))
            .is_err());
    }

    #[test]
    fn test_builder_rejects_non_finite_shaping() {
        assert!(IslandConfigBuilder::new().persistence(f32::NAN).is_err());
        assert!(IslandConfigBuilder::new().lacunarity(f32::INFINITY).is_err());
        assert!(IslandConfigBuilder::new().height_multiplier(f32::NAN).is_err());
        assert!(IslandConfigBuilder::new()
            .offset(Vec2::new(0.0, f32::NAN))
            .is_err());
        assert!(matches!(
            IslandConfigBuilder::new().persistence(f32::NAN),
            Err(IslandError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_tiny_scale_is_clamped() {
        let config = IslandConfigBuilder::new()
            .scale(1e-9)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.height_field.scale, MIN_NOISE_SCALE);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = IslandConfigBuilder::new()
            .seed(12345)
            .moisture(0.3)
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: IslandConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
    }
}
