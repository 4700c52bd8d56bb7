//! Height-field synthesis
//!
//! Builds a square elevation grid from layered 2D Perlin noise, pushes the
//! map border down with a radial falloff mask and reshapes the result with a
//! height curve.

mod perlin;

pub use perlin::perlin_2d;

use glam::Vec2;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::HeightFieldConfig;
use crate::curve::Curve;

/// Range of the per-octave random offsets
const OCTAVE_OFFSET_RANGE: i32 = 100_000;

/// A fixed-size grid of scalar samples plus its observed value range
///
/// Indexed as `(x, y)` where `x` runs along the plane x axis and `y` along the
/// plane z axis (the 3D y axis carries elevation).
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    values: Vec<f32>,
    min_value: f32,
    max_value: f32,
}

impl HeightField {
    /// Wrap raw row-major samples (`values[y * width + x]`)
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != width * height`.
    pub fn from_values(width: usize, height: usize, values: Vec<f32>) -> Self {
        assert_eq!(values.len(), width * height, "height field size mismatch");
        let (min_value, max_value) = value_range(&values);
        Self {
            width,
            height,
            values,
            min_value,
            max_value,
        }
    }

    /// Square field with every sample set to `value`
    pub fn flat(size: usize, value: f32) -> Self {
        Self::from_values(size, size, vec![value; size * size])
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Smallest sample observed when the field was produced
    #[inline]
    pub fn min_value(&self) -> f32 {
        self.min_value
    }

    /// Largest sample observed when the field was produced
    #[inline]
    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Sample at grid cell `(x, y)`, `None` outside the grid
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.values[y * self.width + x])
        } else {
            None
        }
    }

    /// Elevation under a plane point
    ///
    /// Uses the grid cell containing the point (floor of both coordinates).
    /// Points outside the grid read as elevation 0.
    pub fn elevation_at(&self, point: Vec2) -> f32 {
        let x = point.x.floor();
        let y = point.y.floor();
        if x < 0.0 || y < 0.0 {
            return 0.0;
        }
        self.get(x as usize, y as usize).unwrap_or(0.0)
    }
}

fn value_range(values: &[f32]) -> (f32, f32) {
    values
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// `(value - a) / (b - a)` clamped to `[0, 1]`; 0 when the range is empty
#[inline]
fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        0.0
    } else {
        ((value - a) / (b - a)).clamp(0.0, 1.0)
    }
}

/// Derive one reproducible sampling offset per octave from the seed
pub fn octave_offsets(seed: u32, octaves: usize, offset: Vec2) -> Vec<Vec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    (0..octaves)
        .map(|_| {
            let x = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f32 + offset.x;
            let y = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f32 - offset.y;
            Vec2::new(x, y)
        })
        .collect()
}

/// Fractal noise normalised to `[0, 1]` by the observed min/max
///
/// Each octave samples gradient noise at
/// `(cell - half_extent + octave_offset) / scale * frequency`; amplitude starts
/// at 1 and decays by `persistence`, frequency starts at 1 and grows by
/// `lacunarity`. The returned field keeps the raw (pre-normalisation) range.
pub fn generate_noise_map(config: &HeightFieldConfig) -> HeightField {
    let size = config.size;
    let offsets = octave_offsets(config.seed, config.octaves, config.offset);
    let half = size as f32 / 2.0;

    let mut values = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let mut amplitude = 1.0;
            let mut frequency = 1.0;
            let mut noise_height = 0.0;

            for octave in &offsets {
                let sample = Vec2::new(
                    (x as f32 - half + octave.x) / config.scale * frequency,
                    (y as f32 - half + octave.y) / config.scale * frequency,
                );
                noise_height += perlin_2d(sample, config.seed) * amplitude;

                amplitude *= config.persistence;
                frequency *= config.lacunarity;
            }

            values.push(noise_height);
        }
    }

    let (raw_min, raw_max) = value_range(&values);
    for value in values.iter_mut() {
        *value = inverse_lerp(raw_min, raw_max, *value);
    }

    HeightField {
        width: size,
        height: size,
        values,
        min_value: raw_min,
        max_value: raw_max,
    }
}

/// Radial falloff mask in `[0, 1]`
///
/// Each cell's distance from the grid centre is normalised so the midpoint
/// of an edge sits at 1, clamped, shaped by `falloff` and clamped again.
pub fn generate_falloff_map<C: Curve + ?Sized>(size: usize, falloff: &C) -> HeightField {
    let center = Vec2::splat(size as f32 / 2.0);
    let mut values = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let distance = Vec2::new(x as f32, y as f32).distance(center) / size as f32 / 0.5;
            values.push(falloff.evaluate(distance.clamp(0.0, 1.0)).clamp(0.0, 1.0));
        }
    }
    HeightField::from_values(size, size, values)
}

/// Generate a height field using the curves stored in `config`
pub fn generate_height_field(config: &HeightFieldConfig) -> HeightField {
    generate_height_field_with(config, &config.falloff_curve, &config.height_curve)
}

/// Generate a height field with externally supplied shaping curves
///
/// For every cell: `h = n - falloff`, then `h * height_curve(h) * height_multiplier`.
/// Identical configuration and curves always produce a bit-identical field.
pub fn generate_height_field_with<F, H>(
    config: &HeightFieldConfig,
    falloff_curve: &F,
    height_curve: &H,
) -> HeightField
where
    F: Curve + ?Sized,
    H: Curve + ?Sized,
{
    let noise = generate_noise_map(config);
    let falloff = generate_falloff_map(config.size, falloff_curve);

    let values: Vec<f32> = noise
        .values
        .iter()
        .zip(&falloff.values)
        .map(|(&n, &f)| {
            let h = n - f;
            h * height_curve.evaluate(h) * config.height_multiplier
        })
        .collect();

    let field = HeightField::from_values(config.size, config.size, values);
    debug!(
        "height field {}x{}: raw noise [{:.3}, {:.3}], elevation [{:.3}, {:.3}]",
        field.width, field.height, noise.min_value, noise.max_value, field.min_value, field.max_value
    );
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::SampledCurve;

    fn small_config(seed: u32) -> HeightFieldConfig {
        HeightFieldConfig {
            seed,
            size: 48,
            scale: 12.0,
            ..HeightFieldConfig::default()
        }
    }

    #[test]
    fn test_determinism() {
        let config = small_config(42);
        let a = generate_height_field(&config);
        let b = generate_height_field(&config);
        assert_eq!(a, b, "Same seed and parameters must produce identical fields");
    }

    #[test]
    fn test_different_seeds() {
        let a = generate_height_field(&small_config(1));
        let b = generate_height_field(&small_config(2));
        assert_ne!(a.values(), b.values());
    }

    #[test]
    fn test_octave_offsets_reproducible() {
        let a = octave_offsets(7, 4, Vec2::new(3.0, 5.0));
        let b = octave_offsets(7, 4, Vec2::new(3.0, 5.0));
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        for offset in &a {
            assert!(offset.x.abs() <= 100_003.0);
            assert!(offset.y.abs() <= 100_005.0);
        }
    }

    #[test]
    fn test_noise_map_range() {
        let noise = generate_noise_map(&small_config(99));
        assert!(noise.values().iter().all(|v| (0.0..=1.0).contains(v)));
        // The observed extremes map exactly onto the unit interval
        assert!(noise.values().iter().any(|&v| v == 0.0));
        assert!(noise.values().iter().any(|&v| v == 1.0));
        assert!(noise.min_value() < noise.max_value());
    }

    #[test]
    fn test_falloff_map_range() {
        let falloff = generate_falloff_map(32, &SampledCurve::island_falloff());
        assert!(falloff.values().iter().all(|v| (0.0..=1.0).contains(v)));
        // Corners are far from the centre, the centre is not
        assert!(falloff.get(0, 0).unwrap() > 0.9);
        assert!(falloff.get(16, 16).unwrap() < 0.01);
    }

    #[test]
    fn test_falloff_clamps_curve_output() {
        let steep = |x: f32| x * 4.0 - 1.0;
        let falloff = generate_falloff_map(16, &steep);
        assert!(falloff.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_height_shaping() {
        let config = HeightFieldConfig {
            height_multiplier: 10.0,
            ..small_config(5)
        };
        let zero_falloff = |_: f32| 0.0_f32;
        let unit_height = |_: f32| 1.0_f32;
        let field = generate_height_field_with(&config, &zero_falloff, &unit_height);
        let noise = generate_noise_map(&config);

        for (h, n) in field.values().iter().zip(noise.values()) {
            assert!((h - n * 10.0).abs() < 1e-5);
        }
        assert!((field.max_value() - 10.0).abs() < 1e-5);
        assert!(field.min_value().abs() < 1e-5);
    }

    #[test]
    fn test_elevation_lookup() {
        let field = HeightField::from_values(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(field.elevation_at(Vec2::new(0.5, 0.5)), 1.0);
        assert_eq!(field.elevation_at(Vec2::new(1.9, 0.0)), 2.0);
        assert_eq!(field.elevation_at(Vec2::new(0.0, 1.2)), 3.0);
        assert_eq!(field.elevation_at(Vec2::new(1.0, 1.0)), 4.0);
        assert_eq!(field.elevation_at(Vec2::new(2.0, 0.0)), 0.0);
        assert_eq!(field.elevation_at(Vec2::new(-0.1, 0.0)), 0.0);
        assert_eq!(field.min_value(), 1.0);
        assert_eq!(field.max_value(), 4.0);
    }
}
