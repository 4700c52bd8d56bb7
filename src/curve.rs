//! Shaping curves
//!
//! The height-field synthesizer is shaped by two externally supplied curves
//! (the radial falloff and the height remap). Both are treated as opaque
//! `f(x) -> y` functions over roughly `[0, 1]`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A scalar shaping function
pub trait Curve {
    /// Evaluate the curve at `x`
    fn evaluate(&self, x: f32) -> f32;
}

impl<F> Curve for F
where
    F: Fn(f32) -> f32,
{
    #[inline]
    fn evaluate(&self, x: f32) -> f32 {
        self(x)
    }
}

/// A single curve sample
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub x: f32,
    pub y: f32,
}

impl Keyframe {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Piecewise-linear curve through a list of keyframes
///
/// Keys are kept sorted by `x`. Evaluation clamps to the first/last key
/// outside the sampled domain, so the curve never extrapolates.
///
/// # Example
///
/// ```
/// use voronoi_island::{Curve, SampledCurve};
///
/// let curve = SampledCurve::linear();
/// assert_eq!(curve.evaluate(0.25), 0.25);
/// assert_eq!(curve.evaluate(2.0), 1.0);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SampledCurve {
    keys: Vec<Keyframe>,
}

impl SampledCurve {
    /// Create a curve from keyframes in any order
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { keys }
    }

    /// Identity over `[0, 1]`
    pub fn linear() -> Self {
        Self::new(vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)])
    }

    /// Flat curve returning `value` everywhere
    pub fn constant(value: f32) -> Self {
        Self::new(vec![Keyframe::new(0.0, value)])
    }

    /// Sample `f` at `samples` evenly spaced points over `[0, 1]`
    pub fn from_fn(samples: usize, f: impl Fn(f32) -> f32) -> Self {
        let samples = samples.max(2);
        let step = 1.0 / (samples - 1) as f32;
        let keys = (0..samples)
            .map(|i| {
                let x = i as f32 * step;
                Keyframe::new(x, f(x))
            })
            .collect();
        Self::new(keys)
    }

    /// Island falloff `x^3 / (x^3 + (2.2 - 2.2x)^3)`
    ///
    /// Stays near zero across the middle of the map and rises sharply
    /// towards the edge, pushing the border below sea level.
    pub fn island_falloff() -> Self {
        const A: f32 = 3.0;
        const B: f32 = 2.2;
        Self::from_fn(33, |x| {
            let num = x.powf(A);
            let den = num + (B - B * x).powf(A);
            if den == 0.0 {
                0.0
            } else {
                num / den
            }
        })
    }

    /// Keyframes, sorted by `x`
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for SampledCurve {
    fn default() -> Self {
        Self::linear()
    }
}

impl Curve for SampledCurve {
    fn evaluate(&self, x: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if x.is_nan() || x <= first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }

        // first.x < x < last.x, so the first key strictly right of x is in 1..len
        let hi = self.keys.partition_point(|k| k.x <= x);
        let a = self.keys[hi - 1];
        let b = self.keys[hi];
        let span = b.x - a.x;
        if span <= f32::EPSILON {
            return b.y;
        }
        a.y + (b.y - a.y) * ((x - a.x) / span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_input_returns_first_key() {
        assert_eq!(SampledCurve::linear().evaluate(f32::NAN), 0.0);
        assert_eq!(SampledCurve::constant(0.4).evaluate(f32::NAN), 0.4);
        assert_eq!(SampledCurve::island_falloff().evaluate(f32::NAN), 0.0);
    }

    #[test]
    fn test_linear_interpolation() {
        let curve = SampledCurve::new(vec![
            Keyframe::new(1.0, 10.0),
            Keyframe::new(0.0, 0.0),
        ]);
        assert_eq!(curve.keys()[0].x, 0.0);
        assert!((curve.evaluate(0.5) - 5.0).abs() < 1e-6);
        assert!((curve.evaluate(0.1) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_clamps_outside_domain() {
        let curve = SampledCurve::linear();
        assert_eq!(curve.evaluate(-3.0), 0.0);
        assert_eq!(curve.evaluate(3.0), 1.0);
    }

    #[test]
    fn test_constant_and_empty() {
        assert_eq!(SampledCurve::constant(0.4).evaluate(0.9), 0.4);
        assert_eq!(SampledCurve::new(vec![]).evaluate(0.5), 0.0);
    }

    #[test]
    fn test_island_falloff_shape() {
        let falloff = SampledCurve::island_falloff();
        assert!(falloff.evaluate(0.0) < 1e-6);
        assert!(falloff.evaluate(0.3) < 0.05);
        assert!((falloff.evaluate(1.0) - 1.0).abs() < 1e-6);

        let mut last = -1.0;
        for i in 0..=20 {
            let y = falloff.evaluate(i as f32 / 20.0);
            assert!(y >= last, "falloff should be monotonic");
            last = y;
        }
    }

    #[test]
    fn test_closure_curve() {
        let square = |x: f32| x * x;
        assert_eq!(square.evaluate(3.0), 9.0);
    }
}
