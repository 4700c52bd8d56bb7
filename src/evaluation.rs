//! Terrain evaluation
//!
//! Coverage ratios over the classified graph, a tent-shaped score per ratio,
//! and the number of separate landmasses.

use std::fmt;

use log::debug;

use crate::biome::{is_coastal, Biome, HIGH_ELEVATION, MID_ELEVATION};
use crate::config::{ScoreTarget, ScoringConfig};
use crate::curve::SampledCurve;
use crate::graph::PlanarGraph;

/// Keys in each sampled score curve (x = 0, 0.05, ..., 1)
pub const SCORE_CURVE_SAMPLES: usize = 21;

/// Tent function peaking at 1 when `x == target`
///
/// Falls off linearly with `slope` and is 0 once `|x - target| >= 1 / slope`.
pub fn triangular_score(x: f32, slope: f32, target: f32) -> f32 {
    let distance = (x - target).abs();
    if distance < 1.0 / slope {
        1.0 - slope * distance
    } else {
        0.0
    }
}

impl ScoreTarget {
    #[inline]
    pub fn score(&self, x: f32) -> f32 {
        triangular_score(x, self.slope, self.target)
    }

    /// The score function sampled over `[0, 1]`
    pub fn curve(&self) -> SampledCurve {
        SampledCurve::from_fn(SCORE_CURVE_SAMPLES, |x| self.score(x))
    }
}

fn ratio(hits: usize, total: usize) -> Option<f32> {
    (total > 0).then(|| hits as f32 / total as f32)
}

/// Share of coastal land faces that are beach
///
/// `None` when the map has no coastline.
pub fn beach_coverage(graph: &PlanarGraph) -> Option<f32> {
    let (beaches, coastal) = (0..graph.face_count())
        .filter(|&face| is_coastal(graph, face))
        .fold((0, 0), |(beaches, coastal), face| {
            let beach = (graph.biome(face) == Biome::Beach) as usize;
            (beaches + beach, coastal + 1)
        });
    ratio(beaches, coastal)
}

/// Share of non-ocean faces above [`HIGH_ELEVATION`]
///
/// Inland lakes count towards the total. `None` when everything is ocean.
pub fn high_elevation_coverage(graph: &PlanarGraph) -> Option<f32> {
    let candidates = graph
        .faces()
        .iter()
        .filter(|f| !matches!(f.biome, Biome::SaltWater | Biome::Error));
    let (high, total) = candidates.fold((0, 0), |(high, total), f| {
        ((f.elevation() > HIGH_ELEVATION) as usize + high, total + 1)
    });
    ratio(high, total)
}

/// Share of land faces at or below [`MID_ELEVATION`]
///
/// `None` when the map has no land.
pub fn lowland_coverage(graph: &PlanarGraph) -> Option<f32> {
    let (low, total) = graph
        .faces()
        .iter()
        .filter(|f| f.biome.is_land())
        .fold((0, 0), |(low, total), f| {
            ((f.elevation() <= MID_ELEVATION) as usize + low, total + 1)
        });
    ratio(low, total)
}

/// Number of connected landmasses
///
/// Water and unclassified faces separate components.
pub fn count_land_components(graph: &PlanarGraph) -> usize {
    let mut visited = vec![false; graph.face_count()];
    let mut components = 0;
    let mut stack = Vec::new();

    for seed in 0..graph.face_count() {
        if visited[seed] || !graph.biome(seed).is_land() {
            continue;
        }
        components += 1;
        visited[seed] = true;
        stack.push(seed);

        while let Some(face) = stack.pop() {
            for neighbor in graph.neighbors(face) {
                if !visited[neighbor] && graph.biome(neighbor).is_land() {
                    visited[neighbor] = true;
                    stack.push(neighbor);
                }
            }
        }
    }
    components
}

/// Coverage ratio and score of one category
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryResult {
    pub coverage: Option<f32>,
    pub score: Option<f32>,
}

impl CategoryResult {
    fn new(coverage: Option<f32>, target: &ScoreTarget) -> Self {
        Self {
            coverage,
            score: coverage.map(|c| target.score(c)),
        }
    }
}

/// Everything the evaluator reports about one island
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResults {
    pub beach: CategoryResult,
    pub high_elevation: CategoryResult,
    pub lowland: CategoryResult,

    /// Connected landmasses
    pub components: usize,

    /// Sampled score functions, for plotting
    pub beach_curve: SampledCurve,
    pub high_elevation_curve: SampledCurve,
    pub lowland_curve: SampledCurve,
}

impl EvaluationResults {
    /// Best of the defined category scores
    pub fn max_score(&self) -> Option<f32> {
        [self.beach, self.high_elevation, self.lowland]
            .iter()
            .filter_map(|c| c.score)
            .reduce(f32::max)
    }
}

/// Two decimals, or `n/a` when undefined
struct Metric(Option<f32>);

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{:.2}", value),
            None => f.write_str("n/a"),
        }
    }
}

impl fmt::Display for EvaluationResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Max Score: {} Number of Components: {}",
            Metric(self.max_score()),
            self.components
        )?;
        writeln!(
            f,
            "Coastline Beach Coverage: {} Beach Score: {}",
            Metric(self.beach.coverage),
            Metric(self.beach.score)
        )?;
        writeln!(
            f,
            "Mountain Cover Percentage: {} Mountain Score: {}",
            Metric(self.high_elevation.coverage),
            Metric(self.high_elevation.score)
        )?;
        writeln!(
            f,
            "Lowland Cover Percentage: {} Lowland Score: {}",
            Metric(self.lowland.coverage),
            Metric(self.lowland.score)
        )
    }
}

/// Scores a classified graph against fixed targets
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TerrainEvaluator {
    pub scoring: ScoringConfig,
}

impl TerrainEvaluator {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self { scoring }
    }

    pub fn evaluate(&self, graph: &PlanarGraph) -> EvaluationResults {
        let results = EvaluationResults {
            beach: CategoryResult::new(beach_coverage(graph), &self.scoring.beach),
            high_elevation: CategoryResult::new(
                high_elevation_coverage(graph),
                &self.scoring.high_elevation,
            ),
            lowland: CategoryResult::new(lowland_coverage(graph), &self.scoring.lowland),
            components: count_land_components(graph),
            beach_curve: self.scoring.beach.curve(),
            high_elevation_curve: self.scoring.high_elevation.curve(),
            lowland_curve: self.scoring.lowland.curve(),
        };
        debug!(
            "evaluation: beach {:?}, high {:?}, lowland {:?}, {} components",
            results.beach.coverage,
            results.high_elevation.coverage,
            results.lowland.coverage,
            results.components
        );
        results
    }
}
