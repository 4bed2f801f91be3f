//! Spawn balancing
//!
//! Which kind appears on the next click depends on how far the live
//! population has drifted from the target mix. Kinds that are under-
//! represented earn extra chance points, over-represented ones lose points.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::MatterKind;
use crate::config::SpawnTuning;

/// Live ball counts per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    counts: [u32; 3],
}

impl Population {
    pub fn from_counts(counts: [u32; 3]) -> Self {
        Self { counts }
    }

    pub fn counts(&self) -> [u32; 3] {
        self.counts
    }

    pub fn count(&self, kind: MatterKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn increment(&mut self, kind: MatterKind) {
        self.counts[kind.index()] += 1;
    }

    pub fn decrement(&mut self, kind: MatterKind) {
        let c = &mut self.counts[kind.index()];
        if *c == 0 {
            log::warn!("population underflow for {kind:?}");
        }
        *c = c.saturating_sub(1);
    }

    pub fn clear(&mut self) {
        self.counts = [0; 3];
    }
}

/// Chance points per kind, or `None` when the draw should be uniform
pub fn chance_points(population: &Population, tuning: &SpawnTuning) -> Option<[u32; 3]> {
    let total = population.total();
    if total < tuning.uniform_below {
        return None;
    }

    let mut points = [0u32; 3];
    for kind in MatterKind::ALL {
        let i = kind.index();
        let share = population.count(kind) as f32 / total as f32;
        let deviation = tuning.target[i] - share;
        let bonus = (deviation * tuning.gain).round() as i32;
        points[i] = (tuning.base_points[i] + bonus).max(0) as u32;
    }

    if points.iter().all(|p| *p == 0) {
        return None;
    }
    Some(points)
}

/// Pick a kind for a uniform `draw` in `[0, 1)`
pub fn pick_kind(population: &Population, tuning: &SpawnTuning, draw: f32) -> MatterKind {
    let draw = draw.clamp(0.0, 1.0);
    let Some(points) = chance_points(population, tuning) else {
        let i = ((draw * 3.0) as usize).min(2);
        return MatterKind::ALL[i];
    };

    let total: u32 = points.iter().sum();
    let mut upper = 0.0;
    for kind in MatterKind::ALL {
        upper += points[kind.index()] as f32 / total as f32;
        if draw < upper {
            return kind;
        }
    }
    // draw landed on the last band's rounded edge
    MatterKind::ALL
        .into_iter()
        .rev()
        .find(|k| points[k.index()] > 0)
        .unwrap_or(MatterKind::Neutral)
}

/// Owns the population counters and the queued next kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPolicy {
    pub population: Population,
    pub tuning: SpawnTuning,
    next: MatterKind,
}

impl SpawnPolicy {
    pub fn new(tuning: SpawnTuning) -> Self {
        Self {
            population: Population::default(),
            tuning,
            next: MatterKind::Neutral,
        }
    }

    /// Kind the next spawn will use
    pub fn next_kind(&self) -> MatterKind {
        self.next
    }

    /// Draw and queue the following kind from the current population
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> MatterKind {
        let draw: f32 = rng.random();
        self.next = pick_kind(&self.population, &self.tuning, draw);
        log::debug!(
            "next spawn {:?} (counts {:?})",
            self.next,
            self.population.counts()
        );
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_small_population_draws_uniformly() {
        let population = Population::from_counts([2, 1, 1]);
        let tuning = SpawnTuning::default();
        assert_eq!(chance_points(&population, &tuning), None);
        assert_eq!(pick_kind(&population, &tuning, 0.1), MatterKind::Neutral);
        assert_eq!(pick_kind(&population, &tuning, 0.5), MatterKind::Positive);
        assert_eq!(pick_kind(&population, &tuning, 0.9), MatterKind::Negative);
    }

    #[test]
    fn test_small_population_histogram_is_flat() {
        let population = Population::from_counts([2, 1, 1]);
        let tuning = SpawnTuning::default();
        let mut hist = [0u32; 3];
        for i in 0..3000 {
            let draw = i as f32 / 3000.0;
            hist[pick_kind(&population, &tuning, draw).index()] += 1;
        }
        for h in hist {
            assert!((990..=1010).contains(&h), "{hist:?}");
        }
    }

    #[test]
    fn test_underrepresented_kind_gains_points() {
        // Plenty of neutral, no negative at all
        let population = Population::from_counts([8, 4, 0]);
        let tuning = SpawnTuning::default();
        let points = chance_points(&population, &tuning).unwrap();
        assert!(points[2] > points[1]);
        assert!(points[2] > tuning.base_points[2] as u32);
    }

    #[test]
    fn test_points_floor_at_zero() {
        let population = Population::from_counts([0, 20, 0]);
        let tuning = SpawnTuning {
            gain: 1000.0,
            ..SpawnTuning::default()
        };
        let points = chance_points(&population, &tuning).unwrap();
        assert_eq!(points[1], 0);
        // Positive can never be drawn
        for i in 0..100 {
            let kind = pick_kind(&population, &tuning, i as f32 / 100.0);
            assert_ne!(kind, MatterKind::Positive);
        }
    }

    #[test]
    fn test_draw_bands_are_cumulative() {
        let population = Population::from_counts([5, 0, 0]);
        let tuning = SpawnTuning {
            target: [1.0, 0.0, 0.0],
            base_points: [1, 1, 2],
            gain: 0.0,
            ..SpawnTuning::default()
        };
        // Bands: [0, .25) [.25, .5) [.5, 1)
        assert_eq!(pick_kind(&population, &tuning, 0.2), MatterKind::Neutral);
        assert_eq!(pick_kind(&population, &tuning, 0.3), MatterKind::Positive);
        assert_eq!(pick_kind(&population, &tuning, 0.6), MatterKind::Negative);
        assert_eq!(pick_kind(&population, &tuning, 1.0), MatterKind::Negative);
    }

    #[test]
    fn test_population_counters() {
        let mut population = Population::default();
        population.increment(MatterKind::Positive);
        population.increment(MatterKind::Positive);
        population.decrement(MatterKind::Positive);
        population.decrement(MatterKind::Negative);
        assert_eq!(population.counts(), [0, 1, 0]);
        population.clear();
        assert_eq!(population.total(), 0);
    }

    #[test]
    fn test_policy_is_deterministic_for_seed() {
        let mut a = SpawnPolicy::new(SpawnTuning::default());
        let mut b = SpawnPolicy::new(SpawnTuning::default());
        let mut rng_a = Pcg32::seed_from_u64(7);
        let mut rng_b = Pcg32::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(a.advance(&mut rng_a), b.advance(&mut rng_b));
        }
        assert_eq!(a.next_kind(), b.next_kind());
    }
}
