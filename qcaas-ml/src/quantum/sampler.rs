//! Measurement primitive: exact probabilities or seeded shot counts.

use super::Statevector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct Sampler {
    shots: usize,
    rng: StdRng,
}

impl Sampler {
    /// `shots == 0` returns exact probabilities.
    pub fn new(shots: usize, seed: u64) -> Self {
        Self {
            shots,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn exact() -> Self {
        Self::new(0, 0)
    }

    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Quasi-probability of each basis outcome.
    pub fn sample(&mut self, state: &Statevector) -> Vec<f64> {
        let probabilities = state.probabilities();
        if self.shots == 0 {
            return probabilities;
        }

        let mut cumulative = Vec::with_capacity(probabilities.len());
        let mut total = 0.0;
        for p in &probabilities {
            total += p;
            cumulative.push(total);
        }
        if total <= 0.0 {
            return probabilities;
        }
        let mut counts = vec![0usize; probabilities.len()];
        let last = counts.len() - 1;
        for _ in 0..self.shots {
            let u = self.rng.gen_range(0.0..total);
            let outcome = cumulative.partition_point(|&c| c <= u).min(last);
            counts[outcome] += 1;
        }
        counts
            .into_iter()
            .map(|c| c as f64 / self.shots as f64)
            .collect()
    }
}

/// Fold basis-outcome probabilities onto `num_classes` classes by outcome parity.
pub fn parity_probabilities(outcomes: &[f64], num_classes: usize) -> Vec<f64> {
    let mut classes = vec![0.0; num_classes];
    if num_classes == 0 {
        return classes;
    }
    for (b, p) in outcomes.iter().enumerate() {
        classes[b % num_classes] += p;
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus_state() -> Statevector {
        let mut s = Statevector::zero(1).unwrap();
        s.h(0).unwrap();
        s
    }

    #[test]
    fn test_exact_mode() {
        let mut sampler = Sampler::exact();
        let p = sampler.sample(&plus_state());
        assert!((p[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_shots_sum_to_one_and_are_seeded() {
        let state = plus_state();
        let a = Sampler::new(1024, 42).sample(&state);
        let b = Sampler::new(1024, 42).sample(&state);
        assert_eq!(a, b);
        assert!((a.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((a[0] - 0.5).abs() < 0.1);
    }

    #[test]
    fn test_deterministic_state_always_same_outcome() {
        let state = Statevector::zero(2).unwrap();
        assert_eq!(Sampler::new(100, 7).sample(&state), vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_parity_interpretation() {
        let outcomes = [0.1, 0.2, 0.3, 0.4];
        assert_eq!(parity_probabilities(&outcomes, 2), vec![0.1 + 0.3, 0.2 + 0.4]);
        let three = parity_probabilities(&outcomes, 3);
        assert!((three[0] - 0.5).abs() < 1e-12);
        assert_eq!(three[2], 0.3);
    }
}
