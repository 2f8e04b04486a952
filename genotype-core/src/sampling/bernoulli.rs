//! Bernoulli sampling: each item kept independently with probability `p`

use super::{validate_probability, ItemSelector, SamplingResult, Selected};
use crate::rng::Xorshift32;

/// Keeps each item with a fixed probability; output size is random with
/// mean `p * n`.
#[derive(Debug, Clone)]
pub struct BernoulliSampler {
    probability: f64,
    rng: Xorshift32,
    initial_rng: Xorshift32,
}

impl BernoulliSampler {
    /// `probability` must lie in [0, 1]
    pub fn new(probability: f64, seed: Option<u64>) -> SamplingResult<Self> {
        Self::with_rng(probability, Xorshift32::from_optional_seed(seed))
    }

    pub fn with_rng(probability: f64, rng: Xorshift32) -> SamplingResult<Self> {
        validate_probability(probability)?;
        log::debug!("Created bernoulli sampler with p = {}", probability);
        Ok(Self {
            probability,
            initial_rng: rng.clone(),
            rng,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Draw one keep/drop decision
    pub fn should_sample(&mut self) -> bool {
        self.rng.next_f64() < self.probability
    }

    /// Lazily re-emit the kept items of `items`
    pub fn sample<I>(&mut self, items: I) -> Selected<'_, Self, I::IntoIter>
    where
        I: IntoIterator,
    {
        Selected::new(self, items.into_iter())
    }

    pub fn reset(&mut self) {
        self.rng = self.initial_rng.clone();
    }
}

impl ItemSelector for BernoulliSampler {
    fn select_next(&mut self) -> bool {
        self.should_sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extreme_probabilities() {
        let mut never = BernoulliSampler::new(0.0, Some(1)).unwrap();
        assert_eq!(never.sample(0..1000).count(), 0);

        let mut always = BernoulliSampler::new(1.0, Some(1)).unwrap();
        assert_eq!(always.sample(0..1000).collect::<Vec<_>>(), (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn test_rate_close_to_probability() {
        let mut sampler = BernoulliSampler::new(0.3, Some(17)).unwrap();
        let kept = sampler.sample(0..100_000).count();
        let rate = kept as f64 / 100_000.0;
        assert!((rate - 0.3).abs() < 0.01, "rate {}", rate);
    }

    #[test]
    fn test_output_keeps_input_order() {
        let mut sampler = BernoulliSampler::new(0.5, Some(3)).unwrap();
        let kept: Vec<u32> = sampler.sample(0..500).collect();
        assert!(kept.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_reset_replays_decisions() {
        let mut sampler = BernoulliSampler::new(0.5, Some(42)).unwrap();
        let first: Vec<u32> = sampler.sample(0..200).collect();
        sampler.reset();
        let second: Vec<u32> = sampler.sample(0..200).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_probability() {
        assert!(BernoulliSampler::new(-0.1, None).is_err());
        assert!(BernoulliSampler::new(1.01, None).is_err());
        assert!(BernoulliSampler::new(f64::NAN, None).is_err());
    }
}
