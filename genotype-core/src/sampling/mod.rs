//! Statistical sampling engine
//!
//! Single-pass samplers for streams of unknown length: reservoir (Algorithm
//! R), weighted reservoir (A-Res), systematic, random (partial
//! Fisher-Yates), stratified and Bernoulli. Every sampler owns its own
//! [`Xorshift32`](crate::rng::Xorshift32); given a seed and the same input
//! order the output is identical across runs.

use serde::{Deserialize, Serialize};

pub mod bernoulli;
pub mod random;
pub mod reservoir;
pub mod stratified;
pub mod systematic;

pub use bernoulli::BernoulliSampler;
pub use random::RandomSampler;
pub use reservoir::{ReservoirSampler, WeightedEntry, WeightedReservoirSampler};
pub use stratified::StratifiedSampler;
pub use systematic::SystematicSampler;

/// Result type for sampling operations
pub type SamplingResult<T> = Result<T, SamplingError>;

/// Errors that can occur while configuring or feeding a sampler
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplingError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid weight: {0} (weights must be finite and > 0)")]
    InvalidWeight(f64),
}

/// A sampler that buffers what it keeps until the stream ends.
///
/// The sampler is exhausted once `into_sample` consumes it; `reset` puts a
/// borrowed sampler back in its just-constructed state, including the RNG.
pub trait Sampler<T> {
    /// Feed the next item of the stream
    fn observe(&mut self, item: T);

    /// Number of items observed since construction or the last reset
    fn seen(&self) -> usize;

    fn reset(&mut self);

    /// Finish the pass and hand back the sample
    fn into_sample(self) -> Vec<T>
    where
        Self: Sized;

    /// Observe every item, then return the sample
    fn sample_all<I>(mut self, items: I) -> Vec<T>
    where
        Self: Sized,
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.observe(item);
        }
        self.into_sample()
    }
}

/// Per-item keep/drop decision for samplers that never buffer
pub trait ItemSelector {
    /// Decide whether the next item in the stream is kept
    fn select_next(&mut self) -> bool;
}

/// Lazy adapter that re-emits the items an [`ItemSelector`] keeps
pub struct Selected<'s, S: ?Sized, I> {
    selector: &'s mut S,
    items: I,
}

impl<'s, S: ?Sized, I> Selected<'s, S, I> {
    pub(crate) fn new(selector: &'s mut S, items: I) -> Self {
        Self { selector, items }
    }
}

impl<'s, S, I> Iterator for Selected<'s, S, I>
where
    S: ItemSelector + ?Sized,
    I: Iterator,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        loop {
            let item = self.items.next()?;
            if self.selector.select_next() {
                return Some(item);
            }
        }
    }
}

/// Sampling strategies reachable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplingStrategy {
    #[default]
    Reservoir,
    Systematic,
    Random,
    Bernoulli,
}

/// Options for [`sample_items`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleOptions {
    pub strategy: SamplingStrategy,
    /// Target sample size (reservoir, random, size-driven systematic)
    pub size: Option<usize>,
    /// Inclusion probability (bernoulli)
    pub fraction: Option<f64>,
    /// Fixed stride (systematic); takes precedence over `size`
    pub interval: Option<usize>,
    pub offset: usize,
    pub seed: Option<u64>,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            strategy: SamplingStrategy::Reservoir,
            size: None,
            fraction: None,
            interval: None,
            offset: 0,
            seed: None,
        }
    }
}

impl SampleOptions {
    pub fn reservoir(size: usize) -> Self {
        Self {
            strategy: SamplingStrategy::Reservoir,
            size: Some(size),
            ..Default::default()
        }
    }

    pub fn random(size: usize) -> Self {
        Self {
            strategy: SamplingStrategy::Random,
            size: Some(size),
            ..Default::default()
        }
    }

    pub fn systematic(interval: usize, offset: usize) -> Self {
        Self {
            strategy: SamplingStrategy::Systematic,
            interval: Some(interval),
            offset,
            ..Default::default()
        }
    }

    pub fn bernoulli(fraction: f64) -> Self {
        Self {
            strategy: SamplingStrategy::Bernoulli,
            fraction: Some(fraction),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that the strategy has the parameters it needs
    pub fn validate(&self) -> SamplingResult<()> {
        match self.strategy {
            SamplingStrategy::Reservoir | SamplingStrategy::Random => {
                validate_sample_size(self.required_size()?)
            }
            SamplingStrategy::Systematic => match (self.interval, self.size) {
                (Some(interval), _) => validate_interval(interval),
                (None, Some(size)) => validate_sample_size(size),
                (None, None) => Err(SamplingError::InvalidParams(
                    "systematic sampling needs an interval or a size".to_string(),
                )),
            },
            SamplingStrategy::Bernoulli => validate_probability(self.required_fraction()?),
        }
    }

    fn required_size(&self) -> SamplingResult<usize> {
        self.size.ok_or_else(|| {
            SamplingError::InvalidParams(format!("{:?} sampling needs a size", self.strategy))
        })
    }

    fn required_fraction(&self) -> SamplingResult<f64> {
        self.fraction.ok_or_else(|| {
            SamplingError::InvalidParams("bernoulli sampling needs a fraction".to_string())
        })
    }
}

/// Draw a sample from `items` with the strategy described by `options`
pub fn sample_items<T, I>(options: &SampleOptions, items: I) -> SamplingResult<Vec<T>>
where
    I: IntoIterator<Item = T>,
{
    options.validate()?;

    match options.strategy {
        SamplingStrategy::Reservoir => {
            let sampler = ReservoirSampler::new(options.required_size()?, options.seed)?;
            Ok(sampler.sample_all(items))
        }
        SamplingStrategy::Random => {
            let sampler = RandomSampler::new(options.required_size()?, options.seed)?;
            Ok(sampler.sample_all(items))
        }
        SamplingStrategy::Systematic => match options.interval {
            Some(interval) => {
                let mut sampler = SystematicSampler::new(interval, options.offset)?;
                Ok(sampler.sample(items).collect())
            }
            None => SystematicSampler::sample_by_size(items, options.required_size()?),
        },
        SamplingStrategy::Bernoulli => {
            let mut sampler = BernoulliSampler::new(options.required_fraction()?, options.seed)?;
            Ok(sampler.sample(items).collect())
        }
    }
}

pub(crate) fn validate_sample_size(k: usize) -> SamplingResult<()> {
    if k == 0 {
        return Err(SamplingError::InvalidParams("sample size must be > 0".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_interval(interval: usize) -> SamplingResult<()> {
    if interval == 0 {
        return Err(SamplingError::InvalidParams("interval must be > 0".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_probability(p: f64) -> SamplingResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(SamplingError::InvalidParams(format!(
            "probability must be within [0, 1] (got {})",
            p
        )));
    }
    Ok(())
}
