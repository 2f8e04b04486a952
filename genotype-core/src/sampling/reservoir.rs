//! Reservoir sampling.
//!
//! Maintains a uniform sample of size `k` from a stream of unknown length
//! using **Algorithm R** (Vitter, 1985), plus the weighted variant **A-Res**
//! (Efraimidis & Spirakis, 2006).
//!
//! ## References
//!
//! - Vitter (1985): reservoir sampling "Algorithm R".
//! - Efraimidis & Spirakis (2006): weighted random sampling with a reservoir.

use std::cmp::Ordering;

use super::{validate_sample_size, Sampler, SamplingError, SamplingResult};
use crate::rng::Xorshift32;

/// A reservoir sampler that keeps a uniform sample of at most `k` items.
///
/// After `n >= k` items each one is retained with probability exactly
/// `k / n`, independent of arrival order.
#[derive(Debug, Clone)]
pub struct ReservoirSampler<T> {
    capacity: usize,
    seen: usize,
    buffer: Vec<T>,
    rng: Xorshift32,
    initial_rng: Xorshift32,
}

impl<T> ReservoirSampler<T> {
    /// Create a sampler keeping at most `k` items; `k` must be > 0.
    ///
    /// Without a seed the RNG is drawn from entropy.
    pub fn new(k: usize, seed: Option<u64>) -> SamplingResult<Self> {
        Self::with_rng(k, Xorshift32::from_optional_seed(seed))
    }

    /// Create a sampler driven by a caller-supplied generator
    pub fn with_rng(k: usize, rng: Xorshift32) -> SamplingResult<Self> {
        validate_sample_size(k)?;
        log::debug!("Created reservoir sampler with capacity {}", k);
        Ok(Self::with_validated_capacity(k, rng))
    }

    /// Construction for callers that have already checked `k > 0`
    pub(crate) fn with_validated_capacity(k: usize, rng: Xorshift32) -> Self {
        debug_assert!(k > 0, "reservoir capacity must be > 0");
        Self {
            capacity: k,
            seen: 0,
            buffer: Vec::with_capacity(k),
            initial_rng: rng.clone(),
            rng,
        }
    }

    /// Current sample (size ≤ k)
    pub fn samples(&self) -> &[T] {
        &self.buffer
    }

    /// Clone of the current sample
    pub fn get_sample(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.buffer.clone()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl<T> Sampler<T> for ReservoirSampler<T> {
    fn observe(&mut self, item: T) {
        self.seen += 1;

        if self.buffer.len() < self.capacity {
            self.buffer.push(item);
            return;
        }

        // Replace with probability k / seen
        let j = self.rng.next_index(self.seen);
        if j < self.capacity {
            self.buffer[j] = item;
        }
    }

    fn seen(&self) -> usize {
        self.seen
    }

    fn reset(&mut self) {
        self.seen = 0;
        self.buffer.clear();
        self.rng = self.initial_rng.clone();
    }

    fn into_sample(self) -> Vec<T> {
        self.buffer
    }
}

/// An item held by the weighted reservoir together with its random key
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedEntry<T> {
    pub item: T,
    pub key: f64,
}

/// A weighted reservoir sampler (A-Res).
///
/// Each item with weight `w` gets the key `u^(1/w)` with `u ~ Uniform(0,1)`;
/// the `k` largest keys are kept. Once full, entries stay sorted by key in
/// descending order so the minimum is always last.
#[derive(Debug, Clone)]
pub struct WeightedReservoirSampler<T> {
    capacity: usize,
    seen: usize,
    entries: Vec<WeightedEntry<T>>,
    rng: Xorshift32,
    initial_rng: Xorshift32,
}

impl<T> WeightedReservoirSampler<T> {
    /// Create a sampler keeping at most `k` items; `k` must be > 0.
    pub fn new(k: usize, seed: Option<u64>) -> SamplingResult<Self> {
        Self::with_rng(k, Xorshift32::from_optional_seed(seed))
    }

    pub fn with_rng(k: usize, rng: Xorshift32) -> SamplingResult<Self> {
        validate_sample_size(k)?;
        log::debug!("Created weighted reservoir sampler with capacity {}", k);
        Ok(Self {
            capacity: k,
            seen: 0,
            entries: Vec::with_capacity(k),
            initial_rng: rng.clone(),
            rng,
        })
    }

    /// Add a weighted item from the stream.
    ///
    /// Weights must be finite and > 0; a rejected item is not counted.
    pub fn observe(&mut self, item: T, weight: f64) -> SamplingResult<()> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(SamplingError::InvalidWeight(weight));
        }
        self.seen += 1;

        let key = self.rng.next_f64().powf(1.0 / weight);
        let entry = WeightedEntry { item, key };

        if self.entries.len() < self.capacity {
            self.entries.push(entry);
            if self.entries.len() == self.capacity {
                self.entries.sort_by(|a, b| descending(a.key, b.key));
            }
            return Ok(());
        }

        let last = self.entries.len() - 1;
        if key > self.entries[last].key {
            self.entries[last] = entry;
            // One bubble pass restores descending order
            let mut i = last;
            while i > 0 && self.entries[i].key > self.entries[i - 1].key {
                self.entries.swap(i, i - 1);
                i -= 1;
            }
        }

        Ok(())
    }

    /// Observe every `(item, weight)` pair, stopping at the first bad weight
    pub fn observe_all<I>(&mut self, items: I) -> SamplingResult<()>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        for (item, weight) in items {
            self.observe(item, weight)?;
        }
        Ok(())
    }

    /// Sampled items, highest key first once the reservoir is full
    pub fn samples(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|e| &e.item)
    }

    pub fn get_sample(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.entries.iter().map(|e| e.item.clone()).collect()
    }

    pub fn entries(&self) -> &[WeightedEntry<T>] {
        &self.entries
    }

    /// Keys for diagnostics
    pub fn keys(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.key).collect()
    }

    pub fn into_sample(self) -> Vec<T> {
        self.entries.into_iter().map(|e| e.item).collect()
    }

    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reset(&mut self) {
        self.seen = 0;
        self.entries.clear();
        self.rng = self.initial_rng.clone();
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
