//! Simple random sampling without replacement

use super::{validate_sample_size, Sampler, SamplingResult};
use crate::rng::Xorshift32;

/// Buffers the whole stream, then draws `k` items with a partial
/// Fisher-Yates shuffle.
///
/// Memory grows with the stream; prefer [`ReservoirSampler`](super::ReservoirSampler)
/// when the input does not fit in memory.
#[derive(Debug, Clone)]
pub struct RandomSampler<T> {
    capacity: usize,
    buffer: Vec<T>,
    rng: Xorshift32,
    initial_rng: Xorshift32,
}

impl<T> RandomSampler<T> {
    pub fn new(k: usize, seed: Option<u64>) -> SamplingResult<Self> {
        Self::with_rng(k, Xorshift32::from_optional_seed(seed))
    }

    pub fn with_rng(k: usize, rng: Xorshift32) -> SamplingResult<Self> {
        validate_sample_size(k)?;
        log::debug!("Created random sampler with sample size {}", k);
        Ok(Self {
            capacity: k,
            buffer: Vec::new(),
            initial_rng: rng.clone(),
            rng,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> Sampler<T> for RandomSampler<T> {
    fn observe(&mut self, item: T) {
        self.buffer.push(item);
    }

    fn seen(&self) -> usize {
        self.buffer.len()
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.rng = self.initial_rng.clone();
    }

    fn into_sample(mut self) -> Vec<T> {
        let n = self.buffer.len();
        let k = self.capacity.min(n);

        // Only the first k slots need shuffling
        for i in 0..k {
            let j = i + self.rng.next_index(n - i);
            self.buffer.swap(i, j);
        }

        self.buffer.truncate(k);
        self.buffer
    }
}
