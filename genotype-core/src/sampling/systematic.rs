//! Systematic sampling: every `interval`-th item starting at `offset`

use super::{validate_interval, validate_sample_size, ItemSelector, SamplingResult, Selected};

/// Keeps the items at positions `offset`, `offset + interval`,
/// `offset + 2 * interval`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystematicSampler {
    interval: usize,
    offset: usize,
    position: usize,
}

impl SystematicSampler {
    /// `interval` must be > 0
    pub fn new(interval: usize, offset: usize) -> SamplingResult<Self> {
        validate_interval(interval)?;
        log::debug!("Created systematic sampler (interval {}, offset {})", interval, offset);
        Ok(Self {
            interval,
            offset,
            position: 0,
        })
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Items observed so far
    pub fn seen(&self) -> usize {
        self.position
    }

    /// Whether stream position `index` falls on the sampling grid
    pub fn is_selected(&self, index: usize) -> bool {
        index >= self.offset && (index - self.offset) % self.interval == 0
    }

    /// Lazily re-emit the selected items of `items`
    pub fn sample<I>(&mut self, items: I) -> Selected<'_, Self, I::IntoIter>
    where
        I: IntoIterator,
    {
        Selected::new(self, items.into_iter())
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Two-pass sample of exactly `min(k, n)` evenly spaced items.
    ///
    /// The stream is fully consumed to learn `n`; the stride is
    /// `max(1, floor(n / k))` starting at index 0. When `k >= n` every item
    /// is returned unchanged.
    pub fn sample_by_size<T, I>(items: I, k: usize) -> SamplingResult<Vec<T>>
    where
        I: IntoIterator<Item = T>,
    {
        validate_sample_size(k)?;

        let all: Vec<T> = items.into_iter().collect();
        let n = all.len();
        if k >= n {
            return Ok(all);
        }

        let interval = (n / k).max(1);
        log::debug!("Systematic sample of {} from {} items (interval {})", k, n, interval);
        Ok(all
            .into_iter()
            .enumerate()
            .filter(|(index, _)| index % interval == 0 && index / interval < k)
            .map(|(_, item)| item)
            .collect())
    }
}

impl ItemSelector for SystematicSampler {
    fn select_next(&mut self) -> bool {
        let index = self.position;
        self.position += 1;
        self.is_selected(index)
    }
}
