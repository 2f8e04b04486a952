//! Stratified sampling: one reservoir per stratum label

use std::collections::BTreeMap;
use std::fmt;

use xxhash_rust::xxh64::xxh64;

use super::{validate_sample_size, ReservoirSampler, Sampler, SamplingError, SamplingResult};
use crate::rng::Xorshift32;

/// Routes each item to a per-label [`ReservoirSampler`].
///
/// Strata are created lazily the first time a label is seen. With a base
/// seed, the reservoir for label `l` is seeded with `xxh64(l) ^ seed`, so its
/// sample depends only on the items carrying that label and not on how
/// labels interleave in the stream.
pub struct StratifiedSampler<T, F> {
    total: usize,
    per_stratum: usize,
    seed: Option<u64>,
    stratum_fn: F,
    strata: BTreeMap<String, ReservoirSampler<T>>,
    seen: usize,
}

impl<T, F> StratifiedSampler<T, F>
where
    F: Fn(&T) -> String,
{
    /// Sampler returning at most `total` items.
    ///
    /// Each stratum holds `ceil(total / expected_strata)` items, or `total`
    /// when the number of strata is not known up front.
    pub fn new(
        total: usize,
        stratum_fn: F,
        expected_strata: Option<usize>,
        seed: Option<u64>,
    ) -> SamplingResult<Self> {
        validate_sample_size(total)?;
        let per_stratum = match expected_strata {
            Some(0) => {
                return Err(SamplingError::InvalidParams(
                    "expected strata must be > 0".to_string(),
                ))
            }
            Some(strata) => total.div_ceil(strata),
            None => total,
        };

        log::debug!(
            "Created stratified sampler (total {}, {} per stratum)",
            total,
            per_stratum
        );

        Ok(Self {
            total,
            per_stratum,
            seed,
            stratum_fn,
            strata: BTreeMap::new(),
            seen: 0,
        })
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Capacity of every per-stratum reservoir
    pub fn per_stratum(&self) -> usize {
        self.per_stratum
    }

    /// Labels seen so far, in sorted order
    pub fn strata(&self) -> impl Iterator<Item = &str> + '_ {
        self.strata.keys().map(String::as_str)
    }

    /// Current sample of a single stratum
    pub fn stratum_sample(&self, label: &str) -> Option<&[T]> {
        self.strata.get(label).map(ReservoirSampler::samples)
    }

    /// Concatenated per-stratum samples, in label order, capped at `total`
    pub fn get_all_samples(&self) -> Vec<T>
    where
        T: Clone,
    {
        let combined = self
            .strata
            .values()
            .flat_map(|stratum| stratum.samples().iter().cloned())
            .collect();
        self.cap_to_total(combined)
    }

    fn stratum_rng(&self, label: &str) -> Xorshift32 {
        match self.seed {
            Some(seed) => Xorshift32::new(xxh64(label.as_bytes(), 0) ^ seed),
            None => Xorshift32::from_optional_seed(None),
        }
    }

    /// Re-sample down to `total` with a fresh reservoir when the strata
    /// together hold too many items.
    fn cap_to_total(&self, combined: Vec<T>) -> Vec<T> {
        if combined.len() <= self.total {
            return combined;
        }

        log::warn!(
            "Stratified sample holds {} items across {} strata; re-sampling down to {}",
            combined.len(),
            self.strata.len(),
            self.total
        );

        ReservoirSampler::with_validated_capacity(self.total, Xorshift32::from_optional_seed(self.seed))
            .sample_all(combined)
    }
}

impl<T, F> Sampler<T> for StratifiedSampler<T, F>
where
    F: Fn(&T) -> String,
{
    fn observe(&mut self, item: T) {
        self.seen += 1;
        let label = (self.stratum_fn)(&item);

        if let Some(stratum) = self.strata.get_mut(&label) {
            stratum.observe(item);
            return;
        }

        // per_stratum >= 1 since total >= 1 and expected strata >= 1
        let mut stratum =
            ReservoirSampler::with_validated_capacity(self.per_stratum, self.stratum_rng(&label));
        log::debug!("New stratum '{}'", label);
        stratum.observe(item);
        self.strata.insert(label, stratum);
    }

    fn seen(&self) -> usize {
        self.seen
    }

    fn reset(&mut self) {
        self.strata.clear();
        self.seen = 0;
    }

    fn into_sample(mut self) -> Vec<T> {
        let strata = std::mem::take(&mut self.strata);
        let combined = strata
            .into_values()
            .flat_map(|stratum| stratum.into_sample())
            .collect();
        self.cap_to_total(combined)
    }
}

impl<T: fmt::Debug, F> fmt::Debug for StratifiedSampler<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StratifiedSampler")
            .field("total", &self.total)
            .field("per_stratum", &self.per_stratum)
            .field("seed", &self.seed)
            .field("strata", &self.strata)
            .field("seen", &self.seen)
            .finish_non_exhaustive()
    }
}
