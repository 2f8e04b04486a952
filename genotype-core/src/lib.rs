//! Genotype Core Library
//!
//! Pattern matching and statistical sampling kernels for streams of
//! FASTA/FASTQ sequence records.

pub mod types;
pub mod rng;
pub mod iupac;
#[cfg(feature = "matcher")] pub mod matcher;
#[cfg(feature = "sampling")] pub mod sampling;
#[cfg(all(feature = "matcher", feature = "sampling"))] pub mod config;

// Re-export commonly used types and functions
pub use types::{gc_content, Searchable, Sequence};
pub use rng::Xorshift32;
#[cfg(feature = "matcher")]
pub use matcher::{
    Algorithm, FindAll, Match, MatchContext, MatchError, MatchOptions, MatchResult,
    PatternMatcher, StreamMatches, TryStreamMatches,
};
#[cfg(feature = "sampling")]
pub use sampling::{
    BernoulliSampler, RandomSampler, ReservoirSampler, SampleOptions, Sampler, SamplingError,
    SamplingResult, SamplingStrategy, StratifiedSampler, SystematicSampler,
    WeightedReservoirSampler, sample_items,
};
#[cfg(all(feature = "matcher", feature = "sampling"))]
pub use config::KernelConfig;

/// Version information for the genotype core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
