//! Batch orchestration

pub mod averager;

pub use averager::{AverageSpectrum, BatchAverager, BatchConfig, BatchError};
