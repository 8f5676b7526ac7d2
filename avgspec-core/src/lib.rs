//! Averaged magnitude spectrum analysis for audio files
//!
//! Short-time spectral analysis pipeline: Blackman-Harris windowing,
//! zero-phase FFT magnitudes in dB, per-file and cross-file averaging, and
//! adaptive smoothing of the final curve.

pub mod audio;
pub mod batch;
pub mod present;
pub mod spectrum;

pub use audio::Signal;
pub use batch::{AverageSpectrum, BatchAverager, BatchConfig, BatchError};
pub use spectrum::StftAnalyzer;
