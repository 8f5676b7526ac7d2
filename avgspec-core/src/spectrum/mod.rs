//! Spectral analysis with FFT

pub mod analysis;
pub mod fft;
pub mod smooth;
pub mod windowing;

pub use analysis::{AnalyzerConfig, StftAnalyzer};
pub use fft::DftEngine;
pub use smooth::adaptive_smooth;
pub use windowing::AnalysisWindow;
