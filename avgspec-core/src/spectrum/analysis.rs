//! Short-time spectral analysis
//!
//! Slides the analysis window across a zero-padded signal and collects one
//! log-magnitude spectrum per frame

use ndarray::{Array1, Array2, Axis};
use thiserror::Error;

use super::fft::DftEngine;
use super::windowing::AnalysisWindow;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("FFT size must be non-zero")]
    ZeroFftSize,

    #[error("window length must be non-zero")]
    ZeroWindow,

    #[error("window length {window} exceeds FFT size {fft_size}")]
    WindowTooLong { window: usize, fft_size: usize },

    #[error("hop size must be at least 1")]
    ZeroHop,
}

/// Analyzer configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// FFT size N (bins 0..=N/2 are produced)
    pub fft_size: usize,

    /// Analysis window length M, at most N
    pub window_len: usize,

    /// Hop size H in samples between consecutive frame centers
    pub hop: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 4096,
            window_len: 4096,
            hop: 512,
        }
    }
}

/// Short-time Fourier analyzer
///
/// Owns the FFT engine and the normalized Blackman-Harris window; both are
/// built once and reused across frames and files.
pub struct StftAnalyzer {
    config: AnalyzerConfig,
    window: AnalysisWindow,
    engine: DftEngine,
}

impl StftAnalyzer {
    /// Create a new analyzer, rejecting invalid configurations
    ///
    /// A window longer than the FFT size would overflow the zero-phase
    /// placement, so it is a configuration error, not a runtime condition.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        if config.fft_size == 0 {
            return Err(AnalysisError::ZeroFftSize);
        }
        if config.window_len == 0 {
            return Err(AnalysisError::ZeroWindow);
        }
        if config.window_len > config.fft_size {
            return Err(AnalysisError::WindowTooLong {
                window: config.window_len,
                fft_size: config.fft_size,
            });
        }
        if config.hop == 0 {
            return Err(AnalysisError::ZeroHop);
        }

        let window = AnalysisWindow::blackman_harris(config.window_len);
        let engine = DftEngine::new(config.fft_size);

        Ok(Self {
            config,
            window,
            engine,
        })
    }

    /// Analyze a signal and return its spectrum batch
    ///
    /// The signal is padded with floor(M/2) zeros on each side so the first
    /// frame is centered on sample 0 and the last frame on the final sample.
    /// The frame center then advances by the hop size while it stays within
    /// the padded signal.
    ///
    /// # Arguments
    /// * `samples` - Input signal
    ///
    /// # Returns
    /// Matrix with one row per frame and fft_size/2 + 1 columns. A signal too
    /// short to fit one centered frame yields a matrix with zero rows.
    pub fn analyze(&mut self, samples: &[f64]) -> Array2<f64> {
        let h1 = self.window.half_before();
        let h2 = self.window.half_after();

        let padded_len = samples.len() + 2 * h2;
        let mut padded = vec![0.0; padded_len];
        padded[h2..h2 + samples.len()].copy_from_slice(samples);

        let bins = self.engine.num_bins();
        let mut rows: Vec<f64> = Vec::new();
        let mut frames = 0;

        let mut center = h1;
        while center + h1 <= padded_len {
            let frame = &padded[center - h1..center + h2];
            let spectrum = self.engine.log_magnitude(frame, &self.window);
            rows.extend_from_slice(&spectrum);
            frames += 1;
            center += self.config.hop;
        }

        Array2::from_shape_vec((frames, bins), rows)
            .expect("every frame contributes exactly one fixed-length row")
    }

    /// Number of frequency bins per spectrum
    pub fn num_bins(&self) -> usize {
        self.engine.num_bins()
    }

    /// Current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

/// Element-wise mean over the frames of a batch
///
/// Returns `None` for an empty batch; averaging zero frames is undefined and
/// the caller decides how to treat it.
pub fn mean_frames(batch: &Array2<f64>) -> Option<Array1<f64>> {
    batch.mean_axis(Axis(0))
}
