//! FFT engine using realfft for real-valued signals
//!
//! Computes the zero-phase log-magnitude spectrum of one windowed frame

use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

use super::windowing::AnalysisWindow;

/// FFT engine for zero-phase spectral analysis of real-valued frames
pub struct DftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer
    input_buffer: Vec<f64>,

    /// Reusable output buffer (complex spectrum)
    output_buffer: Vec<num_complex::Complex<f64>>,
}

impl DftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = vec![0.0; fft_size];
        let output_buffer = vec![num_complex::Complex::new(0.0, 0.0); fft_size / 2 + 1];

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        }
    }

    /// Compute the log-magnitude spectrum of one frame in dB
    ///
    /// The frame is multiplied by the window and rearranged so that the
    /// window's center sample lands on buffer index 0 (zero-phase windowing):
    /// the later floor((M+1)/2) samples go to the front of the buffer, the
    /// earlier floor(M/2) samples wrap to the back, and the middle stays zero.
    ///
    /// Magnitudes below machine epsilon are clamped up to machine epsilon
    /// before the log, so the dB floor is 20*log10(eps).
    ///
    /// # Arguments
    /// * `frame` - Input frame, same length M as the window, M <= fft_size
    /// * `window` - Unit-sum analysis window
    ///
    /// # Returns
    /// Log-magnitude spectrum for bins 0..=fft_size/2 (DC through Nyquist)
    pub fn log_magnitude(&mut self, frame: &[f64], window: &AnalysisWindow) -> Vec<f64> {
        let m = window.len();
        assert_eq!(frame.len(), m, "frame length must match window length");
        assert!(m <= self.fft_size, "window must not exceed FFT size");

        let h1 = window.half_before();
        let h2 = window.half_after();
        let weights = window.weights();

        self.input_buffer.fill(0.0);
        for i in 0..h1 {
            self.input_buffer[i] = frame[h2 + i] * weights[h2 + i];
        }
        for i in 0..h2 {
            self.input_buffer[self.fft_size - h2 + i] = frame[i] * weights[i];
        }

        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .expect("FFT processing failed");

        self.output_buffer
            .iter()
            .map(|c| {
                let mag = c.norm().max(f64::EPSILON);
                20.0 * mag.log10()
            })
            .collect()
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Get number of frequency bins (fft_size/2 + 1 for real FFT)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }
}

/// dB value every clamped-to-epsilon bin collapses to
pub fn db_floor() -> f64 {
    20.0 * f64::EPSILON.log10()
}
