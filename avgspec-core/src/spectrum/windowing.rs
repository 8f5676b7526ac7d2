//! Blackman-Harris analysis window
//!
//! Generates the window applied to every analysis frame before the FFT

use std::f64::consts::PI;

/// Analysis window with unit-sum weights
///
/// The weights are normalized exactly once at construction and are read-only
/// afterwards; every transform assumes a window that sums to 1.
#[derive(Debug, Clone)]
pub struct AnalysisWindow {
    /// Normalized window weights w[n] for n = 0..M-1
    weights: Vec<f64>,

    /// Samples before and including the center: floor((M+1)/2)
    half_before: usize,

    /// Samples after the center: floor(M/2)
    half_after: usize,
}

impl AnalysisWindow {
    /// Create a 4-term Blackman-Harris window of the given length,
    /// normalized to unit sum
    ///
    /// # Arguments
    /// * `length` - Window length M (at least 1)
    pub fn blackman_harris(length: usize) -> Self {
        let mut weights = blackman_harris_weights(length);

        let sum: f64 = weights.iter().sum();
        for w in weights.iter_mut() {
            *w /= sum;
        }

        Self {
            weights,
            half_before: (length + 1) / 2,
            half_after: length / 2,
        }
    }

    /// Window length M
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Normalized weights
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of samples up to and including the center sample: floor((M+1)/2)
    pub fn half_before(&self) -> usize {
        self.half_before
    }

    /// Number of samples after the center sample: floor(M/2)
    pub fn half_after(&self) -> usize {
        self.half_after
    }
}

/// Generate raw (unnormalized) Blackman-Harris coefficients
///
/// 4-term cosine sum with ~92 dB sidelobe attenuation:
/// w[n] = a0 - a1*cos(2πn/(M-1)) + a2*cos(4πn/(M-1)) - a3*cos(6πn/(M-1))
///
/// # Arguments
/// * `length` - Number of samples (M)
pub fn blackman_harris_weights(length: usize) -> Vec<f64> {
    const A0: f64 = 0.35875;
    const A1: f64 = 0.48829;
    const A2: f64 = 0.14128;
    const A3: f64 = 0.01168;

    if length < 2 {
        return vec![1.0; length];
    }

    let denom = (length - 1) as f64;
    (0..length)
        .map(|n| {
            let angle = 2.0 * PI * n as f64 / denom;
            A0 - A1 * angle.cos() + A2 * (2.0 * angle).cos() - A3 * (3.0 * angle).cos()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_symmetry() {
        let weights = blackman_harris_weights(1024);

        assert_eq!(weights.len(), 1024);

        for i in 0..512 {
            assert!(
                (weights[i] - weights[1023 - i]).abs() < 1e-12,
                "Window should be symmetric at index {}",
                i
            );
        }
    }

    #[test]
    fn test_window_center_and_edges() {
        let weights = blackman_harris_weights(1025); // odd length for exact center

        // Center value of the cosine sum is a0 + a1 + a2 + a3 = 1.0
        assert!((weights[512] - 1.0).abs() < 1e-12);

        // Endpoints are a0 - a1 + a2 - a3 = 6e-5, tiny but non-zero
        assert!(weights[0] > 0.0 && weights[0] < 1e-4);
        assert!(weights[1024] > 0.0 && weights[1024] < 1e-4);
    }

    #[test]
    fn test_normalized_window_sums_to_one() {
        for length in [63, 64, 4096] {
            let window = AnalysisWindow::blackman_harris(length);
            let sum: f64 = window.weights().iter().sum();

            assert!(
                (sum - 1.0).abs() < 1e-12,
                "Window of length {} should sum to 1, got {}",
                length,
                sum
            );
        }
    }

    #[test]
    fn test_half_lengths() {
        // Even length: both halves equal
        let even = AnalysisWindow::blackman_harris(512);
        assert_eq!(even.half_before(), 256);
        assert_eq!(even.half_after(), 256);

        // Odd length: the center sample belongs to the first half
        let odd = AnalysisWindow::blackman_harris(511);
        assert_eq!(odd.half_before(), 256);
        assert_eq!(odd.half_after(), 255);

        assert_eq!(odd.half_before() + odd.half_after(), odd.len());
        assert_eq!(even.half_before() + even.half_after(), even.len());
    }

    #[test]
    fn test_single_sample_window() {
        let window = AnalysisWindow::blackman_harris(1);
        assert_eq!(window.weights(), &[1.0]);
        assert_eq!(window.half_before(), 1);
        assert_eq!(window.half_after(), 0);
    }
}
