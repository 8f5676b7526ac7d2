//! Batch spectrum averaging
//!
//! Drives the full pipeline: resolve inputs, decode each file, analyze it,
//! average frames within a file and spectra across files, then normalize,
//! smooth and round the result

use std::path::{Path, PathBuf};

use ndarray::{Array1, Axis};
use thiserror::Error;

use crate::audio::paths::resolve_paths;
use crate::audio::reader::read_signal;
use crate::spectrum::analysis::{mean_frames, AnalysisError, AnalyzerConfig, StftAnalyzer};
use crate::spectrum::smooth::adaptive_smooth;

/// Output values are rounded to this many decimal places
const ROUND_DECIMALS: i32 = 2;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] AnalysisError),

    #[error("overlap must be between 1 and the FFT size, got {0}")]
    InvalidOverlap(usize),

    #[error("sample rate mismatch: {} is {rate} Hz, batch is {expected} Hz", .path.display())]
    MixedSampleRates {
        path: PathBuf,
        rate: u32,
        expected: u32,
    },

    #[error("no input file produced a usable signal")]
    NoUsableInput,
}

/// Batch configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// FFT size N; the analysis window has the same length
    pub fft_size: usize,

    /// Overlap factor; the hop size is fft_size / overlap
    pub overlap: usize,

    /// Smoothing strength, or `None` to skip the smoothing pass
    pub smoothing: Option<f64>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            fft_size: 4096,
            overlap: 8,
            smoothing: Some(128.0),
        }
    }
}

/// Final averaged spectrum, normalized so the peak sits at 0 dB
#[derive(Debug, Clone, PartialEq)]
pub struct AverageSpectrum {
    /// dB values for bins 0..=N/2, rounded to two decimals
    pub values: Vec<f64>,

    /// Sample rate shared by every file in the batch, in Hz
    pub sample_rate: u32,
}

/// Batch orchestrator
pub struct BatchAverager {
    config: BatchConfig,
}

impl BatchAverager {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Average the spectra of every readable input into one spectrum
    ///
    /// Configuration is validated before any file is touched. Per-file read
    /// failures are logged and skipped; a sample-rate mismatch between files
    /// and a batch with zero usable files are fatal.
    ///
    /// # Arguments
    /// * `inputs` - Files or directories of files
    pub fn run(&self, inputs: &[PathBuf]) -> Result<AverageSpectrum, BatchError> {
        if self.config.overlap == 0 || self.config.overlap > self.config.fft_size {
            return Err(BatchError::InvalidOverlap(self.config.overlap));
        }

        let mut analyzer = StftAnalyzer::new(AnalyzerConfig {
            fft_size: self.config.fft_size,
            window_len: self.config.fft_size,
            hop: self.config.fft_size / self.config.overlap,
        })?;

        let files = resolve_paths(inputs);

        let mut per_file: Vec<Array1<f64>> = Vec::new();
        let mut batch_rate: Option<u32> = None;

        for path in &files {
            let signal = match read_signal(path) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            match batch_rate {
                None => batch_rate = Some(signal.sample_rate),
                Some(expected) if signal.sample_rate != expected => {
                    return Err(BatchError::MixedSampleRates {
                        path: path.clone(),
                        rate: signal.sample_rate,
                        expected,
                    });
                }
                Some(_) => {}
            }

            let batch = analyzer.analyze(&signal.samples);
            match mean_frames(&batch) {
                Some(mean) => {
                    tracing::debug!(
                        "{}: {} samples, {} frames",
                        path.display(),
                        signal.len(),
                        batch.nrows()
                    );
                    per_file.push(mean);
                }
                None => {
                    tracing::warn!(
                        "skipping {}: shorter than one analysis frame",
                        path.display()
                    );
                }
            }
        }

        let sample_rate = match batch_rate {
            Some(rate) if !per_file.is_empty() => rate,
            _ => return Err(BatchError::NoUsableInput),
        };

        tracing::info!("averaging {} of {} input files", per_file.len(), files.len());

        let views: Vec<_> = per_file.iter().map(|spectrum| spectrum.view()).collect();
        let stacked = ndarray::stack(Axis(0), &views)
            .expect("per-file spectra share one analyzer and one bin count");
        let mean = stacked
            .mean_axis(Axis(0))
            .expect("stack of at least one spectrum");

        let mut values = mean.to_vec();
        normalize(&mut values);
        if let Some(strength) = self.config.smoothing {
            values = adaptive_smooth(&values, strength);
        }
        for v in values.iter_mut() {
            *v = round_to_decimals(*v, ROUND_DECIMALS);
        }

        Ok(AverageSpectrum {
            values,
            sample_rate,
        })
    }

    /// Average a single file, mostly useful for comparisons in tests
    pub fn run_one(&self, input: &Path) -> Result<AverageSpectrum, BatchError> {
        self.run(&[input.to_path_buf()])
    }
}

/// Shift every value so the maximum sits at exactly 0 dB
fn normalize(values: &mut [f64]) {
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max.is_finite() {
        for v in values.iter_mut() {
            *v -= max;
        }
    }
}

fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use std::io::Write;
    use std::path::Path;

    fn write_wav(path: &Path, rate: u32, samples: &[f64]) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s as f32).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn sine(freq: f64, rate: u32, seconds: f64, amplitude: f64) -> Vec<f64> {
        let count = (rate as f64 * seconds) as usize;
        (0..count)
            .map(|n| amplitude * (2.0 * PI * freq * n as f64 / rate as f64).sin())
            .collect()
    }

    /// Deterministic broadband test signal (linear congruential generator)
    fn noise(count: usize, amplitude: f64) -> Vec<f64> {
        let mut state: u64 = 0x2545F491;
        (0..count)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let uniform = (state >> 11) as f64 / (1u64 << 53) as f64;
                amplitude * (2.0 * uniform - 1.0)
            })
            .collect()
    }

    fn raw_config() -> BatchConfig {
        BatchConfig {
            fft_size: 4096,
            overlap: 8,
            smoothing: None,
        }
    }

    #[test]
    fn test_sine_peak_lands_on_expected_bin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let rate = 44100;
        let freq = 1000.0;
        write_wav(&path, rate, &sine(freq, rate, 1.0, 0.5));

        let spectrum = BatchAverager::new(raw_config()).run_one(&path).unwrap();
        assert_eq!(spectrum.values.len(), 4096 / 2 + 1);
        assert_eq!(spectrum.sample_rate, rate);

        let (peak_bin, &peak) = spectrum
            .values
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();

        // k ~= f / (rate/2) * (N/2)
        let expected = (freq / (rate as f64 / 2.0) * 2048.0).round() as i64;
        assert!(
            (peak_bin as i64 - expected).abs() <= 1,
            "peak bin {} should be within one bin of {}",
            peak_bin,
            expected
        );
        assert_eq!(peak, 0.0, "normalized peak must sit at exactly 0 dB");
    }

    #[test]
    fn test_amplitude_scaling_cancels_out() {
        let dir = tempfile::tempdir().unwrap();
        let loud = dir.path().join("loud.wav");
        let quiet = dir.path().join("quiet.wav");

        let content = noise(44100, 1.0);
        write_wav(&loud, 44100, &content.iter().map(|s| s * 0.8).collect::<Vec<_>>());
        write_wav(&quiet, 44100, &content.iter().map(|s| s * 0.08).collect::<Vec<_>>());

        let averager = BatchAverager::new(raw_config());
        let a = averager.run_one(&loud).unwrap();
        let b = averager.run_one(&quiet).unwrap();

        assert_eq!(a.values.len(), b.values.len());
        for (bin, (&x, &y)) in a.values.iter().zip(&b.values).enumerate() {
            assert!(
                (x - y).abs() < 0.5,
                "normalized spectra should agree at bin {}: {} vs {}",
                bin,
                x,
                y
            );
        }
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.wav");
        let bad = dir.path().join("bad.wav");
        write_wav(&good, 44100, &noise(22050, 0.5));
        std::fs::File::create(&bad)
            .unwrap()
            .write_all(b"definitely not audio")
            .unwrap();

        let averager = BatchAverager::new(raw_config());
        let with_bad = averager
            .run(&[bad.clone(), good.clone()])
            .expect("one good file should carry the batch");
        let without_bad = averager.run_one(&good).unwrap();

        assert_eq!(with_bad, without_bad);
    }

    #[test]
    fn test_mixed_sample_rates_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.wav");
        let b = dir.path().join("b.wav");
        write_wav(&a, 44100, &noise(11025, 0.5));
        write_wav(&b, 48000, &noise(12000, 0.5));

        let result = BatchAverager::new(raw_config()).run(&[a, b]);
        assert!(matches!(result, Err(BatchError::MixedSampleRates { .. })));
    }

    #[test]
    fn test_silence_normalizes_to_uniform_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("silence.wav");
        write_wav(&path, 44100, &vec![0.0; 44100]);

        // Smoothing on: a constant spectrum must survive it unchanged
        let spectrum = BatchAverager::new(BatchConfig::default())
            .run_one(&path)
            .unwrap();

        assert!(
            spectrum.values.iter().all(|&v| v == 0.0),
            "every clamped bin shares the dB floor, so the normalized spectrum is uniformly 0"
        );
    }

    #[test]
    fn test_empty_batch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = BatchAverager::new(raw_config()).run(&[dir.path().to_path_buf()]);
        assert!(matches!(result, Err(BatchError::NoUsableInput)));
    }

    #[test]
    fn test_invalid_overlap_rejected_before_io() {
        let config = BatchConfig {
            overlap: 0,
            ..raw_config()
        };
        // The input does not exist; a config error must win over any I/O path
        let result = BatchAverager::new(config).run(&[PathBuf::from("/nonexistent.wav")]);
        assert!(matches!(result, Err(BatchError::InvalidOverlap(0))));
    }

    #[test]
    fn test_directory_batch_averages_all_files() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(&dir.path().join("one.wav"), 44100, &sine(500.0, 44100, 0.5, 0.5));
        write_wav(&dir.path().join("two.wav"), 44100, &sine(500.0, 44100, 0.5, 0.5));

        let from_dir = BatchAverager::new(raw_config())
            .run(&[dir.path().to_path_buf()])
            .unwrap();
        let from_one = BatchAverager::new(raw_config())
            .run_one(&dir.path().join("one.wav"))
            .unwrap();

        // Identical files average to the same spectrum as one of them
        assert_eq!(from_dir, from_one);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut once = vec![-30.0, -3.5, -0.25, -41.0];
        normalize(&mut once);
        let mut twice = once.clone();
        normalize(&mut twice);

        assert_eq!(once, twice);
        assert_eq!(once.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 0.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to_decimals(-3.14159, 2), -3.14);
        assert_eq!(round_to_decimals(0.005, 2), 0.01);
        assert_eq!(round_to_decimals(-72.0, 2), -72.0);
    }
}
