//! Text presenter
//!
//! Comma-separated dB values, the format downstream EQ tooling parses

use crate::batch::AverageSpectrum;

/// Format the spectrum as one comma-separated line
///
/// With `rate_prefix`, a `rate=<sampleRate>` pair is prepended so consumers
/// can reconstruct the frequency axis.
pub fn format_spectrum(spectrum: &AverageSpectrum, rate_prefix: bool) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(spectrum.values.len() + 1);

    if rate_prefix {
        parts.push(format!("rate={}", spectrum.sample_rate));
    }
    parts.extend(spectrum.values.iter().map(|v| v.to_string()));

    parts.join(",")
}
