//! Interactive spectrum plot
//!
//! Minimal eframe window drawing the averaged spectrum with egui_plot,
//! dB magnitude against log-scaled frequency

use egui_plot::{Line, Plot, PlotPoints};

use crate::batch::AverageSpectrum;

/// Frequency in Hz of one spectrum bin
///
/// Bin k of a spectrum of length L spans rate/2 Hz, so k maps to
/// k / (L / (rate / 2)).
fn bin_hz(bin: usize, len: usize, sample_rate: u32) -> f64 {
    bin as f64 / (len as f64 / (sample_rate as f64 / 2.0))
}

/// Show the spectrum in an interactive window
///
/// Blocks until the window is closed.
pub fn show_spectrum(spectrum: AverageSpectrum) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "avgspec",
        options,
        Box::new(move |_cc| Ok(Box::new(SpectrumApp::new(spectrum)))),
    )
}

struct SpectrumApp {
    /// Plot points as (log10 Hz, dB); DC is skipped, log10(0) has no home
    points: Vec<[f64; 2]>,
}

impl SpectrumApp {
    fn new(spectrum: AverageSpectrum) -> Self {
        let len = spectrum.values.len();
        let points = spectrum
            .values
            .iter()
            .enumerate()
            .skip(1)
            .map(|(bin, &db)| [bin_hz(bin, len, spectrum.sample_rate).log10(), db])
            .collect();

        Self { points }
    }
}

impl eframe::App for SpectrumApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            Plot::new("average_spectrum")
                .x_axis_label("Frequency (Hz)")
                .y_axis_label("Magnitude (dB)")
                .x_axis_formatter(|mark, _range| format_hz(10f64.powf(mark.value)))
                .allow_zoom(true)
                .allow_drag(true)
                .show(ui, |plot_ui| {
                    let line =
                        Line::new("Average spectrum", PlotPoints::from(self.points.clone()))
                            .width(1.5);
                    plot_ui.line(line);
                });
        });
    }
}

fn format_hz(hz: f64) -> String {
    if hz >= 1000.0 {
        format!("{:.1} kHz", hz / 1000.0)
    } else {
        format!("{:.0} Hz", hz)
    }
}
