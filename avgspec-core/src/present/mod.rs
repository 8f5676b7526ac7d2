//! Result presentation: text emission or an interactive plot

pub mod plot;
pub mod text;

pub use plot::show_spectrum;
pub use text::format_spectrum;
