//! Audio file input: decoding and path resolution

pub mod paths;
pub mod reader;

pub use paths::resolve_paths;
pub use reader::{read_signal, ReadError, Signal};
