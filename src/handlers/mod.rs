//! External converter invocation.

pub mod inkscape;

pub use inkscape::{ConvertOutcome, InkscapeService};
