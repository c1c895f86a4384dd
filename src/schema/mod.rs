//! Schema module - Configuration, colour and scenario types for the fluid solver.

mod color;
mod config;
mod scenario;

pub use color::*;
pub use config::*;
pub use scenario::*;
