//! Compute module - Numerical routines of the stable-fluids solver.

mod advection;
mod boundary;
mod grid;
mod projection;
mod relaxation;
mod solver;

pub use advection::*;
pub use boundary::*;
pub use grid::*;
pub use projection::*;
pub use relaxation::*;
pub use solver::*;
