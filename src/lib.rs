//! Stable Fluids - Real-time grid-based incompressible fluid solver.
//!
//! This crate implements the classic stable-fluids scheme on a square grid:
//! implicit diffusion by fixed-iteration relaxation, pressure projection and
//! semi-Lagrangian advection. It drives interactive smoke and dye visuals,
//! so it trades exactness for a bounded per-tick cost (four relaxation
//! sweeps per solve, whatever the residual).
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, dye colours and scripted input scenarios
//! - `compute`: Grid state, boundary enforcement, relaxation, projection,
//!   advection and the per-tick pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use stable_fluids::{
//!     compute::{FluidSolver, FluidStats},
//!     schema::{FluidConfig, Rgb},
//! };
//!
//! let mut solver = FluidSolver::new(FluidConfig::default()).unwrap();
//!
//! // Paint some dye with a push to the right
//! solver.add_density(20, 32, 50.0, Rgb::new(1.0, 0.4, 0.1)).unwrap();
//! solver.add_velocity(20, 32, 5.0, 0.0).unwrap();
//! solver.add_obstacle(40, 32).unwrap();
//!
//! solver.run(100);
//!
//! let stats = FluidStats::from_solver(&solver);
//! println!("Total density after 100 steps: {}", stats.total_density);
//! ```

pub mod compute;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{FieldKind, FluidError, FluidGrid, FluidSolver, FluidStats};
pub use schema::{ConfigError, FluidConfig, Injection, RelaxationOrder, Rgb, Scenario};
