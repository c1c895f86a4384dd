//! Fluid solver - Main simulation driver.
//!
//! Runs the stable-fluids pipeline once per tick:
//! diffuse velocity, project, self-advect, project again, then diffuse and
//! advect density and the three dye channels through the final velocity.

use serde::{Deserialize, Serialize};

use super::{
    FieldKind, FluidError, FluidGrid, Relaxer, advect, diffuse, max_divergence, project,
};
use crate::schema::{ConfigError, FluidConfig, Rgb, validate_rate};

/// Density above which a cell counts as visible.
pub const VISIBLE_DENSITY: f32 = 0.01;

/// Solver-owned working buffers, one per role.
struct Scratch {
    velocity_x: Vec<f32>,
    velocity_y: Vec<f32>,
    pressure: Vec<f32>,
    divergence: Vec<f32>,
    density: Vec<f32>,
    red: Vec<f32>,
    green: Vec<f32>,
    blue: Vec<f32>,
}

impl Scratch {
    fn new(len: usize) -> Self {
        Self {
            velocity_x: vec![0.0; len],
            velocity_y: vec![0.0; len],
            pressure: vec![0.0; len],
            divergence: vec![0.0; len],
            density: vec![0.0; len],
            red: vec![0.0; len],
            green: vec![0.0; len],
            blue: vec![0.0; len],
        }
    }

    fn clear(&mut self) {
        for buffer in [
            &mut self.velocity_x,
            &mut self.velocity_y,
            &mut self.pressure,
            &mut self.divergence,
            &mut self.density,
            &mut self.red,
            &mut self.green,
            &mut self.blue,
        ] {
            buffer.fill(0.0);
        }
    }
}

/// Grid-based incompressible fluid solver.
///
/// Single-threaded from the caller's point of view: mutators are expected
/// between ticks and [`FluidSolver::step`] always runs to completion.
pub struct FluidSolver {
    config: FluidConfig,
    grid: FluidGrid,
    scratch: Scratch,
    relaxer: Relaxer,
    steps: u64,
}

impl FluidSolver {
    /// Create a solver from a validated configuration.
    pub fn new(config: FluidConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        config.warn_if_stiff();

        let len = config.cell_count();
        log::debug!(
            "Creating {}x{} fluid solver (dt={}, diffusion={}, viscosity={}, {:?} relaxation)",
            config.size,
            config.size,
            config.dt,
            config.diffusion,
            config.viscosity,
            config.relaxation
        );

        Ok(Self {
            grid: FluidGrid::new(config.size),
            scratch: Scratch::new(len),
            relaxer: Relaxer::new(config.relaxation, len),
            steps: 0,
            config,
        })
    }

    /// Create a solver from raw parameters with sequential relaxation.
    pub fn with_params(size: usize, dt: f32, diffusion: f32, viscosity: f32) -> Result<Self, ConfigError> {
        Self::new(FluidConfig::new(size, dt, diffusion, viscosity))
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) {
        let n = self.config.size;
        let dt = self.config.dt;
        let visc = self.config.viscosity;
        let diff = self.config.diffusion;

        let grid = &mut self.grid;
        let scratch = &mut self.scratch;
        let relaxer = &mut self.relaxer;
        let obstacles = &grid.obstacles;

        // Velocity: diffuse into the previous-velocity buffers
        diffuse(relaxer, FieldKind::VelocityX, &mut scratch.velocity_x, &grid.velocity_x, visc, dt, obstacles, n);
        diffuse(relaxer, FieldKind::VelocityY, &mut scratch.velocity_y, &grid.velocity_y, visc, dt, obstacles, n);

        project(
            relaxer,
            &mut scratch.velocity_x,
            &mut scratch.velocity_y,
            &mut scratch.pressure,
            &mut scratch.divergence,
            obstacles,
            n,
        );

        // Self-advection through the projected field
        advect(
            FieldKind::VelocityX,
            &mut grid.velocity_x,
            &scratch.velocity_x,
            &scratch.velocity_x,
            &scratch.velocity_y,
            dt,
            n,
        );
        advect(
            FieldKind::VelocityY,
            &mut grid.velocity_y,
            &scratch.velocity_y,
            &scratch.velocity_x,
            &scratch.velocity_y,
            dt,
            n,
        );

        project(
            relaxer,
            &mut grid.velocity_x,
            &mut grid.velocity_y,
            &mut scratch.pressure,
            &mut scratch.divergence,
            obstacles,
            n,
        );

        // Passive scalars through the final velocity
        let scalars = [
            (&mut grid.density, &mut scratch.density),
            (&mut grid.red, &mut scratch.red),
            (&mut grid.green, &mut scratch.green),
            (&mut grid.blue, &mut scratch.blue),
        ];
        for (field, previous) in scalars {
            diffuse(relaxer, FieldKind::Scalar, previous, field, diff, dt, obstacles, n);
            advect(FieldKind::Scalar, field, previous, &grid.velocity_x, &grid.velocity_y, dt, n);
        }

        self.steps += 1;
        log::trace!("Fluid step {} complete", self.steps);
    }

    /// Run the simulation for the given number of ticks.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Add dye at a cell. See [`FluidGrid::add_density`].
    pub fn add_density(&mut self, x: usize, y: usize, amount: f32, color: Rgb) -> Result<(), FluidError> {
        self.grid.add_density(x, y, amount, color)
    }

    /// Add a velocity impulse at a cell.
    pub fn add_velocity(&mut self, x: usize, y: usize, dx: f32, dy: f32) -> Result<(), FluidError> {
        self.grid.add_velocity(x, y, dx, dy)
    }

    /// Mark a cell solid and clear the fluid in it.
    pub fn add_obstacle(&mut self, x: usize, y: usize) -> Result<(), FluidError> {
        self.grid.add_obstacle(x, y)
    }

    /// Zero all fluid fields and working buffers. Obstacles are kept.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.scratch.clear();
        self.steps = 0;
        log::debug!("Cleared fluid fields");
    }

    pub fn viscosity(&self) -> f32 {
        self.config.viscosity
    }

    /// Change the viscosity used from the next tick on.
    pub fn set_viscosity(&mut self, viscosity: f32) -> Result<(), ConfigError> {
        validate_rate("viscosity", viscosity)?;
        self.config.viscosity = viscosity;
        self.config.warn_if_stiff();
        Ok(())
    }

    pub fn diffusion(&self) -> f32 {
        self.config.diffusion
    }

    /// Change the dye diffusion rate used from the next tick on.
    pub fn set_diffusion(&mut self, diffusion: f32) -> Result<(), ConfigError> {
        validate_rate("diffusion", diffusion)?;
        self.config.diffusion = diffusion;
        self.config.warn_if_stiff();
        Ok(())
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.config.dt
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.config.size
    }

    /// Flat index of an in-range cell.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        self.grid.index(x, y)
    }

    /// Number of completed ticks since construction or the last clear.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Read access to the fields.
    pub fn grid(&self) -> &FluidGrid {
        &self.grid
    }

    /// Mutable access for injecting input between ticks.
    pub fn grid_mut(&mut self) -> &mut FluidGrid {
        &mut self.grid
    }

    pub fn config(&self) -> &FluidConfig {
        &self.config
    }

    pub fn density(&self) -> &[f32] {
        self.grid.density()
    }

    pub fn red(&self) -> &[f32] {
        self.grid.red()
    }

    pub fn green(&self) -> &[f32] {
        self.grid.green()
    }

    pub fn blue(&self) -> &[f32] {
        self.grid.blue()
    }

    pub fn velocity_x(&self) -> &[f32] {
        self.grid.velocity_x()
    }

    pub fn velocity_y(&self) -> &[f32] {
        self.grid.velocity_y()
    }

    pub fn obstacles(&self) -> &[bool] {
        self.grid.obstacles()
    }
}

/// Field statistics for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluidStats {
    pub total_density: f32,
    pub max_density: f32,
    pub min_density: f32,
    pub max_speed: f32,
    pub max_divergence: f32,
    pub visible_cells: usize,
    pub obstacle_cells: usize,
}

impl FluidStats {
    /// Compute statistics from a grid.
    pub fn from_grid(grid: &FluidGrid) -> Self {
        let mut total_density = 0.0f32;
        let mut max_density = f32::NEG_INFINITY;
        let mut min_density = f32::INFINITY;
        let mut visible_cells = 0usize;

        for &d in grid.density() {
            total_density += d;
            max_density = max_density.max(d);
            min_density = min_density.min(d);
            if d > VISIBLE_DENSITY {
                visible_cells += 1;
            }
        }

        let max_speed = grid
            .velocity_x()
            .iter()
            .zip(grid.velocity_y())
            .map(|(&vx, &vy)| (vx * vx + vy * vy).sqrt())
            .fold(0.0f32, f32::max);

        Self {
            total_density,
            max_density,
            min_density,
            max_speed,
            max_divergence: max_divergence(grid.velocity_x(), grid.velocity_y(), grid.size()),
            visible_cells,
            obstacle_cells: grid.obstacles().iter().filter(|&&o| o).count(),
        }
    }

    pub fn from_solver(solver: &FluidSolver) -> Self {
        Self::from_grid(solver.grid())
    }
}
