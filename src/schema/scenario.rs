//! Scenario types for driving the solver with scripted input.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::Rgb;
use crate::compute::{FluidError, FluidGrid, FluidSolver};

/// Scripted input: injections applied once up front and before every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Applied once before the first step.
    #[serde(default)]
    pub setup: Vec<Injection>,
    /// Applied before every step.
    #[serde(default)]
    pub per_step: Vec<Injection>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            setup: vec![Injection::ObstacleDisc {
                center: (0.6, 0.5),
                radius: 0.08,
            }],
            per_step: vec![Injection::Brush {
                center: (0.2, 0.5),
                radius: 0.04,
                amount: 5.0,
                color: Rgb::WHITE,
                velocity: (1.0, 0.0),
            }],
        }
    }
}

impl Scenario {
    /// Apply the setup injections.
    ///
    /// Either every injection is applied or, when one addresses a cell off
    /// the grid, none is.
    pub fn apply_setup(&self, solver: &mut FluidSolver) -> Result<(), FluidError> {
        apply_all(&self.setup, solver.grid_mut(), 0)
    }

    /// Apply the per-step injections for tick `step`, all or nothing.
    pub fn apply_step(&self, solver: &mut FluidSolver, step: u64) -> Result<(), FluidError> {
        apply_all(&self.per_step, solver.grid_mut(), step)
    }
}

fn apply_all(injections: &[Injection], grid: &mut FluidGrid, salt: u64) -> Result<(), FluidError> {
    for injection in injections {
        injection.check(grid)?;
    }
    for injection in injections {
        injection.apply(grid, salt)?;
    }
    Ok(())
}

/// A single kind of input applied to the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Injection {
    /// Dye and impulse at one cell.
    Splat {
        x: usize,
        y: usize,
        amount: f32,
        #[serde(default)]
        color: Rgb,
        #[serde(default)]
        velocity: (f32, f32),
    },
    /// Dye and impulse over a disc of cells.
    Brush {
        /// Centre as fraction of grid size (0.0-1.0).
        center: (f32, f32),
        /// Radius as fraction of grid size.
        radius: f32,
        amount: f32,
        #[serde(default)]
        color: Rgb,
        #[serde(default)]
        velocity: (f32, f32),
    },
    /// Randomly placed interior splats with random impulses.
    RandomSplats {
        count: usize,
        amount: f32,
        /// Impulse components are drawn from `[-max_speed / 2, max_speed / 2)`.
        max_speed: f32,
        /// Fixed colour, or a rainbow across the splats when absent.
        #[serde(default)]
        color: Option<Rgb>,
        seed: u64,
    },
    /// Solid rectangle, inclusive cell corners.
    ObstacleRect { min: (usize, usize), max: (usize, usize) },
    /// Solid disc.
    ObstacleDisc {
        /// Centre as fraction of grid size.
        center: (f32, f32),
        /// Radius as fraction of grid size.
        radius: f32,
    },
}

impl Injection {
    /// Check that every explicit cell coordinate lies on `grid`.
    ///
    /// Fractional and random placements always land on the grid.
    pub fn check(&self, grid: &FluidGrid) -> Result<(), FluidError> {
        match self {
            Injection::Splat { x, y, .. } => {
                grid.try_index(*x, *y)?;
            }
            Injection::ObstacleRect { min, max } => {
                grid.try_index(min.0, min.1)?;
                grid.try_index(max.0, max.1)?;
            }
            Injection::Brush { .. } | Injection::RandomSplats { .. } | Injection::ObstacleDisc { .. } => {}
        }
        Ok(())
    }

    /// Apply this injection. `salt` varies random injections between ticks.
    pub fn apply(&self, grid: &mut FluidGrid, salt: u64) -> Result<(), FluidError> {
        self.check(grid)?;
        match self {
            Injection::Splat {
                x,
                y,
                amount,
                color,
                velocity,
            } => {
                grid.add_density(*x, *y, *amount, *color)?;
                grid.add_velocity(*x, *y, velocity.0, velocity.1)?;
            }
            Injection::Brush {
                center,
                radius,
                amount,
                color,
                velocity,
            } => {
                for (x, y) in disc_cells(grid.size(), *center, *radius) {
                    grid.add_density(x, y, *amount, *color)?;
                    grid.add_velocity(x, y, velocity.0, velocity.1)?;
                }
            }
            Injection::RandomSplats {
                count,
                amount,
                max_speed,
                color,
                seed,
            } => {
                let size = grid.size();
                if size < 3 {
                    return Ok(());
                }
                let mut rng = StdRng::seed_from_u64(seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15));
                for k in 0..*count {
                    let x = rng.gen_range(1..size - 1);
                    let y = rng.gen_range(1..size - 1);
                    let dx = rng.gen_range(-0.5f32..0.5) * max_speed;
                    let dy = rng.gen_range(-0.5f32..0.5) * max_speed;
                    let tint = color.unwrap_or_else(|| Rgb::rainbow(k as f32 * 0.7));
                    grid.add_density(x, y, *amount, tint)?;
                    grid.add_velocity(x, y, dx, dy)?;
                }
            }
            Injection::ObstacleRect { min, max } => {
                for y in min.1..=max.1 {
                    for x in min.0..=max.0 {
                        grid.add_obstacle(x, y)?;
                    }
                }
            }
            Injection::ObstacleDisc { center, radius } => {
                for (x, y) in disc_cells(grid.size(), *center, *radius) {
                    grid.add_obstacle(x, y)?;
                }
            }
        }
        Ok(())
    }
}

/// In-range cells whose centres lie within a fractional disc.
///
/// Always yields at least the cell nearest the centre when that cell is on
/// the grid.
fn disc_cells(size: usize, center: (f32, f32), radius: f32) -> Vec<(usize, usize)> {
    if size == 0 {
        return Vec::new();
    }
    let scale = size as f32;
    let cx = center.0 * scale;
    let cy = center.1 * scale;
    let r = radius * scale;
    let r_sq = r * r;

    let lo = |c: f32| (c - r).floor().max(0.0) as usize;
    let hi = |c: f32| ((c + r).ceil().max(0.0) as usize).min(size - 1);

    let mut cells = Vec::new();
    for y in lo(cy)..=hi(cy) {
        for x in lo(cx)..=hi(cx) {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r_sq {
                cells.push((x, y));
            }
        }
    }

    if cells.is_empty() {
        let nx = cx.round();
        let ny = cy.round();
        if nx >= 0.0 && ny >= 0.0 && (nx as usize) < size && (ny as usize) < size {
            cells.push((nx as usize, ny as usize));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splat_out_of_range_errors() {
        let mut grid = FluidGrid::new(8);
        let splat = Injection::Splat {
            x: 8,
            y: 2,
            amount: 1.0,
            color: Rgb::WHITE,
            velocity: (0.0, 0.0),
        };
        assert!(splat.apply(&mut grid, 0).is_err());
    }

    #[test]
    fn test_brush_covers_disc() {
        let mut grid = FluidGrid::new(20);
        let brush = Injection::Brush {
            center: (0.5, 0.5),
            radius: 0.1,
            amount: 1.0,
            color: Rgb::WHITE,
            velocity: (0.5, 0.0),
        };
        brush.apply(&mut grid, 0).unwrap();

        // Radius of 2 cells around (10, 10)
        assert_eq!(grid.density()[grid.index(10, 10)], 1.0);
        assert_eq!(grid.density()[grid.index(12, 10)], 1.0);
        assert_eq!(grid.density()[grid.index(13, 10)], 0.0);
        assert_eq!(grid.velocity_at(10, 8), (0.5, 0.0));
    }

    #[test]
    fn test_tiny_brush_hits_nearest_cell() {
        let mut grid = FluidGrid::new(10);
        let brush = Injection::Brush {
            center: (0.33, 0.52),
            radius: 0.0,
            amount: 2.0,
            color: Rgb::WHITE,
            velocity: (0.0, 0.0),
        };
        brush.apply(&mut grid, 0).unwrap();
        assert_eq!(grid.density().iter().sum::<f32>(), 2.0);
        assert_eq!(grid.density()[grid.index(3, 5)], 2.0);
    }

    #[test]
    fn test_obstacle_rect() {
        let mut grid = FluidGrid::new(10);
        Injection::ObstacleRect { min: (2, 3), max: (4, 5) }
            .apply(&mut grid, 0)
            .unwrap();

        let count = grid.obstacles().iter().filter(|&&o| o).count();
        assert_eq!(count, 9);
        assert!(grid.is_obstacle(2, 3));
        assert!(grid.is_obstacle(4, 5));
        assert!(!grid.is_obstacle(5, 5));

        let out_of_range = Injection::ObstacleRect { min: (2, 3), max: (10, 5) };
        assert!(out_of_range.apply(&mut grid, 0).is_err());
    }

    #[test]
    fn test_random_splats_deterministic() {
        let splats = Injection::RandomSplats {
            count: 12,
            amount: 3.0,
            max_speed: 10.0,
            color: None,
            seed: 42,
        };

        let mut a = FluidGrid::new(16);
        let mut b = FluidGrid::new(16);
        splats.apply(&mut a, 7).unwrap();
        splats.apply(&mut b, 7).unwrap();
        assert_eq!(a.density(), b.density());
        assert_eq!(a.velocity_x(), b.velocity_x());

        let total: f32 = a.density().iter().sum();
        assert!((total - 36.0).abs() < 1e-4);

        for (&vx, &vy) in a.velocity_x().iter().zip(a.velocity_y()) {
            assert!(vx.abs() <= 5.0 * 12.0);
            assert!(vy.abs() <= 5.0 * 12.0);
        }

        // Boundary ring is never painted
        for i in 0..16 {
            assert_eq!(a.density()[a.index(i, 0)], 0.0);
            assert_eq!(a.density()[a.index(0, i)], 0.0);
        }
    }

    #[test]
    fn test_random_splats_vary_with_salt() {
        let splats = Injection::RandomSplats {
            count: 8,
            amount: 1.0,
            max_speed: 4.0,
            color: Some(Rgb::WHITE),
            seed: 1,
        };
        let mut a = FluidGrid::new(32);
        let mut b = FluidGrid::new(32);
        splats.apply(&mut a, 1).unwrap();
        splats.apply(&mut b, 2).unwrap();
        assert_ne!(a.density(), b.density());
    }

    #[test]
    fn test_injections_on_grids_without_interior() {
        let splats = Injection::RandomSplats {
            count: 4,
            amount: 1.0,
            max_speed: 1.0,
            color: None,
            seed: 3,
        };
        let brush = Injection::Brush {
            center: (0.5, 0.5),
            radius: 0.5,
            amount: 1.0,
            color: Rgb::WHITE,
            velocity: (0.0, 0.0),
        };

        for size in [0, 1, 2] {
            let mut grid = FluidGrid::new(size);
            splats.apply(&mut grid, 0).unwrap();
            brush.apply(&mut grid, 0).unwrap();
        }

        let mut grid = FluidGrid::new(2);
        splats.apply(&mut grid, 0).unwrap();
        assert!(grid.density().iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_failed_setup_leaves_grid_untouched() {
        let scenario = Scenario {
            setup: vec![
                Injection::Splat {
                    x: 4,
                    y: 4,
                    amount: 1.0,
                    color: Rgb::WHITE,
                    velocity: (1.0, 0.0),
                },
                Injection::ObstacleRect { min: (2, 2), max: (3, 3) },
                Injection::Splat {
                    x: 64,
                    y: 4,
                    amount: 1.0,
                    color: Rgb::WHITE,
                    velocity: (0.0, 0.0),
                },
            ],
            per_step: Vec::new(),
        };
        let mut solver = FluidSolver::with_params(16, 0.1, 0.0, 0.0).unwrap();

        assert!(matches!(
            scenario.apply_setup(&mut solver),
            Err(FluidError::OutOfBounds { x: 64, y: 4, size: 16 })
        ));
        assert!(solver.density().iter().all(|&d| d == 0.0));
        assert!(solver.velocity_x().iter().all(|&v| v == 0.0));
        assert!(solver.obstacles().iter().all(|&o| !o));
    }

    #[test]
    fn test_failed_step_input_leaves_grid_untouched() {
        let scenario = Scenario {
            setup: Vec::new(),
            per_step: vec![
                Injection::Brush {
                    center: (0.5, 0.5),
                    radius: 0.1,
                    amount: 2.0,
                    color: Rgb::WHITE,
                    velocity: (0.0, 0.0),
                },
                Injection::ObstacleRect { min: (1, 1), max: (1, 16) },
            ],
        };
        let mut solver = FluidSolver::with_params(16, 0.1, 0.0, 0.0).unwrap();

        assert!(scenario.apply_step(&mut solver, 0).is_err());
        assert!(solver.density().iter().all(|&d| d == 0.0));
        assert!(solver.obstacles().iter().all(|&o| !o));
    }

    #[test]
    fn test_scenario_from_json() {
        let json = r#"{
            "setup": [{"type": "ObstacleRect", "min": [1, 1], "max": [2, 2]}],
            "per_step": [{"type": "Splat", "x": 5, "y": 5, "amount": 10.0}]
        }"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.setup.len(), 1);

        match &scenario.per_step[0] {
            Injection::Splat { color, velocity, .. } => {
                assert_eq!(*color, Rgb::WHITE);
                assert_eq!(*velocity, (0.0, 0.0));
            }
            other => panic!("unexpected injection {:?}", other),
        }
    }

    #[test]
    fn test_default_scenario_applies() {
        let mut solver = FluidSolver::new(Default::default()).unwrap();
        let scenario = Scenario::default();
        scenario.apply_setup(&mut solver).unwrap();
        scenario.apply_step(&mut solver, 0).unwrap();

        assert!(solver.obstacles().iter().any(|&o| o));
        assert!(solver.density().iter().sum::<f32>() > 0.0);
    }
}
