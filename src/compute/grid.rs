//! Grid state: the per-cell fields the solver owns.
//!
//! All fields are dense `size * size` arrays indexed by `x + y * size`.
//! Cells on the outer ring are boundary cells; PDE updates only touch the
//! interior `1..size - 1` in both axes.

use crate::schema::Rgb;

/// Errors raised by the grid's bounds contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FluidError {
    #[error("Cell ({x}, {y}) is outside the {size}x{size} grid")]
    OutOfBounds { x: usize, y: usize, size: usize },
}

/// Externally visible fluid fields plus the obstacle mask.
///
/// Arrays are allocated once and never resized.
#[derive(Debug, Clone)]
pub struct FluidGrid {
    pub(crate) size: usize,
    pub(crate) density: Vec<f32>,
    pub(crate) red: Vec<f32>,
    pub(crate) green: Vec<f32>,
    pub(crate) blue: Vec<f32>,
    pub(crate) velocity_x: Vec<f32>,
    pub(crate) velocity_y: Vec<f32>,
    pub(crate) obstacles: Vec<bool>,
}

impl FluidGrid {
    /// Allocate a zeroed grid of `size * size` cells.
    pub fn new(size: usize) -> Self {
        let len = size * size;
        Self {
            size,
            density: vec![0.0; len],
            red: vec![0.0; len],
            green: vec![0.0; len],
            blue: vec![0.0; len],
            velocity_x: vec![0.0; len],
            velocity_y: vec![0.0; len],
            obstacles: vec![false; len],
        }
    }

    /// Grid side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total cell count.
    #[inline]
    pub fn len(&self) -> usize {
        self.size * self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Flat index of an in-range cell.
    ///
    /// Out-of-range coordinates are a contract violation; use
    /// [`FluidGrid::try_index`] for untrusted input.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(
            x < self.size && y < self.size,
            "cell ({}, {}) outside {}x{} grid",
            x,
            y,
            self.size,
            self.size
        );
        x + y * self.size
    }

    /// Flat index, or `OutOfBounds` if either coordinate is outside the grid.
    #[inline]
    pub fn try_index(&self, x: usize, y: usize) -> Result<usize, FluidError> {
        if x < self.size && y < self.size {
            Ok(x + y * self.size)
        } else {
            Err(FluidError::OutOfBounds {
                x,
                y,
                size: self.size,
            })
        }
    }

    /// Whether `(x, y)` lies on the boundary ring.
    #[inline]
    pub fn is_boundary(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.size || y + 1 == self.size
    }

    /// Add dye: `amount` to density and `amount * color` to the colour fields.
    ///
    /// No obstacle check is made; dye added to a masked cell stays there until
    /// the next relaxation pass clears it.
    pub fn add_density(&mut self, x: usize, y: usize, amount: f32, color: Rgb) -> Result<(), FluidError> {
        let idx = self.try_index(x, y)?;
        let tint = color.scaled(amount);
        self.density[idx] += amount;
        self.red[idx] += tint.r;
        self.green[idx] += tint.g;
        self.blue[idx] += tint.b;
        Ok(())
    }

    /// Add an impulse to the velocity at one cell.
    pub fn add_velocity(&mut self, x: usize, y: usize, dx: f32, dy: f32) -> Result<(), FluidError> {
        let idx = self.try_index(x, y)?;
        self.velocity_x[idx] += dx;
        self.velocity_y[idx] += dy;
        Ok(())
    }

    /// Mark a cell as solid and clear the fluid currently in it.
    ///
    /// The clearing happens once, here. Afterwards only the relaxation sweeps
    /// keep the cell at zero.
    pub fn add_obstacle(&mut self, x: usize, y: usize) -> Result<(), FluidError> {
        let idx = self.try_index(x, y)?;
        self.obstacles[idx] = true;
        self.density[idx] = 0.0;
        self.red[idx] = 0.0;
        self.green[idx] = 0.0;
        self.blue[idx] = 0.0;
        self.velocity_x[idx] = 0.0;
        self.velocity_y[idx] = 0.0;
        Ok(())
    }

    /// Zero every fluid field. The obstacle mask is kept.
    pub fn clear(&mut self) {
        for field in [
            &mut self.density,
            &mut self.red,
            &mut self.green,
            &mut self.blue,
            &mut self.velocity_x,
            &mut self.velocity_y,
        ] {
            field.fill(0.0);
        }
    }

    pub fn density(&self) -> &[f32] {
        &self.density
    }

    pub fn red(&self) -> &[f32] {
        &self.red
    }

    pub fn green(&self) -> &[f32] {
        &self.green
    }

    pub fn blue(&self) -> &[f32] {
        &self.blue
    }

    pub fn velocity_x(&self) -> &[f32] {
        &self.velocity_x
    }

    pub fn velocity_y(&self) -> &[f32] {
        &self.velocity_y
    }

    pub fn obstacles(&self) -> &[bool] {
        &self.obstacles
    }

    /// Whether the obstacle mask is set at an in-range cell.
    #[inline]
    pub fn is_obstacle(&self, x: usize, y: usize) -> bool {
        self.obstacles[self.index(x, y)]
    }

    /// Raw (unclamped) dye colour at an in-range cell.
    #[inline]
    pub fn color_at(&self, x: usize, y: usize) -> Rgb {
        let idx = self.index(x, y);
        Rgb::new(self.red[idx], self.green[idx], self.blue[idx])
    }

    /// Velocity vector at an in-range cell.
    #[inline]
    pub fn velocity_at(&self, x: usize, y: usize) -> (f32, f32) {
        let idx = self.index(x, y);
        (self.velocity_x[idx], self.velocity_y[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_row_major() {
        let grid = FluidGrid::new(8);
        assert_eq!(grid.index(0, 0), 0);
        assert_eq!(grid.index(3, 0), 3);
        assert_eq!(grid.index(0, 1), 8);
        assert_eq!(grid.index(7, 7), 63);
    }

    #[test]
    fn test_try_index_rejects_out_of_range() {
        let grid = FluidGrid::new(8);
        assert_eq!(grid.try_index(7, 7), Ok(63));
        assert_eq!(
            grid.try_index(8, 0),
            Err(FluidError::OutOfBounds { x: 8, y: 0, size: 8 })
        );
        assert!(grid.try_index(0, 8).is_err());
    }

    #[test]
    fn test_add_density_scales_color() {
        let mut grid = FluidGrid::new(8);
        grid.add_density(3, 4, 10.0, Rgb::new(1.0, 0.5, 0.0)).unwrap();
        grid.add_density(3, 4, 2.0, Rgb::WHITE).unwrap();

        let idx = grid.index(3, 4);
        assert_eq!(grid.density()[idx], 12.0);
        assert_eq!(grid.color_at(3, 4), Rgb::new(12.0, 7.0, 2.0));
    }

    #[test]
    fn test_out_of_range_mutators_leave_fields_untouched() {
        let mut grid = FluidGrid::new(8);
        assert!(grid.add_density(8, 1, 5.0, Rgb::WHITE).is_err());
        assert!(grid.add_velocity(1, 9, 1.0, 1.0).is_err());
        assert!(grid.add_obstacle(100, 100).is_err());

        assert!(grid.density().iter().all(|&v| v == 0.0));
        assert!(grid.velocity_x().iter().all(|&v| v == 0.0));
        assert!(grid.obstacles().iter().all(|&o| !o));
    }

    #[test]
    fn test_add_obstacle_clears_cell() {
        let mut grid = FluidGrid::new(8);
        grid.add_density(2, 2, 50.0, Rgb::WHITE).unwrap();
        grid.add_velocity(2, 2, 3.0, -4.0).unwrap();
        grid.add_obstacle(2, 2).unwrap();

        let idx = grid.index(2, 2);
        assert!(grid.is_obstacle(2, 2));
        assert_eq!(grid.density()[idx], 0.0);
        assert_eq!(grid.velocity_at(2, 2), (0.0, 0.0));
        assert_eq!(grid.color_at(2, 2), Rgb::BLACK);
    }

    #[test]
    fn test_clear_keeps_obstacles() {
        let mut grid = FluidGrid::new(8);
        grid.add_obstacle(4, 4).unwrap();
        grid.add_density(1, 1, 1.0, Rgb::WHITE).unwrap();
        grid.add_velocity(1, 1, 1.0, 1.0).unwrap();
        grid.clear();

        assert!(grid.is_obstacle(4, 4));
        assert_eq!(grid.density()[grid.index(1, 1)], 0.0);
        assert_eq!(grid.velocity_at(1, 1), (0.0, 0.0));
    }

    #[test]
    fn test_is_boundary() {
        let grid = FluidGrid::new(5);
        assert!(grid.is_boundary(0, 2));
        assert!(grid.is_boundary(4, 2));
        assert!(grid.is_boundary(2, 0));
        assert!(grid.is_boundary(2, 4));
        assert!(!grid.is_boundary(1, 1));
        assert!(!grid.is_boundary(3, 3));
    }
}
