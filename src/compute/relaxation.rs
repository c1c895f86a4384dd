//! Implicit diffusion via fixed-iteration relaxation.
//!
//! Solves `(I - a L) x = x0` for the 4-neighbour Laplacian `L`. The same
//! routine doubles as the pressure Poisson solver with `a = 1, c = 6`.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use super::{FieldKind, enforce_boundary};
use crate::schema::RelaxationOrder;

/// Sweeps per solve. Fixed: there is no residual check or early exit.
pub const RELAXATION_ITERATIONS: usize = 4;

/// Relaxation solver with the buffer red-black sweeps read from.
pub struct Relaxer {
    order: RelaxationOrder,
    /// Copy of the field taken before each colour half-sweep.
    snapshot: Vec<f32>,
}

impl Relaxer {
    pub fn new(order: RelaxationOrder, cell_count: usize) -> Self {
        let snapshot = match order {
            RelaxationOrder::Sequential => Vec::new(),
            RelaxationOrder::RedBlack => vec![0.0; cell_count],
        };
        Self { order, snapshot }
    }

    pub fn order(&self) -> RelaxationOrder {
        self.order
    }

    /// Relax `x` towards the solution of `c x - a sum(neighbours) = x0`.
    ///
    /// Obstacle cells are forced to zero. Boundary enforcement runs on `x`
    /// after every sweep.
    #[allow(clippy::too_many_arguments)]
    pub fn solve(
        &mut self,
        kind: FieldKind,
        x: &mut [f32],
        x0: &[f32],
        a: f32,
        c: f32,
        obstacles: &[bool],
        size: usize,
    ) {
        for _ in 0..RELAXATION_ITERATIONS {
            match self.order {
                RelaxationOrder::Sequential => sweep_sequential(x, x0, a, c, obstacles, size),
                RelaxationOrder::RedBlack => {
                    self.snapshot.resize(x.len(), 0.0);
                    for parity in 0..2 {
                        self.snapshot.copy_from_slice(x);
                        sweep_colour(x, &self.snapshot, x0, a, c, obstacles, size, parity);
                    }
                }
            }
            enforce_boundary(kind, x, size);
        }
    }
}

/// Diffuse `x0` into `x` at `rate` over `dt`.
#[allow(clippy::too_many_arguments)]
pub fn diffuse(
    relaxer: &mut Relaxer,
    kind: FieldKind,
    x: &mut [f32],
    x0: &[f32],
    rate: f32,
    dt: f32,
    obstacles: &[bool],
    size: usize,
) {
    let interior = (size - 2) as f32;
    let a = dt * rate * interior * interior;
    relaxer.solve(kind, x, x0, a, 1.0 + 6.0 * a, obstacles, size);
}

/// One row-major in-place sweep over the interior.
fn sweep_sequential(x: &mut [f32], x0: &[f32], a: f32, c: f32, obstacles: &[bool], n: usize) {
    for j in 1..n - 1 {
        for i in 1..n - 1 {
            let idx = i + j * n;
            if obstacles[idx] {
                x[idx] = 0.0;
                continue;
            }
            x[idx] = (x0[idx] + a * (x[idx + 1] + x[idx - 1] + x[idx + n] + x[idx - n])) / c;
        }
    }
}

/// Update interior cells with `(i + j) % 2 == parity`.
///
/// Cells of one colour only read cells of the other colour, so reading
/// neighbours from `prev` gives the same result as an in-place update.
#[allow(clippy::too_many_arguments)]
fn sweep_colour(
    x: &mut [f32],
    prev: &[f32],
    x0: &[f32],
    a: f32,
    c: f32,
    obstacles: &[bool],
    n: usize,
    parity: usize,
) {
    let update_row = |(j, row): (usize, &mut [f32])| {
        if j == 0 || j == n - 1 {
            return;
        }
        let first = if (1 + j) % 2 == parity { 1 } else { 2 };
        for i in (first..n - 1).step_by(2) {
            let idx = i + j * n;
            if obstacles[idx] {
                row[i] = 0.0;
                continue;
            }
            row[i] = (x0[idx] + a * (prev[idx + 1] + prev[idx - 1] + prev[idx + n] + prev[idx - n])) / c;
        }
    };

    #[cfg(not(target_arch = "wasm32"))]
    x.par_chunks_mut(n).enumerate().for_each(update_row);

    #[cfg(target_arch = "wasm32")]
    x.chunks_mut(n).enumerate().for_each(update_row);
}
