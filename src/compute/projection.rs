//! Pressure projection onto a divergence-free velocity field.

use super::{FieldKind, Relaxer, enforce_boundary};

/// Discrete divergence of the interior cells, written into `out`.
///
/// `out[i, j] = -0.5 * ((u[i+1, j] - u[i-1, j]) + (v[i, j+1] - v[i, j-1])) / N`.
/// Boundary cells of `out` are left untouched.
pub fn divergence_into(vel_x: &[f32], vel_y: &[f32], out: &mut [f32], size: usize) {
    let n = size;
    let scale = n as f32;
    for j in 1..n - 1 {
        for i in 1..n - 1 {
            let idx = i + j * n;
            out[idx] = -0.5 * (vel_x[idx + 1] - vel_x[idx - 1] + vel_y[idx + n] - vel_y[idx - n]) / scale;
        }
    }
}

/// Largest interior divergence magnitude.
pub fn max_divergence(vel_x: &[f32], vel_y: &[f32], size: usize) -> f32 {
    let n = size;
    let scale = n as f32;
    let mut max = 0.0f32;
    for j in 1..n - 1 {
        for i in 1..n - 1 {
            let idx = i + j * n;
            let div = -0.5 * (vel_x[idx + 1] - vel_x[idx - 1] + vel_y[idx + n] - vel_y[idx - n]) / scale;
            max = max.max(div.abs());
        }
    }
    max
}

/// Remove the gradient part of `(vel_x, vel_y)`.
///
/// Builds the divergence, relaxes the pressure Poisson equation with
/// `a = 1, c = 6` and subtracts the pressure gradient. The result is only
/// as divergence-free as a fixed four-sweep solve gets it.
pub fn project(
    relaxer: &mut Relaxer,
    vel_x: &mut [f32],
    vel_y: &mut [f32],
    pressure: &mut [f32],
    divergence: &mut [f32],
    obstacles: &[bool],
    size: usize,
) {
    let n = size;

    divergence_into(vel_x, vel_y, divergence, n);
    for j in 1..n - 1 {
        pressure[1 + j * n..n - 1 + j * n].fill(0.0);
    }
    enforce_boundary(FieldKind::Scalar, divergence, n);
    enforce_boundary(FieldKind::Scalar, pressure, n);

    relaxer.solve(FieldKind::Scalar, pressure, divergence, 1.0, 6.0, obstacles, n);

    let scale = n as f32;
    for j in 1..n - 1 {
        for i in 1..n - 1 {
            let idx = i + j * n;
            vel_x[idx] -= 0.5 * (pressure[idx + 1] - pressure[idx - 1]) * scale;
            vel_y[idx] -= 0.5 * (pressure[idx + n] - pressure[idx - n]) * scale;
        }
    }
    enforce_boundary(FieldKind::VelocityX, vel_x, n);
    enforce_boundary(FieldKind::VelocityY, vel_y, n);
}
