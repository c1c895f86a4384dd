//! Semi-Lagrangian advection.
//!
//! Each interior cell traces its centre backwards through the velocity field
//! and bilinearly samples the source field there.

use super::{FieldKind, enforce_boundary};

/// Transport `d0` through `(vel_x, vel_y)` over `dt`, writing into `d`.
///
/// Backtraced positions are clamped to the loose range `[0.5, N + 0.5]`
/// rather than to the interior. Sample indices that land past the grid read
/// the last row or column. The obstacle mask is not consulted here.
pub fn advect(
    kind: FieldKind,
    d: &mut [f32],
    d0: &[f32],
    vel_x: &[f32],
    vel_y: &[f32],
    dt: f32,
    size: usize,
) {
    let n = size;
    let dt0 = dt * (n - 2) as f32;
    let upper = n as f32 + 0.5;
    let last = n - 1;

    for j in 1..n - 1 {
        for i in 1..n - 1 {
            let idx = i + j * n;
            let mut x = i as f32 - dt0 * vel_x[idx];
            let mut y = j as f32 - dt0 * vel_y[idx];

            if x < 0.5 {
                x = 0.5;
            }
            if x > upper {
                x = upper;
            }
            if y < 0.5 {
                y = 0.5;
            }
            if y > upper {
                y = upper;
            }

            let fx = x.floor();
            let fy = y.floor();
            let s1 = x - fx;
            let s0 = 1.0 - s1;
            let t1 = y - fy;
            let t0 = 1.0 - t1;

            let i0 = (fx as usize).min(last);
            let i1 = (fx as usize + 1).min(last);
            let j0 = (fy as usize).min(last);
            let j1 = (fy as usize + 1).min(last);

            d[idx] = s0 * (t0 * d0[i0 + j0 * n] + t1 * d0[i0 + j1 * n])
                + s1 * (t0 * d0[i1 + j0 * n] + t1 * d0[i1 + j1 * n]);
        }
    }
    enforce_boundary(kind, d, n);
}
