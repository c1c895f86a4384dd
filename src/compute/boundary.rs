//! Boundary enforcement for the outer ring of a field.

/// What a field represents, which decides the sign applied at walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Density, dye colour, pressure, divergence: edges copy their neighbour.
    Scalar,
    /// Horizontal velocity: negated at the left and right walls.
    VelocityX,
    /// Vertical velocity: negated at the top and bottom walls.
    VelocityY,
}

impl FieldKind {
    #[inline]
    fn left_right_sign(self) -> f32 {
        if self == FieldKind::VelocityX { -1.0 } else { 1.0 }
    }

    #[inline]
    fn top_bottom_sign(self) -> f32 {
        if self == FieldKind::VelocityY { -1.0 } else { 1.0 }
    }
}

/// Fill the boundary ring of `field` from its adjacent interior cells.
///
/// Edge cells copy (or negate, depending on `kind`) their inward neighbour.
/// Each corner becomes the mean of its two adjacent edge cells.
pub fn enforce_boundary(kind: FieldKind, field: &mut [f32], size: usize) {
    let n = size;
    debug_assert_eq!(field.len(), n * n);

    let vertical = kind.top_bottom_sign();
    for i in 1..n - 1 {
        field[i] = vertical * field[i + n];
        field[i + (n - 1) * n] = vertical * field[i + (n - 2) * n];
    }

    let horizontal = kind.left_right_sign();
    for j in 1..n - 1 {
        let row = j * n;
        field[row] = horizontal * field[row + 1];
        field[row + n - 1] = horizontal * field[row + n - 2];
    }

    let last = (n - 1) * n;
    field[0] = 0.5 * (field[1] + field[n]);
    field[last] = 0.5 * (field[last + 1] + field[last - n]);
    field[n - 1] = 0.5 * (field[n - 2] + field[n - 1 + n]);
    field[last + n - 1] = 0.5 * (field[last + n - 2] + field[last - 1]);
}
