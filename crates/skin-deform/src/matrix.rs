//! In-place helpers on homogeneous 4x4 transforms used by the skin blender.

use glam::DMat4;

/// All-zero matrix, the neutral element of accumulation by [`add`].
#[inline]
pub fn zero_matrix() -> DMat4 {
    DMat4::ZERO
}

#[inline]
pub fn add_to_diagonal(matrix: &mut DMat4, value: f64) {
    matrix.x_axis.x += value;
    matrix.y_axis.y += value;
    matrix.z_axis.z += value;
    matrix.w_axis.w += value;
}

#[inline]
pub fn scale(matrix: &mut DMat4, value: f64) {
    *matrix = *matrix * value;
}

/// Sum two matrices element by element.
#[inline]
pub fn add(dst: &mut DMat4, src: &DMat4) {
    *dst = *dst + *src;
}

/// Inverse of `matrix`, or `None` when it is singular.
///
/// `epsilon` is relative: the determinant is compared against the product of
/// the column lengths, its largest possible magnitude for those columns, so
/// uniformly scaling a matrix never changes the outcome.
pub fn try_inverse(matrix: &DMat4, epsilon: f64) -> Option<DMat4> {
    let determinant = matrix.determinant();
    let volume = matrix.x_axis.length()
        * matrix.y_axis.length()
        * matrix.z_axis.length()
        * matrix.w_axis.length();
    if !determinant.is_finite() || determinant == 0.0 || determinant.abs() <= epsilon * volume {
        return None;
    }
    let inverse = matrix.inverse();
    inverse.is_finite().then_some(inverse)
}
