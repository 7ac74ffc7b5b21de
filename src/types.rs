//! Geometric primitives: points, rectangles, affine matrices and tolerances.
//!
//! `Point` is a plain `Copy` pair with its own arithmetic so path code reads
//! like the math. `Matrix` is a thin wrapper over `glam::DAffine2`.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use glam::{DAffine2, DMat2, DVec2, dvec2};

use crate::errors::GeometryError;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

fn check_positive(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

// ============================================================================
// Tolerance
// ============================================================================

/// Numeric tolerances threaded through every geometry operation.
///
/// `epsilon` decides when two coordinates are equal, `flatness` is the
/// maximum deviation allowed when curves are approximated by lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub epsilon: f64,
    pub flatness: f64,
}

impl Tolerance {
    pub const DEFAULT: Tolerance = Tolerance {
        epsilon: 1e-10,
        flatness: 0.01,
    };

    /// Create tolerances with validation (both must be positive and finite)
    pub fn try_new(epsilon: f64, flatness: f64) -> Result<Self, NumericError> {
        Ok(Tolerance {
            epsilon: check_positive(epsilon)?,
            flatness: check_positive(flatness)?,
        })
    }

    /// Same epsilon, different flatness.
    pub fn with_flatness(self, flatness: f64) -> Result<Self, NumericError> {
        Tolerance::try_new(self.epsilon, flatness)
    }

    #[inline]
    pub fn equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.epsilon
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::DEFAULT
    }
}

// ============================================================================
// Point
// ============================================================================

/// A 2D point or vector in user units.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[inline]
pub const fn pt(x: f64, y: f64) -> Point {
    Point { x, y }
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Equal within `eps` on both axes.
    pub fn equals(self, q: Point, eps: f64) -> bool {
        (self.x - q.x).abs() <= eps && (self.y - q.y).abs() <= eps
    }

    pub fn dot(self, q: Point) -> f64 {
        self.x * q.x + self.y * q.y
    }

    /// Perp-dot product, positive when `q` is counter-clockwise from `self`.
    pub fn perp_dot(self, q: Point) -> f64 {
        self.x * q.y - self.y * q.x
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, q: Point) -> f64 {
        (q - self).length()
    }

    /// Angle with the positive x-axis in (-π, π].
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Scale to length `l`; the zero vector stays zero.
    pub fn norm(self, l: f64) -> Point {
        let d = self.length();
        if d == 0.0 {
            Point::ZERO
        } else {
            self * (l / d)
        }
    }

    /// Rotate by 90 degrees counter-clockwise.
    pub fn rot90(self) -> Point {
        pt(-self.y, self.x)
    }

    /// Rotate by 90 degrees clockwise.
    pub fn rot_neg90(self) -> Point {
        pt(self.y, -self.x)
    }

    /// Rotate by `phi` radians around `origin`.
    pub fn rot(self, phi: f64, origin: Point) -> Point {
        let (sin, cos) = phi.sin_cos();
        let d = self - origin;
        pt(
            origin.x + cos * d.x - sin * d.y,
            origin.y + sin * d.x + cos * d.y,
        )
    }

    pub fn interpolate(self, q: Point, t: f64) -> Point {
        self + (q - self) * t
    }

    pub fn min(self, q: Point) -> Point {
        pt(self.x.min(q.x), self.y.min(q.y))
    }

    pub fn max(self, q: Point) -> Point {
        pt(self.x.max(q.x), self.y.max(q.y))
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point { pt(self.x + rhs.x, self.y + rhs.y) }
}
impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point { pt(self.x - rhs.x, self.y - rhs.y) }
}
impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point { pt(self.x * rhs, self.y * rhs) }
}
impl Mul<Point> for f64 {
    type Output = Point;
    fn mul(self, rhs: Point) -> Point { pt(self * rhs.x, self * rhs.y) }
}
impl Div<f64> for Point {
    type Output = Point;
    fn div(self, rhs: f64) -> Point { pt(self.x / rhs, self.y / rhs) }
}
impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point { pt(-self.x, -self.y) }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self { pt(v.x, v.y) }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self { dvec2(p.x, p.y) }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", crate::path::num(self.x), crate::path::num(self.y))
    }
}

// ============================================================================
// Rect
// ============================================================================

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Rectangle spanning two corners given in any order.
    pub fn new(a: Point, b: Point) -> Self {
        Rect { min: a.min(b), max: a.max(b) }
    }

    /// Create an empty rectangle (will expand on first point)
    pub fn empty() -> Self {
        Rect {
            min: pt(f64::MAX, f64::MAX),
            max: pt(f64::MIN, f64::MIN),
        }
    }

    /// Check if the rect is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: Point) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Smallest rectangle containing both.
    pub fn union(self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        } else if other.is_empty() {
            return self;
        }
        Rect {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn width(&self) -> f64 { self.max.x - self.min.x }

    pub fn height(&self) -> f64 { self.max.y - self.min.y }

    pub fn center(&self) -> Point {
        self.min.interpolate(self.max, 0.5)
    }

    /// Point inside or on the boundary.
    pub fn contains(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Bounding rectangle of the four transformed corners.
    pub fn transform(&self, m: &Matrix) -> Rect {
        if self.is_empty() {
            return *self;
        }
        let mut r = Rect::empty();
        for p in [
            self.min,
            pt(self.max.x, self.min.y),
            self.max,
            pt(self.min.x, self.max.y),
        ] {
            r.expand_point(m.dot(p));
        }
        r
    }
}

// ============================================================================
// Matrix
// ============================================================================

/// 2x3 affine transform.
///
/// Builder methods compose on the right: `m.translate(x, y).rotate(deg)` first
/// rotates, then translates, then applies `m`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix(pub DAffine2);

impl Default for Matrix {
    fn default() -> Self {
        Matrix::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix(DAffine2::IDENTITY);

    /// From the row-major coefficients `[[a b c] [d e f]]`.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Matrix(DAffine2::from_cols(dvec2(a, d), dvec2(b, e), dvec2(c, f)))
    }

    /// Row-major coefficients `[a b c d e f]`.
    pub fn coefficients(&self) -> [f64; 6] {
        let m = &self.0;
        [
            m.matrix2.x_axis.x,
            m.matrix2.y_axis.x,
            m.translation.x,
            m.matrix2.x_axis.y,
            m.matrix2.y_axis.y,
            m.translation.y,
        ]
    }

    /// `self * other`: `other` is applied first.
    pub fn mul(&self, other: &Matrix) -> Matrix {
        Matrix(self.0 * other.0)
    }

    pub fn translate(&self, x: f64, y: f64) -> Matrix {
        self.mul(&Matrix(DAffine2::from_translation(dvec2(x, y))))
    }

    pub fn scale(&self, sx: f64, sy: f64) -> Matrix {
        self.mul(&Matrix(DAffine2::from_scale(dvec2(sx, sy))))
    }

    pub fn scale_about(&self, sx: f64, sy: f64, origin: Point) -> Matrix {
        self.translate(origin.x, origin.y)
            .scale(sx, sy)
            .translate(-origin.x, -origin.y)
    }

    /// Counter-clockwise rotation in degrees.
    pub fn rotate(&self, deg: f64) -> Matrix {
        self.mul(&Matrix(DAffine2::from_angle(deg.to_radians())))
    }

    pub fn rotate_about(&self, deg: f64, origin: Point) -> Matrix {
        self.translate(origin.x, origin.y)
            .rotate(deg)
            .translate(-origin.x, -origin.y)
    }

    /// Shear: `x' = x + sx*y`, `y' = y + sy*x`.
    pub fn shear(&self, sx: f64, sy: f64) -> Matrix {
        let m = DMat2::from_cols(dvec2(1.0, sy), dvec2(sx, 1.0));
        self.mul(&Matrix(DAffine2::from_mat2(m)))
    }

    /// Mirror across the y-axis (negates x).
    pub fn reflect_x(&self) -> Matrix {
        self.scale(-1.0, 1.0)
    }

    /// Mirror across the x-axis (negates y).
    pub fn reflect_y(&self) -> Matrix {
        self.scale(1.0, -1.0)
    }

    pub fn dot(&self, p: Point) -> Point {
        self.0.transform_point2(p.into()).into()
    }

    /// Apply only the linear part.
    pub fn dot_vector(&self, v: Point) -> Point {
        self.0.transform_vector2(v.into()).into()
    }

    pub fn det(&self) -> f64 {
        self.0.matrix2.determinant()
    }

    /// The linear part as a glam matrix.
    pub fn linear(&self) -> DMat2 {
        self.0.matrix2
    }

    pub fn is_identity(&self, eps: f64) -> bool {
        self.0.abs_diff_eq(DAffine2::IDENTITY, eps)
    }

    pub fn equals(&self, other: &Matrix, eps: f64) -> bool {
        self.0.abs_diff_eq(other.0, eps)
    }

    pub fn try_inv(&self) -> Result<Matrix, GeometryError> {
        let det = self.det();
        if det == 0.0 || !det.is_finite() {
            return Err(GeometryError::SingularMatrix { det });
        }
        Ok(Matrix(self.0.inverse()))
    }

    /// Inverse transform.
    ///
    /// # Panics
    ///
    /// Panics when the matrix is singular; use [`Matrix::try_inv`] for
    /// matrices built from untrusted input.
    pub fn inv(&self) -> Matrix {
        match self.try_inv() {
            Ok(m) => m,
            Err(err) => panic!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(a: Point, b: Point) {
        assert!(a.equals(b, 1e-9), "{a:?} != {b:?}");
    }

    // ==================== Tolerance tests ====================

    #[test]
    fn tolerance_default_values() {
        let tol = Tolerance::default();
        assert_eq!(tol.epsilon, 1e-10);
        assert_eq!(tol.flatness, 0.01);
    }

    #[test]
    fn tolerance_try_new_rejects_bad_values() {
        assert_eq!(Tolerance::try_new(0.0, 0.1), Err(NumericError::Zero));
        assert_eq!(Tolerance::try_new(1e-9, -0.1), Err(NumericError::Negative));
        assert_eq!(Tolerance::try_new(f64::NAN, 0.1), Err(NumericError::NaN));
        assert_eq!(Tolerance::try_new(1e-9, f64::INFINITY), Err(NumericError::Infinite));
        assert!(Tolerance::try_new(1e-9, 0.5).is_ok());
    }

    // ==================== Point tests ====================

    #[test]
    fn point_arithmetic() {
        let a = pt(3.0, 4.0);
        let b = pt(1.0, 2.0);
        assert_eq!(a + b, pt(4.0, 6.0));
        assert_eq!(a - b, pt(2.0, 2.0));
        assert_eq!(a * 2.0, pt(6.0, 8.0));
        assert_eq!(2.0 * a, pt(6.0, 8.0));
        assert_eq!(a / 2.0, pt(1.5, 2.0));
        assert_eq!(-a, pt(-3.0, -4.0));
    }

    #[test]
    fn point_products_and_length() {
        let a = pt(3.0, 4.0);
        assert_eq!(a.length(), 5.0);
        assert_eq!(a.dot(pt(1.0, 0.0)), 3.0);
        assert_eq!(pt(1.0, 0.0).perp_dot(pt(0.0, 1.0)), 1.0);
        assert_eq!(pt(0.0, 1.0).perp_dot(pt(1.0, 0.0)), -1.0);
    }

    #[test]
    fn point_norm_and_rotation() {
        assert_point_eq(pt(3.0, 4.0).norm(10.0), pt(6.0, 8.0));
        assert_eq!(Point::ZERO.norm(1.0), Point::ZERO);
        assert_eq!(pt(1.0, 0.0).rot90(), pt(0.0, 1.0));
        assert_eq!(pt(1.0, 0.0).rot_neg90(), pt(0.0, -1.0));
        assert_point_eq(
            pt(2.0, 1.0).rot(std::f64::consts::FRAC_PI_2, pt(1.0, 1.0)),
            pt(1.0, 2.0),
        );
    }

    #[test]
    fn point_glam_conversion() {
        let v: DVec2 = pt(1.5, -2.0).into();
        assert_eq!(v, dvec2(1.5, -2.0));
        assert_eq!(Point::from(v), pt(1.5, -2.0));
    }

    // ==================== Rect tests ====================

    #[test]
    fn rect_empty_and_expand() {
        let mut r = Rect::empty();
        assert!(r.is_empty());
        r.expand_point(pt(1.0, 2.0));
        r.expand_point(pt(-1.0, 5.0));
        assert!(!r.is_empty());
        assert_eq!(r.min, pt(-1.0, 2.0));
        assert_eq!(r.max, pt(1.0, 5.0));
        assert_eq!(r.width(), 2.0);
        assert_eq!(r.height(), 3.0);
    }

    #[test]
    fn rect_union_ignores_empty() {
        let a = Rect::new(pt(0.0, 0.0), pt(1.0, 1.0));
        assert_eq!(a.union(Rect::empty()), a);
        assert_eq!(Rect::empty().union(a), a);
        let b = Rect::new(pt(2.0, -1.0), pt(3.0, 0.5));
        assert_eq!(a.union(b), Rect::new(pt(0.0, -1.0), pt(3.0, 1.0)));
    }

    #[test]
    fn rect_transform_rotated() {
        let r = Rect::new(pt(0.0, 0.0), pt(2.0, 1.0));
        let t = r.transform(&Matrix::IDENTITY.rotate(90.0));
        assert_point_eq(t.min, pt(-1.0, 0.0));
        assert_point_eq(t.max, pt(0.0, 2.0));
    }

    // ==================== Matrix tests ====================

    #[test]
    fn matrix_composes_right_to_left() {
        // translate after rotate
        let m = Matrix::IDENTITY.translate(10.0, 0.0).rotate(90.0);
        assert_point_eq(m.dot(pt(1.0, 0.0)), pt(10.0, 1.0));
    }

    #[test]
    fn matrix_coefficients_round_trip() {
        let m = Matrix::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(m.coefficients(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_point_eq(m.dot(pt(1.0, 1.0)), pt(6.0, 15.0));
        assert_eq!(m.det(), -3.0);
    }

    #[test]
    fn matrix_shear_and_reflect() {
        let m = Matrix::IDENTITY.shear(1.0, 0.0);
        assert_point_eq(m.dot(pt(0.0, 2.0)), pt(2.0, 2.0));
        assert_point_eq(Matrix::IDENTITY.reflect_x().dot(pt(3.0, 4.0)), pt(-3.0, 4.0));
        assert_point_eq(Matrix::IDENTITY.reflect_y().dot(pt(3.0, 4.0)), pt(3.0, -4.0));
    }

    #[test]
    fn matrix_scale_about_keeps_origin() {
        let m = Matrix::IDENTITY.scale_about(2.0, 3.0, pt(1.0, 1.0));
        assert_point_eq(m.dot(pt(1.0, 1.0)), pt(1.0, 1.0));
        assert_point_eq(m.dot(pt(2.0, 2.0)), pt(3.0, 4.0));
    }

    #[test]
    fn matrix_inverse() {
        let m = Matrix::IDENTITY.translate(5.0, -2.0).rotate(30.0).scale(2.0, 0.5);
        let id = m.mul(&m.inv());
        assert!(id.is_identity(1e-12));
    }

    #[test]
    fn matrix_try_inv_singular() {
        let m = Matrix::IDENTITY.scale(0.0, 1.0);
        assert!(matches!(m.try_inv(), Err(GeometryError::SingularMatrix { .. })));
    }

    #[test]
    #[should_panic]
    fn matrix_inv_singular_panics() {
        let _ = Matrix::IDENTITY.scale(1.0, 0.0).inv();
    }
}
