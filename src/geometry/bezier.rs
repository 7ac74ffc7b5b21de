//! Quadratic and cubic Bézier evaluation, splitting, length and flattening.

use super::numeric::{
    Chebyshev, gauss_legendre5, gauss_legendre5_composite, inv_speed_polynomial_chebyshev_approx,
    solve_quadratic,
};
use crate::types::{Point, Rect};

/// Sub-intervals used for cubic arc length quadrature.
const CUBIC_LENGTH_INTERVALS: usize = 8;

/// Degree of the Chebyshev approximation of inverse arc length.
pub const INVERSE_LENGTH_DEGREE: usize = 10;

// ============================================================================
// Quadratic
// ============================================================================

pub fn quad_pos(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    p0 * (mt * mt) + p1 * (2.0 * mt * t) + p2 * (t * t)
}

pub fn quad_deriv(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    (p1 - p0) * (2.0 * (1.0 - t)) + (p2 - p1) * (2.0 * t)
}

pub fn quad_deriv2(p0: Point, p1: Point, p2: Point) -> Point {
    (p0 - p1 * 2.0 + p2) * 2.0
}

/// Degree elevation: the two control points of the equivalent cubic.
pub fn quad_to_cube(p0: Point, p1: Point, p2: Point) -> (Point, Point) {
    let c1 = p0 + (p1 - p0) * (2.0 / 3.0);
    let c2 = p2 + (p1 - p2) * (2.0 / 3.0);
    (c1, c2)
}

/// de Casteljau split at `t`.
pub fn split_quad(p0: Point, p1: Point, p2: Point, t: f64) -> ([Point; 3], [Point; 3]) {
    let q0 = p0.interpolate(p1, t);
    let q1 = p1.interpolate(p2, t);
    let m = q0.interpolate(q1, t);
    ([p0, q0, m], [m, q1, p2])
}

/// Exact arc length of a quadratic Bézier.
pub fn quad_length(p0: Point, p1: Point, p2: Point) -> f64 {
    let a = p0 - p1 * 2.0 + p2;
    let b = (p1 - p0) * 2.0;
    let aa = 4.0 * a.dot(a);
    let bb = 4.0 * a.dot(b);
    let cc = b.dot(b);
    if aa.abs() < 1e-12 {
        // control point halfway between the end points
        return p0.distance(p2);
    }

    let sabc = 2.0 * (aa + bb + cc).sqrt();
    let a2 = aa.sqrt();
    let a32 = 2.0 * aa * a2;
    let c2 = 2.0 * cc.sqrt();
    let ba = bb / a2;
    let length = (a32 * sabc
        + a2 * bb * (sabc - c2)
        + (4.0 * cc * aa - bb * bb) * ((2.0 * a2 + ba + sabc) / (ba + c2)).ln())
        / (4.0 * a32);
    if length.is_finite() {
        length
    } else {
        gauss_legendre5_composite(|t| quad_deriv(p0, p1, p2, t).length(), 0.0, 1.0, 8)
    }
}

/// Exact bounds of a quadratic Bézier.
pub fn quad_bounds(p0: Point, p1: Point, p2: Point) -> Rect {
    let mut r = Rect::new(p0, p2);
    let den = p0 - p1 * 2.0 + p2;
    for (num, den) in [(p0.x - p1.x, den.x), (p0.y - p1.y, den.y)] {
        if den != 0.0 {
            let t = num / den;
            if 0.0 < t && t < 1.0 {
                r.expand_point(quad_pos(p0, p1, p2, t));
            }
        }
    }
    r
}

/// Points approximating the curve within `tolerance`, excluding `p0`.
pub fn flatten_quad(p0: Point, p1: Point, p2: Point, tolerance: f64) -> Vec<Point> {
    let dd = (p0 - p1 * 2.0 + p2).length();
    let n = ((0.25 * dd / tolerance).sqrt().ceil() as usize).max(1);
    (1..=n)
        .map(|i| {
            if i == n {
                p2
            } else {
                quad_pos(p0, p1, p2, i as f64 / n as f64)
            }
        })
        .collect()
}

// ============================================================================
// Cubic
// ============================================================================

pub fn cube_pos(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
}

pub fn cube_deriv(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    (p1 - p0) * (3.0 * mt * mt) + (p2 - p1) * (6.0 * mt * t) + (p3 - p2) * (3.0 * t * t)
}

pub fn cube_deriv2(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    (p0 - p1 * 2.0 + p2) * (6.0 * (1.0 - t)) + (p1 - p2 * 2.0 + p3) * (6.0 * t)
}

/// Tangent direction at `t`, falling back to the chord through the next
/// distinct control point where the derivative vanishes.
pub fn cube_tangent(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let d = cube_deriv(p0, p1, p2, p3, t);
    if !d.is_zero() {
        return d;
    }
    let chord = if t <= 0.5 {
        [p1, p2, p3].into_iter().map(|p| p - p0).find(|d| !d.is_zero())
    } else {
        [p2, p1, p0].into_iter().map(|p| p3 - p).find(|d| !d.is_zero())
    };
    chord.unwrap_or(Point::ZERO)
}

/// Vector of length `d` perpendicular to the curve, counter-clockwise from
/// the direction of travel.
pub fn cube_normal(p0: Point, p1: Point, p2: Point, p3: Point, t: f64, d: f64) -> Point {
    cube_tangent(p0, p1, p2, p3, t).rot90().norm(d)
}

/// Signed radius of curvature; infinite where the curve is straight.
pub fn cube_curvature_radius(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> f64 {
    let d = cube_deriv(p0, p1, p2, p3, t);
    let dd = cube_deriv2(p0, p1, p2, p3, t);
    let den = d.perp_dot(dd);
    if den == 0.0 {
        return f64::INFINITY;
    }
    d.length().powi(3) / den
}

/// de Casteljau split at `t`.
pub fn split_cube(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> ([Point; 4], [Point; 4]) {
    let a = p0.interpolate(p1, t);
    let b = p1.interpolate(p2, t);
    let c = p2.interpolate(p3, t);
    let ab = a.interpolate(b, t);
    let bc = b.interpolate(c, t);
    let m = ab.interpolate(bc, t);
    ([p0, a, ab, m], [m, bc, c, p3])
}

/// Arc length by composite Gauss–Legendre quadrature.
pub fn cube_length(p0: Point, p1: Point, p2: Point, p3: Point) -> f64 {
    gauss_legendre5_composite(
        |t| cube_deriv(p0, p1, p2, p3, t).length(),
        0.0,
        1.0,
        CUBIC_LENGTH_INTERVALS,
    )
}

/// Arc length from `t = 0` up to `t`.
pub fn cube_length_to(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> f64 {
    gauss_legendre5(|s| cube_deriv(p0, p1, p2, p3, s).length(), 0.0, t)
}

/// Parameter as a function of arc length, plus the total length.
pub fn cube_inverse_length(p0: Point, p1: Point, p2: Point, p3: Point) -> (Chebyshev, f64) {
    inv_speed_polynomial_chebyshev_approx(
        INVERSE_LENGTH_DEGREE,
        |t| cube_deriv(p0, p1, p2, p3, t).length(),
        0.0,
        1.0,
    )
}

/// Exact bounds of a cubic Bézier.
pub fn cube_bounds(p0: Point, p1: Point, p2: Point, p3: Point) -> Rect {
    let mut r = Rect::new(p0, p3);
    let a = (p1 - p2) * 9.0 + p3 * 3.0 - p0 * 3.0;
    let b = (p0 - p1 * 2.0 + p2) * 6.0;
    let c = (p1 - p0) * 3.0;
    let axes = solve_quadratic(a.x, b.x, c.x)
        .iter()
        .chain(solve_quadratic(a.y, b.y, c.y).iter())
        .copied()
        .collect::<Vec<_>>();
    for t in axes {
        if 0.0 < t && t < 1.0 {
            r.expand_point(cube_pos(p0, p1, p2, p3, t));
        }
    }
    r
}

/// Points approximating the curve within `tolerance` (Wang's formula),
/// excluding `p0`.
pub fn flatten_cube(p0: Point, p1: Point, p2: Point, p3: Point, tolerance: f64) -> Vec<Point> {
    let m = (p0 - p1 * 2.0 + p2).length().max((p1 - p2 * 2.0 + p3).length());
    let n = ((0.75 * m / tolerance).sqrt().ceil() as usize).max(1);
    (1..=n)
        .map(|i| {
            if i == n {
                p3
            } else {
                cube_pos(p0, p1, p2, p3, i as f64 / n as f64)
            }
        })
        .collect()
}
