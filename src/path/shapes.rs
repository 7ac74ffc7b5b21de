//! Ready-made shapes. All of them start at or are centered on the origin,
//! and degenerate sizes give an empty path.

use std::f64::consts::{FRAC_PI_2, PI};

use super::{EPSILON, Path};
use crate::types::{Point, pt};

fn is_zero(v: f64) -> bool {
    v.abs() < EPSILON
}

/// Line segment from the origin to `(x, y)`.
pub fn line(x: f64, y: f64) -> Path {
    let mut p = Path::new();
    p.line_to(pt(x, y));
    p
}

/// Circular arc from the origin; see [`Path::arc`].
pub fn arc(r: f64, theta0: f64, theta1: f64) -> Path {
    elliptical_arc(r, r, 0.0, theta0, theta1)
}

/// Elliptical arc from the origin between the angles `theta0` and `theta1`
/// in degrees, counter-clockwise when `theta0 < theta1`.
pub fn elliptical_arc(rx: f64, ry: f64, rot: f64, theta0: f64, theta1: f64) -> Path {
    let mut p = Path::new();
    p.arc(rx, ry, rot, theta0, theta1);
    p
}

pub fn rectangle(w: f64, h: f64) -> Path {
    if is_zero(w) || is_zero(h) {
        return Path::new();
    }
    let mut p = Path::new();
    p.line_to(pt(w, 0.0)).line_to(pt(w, h)).line_to(pt(0.0, h)).close();
    p
}

/// Rectangle with corners rounded by radius `r`; a negative radius makes
/// the corners concave.
pub fn rounded_rectangle(w: f64, h: f64, r: f64) -> Path {
    if is_zero(w) || is_zero(h) {
        return Path::new();
    } else if is_zero(r) {
        return rectangle(w, h);
    }

    let sweep = r > 0.0;
    let r = r.abs().min(w / 2.0).min(h / 2.0);
    let mut p = Path::new();
    p.move_to(pt(0.0, r))
        .arc_to(r, r, 0.0, false, sweep, pt(r, 0.0))
        .line_to(pt(w - r, 0.0))
        .arc_to(r, r, 0.0, false, sweep, pt(w, r))
        .line_to(pt(w, h - r))
        .arc_to(r, r, 0.0, false, sweep, pt(w - r, h))
        .line_to(pt(r, h))
        .arc_to(r, r, 0.0, false, sweep, pt(0.0, h - r))
        .close();
    p
}

/// Rectangle with its corners cut off at distance `r`.
pub fn beveled_rectangle(w: f64, h: f64, r: f64) -> Path {
    if is_zero(w) || is_zero(h) {
        return Path::new();
    } else if is_zero(r) {
        return rectangle(w, h);
    }

    let r = r.abs().min(w / 2.0).min(h / 2.0);
    let mut p = Path::new();
    p.move_to(pt(0.0, r))
        .line_to(pt(r, 0.0))
        .line_to(pt(w - r, 0.0))
        .line_to(pt(w, r))
        .line_to(pt(w, h - r))
        .line_to(pt(w - r, h))
        .line_to(pt(r, h))
        .line_to(pt(0.0, h - r))
        .close();
    p
}

pub fn circle(r: f64) -> Path {
    ellipse(r, r)
}

pub fn ellipse(rx: f64, ry: f64) -> Path {
    if is_zero(rx) || is_zero(ry) {
        return Path::new();
    }
    let mut p = Path::new();
    p.move_to(pt(rx, 0.0))
        .arc_to(rx, ry, 0.0, false, true, pt(-rx, 0.0))
        .arc_to(rx, ry, 0.0, false, true, pt(rx, 0.0))
        .close();
    p
}

/// Regular polygon with `n` vertices on a circle of radius `r`. With `up`
/// the first vertex points up, otherwise an edge is at the top.
pub fn regular_polygon(n: usize, r: f64, up: bool) -> Path {
    regular_star_polygon(n, 1, r, up)
}

/// Regular star polygon connecting every `d`-th of `n` vertices, which
/// self-intersects for `d > 1`.
pub fn regular_star_polygon(n: usize, d: usize, r: f64, up: bool) -> Path {
    if n < 3 || d < 1 || n == 2 * d || is_zero(r) {
        return Path::new();
    }

    let dtheta = 2.0 * PI / n as f64;
    let theta0 = if up { FRAC_PI_2 } else { FRAC_PI_2 + dtheta / 2.0 };
    let vertex = |i: usize| {
        let (sin, cos) = (theta0 + i as f64 * dtheta).sin_cos();
        pt(r * cos, r * sin)
    };

    let mut p = Path::new();
    p.move_to(vertex(0));
    let mut i = d;
    while i % n != 0 {
        p.line_to(vertex(i));
        i += d;
    }
    p.close();
    p
}

/// Star with `n` points alternating between the outer radius `big_r` and
/// the inner radius `r`.
pub fn star_polygon(n: usize, big_r: f64, r: f64, up: bool) -> Path {
    if n < 3 || is_zero(big_r) || is_zero(r) {
        return Path::new();
    }

    let n = 2 * n;
    let dtheta = 2.0 * PI / n as f64;
    let theta0 = if up { FRAC_PI_2 } else { FRAC_PI_2 + dtheta };
    let points = (0..n).map(|i| {
        let (sin, cos) = (theta0 + i as f64 * dtheta).sin_cos();
        let radius = if i % 2 == 0 { big_r } else { r };
        pt(radius * cos, radius * sin)
    });

    let mut p = Path::new();
    for (i, v) in points.enumerate() {
        if i == 0 {
            p.move_to(v);
        } else {
            p.line_to(v);
        }
    }
    p.close();
    p
}

/// A `w` by `h` grid of `nx` by `ny` cells separated by bars of thickness
/// `r`. The cells are holes: they wind opposite to the outline.
pub fn grid(w: f64, h: f64, nx: usize, ny: usize, r: f64) -> Path {
    if nx < 1 || ny < 1 || w <= (nx + 1) as f64 * r || h <= (ny + 1) as f64 * r {
        return Path::new();
    }

    let mut p = rectangle(w, h);
    let dx = (w - (nx + 1) as f64 * r) / nx as f64;
    let dy = (h - (ny + 1) as f64 * r) / ny as f64;
    let cell = rectangle(dx, dy).reverse();
    for j in 0..ny {
        for i in 0..nx {
            let corner = Point::new(r + i as f64 * (r + dx), r + j as f64 * (r + dy));
            p.append(&cell.translate(corner.x, corner.y));
        }
    }
    p
}
