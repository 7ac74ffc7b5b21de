//! Point lists and smooth splines through them.

use std::ops::{Div, Mul, Sub};

use super::{EPSILON, Path};
use crate::geometry::intersect::line_crossing;
use crate::style::FillRule;
use crate::types::{Point, Tolerance};

/// A list of points joined by straight lines. When the last point equals
/// the first the polyline is closed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    coords: Vec<Point>,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices of the flattened path.
    pub fn from_path(p: &Path, tol: Tolerance) -> Self {
        Polyline { coords: p.flatten(tol).coords() }
    }

    /// End points of the path's commands; curves become straight lines.
    pub fn from_path_coords(p: &Path) -> Self {
        Polyline { coords: p.coords() }
    }

    pub fn add(&mut self, p: Point) -> &mut Self {
        self.coords.push(p);
        self
    }

    pub fn coords(&self) -> &[Point] {
        &self.coords
    }

    pub fn closed(&self) -> bool {
        match (self.coords.first(), self.coords.last()) {
            (Some(a), Some(b)) => self.coords.len() > 2 && a.equals(*b, EPSILON),
            _ => false,
        }
    }

    pub fn to_path(&self) -> Path {
        let mut q = Path::new();
        let [first, middle @ .., last] = self.coords.as_slice() else {
            return q;
        };
        q.move_to(*first);
        for p in middle {
            q.line_to(*p);
        }
        if self.closed() {
            q.close();
        } else {
            q.line_to(*last);
        }
        q
    }

    /// Winding number of `p`; the polyline is closed implicitly.
    pub fn fill_count(&self, p: Point) -> i32 {
        let Some(&first) = self.coords.first() else {
            return 0;
        };
        let mut count: i32 = self.coords.windows(2).map(|w| line_crossing(p, w[0], w[1])).sum();
        if let Some(&last) = self.coords.last() {
            count += line_crossing(p, last, first);
        }
        count
    }

    pub fn interior(&self, p: Point, fill_rule: FillRule) -> bool {
        fill_rule.fills(self.fill_count(p))
    }

    /// Cubic spline through all points with continuous curvature. A closed
    /// polyline is also smooth where it starts and ends.
    pub fn smoothen(&self) -> Path {
        let k = &self.coords;
        let mut q = Path::new();
        match k.len() {
            0 | 1 => return q,
            2 => {
                q.move_to(k[0]).line_to(k[1]);
                return q;
            }
            _ => {}
        }

        let closed = self.closed();
        // a closed polyline through two distinct points has nothing to bend
        if closed && k.len() < 4 {
            return self.to_path();
        }
        let (p1, p2) = if closed { closed_controls(k) } else { open_controls(k) };

        q.move_to(k[0]);
        for i in 0..k.len() - 1 {
            q.cube_to(p1[i], p2[i], k[i + 1]);
        }
        if closed {
            q.close();
        }
        q
    }
}

impl From<Vec<Point>> for Polyline {
    fn from(coords: Vec<Point>) -> Self {
        Polyline { coords }
    }
}

impl FromIterator<Point> for Polyline {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Polyline { coords: iter.into_iter().collect() }
    }
}

/// Thomas algorithm for a tridiagonal system with sub-diagonal `a`,
/// diagonal `b` and super-diagonal `c`.
fn solve_tridiagonal<T>(a: &[f64], b: &[f64], c: &[f64], d: &[T]) -> Vec<T>
where
    T: Copy + Sub<Output = T> + Mul<f64, Output = T> + Div<f64, Output = T>,
{
    let n = d.len();
    let mut b = b.to_vec();
    let mut d = d.to_vec();
    for i in 1..n {
        let w = a[i] / b[i - 1];
        b[i] -= w * c[i - 1];
        d[i] = d[i] - d[i - 1] * w;
    }
    let mut x = d.clone();
    x[n - 1] = d[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = (d[i] - x[i + 1] * c[i]) / b[i];
    }
    x
}

/// Control points of the open spline: natural end conditions.
fn open_controls(k: &[Point]) -> (Vec<Point>, Vec<Point>) {
    let n = k.len() - 1;
    let mut a = vec![1.0; n];
    let mut b = vec![4.0; n];
    let c = vec![1.0; n];
    let mut d: Vec<Point> = (0..n).map(|i| k[i] * 4.0 + k[i + 1] * 2.0).collect();
    a[0] = 0.0;
    b[0] = 2.0;
    d[0] = k[0] + k[1] * 2.0;
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    d[n - 1] = k[n] + k[n - 1] * 8.0;

    let p1 = solve_tridiagonal(&a, &b, &c, &d);
    let mut p2: Vec<Point> = (0..n - 1).map(|i| k[i + 1] * 2.0 - p1[i + 1]).collect();
    p2.push((k[n] + p1[n - 1]) * 0.5);
    (p1, p2)
}

/// Control points of the closed spline: a cyclic tridiagonal system solved
/// with the Sherman–Morrison correction.
fn closed_controls(k: &[Point]) -> (Vec<Point>, Vec<Point>) {
    let n = k.len() - 1;
    let a = vec![1.0; n];
    let c = vec![1.0; n];
    let d: Vec<Point> = (0..n).map(|i| k[i] * 4.0 + k[i + 1] * 2.0).collect();
    // both corner elements of the cyclic matrix are 1
    let (alpha, beta) = (1.0, 1.0);
    let gamma = -4.0;
    let mut b = vec![4.0; n];
    b[0] -= gamma;
    b[n - 1] -= alpha * beta / gamma;

    let x = solve_tridiagonal(&a, &b, &c, &d);
    let mut u = vec![0.0; n];
    u[0] = gamma;
    u[n - 1] = alpha;
    let z = solve_tridiagonal(&a, &b, &c, &u);
    let fact = (x[0] + x[n - 1] * (beta / gamma)) / (1.0 + z[0] + beta * z[n - 1] / gamma);
    let p1: Vec<Point> = x.iter().zip(&z).map(|(&xi, &zi)| xi - fact * zi).collect();

    let p2 = (0..n).map(|i| k[i + 1] * 2.0 - p1[(i + 1) % n]).collect();
    (p1, p2)
}
