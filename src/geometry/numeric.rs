//! Root finding, quadrature and function approximation.

use std::f64::consts::PI;
use std::ops::Deref;

/// Up to three real roots in ascending order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Roots {
    vals: [f64; 3],
    len: usize,
}

impl Roots {
    fn push(&mut self, x: f64) {
        if x.is_finite() && self.len < 3 {
            self.vals[self.len] = x;
            self.len += 1;
        }
    }

    fn sorted(mut self) -> Self {
        self.vals[..self.len].sort_by(f64::total_cmp);
        self
    }
}

impl Deref for Roots {
    type Target = [f64];
    fn deref(&self) -> &[f64] {
        &self.vals[..self.len]
    }
}

/// Normalize an angle to [0, 2π).
pub fn angle_norm(theta: f64) -> f64 {
    let theta = theta % (2.0 * PI);
    if theta < 0.0 { theta + 2.0 * PI } else { theta }
}

/// Whether `theta` lies on the arc going from `lower` to `upper`, end points
/// included. The arc runs counter-clockwise when `lower <= upper`.
pub fn angle_between(theta: f64, lower: f64, upper: f64) -> bool {
    if (upper - lower).abs() >= 2.0 * PI {
        return true;
    }
    let ccw = lower <= upper;
    let theta = angle_norm(theta - lower);
    let upper = angle_norm(upper - lower);
    if ccw {
        theta <= upper || theta == 0.0
    } else {
        theta >= upper || theta == 0.0
    }
}

/// Real roots of `a x² + b x + c`, numerically stable (Citardauq).
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::default();
    if a == 0.0 {
        if b != 0.0 {
            roots.push(-c / b);
        }
        return roots;
    }
    if c == 0.0 {
        roots.push(0.0);
        roots.push(-b / a);
        return roots.sorted();
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return roots;
    } else if disc == 0.0 {
        roots.push(-b / (2.0 * a));
        return roots;
    }

    let q = if b < 0.0 { -disc.sqrt() } else { disc.sqrt() };
    let x1 = -(b + q) / (2.0 * a);
    roots.push(x1);
    roots.push(c / (a * x1));
    roots.sorted()
}

/// Real roots of `a x³ + b x² + c x + d`.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Roots {
    const EPS: f64 = 1e-10;
    if a.abs() < EPS {
        return solve_quadratic(b, c, d);
    }
    let (b, c, d) = (b / a, c / a, d / a);

    // depressed cubic t³ + c1 t + c0 with x = t - b/3
    let bthird = b / 3.0;
    let c0 = d - bthird * (c - 2.0 * bthird * bthird);
    let c1 = c - b * bthird;

    let mut roots = Roots::default();
    if c0.abs() < EPS {
        if c1.abs() < EPS {
            roots.push(-bthird);
        } else if c1 < 0.0 {
            let s = (-c1).sqrt();
            roots.push(-s - bthird);
            roots.push(-bthird);
            roots.push(s - bthird);
        } else {
            roots.push(-bthird);
        }
    } else if c1.abs() < EPS {
        roots.push((-c0).cbrt() - bthird);
    } else {
        let mut delta = -(4.0 * c1 * c1 * c1 + 27.0 * c0 * c0);
        if delta.abs() < EPS {
            delta = 0.0;
        }
        if delta < 0.0 {
            let re = -c0 / 2.0;
            let im = (-delta / 27.0).sqrt() / 2.0;
            roots.push((re - im).cbrt() + (re + im).cbrt() - bthird);
        } else if delta > 0.0 {
            let re = -c0 / 2.0;
            let im = (delta / 27.0).sqrt() / 2.0;
            let theta = im.atan2(re) / 3.0;
            let (sin, cos) = theta.sin_cos();
            let dist = (-c1 / 3.0).sqrt();
            let tmp = dist * sin * 3f64.sqrt();
            roots.push(2.0 * dist * cos - bthird);
            roots.push(-dist * cos - tmp - bthird);
            roots.push(-dist * cos + tmp - bthird);
        } else {
            let tmp = -3.0 * c0 / (2.0 * c1);
            roots.push(tmp - bthird);
            roots.push(-2.0 * tmp - bthird);
        }
    }
    roots.sorted()
}

// ============================================================================
// Quadrature
// ============================================================================

/// Gauss–Legendre quadrature with 3 nodes over [a, b].
pub fn gauss_legendre3(f: impl Fn(f64) -> f64, a: f64, b: f64) -> f64 {
    let c = (b - a) / 2.0;
    let d = (a + b) / 2.0;
    let q1 = f(-0.774596669 * c + d);
    let q2 = f(d);
    let q3 = f(0.774596669 * c + d);
    c * ((5.0 / 9.0) * (q1 + q3) + (8.0 / 9.0) * q2)
}

/// Gauss–Legendre quadrature with 5 nodes over [a, b].
pub fn gauss_legendre5(f: impl Fn(f64) -> f64, a: f64, b: f64) -> f64 {
    let c = (b - a) / 2.0;
    let d = (a + b) / 2.0;
    let q1 = f(-0.90618 * c + d);
    let q2 = f(-0.538469 * c + d);
    let q3 = f(d);
    let q4 = f(0.538469 * c + d);
    let q5 = f(0.90618 * c + d);
    c * (0.236927 * (q1 + q5) + 0.478629 * (q2 + q4) + 0.568889 * q3)
}

/// Gauss–Legendre quadrature with 7 nodes over [a, b].
pub fn gauss_legendre7(f: impl Fn(f64) -> f64, a: f64, b: f64) -> f64 {
    let c = (b - a) / 2.0;
    let d = (a + b) / 2.0;
    let q1 = f(-0.949108 * c + d);
    let q2 = f(-0.741531 * c + d);
    let q3 = f(-0.405845 * c + d);
    let q4 = f(d);
    let q5 = f(0.405845 * c + d);
    let q6 = f(0.741531 * c + d);
    let q7 = f(0.949108 * c + d);
    c * (0.129485 * (q1 + q7) + 0.279705 * (q2 + q6) + 0.381830 * (q3 + q5) + 0.417959 * q4)
}

/// Composite 5-node Gauss–Legendre over `n` equal sub-intervals.
pub fn gauss_legendre5_composite(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
    let n = n.max(1);
    let h = (b - a) / n as f64;
    (0..n)
        .map(|i| {
            let x0 = a + h * i as f64;
            gauss_legendre5(&f, x0, x0 + h)
        })
        .sum()
}

// ============================================================================
// Inversion and approximation
// ============================================================================

/// Find `x` in [xmin, xmax] with `f(x) = y` for monotone `f`.
pub fn bisection(f: impl Fn(f64) -> f64, y: f64, mut xmin: f64, mut xmax: f64) -> f64 {
    const MAX_ITERATIONS: usize = 100;
    const TOLERANCE: f64 = 0.001;

    let tol_x = (xmax - xmin).abs() * TOLERANCE;
    let tol_y = (f(xmax) - f(xmin)).abs() * TOLERANCE;
    let mut x = (xmin + xmax) / 2.0;
    for _ in 0..MAX_ITERATIONS {
        x = (xmin + xmax) / 2.0;
        let dy = f(x) - y;
        if dy.abs() < tol_y || (xmax - xmin).abs() / 2.0 < tol_x {
            return x;
        } else if dy > 0.0 {
            xmax = x;
        } else {
            xmin = x;
        }
    }
    x
}

/// Chebyshev polynomial approximation of a function on [xmin, xmax].
///
/// Evaluation clamps `x` to the domain and the result to [ymin, ymax].
#[derive(Clone, Debug)]
pub struct Chebyshev {
    coefs: Vec<f64>,
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
}

impl Chebyshev {
    pub fn eval(&self, x: f64) -> f64 {
        if !(self.xmax > self.xmin) {
            return self.ymin;
        }
        let x = x.max(self.xmin).min(self.xmax);
        let u = ((x - self.xmin) / (self.xmax - self.xmin) * 2.0 - 1.0).clamp(-1.0, 1.0);
        let acos = u.acos();
        let a: f64 = self
            .coefs
            .iter()
            .enumerate()
            .map(|(j, c)| c * (j as f64 * acos).cos())
            .sum();
        let y = a - 0.5 * self.coefs.first().copied().unwrap_or(0.0);
        y.max(self.ymin).min(self.ymax)
    }
}

/// Fit a Chebyshev polynomial with `n` terms to `f` on [xmin, xmax].
pub fn polynomial_chebyshev_approx(
    n: usize,
    f: impl Fn(f64) -> f64,
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
) -> Chebyshev {
    let nf = n as f64;
    let fs: Vec<f64> = (0..n)
        .map(|k| {
            let u = (PI * (k as f64 + 0.5) / nf).cos();
            f(xmin + (xmax - xmin) * (u + 1.0) / 2.0)
        })
        .collect();
    let coefs = (0..n)
        .map(|j| {
            let a: f64 = fs
                .iter()
                .enumerate()
                .map(|(k, fk)| fk * (j as f64 * PI * (k as f64 + 0.5) / nf).cos())
                .sum();
            (2.0 / nf) * a
        })
        .collect();

    let (ymin, ymax) = if ymax < ymin { (ymax, ymin) } else { (ymin, ymax) };
    Chebyshev { coefs, xmin, xmax, ymin, ymax }
}

/// Approximate the inverse arc length of a curve with speed `speed` on
/// [tmin, tmax]: returns `t(L)` and the total length.
pub fn inv_speed_polynomial_chebyshev_approx(
    n: usize,
    speed: impl Fn(f64) -> f64,
    tmin: f64,
    tmax: f64,
) -> (Chebyshev, f64) {
    let length = |t: f64| gauss_legendre5(&speed, tmin, t).abs();
    let total = length(tmax);
    let inv = polynomial_chebyshev_approx(
        n,
        |l| bisection(length, l, tmin, tmax),
        0.0,
        total,
        tmin,
        tmax,
    );
    (inv, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    // ==================== Angle tests ====================

    #[test]
    fn angle_norm_wraps() {
        assert!((angle_norm(-PI / 2.0) - 1.5 * PI).abs() < EPS);
        assert!((angle_norm(5.0 * PI) - PI).abs() < EPS);
        assert_eq!(angle_norm(0.0), 0.0);
    }

    #[test]
    fn angle_between_ccw_and_cw() {
        assert!(angle_between(0.5 * PI, 0.0, PI));
        assert!(!angle_between(1.5 * PI, 0.0, PI));
        assert!(angle_between(1.5 * PI, 0.0, -PI));
        assert!(!angle_between(0.5 * PI, 0.0, -PI));
        // end points included
        assert!(angle_between(0.0, 0.0, PI));
        assert!(angle_between(PI, 0.0, PI));
        assert!(angle_between(3.0, -10.0, 10.0));
    }

    // ==================== Solver tests ====================

    #[test]
    fn quadratic_roots() {
        assert_eq!(&*solve_quadratic(1.0, -3.0, 2.0), &[1.0, 2.0]);
        assert_eq!(&*solve_quadratic(1.0, 0.0, 1.0), &[] as &[f64]);
        assert_eq!(&*solve_quadratic(1.0, -2.0, 1.0), &[1.0]);
        assert_eq!(&*solve_quadratic(0.0, 2.0, -4.0), &[2.0]);
        assert_eq!(&*solve_quadratic(0.0, 0.0, 1.0), &[] as &[f64]);
        assert_eq!(&*solve_quadratic(2.0, 4.0, 0.0), &[-2.0, 0.0]);
    }

    #[test]
    fn quadratic_is_stable_for_small_c() {
        let roots = solve_quadratic(1.0, 1e8, 1.0);
        assert_eq!(roots.len(), 2);
        assert!((roots[1] + 1e-8).abs() < 1e-20);
    }

    #[test]
    fn cubic_three_roots() {
        // (x-1)(x-2)(x-3)
        let roots = solve_cubic(1.0, -6.0, 11.0, -6.0);
        assert_eq!(roots.len(), 3);
        for (r, want) in roots.iter().zip([1.0, 2.0, 3.0]) {
            assert!((r - want).abs() < 1e-9, "{roots:?}");
        }
    }

    #[test]
    fn cubic_one_root() {
        // x³ + x + 2 = (x+1)(x² - x + 2)
        let roots = solve_cubic(1.0, 0.0, 1.0, 2.0);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] + 1.0).abs() < 1e-9);
    }

    #[test]
    fn cubic_degenerates_to_quadratic() {
        let roots = solve_cubic(0.0, 1.0, -3.0, 2.0);
        assert_eq!(&*roots, &[1.0, 2.0]);
    }

    // ==================== Quadrature tests ====================

    #[test]
    fn gauss_legendre_polynomials() {
        let f = |x: f64| x * x * x + 2.0 * x;
        // ∫0..2 = 4 + 4
        assert!((gauss_legendre3(f, 0.0, 2.0) - 8.0).abs() < 1e-6);
        assert!((gauss_legendre5(f, 0.0, 2.0) - 8.0).abs() < 1e-4);
        assert!((gauss_legendre7(f, 0.0, 2.0) - 8.0).abs() < 1e-4);
    }

    #[test]
    fn gauss_legendre_sine() {
        let got = gauss_legendre5_composite(f64::sin, 0.0, PI, 4);
        assert!((got - 2.0).abs() < 1e-4, "{got}");
    }

    // ==================== Approximation tests ====================

    #[test]
    fn bisection_finds_root() {
        let x = bisection(|x| x * x, 2.0, 0.0, 2.0);
        assert!((x - 2f64.sqrt()).abs() < 0.01);
    }

    #[test]
    fn chebyshev_approximates_smooth_function() {
        let f = polynomial_chebyshev_approx(10, f64::exp, 0.0, 1.0, f64::MIN, f64::MAX);
        for x in [0.0, 0.25, 0.5, 0.9, 1.0] {
            assert!((f.eval(x) - x.exp()).abs() < 1e-6, "x={x}");
        }
        // clamped to the domain
        assert!((f.eval(2.0) - 1f64.exp()).abs() < 1e-6);
    }

    #[test]
    fn inverse_speed_of_uniform_motion() {
        let (t, total) = inv_speed_polynomial_chebyshev_approx(10, |_| 3.0, 0.0, 1.0);
        assert!((total - 3.0).abs() < 1e-5);
        assert!((t.eval(1.5) - 0.5).abs() < 0.01);
        assert!(t.eval(0.0).abs() < 0.01);
        assert!((t.eval(3.0) - 1.0).abs() < 0.01);
    }
}
