//! Elliptical arc math.
//!
//! Arcs are stored in endpoint form (radii, rotation, flags, end point) and
//! converted to center form for evaluation. Angles are in radians; `phi` is
//! the rotation of the x-radius axis, `theta` the parametric angle.

use std::f64::consts::{FRAC_PI_2, PI};

use super::numeric::{
    Chebyshev, angle_between, angle_norm, gauss_legendre5_composite,
    inv_speed_polynomial_chebyshev_approx,
};
use crate::geometry::bezier::INVERSE_LENGTH_DEGREE;
use crate::types::{Point, Rect, pt};

/// An arc in center form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CenterArc {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    pub phi: f64,
    pub theta0: f64,
    /// End angle; greater than `theta0` for counter-clockwise arcs.
    pub theta1: f64,
}

pub fn ellipse_pos(rx: f64, ry: f64, phi: f64, center: Point, theta: f64) -> Point {
    let (sinphi, cosphi) = phi.sin_cos();
    let (sin, cos) = theta.sin_cos();
    pt(
        center.x + rx * cosphi * cos - ry * sinphi * sin,
        center.y + rx * sinphi * cos + ry * cosphi * sin,
    )
}

/// Derivative with respect to `theta`, negated for clockwise travel.
pub fn ellipse_deriv(rx: f64, ry: f64, phi: f64, sweep: bool, theta: f64) -> Point {
    let (sinphi, cosphi) = phi.sin_cos();
    let (sin, cos) = theta.sin_cos();
    let d = pt(
        -rx * cosphi * sin - ry * sinphi * cos,
        -rx * sinphi * sin + ry * cosphi * cos,
    );
    if sweep { d } else { -d }
}

/// Vector of length `d` perpendicular to the direction of travel,
/// counter-clockwise from it.
pub fn ellipse_normal(rx: f64, ry: f64, phi: f64, sweep: bool, theta: f64, d: f64) -> Point {
    ellipse_deriv(rx, ry, phi, sweep, theta).rot90().norm(d)
}

/// Radius of curvature at `theta`.
pub fn ellipse_curvature_radius(rx: f64, ry: f64, theta: f64) -> f64 {
    let (sin, cos) = theta.sin_cos();
    let num = (rx * rx * sin * sin + ry * ry * cos * cos).powf(1.5);
    num / (rx * ry)
}

/// Scale factor the radii need so an arc can reach between two points
/// `d = (start - end) / 2` apart; at least 1.
pub fn ellipse_radii_scale(rx: f64, ry: f64, phi: f64, start: Point, end: Point) -> f64 {
    let (sin, cos) = phi.sin_cos();
    let h = (start - end) / 2.0;
    let x1p = cos * h.x + sin * h.y;
    let y1p = -sin * h.x + cos * h.y;
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 { lambda.sqrt() } else { 1.0 }
}

/// Convert endpoint form to center form.
///
/// Radii that are too small to span the end points are scaled up.
pub fn ellipse_to_center(
    start: Point,
    rx: f64,
    ry: f64,
    phi: f64,
    large: bool,
    sweep: bool,
    end: Point,
) -> CenterArc {
    let (mut rx, mut ry) = (rx.abs(), ry.abs());
    if start == end || rx == 0.0 || ry == 0.0 {
        return CenterArc {
            center: start,
            rx,
            ry,
            phi,
            theta0: 0.0,
            theta1: 0.0,
        };
    }

    let (sinphi, cosphi) = phi.sin_cos();
    let h = (start - end) / 2.0;
    let x1p = cosphi * h.x + sinphi * h.y;
    let y1p = -sinphi * h.x + cosphi * h.y;

    let scale = ellipse_radii_scale(rx, ry, phi, start, end);
    rx *= scale;
    ry *= scale;

    let rxsq = rx * rx;
    let rysq = ry * ry;
    let num = (rxsq * rysq - rxsq * y1p * y1p - rysq * x1p * x1p).max(0.0);
    let den = rxsq * y1p * y1p + rysq * x1p * x1p;
    let mut sq = (num / den).sqrt();
    if large == sweep {
        sq = -sq;
    }
    let cxp = sq * rx * y1p / ry;
    let cyp = -sq * ry * x1p / rx;
    let mid = start.interpolate(end, 0.5);
    let center = pt(
        cosphi * cxp - sinphi * cyp + mid.x,
        sinphi * cxp + cosphi * cyp + mid.y,
    );

    let theta0 = angle_norm(((y1p - cyp) / ry).atan2((x1p - cxp) / rx));
    let theta_end = ((-y1p - cyp) / ry).atan2((-x1p - cxp) / rx);
    let mut dtheta = angle_norm(theta_end - theta0);
    if !sweep && dtheta > 0.0 {
        dtheta -= 2.0 * PI;
    }
    CenterArc {
        center,
        rx,
        ry,
        phi,
        theta0,
        theta1: theta0 + dtheta,
    }
}

impl CenterArc {
    pub fn pos(&self, theta: f64) -> Point {
        ellipse_pos(self.rx, self.ry, self.phi, self.center, theta)
    }

    pub fn sweep(&self) -> bool {
        self.theta1 > self.theta0
    }

    /// Arc length between `theta0` and `theta1`.
    pub fn length(&self) -> f64 {
        ellipse_length(self.rx, self.ry, self.theta0, self.theta1)
    }

    /// Parameter as a function of arc length from `theta0`.
    pub fn inverse_length(&self) -> (Chebyshev, f64) {
        let (rx, ry) = (self.rx, self.ry);
        inv_speed_polynomial_chebyshev_approx(
            INVERSE_LENGTH_DEGREE,
            move |theta: f64| {
                let (sin, cos) = theta.sin_cos();
                (rx * rx * sin * sin + ry * ry * cos * cos).sqrt()
            },
            self.theta0,
            self.theta1,
        )
    }

    /// Exact bounds of the arc.
    pub fn bounds(&self) -> Rect {
        let mut r = Rect::new(self.pos(self.theta0), self.pos(self.theta1));
        let (sinphi, cosphi) = self.phi.sin_cos();
        let tx = (-self.ry * sinphi).atan2(self.rx * cosphi);
        let ty = (self.ry * cosphi).atan2(self.rx * sinphi);
        for theta in [tx, tx + PI, ty, ty + PI] {
            if angle_between(theta, self.theta0, self.theta1) {
                r.expand_point(self.pos(theta));
            }
        }
        r
    }

    /// Split at `theta` into two arcs, returning the split point and the
    /// large-arc flags of both halves. `None` when `theta` is outside the arc.
    pub fn split(&self, theta: f64) -> Option<(Point, bool, bool)> {
        let (lo, hi) = if self.sweep() {
            (self.theta0, self.theta1)
        } else {
            (self.theta1, self.theta0)
        };
        if theta < lo || hi < theta {
            return None;
        }
        let large0 = (theta - self.theta0).abs() > PI;
        let large1 = (self.theta1 - theta).abs() > PI;
        Some((self.pos(theta), large0, large1))
    }

    /// Approximate by cubic Béziers spanning at most 90 degrees each.
    /// Returns `(control1, control2, end)` triples.
    pub fn to_cubics(&self) -> Vec<[Point; 3]> {
        let span = self.theta1 - self.theta0;
        let n = ((span.abs() / FRAC_PI_2 - 1e-9).ceil() as usize).max(1);
        let dtheta = span / n as f64;
        let kappa = dtheta.sin() * ((4.0 + 3.0 * (dtheta / 2.0).tan().powi(2)).sqrt() - 1.0) / 3.0;

        let deriv = |theta| ellipse_deriv(self.rx, self.ry, self.phi, true, theta);
        let mut out = Vec::with_capacity(n);
        let mut t0 = self.theta0;
        let mut p0 = self.pos(t0);
        for i in 1..=n {
            let t1 = if i == n { self.theta1 } else { self.theta0 + dtheta * i as f64 };
            let p1 = self.pos(t1);
            let c1 = p0 + deriv(t0) * kappa;
            let c2 = p1 - deriv(t1) * kappa;
            out.push([c1, c2, p1]);
            t0 = t1;
            p0 = p1;
        }
        out
    }

    /// Points approximating the arc within `tolerance`, excluding the start.
    pub fn flatten(&self, tolerance: f64) -> Vec<Point> {
        let r = self.rx.max(self.ry);
        let span = self.theta1 - self.theta0;
        let n = if tolerance >= r {
            1
        } else {
            let step = 2.0 * (1.0 - tolerance / r).acos();
            ((span.abs() / step).ceil() as usize).max(1)
        };
        (1..=n)
            .map(|i| self.pos(self.theta0 + span * i as f64 / n as f64))
            .collect()
    }
}

/// Arc length of an ellipse between two parametric angles.
pub fn ellipse_length(rx: f64, ry: f64, theta0: f64, theta1: f64) -> f64 {
    let (lo, hi) = if theta0 <= theta1 { (theta0, theta1) } else { (theta1, theta0) };
    let n = ((hi - lo) / FRAC_PI_2).ceil().max(1.0) as usize * 2;
    gauss_legendre5_composite(
        |theta: f64| {
            let (sin, cos) = theta.sin_cos();
            (rx * rx * sin * sin + ry * ry * cos * cos).sqrt()
        },
        lo,
        hi,
        n,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(a: Point, b: Point, eps: f64) {
        assert!(a.equals(b, eps), "{a:?} != {b:?}");
    }

    #[test]
    fn center_from_endpoints() {
        let arc = ellipse_to_center(pt(0.0, 0.0), 2.0, 2.0, 0.0, false, false, pt(2.0, 2.0));
        assert_point_eq(arc.center, pt(2.0, 0.0), 1e-12);
        assert!((arc.theta0 - PI).abs() < 1e-12);
        assert!((arc.theta1 - FRAC_PI_2).abs() < 1e-12);
        assert!(!arc.sweep());
    }

    #[test]
    fn center_other_flags() {
        let arc = ellipse_to_center(pt(0.0, 0.0), 2.0, 2.0, 0.0, false, true, pt(2.0, 2.0));
        assert_point_eq(arc.center, pt(0.0, 2.0), 1e-12);
        assert!(arc.sweep());
        assert_point_eq(arc.pos(arc.theta1), pt(2.0, 2.0), 1e-12);
        let large = ellipse_to_center(pt(0.0, 0.0), 2.0, 2.0, 0.0, true, true, pt(2.0, 2.0));
        assert!((large.theta1 - large.theta0 - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn center_scales_small_radii() {
        let arc = ellipse_to_center(pt(0.0, 0.0), 1.0, 1.0, 0.0, false, true, pt(4.0, 0.0));
        assert!((arc.rx - 2.0).abs() < 1e-12);
        assert_point_eq(arc.center, pt(2.0, 0.0), 1e-12);
    }

    #[test]
    fn ellipse_quarter_length() {
        let l = ellipse_length(2.0, 1.0, 0.0, FRAC_PI_2);
        assert!((l - 2.422110).abs() < 1e-3, "{l}");
        let full = ellipse_length(1.0, 1.0, 0.0, 2.0 * PI);
        assert!((full - 2.0 * PI).abs() < 1e-4);
    }

    #[test]
    fn arc_to_cubics_semicircle() {
        let arc = ellipse_to_center(pt(0.0, 0.0), 100.0, 100.0, 0.0, false, false, pt(200.0, 0.0));
        let cubics = arc.to_cubics();
        assert_eq!(cubics.len(), 2);
        assert_point_eq(cubics[0][0], pt(0.0, 54.858), 1e-3);
        assert_point_eq(cubics[0][1], pt(45.142, 100.0), 1e-3);
        assert_point_eq(cubics[0][2], pt(100.0, 100.0), 1e-9);
        assert_point_eq(cubics[1][2], pt(200.0, 0.0), 1e-9);
    }

    #[test]
    fn arc_bounds_and_split() {
        let arc = ellipse_to_center(pt(0.0, 0.0), 100.0, 100.0, 0.0, false, false, pt(200.0, 0.0));
        let r = arc.bounds();
        assert_point_eq(r.min, pt(0.0, 0.0), 1e-9);
        assert_point_eq(r.max, pt(200.0, 100.0), 1e-9);

        let (mid, large0, large1) = arc.split(FRAC_PI_2).unwrap();
        assert_point_eq(mid, pt(100.0, 100.0), 1e-9);
        assert!(!large0 && !large1);
        assert!(arc.split(1.5 * PI).is_none());
    }

    #[test]
    fn arc_flatten_within_tolerance() {
        let arc = ellipse_to_center(pt(1.0, 0.0), 1.0, 1.0, 0.0, false, true, pt(-1.0, 0.0));
        let pts = arc.flatten(0.01);
        assert!(pts.len() >= 5);
        assert_point_eq(*pts.last().unwrap(), pt(-1.0, 0.0), 1e-9);
        for w in pts.windows(2) {
            let mid = w[0].interpolate(w[1], 0.5);
            assert!(1.0 - mid.length() <= 0.01 + 1e-9);
        }
    }

    #[test]
    fn curvature_radius_of_circle() {
        assert!((ellipse_curvature_radius(3.0, 3.0, 0.7) - 3.0).abs() < 1e-12);
        // flattest point of an ellipse
        assert!((ellipse_curvature_radius(2.0, 1.0, FRAC_PI_2) - 4.0).abs() < 1e-12);
    }
}
