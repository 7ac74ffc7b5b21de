//! Segment intersection and ray crossing tests.

use super::bezier::{cube_deriv, cube_pos, quad_to_cube};
use super::numeric::solve_cubic;
use crate::types::Point;

/// Intersection of two line segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentHit {
    pub point: Point,
    /// Parameter along the first segment in [0, 1].
    pub ta: f64,
    /// Parameter along the second segment in [0, 1].
    pub tb: f64,
}

/// Intersect segments `a0a1` and `b0b1`. Parallel and collinear segments
/// report no hit; `eps` widens the segments at their end points.
pub fn intersect_lines(a0: Point, a1: Point, b0: Point, b1: Point, eps: f64) -> Option<SegmentHit> {
    let r = a1 - a0;
    let s = b1 - b0;
    let den = r.perp_dot(s);
    let (lr, ls) = (r.length(), s.length());
    if lr == 0.0 || ls == 0.0 || den.abs() <= eps * lr * ls {
        return None;
    }
    let q = b0 - a0;
    let ta = q.perp_dot(s) / den;
    let tb = q.perp_dot(r) / den;
    let (ea, eb) = (eps / lr, eps / ls);
    if ta < -ea || 1.0 + ea < ta || tb < -eb || 1.0 + eb < tb {
        return None;
    }
    let ta = ta.clamp(0.0, 1.0);
    let tb = tb.clamp(0.0, 1.0);
    Some(SegmentHit {
        point: a0 + r * ta,
        ta,
        tb,
    })
}

/// Closest distance from `p` to segment `ab`.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    let len2 = d.dot(d);
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(d) / len2).clamp(0.0, 1.0);
    p.distance(a + d * t)
}

/// Winding contribution of segment `ab` for a ray from `p` towards +x.
///
/// Upward edges include their start and exclude their end, downward edges
/// the opposite, so shared vertices are counted once.
pub fn line_crossing(p: Point, a: Point, b: Point) -> i32 {
    if a.y <= p.y && p.y < b.y {
        if (b - a).perp_dot(p - a) > 0.0 {
            return 1;
        }
    } else if b.y <= p.y && p.y < a.y && (b - a).perp_dot(p - a) < 0.0 {
        return -1;
    }
    0
}

/// Winding contribution of a quadratic Bézier, see [`line_crossing`].
pub fn quad_crossing(p: Point, p0: Point, p1: Point, p2: Point) -> i32 {
    let (c1, c2) = quad_to_cube(p0, p1, p2);
    cube_crossing(p, p0, c1, c2, p2)
}

/// Winding contribution of a cubic Bézier, see [`line_crossing`].
pub fn cube_crossing(p: Point, p0: Point, p1: Point, p2: Point, p3: Point) -> i32 {
    const EPS: f64 = 1e-9;
    let (y0, y1, y2, y3) = (p0.y, p1.y, p2.y, p3.y);
    let lo = y0.min(y1).min(y2).min(y3);
    let hi = y0.max(y1).max(y2).max(y3);
    if p.y < lo || hi < p.y {
        return 0;
    }

    let a = -y0 + 3.0 * y1 - 3.0 * y2 + y3;
    let b = 3.0 * y0 - 6.0 * y1 + 3.0 * y2;
    let c = -3.0 * y0 + 3.0 * y1;
    let d = y0 - p.y;
    let mut winding = 0;
    let mut last = f64::NAN;
    for &t in solve_cubic(a, b, c, d).iter() {
        if t < -EPS || 1.0 + EPS < t || (t - last).abs() < EPS {
            continue;
        }
        last = t;
        let t = t.clamp(0.0, 1.0);
        let dy = cube_deriv(p0, p1, p2, p3, t).y;
        let at_start = t < EPS;
        let at_end = 1.0 - t < EPS;
        let counted = if dy > 0.0 {
            !at_end
        } else if dy < 0.0 {
            !at_start
        } else {
            false
        };
        if counted && p.x < cube_pos(p0, p1, p2, p3, t).x {
            winding += if dy > 0.0 { 1 } else { -1 };
        }
    }
    winding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pt;

    #[test]
    fn crossing_lines_intersect() {
        let hit = intersect_lines(pt(0.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0), pt(10.0, 0.0), 1e-10)
            .unwrap();
        assert!(hit.point.equals(pt(5.0, 5.0), 1e-12));
        assert!((hit.ta - 0.5).abs() < 1e-12);
        assert!((hit.tb - 0.5).abs() < 1e-12);
    }

    #[test]
    fn touching_and_parallel_lines() {
        let hit = intersect_lines(pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 0.0), pt(10.0, 5.0), 1e-10);
        assert_eq!(hit.map(|h| (h.ta, h.tb)), Some((1.0, 0.0)));
        assert!(intersect_lines(pt(0.0, 0.0), pt(10.0, 0.0), pt(0.0, 1.0), pt(10.0, 1.0), 1e-10).is_none());
        assert!(intersect_lines(pt(0.0, 0.0), pt(10.0, 0.0), pt(5.0, 0.0), pt(15.0, 0.0), 1e-10).is_none());
        assert!(intersect_lines(pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, -1.0), pt(2.0, 1.0), 1e-10).is_none());
    }

    #[test]
    fn segment_distance() {
        assert_eq!(point_segment_distance(pt(5.0, 3.0), pt(0.0, 0.0), pt(10.0, 0.0)), 3.0);
        assert_eq!(point_segment_distance(pt(13.0, 4.0), pt(0.0, 0.0), pt(10.0, 0.0)), 5.0);
    }

    #[test]
    fn square_winding_by_lines() {
        let sq = [pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)];
        let winding = |p: Point| -> i32 {
            (0..4).map(|i| line_crossing(p, sq[i], sq[(i + 1) % 4])).sum()
        };
        assert_eq!(winding(pt(5.0, 5.0)), 1);
        // through a vertex row
        assert_eq!(winding(pt(5.0, 0.0)), 1);
        assert_eq!(winding(pt(-5.0, 5.0)), 0);
        assert_eq!(winding(pt(15.0, 5.0)), 0);
    }

    #[test]
    fn cubic_crossings() {
        // upward bulge to the right of x = 0
        let (p0, p1, p2, p3) = (pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0));
        assert_eq!(cube_crossing(pt(1.0, 5.0), p0, p1, p2, p3), 1);
        assert_eq!(cube_crossing(pt(9.0, 5.0), p0, p1, p2, p3), 0);
        assert_eq!(cube_crossing(pt(1.0, 12.0), p0, p1, p2, p3), 0);
        // reversed direction counts negative
        assert_eq!(cube_crossing(pt(1.0, 5.0), p3, p2, p1, p0), -1);
        assert_eq!(quad_crossing(pt(1.0, 5.0), p0, pt(10.0, 5.0), p3), 1);
    }
}
