//! Stroking and offsetting.
//!
//! Both work on the flattened path. Every subpath becomes a list of
//! vertices, and an offset polyline is traced along one side of it: at a
//! corner where the side is on the inside of the turn the two offset
//! segments are cut at their intersection, on the outside the gap is filled
//! with the join. The other side of a stroke is the same trace over the
//! reversed vertices.

pub mod dash;

use crate::geometry::intersect::intersect_lines;
use crate::log::trace;
use crate::path::Path;
use crate::style::{Cap, Join, Style};
use crate::types::{Point, Tolerance};

/// Vertices of every subpath of a flat path, without repeated points. A
/// closed subpath does not repeat its first vertex at the end.
fn subpath_vertices(flat: &Path, eps: f64) -> Vec<(Vec<Point>, bool)> {
    flat.split()
        .iter()
        .map(|sub| {
            let closed = sub.closed();
            let mut pts: Vec<Point> = Vec::with_capacity(sub.len());
            for cmd in sub.commands() {
                let p = cmd.end();
                if pts.last().is_none_or(|q| !q.equals(p, eps)) {
                    pts.push(p);
                }
            }
            if closed && pts.len() > 1 && pts[0].equals(pts[pts.len() - 1], eps) {
                pts.pop();
            }
            (pts, closed)
        })
        .collect()
}

/// Normal of segment `ab` of length `|w|`, pointing left of the direction
/// of travel for positive `w`.
fn normal(a: Point, b: Point, w: f64) -> Point {
    (b - a).rot90().norm(w)
}

/// Trace the offset polyline at signed distance `w` along `pts`.
///
/// With `begin` the trace starts a new subpath, otherwise it continues the
/// current one. Closed traces are closed; open traces end on the offset of
/// the last vertex.
fn offset_side(out: &mut Path, pts: &[Point], closed: bool, w: f64, join: Join, eps: f64, begin: bool) {
    let m = pts.len();
    let segs = if closed { m } else { m - 1 };
    let seg = |i: usize| (pts[i % m], pts[(i + 1) % m]);
    let normals: Vec<Point> = (0..segs)
        .map(|i| {
            let (a, b) = seg(i);
            normal(a, b, w)
        })
        .collect();

    let mut start = pts[0] + normals[0];
    if closed {
        let (a, v) = seg(segs - 1);
        if let Some(x) = inner_cut(a, v, pts[1 % m], normals[segs - 1], normals[0], w, eps) {
            start = x;
        }
    }
    if begin {
        out.move_to(start);
    } else {
        out.line_to(start);
    }

    for i in 0..segs {
        let (a, v) = seg(i);
        if !closed && i + 1 == segs {
            out.line_to(v + normals[i]);
            break;
        }
        let j = (i + 1) % segs;
        let c = seg(j).1;
        corner(out, a, v, c, normals[i], normals[j], w, join, eps);
    }
    if closed {
        out.close();
    }
}

/// Where the offset segments meet when `v` is on the inside of the turn
/// `a → v → c` for this side.
fn inner_cut(a: Point, v: Point, c: Point, n0: Point, n1: Point, w: f64, eps: f64) -> Option<Point> {
    let turn = (v - a).perp_dot(c - v);
    if turn * w <= 0.0 {
        return None;
    }
    intersect_lines(a + n0, v + n0, v + n1, c + n1, eps).map(|hit| hit.point)
}

/// Emit the offset segment ending at `v` and the connection to the next one.
#[allow(clippy::too_many_arguments)]
fn corner(out: &mut Path, a: Point, v: Point, c: Point, n0: Point, n1: Point, w: f64, join: Join, eps: f64) {
    let turn = (v - a).perp_dot(c - v);
    if turn * w > 0.0 {
        match intersect_lines(a + n0, v + n0, v + n1, c + n1, eps) {
            Some(hit) => {
                out.line_to(hit.point);
            }
            // segments too short to meet: go around the pivot
            None => {
                out.line_to(v + n0).line_to(v).line_to(v + n1);
            }
        }
        return;
    }

    out.line_to(v + n0);
    if n0.equals(n1, eps) {
        return;
    }
    let hw = w.abs();
    match join {
        Join::Bevel => {
            out.line_to(v + n1);
        }
        Join::Round => {
            out.arc_to(hw, hw, 0.0, false, w < 0.0, v + n1);
        }
        // flattened segments have no curvature, where an arcs join is a miter
        Join::Miter(limit) | Join::Arcs(limit) => {
            let cos_half = ((1.0 + n0.dot(n1) / (hw * hw)) / 2.0).max(0.0).sqrt();
            if cos_half < eps || limit < 1.0 / cos_half {
                out.line_to(v + n1);
            } else {
                out.line_to(v + (n0 + n1).norm(hw / cos_half)).line_to(v + n1);
            }
        }
    }
}

/// Go around the end of a stroke from `pivot + n` to `pivot - n`.
fn cap(out: &mut Path, cap: Cap, pivot: Point, n: Point) {
    let hw = n.length();
    match cap {
        Cap::Butt => {
            out.line_to(pivot - n);
        }
        Cap::Round => {
            out.arc_to(hw, hw, 0.0, false, false, pivot - n);
        }
        Cap::Square => {
            let e = n.rot_neg90();
            out.line_to(pivot + n + e).line_to(pivot - n + e).line_to(pivot - n);
        }
    }
}

impl Path {
    /// Outline of the region covered by a pen of `width` moving along the
    /// path, as a path to be filled with the non-zero rule.
    ///
    /// Open subpaths become one contour with caps at both ends. Closed
    /// subpaths become two contours of opposite winding, one on each side.
    /// Subpaths without extent are dropped.
    pub fn stroke(&self, width: f64, cap_style: Cap, join: Join, tol: Tolerance) -> Path {
        let mut out = Path::new();
        if width.is_nan() || width <= 0.0 {
            trace!(width, "stroke without width");
            return out;
        }
        let hw = width / 2.0;
        let flat = self.flatten(tol);
        for (pts, closed) in subpath_vertices(&flat, tol.epsilon) {
            if pts.len() < 2 {
                trace!(closed, "skipping stroke of a single point");
                continue;
            }
            let rev: Vec<Point> = pts.iter().rev().copied().collect();
            if closed {
                offset_side(&mut out, &pts, true, hw, join, tol.epsilon, true);
                offset_side(&mut out, &rev, true, hw, join, tol.epsilon, true);
            } else {
                let n = pts.len();
                let n_first = normal(pts[0], pts[1], hw);
                let n_last = normal(pts[n - 2], pts[n - 1], hw);
                offset_side(&mut out, &pts, false, hw, join, tol.epsilon, true);
                cap(&mut out, cap_style, pts[n - 1], n_last);
                offset_side(&mut out, &rev, false, hw, join, tol.epsilon, false);
                cap(&mut out, cap_style, pts[0], -n_first);
                out.close();
            }
        }
        out
    }

    /// Stroke outline for `style`, dashed first when it has a dash pattern.
    pub fn stroke_style(&self, style: &Style, tol: Tolerance) -> Path {
        if style.is_dashed() {
            self.dash(style.dash_offset, &style.dashes)
                .stroke(style.stroke_width, style.cap, style.join, tol)
        } else {
            self.stroke(style.stroke_width, style.cap, style.join, tol)
        }
    }

    /// Grow closed subpaths outward by `d`, or shrink them for negative
    /// `d`. Open subpaths are copied unchanged; curves are flattened.
    pub fn offset(&self, d: f64, join: Join, tol: Tolerance) -> Path {
        if d.abs() < tol.epsilon {
            return self.clone();
        }
        let flat = self.flatten(tol);
        let mut out = Path::new();
        for (sub, (pts, closed)) in flat.split().iter().zip(subpath_vertices(&flat, tol.epsilon)) {
            if !closed {
                out.append(sub);
                continue;
            }
            if pts.len() < 3 {
                continue;
            }
            // counter-clockwise contours have their outside on the right
            let w = if sub.ccw() { -d } else { d };
            let mut grown = Path::new();
            offset_side(&mut grown, &pts, true, w, join, tol.epsilon, true);
            out.append(&grown);
        }
        out
    }
}
