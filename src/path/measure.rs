//! Path queries: bounds, length, orientation and fill tests.
//!
//! Fill queries treat every subpath as closed, the way a renderer fills it.

use super::{ArcSegment, Command, Path};
use crate::geometry::bezier::{
    cube_bounds, cube_deriv, cube_length, cube_pos, flatten_cube, quad_bounds, quad_deriv, quad_length,
    quad_pos, quad_to_cube,
};
use crate::geometry::numeric::gauss_legendre3;
use crate::geometry::intersect::{cube_crossing, line_crossing, quad_crossing};
use crate::style::FillRule;
use crate::types::{Point, Rect, Tolerance};

/// Distance of the probe point from an edge, relative to the edge length.
const PROBE_OFFSET: f64 = 1e-6;

pub(crate) fn segment_length(start: Point, cmd: Command) -> f64 {
    match cmd {
        Command::MoveTo(_) => 0.0,
        Command::LineTo(p) | Command::Close(p) => start.distance(p),
        Command::QuadTo(c, p) => quad_length(start, c, p),
        Command::CubeTo(c1, c2, p) => cube_length(start, c1, c2, p),
        Command::ArcTo(a) => a.center(start).length(),
    }
}

/// Signed area swept by the segment as seen from the origin. Summed around
/// a closed loop this is the enclosed area.
fn segment_area(start: Point, cmd: Command) -> f64 {
    match cmd {
        Command::MoveTo(_) => 0.0,
        Command::LineTo(p) | Command::Close(p) => 0.5 * start.perp_dot(p),
        // the integrands are polynomials of degree 5 at most, which the
        // 3-point rule integrates exactly
        Command::QuadTo(c, p) => {
            0.5 * gauss_legendre3(|t| quad_pos(start, c, p, t).perp_dot(quad_deriv(start, c, p, t)), 0.0, 1.0)
        }
        Command::CubeTo(c1, c2, p) => {
            0.5 * gauss_legendre3(
                |t| cube_pos(start, c1, c2, p, t).perp_dot(cube_deriv(start, c1, c2, p, t)),
                0.0,
                1.0,
            )
        }
        Command::ArcTo(a) => {
            let arc = a.center(start);
            let e0 = arc.pos(arc.theta0) - arc.center;
            let e1 = arc.pos(arc.theta1) - arc.center;
            0.5 * (arc.rx * arc.ry * (arc.theta1 - arc.theta0) + arc.center.perp_dot(e1 - e0))
        }
    }
}

/// Signed area of a subpath, implicitly closed.
pub(crate) fn subpath_area(cmds: &[Command]) -> f64 {
    let Some(first) = cmds.first() else {
        return 0.0;
    };
    let origin = first.end();
    let mut pen = origin;
    let mut area = 0.0;
    for cmd in &cmds[1..] {
        area += segment_area(pen, *cmd);
        pen = cmd.end();
    }
    if !matches!(cmds.last(), Some(Command::Close(_))) {
        area += 0.5 * pen.perp_dot(origin);
    }
    area
}

fn subpath_windings(cmds: &[Command], p: Point) -> i32 {
    let Some(first) = cmds.first() else {
        return 0;
    };
    let origin = first.end();
    let mut winding = 0;
    let mut pen = origin;
    for cmd in &cmds[1..] {
        winding += match *cmd {
            Command::MoveTo(_) => 0,
            Command::LineTo(q) | Command::Close(q) => line_crossing(p, pen, q),
            Command::QuadTo(c, q) => quad_crossing(p, pen, c, q),
            Command::CubeTo(c1, c2, q) => cube_crossing(p, pen, c1, c2, q),
            Command::ArcTo(a) => {
                let mut from = pen;
                let mut w = 0;
                for [c1, c2, to] in a.center(pen).to_cubics() {
                    w += cube_crossing(p, from, c1, c2, to);
                    from = to;
                }
                w
            }
        };
        pen = cmd.end();
    }
    if !matches!(cmds.last(), Some(Command::Close(_))) {
        winding += line_crossing(p, pen, origin);
    }
    winding
}

impl Path {
    /// Exact bounding box of all commands, control point extremes included.
    /// An empty path has an empty rectangle.
    pub fn bounds(&self) -> Rect {
        let mut r = Rect::empty();
        for (start, cmd) in self.segments() {
            let b = match cmd {
                Command::MoveTo(p) | Command::LineTo(p) | Command::Close(p) => Rect::new(p, p),
                Command::QuadTo(c, p) => quad_bounds(start, c, p),
                Command::CubeTo(c1, c2, p) => cube_bounds(start, c1, c2, p),
                Command::ArcTo(a) => a.center(start).bounds(),
            };
            r = r.union(b);
        }
        r
    }

    /// Total arc length. Cubic Béziers and arcs are integrated numerically.
    pub fn length(&self) -> f64 {
        self.segments().map(|(start, cmd)| segment_length(start, cmd)).sum()
    }

    /// Signed area enclosed by the path, positive when it runs
    /// counter-clockwise. Open subpaths count as closed.
    pub fn signed_area(&self) -> f64 {
        self.subpaths().map(subpath_area).sum()
    }

    /// Whether the path mostly runs counter-clockwise.
    pub fn ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Winding number of `p`: counter-clockwise loops around it count +1,
    /// clockwise loops -1.
    pub fn windings(&self, p: Point) -> i32 {
        self.subpaths().map(|cmds| subpath_windings(cmds, p)).sum()
    }

    /// Whether `p` is filled under `fill_rule`.
    pub fn interior(&self, p: Point, fill_rule: FillRule) -> bool {
        fill_rule.fills(self.windings(p))
    }

    /// For every subpath, whether the area just inside its first edge is
    /// filled once the whole path is taken into account. Holes report false.
    pub fn filling(&self, fill_rule: FillRule, tol: Tolerance) -> Vec<bool> {
        let flat = self.flatten(tol);
        flat.subpaths()
            .map(|cmds| {
                let area = subpath_area(cmds);
                let edge = cmds
                    .windows(2)
                    .map(|w| (w[0].end(), w[1].end()))
                    .find(|(a, b)| !a.equals(*b, tol.epsilon));
                let Some((a, b)) = edge else {
                    return false;
                };
                let d = b - a;
                let inward = if area >= 0.0 { d.rot90() } else { d.rot_neg90() };
                let probe = a.interpolate(b, 0.5) + inward * PROBE_OFFSET;
                flat.interior(probe, fill_rule)
            })
            .collect()
    }

    /// Substitute commands by the paths the callbacks return.
    ///
    /// `line` receives `(start, end)` for lines and closing segments,
    /// `bezier` receives cubic control points (quadratics are elevated first),
    /// `arc` receives the start point and the arc payload. A callback's path
    /// is joined onto the result, so a leading `MoveTo` at the segment start
    /// disappears. Commands without a callback are copied.
    pub fn replace(
        &self,
        line: Option<&dyn Fn(Point, Point) -> Path>,
        bezier: Option<&dyn Fn(Point, Point, Point, Point) -> Path>,
        arc: Option<&dyn Fn(Point, &ArcSegment) -> Path>,
    ) -> Path {
        let mut out = Path::new();
        for (start, cmd) in self.segments() {
            let replacement = match cmd {
                Command::MoveTo(_) => None,
                Command::LineTo(p) | Command::Close(p) => line.map(|f| f(start, p)),
                Command::QuadTo(c, p) => bezier.map(|f| {
                    let (c1, c2) = quad_to_cube(start, c, p);
                    f(start, c1, c2, p)
                }),
                Command::CubeTo(c1, c2, p) => bezier.map(|f| f(start, c1, c2, p)),
                Command::ArcTo(a) => arc.map(|f| f(start, &a)),
            };
            match replacement {
                Some(q) => {
                    out.join(&q);
                    if matches!(cmd, Command::Close(_)) {
                        out.close();
                    }
                }
                None => {
                    out.push(cmd);
                }
            }
        }
        out
    }

    /// Replace all curves by line segments deviating at most
    /// `tol.flatness` from the curve.
    pub fn flatten(&self, tol: Tolerance) -> Path {
        let flatness = tol.flatness;
        let bezier = |p0: Point, p1: Point, p2: Point, p3: Point| {
            polyline(p0, flatten_cube(p0, p1, p2, p3, flatness))
        };
        let arc = |start: Point, a: &ArcSegment| polyline(start, a.center(start).flatten(flatness));
        self.replace(None, Some(&bezier), Some(&arc))
    }

    /// Whether the path contains only lines.
    pub fn is_flat(&self) -> bool {
        self.cmds.iter().all(|c| {
            matches!(c, Command::MoveTo(_) | Command::LineTo(_) | Command::Close(_))
        })
    }
}

fn polyline(start: Point, points: Vec<Point>) -> Path {
    let mut p = Path::new();
    p.move_to(start);
    for q in points {
        p.line_to(q);
    }
    p
}
