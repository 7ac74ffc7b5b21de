//! The path command buffer.
//!
//! A [`Path`] is a flat list of [`Command`]s. Every subpath begins with an
//! explicit `MoveTo`; the builder methods insert one when a drawing command
//! is issued on an empty path or right after a `Close`.

pub mod clip;
pub mod decimate;
pub mod format;
pub mod measure;
pub mod parse;
pub mod polyline;
pub mod scanner;
pub mod shapes;
pub mod split;
pub mod transform;

use std::f64::consts::PI;

use crate::geometry::ellipse::{CenterArc, ellipse_pos, ellipse_radii_scale, ellipse_to_center};
use crate::geometry::numeric::angle_norm;
use crate::types::{Point, Tolerance};

pub use format::num;
pub use parse::parse_svg_path;
pub use polyline::Polyline;
pub use scanner::{PathScan, ReverseScanner, Scanner, Values};

/// Equality tolerance used while building paths.
pub(crate) const EPSILON: f64 = Tolerance::DEFAULT.epsilon;

/// Tag of a path command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    MoveTo,
    LineTo,
    QuadTo,
    CubeTo,
    ArcTo,
    Close,
}

/// Payload of an elliptical arc command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSegment {
    pub rx: f64,
    pub ry: f64,
    /// Rotation of the x-radius in radians, within [0, π).
    pub phi: f64,
    pub large: bool,
    /// Counter-clockwise (increasing angle) when true.
    pub sweep: bool,
    pub end: Point,
}

impl ArcSegment {
    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.phi.to_degrees()
    }

    /// Center parameterization for an arc starting at `start`.
    pub fn center(&self, start: Point) -> CenterArc {
        ellipse_to_center(start, self.rx, self.ry, self.phi, self.large, self.sweep, self.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubeTo(Point, Point, Point),
    ArcTo(ArcSegment),
    /// Closes the subpath; holds the subpath start.
    Close(Point),
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::MoveTo(_) => CommandKind::MoveTo,
            Command::LineTo(_) => CommandKind::LineTo,
            Command::QuadTo(..) => CommandKind::QuadTo,
            Command::CubeTo(..) => CommandKind::CubeTo,
            Command::ArcTo(_) => CommandKind::ArcTo,
            Command::Close(_) => CommandKind::Close,
        }
    }

    /// Pen position after the command.
    pub fn end(&self) -> Point {
        match *self {
            Command::MoveTo(p) | Command::LineTo(p) | Command::Close(p) => p,
            Command::QuadTo(_, p) | Command::CubeTo(_, _, p) => p,
            Command::ArcTo(arc) => arc.end,
        }
    }

    /// Whether the two commands match within `eps`.
    pub fn equals(&self, other: &Command, eps: f64) -> bool {
        match (self, other) {
            (Command::MoveTo(a), Command::MoveTo(b))
            | (Command::LineTo(a), Command::LineTo(b))
            | (Command::Close(a), Command::Close(b)) => a.equals(*b, eps),
            (Command::QuadTo(a0, a1), Command::QuadTo(b0, b1)) => {
                a0.equals(*b0, eps) && a1.equals(*b1, eps)
            }
            (Command::CubeTo(a0, a1, a2), Command::CubeTo(b0, b1, b2)) => {
                a0.equals(*b0, eps) && a1.equals(*b1, eps) && a2.equals(*b2, eps)
            }
            (Command::ArcTo(a), Command::ArcTo(b)) => {
                (a.rx - b.rx).abs() <= eps
                    && (a.ry - b.ry).abs() <= eps
                    && (a.phi - b.phi).abs() <= eps
                    && a.large == b.large
                    && a.sweep == b.sweep
                    && a.end.equals(b.end, eps)
            }
            _ => false,
        }
    }
}

/// An ordered sequence of drawing commands forming one or more subpaths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    cmds: Vec<Command>,
    /// Index of the last `MoveTo`.
    start: usize,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap commands that already satisfy the buffer invariants.
    pub(crate) fn from_raw(cmds: Vec<Command>) -> Self {
        let start = cmds
            .iter()
            .rposition(|c| matches!(c, Command::MoveTo(_)))
            .unwrap_or(0);
        Path { cmds, start }
    }

    /// Command slices of each subpath, each beginning with its `MoveTo`.
    pub(crate) fn subpaths(&self) -> impl Iterator<Item = &[Command]> + '_ {
        let mut rest = self.cmds.as_slice();
        std::iter::from_fn(move || {
            if rest.is_empty() {
                return None;
            }
            let n = rest
                .iter()
                .skip(1)
                .position(|c| matches!(c, Command::MoveTo(_)))
                .map_or(rest.len(), |i| i + 1);
            let (head, tail) = rest.split_at(n);
            rest = tail;
            Some(head)
        })
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    /// Current pen position.
    pub fn pos(&self) -> Point {
        self.cmds.last().map(Command::end).unwrap_or(Point::ZERO)
    }

    /// Start of the current subpath.
    pub fn start_pos(&self) -> Point {
        match self.cmds.get(self.start) {
            Some(Command::MoveTo(p)) => *p,
            _ => Point::ZERO,
        }
    }

    /// Whether the last subpath is closed.
    pub fn closed(&self) -> bool {
        matches!(self.cmds.last(), Some(Command::Close(_)))
    }

    /// End points of all commands, `MoveTo`s included.
    pub fn coords(&self) -> Vec<Point> {
        self.cmds.iter().map(Command::end).collect()
    }

    pub fn scanner(&self) -> Scanner<'_> {
        Scanner::new(&self.cmds)
    }

    pub fn reverse_scanner(&self) -> ReverseScanner<'_> {
        ReverseScanner::new(&self.cmds)
    }

    /// Iterate commands paired with their start point.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Command)> + '_ {
        let mut pen = Point::ZERO;
        self.cmds.iter().map(move |cmd| {
            let start = pen;
            pen = cmd.end();
            (start, *cmd)
        })
    }

    /// Whether both paths have the same commands within `eps`.
    pub fn equals(&self, other: &Path, eps: f64) -> bool {
        self.cmds.len() == other.cmds.len()
            && self
                .cmds
                .iter()
                .zip(&other.cmds)
                .all(|(a, b)| a.equals(b, eps))
    }

    // ========================================================================
    // Builder
    // ========================================================================

    fn ensure_subpath(&mut self) {
        if matches!(self.cmds.last(), None | Some(Command::Close(_))) {
            let pos = self.pos();
            self.move_to(pos);
        }
    }

    /// Start a new subpath at `p`. A `MoveTo` directly after another one
    /// replaces it.
    pub fn move_to(&mut self, p: Point) -> &mut Self {
        if let Some(Command::MoveTo(prev)) = self.cmds.last_mut() {
            *prev = p;
            return self;
        }
        self.start = self.cmds.len();
        self.cmds.push(Command::MoveTo(p));
        self
    }

    /// Straight line to `p`; zero-length lines are dropped.
    pub fn line_to(&mut self, p: Point) -> &mut Self {
        if self.pos().equals(p, EPSILON) {
            return self;
        }
        self.ensure_subpath();
        self.cmds.push(Command::LineTo(p));
        self
    }

    /// Quadratic Bézier; becomes a line when the control point coincides
    /// with an end point.
    pub fn quad_to(&mut self, cp: Point, p: Point) -> &mut Self {
        let start = self.pos();
        if cp.equals(start, EPSILON) || cp.equals(p, EPSILON) {
            return self.line_to(p);
        }
        self.ensure_subpath();
        self.cmds.push(Command::QuadTo(cp, p));
        self
    }

    /// Cubic Bézier; becomes a line when both control points coincide with
    /// end points.
    pub fn cube_to(&mut self, cp1: Point, cp2: Point, p: Point) -> &mut Self {
        let start = self.pos();
        let on_end = |c: Point| c.equals(start, EPSILON) || c.equals(p, EPSILON);
        if on_end(cp1) && on_end(cp2) {
            return self.line_to(p);
        }
        self.ensure_subpath();
        self.cmds.push(Command::CubeTo(cp1, cp2, p));
        self
    }

    /// Elliptical arc to `p` with radii `rx`, `ry` and the x-axis rotated
    /// by `rot` degrees counter-clockwise.
    ///
    /// Radii too small to reach `p` are scaled up; a zero radius draws a line.
    pub fn arc_to(&mut self, rx: f64, ry: f64, rot: f64, large: bool, sweep: bool, p: Point) -> &mut Self {
        let start = self.pos();
        if start.equals(p, EPSILON) {
            return self;
        }
        if rx.abs() < EPSILON || ry.abs() < EPSILON {
            return self.line_to(p);
        }

        let mut phi = angle_norm(rot.to_radians());
        if PI <= phi {
            phi -= PI;
        }
        let (rx, ry) = (rx.abs(), ry.abs());
        let scale = ellipse_radii_scale(rx, ry, phi, start, p);
        self.ensure_subpath();
        self.cmds.push(Command::ArcTo(ArcSegment {
            rx: rx * scale,
            ry: ry * scale,
            phi,
            large,
            sweep,
            end: p,
        }));
        self
    }

    /// Arc from the current position along an ellipse, from angle `theta0`
    /// to `theta1` in degrees. Spans over 360 degrees draw a full turn first.
    pub fn arc(&mut self, rx: f64, ry: f64, rot: f64, theta0: f64, theta1: f64) -> &mut Self {
        let phi = rot.to_radians();
        let (t0, t1) = (theta0.to_radians(), theta1.to_radians());
        let dtheta = (t1 - t0).abs();
        let sweep = t0 < t1;
        let large = dtheta % (2.0 * PI) > PI;

        let start = self.pos();
        let center = start - ellipse_pos(rx, ry, phi, Point::ZERO, t0);
        if dtheta > 2.0 * PI {
            let opposite = center * 2.0 - start;
            self.arc_to(rx, ry, rot, false, sweep, opposite);
            self.arc_to(rx, ry, rot, false, sweep, start);
        }
        let end = center + ellipse_pos(rx, ry, phi, Point::ZERO, t1);
        self.arc_to(rx, ry, rot, large, sweep, end)
    }

    /// Close the current subpath. Closing an empty path, a lone `MoveTo` or
    /// an already closed subpath does nothing.
    pub fn close(&mut self) -> &mut Self {
        if matches!(self.cmds.last(), None | Some(Command::MoveTo(_)) | Some(Command::Close(_))) {
            return self;
        }
        let start = self.start_pos();
        if let Some(Command::LineTo(p)) = self.cmds.last() {
            if p.equals(start, EPSILON) {
                self.cmds.pop();
            }
        }
        self.cmds.push(Command::Close(start));
        self
    }

    /// Replay a command through the builder.
    pub fn push(&mut self, cmd: Command) -> &mut Self {
        match cmd {
            Command::MoveTo(p) => self.move_to(p),
            Command::LineTo(p) => self.line_to(p),
            Command::QuadTo(cp, p) => self.quad_to(cp, p),
            Command::CubeTo(cp1, cp2, p) => self.cube_to(cp1, cp2, p),
            Command::ArcTo(a) => self.arc_to(a.rx, a.ry, a.rotation(), a.large, a.sweep, a.end),
            Command::Close(_) => self.close(),
        }
    }

    /// Append a command without any normalization.
    pub(crate) fn push_raw(&mut self, cmd: Command) {
        if matches!(cmd, Command::MoveTo(_)) {
            self.start = self.cmds.len();
        }
        self.cmds.push(cmd);
    }

    /// Concatenate `other` verbatim; the result may be discontinuous.
    pub fn append(&mut self, other: &Path) -> &mut Self {
        for cmd in &other.cmds {
            self.push_raw(*cmd);
        }
        self
    }

    /// Continue this path with `other`, bridging the gap with a line when
    /// `other` does not start at the current position. Paths that end closed
    /// are appended instead.
    pub fn join(&mut self, other: &Path) -> &mut Self {
        if self.is_empty() || self.closed() {
            return self.append(other);
        }
        let mut first = true;
        let mut first_start = Point::ZERO;
        for (i, cmd) in other.cmds.iter().enumerate() {
            match *cmd {
                Command::MoveTo(p) if i == 0 => {
                    first_start = p;
                    self.line_to(p);
                }
                Command::MoveTo(p) => {
                    first = false;
                    self.move_to(p);
                }
                Command::Close(_) if first => {
                    // the joined subpath starts elsewhere now
                    first = false;
                    self.line_to(first_start);
                }
                cmd => {
                    self.push(cmd);
                }
            }
        }
        self
    }
}

impl FromIterator<Command> for Path {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        let mut p = Path::new();
        for cmd in iter {
            p.push(cmd);
        }
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pt;

    fn path(s: &str) -> Path {
        parse_svg_path(s).unwrap()
    }

    // ==================== Builder tests ====================

    #[test]
    fn builder_inserts_move_to() {
        let mut p = Path::new();
        p.line_to(pt(10.0, 0.0));
        assert_eq!(p.commands()[0], Command::MoveTo(pt(0.0, 0.0)));
        assert_eq!(p.to_string(), "M0 0L10 0");
    }

    #[test]
    fn builder_collapses_move_tos() {
        let mut p = Path::new();
        p.move_to(pt(1.0, 1.0)).move_to(pt(2.0, 2.0)).line_to(pt(3.0, 3.0));
        assert_eq!(p.to_string(), "M2 2L3 3");
        assert_eq!(p.start_pos(), pt(2.0, 2.0));
    }

    #[test]
    fn builder_drops_degenerate_segments() {
        let mut p = Path::new();
        p.move_to(pt(1.0, 1.0))
            .line_to(pt(1.0, 1.0))
            .quad_to(pt(1.0, 1.0), pt(5.0, 1.0))
            .cube_to(pt(5.0, 1.0), pt(9.0, 1.0), pt(9.0, 1.0))
            .arc_to(2.0, 2.0, 0.0, false, false, pt(9.0, 1.0))
            .arc_to(0.0, 2.0, 0.0, false, false, pt(12.0, 1.0));
        assert_eq!(p.to_string(), "M1 1L5 1L9 1L12 1");
    }

    #[test]
    fn builder_normalizes_arcs() {
        let mut p = Path::new();
        p.arc_to(-1.0, 1.0, 270.0, false, true, pt(4.0, 0.0));
        match p.commands()[1] {
            Command::ArcTo(a) => {
                // rotated 90 degrees, scaled to reach the end point
                assert!((a.phi - PI / 2.0).abs() < 1e-12);
                assert!((a.rx - 2.0).abs() < 1e-12);
                assert!((a.ry - 2.0).abs() < 1e-12);
            }
            cmd => panic!("expected arc, got {cmd:?}"),
        }
    }

    #[test]
    fn close_policy() {
        let mut p = Path::new();
        p.close();
        assert!(p.is_empty());

        p.move_to(pt(1.0, 1.0)).close();
        assert_eq!(p.to_string(), "M1 1");

        p.line_to(pt(5.0, 1.0)).line_to(pt(5.0, 5.0)).line_to(pt(1.0, 1.0)).close().close();
        assert_eq!(p.to_string(), "M1 1L5 1L5 5z");
        assert!(p.closed());
        assert_eq!(p.pos(), pt(1.0, 1.0));
    }

    #[test]
    fn drawing_after_close_starts_new_subpath() {
        let mut p = path("M1 1L5 1L5 5z");
        p.line_to(pt(0.0, 9.0));
        assert_eq!(p.to_string(), "M1 1L5 1L5 5zM1 1L0 9");
    }

    #[test]
    fn arc_by_angles() {
        let mut p = Path::new();
        p.move_to(pt(1.0, 0.0)).arc(1.0, 1.0, 0.0, 0.0, 90.0);
        assert!(p.pos().equals(pt(0.0, 1.0), 1e-12));

        let mut full = Path::new();
        full.move_to(pt(1.0, 0.0)).arc(1.0, 1.0, 0.0, 0.0, 450.0);
        assert_eq!(full.len(), 4);
        assert!(full.pos().equals(pt(0.0, 1.0), 1e-12));
    }

    // ==================== Append/Join tests ====================

    #[test]
    fn append_is_verbatim() {
        let mut p = path("M0 0L1 0");
        p.append(&path("M5 5L6 5"));
        assert_eq!(p.to_string(), "M0 0L1 0M5 5L6 5");
        assert_eq!(p.start_pos(), pt(5.0, 5.0));
    }

    #[test]
    fn join_bridges_gaps() {
        let mut p = path("M0 0L1 0");
        p.join(&path("M5 5L6 5"));
        assert_eq!(p.to_string(), "M0 0L1 0L5 5L6 5");

        let mut q = path("M0 0L1 0");
        q.join(&path("M1 0L1 1"));
        assert_eq!(q.to_string(), "M0 0L1 0L1 1");

        let mut empty = Path::new();
        empty.join(&path("M1 0L1 1"));
        assert_eq!(empty.to_string(), "M1 0L1 1");
    }

    #[test]
    fn join_keeps_closed_geometry() {
        let mut p = path("M0 0L1 0");
        p.join(&path("M1 0L2 0L2 2z"));
        assert_eq!(p.to_string(), "M0 0L1 0L2 0L2 2L1 0");
    }

    #[test]
    fn segments_pair_start_points() {
        let p = path("M1 2L3 4L5 6");
        let starts: Vec<Point> = p.segments().map(|(s, _)| s).collect();
        assert_eq!(starts, vec![pt(0.0, 0.0), pt(1.0, 2.0), pt(3.0, 4.0)]);
        assert_eq!(p.coords(), vec![pt(1.0, 2.0), pt(3.0, 4.0), pt(5.0, 6.0)]);
    }

    #[test]
    fn equality_within_tolerance() {
        let a = path("M0 0L10 0");
        let b = path("M0 0L10.0000001 0");
        assert!(a.equals(&b, 1e-6));
        assert!(!a.equals(&b, 1e-9));
        assert!(!a.equals(&path("M0 0L10 0L10 1"), 1e-6));
    }
}
