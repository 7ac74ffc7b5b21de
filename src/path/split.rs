//! Splitting paths into subpaths and at arc-length positions.

use std::mem;

use super::{ArcSegment, Command, EPSILON, Path};
use crate::geometry::CenterArc;
use crate::geometry::bezier::{cube_inverse_length, quad_to_cube, split_cube, split_quad};
use crate::types::Point;

/// Parameter `t` of the whole curve expressed on the remainder that starts
/// at `t0`.
fn sub_param(t: f64, t0: f64) -> f64 {
    if 1.0 - t0 < EPSILON {
        return 1.0;
    }
    ((t - t0) / (1.0 - t0)).clamp(0.0, 1.0)
}

/// Walks a path while cutting it at increasing arc-length positions.
struct Cutter<'a> {
    cuts: &'a [f64],
    next: usize,
    /// Length walked before the current segment.
    walked: f64,
    pieces: Vec<Path>,
    cur: Path,
}

impl<'a> Cutter<'a> {
    fn new(cuts: &'a [f64]) -> Self {
        Cutter {
            cuts,
            next: 0,
            walked: 0.0,
            pieces: Vec::new(),
            cur: Path::new(),
        }
    }

    /// Offset of the next cut into a segment of length `len`, if it falls
    /// inside it.
    fn pending(&self, len: f64) -> Option<f64> {
        let t = *self.cuts.get(self.next)?;
        (self.walked < t && t <= self.walked + len).then(|| t - self.walked)
    }

    fn cut(&mut self, at: Point) {
        let piece = mem::take(&mut self.cur);
        self.pieces.push(piece);
        self.cur.move_to(at);
        self.next += 1;
    }

    fn line(&mut self, start: Point, end: Point) {
        let len = start.distance(end);
        while let Some(l) = self.pending(len) {
            let p = start.interpolate(end, l / len);
            self.cur.line_to(p);
            self.cut(p);
        }
        self.cur.line_to(end);
        self.walked += len;
    }

    fn quad(&mut self, start: Point, cp: Point, end: Point) {
        let (c1, c2) = quad_to_cube(start, cp, end);
        let (inv, len) = cube_inverse_length(start, c1, c2, end);
        let mut t0 = 0.0;
        let mut rest = [start, cp, end];
        while let Some(l) = self.pending(len) {
            let t = inv.eval(l);
            let (head, tail) = split_quad(rest[0], rest[1], rest[2], sub_param(t, t0));
            t0 = t;
            rest = tail;
            self.cur.quad_to(head[1], head[2]);
            self.cut(head[2]);
        }
        if 1.0 - t0 > EPSILON {
            self.cur.quad_to(rest[1], rest[2]);
        }
        self.walked += len;
    }

    fn cube(&mut self, start: Point, cp1: Point, cp2: Point, end: Point) {
        let (inv, len) = cube_inverse_length(start, cp1, cp2, end);
        let mut t0 = 0.0;
        let mut rest = [start, cp1, cp2, end];
        while let Some(l) = self.pending(len) {
            let t = inv.eval(l);
            let (head, tail) = split_cube(rest[0], rest[1], rest[2], rest[3], sub_param(t, t0));
            t0 = t;
            rest = tail;
            self.cur.cube_to(head[1], head[2], head[3]);
            self.cut(head[3]);
        }
        if 1.0 - t0 > EPSILON {
            self.cur.cube_to(rest[1], rest[2], rest[3]);
        }
        self.walked += len;
    }

    fn arc(&mut self, start: Point, a: &ArcSegment) {
        let c = a.center(start);
        let (inv, len) = c.inverse_length();
        let mut from = c.theta0;
        let mut large = a.large;
        while let Some(l) = self.pending(len) {
            let theta = inv.eval(l);
            let rest = CenterArc { theta0: from, ..c };
            match rest.split(theta) {
                Some((mid, large0, large1)) => {
                    self.cur.arc_to(a.rx, a.ry, a.rotation(), large0, a.sweep, mid);
                    self.cut(mid);
                    from = theta;
                    large = large1;
                }
                None => self.next += 1,
            }
        }
        if (c.theta1 - from).abs() > EPSILON {
            self.cur.arc_to(a.rx, a.ry, a.rotation(), large, a.sweep, a.end);
        }
        self.walked += len;
    }
}

impl Path {
    /// One path per subpath.
    pub fn split(&self) -> Vec<Path> {
        self.subpaths().map(|cmds| Path::from_raw(cmds.to_vec())).collect()
    }

    /// Cut the path at the given distances along it. Every piece starts with
    /// a `MoveTo`; a cut subpath loses its `Close`, which becomes a line.
    /// Distances outside the open interval (0, length) are ignored.
    pub fn split_at(&self, lengths: &[f64]) -> Vec<Path> {
        let total = self.length();
        let mut cuts: Vec<f64> = lengths.iter().copied().filter(|&l| 0.0 < l && l < total).collect();
        cuts.sort_by(f64::total_cmp);
        cuts.dedup();
        if cuts.is_empty() {
            return if self.is_empty() { Vec::new() } else { vec![self.clone()] };
        }

        let mut cutter = Cutter::new(&cuts);
        for cmds in self.subpaths() {
            let cut_before = cutter.next;
            let mut start = Point::ZERO;
            for cmd in cmds {
                match *cmd {
                    Command::MoveTo(p) => {
                        cutter.cur.move_to(p);
                    }
                    Command::LineTo(p) => cutter.line(start, p),
                    Command::QuadTo(cp, p) => cutter.quad(start, cp, p),
                    Command::CubeTo(cp1, cp2, p) => cutter.cube(start, cp1, cp2, p),
                    Command::ArcTo(a) => cutter.arc(start, &a),
                    Command::Close(p) => {
                        let len = start.distance(p);
                        if cutter.next == cut_before && cutter.pending(len).is_none() {
                            cutter.cur.close();
                            cutter.walked += len;
                        } else {
                            cutter.line(start, p);
                        }
                    }
                }
                start = cmd.end();
            }
        }

        let mut pieces = cutter.pieces;
        if cutter.cur.len() > 1 {
            pieces.push(cutter.cur);
        }
        pieces
    }
}
