//! Boolean operations on filled paths.
//!
//! Both operands are flattened and every subpath is treated as closed. All
//! edges of both operands are cut wherever they meet another edge, so the
//! pieces only touch at shared vertices. A piece is kept when the result
//! region lies on exactly one side of it, judged by the winding numbers of
//! the operands just left and right of its midpoint, and it is oriented to
//! have the result on its left. The kept pieces are stitched into loops,
//! taking the sharpest left turn wherever several loops touch.
//!
//! Coincident edges from both operands become identical pieces after
//! cutting. They are classified by the same probes and kept once, so shared
//! boundaries are either dropped (when the result lies on both sides or on
//! neither) or appear a single time.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::geometry::intersect::{intersect_lines, point_segment_distance};
use crate::log::{debug, warn};
use crate::path::Path;
use crate::style::FillRule;
use crate::types::{Point, Tolerance};

/// Distance under which two vertices are the same.
const SNAP: f64 = 1e-9;

/// Distance of the side probes from a piece.
const PROBE: f64 = 1e-7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BooleanOp {
    /// Inside both operands.
    And,
    /// Inside either operand.
    Or,
    /// Inside exactly one operand.
    Xor,
    /// Inside the first operand but not the second.
    Not,
}

impl BooleanOp {
    fn keeps(self, in_a: bool, in_b: bool) -> bool {
        match self {
            BooleanOp::And => in_a && in_b,
            BooleanOp::Or => in_a || in_b,
            BooleanOp::Xor => in_a != in_b,
            BooleanOp::Not => in_a && !in_b,
        }
    }
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BooleanOp::And => "and",
            BooleanOp::Or => "or",
            BooleanOp::Xor => "xor",
            BooleanOp::Not => "not",
        })
    }
}

/// Closed rings of the flattened path, without repeating the first vertex.
fn rings(p: &Path, tol: Tolerance) -> Vec<Vec<Point>> {
    p.flatten(tol)
        .split()
        .iter()
        .filter_map(|sub| {
            let mut ring: Vec<Point> = Vec::with_capacity(sub.len());
            for cmd in sub.commands() {
                let q = cmd.end();
                if ring.last().is_none_or(|r| !r.equals(q, SNAP)) {
                    ring.push(q);
                }
            }
            while ring.len() > 1 && ring[0].equals(ring[ring.len() - 1], SNAP) {
                ring.pop();
            }
            (ring.len() > 2).then_some(ring)
        })
        .collect()
}

fn ring_path(rings: &[Vec<Point>]) -> Path {
    let mut p = Path::new();
    for ring in rings {
        p.move_to(ring[0]);
        for q in &ring[1..] {
            p.line_to(*q);
        }
        p.close();
    }
    p
}

/// Vertex set where points closer than `SNAP` share one index.
#[derive(Default)]
struct Vertices {
    points: Vec<Point>,
}

impl Vertices {
    fn index(&mut self, p: Point) -> usize {
        match self.points.iter().position(|q| q.equals(p, SNAP)) {
            Some(i) => i,
            None => {
                self.points.push(p);
                self.points.len() - 1
            }
        }
    }
}

struct Segment {
    a: Point,
    b: Point,
    /// Parameters where the segment is cut, 0 and 1 included.
    cuts: Vec<f64>,
}

fn segments(rings: &[Vec<Point>]) -> impl Iterator<Item = Segment> + '_ {
    rings.iter().flat_map(|ring| {
        (0..ring.len()).map(move |i| Segment {
            a: ring[i],
            b: ring[(i + 1) % ring.len()],
            cuts: vec![0.0, 1.0],
        })
    })
}

/// Parameter of `p` along `ab` when it lies on the segment.
fn param_on(p: Point, a: Point, b: Point) -> Option<f64> {
    if point_segment_distance(p, a, b) > SNAP {
        return None;
    }
    let d = b - a;
    Some(((p - a).dot(d) / d.dot(d)).clamp(0.0, 1.0))
}

/// Cut every pair of segments where they cross, touch or overlap.
fn cut_segments(segs: &mut [Segment]) -> usize {
    let mut hits = 0;
    for i in 0..segs.len() {
        for j in i + 1..segs.len() {
            let (a0, a1, b0, b1) = (segs[i].a, segs[i].b, segs[j].a, segs[j].b);
            match intersect_lines(a0, a1, b0, b1, SNAP) {
                Some(hit) => {
                    segs[i].cuts.push(hit.ta);
                    segs[j].cuts.push(hit.tb);
                    hits += 1;
                }
                // parallel: cut at the end points lying on the other segment
                None => {
                    for t in [b0, b1].into_iter().filter_map(|p| param_on(p, a0, a1)) {
                        segs[i].cuts.push(t);
                    }
                    for t in [a0, a1].into_iter().filter_map(|p| param_on(p, b0, b1)) {
                        segs[j].cuts.push(t);
                    }
                }
            }
        }
    }
    hits
}

/// Drop vertices on a straight line between their neighbours.
fn merge_collinear(mut ring: Vec<Point>) -> Vec<Point> {
    let mut i = 0;
    while ring.len() > 2 && i < ring.len() {
        let n = ring.len();
        let (prev, cur, next) = (ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]);
        let (d0, d1) = (cur - prev, next - cur);
        if d0.perp_dot(d1).abs() <= SNAP * d0.length().max(d1.length()) && d0.dot(d1) > 0.0 {
            ring.remove(i);
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }
    ring
}

/// Order by height, then from left to right; heights closer than `SNAP`
/// count as equal.
fn lower_left(p: &Point, q: &Point) -> Ordering {
    if (p.y - q.y).abs() > SNAP {
        p.y.total_cmp(&q.y)
    } else {
        p.x.total_cmp(&q.x)
    }
}

/// Rotate the ring to start at its lowest, then leftmost vertex.
fn canonical_start(mut ring: Vec<Point>) -> Vec<Point> {
    let first = ring
        .iter()
        .enumerate()
        .min_by(|(_, p), (_, q)| lower_left(p, q))
        .map(|(i, _)| i)
        .unwrap_or(0);
    ring.rotate_left(first);
    ring
}

/// Follow the directed edges into loops.
fn stitch(points: &[Point], edges: &[(usize, usize)]) -> Vec<Vec<Point>> {
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); points.len()];
    for (e, &(u, _)) in edges.iter().enumerate() {
        outgoing[u].push(e);
    }
    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();

    for e0 in 0..edges.len() {
        if used[e0] {
            continue;
        }
        let origin = edges[e0].0;
        let mut ring = Vec::new();
        let mut e = e0;
        loop {
            used[e] = true;
            let (u, v) = edges[e];
            ring.push(points[u]);
            if v == origin {
                break;
            }
            let d_in = points[v] - points[u];
            let next = outgoing[v]
                .iter()
                .copied()
                .filter(|&f| !used[f])
                .map(|f| {
                    let d_out = points[edges[f].1] - points[v];
                    (f, d_in.perp_dot(d_out).atan2(d_in.dot(d_out)))
                })
                .max_by(|x, y| x.1.total_cmp(&y.1));
            match next {
                Some((f, _)) => e = f,
                None => {
                    warn!(vertex = v, "boolean edge graph is not closed");
                    ring.push(points[v]);
                    break;
                }
            }
        }
        let ring = merge_collinear(ring);
        if ring.len() > 2 {
            loops.push(canonical_start(ring));
        }
    }
    loops.sort_by(|r, s| lower_left(&r[0], &s[0]));
    loops
}

/// Boundary loops of the region selected by `inside`, built from the edges
/// of `rings` after cutting them against each other.
fn outline(rings: &[Vec<Point>], inside: impl Fn(Point) -> bool) -> Vec<Vec<Point>> {
    let mut segs: Vec<Segment> = segments(rings).collect();
    let _hits = cut_segments(&mut segs);

    let mut vertices = Vertices::default();
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for seg in &mut segs {
        seg.cuts.sort_by(f64::total_cmp);
        let d = seg.b - seg.a;
        let side = d.rot90().norm(PROBE);
        for w in seg.cuts.windows(2) {
            let (p, q) = (seg.a + d * w[0], seg.a + d * w[1]);
            let (u, v) = (vertices.index(p), vertices.index(q));
            if u == v {
                continue;
            }
            let mid = p.interpolate(q, 0.5);
            let (left, right) = (inside(mid + side), inside(mid - side));
            let edge = match (left, right) {
                (true, false) => (u, v),
                (false, true) => (v, u),
                _ => continue,
            };
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }
    debug!(intersections = _hits, edges = edges.len(), "operands cut");

    stitch(&vertices.points, &edges)
}

impl Path {
    /// Combine the filled regions of two paths. Curves are flattened first,
    /// open subpaths count as closed, and both operands are filled with
    /// `fill_rule`. Outer boundaries of the result run counter-clockwise and
    /// holes clockwise.
    pub fn boolean(&self, other: &Path, op: BooleanOp, fill_rule: FillRule, tol: Tolerance) -> Path {
        let (ra, rb) = (rings(self, tol), rings(other, tol));
        let (pa, pb) = (ring_path(&ra), ring_path(&rb));
        let in_a = |p: Point| fill_rule.fills(pa.windings(p));
        let in_b = |p: Point| fill_rule.fills(pb.windings(p));

        if !ra.is_empty() && !rb.is_empty() && !pa.bounds().overlaps(&pb.bounds()) {
            // nothing to cut across operands: outline each one on its own
            debug!(%op, "boolean operands are disjoint");
            let mut loops = match op {
                BooleanOp::And => Vec::new(),
                BooleanOp::Not => outline(&ra, in_a),
                BooleanOp::Or | BooleanOp::Xor => {
                    let mut loops = outline(&ra, in_a);
                    loops.extend(outline(&rb, in_b));
                    loops
                }
            };
            loops.sort_by(|r, s| lower_left(&r[0], &s[0]));
            return ring_path(&loops);
        }

        let loops = outline(&[ra, rb].concat(), |p| op.keeps(in_a(p), in_b(p)));
        debug!(%op, loops = loops.len(), "boolean operation");
        ring_path(&loops)
    }

    /// Remove self-overlaps: the outline of the region `fill_rule` fills,
    /// with counter-clockwise outer boundaries and clockwise holes.
    pub fn settle(&self, fill_rule: FillRule, tol: Tolerance) -> Path {
        self.boolean(&Path::new(), BooleanOp::Or, fill_rule, tol)
    }

    pub fn and(&self, other: &Path) -> Path {
        self.boolean(other, BooleanOp::And, FillRule::NonZero, Tolerance::DEFAULT)
    }

    pub fn or(&self, other: &Path) -> Path {
        self.boolean(other, BooleanOp::Or, FillRule::NonZero, Tolerance::DEFAULT)
    }

    pub fn xor(&self, other: &Path) -> Path {
        self.boolean(other, BooleanOp::Xor, FillRule::NonZero, Tolerance::DEFAULT)
    }

    /// The part of `self` outside `other`.
    pub fn not(&self, other: &Path) -> Path {
        self.boolean(other, BooleanOp::Not, FillRule::NonZero, Tolerance::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse_svg_path;
    use crate::path::shapes::{circle, rectangle};
    use crate::types::pt;

    fn path(s: &str) -> Path {
        parse_svg_path(s).unwrap()
    }

    fn square(x: f64, y: f64, size: f64) -> Path {
        rectangle(size, size).translate(x, y)
    }

    fn assert_area(p: &Path, area: f64) {
        assert!((p.signed_area() - area).abs() < 1e-6, "area of {p} is {}, expected {area}", p.signed_area());
    }

    // ==================== Overlap tests ====================

    #[test]
    fn and_of_triangles() {
        let a = path("L10 0L5 10z");
        let b = path("M0 5L10 5L5 15z");
        assert_eq!(a.and(&b).to_string(), "M2.5 5L7.5 5L5 10z");
        assert!(a.and(&b).equals(&b.and(&a), 1e-9));
    }

    #[test]
    fn overlapping_squares() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 5.0, 10.0);
        assert_eq!(a.and(&b).to_string(), "M5 5L10 5L10 10L5 10z");
        assert_eq!(a.or(&b).to_string(), "M0 0L10 0L10 5L15 5L15 15L5 15L5 10L0 10z");
        assert_eq!(a.not(&b).to_string(), "M0 0L10 0L10 5L5 5L5 10L0 10z");
        assert_area(&a.xor(&b), 150.0);
        assert!(!a.xor(&b).interior(pt(7.5, 7.5), FillRule::NonZero));
        assert!(a.xor(&b).interior(pt(12.5, 12.5), FillRule::NonZero));
    }

    #[test]
    fn clockwise_operands_are_normalized() {
        let a = square(0.0, 0.0, 10.0).reverse();
        assert!(!a.ccw());
        let b = square(5.0, 5.0, 10.0);
        assert_eq!(a.and(&b).to_string(), "M5 5L10 5L10 10L5 10z");
    }

    // ==================== Identity tests ====================

    #[test]
    fn identity_laws() {
        for a in [square(0.0, 0.0, 10.0), path("M0 0L20 0L10 5L20 10L0 10z"), circle(5.0)] {
            let or = a.or(&a);
            assert!(or.ccw());
            let flat = a.flatten(Tolerance::DEFAULT);
            assert!((or.signed_area() - flat.signed_area()).abs() < 1e-6, "{a}");
            assert!(a.and(&a).equals(&or, 1e-9));
            assert!(a.xor(&a).is_empty());
            assert!(a.not(&a).is_empty());
        }
        let a = square(0.0, 0.0, 10.0);
        assert_eq!(a.or(&a), a);
    }

    #[test]
    fn commutative() {
        let a = circle(5.0);
        let b = square(0.0, -2.0, 8.0);
        assert!(a.and(&b).equals(&b.and(&a), 1e-9));
        assert!(a.or(&b).equals(&b.or(&a), 1e-9));
        assert!(a.xor(&b).equals(&b.xor(&a), 1e-9));
    }

    // ==================== Degenerate tests ====================

    #[test]
    fn disjoint_operands() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(20.0, 0.0, 10.0);
        assert!(a.and(&b).is_empty());
        assert_eq!(a.or(&b).to_string(), format!("{a}{b}"));
        assert_eq!(a.not(&b), a);
    }

    #[test]
    fn disjoint_operands_follow_the_fill_rule() {
        let twice = {
            let mut p = square(0.0, 0.0, 10.0);
            p.append(&square(5.0, 5.0, 10.0));
            p
        };
        let near = square(12.0, 0.0, 2.0);
        let far = square(40.0, 0.0, 10.0);
        let tol = Tolerance::DEFAULT;
        for other in [&near, &far] {
            let or = twice.boolean(other, BooleanOp::Or, FillRule::EvenOdd, tol);
            assert!(!or.interior(pt(7.0, 7.0), FillRule::NonZero), "{or}");
            assert!(or.interior(pt(2.0, 2.0), FillRule::NonZero), "{or}");
        }
        let far_or = twice.boolean(&far, BooleanOp::Or, FillRule::EvenOdd, tol);
        assert_area(&far_or, 150.0 + 100.0);
        let far_not = twice.boolean(&far, BooleanOp::Not, FillRule::EvenOdd, tol);
        assert_area(&far_not, 150.0);
    }

    #[test]
    fn disjoint_clockwise_operand_is_normalized() {
        let cw = square(0.0, 0.0, 10.0).reverse();
        let far = square(20.0, 0.0, 10.0);
        let or = cw.or(&far);
        assert!(or.split()[0].ccw());
        assert_eq!(or.to_string(), format!("{}{far}", square(0.0, 0.0, 10.0)));
        assert_eq!(cw.not(&far), square(0.0, 0.0, 10.0));
    }

    #[test]
    fn contained_operand_makes_a_hole() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(3.0, 3.0, 4.0);
        let d = a.not(&b);
        assert_eq!(d.split().len(), 2);
        assert_area(&d, 84.0);
        assert!(!d.interior(pt(5.0, 5.0), FillRule::NonZero));
        assert!(d.interior(pt(1.0, 5.0), FillRule::NonZero));
        assert_eq!(a.and(&b), b);
        assert_eq!(a.or(&b), a);
    }

    #[test]
    fn shared_edge() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(10.0, 0.0, 10.0);
        assert_eq!(a.or(&b).to_string(), "M0 0L20 0L20 10L0 10z");
        assert!(a.and(&b).is_empty());
        assert_eq!(a.not(&b), a);

        // partial overlap of the shared edge
        let c = square(10.0, 5.0, 10.0);
        assert_eq!(a.or(&c).to_string(), "M0 0L10 0L10 5L20 5L20 15L10 15L10 10L0 10z");
    }

    #[test]
    fn touching_corners_stay_separate() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(10.0, 10.0, 10.0);
        let or = a.or(&b);
        assert_eq!(or.to_string(), "M0 0L10 0L10 10L0 10zM10 10L20 10L20 20L10 20z");
    }

    #[test]
    fn fill_rule_resolves_self_overlap() {
        let twice = {
            let mut p = square(0.0, 0.0, 10.0);
            p.append(&square(5.0, 5.0, 10.0));
            p
        };
        let empty = Path::new();
        let nonzero = twice.boolean(&empty, BooleanOp::Or, FillRule::NonZero, Tolerance::DEFAULT);
        assert_area(&nonzero, 175.0);
        let evenodd = twice.boolean(&empty, BooleanOp::Or, FillRule::EvenOdd, Tolerance::DEFAULT);
        assert_area(&evenodd, 150.0);
        assert!(twice.and(&empty).is_empty());
    }

    #[test]
    fn settle_merges_overlaps() {
        let twice = {
            let mut p = square(0.0, 0.0, 10.0);
            p.append(&square(5.0, 5.0, 10.0));
            p
        };
        let settled = twice.settle(FillRule::NonZero, Tolerance::DEFAULT);
        assert_eq!(settled.to_string(), "M0 0L10 0L10 5L15 5L15 15L5 15L5 10L0 10z");

        let holed = twice.settle(FillRule::EvenOdd, Tolerance::DEFAULT);
        assert_area(&holed, 150.0);
        assert!(!holed.interior(pt(7.0, 7.0), FillRule::NonZero));

        let cw = square(0.0, 0.0, 10.0).reverse();
        assert_eq!(cw.settle(FillRule::NonZero, Tolerance::DEFAULT), square(0.0, 0.0, 10.0));
        assert!(Path::new().settle(FillRule::NonZero, Tolerance::DEFAULT).is_empty());
    }
}
