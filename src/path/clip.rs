//! Clipping against an axis-aligned rectangle.
//!
//! Closed subpaths are clipped as polygons (Sutherland–Hodgman) so that they
//! stay closed along the rectangle border; open subpaths are clipped segment
//! by segment (Liang–Barsky) and may fall apart into several pieces.

use super::{EPSILON, Path};
use crate::types::{Point, Rect, Tolerance};

#[derive(Clone, Copy)]
enum Edge {
    Left(f64),
    Right(f64),
    Bottom(f64),
    Top(f64),
}

impl Edge {
    fn inside(self, p: Point) -> bool {
        match self {
            Edge::Left(x) => x <= p.x,
            Edge::Right(x) => p.x <= x,
            Edge::Bottom(y) => y <= p.y,
            Edge::Top(y) => p.y <= y,
        }
    }

    /// Where segment `ab` crosses the edge's line.
    fn cross(self, a: Point, b: Point) -> Point {
        match self {
            Edge::Left(x) | Edge::Right(x) => a.interpolate(b, (x - a.x) / (b.x - a.x)),
            Edge::Bottom(y) | Edge::Top(y) => a.interpolate(b, (y - a.y) / (b.y - a.y)),
        }
    }
}

fn clip_polygon(points: Vec<Point>, rect: &Rect) -> Vec<Point> {
    let edges = [
        Edge::Left(rect.min.x),
        Edge::Right(rect.max.x),
        Edge::Bottom(rect.min.y),
        Edge::Top(rect.max.y),
    ];
    edges.into_iter().fold(points, |input, edge| {
        let mut out = Vec::with_capacity(input.len() + 2);
        let Some(&last) = input.last() else {
            return out;
        };
        let mut prev = last;
        for &cur in &input {
            match (edge.inside(prev), edge.inside(cur)) {
                (true, true) => out.push(cur),
                (false, true) => {
                    out.push(edge.cross(prev, cur));
                    out.push(cur);
                }
                (true, false) => out.push(edge.cross(prev, cur)),
                (false, false) => {}
            }
            prev = cur;
        }
        out
    })
}

/// Part of segment `ab` inside `rect`.
fn clip_segment(a: Point, b: Point, rect: &Rect) -> Option<(Point, Point)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-d.x, a.x - rect.min.x),
        (d.x, rect.max.x - a.x),
        (-d.y, a.y - rect.min.y),
        (d.y, rect.max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
        if t1 < t0 {
            return None;
        }
    }
    if (t1 - t0) * d.length() < EPSILON {
        return None;
    }
    Some((a + d * t0, a + d * t1))
}

impl Path {
    /// The part of the path inside `rect`. Curves are flattened first unless
    /// the whole path already lies inside.
    pub fn clip(&self, rect: Rect, tol: Tolerance) -> Path {
        let bounds = self.bounds();
        if bounds.is_empty() || !bounds.overlaps(&rect) {
            return Path::new();
        }
        if rect.contains(bounds.min) && rect.contains(bounds.max) {
            return self.clone();
        }

        let mut out = Path::new();
        for cmds in self.subpaths() {
            let flat = Path::from_raw(cmds.to_vec()).flatten(tol);
            let closed = flat.closed();
            let mut points = flat.coords();
            if closed {
                points.pop();
            }

            if closed {
                let poly = clip_polygon(points, &rect);
                if poly.len() < 3 {
                    continue;
                }
                let mut sub = Path::new();
                sub.move_to(poly[0]);
                for p in &poly[1..] {
                    sub.line_to(*p);
                }
                sub.close();
                if sub.len() > 3 {
                    out.append(&sub);
                }
            } else {
                let mut sub = Path::new();
                for w in points.windows(2) {
                    let Some((a, b)) = clip_segment(w[0], w[1], &rect) else {
                        continue;
                    };
                    if sub.is_empty() || !sub.pos().equals(a, EPSILON) {
                        sub.move_to(a);
                    }
                    sub.line_to(b);
                }
                out.append(&sub);
            }
        }
        out
    }
}
