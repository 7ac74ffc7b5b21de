//! Point reduction for flat paths (Visvalingam–Whyatt).

use super::{Command, Path};
use crate::heap::IndexedHeap;
use crate::types::Point;

#[derive(Clone, Copy, Debug)]
struct Vertex {
    p: Point,
    /// Area of the triangle with both neighbours.
    area: f64,
    prev: usize,
    next: usize,
}

fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    0.5 * (b - a).perp_dot(c - a).abs()
}

/// Heap order: smallest area first, ties by position.
fn by_area(vs: &[Vertex], a: usize, b: usize) -> bool {
    vs[a].area.total_cmp(&vs[b].area).then(a.cmp(&b)).is_lt()
}

fn area_at(vs: &[Vertex], i: usize) -> f64 {
    let v = &vs[i];
    triangle_area(vs[v.prev].p, v.p, vs[v.next].p)
}

/// Decimate one subpath given by its vertices. `None` drops the subpath.
fn decimate_vertices(points: &[Point], closed: bool, tolerance: f64) -> Option<Vec<Point>> {
    let n = points.len();
    let min_len = if closed { 3 } else { 2 };
    if n < min_len {
        return Some(points.to_vec());
    }

    let mut vs: Vec<Vertex> = points
        .iter()
        .enumerate()
        .map(|(i, &p)| Vertex {
            p,
            area: 0.0,
            prev: if i == 0 { n - 1 } else { i - 1 },
            next: if i + 1 == n { 0 } else { i + 1 },
        })
        .collect();

    // the first point always stays, the last one too for open paths
    let removable = |i: usize| i != 0 && (closed || i + 1 != n);
    for i in (0..n).filter(|&i| removable(i)) {
        vs[i].area = area_at(&vs, i);
    }

    let mut heap = IndexedHeap::with_capacity(n);
    for i in (0..n).filter(|&i| removable(i)) {
        heap.push(i, &|a: usize, b: usize| by_area(&vs, a, b));
    }

    let mut left = n;
    while left > min_len {
        let Some(i) = heap.peek() else {
            break;
        };
        if vs[i].area > tolerance {
            break;
        }
        heap.pop(&|a: usize, b: usize| by_area(&vs, a, b));
        let Vertex { prev, next, .. } = vs[i];
        vs[prev].next = next;
        vs[next].prev = prev;
        left -= 1;

        for j in [prev, next] {
            if heap.contains(j) {
                vs[j].area = area_at(&vs, j);
                heap.fix(j, &|a: usize, b: usize| by_area(&vs, a, b));
            }
        }
    }

    let mut out = Vec::with_capacity(left);
    let mut i = 0;
    loop {
        out.push(vs[i].p);
        i = vs[i].next;
        if i == 0 || out.len() == left {
            break;
        }
    }

    if closed && left == 3 && triangle_area(out[0], out[1], out[2]) < tolerance {
        return None;
    }
    Some(out)
}

impl Path {
    /// Remove vertices whose triangle with their neighbours has an area of
    /// at most `tolerance`, smallest first. The first point of every subpath
    /// stays, and the last one too when the subpath is open. A closed
    /// subpath that shrinks to a triangle smaller than `tolerance` is
    /// dropped.
    ///
    /// Only end points are considered, so curved paths should be flattened
    /// first.
    pub fn decimate(&self, tolerance: f64) -> Path {
        let mut out = Path::new();
        for cmds in self.subpaths() {
            let closed = matches!(cmds.last(), Some(Command::Close(_)));
            let body = if closed { &cmds[..cmds.len() - 1] } else { cmds };
            let points: Vec<Point> = body.iter().map(Command::end).collect();
            let Some(kept) = decimate_vertices(&points, closed, tolerance) else {
                continue;
            };
            if kept.len() == points.len() {
                out.append(&Path::from_raw(cmds.to_vec()));
                continue;
            }

            let mut sub = Path::new();
            sub.move_to(kept[0]);
            for p in &kept[1..] {
                sub.line_to(*p);
            }
            if closed {
                sub.close();
            }
            out.append(&sub);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse_svg_path;

    fn path(s: &str) -> Path {
        parse_svg_path(s).unwrap()
    }

    // ==================== Decimate tests ====================

    #[test]
    fn decimate_closed() {
        let p = path("M0 0L10 0L10 4L11 5L10 6L10 10L0 10z");
        assert_eq!(p.decimate(0.5).to_string(), "M0 0L10 0L10 4L11 5L10 6L10 10L0 10z");
        for tolerance in [2.0, 3.0, 5.0] {
            assert_eq!(p.decimate(tolerance).to_string(), "M0 0L10 0L10 10L0 10z");
        }
        assert_eq!(p.decimate(50.0).to_string(), "M0 0L10 10L0 10z");
        assert!(p.decimate(51.0).is_empty());
    }

    #[test]
    fn decimate_open() {
        let p = path("M0 0L10 0L11 1L12 0L13 -5L14 0");
        assert_eq!(p.decimate(0.5).to_string(), "M0 0L10 0L11 1L12 0L13 -5L14 0");
        assert_eq!(p.decimate(1.0).to_string(), "M0 0L12 0L13 -5L14 0");
        assert_eq!(p.decimate(5.0).to_string(), "M0 0L14 0");
    }

    #[test]
    fn decimate_is_monotone() {
        let p = path("M0 0L10 0L10 4L11 5L10 6L10 10L0 10zM20 0L30 0L31 1L32 0L33 -5L34 0");
        let mut last = usize::MAX;
        for tolerance in [0.0, 0.5, 1.0, 2.0, 3.0, 5.0, 10.0, 30.0, 50.0, 51.0, 100.0] {
            let n = p.decimate(tolerance).len();
            assert!(n <= last, "{n} points at tolerance {tolerance}, {last} before");
            last = n;
        }
    }

    #[test]
    fn decimate_keeps_short_subpaths() {
        let p = path("M0 0L5 5M10 10L20 10L20 20z");
        assert_eq!(p.decimate(1000.0).to_string(), "M0 0L5 5");
    }
}
