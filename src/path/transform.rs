//! Affine transforms, reversal and cleanup of paths.

use std::f64::consts::PI;

use glam::{DMat2, dvec2};

use super::{ArcSegment, Command, EPSILON, Path};
use crate::geometry::numeric::angle_norm;
use crate::types::{Matrix, Point, pt};

/// Eigen decomposition of the symmetric matrix `[[a b] [b c]]`: the larger
/// eigenvalue first, each with its eigenvector.
fn symmetric_eigen(q: DMat2) -> ((f64, Point), (f64, Point)) {
    let (a, b, c) = (q.x_axis.x, q.y_axis.x, q.y_axis.y);
    let mean = (a + c) / 2.0;
    let dev = (((a - c) / 2.0).powi(2) + b * b).sqrt();
    let eigenvector = |lambda: f64| {
        let u = pt(b, lambda - a);
        let v = pt(lambda - c, b);
        let w = if u.length() >= v.length() { u } else { v };
        if w.length() < 1e-300 { pt(1.0, 0.0) } else { w.norm(1.0) }
    };
    let (l1, l2) = (mean + dev, mean - dev);
    let v1 = eigenvector(l1);
    let v2 = if dev == 0.0 { v1.rot90() } else { eigenvector(l2) };
    ((l1, v1), (l2, v2))
}

/// Map an arc payload through `m`. The ellipse `x^T E x = 1` becomes
/// `x^T (T^-T E T^-1) x = 1`, whose eigen decomposition gives the new radii
/// and rotation.
fn transform_arc(m: &Matrix, a: &ArcSegment) -> ArcSegment {
    let t = m.linear() * DMat2::from_angle(a.phi);
    let inv = t.inverse();
    let e = DMat2::from_diagonal(dvec2(1.0 / (a.rx * a.rx), 1.0 / (a.ry * a.ry)));
    let q = inv.transpose() * e * inv;

    let ((l1, v1), (l2, v2)) = symmetric_eigen(q);
    let (mut rx, mut ry) = (1.0 / l1.sqrt(), 1.0 / l2.sqrt());
    let mut phi = v1.angle();
    if rx < ry {
        std::mem::swap(&mut rx, &mut ry);
        phi = v2.angle();
    }
    phi = angle_norm(phi);
    if PI <= phi {
        phi -= PI;
    }

    ArcSegment {
        rx,
        ry,
        phi,
        large: a.large,
        // mirroring reverses the direction of travel
        sweep: if m.det() < 0.0 { !a.sweep } else { a.sweep },
        end: m.dot(a.end),
    }
}

/// `cmd`, which starts at `start`, traversed backwards.
fn reversed(start: Point, cmd: Command) -> Command {
    match cmd {
        Command::MoveTo(_) => Command::MoveTo(start),
        Command::LineTo(_) | Command::Close(_) => Command::LineTo(start),
        Command::QuadTo(c, _) => Command::QuadTo(c, start),
        Command::CubeTo(c1, c2, _) => Command::CubeTo(c2, c1, start),
        Command::ArcTo(a) => Command::ArcTo(ArcSegment {
            sweep: !a.sweep,
            end: start,
            ..a
        }),
    }
}

impl Path {
    /// Map every coordinate through `m`. Arcs get new radii and rotation;
    /// a mirroring transform flips their sweep. A singular matrix turns
    /// arcs into lines.
    pub fn transform(&self, m: &Matrix) -> Path {
        let singular = m.det().abs() < EPSILON;
        let cmds = self
            .cmds
            .iter()
            .map(|cmd| match *cmd {
                Command::MoveTo(p) => Command::MoveTo(m.dot(p)),
                Command::LineTo(p) => Command::LineTo(m.dot(p)),
                Command::Close(p) => Command::Close(m.dot(p)),
                Command::QuadTo(c, p) => Command::QuadTo(m.dot(c), m.dot(p)),
                Command::CubeTo(c1, c2, p) => Command::CubeTo(m.dot(c1), m.dot(c2), m.dot(p)),
                Command::ArcTo(a) if singular => Command::LineTo(m.dot(a.end)),
                Command::ArcTo(a) => Command::ArcTo(transform_arc(m, &a)),
            })
            .collect();
        Path::from_raw(cmds)
    }

    pub fn translate(&self, x: f64, y: f64) -> Path {
        self.transform(&Matrix::IDENTITY.translate(x, y))
    }

    pub fn scale(&self, sx: f64, sy: f64) -> Path {
        self.transform(&Matrix::IDENTITY.scale(sx, sy))
    }

    /// Rotate counter-clockwise by `deg` degrees around `origin`.
    pub fn rotate(&self, deg: f64, origin: Point) -> Path {
        self.transform(&Matrix::IDENTITY.rotate_about(deg, origin))
    }

    pub fn shear(&self, sx: f64, sy: f64) -> Path {
        self.transform(&Matrix::IDENTITY.shear(sx, sy))
    }

    /// Mirror in the y-axis.
    pub fn reflect_x(&self) -> Path {
        self.transform(&Matrix::IDENTITY.reflect_x())
    }

    /// Mirror in the x-axis.
    pub fn reflect_y(&self) -> Path {
        self.transform(&Matrix::IDENTITY.reflect_y())
    }

    /// The same shape traversed in the opposite direction. Subpaths come
    /// out in reverse order and keep their open or closed state.
    pub fn reverse(&self) -> Path {
        let subpaths: Vec<&[Command]> = self.subpaths().collect();
        let mut out = Path::new();
        for cmds in subpaths.into_iter().rev() {
            let closed = matches!(cmds.last(), Some(Command::Close(_)));
            let body = if closed { &cmds[..cmds.len() - 1] } else { cmds };
            let Some(last) = body.last() else {
                continue;
            };
            if closed {
                let start = cmds[0].end();
                out.move_to(start);
                out.line_to(last.end());
            } else {
                out.move_to(last.end());
            }
            for i in (1..body.len()).rev() {
                out.push(reversed(body[i - 1].end(), body[i]));
            }
            if closed {
                out.close();
            }
        }
        out
    }

    /// Normalize through the builder and merge consecutive lines running in
    /// the same direction. Subpaths without any drawing command are dropped.
    pub fn optimize(&self) -> Path {
        let mut out = Path::new();
        for cmds in self.subpaths() {
            let mut sub = Path::new();
            for cmd in cmds {
                sub.push(*cmd);
                sub.merge_straight_tail();
            }
            if sub.len() > 1 {
                out.append(&sub);
            }
        }
        out
    }

    /// Snap every coordinate, arc radii included, to a grid of `spacing`.
    /// Segments that collapse to a point are dropped. A spacing that is not
    /// positive leaves the path as it is.
    pub fn gridsnap(&self, spacing: f64) -> Path {
        if !spacing.is_finite() || spacing <= 0.0 {
            return self.clone();
        }
        let snap = |v: f64| (v / spacing).round() * spacing;
        let at = |p: Point| pt(snap(p.x), snap(p.y));
        let mut out = Path::new();
        for cmd in &self.cmds {
            match *cmd {
                Command::MoveTo(p) => out.move_to(at(p)),
                Command::LineTo(p) => out.line_to(at(p)),
                Command::QuadTo(c, p) => out.quad_to(at(c), at(p)),
                Command::CubeTo(c1, c2, p) => out.cube_to(at(c1), at(c2), at(p)),
                Command::ArcTo(a) => out.arc_to(snap(a.rx), snap(a.ry), a.rotation(), a.large, a.sweep, at(a.end)),
                Command::Close(_) => out.close(),
            };
        }
        out
    }

    /// Drop the second to last command when it is a line that the last
    /// line (or closing segment) continues straight on.
    fn merge_straight_tail(&mut self) {
        let n = self.cmds.len();
        if n < 3 {
            return;
        }
        let (Command::LineTo(q), Command::LineTo(p) | Command::Close(p)) = (self.cmds[n - 2], self.cmds[n - 1]) else {
            return;
        };
        let before = self.cmds[n - 3].end();
        let (d0, d1) = (q - before, p - q);
        let straight = d0.perp_dot(d1).abs() <= EPSILON * d0.length() * d1.length();
        if straight && d0.dot(d1) > 0.0 {
            self.cmds.remove(n - 2);
        }
    }
}
