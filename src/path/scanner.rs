//! Forward and reverse traversal over a path's commands.
//!
//! Scanners borrow the command buffer and never allocate while stepping.
//! Call `scan()` before using any accessor.

use std::ops::Deref;

use super::{Command, CommandKind, Path};
use crate::types::Point;

/// The numeric payload of a command, as it appears in path data.
///
/// Arcs expose `rx ry rotation(deg) large sweep x y` with flags as 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Values {
    vals: [f64; 7],
    len: usize,
}

impl Values {
    fn new(src: &[f64]) -> Self {
        let mut vals = [0.0; 7];
        vals[..src.len()].copy_from_slice(src);
        Values { vals, len: src.len() }
    }
}

impl Deref for Values {
    type Target = [f64];
    fn deref(&self) -> &[f64] {
        &self.vals[..self.len]
    }
}

impl Command {
    pub fn values(&self) -> Values {
        match *self {
            Command::MoveTo(p) | Command::LineTo(p) | Command::Close(p) => Values::new(&[p.x, p.y]),
            Command::QuadTo(c, p) => Values::new(&[c.x, c.y, p.x, p.y]),
            Command::CubeTo(c1, c2, p) => Values::new(&[c1.x, c1.y, c2.x, c2.y, p.x, p.y]),
            Command::ArcTo(a) => Values::new(&[
                a.rx,
                a.ry,
                a.rotation(),
                f64::from(u8::from(a.large)),
                f64::from(u8::from(a.sweep)),
                a.end.x,
                a.end.y,
            ]),
        }
    }
}

/// Accessors shared by both scan directions.
pub trait PathScan {
    /// Advance to the next command; false once exhausted.
    fn scan(&mut self) -> bool;

    #[doc(hidden)]
    fn commands(&self) -> &[Command];

    #[doc(hidden)]
    fn index(&self) -> usize;

    fn current(&self) -> Command {
        self.commands()[self.index()]
    }

    fn cmd(&self) -> CommandKind {
        self.current().kind()
    }

    fn values(&self) -> Values {
        self.current().values()
    }

    /// Pen position before the command.
    fn start(&self) -> Point {
        match self.index() {
            0 => Point::ZERO,
            i => self.commands()[i - 1].end(),
        }
    }

    fn end(&self) -> Point {
        self.current().end()
    }

    /// First control point.
    ///
    /// # Panics
    ///
    /// Panics unless the command is a quadratic or cubic Bézier.
    fn cp1(&self) -> Point {
        match self.current() {
            Command::QuadTo(c, _) | Command::CubeTo(c, _, _) => c,
            cmd => panic!("cp1 requires a Bézier command, found {:?}", cmd.kind()),
        }
    }

    /// Second control point.
    ///
    /// # Panics
    ///
    /// Panics unless the command is a cubic Bézier.
    fn cp2(&self) -> Point {
        match self.current() {
            Command::CubeTo(_, c, _) => c,
            cmd => panic!("cp2 requires a cubic Bézier, found {:?}", cmd.kind()),
        }
    }

    /// Arc parameters `(rx, ry, rotation in degrees, large, sweep)`.
    ///
    /// # Panics
    ///
    /// Panics unless the command is an arc.
    fn arc(&self) -> (f64, f64, f64, bool, bool) {
        match self.current() {
            Command::ArcTo(a) => (a.rx, a.ry, a.rotation(), a.large, a.sweep),
            cmd => panic!("arc requires an arc command, found {:?}", cmd.kind()),
        }
    }

    /// The current segment as a standalone path.
    fn segment(&self) -> Path {
        let mut p = Path::new();
        p.move_to(self.start());
        match self.current() {
            Command::MoveTo(_) => {}
            Command::Close(end) => {
                p.line_to(end);
            }
            cmd => {
                p.push(cmd);
            }
        }
        p
    }
}

/// Walks commands first to last.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    cmds: &'a [Command],
    next: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(cmds: &'a [Command]) -> Self {
        Scanner { cmds, next: 0 }
    }
}

impl PathScan for Scanner<'_> {
    fn scan(&mut self) -> bool {
        if self.next < self.cmds.len() {
            self.next += 1;
            true
        } else {
            false
        }
    }

    fn commands(&self) -> &[Command] {
        self.cmds
    }

    fn index(&self) -> usize {
        self.next - 1
    }
}

/// Walks commands last to first. Accessors still describe each command in
/// its original direction.
#[derive(Clone, Debug)]
pub struct ReverseScanner<'a> {
    cmds: &'a [Command],
    cur: usize,
}

impl<'a> ReverseScanner<'a> {
    pub fn new(cmds: &'a [Command]) -> Self {
        ReverseScanner { cmds, cur: cmds.len() }
    }
}

impl PathScan for ReverseScanner<'_> {
    fn scan(&mut self) -> bool {
        if self.cur > 0 {
            self.cur -= 1;
            true
        } else {
            false
        }
    }

    fn commands(&self) -> &[Command] {
        self.cmds
    }

    fn index(&self) -> usize {
        self.cur
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse_svg_path;
    use crate::types::pt;

    #[test]
    fn forward_scan() {
        let p = parse_svg_path("M5 5L10 5Q15 5 15 10C15 15 10 15 10 20A5 5 30 0 1 0 20z").unwrap();
        let mut s = p.scanner();
        let mut kinds = Vec::new();
        while s.scan() {
            kinds.push(s.cmd());
        }
        use CommandKind::*;
        assert_eq!(kinds, vec![MoveTo, LineTo, QuadTo, CubeTo, ArcTo, Close]);
    }

    #[test]
    fn accessors() {
        let p = parse_svg_path("M5 5Q15 5 15 10C15 15 10 15 10 20A5 5 30 0 1 0 20").unwrap();
        let mut s = p.scanner();
        assert!(s.scan());
        assert_eq!(s.start(), pt(0.0, 0.0));
        assert_eq!(s.end(), pt(5.0, 5.0));

        assert!(s.scan());
        assert_eq!(s.start(), pt(5.0, 5.0));
        assert_eq!(s.cp1(), pt(15.0, 5.0));
        assert_eq!(&*s.values(), &[15.0, 5.0, 15.0, 10.0]);

        assert!(s.scan());
        assert_eq!(s.cp1(), pt(15.0, 15.0));
        assert_eq!(s.cp2(), pt(10.0, 15.0));

        assert!(s.scan());
        let (rx, ry, rot, large, sweep) = s.arc();
        assert!((rx - 5.0).abs() < 1e-9 && (ry - 5.0).abs() < 1e-9);
        assert!((rot - 30.0).abs() < 1e-9);
        assert!(!large && sweep);
        assert_eq!(s.values().len(), 7);
        assert!(!s.scan());
    }

    #[test]
    #[should_panic(expected = "cp1 requires a Bézier command")]
    fn cp1_on_line_panics() {
        let p = parse_svg_path("M0 0L10 0").unwrap();
        let mut s = p.scanner();
        s.scan();
        s.scan();
        let _ = s.cp1();
    }

    #[test]
    #[should_panic(expected = "arc requires an arc command")]
    fn arc_on_cubic_panics() {
        let p = parse_svg_path("M0 0C1 1 2 1 3 0").unwrap();
        let mut s = p.scanner();
        s.scan();
        s.scan();
        let _ = s.arc();
    }

    #[test]
    fn reverse_scan() {
        let p = parse_svg_path("M0 0L10 0L10 10").unwrap();
        let mut s = p.reverse_scanner();
        let mut ends = Vec::new();
        while s.scan() {
            ends.push((s.start(), s.end()));
        }
        assert_eq!(
            ends,
            vec![
                (pt(10.0, 0.0), pt(10.0, 10.0)),
                (pt(0.0, 0.0), pt(10.0, 0.0)),
                (pt(0.0, 0.0), pt(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn scanners_restart_independently() {
        let p = parse_svg_path("M0 0L10 0").unwrap();
        let mut a = p.scanner();
        while a.scan() {}
        let mut b = p.scanner();
        assert!(b.scan());
        assert_eq!(b.cmd(), CommandKind::MoveTo);
    }

    #[test]
    fn segment_as_path() {
        let p = parse_svg_path("M0 0L10 0L10 10z").unwrap();
        let mut s = p.scanner();
        let mut segs = Vec::new();
        while s.scan() {
            segs.push(s.segment().to_string());
        }
        assert_eq!(segs, vec!["M0 0", "M0 0L10 0", "M10 0L10 10", "M10 10L0 0"]);
    }
}
