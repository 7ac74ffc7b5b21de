//! Randomly built paths survive printing and parsing.

use proptest::prelude::*;
use vecpath::{Path, Tolerance, parse_svg_path, pt};

const EPS: f64 = Tolerance::DEFAULT.epsilon;

#[derive(Debug, Clone)]
enum Op {
    Move(f64, f64),
    Line(f64, f64),
    Quad([f64; 4]),
    Cube([f64; 6]),
    Arc { rx: f64, ry: f64, rot: f64, large: bool, sweep: bool, x: f64, y: f64 },
    Close,
}

fn coord() -> impl Strategy<Value = f64> {
    -1000.0..1000.0f64
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (coord(), coord()).prop_map(|(x, y)| Op::Move(x, y)),
        (coord(), coord()).prop_map(|(x, y)| Op::Line(x, y)),
        prop::array::uniform4(coord()).prop_map(Op::Quad),
        prop::array::uniform6(coord()).prop_map(Op::Cube),
        (50.0..500.0f64, 50.0..500.0f64, 0.0..170.0f64, any::<bool>(), any::<bool>(), coord(), coord())
            .prop_map(|(rx, ry, rot, large, sweep, x, y)| Op::Arc { rx, ry, rot, large, sweep, x, y }),
        Just(Op::Close),
    ]
}

fn build(ops: &[Op]) -> Path {
    let mut p = Path::new();
    for op in ops {
        match *op {
            Op::Move(x, y) => {
                p.move_to(pt(x, y));
            }
            Op::Line(x, y) => {
                p.line_to(pt(x, y));
            }
            Op::Quad([cx, cy, x, y]) => {
                p.quad_to(pt(cx, cy), pt(x, y));
            }
            Op::Cube([c1x, c1y, c2x, c2y, x, y]) => {
                p.cube_to(pt(c1x, c1y), pt(c2x, c2y), pt(x, y));
            }
            Op::Arc { rx, ry, rot, large, sweep, x, y } => {
                p.arc_to(rx, ry, rot, large, sweep, pt(x, y));
            }
            Op::Close => {
                p.close();
            }
        }
    }
    p
}

proptest! {
    #[test]
    fn printed_paths_parse_back(ops in prop::collection::vec(op(), 1..24)) {
        let p = build(&ops);
        let printed = p.to_string();
        let reparsed = parse_svg_path(&printed).unwrap();
        prop_assert!(p.equals(&reparsed, EPS), "{} reparsed as {}", printed, reparsed);
    }

    #[test]
    fn minified_paths_parse_back(ops in prop::collection::vec(op(), 1..24)) {
        let p = build(&ops);
        let reparsed = parse_svg_path(&p.to_svg()).unwrap();
        prop_assert!(p.equals(&reparsed, EPS), "{} reparsed as {}", p.to_svg(), reparsed);
    }
}
