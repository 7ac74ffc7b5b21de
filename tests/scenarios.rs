//! End-to-end scenarios through the public API.

use insta::assert_snapshot;
use tracing_subscriber::EnvFilter;
use vecpath::path::shapes::{circle, rectangle, regular_polygon};
use vecpath::text::{Align, Glyph, Greedy, ItemConfig, break_paragraph};
use vecpath::{BooleanOp, Cap, Canvas, FillRule, Join, KnuthPlass, Paint, Path, Renderer, Style, Tolerance, parse_svg_path, pt};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn path(s: &str) -> Path {
    parse_svg_path(s).unwrap()
}

// ==================== Path data ====================

#[test]
fn parse_and_print() {
    init_tracing();
    assert_snapshot!(path("M10 10h5v5H10z").to_string(), @"M10 10L15 10L15 15L10 15z");
    assert_snapshot!(path("M10 10h5v5H10z").to_svg(), @"M10 10H15V15H10z");
    assert_snapshot!(path("M5 5L5 10L10 5").reverse().to_string(), @"M10 5L5 10L5 5");
    assert_snapshot!(path("M5 5A2.5 5 0 0 0 10 5").reverse().to_string(), @"M10 5A2.5 5 0 0 1 5 5");
}

#[test]
fn parse_error_reports_position() {
    init_tracing();
    let err = parse_svg_path("M0 0L10").unwrap_err();
    assert_eq!(err.command(), Some('L'));
    assert_eq!(err.offset(), 7);
}

#[test]
fn shapes_match_path_data() {
    assert!(rectangle(5.0, 10.0).equals(&path("H5V10H0z"), 1e-9));
    assert!(circle(0.0).is_empty());
    assert!(regular_polygon(4, 2.0, true).equals(&path("M0 2 -2 0 0 -2 2 0z"), 1e-9));
}

// ==================== Measuring and splitting ====================

#[test]
fn lengths_and_splits() {
    let q = path("M0 0Q50 66.67 100 0");
    assert!((q.length() - 124.533).abs() < 1.24533);

    let tri = path("L4 3L8 0z");
    let parts = tri.split_at(&[2.5, 7.5, 14.0]);
    assert_eq!(parts.len(), 4);
    let mut joined = Path::new();
    for part in &parts {
        joined.join(part);
    }
    assert!((joined.length() - tri.length()).abs() < 1e-9);
}

#[test]
fn decimate_closed_path() {
    let p = path("M0 0L10 0L10 4L11 5L10 6L10 10L0 10z");
    assert_snapshot!(p.decimate(50.0).to_string(), @"M0 0L10 10L0 10z");
    assert!(p.decimate(51.0).is_empty());
}

// ==================== Stroking ====================

#[test]
fn stroke_caps() {
    init_tracing();
    let line = path("M10 10L10 5");
    let tol = Tolerance::DEFAULT;
    assert_snapshot!(line.stroke(2.0, Cap::Butt, Join::Round, tol).to_string(), @"M11 10L11 5L9 5L9 10z");
    assert_snapshot!(
        line.stroke(2.0, Cap::Round, Join::Round, tol).to_string(),
        @"M11 10L11 5A1 1 0 0 0 9 5L9 10A1 1 0 0 0 11 10z"
    );
    assert_snapshot!(
        line.stroke(2.0, Cap::Square, Join::Round, tol).to_string(),
        @"M11 10L11 5L11 4L9 4L9 5L9 10L9 11L11 11z"
    );
}

#[test]
fn stroked_square_is_a_ring() {
    let ring = rectangle(10.0, 10.0).stroke(2.0, Cap::Butt, Join::Miter(4.0), Tolerance::DEFAULT);
    let parts = ring.split();
    assert_eq!(parts.len(), 2);
    assert!(parts[0].ccw() != parts[1].ccw());
    assert!(ring.interior(pt(0.0, 5.0), FillRule::NonZero));
    assert!(!ring.interior(pt(5.0, 5.0), FillRule::NonZero));
    assert!(!ring.interior(pt(5.0, 5.0), FillRule::EvenOdd));
    assert!((ring.signed_area().abs() - (144.0 - 64.0)).abs() < 1e-9);
}

#[test]
fn dashed_style() {
    let mut style = Style::default();
    style.stroke = Paint::Solid(vecpath::Color::BLACK);
    style.set_dashes(0.0, &[2.0]).unwrap();
    assert_snapshot!(path("M0 0L10 0").dash(style.dash_offset, &style.dashes).to_string(), @"M0 0L2 0M4 0L6 0M8 0L10 0");
    let stroked = path("M0 0L10 0").stroke_style(&style, Tolerance::DEFAULT);
    assert_eq!(stroked.split().len(), 3);
}

// ==================== Boolean operations ====================

#[test]
fn boolean_squares() {
    init_tracing();
    let a = rectangle(10.0, 10.0);
    let b = rectangle(10.0, 10.0).translate(5.0, 5.0);
    let tol = Tolerance::DEFAULT;
    assert_snapshot!(a.boolean(&b, BooleanOp::And, FillRule::NonZero, tol).to_string(), @"M5 5L10 5L10 10L5 10z");
    assert_snapshot!(a.boolean(&b, BooleanOp::Or, FillRule::NonZero, tol).to_string(), @"M0 0L10 0L10 5L15 5L15 15L5 15L5 10L0 10z");
    assert_snapshot!(a.boolean(&b, BooleanOp::Not, FillRule::NonZero, tol).to_string(), @"M0 0L10 0L10 5L5 5L5 10L0 10z");
    assert!((a.xor(&b).signed_area() - 150.0).abs() < 1e-6);
    assert!(a.xor(&a).is_empty());
    assert!(a.not(&a).is_empty());
}

#[test]
fn boolean_hole_and_disjoint() {
    let outer = rectangle(10.0, 10.0);
    let inner = rectangle(4.0, 4.0).translate(3.0, 3.0);
    let holed = outer.not(&inner);
    assert_eq!(holed.split().len(), 2);
    assert!((holed.signed_area() - 84.0).abs() < 1e-6);

    let far = rectangle(10.0, 10.0).translate(20.0, 0.0);
    assert!(outer.and(&far).is_empty());
    assert_eq!(outer.or(&far).to_string(), format!("{outer}{far}"));
}

// ==================== Line breaking ====================

fn glyphs(s: &str) -> Vec<Glyph> {
    s.chars().map(|c| Glyph::new(c, 1.0)).collect()
}

fn broken(text: &str, lines: &[vecpath::text::Line]) -> String {
    let chars: Vec<char> = text.chars().collect();
    lines
        .iter()
        .map(|l| chars[l.glyphs.clone()].iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("|")
}

#[test]
fn paragraph_breaking() {
    init_tracing();
    let text = "aaa bbb ccc ddd eee fff ggg hhh";
    let config = ItemConfig::default();
    let (knuth, fits) = break_paragraph(&glyphs(text), 0.0, 11.0, Align::Justified, &config, &KnuthPlass::default());
    assert!(fits);
    assert_snapshot!(broken(text, &knuth), @"aaa bbb ccc|ddd eee fff|ggg hhh");

    let (greedy, fits) = break_paragraph(&glyphs(text), 0.0, 11.0, Align::Justified, &config, &Greedy::default());
    assert!(fits);
    assert_eq!(greedy.len(), knuth.len());
}

#[test]
fn narrow_paragraph_still_breaks() {
    let text = "abcdef ghijkl";
    let (lines, fits) = break_paragraph(&glyphs(text), 0.0, 3.0, Align::Left, &ItemConfig::default(), &KnuthPlass::default());
    assert!(!fits);
    assert!(!lines.is_empty());
}

// ==================== Rendering ====================

#[derive(Default)]
struct SvgPaths {
    out: String,
}

impl Renderer for SvgPaths {
    fn render_path(&mut self, path: &Path, style: &Style, m: &vecpath::Matrix) {
        self.out.push_str(&format!("<path d=\"{}\" fill=\"{}\"/>\n", path.transform(m).to_svg(), style.fill));
    }

    fn render_text(&mut self, _text: &vecpath::TextBox, _m: &vecpath::Matrix) {}

    fn render_image(&mut self, _image: &vecpath::Image, _m: &vecpath::Matrix) {}
}

#[test]
fn canvas_replays_into_renderer() {
    let mut canvas = Canvas::new(20.0, 20.0);
    canvas.draw_path(1.0, 2.0, &rectangle(3.0, 4.0));
    canvas.push();
    canvas.style_mut().fill = Paint::Solid(vecpath::Color::RED);
    canvas.draw_path(10.0, 10.0, &path("L2 0L1 2z"));
    canvas.pop();

    let mut svg = SvgPaths::default();
    canvas.render_to(&mut svg);
    assert_snapshot!(svg.out.trim_end(), @r##"
    <path d="M1 2H4V6H1z" fill="#000000"/>
    <path d="M10 10H12L11 12z" fill="#ff0000"/>
    "##);
}
