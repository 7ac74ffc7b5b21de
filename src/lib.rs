//! Vector path geometry.
//!
//! Paths are built from commands or parsed from SVG path data, then
//! measured, transformed, split, stroked, dashed, offset and combined with
//! boolean operations. The [`text`] module breaks paragraphs into lines, and
//! [`render`] records drawing operations for an output target.

use pest_derive::Parser;

pub mod boolean;
pub mod errors;
pub mod geometry;
pub mod heap;
pub mod log;
pub mod path;
pub mod render;
pub mod stroke;
pub mod style;
pub mod text;
pub mod types;

pub use boolean::BooleanOp;
pub use errors::{GeometryError, PathParseError, SourceContext};
pub use heap::{HeapOrder, IndexedHeap};
pub use path::{Command, Path, Polyline, parse_svg_path};
pub use render::{Canvas, Image, Layer, Renderer, TextBox};
pub use style::{Cap, Color, DrawState, FillRule, Join, Paint, Style, StyleStack};
pub use text::{Item, KnuthPlass, Linebreak, LinebreakStrategy, Linebreaker};
pub use types::{Matrix, NumericError, Point, Rect, Tolerance, pt};

#[derive(Parser)]
#[grammar = "path/svg_path.pest"]
pub struct PathDataParser;
