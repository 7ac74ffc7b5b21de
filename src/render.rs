//! Renderer boundary: a canvas that records what is drawn and replays it
//! into any output target.

use std::fmt;

use crate::log::debug;
use crate::path::Path;
use crate::style::{DrawState, Paint, Style, StyleStack};
use crate::text::{Align, Glyph, ItemConfig, Line, Linebreaker, break_paragraph};
use crate::errors::GeometryError;
use crate::types::{Matrix, Point, Rect};

/// An output target. Paths arrive in their own coordinates together with
/// the transformation into canvas coordinates.
pub trait Renderer {
    fn render_path(&mut self, path: &Path, style: &Style, m: &Matrix);
    fn render_text(&mut self, text: &TextBox, m: &Matrix);
    fn render_image(&mut self, image: &Image, m: &Matrix);
}

/// A paragraph of glyphs broken into lines of a fixed width.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBox {
    pub glyphs: Vec<Glyph>,
    pub lines: Vec<Line>,
    pub width: f64,
    pub line_height: f64,
    pub align: Align,
    pub fill: Paint,
    /// Whether every line fits the width.
    pub fits: bool,
}

impl TextBox {
    pub fn new(
        glyphs: Vec<Glyph>,
        width: f64,
        line_height: f64,
        align: Align,
        config: &ItemConfig,
        breaker: &impl Linebreaker,
    ) -> Self {
        let (lines, fits) = break_paragraph(&glyphs, 0.0, width, align, config, breaker);
        TextBox {
            glyphs,
            lines,
            width,
            line_height,
            align,
            fill: Paint::default(),
            fits,
        }
    }

    pub fn height(&self) -> f64 {
        self.lines.len() as f64 * self.line_height
    }

    /// Offset of the start of line `i` from the top left of the box.
    pub fn line_origin(&self, i: usize) -> Point {
        let slack = self.lines.get(i).map_or(0.0, |l| self.width - l.width);
        let x = match self.align {
            Align::Left | Align::Justified => 0.0,
            Align::Right => slack,
            Align::Centered => slack / 2.0,
        };
        Point::new(x, i as f64 * self.line_height)
    }

    /// Text of line `i`, with a trailing hyphen when the line breaks at one.
    pub fn line_text(&self, i: usize) -> String {
        let Some(line) = self.lines.get(i) else {
            return String::new();
        };
        let mut s: String = self.glyphs[line.glyphs.clone()].iter().map(|g| g.text.as_str()).collect();
        if line.hyphenated {
            s.push('-');
        }
        s
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(Point::ZERO, Point::new(self.width, self.height()))
    }
}

/// An RGBA raster image, row by row from the top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    pub fn try_new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 || pixels.len() != 4 * width as usize * height as usize {
            return Err(GeometryError::ImageSize { width, height, len: pixels.len() });
        }
        Ok(Image { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The image covers one unit per pixel.
    pub fn bounds(&self) -> Rect {
        Rect::new(Point::ZERO, Point::new(f64::from(self.width), f64::from(self.height)))
    }
}

/// One recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Layer {
    Path { path: Path, style: Style, transform: Matrix },
    Text { text: TextBox, transform: Matrix },
    Image { image: Image, transform: Matrix },
}

impl Layer {
    /// Bounds in canvas coordinates, including half the stroke width.
    pub fn bounds(&self) -> Rect {
        match self {
            Layer::Path { path, style, transform } => {
                let mut r = path.bounds();
                if r.is_empty() {
                    return r;
                }
                if style.has_stroke() {
                    let hw = style.stroke_width / 2.0;
                    r = Rect::new(r.min - Point::new(hw, hw), r.max + Point::new(hw, hw));
                }
                r.transform(transform)
            }
            Layer::Text { text, transform } => text.bounds().transform(transform),
            Layer::Image { image, transform } => image.bounds().transform(transform),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Path { path, style, .. } => write!(f, "path {path} fill={} stroke={}", style.fill, style.stroke),
            Layer::Text { text, .. } => write!(f, "text {} lines", text.lines.len()),
            Layer::Image { image, .. } => write!(f, "image {}x{}", image.width, image.height),
        }
    }
}

/// Records drawing operations in order, each with the style and
/// transformation current when it was drawn.
#[derive(Clone, Debug)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    layers: Vec<Layer>,
    state: StyleStack,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Canvas {
            width,
            height,
            layers: Vec::new(),
            state: StyleStack::default(),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn reset(&mut self) {
        self.layers.clear();
        self.state = StyleStack::default();
    }

    pub fn state(&self) -> &DrawState {
        self.state.current()
    }

    pub fn style_mut(&mut self) -> &mut Style {
        self.state.style_mut()
    }

    pub fn push(&mut self) {
        self.state.push();
    }

    pub fn pop(&mut self) -> bool {
        self.state.pop()
    }

    /// Compose `m` onto the current transformation.
    pub fn transform(&mut self, m: &Matrix) {
        self.state.transform(m);
    }

    fn placed(&self, x: f64, y: f64) -> Matrix {
        self.state.current().transform.translate(x, y)
    }

    /// Draw `path` with its origin at (x, y). Paths that would leave no mark
    /// are not recorded.
    pub fn draw_path(&mut self, x: f64, y: f64, path: &Path) {
        let style = &self.state.current().style;
        if path.is_empty() || !(style.has_fill() || style.has_stroke()) {
            return;
        }
        let layer = Layer::Path {
            path: path.clone(),
            style: style.clone(),
            transform: self.placed(x, y),
        };
        self.layers.push(layer);
    }

    pub fn draw_text(&mut self, x: f64, y: f64, text: TextBox) {
        let transform = self.placed(x, y);
        self.layers.push(Layer::Text { text, transform });
    }

    pub fn draw_image(&mut self, x: f64, y: f64, image: Image) {
        let transform = self.placed(x, y);
        self.layers.push(Layer::Image { image, transform });
    }

    /// Bounds of everything drawn so far.
    pub fn bounds(&self) -> Rect {
        self.layers.iter().map(Layer::bounds).fold(Rect::empty(), Rect::union)
    }

    /// Shrink or grow the canvas around its contents plus `margin`, moving
    /// everything so the contents start at (margin, margin).
    pub fn fit(&mut self, margin: f64) {
        let r = self.bounds();
        if r.is_empty() {
            return;
        }
        let shift = Matrix::IDENTITY.translate(margin - r.min.x, margin - r.min.y);
        for layer in &mut self.layers {
            let transform = match layer {
                Layer::Path { transform, .. } | Layer::Text { transform, .. } | Layer::Image { transform, .. } => {
                    transform
                }
            };
            *transform = shift.mul(transform);
        }
        self.width = r.width() + 2.0 * margin;
        self.height = r.height() + 2.0 * margin;
    }

    /// Replay all layers into `r`.
    pub fn render_to(&self, r: &mut impl Renderer) {
        debug!(layers = self.layers.len(), "rendering canvas");
        for layer in &self.layers {
            match layer {
                Layer::Path { path, style, transform } => r.render_path(path, style, transform),
                Layer::Text { text, transform } => r.render_text(text, transform),
                Layer::Image { image, transform } => r.render_image(image, transform),
            }
        }
    }
}
