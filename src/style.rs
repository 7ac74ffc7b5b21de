//! Draw state: paint, stroke parameters and the push/pop stack that scopes
//! them.

use std::fmt;

use crate::types::{Matrix, NumericError};

/// Non-premultiplied RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// CSS notation: `#rrggbb` when opaque, `rgba(r,g,b,alpha)` otherwise.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let alpha = crate::path::num(f64::from(self.a) / 255.0);
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, alpha)
        }
    }
}

/// What fills or strokes a shape. Gradients and patterns belong to the
/// emitters, so a paint is either nothing or a solid color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Paint {
    #[default]
    None,
    Solid(Color),
}

impl Paint {
    /// Whether drawing with this paint leaves a mark.
    pub fn is_visible(&self) -> bool {
        match self {
            Paint::None => false,
            Paint::Solid(c) => !c.is_transparent(),
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            Paint::None => None,
            Paint::Solid(c) => Some(*c),
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paint::None => f.write_str("none"),
            Paint::Solid(c) => write!(f, "{c}"),
        }
    }
}

/// Rule deciding which winding numbers are inside a shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn fills(self, windings: i32) -> bool {
        match self {
            FillRule::NonZero => windings != 0,
            FillRule::EvenOdd => windings % 2 != 0,
        }
    }
}

impl fmt::Display for FillRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FillRule::NonZero => "nonzero",
            FillRule::EvenOdd => "evenodd",
        })
    }
}

/// Shape drawn at the open ends of a stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Shape drawn where two stroked segments meet.
///
/// `Miter` and `Arcs` carry their limit as a ratio of join length to stroke
/// width; beyond it the join falls back to a bevel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Join {
    Bevel,
    Round,
    Miter(f64),
    Arcs(f64),
}

impl Join {
    /// Miter join with a validated limit.
    pub fn miter(limit: f64) -> Result<Self, NumericError> {
        validate_limit(limit).map(Join::Miter)
    }

    /// Arcs join with a validated limit.
    pub fn arcs(limit: f64) -> Result<Self, NumericError> {
        validate_limit(limit).map(Join::Arcs)
    }
}

impl Default for Join {
    fn default() -> Self {
        Join::Miter(4.0)
    }
}

fn validate_limit(limit: f64) -> Result<f64, NumericError> {
    if limit.is_nan() {
        Err(NumericError::NaN)
    } else if limit.is_infinite() {
        Err(NumericError::Infinite)
    } else if limit < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(limit)
    }
}

/// Fill and stroke settings of a drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f64,
    pub cap: Cap,
    pub join: Join,
    pub dash_offset: f64,
    /// Alternating on and off lengths; empty means a solid stroke.
    pub dashes: Vec<f64>,
    pub fill_rule: FillRule,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            fill: Paint::Solid(Color::BLACK),
            stroke: Paint::None,
            stroke_width: 1.0,
            cap: Cap::Butt,
            join: Join::default(),
            dash_offset: 0.0,
            dashes: Vec::new(),
            fill_rule: FillRule::NonZero,
        }
    }
}

impl Style {
    pub fn has_fill(&self) -> bool {
        self.fill.is_visible()
    }

    pub fn has_stroke(&self) -> bool {
        self.stroke.is_visible() && 0.0 < self.stroke_width
    }

    /// Whether the dash pattern actually interrupts the stroke.
    pub fn is_dashed(&self) -> bool {
        !self.dashes.is_empty() && self.dashes.iter().any(|&d| d > 0.0)
    }

    pub fn set_stroke_width(&mut self, width: f64) -> Result<&mut Self, NumericError> {
        if width.is_nan() {
            return Err(NumericError::NaN);
        } else if width.is_infinite() {
            return Err(NumericError::Infinite);
        } else if width < 0.0 {
            return Err(NumericError::Negative);
        }
        self.stroke_width = width;
        Ok(self)
    }

    /// Set the dash pattern. Negative lengths are rejected.
    pub fn set_dashes(&mut self, offset: f64, dashes: &[f64]) -> Result<&mut Self, NumericError> {
        if let Some(&bad) = dashes.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(if bad.is_nan() {
                NumericError::NaN
            } else if bad.is_infinite() {
                NumericError::Infinite
            } else {
                NumericError::Negative
            });
        }
        self.dash_offset = offset;
        self.dashes = dashes.to_vec();
        Ok(self)
    }
}

/// A style together with the coordinate system it draws in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawState {
    pub style: Style,
    pub transform: Matrix,
}

/// Nested draw states. `push` saves a copy of the current state, `pop`
/// restores it, so changes made in between never leak into the enclosing
/// scope.
#[derive(Clone, Debug)]
pub struct StyleStack {
    current: DrawState,
    saved: Vec<DrawState>,
}

impl Default for StyleStack {
    fn default() -> Self {
        Self::new(DrawState::default())
    }
}

impl StyleStack {
    pub fn new(root: DrawState) -> Self {
        StyleStack { current: root, saved: Vec::new() }
    }

    pub fn current(&self) -> &DrawState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut DrawState {
        &mut self.current
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.current.style
    }

    /// Number of unmatched pushes.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Restore the state saved by the matching `push`. Returns false, and
    /// keeps the current state, when there is nothing to pop.
    pub fn pop(&mut self) -> bool {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                true
            }
            None => {
                crate::log::warn!("style stack popped without a matching push");
                false
            }
        }
    }

    /// Compose `m` onto the current transformation.
    pub fn transform(&mut self, m: &Matrix) {
        self.current.transform = self.current.transform.mul(m);
    }
}
