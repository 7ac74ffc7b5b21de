//! Paragraph line breaking over box, glue and penalty items.
//!
//! A paragraph is a sequence of [`Item`]s: boxes are fixed-width content,
//! glue is stretchable and shrinkable space, and penalties are possible
//! break points with a cost. A [`Linebreaker`] picks the break positions
//! for a given line width. [`KnuthPlass`] finds the set of breaks with the
//! least total demerits; [`Greedy`] fills every line as far as it goes.

pub mod greedy;
pub mod items;
pub mod knuth;
pub mod layout;

use std::fmt;

use enum_dispatch::enum_dispatch;

pub use greedy::Greedy;
pub use items::{Align, Glyph, ItemConfig, glyphs_to_items};
pub use knuth::KnuthPlass;
pub use layout::{Line, break_paragraph, layout_lines};

/// Finite stand-in for infinity: penalties at or beyond it forbid or force a
/// break, and adjustment ratios are capped at it.
pub const INFINITY: f64 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Box,
    Glue,
    Penalty,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub width: f64,
    pub stretch: f64,
    pub shrink: f64,
    pub penalty: f64,
    /// Hyphen break; two flagged breaks in a row cost extra.
    pub flagged: bool,
    /// Number of glyphs the item stands for.
    pub size: usize,
}

impl Item {
    pub fn boxed(width: f64) -> Self {
        Item {
            kind: ItemKind::Box,
            width,
            stretch: 0.0,
            shrink: 0.0,
            penalty: 0.0,
            flagged: false,
            size: 0,
        }
    }

    pub fn glue(width: f64, stretch: f64, shrink: f64) -> Self {
        Item {
            kind: ItemKind::Glue,
            stretch,
            shrink,
            ..Item::boxed(width)
        }
    }

    pub fn penalty(width: f64, penalty: f64, flagged: bool) -> Self {
        Item {
            kind: ItemKind::Penalty,
            penalty,
            flagged,
            ..Item::boxed(width)
        }
    }

    /// A penalty that must break.
    pub fn is_forced_break(&self) -> bool {
        self.kind == ItemKind::Penalty && self.penalty <= -INFINITY
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ItemKind::Box => write!(f, "Box[w={}]", self.width),
            ItemKind::Glue => write!(f, "Glue[w={} y={} z={}]", self.width, self.stretch, self.shrink),
            ItemKind::Penalty => write!(f, "Penalty[p={}]", self.penalty),
        }
    }
}

/// A chosen break.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breakpoint {
    /// Index of the item the line breaks at.
    pub position: usize,
    /// Line number, starting at 1.
    pub line: usize,
    /// Fitness class 0 (tight) to 3 (very loose).
    pub fitness: usize,
    /// Natural width of the line ending here.
    pub width: f64,
    /// How much the glue of the line is stretched (positive) or shrunk
    /// (negative); 0 when the line cannot be adjusted within bounds.
    pub ratio: f64,
    /// Total demerits of the paragraph up to here.
    pub demerits: f64,
}

/// Result of breaking a paragraph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Linebreak {
    /// One break per line; the last one is at the end of the paragraph.
    pub breaks: Vec<Breakpoint>,
    /// False when some line could not be made to fit the width.
    pub fits: bool,
}

#[enum_dispatch]
pub trait Linebreaker {
    fn linebreak(&self, items: &[Item], width: f64) -> Linebreak;
}

#[enum_dispatch(Linebreaker)]
#[derive(Clone, Debug, PartialEq)]
pub enum LinebreakStrategy {
    Knuth(KnuthPlass),
    Greedy(Greedy),
}

impl Default for LinebreakStrategy {
    fn default() -> Self {
        LinebreakStrategy::Knuth(KnuthPlass::default())
    }
}

/// Running sums of widths, stretch and shrink.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Sums {
    pub w: f64,
    pub y: f64,
    pub z: f64,
}

impl Sums {
    pub fn add(&mut self, item: &Item) {
        match item.kind {
            ItemKind::Box => self.w += item.width,
            ItemKind::Glue => {
                self.w += item.width;
                self.y += item.stretch;
                self.z += item.shrink;
            }
            ItemKind::Penalty => {}
        }
    }
}

/// Whether the paragraph may break at item `b`: at glue directly after a
/// box, or at a penalty below infinity. Glue directly before a penalty is
/// skipped since the penalty is the better break.
pub(crate) fn is_legal_break(items: &[Item], b: usize) -> bool {
    let item = &items[b];
    match item.kind {
        ItemKind::Box => false,
        ItemKind::Glue => {
            0 < b
                && items[b - 1].kind == ItemKind::Box
                && items.get(b + 1).is_none_or(|next| next.kind != ItemKind::Penalty)
        }
        ItemKind::Penalty => item.penalty < INFINITY,
    }
}

/// Sums at the start of the line following a break at `b`: glue and
/// penalties after the break are discarded up to the next box or forced
/// break.
pub(crate) fn sums_after(items: &[Item], b: usize, mut sums: Sums) -> Sums {
    for (i, item) in items[b..].iter().enumerate() {
        if item.kind == ItemKind::Box || (0 < i && item.is_forced_break()) {
            break;
        }
        if item.kind == ItemKind::Glue {
            sums.add(item);
        }
    }
    sums
}

/// Natural width of the line from `from` to a break at `b`.
pub(crate) fn line_width(items: &[Item], b: usize, sums: Sums, from: Sums) -> f64 {
    let mut l = sums.w - from.w;
    if items[b].kind == ItemKind::Penalty {
        l += items[b].width;
    }
    l
}

/// Adjustment ratio of the line from `from` to a break at `b`, capped at
/// [`INFINITY`]. Lines that are too long without shrink get minus infinity.
pub(crate) fn adjustment_ratio(items: &[Item], b: usize, sums: Sums, from: Sums, width: f64) -> f64 {
    let l = line_width(items, b, sums, from);
    let ratio = if l < width {
        (width - l) / (sums.y - from.y)
    } else if width < l {
        (width - l) / (sums.z - from.z)
    } else {
        0.0
    };
    ratio.min(INFINITY)
}

pub(crate) fn fitness_class(ratio: f64) -> usize {
    if ratio < -0.5 {
        0
    } else if ratio <= 0.5 {
        1
    } else if ratio <= 1.0 {
        2
    } else {
        3
    }
}
