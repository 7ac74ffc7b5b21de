//! Turning shaped glyphs into box, glue and penalty items.

use std::fmt;

use super::{INFINITY, Item, ItemKind};

/// Stretch of the glue that ends a paragraph or precedes a forced break.
const FILL: f64 = 1e6;

/// A shaped glyph cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    pub text: String,
    /// Advance along the line direction.
    pub advance: f64,
    /// Whether the script is written without spaces between words, so that
    /// lines may break between any two of its glyphs.
    pub spaceless: bool,
}

impl Glyph {
    pub fn new(text: impl Into<String>, advance: f64) -> Self {
        let text = text.into();
        let spaceless = text.chars().next().is_some_and(is_spaceless_script);
        Glyph { text, advance, spaceless }
    }

    fn is_space(&self) -> bool {
        self.text == " "
    }

    fn is_newline(&self) -> bool {
        matches!(self.text.as_str(), "\n" | "\r" | "\r\n" | "\u{2028}" | "\u{2029}")
    }

    fn is_upper(&self) -> bool {
        self.text.chars().any(char::is_uppercase) && self.text.chars().all(|c| !c.is_lowercase())
    }
}

/// Han, kana and the full-width forms that go with them.
fn is_spaceless_script(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF01}'..='\u{FF60}'
        | '\u{20000}'..='\u{2FA1F}')
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    #[default]
    Left,
    Right,
    Centered,
    Justified,
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Align::Left => "left",
            Align::Right => "right",
            Align::Centered => "centered",
            Align::Justified => "justified",
        })
    }
}

/// Spacing and hyphenation settings for [`glyphs_to_items`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemConfig {
    /// Stretch of a justified space, as a fraction of its width.
    pub space_stretch: f64,
    /// Shrink of a justified space, as a fraction of its width.
    pub space_shrink: f64,
    /// Use the same space after sentences as between words.
    pub french_spacing: bool,
    pub sentence_factor: f64,
    pub colon_factor: f64,
    pub semicolon_factor: f64,
    pub comma_factor: f64,
    pub hyphen_penalty: f64,
    /// Width of the hyphen inserted at a soft break.
    pub hyphen_advance: f64,
}

impl Default for ItemConfig {
    fn default() -> Self {
        ItemConfig {
            space_stretch: 1.0 / 2.0,
            space_shrink: 1.0 / 3.0,
            french_spacing: false,
            sentence_factor: 3.0,
            colon_factor: 2.0,
            semicolon_factor: 1.5,
            comma_factor: 1.25,
            hyphen_penalty: 50.0,
            hyphen_advance: 1.0 / 3.0,
        }
    }
}

impl ItemConfig {
    /// How much wider than usual the space at glyph `i` stretches, based on
    /// the punctuation before it. Closing brackets and quotes are looked
    /// through; a period after a capital is taken for an abbreviation.
    fn space_factor(&self, glyphs: &[Glyph], i: usize) -> f64 {
        if self.french_spacing || i == 0 {
            return 1.0;
        }
        let mut j = i - 1;
        if matches!(glyphs[j].text.as_str(), ")" | "]" | "'" | "\"" | "\u{2019}" | "\u{201D}") {
            if j == 0 {
                return 1.0;
            }
            j -= 1;
        }
        if 0 < j && glyphs[j - 1].is_upper() {
            return 1.0;
        }
        match glyphs[j].text.as_str() {
            "." | "!" | "?" => self.sentence_factor,
            ":" => self.colon_factor,
            ";" => self.semicolon_factor,
            "," => self.comma_factor,
            _ => 1.0,
        }
    }
}

struct Builder {
    items: Vec<Item>,
    align: Align,
    /// Stretch used by ragged and centered lines to absorb the slack.
    stretch: f64,
}

impl Builder {
    fn last_mut(&mut self) -> Option<&mut Item> {
        self.items.last_mut()
    }

    fn last_kind(&self) -> Option<ItemKind> {
        self.items.last().map(|i| i.kind)
    }

    /// A break opportunity of the given width, standing for `glyphs` glyphs.
    /// Justified text stretches the space itself; the other alignments
    /// stretch glue that vanishes when the line does not break here.
    fn space(&mut self, width: f64, stretch: f64, shrink: f64, glyphs: usize) {
        let s = self.stretch;
        match self.align {
            Align::Justified => {
                if let Some(last) = self.last_mut().filter(|l| l.kind == ItemKind::Glue) {
                    last.width += width;
                    last.stretch += stretch;
                    last.shrink += shrink;
                    last.size += glyphs;
                } else {
                    self.items.push(Item { size: glyphs, ..Item::glue(width, stretch, shrink) });
                }
            }
            Align::Left | Align::Right => {
                self.items.push(Item::glue(0.0, s, 0.0));
                self.items.push(Item::penalty(0.0, 0.0, false));
                self.items.push(Item { size: glyphs, ..Item::glue(width, -s, 0.0) });
            }
            Align::Centered => {
                self.items.push(Item::glue(0.0, s, 0.0));
                self.items.push(Item::penalty(0.0, 0.0, false));
                self.items.push(Item { size: glyphs, ..Item::glue(width, -2.0 * s, 0.0) });
                self.items.push(Item::boxed(0.0));
                self.items.push(Item::penalty(0.0, INFINITY, false));
                self.items.push(Item::glue(0.0, s, 0.0));
            }
        }
    }

    fn soft_hyphen(&mut self, advance: f64, penalty: f64) {
        let s = self.stretch;
        match self.align {
            Align::Justified => {
                self.items.push(Item { size: 1, ..Item::penalty(advance, penalty, true) });
            }
            Align::Left | Align::Right => {
                self.items.push(Item::penalty(0.0, INFINITY, false));
                self.items.push(Item::glue(0.0, s, 0.0));
                self.items.push(Item { size: 1, ..Item::penalty(advance, 10.0 * penalty, true) });
                self.items.push(Item::glue(0.0, -s, 0.0));
            }
            Align::Centered => {
                if let Some(last) = self.last_mut() {
                    last.size += 1;
                }
            }
        }
    }

    fn glyph(&mut self, advance: f64, break_before: bool) {
        if break_before {
            match self.align {
                Align::Justified => self.items.push(Item::penalty(0.0, 0.0, false)),
                _ => self.space(0.0, 0.0, 0.0, 0),
            }
        }
        // the first box is the indent and stays on its own
        let merge = !break_before && 1 < self.items.len() && self.last_kind() == Some(ItemKind::Box);
        match self.last_mut() {
            Some(last) if merge => {
                last.width += advance;
                last.size += 1;
            }
            _ => self.items.push(Item { size: 1, ..Item::boxed(advance) }),
        }
    }
}

/// Build the items for a paragraph of glyphs.
///
/// The paragraph starts with an indent box and ends with infinitely
/// stretchable glue and a forced break. Spaces become glue, sized after the
/// preceding punctuation for justified text; newlines force a break; a zero
/// width space (U+200B) marks a soft hyphen and an explicit `-` allows a
/// flagged break after it. Glyphs of spaceless scripts may break between
/// each other.
pub fn glyphs_to_items(glyphs: &[Glyph], indent: f64, align: Align, config: &ItemConfig) -> Vec<Item> {
    if glyphs.is_empty() {
        return Vec::new();
    }

    let stretch = if align == Align::Justified {
        0.0
    } else {
        let (sum, n) = glyphs
            .iter()
            .filter(|g| g.is_space())
            .fold((0.0, 0), |(sum, n), g| (sum + g.advance, n + 1));
        if 0 < n {
            sum / f64::from(n)
        } else {
            glyphs.iter().map(|g| g.advance).sum::<f64>() / glyphs.len() as f64
        }
    };

    let mut builder = Builder { items: Vec::with_capacity(glyphs.len() * 2 + 4), align, stretch };
    builder.items.push(Item::boxed(indent));
    if align == Align::Centered {
        builder.items.push(Item::glue(0.0, stretch, 0.0));
    }

    for (i, glyph) in glyphs.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| &glyphs[j]);
        if glyph.is_space() {
            let width = glyph.advance;
            let factor = config.space_factor(glyphs, i);
            builder.space(
                width,
                width * config.space_stretch * factor,
                width * config.space_shrink / factor,
                1,
            );
        } else if glyph.is_newline() {
            let crlf = glyph.text == "\n" && prev.is_some_and(|p| p.text == "\r");
            if !crlf {
                builder.items.push(Item::glue(0.0, FILL, 0.0));
                builder.items.push(Item::penalty(0.0, -INFINITY, false));
            }
            if let Some(last) = builder.last_mut() {
                last.size += 1;
            }
        } else if glyph.text == "\u{200B}" {
            builder.soft_hyphen(config.hyphen_advance, config.hyphen_penalty);
        } else {
            let break_before = prev.is_some_and(|p| {
                (p.spaceless || glyph.spaceless) && !p.is_space() && !p.is_newline() && p.text != "\u{200B}"
            }) && builder.last_kind() == Some(ItemKind::Box);
            builder.glyph(glyph.advance, break_before);
            if glyph.text == "-" {
                builder.items.push(Item::penalty(0.0, config.hyphen_penalty, true));
            }
        }
    }

    if align == Align::Centered {
        builder.items.push(Item::glue(0.0, stretch, 0.0));
        builder.items.push(Item::penalty(0.0, -INFINITY, false));
    } else {
        builder.items.push(Item::glue(0.0, FILL, 0.0));
        builder.items.push(Item::penalty(0.0, -INFINITY, true));
    }
    builder.items
}
