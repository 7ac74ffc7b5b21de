//! Mapping breaks back onto glyphs.

use std::ops::Range;

use super::{Align, Breakpoint, Glyph, Item, ItemConfig, ItemKind, Linebreaker, glyphs_to_items};

/// A broken line of glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// Glyphs on the line, without the space or newline it broke at.
    pub glyphs: Range<usize>,
    pub ratio: f64,
    /// Natural width of the line.
    pub width: f64,
    /// Whether a hyphen has to be drawn at the end of the line.
    pub hyphenated: bool,
}

/// Split the glyphs of a paragraph into lines at the given breaks. Glyphs
/// covered by the break item itself, and discardable items at the start
/// of a line, belong to neither line.
pub fn layout_lines(items: &[Item], breaks: &[Breakpoint]) -> Vec<Line> {
    let mut lines = Vec::with_capacity(breaks.len());
    let mut breaks = breaks.iter().peekable();
    let mut glyph = 0;
    let mut start = 0;
    let mut at_start = true;
    for (i, item) in items.iter().enumerate() {
        let Some(b) = breaks.peek() else {
            break;
        };
        if b.position == i {
            lines.push(Line {
                glyphs: start..glyph,
                ratio: b.ratio,
                width: b.width,
                hyphenated: item.kind == ItemKind::Penalty && item.flagged && item.width != 0.0,
            });
            breaks.next();
            glyph += item.size;
            start = glyph;
            at_start = true;
            continue;
        }
        glyph += item.size;
        if item.kind == ItemKind::Box && item.size != 0 {
            at_start = false;
        } else if at_start {
            start = glyph;
        }
    }
    lines
}

/// Break a paragraph of glyphs into lines of the given width. Returns the
/// lines and whether they all fit.
pub fn break_paragraph(
    glyphs: &[Glyph],
    indent: f64,
    width: f64,
    align: Align,
    config: &ItemConfig,
    breaker: &impl Linebreaker,
) -> (Vec<Line>, bool) {
    let items = glyphs_to_items(glyphs, indent, align, config);
    let result = breaker.linebreak(&items, width);
    (layout_lines(&items, &result.breaks), result.fits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{Greedy, KnuthPlass, LinebreakStrategy};

    fn glyphs(s: &str) -> Vec<Glyph> {
        s.chars().map(|c| Glyph::new(c, 1.0)).collect()
    }

    fn texts(s: &str, lines: &[Line]) -> Vec<String> {
        let chars: Vec<char> = s.chars().collect();
        lines.iter().map(|l| chars[l.glyphs.clone()].iter().collect()).collect()
    }

    // ==================== Layout tests ====================

    #[test]
    fn justified_lines() {
        let text = "ab cd";
        let (lines, fits) = break_paragraph(
            &glyphs(text),
            0.0,
            3.0,
            Align::Justified,
            &ItemConfig::default(),
            &KnuthPlass::default(),
        );
        assert!(fits);
        assert_eq!(texts(text, &lines), vec!["ab", "cd"]);
        assert_eq!(lines[0].ratio, 2.0);
        assert_eq!(lines[0].width, 2.0);
        assert_eq!(lines[1].glyphs, 3..5);
    }

    #[test]
    fn ragged_lines() {
        let text = "ab cd";
        let strategy = LinebreakStrategy::default();
        let (lines, fits) =
            break_paragraph(&glyphs(text), 0.0, 3.0, Align::Left, &ItemConfig::default(), &strategy);
        assert!(fits);
        assert_eq!(texts(text, &lines), vec!["ab", "cd"]);
        assert!(lines.iter().all(|l| !l.hyphenated));
    }

    #[test]
    fn forced_and_soft_breaks() {
        let text = "ab\ncd";
        let (lines, _) =
            break_paragraph(&glyphs(text), 0.0, 10.0, Align::Justified, &ItemConfig::default(), &Greedy::default());
        assert_eq!(texts(text, &lines), vec!["ab", "cd"]);

        let text = "abc\u{200B}def";
        let (lines, fits) =
            break_paragraph(&glyphs(text), 0.0, 4.0, Align::Justified, &ItemConfig::default(), &KnuthPlass::default());
        assert!(fits);
        assert_eq!(texts(text, &lines), vec!["abc", "def"]);
        assert!(lines[0].hyphenated);
        assert!(!lines[1].hyphenated);
    }

    #[test]
    fn narrow_paragraph_overflows() {
        let text = "ab cd";
        for strategy in [LinebreakStrategy::default(), Greedy::default().into()] {
            let (lines, fits) =
                break_paragraph(&glyphs(text), 0.0, 1.0, Align::Justified, &ItemConfig::default(), &strategy);
            assert!(!fits);
            assert_eq!(texts(text, &lines), vec!["ab", "cd"]);
        }
    }
}
