//! First-fit line breaking.

use crate::log::warn;

use super::{
    Breakpoint, Item, ItemKind, Linebreak, Linebreaker, Sums, adjustment_ratio,
    fitness_class, is_legal_break, line_width, sums_after,
};

/// Puts as much on every line as fits, breaking at the last legal break
/// before the line would have to shrink beyond its glue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Greedy {
    /// Ratios above this are reported as zero, as for [`super::KnuthPlass`].
    pub tolerance: f64,
}

impl Default for Greedy {
    fn default() -> Self {
        Greedy { tolerance: 2.0 }
    }
}

struct Candidate {
    position: usize,
    ratio: f64,
    width: f64,
    after: Sums,
}

impl Linebreaker for Greedy {
    fn linebreak(&self, items: &[Item], width: f64) -> Linebreak {
        let mut breaks = Vec::new();
        let mut fits = true;
        let mut sums = Sums::default();
        let mut from = Sums::default();
        let mut candidate: Option<Candidate> = None;

        let commit = |c: Candidate, breaks: &mut Vec<Breakpoint>| {
            let ratio = if c.ratio < -1.0 || self.tolerance < c.ratio {
                0.0
            } else {
                c.ratio
            };
            breaks.push(Breakpoint {
                position: c.position,
                line: breaks.len() + 1,
                fitness: fitness_class(c.ratio),
                width: c.width,
                ratio,
                demerits: 0.0,
            });
            c.after
        };

        for (b, item) in items.iter().enumerate() {
            if item.kind != ItemKind::Box && is_legal_break(items, b) {
                let mut ratio = adjustment_ratio(items, b, sums, from, width);
                if ratio < -1.0 {
                    if let Some(c) = candidate.take() {
                        from = commit(c, &mut breaks);
                        ratio = adjustment_ratio(items, b, sums, from, width);
                    }
                }
                let here = Candidate {
                    position: b,
                    ratio,
                    width: line_width(items, b, sums, from),
                    after: sums_after(items, b, sums),
                };
                if ratio < -1.0 {
                    warn!(position = b, width = here.width, line_width = width, "line overflows");
                    fits = false;
                    from = commit(here, &mut breaks);
                } else if item.is_forced_break() {
                    candidate = None;
                    from = commit(here, &mut breaks);
                } else {
                    candidate = Some(here);
                }
            }
            sums.add(item);
        }
        Linebreak { breaks, fits }
    }
}
