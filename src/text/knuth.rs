//! Optimal line breaking after Knuth and Plass, "Breaking Paragraphs into
//! Lines" (1981).

use crate::log::{debug, trace, warn};

use super::{
    Breakpoint, INFINITY, Item, ItemKind, Linebreak, Linebreaker, Sums, adjustment_ratio,
    fitness_class, is_legal_break, line_width, sums_after,
};

/// Demerits added to a line that had to be pushed past the line width.
const OVERFLOW_DEMERITS: f64 = 1000.0;

/// Knuth–Plass line breaker.
///
/// `tolerance` is the largest adjustment ratio a line may have before the
/// search relaxes it. `looseness` asks for that many lines more (positive)
/// or fewer (negative) than the optimum, as far as feasible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KnuthPlass {
    pub tolerance: f64,
    pub demerits_line: f64,
    pub demerits_flagged: f64,
    pub demerits_fitness: f64,
    pub looseness: i32,
}

impl Default for KnuthPlass {
    fn default() -> Self {
        KnuthPlass {
            tolerance: 2.0,
            demerits_line: 10.0,
            demerits_flagged: 100.0,
            demerits_fitness: 100.0,
            looseness: 0,
        }
    }
}

impl KnuthPlass {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_looseness(mut self, looseness: i32) -> Self {
        self.looseness = looseness;
        self
    }
}

impl Linebreaker for KnuthPlass {
    fn linebreak(&self, items: &[Item], width: f64) -> Linebreak {
        if items.is_empty() {
            return Linebreak { breaks: Vec::new(), fits: true };
        }
        let mut tolerance = self.tolerance;
        loop {
            let mut search = Search::new(self, items, width);
            match search.run(tolerance) {
                Pass::Done => return search.finish(),
                Pass::Relax(next) => {
                    debug!(tolerance, next, "no feasible breaks, relaxing tolerance");
                    tolerance = next;
                }
            }
        }
    }
}

enum Pass {
    Done,
    Relax(f64),
}

/// A feasible break and the best way to reach it.
#[derive(Clone, Debug)]
struct Node {
    parent: Option<usize>,
    position: usize,
    line: usize,
    fitness: usize,
    width: f64,
    sums: Sums,
    ratio: f64,
    demerits: f64,
    // links of the active list, kept in line order
    prev: Option<usize>,
    next: Option<usize>,
}

/// One pass over the items at a fixed tolerance. Nodes live in an arena and
/// refer to each other by index; the active ones also form a linked list.
struct Search<'a> {
    config: &'a KnuthPlass,
    items: &'a [Item],
    width: f64,
    nodes: Vec<Node>,
    head: Option<usize>,
    tail: Option<usize>,
    inactive: Vec<usize>,
    sums: Sums,
    next_tolerance: f64,
    overflowed: bool,
}

impl<'a> Search<'a> {
    fn new(config: &'a KnuthPlass, items: &'a [Item], width: f64) -> Self {
        let mut search = Search {
            config,
            items,
            width,
            nodes: Vec::new(),
            head: None,
            tail: None,
            inactive: Vec::new(),
            sums: Sums::default(),
            next_tolerance: INFINITY,
            overflowed: false,
        };
        search.add_node(Node {
            parent: None,
            position: 0,
            line: 0,
            fitness: 1,
            width: 0.0,
            sums: Sums::default(),
            ratio: 0.0,
            demerits: 0.0,
            prev: None,
            next: None,
        }, None);
        search
    }

    fn run(&mut self, tolerance: f64) -> Pass {
        for b in 0..self.items.len() {
            let item = self.items[b];
            if item.kind != ItemKind::Box && is_legal_break(self.items, b) {
                self.main_loop(b, tolerance);
                if self.head.is_none() {
                    if tolerance < INFINITY {
                        return Pass::Relax(self.next_tolerance);
                    }
                    self.overflow(b);
                }
            }
            self.sums.add(&item);
        }
        Pass::Done
    }

    /// Try every active node as the start of a line ending at `b`.
    fn main_loop(&mut self, b: usize, tolerance: f64) {
        let item = self.items[b];
        let forced = item.is_forced_break();
        let mut active = self.head;
        while let Some(mut a) = active {
            // best (node, demerits, ratio) per fitness class
            let mut best: [Option<(usize, f64, f64)>; 4] = [None; 4];
            let mut d_min = f64::INFINITY;
            loop {
                let next = self.nodes[a].next;
                let ratio = adjustment_ratio(self.items, b, self.sums, self.nodes[a].sums, self.width);
                if ratio < -1.0 || forced {
                    self.deactivate(a);
                }

                if (-1.0..=tolerance).contains(&ratio) {
                    let c = fitness_class(ratio);
                    let demerits = self.demerits(b, a, ratio, c);
                    if best[c].is_none_or(|(_, d, _)| demerits < d) {
                        best[c] = Some((a, demerits, ratio));
                        d_min = d_min.min(demerits);
                    }
                } else if tolerance < ratio {
                    self.next_tolerance = self.next_tolerance.min(ratio);
                }

                let line = self.nodes[a].line + 1;
                active = next;
                match next {
                    Some(n) if self.nodes[n].line < line => a = n,
                    _ => break,
                }
            }

            if d_min < f64::INFINITY {
                let sums = sums_after(self.items, b, self.sums);
                for (c, candidate) in best.iter().enumerate() {
                    let Some((parent, demerits, ratio)) = *candidate else {
                        continue;
                    };
                    if demerits <= d_min + self.config.demerits_fitness {
                        let node = Node {
                            parent: Some(parent),
                            position: b,
                            line: self.nodes[parent].line + 1,
                            fitness: c,
                            width: line_width(self.items, b, self.sums, Sums::default()),
                            sums,
                            ratio,
                            demerits,
                            prev: None,
                            next: None,
                        };
                        trace!(position = b, line = node.line, demerits, "feasible break");
                        self.add_node(node, active);
                    }
                }
            }
        }
    }

    fn demerits(&self, b: usize, a: usize, ratio: f64, c: usize) -> f64 {
        let item = &self.items[b];
        let node = &self.nodes[a];
        let badness = 100.0 * ratio.abs().powi(3);
        let base = self.config.demerits_line + badness;
        let mut d = if item.kind == ItemKind::Penalty && 0.0 <= item.penalty {
            (base + item.penalty).powi(2)
        } else if item.kind == ItemKind::Penalty && -INFINITY < item.penalty {
            base.powi(2) - item.penalty.powi(2)
        } else {
            base.powi(2)
        };
        if item.flagged && self.items[node.position].flagged {
            d += self.config.demerits_flagged;
        }
        if 1 < c.abs_diff(node.fitness) {
            d += self.config.demerits_fitness;
        }
        d + node.demerits
    }

    /// No active node is left at tolerance infinity: break at `b` after the
    /// inactive nodes whose line sticks out the least.
    fn overflow(&mut self, b: usize) {
        let min_width = self
            .inactive
            .iter()
            .map(|&i| self.sums.w - self.nodes[i].sums.w)
            .fold(f64::INFINITY, f64::min);
        let parents: Vec<usize> = self
            .inactive
            .iter()
            .copied()
            .filter(|&i| self.sums.w - self.nodes[i].sums.w == min_width)
            .collect();
        warn!(position = b, width = min_width, line_width = self.width, "line overflows");
        let sums = sums_after(self.items, b, self.sums);
        for parent in parents {
            let node = Node {
                parent: Some(parent),
                position: b,
                line: self.nodes[parent].line + 1,
                fitness: 1,
                width: self.sums.w,
                sums,
                ratio: 0.0,
                demerits: self.nodes[parent].demerits + OVERFLOW_DEMERITS,
                prev: None,
                next: None,
            };
            self.add_node(node, None);
        }
        self.overflowed = true;
    }

    /// Store a node and link it into the active list before `before`, or at
    /// the end.
    fn add_node(&mut self, mut node: Node, before: Option<usize>) {
        let i = self.nodes.len();
        match before {
            Some(at) => {
                node.prev = self.nodes[at].prev;
                node.next = Some(at);
                match node.prev {
                    Some(p) => self.nodes[p].next = Some(i),
                    None => self.head = Some(i),
                }
                self.nodes[at].prev = Some(i);
            }
            None => {
                node.prev = self.tail;
                node.next = None;
                match self.tail {
                    Some(t) => self.nodes[t].next = Some(i),
                    None => self.head = Some(i),
                }
                self.tail = Some(i);
            }
        }
        self.nodes.push(node);
    }

    fn deactivate(&mut self, i: usize) {
        let (prev, next) = (self.nodes[i].prev, self.nodes[i].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[i].prev = None;
        self.nodes[i].next = None;
        self.inactive.push(i);
    }

    fn active(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.head, |&i| self.nodes[i].next)
    }

    fn finish(self) -> Linebreak {
        let mut chosen: Option<usize> = None;
        for a in self.active() {
            if chosen.is_none_or(|c| self.nodes[a].demerits < self.nodes[c].demerits) {
                chosen = Some(a);
            }
        }
        let Some(mut chosen) = chosen else {
            return Linebreak { breaks: Vec::new(), fits: false };
        };

        if self.config.looseness != 0 {
            let k = self.nodes[chosen].line as i64;
            let looseness = i64::from(self.config.looseness);
            let mut s = 0;
            for a in self.active() {
                let delta = self.nodes[a].line as i64 - k;
                if (looseness <= delta && delta < s) || (s < delta && delta <= looseness) {
                    s = delta;
                    chosen = a;
                } else if delta == s && self.nodes[a].demerits < self.nodes[chosen].demerits {
                    chosen = a;
                }
            }
        }

        let mut chain: Vec<&Node> = std::iter::successors(Some(chosen), |&i| self.nodes[i].parent)
            .map(|i| &self.nodes[i])
            .collect();
        chain.reverse();

        let breaks = chain
            .windows(2)
            .map(|pair| {
                let (parent, node) = (pair[0], pair[1]);
                let ratio = if node.ratio < -1.0 || self.config.tolerance < node.ratio {
                    0.0
                } else {
                    node.ratio
                };
                Breakpoint {
                    position: node.position,
                    line: node.line,
                    fitness: node.fitness,
                    width: node.width - parent.sums.w,
                    ratio,
                    demerits: node.demerits,
                }
            })
            .collect::<Vec<_>>();
        debug!(lines = breaks.len(), fits = !self.overflowed, "paragraph broken");
        Linebreak {
            breaks,
            fits: !self.overflowed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(items: &[Item]) -> Vec<Item> {
        let mut items = items.to_vec();
        items.push(Item::glue(0.0, f64::INFINITY, 0.0));
        items.push(Item::penalty(0.0, -INFINITY, true));
        items
    }

    fn positions(result: &Linebreak) -> Vec<usize> {
        result.breaks.iter().map(|b| b.position).collect()
    }

    fn ratios(result: &Linebreak) -> Vec<f64> {
        result.breaks.iter().map(|b| b.ratio).collect()
    }

    // ==================== Breaking tests ====================

    #[test]
    fn full_lines() {
        let items = paragraph(&[Item::boxed(100.0), Item::penalty(0.0, 0.0, false), Item::boxed(100.0)]);
        let result = KnuthPlass::default().linebreak(&items, 100.0);
        assert!(result.fits);
        assert_eq!(positions(&result), vec![1, 4]);
        assert_eq!(ratios(&result), vec![0.0, 0.0]);
        assert_eq!(result.breaks[0].width, 100.0);
        assert_eq!(result.breaks[1].width, 100.0);
        assert_eq!(result.breaks[1].line, 2);
    }

    #[test]
    fn stretched_line() {
        let items = paragraph(&[
            Item::boxed(50.0),
            Item::glue(0.0, 10.0, 0.0),
            Item::boxed(30.0),
            Item::penalty(0.0, 0.0, false),
            Item::boxed(100.0),
        ]);
        let result = KnuthPlass::default().linebreak(&items, 100.0);
        assert!(result.fits);
        assert_eq!(positions(&result), vec![3, 6]);
        assert_eq!(ratios(&result), vec![2.0, 0.0]);
        assert_eq!(result.breaks[0].width, 80.0);
    }

    #[test]
    fn short_line_relaxes_tolerance() {
        let items = paragraph(&[Item::boxed(80.0), Item::penalty(0.0, 0.0, false), Item::boxed(100.0)]);
        let result = KnuthPlass::default().linebreak(&items, 100.0);
        assert!(result.fits);
        assert_eq!(positions(&result), vec![1, 4]);
        // out of bounds ratios are reported as zero
        assert_eq!(ratios(&result), vec![0.0, 0.0]);
    }

    #[test]
    fn long_line_overflows() {
        let items = paragraph(&[Item::boxed(120.0), Item::penalty(0.0, 0.0, false), Item::boxed(100.0)]);
        let result = KnuthPlass::default().linebreak(&items, 100.0);
        assert!(!result.fits);
        assert_eq!(positions(&result), vec![1, 4]);
    }

    #[test]
    fn prefers_exactly_full_lines() {
        let items = paragraph(&[
            Item::boxed(50.0),
            Item::penalty(0.0, 0.0, false),
            Item::boxed(40.0),
            Item::penalty(0.0, 0.0, false),
            Item::boxed(60.0),
            Item::penalty(0.0, 0.0, false),
            Item::boxed(50.0),
        ]);
        let result = KnuthPlass::default().linebreak(&items, 100.0);
        assert_eq!(positions(&result), vec![1, 5, 8]);
        assert_eq!(result.breaks[1].width, 100.0);
    }

    #[test]
    fn spaceless_boxes() {
        let mut boxes = Vec::new();
        for i in 0..9 {
            if 0 < i {
                boxes.push(Item::penalty(0.0, 0.0, false));
            }
            boxes.push(Item::boxed(21.0));
        }
        let result = KnuthPlass::default().linebreak(&paragraph(&boxes), 100.0);
        assert!(result.fits);
        assert_eq!(result.breaks.len(), 3);
        assert!(result.breaks.iter().all(|b| b.width <= 100.0));
    }

    #[test]
    fn empty_paragraph() {
        let result = KnuthPlass::default().linebreak(&[], 100.0);
        assert!(result.breaks.is_empty());
        assert!(result.fits);
    }

    // ==================== Looseness tests ====================

    #[test]
    fn looseness_adds_a_line() {
        let mut items = Vec::new();
        for i in 0..6 {
            if 0 < i {
                items.push(Item::glue(10.0, 5.0, 3.0));
            }
            items.push(Item::boxed(20.0));
        }
        let items = paragraph(&items);
        let tight = KnuthPlass::default().linebreak(&items, 100.0);
        let loose = KnuthPlass::default()
            .with_tolerance(10.0)
            .with_looseness(1)
            .linebreak(&items, 100.0);
        assert_eq!(tight.breaks.len(), 2);
        assert_eq!(loose.breaks.len(), 3);
    }
}
