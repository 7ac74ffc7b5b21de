//! Dash patterns.

use crate::log::trace;
use crate::path::{EPSILON, Path};

/// Stretches of `[0, length]` covered by dashes when the pattern starts at
/// `-phase`. Touching stretches are merged and empty ones left out.
fn dash_intervals(pattern: &[f64], phase: f64, length: f64) -> Vec<(f64, f64)> {
    let mut out: Vec<(f64, f64)> = Vec::new();
    let mut pos = -phase;
    let mut k = 0;
    while pos < length {
        let end = pos + pattern[k];
        if k % 2 == 0 {
            let (a, b) = (pos.max(0.0), end.min(length));
            if b - a > EPSILON {
                match out.last_mut() {
                    Some(last) if a - last.1 <= EPSILON => last.1 = b,
                    _ => out.push((a, b)),
                }
            }
        }
        pos = end;
        k = (k + 1) % pattern.len();
    }
    out
}

impl Path {
    /// Dash the path with alternating on and off lengths.
    ///
    /// The pattern starts `offset` into its first dash for every subpath;
    /// negative offsets wrap around the pattern length. A pattern of odd
    /// length is repeated once so that on and off alternate. Every dash
    /// becomes a subpath of its own, except that a closed subpath starting
    /// and ending inside a dash keeps those two pieces together. An empty
    /// pattern, or one without any length, returns the path unchanged.
    pub fn dash(&self, offset: f64, pattern: &[f64]) -> Path {
        if pattern.iter().any(|d| !d.is_finite() || *d < 0.0) || !offset.is_finite() {
            trace!(?pattern, offset, "ignoring invalid dash pattern");
            return self.clone();
        }
        let total: f64 = pattern.iter().sum();
        if pattern.is_empty() || total <= EPSILON {
            return self.clone();
        }
        let pattern: Vec<f64> = if pattern.len() % 2 == 1 {
            pattern.iter().chain(pattern).copied().collect()
        } else {
            pattern.to_vec()
        };
        let period: f64 = pattern.iter().sum();
        let phase = offset.rem_euclid(period);

        let mut out = Path::new();
        for sub in self.split() {
            let length = sub.length();
            let intervals = dash_intervals(&pattern, phase, length);
            match intervals.as_slice() {
                [] => continue,
                [(a, b)] if *a <= EPSILON && length - b <= EPSILON => {
                    out.append(&sub);
                    continue;
                }
                _ => {}
            }

            let cuts: Vec<f64> = intervals.iter().flat_map(|&(a, b)| [a, b]).collect();
            let mut dashes = Vec::new();
            let mut pos = 0.0;
            for piece in sub.split_at(&cuts) {
                let len = piece.length();
                let mid = pos + len / 2.0;
                if intervals.iter().any(|&(a, b)| a <= mid && mid <= b) {
                    dashes.push(piece);
                }
                pos += len;
            }

            let wraps = intervals.first().is_some_and(|i| i.0 <= EPSILON)
                && intervals.last().is_some_and(|i| length - i.1 <= EPSILON);
            if sub.closed() && wraps && dashes.len() > 1 {
                let first = dashes.remove(0);
                if let Some(last) = dashes.pop() {
                    let mut joined = last;
                    joined.join(&first);
                    out.append(&joined);
                }
            }
            for d in &dashes {
                out.append(d);
            }
        }
        out
    }
}
