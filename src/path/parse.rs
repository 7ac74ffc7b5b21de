//! Parse SVG path data into a [`Path`].

use std::str::FromStr;

use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;

use super::Path;
use crate::errors::{PathParseError, SourceContext};
use crate::log::debug;
use crate::types::{Point, pt};
use crate::{PathDataParser, Rule};

const COMMAND_LETTERS: &str = "MmLlHhVvCcSsQqTtAaZz";

/// Parse path data such as `M0 0L10 0Q15 5 10 10z`.
///
/// Relative commands, implicit repetition, `H`/`V` shortcuts and the smooth
/// `S`/`T` variants are supported. The input does not have to start with a
/// MoveTo; the pen starts at the origin.
pub fn parse_svg_path(source: &str) -> Result<Path, PathParseError> {
    let ctx = SourceContext::new("<path data>", source);
    let pairs = PathDataParser::parse(Rule::path_data, source).map_err(|e| {
        let offset = match e.location {
            InputLocation::Pos(p) => p,
            InputLocation::Span((s, _)) => s,
        };
        debug!(offset, "path data rejected");
        classify_error(&ctx, offset)
    })?;

    let mut walker = Walker::default();
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::path_data | Rule::number | Rule::flag | Rule::EOI => {}
            _ => walker.command(&ctx, pair)?,
        }
    }
    Ok(walker.path)
}

impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_svg_path(s)
    }
}

/// Turn the furthest position the grammar reached into a diagnostic.
fn classify_error(ctx: &SourceContext, offset: usize) -> PathParseError {
    let source = ctx.source.as_str();
    let found = source[offset..].chars().next();
    let first = source.len() - source.trim_start().len();
    let src = ctx.named_source();
    let span = ctx.span(offset, found.map(char::len_utf8).unwrap_or(0));

    if offset <= first {
        if let Some(c) = found {
            if !COMMAND_LETTERS.contains(c) {
                return PathParseError::MissingCommand { found: c, offset, src, span };
            }
        }
    }

    let command = source[..offset].chars().rev().find(|c| COMMAND_LETTERS.contains(*c));
    let continues_arguments = match found {
        None => true,
        Some(c) => COMMAND_LETTERS.contains(c) || c.is_ascii_digit() || ".,+-".contains(c),
    };
    match (command, found) {
        (Some(command), _) if continues_arguments && !matches!(command, 'Z' | 'z') => {
            PathParseError::MissingArguments {
                command,
                offset,
                src,
                span,
                expected: arguments_help(command),
            }
        }
        (_, Some(c)) => PathParseError::UnexpectedCharacter { found: c, offset, src, span },
        // nothing left to point at
        (_, None) => PathParseError::UnexpectedCharacter { found: ' ', offset, src, span },
    }
}

fn arguments_help(command: char) -> Option<String> {
    let args = match command.to_ascii_uppercase() {
        'M' | 'L' | 'T' => "x y",
        'H' => "x",
        'V' => "y",
        'C' => "x1 y1 x2 y2 x y",
        'S' => "x2 y2 x y",
        'Q' => "x1 y1 x y",
        'A' => "rx ry x-axis-rotation large-arc-flag sweep-flag x y",
        _ => return None,
    };
    Some(format!("'{command}' takes {args}"))
}

/// Replays parsed commands into a path, tracking the last control point
/// for the smooth variants.
#[derive(Default)]
struct Walker {
    path: Path,
    /// Reflection source for `S` (cubic) or `T` (quadratic).
    last_cubic_cp: Option<Point>,
    last_quad_cp: Option<Point>,
}

impl Walker {
    fn command(&mut self, ctx: &SourceContext, pair: Pair<'_, Rule>) -> Result<(), PathParseError> {
        let rule = pair.as_rule();
        let letter = pair.as_str().chars().next().unwrap_or('z');
        let relative = letter.is_ascii_lowercase();
        let args = pair
            .into_inner()
            .map(|arg| number(ctx, &arg))
            .collect::<Result<Vec<f64>, _>>()?;

        let chunk = match rule {
            Rule::horizontal | Rule::vertical => 1,
            Rule::moveto | Rule::lineto | Rule::smooth_quad => 2,
            Rule::smooth_cubic | Rule::quad => 4,
            Rule::cubic => 6,
            Rule::arc => 7,
            _ => 0,
        };
        if chunk == 0 {
            self.path.close();
            self.last_cubic_cp = None;
            self.last_quad_cp = None;
            return Ok(());
        }

        for (i, a) in args.chunks_exact(chunk).enumerate() {
            let pen = self.path.pos();
            let abs = |x: f64, y: f64| if relative { pt(pen.x + x, pen.y + y) } else { pt(x, y) };
            let (mut cubic_cp, mut quad_cp) = (None, None);
            match rule {
                // subsequent pairs of a MoveTo are implicit LineTos
                Rule::moveto if i == 0 => {
                    self.path.move_to(abs(a[0], a[1]));
                }
                Rule::moveto | Rule::lineto => {
                    self.path.line_to(abs(a[0], a[1]));
                }
                Rule::horizontal => {
                    let x = if relative { pen.x + a[0] } else { a[0] };
                    self.path.line_to(pt(x, pen.y));
                }
                Rule::vertical => {
                    let y = if relative { pen.y + a[0] } else { a[0] };
                    self.path.line_to(pt(pen.x, y));
                }
                Rule::cubic => {
                    let c2 = abs(a[2], a[3]);
                    self.path.cube_to(abs(a[0], a[1]), c2, abs(a[4], a[5]));
                    cubic_cp = Some(c2);
                }
                Rule::smooth_cubic => {
                    let c1 = self.last_cubic_cp.map(|c| pen * 2.0 - c).unwrap_or(pen);
                    let c2 = abs(a[0], a[1]);
                    self.path.cube_to(c1, c2, abs(a[2], a[3]));
                    cubic_cp = Some(c2);
                }
                Rule::quad => {
                    let c = abs(a[0], a[1]);
                    self.path.quad_to(c, abs(a[2], a[3]));
                    quad_cp = Some(c);
                }
                Rule::smooth_quad => {
                    let c = self.last_quad_cp.map(|c| pen * 2.0 - c).unwrap_or(pen);
                    self.path.quad_to(c, abs(a[0], a[1]));
                    quad_cp = Some(c);
                }
                Rule::arc => {
                    let large = a[3] == 1.0;
                    let sweep = a[4] == 1.0;
                    self.path.arc_to(a[0], a[1], a[2], large, sweep, abs(a[5], a[6]));
                }
                _ => {}
            }
            self.last_cubic_cp = cubic_cp;
            self.last_quad_cp = quad_cp;
        }
        Ok(())
    }
}

fn number(ctx: &SourceContext, pair: &Pair<'_, Rule>) -> Result<f64, PathParseError> {
    let text = pair.as_str();
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => {
            let offset = pair.as_span().start();
            Err(PathParseError::InvalidNumber {
                text: text.to_string(),
                offset,
                src: ctx.named_source(),
                span: ctx.span(offset, text.len()),
            })
        }
    }
}
