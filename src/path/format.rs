//! Path data output.

use std::fmt::{self, Write};

use super::{Command, EPSILON, Path};

/// Decimal places tried first when printing a coordinate.
const DECIMALS: usize = 10;

/// Format a coordinate so that parsing it back lands within `EPSILON / 2`.
///
/// Rounding to ten decimals clears float noise such as `10.000000000000002`;
/// when that loses too much the shortest round-trip form is used instead.
/// Values within `EPSILON` of zero print as `0` and exponents are never used,
/// so the output is always valid path data.
pub fn num(value: f64) -> String {
    if value.abs() < EPSILON || !value.is_finite() {
        return "0".to_string();
    }
    let s = format!("{value:.prec$}", prec = DECIMALS);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s.parse::<f64>() {
        Ok(rounded) if (rounded - value).abs() <= EPSILON / 2.0 => {
            if s == "-0" { "0".to_string() } else { s.to_string() }
        }
        _ => format!("{value}"),
    }
}

fn flag(b: bool) -> &'static str {
    if b { "1" } else { "0" }
}

fn write_command(f: &mut impl Write, cmd: &Command) -> fmt::Result {
    match *cmd {
        Command::MoveTo(p) => write!(f, "M{} {}", num(p.x), num(p.y)),
        Command::LineTo(p) => write!(f, "L{} {}", num(p.x), num(p.y)),
        Command::QuadTo(c, p) => write!(f, "Q{} {} {} {}", num(c.x), num(c.y), num(p.x), num(p.y)),
        Command::CubeTo(c1, c2, p) => write!(
            f,
            "C{} {} {} {} {} {}",
            num(c1.x),
            num(c1.y),
            num(c2.x),
            num(c2.y),
            num(p.x),
            num(p.y)
        ),
        Command::ArcTo(a) => write!(
            f,
            "A{} {} {} {} {} {} {}",
            num(a.rx),
            num(a.ry),
            num(a.rotation()),
            flag(a.large),
            flag(a.sweep),
            num(a.end.x),
            num(a.end.y)
        ),
        Command::Close(_) => f.write_char('z'),
    }
}

/// Path data with absolute commands and no separators between them,
/// e.g. `M0 0L10 0z`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cmd in self.commands() {
            write_command(f, cmd)?;
        }
        Ok(())
    }
}

impl Path {
    /// Minified path data: axis-aligned lines use `H`/`V`.
    pub fn to_svg(&self) -> String {
        let mut s = String::new();
        for (start, cmd) in self.segments() {
            match cmd {
                Command::LineTo(p) if (p.x - start.x).abs() <= EPSILON => {
                    s.push('V');
                    s.push_str(&num(p.y));
                }
                Command::LineTo(p) if (p.y - start.y).abs() <= EPSILON => {
                    s.push('H');
                    s.push_str(&num(p.x));
                }
                cmd => {
                    // writing to a String cannot fail
                    let _ = write_command(&mut s, &cmd);
                }
            }
        }
        s
    }
}
