//! Error types with rich diagnostics using miette
//!
//! Path data errors carry source spans so a bad `d` attribute can be shown
//! with the offending command underlined.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<path data>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }

    /// Span of `len` bytes at `offset`, clamped to the source.
    pub fn span(&self, offset: usize, len: usize) -> SourceSpan {
        let offset = offset.min(self.source.len());
        let len = len.min(self.source.len() - offset);
        SourceSpan::new(offset.into(), len)
    }
}

// ============================================================================
// Path Data Errors
// ============================================================================

/// Errors that occur while parsing SVG path data
#[derive(Error, Diagnostic, Debug)]
pub enum PathParseError {
    #[error("path data must start with a command, found {found:?}")]
    #[diagnostic(
        code(vecpath::parse::missing_command),
        help("path data starts with M or m")
    )]
    MissingCommand {
        found: char,
        offset: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected a command letter")]
        span: SourceSpan,
    },

    #[error("bad arguments for command '{command}' at offset {offset}")]
    #[diagnostic(code(vecpath::parse::missing_arguments))]
    MissingArguments {
        command: char,
        offset: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("arguments for '{command}' end or break here")]
        span: SourceSpan,
        #[help]
        expected: Option<String>,
    },

    #[error("unexpected character {found:?} at offset {offset}")]
    #[diagnostic(code(vecpath::parse::unexpected_character))]
    UnexpectedCharacter {
        found: char,
        offset: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a command or number")]
        span: SourceSpan,
    },

    #[error("invalid number {text:?} at offset {offset}")]
    #[diagnostic(code(vecpath::parse::invalid_number))]
    InvalidNumber {
        text: String,
        offset: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a finite number")]
        span: SourceSpan,
    },
}

impl PathParseError {
    /// Byte offset of the error in the input.
    pub fn offset(&self) -> usize {
        match self {
            PathParseError::MissingCommand { offset, .. }
            | PathParseError::MissingArguments { offset, .. }
            | PathParseError::UnexpectedCharacter { offset, .. }
            | PathParseError::InvalidNumber { offset, .. } => *offset,
        }
    }

    /// The command letter the error is attributed to, if any.
    pub fn command(&self) -> Option<char> {
        match self {
            PathParseError::MissingArguments { command, .. } => Some(*command),
            _ => None,
        }
    }
}

// ============================================================================
// Geometry Errors
// ============================================================================

/// Errors from geometric operations on untrusted input
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("matrix is not invertible (determinant {det})")]
    #[diagnostic(code(vecpath::geometry::singular_matrix))]
    SingularMatrix { det: f64 },

    #[error("{len} bytes do not make a {width}x{height} RGBA image")]
    #[diagnostic(code(vecpath::geometry::image_size), help("images need 4 bytes per pixel and at least one pixel"))]
    ImageSize { width: u32, height: u32, len: usize },
}
