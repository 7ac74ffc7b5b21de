//! Logging shim.
//!
//! With the `tracing` feature the macros are `tracing`'s own. Without it they
//! swallow their arguments, so call sites never need a `cfg`.
//!
//! Levels in use: `debug` for per-operation summaries (boolean operations,
//! paragraph breaking, tolerance relaxation, parse failures), `warn` for
//! fallbacks that change the result (line overflow, unbalanced style pops),
//! `trace` for per-node and degenerate-input detail.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, trace, warn};
