//! Curve math shared by path operations.

pub mod bezier;
pub mod ellipse;
pub mod intersect;
pub mod numeric;

pub use ellipse::{CenterArc, ellipse_to_center};
pub use numeric::{angle_between, angle_norm};
