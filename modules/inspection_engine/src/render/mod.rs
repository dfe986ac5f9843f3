//! Diagram rendering over an owned SVG tree

pub mod diagram;
pub mod geometry;
pub mod svg;

pub use diagram::{render, render_placeholder, ColoredDiagram, InteractiveRegion, PointerInput};
pub use svg::{SvgDocument, SvgError};
