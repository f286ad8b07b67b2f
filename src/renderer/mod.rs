//! SVG preview of a headless document
//!
//! Draws every canvas of a [`MemoryHost`](crate::host::MemoryHost) side by
//! side, with each shape as its bounding rectangle, so a placement run can
//! be inspected without a design tool.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::render_preview;
