//! Configuration for the layout engine

use super::row_fit::CanvasLimits;

/// Configuration options for planning and placement
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Space between pieces and units, in inches
    pub gap: f64,

    /// Widest canvas the printer accepts, in inches
    pub canvas_max_width: f64,

    /// Tallest canvas the printer accepts, in inches
    pub canvas_max_height: f64,

    /// Name of the text shape that receives the size label
    pub label_placeholder: String,

    /// Name of the front artwork piece
    pub front_name: String,

    /// Name of the back artwork piece
    pub back_name: String,

    /// Turn the unit a quarter when the row fit says it stacks shorter
    pub rotate_to_fit: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap: 0.1,
            canvas_max_width: 63.25,
            canvas_max_height: 200.0,
            label_placeholder: "SIZE".to_string(),
            front_name: "FRONT".to_string(),
            back_name: "BACK".to_string(),
            rotate_to_fit: true,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap between pieces
    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Set the canvas size limits
    pub fn with_canvas_max(mut self, width: f64, height: f64) -> Self {
        self.canvas_max_width = width;
        self.canvas_max_height = height;
        self
    }

    /// Set the size label placeholder name
    pub fn with_label_placeholder(mut self, name: impl Into<String>) -> Self {
        self.label_placeholder = name.into();
        self
    }

    /// Set the names the artwork pieces are looked up by
    pub fn with_piece_names(mut self, front: impl Into<String>, back: impl Into<String>) -> Self {
        self.front_name = front.into();
        self.back_name = back.into();
        self
    }

    pub fn with_rotate_to_fit(mut self, rotate: bool) -> Self {
        self.rotate_to_fit = rotate;
        self
    }

    /// Canvas limits in points
    pub fn limits(&self) -> CanvasLimits {
        CanvasLimits::from_inches(self.canvas_max_width, self.canvas_max_height, self.gap)
    }
}
