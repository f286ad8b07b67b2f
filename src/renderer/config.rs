//! Preview settings

/// How [`render_preview`](super::render_preview) lays out its SVG
#[derive(Debug, Clone, PartialEq)]
pub struct SvgConfig {
    /// Margin around all canvases, in points
    pub padding: f64,
    /// Emit the `<?xml ...?>` prolog
    pub xml_declaration: bool,
    /// One element per line, nested elements indented
    pub indent: bool,
    /// Prepended to every CSS class; empty for bare class names
    pub class_prefix: String,
    /// Draw the contents of text shapes, such as stamped size labels
    pub show_labels: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            padding: 36.0,
            xml_declaration: true,
            indent: true,
            class_prefix: "gs-".to_string(),
            show_labels: true,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_xml_declaration(mut self, declare: bool) -> Self {
        self.xml_declaration = declare;
        self
    }

    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }
}
