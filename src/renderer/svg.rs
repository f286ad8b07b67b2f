//! SVG generation from a headless document

use crate::host::{Container, MemoryHost, ShapeKind, ShapeSnapshot};
use crate::layout::{BoundingBox, LayoutError};

use super::SvgConfig;

const PREVIEW_STYLE: &str = "\
.{p}canvas { fill: #ffffff; stroke: #999999; stroke-dasharray: 6 4; }
.{p}path { fill: #e3f2fd; stroke: #1565c0; stroke-width: 1; }
.{p}clip { fill: none; stroke: #ff9800; stroke-dasharray: 2 2; }
.{p}text { fill: none; stroke: #999999; stroke-width: 0.5; }
.{p}label { font-family: sans-serif; font-size: 10px; fill: #333333; }";

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    fn class(&self, name: &str) -> String {
        format!("{}{}", self.config.class_prefix, name)
    }

    fn indent_str(&self) -> String {
        if self.config.indent {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.indent {
            "\n"
        } else {
            ""
        }
    }

    /// Add the default preview styles
    pub fn add_default_style(&mut self) {
        self.styles
            .push(PREVIEW_STYLE.replace("{p}", &self.config.class_prefix));
    }

    /// Add a rectangle element
    pub fn add_rect(&mut self, id: Option<&str>, bounds: &BoundingBox, class: &str) {
        let id_attr = id
            .map(|i| format!(r#" id="{}""#, escape_xml(i)))
            .unwrap_or_default();
        self.elements.push(format!(
            r#"{}<rect{} class="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            self.indent_str(),
            id_attr,
            self.class(class),
            bounds.left,
            bounds.top,
            bounds.width(),
            bounds.height()
        ));
    }

    /// Add centered text
    pub fn add_label(&mut self, text: &str, x: f64, y: f64) {
        self.elements.push(format!(
            r#"{}<text class="{}" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
            self.indent_str(),
            self.class("label"),
            x,
            y,
            escape_xml(text)
        ));
    }

    /// Start a group element
    pub fn start_group(&mut self, id: Option<&str>, class: &str) {
        let id_attr = id
            .map(|i| format!(r#" id="{}""#, escape_xml(i)))
            .unwrap_or_default();
        self.elements.push(format!(
            r#"{}<g{} class="{}">"#,
            self.indent_str(),
            id_attr,
            self.class(class)
        ));
        self.indent += 1;
    }

    /// End a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1).max(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string
    pub fn build(self, viewbox: BoundingBox) -> String {
        let padding = self.config.padding;
        let vb_x = viewbox.left - padding;
        let vb_y = viewbox.top - padding;
        let vb_w = viewbox.width() + 2.0 * padding;
        let vb_h = viewbox.height() + 2.0 * padding;

        let nl = self.newline();
        let mut svg = String::new();

        if self.config.xml_declaration {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            vb_x, vb_y, vb_w, vb_h
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Render every canvas of `host` as an SVG preview
pub fn render_preview(host: &MemoryHost, config: &SvgConfig) -> Result<String, LayoutError> {
    let canvases = host.canvases();
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_default_style();

    let mut viewbox: Option<BoundingBox> = None;
    for canvas in &canvases {
        let id = format!("canvas-{}", canvas.id.0);
        builder.start_group(Some(&id), "sheet");
        builder.add_rect(None, &canvas.rect, "canvas");
        for shape in host.snapshot(Container::Canvas(canvas.id))? {
            render_shape(&shape, &mut builder);
        }
        builder.end_group();

        viewbox = Some(match viewbox {
            Some(vb) => vb.union(&canvas.rect),
            None => canvas.rect,
        });
    }

    Ok(builder.build(viewbox.unwrap_or(BoundingBox::new(0.0, 0.0, 0.0, 0.0))))
}

fn render_shape(shape: &ShapeSnapshot, builder: &mut SvgBuilder) {
    match shape.kind {
        ShapeKind::Group { .. } => {
            builder.start_group(Some(&shape.name), "group");
            for child in &shape.children {
                render_shape(child, builder);
            }
            builder.end_group();
        }
        ShapeKind::Path | ShapeKind::Text => {
            let Some(bounds) = shape.bounds else {
                return;
            };
            let class = match shape.kind {
                ShapeKind::Text => "text",
                _ if shape.clipping => "clip",
                _ => "path",
            };
            builder.add_rect(Some(&shape.name), &bounds, class);
            if builder.config.show_labels {
                if let Some(text) = shape.text.as_deref().filter(|t| !t.is_empty()) {
                    let c = bounds.center();
                    builder.add_label(text, c.x, c.y);
                }
            }
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CanvasHost;
    use crate::layout::{Dimension, Point};

    fn sample_host() -> MemoryHost {
        let mut host = MemoryHost::new();
        let canvas = host.create_canvas(Dimension::new(4.0, 2.0)).unwrap();
        let art = host
            .add_artwork(
                Container::Canvas(canvas.id),
                "1-FRONT",
                Dimension::new(1.0, 1.0),
                Point::new(0.0, 0.0),
                Some("SIZE"),
            )
            .unwrap();
        let label = host
            .find_child_by_name(Container::Group(art), "SIZE")
            .unwrap()
            .unwrap();
        host.set_text(label, "M & L").unwrap();
        host
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    }

    #[test]
    fn test_preview_contains_canvas_and_shapes() {
        let svg = render_preview(&sample_host(), &SvgConfig::default()).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"<g id="canvas-0" class="gs-sheet">"#));
        assert!(svg.contains(r#"class="gs-canvas" x="0" y="0" width="288" height="144""#));
        assert!(svg.contains(r#"<g id="1-FRONT" class="gs-group">"#));
        assert!(svg.contains("M &amp; L"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_viewbox_includes_padding() {
        let config = SvgConfig::new()
            .with_padding(10.0)
            .with_xml_declaration(false)
            .with_indent(false);
        let svg = render_preview(&sample_host(), &config).unwrap();
        insta::assert_snapshot!(
            svg.split('>').next().unwrap_or_default(),
            @r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="-10 -10 308 164""#
        );
    }

    #[test]
    fn test_labels_can_be_hidden() {
        let config = SvgConfig::new().with_labels(false);
        let svg = render_preview(&sample_host(), &config).unwrap();
        assert!(!svg.contains("M &amp; L"));
    }
}
