//! Options for the SVG layout preview

/// How a layout preview is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct SvgConfig {
    /// Margin around the canvas, in pixels
    pub margin: f64,

    /// Emit the `<?xml ...?>` declaration
    pub xml_declaration: bool,

    /// One element per line, indented
    pub pretty_print: bool,

    /// Prepended to every CSS class; empty for bare class names
    pub class_prefix: String,

    /// Rounded corners on widget tiles
    pub corner_radius: f64,

    /// Draw each widget's display title inside its tile
    pub show_titles: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            margin: 10.0,
            xml_declaration: true,
            pretty_print: true,
            class_prefix: "dg-".to_string(),
            corner_radius: 4.0,
            show_titles: true,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment suitable for inlining into an HTML page
    pub fn inline() -> Self {
        Self {
            xml_declaration: false,
            pretty_print: false,
            ..Self::default()
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius.max(0.0);
        self
    }

    pub fn with_titles(mut self, show: bool) -> Self {
        self.show_titles = show;
        self
    }

    /// CSS class name with the configured prefix
    pub fn class(&self, name: &str) -> String {
        format!("{}{}", self.class_prefix, name)
    }
}
