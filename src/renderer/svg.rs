//! SVG generation from dashboard layouts

use crate::engine::{Bounds, BoundsMapper, Container};
use crate::model::{DashboardLayout, Widget};
use crate::settings::GridSettings;

use super::SvgConfig;

/// Collects the pieces of a layout preview, then assembles the document
pub struct SvgBuilder {
    config: SvgConfig,
    background: Vec<String>,
    tiles: Vec<String>,
}

impl SvgBuilder {
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            background: vec![],
            tiles: vec![],
        }
    }

    fn indent(&self) -> &'static str {
        if self.config.pretty_print {
            "  "
        } else {
            ""
        }
    }

    fn style_block(&self) -> String {
        let c = |name: &str| self.config.class(name);
        format!(
            ".{} {{ fill: #fafafa; stroke: #cccccc; }} \
             .{} {{ stroke: #e0e0e0; stroke-width: 0.5; }} \
             .{} {{ fill: #e3f2fd; stroke: #1565c0; stroke-width: 1; }} \
             .{} {{ fill: #ffebee; stroke: #f44336; }} \
             .{} {{ font-size: 12px; fill: #333333; }}",
            c("canvas"),
            c("grid"),
            c("widget"),
            c("conflict"),
            c("title")
        )
    }

    pub fn add_canvas(&mut self, container: Container) {
        let line = format!(
            r#"{}<rect class="{}" x="0" y="0" width="{}" height="{}"/>"#,
            self.indent(),
            self.config.class("canvas"),
            container.width,
            container.height
        );
        self.background.push(line);
    }

    /// Vertical and horizontal lines at every interior grid line
    pub fn add_grid(&mut self, container: Container, settings: &GridSettings) {
        let class = self.config.class("grid");
        let interior = |extent: f64| {
            settings
                .grid_lines(extent)
                .into_iter()
                .filter(move |v| *v > 0.0 && *v < extent)
        };
        for x in interior(container.width) {
            self.background.push(format!(
                r#"{}<line class="{}" x1="{}" y1="0" x2="{}" y2="{}"/>"#,
                self.indent(),
                class,
                x,
                x,
                container.height
            ));
        }
        for y in interior(container.height) {
            self.background.push(format!(
                r#"{}<line class="{}" x1="0" y1="{}" x2="{}" y2="{}"/>"#,
                self.indent(),
                class,
                y,
                container.width,
                y
            ));
        }
    }

    /// Add a widget tile, tagged with its type and optionally as conflicting
    pub fn add_widget(&mut self, widget: &Widget, bounds: Bounds, conflict: bool) {
        let mut classes = vec![
            self.config.class("widget"),
            self.config.class(widget.widget_type.as_str()),
        ];
        if conflict {
            classes.push(self.config.class("conflict"));
        }
        let fill = match &widget.config.color {
            Some(color) => format!(r#" fill="{}""#, escape_xml(color)),
            None => String::new(),
        };
        let radius = if self.config.corner_radius > 0.0 {
            format!(r#" rx="{}""#, self.config.corner_radius)
        } else {
            String::new()
        };

        self.tiles.push(format!(
            r#"{}<rect id="{}" class="{}" x="{}" y="{}" width="{}" height="{}"{}{}/>"#,
            self.indent(),
            escape_xml(&widget.id),
            classes.join(" "),
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height,
            radius,
            fill
        ));
        if self.config.show_titles {
            self.tiles.push(format!(
                r#"{}<text class="{}" x="{}" y="{}">{}</text>"#,
                self.indent(),
                self.config.class("title"),
                bounds.x + 8.0,
                bounds.y + 18.0,
                escape_xml(widget.display_title())
            ));
        }
    }

    /// Assemble the document; `extent` is the area the viewBox must cover
    pub fn build(self, extent: Bounds) -> String {
        let nl = if self.config.pretty_print { "\n" } else { "" };
        let m = self.config.margin;
        let mut out = Vec::new();

        if self.config.xml_declaration {
            out.push(r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string());
        }
        out.push(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            extent.x - m,
            extent.y - m,
            extent.width + 2.0 * m,
            extent.height + 2.0 * m
        ));
        out.push(format!("{}<style>{}</style>", self.indent(), self.style_block()));
        // Background first so tiles paint over the grid
        out.extend(self.background);
        out.extend(self.tiles);
        out.push("</svg>".to_string());

        out.join(nl)
    }
}

/// Render a layout to an SVG string
pub fn render_layout<M: BoundsMapper + ?Sized>(
    layout: &DashboardLayout,
    mapper: &M,
    settings: &GridSettings,
    container: Container,
    config: &SvgConfig,
) -> String {
    render_layout_highlighted(layout, mapper, settings, container, config, &[])
}

/// Render a layout, marking the widgets in `conflicts` with the conflict class
pub fn render_layout_highlighted<M: BoundsMapper + ?Sized>(
    layout: &DashboardLayout,
    mapper: &M,
    settings: &GridSettings,
    container: Container,
    config: &SvgConfig,
    conflicts: &[String],
) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_canvas(container);
    if settings.show_grid {
        builder.add_grid(container, settings);
    }

    let mut extent = container.bounds();
    for widget in layout.visible_widgets() {
        let bounds = mapper.widget_bounds(widget);
        extent = extent.union(&bounds);
        builder.add_widget(widget, bounds, conflicts.contains(&widget.id));
    }

    builder.build(extent)
}

/// Escape special XML characters
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
    use crate::engine::CellGrid;
    use crate::model::{GridPosition, WidgetSize, WidgetType};

    fn layout() -> DashboardLayout {
        let mut layout = DashboardLayout::create("Main");
        layout
            .add_widget(
                Widget::new("billing", "Billing & Invoices", WidgetType::BillingOverview, WidgetSize::Medium)
                    .with_position(GridPosition::new(0, 0, 4, 2)),
            )
            .unwrap();
        layout
            .add_widget(
                Widget::new("tasks", "Tasks", WidgetType::Tasks, WidgetSize::Small)
                    .with_position(GridPosition::new(0, 4, 2, 2))
                    .hidden(),
            )
            .unwrap();
        layout
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
    }

    #[test]
    fn test_render_visible_widgets_only() {
        let svg = render_layout(
            &layout(),
            &CellGrid::default(),
            &GridSettings::default(),
            Container::default(),
            &SvgConfig::default(),
        );
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"id="billing""#));
        assert!(svg.contains("dg-billing-overview"));
        assert!(svg.contains("Billing &amp; Invoices"));
        assert!(!svg.contains(r#"id="tasks""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_grid_lines_follow_settings() {
        let container = Container::new(100.0, 100.0);
        let config = SvgConfig::default();
        let grid = CellGrid::default();

        let shown = render_layout(&layout(), &grid, &GridSettings::default(), container, &config);
        // 4 vertical + 4 horizontal interior lines at 20px spacing
        assert_eq!(shown.matches("dg-grid\"").count(), 8);

        let hidden = GridSettings::default().with_show_grid(false);
        let plain = render_layout(&layout(), &grid, &hidden, container, &config);
        assert_eq!(plain.matches("dg-grid\"").count(), 0);
    }

    #[test]
    fn test_grid_lines_land_on_multiples() {
        let settings = GridSettings::default().with_size(1.1);
        let mut builder = SvgBuilder::new(SvgConfig::inline());
        builder.add_grid(Container::new(12.0, 0.0), &settings);
        let svg = builder.build(Bounds::zero());

        // 10 interior vertical lines; the tenth sits at exactly 10 * 1.1
        assert_eq!(svg.matches("<line").count(), 10);
        assert!(svg.contains(&format!(r#"x1="{}""#, 10.0 * 1.1)));
    }

    #[test]
    fn test_conflict_highlight() {
        let svg = render_layout_highlighted(
            &layout(),
            &CellGrid::default(),
            &GridSettings::default(),
            Container::default(),
            &SvgConfig::default(),
            &["billing".to_string()],
        );
        assert!(svg.contains("dg-conflict\""));
    }

    #[test]
    fn test_inline_without_titles() {
        let config = SvgConfig::inline().with_titles(false).with_corner_radius(0.0);
        let svg = render_layout(
            &layout(),
            &CellGrid::default(),
            &GridSettings::default().with_show_grid(false),
            Container::new(400.0, 200.0),
            &config,
        );
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains('\n'));
        assert!(!svg.contains("<text"));
        assert!(!svg.contains(" rx="));
        assert!(svg.contains(r#"viewBox="-10 -10 420 220""#));
    }
}
