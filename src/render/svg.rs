use std::path::Path;

use svg::node::element::{Group, Rectangle, Text};
use svg::Document;

use super::{LegendEntry, LegendStyle, Surface, Tile};
use crate::error::{Result, TreemapError};
use crate::ui::tooltip::format_value;

fn label(content: &str) -> Text {
    Text::new("").add(svg::node::Text::new(content))
}

/// Margins and size of the exported chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgFrame {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

/// Surface that accumulates an SVG document: the treemap on top, the
/// legend stacked below it.
pub struct SvgSurface {
    frame: SvgFrame,
    legend_style: LegendStyle,
    title: String,
    tiles: Vec<Rectangle>,
    legend: Vec<(Rectangle, Text)>,
    error: Option<String>,
}

impl SvgSurface {
    pub fn new(title: &str, frame: SvgFrame, legend_style: LegendStyle) -> Self {
        Self {
            frame,
            legend_style,
            title: title.to_string(),
            tiles: Vec::new(),
            legend: Vec::new(),
            error: None,
        }
    }

    /// Assemble the final document.
    pub fn document(&self) -> Document {
        let chart_w = self.frame.width + 2.0 * self.frame.margin;
        let chart_h = self.frame.height + 2.0 * self.frame.margin;
        let legend_h = self.legend_style.height(self.legend.len());
        let total_w = chart_w.max(self.legend_style.width);
        let total_h = chart_h + legend_h;

        let mut document = Document::new()
            .set("width", total_w)
            .set("height", total_h)
            .set("viewBox", (0.0, 0.0, total_w, total_h));

        let title = label(&self.title)
            .set("id", "title")
            .set("x", self.frame.margin)
            .set("y", self.frame.margin * 0.6)
            .set("font-family", "sans-serif")
            .set("font-size", 18);
        document = document.add(title);

        if let Some(message) = &self.error {
            let text = label(message)
                .set("class", "error")
                .set("x", self.frame.margin)
                .set("y", self.frame.margin + 20.0)
                .set("fill", "#d62728")
                .set("font-family", "sans-serif");
            return document.add(text);
        }

        let mut chart = Group::new().set("id", "treemap").set(
            "transform",
            format!("translate({},{})", self.frame.margin, self.frame.margin),
        );
        for rect in &self.tiles {
            chart = chart.add(rect.clone());
        }

        let mut legend = Group::new()
            .set("id", "legend")
            .set("transform", format!("translate(0,{chart_h})"));
        for (swatch, label) in &self.legend {
            legend = legend.add(swatch.clone()).add(label.clone());
        }

        document.add(chart).add(legend)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        svg::save(path, &self.document()).map_err(|e| TreemapError::Fetch {
            location: path.to_path_buf(),
            reason: format!("failed to write SVG: {e}"),
        })
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self) {
        self.tiles.clear();
        self.legend.clear();
        self.error = None;
    }

    fn draw_tile(&mut self, tile: Tile) {
        let rect = Rectangle::new()
            .set("class", "tile")
            .set("x", tile.x)
            .set("y", tile.y)
            .set("width", tile.width)
            .set("height", tile.height)
            .set("fill", tile.fill.to_hex())
            .set("stroke", "black")
            .set("data-name", tile.name.as_str())
            .set("data-category", tile.category.as_str())
            .set("data-value", format_value(tile.value));
        self.tiles.push(rect);
    }

    fn draw_legend_entry(&mut self, entry: LegendEntry) {
        let style = &self.legend_style;
        let swatch = Rectangle::new()
            .set("class", "legend-item")
            .set("x", 0)
            .set("y", entry.y)
            .set("width", style.swatch_size)
            .set("height", style.swatch_size)
            .set("fill", entry.swatch.to_hex());
        let text = label(&entry.label)
            .set("x", style.label_offset)
            .set("y", entry.y + style.swatch_size * 0.75)
            .set("font-family", "sans-serif");
        self.legend.push((swatch, text));
    }

    fn show_error(&mut self, message: &str) {
        self.clear();
        self.error = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_layout, LayoutConfig};
    use crate::render::colors::category10;
    use crate::render::render_treemap;
    use crate::tree::build_tree;
    use crate::tree::raw::RawNode;

    fn frame() -> SvgFrame {
        SvgFrame {
            width: 960.0,
            height: 400.0,
            margin: 40.0,
        }
    }

    #[test]
    fn one_tile_element_per_leaf() {
        let raw = RawNode::group(
            "Movies",
            vec![RawNode::group(
                "Drama",
                vec![
                    RawNode::leaf("Titanic", "Drama", 658672302.0),
                    RawNode::leaf("Forrest Gump", "Drama", 329694499.0),
                ],
            )],
        );
        let tree = build_tree(&raw).unwrap();
        let layout = compute_layout(&tree, 960.0, 400.0, &LayoutConfig::default()).unwrap();
        let mut surface = SvgSurface::new("Movie Sales", frame(), LegendStyle::default());
        render_treemap(&mut surface, &tree, &layout, &category10(), &LegendStyle::default());

        let out = surface.document().to_string();
        assert_eq!(out.matches("class=\"tile\"").count(), 2);
        assert_eq!(out.matches("class=\"legend-item\"").count(), 1);
        assert!(out.contains("data-name=\"Titanic\""));
        assert!(out.contains("data-value=\"658672302\""));
    }

    #[test]
    fn error_document_has_no_tiles() {
        let mut surface = SvgSurface::new("x", frame(), LegendStyle::default());
        surface.draw_tile(Tile {
            node: crate::tree::arena::NodeId(1),
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            fill: category10()[0],
            name: "stale".into(),
            category: "c".into(),
            value: 1.0,
            highlighted: false,
        });
        surface.show_error("negative value");
        let out = surface.document().to_string();
        assert!(!out.contains("class=\"tile\""));
        assert!(out.contains("negative value"));
    }
}
