pub mod colors;
pub mod display_list;
pub mod svg;

use compact_str::CompactString;
use serde::Deserialize;

use crate::layout::Layout;
use crate::tree::arena::{NodeId, NodeTree};
use colors::{AppColor, ColorMapper};

/// One drawn treemap rectangle plus the attributes hover reads back.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub node: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: AppColor,
    pub name: CompactString,
    pub category: CompactString,
    pub value: f64,
    pub highlighted: bool,
}

impl Tile {
    /// Half-open containment; zero-area tiles never contain anything.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// One legend row: swatch + label.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub row: usize,
    pub label: CompactString,
    pub swatch: AppColor,
    /// Top of the row in legend coordinates
    pub y: f64,
}

/// Legend geometry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegendStyle {
    pub width: f64,
    pub row_height: f64,
    pub swatch_size: f64,
    /// Label x offset from the swatch's left edge
    pub label_offset: f64,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            width: 600.0,
            row_height: 30.0,
            swatch_size: 20.0,
            label_offset: 30.0,
        }
    }
}

impl LegendStyle {
    /// Legend height for `rows` categories.
    pub fn height(&self, rows: usize) -> f64 {
        rows as f64 * self.row_height
    }
}

/// A drawable target. Every pass calls `clear` before drawing; there is
/// no incremental update.
pub trait Surface {
    /// Drop every tile, legend entry and error indicator.
    fn clear(&mut self);
    fn draw_tile(&mut self, tile: Tile);
    fn draw_legend_entry(&mut self, entry: LegendEntry);
    /// Replace the chart with an error indicator.
    fn show_error(&mut self, message: &str);
}

/// What one pass drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub tiles: usize,
    pub legend_entries: usize,
}

/// Draw `layout` onto `surface` from scratch.
///
/// Colors come from a fresh [`ColorMapper`] fed leaves in layout order, so
/// the legend lists categories in first-encountered order (zero-weight
/// leaves included). The layout is trusted as-is.
pub fn render_treemap<S: Surface + ?Sized>(
    surface: &mut S,
    tree: &NodeTree,
    layout: &Layout,
    palette: &[AppColor],
    legend: &LegendStyle,
) -> RenderStats {
    surface.clear();

    let mut colors = ColorMapper::new(palette);
    for rect in &layout.rects {
        let node = tree.get(rect.node);
        let category = tree.category(rect.node).unwrap_or_default();
        surface.draw_tile(Tile {
            node: rect.node,
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            fill: colors.color_for(category),
            name: node.name.clone(),
            category: CompactString::new(category),
            value: node.weight,
            highlighted: false,
        });
    }

    let labels: Vec<CompactString> = colors.categories().map(CompactString::new).collect();
    let legend_entries = labels.len();
    for (row, label) in labels.into_iter().enumerate() {
        let swatch = colors.color_for(&label);
        surface.draw_legend_entry(LegendEntry {
            row,
            label,
            swatch,
            y: row as f64 * legend.row_height,
        });
    }

    tracing::debug!(
        "Rendered {} tiles and {} legend entries",
        layout.rects.len(),
        legend_entries
    );

    RenderStats {
        tiles: layout.rects.len(),
        legend_entries,
    }
}
