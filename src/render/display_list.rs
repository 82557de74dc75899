use super::{LegendEntry, Surface, Tile};
use crate::ui::input;
use crate::ui::tooltip::TooltipState;

/// Retained in-memory surface: what the window paints each frame and what
/// hover hit-tests against. Also hosts the shared tooltip.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub tiles: Vec<Tile>,
    pub legend: Vec<LegendEntry>,
    pub error: Option<String>,
    pub tooltip: TooltipState,
    /// Bumped on every clear; lets the window drop cached geometry.
    pub generation: u64,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        input::hit_test(&self.tiles, x, y)
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn set_highlight(&mut self, index: usize, highlighted: bool) {
        if let Some(tile) = self.tiles.get_mut(index) {
            tile.highlighted = highlighted;
        }
    }

    pub fn highlighted(&self) -> impl Iterator<Item = usize> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.highlighted)
            .map(|(i, _)| i)
    }
}

impl Surface for DisplayList {
    fn clear(&mut self) {
        self.tiles.clear();
        self.legend.clear();
        self.error = None;
        self.tooltip.hide();
        self.generation += 1;
    }

    fn draw_tile(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    fn draw_legend_entry(&mut self, entry: LegendEntry) {
        self.legend.push(entry);
    }

    fn show_error(&mut self, message: &str) {
        self.clear();
        self.error = Some(message.to_string());
    }
}
