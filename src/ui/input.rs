use crate::render::display_list::DisplayList;
use crate::render::Tile;

/// Hit-test: find which tile contains the given point.
/// Iterates from the back so later-drawn tiles win (leaves never overlap,
/// so this only matters for shared edges).
pub fn hit_test(tiles: &[Tile], x: f64, y: f64) -> Option<usize> {
    tiles.iter().rposition(|t| t.contains(x, y))
}

/// Per-tile pointer event, in chart coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Enter { tile: usize, x: f64, y: f64 },
    Move { tile: usize, x: f64, y: f64 },
    Leave { tile: usize },
}

/// Turns raw cursor positions into per-tile enter/move/leave events.
#[derive(Debug, Default)]
pub struct PointerTracker {
    current: Option<usize>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tile currently under the pointer.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Forget the hovered tile (the tiles it pointed at are gone).
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Cursor moved to (x, y). Crossing a shared edge yields the old tile's
    /// leave followed by the new tile's enter.
    pub fn moved(&mut self, surface: &DisplayList, x: f64, y: f64) -> Vec<PointerEvent> {
        let hit = hit_test(&surface.tiles, x, y);
        let mut events = Vec::with_capacity(2);
        match (self.current, hit) {
            (Some(old), Some(new)) if old == new => {
                events.push(PointerEvent::Move { tile: new, x, y });
            }
            (old, new) => {
                if let Some(tile) = old {
                    events.push(PointerEvent::Leave { tile });
                }
                if let Some(tile) = new {
                    events.push(PointerEvent::Enter { tile, x, y });
                }
            }
        }
        self.current = hit;
        events
    }

    /// Cursor left the chart entirely.
    pub fn left(&mut self) -> Option<PointerEvent> {
        self.current.take().map(|tile| PointerEvent::Leave { tile })
    }
}
