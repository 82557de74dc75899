use std::time::{Duration, Instant};

use super::input::PointerEvent;
use super::tooltip::{format_value, tooltip_text, Fade, TooltipConfig};
use crate::render::display_list::DisplayList;

/// Hover state of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    Idle,
    Hovered,
}

/// Drives the per-tile idle/hovered machine and the shared tooltip.
///
/// The tooltip always follows the most recently entered tile: a late leave
/// from a previously hovered tile clears that tile's highlight but leaves
/// the tooltip alone.
#[derive(Debug, Clone)]
pub struct InteractionController {
    config: TooltipConfig,
    active: Option<usize>,
}

impl InteractionController {
    pub fn new(config: TooltipConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Tile the tooltip currently describes.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Tiles were redrawn; any previous hover is meaningless now.
    pub fn reset(&mut self) {
        self.active = None;
    }

    pub fn state_of(&self, surface: &DisplayList, tile: usize) -> HoverState {
        match surface.tile(tile) {
            Some(t) if t.highlighted => HoverState::Hovered,
            _ => HoverState::Idle,
        }
    }

    pub fn handle(&mut self, surface: &mut DisplayList, event: PointerEvent, now: Instant) {
        match event {
            PointerEvent::Enter { tile, x, y } => self.pointer_enter(surface, tile, x, y, now),
            PointerEvent::Move { tile, x, y } => self.pointer_move(surface, tile, x, y),
            PointerEvent::Leave { tile } => self.pointer_leave(surface, tile),
        }
    }

    /// idle → hovered: highlight, fill in the tooltip, start the fade.
    pub fn pointer_enter(
        &mut self,
        surface: &mut DisplayList,
        tile: usize,
        x: f64,
        y: f64,
        now: Instant,
    ) {
        let Some(t) = surface.tile(tile) else {
            tracing::debug!("Enter on unknown tile {}", tile);
            return;
        };
        let text = tooltip_text(t);
        let value = format_value(t.value);

        surface.set_highlight(tile, true);
        let tip = &mut surface.tooltip;
        tip.visible = true;
        tip.text = text;
        tip.value = value;
        tip.x = x + self.config.offset;
        tip.y = y + self.config.offset;
        tip.fade = Some(Fade::new(
            now,
            Duration::from_millis(self.config.fade_ms),
            self.config.opacity,
        ));
        self.active = Some(tile);
    }

    /// hovered → hovered: follow the pointer.
    pub fn pointer_move(&mut self, surface: &mut DisplayList, tile: usize, x: f64, y: f64) {
        if self.active != Some(tile) {
            return;
        }
        surface.tooltip.x = x + self.config.offset;
        surface.tooltip.y = y + self.config.offset;
    }

    /// hovered → idle: drop the highlight, hide the tooltip if it is ours.
    pub fn pointer_leave(&mut self, surface: &mut DisplayList, tile: usize) {
        surface.set_highlight(tile, false);
        if self.active == Some(tile) {
            surface.tooltip.hide();
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::colors::AppColor;
    use crate::render::{Surface, Tile};
    use crate::tree::arena::NodeId;

    fn list() -> DisplayList {
        let mut list = DisplayList::new();
        for (i, name) in ["p1", "p2"].iter().enumerate() {
            list.draw_tile(Tile {
                node: NodeId(i as u32 + 2),
                x: i as f64 * 50.0,
                y: 0.0,
                width: 50.0,
                height: 100.0,
                fill: AppColor::WHITE,
                name: (*name).into(),
                category: "catA".into(),
                value: 50.0,
                highlighted: false,
            });
        }
        list
    }

    #[test]
    fn enter_move_leave_cycle() {
        let mut surface = list();
        let mut ctl = InteractionController::new(TooltipConfig::default());
        let t0 = Instant::now();

        ctl.pointer_enter(&mut surface, 0, 10.0, 10.0, t0);
        assert_eq!(ctl.state_of(&surface, 0), HoverState::Hovered);
        assert!(surface.tooltip.visible);
        assert_eq!(surface.tooltip.text, "Data Name: p1, value: 50");
        assert_eq!((surface.tooltip.x, surface.tooltip.y), (30.0, 30.0));
        assert_eq!(surface.tooltip.opacity(t0), 0.0);
        assert!((surface.tooltip.opacity(t0 + Duration::from_secs(1)) - 0.8).abs() < 1e-6);

        ctl.pointer_move(&mut surface, 0, 15.0, 40.0);
        assert_eq!((surface.tooltip.x, surface.tooltip.y), (35.0, 60.0));
        assert_eq!(surface.tooltip.text, "Data Name: p1, value: 50");

        ctl.pointer_leave(&mut surface, 0);
        assert_eq!(ctl.state_of(&surface, 0), HoverState::Idle);
        assert!(!surface.tooltip.visible);
        assert_eq!(surface.tooltip.opacity(t0 + Duration::from_secs(1)), 0.0);
        assert_eq!(ctl.active(), None);
    }

    #[test]
    fn late_leave_does_not_hide_newer_tooltip() {
        let mut surface = list();
        let mut ctl = InteractionController::new(TooltipConfig::default());
        let now = Instant::now();

        ctl.pointer_enter(&mut surface, 0, 10.0, 10.0, now);
        ctl.pointer_enter(&mut surface, 1, 60.0, 10.0, now);
        ctl.pointer_leave(&mut surface, 0);

        assert!(surface.tooltip.visible);
        assert!(surface.tooltip.text.contains("p2"));
        assert_eq!(ctl.state_of(&surface, 0), HoverState::Idle);
        assert_eq!(ctl.state_of(&surface, 1), HoverState::Hovered);
        assert_eq!(surface.highlighted().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn move_on_inactive_tile_is_ignored() {
        let mut surface = list();
        let mut ctl = InteractionController::new(TooltipConfig::default());
        ctl.pointer_enter(&mut surface, 1, 60.0, 10.0, Instant::now());
        ctl.pointer_move(&mut surface, 0, 1.0, 1.0);
        assert_eq!((surface.tooltip.x, surface.tooltip.y), (80.0, 30.0));
    }
}
