use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::render::Tile;

/// Tooltip placement and fade settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Offset from the pointer on both axes
    pub offset: f64,
    /// Fade-in duration in milliseconds
    pub fade_ms: u64,
    /// Opacity reached at the end of the fade
    pub opacity: f32,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset: 20.0,
            fade_ms: 500,
            opacity: 0.8,
        }
    }
}

/// Linear opacity ramp from 0 to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    pub started: Instant,
    pub duration: Duration,
    pub target: f32,
}

impl Fade {
    pub fn new(started: Instant, duration: Duration, target: f32) -> Self {
        Self {
            started,
            duration,
            target,
        }
    }

    pub fn opacity_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.target;
        }
        let t = now.saturating_duration_since(self.started).as_secs_f32()
            / self.duration.as_secs_f32();
        self.target * t.clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

/// The single floating annotation shared by every tile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipState {
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// Raw value of the hovered tile (the `data-value` attribute)
    pub value: String,
    pub fade: Option<Fade>,
}

impl TooltipState {
    /// Current opacity: 0 while hidden, otherwise wherever the fade is.
    pub fn opacity(&self, now: Instant) -> f32 {
        match (self.visible, self.fade) {
            (true, Some(fade)) => fade.opacity_at(now),
            _ => 0.0,
        }
    }

    /// Whether the fade still needs frames.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.visible && self.fade.is_some_and(|f| !f.is_finished(now))
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.fade = None;
        self.value.clear();
    }
}

/// Format a record value the way the tooltip shows it (no trailing `.0`).
pub fn format_value(value: f64) -> String {
    format!("{value}")
}

/// Build tooltip text for a tile.
pub fn tooltip_text(tile: &Tile) -> String {
    format!("Data Name: {}, value: {}", tile.name, format_value(tile.value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_ramps_to_target() {
        let start = Instant::now();
        let fade = Fade::new(start, Duration::from_millis(500), 0.8);
        assert_eq!(fade.opacity_at(start), 0.0);
        let half = fade.opacity_at(start + Duration::from_millis(250));
        assert!((half - 0.4).abs() < 1e-4);
        assert_eq!(fade.opacity_at(start + Duration::from_secs(2)), 0.8);
        assert!(fade.is_finished(start + Duration::from_millis(500)));
    }

    #[test]
    fn hidden_tooltip_is_transparent() {
        let now = Instant::now();
        let mut tip = TooltipState {
            visible: true,
            fade: Some(Fade::new(now, Duration::ZERO, 0.8)),
            ..Default::default()
        };
        assert_eq!(tip.opacity(now), 0.8);
        tip.hide();
        assert_eq!(tip.opacity(now), 0.0);
        assert!(!tip.is_animating(now));
    }

    #[test]
    fn values_print_without_trailing_zero() {
        assert_eq!(format_value(760505847.0), "760505847");
        assert_eq!(format_value(82.53), "82.53");
    }
}
