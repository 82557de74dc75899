use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, TreemapError};
use crate::layout::LayoutConfig;
use crate::render::colors::{category10, AppColor};
use crate::render::LegendStyle;
use crate::ui::tooltip::TooltipConfig;

/// Chart drawing area. Tiles are laid out in `width` x `height`; the
/// margin surrounds it on every side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 400.0,
            margin: 40.0,
        }
    }
}

/// Everything tunable, loaded from an optional TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub chart: ChartConfig,
    pub legend: LegendStyle,
    pub tooltip: TooltipConfig,
    pub layout: LayoutConfig,
    /// Ordinal palette as `#rrggbb` strings, assigned in first-seen order
    pub palette: Vec<String>,
    /// Directory holding the built-in dataset files
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chart: ChartConfig::default(),
            legend: LegendStyle::default(),
            tooltip: TooltipConfig::default(),
            layout: LayoutConfig::default(),
            palette: category10().into_iter().map(AppColor::to_hex).collect(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(text).map_err(|e| TreemapError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TreemapError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&text)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("chart.width", self.chart.width),
            ("chart.height", self.chart.height),
            ("legend.width", self.legend.width),
            ("legend.row_height", self.legend.row_height),
            ("legend.swatch_size", self.legend.swatch_size),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TreemapError::Config(format!("{key} must be positive, got {value}")));
            }
        }
        if !(self.chart.margin.is_finite() && self.chart.margin >= 0.0) {
            return Err(TreemapError::Config(format!(
                "chart.margin must not be negative, got {}",
                self.chart.margin
            )));
        }
        if !(0.0..=1.0).contains(&self.tooltip.opacity) {
            return Err(TreemapError::Config(format!(
                "tooltip.opacity must be within 0..=1, got {}",
                self.tooltip.opacity
            )));
        }
        self.palette()?;
        Ok(())
    }

    /// Parsed palette colors.
    pub fn palette(&self) -> Result<Vec<AppColor>> {
        self.palette.iter().map(|hex| AppColor::from_hex(hex)).collect()
    }
}
