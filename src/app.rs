use std::path::PathBuf;
use std::time::Instant;

use crate::config::AppConfig;
use crate::dataset::{load_dataset, Choice, ChoiceToken, DatasetSelector};
use crate::error::{Result, TreemapError};
use crate::layout::{compute_layout, Layout};
use crate::render::colors::AppColor;
use crate::render::display_list::DisplayList;
use crate::render::{render_treemap, RenderStats, Surface};
use crate::tree::arena::NodeTree;
use crate::tree::build_tree;
use crate::tree::raw::RawNode;
use crate::ui::input::PointerTracker;
use crate::ui::interaction::InteractionController;

/// Application state machine phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppPhase {
    /// Nothing selected yet
    Idle,
    /// Waiting for a dataset load to finish
    Loading,
    /// Tiles and legend are on the surface
    Ready,
    /// The last pass failed; the surface shows the message
    Failed(String),
}

/// A load the caller has to run, tagged with the choice it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub token: ChoiceToken,
    pub path: PathBuf,
}

/// Top-level application state.
pub struct App {
    pub config: AppConfig,
    palette: Vec<AppColor>,
    pub selector: DatasetSelector,
    pub phase: AppPhase,
    /// Heading of the dataset on screen
    pub title: String,

    // Data
    raw: Option<RawNode>,
    pub tree: Option<NodeTree>,
    pub layout: Option<Layout>,

    // UI state
    pub surface: DisplayList,
    pub controller: InteractionController,
    tracker: PointerTracker,

    pub chart_width: f64,
    pub chart_height: f64,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let palette = config.palette()?;
        Ok(Self {
            palette,
            selector: DatasetSelector::new(),
            phase: AppPhase::Idle,
            title: String::new(),
            raw: None,
            tree: None,
            layout: None,
            surface: DisplayList::new(),
            controller: InteractionController::new(config.tooltip.clone()),
            tracker: PointerTracker::new(),
            chart_width: config.chart.width,
            chart_height: config.chart.height,
            config,
        })
    }

    pub fn palette(&self) -> &[AppColor] {
        &self.palette
    }

    /// Switch to `choice`. The returned request must be fed back through
    /// [`App::finish_load`]; earlier requests become stale.
    pub fn select(&mut self, choice: Choice) -> LoadRequest {
        let path = choice.location(&self.config.data_dir);
        let token = self.selector.select(choice);
        self.phase = AppPhase::Loading;
        LoadRequest { token, path }
    }

    /// Apply a finished load. Returns false when the load was superseded.
    pub fn finish_load(&mut self, token: ChoiceToken, result: Result<RawNode>) -> bool {
        if !self.selector.accept(token) {
            return false;
        }
        // Failure is already on the surface.
        let _ = self.apply(result);
        true
    }

    /// Select and load synchronously (headless export).
    pub fn load_now(&mut self, choice: Choice) -> Result<RenderStats> {
        let request = self.select(choice);
        self.apply(load_dataset(&request.path))
    }

    fn apply(&mut self, result: Result<RawNode>) -> Result<RenderStats> {
        self.title = self.selector.current().title();
        match result {
            Ok(raw) => {
                self.raw = Some(raw);
                self.render_pass()
            }
            Err(e) => {
                self.raw = None;
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Build, lay out and draw the current dataset from scratch.
    ///
    /// Any error clears the surface and shows the message; no tree or
    /// layout from the failed pass is kept.
    pub fn render_pass(&mut self) -> Result<RenderStats> {
        self.controller.reset();
        self.tracker.reset();

        let Some(raw) = &self.raw else {
            self.surface.clear();
            return Ok(RenderStats::default());
        };

        let start = Instant::now();
        let pass = build_tree(raw).and_then(|tree| {
            let layout = compute_layout(
                &tree,
                self.chart_width,
                self.chart_height,
                &self.config.layout,
            )?;
            Ok((tree, layout))
        });

        match pass {
            Ok((tree, layout)) => {
                let stats = render_treemap(
                    &mut self.surface,
                    &tree,
                    &layout,
                    &self.palette,
                    &self.config.legend,
                );
                tracing::info!(
                    "Render pass: {} tiles, {} categories in {:.1}ms",
                    stats.tiles,
                    stats.legend_entries,
                    start.elapsed().as_secs_f64() * 1000.0
                );
                self.tree = Some(tree);
                self.layout = Some(layout);
                self.phase = AppPhase::Ready;
                Ok(stats)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    fn fail(&mut self, error: &TreemapError) {
        tracing::error!("Render pass failed: {}", error);
        self.tree = None;
        self.layout = None;
        self.controller.reset();
        self.tracker.reset();
        let message = error.to_string();
        self.surface.show_error(&message);
        self.phase = AppPhase::Failed(message);
    }

    /// Handle a change of chart size.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width == self.chart_width && height == self.chart_height {
            return;
        }
        self.chart_width = width;
        self.chart_height = height;
        if self.raw.is_some() {
            let _ = self.render_pass();
        }
    }

    /// Cursor moved to (x, y) in chart coordinates.
    pub fn pointer_moved(&mut self, x: f64, y: f64, now: Instant) {
        for event in self.tracker.moved(&self.surface, x, y) {
            self.controller.handle(&mut self.surface, event, now);
        }
    }

    /// Cursor left the chart.
    pub fn pointer_left(&mut self, now: Instant) {
        if let Some(event) = self.tracker.left() {
            self.controller.handle(&mut self.surface, event, now);
        }
    }

    /// Whether the window should keep requesting frames.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.surface.tooltip.is_animating(now)
    }

    /// Redraw the current state onto another surface (SVG export).
    pub fn render_onto<S: Surface + ?Sized>(&self, surface: &mut S) -> RenderStats {
        match (&self.tree, &self.layout, &self.phase) {
            (_, _, AppPhase::Failed(message)) => {
                surface.show_error(message);
                RenderStats::default()
            }
            (Some(tree), Some(layout), _) => {
                render_treemap(surface, tree, layout, &self.palette, &self.config.legend)
            }
            _ => {
                surface.clear();
                RenderStats::default()
            }
        }
    }
}
