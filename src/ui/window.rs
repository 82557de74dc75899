use std::time::Instant;

use iced::widget::canvas::{self, Canvas, Frame, Geometry, Path, Stroke};
use iced::widget::{button, column, container, scrollable, text, Row};
use iced::{
    application, mouse, window, Color, Element, Length, Pixels, Point, Rectangle, Renderer, Size,
    Subscription, Task, Theme,
};

use crate::app::{App, AppPhase, LoadRequest};
use crate::dataset::{fetch_dataset, Choice, ChoiceToken, Dataset};
use crate::error::Result;
use crate::tree::raw::RawNode;

const HIGHLIGHT: f32 = 0.15;
const TOOLTIP_PADDING: f32 = 5.0;

#[derive(Debug, Clone)]
pub enum Message {
    Select(Dataset),
    OpenFile,
    Loaded(ChoiceToken, Result<RawNode>),
    PointerMoved(Point),
    PointerLeft,
    Tick(Instant),
}

struct TreemapWindow {
    app: App,
}

/// Open the window and start loading `initial`.
pub fn run(app: App, initial: LoadRequest) -> iced::Result {
    let width = (app.chart_width + 2.0 * app.config.chart.margin).max(app.config.legend.width);
    let height = app.chart_height + 2.0 * app.config.chart.margin + 260.0;

    application(
        |state: &TreemapWindow| format!("Tessera | {}", state.app.title),
        TreemapWindow::update,
        TreemapWindow::view,
    )
    .subscription(TreemapWindow::subscription)
    .theme(|_| Theme::Light)
    .window_size((width as f32 + 32.0, height as f32))
    .run_with(move || (TreemapWindow { app }, load(initial)))
}

fn load(request: LoadRequest) -> Task<Message> {
    let LoadRequest { token, path } = request;
    Task::perform(fetch_dataset(path), move |result| Message::Loaded(token, result))
}

impl TreemapWindow {
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Select(dataset) => load(self.app.select(Choice::Builtin(dataset))),
            Message::OpenFile => {
                match rfd::FileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                {
                    Some(path) => load(self.app.select(Choice::File(path))),
                    None => Task::none(),
                }
            }
            Message::Loaded(token, result) => {
                self.app.finish_load(token, result);
                Task::none()
            }
            Message::PointerMoved(point) => {
                let margin = self.app.config.chart.margin;
                self.app.pointer_moved(
                    point.x as f64 - margin,
                    point.y as f64 - margin,
                    Instant::now(),
                );
                Task::none()
            }
            Message::PointerLeft => {
                self.app.pointer_left(Instant::now());
                Task::none()
            }
            // Nothing to update; the redraw reads the fade from the clock.
            Message::Tick(_) => Task::none(),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.app.is_animating(Instant::now()) {
            window::frames().map(Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let app = &self.app;
        let margin = app.config.chart.margin;

        let buttons = Dataset::ALL
            .iter()
            .fold(Row::new().spacing(8), |row, &dataset| {
                row.push(button(dataset.label()).on_press(Message::Select(dataset)))
            })
            .push(button("Open file…").on_press(Message::OpenFile));

        let status = match &app.phase {
            AppPhase::Idle => "Pick a dataset",
            AppPhase::Loading => "Loading…",
            AppPhase::Ready => "",
            AppPhase::Failed(_) => "Could not draw this dataset",
        };

        let chart = Canvas::new(ChartCanvas { app })
            .width(Length::Fixed((app.chart_width + 2.0 * margin) as f32))
            .height(Length::Fixed((app.chart_height + 2.0 * margin) as f32));

        let legend_style = &app.config.legend;
        let legend = Canvas::new(LegendCanvas { app })
            .width(Length::Fixed(legend_style.width as f32))
            .height(Length::Fixed(
                legend_style.height(app.surface.legend.len()) as f32
            ));

        let body = column![
            text(app.title.as_str()).size(26),
            text("Tree map of movies, games and kickstarter data").size(14),
            buttons,
            text(status).size(14),
            chart,
            legend,
        ]
        .spacing(10);

        scrollable(container(body).padding(16).width(Length::Fill)).into()
    }
}

/// Tiles, error indicator and tooltip.
struct ChartCanvas<'a> {
    app: &'a App,
}

impl canvas::Program<Message> for ChartCanvas<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                match cursor.position_in(bounds) {
                    Some(point) => (canvas::event::Status::Captured, Some(Message::PointerMoved(point))),
                    None if self.app.controller.active().is_some() => {
                        (canvas::event::Status::Ignored, Some(Message::PointerLeft))
                    }
                    None => (canvas::event::Status::Ignored, None),
                }
            }
            canvas::Event::Mouse(mouse::Event::CursorLeft) => {
                (canvas::event::Status::Ignored, Some(Message::PointerLeft))
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let surface = &self.app.surface;
        let margin = self.app.config.chart.margin as f32;

        if let Some(message) = &surface.error {
            frame.fill_text(canvas::Text {
                content: message.clone(),
                position: Point::new(margin, margin),
                color: Color::from_rgb8(0xd6, 0x27, 0x28),
                size: Pixels(16.0),
                ..canvas::Text::default()
            });
            return vec![frame.into_geometry()];
        }

        let outline = Stroke::default().with_color(Color::BLACK).with_width(1.0);
        for tile in &surface.tiles {
            let top_left = Point::new(tile.x as f32 + margin, tile.y as f32 + margin);
            let size = Size::new(tile.width as f32, tile.height as f32);
            let fill = if tile.highlighted {
                tile.fill.lighten(HIGHLIGHT)
            } else {
                tile.fill
            };
            frame.fill_rectangle(top_left, size, fill.to_iced());
            frame.stroke(&Path::rectangle(top_left, size), outline.clone());
        }

        let tip = &surface.tooltip;
        let opacity = tip.opacity(Instant::now());
        if tip.visible && opacity > 0.0 {
            // Rough width estimate; iced does not expose text metrics here.
            let width = tip.text.chars().count() as f32 * 7.0 + 2.0 * TOOLTIP_PADDING;
            let height = 16.0 + 2.0 * TOOLTIP_PADDING;
            let mut origin = Point::new(tip.x as f32 + margin, tip.y as f32 + margin);
            origin.x = origin.x.min(bounds.width - width).max(0.0);
            origin.y = origin.y.min(bounds.height - height).max(0.0);

            let background = Path::rounded_rectangle(origin, Size::new(width, height), 5.0_f32.into());
            frame.fill(&background, Color { a: opacity, ..Color::BLACK });
            frame.fill_text(canvas::Text {
                content: tip.text.clone(),
                position: Point::new(origin.x + TOOLTIP_PADDING, origin.y + TOOLTIP_PADDING),
                color: Color { a: opacity, ..Color::WHITE },
                size: Pixels(13.0),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) && self.app.controller.active().is_some() {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

/// One swatch and label per category.
struct LegendCanvas<'a> {
    app: &'a App,
}

impl canvas::Program<Message> for LegendCanvas<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let style = &self.app.config.legend;
        let swatch = style.swatch_size as f32;

        for entry in &self.app.surface.legend {
            let y = entry.y as f32;
            frame.fill_rectangle(
                Point::new(0.0, y),
                Size::new(swatch, swatch),
                entry.swatch.to_iced(),
            );
            frame.fill_text(canvas::Text {
                content: entry.label.to_string(),
                position: Point::new(style.label_offset as f32, y + 2.0),
                color: Color::BLACK,
                size: Pixels(14.0),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}
