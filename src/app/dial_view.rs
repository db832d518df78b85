use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        Block, BorderType, Borders,
        canvas::{Canvas, Circle, Context, Line as CanvasLine},
    },
};

use chronodex::{
    constants::{CLOCK_FACE, HOURS_PER_DAY, UI_SETTINGS},
    layout::{Layout, Point, WedgeGeometry, hour_to_angle},
};

use super::{App, ui_helpers};

const RING_COLOR: Color = Color::DarkGray;
const OUTLINE_COLOR: Color = Color::DarkGray;
const SELECTED_COLOR: Color = Color::White;
const HOUR_LABEL_STEP: usize = 3;
const HOUR_LABEL_DISTANCE: f64 = 275.0;

/// Flips a y-down window point into the canvas' y-up space.
fn to_canvas(point: Point) -> (f64, f64) {
    (point.x, CLOCK_FACE.window_size - point.y)
}

fn stroke(ctx: &mut Context, from: Point, to: Point, color: Color) {
    let (x1, y1) = to_canvas(from);
    let (x2, y2) = to_canvas(to);
    ctx.draw(&CanvasLine {
        x1,
        y1,
        x2,
        y2,
        color,
    });
}

fn fill_wedge(ctx: &mut Context, wedge: &WedgeGeometry, color: Color) {
    for point in wedge.arc_points(UI_SETTINGS.fill_step_degrees) {
        stroke(ctx, wedge.center, point, color);
    }
}

fn outline_wedge(ctx: &mut Context, wedge: &WedgeGeometry, color: Color) {
    let arc = wedge.arc_points(UI_SETTINGS.fill_step_degrees);
    if let (Some(&first), Some(&last)) = (arc.first(), arc.last()) {
        stroke(ctx, wedge.center, first, color);
        stroke(ctx, wedge.center, last, color);
    }
    for pair in arc.windows(2) {
        stroke(ctx, pair[0], pair[1], color);
    }
}

fn paint_dial(ctx: &mut Context, layout: &Layout, selected: Option<usize>) {
    for ring in &layout.rings {
        let (x, y) = to_canvas(ring.center);
        ctx.draw(&Circle {
            x,
            y,
            radius: ring.radius,
            color: RING_COLOR,
        });
    }
    ctx.layer();

    for item in &layout.items {
        match ui_helpers::terminal_color(item.wedge.color) {
            Some(color) => fill_wedge(ctx, &item.wedge, color),
            None => outline_wedge(ctx, &item.wedge, OUTLINE_COLOR),
        }
    }
    ctx.layer();

    if let Some(item) = layout
        .items
        .iter()
        .find(|item| Some(item.activity_index) == selected)
    {
        outline_wedge(ctx, &item.wedge, SELECTED_COLOR);
    }

    let center = CLOCK_FACE.window_size / 2.0;
    for hour in (0..HOURS_PER_DAY as usize).step_by(HOUR_LABEL_STEP) {
        let angle = hour_to_angle(hour as f64).to_radians();
        ctx.print(
            center + HOUR_LABEL_DISTANCE * angle.cos(),
            center + HOUR_LABEL_DISTANCE * angle.sin(),
            Span::styled(hour.to_string(), Style::default().fg(Color::Gray)),
        );
    }

    for item in &layout.items {
        let Some(label) = item.label.as_ref().filter(|label| !label.text.is_empty()) else {
            continue;
        };
        let (x, y) = to_canvas(label.position);
        let fg = ui_helpers::terminal_color(item.wedge.color)
            .map(ui_helpers::text_color_for_bg)
            .unwrap_or(Color::White);
        ctx.print(x, y, Span::styled(label.text.clone(), Style::default().fg(fg)));
    }
}

impl App {
    pub(super) fn render_dial(&self, f: &mut Frame, area: Rect) {
        let layout = self.current_layout();
        let selected = (!self.in_category_modal()).then_some(self.selected_row);
        let title = self.day.date().format(" %a %Y-%m-%d ").to_string();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let window = CLOCK_FACE.window_size;
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, window])
            .y_bounds([0.0, window])
            .paint(|ctx| paint_dial(ctx, &layout, selected));

        f.render_widget(canvas, ui_helpers::square_canvas_area(inner));
    }
}
