use ratatui::{layout::Rect, style::Color};

use chronodex::preferences::Rgba;

pub fn wrap_prev_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

pub fn wrap_next_index(current: usize, len: usize) -> usize {
    if len == 0 || current + 1 >= len {
        0
    } else {
        current + 1
    }
}

/// Terminal color for a category color; fully transparent maps to `None`.
pub fn terminal_color(color: Rgba) -> Option<Color> {
    if color.is_transparent() {
        None
    } else {
        Some(Color::Rgb(color.r, color.g, color.b))
    }
}

pub fn text_color_for_bg(bg_color: Color) -> Color {
    if let Color::Rgb(r, g, b) = bg_color {
        let brightness = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
        if brightness > 128 {
            Color::Black
        } else {
            Color::White
        }
    } else {
        Color::White
    }
}

/// Largest centered rect inside `area` that looks square on a terminal whose
/// cells are about twice as tall as they are wide.
pub fn square_canvas_area(area: Rect) -> Rect {
    let height = area.height.min(area.width / 2);
    let width = height.saturating_mul(2);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
