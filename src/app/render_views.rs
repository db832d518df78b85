use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout as AreaLayout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use chronodex::{constants::UI_SETTINGS, table::Column};

use super::{App, ui_helpers};

const HELP_TEXT: &str = "e edit  a/i insert  x remove  s save  h/l day  H/L week  t today  \
                         1 labels  2 rotate  3 rings  4 weight  5 autosave  c categories  q quit";

fn toggle_span(name: &str, on: bool) -> Span<'static> {
    let style = if on {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("{} ", name), style)
}

impl App {
    pub(super) fn draw_frame(&mut self, f: &mut Frame) {
        let size = f.size();

        let rows = AreaLayout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(size);
        let columns = AreaLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(UI_SETTINGS.canvas_percent),
                Constraint::Percentage(100 - UI_SETTINGS.canvas_percent),
            ])
            .split(rows[0]);

        self.render_dial(f, columns[0]);
        self.render_table(f, columns[1]);
        self.render_status(f, rows[1]);

        if self.in_category_modal() {
            self.render_category_modal(f, size);
        }
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let preferences = &self.preferences;
        let editing_cell = !self.in_category_modal() && self.is_editing();
        let table = self.day.table();

        let rows: Vec<Row> = (0..table.row_count())
            .map(|row| {
                let activity = &table.schedule().activities[row];
                let swatch = ui_helpers::terminal_color(preferences.resolve_style(activity).color);
                let marker = if activity.is_valid() { " " } else { "!" };

                let cells = Column::ALL.iter().map(|&column| {
                    let selected = row == self.selected_row && column == self.selected_column;
                    let text = match (&self.edit_buffer, selected && editing_cell) {
                        (Some(buffer), true) => format!("{}_", buffer),
                        _ => table
                            .cell(row, column)
                            .map(|value| value.to_string())
                            .unwrap_or_default(),
                    };
                    let style = if selected {
                        Style::default().fg(Color::Black).bg(Color::White)
                    } else if column == Column::Category
                        && let Some(color) = swatch
                    {
                        Style::default()
                            .fg(ui_helpers::text_color_for_bg(color))
                            .bg(color)
                    } else {
                        Style::default()
                    };
                    Cell::from(text).style(style)
                });

                Row::new(std::iter::once(Cell::from(marker)).chain(cells))
            })
            .collect();

        let header = Row::new(
            std::iter::once("").chain(Column::ALL.iter().map(|column| column.title())),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let widths = [
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Percentage(25),
            Constraint::Min(8),
            Constraint::Length(6),
        ];

        let title = format!(
            " {} activities, {:.1}h ",
            table.row_count(),
            table.schedule().covered_hours()
        );
        let widget = Table::new(rows, widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(title)
                .border_style(Style::default().fg(Color::Gray)),
        );

        let mut state = TableState::default();
        if table.row_count() > 0 {
            state.select(Some(self.selected_row));
        }
        f.render_stateful_widget(widget, area, &mut state);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let preferences = &self.preferences;
        let mut spans = vec![
            toggle_span("labels", preferences.show_labels),
            toggle_span("rotate", preferences.rotate_labels),
            toggle_span("rings", preferences.show_overlay),
            toggle_span("weight", preferences.use_custom_weight),
            toggle_span("autosave", preferences.auto_save),
        ];
        if !self.status.is_empty() {
            spans.push(Span::styled(
                format!("| {}", self.status),
                Style::default().fg(Color::Yellow),
            ));
        }

        let paragraph = Paragraph::new(vec![
            Line::from(spans),
            Line::from(Span::styled(HELP_TEXT, Style::default().fg(Color::DarkGray))),
        ])
        .block(Block::default().borders(Borders::TOP));
        f.render_widget(paragraph, area);
    }
}
