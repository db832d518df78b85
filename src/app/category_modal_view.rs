use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Clear, Row, Table, TableState},
};

use chronodex::preferences::PreferenceColumn;

use super::{App, ui_helpers};

impl App {
    pub(super) fn render_category_modal(&self, f: &mut Frame, terminal_size: Rect) {
        let modal_rect = self.modal_rect_ratio(terminal_size, 2, 3);

        let rows: Vec<Row> = self
            .preferences
            .categories
            .iter()
            .enumerate()
            .map(|(row, category)| {
                let swatch = ui_helpers::terminal_color(category.rgba());
                let dot = match swatch {
                    Some(color) => Span::styled("● ", Style::default().fg(color)),
                    None => Span::styled("○ ", Style::default().fg(Color::DarkGray)),
                };

                let cells = PreferenceColumn::ALL.iter().enumerate().map(|(index, &column)| {
                    let selected = row == self.category_row && index == self.category_column;
                    let text = match (&self.edit_buffer, selected) {
                        (Some(buffer), true) => format!("{}_", buffer),
                        _ => self
                            .preferences
                            .category_cell(row, column)
                            .unwrap_or_default(),
                    };
                    let style = if selected {
                        Style::default().fg(Color::Black).bg(Color::White)
                    } else {
                        Style::default()
                    };
                    Cell::from(text).style(style)
                });

                Row::new(std::iter::once(Cell::from(Line::from(dot))).chain(cells))
            })
            .collect();

        let header = Row::new(
            std::iter::once("").chain(PreferenceColumn::ALL.iter().map(|column| column.title())),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let widths = [
            Constraint::Length(2),
            Constraint::Percentage(40),
            Constraint::Length(10),
            Constraint::Length(6),
        ];

        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Line::from(Span::styled(
                    " categories  a add  x remove  e edit  esc close ",
                    Style::default().fg(Color::White),
                )))
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::White)),
        );

        let mut state = TableState::default();
        if !self.preferences.categories.is_empty() {
            state.select(Some(self.category_row));
        }

        f.render_widget(Clear, modal_rect);
        f.render_stateful_widget(table, modal_rect, &mut state);
    }
}
