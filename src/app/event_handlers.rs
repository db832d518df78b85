use crossterm::event::{KeyCode, KeyEvent};

use chronodex::{
    StorageError,
    preferences::{PreferenceColumn, Preferences},
    table::{Column, EventLog},
};

use super::{App, ui_helpers};

impl App {
    /// Returns `true` when the application should exit.
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.is_editing() {
            self.handle_edit_key(key);
            false
        } else if self.in_category_modal() {
            self.handle_modal_key(key);
            false
        } else {
            self.handle_normal_key(key)
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Some(buffer) = self.edit_buffer.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => self.edit_buffer = None,
            KeyCode::Enter => {
                let input = self.edit_buffer.take().unwrap_or_default();
                if self.in_category_modal() {
                    self.commit_category_edit(&input);
                } else {
                    self.commit_cell_edit(&input);
                }
            }
            _ => {}
        }

        self.render_needed = true;
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let rows = self.preferences.categories.len();
        let columns = PreferenceColumn::ALL.len();

        match key.code {
            KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => self.close_category_modal(),
            KeyCode::Up => self.category_row = ui_helpers::wrap_prev_index(self.category_row, rows),
            KeyCode::Down => {
                self.category_row = ui_helpers::wrap_next_index(self.category_row, rows)
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.category_column = ui_helpers::wrap_prev_index(self.category_column, columns)
            }
            KeyCode::Right | KeyCode::Tab => {
                self.category_column = ui_helpers::wrap_next_index(self.category_column, columns)
            }
            KeyCode::Enter | KeyCode::Char('e') => self.begin_category_edit(),
            KeyCode::Char('a') => self.insert_category_after_selection(),
            KeyCode::Char('x') => self.remove_selected_category(),
            _ => {}
        }

        self.render_needed = true;
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        let rows = self.day.schedule().len();
        let columns = Column::ALL.len();
        let auto_save = self.preferences.auto_save;

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => self.selected_row = ui_helpers::wrap_prev_index(self.selected_row, rows),
            KeyCode::Down => {
                self.selected_row = ui_helpers::wrap_next_index(self.selected_row, rows)
            }
            KeyCode::Left | KeyCode::BackTab => {
                let index = ui_helpers::wrap_prev_index(self.selected_column.index(), columns);
                self.selected_column = Column::from_index(index).unwrap_or(Column::Start);
            }
            KeyCode::Right | KeyCode::Tab => {
                let index = ui_helpers::wrap_next_index(self.selected_column.index(), columns);
                self.selected_column = Column::from_index(index).unwrap_or(Column::Start);
            }
            KeyCode::Enter | KeyCode::Char('e') => self.begin_cell_edit(),
            KeyCode::Char('a') => {
                let position = if rows == 0 { 0 } else { self.selected_row + 1 };
                self.insert_row_at(position);
            }
            KeyCode::Char('i') => self.insert_row_at(self.selected_row.min(rows)),
            KeyCode::Char('x') => self.remove_selected_row(),
            KeyCode::Char('s') => self.save_day(),
            KeyCode::Char('h') => {
                let result = self.day.prev_day(auto_save);
                self.after_navigation(result);
            }
            KeyCode::Char('l') => {
                let result = self.day.next_day(auto_save);
                self.after_navigation(result);
            }
            KeyCode::Char('H') => {
                let result = self.day.prev_week(auto_save);
                self.after_navigation(result);
            }
            KeyCode::Char('L') => {
                let result = self.day.next_week(auto_save);
                self.after_navigation(result);
            }
            KeyCode::Char('t') => {
                let result = self.day.go_today(auto_save);
                self.after_navigation(result);
            }
            KeyCode::Char('r') => {
                let result = self.day.reload();
                if self.report(result).is_some() {
                    self.clamp_selection();
                    self.set_status("Reloaded");
                }
            }
            KeyCode::Char('1') => self.toggle_preference("Labels", |p| &mut p.show_labels),
            KeyCode::Char('2') => self.toggle_preference("Rotation", |p| &mut p.rotate_labels),
            KeyCode::Char('3') => self.toggle_preference("Overlay", |p| &mut p.show_overlay),
            KeyCode::Char('4') => {
                self.toggle_preference("Custom weight", |p| &mut p.use_custom_weight)
            }
            KeyCode::Char('5') => self.toggle_preference("Auto-save", |p| &mut p.auto_save),
            KeyCode::Char('c') => self.open_category_modal(),
            _ => {}
        }

        self.render_needed = true;
        false
    }

    fn begin_cell_edit(&mut self) {
        let (row, column) = (self.selected_row, self.selected_column);
        if let Some(value) = self.day.table().cell(row, column) {
            self.edit_buffer = Some(value.to_string());
        }
    }

    fn commit_cell_edit(&mut self, input: &str) {
        let (row, column) = (self.selected_row, self.selected_column);
        let mut log = EventLog::default();
        let accepted = self.day.table_with(&mut log).set_cell(row, column, input);
        self.absorb_events(&mut log);

        if !accepted {
            self.set_status(format!("Rejected {} `{}`", column.title(), input.trim()));
        }
    }

    fn insert_row_at(&mut self, position: usize) {
        let mut log = EventLog::default();
        if self.day.table_with(&mut log).insert_row(position) {
            self.selected_row = position;
        }
        self.absorb_events(&mut log);
    }

    fn remove_selected_row(&mut self) {
        let mut log = EventLog::default();
        self.day.table_with(&mut log).remove_row(self.selected_row);
        self.absorb_events(&mut log);
    }

    fn after_navigation(&mut self, result: Result<bool, StorageError>) {
        if let Some(true) = self.report(result) {
            self.selected_row = 0;
            self.edit_buffer = None;
            let date = self.day.date().format("%A %Y-%m-%d").to_string();
            self.set_status(date);
        }
    }

    fn toggle_preference(
        &mut self,
        name: &str,
        field: impl FnOnce(&mut Preferences) -> &mut bool,
    ) {
        let flag = field(&mut self.preferences);
        *flag = !*flag;
        let state = if *flag { "on" } else { "off" };
        self.set_status(format!("{} {}", name, state));
        self.persist_preferences();
    }
}
