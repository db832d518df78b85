use chronodex::preferences::PreferenceColumn;

use super::{App, UiMode};

impl App {
    pub(super) fn open_category_modal(&mut self) {
        self.ui_mode = UiMode::CategoryModal;
        self.edit_buffer = None;
        self.clamp_category_selection();
        self.render_needed = true;
    }

    /// Leaves the modal and writes preferences; the dial is redrawn with
    /// whatever colors and weights the edits produced.
    pub(super) fn close_category_modal(&mut self) {
        self.ui_mode = UiMode::Main;
        self.edit_buffer = None;
        self.persist_preferences();
        self.render_needed = true;
    }

    pub(super) fn selected_preference_column(&self) -> PreferenceColumn {
        PreferenceColumn::ALL
            .get(self.category_column)
            .copied()
            .unwrap_or(PreferenceColumn::Category)
    }

    pub(super) fn clamp_category_selection(&mut self) {
        let rows = self.preferences.categories.len();
        if self.category_row >= rows {
            self.category_row = rows.saturating_sub(1);
        }
        if self.category_column >= PreferenceColumn::ALL.len() {
            self.category_column = 0;
        }
    }

    pub(super) fn begin_category_edit(&mut self) {
        let column = self.selected_preference_column();
        if let Some(current) = self.preferences.category_cell(self.category_row, column) {
            self.edit_buffer = Some(current);
        }
    }

    pub(super) fn commit_category_edit(&mut self, input: &str) {
        let column = self.selected_preference_column();
        if self
            .preferences
            .set_category_cell(self.category_row, column, input)
        {
            self.set_status(format!("{} updated", column.title()));
        } else {
            self.set_status(format!("Rejected {} `{}`", column.title(), input.trim()));
        }
    }

    pub(super) fn insert_category_after_selection(&mut self) {
        let position = if self.preferences.categories.is_empty() {
            0
        } else {
            self.category_row + 1
        };
        if self.preferences.insert_category(position) {
            self.category_row = position;
            self.category_column = 0;
            self.begin_category_edit();
            self.render_needed = true;
        }
    }

    pub(super) fn remove_selected_category(&mut self) {
        if let Some(removed) = self.preferences.remove_category(self.category_row) {
            self.clamp_category_selection();
            self.set_status(format!("Removed category `{}`", removed.name));
        }
    }
}
