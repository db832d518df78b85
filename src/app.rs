use std::{io, path::PathBuf, time::Duration};

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use chronodex::{
    constants::UI_SETTINGS,
    day::DaySession,
    layout::{Layout, RenderConfig, compute_layout},
    preferences::Preferences,
    storage,
    table::{Column, EventLog},
};

use crate::cli::{CliError, Context};

mod category_modal_view;
mod category_state;
mod dial_view;
mod event_handlers;
mod render_views;
mod ui_helpers;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UiMode {
    Main,
    CategoryModal,
}

struct App {
    day: DaySession,
    preferences: Preferences,
    preferences_path: PathBuf,
    ui_mode: UiMode,
    selected_row: usize,
    selected_column: Column,
    category_row: usize,
    category_column: usize,
    edit_buffer: Option<String>,
    status: String,
    render_needed: bool,
}

impl App {
    fn new(context: Context, date: Option<NaiveDate>) -> Result<Self, CliError> {
        let date = date.unwrap_or(context.today);
        let day = DaySession::open(&context.data_dir, date, context.today)?;
        let preferences_path = storage::preferences_path(&context.data_dir);

        Ok(Self {
            day,
            preferences: context.preferences,
            preferences_path,
            ui_mode: UiMode::Main,
            selected_row: 0,
            selected_column: Column::Start,
            category_row: 0,
            category_column: 0,
            edit_buffer: None,
            status: String::new(),
            render_needed: true,
        })
    }

    fn in_category_modal(&self) -> bool {
        matches!(self.ui_mode, UiMode::CategoryModal)
    }

    fn is_editing(&self) -> bool {
        self.edit_buffer.is_some()
    }

    fn current_layout(&self) -> Layout {
        let config = RenderConfig::from_preferences(&self.preferences);
        compute_layout(self.day.schedule(), &self.preferences, &config)
    }

    fn clamp_selection(&mut self) {
        let rows = self.day.schedule().len();
        if self.selected_row >= rows {
            self.selected_row = rows.saturating_sub(1);
        }
    }

    /// Applies table events to view state. Any event means a redraw.
    fn absorb_events(&mut self, log: &mut EventLog) {
        if !log.is_empty() {
            log.take();
            self.clamp_selection();
            self.render_needed = true;
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.render_needed = true;
    }

    fn report<T>(&mut self, result: Result<T, chronodex::StorageError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{}", e);
                self.set_status(format!("Error: {}", e));
                None
            }
        }
    }

    fn save_day(&mut self) {
        let result = self.day.save();
        if let Some(path) = self.report(result) {
            self.set_status(format!("Saved {}", path.display()));
        }
    }

    fn persist_preferences(&mut self) {
        let result = storage::save_preferences(&self.preferences_path, &self.preferences);
        if self.report(result).is_some() {
            info!("preferences saved to {}", self.preferences_path.display());
        }
    }

    fn modal_rect_ratio(&self, terminal_size: Rect, numerator: u16, denominator: u16) -> Rect {
        let target_width = terminal_size.width.saturating_mul(numerator) / denominator;
        let target_height = (terminal_size.height.saturating_mul(numerator) / denominator).max(10);

        let max_width = terminal_size.width.saturating_sub(2).max(1);
        let max_height = terminal_size.height.saturating_sub(2).max(1);

        let modal_width = target_width.clamp(1, max_width);
        let modal_height = target_height.clamp(1, max_height);

        let modal_x = (terminal_size.width.saturating_sub(modal_width)) / 2;
        let modal_y = (terminal_size.height.saturating_sub(modal_height)) / 2;

        Rect::new(modal_x, modal_y, modal_width, modal_height)
    }

    fn shutdown(&mut self) {
        if self.preferences.auto_save {
            let result = self.day.save_if_needed();
            self.report(result);
        }
    }
}

pub fn run_ui(context: Context, date: Option<NaiveDate>) -> Result<(), CliError> {
    let mut app = App::new(context, date)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), CliError> {
    let poll_rate = Duration::from_millis(UI_SETTINGS.poll_ms);

    loop {
        if app.render_needed {
            terminal.draw(|f| app.draw_frame(f))?;
            app.render_needed = false;
        }

        if event::poll(poll_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        return Ok(());
                    }
                }
                Event::Resize(_, _) => app.render_needed = true,
                _ => {}
            }
        }
    }
}
