use std::path::{Path, PathBuf};

use chrono::{Duration as ChronoDuration, NaiveDate};
use log::info;

use crate::{
    domain::Schedule,
    error::StorageError,
    storage,
    table::{ScheduleTable, TableObserver},
};

/// The schedule of the day currently on display.
///
/// Owns the day's [`Schedule`] exclusively and swaps it wholesale when the
/// date changes. Dates never move past `today`.
pub struct DaySession {
    data_dir: PathBuf,
    date: NaiveDate,
    today: NaiveDate,
    schedule: Schedule,
    source: Option<PathBuf>,
}

impl DaySession {
    pub fn open(data_dir: &Path, date: NaiveDate, today: NaiveDate) -> Result<Self, StorageError> {
        let date = date.min(today);
        let loaded = storage::load_schedule_for_date(data_dir, date)?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            date,
            today,
            schedule: loaded.schedule,
            source: loaded.source,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// File the current schedule was loaded from or last saved to.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn table(&mut self) -> ScheduleTable<'_> {
        ScheduleTable::new(&mut self.schedule)
    }

    pub fn table_with<O: TableObserver>(&mut self, observer: O) -> ScheduleTable<'_, O> {
        ScheduleTable::with_observer(&mut self.schedule, observer)
    }

    /// Switches to `date` (clamped to today). Returns `false` when the date
    /// did not change, in which case nothing is saved or reloaded.
    pub fn set_date(&mut self, date: NaiveDate, auto_save: bool) -> Result<bool, StorageError> {
        let date = date.min(self.today);
        if date == self.date {
            return Ok(false);
        }

        if auto_save {
            self.save_if_needed()?;
        }

        let loaded = storage::load_schedule_for_date(&self.data_dir, date)?;
        info!(
            "switched to {} ({} activities)",
            date.format("%Y-%m-%d"),
            loaded.schedule.len()
        );
        self.date = date;
        self.schedule = loaded.schedule;
        self.source = loaded.source;
        Ok(true)
    }

    pub fn shift_days(&mut self, days: i64, auto_save: bool) -> Result<bool, StorageError> {
        let target = self
            .date
            .checked_add_signed(ChronoDuration::days(days))
            .unwrap_or(self.date);
        self.set_date(target, auto_save)
    }

    pub fn prev_day(&mut self, auto_save: bool) -> Result<bool, StorageError> {
        self.shift_days(-1, auto_save)
    }

    pub fn next_day(&mut self, auto_save: bool) -> Result<bool, StorageError> {
        self.shift_days(1, auto_save)
    }

    pub fn prev_week(&mut self, auto_save: bool) -> Result<bool, StorageError> {
        self.shift_days(-7, auto_save)
    }

    pub fn next_week(&mut self, auto_save: bool) -> Result<bool, StorageError> {
        self.shift_days(7, auto_save)
    }

    pub fn go_today(&mut self, auto_save: bool) -> Result<bool, StorageError> {
        self.set_date(self.today, auto_save)
    }

    /// Saves the day as `YYYYMMDD.csv`. A legacy `.txt` source is left
    /// untouched; later loads pick up the new tabular file instead.
    pub fn save(&mut self) -> Result<PathBuf, StorageError> {
        let path = storage::tabular_path_for_date(&self.data_dir, self.date);
        storage::save_schedule(&self.schedule, &path)?;
        self.source = Some(path.clone());
        Ok(path)
    }

    /// Saves unless the day never had a file and is still empty.
    pub fn save_if_needed(&mut self) -> Result<Option<PathBuf>, StorageError> {
        if self.source.is_none() && self.schedule.is_empty() {
            return Ok(None);
        }
        self.save().map(Some)
    }

    pub fn reload(&mut self) -> Result<(), StorageError> {
        let loaded = storage::load_schedule_for_date(&self.data_dir, self.date)?;
        self.schedule = loaded.schedule;
        self.source = loaded.source;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::table::Column;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_navigation_clamps_to_today() {
        let temp = tempdir().unwrap();
        let dir = temp.path();
        let today = date(2026, 10, 19);
        let mut day = DaySession::open(dir, date(2026, 10, 25), today).unwrap();
        assert_eq!(day.date(), today);

        assert!(day.prev_week(false).unwrap());
        assert_eq!(day.date(), date(2026, 10, 12));
        assert!(day.prev_day(false).unwrap());
        assert_eq!(day.date(), date(2026, 10, 11));
        assert!(day.next_day(false).unwrap());
        assert_eq!(day.date(), date(2026, 10, 12));
        assert!(day.next_week(false).unwrap());
        assert_eq!(day.date(), today);

        assert!(!day.next_day(false).unwrap());
        assert!(!day.next_week(false).unwrap());
        assert_eq!(day.date(), today);

        assert!(day.shift_days(-3, false).unwrap());
        assert!(day.next_week(false).unwrap());
        assert_eq!(day.date(), today);
    }

    #[test]
    fn test_changing_date_loads_that_day() {
        let temp = tempdir().unwrap();
        let dir = temp.path();
        fs::write(dir.join("20261018.txt"), "0, sleep, 5,\n8, work, 8, x\n").unwrap();
        let today = date(2026, 10, 19);

        let mut day = DaySession::open(dir, today, today).unwrap();
        assert!(day.schedule().is_empty());
        assert!(day.source().is_none());

        day.prev_day(false).unwrap();
        assert_eq!(day.schedule().len(), 2);
        assert_eq!(day.schedule().activities[1].end, Some(24.0));
        assert_eq!(day.source(), Some(dir.join("20261018.txt").as_path()));
    }

    #[test]
    fn test_auto_save_on_date_change() {
        let temp = tempdir().unwrap();
        let dir = temp.path();
        let today = date(2026, 10, 19);
        let mut day = DaySession::open(dir, today, today).unwrap();

        {
            let mut table = day.table();
            table.insert_row(0);
            table.set_cell(0, Column::End, "24");
            table.set_cell(0, Column::Name, "whole day");
        }
        day.prev_day(true).unwrap();

        let saved = fs::read_to_string(dir.join("20261019.csv")).unwrap();
        assert_eq!(saved, "0.0,24.0,,whole day,5\n");

        day.next_day(false).unwrap();
        assert_eq!(day.schedule().activities[0].name, "whole day");
    }

    #[test]
    fn test_empty_untouched_day_is_not_written() {
        let temp = tempdir().unwrap();
        let dir = temp.path();
        let today = date(2026, 10, 19);
        let mut day = DaySession::open(dir, today, today).unwrap();
        day.prev_day(true).unwrap();
        assert!(!dir.join("20261019.csv").exists());
    }

    #[test]
    fn test_saving_legacy_day_writes_tabular_copy() {
        let temp = tempdir().unwrap();
        let dir = temp.path();
        let legacy = "9, work, 8, morning meeting\n";
        fs::write(dir.join("20261001.txt"), legacy).unwrap();
        let today = date(2026, 10, 19);

        let mut day = DaySession::open(dir, date(2026, 10, 1), today).unwrap();
        let path = day.save().unwrap();

        assert_eq!(path, dir.join("20261001.csv"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "9.0,24.0,work,morning meeting,8\n"
        );
        assert_eq!(fs::read_to_string(dir.join("20261001.txt")).unwrap(), legacy);

        day.reload().unwrap();
        assert_eq!(day.source(), Some(path.as_path()));
    }
}
