use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use directories::ProjectDirs;
use log::{info, warn};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    codec,
    constants::{FILE_NAMES, MAX_BACKUPS_PER_FILE},
    domain::{Schedule, ScheduleFormat},
    error::StorageError,
    preferences::Preferences,
};

const DATE_STEM_FORMAT: &str = "%Y%m%d";

pub struct LoadedSchedule {
    pub schedule: Schedule,
    /// File the schedule was read from; `None` when the day has no file yet.
    pub source: Option<PathBuf>,
}

pub fn date_stem(date: NaiveDate) -> String {
    date.format(DATE_STEM_FORMAT).to_string()
}

pub fn date_from_stem(stem: &str) -> Option<NaiveDate> {
    if stem.len() != 8 {
        return None;
    }
    NaiveDate::parse_from_str(stem, DATE_STEM_FORMAT).ok()
}

/// Path the day is saved to.
pub fn tabular_path_for_date(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.{}", date_stem(date), FILE_NAMES.tabular_extension))
}

/// Existing file for the day, preferring the tabular one.
pub fn schedule_path_for_date(dir: &Path, date: NaiveDate) -> Option<PathBuf> {
    [ScheduleFormat::Tabular, ScheduleFormat::Compact]
        .into_iter()
        .map(|format| dir.join(format!("{}.{}", date_stem(date), format.extension())))
        .find(|path| path.is_file())
}

/// Days that have a schedule file in `dir`, oldest first.
pub fn list_schedule_dates(dir: &Path) -> Vec<NaiveDate> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut dates: Vec<NaiveDate> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| ScheduleFormat::from_path(path).is_some())
        .filter_map(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(date_from_stem)
        })
        .collect();
    dates.sort();
    dates.dedup();
    dates
}

/// Reads a schedule file; a missing file is an empty schedule.
pub fn load_schedule(path: &Path) -> Result<Schedule, StorageError> {
    let format = ScheduleFormat::from_path(path)
        .ok_or_else(|| StorageError::UnsupportedFormat(path.to_path_buf()))?;

    if !path.exists() {
        return Ok(Schedule::default());
    }

    let content = fs::read_to_string(path).map_err(|e| StorageError::read(path, e))?;
    let schedule = codec::parse(format, &content);
    info!(
        "loaded {} activities ({} valid) from {}",
        schedule.len(),
        schedule.valid_count(),
        path.display()
    );
    Ok(schedule)
}

pub fn load_schedule_for_date(dir: &Path, date: NaiveDate) -> Result<LoadedSchedule, StorageError> {
    match schedule_path_for_date(dir, date) {
        Some(path) => Ok(LoadedSchedule {
            schedule: load_schedule(&path)?,
            source: Some(path),
        }),
        None => Ok(LoadedSchedule {
            schedule: Schedule::default(),
            source: None,
        }),
    }
}

/// Writes the valid activities of `schedule` in tabular form.
pub fn save_schedule(schedule: &Schedule, path: &Path) -> Result<(), StorageError> {
    match ScheduleFormat::from_path(path) {
        Some(ScheduleFormat::Tabular) => {}
        Some(ScheduleFormat::Compact) => {
            return Err(StorageError::ReadOnlyFormat(path.to_path_buf()));
        }
        None => return Err(StorageError::UnsupportedFormat(path.to_path_buf())),
    }

    let content = codec::serialize_tabular(schedule)?;
    atomic_write(path, &content)?;
    info!(
        "saved {} of {} activities to {}",
        schedule.valid_count(),
        schedule.len(),
        path.display()
    );
    Ok(())
}

pub fn preferences_path(data_dir: &Path) -> PathBuf {
    data_dir.join(FILE_NAMES.preferences)
}

/// Reads the preference document, falling back to defaults when it is
/// missing or unreadable.
pub fn load_preferences(path: &Path) -> Preferences {
    if !path.exists() {
        return Preferences::default();
    }

    match read_json::<Preferences>(path) {
        Ok(preferences) => preferences,
        Err(e) => {
            warn!("could not load preferences, using defaults: {}", e);
            Preferences::default()
        }
    }
}

pub fn save_preferences(path: &Path, preferences: &Preferences) -> Result<(), StorageError> {
    write_json_atomic(path, preferences)
}

pub fn get_data_dir() -> PathBuf {
    let local = Path::new(".");
    if preferences_path(local).exists() || !list_schedule_dates(local).is_empty() {
        return PathBuf::from(".");
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "chronodex", "chronodex") {
        let data_dir = proj_dirs.data_dir().to_path_buf();
        fs::create_dir_all(&data_dir).ok();
        data_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_state_dir(data_dir: &Path) -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "chronodex", "chronodex")
        && let Some(state_dir) = proj_dirs.state_dir()
    {
        let dir = state_dir.to_path_buf();
        if fs::create_dir_all(&dir).is_ok() {
            return dir;
        }
    }
    data_dir.to_path_buf()
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let content = fs::read_to_string(path).map_err(|e| StorageError::read(path, e))?;
    serde_json::from_str(&content).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, &json)
}

pub fn create_backup(path: &Path) -> Result<(), StorageError> {
    if !path.is_file() {
        return Ok(());
    }

    let backup_dir = path
        .parent()
        .unwrap_or(Path::new("."))
        .join(FILE_NAMES.backups_dir);
    fs::create_dir_all(&backup_dir).map_err(|e| StorageError::write(&backup_dir, e))?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!(
        "{}.{}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        timestamp
    );
    let backup_path = backup_dir.join(&filename);
    fs::copy(path, &backup_path).map_err(|e| StorageError::write(&backup_path, e))?;

    let prefix = path.file_name().unwrap_or_default().to_string_lossy();
    if let Ok(entries) = fs::read_dir(&backup_dir) {
        let mut backups: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(&*prefix))
            .collect();
        backups.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

        let excess = backups.len().saturating_sub(MAX_BACKUPS_PER_FILE);
        for oldest in backups.iter().take(excess) {
            let _ = fs::remove_file(oldest.path());
        }
    }

    Ok(())
}

pub fn atomic_write(path: &Path, content: &str) -> Result<(), StorageError> {
    if path.exists() {
        create_backup(path)?;
    }

    let tmp_path = path.with_extension("tmp");
    let result = write_and_replace(&tmp_path, path, content);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_and_replace(tmp_path: &Path, path: &Path, content: &str) -> Result<(), StorageError> {
    let mut tmp_file = File::create(tmp_path).map_err(|e| StorageError::write(tmp_path, e))?;
    tmp_file
        .write_all(content.as_bytes())
        .map_err(|e| StorageError::write(tmp_path, e))?;
    tmp_file
        .sync_all()
        .map_err(|e| StorageError::write(tmp_path, e))?;
    fs::rename(tmp_path, path).map_err(|e| StorageError::write(path, e))
}
