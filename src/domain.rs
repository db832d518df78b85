use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{FILE_NAMES, HOURS_PER_DAY, WEIGHT_SETTINGS};

/// One scheduled interval of a day, expressed in fractional hours.
///
/// `start`/`end` are `None` while a row is only partially filled in (for
/// instance a freshly inserted table row). Such activities stay in the
/// schedule but are skipped by rendering and saving.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub name: String,
    pub category: String,
    pub weight: f64,
}

impl Default for Activity {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            name: String::new(),
            category: String::new(),
            weight: WEIGHT_SETTINGS.activity_default,
        }
    }
}

impl Activity {
    pub fn new(
        start: f64,
        end: f64,
        category: impl Into<String>,
        name: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            name: name.into(),
            category: category.into(),
            weight,
        }
    }

    /// Whether the activity can be drawn and persisted.
    ///
    /// `start` must lie in `[0, 24)`, `end` in `[0, 24]` (24 closes the day),
    /// the interval must not be empty and `weight` must lie in `[0, 10]`.
    pub fn is_valid(&self) -> bool {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return false;
        };
        let finite = start.is_finite() && end.is_finite() && self.weight.is_finite();
        finite
            && (0.0..HOURS_PER_DAY).contains(&start)
            && (0.0..=HOURS_PER_DAY).contains(&end)
            && start != end
            && (WEIGHT_SETTINGS.min..=WEIGHT_SETTINGS.max).contains(&self.weight)
    }

    /// Interval bounds, only for valid activities.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if self.is_valid() {
            self.start.zip(self.end)
        } else {
            None
        }
    }

    pub fn duration_hours(&self) -> Option<f64> {
        self.bounds().map(|(start, end)| end - start)
    }
}

/// The ordered activities of one day. Order is draw order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub activities: Vec<Activity>,
}

impl Schedule {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Activity> {
        self.activities.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter()
    }

    pub fn valid_activities(&self) -> impl Iterator<Item = &Activity> {
        self.activities.iter().filter(|activity| activity.is_valid())
    }

    pub fn valid_count(&self) -> usize {
        self.valid_activities().count()
    }

    /// Sum of the valid intervals' lengths, in hours.
    pub fn covered_hours(&self) -> f64 {
        self.activities
            .iter()
            .filter_map(Activity::duration_hours)
            .sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleFormat {
    /// `start, category, weight, name`; end times inferred from the next row.
    Compact,
    /// `start, end, category, name, weight`.
    Tabular,
}

impl ScheduleFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        if extension == FILE_NAMES.tabular_extension {
            Some(ScheduleFormat::Tabular)
        } else if extension == FILE_NAMES.compact_extension {
            Some(ScheduleFormat::Compact)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ScheduleFormat::Compact => FILE_NAMES.compact_extension,
            ScheduleFormat::Tabular => FILE_NAMES.tabular_extension,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_valid_activity() {
        let activity = Activity::new(9.5, 11.0, "fun", "walk", 7.0);
        assert!(activity.is_valid());
        assert_eq!(activity.duration_hours(), Some(1.5));
    }

    #[test]
    fn test_day_closing_end_is_valid() {
        assert!(Activity::new(23.0, 24.0, "work", "", 10.0).is_valid());
        assert!(!Activity::new(24.0, 24.0, "work", "", 10.0).is_valid());
    }

    #[test]
    fn test_invalid_activities() {
        assert!(!Activity::new(9.0, 9.0, "", "", 5.0).is_valid());
        assert!(!Activity::new(9.0, 10.0, "", "", 10.5).is_valid());
        assert!(!Activity::new(9.0, 10.0, "", "", -1.0).is_valid());
        assert!(!Activity::new(-1.0, 10.0, "", "", 5.0).is_valid());
        assert!(!Activity::new(25.0, 10.0, "", "", 5.0).is_valid());
        assert!(!Activity::new(9.0, f64::NAN, "", "", 5.0).is_valid());
        assert!(!Activity::default().is_valid());
    }

    #[test]
    fn test_reversed_interval_is_still_drawable() {
        let activity = Activity::new(20.0, 18.0, "", "", 5.0);
        assert!(activity.is_valid());
        assert_eq!(activity.duration_hours(), Some(-2.0));
    }

    #[test]
    fn test_schedule_keeps_invalid_rows() {
        let schedule = Schedule::new(vec![
            Activity::new(0.0, 8.0, "sleep", "", 5.0),
            Activity::default(),
            Activity::new(8.0, 24.0, "work", "", 5.0),
        ]);
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule.valid_count(), 2);
        assert_eq!(schedule.covered_hours(), 24.0);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ScheduleFormat::from_path(&PathBuf::from("20191113.txt")),
            Some(ScheduleFormat::Compact)
        );
        assert_eq!(
            ScheduleFormat::from_path(&PathBuf::from("/data/20191113.CSV")),
            Some(ScheduleFormat::Tabular)
        );
        assert_eq!(ScheduleFormat::from_path(&PathBuf::from("notes.md")), None);
        assert_eq!(ScheduleFormat::from_path(&PathBuf::from("20191113")), None);
    }
}
