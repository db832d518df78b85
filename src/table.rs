//! Grid projection of a [`Schedule`] for interactive editing.
//!
//! Structural edits are bracketed by begin/end events so a view can resize
//! around them; cell edits report the single cell that changed.

use std::fmt;

use itertools::Itertools;

use crate::{
    codec::format_weight,
    domain::{Activity, Schedule},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Start,
    End,
    Category,
    Name,
    Weight,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Start,
        Column::End,
        Column::Category,
        Column::Name,
        Column::Weight,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            Column::Start => 0,
            Column::End => 1,
            Column::Category => 2,
            Column::Name => 3,
            Column::Weight => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Column::Start => "Start",
            Column::End => "End",
            Column::Category => "Category",
            Column::Name => "Name",
            Column::Weight => "Weight",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Column::Start | Column::End | Column::Weight)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(value) => f.write_str(&format_weight(*value)),
            CellValue::Text(value) => f.write_str(value),
            CellValue::Empty => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableEvent {
    DataChanged { row: usize, column: Column },
    BeginInsertRows { first: usize, last: usize },
    EndInsertRows,
    BeginRemoveRows { first: usize, last: usize },
    EndRemoveRows,
}

pub trait TableObserver {
    fn notify(&mut self, event: &TableEvent);
}

impl<T: TableObserver + ?Sized> TableObserver for &mut T {
    fn notify(&mut self, event: &TableEvent) {
        (**self).notify(event);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl TableObserver for NoopObserver {
    fn notify(&mut self, _event: &TableEvent) {}
}

/// Records every event it sees.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<TableEvent>,
}

impl EventLog {
    pub fn take(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl TableObserver for EventLog {
    fn notify(&mut self, event: &TableEvent) {
        self.events.push(event.clone());
    }
}

pub struct ScheduleTable<'a, O: TableObserver = NoopObserver> {
    schedule: &'a mut Schedule,
    observer: O,
}

impl<'a> ScheduleTable<'a, NoopObserver> {
    pub fn new(schedule: &'a mut Schedule) -> Self {
        Self {
            schedule,
            observer: NoopObserver,
        }
    }
}

impl<'a, O: TableObserver> ScheduleTable<'a, O> {
    pub fn with_observer(schedule: &'a mut Schedule, observer: O) -> Self {
        Self { schedule, observer }
    }

    pub fn row_count(&self) -> usize {
        self.schedule.len()
    }

    pub fn column_count(&self) -> usize {
        Column::ALL.len()
    }

    pub fn cell(&self, row: usize, column: Column) -> Option<CellValue> {
        let activity = self.schedule.get(row)?;
        Some(read_cell(activity, column))
    }

    /// Writes user input into one cell.
    ///
    /// Numeric columns only accept input that parses as a number; anything
    /// else is ignored and the previous value kept. Returns whether the
    /// activity was written.
    pub fn set_cell(&mut self, row: usize, column: Column, input: &str) -> bool {
        let Some(activity) = self.schedule.activities.get_mut(row) else {
            return false;
        };
        let input = input.trim();

        match column {
            Column::Start | Column::End | Column::Weight => {
                let Ok(value) = input.parse::<f64>() else {
                    return false;
                };
                match column {
                    Column::Start => activity.start = Some(value),
                    Column::End => activity.end = Some(value),
                    _ => activity.weight = value,
                }
            }
            Column::Category => activity.category = input.to_string(),
            Column::Name => activity.name = input.to_string(),
        }

        self.observer.notify(&TableEvent::DataChanged { row, column });
        true
    }

    /// Inserts a blank activity at `position`.
    ///
    /// At position 0 it starts at midnight; elsewhere it starts where the
    /// preceding activity ends (left unset if that end is unset).
    pub fn insert_row(&mut self, position: usize) -> bool {
        if position > self.schedule.len() {
            return false;
        }

        let start = if position == 0 {
            Some(0.0)
        } else {
            self.schedule.activities[position - 1].end
        };

        self.observer.notify(&TableEvent::BeginInsertRows {
            first: position,
            last: position,
        });
        self.schedule.activities.insert(
            position,
            Activity {
                start,
                ..Activity::default()
            },
        );
        self.observer.notify(&TableEvent::EndInsertRows);
        true
    }

    pub fn remove_row(&mut self, row: usize) -> bool {
        if row >= self.schedule.len() {
            return false;
        }
        self.observer.notify(&TableEvent::BeginRemoveRows {
            first: row,
            last: row,
        });
        self.schedule.activities.remove(row);
        self.observer.notify(&TableEvent::EndRemoveRows);
        true
    }

    /// Removes several rows, highest index first so the remaining indices
    /// stay valid. Duplicates and out-of-range indices are ignored.
    pub fn remove_rows(&mut self, rows: &[usize]) -> usize {
        rows.iter()
            .copied()
            .sorted_unstable_by(|a, b| b.cmp(a))
            .dedup()
            .filter(|&row| self.remove_row(row))
            .count()
    }

    pub fn schedule(&self) -> &Schedule {
        self.schedule
    }
}

fn read_cell(activity: &Activity, column: Column) -> CellValue {
    match column {
        Column::Start => activity.start.map_or(CellValue::Empty, CellValue::Number),
        Column::End => activity.end.map_or(CellValue::Empty, CellValue::Number),
        Column::Category => CellValue::Text(activity.category.clone()),
        Column::Name => CellValue::Text(activity.name.clone()),
        Column::Weight => CellValue::Number(activity.weight),
    }
}
