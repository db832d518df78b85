//! Daily schedules drawn as wedges on a 24-hour dial.
//!
//! The crate parses day files, resolves category styling, computes the
//! radial geometry and exposes a table projection for editing. It holds no
//! UI types; front ends adapt [`layout::Layout`] and [`table::ScheduleTable`]
//! to their own canvas and grid widgets.

pub mod codec;
pub mod constants;
pub mod day;
pub mod domain;
pub mod error;
pub mod layout;
pub mod logging;
pub mod preferences;
pub mod storage;
pub mod table;

pub use day::DaySession;
pub use domain::{Activity, Schedule, ScheduleFormat};
pub use error::StorageError;
pub use layout::{Layout, RenderConfig, compute_layout};
pub use preferences::{CategoryPreference, Preferences, Rgba};
pub use table::{CellValue, Column, ScheduleTable, TableEvent, TableObserver};
