//! Text encodings of a day schedule.
//!
//! Both parsers are lenient: malformed lines are logged at `debug` and
//! skipped, never reported as errors. Only the tabular encoding is ever
//! written back.

use csv::{ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use log::debug;

use crate::{
    constants::{HOURS_PER_DAY, WEIGHT_SETTINGS},
    domain::{Activity, Schedule, ScheduleFormat},
};

const TABULAR_FIELD_COUNT: usize = 5;

pub fn parse(format: ScheduleFormat, text: &str) -> Schedule {
    match format {
        ScheduleFormat::Compact => parse_compact(text),
        ScheduleFormat::Tabular => parse_tabular(text),
    }
}

/// Parses the legacy `start, category, weight, name` layout.
///
/// Each end time is taken from the next row's start and the last row always
/// ends at 24. Rows are not re-sorted, so out-of-order files yield reversed
/// intervals.
pub fn parse_compact(text: &str) -> Schedule {
    let mut activities = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        if fields.iter().skip(1).all(|field| field.is_empty()) {
            if !line.trim().is_empty() {
                debug!("compact line {}: no fields after start, skipping", index + 1);
            }
            continue;
        }

        let Some(start) = parse_whole_number(fields[0]) else {
            debug!(
                "compact line {}: start `{}` is not a whole hour, skipping",
                index + 1,
                fields[0]
            );
            continue;
        };

        let weight = fields
            .get(2)
            .and_then(|field| parse_whole_number(field))
            .unwrap_or(WEIGHT_SETTINGS.legacy_fallback);

        activities.push(Activity {
            start: Some(start),
            end: None,
            category: fields.get(1).copied().unwrap_or_default().to_string(),
            name: fields.get(3).copied().unwrap_or_default().to_string(),
            weight,
        });
    }

    infer_end_times(&mut activities);
    Schedule::new(activities)
}

fn infer_end_times(activities: &mut [Activity]) {
    let next_starts: Vec<Option<f64>> = activities.iter().skip(1).map(|a| a.start).collect();
    for (activity, next_start) in activities.iter_mut().zip(next_starts) {
        activity.end = next_start;
    }
    if let Some(last) = activities.last_mut() {
        last.end = Some(HOURS_PER_DAY);
    }
}

fn parse_whole_number(field: &str) -> Option<f64> {
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    field.parse::<f64>().ok()
}

/// Parses the `start, end, category, name, weight` layout.
///
/// Each line is read on its own, so a malformed line (an unbalanced quote
/// included) only loses itself.
pub fn parse_tabular(text: &str) -> Schedule {
    let mut activities = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match read_tabular_line(line).as_ref().and_then(activity_from_record) {
            Some(activity) => activities.push(activity),
            None => debug!(
                "tabular line {}: expected {} numeric-compatible fields in `{}`, skipping",
                index + 1,
                TABULAR_FIELD_COUNT,
                line
            ),
        }
    }

    Schedule::new(activities)
}

fn read_tabular_line(line: &str) -> Option<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Some(record),
        Ok(false) => None,
        Err(err) => {
            debug!("tabular line `{}`: {}", line, err);
            None
        }
    }
}

fn activity_from_record(record: &StringRecord) -> Option<Activity> {
    if record.len() != TABULAR_FIELD_COUNT {
        return None;
    }

    Some(Activity {
        start: Some(record.get(0)?.parse().ok()?),
        end: Some(record.get(1)?.parse().ok()?),
        category: record.get(2)?.to_string(),
        name: record.get(3)?.to_string(),
        weight: record.get(4)?.parse().ok()?,
    })
}

/// Writes the valid activities in tabular layout, schedule order preserved.
///
/// Hours always carry a fractional part (`9.0`), weights are written in
/// their shortest form (`7`). Text fields are written trimmed and on one
/// line, the form the reader gives back.
pub fn serialize_tabular(schedule: &Schedule) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut dropped = 0usize;
    for activity in schedule.iter() {
        let Some((start, end)) = activity.bounds() else {
            dropped += 1;
            continue;
        };
        writer.write_record([
            format_hour(start),
            format_hour(end),
            single_line(&activity.category),
            single_line(&activity.name),
            format_weight(activity.weight),
        ])?;
    }

    if dropped > 0 {
        debug!("serialize: dropped {} invalid activities", dropped);
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn single_line(text: &str) -> String {
    text.trim()
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_hour(hour: f64) -> String {
    format!("{:?}", hour)
}

pub fn format_weight(weight: f64) -> String {
    format!("{}", weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_DAY: &str = "\
time, category, weight, name
0, chore, 7, closet claustrophobe
3, sleep, 5,
10, food, 8, cumin + coriander
11, chore, 2, what bus to take
12, fun, 8, stimuli
13, work, 4,
15, , 6, too calm
16, seminar, 8, full circle back
17, seminar, 7, rearview mirror
18, fun, 10,
19, , , Yoshitomo Nara
20, , x, distant memory
21, , ,
22, chore, 9,
23, work, 10, ready read
";

    fn tuples(schedule: &Schedule) -> Vec<(f64, f64, String, String, f64)> {
        schedule
            .iter()
            .map(|a| {
                (
                    a.start.unwrap_or(f64::NAN),
                    a.end.unwrap_or(f64::NAN),
                    a.category.clone(),
                    a.name.clone(),
                    a.weight,
                )
            })
            .collect()
    }

    fn row(start: f64, end: f64, category: &str, name: &str, weight: f64) -> (f64, f64, String, String, f64) {
        (start, end, category.to_string(), name.to_string(), weight)
    }

    #[test]
    fn test_parse_compact_full_day() {
        let schedule = parse_compact(LEGACY_DAY);
        let expected = vec![
            row(0.0, 3.0, "chore", "closet claustrophobe", 7.0),
            row(3.0, 10.0, "sleep", "", 5.0),
            row(10.0, 11.0, "food", "cumin + coriander", 8.0),
            row(11.0, 12.0, "chore", "what bus to take", 2.0),
            row(12.0, 13.0, "fun", "stimuli", 8.0),
            row(13.0, 15.0, "work", "", 4.0),
            row(15.0, 16.0, "", "too calm", 6.0),
            row(16.0, 17.0, "seminar", "full circle back", 8.0),
            row(17.0, 18.0, "seminar", "rearview mirror", 7.0),
            row(18.0, 19.0, "fun", "", 10.0),
            row(19.0, 20.0, "", "Yoshitomo Nara", 10.0),
            row(20.0, 22.0, "", "distant memory", 10.0),
            row(22.0, 23.0, "chore", "", 9.0),
            row(23.0, 24.0, "work", "ready read", 10.0),
        ];
        assert_eq!(tuples(&schedule), expected);
    }

    #[test]
    fn test_compact_end_times_are_contiguous() {
        let schedule = parse_compact("1, a, 1, x\n4, b, 2, y\n9, c, 3, z\n");
        let activities = &schedule.activities;
        for pair in activities.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(activities[2].end, Some(24.0));
    }

    #[test]
    fn test_compact_single_line() {
        let schedule = parse_compact("9, work, 8, morning meeting");
        assert_eq!(
            schedule.activities,
            vec![Activity::new(9.0, 24.0, "work", "morning meeting", 8.0)]
        );
    }

    #[test]
    fn test_compact_skips_start_only_line() {
        let schedule = parse_compact("7\n8, , ,\n9, work, 8, x\n");
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.activities[0].start, Some(9.0));
    }

    #[test]
    fn test_compact_skips_non_integer_start() {
        let schedule = parse_compact("9.5, work, 8, x\n-1, work, 8, y\nabc, fun, 1, z\n");
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_compact_accepts_large_whole_start() {
        let schedule = parse_compact("8, work, 5, x\n99999999999, fun, 5, y\n");
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.activities[0].end, Some(99999999999.0));
        assert!(!schedule.activities[1].is_valid());
    }

    #[test]
    fn test_compact_weight_fallback() {
        let schedule = parse_compact("9, work, heavy, x\n10, work, 2.5, y\n");
        assert_eq!(schedule.activities[0].weight, 10.0);
        assert_eq!(schedule.activities[1].weight, 10.0);
    }

    #[test]
    fn test_compact_short_rows_fill_defaults() {
        let schedule = parse_compact("9, work\n");
        assert_eq!(
            schedule.activities,
            vec![Activity::new(9.0, 24.0, "work", "", 10.0)]
        );
    }

    #[test]
    fn test_compact_empty_input() {
        assert!(parse_compact("").is_empty());
        assert!(parse_compact("\n\n  \n").is_empty());
    }

    #[test]
    fn test_compact_out_of_order_is_kept() {
        let schedule = parse_compact("10, a, 1, x\n8, b, 1, y\n");
        assert_eq!(schedule.activities[0].end, Some(8.0));
        assert_eq!(schedule.activities[0].duration_hours(), Some(-2.0));
    }

    #[test]
    fn test_parse_tabular_line() {
        let schedule = parse_tabular("9.5,11.0,fun,walk,7\n");
        assert_eq!(
            schedule.activities,
            vec![Activity::new(9.5, 11.0, "fun", "walk", 7.0)]
        );
        assert_eq!(serialize_tabular(&schedule).unwrap(), "9.5,11.0,fun,walk,7\n");
    }

    #[test]
    fn test_parse_tabular_trims_and_skips_bad_rows() {
        let text = " 0 , 8 , sleep , , 5 \n\
                    8,9,work\n\
                    9,ten,work,x,5\n\
                    9,12,work,x,5,extra\n\
                    \n\
                    12,24,fun,lunch and more,9.5\n";
        let schedule = parse_tabular(text);
        assert_eq!(
            schedule.activities,
            vec![
                Activity::new(0.0, 8.0, "sleep", "", 5.0),
                Activity::new(12.0, 24.0, "fun", "lunch and more", 9.5),
            ]
        );
    }

    #[test]
    fn test_parse_tabular_unbalanced_quote_only_loses_its_line() {
        let text = "0,8,sleep,night,5\n\
                    8,9,work,\"standup,5\n\
                    9,12,work,deep,8\n\
                    12,24,fun,evening,6\n";
        let schedule = parse_tabular(text);
        assert_eq!(
            schedule.activities,
            vec![
                Activity::new(0.0, 8.0, "sleep", "night", 5.0),
                Activity::new(9.0, 12.0, "work", "deep", 8.0),
                Activity::new(12.0, 24.0, "fun", "evening", 6.0),
            ]
        );
    }

    #[test]
    fn test_parse_tabular_keeps_out_of_range_values() {
        let schedule = parse_tabular("9,9,x,y,12\n");
        assert_eq!(schedule.len(), 1);
        assert!(!schedule.activities[0].is_valid());
    }

    #[test]
    fn test_tabular_round_trip() {
        let schedule = Schedule::new(vec![
            Activity::new(0.0, 7.25, "sleep", "", 3.0),
            Activity::new(7.25, 9.0, "chore", "commute, bus", 2.5),
            Activity::new(9.0, 24.0, "work", "\"deep\" focus", 10.0),
        ]);
        let text = serialize_tabular(&schedule).unwrap();
        assert_eq!(parse_tabular(&text), schedule);
    }

    #[test]
    fn test_tabular_round_trip_normalizes_text_fields() {
        let schedule = Schedule::new(vec![
            Activity::new(9.0, 10.0, " work", " standup ", 5.0),
            Activity::new(10.0, 11.0, "fun", "walk\nin the park", 4.0),
        ]);
        let text = serialize_tabular(&schedule).unwrap();
        assert_eq!(text, "9.0,10.0,work,standup,5\n10.0,11.0,fun,walk in the park,4\n");

        let parsed = parse_tabular(&text);
        assert_eq!(
            parsed.activities,
            vec![
                Activity::new(9.0, 10.0, "work", "standup", 5.0),
                Activity::new(10.0, 11.0, "fun", "walk in the park", 4.0),
            ]
        );
        assert_eq!(parse_tabular(&serialize_tabular(&parsed).unwrap()), parsed);
    }

    #[test]
    fn test_serialize_drops_invalid_rows() {
        let schedule = Schedule::new(vec![
            Activity::new(0.0, 8.0, "sleep", "", 5.0),
            Activity::new(8.0, 8.0, "work", "", 5.0),
            Activity {
                start: Some(9.0),
                ..Activity::default()
            },
            Activity::new(8.0, 24.0, "work", "", 11.0),
        ]);
        assert_eq!(serialize_tabular(&schedule).unwrap(), "0.0,8.0,sleep,,5\n");
    }

    #[test]
    fn test_parse_dispatches_on_format() {
        let text = "9, work, 8, morning meeting\n";
        assert_eq!(parse(ScheduleFormat::Compact, text).len(), 1);
        assert!(parse(ScheduleFormat::Tabular, text).is_empty());
    }
}
