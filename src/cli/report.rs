use std::{fmt::Display, path::PathBuf};

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::{
    report::{intervals_per_activity, total_secs_per_activity},
    storage::{
        log_store::{CsvLogStore, LogStore, RecordsByDate},
        metadata::DatabaseMetadata,
    },
};

use super::{resolve_database_dir, Args};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[arg(long, help = "Name of the database")]
    name: String,
    #[arg(
        long = "start",
        short,
        help = "Start of the range. Examples are \"yesterday\", \"last friday\", \"15/03/2025\". Defaults to today"
    )]
    start_date: Option<String>,
    #[arg(
        long = "end",
        short,
        help = "End of the range, inclusive. Defaults to the start date"
    )]
    end_date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(
        long,
        help = "Directory holding databases. By default a \"databases\" directory under the platform state directory"
    )]
    dir: Option<PathBuf>,
}

/// Command to summarize the sessions recorded between two dates:
/// per-activity totals over the whole range, then the session intervals
/// of each day.
pub async fn process_report_command(
    ReportCommand {
        name,
        start_date,
        end_date,
        date_style,
        dir,
    }: ReportCommand,
) -> Result<()> {
    let now = Local::now();
    let start = parse_date_value(start_date, now, date_style)?.unwrap_or_else(|| now.date_naive());
    let end = parse_date_value(end_date, now, date_style)?;

    let store = CsvLogStore::load_by_name(&name, &resolve_database_dir(dir)?).await?;
    let records = store.read_interval(start, end).await?;

    print_totals(&records, store.metadata());
    print_intervals(&records, store.metadata());
    Ok(())
}

fn parse_date_value(
    value: Option<String>,
    now: DateTime<Local>,
    date_style: DateStyle,
) -> Result<Option<NaiveDate>> {
    let Some(value) = value else {
        return Ok(None);
    };
    match parse_date_string(&value, now, date_style.into()) {
        Ok(v) => Ok(Some(v.date_naive())),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {value:?}: {e}"),
            )
            .into()),
    }
}

fn print_totals(records: &RecordsByDate, metadata: &DatabaseMetadata) {
    let totals = total_secs_per_activity(records);
    let total_recorded: u64 = totals.values().sum();
    if total_recorded == 0 {
        println!("Nothing recorded in the requested range.");
        return;
    }

    let mut totals = totals.into_iter().collect::<Vec<_>>();
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    for (activity, secs) in totals {
        println!(
            "{}%\t{}\t{}",
            secs * 100 / total_recorded,
            format_duration(secs),
            activity_label(metadata, activity)
        );
    }
}

fn print_intervals(records: &RecordsByDate, metadata: &DatabaseMetadata) {
    for (date, daily_records) in records {
        if daily_records.is_empty() {
            continue;
        }

        println!("\n{date}");
        let intervals = intervals_per_activity(records, *date, date.and_time(NaiveTime::MIN));
        let mut activities = intervals.keys().copied().collect::<Vec<_>>();
        activities.sort_unstable();

        for activity in activities {
            for (start, end) in &intervals[&activity] {
                println!(
                    "  {} - {}\t{}",
                    start.format("%H:%M:%S"),
                    end.format("%H:%M:%S"),
                    activity_label(metadata, activity)
                );
            }
        }
    }
}

/// Rows are stored without catalog validation, so a position can fall
/// outside the catalog. Render it as a bare number instead of failing.
fn activity_label(metadata: &DatabaseMetadata, activity: usize) -> String {
    metadata
        .activity_name(activity)
        .map(str::to_string)
        .unwrap_or_else(|| format!("activity {activity}"))
}

fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = secs % 3600 / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::format_duration;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(1294), "21m34s");
        assert_eq!(format_duration(8400), "2h20m0s");
    }
}
