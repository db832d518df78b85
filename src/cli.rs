use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use thiserror::Error;

use chronodex::{
    codec::{format_hour, format_weight},
    day::DaySession,
    error::StorageError,
    layout::{RenderConfig, compute_layout},
    logging,
    preferences::Preferences,
    storage,
};

use crate::app;

#[derive(Parser, Debug)]
#[command(name = "chronodex")]
#[command(about = "Daily schedules drawn on a 24-hour dial", long_about = None)]
pub struct Cli {
    #[arg(long, global = true, help = "Directory holding schedules and preferences")]
    pub data_dir: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "CHRONODEX_LOG",
        help = "Log level (trace, debug, info, warn, error, off)"
    )]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Open the interactive dial (default)")]
    View {
        #[arg(long, help = "Day to open, YYYY-MM-DD")]
        date: Option<String>,
    },

    #[command(about = "Print a day's activities")]
    Show {
        #[arg(long, help = "Day to show, YYYY-MM-DD")]
        date: Option<String>,
    },

    #[command(about = "Print a day's dial geometry as JSON")]
    Layout {
        #[arg(long, help = "Day to lay out, YYYY-MM-DD")]
        date: Option<String>,
    },

    #[command(about = "List days that have a schedule file")]
    Dates,

    #[command(about = "Rewrite any schedule file in the tabular format")]
    Convert {
        #[arg(help = "Source file (.txt or .csv)")]
        input: PathBuf,

        #[arg(help = "Destination file (.csv)")]
        output: PathBuf,
    },

    #[command(about = "List category preferences")]
    Categories,

    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(help = "Shell type (bash, zsh, fish)")]
        shell: String,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid date `{0}`; expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("unsupported shell: {0}. Use bash, zsh, or fish.")]
    UnsupportedShell(String),
    #[error("failed to encode layout: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("logging: {0}")]
    Logging(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct Context {
    pub data_dir: PathBuf,
    pub preferences: Preferences,
    pub today: NaiveDate,
}

impl Context {
    fn load(data_dir: PathBuf) -> Self {
        let preferences = storage::load_preferences(&storage::preferences_path(&data_dir));
        Self {
            data_dir,
            preferences,
            today: Local::now().date_naive(),
        }
    }

    fn open_day(&self, date: Option<&str>) -> Result<DaySession, CliError> {
        let date = match date {
            Some(raw) => parse_date(raw)?,
            None => self.today,
        };
        Ok(DaySession::open(&self.data_dir, date, self.today)?)
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| storage::date_from_stem(raw))
        .ok_or_else(|| CliError::InvalidDate(raw.to_string()))
}

pub fn show(context: &Context, date: Option<&str>) -> Result<(), CliError> {
    let day = context.open_day(date)?;
    let source = day
        .source()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "no file".to_string());

    println!("{} ({})", day.date().format("%A %Y-%m-%d"), source);
    println!("{}", "-".repeat(60));
    println!(
        "  {:>6} {:>6}  {:12} {:24} {:>6}",
        "Start", "End", "Category", "Name", "Weight"
    );
    for activity in day.schedule().iter() {
        let marker = if activity.is_valid() { ' ' } else { '!' };
        println!(
            "{} {:>6} {:>6}  {:12} {:24} {:>6}",
            marker,
            activity.start.map(format_hour).unwrap_or_default(),
            activity.end.map(format_hour).unwrap_or_default(),
            activity.category,
            activity.name,
            format_weight(activity.weight)
        );
    }
    println!("{}", "-".repeat(60));
    println!(
        "{} activities, {} drawable, {:.2} hours covered",
        day.schedule().len(),
        day.schedule().valid_count(),
        day.schedule().covered_hours()
    );
    Ok(())
}

pub fn layout(context: &Context, date: Option<&str>) -> Result<(), CliError> {
    let day = context.open_day(date)?;
    let config = RenderConfig::from_preferences(&context.preferences);
    let layout = compute_layout(day.schedule(), &context.preferences, &config);
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

pub fn dates(context: &Context) -> Result<(), CliError> {
    for date in storage::list_schedule_dates(&context.data_dir) {
        let path = storage::schedule_path_for_date(&context.data_dir, date);
        let kind = path
            .as_deref()
            .and_then(|p| p.extension())
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("{} {}", date.format("%Y-%m-%d"), kind);
    }
    Ok(())
}

pub fn convert(input: &Path, output: &Path) -> Result<(), CliError> {
    let schedule = storage::load_schedule(input)?;
    storage::save_schedule(&schedule, output)?;
    println!(
        "Converted {} of {} activities to {}",
        schedule.valid_count(),
        schedule.len(),
        output.display()
    );
    Ok(())
}

pub fn categories(context: &Context) -> Result<(), CliError> {
    let preferences = &context.preferences;
    if preferences.categories.is_empty() {
        println!("No categories configured");
        return Ok(());
    }

    for category in &preferences.categories {
        println!(
            "{:16} {:10} {:>6}  {}",
            category.name,
            category.rgba().to_string(),
            category
                .weight
                .map(format_weight)
                .unwrap_or_else(|| "-".to_string()),
            category.aliases.iter().join(", ")
        );
    }
    Ok(())
}

pub fn print_completions(shell: &str) -> Result<(), CliError> {
    use clap_complete::Shell;
    let shell = match shell {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        _ => return Err(CliError::UnsupportedShell(shell.to_string())),
    };
    clap_complete::generate(shell, &mut Cli::command(), "chronodex", &mut io::stdout());
    Ok(())
}

fn init_logging(level: Option<&str>, data_dir: &Path) -> Result<(), CliError> {
    let level = level.unwrap_or_else(|| logging::default_log_level());
    let log_dir = storage::get_state_dir(data_dir).join("logs");
    logging::init_logging(level, &log_dir).map_err(CliError::Logging)
}

/// Starts logging before preferences are read so load warnings are kept.
fn prepare(data_dir: Option<PathBuf>, log_level: Option<&str>) -> Context {
    let data_dir = data_dir.unwrap_or_else(storage::get_data_dir);
    if let Err(e) = init_logging(log_level, &data_dir) {
        eprintln!("Warning: {}", e);
    }
    Context::load(data_dir)
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    let context = prepare(cli.data_dir, cli.log_level.as_deref());

    match cli.command {
        None => app::run_ui(context, None),
        Some(Command::View { date }) => {
            let date = date.as_deref().map(parse_date).transpose()?;
            app::run_ui(context, date)
        }
        Some(Command::Show { date }) => show(&context, date.as_deref()),
        Some(Command::Layout { date }) => layout(&context, date.as_deref()),
        Some(Command::Dates) => dates(&context),
        Some(Command::Convert { input, output }) => convert(&input, &output),
        Some(Command::Categories) => categories(&context),
        Some(Command::Completions { shell }) => print_completions(&shell),
    }
}

pub fn run_cli() {
    let cli = Cli::parse();
    if let Err(e) = dispatch(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 11, 13).unwrap();
        assert_eq!(parse_date("2019-11-13").unwrap(), expected);
        assert_eq!(parse_date(" 20191113 ").unwrap(), expected);
        assert!(matches!(parse_date("13/11/2019"), Err(CliError::InvalidDate(_))));
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["chronodex", "show", "--date", "2019-11-13"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Show { date: Some(_) })));

        let cli = Cli::try_parse_from(["chronodex", "--data-dir", "/tmp/x"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_prepare_starts_logging_before_reading_preferences() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(storage::preferences_path(temp.path()), "{ not json").unwrap();

        let context = prepare(Some(temp.path().to_path_buf()), Some("warn"));

        assert!(logging::is_initialized());
        assert_eq!(context.data_dir, temp.path());
        assert_eq!(context.preferences, Preferences::default());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
