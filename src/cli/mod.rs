pub mod report;
pub mod track;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    storage::log_store::{CsvLogStore, LogStore},
    utils::{dir::create_application_default_path, logging::enable_logging},
};

use report::{process_report_command, ReportCommand};
use track::process_track_command;

#[derive(Parser, Debug)]
#[command(name = "Habitlog", version, long_about = None)]
#[command(about = "Track time spent on daily activities", long_about = None)]
pub(crate) struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Create a new activity database")]
    Init {
        #[arg(long, help = "Name of the database")]
        name: String,
        #[arg(
            long = "activity",
            required = true,
            help = "Activity label, repeatable. Positions are fixed at creation and referenced by number everywhere else"
        )]
        activities: Vec<String>,
        #[arg(
            long,
            help = "Directory holding databases. By default a \"databases\" directory under the platform state directory"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Track activities interactively and record the finished sessions")]
    Track {
        #[arg(long, help = "Name of the database")]
        name: String,
        #[arg(
            long,
            help = "Directory holding databases. By default a \"databases\" directory under the platform state directory"
        )]
        dir: Option<PathBuf>,
    },
    #[command(about = "Summarize recorded sessions over a date range")]
    Report {
        #[command(flatten)]
        command: ReportCommand,
    },
    #[command(about = "Delete the log of a single day")]
    Clear {
        #[arg(long, help = "Name of the database")]
        name: String,
        #[arg(long, help = "Day to clear, in year-month-day form, e.g. 2025-03-15")]
        date: NaiveDate,
        #[arg(
            long,
            help = "Directory holding databases. By default a \"databases\" directory under the platform state directory"
        )]
        dir: Option<PathBuf>,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&create_application_default_path()?, logging_level, args.log)?;

    match args.commands {
        Commands::Init {
            name,
            activities,
            dir,
        } => {
            let dir = resolve_database_dir(dir)?;
            let store = CsvLogStore::create(&name, activities, &dir).await?;
            println!(
                "Created database {:?} with {} activities under {:?}",
                store.metadata().name,
                store.metadata().activities.len(),
                dir
            );
            Ok(())
        }
        Commands::Track { name, dir } => {
            let store = CsvLogStore::load_by_name(&name, &resolve_database_dir(dir)?).await?;
            process_track_command(store).await
        }
        Commands::Report { command } => process_report_command(command).await,
        Commands::Clear { name, date, dir } => {
            let store = CsvLogStore::load_by_name(&name, &resolve_database_dir(dir)?).await?;
            store.delete_log(date).await?;
            println!("Cleared log for {date}");
            Ok(())
        }
    }
}

pub(crate) fn resolve_database_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(create_application_default_path()?.join("databases")),
    }
}
