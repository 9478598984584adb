use anyhow::{bail, Result};
use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::{storage::log_store::CsvLogStore, tracker::Tracker, utils::clock::DefaultClock};

/// Interactive tracking loop: pick an activity from the numbered menu,
/// press Enter to finish it, decide whether to keep going. Menu input
/// is validated here; the storage layer accepts whatever position it
/// is handed.
pub async fn process_track_command(store: CsvLogStore) -> Result<()> {
    let catalog = store.metadata().activities.clone();
    let today = Local::now().date_naive();
    let mut tracker = Tracker::new(today, store, Box::new(DefaultClock));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let activity = prompt_activity(&catalog, &mut lines).await?;
        tracker.start(activity);

        println!("Tracking {:?}. Press Enter to finish.", catalog[activity]);
        lines.next_line().await?;
        tracker.stop();

        if tracker.add_record().await? {
            println!("Recorded a session of {:?}.", catalog[activity]);
        }

        if !prompt_keep_tracking(&mut lines).await? {
            break;
        }
    }
    Ok(())
}

async fn prompt_activity(
    catalog: &[String],
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<usize> {
    let menu = catalog
        .iter()
        .enumerate()
        .map(|(position, label)| format!("{position}: {label}"))
        .collect::<Vec<_>>()
        .join(" | ");

    loop {
        println!("{menu}");
        let Some(line) = lines.next_line().await? else {
            bail!("input closed before an activity was chosen");
        };
        match line.trim().parse::<usize>() {
            Ok(choice) if choice < catalog.len() => return Ok(choice),
            _ => println!("Not valid. Try again."),
        }
    }
}

async fn prompt_keep_tracking(lines: &mut Lines<BufReader<Stdin>>) -> Result<bool> {
    loop {
        println!("Keep tracking? [y/n]");
        let Some(line) = lines.next_line().await? else {
            return Ok(false);
        };
        match line.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => {}
        }
    }
}
