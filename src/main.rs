#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::{Context, Result, bail};
use clap::Parser;
use mapty::ledger::{EditIdentity, Ledger, LedgerConfig};
use mapty::types::{Coords, WorkoutInput};
use mapty::{cli, database::SqliteStore, utils};

#[macro_use]
extern crate mapty;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let store = SqliteStore::open(&cli.db, &cli.key)
        .with_context(|| format!("opening workout store: {}", cli.db.display()))?;
    let config = LedgerConfig {
        edit_identity: if cli.regenerate_ids {
            EditIdentity::Regenerate
        } else {
            EditIdentity::Preserve
        },
    };
    let mut ledger = Ledger::open(store, config);
    dlog!(
        "db={} key={} workouts={}",
        cli.db.display(),
        ledger.store().key(),
        ledger.list().len()
    );

    match cli.cmd.unwrap_or(cli::Cmd::List { details: false }) {
        cli::Cmd::List { details } => {
            if ledger.list().is_empty() {
                tracing::info!("no workouts recorded yet");
            }
            for w in ledger.list() {
                let line = utils::format_workout_line(w);
                if details {
                    let created = w.created_at.to_rfc3339();
                    println!("{}\t{created}\t{}\t{line}", w.id, w.coords);
                } else {
                    println!("{line}");
                }
            }
        }
        cli::Cmd::Add { lat, lng, workout } => {
            let w = ledger
                .create(WorkoutInput::from(workout), Coords(lat, lng))
                .context("adding workout")?;
            println!("{}\t{}", w.id, utils::format_workout_line(w));
        }
        cli::Cmd::Edit { id, workout } => {
            if !ledger.begin_edit(&id) {
                bail!("No workout with id {id}");
            }
            let w = ledger
                .commit(WorkoutInput::from(workout))
                .with_context(|| format!("editing workout {id}"))?;
            println!("{}\t{}", w.id, utils::format_workout_line(w));
        }
        cli::Cmd::Delete { id } => {
            if !ledger.delete(&id).context("deleting workout")? {
                bail!("No workout with id {id}");
            }
        }
        cli::Cmd::Clear => {
            ledger.delete_all().context("deleting all workouts")?;
        }
        cli::Cmd::Locate { id } => {
            let Some(w) = ledger.get(&id) else {
                bail!("No workout with id {id}");
            };
            println!(
                "{}\t{}\t{} {}",
                w.coords.lat(),
                w.coords.lng(),
                utils::icon(w.workout_type()),
                w.description
            );
        }
    }

    Ok(())
}
