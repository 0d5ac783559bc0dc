//! Terminal frontend for the pill tracker.
//!
//! Every command builds an [`AdherenceController`] against the configured
//! store, drives one operation, and exits. Store failures surface as the
//! controller's banner message on stderr with a non-zero exit code.

mod render;

use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pill_tracker_core::{AdherenceController, DoseState, HttpPillStore, DEFAULT_STORE_URL};
use shared::{DateKey, Month};

/// Month calendar of recurring medication doses for a pet.
#[derive(Parser)]
#[command(name = "pill-tracker", version, about)]
struct Cli {
    /// Base URL of the remote pill/log store.
    #[arg(long, env = "PILL_TRACKER_STORE_URL", default_value = DEFAULT_STORE_URL)]
    store_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the month calendar with per-pill dose markers.
    Calendar {
        /// Month to display, as YYYY-MM. Defaults to the current month.
        #[arg(long)]
        month: Option<Month>,
    },
    /// Manage tracked pills.
    Pills {
        #[command(subcommand)]
        command: PillCommand,
    },
    /// Toggle whether a pill was given on a day.
    Toggle {
        /// Store-assigned pill id.
        pill_id: String,
        /// Calendar day, as YYYY-MM-DD.
        date: DateKey,
        /// Attribution recorded when this toggle creates a log entry.
        #[arg(long)]
        given_by: Option<String>,
    },
}

#[derive(Subcommand)]
enum PillCommand {
    /// List pills.
    List {
        /// Include deactivated pills.
        #[arg(long)]
        all: bool,
    },
    /// Add a pill by name.
    Add { name: String },
    /// Deactivate a pill. Its historical logs are kept.
    Remove { pill_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = Arc::new(HttpPillStore::with_base_url(cli.store_url));
    let mut controller = AdherenceController::new(store);

    match cli.command {
        Command::Calendar { month } => {
            let month = month.unwrap_or_else(Month::current);
            controller.show_month(month).await;
            check_banner(&controller)?;
            print!(
                "{}",
                render::calendar(&controller.calendar_month(), DateKey::today())
            );
        }
        Command::Pills { command } => match command {
            PillCommand::List { all } => {
                controller.init().await;
                check_banner(&controller)?;
                let pills = if all {
                    controller.pills().all().iter().collect::<Vec<_>>()
                } else {
                    controller.active_pills()
                };
                print!("{}", render::pill_list(&pills));
            }
            PillCommand::Add { name } => {
                let added = controller.add_pill(&name).await;
                check_banner(&controller)?;
                if let Some(pill) = added {
                    println!("Added {} ({})", pill.name, pill.id);
                }
            }
            PillCommand::Remove { pill_id } => {
                let removed = controller.deactivate_pill(&pill_id).await;
                check_banner(&controller)?;
                if let Some(pill) = removed {
                    println!("Deactivated {} ({})", pill.name, pill.id);
                }
            }
        },
        Command::Toggle {
            pill_id,
            date,
            given_by,
        } => {
            // The toggle decision needs the logs of the day's month loaded.
            controller.show_month(Month::of(date)).await;
            check_banner(&controller)?;
            if let Some(label) = given_by {
                controller.set_given_by(label);
            }
            let state = controller.toggle(&pill_id, date).await;
            check_banner(&controller)?;
            match state {
                Some(DoseState::Given) => println!("{date}: given"),
                Some(DoseState::NotGiven) => println!("{date}: not given"),
                None => {}
            }
        }
    }

    Ok(())
}

fn check_banner(controller: &AdherenceController) -> anyhow::Result<()> {
    if let Some(message) = controller.error() {
        bail!("{message}");
    }
    Ok(())
}
