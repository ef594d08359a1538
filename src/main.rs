mod error;
mod models;
mod storage;
mod store;
mod tui;
mod views;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, TimeZone};
use clap::{ArgAction, Parser, Subcommand};
use models::{normalize_date, ApplicationDraft, ApplicationStatus, JobApplication};
use std::io::{self, Write};
use std::path::PathBuf;
use storage::JsonFileStorage;
use store::{ApplicationStore, SaveOutcome};
use tracing_subscriber::EnvFilter;
use views::{SortMode, StatusFilter, ViewQuery};

#[derive(Parser)]
#[command(name = "job-tracker")]
#[command(about = "Job application tracker - record, filter, sort, and follow up on applications")]
struct Cli {
    /// Path to the applications data file
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an application
    Add {
        /// Company name
        company: String,

        /// Job title
        title: String,

        /// Application date (YYYY-MM-DD; defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Status
        #[arg(short, long, value_enum, default_value_t = ApplicationStatus::Applied)]
        status: ApplicationStatus,

        /// Link to the posting, referral, etc. (repeatable)
        #[arg(short, long = "link")]
        links: Vec<String>,

        /// Links as newline-separated text
        #[arg(long)]
        links_text: Option<String>,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Edit an application (only the given fields change)
    Edit {
        /// Application ID or unique prefix
        id: String,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        title: Option<String>,

        /// Application date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long, value_enum)]
        status: Option<ApplicationStatus>,

        /// Replace links with these (repeatable)
        #[arg(short, long = "link")]
        links: Vec<String>,

        /// Replace links with newline-separated text
        #[arg(long, conflicts_with = "clear_links")]
        links_text: Option<String>,

        /// Remove all links
        #[arg(long, conflicts_with = "links")]
        clear_links: bool,

        /// Replace notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Change only the status of an application
    Status {
        /// Application ID or unique prefix
        id: String,

        #[arg(value_enum)]
        status: ApplicationStatus,
    },

    /// Delete an application
    Delete {
        /// Application ID or unique prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List applications
    List {
        /// Filter by status (all, applied, interview, offer, rejected)
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        /// Case-insensitive search over company, title, notes and links
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Sort order
        #[arg(long, value_enum, default_value_t = SortMode::DateDesc)]
        sort: SortMode,
    },

    /// Show application details
    Show {
        /// Application ID or unique prefix
        id: String,
    },

    /// Show per-status counts
    Stats,

    /// Delete all local data
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Browse applications interactively
    Browse,

    /// Print the data file location
    Path,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let storage = match cli.data_file {
        Some(path) => JsonFileStorage::new(path),
        None => JsonFileStorage::open_default(),
    };

    if let Commands::Path = cli.command {
        println!("{}", storage.path().display());
        return Ok(());
    }

    tracing::debug!(path = %storage.path().display(), "Opening applications data");
    let mut store = ApplicationStore::open(storage);
    tracing::info!(outcome = ?store.load_outcome(), count = store.len(), "Applications ready");

    match cli.command {
        Commands::Add {
            company,
            title,
            date,
            status,
            links,
            links_text,
            notes,
        } => {
            let mut draft = ApplicationDraft::new(&company, &title)
                .with_links_text(&links_text.unwrap_or_default());
            draft.links = links.into_iter().chain(draft.links).collect();
            draft.application_date = parse_date_arg(date.as_deref());
            draft.status = status;
            draft.notes = notes.unwrap_or_default();

            let outcome = store.save(draft)?;
            println!("Added application {}", outcome.id());
        }

        Commands::Edit {
            id,
            company,
            title,
            date,
            status,
            links,
            links_text,
            clear_links,
            notes,
        } => {
            let mut draft = ApplicationDraft::from_application(store.find(&id)?);
            if let Some(company) = company {
                draft.company_name = company;
            }
            if let Some(title) = title {
                draft.job_title = title;
            }
            if date.is_some() {
                draft.application_date = parse_date_arg(date.as_deref());
            }
            if let Some(status) = status {
                draft.status = status;
            }
            if clear_links {
                draft.links.clear();
            } else if !links.is_empty() || links_text.is_some() {
                let typed = models::parse_links_text(links_text.as_deref().unwrap_or_default());
                draft.links = links.into_iter().chain(typed).collect();
            }
            if let Some(notes) = notes {
                draft.notes = notes;
            }

            match store.save(draft)? {
                SaveOutcome::Updated(id) => println!("Saved changes to {}", id),
                SaveOutcome::Added(id) => println!("Added application {}", id),
            }
        }

        Commands::Status { id, status } => {
            let id = store.find(&id)?.id.clone();
            store.set_status(&id, status);
            println!("Marked {} as {}.", id, status.label());
        }

        Commands::Delete { id, yes } => {
            let app = store.find(&id)?;
            let (id, label) = (app.id.clone(), format!("{} at {}", app.job_title, app.company_name));
            if !yes && !confirm(&format!("Delete {}? This cannot be undone.", label))? {
                println!("Cancelled.");
                return Ok(());
            }
            store.delete(&id);
            println!("Deleted {}.", label);
        }

        Commands::List { status, search, sort } => {
            let query = ViewQuery {
                status,
                search: search.unwrap_or_default(),
                sort,
            };
            let apps = store.view(&query);
            if apps.is_empty() {
                println!("No applications found.");
            } else {
                println!(
                    "{:<10} {:<10} {:<12} {:<22} {:<28} {:<16}",
                    "ID", "STATUS", "DATE", "COMPANY", "TITLE", "UPDATED"
                );
                println!("{}", "-".repeat(102));
                for app in &apps {
                    println!(
                        "{:<10} {:<10} {:<12} {:<22} {:<28} {:<16}",
                        short_id(&app.id),
                        app.status,
                        app.application_date
                            .map(|d| d.format(models::DATE_FORMAT).to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        truncate(&app.company_name, 20),
                        truncate(&app.job_title, 26),
                        display_timestamp(app.updated_at)
                    );
                }
                println!("\n{} of {} application(s)", apps.len(), store.len());
            }
        }

        Commands::Show { id } => {
            print_application(store.find(&id)?);
        }

        Commands::Stats => {
            let counts = store.counts();
            for status in ApplicationStatus::ALL {
                println!("{:<10} {:>4}", status.label(), counts.get(status));
            }
            println!("{}", "-".repeat(15));
            println!("{:<10} {:>4}", "Total", counts.total());
        }

        Commands::Reset { yes } => {
            if !yes && !confirm("Delete ALL applications from local data?")? {
                println!("Cancelled.");
                return Ok(());
            }
            store.reset();
            println!("Local data cleared.");
        }

        Commands::Browse => {
            tui::run_browse(&mut store)?;
        }

        Commands::Path => unreachable!("handled before the store is opened"),
    }

    Ok(())
}

/// Unrecognized dates are dropped so the save falls back to today.
fn parse_date_arg(input: Option<&str>) -> Option<NaiveDate> {
    let input = input?;
    let date = normalize_date(input);
    if date.is_none() && !input.trim().is_empty() {
        eprintln!("Could not parse date '{}', using today.", input);
    }
    date
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_application(app: &JobApplication) {
    println!("{} at {}", app.job_title, app.company_name);
    println!("ID:      {}", app.id);
    println!("Status:  {}", app.status.label());
    println!("Applied: {}", display_date(app.application_date));
    println!("Created: {}", display_timestamp(app.created_at));
    println!("Updated: {}", display_timestamp(app.updated_at));
    if !app.links.is_empty() {
        println!("\nLinks:");
        for link in &app.links {
            println!("  {}", link);
        }
    }
    if !app.notes.is_empty() {
        println!("\n--- Notes ---\n{}", app.notes);
    }
}

pub(crate) fn display_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => "-".to_string(),
    }
}

pub(crate) fn display_timestamp(ms: i64) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
