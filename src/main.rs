use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chore_rotation::display::print_rotation;
use chore_rotation::parser::parse_date;
use chore_rotation::store::{load_state, save_state, write_history_csv};
use chore_rotation::web::{self, AppState};
use chore_rotation::{RotaError, RotationState};

#[derive(Parser)]
#[command(name = "chore-rotation", version, about = "Weekly household chore rotation")]
struct Cli {
    /// Settings file the rotation is loaded from and saved to
    #[arg(long, global = true, env = "CHORE_STATE", default_value = "chores.txt")]
    state: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the current week
    Show,
    /// Assign the next week
    Assign,
    /// Rebuild the rotation at a cycle and week
    Jump { cycle: u32, week: u32 },
    /// Jump to the week containing today
    Today,
    /// Jump to the week containing a date (MM/DD/YY)
    Date { date: String },
    /// Reset to cycle 1, week 1, seed 1 and assign the first week
    Reset,
    /// Change the seed and replay to the current week
    Seed {
        #[arg(allow_negative_numbers = true, required_unless_present = "random")]
        seed: Option<i64>,
        #[arg(long, conflicts_with = "seed")]
        random: bool,
    },
    /// Set the calendar start of cycle 1 (MM/DD/YY), or "none" to clear it
    StartDate { date: String },
    AddPerson { name: String },
    RemovePerson { name: String },
    AddChore { name: String },
    RemoveChore { name: String },
    /// Print the settings text
    Export,
    /// Apply settings text from a file, or "-" for stdin
    Import { file: String },
    /// Write the full assignment history as CSV
    HistoryCsv { path: PathBuf },
    /// Serve the JSON API
    Web {
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chore_rotation=info,actix_web=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn read_settings(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("reading {file}"))
    }
}

/// Reports a stuck person without discarding the rest of the week.
fn keep_partial_week(result: Result<(), RotaError>) -> anyhow::Result<()> {
    match result {
        Err(RotaError::Assignment { people }) => {
            eprintln!("⚠️  {}", RotaError::Assignment { people });
            Ok(())
        }
        other => Ok(other?),
    }
}

fn save(path: &Path, state: &RotationState) -> anyhow::Result<()> {
    save_state(path, state).with_context(|| format!("saving {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut state =
        load_state(&cli.state).with_context(|| format!("loading {}", cli.state.display()))?;

    match cli.command {
        Command::Show => {
            print_rotation(&state);
            return Ok(());
        }
        Command::Assign => keep_partial_week(state.assign_week().map(|_| ()))?,
        Command::Jump { cycle, week } => state.jump_to(cycle, week)?,
        Command::Today => {
            let (cycle, week) = state.jump_to_today()?;
            println!("Today is cycle {cycle}, week {week}");
        }
        Command::Date { date } => {
            let (cycle, week) = state.jump_to_date(parse_date(&date)?)?;
            println!("{date} is cycle {cycle}, week {week}");
        }
        Command::Reset => {
            state.reset_all();
            if state.is_configured() {
                keep_partial_week(state.assign_week().map(|_| ()))?;
            }
        }
        Command::Seed { seed, random } => {
            if random {
                let seed = state.set_random_seed()?;
                println!("New seed: {seed}");
            } else if let Some(seed) = seed {
                state.set_seed(seed)?;
            }
        }
        Command::StartDate { date } => {
            let start = if date.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_date(&date)?)
            };
            state.set_start_date(start);
        }
        Command::AddPerson { name } => state.add_person(&name)?,
        Command::RemovePerson { name } => state.remove_person(&name)?,
        Command::AddChore { name } => state.add_chore(&name)?,
        Command::RemoveChore { name } => state.remove_chore(&name)?,
        Command::Export => {
            println!("{}", state.export_text());
            return Ok(());
        }
        Command::Import { file } => {
            let text = read_settings(&file)?;
            state.import_text(&text)?;
            println!("Settings applied successfully!");
        }
        Command::HistoryCsv { path } => {
            let rows = write_history_csv(&state, &path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {rows} history entries to {}", path.display());
            return Ok(());
        }
        Command::Web { port } => {
            let password =
                std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
            println!("Access the API at http://localhost:{}/api/state", port);
            let app_state = AppState::new(state, Some(cli.state.clone()), password);
            web::start_server(port, app_state).await?;
            return Ok(());
        }
    }

    save(&cli.state, &state)?;
    print_rotation(&state);
    Ok(())
}
