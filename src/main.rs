use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use campout::bingo::tracker::CompletionClaim;
use campout::bingo::{BingoError, GRID_SIZE};
use campout::config::{AppConfig, ConfigError};
use campout::error::ErrorCode;
use campout::services::bingo::BoardView;
use campout::state::AppState;
use campout::store::AttendanceStatus;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("[{}] {}", .0.error_code(), .0)]
    Bingo(#[from] BingoError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "campout", about = "Festival group bingo")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a person's board.
    Board {
        person_id: i64,
        /// Print a 5x5 grid instead of JSON.
        #[arg(long)]
        grid: bool,
    },
    /// Check or uncheck one tile (0..=24, row-major).
    Toggle { person_id: i64, position: i64 },
    /// List the tile pool in display order.
    Tiles,
    /// Replace a tile's label.
    Label { tile_id: i64, label: String },
    /// Show first completions among people who are going.
    Leaderboard,
    /// Record a completion without toggling.
    Complete { person_id: i64 },
    /// Clear every person's checked tiles. Completions are kept.
    Reset,
    Person(PersonCommand),
}

#[derive(Args, Debug)]
struct PersonCommand {
    #[command(subcommand)]
    command: PersonSubcommand,
}

#[derive(Subcommand, Debug)]
enum PersonSubcommand {
    List,
    Add {
        name: String,
        #[arg(long, default_value = "going", value_parser = parse_status)]
        status: AttendanceStatus,
    },
    Status {
        person_id: i64,
        #[arg(value_parser = parse_status)]
        status: AttendanceStatus,
    },
}

#[derive(Serialize)]
struct CompletionOutput {
    person_id: i64,
    recorded: bool,
    #[serde(with = "time::serde::rfc3339")]
    completed_at: OffsetDateTime,
}

fn parse_status(raw: &str) -> Result<AttendanceStatus, String> {
    AttendanceStatus::parse(raw).ok_or_else(|| format!("unknown status {raw:?} (expected going, maybe or not-going)"))
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let state = AppState::from_config(&config).await?;

    match cli.command {
        Command::Board { person_id, grid } => {
            let board = state.bingo.get_board(person_id).await?;
            if grid {
                print_grid(&board);
                Ok(())
            } else {
                print_json(&board)
            }
        }
        Command::Toggle { person_id, position } => print_json(&state.bingo.toggle_tile(person_id, position).await?),
        Command::Tiles => print_json(&state.bingo.list_tiles().await?),
        Command::Label { tile_id, label } => print_json(&state.bingo.edit_tile_label(tile_id, &label).await?),
        Command::Leaderboard => print_json(&state.bingo.leaderboard().await?),
        Command::Complete { person_id } => {
            let claim = state.bingo.mark_complete(person_id).await?;
            print_json(&CompletionOutput {
                person_id,
                recorded: matches!(claim, CompletionClaim::Recorded(_)),
                completed_at: claim.completed_at(),
            })
        }
        Command::Reset => {
            let cleared = state.bingo.reset_checks().await?;
            print_json(&serde_json::json!({ "cleared": cleared }))
        }
        Command::Person(person) => run_person(&state, person).await,
    }
}

async fn run_person(state: &AppState, person: PersonCommand) -> Result<(), CliError> {
    match person.command {
        PersonSubcommand::List => {
            let people: Vec<_> = state.bingo.list_people().await?.into_iter().map(|r| r.person).collect();
            print_json(&people)
        }
        PersonSubcommand::Add { name, status } => print_json(&state.bingo.add_person(&name, status).await?),
        PersonSubcommand::Status { person_id, status } => {
            print_json(&state.bingo.set_status(person_id, status).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_grid(board: &BoardView) {
    for row in board.tiles.chunks(GRID_SIZE) {
        let cells: Vec<String> = row
            .iter()
            .map(|tile| {
                let mark = if board.checked.contains(&tile.position) { 'x' } else { ' ' };
                format!("[{mark}] {:<18}", tile.label)
            })
            .collect();
        println!("{}", cells.join(" "));
    }
    if let Some(at) = board.completed_at {
        println!("bingo at {at}");
    }
}
