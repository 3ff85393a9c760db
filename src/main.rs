use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use songguess::store::{Backend, FjallBackend, JsonFileBackend, StatsService, StoreError};
use songguess::{GuessSubmission, NewGuess};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Stats(#[from] songguess::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage backend for the stats store.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum BackendArg {
    /// JSON file (songstats.json layout).
    #[default]
    File,
    /// Embedded fjall database directory.
    Kv,
}

#[derive(Parser)]
#[command(name = "songguess")]
#[command(about = "Record guesses and inspect guess-the-song statistics")]
struct Cli {
    /// Store path (JSON file or database directory)
    #[arg(long, global = true, default_value = "songstats.json", env = "SONGGUESS_STORE")]
    store: PathBuf,

    /// Storage backend
    #[arg(long, global = true, value_enum, default_value_t = BackendArg::File)]
    backend: BackendArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a guess for a song
    Record {
        /// Song identifier
        song_id: String,

        /// Milliseconds elapsed before the guess
        #[arg(long, allow_hyphen_values = true)]
        time: i64,

        /// The guess was correct
        #[arg(long)]
        correct: bool,

        /// Song name (kept only on the song's first guess)
        #[arg(long)]
        name: Option<String>,

        /// Artist (kept only on the song's first guess)
        #[arg(long)]
        artist: Option<String>,
    },

    /// Record guesses from a file of JSON submissions, one per line
    Import {
        /// File with `{songId, songName, artist, guessTime, isCorrect}` lines
        file: PathBuf,
    },

    /// Show statistics for one song
    Song {
        /// Song identifier
        song_id: String,
    },

    /// Show statistics across all songs
    Global,

    /// Delete every recorded guess
    Reset,
}

fn open_backend(kind: BackendArg, path: &std::path::Path) -> Result<Box<dyn Backend>, AppError> {
    Ok(match kind {
        BackendArg::File => Box::new(JsonFileBackend::new(path)),
        BackendArg::Kv => Box::new(FjallBackend::open(path)?),
    })
}

fn print_json(value: &impl Serialize) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let service = StatsService::new(open_backend(cli.backend, &cli.store)?);

    match cli.command {
        Commands::Record {
            song_id,
            time,
            correct,
            name,
            artist,
        } => {
            let guess = NewGuess {
                song_id,
                song_name: name,
                artist,
                time,
                correct,
            };
            let summary = service.record_guess(guess)?;
            print_json(&summary)
        }
        Commands::Import { file } => {
            let content = std::fs::read_to_string(&file).map_err(StoreError::from)?;
            let mut recorded = 0usize;
            for (line_no, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let submission: GuessSubmission = serde_json::from_str(line)?;
                match submission.validate() {
                    Ok(guess) => {
                        service.record_guess(guess)?;
                        recorded += 1;
                    }
                    Err(e) => eprintln!("line {}: {}", line_no + 1, e),
                }
            }
            println!("Recorded {} guess(es) into {}", recorded, cli.store.display());
            Ok(())
        }
        Commands::Song { song_id } => match service.song_stats(&song_id) {
            Ok(report) => print_json(&report),
            Err(e) if e.is_not_found() => {
                eprintln!("Song '{}' not found", song_id);
                std::process::exit(1);
            }
            Err(e) => Err(e.into()),
        },
        Commands::Global => print_json(&service.global_stats()?),
        Commands::Reset => {
            service.reset()?;
            println!("Reset stats store at {}", cli.store.display());
            Ok(())
        }
    }
}
