use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use hurd_cli::config::{GameConfig, LoggingConfig, PlayerConfig};
use hurd_cli::demo::run_demo;
use hurd_cli::events::{load_events, replay};
use hurd_cli::logging::init_logging;
use hurd_cli::report::Report;
use hurd_cli::session::SavedSession;
use hurd_core::AppInfo;
use hurd_core::game::GameState;

/// Live epidemic and infection odds for a Pandemic Legacy table.
#[derive(Debug, Parser)]
#[command(
    name = AppInfo::name(),
    author,
    version = AppInfo::version(),
    about = "Probability assistant for Pandemic Legacy"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a game from a YAML configuration and report on it.
    Report {
        /// Path to the YAML game configuration.
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Exit after validating the configuration.
        #[arg(long)]
        validate_only: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Continue a game saved with `--save`.
    Resume {
        /// Path to a saved session.
        #[arg(short, long, value_name = "FILE")]
        snapshot: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Deal a seeded city deck and compare forecasts with the actual draws.
    Demo {
        /// Path to the YAML game configuration.
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// RNG seed for the deal and the infection draws.
        #[arg(long, value_name = "SEED", default_value_t = 0)]
        seed: u64,

        /// Stop after this many turns (defaults to the whole deck).
        #[arg(long, value_name = "TURNS")]
        turns: Option<usize>,
    },
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// YAML event script to replay before reporting.
    #[arg(short, long, value_name = "FILE")]
    events: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Write the resulting game to this file.
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Report {
            config,
            validate_only,
            output,
        } => {
            let config = GameConfig::from_path(&config)?;
            if !output.json {
                println!(
                    "Loaded configuration '{}' with {} cities and {} player{}",
                    config.game_name,
                    config.cities.len(),
                    config.players.len(),
                    if config.players.len() == 1 { "" } else { "s" }
                );
            }
            let _logging_guard = init_logging(&config.logging, &config.resolved_log_file())?;
            let game = GameState::new(config.setup()).context("building game from configuration")?;

            if validate_only {
                println!("Validation-only mode: no events replayed.");
                return Ok(());
            }
            finish(&config.game_name, &config.players, game, &output)
        }
        Command::Resume { snapshot, output } => {
            let session = SavedSession::load(&snapshot)?;
            let logging = LoggingConfig::default();
            let _logging_guard =
                init_logging(&logging, &logging.resolved_file(&session.game_name))?;
            let (game_name, players, game) = session.restore()?;
            finish(&game_name, &players, game, &output)
        }
        Command::Demo {
            config,
            seed,
            turns,
        } => {
            let config = GameConfig::from_path(&config)?;
            let _logging_guard = init_logging(&config.logging, &config.resolved_log_file())?;
            let played = run_demo(&config, seed, turns.unwrap_or(usize::MAX))?;
            for turn in &played {
                println!("{turn}");
            }
            let epidemics = played.iter().filter(|turn| turn.had_epidemic()).count();
            println!(
                "Demo complete for '{}': {} turns, {} with an epidemic (seed {seed})",
                config.game_name,
                played.len(),
                epidemics
            );
            Ok(())
        }
    }
}

fn finish(
    game_name: &str,
    players: &[PlayerConfig],
    mut game: GameState,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    if let Some(path) = output.events.as_ref() {
        let events = load_events(path)?;
        let applied = replay(&mut game, &events)?;
        if !output.json {
            println!("Replayed {applied} event{}", if applied == 1 { "" } else { "s" });
        }
    }

    if let Some(path) = output.save.as_ref() {
        SavedSession::capture(game_name, players, &game).save(path)?;
        if !output.json {
            println!("Saved game to {}", path.display());
        }
    }

    let report = Report::build(game_name, players, &game).context("computing report")?;
    if output.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }
    Ok(())
}
