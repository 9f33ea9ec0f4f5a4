mod config;
mod runner;

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tictactoe_common::config::{ConfigManager, Validate};
use tictactoe_common::games::SessionRng;
use tictactoe_common::games::tictactoe::{Difficulty, GameMode, Mark};
use tictactoe_common::{log, logger};

use config::{Config, get_config_manager};
use runner::RunnerOptions;

#[derive(Parser)]
#[command(name = "tictactoe", about = "Tic-tac-toe against a friend or the computer")]
struct Args {
    /// friend, single or blitz
    #[arg(long)]
    mode: Option<GameMode>,
    /// low, medium or high
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// X or O; X always moves first
    #[arg(long)]
    human_mark: Option<Mark>,
    /// Let the computer open the round (same as --human-mark O)
    #[arg(long, conflicts_with = "human_mark")]
    ai_first: bool,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the effective settings back to the config file
    #[arg(long)]
    save_config: bool,
    #[arg(long)]
    verbose: bool,
    #[arg(long)]
    use_log_prefix: bool,
    /// Fix the computer's random choices
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn apply_to(&self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.game.mode = mode;
        }
        if let Some(difficulty) = self.difficulty {
            config.game.difficulty = difficulty;
        }
        if let Some(human_mark) = self.human_mark {
            config.game.human_mark = human_mark;
        }
        if self.ai_first {
            config.game.human_mark = Mark::O;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config_manager = match &args.config {
        Some(path) => ConfigManager::from_yaml_file(path),
        None => get_config_manager(),
    };
    let mut config = config_manager.get_config()?;
    args.apply_to(&mut config);
    config.validate()?;

    let prefix = if args.use_log_prefix {
        Some("TicTacToe".to_string())
    } else {
        None
    };
    logger::init_logger(prefix, args.verbose || config.log_enabled);

    if args.save_config {
        config_manager.set_config(&config)?;
        log!("Saved settings: {:?}", config);
    }

    let mut rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!(
        "Starting {:?} game, difficulty {:?}, human plays {}, seed {}",
        config.game.mode,
        config.game.difficulty,
        config.game.human_mark,
        rng.seed()
    );

    let options = RunnerOptions::from_config(&config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let tally = runner::run(
        &mut stdin.lock(),
        &mut stdout.lock(),
        config.game,
        &options,
        &mut rng,
    )?;
    log!("Session finished after {} rounds", tally.rounds());

    Ok(())
}
