use std::io::{self, BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

use tictactoe_common::games::tictactoe::{
    BOARD_CELLS, GameMode, GameStatus, MoveRng, ScoreTally, TicTacToeSession, TicTacToeSettings,
};
use tictactoe_common::log;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerOptions {
    pub bot_delay: Duration,
    /// Human moves slower than this forfeit the round.
    pub move_time_limit: Option<Duration>,
}

impl RunnerOptions {
    pub fn from_config(config: &Config) -> Self {
        match config.game.mode {
            GameMode::Blitz => Self {
                bot_delay: Duration::ZERO,
                move_time_limit: Some(config.pacing.blitz_move_limit()),
            },
            GameMode::Single => Self {
                bot_delay: config.pacing.bot_delay(),
                move_time_limit: None,
            },
            GameMode::Friend => Self {
                bot_delay: Duration::ZERO,
                move_time_limit: None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Place(usize),
    Restart,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "q" | "quit" => return Ok(Command::Quit),
        "r" | "restart" => return Ok(Command::Restart),
        _ => {}
    }

    match trimmed.parse::<usize>() {
        Ok(cell) if (1..=BOARD_CELLS).contains(&cell) => Ok(Command::Place(cell - 1)),
        Ok(cell) => Err(format!("Cell {} does not exist, pick 1-{}", cell, BOARD_CELLS)),
        Err(_) => Err(format!(
            "Unrecognised input '{}': type 1-{}, r to restart or q to quit",
            trimmed, BOARD_CELLS
        )),
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn describe_result(session: &TicTacToeSession, status: GameStatus) -> String {
    let winner = match status.winner() {
        Some(mark) => mark,
        None => return "It's a tie!".to_string(),
    };
    match session.settings().bot_mark() {
        Some(bot_mark) if bot_mark == winner => "The computer wins!".to_string(),
        Some(_) => "You win!".to_string(),
        None => format!("{} wins!", winner),
    }
}

fn write_round_over<W: Write>(output: &mut W, session: &TicTacToeSession) -> io::Result<()> {
    let game = session.game();
    writeln!(output, "{}", game.board)?;
    writeln!(output, "{}", describe_result(session, game.status))?;
    if let Some(line) = game.winning_line() {
        let cells: Vec<String> = line.cells.iter().map(|cell| (cell + 1).to_string()).collect();
        writeln!(output, "Winning line: {}", cells.join("-"))?;
    }
    writeln!(output, "Score  {}", session.tally())?;
    writeln!(output, "Press Enter for the next round, or q to quit.")
}

/// Plays rounds until the input ends or the player quits, returning the final score.
pub fn run<R, W, G>(
    input: &mut R,
    output: &mut W,
    settings: TicTacToeSettings,
    options: &RunnerOptions,
    rng: &mut G,
) -> io::Result<ScoreTally>
where
    R: BufRead,
    W: Write,
    G: MoveRng + ?Sized,
{
    let mut session = TicTacToeSession::new(settings);
    writeln!(
        output,
        "Tic-tac-toe: {:?} mode, X moves first.",
        settings.mode
    )?;
    if let Some(bot_mark) = settings.bot_mark() {
        writeln!(
            output,
            "You play {}, the computer plays {} on {:?} difficulty.",
            settings.human_mark, bot_mark, settings.difficulty
        )?;
    }
    if let Some(limit) = options.move_time_limit {
        writeln!(output, "Blitz: make each move within {} seconds.", limit.as_secs())?;
    }

    // Set when a human turn is first prompted, cleared once that turn ends.
    let mut turn_started: Option<Instant> = None;

    loop {
        while session.is_bot_turn() {
            if !options.bot_delay.is_zero() {
                thread::sleep(options.bot_delay);
            }
            let started = Instant::now();
            let (index, status) = session.play_bot_move(rng).map_err(io::Error::other)?;
            log!(
                "Bot played cell {} in {:?}, status {:?}",
                index,
                started.elapsed(),
                status
            );
            writeln!(output, "Computer plays {}", index + 1)?;
        }

        if session.game().is_over() {
            log!("Round over: {:?}, score {}", session.game().status, session.tally());
            write_round_over(output, &session)?;
            match read_line(input)? {
                Some(line) if matches!(parse_command(&line), Ok(Command::Quit)) => break,
                Some(_) => {
                    session.new_round();
                    turn_started = None;
                    continue;
                }
                None => break,
            }
        }

        let mark = session.game().current_mark;
        writeln!(output, "{}", session.game().board)?;
        writeln!(output, "{} to move (1-9, r to restart, q to quit):", mark)?;
        output.flush()?;

        let started = *turn_started.get_or_insert_with(Instant::now);
        let line = match read_line(input)? {
            Some(line) => line,
            None => break,
        };

        let command = parse_command(&line);
        if command == Ok(Command::Quit) {
            break;
        }
        if let Some(limit) = options.move_time_limit
            && started.elapsed() >= limit
        {
            log!("{} ran out of time after {:?}", mark, started.elapsed());
            writeln!(output, "Too slow! The round goes to the computer.")?;
            session.forfeit_human().map_err(io::Error::other)?;
            turn_started = None;
            continue;
        }

        match command {
            Ok(Command::Quit) => break,
            Ok(Command::Restart) => {
                log!("Round restarted");
                session.reset();
                turn_started = None;
                writeln!(output, "Board cleared.")?;
            }
            Ok(Command::Place(index)) => match session.play_human_move(index) {
                Ok(status) => {
                    log!("{} played cell {}, status {:?}", mark, index, status);
                    turn_started = None;
                }
                Err(message) => writeln!(output, "{}", message)?,
            },
            Err(message) => writeln!(output, "{}", message)?,
        }
    }

    writeln!(output, "Final score  {}", session.tally())?;
    Ok(*session.tally())
}
