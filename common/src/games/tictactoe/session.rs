use super::bot_controller::MoveRng;
use super::game_state::TicTacToeGameState;
use super::score::ScoreTally;
use super::settings::TicTacToeSettings;
use super::types::{GameStatus, Mark};

/// A run of rounds with fixed settings and a running score.
#[derive(Debug, Clone)]
pub struct TicTacToeSession {
    settings: TicTacToeSettings,
    game: TicTacToeGameState,
    tally: ScoreTally,
    round_recorded: bool,
}

impl TicTacToeSession {
    pub fn new(settings: TicTacToeSettings) -> Self {
        Self {
            settings,
            game: TicTacToeGameState::new(settings.bot_mark(), settings.difficulty),
            tally: ScoreTally::default(),
            round_recorded: false,
        }
    }

    pub fn settings(&self) -> &TicTacToeSettings {
        &self.settings
    }

    pub fn game(&self) -> &TicTacToeGameState {
        &self.game
    }

    pub fn tally(&self) -> &ScoreTally {
        &self.tally
    }

    pub fn is_bot_turn(&self) -> bool {
        self.game.is_bot_turn()
    }

    /// Mark of the person expected to move, if any.
    pub fn human_to_move(&self) -> Option<Mark> {
        if self.game.is_over() || self.game.is_bot_turn() {
            None
        } else {
            Some(self.game.current_mark)
        }
    }

    pub fn play_human_move(&mut self, index: usize) -> Result<GameStatus, String> {
        if self.game.is_bot_turn() {
            return Err("Waiting for the bot".to_string());
        }
        let mark = self.game.current_mark;
        self.game.place_mark(mark, index)?;
        Ok(self.settle())
    }

    pub fn play_bot_move<R>(&mut self, rng: &mut R) -> Result<(usize, GameStatus), String>
    where
        R: MoveRng + ?Sized,
    {
        let index = self.game.apply_bot_move(rng)?;
        Ok((index, self.settle()))
    }

    /// Gives the round away on behalf of the person to move.
    pub fn forfeit_human(&mut self) -> Result<GameStatus, String> {
        if self.game.is_bot_turn() {
            return Err("Waiting for the bot".to_string());
        }
        let mark = self.game.current_mark;
        self.game.forfeit(mark)?;
        Ok(self.settle())
    }

    /// Starts the next round. A finished round is scored exactly once.
    pub fn new_round(&mut self) {
        self.settle();
        self.reset();
    }

    /// Throws the current board away without scoring it.
    pub fn reset(&mut self) {
        self.game = TicTacToeGameState::new(self.settings.bot_mark(), self.settings.difficulty);
        self.round_recorded = false;
    }

    fn settle(&mut self) -> GameStatus {
        let status = self.game.status;
        if status.is_over() && !self.round_recorded {
            self.tally.record(status);
            self.round_recorded = true;
        }
        status
    }
}
