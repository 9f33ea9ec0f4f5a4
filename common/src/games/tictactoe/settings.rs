use serde::{Deserialize, Serialize};

use super::types::{Difficulty, GameMode, Mark};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeSettings {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// X always opens, so `O` means the bot moves first.
    pub human_mark: Mark,
}

impl TicTacToeSettings {
    /// The bot's mark, or `None` when two people share the board.
    pub fn bot_mark(&self) -> Option<Mark> {
        if self.mode.has_bot() {
            self.human_mark.opponent()
        } else {
            None
        }
    }
}

impl Default for TicTacToeSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::Single,
            difficulty: Difficulty::High,
            human_mark: Mark::X,
        }
    }
}
