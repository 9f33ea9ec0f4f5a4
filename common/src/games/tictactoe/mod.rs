mod board;
mod bot_controller;
mod game_state;
mod score;
mod session;
mod settings;
mod types;
mod validate;
mod win_detector;

pub use board::{Board, TentativeMark, get_available_moves};
pub use bot_controller::{
    BotError, MoveRng, calculate_minimax_move, calculate_move, minimax,
};
pub use game_state::TicTacToeGameState;
pub use score::ScoreTally;
pub use session::TicTacToeSession;
pub use settings::TicTacToeSettings;
pub use types::{
    BOARD_CELLS, BOARD_SIDE, Difficulty, GameMode, GameStatus, Mark, Position, WinningLine,
};
pub use win_detector::{WINNING_LINES, check_win, check_win_with_line, evaluate};
