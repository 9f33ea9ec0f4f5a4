use super::board::Board;
use super::bot_controller::{BotError, MoveRng, calculate_move};
use super::types::{BOARD_CELLS, Difficulty, GameStatus, Mark, Position, WinningLine};
use super::win_detector::{check_win_with_line, evaluate};

/// One round on one board. X always moves first.
#[derive(Debug, Clone)]
pub struct TicTacToeGameState {
    pub board: Board,
    pub current_mark: Mark,
    pub status: GameStatus,
    pub last_move: Option<Position>,
    pub bot_mark: Option<Mark>,
    pub difficulty: Difficulty,
}

impl TicTacToeGameState {
    pub fn new(bot_mark: Option<Mark>, difficulty: Difficulty) -> Self {
        Self {
            board: Board::new(),
            current_mark: Mark::X,
            status: GameStatus::InProgress,
            last_move: None,
            bot_mark,
            difficulty,
        }
    }

    pub fn place_mark(&mut self, mark: Mark, index: usize) -> Result<(), String> {
        if self.status != GameStatus::InProgress {
            return Err("Game is already over".to_string());
        }

        if mark != self.current_mark {
            return Err("Not your turn".to_string());
        }

        if index >= BOARD_CELLS {
            return Err("Position out of bounds".to_string());
        }

        if !self.board.is_empty_at(index) {
            return Err("Cell is already marked".to_string());
        }

        self.board.set(index, mark);
        self.last_move = Some(Position::from_index(index));

        self.status = evaluate(&self.board);

        if self.status == GameStatus::InProgress {
            self.switch_turn();
        }

        Ok(())
    }

    pub fn is_bot_turn(&self) -> bool {
        self.status == GameStatus::InProgress && self.bot_mark == Some(self.current_mark)
    }

    /// Lets the bot choose and play its move. Returns the chosen cell.
    pub fn apply_bot_move<R>(&mut self, rng: &mut R) -> Result<usize, String>
    where
        R: MoveRng + ?Sized,
    {
        let bot_mark = self.bot_mark.ok_or("This game has no bot")?;
        if !self.is_bot_turn() {
            return Err("Not the bot's turn".to_string());
        }
        let opponent_mark = bot_mark.opponent().ok_or("Bot has no mark")?;

        let index = calculate_move(
            self.difficulty,
            &mut self.board,
            bot_mark,
            opponent_mark,
            rng,
        )
        .map_err(|e: BotError| format!("Bot failed to move: {}", e))?;

        self.place_mark(bot_mark, index)?;
        Ok(index)
    }

    fn switch_turn(&mut self) {
        self.current_mark = if self.current_mark == Mark::X {
            Mark::O
        } else {
            Mark::X
        };
    }

    pub fn winner(&self) -> Option<Mark> {
        self.status.winner()
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        match self.status {
            GameStatus::XWon | GameStatus::OWon => check_win_with_line(&self.board),
            GameStatus::InProgress | GameStatus::Draw => None,
        }
    }

    /// Ends the round in favour of the other mark.
    pub fn forfeit(&mut self, mark: Mark) -> Result<(), String> {
        if self.status != GameStatus::InProgress {
            return Err("Game is already over".to_string());
        }
        match mark.opponent() {
            Some(winner) => {
                self.status = GameStatus::won_by(winner);
                Ok(())
            }
            None => Err("Empty mark cannot forfeit".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::SessionRng;

    fn play(state: &mut TicTacToeGameState, moves: &[usize]) {
        for &index in moves {
            let mark = state.current_mark;
            state.place_mark(mark, index).unwrap();
        }
    }

    #[test]
    fn test_turns_alternate_starting_with_x() {
        let mut state = TicTacToeGameState::new(None, Difficulty::High);
        assert_eq!(state.current_mark, Mark::X);
        state.place_mark(Mark::X, 4).unwrap();
        assert_eq!(state.current_mark, Mark::O);
        assert_eq!(state.last_move, Some(Position::new(1, 1)));
        assert_eq!(state.place_mark(Mark::X, 0), Err("Not your turn".to_string()));
    }

    #[test]
    fn test_rejects_occupied_and_out_of_bounds() {
        let mut state = TicTacToeGameState::new(None, Difficulty::High);
        state.place_mark(Mark::X, 4).unwrap();
        assert_eq!(state.place_mark(Mark::O, 4), Err("Cell is already marked".to_string()));
        assert_eq!(state.place_mark(Mark::O, 9), Err("Position out of bounds".to_string()));
        assert_eq!(state.current_mark, Mark::O);
    }

    #[test]
    fn test_win_freezes_board() {
        let mut state = TicTacToeGameState::new(None, Difficulty::High);
        play(&mut state, &[0, 3, 1, 4, 2]);
        assert_eq!(state.status, GameStatus::XWon);
        assert_eq!(state.winner(), Some(Mark::X));
        assert_eq!(state.winning_line().map(|line| line.cells), Some([0, 1, 2]));
        assert_eq!(state.place_mark(Mark::O, 5), Err("Game is already over".to_string()));
    }

    #[test]
    fn test_draw() {
        let mut state = TicTacToeGameState::new(None, Difficulty::High);
        play(&mut state, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(state.status, GameStatus::Draw);
        assert_eq!(state.winner(), None);
        assert_eq!(state.winning_line(), None);
    }

    #[test]
    fn test_bot_answers_human_move() {
        let mut state = TicTacToeGameState::new(Some(Mark::O), Difficulty::High);
        let mut rng = SessionRng::new(3);
        assert!(!state.is_bot_turn());
        play(&mut state, &[0]);
        assert!(state.is_bot_turn());
        let index = state.apply_bot_move(&mut rng).unwrap();
        assert_eq!(state.board.get(index), Some(Mark::O));
        assert_eq!(state.current_mark, Mark::X);
    }

    #[test]
    fn test_bot_blocks_during_play() {
        let mut state = TicTacToeGameState::new(Some(Mark::O), Difficulty::High);
        let mut rng = SessionRng::new(3);
        play(&mut state, &[0]);
        assert_eq!(state.apply_bot_move(&mut rng), Ok(4));
        play(&mut state, &[1]);
        assert_eq!(state.apply_bot_move(&mut rng), Ok(2));
    }

    #[test]
    fn test_bot_move_rejected_out_of_turn() {
        let mut state = TicTacToeGameState::new(None, Difficulty::Low);
        let mut rng = SessionRng::new(3);
        assert_eq!(state.apply_bot_move(&mut rng), Err("This game has no bot".to_string()));

        let mut state = TicTacToeGameState::new(Some(Mark::O), Difficulty::Low);
        assert_eq!(state.apply_bot_move(&mut rng), Err("Not the bot's turn".to_string()));
        assert_eq!(state.board, Board::new());
    }

    #[test]
    fn test_forfeit() {
        let mut state = TicTacToeGameState::new(Some(Mark::O), Difficulty::High);
        state.forfeit(Mark::X).unwrap();
        assert_eq!(state.status, GameStatus::OWon);
        assert!(state.forfeit(Mark::O).is_err());
    }
}
