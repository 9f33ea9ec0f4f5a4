use std::fmt;

use crate::games::SessionRng;
use super::board::{Board, get_available_moves};
use super::types::{BOARD_CELLS, Difficulty, GameStatus, Mark};
use super::win_detector::evaluate;

const WIN_SCORE: i32 = 10;

/// Source of the bot's random decisions.
pub trait MoveRng {
    /// Fair coin deciding whether the medium bot searches this turn.
    fn coin_flip(&mut self) -> bool;
    /// Uniform index in `0..len`; `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

impl MoveRng for SessionRng {
    fn coin_flip(&mut self) -> bool {
        self.random_bool()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotError {
    NoAvailableMoves,
    GameAlreadyOver(GameStatus),
    InvalidMarks { bot_mark: Mark, opponent_mark: Mark },
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::NoAvailableMoves => write!(f, "No available moves left on the board"),
            BotError::GameAlreadyOver(status) => write!(f, "Game is already over: {:?}", status),
            BotError::InvalidMarks {
                bot_mark,
                opponent_mark,
            } => write!(
                f,
                "Bot and opponent need distinct marks, got {:?} and {:?}",
                bot_mark, opponent_mark
            ),
        }
    }
}

impl std::error::Error for BotError {}

/// Picks the cell the bot plays next. The board is searched in place and is
/// identical to the input when this returns; applying the move is up to the caller.
pub fn calculate_move<R>(
    difficulty: Difficulty,
    board: &mut Board,
    bot_mark: Mark,
    opponent_mark: Mark,
    rng: &mut R,
) -> Result<usize, BotError>
where
    R: MoveRng + ?Sized,
{
    if bot_mark == Mark::Empty || bot_mark.opponent() != Some(opponent_mark) {
        return Err(BotError::InvalidMarks {
            bot_mark,
            opponent_mark,
        });
    }
    if board.is_full() {
        return Err(BotError::NoAvailableMoves);
    }
    let status = evaluate(board);
    if status.is_over() {
        return Err(BotError::GameAlreadyOver(status));
    }

    let chosen = match difficulty {
        Difficulty::High => calculate_minimax_move(board, bot_mark, opponent_mark),
        Difficulty::Medium => {
            if rng.coin_flip() {
                calculate_minimax_move(board, bot_mark, opponent_mark)
            } else {
                calculate_random_move(board, rng)
            }
        }
        Difficulty::Low => calculate_random_move(board, rng),
    };

    chosen.ok_or(BotError::NoAvailableMoves)
}

fn calculate_random_move<R>(board: &Board, rng: &mut R) -> Option<usize>
where
    R: MoveRng + ?Sized,
{
    let available_moves = get_available_moves(board);
    if available_moves.is_empty() {
        return None;
    }
    let idx = rng.pick_index(available_moves.len());
    available_moves.get(idx).copied()
}

/// Exhaustive search; equal scores keep the lowest index.
pub fn calculate_minimax_move(
    board: &mut Board,
    bot_mark: Mark,
    opponent_mark: Mark,
) -> Option<usize> {
    let mut best_move = None;
    let mut best_score = i32::MIN;

    for index in 0..BOARD_CELLS {
        if !board.is_empty_at(index) {
            continue;
        }

        let score = {
            let mut tentative = board.place_tentative(index, bot_mark);
            minimax(&mut tentative, 0, false, bot_mark, opponent_mark)
        };

        if score > best_score {
            best_score = score;
            best_move = Some(index);
        }
    }

    best_move
}

/// Scores the position for `bot_mark`: `10 - depth` for a bot win, `depth - 10`
/// for a loss, `0` for a draw. No pruning.
pub fn minimax(
    board: &mut Board,
    depth: usize,
    is_maximizing: bool,
    bot_mark: Mark,
    opponent_mark: Mark,
) -> i32 {
    match evaluate(board) {
        GameStatus::InProgress => {}
        GameStatus::Draw => return 0,
        status => {
            return if status.winner() == Some(bot_mark) {
                WIN_SCORE - depth as i32
            } else {
                depth as i32 - WIN_SCORE
            };
        }
    }

    let (mover, mut best) = if is_maximizing {
        (bot_mark, i32::MIN)
    } else {
        (opponent_mark, i32::MAX)
    };

    for index in 0..BOARD_CELLS {
        if !board.is_empty_at(index) {
            continue;
        }

        let mut tentative = board.place_tentative(index, mover);
        let eval = minimax(&mut tentative, depth + 1, !is_maximizing, bot_mark, opponent_mark);

        best = if is_maximizing {
            best.max(eval)
        } else {
            best.min(eval)
        };
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const E: Mark = Mark::Empty;
    const X: Mark = Mark::X;
    const O: Mark = Mark::O;

    struct ScriptedRng {
        coin: bool,
        index: usize,
    }

    impl MoveRng for ScriptedRng {
        fn coin_flip(&mut self) -> bool {
            self.coin
        }

        fn pick_index(&mut self, len: usize) -> usize {
            self.index % len
        }
    }

    fn high_move(board: &mut Board, bot_mark: Mark) -> usize {
        let mut rng = SessionRng::new(0);
        calculate_move(Difficulty::High, board, bot_mark, bot_mark.opponent().unwrap(), &mut rng)
            .unwrap()
    }

    #[test]
    fn test_takes_immediate_win() {
        let mut board = Board::from_cells([X, X, E, O, E, E, E, E, O]);
        assert_eq!(high_move(&mut board, X), 2);
    }

    #[test]
    fn test_prefers_win_over_block() {
        let mut board = Board::from_cells([X, X, E, O, O, E, E, E, E]);
        assert_eq!(high_move(&mut board, X), 2);
        let mut board = Board::from_cells([X, X, E, O, O, E, X, E, E]);
        assert_eq!(high_move(&mut board, O), 5);
    }

    #[test]
    fn test_blocks_immediate_loss() {
        let mut board = Board::from_cells([X, X, E, E, O, E, E, E, E]);
        assert_eq!(high_move(&mut board, O), 2);
        let mut board = Board::from_cells([X, E, O, E, X, E, E, E, E]);
        assert_eq!(high_move(&mut board, O), 8);
    }

    #[test]
    fn test_empty_board_keeps_first_of_equal_scores() {
        let mut board = Board::new();
        assert_eq!(high_move(&mut board, X), 0);
    }

    #[test]
    fn test_high_is_deterministic() {
        let boards = [
            Board::new(),
            Board::from_cells([X, E, E, E, E, E, E, E, E]),
            Board::from_cells([E, E, E, E, X, E, E, E, E]),
            Board::from_cells([X, E, E, E, O, E, E, E, X]),
        ];
        for board in boards {
            let bot_mark = if board.count(X) > board.count(O) { O } else { X };
            let mut scratch = board;
            let first = high_move(&mut scratch, bot_mark);
            for seed in 1..5 {
                let mut rng = SessionRng::new(seed);
                let again = calculate_move(
                    Difficulty::High,
                    &mut scratch,
                    bot_mark,
                    bot_mark.opponent().unwrap(),
                    &mut rng,
                );
                assert_eq!(again, Ok(first));
            }
        }
    }

    #[test]
    fn test_board_is_restored_after_search() {
        let original = Board::from_cells([X, E, E, E, O, E, E, E, E]);
        let mut board = original;
        let mut rng = SessionRng::new(7);
        for difficulty in [Difficulty::Low, Difficulty::Medium, Difficulty::High] {
            calculate_move(difficulty, &mut board, X, O, &mut rng).unwrap();
            assert_eq!(board, original);
        }
    }

    fn assert_never_loses(board: &mut Board, bot_mark: Mark, bot_to_move: bool) {
        let status = evaluate(board);
        if status.is_over() {
            assert_ne!(status.winner(), bot_mark.opponent(), "bot lost on\n{}", board);
            return;
        }

        if bot_to_move {
            let index = high_move(board, bot_mark);
            let mut tentative = board.place_tentative(index, bot_mark);
            assert_never_loses(&mut tentative, bot_mark, false);
        } else {
            let opponent_mark = bot_mark.opponent().unwrap();
            for index in get_available_moves(board) {
                let mut tentative = board.place_tentative(index, opponent_mark);
                assert_never_loses(&mut tentative, bot_mark, true);
            }
        }
    }

    #[test]
    fn test_never_loses_moving_second() {
        assert_never_loses(&mut Board::new(), O, false);
    }

    #[test]
    fn test_never_loses_moving_first() {
        assert_never_loses(&mut Board::new(), X, true);
    }

    #[test]
    fn test_minimax_terminal_scores() {
        let mut won = Board::from_cells([X, X, X, O, O, E, E, E, E]);
        assert_eq!(minimax(&mut won, 3, false, X, O), 7);
        assert_eq!(minimax(&mut won, 3, true, O, X), -7);

        let mut draw = Board::from_cells([X, O, X, X, O, O, O, X, X]);
        assert_eq!(minimax(&mut draw, 5, true, X, O), 0);
    }

    #[test]
    fn test_minimax_prefers_faster_win() {
        // X wins now at 2; the score reflects the one ply spent.
        let mut board = Board::from_cells([X, X, E, O, O, E, E, E, E]);
        assert_eq!(minimax(&mut board, 0, true, X, O), 9);
    }

    #[test]
    fn test_low_and_medium_play_legal_spread_moves() {
        let board = Board::from_cells([X, E, E, E, O, E, E, X, E]);
        let available: HashSet<usize> = get_available_moves(&board).into_iter().collect();
        let mut rng = SessionRng::from_random();

        for difficulty in [Difficulty::Low, Difficulty::Medium] {
            let mut seen = HashSet::new();
            for _ in 0..200 {
                let mut scratch = board;
                let index = calculate_move(difficulty, &mut scratch, O, X, &mut rng).unwrap();
                assert!(available.contains(&index));
                seen.insert(index);
            }
            assert!(seen.len() > 1, "{:?} always played {:?}", difficulty, seen);
        }
    }

    #[test]
    fn test_low_picks_from_empty_cells_by_index() {
        let mut board = Board::from_cells([X, O, E, X, E, E, E, E, E]);
        let mut rng = ScriptedRng { coin: true, index: 2 };
        let index = calculate_move(Difficulty::Low, &mut board, X, O, &mut rng).unwrap();
        assert_eq!(index, 5);
    }

    #[test]
    fn test_medium_follows_coin() {
        let mut board = Board::from_cells([X, X, E, E, O, E, E, E, E]);
        let mut searching = ScriptedRng { coin: true, index: 4 };
        assert_eq!(calculate_move(Difficulty::Medium, &mut board, O, X, &mut searching), Ok(2));

        let mut guessing = ScriptedRng { coin: false, index: 4 };
        assert_eq!(calculate_move(Difficulty::Medium, &mut board, O, X, &mut guessing), Ok(7));
    }

    #[test]
    fn test_full_board_is_rejected() {
        let mut board = Board::from_cells([X, O, X, X, O, O, O, X, X]);
        let mut rng = SessionRng::new(1);
        for difficulty in [Difficulty::Low, Difficulty::Medium, Difficulty::High] {
            let result = calculate_move(difficulty, &mut board, X, O, &mut rng);
            assert_eq!(result, Err(BotError::NoAvailableMoves));
        }
    }

    #[test]
    fn test_won_board_is_rejected() {
        let mut board = Board::from_cells([X, X, X, O, O, E, E, E, E]);
        let mut rng = SessionRng::new(1);
        let result = calculate_move(Difficulty::Low, &mut board, O, X, &mut rng);
        assert_eq!(result, Err(BotError::GameAlreadyOver(GameStatus::XWon)));
    }

    #[test]
    fn test_invalid_marks_are_rejected() {
        let mut board = Board::new();
        let mut rng = SessionRng::new(1);
        let result = calculate_move(Difficulty::High, &mut board, X, X, &mut rng);
        assert!(matches!(result, Err(BotError::InvalidMarks { .. })));
        let result = calculate_move(Difficulty::High, &mut board, Mark::Empty, O, &mut rng);
        assert!(matches!(result, Err(BotError::InvalidMarks { .. })));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BotError::NoAvailableMoves.to_string(),
            "No available moves left on the board"
        );
        assert_eq!(
            BotError::GameAlreadyOver(GameStatus::Draw).to_string(),
            "Game is already over: Draw"
        );
    }
}
