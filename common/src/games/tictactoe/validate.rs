use crate::config::Validate;
use super::settings::TicTacToeSettings;
use super::types::Mark;

impl Validate for TicTacToeSettings {
    fn validate(&self) -> Result<(), String> {
        if self.human_mark == Mark::Empty {
            return Err("human_mark must be X or O".to_string());
        }
        Ok(())
    }
}
