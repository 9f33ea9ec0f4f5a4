use std::time::Duration;

use serde::{Deserialize, Serialize};
use tictactoe_common::config::Validate;

const MAX_BOT_DELAY_MS: u64 = 5000;
const BLITZ_MOVE_SECONDS_RANGE: std::ops::RangeInclusive<u64> = 1..=60;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct PacingConfig {
    /// Pause before the computer answers in single mode.
    pub bot_delay_ms: u64,
    pub blitz_move_seconds: u64,
}

impl PacingConfig {
    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.bot_delay_ms)
    }

    pub fn blitz_move_limit(&self) -> Duration {
        Duration::from_secs(self.blitz_move_seconds)
    }
}

impl Validate for PacingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.bot_delay_ms > MAX_BOT_DELAY_MS {
            return Err(format!(
                "bot_delay_ms must not exceed {} (got {})",
                MAX_BOT_DELAY_MS, self.bot_delay_ms
            ));
        }
        if !BLITZ_MOVE_SECONDS_RANGE.contains(&self.blitz_move_seconds) {
            return Err(format!(
                "blitz_move_seconds must be between {} and {} (got {})",
                BLITZ_MOVE_SECONDS_RANGE.start(),
                BLITZ_MOVE_SECONDS_RANGE.end(),
                self.blitz_move_seconds
            ));
        }
        Ok(())
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            bot_delay_ms: 300,
            blitz_move_seconds: 5,
        }
    }
}
