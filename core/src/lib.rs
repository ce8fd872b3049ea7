#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use card::*;
pub use deck::*;
pub use error::*;
pub use session::*;
pub use types::*;

mod card;
mod deck;
mod error;
mod session;
mod types;

/// Default auto-hide latency for a mismatched pair, in milliseconds.
pub const DEFAULT_HIDE_DELAY_MS: TimeMs = 350;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub pairs: CellCount,
    pub hide_delay_ms: TimeMs,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, pairs: CellCount, hide_delay_ms: TimeMs) -> Self {
        Self {
            size,
            pairs,
            hide_delay_ms,
        }
    }

    /// A board must hold every pair twice plus the single joker, so
    /// `x * y == 2 * pairs + 1` has to hold exactly.
    pub fn new(size: Coord2, pairs: CellCount, hide_delay_ms: TimeMs) -> Result<Self> {
        if pairs < 1 {
            return Err(GameError::NoPairs);
        }
        if mult(size.0, size.1) != pairs.saturating_mul(2).saturating_add(1) {
            return Err(GameError::BoardSizeMismatch);
        }
        Ok(Self::new_unchecked(size, pairs, hide_delay_ms))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// 3x3 board, 4 pairs.
    pub const fn mini() -> Self {
        Self::new_unchecked((3, 3), 4, DEFAULT_HIDE_DELAY_MS)
    }

    /// The classic 5x5 board with 12 pairs and the joker.
    pub const fn classic() -> Self {
        Self::new_unchecked((5, 5), 12, DEFAULT_HIDE_DELAY_MS)
    }

    /// 7x7 board, 24 pairs.
    pub const fn large() -> Self {
        Self::new_unchecked((7, 7), 24, DEFAULT_HIDE_DELAY_MS)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_accepts_a_matching_board() {
        let config = GameConfig::new((5, 5), 12, 350).unwrap();
        assert_eq!(config.total_cells(), 25);
    }

    #[test]
    fn config_rejects_a_board_that_does_not_fit_the_deck() {
        assert_eq!(
            GameConfig::new((5, 5), 11, 350),
            Err(GameError::BoardSizeMismatch)
        );
        assert_eq!(
            GameConfig::new((2, 3), 2, 350),
            Err(GameError::BoardSizeMismatch)
        );
    }

    #[test]
    fn config_rejects_zero_pairs() {
        assert_eq!(GameConfig::new((1, 1), 0, 350), Err(GameError::NoPairs));
    }

    #[test]
    fn presets_satisfy_the_shape_constraint() {
        for preset in [GameConfig::mini(), GameConfig::classic(), GameConfig::large()] {
            assert_eq!(preset.total_cells(), 2 * preset.pairs + 1);
        }
    }
}
