use serde::{Deserialize, Serialize};

use crate::PairId;

/// Identity assigned to a board position at deal time. Immutable for the
/// rest of the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardIdentity {
    Pair(PairId),
    Joker,
}

impl CardIdentity {
    pub const fn is_joker(self) -> bool {
        matches!(self, Self::Joker)
    }
}

/// Canonical player-visible state stored by the game session.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Revealed,
    Matched,
}

impl CellState {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    /// Whether the card face is currently shown to the player.
    pub const fn is_face_up(self) -> bool {
        matches!(self, Self::Revealed | Self::Matched)
    }

    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
