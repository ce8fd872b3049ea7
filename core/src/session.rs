use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// `Won` and `Lost` freeze all further reveals; only `reset` leaves them.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameOutcome {
    InProgress,
    Won,
    Lost,
}

impl GameOutcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameOutcome {
    fn default() -> Self {
        Self::InProgress
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    /// First card of a pair-attempt turned face up.
    FirstUp,
    /// Second card matched the first; both stay face up for good.
    Matched,
    /// Second card did not match; both stay visible until the hide delay
    /// elapses.
    Mismatch,
    HitJoker,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game.
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TickOutcome {
    NoChange,
    /// A mismatched pair flipped back to hidden.
    PairHidden,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::PairHidden)
    }
}

/// A mismatched pair currently shown face up, awaiting automatic re-hide.
/// At most one exists at a time.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingHide {
    pub first: Coord2,
    pub second: Coord2,
    pub shown_at: TimeMs,
}

/// Per-cell projection handed to the view layer. Hidden cells never carry
/// their identity.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum VisibleCell {
    Hidden,
    Revealed(CardIdentity),
    Matched(CardIdentity),
}

/// Side-effect-free view of a session, produced by [`GameSession::snapshot`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub outcome: GameOutcome,
    pub moves: u32,
    pub matched_pairs: CellCount,
    pub pairs: CellCount,
    pub cells: Array2<VisibleCell>,
}

/// Owns all mutable state of one game from deal to win or loss. Mutated
/// only through `reveal`, `tick` and `reset`; the caller drives time by
/// passing a monotonic `now` into the first two.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    config: GameConfig,
    layout: CardLayout,
    board: Array2<CellState>,
    first_pick: Option<Coord2>,
    pending_hide: Option<PendingHide>,
    moves: Saturating<u32>,
    matched_pairs: Saturating<CellCount>,
    outcome: GameOutcome,
}

impl GameSession {
    pub fn new(layout: CardLayout, hide_delay_ms: TimeMs) -> Self {
        let config = GameConfig::new_unchecked(layout.size(), layout.pair_count(), hide_delay_ms);
        let board = Array2::default(layout.size().to_nd_index());
        Self {
            config,
            layout,
            board,
            first_pick: None,
            pending_hide: None,
            moves: Saturating(0),
            matched_pairs: Saturating(0),
            outcome: Default::default(),
        }
    }

    /// Deals a fresh board for `config` with a seeded shuffle.
    pub fn from_config(config: GameConfig, seed: u64) -> Result<Self> {
        let layout = ShuffledLayoutGenerator::new(seed).generate(config)?;
        Ok(Self::new(layout, config.hide_delay_ms))
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn pair_count(&self) -> CellCount {
        self.layout.pair_count()
    }

    /// Individual card reveals, not pair-attempts.
    pub fn moves(&self) -> u32 {
        self.moves.0
    }

    pub fn matched_pairs(&self) -> CellCount {
        self.matched_pairs.0
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.board[coords.to_nd_index()]
    }

    pub fn pending_hide(&self) -> Option<PendingHide> {
        self.pending_hide
    }

    pub fn first_pick(&self) -> Option<Coord2> {
        self.first_pick
    }

    /// Advisory input-affordance query for the view layer; the no-op
    /// guards in `reveal` remain the source of truth.
    pub fn can_interact_at(&self, coords: Coord2) -> bool {
        !self.outcome.is_finished() && self.cell_at(coords).is_hidden()
    }

    /// The sole player-facing action. Reveals the card at `coords`,
    /// resolving an elapsed pending hide first.
    ///
    /// Revealing a face-up cell or playing after the game ended is a
    /// silent no-op; only out-of-bounds coordinates are an error.
    pub fn reveal(&mut self, coords: Coord2, now: TimeMs) -> Result<RevealOutcome> {
        let coords = self.layout.validate_coords(coords)?;

        if self.outcome.is_finished() || self.cell_at(coords).is_face_up() {
            return Ok(RevealOutcome::NoChange);
        }

        // a stale mismatched pair flips back under the new click
        self.resolve_pending(now);

        self.board[coords.to_nd_index()] = CellState::Revealed;
        self.moves += 1;
        log::debug!("Revealed {:?} at {:?}", self.layout[coords], coords);

        if self.layout.is_joker_at(coords) {
            // the joker stays face up as the losing card
            self.outcome = GameOutcome::Lost;
            return Ok(RevealOutcome::HitJoker);
        }

        let Some(last) = self.first_pick.take() else {
            self.first_pick = Some(coords);
            return Ok(RevealOutcome::FirstUp);
        };

        // the face-up guard above makes a self-pair unreachable
        debug_assert_ne!(coords, last);

        if self.layout[coords] == self.layout[last] {
            self.board[coords.to_nd_index()] = CellState::Matched;
            self.board[last.to_nd_index()] = CellState::Matched;
            self.matched_pairs += 1;
            if self.matched_pairs.0 == self.layout.pair_count() {
                self.end_game(true);
                return Ok(RevealOutcome::Won);
            }
            Ok(RevealOutcome::Matched)
        } else {
            // an unexpired earlier mismatch flips back right away so at
            // most one pending hide exists
            self.expire_pending();
            self.pending_hide = Some(PendingHide {
                first: coords,
                second: last,
                shown_at: now,
            });
            Ok(RevealOutcome::Mismatch)
        }
    }

    /// Time-driven transition: flips an elapsed mismatched pair back to
    /// hidden. Idempotent, safe on any cadence, and still effective after
    /// the game ended.
    pub fn tick(&mut self, now: TimeMs) -> TickOutcome {
        self.resolve_pending(now)
    }

    /// Reinitializes the session wholesale with a freshly shuffled board.
    /// Always legal regardless of the current outcome.
    pub fn reset(&mut self, seed: u64) -> Result<()> {
        self.layout = ShuffledLayoutGenerator::new(seed).generate(self.config)?;
        self.board = Array2::default(self.layout.size().to_nd_index());
        self.first_pick = None;
        self.pending_hide = None;
        self.moves = Saturating(0);
        self.matched_pairs = Saturating(0);
        self.outcome = Default::default();
        Ok(())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let cells = Array2::from_shape_fn(self.board.dim(), |(x, y)| {
            let coords = (x as Coord, y as Coord);
            match self.cell_at(coords) {
                CellState::Hidden => VisibleCell::Hidden,
                CellState::Revealed => VisibleCell::Revealed(self.layout[coords]),
                CellState::Matched => VisibleCell::Matched(self.layout[coords]),
            }
        });
        GameSnapshot {
            outcome: self.outcome,
            moves: self.moves.0,
            matched_pairs: self.matched_pairs.0,
            pairs: self.layout.pair_count(),
            cells,
        }
    }

    fn resolve_pending(&mut self, now: TimeMs) -> TickOutcome {
        match self.pending_hide {
            Some(pending)
                if now.saturating_sub(pending.shown_at) >= self.config.hide_delay_ms =>
            {
                self.expire_pending()
            }
            _ => TickOutcome::NoChange,
        }
    }

    fn expire_pending(&mut self) -> TickOutcome {
        let Some(pending) = self.pending_hide.take() else {
            return TickOutcome::NoChange;
        };
        self.board[pending.first.to_nd_index()] = CellState::Hidden;
        self.board[pending.second.to_nd_index()] = CellState::Hidden;
        log::trace!(
            "Hid mismatched pair at {:?} / {:?}",
            pending.first,
            pending.second
        );
        TickOutcome::PairHidden
    }

    fn end_game(&mut self, won: bool) {
        if self.outcome.is_finished() {
            return;
        }
        self.outcome = if won {
            GameOutcome::Won
        } else {
            GameOutcome::Lost
        };
    }
}
