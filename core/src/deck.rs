use alloc::vec;
use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Builds the fixed identity multiset: each pair value exactly twice plus
/// one joker, `2 * pairs + 1` cards total. Deterministic; placement
/// randomness lives in [`shuffled_placement`].
pub fn build_deck(pairs: CellCount) -> Result<Vec<CardIdentity>> {
    if pairs < 1 {
        return Err(GameError::NoPairs);
    }

    let mut cards = Vec::with_capacity(2 * usize::from(pairs) + 1);
    for _ in 0..2 {
        cards.extend((0..pairs).map(CardIdentity::Pair));
    }
    cards.push(CardIdentity::Joker);
    Ok(cards)
}

/// Uniform shuffle of the deck, one identity per board cell. Takes any
/// random source so tests can inject a seeded generator.
pub fn shuffled_placement<R: rand::Rng + ?Sized>(
    mut cards: Vec<CardIdentity>,
    rng: &mut R,
) -> Vec<CardIdentity> {
    use rand::seq::SliceRandom;

    cards.shuffle(rng);
    cards
}

pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<CardLayout>;
}

/// Deals a fresh board from a seed: build the deck, shuffle it with a
/// `SmallRng`, validate it against the board shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShuffledLayoutGenerator {
    seed: u64,
}

impl ShuffledLayoutGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for ShuffledLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<CardLayout> {
        use rand::prelude::*;

        let cards = build_deck(config.pairs)?;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let cards = shuffled_placement(cards, &mut rng);

        log::debug!(
            "Dealt {} cards ({} pairs) with seed {}",
            cards.len(),
            config.pairs,
            self.seed
        );
        CardLayout::from_cards(config.size, cards)
    }
}

/// Immutable mapping from board cell to card identity, fixed at deal time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardLayout {
    cards: Array2<CardIdentity>,
    pairs: CellCount,
}

impl CardLayout {
    /// Validates the shape constraint and the deck multiset before any
    /// session starts: `x * y == cards.len()`, every pair value present
    /// exactly twice, exactly one joker.
    pub fn from_cards(size: Coord2, cards: Vec<CardIdentity>) -> Result<Self> {
        let total = mult(size.0, size.1);
        if usize::from(total) != cards.len() {
            return Err(GameError::BoardSizeMismatch);
        }
        if total % 2 == 0 {
            return Err(GameError::MalformedDeck);
        }
        let pairs = total / 2;
        if pairs < 1 {
            return Err(GameError::NoPairs);
        }

        let mut seen: Vec<CellCount> = vec![0; usize::from(pairs)];
        let mut jokers: CellCount = 0;
        for &card in &cards {
            match card {
                CardIdentity::Pair(value) if value < pairs => {
                    seen[usize::from(value)] += 1;
                }
                CardIdentity::Pair(_) => return Err(GameError::MalformedDeck),
                CardIdentity::Joker => jokers += 1,
            }
        }
        if jokers != 1 || seen.iter().any(|&count| count != 2) {
            return Err(GameError::MalformedDeck);
        }

        let cards = Array2::from_shape_vec((usize::from(size.0), usize::from(size.1)), cards)
            .map_err(|_| GameError::BoardSizeMismatch)?;
        Ok(Self { cards, pairs })
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cards.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.cards.len() as CellCount
    }

    pub fn pair_count(&self) -> CellCount {
        self.pairs
    }

    pub fn identity_at(&self, coords: Coord2) -> CardIdentity {
        self[coords]
    }

    pub fn is_joker_at(&self, coords: Coord2) -> bool {
        self[coords].is_joker()
    }

    pub fn joker_position(&self) -> Coord2 {
        self.cards
            .indexed_iter()
            .find(|(_, card)| card.is_joker())
            .map(|((x, y), _)| (x as Coord, y as Coord))
            .unwrap_or_default()
    }
}

impl Index<Coord2> for CardLayout {
    type Output = CardIdentity;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cards[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn build_deck_holds_each_value_twice_plus_one_joker() {
        let cards = build_deck(12).unwrap();

        assert_eq!(cards.len(), 25);
        for value in 0..12 {
            let count = cards
                .iter()
                .filter(|&&card| card == CardIdentity::Pair(value))
                .count();
            assert_eq!(count, 2, "pair value {value}");
        }
        assert_eq!(cards.iter().filter(|card| card.is_joker()).count(), 1);
    }

    #[test]
    fn build_deck_rejects_zero_pairs() {
        assert_eq!(build_deck(0), Err(GameError::NoPairs));
    }

    #[test]
    fn shuffled_placement_is_a_permutation_of_the_deck() {
        let cards = build_deck(12).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);

        let mut shuffled = shuffled_placement(cards.clone(), &mut rng);

        let mut expected = cards;
        shuffled.sort_by_key(sort_key);
        expected.sort_by_key(sort_key);
        assert_eq!(shuffled, expected);
    }

    #[test]
    fn same_seed_deals_the_same_layout() {
        let config = GameConfig::classic();

        let first = ShuffledLayoutGenerator::new(42).generate(config).unwrap();
        let second = ShuffledLayoutGenerator::new(42).generate(config).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn from_cards_rejects_wrong_board_shape() {
        let cards = build_deck(2).unwrap();

        // 5 cards cannot fill a 2x3 board
        let result = CardLayout::from_cards((2, 3), cards);

        assert_eq!(result.unwrap_err(), GameError::BoardSizeMismatch);
    }

    #[test]
    fn from_cards_rejects_duplicate_jokers() {
        let mut cards = build_deck(2).unwrap();
        cards[0] = CardIdentity::Joker;

        let result = CardLayout::from_cards((5, 1), cards);

        assert_eq!(result.unwrap_err(), GameError::MalformedDeck);
    }

    #[test]
    fn from_cards_rejects_unbalanced_pairs() {
        use CardIdentity::*;
        let cards = vec![Pair(0), Pair(0), Pair(0), Pair(1), Joker];

        let result = CardLayout::from_cards((5, 1), cards);

        assert_eq!(result.unwrap_err(), GameError::MalformedDeck);
    }

    #[test]
    fn layout_exposes_shape_and_joker_position() {
        use CardIdentity::*;
        let cards = vec![Pair(0), Pair(1), Joker, Pair(1), Pair(0)];

        let layout = CardLayout::from_cards((5, 1), cards).unwrap();

        assert_eq!(layout.size(), (5, 1));
        assert_eq!(layout.total_cells(), 5);
        assert_eq!(layout.pair_count(), 2);
        assert_eq!(layout.joker_position(), (2, 0));
        assert!(layout.is_joker_at((2, 0)));
        assert_eq!(layout.identity_at((4, 0)), Pair(0));
        assert_eq!(layout.validate_coords((5, 0)), Err(GameError::InvalidCoords));
    }

    fn sort_key(card: &CardIdentity) -> PairId {
        match *card {
            CardIdentity::Pair(value) => value,
            CardIdentity::Joker => PairId::MAX,
        }
    }
}
