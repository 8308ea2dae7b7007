use crate::cards::{Card, CardError, CATALOG};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// Cards in a side deck.
pub const SIDE_DECK_SIZE: usize = 10;
/// Copies of each value 1..=10 in the main deck.
pub const MAIN_DECK_COPIES: usize = 4;
/// Sum of every card in a fresh main deck.
pub const MAIN_DECK_TOTAL: i32 = 220;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("invalid side deck, expected {expected} cards, got {got}")]
    InvalidDeckSize { expected: usize, got: usize },
    #[error("unknown card '{0}'")]
    UnknownCard(String),
    #[error("cannot rig deck to {target}: no card fits the remaining {remaining}")]
    RigImpossible { target: i32, remaining: i32 },
}

impl From<CardError> for DeckError {
    fn from(e: CardError) -> Self {
        match e {
            CardError::Unknown(id) => DeckError::UnknownCard(id),
        }
    }
}

/// Shuffle any sequence in place (Fisher-Yates).
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// The 40-card deck a player draws from during one round. Cards are drawn from the front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// Unshuffled main deck: four copies of each value 1 through 10.
    ///
    /// ```
    /// use pazaak_rs::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 40);
    /// assert_eq!(deck.total(), 220);
    /// ```
    pub fn standard() -> Self {
        let mut cards = VecDeque::with_capacity(10 * MAIN_DECK_COPIES);
        for value in 1..=10 {
            for _ in 0..MAIN_DECK_COPIES {
                cards.push_back(Card::main(value));
            }
        }
        Self { cards }
    }

    /// A standard deck shuffled with the provided RNG.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_with(rng);
        deck
    }

    /// A shuffled deck whose front is reordered so that drawing it untouched drives the
    /// board to exactly `target`. The prefix is picked greedily, largest value first.
    ///
    /// ```
    /// use pazaak_rs::deck::Deck;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
    /// let mut deck = Deck::rigged(17, &mut rng).unwrap();
    /// assert_eq!(deck.draw().unwrap().value(), 10);
    /// assert_eq!(deck.draw().unwrap().value(), 7);
    /// ```
    pub fn rigged<R: Rng + ?Sized>(target: i32, rng: &mut R) -> Result<Self, DeckError> {
        let mut rest: Vec<Card> = Self::shuffled(rng).cards.into();
        let mut prefix = Vec::new();
        let mut remaining = target;
        while remaining > 0 {
            let pick = rest
                .iter()
                .enumerate()
                .filter(|(_, c)| c.value() <= remaining)
                .max_by_key(|(_, c)| c.value())
                .map(|(i, _)| i)
                .ok_or(DeckError::RigImpossible { target, remaining })?;
            let card = rest.remove(pick);
            remaining -= card.value();
            prefix.push(card);
        }
        prefix.extend(rest);
        Ok(Self::from_cards(prefix))
    }

    /// Build a deck with an explicit order; the first card is drawn first.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self { cards: cards.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Sum of the values still in the deck.
    pub fn total(&self) -> i32 {
        self.cards.iter().map(Card::value).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Reorder the remaining cards with the match generator.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    /// Draw one card from the front of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }
}

/// Which catalog cards automatic side-deck generation may pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SidePool {
    #[default]
    All,
    /// Only cards that cannot be flipped.
    Simple,
    /// Only flippable cards.
    Flip,
}

impl SidePool {
    fn admits(self, flip: bool) -> bool {
        match self {
            SidePool::All => true,
            SidePool::Simple => !flip,
            SidePool::Flip => flip,
        }
    }
}

/// Pick [`SIDE_DECK_SIZE`] catalog faces at random (with replacement) from `pool`.
pub fn build_side_deck<R: Rng + ?Sized>(pool: SidePool, rng: &mut R) -> Vec<&'static str> {
    let keys: Vec<&'static str> =
        CATALOG.iter().filter(|e| pool.admits(e.flip)).map(|e| e.identifier).collect();
    (0..SIDE_DECK_SIZE).map(|_| keys[rng.random_range(0..keys.len())]).collect()
}

/// Resolve a player's chosen side deck against the catalog.
///
/// ```
/// use pazaak_rs::deck::{validate_side_deck, DeckError};
///
/// let ok = validate_side_deck(&["+1"; 10]).unwrap();
/// assert_eq!(ok.len(), 10);
/// assert_eq!(
///     validate_side_deck(&["+1"; 3]),
///     Err(DeckError::InvalidDeckSize { expected: 10, got: 3 })
/// );
/// ```
pub fn validate_side_deck<S: AsRef<str>>(ids: &[S]) -> Result<Vec<Card>, DeckError> {
    if ids.len() != SIDE_DECK_SIZE {
        return Err(DeckError::InvalidDeckSize { expected: SIDE_DECK_SIZE, got: ids.len() });
    }
    ids.iter().map(|id| id.as_ref().parse::<Card>().map_err(DeckError::from)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn standard_deck_has_four_of_each_value() {
        let d = Deck::standard();
        for v in 1..=10 {
            assert_eq!(d.iter().filter(|c| c.value() == v).count(), MAIN_DECK_COPIES);
        }
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let d1 = Deck::shuffled(&mut rng(42));
        let d2 = Deck::shuffled(&mut rng(42));
        assert_eq!(d1, d2);
        assert_ne!(d1, Deck::standard());
        assert_ne!(d1, Deck::shuffled(&mut rng(43)));
    }

    #[test]
    fn draw_takes_from_front() {
        let mut d = Deck::from_cards([Card::main(3), Card::main(9)]);
        assert_eq!(d.draw(), Some(Card::main(3)));
        assert_eq!(d.draw(), Some(Card::main(9)));
        assert_eq!(d.draw(), None);
        assert!(d.is_empty());
    }

    #[test]
    fn rigged_prefix_is_greedy() {
        let mut d = Deck::rigged(25, &mut rng(3)).unwrap();
        let prefix: Vec<i32> = (0..3).map(|_| d.draw().unwrap().value()).collect();
        assert_eq!(prefix, vec![10, 10, 5]);
        assert_eq!(d.len(), 37);
    }

    #[test]
    fn rigged_zero_is_plain_shuffle() {
        assert_eq!(Deck::rigged(0, &mut rng(9)).unwrap(), Deck::shuffled(&mut rng(9)));
    }

    #[test]
    fn rigged_beyond_deck_total_fails() {
        assert_eq!(
            Deck::rigged(MAIN_DECK_TOTAL + 1, &mut rng(1)),
            Err(DeckError::RigImpossible { target: 221, remaining: 1 })
        );
        let full = Deck::rigged(MAIN_DECK_TOTAL, &mut rng(1)).unwrap();
        assert_eq!(full.len(), 40);
    }

    #[test]
    fn build_side_deck_respects_pool() {
        let mut r = rng(5);
        let simple = build_side_deck(SidePool::Simple, &mut r);
        assert_eq!(simple.len(), SIDE_DECK_SIZE);
        assert!(simple.iter().all(|id| !id.starts_with("+-")));
        let flip = build_side_deck(SidePool::Flip, &mut r);
        assert!(flip.iter().all(|id| id.starts_with("+-")));
        assert!(validate_side_deck(&build_side_deck(SidePool::All, &mut r)).is_ok());
    }

    #[test]
    fn validate_reports_unknown_card() {
        let mut ids = vec!["+1"; 10];
        ids[4] = "+9";
        assert_eq!(validate_side_deck(&ids), Err(DeckError::UnknownCard("+9".into())));
    }
}
