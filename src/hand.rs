use crate::cards::Card;
use serde::{Deserialize, Serialize};

/// Cards dealt from the side deck at match start.
pub const HAND_SIZE: usize = 4;
/// A board value above this busts.
pub const MAX_BOARD_VALUE: i32 = 20;

const _: () = assert!(HAND_SIZE <= crate::deck::SIDE_DECK_SIZE);

/// The cards a player may still place on the board. Never replenished during a match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand(Vec<Card>);

impl Hand {
    /// Deal the first [`HAND_SIZE`] cards of an already shuffled side deck.
    ///
    /// ```
    /// use pazaak_rs::cards::parse_cards;
    /// use pazaak_rs::hand::Hand;
    ///
    /// let side = parse_cards("+1,+2,+3,+4,+5,+6,-1,-2,-3,-4").unwrap();
    /// let hand = Hand::deal(&side);
    /// assert_eq!(hand.len(), 4);
    /// assert_eq!(hand.as_slice()[3].identifier(), "+4");
    /// ```
    pub fn deal(side_deck: &[Card]) -> Self {
        Self(side_deck.iter().take(HAND_SIZE).cloned().collect())
    }

    pub fn new(cards: Vec<Card>) -> Self {
        Self(cards)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.0
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.0.iter().any(|c| c.identifier() == identifier)
    }

    /// Remove and return the first card with the given face.
    pub fn take(&mut self, identifier: &str) -> Option<Card> {
        let pos = self.0.iter().position(|c| c.identifier() == identifier)?;
        Some(self.0.remove(pos))
    }
}

/// Cards placed this round, with their running sum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
    value: i32,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a card; the value is updated together with the card list.
    pub fn push(&mut self, card: Card) {
        self.value += card.value();
        self.cards.push(card);
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_bust(&self) -> bool {
        self.value > MAX_BOARD_VALUE
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.value = 0;
    }
}
