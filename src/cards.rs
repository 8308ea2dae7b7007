use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One entry of the side-deck catalog: face, value, and whether the sign may be inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub identifier: &'static str,
    pub value: i32,
    pub flip: bool,
}

const fn entry(identifier: &'static str, value: i32, flip: bool) -> CatalogEntry {
    CatalogEntry { identifier, value, flip }
}

/// Every card a side deck may contain. Order is fixed so seeded deck generation is reproducible.
pub const CATALOG: [CatalogEntry; 18] = [
    entry("+1", 1, false),
    entry("+2", 2, false),
    entry("+3", 3, false),
    entry("+4", 4, false),
    entry("+5", 5, false),
    entry("+6", 6, false),
    entry("-1", -1, false),
    entry("-2", -2, false),
    entry("-3", -3, false),
    entry("-4", -4, false),
    entry("-5", -5, false),
    entry("-6", -6, false),
    entry("+-1", 1, true),
    entry("+-2", 2, true),
    entry("+-3", 3, true),
    entry("+-4", 4, true),
    entry("+-5", 5, true),
    entry("+-6", 6, true),
];

/// Look up a catalog entry by its face, ignoring surrounding whitespace.
pub fn lookup(identifier: &str) -> Option<&'static CatalogEntry> {
    let t = identifier.trim();
    CATALOG.iter().find(|e| e.identifier == t)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    #[error("unknown card '{0}'")]
    Unknown(String),
}

/// A Pazaak card: a face plus a signed value.
///
/// Side-deck cards come from [`CATALOG`]; main-deck cards carry the faces "1" to "10".
///
/// ```
/// use pazaak_rs::cards::Card;
///
/// let card: Card = "+-3".parse().unwrap();
/// assert!(card.is_flippable());
/// assert_eq!(card.flipped().value(), -3);
/// assert_eq!(card.flipped().identifier(), "+-3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    identifier: String,
    value: i32,
    #[serde(default, skip_serializing_if = "is_false")]
    flip: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    special: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Card {
    /// A main-deck card of the given value.
    pub fn main(value: i32) -> Self {
        Self { identifier: value.to_string(), value, flip: false, special: false }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn is_flippable(&self) -> bool {
        self.flip
    }

    pub fn is_special(&self) -> bool {
        self.special
    }

    /// The same card with its sign inverted.
    pub fn flipped(&self) -> Self {
        Self { value: -self.value, ..self.clone() }
    }
}

impl From<&CatalogEntry> for Card {
    fn from(e: &CatalogEntry) -> Self {
        Self { identifier: e.identifier.to_string(), value: e.value, flip: e.flip, special: false }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s).map(Card::from).ok_or_else(|| CardError::Unknown(s.trim().to_string()))
    }
}

/// Parse a comma-separated list of side-deck cards.
///
/// ```
/// use pazaak_rs::cards::parse_cards;
///
/// let cards = parse_cards("+1, -2,+-3").unwrap();
/// assert_eq!(cards.len(), 3);
/// assert_eq!(cards[1].value(), -2);
/// ```
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardError> {
    input.split(',').map(Card::from_str).collect()
}

/// Render a list of cards as their faces, e.g. `{+1 -2}`.
pub fn faces(cards: &[Card]) -> String {
    let inner: Vec<&str> = cards.iter().map(Card::identifier).collect();
    format!("{{{}}}", inner.join(" "))
}
