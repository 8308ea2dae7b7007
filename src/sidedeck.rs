//! Where the players' side decks come from.

use crate::cards::Card;
use crate::deck::{build_side_deck, validate_side_deck, DeckError, SidePool};
use rand::Rng;
use std::convert::Infallible;
use std::io::{self, BufRead};
use std::str::FromStr;

pub const AUTO_SIDEDECK: &str = "auto";
pub const SIMPLE_SIDEDECK: &str = "auto-simple";
pub const FLIP_SIDEDECK: &str = "auto-flip";

/// A player's side-deck choice: generate one, or use the listed cards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SideDeckSpec {
    Auto(SidePool),
    Cards(Vec<String>),
}

impl FromStr for SideDeckSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        Ok(match t {
            AUTO_SIDEDECK => SideDeckSpec::Auto(SidePool::All),
            SIMPLE_SIDEDECK => SideDeckSpec::Auto(SidePool::Simple),
            FLIP_SIDEDECK => SideDeckSpec::Auto(SidePool::Flip),
            _ => SideDeckSpec::Cards(t.split(',').map(|c| c.trim().to_string()).collect()),
        })
    }
}

impl SideDeckSpec {
    /// Turn the choice into validated cards (not yet shuffled).
    ///
    /// ```
    /// use pazaak_rs::sidedeck::SideDeckSpec;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
    /// let spec: SideDeckSpec = "+1,+1,+1,+1,+1,+1,+1,+1,+1,+1".parse().unwrap();
    /// assert_eq!(spec.resolve(&mut rng).unwrap().len(), 10);
    /// let short: SideDeckSpec = "+1,+2".parse().unwrap();
    /// assert!(short.resolve(&mut rng).is_err());
    /// ```
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Card>, DeckError> {
        match self {
            SideDeckSpec::Auto(pool) => validate_side_deck(&build_side_deck(*pool, rng)),
            SideDeckSpec::Cards(ids) => validate_side_deck(ids),
        }
    }
}

/// Supplies both players' side-deck choices before a match.
pub trait SideDeckSource {
    fn side_decks(&mut self) -> io::Result<[SideDeckSpec; 2]>;
}

/// Both players get an automatically generated deck.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoSideDecks(pub SidePool);

impl SideDeckSource for AutoSideDecks {
    fn side_decks(&mut self) -> io::Result<[SideDeckSpec; 2]> {
        Ok([SideDeckSpec::Auto(self.0), SideDeckSpec::Auto(self.0)])
    }
}

/// Two choices given up front, e.g. on the command line.
#[derive(Debug, Clone)]
pub struct FixedSideDecks(pub [String; 2]);

impl SideDeckSource for FixedSideDecks {
    fn side_decks(&mut self) -> io::Result<[SideDeckSpec; 2]> {
        let [a, b] = &self.0;
        Ok([spec(a), spec(b)])
    }
}

/// One line per player, read from a buffered reader such as stdin.
#[derive(Debug)]
pub struct ReaderSideDecks<R> {
    reader: R,
}

impl<R: BufRead> ReaderSideDecks<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn line(&mut self) -> io::Result<String> {
        let mut s = String::new();
        self.reader.read_line(&mut s)?;
        Ok(s)
    }
}

impl<R: BufRead> SideDeckSource for ReaderSideDecks<R> {
    fn side_decks(&mut self) -> io::Result<[SideDeckSpec; 2]> {
        let first = self.line()?;
        let second = self.line()?;
        Ok([spec(&first), spec(&second)])
    }
}

fn spec(s: &str) -> SideDeckSpec {
    match s.parse() {
        Ok(spec) => spec,
        Err(never) => match never {},
    }
}
