use crate::agents::MoveProvider;
use crate::cards::{faces, Card};
use crate::deck::Deck;
use crate::hand::{Board, Hand, MAX_BOARD_VALUE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MoveValidationError {
    #[error("flip requested without a hand card")]
    FlipWithoutCard,
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum MoveDecodeError {
    #[error("malformed move: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid move: {0}")]
    Invalid(#[from] MoveValidationError),
}

/// What a player wants to do after drawing: optionally play a hand card, optionally stand.
///
/// Every field may be absent on the wire; the empty move just keeps the drawn card.
///
/// ```
/// use pazaak_rs::game::Move;
///
/// let m = Move::decode(br#"{"hand_card":"+-3","flip_card":true}"#).unwrap();
/// assert_eq!(m.card(), Some("+-3"));
/// assert!(m.flip_card);
/// assert!(!m.stand);
/// assert_eq!(Move::decode(b"{}").unwrap(), Move::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Move {
    pub hand_card: String,
    pub flip_card: bool,
    pub stand: bool,
}

impl Move {
    /// Stand without playing a card.
    pub fn standing() -> Self {
        Self { stand: true, ..Self::default() }
    }

    /// Play a hand card, flipped or not.
    pub fn play(identifier: impl Into<String>, flip: bool) -> Self {
        Self { hand_card: identifier.into(), flip_card: flip, stand: false }
    }

    pub fn with_stand(mut self, stand: bool) -> Self {
        self.stand = stand;
        self
    }

    /// The hand card to play, if any.
    pub fn card(&self) -> Option<&str> {
        let t = self.hand_card.trim();
        (!t.is_empty()).then_some(t)
    }

    pub fn validate(&self) -> Result<(), MoveValidationError> {
        if self.flip_card && self.card().is_none() {
            return Err(MoveValidationError::FlipWithoutCard);
        }
        Ok(())
    }

    /// Parse a JSON move document and run its validity check.
    pub fn decode(bytes: &[u8]) -> Result<Self, MoveDecodeError> {
        let m: Move = serde_json::from_slice(bytes)?;
        m.validate()?;
        Ok(m)
    }
}

/// Public record of one player as serialized to agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerView {
    pub number: usize,
    pub round_wins: u32,
    pub winner: bool,
    pub initial_hand: Vec<Card>,
    pub hand: Vec<Card>,
    pub board: Vec<Card>,
    pub board_value: i32,
    pub stand: bool,
}

/// The game as seen by the acting player. The opponent's cards in hand are never included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    #[serde(default)]
    pub current_player: PlayerView,
    #[serde(default)]
    pub opponent: PlayerView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerView>,
}

/// Result of trying to play a card from hand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Play {
    Played(Card),
    /// The card was played at face value because it cannot be flipped.
    FlipRefused(Card),
    NotInHand,
}

/// A seat at the table. The move provider is held by reference; the rest is game state.
pub struct Player {
    pub(crate) number: usize,
    pub(crate) agent: Arc<dyn MoveProvider>,
    pub(crate) side_deck: Vec<Card>,
    pub(crate) initial_hand: Vec<Card>,
    pub(crate) hand: Hand,
    pub(crate) round_wins: u32,
    pub(crate) winner: bool,
    // reset every round
    pub(crate) deck: Deck,
    pub(crate) board: Board,
    pub(crate) stand: bool,
}

impl Player {
    /// Seat a player with an already shuffled side deck and deal the hand from it.
    pub fn new(number: usize, agent: Arc<dyn MoveProvider>, side_deck: Vec<Card>) -> Self {
        let hand = Hand::deal(&side_deck);
        Self {
            number,
            agent,
            initial_hand: hand.as_slice().to_vec(),
            hand,
            side_deck,
            round_wins: 0,
            winner: false,
            deck: Deck::from_cards([]),
            board: Board::new(),
            stand: false,
        }
    }

    /// 1-based seat number, fixed for the whole match.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn agent(&self) -> &Arc<dyn MoveProvider> {
        &self.agent
    }

    pub fn side_deck(&self) -> &[Card] {
        &self.side_deck
    }

    pub fn initial_hand(&self) -> &[Card] {
        &self.initial_hand
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn round_wins(&self) -> u32 {
        self.round_wins
    }

    pub fn is_winner(&self) -> bool {
        self.winner
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_value(&self) -> i32 {
        self.board.value()
    }

    pub fn is_standing(&self) -> bool {
        self.stand
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub(crate) fn reset_round(&mut self, deck: Deck) {
        self.deck = deck;
        self.board.clear();
        self.stand = false;
    }

    /// Move the front card of the deck onto the board.
    pub(crate) fn draw_card(&mut self) -> Option<Card> {
        let card = self.deck.draw()?;
        log::info!("Player {} draws a {}", self, card);
        self.board.push(card.clone());
        Some(card)
    }

    pub(crate) fn play_hand_card(&mut self, identifier: &str, flip: bool) -> Play {
        let Some(card) = self.hand.take(identifier) else {
            log::info!(
                "Player {} requested to play card {}, but does not have it in hand",
                self,
                identifier
            );
            return Play::NotInHand;
        };
        let (placed, outcome) = if flip && !card.is_flippable() {
            log::info!(
                "Player {} requested to play card {} flipped, but card is not flippable",
                self,
                identifier
            );
            (card.clone(), Play::FlipRefused(card))
        } else {
            let card = if flip { card.flipped() } else { card };
            (card.clone(), Play::Played(card))
        };
        log::info!("Player {} plays hand card {} ({:+})", self, identifier, placed.value());
        self.board.push(placed);
        outcome
    }

    pub(crate) fn at_ceiling(&self) -> bool {
        self.board.value() == MAX_BOARD_VALUE
    }

    /// Public record; `redact` hides the cards this player holds.
    pub fn view(&self, redact: bool) -> PlayerView {
        PlayerView {
            number: self.number,
            round_wins: self.round_wins,
            winner: self.winner,
            initial_hand: if redact { Vec::new() } else { self.initial_hand.clone() },
            hand: if redact { Vec::new() } else { self.hand.as_slice().to_vec() },
            board: self.board.as_slice().to_vec(),
            board_value: self.board.value(),
            stand: self.stand,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) [{}] {}",
            self.number,
            self.agent,
            self.board.value(),
            faces(self.hand.as_slice())
        )
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("number", &self.number)
            .field("agent", &self.agent.to_string())
            .field("hand", &self.hand)
            .field("round_wins", &self.round_wins)
            .field("winner", &self.winner)
            .field("board", &self.board)
            .field("stand", &self.stand)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::InProcessAgent;
    use crate::cards::parse_cards;

    fn player(side: &str) -> Player {
        let agent = Arc::new(InProcessAgent::new("test", |_: &GameView| Move::default()));
        Player::new(1, agent, parse_cards(side).unwrap())
    }

    #[test]
    fn new_player_deals_first_four() {
        let p = player("+1,+2,+-3,-4,+5,+6,-1,-2,-3,-5");
        assert_eq!(faces(p.hand().as_slice()), "{+1 +2 +-3 -4}");
        assert_eq!(p.initial_hand(), p.hand().as_slice());
        assert_eq!(p.side_deck().len(), 10);
    }

    #[test]
    fn flip_inverts_flippable_card() {
        let mut p = player("+1,+2,+-3,-4,+5,+6,-1,-2,-3,-5");
        p.board.push(Card::main(10));
        assert!(matches!(p.play_hand_card("+-3", true), Play::Played(_)));
        assert_eq!(p.board_value(), 7);
        assert!(!p.hand().contains("+-3"));
        assert_eq!(p.initial_hand().len(), 4);
    }

    #[test]
    fn refused_flip_still_plays_card() {
        let mut p = player("+1,+2,+-3,-4,+5,+6,-1,-2,-3,-5");
        assert!(matches!(p.play_hand_card("+2", true), Play::FlipRefused(_)));
        assert_eq!(p.board_value(), 2);
        assert_eq!(p.hand().len(), 3);
    }

    #[test]
    fn unknown_card_is_noop() {
        let mut p = player("+1,+2,+-3,-4,+5,+6,-1,-2,-3,-5");
        assert_eq!(p.play_hand_card("+6", false), Play::NotInHand);
        assert_eq!(p.hand().len(), 4);
        assert!(p.board().is_empty());
    }

    #[test]
    fn redacted_view_hides_hand() {
        let p = player("+1,+2,+-3,-4,+5,+6,-1,-2,-3,-5");
        let v = p.view(true);
        assert!(v.hand.is_empty());
        assert!(v.initial_hand.is_empty());
        assert_eq!(p.view(false).hand.len(), 4);
    }

    #[test]
    fn move_validity() {
        assert!(Move::default().validate().is_ok());
        assert!(Move::play("+1", false).validate().is_ok());
        let bad = Move { flip_card: true, ..Move::default() };
        assert_eq!(bad.validate(), Err(MoveValidationError::FlipWithoutCard));
        assert!(matches!(Move::decode(b"not json"), Err(MoveDecodeError::Json(_))));
        assert!(matches!(
            Move::decode(br#"{"flip_card":true}"#),
            Err(MoveDecodeError::Invalid(_))
        ));
    }

    #[test]
    fn view_json_has_winner_only_when_set() {
        let v = GameView::default();
        let s = serde_json::to_string(&v).unwrap();
        assert!(s.contains("\"current_player\""));
        assert!(!s.contains("\"winner\":{"));
        let back: GameView = serde_json::from_str(&s).unwrap();
        assert_eq!(back, v);
    }
}
