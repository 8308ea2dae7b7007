// Match engine: seats two move providers, deals side decks and hands, then runs
// rounds until one player reaches the configured number of round wins. Turns are
// strictly sequential; the only waiting happens inside `MoveProvider::request_move`,
// which is bounded by the provider's own deadline.

use crate::agents::MoveProvider;
use crate::config::{ConfigError, MatchConfig};
use crate::deck::{shuffle, Deck, DeckError};
use crate::game::{GameView, Player};
use crate::sidedeck::SideDeckSource;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::io;
use std::sync::Arc;

/// Players per match.
pub const PLAYER_COUNT: usize = 2;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SetupError {
    #[error("player count should be 2, got {0}")]
    PlayerCount(usize),
    #[error("player {seat}: {source}")]
    Deck {
        seat: usize,
        #[source]
        source: DeckError,
    },
    #[error("reading side decks: {0}")]
    Source(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Broken invariants. These abort the match.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MatchError {
    #[error("player {seat} tried to draw from an empty deck")]
    DeckExhausted { seat: usize },
    #[error("player {seat}: {source}")]
    Rig {
        seat: usize,
        #[source]
        source: DeckError,
    },
}

/// How a round ended. Seats are 1-based player numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundOutcome {
    Bust { busted: usize, winner: usize },
    Won { winner: usize, value: i32 },
    Push { value: i32 },
}

impl RoundOutcome {
    pub fn winner(&self) -> Option<usize> {
        match *self {
            RoundOutcome::Bust { winner, .. } | RoundOutcome::Won { winner, .. } => Some(winner),
            RoundOutcome::Push { .. } => None,
        }
    }
}

/// What statistics need to know about one seat after the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatRecord {
    pub number: usize,
    pub initial_hand: Vec<String>,
    pub winner: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Seat number of the winner; also the process exit status.
    pub winner: usize,
    pub rounds: u32,
    pub seats: Vec<SeatRecord>,
    pub final_view: GameView,
}

#[derive(Debug)]
pub struct MatchEngine {
    players: Vec<Player>,
    config: MatchConfig,
    rng: ChaCha8Rng,
    rounds: u32,
}

impl MatchEngine {
    /// Seat the agents in order (seat 1 first), deal side decks and hands, and pick the
    /// opening player at random.
    pub fn new(
        agents: Vec<Arc<dyn MoveProvider>>,
        source: &mut dyn SideDeckSource,
        config: MatchConfig,
    ) -> Result<Self, SetupError> {
        if agents.len() != PLAYER_COUNT {
            return Err(SetupError::PlayerCount(agents.len()));
        }
        config.validate()?;
        let mut rng = config.rng();
        let specs = source.side_decks()?;
        let mut players = Vec::with_capacity(PLAYER_COUNT);
        for (i, (agent, spec)) in agents.into_iter().zip(specs.iter()).enumerate() {
            let seat = i + 1;
            let mut side_deck =
                spec.resolve(&mut rng).map_err(|source| SetupError::Deck { seat, source })?;
            shuffle(&mut side_deck, &mut rng);
            players.push(Player::new(seat, agent, side_deck));
        }
        let mut engine = Self { players, config, rng, rounds: 0 };
        let first = engine.rng.random_range(0..PLAYER_COUNT);
        engine.rotate_to_front(first);
        Ok(engine)
    }

    /// Players in current turn order; index 0 opens the next round.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, number: usize) -> Option<&Player> {
        self.players.iter().find(|p| p.number == number)
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// The view sent to the player at `idx`: own record in full, opponent's hand hidden.
    pub fn view_for(&self, idx: usize) -> GameView {
        let opponent = (idx + 1) % self.players.len();
        GameView {
            current_player: self.players[idx].view(false),
            opponent: self.players[opponent].view(true),
            winner: None,
        }
    }

    /// Play rounds until someone reaches the round limit.
    pub async fn run(&mut self) -> Result<MatchOutcome, MatchError> {
        let winner_idx = loop {
            let outcome = self.play_round().await?;
            self.rounds += 1;
            log::info!("Round {} over: {:?}", self.rounds, outcome);
            let limit = self.config.round_limit;
            if let Some(idx) = self.players.iter().position(|p| p.round_wins >= limit) {
                break idx;
            }
        };
        self.players[winner_idx].winner = true;
        let final_view =
            GameView { winner: Some(self.players[winner_idx].view(false)), ..GameView::default() };
        for p in &self.players {
            p.agent.notify(&final_view).await;
        }
        log::info!("Player {} WINS", self.players[winner_idx]);

        let mut seats: Vec<SeatRecord> = self
            .players
            .iter()
            .map(|p| SeatRecord {
                number: p.number,
                initial_hand: p.initial_hand.iter().map(|c| c.identifier().to_string()).collect(),
                winner: p.winner,
            })
            .collect();
        seats.sort_by_key(|s| s.number);
        Ok(MatchOutcome {
            winner: self.players[winner_idx].number,
            rounds: self.rounds,
            seats,
            final_view,
        })
    }

    /// Deal fresh decks and run turns until the round resolves.
    pub async fn play_round(&mut self) -> Result<RoundOutcome, MatchError> {
        self.start_round()?;
        log::info!("--- NEW ROUND --- Player {} is first player!", self.players[0]);
        loop {
            for idx in 0..self.players.len() {
                self.take_turn(idx).await?;
                if let Some(outcome) = self.settle(idx) {
                    return Ok(outcome);
                }
            }
        }
    }

    fn start_round(&mut self) -> Result<(), MatchError> {
        let forced = self.config.force_p1_value;
        for p in &mut self.players {
            let deck = match forced {
                Some(target) if p.number == 1 => Deck::rigged(target, &mut self.rng)
                    .map_err(|source| MatchError::Rig { seat: p.number, source })?,
                _ => Deck::shuffled(&mut self.rng),
            };
            p.reset_round(deck);
        }
        Ok(())
    }

    /// One turn for the player at `idx`: draw, ask for a move, apply what is legal.
    async fn take_turn(&mut self, idx: usize) -> Result<(), MatchError> {
        if !self.players[idx].stand {
            let seat = self.players[idx].number;
            self.players[idx].draw_card().ok_or(MatchError::DeckExhausted { seat })?;
            let view = self.view_for(idx);
            let agent = Arc::clone(&self.players[idx].agent);
            let p = &mut self.players[idx];
            match agent.request_move(&view).await {
                Err(e) => log::info!("Player {} ({:?}) move error: {}", p, agent.kind(), e),
                Ok(m) => {
                    if let Some(card) = m.card() {
                        p.play_hand_card(card, m.flip_card);
                    }
                    if m.stand {
                        log::info!("Player {} STANDS", p);
                        p.stand = true;
                    }
                }
            }
        }
        let p = &mut self.players[idx];
        if !p.stand && p.at_ceiling() {
            log::info!("Player {} AUTO STANDS", p);
            p.stand = true;
        }
        if !p.stand {
            log::info!("Player {} CONTINUES", p);
        }
        Ok(())
    }

    /// Check whether the turn just taken at `idx` ends the round, crediting the winner.
    fn settle(&mut self, idx: usize) -> Option<RoundOutcome> {
        let opponent = (idx + 1) % self.players.len();
        let (p, o) = (&self.players[idx], &self.players[opponent]);
        if p.board.is_bust() {
            log::info!("Player {} busted, opponent scores", p);
            let outcome = RoundOutcome::Bust { busted: p.number, winner: o.number };
            self.credit(opponent);
            return Some(outcome);
        }
        if !(p.stand && o.stand) {
            return None;
        }
        if p.board.value() == o.board.value() {
            log::info!("Round is a push at {}", p.board.value());
            return Some(RoundOutcome::Push { value: p.board.value() });
        }
        let winner = if p.board.value() > o.board.value() { idx } else { opponent };
        let outcome = RoundOutcome::Won {
            winner: self.players[winner].number,
            value: self.players[winner].board.value(),
        };
        self.credit(winner);
        Some(outcome)
    }

    fn credit(&mut self, idx: usize) {
        self.players[idx].round_wins += 1;
        self.rotate_to_front(idx);
    }

    /// Move the player at `idx` to the front, keeping everyone else's relative order.
    fn rotate_to_front(&mut self, idx: usize) {
        self.players.rotate_left(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::InProcessAgent;
    use crate::cards::Card;
    use crate::game::Move;
    use crate::sidedeck::FixedSideDecks;

    const ONES: &str = "+1,+1,+1,+1,+1,+1,+1,+1,+1,+1";

    fn agent(f: fn(&GameView) -> Move) -> Arc<dyn MoveProvider> {
        Arc::new(InProcessAgent::new("scripted", f))
    }

    fn engine(a: fn(&GameView) -> Move, b: fn(&GameView) -> Move) -> MatchEngine {
        let mut decks = FixedSideDecks([ONES.to_string(), ONES.to_string()]);
        let cfg = MatchConfig::default().with_seed(7);
        MatchEngine::new(vec![agent(a), agent(b)], &mut decks, cfg).unwrap()
    }

    fn deck(values: &[i32]) -> Deck {
        Deck::from_cards(values.iter().map(|&v| Card::main(v)))
    }

    fn set_board(e: &mut MatchEngine, idx: usize, values: &[i32], stand: bool) {
        let p = &mut e.players[idx];
        p.board.clear();
        for &v in values {
            p.board.push(Card::main(v));
        }
        p.stand = stand;
    }

    fn idle(_: &GameView) -> Move {
        Move::default()
    }

    #[test]
    fn wrong_player_count_is_rejected() {
        let mut decks = FixedSideDecks([ONES.to_string(), ONES.to_string()]);
        let err = MatchEngine::new(vec![agent(idle)], &mut decks, MatchConfig::default())
            .unwrap_err();
        assert!(matches!(err, SetupError::PlayerCount(1)));
    }

    #[test]
    fn bad_side_deck_names_the_seat() {
        let mut decks = FixedSideDecks([ONES.to_string(), "+1,+9".to_string()]);
        let err = MatchEngine::new(vec![agent(idle), agent(idle)], &mut decks, MatchConfig::default())
            .unwrap_err();
        assert!(matches!(err, SetupError::Deck { seat: 2, .. }));
    }

    #[test]
    fn setup_deals_four_card_hands() {
        let e = engine(idle, idle);
        for p in e.players() {
            assert_eq!(p.hand().len(), 4);
            assert_eq!(p.side_deck().len(), 10);
            assert_eq!(p.round_wins(), 0);
        }
        let mut numbers: Vec<usize> = e.players().iter().map(|p| p.number()).collect();
        numbers.sort();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn bust_credits_opponent_and_moves_it_first() {
        let mut e = engine(idle, idle);
        set_board(&mut e, 0, &[10, 9, 5], false);
        set_board(&mut e, 1, &[4], false);
        let (busted, other) = (e.players[0].number, e.players[1].number);
        let outcome = e.settle(0).unwrap();
        assert_eq!(outcome, RoundOutcome::Bust { busted, winner: other });
        assert_eq!(e.players[0].number, other);
        assert_eq!(e.players[0].round_wins, 1);
        assert_eq!(e.players[1].round_wins, 0);
    }

    #[test]
    fn twenty_is_not_a_bust() {
        let mut e = engine(idle, idle);
        set_board(&mut e, 0, &[10, 10], false);
        set_board(&mut e, 1, &[4], false);
        assert_eq!(e.settle(0), None);
        set_board(&mut e, 0, &[10, 10, 1], false);
        assert!(matches!(e.settle(0), Some(RoundOutcome::Bust { .. })));
    }

    #[test]
    fn bust_ends_round_even_when_opponent_is_standing_higher() {
        let mut e = engine(idle, idle);
        set_board(&mut e, 0, &[10, 10], true);
        set_board(&mut e, 1, &[10, 10, 1], true);
        let outcome = e.settle(1).unwrap();
        assert!(matches!(outcome, RoundOutcome::Bust { .. }));
    }

    #[test]
    fn push_keeps_order_and_scores() {
        let mut e = engine(idle, idle);
        set_board(&mut e, 0, &[10, 8], true);
        set_board(&mut e, 1, &[9, 9], true);
        let first = e.players[0].number;
        assert_eq!(e.settle(1), Some(RoundOutcome::Push { value: 18 }));
        assert_eq!(e.players[0].number, first);
        assert!(e.players.iter().all(|p| p.round_wins == 0));
    }

    #[test]
    fn higher_standing_value_wins_round() {
        let mut e = engine(idle, idle);
        set_board(&mut e, 0, &[10, 6], true);
        set_board(&mut e, 1, &[10, 8], true);
        let second = e.players[1].number;
        let outcome = e.settle(0).unwrap();
        assert_eq!(outcome, RoundOutcome::Won { winner: second, value: 18 });
        assert_eq!(e.players[0].number, second);
        assert_eq!(e.players[0].round_wins, 1);
        assert_eq!(e.players[1].round_wins, 0);
    }

    #[test]
    fn round_continues_while_one_player_plays() {
        let mut e = engine(idle, idle);
        set_board(&mut e, 0, &[10, 5], true);
        set_board(&mut e, 1, &[7], false);
        assert_eq!(e.settle(1), None);
        assert_eq!(e.settle(0), None);
    }

    #[tokio::test]
    async fn reaching_twenty_forces_a_stand() {
        let mut e = engine(idle, idle);
        e.players[0].reset_round(deck(&[10, 10, 5]));
        e.take_turn(0).await.unwrap();
        assert!(!e.players[0].stand);
        e.take_turn(0).await.unwrap();
        assert_eq!(e.players[0].board_value(), 20);
        assert!(e.players[0].stand);
        // a standing player does not draw again
        e.take_turn(0).await.unwrap();
        assert_eq!(e.players[0].deck().len(), 1);
    }

    #[tokio::test]
    async fn played_card_and_stand_are_applied() {
        fn play_and_stand(v: &GameView) -> Move {
            let card = v.current_player.hand[0].identifier().to_string();
            Move::play(card, false).with_stand(true)
        }
        let mut e = engine(play_and_stand, play_and_stand);
        e.players[0].reset_round(deck(&[9]));
        e.take_turn(0).await.unwrap();
        let p = &e.players[0];
        assert_eq!(p.board_value(), 10);
        assert_eq!(p.hand().len(), 3);
        assert!(p.stand);
    }

    #[tokio::test]
    async fn empty_deck_is_fatal() {
        let mut e = engine(idle, idle);
        e.players[0].reset_round(deck(&[]));
        let seat = e.players[0].number;
        assert_eq!(e.take_turn(0).await, Err(MatchError::DeckExhausted { seat }));
    }

    #[tokio::test]
    async fn view_hides_opponent_hand() {
        fn check(v: &GameView) -> Move {
            assert_eq!(v.current_player.hand.len(), 4);
            assert!(v.opponent.hand.is_empty());
            assert_eq!(v.current_player.board.len(), 1);
            Move::default()
        }
        let mut e = engine(check, check);
        e.start_round().unwrap();
        e.take_turn(0).await.unwrap();
    }

    #[tokio::test]
    async fn forced_value_rigs_player_one() {
        let mut decks = FixedSideDecks([ONES.to_string(), ONES.to_string()]);
        let cfg = MatchConfig::default().with_seed(3).with_forced_p1_value(19);
        let mut e = MatchEngine::new(vec![agent(idle), agent(idle)], &mut decks, cfg).unwrap();
        e.start_round().unwrap();
        let p1 = e.player(1).unwrap();
        let prefix: Vec<i32> = p1.deck().iter().take(2).map(Card::value).collect();
        assert_eq!(prefix, vec![10, 9]);
    }

    #[tokio::test]
    async fn match_ends_at_round_limit() {
        fn stand17(v: &GameView) -> Move {
            Move::default().with_stand(v.current_player.board_value >= 17)
        }
        let mut e = engine(stand17, stand17);
        let outcome = e.run().await.unwrap();
        assert!(outcome.winner == 1 || outcome.winner == 2);
        let w = e.player(outcome.winner).unwrap();
        assert_eq!(w.round_wins(), 3);
        assert!(w.is_winner());
        assert!(outcome.rounds >= 3);
        assert_eq!(outcome.seats.len(), 2);
        assert_eq!(outcome.seats.iter().filter(|s| s.winner).count(), 1);
        assert_eq!(outcome.final_view.winner.as_ref().map(|w| w.number), Some(outcome.winner));
        assert_eq!(outcome.seats[0].initial_hand, vec!["+1"; 4]);
    }
}
