use async_trait::async_trait;
use pazaak_rs::agents::{InProcessAgent, MoveError, MoveProvider, RendezvousAgent};
use pazaak_rs::config::MatchConfig;
use pazaak_rs::engine::{MatchEngine, RoundOutcome};
use pazaak_rs::game::{GameView, Move};
use pazaak_rs::sidedeck::FixedSideDecks;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const ONES: &str = "+1,+1,+1,+1,+1,+1,+1,+1,+1,+1";

fn ones() -> FixedSideDecks {
    FixedSideDecks([ONES.to_string(), ONES.to_string()])
}

fn stand_at(threshold: i32) -> Arc<dyn MoveProvider> {
    Arc::new(InProcessAgent::new(format!("stand{threshold}"), move |v: &GameView| {
        Move::default().with_stand(v.current_player.board_value >= threshold)
    }))
}

fn idle() -> Arc<dyn MoveProvider> {
    Arc::new(InProcessAgent::new("idle", |_: &GameView| Move::default()))
}

/// Records every view it is shown and checks the opponent's cards stay hidden.
struct Watcher {
    seen: AtomicUsize,
}

impl fmt::Display for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("watcher")
    }
}

#[async_trait]
impl MoveProvider for Watcher {
    async fn request_move(&self, view: &GameView) -> Result<Move, MoveError> {
        assert!(view.opponent.hand.is_empty());
        assert!(view.opponent.initial_hand.is_empty());
        assert_eq!(view.current_player.hand.len(), 4);
        assert!(view.winner.is_none());
        self.seen.fetch_add(1, Ordering::SeqCst);
        Ok(Move::default().with_stand(view.current_player.board_value >= 16))
    }
}

#[tokio::test]
async fn full_match_with_plus_one_side_decks() {
    let cfg = MatchConfig::default().with_round_limit(3).with_seed(42);
    let mut engine = MatchEngine::new(vec![stand_at(17), stand_at(15)], &mut ones(), cfg).unwrap();
    let outcome = engine.run().await.unwrap();

    assert!(outcome.winner == 1 || outcome.winner == 2);
    let loser = 3 - outcome.winner;
    assert_eq!(engine.player(outcome.winner).unwrap().round_wins(), 3);
    assert!(engine.player(loser).unwrap().round_wins() < 3);
    assert!(engine.player(outcome.winner).unwrap().is_winner());
    assert!(engine.rounds() >= 3);
    assert_eq!(outcome.rounds, engine.rounds());

    assert_eq!(outcome.seats.len(), 2);
    assert_eq!(outcome.seats[0].number, 1);
    for seat in &outcome.seats {
        assert_eq!(seat.initial_hand, vec!["+1"; 4]);
        assert_eq!(seat.winner, seat.number == outcome.winner);
    }
    let final_winner = outcome.final_view.winner.as_ref().unwrap();
    assert_eq!(final_winner.number, outcome.winner);
    assert!(final_winner.winner);
}

#[tokio::test]
async fn same_seed_replays_the_same_match() {
    let run = || async {
        let cfg = MatchConfig::default().with_seed(9);
        let mut engine =
            MatchEngine::new(vec![stand_at(16), stand_at(18)], &mut ones(), cfg).unwrap();
        let outcome = engine.run().await.unwrap();
        (outcome.winner, outcome.rounds)
    };
    assert_eq!(run().await, run().await);
}

#[tokio::test]
async fn rigged_twenty_auto_stands_player_one() {
    let cfg = MatchConfig::default().with_forced_p1_value(20).with_seed(3);
    let mut engine = MatchEngine::new(vec![idle(), idle()], &mut ones(), cfg).unwrap();
    let outcome = engine.play_round().await.unwrap();

    let p1 = engine.player(1).unwrap();
    assert_eq!(p1.board_value(), 20);
    assert!(p1.is_standing());
    assert_eq!(p1.hand().len(), 4);
    assert!(matches!(
        outcome,
        RoundOutcome::Bust { busted: 2, winner: 1 } | RoundOutcome::Push { value: 20 }
    ));
}

#[tokio::test]
async fn views_never_reveal_the_opponent_hand() {
    let watcher = Arc::new(Watcher { seen: AtomicUsize::new(0) });
    let cfg = MatchConfig::default().with_round_limit(2).with_seed(5);
    let agents: Vec<Arc<dyn MoveProvider>> = vec![watcher.clone() as Arc<dyn MoveProvider>, stand_at(17)];
    let mut engine = MatchEngine::new(agents, &mut ones(), cfg).unwrap();
    engine.run().await.unwrap();
    assert!(watcher.seen.load(Ordering::SeqCst) > 0);
}

#[tokio::test]
async fn silent_human_only_draws() {
    let human = Arc::new(RendezvousAgent::new("human").with_deadline(Duration::from_millis(10)));
    let agents: Vec<Arc<dyn MoveProvider>> = vec![stand_at(14), human.clone() as Arc<dyn MoveProvider>];
    let cfg = MatchConfig::default().with_seed(11);
    let mut engine = MatchEngine::new(agents, &mut ones(), cfg).unwrap();
    engine.play_round().await.unwrap();

    let p2 = engine.player(2).unwrap();
    assert_eq!(p2.hand().len(), 4);
    assert!(!p2.board().is_empty());
    assert!(p2.board().as_slice().iter().all(|c| c.identifier().parse::<u8>().is_ok()));
    assert!(!human.is_waiting());
    assert!(human.published().is_some());
}
