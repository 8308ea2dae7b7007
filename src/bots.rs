//! Reference bots. Each is a pure function of the view, so the same logic runs
//! in-process or behind the `pazaak-bot` program.

use crate::config::DEFAULT_ROUND_LIMIT;
use crate::game::{GameView, Move};
use crate::hand::MAX_BOARD_VALUE;
use std::fmt;
use std::str::FromStr;

/// Built-in decision policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Strategy {
    /// Never plays a card; stands from 15 on, or once level with a standing opponent.
    #[default]
    Stand15,
    /// Uses the hand to land on a target value and stands there.
    Target,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StrategyParseError {
    #[error("unknown strategy: '{0}'")]
    Invalid(String),
}

impl FromStr for Strategy {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stand15" => Ok(Strategy::Stand15),
            "target" => Ok(Strategy::Target),
            _ => Err(StrategyParseError::Invalid(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Stand15 => f.write_str("stand15"),
            Strategy::Target => f.write_str("target"),
        }
    }
}

/// Configuration for a bot: its policy and the match's round limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotProfile {
    pub strategy: Strategy,
    pub round_limit: u32,
}

impl Default for BotProfile {
    fn default() -> Self {
        Self { strategy: Strategy::default(), round_limit: DEFAULT_ROUND_LIMIT }
    }
}

impl BotProfile {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy, ..Self::default() }
    }

    pub fn with_round_limit(mut self, round_limit: u32) -> Self {
        self.round_limit = round_limit;
        self
    }

    pub fn decide(&self, view: &GameView) -> Move {
        match self.strategy {
            Strategy::Stand15 => stand15(view),
            Strategy::Target => target(view, self.round_limit),
        }
    }
}

/// ```
/// use pazaak_rs::bots::stand15;
/// use pazaak_rs::game::GameView;
///
/// let mut view = GameView::default();
/// view.current_player.board_value = 15;
/// assert!(stand15(&view).stand);
/// ```
pub fn stand15(view: &GameView) -> Move {
    let me = &view.current_player;
    let opp = &view.opponent;
    let stand = me.board_value >= 15 || (opp.stand && me.board_value >= opp.board_value);
    Move::default().with_stand(stand)
}

fn lands(value: i32, target: i32) -> bool {
    value >= target && value <= MAX_BOARD_VALUE
}

/// First hand card (possibly flipped) that brings the board into `[target, 20]`.
fn find_card(view: &GameView, target: i32) -> Option<Move> {
    let bv = view.current_player.board_value;
    view.current_player.hand.iter().find_map(|c| {
        if lands(bv + c.value(), target) {
            Some(Move::play(c.identifier(), false))
        } else if c.is_flippable() && lands(bv - c.value(), target) {
            Some(Move::play(c.identifier(), true))
        } else {
            None
        }
    })
}

pub fn target(view: &GameView, round_limit: u32) -> Move {
    let me = &view.current_player;
    let opp = &view.opponent;
    let bv = me.board_value;

    let (mut goal, mut fallback) = (MAX_BOARD_VALUE, if me.hand.is_empty() { 17 } else { 19 });
    if opp.stand {
        if opp.board_value == MAX_BOARD_VALUE {
            fallback = MAX_BOARD_VALUE;
        } else {
            goal = opp.board_value + 1;
            fallback = opp.board_value;
        }
    }

    let mut m = if lands(bv, goal) {
        Move::standing()
    } else if let Some(play) = find_card(view, goal) {
        play.with_stand(true)
    } else if lands(bv, fallback) {
        Move::standing()
    } else if let Some(play) = find_card(view, fallback) {
        play.with_stand(true)
    } else {
        Move::default()
    };

    // busting with the match on the line: salvage the highest value below 20
    if m.card().is_none() && bv > MAX_BOARD_VALUE && opp.round_wins + 1 == round_limit {
        let mut best: Option<(i32, &crate::cards::Card)> = None;
        for c in &me.hand {
            let value = if c.is_flippable() { bv - c.value() } else { bv + c.value() };
            if value < MAX_BOARD_VALUE && best.map_or(true, |(v, _)| value >= v) {
                best = Some((value, c));
            }
        }
        if let Some((value, c)) = best {
            m = Move::play(c.identifier(), c.is_flippable());
            if !opp.stand && value >= 17 && me.hand.len() == 1 {
                m.stand = true;
            }
        }
    }
    m
}
