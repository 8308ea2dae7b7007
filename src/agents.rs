//! Agents: move providers standing behind a seat.
//!
//! The match engine only knows the [`MoveProvider`] capability. A provider is
//! picked when the seat is created and is never downcast afterwards:
//! - [`ForkAgent`] runs an external program per move with a hard timeout;
//! - [`RendezvousAgent`] publishes the view for an outside actor (a human over
//!   HTTP) and waits a bounded time for a move to be submitted;
//! - [`InProcessAgent`] wraps a plain function, used for built-in bots and tests.

use crate::game::{GameView, Move, MoveDecodeError};
use async_trait::async_trait;
use core::fmt;
use std::io;
use std::process::ExitStatus;
use std::time::Duration;

mod fork;
mod rendezvous;

pub use fork::ForkAgent;
pub use rendezvous::{RendezvousAgent, SubmitError};

/// Kinds of agents attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentKind {
    Human,
    Bot,
}

/// Why a provider could not produce a move. None of these are fatal to the match.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum MoveError {
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    #[error("failed to encode game view: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("i/o error talking to player: {0}")]
    Io(#[from] io::Error),
    #[error("player exited with {0}")]
    Exit(ExitStatus),
    #[error(transparent)]
    Decode(#[from] MoveDecodeError),
    #[error("move window closed before a move arrived")]
    Closed,
}

impl MoveError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, MoveError::Timeout(_))
    }
}

/// A seat controller that produces a move for the acting player.
#[async_trait]
pub trait MoveProvider: fmt::Display + Send + Sync {
    /// Obtain a move for this view, bounded by the provider's own deadline.
    async fn request_move(&self, view: &GameView) -> Result<Move, MoveError>;

    /// Receive the final view once the match is decided.
    async fn notify(&self, _view: &GameView) {}

    /// The kind of this agent (human, bot, etc.).
    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }
}

/// A provider backed by a function of the view.
///
/// ```
/// use pazaak_rs::agents::{InProcessAgent, MoveProvider};
/// use pazaak_rs::game::{GameView, Move};
///
/// let agent = InProcessAgent::new("always-stand", |_: &GameView| Move::standing());
/// assert_eq!(agent.to_string(), "always-stand");
/// ```
pub struct InProcessAgent<F> {
    name: String,
    decide: F,
}

impl<F> InProcessAgent<F>
where
    F: Fn(&GameView) -> Move + Send + Sync,
{
    pub fn new(name: impl Into<String>, decide: F) -> Self {
        Self { name: name.into(), decide }
    }
}

impl<F> fmt::Display for InProcessAgent<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[async_trait]
impl<F> MoveProvider for InProcessAgent<F>
where
    F: Fn(&GameView) -> Move + Send + Sync,
{
    async fn request_move(&self, view: &GameView) -> Result<Move, MoveError> {
        let m = (self.decide)(view);
        m.validate().map_err(MoveDecodeError::from)?;
        Ok(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_process_agent_validates_its_moves() {
        let good = InProcessAgent::new("good", |_: &GameView| Move::play("+1", false));
        assert_eq!(good.request_move(&GameView::default()).await.unwrap().card(), Some("+1"));

        let bad = InProcessAgent::new("bad", |_: &GameView| Move {
            flip_card: true,
            ..Move::default()
        });
        let err = bad.request_move(&GameView::default()).await.unwrap_err();
        assert!(matches!(err, MoveError::Decode(MoveDecodeError::Invalid(_))));
        assert_eq!(bad.kind(), AgentKind::Bot);
    }

    #[test]
    fn timeout_is_classified() {
        assert!(MoveError::Timeout(Duration::from_secs(1)).is_timeout());
        assert!(!MoveError::Closed.is_timeout());
    }
}
