use super::{AgentKind, MoveError, MoveProvider};
use crate::game::{GameView, Move, MoveDecodeError};
use async_trait::async_trait;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SubmitError {
    #[error("too late to play!")]
    TooLate,
    #[error(transparent)]
    Rejected(#[from] MoveDecodeError),
}

#[derive(Default)]
struct Slot {
    state: Option<String>,
    deadline: Option<Instant>,
    pending: Option<mpsc::Sender<Move>>,
}

/// Move provider for an actor outside the process, typically a human behind HTTP.
///
/// Publishing the view and receiving the move are decoupled: the engine publishes and
/// waits; readers fetch the published view at any time; a submitted move is accepted
/// only while the engine is waiting, and only once per wait.
pub struct RendezvousAgent {
    name: String,
    wait: Duration,
    slot: Mutex<Slot>,
}

impl RendezvousAgent {
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), wait: Self::DEFAULT_DEADLINE, slot: Mutex::new(Slot::default()) }
    }

    pub fn with_deadline(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The last published view as JSON, if any. Reading does not consume it.
    pub fn published(&self) -> Option<String> {
        self.lock().state.clone()
    }

    /// When the currently open move window closes, if one is open.
    pub fn deadline(&self) -> Option<Instant> {
        let slot = self.lock();
        slot.pending.as_ref().and(slot.deadline)
    }

    /// Whether a move would currently be accepted.
    pub fn is_waiting(&self) -> bool {
        self.lock().pending.is_some()
    }

    /// Hand a move (as a JSON body) to the waiting engine. Never blocks.
    pub fn submit(&self, body: &[u8]) -> Result<(), SubmitError> {
        let m = Move::decode(body)?;
        self.submit_move(m)
    }

    pub fn submit_move(&self, m: Move) -> Result<(), SubmitError> {
        m.validate().map_err(MoveDecodeError::from)?;
        // send under the lock so a closing window cannot slip between take and send
        let mut slot = self.lock();
        let tx = slot.pending.take().ok_or(SubmitError::TooLate)?;
        tx.try_send(m).map_err(|_| SubmitError::TooLate)
    }

    fn close_window(&self) {
        let mut slot = self.lock();
        slot.pending = None;
        slot.deadline = None;
    }
}

impl fmt::Display for RendezvousAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[async_trait]
impl MoveProvider for RendezvousAgent {
    async fn request_move(&self, view: &GameView) -> Result<Move, MoveError> {
        let body = serde_json::to_string(view).map_err(MoveError::Encode)?;
        let (tx, mut rx) = mpsc::channel(1);
        {
            let mut slot = self.lock();
            slot.state = Some(body);
            slot.deadline = Some(Instant::now() + self.wait);
            slot.pending = Some(tx);
        }
        match tokio::time::timeout(self.wait, rx.recv()).await {
            Ok(Some(m)) => Ok(m),
            Ok(None) => Err(MoveError::Closed),
            Err(_) => {
                self.close_window();
                // a move accepted just before the window closed still counts
                rx.try_recv().map_err(|_| MoveError::Timeout(self.wait))
            }
        }
    }

    async fn notify(&self, view: &GameView) {
        match serde_json::to_string(view) {
            Ok(body) => {
                let mut slot = self.lock();
                slot.state = Some(body);
                slot.pending = None;
                slot.deadline = None;
            }
            Err(e) => log::warn!("Player {}: failed to publish final view: {}", self, e),
        }
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
}
