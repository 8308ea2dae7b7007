use crate::game::{GameView, Move};
use crate::hand::HAND_SIZE;
use std::time::{Duration, Instant};

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    /// Select (or deselect) the hand card at this index.
    Select(usize),
    ToggleFlip,
    ToggleStand,
    Submit,
    ToggleHelp,
}

/// Client-side state: the last view fetched from the server plus the move being composed.
#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub started: Instant,
    pub view: Option<GameView>,
    pub time_left: Option<Duration>,
    pub selected: Option<usize>,
    pub flip: bool,
    pub stand: bool,
    help_open: bool,
    outbox: Option<Move>,
    status: Option<String>,
    status_at: Option<Instant>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            started: Instant::now(),
            view: None,
            time_left: None,
            selected: None,
            flip: false,
            stand: false,
            help_open: false,
            outbox: None,
            status: None,
            status_at: None,
        }
    }
}

impl AppState {
    const STATUS_TTL: Duration = Duration::from_secs(3);

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn game_over(&self) -> bool {
        self.view.as_ref().is_some_and(|v| v.winner.is_some())
    }

    pub fn status(&self) -> Option<&str> {
        match self.status_at {
            Some(at) if at.elapsed() > Self::STATUS_TTL => None,
            _ => self.status.as_deref(),
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
        self.status_at = Some(Instant::now());
    }

    fn hand_len(&self) -> usize {
        self.view.as_ref().map_or(0, |v| v.current_player.hand.len())
    }

    fn selected_flippable(&self) -> bool {
        match (&self.view, self.selected) {
            (Some(v), Some(i)) => v.current_player.hand.get(i).is_some_and(|c| c.is_flippable()),
            _ => false,
        }
    }

    /// Take in a freshly fetched view. A change of view means a new turn, so the
    /// composed move is discarded.
    pub fn apply_state(&mut self, mut view: GameView, time_left: Option<Duration>) {
        self.time_left = time_left;
        // the final view only carries the winner; keep the last boards on screen
        if view.winner.is_some() && view.current_player.number == 0 {
            if let Some(prev) = &self.view {
                view.current_player = prev.current_player.clone();
                view.opponent = prev.opponent.clone();
            }
        }
        if self.view.as_ref() == Some(&view) {
            return;
        }
        self.view = Some(view);
        self.selected = None;
        self.flip = false;
        self.stand = false;
    }

    /// The move described by the current selection.
    pub fn pending_move(&self) -> Move {
        let card = match (&self.view, self.selected) {
            (Some(v), Some(i)) => v.current_player.hand.get(i).map(|c| c.identifier().to_string()),
            _ => None,
        };
        match card {
            Some(id) => Move::play(id, self.flip).with_stand(self.stand),
            None => Move::default().with_stand(self.stand),
        }
    }

    /// The move queued by the last `Submit`, for the controller to send.
    pub fn take_submission(&mut self) -> Option<Move> {
        self.outbox.take()
    }

    /// Report what the server said about a submission.
    pub fn record_submit(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                self.set_status("Move sent");
                self.selected = None;
                self.flip = false;
                self.stand = false;
            }
            Err(e) => self.set_status(format!("Move rejected: {e}")),
        }
    }

    /// Returns true when the action changed something.
    pub fn handle_input(&mut self, action: InputAction) -> bool {
        if let InputAction::ToggleHelp = action {
            self.help_open = !self.help_open;
            return true;
        }
        if self.view.is_none() || self.game_over() {
            return false;
        }
        match action {
            InputAction::Select(i) => {
                if i >= self.hand_len().min(HAND_SIZE) {
                    return false;
                }
                if self.selected == Some(i) {
                    self.selected = None;
                } else {
                    self.selected = Some(i);
                }
                self.flip = false;
                true
            }
            InputAction::ToggleFlip => {
                if !self.selected_flippable() {
                    self.set_status("Select a flippable card first");
                    return false;
                }
                self.flip = !self.flip;
                true
            }
            InputAction::ToggleStand => {
                self.stand = !self.stand;
                true
            }
            InputAction::Submit => {
                self.outbox = Some(self.pending_move());
                true
            }
            InputAction::ToggleHelp => false,
        }
    }
}
