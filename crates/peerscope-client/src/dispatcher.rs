use std::time::Duration;

/// Cadence of the playback ticker while in `Playing`.
pub const PLAYBACK_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

/// What the runtime must do to its ticker task after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Start,
    Cancel,
}

/// Play/pause state machine. Transitions are pure and return at most one
/// timer action, which keeps the "at most one active timer" invariant in one
/// place; the async runtime interprets the action.
#[derive(Debug, Default)]
pub struct CommandDispatcher {
    state: PlaybackState,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Paused → Playing, starting the ticker. No-op while already Playing.
    pub fn play(&mut self) -> Option<TimerAction> {
        match self.state {
            PlaybackState::Paused => {
                self.state = PlaybackState::Playing;
                Some(TimerAction::Start)
            }
            PlaybackState::Playing => None,
        }
    }

    /// Playing → Paused, cancelling the ticker. No-op while already Paused.
    pub fn pause(&mut self) -> Option<TimerAction> {
        match self.state {
            PlaybackState::Playing => {
                self.state = PlaybackState::Paused;
                Some(TimerAction::Cancel)
            }
            PlaybackState::Paused => None,
        }
    }

    /// Forces Paused from any state. The ticker must not outlive the
    /// connection, so a cancel is issued even mid-playback.
    pub fn connection_closed(&mut self) -> Option<TimerAction> {
        match self.state {
            PlaybackState::Playing => {
                self.state = PlaybackState::Paused;
                Some(TimerAction::Cancel)
            }
            PlaybackState::Paused => None,
        }
    }
}
