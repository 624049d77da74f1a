//! Monitor lifecycle state machine.
//!
//! # States
//!
//! - `Idle`: no transport held. Initial and terminal state.
//! - `Connecting`: opening the transport.
//! - `Active`: polling for frames.
//! - `Stopping`: closing the transport.
//!
//! # Valid Transitions
//!
//! - Idle → Connecting → Active → Stopping → Idle
//! - Connecting → Idle (open failed)
//!
//! # Examples
//!
//! ```
//! use cardwatch_monitor::{MonitorState, StateMachine};
//!
//! let mut machine = StateMachine::new();
//! machine.transition_to(MonitorState::Connecting).unwrap();
//! machine.transition_to(MonitorState::Active).unwrap();
//!
//! // Active can only move on to Stopping.
//! assert!(machine.transition_to(MonitorState::Idle).is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use cardwatch_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Maximum number of state transitions to keep in history.
///
/// A complete session takes four transitions, so this covers the whole
/// lifetime of any session with plenty of room.
const MAX_HISTORY_SIZE: usize = 32;

/// Lifecycle state of a monitoring session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    Idle,
    Connecting,
    Active,
    Stopping,
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MonitorState::Idle => "Idle",
            MonitorState::Connecting => "Connecting",
            MonitorState::Active => "Active",
            MonitorState::Stopping => "Stopping",
        };
        write!(f, "{}", name)
    }
}

impl MonitorState {
    /// Check if transition to `target` is allowed from this state.
    ///
    /// ```
    /// use cardwatch_monitor::MonitorState;
    ///
    /// assert!(MonitorState::Connecting.can_transition_to(&MonitorState::Idle));
    /// assert!(!MonitorState::Idle.can_transition_to(&MonitorState::Active));
    /// ```
    pub fn can_transition_to(&self, target: &MonitorState) -> bool {
        matches!(
            (self, target),
            (MonitorState::Idle, MonitorState::Connecting)
                | (
                    MonitorState::Connecting,
                    MonitorState::Active | MonitorState::Idle
                )
                | (MonitorState::Active, MonitorState::Stopping)
                | (MonitorState::Stopping, MonitorState::Idle)
        )
    }
}

/// A single state transition with timestamp.
///
/// The timestamp is process-local and not serialized; deserialized records
/// get the time of deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: MonitorState,
    pub to: MonitorState,

    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl StateTransition {
    pub fn new(from: MonitorState, to: MonitorState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// State machine guarding the monitor lifecycle.
///
/// Not thread-safe; a session owns its machine exclusively.
#[derive(Debug)]
pub struct StateMachine {
    current_state: MonitorState,
    state_entered_at: Instant,
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    /// Create a new state machine in the `Idle` state.
    pub fn new() -> Self {
        Self {
            current_state: MonitorState::Idle,
            state_entered_at: Instant::now(),
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> &MonitorState {
        &self.current_state
    }

    pub fn time_in_current_state(&self) -> Duration {
        self.state_entered_at.elapsed()
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// The sequence of states visited, starting with the first recorded
    /// `from` state.
    pub fn path(&self) -> Vec<MonitorState> {
        let mut path: Vec<MonitorState> = self.history.front().map(|t| t.from).into_iter().collect();
        path.extend(self.history.iter().map(|t| t.to));
        path
    }

    /// Transition to a new state.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the move is not allowed
    /// from the current state; the machine is left unchanged.
    pub fn transition_to(&mut self, new_state: MonitorState) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);
        self.current_state = new_state;
        self.state_entered_at = Instant::now();

        self.history.push_back(transition.clone());
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }

        Ok(transition)
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
