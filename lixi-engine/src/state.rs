//! Shared round state
//!
//! Thread-safe state shared between the controller, its frame tasks, and UI
//! collaborators. Renderers read the per-frame visual state (wheel rotation,
//! envelope board) from here; the pre-drawn winner stays internal until the
//! round resolves.

use tokio::sync::RwLock;
use uuid::Uuid;

use lixi_common::events::{DrawEvent, EventBus, SelectionMode};
use lixi_common::model::{Denomination, HistoryEntry, HistoryLog};

use crate::animation::EnvelopeBoard;

/// Externally visible round phase
///
/// Deliberately carries no winner: during `InProgress` the outcome is fixed
/// but must not be observable except through the animation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    InProgress,
    Resolved,
}

/// One live round's hidden bookkeeping
#[derive(Debug, Clone)]
pub(crate) struct ActiveRound {
    pub round_id: Uuid,
    pub mode: SelectionMode,
    pub winner: Denomination,
}

/// Full round phase, winner included (crate-internal)
#[derive(Debug, Clone)]
pub(crate) enum RoundPhase {
    Idle,
    InProgress(ActiveRound),
    Resolved { winner: Denomination },
}

impl RoundPhase {
    pub(crate) fn kind(&self) -> PhaseKind {
        match self {
            RoundPhase::Idle => PhaseKind::Idle,
            RoundPhase::InProgress(_) => PhaseKind::InProgress,
            RoundPhase::Resolved { .. } => PhaseKind::Resolved,
        }
    }
}

/// Shared state accessible by all components
///
/// Uses RwLock for concurrent read access with rare writes; the frame task
/// is the only writer of the visual fields.
pub struct SharedState {
    /// Current round phase (hidden winner lives here while in progress)
    pub(crate) phase: RwLock<RoundPhase>,

    /// Absolute wheel rotation in radians, updated every frame
    pub(crate) wheel_rotation: RwLock<f64>,

    /// Envelope board (labels, shuffle/opening/revealed phase)
    pub(crate) board: RwLock<EnvelopeBoard>,

    /// Binary sound gate checked before any cue request
    muted: RwLock<bool>,

    /// Recent winners, newest first, capped
    history: RwLock<HistoryLog>,

    /// Event broadcaster for UI collaborators
    event_bus: EventBus,
}

impl SharedState {
    pub(crate) fn new(event_bus: EventBus, board: EnvelopeBoard) -> Self {
        Self {
            phase: RwLock::new(RoundPhase::Idle),
            wheel_rotation: RwLock::new(0.0),
            board: RwLock::new(board),
            muted: RwLock::new(false),
            history: RwLock::new(HistoryLog::new()),
            event_bus,
        }
    }

    /// The event bus collaborators subscribe on
    pub fn bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) fn broadcast(&self, event: DrawEvent) {
        self.event_bus.emit_lossy(event);
    }

    pub async fn phase_kind(&self) -> PhaseKind {
        self.phase.read().await.kind()
    }

    /// The winner of the resolved round, if any
    ///
    /// None while idle or in progress: the pre-drawn winner is never
    /// observable before the terminal event.
    pub async fn revealed_winner(&self) -> Option<Denomination> {
        match &*self.phase.read().await {
            RoundPhase::Resolved { winner } => Some(winner.clone()),
            _ => None,
        }
    }

    /// Current wheel rotation for renderers
    pub async fn wheel_rotation(&self) -> f64 {
        *self.wheel_rotation.read().await
    }

    pub(crate) async fn set_wheel_rotation(&self, rotation: f64) {
        *self.wheel_rotation.write().await = rotation;
    }

    /// Snapshot of the envelope board for renderers
    pub async fn board_snapshot(&self) -> EnvelopeBoard {
        self.board.read().await.clone()
    }

    pub async fn is_muted(&self) -> bool {
        *self.muted.read().await
    }

    pub async fn set_muted(&self, muted: bool) {
        *self.muted.write().await = muted;
    }

    /// History entries, newest first
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.read().await.entries().cloned().collect()
    }

    pub(crate) async fn record_win(&self, winner: &Denomination) -> HistoryEntry {
        self.history.write().await.record(winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_state() -> SharedState {
        let mut rng = StdRng::seed_from_u64(1);
        SharedState::new(EventBus::new(16), EnvelopeBoard::deal(8, &mut rng))
    }

    fn winner() -> Denomination {
        Denomination::new("50.000đ", 50_000, 5.0, "#10b981")
    }

    #[tokio::test]
    async fn test_winner_hidden_until_resolved() {
        let state = test_state();
        assert_eq!(state.phase_kind().await, PhaseKind::Idle);
        assert!(state.revealed_winner().await.is_none());

        *state.phase.write().await = RoundPhase::InProgress(ActiveRound {
            round_id: Uuid::new_v4(),
            mode: SelectionMode::Wheel,
            winner: winner(),
        });
        assert_eq!(state.phase_kind().await, PhaseKind::InProgress);
        assert!(state.revealed_winner().await.is_none());

        *state.phase.write().await = RoundPhase::Resolved { winner: winner() };
        assert_eq!(state.phase_kind().await, PhaseKind::Resolved);
        assert_eq!(state.revealed_winner().await.unwrap().label, "50.000đ");
    }

    #[tokio::test]
    async fn test_mute_gate_toggles() {
        let state = test_state();
        assert!(!state.is_muted().await);
        state.set_muted(true).await;
        assert!(state.is_muted().await);
    }

    #[tokio::test]
    async fn test_record_win_lands_in_history() {
        let state = test_state();
        state.record_win(&winner()).await;
        let history = state.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].label, "50.000đ");
    }
}
