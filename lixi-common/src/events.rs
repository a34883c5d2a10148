//! Event types for the lucky-draw event system
//!
//! Provides the shared `DrawEvent` definitions and the `EventBus` the engine
//! broadcasts on.
//!
//! # Architecture
//!
//! The engine uses hybrid communication:
//! - **EventBus** (tokio::broadcast): one-to-many event broadcasting to UI
//!   collaborators (renderer, history list, confetti, sound gate)
//! - **Shared state** (Arc<RwLock<T>>): read-heavy per-frame visual state
//!
//! Per-frame events (`WheelFrame`) are emitted lossy: a slow or absent
//! subscriber must never stall the frame loop.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;
use uuid::Uuid;

use crate::model::Denomination;

/// Which selection surface a round runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Wheel,
    Envelopes,
}

impl std::fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionMode::Wheel => write!(f, "wheel"),
            SelectionMode::Envelopes => write!(f, "envelopes"),
        }
    }
}

/// Audio cue kinds the engine can request
///
/// The synthesizer renders these procedurally; the mute flag is checked by
/// the caller before a cue is requested, never here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CueKind {
    /// Pointer crossed a segment boundary; volume mirrors the deceleration
    Tick { volume: f32 },
    /// Envelope picked
    Pop,
    /// Shuffle phase started
    Shuffle,
    /// Terminal celebration arpeggio
    Chime,
    /// Terminal celebration boom/crackle timeline
    Fireworks,
}

/// Lucky-draw event types
///
/// Events are broadcast via EventBus and can be serialized for transport by
/// outer layers. All events use this central enum for exhaustive matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DrawEvent {
    /// A round started; the winner is already fixed but not revealed
    RoundStarted {
        round_id: Uuid,
        mode: SelectionMode,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Per-frame wheel state (lossy; renderers redraw from this)
    WheelFrame {
        round_id: Uuid,
        /// Absolute rotation in radians
        rotation: f64,
        /// Raw progress 0.0..=1.0
        progress: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The segment under the pointer changed (drives tick sounds)
    SegmentCrossed {
        round_id: Uuid,
        segment_index: usize,
        progress: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Envelope re-deal animation started
    ShuffleStarted {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Envelope board finished shuffling and accepts picks
    BoardReady {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// User picked an envelope slot; anticipation shake runs until reveal
    EnvelopePicked {
        round_id: Uuid,
        slot: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Terminal event: exactly one per round, always last, reveals the winner
    RoundResolved {
        round_id: Uuid,
        winner: Denomination,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Round acknowledged and cleared; engine re-armed for the next round
    RoundReset {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The engine asked the synthesizer for a cue (mirrors the audio sink)
    CueRequested {
        cue: CueKind,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Central event distribution bus
///
/// Wraps tokio::broadcast, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DrawEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// Older events are dropped for subscribers that lag beyond capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<DrawEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` with the event if none are listening.
    pub fn emit(&self, event: DrawEvent) -> std::result::Result<usize, Box<DrawEvent>> {
        match self.tx.send(event) {
            Ok(count) => Ok(count),
            Err(broadcast::error::SendError(event)) => {
                warn!("event emitted with no subscribers: {:?}", event);
                Err(Box::new(event))
            }
        }
    }

    /// Emit an event, ignoring the no-subscriber case
    ///
    /// Used for high-frequency frame events where nobody listening is normal.
    pub fn emit_lossy(&self, event: DrawEvent) {
        let _ = self.tx.send(event);
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
