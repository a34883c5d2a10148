//! Round orchestration
//!
//! `SelectionController` runs one complete sample-animate-reveal cycle at a
//! time: `Idle → InProgress → Resolved → (reset) → Idle`. The winner is
//! fixed by a single weighted draw before the first frame; the animation's
//! only job is to converge on it visually. Start requests outside `Idle`
//! are silent no-ops; they correspond to disallowed input during a busy UI
//! state, not failures.
//!
//! One frame task is spawned per round and always runs to completion; there
//! is no cancellation path. Boundary events fire in strictly increasing
//! time order and the terminal `RoundResolved` is the last event of every
//! round, emitted exactly once.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::time::interval;
use tracing::{debug, error, info};
use uuid::Uuid;

use lixi_common::config::TomlConfig;
use lixi_common::events::{CueKind, DrawEvent, EventBus, SelectionMode};
use lixi_common::model::{Denomination, DenominationSet, MIN_DENOMINATIONS};

use crate::animation::{EnvelopeBoard, WheelLayout, WheelSpin};
use crate::audio::SoundDirector;
use crate::error::{Error, Result};
use crate::sampler;
use crate::state::{ActiveRound, PhaseKind, RoundPhase, SharedState};

/// Base tick volume; scaled down as the wheel decelerates
const TICK_BASE_VOLUME: f32 = 0.05;

/// Orchestrates rounds over one selection surface
pub struct SelectionController {
    config: TomlConfig,
    mode: SelectionMode,
    denominations: Arc<tokio::sync::RwLock<DenominationSet>>,
    state: Arc<SharedState>,
    sound: Arc<SoundDirector>,
    rng: Arc<Mutex<StdRng>>,
}

impl SelectionController {
    /// Create a controller for the given mode and denomination set
    pub fn new(
        config: TomlConfig,
        mode: SelectionMode,
        denominations: DenominationSet,
        sound: Arc<SoundDirector>,
    ) -> Result<Self> {
        Self::with_rng(config, mode, denominations, sound, StdRng::from_entropy())
    }

    /// Deterministic constructor: tests seed the rng to replay rounds
    pub fn with_rng(
        config: TomlConfig,
        mode: SelectionMode,
        denominations: DenominationSet,
        sound: Arc<SoundDirector>,
        mut rng: StdRng,
    ) -> Result<Self> {
        validate_set(&denominations)?;

        let board = EnvelopeBoard::deal(config.round.envelope_count, &mut rng);
        let state = Arc::new(SharedState::new(
            EventBus::new(config.round.event_capacity),
            board,
        ));

        Ok(Self {
            config,
            mode,
            denominations: Arc::new(tokio::sync::RwLock::new(denominations)),
            state,
            sound,
            rng: Arc::new(Mutex::new(rng)),
        })
    }

    /// Shared state handle for renderers and tests
    pub fn state(&self) -> Arc<SharedState> {
        Arc::clone(&self.state)
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Arm the controller: in Envelopes mode this runs the initial shuffle
    pub async fn start(&self) -> Result<()> {
        info!("Selection controller started in {} mode", self.mode);
        if self.mode == SelectionMode::Envelopes {
            self.run_shuffle_phase().await;
        }
        Ok(())
    }

    /// Replace the denomination set between rounds
    ///
    /// The set is borrowed per round: replacing it mid-round is refused so
    /// a live animation never sees its layout change underneath it.
    pub async fn set_denominations(&self, set: DenominationSet) -> Result<()> {
        validate_set(&set)?;
        if self.state.phase_kind().await != PhaseKind::Idle {
            return Err(Error::InvalidState(
                "cannot replace denominations while a round is live".into(),
            ));
        }
        *self.denominations.write().await = set;
        Ok(())
    }

    /// Snapshot of the current denomination set
    pub async fn denominations(&self) -> DenominationSet {
        self.denominations.read().await.clone()
    }

    /// Toggle the sound gate
    pub async fn set_muted(&self, muted: bool) {
        self.state.set_muted(muted).await;
    }

    /// Spin the wheel: pre-draw the winner and launch the frame task
    ///
    /// A request while a round is live (or in Envelopes mode) is a silent
    /// no-op; an unsampleable denomination set is a synchronous error and
    /// the round never starts.
    pub async fn spin_wheel(&self) -> Result<()> {
        if self.mode != SelectionMode::Wheel {
            debug!("spin ignored: controller is in {} mode", self.mode);
            return Ok(());
        }

        let mut phase = self.state.phase.write().await;
        match &*phase {
            RoundPhase::Idle => {}
            RoundPhase::InProgress(active) => {
                debug!(
                    "spin ignored: {} round {} already live",
                    active.mode, active.round_id
                );
                return Ok(());
            }
            RoundPhase::Resolved { .. } => {
                debug!("spin ignored: previous round awaiting reset");
                return Ok(());
            }
        }

        // Clone the set now: it stays immutable for the whole round
        let set = self.denominations.read().await.clone();
        let layout = WheelLayout::new(&set);
        let current_rotation = *self.state.wheel_rotation.read().await;

        let (winner_index, spin) = {
            let mut rng = self.rng.lock().unwrap();
            let winner_index = sampler::sample_index(&set, &mut *rng)?;
            let spin = WheelSpin::plan(
                &layout,
                winner_index,
                current_rotation,
                &self.config.round,
                &mut *rng,
            );
            (winner_index, spin)
        };
        let winner = set
            .get(winner_index)
            .cloned()
            .ok_or_else(|| Error::Internal("sampled index out of range".into()))?;

        let round_id = Uuid::new_v4();
        *phase = RoundPhase::InProgress(ActiveRound {
            round_id,
            mode: self.mode,
            winner: winner.clone(),
        });
        drop(phase);

        info!(
            "Round {} started: wheel spin over {} segments, {} extra turns",
            round_id,
            layout.segment_count(),
            spin.extra_turns()
        );
        self.state.broadcast(DrawEvent::RoundStarted {
            round_id,
            mode: self.mode,
            timestamp: chrono::Utc::now(),
        });

        let controller = self.clone_handles();
        tokio::spawn(async move {
            controller.run_wheel_round(round_id, layout, spin, winner).await;
        });

        Ok(())
    }

    /// Pick an envelope: pre-draw the winner and schedule the reveal
    ///
    /// Rejected (silent no-op) while shuffling, while a round is live, or
    /// for an out-of-range slot.
    pub async fn pick_envelope(&self, slot: usize) -> Result<()> {
        if self.mode != SelectionMode::Envelopes {
            debug!("pick ignored: controller is in {} mode", self.mode);
            return Ok(());
        }

        let mut phase = self.state.phase.write().await;
        if !matches!(*phase, RoundPhase::Idle) {
            debug!("pick ignored: round already live");
            return Ok(());
        }

        let set = self.denominations.read().await.clone();

        let mut board = self.state.board.write().await;
        if !matches!(board.phase(), crate::animation::BoardPhase::Ready) || slot >= board.slot_count()
        {
            debug!("pick ignored: board not ready for slot {}", slot);
            return Ok(());
        }
        let winner = {
            let mut rng = self.rng.lock().unwrap();
            sampler::sample(&set, &mut *rng)?.clone()
        };
        if let Err(e) = board.pick(slot) {
            debug!("pick ignored: {}", e);
            return Ok(());
        }
        drop(board);

        let round_id = Uuid::new_v4();
        *phase = RoundPhase::InProgress(ActiveRound {
            round_id,
            mode: self.mode,
            winner: winner.clone(),
        });
        drop(phase);

        info!("Round {} started: envelope {} picked", round_id, slot);
        self.request_cue(CueKind::Pop).await;
        self.state.broadcast(DrawEvent::RoundStarted {
            round_id,
            mode: self.mode,
            timestamp: chrono::Utc::now(),
        });
        self.state.broadcast(DrawEvent::EnvelopePicked {
            round_id,
            slot,
            timestamp: chrono::Utc::now(),
        });

        let controller = self.clone_handles();
        tokio::spawn(async move {
            controller.run_envelope_round(round_id, winner).await;
        });

        Ok(())
    }

    /// Acknowledge a resolved round and re-arm for the next one
    ///
    /// In Envelopes mode this re-deals the cosmetic labels and replays the
    /// shuffle phase. A reset outside `Resolved` is a silent no-op.
    pub async fn reset(&self) {
        {
            let mut phase = self.state.phase.write().await;
            if !matches!(*phase, RoundPhase::Resolved { .. }) {
                debug!("reset ignored: no resolved round");
                return;
            }
            *phase = RoundPhase::Idle;
        }

        self.state.broadcast(DrawEvent::RoundReset {
            timestamp: chrono::Utc::now(),
        });

        if self.mode == SelectionMode::Envelopes {
            self.run_shuffle_phase().await;
        }
    }

    /// Wheel frame task: one pending tick at a time until the spin lands
    async fn run_wheel_round(
        &self,
        round_id: Uuid,
        layout: WheelLayout,
        spin: WheelSpin,
        winner: Denomination,
    ) {
        let started = Instant::now();
        let mut ticker = interval(self.config.round.frame_interval());
        let mut last_segment = spin.segment_under_pointer(&layout, spin.rotation_at(started.elapsed()));

        loop {
            ticker.tick().await;
            let elapsed = started.elapsed();
            let progress = spin.progress(elapsed);
            let rotation = spin.rotation_at(elapsed);

            self.state.set_wheel_rotation(rotation).await;
            self.state.broadcast(DrawEvent::WheelFrame {
                round_id,
                rotation,
                progress,
                timestamp: chrono::Utc::now(),
            });

            let segment = spin.segment_under_pointer(&layout, rotation);
            if segment != last_segment {
                last_segment = segment;
                self.state.broadcast(DrawEvent::SegmentCrossed {
                    round_id,
                    segment_index: segment,
                    progress,
                    timestamp: chrono::Utc::now(),
                });
                let volume = (TICK_BASE_VOLUME * (1.0 - progress as f32 * 0.8)).max(0.01);
                self.request_cue(CueKind::Tick { volume }).await;
            }

            if spin.is_complete(elapsed) {
                break;
            }
        }

        self.finish_round(round_id, winner).await;
    }

    /// Envelope reveal task: anticipation delay, flip, terminal
    async fn run_envelope_round(&self, round_id: Uuid, winner: Denomination) {
        tokio::time::sleep(self.config.round.reveal_delay()).await;

        if let Err(e) = self.state.board.write().await.reveal() {
            // Unreachable while rounds are single-flight; log and resolve anyway
            error!("envelope reveal failed: {}", e);
        }

        self.finish_round(round_id, winner).await;
    }

    /// Terminal sequence: resolve, record, celebrate, emit the last event
    async fn finish_round(&self, round_id: Uuid, winner: Denomination) {
        {
            let mut phase = self.state.phase.write().await;
            *phase = RoundPhase::Resolved {
                winner: winner.clone(),
            };
        }

        self.state.record_win(&winner).await;
        info!("Round {} resolved: {}", round_id, winner.label);

        self.request_cue(CueKind::Chime).await;
        self.request_cue(CueKind::Fireworks).await;

        // Terminal event: exactly once, always last
        self.state.broadcast(DrawEvent::RoundResolved {
            round_id,
            winner,
            timestamp: chrono::Utc::now(),
        });
    }

    /// Re-deal the board and run the timed shuffle phase
    async fn run_shuffle_phase(&self) {
        {
            let mut board = self.state.board.write().await;
            let mut rng = self.rng.lock().unwrap();
            board.reset(&mut *rng);
        }

        self.state.broadcast(DrawEvent::ShuffleStarted {
            timestamp: chrono::Utc::now(),
        });
        self.request_cue(CueKind::Shuffle).await;

        let controller = self.clone_handles();
        tokio::spawn(async move {
            tokio::time::sleep(controller.config.round.shuffle_duration()).await;
            controller.state.board.write().await.finish_shuffle();
            controller.state.broadcast(DrawEvent::BoardReady {
                timestamp: chrono::Utc::now(),
            });
        });
    }

    /// Gate and forward one cue request
    ///
    /// The mute flag is checked here, by the caller of the synthesizer.
    /// The synthesizer itself has no mute state.
    async fn request_cue(&self, cue: CueKind) {
        if self.state.is_muted().await {
            return;
        }
        self.state.broadcast(DrawEvent::CueRequested {
            cue,
            timestamp: chrono::Utc::now(),
        });
        self.sound.play(cue);
    }

    /// Clone handles for spawned tasks
    fn clone_handles(&self) -> Self {
        Self {
            config: self.config.clone(),
            mode: self.mode,
            denominations: Arc::clone(&self.denominations),
            state: Arc::clone(&self.state),
            sound: Arc::clone(&self.sound),
            rng: Arc::clone(&self.rng),
        }
    }
}

/// A set must be editor-legal before a controller will take it
fn validate_set(set: &DenominationSet) -> Result<()> {
    if set.len() < MIN_DENOMINATIONS {
        return Err(lixi_common::Error::InvalidDistribution(format!(
            "need at least {} denominations, got {}",
            MIN_DENOMINATIONS,
            set.len()
        ))
        .into());
    }
    for d in set {
        if d.weight <= 0.0 || !d.weight.is_finite() {
            return Err(lixi_common::Error::InvalidDistribution(format!(
                "denomination '{}' has non-positive weight {}",
                d.label, d.weight
            ))
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lixi_common::model::default_set;

    fn short_config() -> TomlConfig {
        let mut config = TomlConfig::default();
        config.round.spin_duration_ms = 60;
        config.round.shuffle_duration_ms = 10;
        config.round.reveal_delay_ms = 30;
        config.round.frame_interval_ms = 2;
        config
    }

    fn wheel_controller(seed: u64) -> SelectionController {
        SelectionController::with_rng(
            short_config(),
            SelectionMode::Wheel,
            default_set(),
            Arc::new(SoundDirector::silent()),
            StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_undersized_set() {
        let set = DenominationSet::new(vec![Denomination::new("only", 1, 1.0, "#fff")]);
        let result = SelectionController::new(
            TomlConfig::default(),
            SelectionMode::Wheel,
            set,
            Arc::new(SoundDirector::silent()),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_spin_transitions_to_in_progress() {
        let controller = wheel_controller(1);
        assert_eq!(controller.state().phase_kind().await, PhaseKind::Idle);

        controller.spin_wheel().await.unwrap();
        assert_eq!(controller.state().phase_kind().await, PhaseKind::InProgress);
        assert!(controller.state().revealed_winner().await.is_none());
    }

    #[tokio::test]
    async fn test_set_denominations_refused_mid_round() {
        let controller = wheel_controller(2);
        controller.spin_wheel().await.unwrap();

        let result = controller.set_denominations(default_set()).await;
        assert!(matches!(result, Err(Error::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_pick_in_wheel_mode_is_noop() {
        let controller = wheel_controller(3);
        controller.pick_envelope(0).await.unwrap();
        assert_eq!(controller.state().phase_kind().await, PhaseKind::Idle);
    }
}
