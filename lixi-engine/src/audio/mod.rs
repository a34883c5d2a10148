//! Procedural audio: synthesis, mixing, device output
//!
//! The `SoundDirector` is the engine-facing surface. The underlying device
//! stream is a single process-wide resource opened lazily on the first cue
//! and reused across all cues and rounds; when no device can be opened the
//! director degrades to silent operation. Audio trouble never blocks or
//! delays the animation loop.
//!
//! Cue playback is fire-and-forget: `play` hands the cue to a dedicated
//! audio thread (the cpal stream is not `Send`, so it lives where it was
//! built) which renders it and schedules voices on the shared mixer.

pub mod mixer;
pub mod output;
pub mod synth;

pub use mixer::CueMixer;
pub use output::CueOutput;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use lixi_common::config::AudioConfig;
use lixi_common::events::CueKind;

enum DirectorState {
    /// No cue requested yet; device not opened
    Cold,

    /// Audio thread servicing the device
    Running(mpsc::Sender<CueKind>),

    /// Device unavailable or audio disabled; cues are dropped
    Disabled,
}

/// Engine-facing audio surface
///
/// Holds no mute state of its own: the caller gates cue requests. The
/// director only knows whether audio is configured on and whether the
/// device could be opened.
pub struct SoundDirector {
    config: AudioConfig,
    state: Mutex<DirectorState>,
}

impl SoundDirector {
    pub fn new(config: AudioConfig) -> Self {
        let state = if config.enabled {
            DirectorState::Cold
        } else {
            DirectorState::Disabled
        };
        Self {
            config,
            state: Mutex::new(state),
        }
    }

    /// A director that never produces sound (tests, `--muted` fronts)
    pub fn silent() -> Self {
        Self {
            config: AudioConfig {
                enabled: false,
                ..AudioConfig::default()
            },
            state: Mutex::new(DirectorState::Disabled),
        }
    }

    /// Request a cue, fire-and-forget
    ///
    /// Never blocks on synthesis or the device; a failed device open logs
    /// once and disables sound for the rest of the session.
    pub fn play(&self, cue: CueKind) {
        let mut state = self.state.lock().unwrap();

        if let DirectorState::Cold = *state {
            *state = DirectorState::Running(self.start_audio_thread());
        }

        let delivery_failed = match &*state {
            DirectorState::Running(tx) => tx.send(cue).is_err(),
            _ => return,
        };
        if delivery_failed {
            warn!("Audio device unavailable, continuing without sound");
            *state = DirectorState::Disabled;
        }
    }

    fn start_audio_thread(&self) -> mpsc::Sender<CueKind> {
        let (tx, rx) = mpsc::channel::<CueKind>();
        let device = self.config.device.clone();
        let master_volume = self.config.master_volume;

        let spawned = std::thread::Builder::new()
            .name("lixi-audio".into())
            .spawn(move || audio_thread(rx, device, master_volume));
        if let Err(e) = spawned {
            warn!("Failed to spawn audio thread: {}", e);
            // The receiver is dropped with the failed spawn; the first send
            // errors and play() flips to Disabled.
        }

        tx
    }
}

/// Owns the cpal stream; renders and schedules cues until the sender drops
fn audio_thread(rx: mpsc::Receiver<CueKind>, device: Option<String>, master_volume: f32) {
    let mixer = Arc::new(Mutex::new(CueMixer::new(master_volume)));

    let _output = match CueOutput::open(device.as_deref(), Arc::clone(&mixer)) {
        Ok(output) => output,
        Err(e) => {
            warn!("Audio output unavailable: {}", e);
            return;
        }
    };

    let mut rng = StdRng::from_entropy();

    while let Ok(cue) = rx.recv() {
        debug!("Rendering cue: {:?}", cue);
        let mut mixer = mixer.lock().unwrap();
        match cue {
            CueKind::Tick { volume } => mixer.trigger(synth::render_tick(volume), 0),
            CueKind::Pop => mixer.trigger(synth::render_pop(), 0),
            CueKind::Shuffle => mixer.trigger(synth::render_shuffle(&mut rng), 0),
            CueKind::Chime => mixer.trigger(synth::render_chime(), 0),
            CueKind::Fireworks => {
                for (delay_frames, samples) in synth::fireworks_timeline(&mut rng) {
                    mixer.trigger(samples, delay_frames);
                }
            }
        }
    }
}
