//! # Lucky-Draw Engine (lixi-engine)
//!
//! Core engine for the weighted lucky draw: deterministic weighted sampling,
//! animated convergence on the pre-drawn winner, and procedurally synthesized
//! audio cues tied to animation progress.
//!
//! **Architecture:** the [`round::SelectionController`] pre-draws a winner
//! with the [`sampler`], drives one of the two [`animation`] variants on a
//! tokio frame loop, and routes cue requests through [`audio`], a cpal
//! stream opened lazily on first use. UI collaborators subscribe to the
//! event bus and read per-frame visual state from [`state::SharedState`];
//! the engine never draws pixels itself.

pub mod animation;
pub mod audio;
pub mod error;
pub mod round;
pub mod sampler;
pub mod state;

pub use error::{Error, Result};
pub use round::SelectionController;
pub use state::SharedState;
