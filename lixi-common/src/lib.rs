//! # Lixi Common Library
//!
//! Shared code for the lucky-draw engine and its front ends:
//! - Domain model (denominations, history)
//! - Event types (DrawEvent enum) and EventBus
//! - Easing curve definitions and calculations
//! - Configuration loading
//! - Error types

pub mod config;
pub mod easing;
pub mod error;
pub mod events;
pub mod model;

pub use easing::Easing;
pub use error::{Error, Result};
