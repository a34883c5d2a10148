//! Animation variants converging on a pre-drawn winner
//!
//! Both variants share the same contract: a started run emits zero or more
//! boundary signals and exactly one terminal signal carrying the winner,
//! only after the full configured duration has elapsed. The visible motion
//! is pure presentation; the winner is fixed before the first frame.

pub mod envelopes;
pub mod wheel;

pub use envelopes::{BoardPhase, EnvelopeBoard, LUCKY_WORDS};
pub use wheel::{WheelLayout, WheelSpin, POINTER_ANGLE};

use lixi_common::Easing;
use std::time::Duration;

/// Time base for one animation run
///
/// Progress is `min(elapsed / duration, 1.0)`, monotonically non-decreasing,
/// and reaches exactly 1.0 at or after `duration`.
#[derive(Debug, Clone, Copy)]
pub struct SpinTimeline {
    duration: Duration,
    easing: Easing,
}

impl SpinTimeline {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Raw progress in 0.0..=1.0
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Eased progress in 0.0..=1.0
    pub fn eased(&self, elapsed: Duration) -> f64 {
        self.easing.apply(self.progress(elapsed))
    }

    /// True once the full duration has elapsed
    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}
