//! Easing curve implementations for animation progress
//!
//! Provides the curve shapes used to map linear elapsed-time progress onto
//! visual motion. The wheel rides `QuintOut` for its fast launch and long,
//! dramatic stop; the gentler curves are available for other front ends.

use serde::{Deserialize, Serialize};

/// Easing curve types for animation progress
///
/// Each curve maps normalized progress (0.0 to 1.0) to eased progress:
/// - Linear: constant rate (no easing)
/// - QuadraticOut: fast start, mild deceleration
/// - CubicOut: fast start, firmer deceleration
/// - QuintOut: very fast start, long stable stop
/// - SCurve: smooth acceleration and deceleration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    /// y = t
    Linear,

    /// y = 1 - (1-t)^2
    QuadraticOut,

    /// y = 1 - (1-t)^3
    CubicOut,

    /// y = 1 - (1-t)^5
    QuintOut,

    /// y = 0.5 × (1 - cos(π × t))
    SCurve,
}

impl Easing {
    /// Apply the curve to normalized progress
    ///
    /// # Arguments
    /// * `progress` - Normalized progress (clamped to 0.0..=1.0)
    ///
    /// # Returns
    /// Eased progress (0.0 at start, exactly 1.0 at end)
    pub fn apply(&self, progress: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);

        match self {
            Easing::Linear => t,
            Easing::QuadraticOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv
            }
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::QuintOut => 1.0 - (1.0 - t).powi(5),
            Easing::SCurve => 0.5 * (1.0 - (std::f64::consts::PI * t).cos()),
        }
    }

    /// Parse a curve from its configuration string
    ///
    /// Accepts `linear`, `quadratic_out`, `cubic_out`, `quint_out` (alias
    /// `quintic_out`) and `s_curve` (aliases `scurve`, `s-curve`, `cosine`).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Some(Easing::Linear),
            "quadratic_out" | "quad_out" => Some(Easing::QuadraticOut),
            "cubic_out" => Some(Easing::CubicOut),
            "quint_out" | "quintic_out" => Some(Easing::QuintOut),
            "s_curve" | "scurve" | "s-curve" | "cosine" => Some(Easing::SCurve),
            _ => None,
        }
    }

    /// Canonical configuration string
    pub fn as_str(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::QuadraticOut => "quadratic_out",
            Easing::CubicOut => "cubic_out",
            Easing::QuintOut => "quint_out",
            Easing::SCurve => "s_curve",
        }
    }

    /// Human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Easing::Linear => "Linear",
            Easing::QuadraticOut => "Quadratic Out",
            Easing::CubicOut => "Cubic Out",
            Easing::QuintOut => "Quintic Out",
            Easing::SCurve => "S-Curve",
        }
    }

    /// All available curve variants
    pub fn all_variants() -> &'static [Easing] {
        &[
            Easing::Linear,
            Easing::QuadraticOut,
            Easing::CubicOut,
            Easing::QuintOut,
            Easing::SCurve,
        ]
    }
}

impl Default for Easing {
    /// Default is QuintOut: the wheel's fast launch and slow, stable stop
    fn default() -> Self {
        Easing::QuintOut
    }
}

impl std::fmt::Display for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        for curve in Easing::all_variants() {
            let start = curve.apply(0.0);
            let end = curve.apply(1.0);
            assert!(
                start.abs() < 1e-9,
                "{:?} at 0.0 should be 0.0, got {}",
                curve,
                start
            );
            assert!(
                (end - 1.0).abs() < 1e-9,
                "{:?} at 1.0 should be 1.0, got {}",
                curve,
                end
            );
        }
    }

    #[test]
    fn test_monotonic_non_decreasing() {
        for curve in Easing::all_variants() {
            let mut prev = curve.apply(0.0);
            for i in 1..=100 {
                let next = curve.apply(i as f64 / 100.0);
                assert!(
                    next >= prev - 1e-12,
                    "{:?} not monotonic at step {}",
                    curve,
                    i
                );
                prev = next;
            }
        }
    }

    #[test]
    fn test_quint_out_shape() {
        // Halfway through the time, QuintOut has covered most of the distance
        let half = Easing::QuintOut.apply(0.5);
        assert!((half - 0.96875).abs() < 1e-9);
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(Easing::QuintOut.apply(-0.5), 0.0);
        assert_eq!(Easing::QuintOut.apply(1.5), 1.0);
    }

    #[test]
    fn test_config_string_round_trip() {
        for curve in Easing::all_variants() {
            let parsed = Easing::from_str(curve.as_str()).unwrap();
            assert_eq!(*curve, parsed, "round-trip failed for {:?}", curve);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Easing::from_str("cosine"), Some(Easing::SCurve));
        assert_eq!(Easing::from_str("quintic_out"), Some(Easing::QuintOut));
        assert_eq!(Easing::from_str("QUAD_OUT"), Some(Easing::QuadraticOut));
        assert_eq!(Easing::from_str("bounce"), None);
    }

    #[test]
    fn test_default() {
        assert_eq!(Easing::default(), Easing::QuintOut);
    }
}
