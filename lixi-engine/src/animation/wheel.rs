//! Rotational wheel animation
//!
//! Each denomination occupies an angular arc proportional to its weight, in
//! set order, starting at angle 0. Angle 0 points "east" and increases
//! clockwise; the fixed pointer sits at the top (`1.5π`). A spin plans a
//! final rotation that parks the winner's arc midpoint under the pointer,
//! padded with a randomized number of cosmetic full turns that never affect
//! which denomination wins.
//!
//! All math here is pure: the frame loop asks for `rotation_at(elapsed)` and
//! maps rotations back to segment indices to detect boundary crossings.

use rand::Rng;
use std::f64::consts::TAU;
use std::time::Duration;

use lixi_common::config::RoundConfig;
use lixi_common::model::DenominationSet;
use lixi_common::Easing;

use super::SpinTimeline;

/// Fixed pointer reference angle: top of the wheel
pub const POINTER_ANGLE: f64 = 1.5 * std::f64::consts::PI;

/// Angular layout of a denomination set
///
/// Arc spans are weight-proportional and laid out in set order from angle 0.
#[derive(Debug, Clone)]
pub struct WheelLayout {
    spans: Vec<f64>,
}

impl WheelLayout {
    pub fn new(set: &DenominationSet) -> Self {
        let total = set.total_weight();
        let spans = set.iter().map(|d| d.weight / total * TAU).collect();
        Self { spans }
    }

    pub fn segment_count(&self) -> usize {
        self.spans.len()
    }

    /// Arc span of one segment in radians
    pub fn arc_span(&self, index: usize) -> f64 {
        self.spans[index]
    }

    /// Start angle of a segment's arc
    pub fn arc_start(&self, index: usize) -> f64 {
        self.spans[..index].iter().sum()
    }

    /// Midpoint angle of a segment's arc, the spin target
    pub fn arc_midpoint(&self, index: usize) -> f64 {
        self.arc_start(index) + self.spans[index] / 2.0
    }

    /// Map a pointer-relative angle in `[0, 2π)` back to a segment index
    pub fn segment_at(&self, angle: f64) -> usize {
        let angle = angle.rem_euclid(TAU);
        let mut cumulative = 0.0;
        for (i, span) in self.spans.iter().enumerate() {
            cumulative += span;
            if angle < cumulative {
                return i;
            }
        }
        self.spans.len() - 1
    }
}

/// One planned spin: start state, target state, and time base
///
/// The winner index is fixed at plan time; `rotation_at` only interpolates
/// toward a final rotation already aligned with that winner.
#[derive(Debug, Clone)]
pub struct WheelSpin {
    winner_index: usize,
    start_rotation: f64,
    final_rotation: f64,
    extra_turns: u32,
    timeline: SpinTimeline,
}

impl WheelSpin {
    /// Plan a spin that lands the pointer inside the winner's arc
    ///
    /// `extra_turns` is drawn uniformly from the configured range; it pads
    /// the motion for effect and cancels out of the final pointer position.
    pub fn plan<R: Rng + ?Sized>(
        layout: &WheelLayout,
        winner_index: usize,
        current_rotation: f64,
        config: &RoundConfig,
        rng: &mut R,
    ) -> Self {
        let extra_turns = rng.gen_range(config.extra_turns_min..=config.extra_turns_max);
        let easing = Easing::from_str(&config.easing).unwrap_or_default();
        Self::plan_exact(
            layout,
            winner_index,
            current_rotation,
            extra_turns,
            config.spin_duration(),
            easing,
        )
    }

    /// Deterministic planning core (fixed turn count)
    pub fn plan_exact(
        layout: &WheelLayout,
        winner_index: usize,
        current_rotation: f64,
        extra_turns: u32,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        let target = layout.arc_midpoint(winner_index);
        let alignment =
            (POINTER_ANGLE - target - current_rotation.rem_euclid(TAU)).rem_euclid(TAU);
        let final_rotation = current_rotation + f64::from(extra_turns) * TAU + alignment;

        Self {
            winner_index,
            start_rotation: current_rotation,
            final_rotation,
            extra_turns,
            timeline: SpinTimeline::new(duration, easing),
        }
    }

    pub fn winner_index(&self) -> usize {
        self.winner_index
    }

    pub fn extra_turns(&self) -> u32 {
        self.extra_turns
    }

    pub fn final_rotation(&self) -> f64 {
        self.final_rotation
    }

    pub fn duration(&self) -> Duration {
        self.timeline.duration()
    }

    /// Raw progress in 0.0..=1.0 at `elapsed`
    pub fn progress(&self, elapsed: Duration) -> f64 {
        self.timeline.progress(elapsed)
    }

    /// Absolute wheel rotation at `elapsed`
    pub fn rotation_at(&self, elapsed: Duration) -> f64 {
        self.start_rotation
            + (self.final_rotation - self.start_rotation) * self.timeline.eased(elapsed)
    }

    /// True once the full duration has elapsed
    pub fn is_complete(&self, elapsed: Duration) -> bool {
        self.timeline.is_complete(elapsed)
    }

    /// Which segment's arc currently sits under the pointer
    pub fn segment_under_pointer(&self, layout: &WheelLayout, rotation: f64) -> usize {
        layout.segment_at(POINTER_ANGLE - rotation.rem_euclid(TAU))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lixi_common::model::{Denomination, DenominationSet};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn weighted_set(weights: &[f64]) -> DenominationSet {
        DenominationSet::new(
            weights
                .iter()
                .enumerate()
                .map(|(i, &w)| Denomination::new(format!("seg-{}", i), 10, w, "#fff"))
                .collect(),
        )
    }

    fn default_round_config() -> RoundConfig {
        RoundConfig::default()
    }

    #[test]
    fn test_layout_spans_sum_to_full_circle() {
        let set = weighted_set(&[10.0, 2.0, 5.0, 3.0]);
        let layout = WheelLayout::new(&set);
        let sum: f64 = (0..layout.segment_count()).map(|i| layout.arc_span(i)).sum();
        assert!((sum - TAU).abs() < 1e-9);
    }

    #[test]
    fn test_layout_midpoints_inside_own_arc() {
        let set = weighted_set(&[1.0, 4.0, 2.0]);
        let layout = WheelLayout::new(&set);
        for i in 0..layout.segment_count() {
            assert_eq!(layout.segment_at(layout.arc_midpoint(i)), i);
        }
    }

    #[test]
    fn test_spin_lands_pointer_on_winner() {
        // Every set size 2..=16, several seeds: the final rotation must map
        // back to the winner's segment.
        let mut rng = StdRng::seed_from_u64(99);
        for size in 2usize..=16 {
            let weights: Vec<f64> = (0..size).map(|i| 1.0 + (i % 5) as f64).collect();
            let set = weighted_set(&weights);
            let layout = WheelLayout::new(&set);
            let config = default_round_config();

            for _ in 0..10 {
                let winner = rng.gen_range(0..size);
                let current = rng.gen_range(0.0..TAU * 4.0);
                let spin = WheelSpin::plan(&layout, winner, current, &config, &mut rng);
                let landed = spin.segment_under_pointer(&layout, spin.final_rotation());
                assert_eq!(
                    landed, winner,
                    "size {} winner {} landed {}",
                    size, winner, landed
                );
            }
        }
    }

    #[test]
    fn test_extra_turns_never_change_winner() {
        // 1000 randomized trials across the configured turn range
        let set = weighted_set(&[10.0, 2.0, 10.0, 5.0, 1.0]);
        let layout = WheelLayout::new(&set);
        let mut rng = StdRng::seed_from_u64(7);

        for trial in 0..1000 {
            let winner = rng.gen_range(0..set.len());
            let current = rng.gen_range(-TAU..TAU * 10.0);
            let turns = rng.gen_range(8..=13);
            let spin = WheelSpin::plan_exact(
                &layout,
                winner,
                current,
                turns,
                Duration::from_millis(7000),
                Easing::QuintOut,
            );
            assert_eq!(
                spin.segment_under_pointer(&layout, spin.final_rotation()),
                winner,
                "trial {} turns {}",
                trial,
                turns
            );
        }
    }

    #[test]
    fn test_rotation_monotonic_and_terminal() {
        let set = weighted_set(&[1.0, 1.0, 1.0]);
        let layout = WheelLayout::new(&set);
        let spin = WheelSpin::plan_exact(
            &layout,
            1,
            0.3,
            9,
            Duration::from_millis(7000),
            Easing::QuintOut,
        );

        let mut prev = spin.rotation_at(Duration::ZERO);
        assert!((prev - 0.3).abs() < 1e-9);

        for ms in (0..=8000).step_by(16) {
            let r = spin.rotation_at(Duration::from_millis(ms));
            assert!(r >= prev - 1e-9, "rotation regressed at {}ms", ms);
            prev = r;
        }

        // Exactly the final rotation at and beyond the duration
        let at_end = spin.rotation_at(spin.duration());
        assert!((at_end - spin.final_rotation()).abs() < 1e-9);
        assert!(!spin.is_complete(Duration::from_millis(6999)));
        assert!(spin.is_complete(Duration::from_millis(7000)));
    }

    #[test]
    fn test_final_rotation_always_moves_forward() {
        let set = weighted_set(&[2.0, 3.0]);
        let layout = WheelLayout::new(&set);
        let spin = WheelSpin::plan_exact(
            &layout,
            0,
            5.0,
            8,
            Duration::from_millis(7000),
            Easing::QuintOut,
        );
        assert!(spin.final_rotation() >= 5.0 + 8.0 * TAU);
        assert!(spin.final_rotation() < 5.0 + 9.0 * TAU + TAU);
    }

    #[test]
    fn test_boundary_crossings_decelerate() {
        // With a quintic ease-out, crossings must thin out over time: more
        // crossings in the first quarter than the last.
        let set = weighted_set(&[1.0; 8]);
        let layout = WheelLayout::new(&set);
        let spin = WheelSpin::plan_exact(
            &layout,
            3,
            0.0,
            12,
            Duration::from_millis(7000),
            Easing::QuintOut,
        );

        let mut crossings_per_quarter = [0usize; 4];
        let mut last_segment =
            spin.segment_under_pointer(&layout, spin.rotation_at(Duration::ZERO));
        for ms in (0..7000).step_by(4) {
            let rotation = spin.rotation_at(Duration::from_millis(ms));
            let segment = spin.segment_under_pointer(&layout, rotation);
            if segment != last_segment {
                crossings_per_quarter[(ms * 4 / 7000) as usize] += 1;
                last_segment = segment;
            }
        }

        assert!(crossings_per_quarter[0] > crossings_per_quarter[3]);
        // The wheel settles: the final segment is the winner's
        assert_eq!(last_segment, 3);
    }
}
