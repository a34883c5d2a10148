//! Envelope board animation
//!
//! The discrete variant: a grid of face-down envelopes, each carrying a
//! cosmetic lucky word. On every reset the board re-deals its labels and
//! runs a short shuffle phase; a pick shakes the chosen slot for a fixed
//! anticipation delay before flipping it face-up on the winner.
//!
//! Two deliberately uncorrelated random processes are at work: the label
//! deal (Fisher-Yates over a small fixed word pool, every word represented
//! at least once) and the weighted winner draw. The pre-drawn winner always
//! lands in whatever slot was picked; the label the user saw on it carries
//! no information about the prize.

use rand::Rng;

use crate::error::{Error, Result};

/// Fixed pool of cosmetic envelope words
pub const LUCKY_WORDS: &[&str] = &["Tâm", "Phúc", "Trí", "Tài", "Lộc", "Bình an"];

/// Board lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    /// Re-deal animation running; picks rejected
    Shuffling,

    /// Face-down and accepting picks
    Ready,

    /// A slot was picked and is shaking; reveal pending
    Opening { slot: usize },

    /// The picked slot is face-up showing the winner
    Revealed { slot: usize },
}

/// The envelope grid and its phase
#[derive(Debug, Clone)]
pub struct EnvelopeBoard {
    labels: Vec<String>,
    phase: BoardPhase,
}

impl EnvelopeBoard {
    /// Deal a fresh board of `count` slots, starting in the shuffle phase
    pub fn deal<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        Self {
            labels: deal_labels(count, rng),
            phase: BoardPhase::Shuffling,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.labels.len()
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    /// Cosmetic labels in slot order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Shuffle animation finished; board accepts picks
    pub fn finish_shuffle(&mut self) {
        if self.phase == BoardPhase::Shuffling {
            self.phase = BoardPhase::Ready;
        }
    }

    /// Pick a slot
    ///
    /// Only valid while `Ready`; any other phase (still shuffling, already
    /// opening, already revealed) is an [`Error::InvalidState`] the caller
    /// downgrades to a no-op.
    pub fn pick(&mut self, slot: usize) -> Result<()> {
        if slot >= self.labels.len() {
            return Err(Error::InvalidState(format!(
                "slot {} out of range (board has {})",
                slot,
                self.labels.len()
            )));
        }
        match self.phase {
            BoardPhase::Ready => {
                self.phase = BoardPhase::Opening { slot };
                Ok(())
            }
            phase => Err(Error::InvalidState(format!(
                "pick rejected in phase {:?}",
                phase
            ))),
        }
    }

    /// Flip the opening slot face-up; returns the revealed slot index
    pub fn reveal(&mut self) -> Result<usize> {
        match self.phase {
            BoardPhase::Opening { slot } => {
                self.phase = BoardPhase::Revealed { slot };
                Ok(slot)
            }
            phase => Err(Error::InvalidState(format!(
                "reveal rejected in phase {:?}",
                phase
            ))),
        }
    }

    /// Re-deal labels and return to the shuffle phase
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.labels = deal_labels(self.labels.len(), rng);
        self.phase = BoardPhase::Shuffling;
    }
}

/// Deal cosmetic labels: every pool word at least once (space permitting),
/// remaining slots filled uniformly, then Fisher-Yates shuffled
fn deal_labels<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<String> {
    let mut labels: Vec<String> = LUCKY_WORDS
        .iter()
        .take(count)
        .map(|w| w.to_string())
        .collect();

    while labels.len() < count {
        let word = LUCKY_WORDS[rng.gen_range(0..LUCKY_WORDS.len())];
        labels.push(word.to_string());
    }

    // Fisher-Yates
    for i in (1..labels.len()).rev() {
        let j = rng.gen_range(0..=i);
        labels.swap(i, j);
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_deal_has_every_word_once_space_permitting() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let board = EnvelopeBoard::deal(8, &mut rng);
            assert_eq!(board.slot_count(), 8);
            for word in LUCKY_WORDS {
                assert!(
                    board.labels().iter().any(|l| l == word),
                    "word {} missing from deal",
                    word
                );
            }
        }
    }

    #[test]
    fn test_small_board_truncates_pool() {
        let mut rng = StdRng::seed_from_u64(5);
        let board = EnvelopeBoard::deal(4, &mut rng);
        assert_eq!(board.slot_count(), 4);
        for label in board.labels() {
            assert!(LUCKY_WORDS.contains(&label.as_str()));
        }
    }

    #[test]
    fn test_phase_lifecycle() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut board = EnvelopeBoard::deal(8, &mut rng);
        assert_eq!(board.phase(), BoardPhase::Shuffling);

        // Picks rejected during shuffle
        assert!(board.pick(0).is_err());

        board.finish_shuffle();
        assert_eq!(board.phase(), BoardPhase::Ready);

        board.pick(3).unwrap();
        assert_eq!(board.phase(), BoardPhase::Opening { slot: 3 });

        // Second pick rejected while opening
        assert!(board.pick(5).is_err());

        let slot = board.reveal().unwrap();
        assert_eq!(slot, 3);
        assert_eq!(board.phase(), BoardPhase::Revealed { slot: 3 });

        // Reveal is one-shot
        assert!(board.reveal().is_err());

        board.reset(&mut rng);
        assert_eq!(board.phase(), BoardPhase::Shuffling);
    }

    #[test]
    fn test_pick_out_of_range_rejected() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut board = EnvelopeBoard::deal(8, &mut rng);
        board.finish_shuffle();
        assert!(board.pick(8).is_err());
        assert_eq!(board.phase(), BoardPhase::Ready);
    }

    #[test]
    fn test_reset_redeal_changes_order_eventually() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut board = EnvelopeBoard::deal(8, &mut rng);
        let before = board.labels().to_vec();

        let mut changed = false;
        for _ in 0..10 {
            board.reset(&mut rng);
            if board.labels() != before.as_slice() {
                changed = true;
                break;
            }
        }
        assert!(changed, "ten re-deals never changed the label order");
    }
}
