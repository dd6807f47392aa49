//! Frame accumulator state machine.
//!
//! Wiegand has no length field and no terminator. A frame ends only when
//! both data lines have gone silent for the bit timeout, so the accumulator
//! tracks one timeout flag per line and completes the frame when both are
//! set.
//!
//! # States
//!
//! - `Idle`: no frame open
//! - `Accumulating`: frame open, bits being appended
//!
//! # Transitions
//!
//! | State | Event | Result |
//! |-------|-------|--------|
//! | Idle | Edge(l) | Accumulating, one bit, watchdogs armed |
//! | Accumulating | Edge(l) | bit appended, flag of `l` cleared |
//! | Accumulating | Timeout(l) | flag of `l` set; both set → emit, Idle |
//! | Idle | Timeout(l) | ignored |
//!
//! The accumulator is a plain synchronous value. It performs no timing and
//! no I/O; the caller arms and disarms watchdogs according to the returned
//! [`Transition`].
//!
//! # Examples
//!
//! ```
//! use wiegand_core::{Line, LineEvent};
//! use wiegand_decoder::{FrameAccumulator, Transition};
//!
//! let mut acc = FrameAccumulator::new();
//! acc.handle(LineEvent::edge(Line::One));
//! acc.handle(LineEvent::edge(Line::Zero));
//! acc.handle(LineEvent::timeout(Line::Zero));
//!
//! match acc.handle(LineEvent::timeout(Line::One)) {
//!     Transition::FrameCompleted(codeword) => assert_eq!(codeword.bit_string(), "10"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use std::fmt;
use tracing::trace;
use wiegand_core::{Codeword, EventKind, Line, LineEvent};

/// Accumulator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameState {
    /// No frame open.
    Idle,
    /// Frame open.
    Accumulating,
}

impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameState::Idle => write!(f, "Idle"),
            FrameState::Accumulating => write!(f, "Accumulating"),
        }
    }
}

/// Outcome of feeding one event to the accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Timeout while idle. Nothing changed.
    Ignored,
    /// First edge of a frame. Both watchdogs must be armed.
    FrameStarted,
    /// Edge inside an open frame.
    BitAppended,
    /// Timeout inside an open frame; the other line is still live.
    TimeoutNoted,
    /// Both lines timed out. Both watchdogs must be disarmed.
    FrameCompleted(Codeword),
}

/// Per-line timeout flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeoutFlags(u8);

impl TimeoutFlags {
    const fn mask(line: Line) -> u8 {
        match line {
            Line::Zero => 0b01,
            Line::One => 0b10,
        }
    }

    pub fn set(&mut self, line: Line) {
        self.0 |= Self::mask(line);
    }

    pub fn clear(&mut self, line: Line) {
        self.0 &= !Self::mask(line);
    }

    #[must_use]
    pub fn is_set(self, line: Line) -> bool {
        self.0 & Self::mask(line) != 0
    }

    #[must_use]
    pub fn both(self) -> bool {
        self.0 == 0b11
    }
}

/// Reconstructs codewords from a serialized stream of line events.
///
/// # Thread Safety
///
/// The accumulator is not synchronized. Events from both lines must reach
/// [`handle`](Self::handle) one at a time, which the decoder guarantees by
/// owning the accumulator inside a single task.
#[derive(Debug, Clone, Default)]
pub struct FrameAccumulator {
    bits: Vec<bool>,
    flags: TimeoutFlags,
    open: bool,
}

impl FrameAccumulator {
    /// Create an idle accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> FrameState {
        if self.open {
            FrameState::Accumulating
        } else {
            FrameState::Idle
        }
    }

    /// Bits received in the open frame, 0 when idle.
    #[must_use]
    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }

    /// Timeout flags of the open frame.
    #[must_use]
    pub fn flags(&self) -> TimeoutFlags {
        self.flags
    }

    /// Feed one event. O(1) apart from the final codeword move.
    pub fn handle(&mut self, event: LineEvent) -> Transition {
        match (self.open, event.kind) {
            (false, EventKind::Edge) => {
                self.open = true;
                self.bits.clear();
                self.bits.push(event.line.bit());
                self.flags = TimeoutFlags::default();
                Transition::FrameStarted
            }
            (true, EventKind::Edge) => {
                self.bits.push(event.line.bit());
                // Only the edging line is known to be live again.
                self.flags.clear(event.line);
                trace!(bits = self.bits.len(), line = %event.line, "bit appended");
                Transition::BitAppended
            }
            (true, EventKind::Timeout) => {
                self.flags.set(event.line);
                if !self.flags.both() {
                    return Transition::TimeoutNoted;
                }
                self.open = false;
                self.flags = TimeoutFlags::default();
                Transition::FrameCompleted(Codeword::from_bits(std::mem::take(&mut self.bits)))
            }
            (false, EventKind::Timeout) => Transition::Ignored,
        }
    }

    /// Drop any open frame without emitting it.
    ///
    /// Returns the number of bits discarded.
    pub fn reset(&mut self) -> usize {
        let discarded = self.bits.len();
        self.bits.clear();
        self.flags = TimeoutFlags::default();
        self.open = false;
        discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn completed(t: Transition) -> Codeword {
        match t {
            Transition::FrameCompleted(codeword) => codeword,
            other => panic!("expected completed frame, got {other:?}"),
        }
    }

    #[test]
    fn test_new_accumulator_is_idle() {
        let acc = FrameAccumulator::new();
        assert_eq!(acc.state(), FrameState::Idle);
        assert_eq!(acc.bit_count(), 0);
    }

    #[rstest]
    #[case(Line::Zero, "0")]
    #[case(Line::One, "1")]
    fn test_first_edge_starts_frame(#[case] line: Line, #[case] expected: &str) {
        let mut acc = FrameAccumulator::new();
        assert_eq!(acc.handle(LineEvent::edge(line)), Transition::FrameStarted);
        assert_eq!(acc.state(), FrameState::Accumulating);
        assert_eq!(acc.bit_count(), 1);

        acc.handle(LineEvent::timeout(Line::Zero));
        let codeword = completed(acc.handle(LineEvent::timeout(Line::One)));
        assert_eq!(codeword.bit_string(), expected);
    }

    #[test]
    fn test_timeout_while_idle_is_ignored() {
        let mut acc = FrameAccumulator::new();
        assert_eq!(acc.handle(LineEvent::timeout(Line::Zero)), Transition::Ignored);
        assert_eq!(acc.handle(LineEvent::timeout(Line::One)), Transition::Ignored);
        assert_eq!(acc.state(), FrameState::Idle);
    }

    #[test]
    fn test_single_timeout_does_not_complete() {
        let mut acc = FrameAccumulator::new();
        acc.handle(LineEvent::edge(Line::One));
        assert_eq!(acc.handle(LineEvent::timeout(Line::One)), Transition::TimeoutNoted);
        assert_eq!(acc.handle(LineEvent::timeout(Line::One)), Transition::TimeoutNoted);
        assert_eq!(acc.state(), FrameState::Accumulating);
    }

    #[test]
    fn test_edge_clears_only_its_own_flag() {
        let mut acc = FrameAccumulator::new();
        acc.handle(LineEvent::edge(Line::One));
        acc.handle(LineEvent::timeout(Line::Zero));
        assert!(acc.flags().is_set(Line::Zero));

        acc.handle(LineEvent::edge(Line::One));
        assert!(acc.flags().is_set(Line::Zero));
        assert!(!acc.flags().is_set(Line::One));

        // DATA0 stays flagged, so a single DATA1 timeout ends the frame.
        let codeword = completed(acc.handle(LineEvent::timeout(Line::One)));
        assert_eq!(codeword.bit_string(), "11");
    }

    #[test]
    fn test_edge_on_flagged_line_reopens_it() {
        let mut acc = FrameAccumulator::new();
        acc.handle(LineEvent::edge(Line::Zero));
        acc.handle(LineEvent::timeout(Line::Zero));
        acc.handle(LineEvent::edge(Line::Zero));
        assert!(!acc.flags().is_set(Line::Zero));

        assert_eq!(acc.handle(LineEvent::timeout(Line::One)), Transition::TimeoutNoted);
        let codeword = completed(acc.handle(LineEvent::timeout(Line::Zero)));
        assert_eq!(codeword.bit_string(), "00");
    }

    #[test]
    fn test_bits_accumulate_msb_first() {
        let mut acc = FrameAccumulator::new();
        for bit in "1011001".chars() {
            let line = if bit == '1' { Line::One } else { Line::Zero };
            acc.handle(LineEvent::edge(line));
        }
        acc.handle(LineEvent::timeout(Line::One));
        let codeword = completed(acc.handle(LineEvent::timeout(Line::Zero)));
        assert_eq!(codeword.bit_count(), 7);
        assert_eq!(codeword.value(), Some(0b1011001));
    }

    #[test]
    fn test_completion_returns_to_idle_and_clears_state() {
        let mut acc = FrameAccumulator::new();
        acc.handle(LineEvent::edge(Line::One));
        acc.handle(LineEvent::timeout(Line::One));
        completed(acc.handle(LineEvent::timeout(Line::Zero)));

        assert_eq!(acc.state(), FrameState::Idle);
        assert_eq!(acc.bit_count(), 0);
        assert_eq!(acc.flags(), TimeoutFlags::default());

        // Late timeouts after completion are stale.
        assert_eq!(acc.handle(LineEvent::timeout(Line::One)), Transition::Ignored);
    }

    #[test]
    fn test_frames_longer_than_64_bits() {
        let mut acc = FrameAccumulator::new();
        for _ in 0..100 {
            acc.handle(LineEvent::edge(Line::One));
        }
        acc.handle(LineEvent::timeout(Line::Zero));
        let codeword = completed(acc.handle(LineEvent::timeout(Line::One)));
        assert_eq!(codeword.bit_count(), 100);
        assert!(codeword.bits().iter().all(|&b| b));
    }

    #[test]
    fn test_reset_discards_open_frame() {
        let mut acc = FrameAccumulator::new();
        acc.handle(LineEvent::edge(Line::One));
        acc.handle(LineEvent::edge(Line::Zero));

        assert_eq!(acc.reset(), 2);
        assert_eq!(acc.state(), FrameState::Idle);
        assert_eq!(acc.reset(), 0);
        assert_eq!(acc.handle(LineEvent::timeout(Line::Zero)), Transition::Ignored);
    }

    #[test]
    fn test_timeout_flags() {
        let mut flags = TimeoutFlags::default();
        assert!(!flags.both());
        flags.set(Line::Zero);
        flags.set(Line::Zero);
        assert!(flags.is_set(Line::Zero));
        assert!(!flags.both());
        flags.set(Line::One);
        assert!(flags.both());
        flags.clear(Line::Zero);
        assert!(!flags.is_set(Line::Zero));
        assert!(flags.is_set(Line::One));
    }
}
