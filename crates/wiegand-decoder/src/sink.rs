//! Completed-codeword delivery.
//!
//! The decoder hands every completed frame to a [`CodewordSink`]. Sinks run
//! inside the decoder task, one codeword at a time. A slow sink delays
//! delivery of later frames but does not change their boundaries: edges
//! queue up at the source with their timestamps and the decoder replays the
//! missed timeouts when it catches up. Slow work still belongs behind a
//! [`ChannelSink`].

use tokio::sync::mpsc;
use wiegand_core::Codeword;

/// Receiver of completed codewords.
///
/// Implemented for any `FnMut(Codeword)` closure.
///
/// # Examples
///
/// ```
/// use wiegand_core::Codeword;
/// use wiegand_decoder::CodewordSink;
///
/// let mut seen = Vec::new();
/// let mut sink = |codeword: Codeword| seen.push(codeword.bit_count());
/// sink.on_codeword(Codeword::from_bit_str("101").unwrap());
/// drop(sink);
/// assert_eq!(seen, vec![3]);
/// ```
pub trait CodewordSink: Send {
    fn on_codeword(&mut self, codeword: Codeword);
}

impl<F> CodewordSink for F
where
    F: FnMut(Codeword) + Send,
{
    fn on_codeword(&mut self, codeword: Codeword) {
        self(codeword)
    }
}

/// Sink that forwards codewords over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Codeword>,
}

impl ChannelSink {
    /// Create a sink and the receiver that gets its codewords.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Codeword>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl CodewordSink for ChannelSink {
    fn on_codeword(&mut self, codeword: Codeword) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.tx.send(codeword);
    }
}
