//! Shared helpers for decoder integration tests.

#![allow(dead_code)]

use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use wiegand_core::Codeword;
use wiegand_decoder::{ChannelSink, DecoderConfig, DecoderHandle, WiegandDecoder};
use wiegand_hardware::mock::{MockGpio, MockGpioHandle};

pub const ZERO_PIN: u8 = 17;
pub const ONE_PIN: u8 = 18;
pub const BIT_TIMEOUT: Duration = Duration::from_millis(5);

/// Decoder wired to a mock GPIO, plus the reader side and the codeword
/// receiver.
pub struct Harness {
    pub decoder: DecoderHandle,
    pub reader: MockGpioHandle,
    pub codewords: UnboundedReceiver<Codeword>,
}

pub async fn start() -> Harness {
    let (gpio, reader) = MockGpio::new();
    let (sink, codewords) = ChannelSink::new();
    let config = DecoderConfig::new(ZERO_PIN, ONE_PIN).with_bit_timeout(BIT_TIMEOUT);

    let decoder = WiegandDecoder::spawn(gpio, config, sink)
        .await
        .expect("decoder should attach to mock GPIO");

    Harness {
        decoder,
        reader,
        codewords,
    }
}

/// Wait for the next codeword, failing the test after a generous bound.
pub async fn next_codeword(codewords: &mut UnboundedReceiver<Codeword>) -> Codeword {
    tokio::time::timeout(Duration::from_secs(1), codewords.recv())
        .await
        .expect("timed out waiting for codeword")
        .expect("codeword channel closed")
}

pub fn bits(s: &str) -> Codeword {
    Codeword::from_bit_str(s).expect("valid bit string")
}
