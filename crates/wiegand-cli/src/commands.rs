//! Subcommand implementations.

use crate::SimulateArgs;
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};
use wiegand_core::{Codeword, FieldResult, extract};
use wiegand_decoder::{ChannelSink, DecoderConfig, WiegandDecoder};
use wiegand_hardware::mock::MockGpio;
use wiegand_storage::{AccessDecision, AccessList, CardLog, CardRecord};

/// Slack on top of the bit timeout when waiting for a presented frame.
const FRAME_WAIT_SLACK: Duration = Duration::from_secs(1);

/// One presented card and what became of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SimulatedCard {
    pub id: u64,
    pub fields: FieldResult,
    pub decision: AccessDecision,
}

pub(crate) fn cmd_decode(bits: &str, json: bool) -> Result<()> {
    let codeword: Codeword = bits
        .parse()
        .with_context(|| format!("cannot decode {bits:?}"))?;
    let fields = extract(&codeword);

    if json {
        println!("{}", serde_json::to_string(&fields)?);
    } else {
        print_fields(&fields);
    }
    Ok(())
}

pub(crate) async fn cmd_simulate(args: SimulateArgs, json: bool) -> Result<()> {
    let cards = simulate(args).await?;

    for card in &cards {
        if json {
            println!("{}", serde_json::to_string(card)?);
        } else {
            print_fields(&card.fields);
            println!("Access: {} (logged as #{})", card.decision, card.id);
            println!();
        }
    }
    Ok(())
}

/// Run each codeword of `args` through the mock reader, the decoder, the
/// card log and the allow-list.
pub(crate) async fn simulate(args: SimulateArgs) -> Result<Vec<SimulatedCard>> {
    let codewords = args
        .bits
        .iter()
        .map(|bits| {
            bits.parse::<Codeword>()
                .with_context(|| format!("cannot present {bits:?}"))
        })
        .collect::<Result<Vec<_>>>()?;
    if let Some(empty) = codewords.iter().position(Codeword::is_empty) {
        bail!("codeword #{} has no bits", empty + 1);
    }

    let config = DecoderConfig::new(args.zero_pin, args.one_pin)
        .with_bit_timeout(Duration::from_millis(args.bit_timeout_ms));
    let access: AccessList = args.allow.iter().copied().collect();
    let mut log = CardLog::open(&args.log)
        .with_context(|| format!("cannot open card log {}", args.log.display()))?;

    let (gpio, mut reader) = MockGpio::with_name("Simulated reader".to_string());
    reader.set_pulse_interval(Duration::from_micros(args.pulse_interval_us));
    let (sink, mut frames) = ChannelSink::new();
    let mut decoder = WiegandDecoder::spawn(gpio, config, sink).await?;

    let mut cards = Vec::with_capacity(codewords.len());
    for codeword in &codewords {
        reader
            .present_codeword(config.zero_pin, config.one_pin, codeword)
            .await?;

        let frame = tokio::time::timeout(config.bit_timeout * 2 + FRAME_WAIT_SLACK, frames.recv())
            .await
            .context("no frame decoded before timeout")?
            .context("decoder stopped")?;
        if frame != *codeword {
            warn!(sent = %codeword, received = %frame, "decoded frame differs from presented codeword");
        }

        let fields = extract(&frame);
        let (returned, record) = append_blocking(log, fields.clone()).await?;
        log = returned;
        let decision = access.decide(&fields);
        info!(id = record.id, %decision, "{fields}");

        cards.push(SimulatedCard {
            id: record.id,
            fields,
            decision,
        });
    }

    if let Some(stats) = decoder.cancel().await {
        info!(
            frames = stats.frames_emitted,
            edges = stats.edges_seen,
            "decoder stopped"
        );
    }
    Ok(cards)
}

/// Append `fields` on the blocking pool, since every append syncs the file
/// to disk. The log is handed back so the next card can reuse it.
async fn append_blocking(mut log: CardLog, fields: FieldResult) -> Result<(CardLog, CardRecord)> {
    let (log, appended) = tokio::task::spawn_blocking(move || {
        let appended = log.append(&fields);
        (log, appended)
    })
    .await
    .context("card log writer panicked")?;
    Ok((log, appended?))
}

fn print_fields(fields: &FieldResult) {
    match fields.format {
        Some(format) => println!("Format: {format}"),
        None => println!("Format: unknown ({} bits)", fields.bit_count),
    }
    println!("Binary: {}", fields.raw_binary);
    println!("Hex: {}", fields.padded_hex);
    println!("FC: {}", fields.facility_code_display());
    println!("Card: {}", fields.card_number_display());
    println!("Card (no FC): {}", fields.card_number_no_facility_display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use wiegand_storage::Credential;

    fn args(dir: &TempDir, bits: &[&str]) -> SimulateArgs {
        SimulateArgs {
            bits: bits.iter().map(|b| b.to_string()).collect(),
            zero_pin: 17,
            one_pin: 18,
            bit_timeout_ms: 5,
            pulse_interval_us: 1000,
            log: dir.path().join("cards.csv"),
            allow: vec![Credential::new(42, 31337)],
        }
    }

    #[test]
    fn test_decode_accepts_bits() {
        assert!(cmd_decode("00111111101111010011010011", false).is_ok());
        assert!(cmd_decode("101", true).is_ok());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(cmd_decode("10x", false).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_logs_and_decides() {
        let dir = TempDir::new().unwrap();
        let args = args(
            &dir,
            &["00010101001111010011010011", "00111111101111010011010011", "101"],
        );
        let log_path: PathBuf = args.log.clone();

        let cards = simulate(args).await.unwrap();
        assert_eq!(cards.len(), 3);

        assert_eq!(cards[0].id, 1);
        assert_eq!(cards[0].fields.facility_code, Some(42));
        assert_eq!(cards[0].decision, AccessDecision::Granted);

        assert_eq!(cards[1].fields.facility_code, Some(127));
        assert_eq!(cards[1].decision, AccessDecision::Denied);

        assert_eq!(cards[2].fields.bit_count, 3);
        assert_eq!(cards[2].decision, AccessDecision::Denied);

        let records = CardLog::open(&log_path).unwrap().records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].id, 3);
        assert_eq!(records[2].fac_code, "NA");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_simulate_on_worker_threads_appends_in_order() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir, &["00010101001111010011010011", "101", "11"]);
        args.bit_timeout_ms = 20;
        let log_path = args.log.clone();

        let cards = simulate(args).await.unwrap();
        let ids: Vec<u64> = cards.iter().map(|card| card.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let records = CardLog::open(&log_path).unwrap().records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].fac_code, "42");
    }

    #[tokio::test]
    async fn test_simulate_rejects_invalid_bits() {
        let dir = TempDir::new().unwrap();
        assert!(simulate(args(&dir, &["01", "0b1"])).await.is_err());
        assert!(simulate(args(&dir, &[""])).await.is_err());
    }

    #[tokio::test]
    async fn test_simulate_rejects_shared_pin() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir, &["01"]);
        args.one_pin = args.zero_pin;
        assert!(simulate(args).await.is_err());
    }
}
