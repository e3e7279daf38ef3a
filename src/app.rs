//! Run loop of the `beacon-decoder` replay tool.
//!
//! Kept apart from CLI parsing and process exit codes so it can be tested
//! deterministically.

use crate::detection::Detection;
use crate::output::OutputFormatter;
use crate::output::influxdb::InfluxDbFormatter;
use crate::parser::decode_packet;
use crate::source::{PacketResult, RawPacket, SourceError};
use clap::Parser;
use std::future::Future;
use std::io;
use std::io::Write;
use std::pin::Pin;
use thiserror::Error;
use tokio::sync::mpsc;

/// Configuration for the run loop.
#[derive(Parser, Debug, Clone)]
#[command(author, about, version)]
pub struct Options {
    /// The name of the measurement in InfluxDB line protocol.
    #[arg(long, default_value = "beacon")]
    pub influxdb_measurement: String,

    /// Verbose output, print decode errors for unrecognized input
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Errors returned by the run loop.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Where captured advertisements come from.
pub trait PacketSource: Send + Sync {
    fn open(
        &self,
        verbose: bool,
    ) -> Pin<Box<dyn Future<Output = Result<mpsc::Receiver<PacketResult>, SourceError>> + Send + '_>>;
}

/// Reads advertisements from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

impl PacketSource for StdinSource {
    fn open(
        &self,
        verbose: bool,
    ) -> Pin<Box<dyn Future<Output = Result<mpsc::Receiver<PacketResult>, SourceError>> + Send + '_>>
    {
        Box::pin(async move { Ok(crate::source::read_stdin(verbose)) })
    }
}

fn write_detection(
    formatter: &dyn OutputFormatter,
    detection: &Detection,
    out: &mut dyn Write,
) -> io::Result<()> {
    let line = formatter.format(detection);
    writeln!(out, "{line}")
}

fn describe(packet: &RawPacket) -> String {
    match &packet.address {
        Some(address) => format!("{address} {}", hex::encode(&packet.payload)),
        None => hex::encode(&packet.payload),
    }
}

/// Run the replay loop, writing formatted output to `out` and verbose errors to `err`.
///
/// - Decoded records are formatted and written as one line each to `out`.
/// - Undecodable payloads and unreadable lines are written to `err` only when
///   `options.verbose` is true.
/// - An I/O failure while reading the input ends the loop with an error.
pub async fn run_with_io(
    options: Options,
    source: &dyn PacketSource,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), RunError> {
    let formatter = InfluxDbFormatter::new(options.influxdb_measurement);
    let mut packets = source.open(options.verbose).await?;

    while let Some(result) = packets.recv().await {
        match result {
            Ok(packet) => match decode_packet(&packet.payload) {
                Ok(record) => {
                    let detection = Detection {
                        address: packet.address,
                        timestamp: packet.timestamp,
                        record,
                    };
                    write_detection(&formatter, &detection, out)?;
                }
                Err(decode_err) => {
                    log::debug!("{}: {decode_err}", describe(&packet));
                    if options.verbose {
                        writeln!(err, "{}: {decode_err}", describe(&packet))?;
                    }
                }
            },
            Err(io_err @ SourceError::Io(_)) => return Err(io_err.into()),
            Err(source_err) => {
                if options.verbose {
                    writeln!(err, "{source_err}")?;
                }
            }
        }
    }

    Ok(())
}
