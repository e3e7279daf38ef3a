//! Captured advertisement input for the replay tool.
//!
//! Each line holds one advertisement payload as hex, optionally preceded by
//! the advertiser address: `AA:BB:CC:DD:EE:FF 0201061AFF4C000215...`. Blank
//! lines and `#` comments are skipped.

use std::time::SystemTime;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Channel buffer size for packets read from the input.
pub const PACKET_CHANNEL_BUFFER_SIZE: usize = 100;

/// One advertisement payload as read from the input.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPacket {
    /// Advertiser address as given on the input line
    pub address: Option<String>,
    /// AD structure bytes
    pub payload: Vec<u8>,
    /// When the line was read
    pub timestamp: SystemTime,
}

/// Errors produced while reading captured advertisements.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("line {line}: invalid hex payload: {source}")]
    InvalidHex {
        line: usize,
        source: hex::FromHexError,
    },
    #[error("line {line}: expected at most an address and a payload")]
    TooManyFields { line: usize },
    #[error("I/O error: {0}")]
    Io(String),
}

/// Convenience alias for packets or input errors.
pub type PacketResult = Result<RawPacket, SourceError>;

/// Parse one input line. `Ok(None)` for blank and comment lines.
///
/// # Example
/// ```
/// use beacon_decoder::source::parse_line;
///
/// let packet = parse_line("AA:BB:CC:DD:EE:FF 020106", 1).unwrap().unwrap();
/// assert_eq!(packet.address.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
/// assert_eq!(packet.payload, vec![0x02, 0x01, 0x06]);
/// ```
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<RawPacket>, SourceError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let (address, payload) = match fields.as_slice() {
        [payload] => (None, *payload),
        [address, payload] => (Some(address.to_string()), *payload),
        _ => return Err(SourceError::TooManyFields { line: line_number }),
    };

    let payload = hex::decode(payload).map_err(|source| SourceError::InvalidHex {
        line: line_number,
        source,
    })?;

    Ok(Some(RawPacket {
        address,
        payload,
        timestamp: SystemTime::now(),
    }))
}

/// Read packets line by line from `reader` until end of input.
///
/// Parsed packets are sent through the returned channel. Unparseable lines
/// are sent as `Err` only when `verbose` is set.
pub fn read_packets<R>(reader: R, verbose: bool) -> mpsc::Receiver<PacketResult>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(PACKET_CHANNEL_BUFFER_SIZE);

    tokio::spawn(async move {
        let mut lines = reader.lines();
        let mut line_number = 0;

        loop {
            line_number += 1;
            let result = match lines.next_line().await {
                Ok(Some(line)) => parse_line(&line, line_number),
                Ok(None) => break,
                Err(e) => {
                    let _ = tx.send(Err(SourceError::Io(e.to_string()))).await;
                    break;
                }
            };

            let sent = match result {
                Ok(Some(packet)) => tx.send(Ok(packet)).await,
                Ok(None) => Ok(()),
                Err(e) if verbose => tx.send(Err(e)).await,
                Err(e) => {
                    log::debug!("{e}");
                    Ok(())
                }
            };
            if sent.is_err() {
                // receiver dropped
                break;
            }
        }
    });

    rx
}

/// Read packets from standard input.
pub fn read_stdin(verbose: bool) -> mpsc::Receiver<PacketResult> {
    read_packets(BufReader::new(tokio::io::stdin()), verbose)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload_only() {
        let packet = parse_line("  0201061aff  ", 1).unwrap().unwrap();
        assert_eq!(packet.address, None);
        assert_eq!(packet.payload, vec![0x02, 0x01, 0x06, 0x1A, 0xFF]);
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(parse_line("", 1), Ok(None));
        assert_eq!(parse_line("   ", 2), Ok(None));
        assert_eq!(parse_line("# captured in the sauna", 3), Ok(None));
    }

    #[test]
    fn test_parse_invalid_hex() {
        assert!(matches!(
            parse_line("02010", 7),
            Err(SourceError::InvalidHex { line: 7, .. })
        ));
        assert!(matches!(
            parse_line("AA:BB zz", 8),
            Err(SourceError::InvalidHex { line: 8, .. })
        ));
    }

    #[test]
    fn test_parse_too_many_fields() {
        assert_eq!(
            parse_line("AA:BB 02 01", 4),
            Err(SourceError::TooManyFields { line: 4 })
        );
    }

    #[test]
    fn test_error_display() {
        let err = SourceError::TooManyFields { line: 2 };
        assert_eq!(
            err.to_string(),
            "line 2: expected at most an address and a payload"
        );
    }

    #[tokio::test]
    async fn test_read_packets_from_reader() {
        let input = tokio_test::io::Builder::new()
            .read(b"# header\n020106\n")
            .read(b"AA:BB:CC:DD:EE:FF 03ff4c00\nnot-hex\n")
            .build();
        let mut rx = read_packets(BufReader::new(input), false);

        let first = rx.recv().await.unwrap().unwrap();
        assert_eq!(first.payload, vec![0x02, 0x01, 0x06]);

        let second = rx.recv().await.unwrap().unwrap();
        assert_eq!(second.address.as_deref(), Some("AA:BB:CC:DD:EE:FF"));

        // invalid line dropped when not verbose, then end of input
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_read_packets_verbose_reports_bad_lines() {
        let input = tokio_test::io::Builder::new().read(b"\nxyz\n").build();
        let mut rx = read_packets(BufReader::new(input), true);

        assert!(matches!(
            rx.recv().await,
            Some(Err(SourceError::InvalidHex { line: 2, .. }))
        ));
        assert!(rx.recv().await.is_none());
    }
}
