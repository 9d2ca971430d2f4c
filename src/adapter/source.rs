//! Transport seam between the poller and whatever produces adapter
//! transfers.
//!
//! The real USB/HID transport lives outside this crate; the poller only
//! needs something that hands it raw transfers. [`ReportSource`] is that
//! seam, with an idle implementation for running without hardware and a
//! capture-replay implementation for development.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::adapter::report::{AdapterFrame, FrameError, ADAPTER_FRAME_LEN};

/// Errors raised by a report source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read capture: {0}")]
    Io(#[from] std::io::Error),

    #[error("capture line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("capture line {line}: {source}")]
    Frame {
        line: usize,
        #[source]
        source: FrameError,
    },
}

/// Producer of raw adapter transfers.
///
/// `read_frame` is called once per poll tick. `Ok(None)` means no new
/// transfer arrived this tick and the previously published state stands;
/// an error is a transport failure and the poller degrades the published
/// state to disconnected defaults.
pub trait ReportSource: Send + 'static {
    fn read_frame(&mut self) -> Result<Option<AdapterFrame>, SourceError>;
}

/// Source for running without an adapter attached.
///
/// Never yields a transfer, so every port reads as a default snapshot.
#[derive(Debug, Default)]
pub struct IdleSource;

impl ReportSource for IdleSource {
    fn read_frame(&mut self) -> Result<Option<AdapterFrame>, SourceError> {
        Ok(None)
    }
}

/// Replays adapter transfers recorded as hex lines, one transfer per line.
///
/// Blank lines and `#` comments are skipped. The capture is validated
/// up front so a bad file fails at load time, not mid-replay. Once the
/// capture runs out the source goes quiet and the last published state
/// stands.
#[derive(Debug)]
pub struct ReplaySource {
    frames: Vec<AdapterFrame>,
    cursor: usize,
}

impl ReplaySource {
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path)?;
        let source = Self::from_str(&text)?;
        info!(
            "Loaded capture {} with {} transfers",
            path.display(),
            source.frames.len()
        );
        Ok(source)
    }

    fn from_str(text: &str) -> Result<Self, SourceError> {
        let mut frames = Vec::new();

        for (idx, raw_line) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw_line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let payload = parse_hex_line(trimmed, line)?;
            let frame = AdapterFrame::parse(&payload)
                .map_err(|source| SourceError::Frame { line, source })?;
            frames.push(frame);
        }

        Ok(Self { frames, cursor: 0 })
    }

    /// Transfers remaining in the capture.
    pub fn remaining(&self) -> usize {
        self.frames.len() - self.cursor
    }
}

impl ReportSource for ReplaySource {
    fn read_frame(&mut self) -> Result<Option<AdapterFrame>, SourceError> {
        match self.frames.get(self.cursor) {
            Some(frame) => {
                self.cursor += 1;
                if self.cursor == self.frames.len() {
                    debug!("Capture exhausted after {} transfers", self.cursor);
                }
                Ok(Some(*frame))
            }
            None => Ok(None),
        }
    }
}

fn parse_hex_line(line: &str, line_no: usize) -> Result<Vec<u8>, SourceError> {
    if line.len() % 2 != 0 {
        return Err(SourceError::Malformed {
            line: line_no,
            reason: format!("odd number of hex digits ({})", line.len()),
        });
    }
    if line.len() != ADAPTER_FRAME_LEN * 2 {
        return Err(SourceError::Malformed {
            line: line_no,
            reason: format!(
                "expected {} hex digits, got {}",
                ADAPTER_FRAME_LEN * 2,
                line.len()
            ),
        });
    }

    line.as_bytes()
        .chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).map_err(|_| SourceError::Malformed {
                line: line_no,
                reason: "non-ascii byte".to_string(),
            })?;
            u8::from_str_radix(text, 16).map_err(|_| SourceError::Malformed {
                line: line_no,
                reason: format!("invalid hex pair {text:?}"),
            })
        })
        .collect()
}
