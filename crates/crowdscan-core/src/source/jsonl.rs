use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use serde::Deserialize;

use super::hex::decode_hex;
use super::{SourceError, UplinkEvent, UplinkSource};

/// One line of an uplink record file, as exported by a network server.
#[derive(Debug, Deserialize)]
struct UplinkRecord {
    #[serde(default)]
    received_at: Option<f64>,
    #[serde(default)]
    f_port: Option<u8>,
    payload_hex: String,
}

/// Reads uplink records from a JSON-lines file. Blank lines are skipped;
/// malformed records fail with the 1-based line number.
pub struct JsonlFileSource {
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl JsonlFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }
}

impl UplinkSource for JsonlFileSource {
    fn next_uplink(&mut self) -> Result<Option<UplinkEvent>, SourceError> {
        loop {
            let line = match self.lines.next() {
                Some(line) => line?,
                None => return Ok(None),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            let record: UplinkRecord =
                serde_json::from_str(&line).map_err(|err| SourceError::Record {
                    line: self.line_no,
                    message: format!("invalid uplink record: {err}"),
                })?;
            let payload = decode_hex(&record.payload_hex).map_err(|err| SourceError::Record {
                line: self.line_no,
                message: format!("invalid payload_hex: {err}"),
            })?;

            return Ok(Some(UplinkEvent {
                ts: record.received_at,
                port: record.f_port,
                payload,
            }));
        }
    }
}
