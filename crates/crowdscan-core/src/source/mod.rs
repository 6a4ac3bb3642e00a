mod hex;
mod jsonl;

pub use hex::{HexError, decode_hex, encode_hex};
pub use jsonl::JsonlFileSource;

use thiserror::Error;

/// One uplink as delivered by the transport layer: optional receive
/// timestamp (Unix seconds), optional LoRaWAN port, raw payload bytes.
#[derive(Debug, Clone)]
pub struct UplinkEvent {
    pub ts: Option<f64>,
    pub port: Option<u8>,
    pub payload: Vec<u8>,
}

pub trait UplinkSource {
    fn next_uplink(&mut self) -> Result<Option<UplinkEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("record error at line {line}: {message}")]
    Record { line: usize, message: String },
}
