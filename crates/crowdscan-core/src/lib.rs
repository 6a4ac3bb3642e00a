//! Crowdscan core library for offline uplink decoding.
//!
//! This crate implements the decoding pipeline used by the CLI: uplink
//! sources feed the decode layer, which drives the payload codec
//! (layout/reader/parser) and aggregates results into a deterministic report.
//! Decoding is byte-oriented and side-effect free; all I/O is isolated in
//! `source` modules. Wire-format conventions are captured in readers so
//! parsers stay minimal.
//!
//! Invariants:
//! - Payload decoding is total: every byte sequence, including the empty one,
//!   yields a complete reading plus advisory warnings.
//! - Report outputs are deterministic and stable across runs.
//! - Uplinks appear in the report in file order.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use crowdscan_core::decode_uplink_file;
//!
//! let report = decode_uplink_file(Path::new("uplinks.jsonl"))?;
//! println!("report version: {}", report.report_version);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod codec;
mod decode;
mod source;

pub use codec::counter::{
    CounterReading, DecodedPayload, WARN_EXTENDED_DEFAULTED, WARN_TOO_SHORT,
    decode_counter_payload,
};
pub use decode::{DecodeError, decode_uplink_file, decode_uplink_source};
pub use source::{HexError, JsonlFileSource, SourceError, UplinkEvent, UplinkSource, decode_hex};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no uplink carries a receive time.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Aggregated decode report with deterministic ordering.
///
/// # Examples
/// ```
/// use crowdscan_core::make_stub_report;
///
/// let report = make_stub_report("uplinks.jsonl", 123);
/// assert_eq!(report.report_version, crowdscan_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input file metadata.
    pub input: InputInfo,

    /// Aggregate decode summary (absent only in stub reports).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<DecodeSummary>,
    /// Per-uplink decode results in file order.
    pub uplinks: Vec<UplinkSummary>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "crowdscan").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input file metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Aggregate counters over all decoded uplinks (timestamps may be absent).
///
/// # Examples
/// ```
/// use crowdscan_core::DecodeSummary;
///
/// let summary = DecodeSummary {
///     uplinks_total: 10,
///     warnings_total: 0,
///     time_start: None,
///     time_end: None,
/// };
/// assert_eq!(summary.uplinks_total, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeSummary {
    /// Total uplink records decoded.
    pub uplinks_total: u64,
    /// Total advisory warnings across all uplinks.
    pub warnings_total: u64,
    /// RFC3339 timestamp of the earliest uplink (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the latest uplink (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Decode result for a single uplink record.
///
/// The `data`/`warnings` pair is the contract consumed by network-server
/// integrations; `port` and `received_at` are carried through from the
/// transport envelope and never influence decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UplinkSummary {
    /// LoRaWAN application port, when present in the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u8>,
    /// RFC3339 receive timestamp, when present in the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<String>,
    /// Raw payload bytes, lowercase hex.
    pub payload_hex: String,
    /// Decoded sensor reading.
    pub data: CounterReading,
    /// Advisory warnings attached to this decode (at most one today).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use crowdscan_core::make_stub_report;
///
/// let report = make_stub_report("uplinks.jsonl", 123);
/// assert!(report.uplinks.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "crowdscan".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        summary: None,
        uplinks: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_omits_optional_fields_when_none() {
        let decoded = decode_counter_payload(&[0, 1, 0, 2, 0, 3, 2, 1, 0xFF, 1]);
        let report = Report {
            report_version: REPORT_VERSION,
            tool: ToolInfo {
                name: "crowdscan".to_string(),
                version: "0.1.0".to_string(),
            },
            generated_at: DEFAULT_GENERATED_AT.to_string(),
            input: InputInfo {
                path: "uplinks.jsonl".to_string(),
                bytes: 1,
            },
            summary: Some(DecodeSummary {
                uplinks_total: 1,
                warnings_total: 0,
                time_start: None,
                time_end: None,
            }),
            uplinks: vec![UplinkSummary {
                port: None,
                received_at: None,
                payload_hex: "0001000200030201ff01".to_string(),
                data: decoded.data,
                warnings: decoded.warnings,
            }],
        };

        let value = serde_json::to_value(&report).expect("report json");
        let summary = value.get("summary").expect("summary");
        assert!(summary.get("time_start").is_none());
        assert!(summary.get("time_end").is_none());

        let uplink = &value["uplinks"][0];
        assert!(uplink.get("port").is_none());
        assert!(uplink.get("received_at").is_none());
        assert!(uplink.get("warnings").is_none());
        assert_eq!(uplink["data"]["crowd_level_text"], "CROWDED");
    }

    #[test]
    fn stub_report_roundtrips_through_json() {
        let report = make_stub_report("uplinks.jsonl", 42);
        let json = serde_json::to_string(&report).expect("serialize stub");
        let parsed: Report = serde_json::from_str(&json).expect("parse stub");
        assert_eq!(parsed.input.bytes, 42);
        assert_eq!(parsed.generated_at, DEFAULT_GENERATED_AT);
    }
}
