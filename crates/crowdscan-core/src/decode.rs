use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::codec::counter::decode_counter_payload;
use crate::source::{JsonlFileSource, SourceError, UplinkEvent, UplinkSource, encode_hex};
use crate::{DEFAULT_GENERATED_AT, DecodeSummary, Report, UplinkSummary, make_stub_report};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Decode every uplink in a JSON-lines record file into a report.
pub fn decode_uplink_file(path: &Path) -> Result<Report, DecodeError> {
    let source = JsonlFileSource::open(path)?;
    decode_uplink_source(path, source)
}

/// Decode every uplink yielded by `source` into a report. Uplinks keep file
/// order; `generated_at` mirrors the latest receive time so output stays
/// deterministic.
pub fn decode_uplink_source<S: UplinkSource>(
    path: &Path,
    mut source: S,
) -> Result<Report, DecodeError> {
    let mut uplinks = Vec::new();
    let mut warnings_total = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;

    while let Some(UplinkEvent { ts, port, payload }) = source.next_uplink()? {
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);
        let decoded = decode_counter_payload(&payload);
        warnings_total += decoded.warnings.len() as u64;
        uplinks.push(UplinkSummary {
            port,
            received_at: ts_to_rfc3339(ts),
            payload_hex: encode_hex(&payload),
            data: decoded.data,
            warnings: decoded.warnings,
        });
    }

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.summary = Some(DecodeSummary {
        uplinks_total: uplinks.len() as u64,
        warnings_total,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    });
    report.generated_at = report
        .summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.uplinks = uplinks;
    Ok(report)
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let ts = match ts {
        Some(ts) => ts,
        None => return,
    };
    match first {
        None => *first = Some(ts),
        Some(existing) => {
            if ts < *existing {
                *first = Some(ts);
            }
        }
    }
    match last {
        None => *last = Some(ts),
        Some(existing) => {
            if ts > *existing {
                *last = Some(ts);
            }
        }
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
