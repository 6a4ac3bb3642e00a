use serde::{Deserialize, Serialize};

use super::layout;
use super::reader::CounterReader;

pub const WARN_TOO_SHORT: &str = "Payload too short: fewer than 7 bytes - unexpected payload";
pub const WARN_EXTENDED_DEFAULTED: &str =
    "Short payload detected (7 bytes) - extended fields defaulted";

/// Decoded people-counter reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterReading {
    pub ble_count: u16,
    pub wifi_count: u16,
    pub total_count: u16,
    pub crowd_level: u8,
    pub crowd_level_text: String,
    pub beacon_detected: bool,
    pub beacon_rssi: i8,
    pub environment_type: u8,
    pub environment_text: String,
}

/// Decode result: the reading plus zero or more advisory warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedPayload {
    pub data: CounterReading,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Decode a raw counter uplink.
///
/// Total function: truncated payloads take the defaults from `layout` and
/// attach at most one warning; no input can fail.
pub fn decode_counter_payload(payload: &[u8]) -> DecodedPayload {
    let reader = CounterReader::new(payload);

    let ble_count = reader.read_u16_be_or_zero(layout::BLE_COUNT_RANGE.clone());
    let wifi_count = reader.read_u16_be_or_zero(layout::WIFI_COUNT_RANGE.clone());
    let total_count = reader.read_u16_be_or_zero(layout::TOTAL_COUNT_RANGE.clone());
    let crowd_level = reader.read_u8_or(layout::CROWD_LEVEL_OFFSET, layout::DEFAULT_CROWD_LEVEL);
    let beacon_detected =
        reader.read_u8_or(layout::BEACON_FLAG_OFFSET, 0) == layout::BEACON_PRESENT;
    let beacon_rssi = reader.read_i8_or(layout::BEACON_RSSI_OFFSET, layout::DEFAULT_BEACON_RSSI);
    let environment_type =
        reader.read_u8_or(layout::ENVIRONMENT_OFFSET, layout::DEFAULT_ENVIRONMENT);

    let mut warnings = Vec::new();
    if reader.len() < layout::CORE_LEN {
        warnings.push(WARN_TOO_SHORT.to_string());
    } else if reader.len() < layout::FULL_LEN {
        warnings.push(WARN_EXTENDED_DEFAULTED.to_string());
    }

    DecodedPayload {
        data: CounterReading {
            ble_count,
            wifi_count,
            total_count,
            crowd_level,
            crowd_level_text: crowd_level_label(crowd_level).to_string(),
            beacon_detected,
            beacon_rssi,
            environment_type,
            environment_text: environment_label(environment_type).to_string(),
        },
        warnings,
    }
}

/// Label for a crowd-level code; codes outside the table map to `UNKNOWN`
/// while the numeric code passes through unchanged.
pub fn crowd_level_label(code: u8) -> &'static str {
    layout::CROWD_LEVEL_LABELS
        .get(usize::from(code))
        .copied()
        .unwrap_or(layout::UNKNOWN_LABEL)
}

pub fn environment_label(code: u8) -> &'static str {
    layout::ENVIRONMENT_LABELS
        .get(usize::from(code))
        .copied()
        .unwrap_or(layout::UNKNOWN_LABEL)
}

#[cfg(test)]
mod tests {
    use super::{
        WARN_EXTENDED_DEFAULTED, WARN_TOO_SHORT, crowd_level_label, decode_counter_payload,
    };

    #[test]
    fn decode_full_payload() {
        let decoded = decode_counter_payload(&[0, 1, 0, 2, 0, 3, 2, 1, 0xFF, 1]);
        let data = &decoded.data;
        assert_eq!(data.ble_count, 1);
        assert_eq!(data.wifi_count, 2);
        assert_eq!(data.total_count, 3);
        assert_eq!(data.crowd_level, 2);
        assert_eq!(data.crowd_level_text, "CROWDED");
        assert!(data.beacon_detected);
        assert_eq!(data.beacon_rssi, -1);
        assert_eq!(data.environment_type, 1);
        assert_eq!(data.environment_text, "MOBILE");
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn decode_seven_byte_payload_defaults_extended_fields() {
        let decoded = decode_counter_payload(&[0x00, 0x05, 0x00, 0x03, 0x00, 0x08, 0x01]);
        let data = &decoded.data;
        assert_eq!(data.ble_count, 5);
        assert_eq!(data.wifi_count, 3);
        assert_eq!(data.total_count, 8);
        assert_eq!(data.crowd_level, 1);
        assert_eq!(data.crowd_level_text, "MODERATE");
        assert!(!data.beacon_detected);
        assert_eq!(data.beacon_rssi, -128);
        assert_eq!(data.environment_type, 2);
        assert_eq!(data.environment_text, "UNKNOWN");
        assert_eq!(decoded.warnings, vec![WARN_EXTENDED_DEFAULTED.to_string()]);
    }

    #[test]
    fn decode_empty_payload_defaults_everything() {
        let decoded = decode_counter_payload(&[]);
        let data = &decoded.data;
        assert_eq!(data.ble_count, 0);
        assert_eq!(data.wifi_count, 0);
        assert_eq!(data.total_count, 0);
        assert_eq!(data.crowd_level, 0);
        assert_eq!(data.crowd_level_text, "CALM");
        assert!(!data.beacon_detected);
        assert_eq!(data.beacon_rssi, -128);
        assert_eq!(data.environment_type, 2);
        assert_eq!(data.environment_text, "UNKNOWN");
        assert_eq!(decoded.warnings, vec![WARN_TOO_SHORT.to_string()]);
    }

    #[test]
    fn decode_single_byte_yields_zero_counts() {
        // Second byte of the pair is missing: the whole field is 0, not a
        // partial shift of byte 0.
        let decoded = decode_counter_payload(&[0xAB]);
        assert_eq!(decoded.data.ble_count, 0);
        assert_eq!(decoded.warnings, vec![WARN_TOO_SHORT.to_string()]);
    }

    #[test]
    fn decode_never_panics_for_any_length() {
        let bytes: Vec<u8> = (0..16).map(|i| 0xF0 | i as u8).collect();
        for len in 0..=bytes.len() {
            let decoded = decode_counter_payload(&bytes[..len]);
            assert!(decoded.warnings.len() <= 1);
        }
    }

    #[test]
    fn warnings_are_mutually_exclusive() {
        assert_eq!(decode_counter_payload(&[0u8; 6]).warnings.len(), 1);
        assert_eq!(decode_counter_payload(&[0u8; 7]).warnings.len(), 1);
        assert_eq!(decode_counter_payload(&[0u8; 9]).warnings.len(), 1);
        assert!(decode_counter_payload(&[0u8; 10]).warnings.is_empty());
        assert!(decode_counter_payload(&[0u8; 12]).warnings.is_empty());
        assert_ne!(
            decode_counter_payload(&[0u8; 6]).warnings,
            decode_counter_payload(&[0u8; 7]).warnings
        );
    }

    #[test]
    fn out_of_table_crowd_level_passes_through() {
        let decoded = decode_counter_payload(&[0, 0, 0, 0, 0, 0, 5, 0, 0, 0]);
        assert_eq!(decoded.data.crowd_level, 5);
        assert_eq!(decoded.data.crowd_level_text, "UNKNOWN");
    }

    #[test]
    fn beacon_flag_must_equal_one() {
        let decoded = decode_counter_payload(&[0, 0, 0, 0, 0, 0, 0, 2, 0, 0]);
        assert!(!decoded.data.beacon_detected);
        let decoded = decode_counter_payload(&[0, 0, 0, 0, 0, 0, 0, 1, 0, 0]);
        assert!(decoded.data.beacon_detected);
    }

    #[test]
    fn decode_is_deterministic() {
        let payload = [0, 9, 0, 4, 0, 13, 1, 1, 0xC0, 0];
        assert_eq!(
            decode_counter_payload(&payload),
            decode_counter_payload(&payload)
        );
    }

    #[test]
    fn labels_cover_table_and_fallback() {
        assert_eq!(crowd_level_label(0), "CALM");
        assert_eq!(crowd_level_label(1), "MODERATE");
        assert_eq!(crowd_level_label(2), "CROWDED");
        assert_eq!(crowd_level_label(3), "UNKNOWN");
        assert_eq!(crowd_level_label(255), "UNKNOWN");
    }
}
