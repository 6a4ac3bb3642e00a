pub const BLE_COUNT_RANGE: std::ops::Range<usize> = 0..2;
pub const WIFI_COUNT_RANGE: std::ops::Range<usize> = 2..4;
pub const TOTAL_COUNT_RANGE: std::ops::Range<usize> = 4..6;
pub const CROWD_LEVEL_OFFSET: usize = 6;
pub const BEACON_FLAG_OFFSET: usize = 7;
pub const BEACON_RSSI_OFFSET: usize = 8;
pub const ENVIRONMENT_OFFSET: usize = 9;

/// Length of a complete uplink.
pub const FULL_LEN: usize = ENVIRONMENT_OFFSET + 1;
/// Minimum length carrying the counts and crowd level.
pub const CORE_LEN: usize = BEACON_FLAG_OFFSET;

/// Beacon flag value meaning "beacon detected"; any other value means no.
pub const BEACON_PRESENT: u8 = 0x01;

pub const DEFAULT_CROWD_LEVEL: u8 = 0;
pub const DEFAULT_BEACON_RSSI: i8 = -128;
pub const DEFAULT_ENVIRONMENT: u8 = 2;

pub const CROWD_LEVEL_LABELS: [&str; 3] = ["CALM", "MODERATE", "CROWDED"];
pub const ENVIRONMENT_LABELS: [&str; 3] = ["STATIC", "MOBILE", "UNKNOWN"];
pub const UNKNOWN_LABEL: &str = "UNKNOWN";
