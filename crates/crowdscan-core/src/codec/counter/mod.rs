//! People-counter uplink decoding.
//!
//! The parser decodes the fixed 10-byte uplink a crowd-sensing device
//! transmits over LoRaWAN: Bluetooth/WiFi device counts, a coarse crowd
//! level, optional beacon-detection fields, and an environment class.
//! Truncated payloads never fail: missing fields take the defaults defined
//! in `layout`, and the decode attaches an advisory warning instead.
//!
//! Byte offsets and default values live in `layout`, bounds-checked access
//! conventions in `reader`.

pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::{
    CounterReading, DecodedPayload, WARN_EXTENDED_DEFAULTED, WARN_TOO_SHORT,
    decode_counter_payload,
};
