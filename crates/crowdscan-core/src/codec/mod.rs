//! Payload codec modules.
//!
//! Each codec follows a layered structure:
//! - `layout`: byte offsets, ranges, and defaults (source of truth)
//! - `reader`: safe byte access and defaulting conventions
//! - `parser`: domain-level decoding (no direct byte indexing)
//!
//! Parsers are pure and contain no I/O; sources and the decode layer handle
//! file access and aggregation. The counter codec is total: it has no error
//! type because every input, however short, decodes to a complete reading.

pub mod counter;
