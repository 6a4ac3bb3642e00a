use thiserror::Error;

#[derive(Debug, Error)]
pub enum HexError {
    #[error("odd hex length: {0}")]
    OddLength(usize),
    #[error("non-hex character '{0}'")]
    InvalidDigit(char),
}

/// Decode a hex string (case-insensitive, surrounding whitespace ignored)
/// into bytes. The empty string decodes to an empty payload.
pub fn decode_hex(hex: &str) -> Result<Vec<u8>, HexError> {
    let hex = hex.trim();
    let digits = hex.as_bytes();
    if digits.len() % 2 != 0 {
        return Err(HexError::OddLength(digits.len()));
    }

    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks_exact(2) {
        let hi = hex_digit(pair[0])?;
        let lo = hex_digit(pair[1])?;
        bytes.push((hi << 4) | lo);
    }
    Ok(bytes)
}

/// Format bytes as lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_digit(digit: u8) -> Result<u8, HexError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(HexError::InvalidDigit(char::from(digit))),
    }
}
