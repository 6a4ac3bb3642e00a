pub struct CounterReader<'a> {
    payload: &'a [u8],
}

impl<'a> CounterReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Big-endian u16. The field decodes only when both bytes are
    /// addressable; a pair truncated after its first byte yields `0`, never
    /// a partial value.
    pub fn read_u16_be_or_zero(&self, range: std::ops::Range<usize>) -> u16 {
        match self.payload.get(range) {
            Some(bytes) if bytes.len() == 2 => u16::from_be_bytes([bytes[0], bytes[1]]),
            _ => 0,
        }
    }

    pub fn read_u8_or(&self, offset: usize, default: u8) -> u8 {
        self.payload.get(offset).copied().unwrap_or(default)
    }

    /// Signed byte with explicit two's-complement conversion; `default` when
    /// the offset is out of range.
    pub fn read_i8_or(&self, offset: usize, default: i8) -> i8 {
        match self.payload.get(offset) {
            Some(&byte) => sign_extend(byte),
            None => default,
        }
    }
}

fn sign_extend(byte: u8) -> i8 {
    let value = i16::from(byte);
    if value > 127 {
        (value - 256) as i8
    } else {
        value as i8
    }
}
