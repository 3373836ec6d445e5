use crate::{MAX_RESPONSE_LEN, STATE_BYTE_INDEX};

/// The most recent frame received from the sensor.
///
/// Bytes past [`MAX_RESPONSE_LEN`] are never stored. Positions past the
/// received length read as zero, since the buffer is cleared before each read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    bytes: [u8; MAX_RESPONSE_LEN],
    len: usize,
}

impl Response {
    pub const fn new() -> Self {
        Self {
            bytes: [0; MAX_RESPONSE_LEN],
            len: 0,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.bytes = [0; MAX_RESPONSE_LEN];
        self.len = 0;
    }

    // Appends a byte, returning false once the buffer is full.
    pub(crate) fn push(&mut self, byte: u8) -> bool {
        if self.len == MAX_RESPONSE_LEN {
            return false;
        }
        self.bytes[self.len] = byte;
        self.len += 1;
        true
    }

    /// The received bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Number of bytes received, at most [`MAX_RESPONSE_LEN`].
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing was received, as with a silent sensor.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the received bytes sum to zero modulo 256.
    pub fn checksum_valid(&self) -> bool {
        checksum_valid(self.as_bytes())
    }

    /// The state byte, always the third byte of a frame.
    pub fn state_byte(&self) -> u8 {
        self.bytes[STATE_BYTE_INDEX]
    }

    pub(crate) fn window(&self, offset: usize) -> [u8; 4] {
        [
            self.bytes[offset],
            self.bytes[offset + 1],
            self.bytes[offset + 2],
            self.bytes[offset + 3],
        ]
    }

    pub(crate) fn be_u16(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.bytes[offset], self.bytes[offset + 1]])
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates a frame: every byte, checksum included, must sum to zero modulo 256.
pub fn checksum_valid(frame: &[u8]) -> bool {
    frame.iter().fold(0u8, |sum, &b| sum.wrapping_add(b)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_from(bytes: &[u8]) -> Response {
        let mut response = Response::new();
        for &b in bytes {
            response.push(b);
        }
        response
    }

    #[test]
    fn checksum_accepts_zero_sum() {
        assert!(checksum_valid(&[0x81, 0x16, 0x00, 0x69]));
        assert!(checksum_valid(&[0xFF, 0x01]));
    }

    #[test]
    fn checksum_rejects_non_zero_sum() {
        assert!(!checksum_valid(&[0x81, 0x16, 0x00, 0x68]));
        assert!(!checksum_valid(&[0x01]));
    }

    #[test]
    fn checksum_matches_sum_for_every_trailing_byte() {
        for last in 0..=u8::MAX {
            let frame = [0x81, 0x16, 0x05, last];
            let sum = frame.iter().map(|&b| b as u32).sum::<u32>();
            assert_eq!(checksum_valid(&frame), sum % 256 == 0);
        }
    }

    #[test]
    fn push_stops_at_capacity() {
        let mut response = Response::new();
        for b in 0..MAX_RESPONSE_LEN as u8 {
            assert!(response.push(b));
        }
        assert!(!response.push(0xAA));
        assert_eq!(response.len(), MAX_RESPONSE_LEN);
        assert_eq!(response.as_bytes()[MAX_RESPONSE_LEN - 1], 15);
    }

    #[test]
    fn clear_zeroes_previous_frame() {
        let mut response = response_from(&[0x81, 0x16, 0x05, 0x64]);
        response.clear();
        assert!(response.is_empty());
        assert_eq!(response.state_byte(), 0);
    }

    #[test]
    fn reads_fields_big_endian() {
        let response = response_from(&[0x81, 0x14, 0x00, 0x09, 0xC4, 0x13, 0x88]);
        assert_eq!(response.state_byte(), 0x00);
        assert_eq!(response.be_u16(3), 2500);
        assert_eq!(response.be_u16(5), 5000);
        assert_eq!(response.window(3), [0x09, 0xC4, 0x13, 0x88]);
    }
}
