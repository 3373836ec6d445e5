use crate::COMMAND_LEN;

/// A three byte command frame: address, opcode and checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    bytes: [u8; COMMAND_LEN],
}

impl Command {
    /// Builds the frame for `opcode`, addressed to `address`.
    ///
    /// The checksum is chosen so that the three bytes sum to zero modulo 256.
    pub fn new(address: u8, opcode: u8) -> Self {
        Self {
            bytes: [address, opcode, checksum(address, opcode)],
        }
    }

    /// The address byte, first on the wire.
    pub fn address(&self) -> u8 {
        self.bytes[0]
    }

    /// The opcode byte, second on the wire.
    pub fn opcode(&self) -> u8 {
        self.bytes[1]
    }

    /// The checksum byte, last on the wire.
    pub fn checksum(&self) -> u8 {
        self.bytes[2]
    }

    /// The frame as it goes on the wire.
    pub fn as_bytes(&self) -> &[u8; COMMAND_LEN] {
        &self.bytes
    }
}

// (0x100 - opcode - address) mod 0x100
fn checksum(address: u8, opcode: u8) -> u8 {
    0u8.wrapping_sub(opcode).wrapping_sub(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_query_frame() {
        let command = Command::new(0x81, 0x16);
        assert_eq!(command.as_bytes(), &[0x81, 0x16, 0x69]);
    }

    #[test]
    fn checksum_wraps_to_zero() {
        let command = Command::new(0x80, 0x80);
        assert_eq!(command.checksum(), 0x00);
        let command = Command::new(0x00, 0x00);
        assert_eq!(command.checksum(), 0x00);
    }

    #[test]
    fn every_frame_sums_to_zero() {
        for address in 0..=u8::MAX {
            for opcode in 0..=u8::MAX {
                let sum = Command::new(address, opcode)
                    .as_bytes()
                    .iter()
                    .fold(0u8, |sum, &b| sum.wrapping_add(b));
                assert_eq!(sum, 0, "address {:02X} opcode {:02X}", address, opcode);
            }
        }
    }
}
