use core::fmt;

/// Transport failures. Protocol failures (bad checksum, busy sensor) are
/// reported through flags on the driver instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The serial channel rejected a command byte or the flush after it.
    WriteFailure,
    /// The serial channel failed while draining a response.
    ReadFailure,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WriteFailure => f.write_str("failed to write command to the sensor"),
            Error::ReadFailure => f.write_str("failed to read response from the sensor"),
        }
    }
}
