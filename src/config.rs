use crate::DEFAULT_ADDRESS;

/// Configuration settings for the NextPM sensor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// The address byte the sensor answers to.
    pub address: u8,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `address` - The address byte placed at the start of every command.
    ///
    /// # Returns
    ///
    /// A new `Config` instance for the given address.
    pub fn new(address: u8) -> Config {
        Config { address }
    }

    /// Sets the sensor address for the configuration.
    ///
    /// # Arguments
    ///
    /// * `address` - The address byte to set.
    ///
    /// # Returns
    ///
    /// The updated `Config` instance.
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }
}

/// Provides default configuration values for the NextPM sensor.
impl Default for Config {
    /// Returns the default configuration.
    ///
    /// The default configuration addresses the sensor as `0x81`.
    fn default() -> Config {
        Config {
            address: DEFAULT_ADDRESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_factory_address() {
        assert_eq!(Config::default().address, 0x81);
    }

    #[test]
    fn builder_overrides_address() {
        let config = Config::default().address(0x42);
        assert_eq!(config, Config::new(0x42));
    }
}
