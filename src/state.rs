use core::fmt;

use crate::CHECKSUM_ERROR_STATE;

/// Banner placed ahead of the flag labels when the state came from a corrupt frame.
pub const CHECKSUM_INVALID_LABEL: &str = "CHECKSUM INVALID - CHECK WIRING AND SENSOR";

/// One bit of the sensor state byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateFlag {
    Sleep,
    Degraded,
    NotReady,
    HighHumidity,
    TemperatureHumidityError,
    FanError,
    MemoryError,
    LaserError,
}

impl StateFlag {
    /// Every flag, in report order.
    pub const ALL: [StateFlag; 8] = [
        StateFlag::Sleep,
        StateFlag::Degraded,
        StateFlag::NotReady,
        StateFlag::HighHumidity,
        StateFlag::TemperatureHumidityError,
        StateFlag::FanError,
        StateFlag::MemoryError,
        StateFlag::LaserError,
    ];

    pub const fn mask(self) -> u8 {
        match self {
            StateFlag::Sleep => 0x01,
            StateFlag::Degraded => 0x02,
            StateFlag::NotReady => 0x04,
            StateFlag::HighHumidity => 0x08,
            StateFlag::TemperatureHumidityError => 0x10,
            StateFlag::FanError => 0x20,
            StateFlag::MemoryError => 0x40,
            StateFlag::LaserError => 0x80,
        }
    }

    pub const fn enabled_label(self) -> &'static str {
        match self {
            StateFlag::Sleep => "SLEEP ENABLED",
            StateFlag::Degraded => "SENSOR DEGRADED",
            StateFlag::NotReady => "SENSOR NOT READY",
            StateFlag::HighHumidity => "HUMIDITY EXCEEDS LIMITS",
            StateFlag::TemperatureHumidityError => "TEMP/HUMIDITY SENSOR ERROR",
            StateFlag::FanError => "FAN ERROR",
            StateFlag::MemoryError => "INTERNAL MEMORY ERROR",
            StateFlag::LaserError => "LASER ERROR",
        }
    }

    pub const fn disabled_label(self) -> &'static str {
        match self {
            StateFlag::Sleep => "SLEEP DISABLED",
            StateFlag::Degraded => "SENSOR OK",
            StateFlag::NotReady => "SENSOR READY",
            StateFlag::HighHumidity => "HUMIDITY OK",
            StateFlag::TemperatureHumidityError => "TEMP/HUMIDITY SENSOR OK",
            StateFlag::FanError => "FAN OK",
            StateFlag::MemoryError => "INTERNAL MEMORY OK",
            StateFlag::LaserError => "LASER OK",
        }
    }

    /// Whether this flag's bit is set in `state`.
    pub const fn is_set_in(self, state: u8) -> bool {
        self.mask() & state != 0
    }

    pub const fn label(self, enabled: bool) -> &'static str {
        if enabled {
            self.enabled_label()
        } else {
            self.disabled_label()
        }
    }
}

/// The decoded sensor state.
///
/// When the frame carrying the state failed its checksum the code is forced
/// to `0xFF`, so every flag reads as set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorState {
    code: u8,
    checksum_invalid: bool,
}

impl SensorState {
    /// Decodes `state_byte`, or the checksum error state when `checksum_valid` is false.
    pub fn decode(state_byte: u8, checksum_valid: bool) -> Self {
        if checksum_valid {
            Self {
                code: state_byte,
                checksum_invalid: false,
            }
        } else {
            Self {
                code: CHECKSUM_ERROR_STATE,
                checksum_invalid: true,
            }
        }
    }

    /// The effective state code.
    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn checksum_invalid(&self) -> bool {
        self.checksum_invalid
    }

    pub fn is_set(&self, flag: StateFlag) -> bool {
        flag.is_set_in(self.code)
    }

    pub fn is_sleeping(&self) -> bool {
        self.is_set(StateFlag::Sleep)
    }

    pub fn is_ready(&self) -> bool {
        !self.is_set(StateFlag::NotReady)
    }

    /// The flags currently set, in report order.
    pub fn active_flags(&self) -> impl Iterator<Item = StateFlag> + '_ {
        StateFlag::ALL
            .into_iter()
            .filter(move |flag| self.is_set(*flag))
    }

    /// Report listing every flag with its current label.
    pub fn all_status(&self) -> StatusReport {
        StatusReport {
            state: *self,
            active_only: false,
        }
    }

    /// Report listing only the labels of flags that are set.
    pub fn active_status(&self) -> StatusReport {
        StatusReport {
            state: *self,
            active_only: true,
        }
    }
}

impl Default for SensorState {
    fn default() -> Self {
        Self::decode(0x00, true)
    }
}

/// Human readable status, one label per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    state: SensorState,
    active_only: bool,
}

impl StatusReport {
    /// The report's labels in order, starting with the checksum banner when present.
    pub fn lines(&self) -> impl Iterator<Item = &'static str> + '_ {
        let banner = self
            .state
            .checksum_invalid
            .then_some(CHECKSUM_INVALID_LABEL);
        let flags = StateFlag::ALL.into_iter().filter_map(move |flag| {
            let enabled = self.state.is_set(flag);
            if self.active_only && !enabled {
                None
            } else {
                Some(flag.label(enabled))
            }
        });
        banner.into_iter().chain(flags)
    }

    pub fn is_empty(&self) -> bool {
        self.lines().next().is_none()
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;
    use std::vec::Vec;

    #[test]
    fn masks_cover_each_bit_once() {
        let combined = StateFlag::ALL.iter().fold(0u8, |acc, flag| {
            assert_eq!(acc & flag.mask(), 0);
            acc | flag.mask()
        });
        assert_eq!(combined, 0xFF);
    }

    #[test]
    fn decode_matches_bit_tests() {
        for code in 0..=u8::MAX {
            let state = SensorState::decode(code, true);
            assert_eq!(state.code(), code);
            for (bit, flag) in StateFlag::ALL.iter().enumerate() {
                assert_eq!(state.is_set(*flag), code & (1 << bit) != 0);
            }
            assert_eq!(state, SensorState::decode(code, true));
        }
    }

    #[test]
    fn idle_state_reports_every_label_as_ok() {
        let state = SensorState::decode(0x00, true);
        assert_eq!(
            state.all_status().to_string(),
            "SLEEP DISABLED\nSENSOR OK\nSENSOR READY\nHUMIDITY OK\n\
             TEMP/HUMIDITY SENSOR OK\nFAN OK\nINTERNAL MEMORY OK\nLASER OK\n"
        );
        assert!(state.active_status().is_empty());
        assert_eq!(state.active_status().to_string(), "");
    }

    #[test]
    fn active_report_only_lists_set_flags() {
        let state = SensorState::decode(0x05, true);
        assert!(state.is_sleeping());
        assert!(!state.is_ready());
        let lines: Vec<_> = state.active_status().lines().collect();
        assert_eq!(lines, ["SLEEP ENABLED", "SENSOR NOT READY"]);
        let flags: Vec<_> = state.active_flags().collect();
        assert_eq!(flags, [StateFlag::Sleep, StateFlag::NotReady]);
    }

    #[test]
    fn checksum_failure_forces_every_flag() {
        for code in [0x00, 0x05, 0x16, 0xFF] {
            let state = SensorState::decode(code, false);
            assert_eq!(state.code(), 0xFF);
            assert!(state.checksum_invalid());
            assert!(StateFlag::ALL.iter().all(|flag| state.is_set(*flag)));

            let all: Vec<_> = state.all_status().lines().collect();
            let active: Vec<_> = state.active_status().lines().collect();
            assert_eq!(all.len(), 9);
            assert_eq!(all, active);
            assert_eq!(all[0], CHECKSUM_INVALID_LABEL);
            assert_eq!(all[8], "LASER ERROR");
            assert!(state
                .active_status()
                .to_string()
                .starts_with("CHECKSUM INVALID"));
        }
    }
}
