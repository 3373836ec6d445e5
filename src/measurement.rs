use crate::{
    HUMIDITY_GAIN, HUMIDITY_OFFSET_PERCENT, PARTICULATE_FAST_OPCODE, PARTICULATE_MEDIUM_OPCODE,
    PARTICULATE_OFF_OPCODE, PARTICULATE_SLOW_OPCODE, TEMPERATURE_GAIN, TEMPERATURE_OFFSET_CELSIUS,
};

/// Particulate sampling modes supported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementMode {
    /// Not sampling.
    #[default]
    Off,
    /// 10 s average, refreshed every second.
    Fast,
    /// 60 s average, refreshed every 10 seconds.
    Medium,
    /// 900 s average, refreshed every minute.
    Slow,
}

impl MeasurementMode {
    pub const fn name(self) -> &'static str {
        match self {
            MeasurementMode::Off => "NOT SAMPLING",
            MeasurementMode::Fast => "SECOND",
            MeasurementMode::Medium => "TEN SECONDS",
            MeasurementMode::Slow => "SIXTY SECONDS",
        }
    }

    /// Opcode requesting particulate data averaged over this mode's period.
    pub const fn opcode(self) -> u8 {
        match self {
            MeasurementMode::Off => PARTICULATE_OFF_OPCODE,
            MeasurementMode::Fast => PARTICULATE_FAST_OPCODE,
            MeasurementMode::Medium => PARTICULATE_MEDIUM_OPCODE,
            MeasurementMode::Slow => PARTICULATE_SLOW_OPCODE,
        }
    }

    pub const fn averaging_period_secs(self) -> u16 {
        match self {
            MeasurementMode::Off => 0,
            MeasurementMode::Fast => 10,
            MeasurementMode::Medium => 60,
            MeasurementMode::Slow => 900,
        }
    }

    pub const fn transmit_period_secs(self) -> u16 {
        match self {
            MeasurementMode::Off => 0,
            MeasurementMode::Fast => 1,
            MeasurementMode::Medium => 10,
            MeasurementMode::Slow => 60,
        }
    }
}

/// One particulate channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Particle count, pcs/L.
    pub count: u16,
    /// Mass density in µg/m³, whole units only.
    pub density: f32,
}

impl Measurement {
    /// Decodes a four byte window: big-endian count, then big-endian density in tenths.
    ///
    /// The density is truncated to whole units; the tenths are dropped.
    pub fn from_window(window: [u8; 4]) -> Self {
        let count = u16::from_be_bytes([window[0], window[1]]);
        let density = u16::from_be_bytes([window[2], window[3]]) / 10;
        Self {
            count,
            density: f32::from(density),
        }
    }
}

/// The three particulate channels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParticulateData {
    /// PM1.0
    pub pm1: Measurement,
    /// PM2.5
    pub pm2_5: Measurement,
    /// PM10
    pub pm10: Measurement,
}

/// Temperature and humidity, raw and corrected.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Climate {
    /// Temperature as reported, °C.
    pub raw_temperature: f32,
    /// Relative humidity as reported, %.
    pub raw_humidity: f32,
    /// Corrected temperature, °C.
    pub temperature: f32,
    /// Corrected relative humidity, %.
    pub humidity: f32,
}

impl Climate {
    /// Converts raw readings in hundredths and applies the linear corrections.
    pub fn from_raw(temperature: u16, humidity: u16) -> Self {
        let raw_temperature = f32::from(temperature) / 100.0;
        let raw_humidity = f32::from(humidity) / 100.0;
        Self {
            raw_temperature,
            raw_humidity,
            temperature: TEMPERATURE_GAIN * raw_temperature + TEMPERATURE_OFFSET_CELSIUS,
            humidity: HUMIDITY_GAIN * raw_humidity + HUMIDITY_OFFSET_PERCENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn mode_descriptors() {
        assert_eq!(MeasurementMode::default(), MeasurementMode::Off);
        assert_eq!(MeasurementMode::Fast.opcode(), 0x11);
        assert_eq!(MeasurementMode::Medium.opcode(), 0x12);
        assert_eq!(MeasurementMode::Slow.opcode(), 0x13);
        assert_eq!(MeasurementMode::Off.opcode(), 0x00);
        assert_eq!(MeasurementMode::Slow.averaging_period_secs(), 900);
        assert_eq!(MeasurementMode::Medium.transmit_period_secs(), 10);
        assert_eq!(MeasurementMode::Fast.name(), "SECOND");
    }

    #[test]
    fn window_decodes_count_and_density() {
        let measurement = Measurement::from_window([0x01, 0x2C, 0x00, 0x64]);
        assert_eq!(measurement.count, 300);
        assert_eq!(measurement.density, 10.0);
    }

    #[test]
    fn density_truncates_tenths() {
        // 0x006B = 107 tenths; the 0.7 is dropped rather than rounded.
        let measurement = Measurement::from_window([0x00, 0x00, 0x00, 0x6B]);
        assert_eq!(measurement.density, 10.0);
        let measurement = Measurement::from_window([0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(measurement.count, 65535);
        assert_eq!(measurement.density, 6553.0);
    }

    #[test]
    fn climate_applies_corrections() {
        let climate = Climate::from_raw(2500, 5000);
        assert!(close(climate.raw_temperature, 25.0));
        assert!(close(climate.raw_humidity, 50.0));
        assert!(close(climate.temperature, 0.9754 * 25.0 - 4.2488));
        assert!(close(climate.humidity, 1.1768 * 50.0 - 4.727));
    }
}
