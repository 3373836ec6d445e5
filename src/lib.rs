#![cfg_attr(not(test), no_std)]

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use log::{debug, warn};

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

mod command;
pub use command::*;

mod response;
pub use response::*;

mod state;
pub use state::*;

mod measurement;
pub use measurement::*;

/// Represents a NextPM particulate matter sensor.
///
/// This struct owns the serial channel and a delay provider and keeps the
/// last known sensor state, measurements, and protocol flags. Every query
/// blocks for the settle time the sensor needs between a command and its
/// response.
///
/// # Type Parameters
///
/// * `Serial`: The serial interface used to talk to the sensor, already
///   opened at [`BAUD_RATE`] 8-N-1. It must implement `embedded_io::Read`,
///   `embedded_io::ReadReady` and `embedded_io::Write`.
/// * `Delay`: A blocking `embedded_hal::delay::DelayNs` provider.
pub struct NextPm<Serial, Delay> {
    serial: Serial,
    delay: Delay,
    config: Config,
    response: Response,
    state: SensorState,
    checksum_error: bool,
    no_measurement_available: bool,
    mode: MeasurementMode,
    particulate: ParticulateData,
    climate: Climate,
}

impl<S, D> NextPm<S, D>
where
    S: Read + ReadReady + Write,
    D: DelayNs,
{
    /// Creates a new `NextPm` sensor instance.
    ///
    /// # Arguments
    ///
    /// * `serial`: The serial interface for communication with the sensor.
    /// * `delay`: The delay provider used for settle times.
    /// * `config`: The sensor configuration.
    ///
    /// # Returns
    ///
    /// A new `NextPm` instance. No bytes are exchanged until [`NextPm::init`] is called.
    pub fn new(serial: S, delay: D, config: Config) -> Self {
        Self {
            serial,
            delay,
            config,
            response: Response::new(),
            state: SensorState::default(),
            checksum_error: false,
            no_measurement_available: true,
            mode: MeasurementMode::Off,
            particulate: ParticulateData::default(),
            climate: Climate::default(),
        }
    }

    /// Initializes the session and reads the sensor state for the first time.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the state response passed its checksum.
    /// * `Ok(false)` if it did not; the state then reads as [`CHECKSUM_ERROR_STATE`].
    /// * `Err(Error)` if the serial channel failed.
    pub fn init(&mut self) -> Result<bool, Error> {
        self.mode = MeasurementMode::Off;
        self.delay.delay_ms(SETTLE_DELAY_MS);
        self.refresh_state()?;

        debug!(
            "NextPM init sequence complete, state {:02X}",
            self.state.code()
        );
        Ok(!self.checksum_error)
    }

    /// Puts the sensor to sleep, unless it already sleeps.
    ///
    /// The sensor answers the toggle with its new state. When that answer is
    /// corrupt the state is queried again instead.
    pub fn sleep(&mut self) -> Result<(), Error> {
        self.refresh_state()?;

        if self.state.is_sleeping() {
            debug!("Sensor already asleep");
            return Ok(());
        }

        debug!("Putting sensor to sleep");
        if self.query(SLEEP_WAKE_OPCODE, SETTLE_DELAY_MS)? {
            self.update_state(self.response.state_byte());
        } else {
            self.refresh_state()?;
        }
        Ok(())
    }

    /// Wakes the sensor up, unless it is already awake.
    ///
    /// The fan needs time to spin up, so this waits [`WAKE_DELAY_MS`], throws
    /// the toggle response away and queries the state again.
    pub fn wake(&mut self) -> Result<(), Error> {
        self.refresh_state()?;

        if !self.state.is_sleeping() {
            debug!("Sensor already awake");
            return Ok(());
        }

        debug!("Waking sensor up");
        self.send_command(SLEEP_WAKE_OPCODE)?;
        self.delay.delay_ms(WAKE_DELAY_MS);
        // Discard the toggle reply so it cannot prefix the next state frame.
        self.read_response()?;
        self.refresh_state()
    }

    /// Requests particulate data averaged according to `mode`.
    ///
    /// Nothing is requested while the sensor is not ready, asleep, or reports
    /// a laser error. Measurements are left untouched when the response fails
    /// its checksum or the sensor has not averaged enough samples yet; in the
    /// latter case [`NextPm::measurement_is_valid`] turns false and the state
    /// is queried again.
    ///
    /// A silent sensor yields an empty frame, which sums to zero and passes the
    /// checksum; its fields then decode as zero. Check
    /// `last_response().is_empty()` to tell that apart from a real reading.
    ///
    /// # Arguments
    ///
    /// * `mode`: The averaging mode to request. Becomes the current mode on success.
    pub fn update_particulate_data(&mut self, mode: MeasurementMode) -> Result<(), Error> {
        self.refresh_state()?;

        if !self.state.is_ready()
            || self.state.is_sleeping()
            || self.state.is_set(StateFlag::LaserError)
        {
            warn!(
                "Skipping particulate request, sensor state {:02X}",
                self.state.code()
            );
            return Ok(());
        }

        debug!("Requesting particulate data ({})", mode.name());
        if !self.query(mode.opcode(), SETTLE_DELAY_MS)? {
            return Ok(());
        }

        let state_byte = self.response.state_byte();
        self.update_state(state_byte);

        if state_byte == BUSY_STATE {
            warn!("Particulate data not averaged yet");
            self.no_measurement_available = true;
            return self.refresh_state();
        }

        self.no_measurement_available = false;
        self.mode = mode;
        self.particulate = ParticulateData {
            pm1: Measurement::from_window(self.response.window(PM1_WINDOW)),
            pm2_5: Measurement::from_window(self.response.window(PM2_5_WINDOW)),
            pm10: Measurement::from_window(self.response.window(PM10_WINDOW)),
        };
        debug!("Particulate data: {:?}", self.particulate);
        Ok(())
    }

    /// Requests temperature and relative humidity.
    ///
    /// Nothing is requested while the sensor is not ready or reports a
    /// temperature/humidity sensor error. A busy response marks the
    /// measurement invalid without querying the state again.
    ///
    /// As with [`NextPm::update_particulate_data`], an empty reply from a silent
    /// sensor passes the checksum and decodes as zero; `last_response().is_empty()`
    /// detects it.
    pub fn update_temperature_humidity_data(&mut self) -> Result<(), Error> {
        self.refresh_state()?;

        if !self.state.is_ready() || self.state.is_set(StateFlag::TemperatureHumidityError) {
            warn!(
                "Skipping temperature/humidity request, sensor state {:02X}",
                self.state.code()
            );
            return Ok(());
        }

        debug!("Requesting temperature/humidity data");
        if !self.query(TEMPERATURE_HUMIDITY_OPCODE, SETTLE_DELAY_MS)? {
            return Ok(());
        }

        let state_byte = self.response.state_byte();
        self.update_state(state_byte);

        if state_byte == BUSY_STATE {
            warn!("Temperature/humidity data not available yet");
            self.no_measurement_available = true;
            return Ok(());
        }

        self.no_measurement_available = false;
        self.climate = Climate::from_raw(
            self.response.be_u16(TEMPERATURE_INDEX),
            self.response.be_u16(HUMIDITY_INDEX),
        );
        debug!("Climate data: {:?}", self.climate);
        Ok(())
    }

    /// Queries and returns the current sensor state.
    pub fn state(&mut self) -> Result<SensorState, Error> {
        self.refresh_state()?;
        Ok(self.state)
    }

    /// Queries the state and reports whether the sensor is ready to measure.
    pub fn ready_to_measure(&mut self) -> Result<bool, Error> {
        Ok(self.state()?.is_ready())
    }

    /// Queries the state and returns its code, `0xFF` after a checksum failure.
    pub fn state_code(&mut self) -> Result<u8, Error> {
        Ok(self.state()?.code())
    }

    /// Queries the state and returns a report with every flag's label.
    pub fn all_status(&mut self) -> Result<StatusReport, Error> {
        Ok(self.state()?.all_status())
    }

    /// Queries the state and returns a report with the labels of set flags only.
    pub fn active_status(&mut self) -> Result<StatusReport, Error> {
        Ok(self.state()?.active_status())
    }

    // Sends the state command and decodes whatever comes back.
    fn refresh_state(&mut self) -> Result<(), Error> {
        self.query(STATE_OPCODE, SETTLE_DELAY_MS)?;
        self.update_state(self.response.state_byte());
        Ok(())
    }

    fn update_state(&mut self, state_byte: u8) {
        self.state = SensorState::decode(state_byte, !self.checksum_error);
        debug!("Sensor state: {:02X}", self.state.code());
    }

    // Runs one command/response exchange and returns whether the response passed its checksum.
    fn query(&mut self, opcode: u8, settle_ms: u32) -> Result<bool, Error> {
        self.send_command(opcode)?;
        self.delay.delay_ms(settle_ms);
        self.read_response()?;
        Ok(self.check_response_checksum())
    }

    fn check_response_checksum(&mut self) -> bool {
        let valid = self.response.checksum_valid();
        self.checksum_error = !valid;
        if !valid {
            warn!("Bad checksum. Frame: {:02X?}", self.response.as_bytes());
        }
        valid
    }

    // Writes a command frame byte by byte, giving the sensor time between bytes.
    fn send_command(&mut self, opcode: u8) -> Result<(), Error> {
        let command = Command::new(self.config.address, opcode);
        debug!("Executing command: {:02X?}", command.as_bytes());

        for &byte in command.as_bytes() {
            self.serial.write_all(&[byte]).map_err(|e| {
                log::error!("Failed to write command byte {:02X}: {:?}", byte, e);
                Error::WriteFailure
            })?;
            self.delay.delay_ms(INTER_BYTE_DELAY_MS);
        }
        self.serial.flush().map_err(|e| {
            log::error!("Failed to flush command: {:?}", e);
            Error::WriteFailure
        })
    }

    // Drains whatever the sensor has sent so far. Bytes past the buffer capacity are dropped.
    fn read_response(&mut self) -> Result<(), Error> {
        self.response.clear();
        let mut dropped = 0usize;

        while self.serial.read_ready().map_err(|e| {
            log::error!("Failed to poll serial channel: {:?}", e);
            Error::ReadFailure
        })? {
            let mut byte = [0u8; 1];
            let read = self.serial.read(&mut byte).map_err(|e| {
                log::error!("Serial read error: {:?}", e);
                Error::ReadFailure
            })?;
            if read == 0 {
                break;
            }
            if !self.response.push(byte[0]) {
                dropped += 1;
            }
        }

        if dropped > 0 {
            warn!("Response exceeded {} bytes, dropped {}", MAX_RESPONSE_LEN, dropped);
        }
        debug!("Received response: {:02X?}", self.response.as_bytes());
        Ok(())
    }
}

impl<S, D> NextPm<S, D> {
    /// Whether the most recent response failed its checksum.
    pub fn previous_checksum_error(&self) -> bool {
        self.checksum_error
    }

    /// Whether the most recent measurement request produced data.
    pub fn measurement_is_valid(&self) -> bool {
        !self.no_measurement_available
    }

    /// The last decoded state, without querying the sensor.
    pub fn last_state(&self) -> SensorState {
        self.state
    }

    /// The mode of the last successful particulate request.
    pub fn current_mode(&self) -> MeasurementMode {
        self.mode
    }

    /// The raw frame of the most recent exchange.
    pub fn last_response(&self) -> &Response {
        &self.response
    }

    /// The address byte commands are sent to.
    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// The three particulate channels from the last successful request.
    pub fn particulate(&self) -> ParticulateData {
        self.particulate
    }

    /// Temperature and humidity, raw and corrected, from the last successful request.
    pub fn climate(&self) -> Climate {
        self.climate
    }

    /// PM1.0 mass density, µg/m³.
    pub fn pm1_density(&self) -> f32 {
        self.particulate.pm1.density
    }

    /// PM2.5 mass density, µg/m³.
    pub fn pm2_5_density(&self) -> f32 {
        self.particulate.pm2_5.density
    }

    /// PM10 mass density, µg/m³.
    pub fn pm10_density(&self) -> f32 {
        self.particulate.pm10.density
    }

    /// PM1.0 particle count, pcs/L.
    pub fn pm1_count(&self) -> u16 {
        self.particulate.pm1.count
    }

    /// PM2.5 particle count, pcs/L.
    pub fn pm2_5_count(&self) -> u16 {
        self.particulate.pm2_5.count
    }

    /// PM10 particle count, pcs/L.
    pub fn pm10_count(&self) -> u16 {
        self.particulate.pm10.count
    }

    /// Corrected temperature, °C.
    pub fn temperature(&self) -> f32 {
        self.climate.temperature
    }

    /// Corrected relative humidity, %.
    pub fn humidity(&self) -> f32 {
        self.climate.humidity
    }

    /// Temperature as reported by the sensor, °C.
    pub fn raw_temperature(&self) -> f32 {
        self.climate.raw_temperature
    }

    /// Relative humidity as reported by the sensor, %.
    pub fn raw_humidity(&self) -> f32 {
        self.climate.raw_humidity
    }

    /// Releases the serial interface and delay provider.
    pub fn release(self) -> (S, D) {
        (self.serial, self.delay)
    }
}
