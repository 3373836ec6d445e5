// DEFAULT_ADDRESS is the address byte the sensor answers to out of the box.
pub const DEFAULT_ADDRESS: u8 = 0x81;

// BAUD_RATE is the only rate the sensor speaks, framed 8-N-1 without flow control.
pub const BAUD_RATE: u32 = 115_200;

// Command opcodes, sent as the second byte of every command frame.
pub const STATE_OPCODE: u8 = 0x16;
pub const SLEEP_WAKE_OPCODE: u8 = 0x15;
pub const TEMPERATURE_HUMIDITY_OPCODE: u8 = 0x14;
pub const PARTICULATE_FAST_OPCODE: u8 = 0x11;
pub const PARTICULATE_MEDIUM_OPCODE: u8 = 0x12;
pub const PARTICULATE_SLOW_OPCODE: u8 = 0x13;
pub const PARTICULATE_OFF_OPCODE: u8 = 0x00;

// COMMAND_LEN is the size of every command frame: address, opcode, checksum.
pub const COMMAND_LEN: usize = 3;

// MAX_RESPONSE_LEN caps a response frame; later bytes are dropped.
pub const MAX_RESPONSE_LEN: usize = 16;

// STATE_BYTE_INDEX is where the state byte sits in every response frame.
pub const STATE_BYTE_INDEX: usize = 2;

// BUSY_STATE is reported in place of a measurement while the sensor is still averaging.
pub const BUSY_STATE: u8 = 0x16;

// CHECKSUM_ERROR_STATE replaces the state byte when the response failed its checksum.
pub const CHECKSUM_ERROR_STATE: u8 = 0xFF;

// Offsets of the three particulate windows (PM1, PM2.5, PM10) and the climate values.
pub const PM1_WINDOW: usize = 3;
pub const PM2_5_WINDOW: usize = 7;
pub const PM10_WINDOW: usize = 11;
pub const TEMPERATURE_INDEX: usize = 3;
pub const HUMIDITY_INDEX: usize = 5;

// Blocking waits, in milliseconds.
pub const INTER_BYTE_DELAY_MS: u32 = 1;
pub const SETTLE_DELAY_MS: u32 = 350;
pub const WAKE_DELAY_MS: u32 = 1000;

// Linear corrections applied to the raw temperature/humidity readings.
pub const TEMPERATURE_GAIN: f32 = 0.9754;
pub const TEMPERATURE_OFFSET_CELSIUS: f32 = -4.2488;
pub const HUMIDITY_GAIN: f32 = 1.1768;
pub const HUMIDITY_OFFSET_PERCENT: f32 = -4.727;
