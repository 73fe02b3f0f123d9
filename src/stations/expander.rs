//! Typed access to the PCA9554 port expanders.
//!
//! Each bus-attached station has one expander at a fixed address derived
//! from its station id.  Expander pin mapping:
//!
//! | Pin | Function        | Direction |
//! |-----|-----------------|-----------|
//! | 0–2 | LED red/orange/green (active LOW) | output |
//! | 3   | insert switch (active LOW)        | input  |
//! | 6   | 5V enable (active LOW)            | output |
//! | 7   | 5V fault sense (active LOW)       | input  |
//!
//! All bit arithmetic lives here as named word types; call sites never
//! touch raw masks.

use crate::error::BusError;
use crate::stations::{LedColor, StationId};

// ---------------------------------------------------------------------------
// Bus driver boundary
// ---------------------------------------------------------------------------

/// Blocking register-level access to the expander bus.
///
/// This is the byte-level I²C driver's contract: one synchronous
/// request/response transaction per call.  A call that blocks stalls the
/// whole control loop; transaction latency bounds loop responsiveness.
pub trait ExpanderBus {
    fn write_register(&mut self, addr: u8, reg: Register, value: u8) -> Result<(), BusError>;
    fn read_register(&mut self, addr: u8, reg: Register) -> Result<u8, BusError>;
}

/// Adapter lifting any `embedded-hal` I²C master onto the expander bus.
/// (Station addresses are carried in 8-bit convention on this board; the
/// HAL takes the 7-bit form.)
pub struct HalBus<T>(pub T);

impl<T: embedded_hal::i2c::I2c> ExpanderBus for HalBus<T> {
    fn write_register(&mut self, addr: u8, reg: Register, value: u8) -> Result<(), BusError> {
        self.0
            .write(addr >> 1, &[reg as u8, value])
            .map_err(map_i2c_err)
    }

    fn read_register(&mut self, addr: u8, reg: Register) -> Result<u8, BusError> {
        let mut out = [0u8; 1];
        self.0
            .write_read(addr >> 1, &[reg as u8], &mut out)
            .map_err(map_i2c_err)?;
        Ok(out[0])
    }
}

fn map_i2c_err<E: embedded_hal::i2c::Error>(e: E) -> BusError {
    use embedded_hal::i2c::ErrorKind;
    match e.kind() {
        ErrorKind::NoAcknowledge(_) => BusError::Nak,
        _ => BusError::Io,
    }
}

/// PCA9554 register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    Input = 0,
    Output = 1,
    Config = 3,
}

/// Base bus address shared by all station expanders.
const BASE_ADDRESS: u8 = 0x70;

/// Bus address of a station's expander: `base | (id << 1)`.
pub fn station_address(id: StationId) -> u8 {
    BASE_ADDRESS | (id.raw() << 1)
}

/// Direction word for [`Register::Config`]: pins 3 and 7 as inputs,
/// everything else driven.
pub const DIRECTION_WORD: u8 = 0x88;

// ---------------------------------------------------------------------------
// Output word
// ---------------------------------------------------------------------------

const COLOR_FIELD_MASK: u8 = 0x07;
const POWER_DISABLE_BIT: u8 = 0x40;

/// The full expander output byte.
///
/// Every write must resend the whole byte, so the word carries both the
/// LED colour field and the power-enable bit.  LEDs are active LOW (the
/// colour field is inverted on the wire) and the 5V enable is active LOW
/// (bit set = supply off).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputWord {
    pub color: LedColor,
    pub power_enabled: bool,
}

impl OutputWord {
    /// Power-off, LEDs dark — the reset value written during init.
    pub const SAFE: OutputWord = OutputWord {
        color: LedColor::Black,
        power_enabled: false,
    };

    /// Encode to the wire byte.
    pub fn encode(self) -> u8 {
        let color_bits = (!self.color.bits()) & COLOR_FIELD_MASK;
        let power_bit = if self.power_enabled {
            0
        } else {
            POWER_DISABLE_BIT
        };
        color_bits | power_bit
    }
}

impl Default for OutputWord {
    fn default() -> Self {
        Self::SAFE
    }
}

// ---------------------------------------------------------------------------
// Input word
// ---------------------------------------------------------------------------

const INSERT_BIT: u8 = 0x08;
const FAULT_BIT: u8 = 0x80;

/// The expander input byte with named line accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputWord(pub u8);

impl InputWord {
    /// Insert switch asserted (line pulled LOW).
    pub fn insert_asserted(self) -> bool {
        self.0 & INSERT_BIT == 0
    }

    /// 5V fault asserted (line pulled LOW).
    pub fn fault_asserted(self) -> bool {
        self.0 & FAULT_BIT == 0
    }
}
