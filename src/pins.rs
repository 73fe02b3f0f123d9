//! GPIO / peripheral pin assignments for the bench controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// I²C bus to the station port expanders (PCA9554)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;

/// I²C bus frequency.  The expanders are the only devices on the bus.
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Per-station interrupt lines (stations 0–7, active LOW)
// ---------------------------------------------------------------------------

/// INT output of each station's expander, one MCU input per station.
/// Open-drain, pulled up, asserted LOW while any expander input differs
/// from its last-read snapshot.
pub const STATION_INT_GPIOS: [i32; 8] = [1, 2, 4, 5, 6, 7, 8, 9];

// ---------------------------------------------------------------------------
// Direct-wired station (id 8) — no expander, discrete lines
// ---------------------------------------------------------------------------

/// Board-insert / start switch, active LOW.
pub const DIRECT_INSERT_GPIO: i32 = 10;
/// 5V supply fault sense, active LOW.
pub const DIRECT_FAULT_GPIO: i32 = 11;
/// 5V supply enable, active LOW.
pub const DIRECT_POWER_EN_GPIO: i32 = 12;

/// Status LEDs, active LOW (one pin per colour, orange is its own LED).
pub const DIRECT_LED_GREEN_GPIO: i32 = 16;
pub const DIRECT_LED_ORANGE_GPIO: i32 = 17;
pub const DIRECT_LED_RED_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// UART debug
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 43;
pub const UART_RX_GPIO: i32 = 44;
