//! System configuration parameters
//!
//! All tunable parameters for the bench firmware.  There is no persistence
//! layer: station and import-session state is volatile by design, and the
//! timings below are part of the fixture's validated behaviour, so the
//! defaults are compiled in.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Station timing ---
    /// Settle delay after powering a freshly inserted board, before the
    /// host is told the station is ready to program (milliseconds).
    pub settle_delay_ms: u32,
    /// Error-LED blink half-period (milliseconds).
    pub blink_interval_ms: u32,

    // --- Control loop ---
    /// Control loop interval (milliseconds).
    pub control_loop_interval_ms: u32,

    // --- Media flash import ---
    /// First page of the reserved graphic zone.
    pub media_first_page: u16,
    /// One past the last page of the reserved graphic zone.
    pub media_end_page: u16,
    /// Dataflash page size in bytes.
    pub media_bytes_per_page: u16,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Station timing
            settle_delay_ms: 200,
            blink_interval_ms: 500,

            // Control loop
            control_loop_interval_ms: 10,

            // Media flash (AT45DB-class dataflash)
            media_first_page: 128,
            media_end_page: 512,
            media_bytes_per_page: 264,
        }
    }
}

impl SystemConfig {
    /// Media import layout derived from the flash geometry fields.
    pub fn media_layout(&self) -> crate::proto::import::FlashLayout {
        crate::proto::import::FlashLayout {
            first_page: self.media_first_page,
            end_page: self.media_end_page,
            bytes_per_page: self.media_bytes_per_page,
        }
    }
}
