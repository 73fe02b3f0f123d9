//! ESP-IDF adapters for the port traits, plus peripheral bring-up.
//!
//! Everything hardware-specific is guarded by
//! `#[cfg(target_os = "espidf")]`; host builds get sim no-ops so the
//! module graph compiles everywhere.

pub mod direct_station;
pub mod host_link;
pub mod i2c_bus;
pub mod media_flash;
pub mod oled;
pub mod rng;
pub mod watchdog;
