//! GPIO adapters for the direct-wired station and the per-station
//! interrupt lines.
//!
//! The direct station has no expander: its switch, fault sense, supply
//! enable, and three LED pins hang straight off the controller.  All
//! lines are active LOW, matching the bus stations' electrical
//! convention.

use crate::app::ports::{DirectStationPins, InterruptLines};
use crate::stations::{LedColor, StationId};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::pins;

// ---------------------------------------------------------------------------
// One-shot GPIO bring-up
// ---------------------------------------------------------------------------

/// Configure the direct-station pins and the eight INT inputs.
/// Inputs get pull-ups (the lines are open-drain); outputs start
/// deasserted (HIGH — everything is active LOW).
#[cfg(target_os = "espidf")]
pub fn init_station_gpio() -> Result<(), crate::error::Error> {
    let inputs = {
        let mut v: heapless::Vec<i32, 10> = heapless::Vec::new();
        let _ = v.extend_from_slice(&pins::STATION_INT_GPIOS);
        let _ = v.push(pins::DIRECT_INSERT_GPIO);
        let _ = v.push(pins::DIRECT_FAULT_GPIO);
        v
    };
    let outputs = [
        pins::DIRECT_POWER_EN_GPIO,
        pins::DIRECT_LED_GREEN_GPIO,
        pins::DIRECT_LED_ORANGE_GPIO,
        pins::DIRECT_LED_RED_GPIO,
    ];

    // SAFETY: one-shot init from the single main task before the loop.
    unsafe {
        for &pin in &inputs {
            let cfg = gpio_config_t {
                pin_bit_mask: 1u64 << pin,
                mode: gpio_mode_t_GPIO_MODE_INPUT,
                pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
                pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
                intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
            };
            if gpio_config(&cfg) != ESP_OK {
                return Err(crate::error::Error::Init("station input gpio"));
            }
        }
        for &pin in &outputs {
            let cfg = gpio_config_t {
                pin_bit_mask: 1u64 << pin,
                mode: gpio_mode_t_GPIO_MODE_OUTPUT,
                pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
                pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
                intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
            };
            if gpio_config(&cfg) != ESP_OK {
                return Err(crate::error::Error::Init("station output gpio"));
            }
            gpio_set_level(pin, 1);
        }
    }
    log::info!("gpio: direct station + 8 INT lines configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_station_gpio() -> Result<(), crate::error::Error> {
    log::info!("gpio(sim): station pin init skipped");
    Ok(())
}

// ---------------------------------------------------------------------------
// Interrupt lines (stations 0–7)
// ---------------------------------------------------------------------------

pub struct EspInterruptLines {
    _private: (),
}

impl EspInterruptLines {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for EspInterruptLines {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "espidf")]
impl InterruptLines for EspInterruptLines {
    fn asserted(&mut self, id: StationId) -> bool {
        let pin = pins::STATION_INT_GPIOS[id.index()];
        // SAFETY: plain level read of a configured input pin.
        unsafe { gpio_get_level(pin) == 0 }
    }
}

#[cfg(not(target_os = "espidf"))]
impl InterruptLines for EspInterruptLines {
    fn asserted(&mut self, _id: StationId) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Direct-wired station (id 8)
// ---------------------------------------------------------------------------

pub struct EspDirectStation {
    _private: (),
}

impl EspDirectStation {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for EspDirectStation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "espidf")]
impl DirectStationPins for EspDirectStation {
    fn insert_asserted(&mut self) -> bool {
        // SAFETY: plain level reads/writes of configured pins throughout.
        unsafe { gpio_get_level(pins::DIRECT_INSERT_GPIO) == 0 }
    }

    fn fault_asserted(&mut self) -> bool {
        unsafe { gpio_get_level(pins::DIRECT_FAULT_GPIO) == 0 }
    }

    fn set_power(&mut self, enabled: bool) {
        unsafe {
            gpio_set_level(pins::DIRECT_POWER_EN_GPIO, u32::from(!enabled));
        }
    }

    fn set_led(&mut self, color: LedColor) {
        let leds = [
            (pins::DIRECT_LED_RED_GPIO, LedColor::Red),
            (pins::DIRECT_LED_ORANGE_GPIO, LedColor::Orange),
            (pins::DIRECT_LED_GREEN_GPIO, LedColor::Green),
        ];
        unsafe {
            for (pin, led) in leds {
                gpio_set_level(pin, u32::from(color != led));
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl DirectStationPins for EspDirectStation {
    fn insert_asserted(&mut self) -> bool {
        false
    }

    fn fault_asserted(&mut self) -> bool {
        false
    }

    fn set_power(&mut self, _enabled: bool) {}

    fn set_led(&mut self, _color: LedColor) {}
}
