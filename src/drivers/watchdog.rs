//! Task watchdog.
//!
//! The control loop feeds it every iteration; if a bus transaction wedges
//! the loop for more than the timeout, the device resets rather than
//! leaving stations powered with nobody watching the fault lines.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Loop-stall budget before reset.  The worst legitimate iteration is a
/// handful of I²C transactions, nowhere near this.
#[cfg(target_os = "espidf")]
const WATCHDOG_TIMEOUT_MS: u32 = 5_000;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    #[cfg(target_os = "espidf")]
    pub fn new() -> Self {
        // SAFETY: TWDT reconfigure/subscribe from the single main task.
        unsafe {
            let cfg = esp_task_wdt_config_t {
                timeout_ms: WATCHDOG_TIMEOUT_MS,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            if esp_task_wdt_reconfigure(&cfg) != ESP_OK {
                log::warn!("watchdog: reconfigure refused, using boot settings");
            }
            let subscribed = esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK;
            if !subscribed {
                log::warn!("watchdog: main task not subscribed");
            }
            Self { subscribed }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {}
    }

    /// Feed once per control-loop iteration.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: reset call for the subscribed current task.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}
