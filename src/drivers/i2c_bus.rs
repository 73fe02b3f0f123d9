//! I²C master driver for the expander bus.
//!
//! Blocking request/response transactions against the PCA9554s.  A
//! transaction that stalls holds up the whole control loop, so the
//! timeout is kept short; the bus carries nothing but the expanders.

use crate::error::BusError;
use crate::stations::expander::{ExpanderBus, Register};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::pins;

/// Transaction timeout in RTOS ticks (~100 ms — generous for a 100 kHz
/// two-byte transfer, short enough to bound a loop stall).
#[cfg(target_os = "espidf")]
const I2C_TIMEOUT_TICKS: u32 = 10;

#[cfg(target_os = "espidf")]
const I2C_PORT: i2c_port_t = 0;

pub struct EspI2cBus {
    _private: (),
}

#[cfg(target_os = "espidf")]
impl EspI2cBus {
    /// Configure and install the I²C master driver.
    pub fn new() -> Result<Self, crate::error::Error> {
        let cfg = i2c_config_t {
            mode: i2c_mode_t_I2C_MODE_MASTER,
            sda_io_num: pins::I2C_SDA_GPIO,
            scl_io_num: pins::I2C_SCL_GPIO,
            sda_pullup_en: true,
            scl_pullup_en: true,
            __bindgen_anon_1: i2c_config_t__bindgen_ty_1 {
                master: i2c_config_t__bindgen_ty_1__bindgen_ty_1 {
                    clk_speed: pins::I2C_FREQ_HZ,
                },
            },
            ..Default::default()
        };

        // SAFETY: one-shot init from the single main task before the loop.
        unsafe {
            if i2c_param_config(I2C_PORT, &cfg) != ESP_OK {
                return Err(crate::error::Error::Init("i2c param config"));
            }
            if i2c_driver_install(I2C_PORT, i2c_mode_t_I2C_MODE_MASTER, 0, 0, 0) != ESP_OK {
                return Err(crate::error::Error::Init("i2c driver install"));
            }
        }
        log::info!(
            "i2c: master on SDA={} SCL={} @ {} Hz",
            pins::I2C_SDA_GPIO,
            pins::I2C_SCL_GPIO,
            pins::I2C_FREQ_HZ
        );
        Ok(Self { _private: () })
    }

    fn map_rc(rc: i32) -> BusError {
        match rc {
            x if x == ESP_ERR_TIMEOUT => BusError::Timeout,
            x if x == ESP_FAIL => BusError::Nak,
            _ => BusError::Io,
        }
    }
}

#[cfg(target_os = "espidf")]
impl ExpanderBus for EspI2cBus {
    fn write_register(&mut self, addr: u8, reg: Register, value: u8) -> Result<(), BusError> {
        let buf = [reg as u8, value];
        // Station addresses are carried in 8-bit convention; the IDF API
        // takes the 7-bit form.
        let rc = unsafe {
            i2c_master_write_to_device(
                I2C_PORT,
                addr >> 1,
                buf.as_ptr(),
                buf.len(),
                I2C_TIMEOUT_TICKS,
            )
        };
        if rc == ESP_OK {
            Ok(())
        } else {
            Err(Self::map_rc(rc))
        }
    }

    fn read_register(&mut self, addr: u8, reg: Register) -> Result<u8, BusError> {
        let cmd = [reg as u8];
        let mut out = [0u8; 1];
        let rc = unsafe {
            i2c_master_write_read_device(
                I2C_PORT,
                addr >> 1,
                cmd.as_ptr(),
                cmd.len(),
                out.as_mut_ptr(),
                out.len(),
                I2C_TIMEOUT_TICKS,
            )
        };
        if rc == ESP_OK {
            Ok(out[0])
        } else {
            Err(Self::map_rc(rc))
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl EspI2cBus {
    pub fn new() -> Result<Self, crate::error::Error> {
        log::info!("i2c(sim): no bus installed");
        Ok(Self { _private: () })
    }
}

#[cfg(not(target_os = "espidf"))]
impl ExpanderBus for EspI2cBus {
    fn write_register(&mut self, _addr: u8, _reg: Register, _value: u8) -> Result<(), BusError> {
        Ok(())
    }

    fn read_register(&mut self, _addr: u8, _reg: Register) -> Result<u8, BusError> {
        Ok(0xFF) // all lines idle (active-low inputs released)
    }
}
