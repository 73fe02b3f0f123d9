//! Host packet link over the USB Serial/JTAG peripheral.
//!
//! The link carries fixed 64-byte reports in both directions; this
//! adapter only reassembles them from the stream — enumeration and
//! transfer mechanics belong to the ROM/peripheral.

use crate::app::ports::PacketTransport;
use crate::proto::codec::RawPacket;
#[cfg(target_os = "espidf")]
use crate::proto::codec::PACKET_SIZE;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub struct UsbHostLink {
    #[cfg(target_os = "espidf")]
    rx_buf: RawPacket,
    #[cfg(target_os = "espidf")]
    rx_fill: usize,
}

impl UsbHostLink {
    #[cfg(target_os = "espidf")]
    pub fn new() -> Result<Self, crate::error::Error> {
        let mut cfg = usb_serial_jtag_driver_config_t {
            tx_buffer_size: 256,
            rx_buffer_size: 256,
        };
        // SAFETY: one-shot driver install from the single main task.
        let rc = unsafe { usb_serial_jtag_driver_install(&mut cfg) };
        if rc != ESP_OK {
            return Err(crate::error::Error::Init("usb serial/jtag install"));
        }
        log::info!("host link: usb serial/jtag up");
        Ok(Self {
            rx_buf: [0; PACKET_SIZE],
            rx_fill: 0,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Result<Self, crate::error::Error> {
        log::info!("host link(sim): no transport");
        Ok(Self {})
    }
}

#[cfg(target_os = "espidf")]
impl PacketTransport for UsbHostLink {
    fn recv(&mut self) -> Option<RawPacket> {
        // Non-blocking drain into the partial report.
        let want = PACKET_SIZE - self.rx_fill;
        // SAFETY: buffer range is in bounds; zero timeout never blocks.
        let got = unsafe {
            usb_serial_jtag_read_bytes(
                self.rx_buf[self.rx_fill..].as_mut_ptr().cast(),
                want as u32,
                0,
            )
        };
        if got > 0 {
            self.rx_fill += got as usize;
        }
        if self.rx_fill == PACKET_SIZE {
            self.rx_fill = 0;
            return Some(self.rx_buf);
        }
        None
    }

    fn send(&mut self, packet: &RawPacket) {
        // SAFETY: write of a complete stack buffer; short timeout bounds
        // the loop stall if the host stops draining.
        let wrote =
            unsafe { usb_serial_jtag_write_bytes(packet.as_ptr().cast(), PACKET_SIZE, 10) };
        if wrote != PACKET_SIZE as i32 {
            log::warn!("host link: short write ({wrote}/{PACKET_SIZE})");
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl PacketTransport for UsbHostLink {
    fn recv(&mut self) -> Option<RawPacket> {
        None
    }

    fn send(&mut self, _packet: &RawPacket) {}
}

/// Transport that never receives and drops every send.  Stand-in while a
/// board is brought up without a host attached.
pub struct NullTransport;

impl PacketTransport for NullTransport {
    fn recv(&mut self) -> Option<RawPacket> {
        None
    }

    fn send(&mut self, _packet: &RawPacket) {}
}
