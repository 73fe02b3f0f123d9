//! Port traits — the boundary between the fixture core and the outside
//! world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FixtureService / Dispatcher (domain)
//! ```
//!
//! Driven adapters (bus driver, GPIO, host link, display, RNG, dataflash)
//! implement these traits.  The domain core consumes them via generics, so
//! it never touches hardware directly and the whole of it runs under
//! host-target tests with mocks.
//!
//! The transport, display, RNG, and flash-page collaborators are external
//! subsystems with narrow contracts; these traits ARE those contracts.

use crate::error::{BusError, FlashError};
use crate::proto::codec::RawPacket;
use crate::stations::{LedColor, LineSnapshot, StationId};

pub use crate::stations::expander::ExpanderBus;

// ───────────────────────────────────────────────────────────────
// Station capability interface (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Uniform per-station operations over both backing variants
/// (bus-addressed expander and direct GPIO).  The state machine and the
/// blink scheduler operate only on this interface.
pub trait StationBank {
    /// Enable the station's 5V supply.
    fn enable_power(&mut self, id: StationId) -> Result<(), BusError>;

    /// Disable the station's 5V supply.
    fn disable_power(&mut self, id: StationId) -> Result<(), BusError>;

    /// Drive the station's status LED.  Bus stations resend the combined
    /// output byte; the direct station drives its discrete LED pins.
    fn set_led(&mut self, id: StationId, color: LedColor) -> Result<(), BusError>;

    /// Level-poll the station's input lines.
    ///
    /// Returns `None` when the station's interrupt line is idle (no bus
    /// transaction is performed).  Lines are sampled, not edge-latched:
    /// an assertion shorter than one control-loop iteration can be
    /// missed.
    fn poll_lines(&mut self, id: StationId) -> Result<Option<LineSnapshot>, BusError>;
}

// ───────────────────────────────────────────────────────────────
// Leaf hardware ports behind the bank
// ───────────────────────────────────────────────────────────────

/// Per-station MCU interrupt inputs for the bus-attached stations.
/// Asserted LOW while the station's expander flags an input change.
pub trait InterruptLines {
    fn asserted(&mut self, id: StationId) -> bool;
}

/// Discrete lines of the direct-wired station (id 8).
pub trait DirectStationPins {
    fn insert_asserted(&mut self) -> bool;
    fn fault_asserted(&mut self) -> bool;
    fn set_power(&mut self, enabled: bool);
    fn set_led(&mut self, color: LedColor);
}

// ───────────────────────────────────────────────────────────────
// Host packet channel
// ───────────────────────────────────────────────────────────────

/// Fixed-size packet transport to the host.  Enumeration and transfer
/// mechanics live entirely behind this trait.
pub trait PacketTransport {
    /// Non-blocking receive.  At most one packet is consumed per
    /// control-loop iteration.
    fn recv(&mut self) -> Option<RawPacket>;

    /// Send one reply packet.
    fn send(&mut self, packet: &RawPacket);
}

// ───────────────────────────────────────────────────────────────
// Display collaborator
// ───────────────────────────────────────────────────────────────

/// The three text rows of the operator display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayLine {
    One,
    Two,
    Three,
}

/// Operator display.  Content management is the host's business; the
/// firmware only forwards line text.
pub trait DisplayPort {
    fn write_line(&mut self, line: DisplayLine, text: &str);
}

// ───────────────────────────────────────────────────────────────
// RNG collaborator
// ───────────────────────────────────────────────────────────────

/// Hardware random-number source.
pub trait RngPort {
    /// Fill `buf` with random bytes.
    fn fill(&mut self, buf: &mut [u8]);

    /// Number of 32-bit words currently buffered by the source.
    fn buffered_words(&mut self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Media flash collaborator
// ───────────────────────────────────────────────────────────────

/// The dataflash page primitive.  The chip's internal SRAM buffer holds
/// the partial page; the import session only tracks offsets.
pub trait MediaFlashPort {
    /// Stage bytes into the page buffer at the given offset.
    fn stage(&mut self, data: &[u8], offset: u16) -> Result<(), FlashError>;

    /// Commit the page buffer to the given page.
    fn commit(&mut self, page: u16) -> Result<(), FlashError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
