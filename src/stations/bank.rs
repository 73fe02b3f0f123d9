//! `FixtureIo` — the hardware adapter behind the [`StationBank`] interface.
//!
//! Unifies the two station variants:
//!
//! - **Bus-attached** (ids 0–7): one PCA9554 each.  The adapter keeps a
//!   shadow [`OutputWord`] per station because every write must resend the
//!   full output byte, and gates input reads on the station's interrupt
//!   line so an idle station costs no bus transaction.
//! - **Direct-wired** (id 8): discrete controller pins, no bus address.
//!
//! The state machine and blink scheduler only ever see [`StationBank`].

use crate::app::ports::{DirectStationPins, InterruptLines, StationBank};
use crate::error::BusError;
use crate::stations::expander::{
    station_address, ExpanderBus, OutputWord, Register, DIRECTION_WORD,
};
use crate::stations::{LedColor, LineSnapshot, StationId, BUS_STATION_COUNT};
use log::info;

pub struct FixtureIo<B, I, D> {
    bus: B,
    int_lines: I,
    direct: D,
    shadows: [OutputWord; BUS_STATION_COUNT],
}

impl<B, I, D> FixtureIo<B, I, D>
where
    B: ExpanderBus,
    I: InterruptLines,
    D: DirectStationPins,
{
    pub fn new(bus: B, int_lines: I, direct: D) -> Self {
        Self {
            bus,
            int_lines,
            direct,
            shadows: [OutputWord::SAFE; BUS_STATION_COUNT],
        }
    }

    /// One-shot expander bring-up: pin directions, safe outputs, a dummy
    /// input read to clear any latched interrupt from a quick reboot,
    /// then the ready indication (power off, LED green).
    pub fn init(&mut self) -> Result<(), BusError> {
        for id in StationId::bus_attached() {
            let addr = station_address(id);
            self.bus
                .write_register(addr, Register::Config, DIRECTION_WORD)?;
            self.bus
                .write_register(addr, Register::Output, OutputWord::SAFE.encode())?;
            let _ = self.bus.read_register(addr, Register::Input)?;
            self.shadows[id.index()] = OutputWord {
                color: LedColor::Green,
                power_enabled: false,
            };
            self.write_output(id)?;
        }
        self.direct.set_power(false);
        self.direct.set_led(LedColor::Green);
        info!("fixture io: {} stations ready", crate::stations::STATION_COUNT);
        Ok(())
    }

    fn write_output(&mut self, id: StationId) -> Result<(), BusError> {
        let word = self.shadows[id.index()];
        self.bus
            .write_register(station_address(id), Register::Output, word.encode())
    }
}

impl<B, I, D> StationBank for FixtureIo<B, I, D>
where
    B: ExpanderBus,
    I: InterruptLines,
    D: DirectStationPins,
{
    fn enable_power(&mut self, id: StationId) -> Result<(), BusError> {
        if id.is_direct() {
            self.direct.set_power(true);
            return Ok(());
        }
        self.shadows[id.index()].power_enabled = true;
        self.write_output(id)
    }

    fn disable_power(&mut self, id: StationId) -> Result<(), BusError> {
        if id.is_direct() {
            self.direct.set_power(false);
            return Ok(());
        }
        self.shadows[id.index()].power_enabled = false;
        self.write_output(id)
    }

    fn set_led(&mut self, id: StationId, color: LedColor) -> Result<(), BusError> {
        if id.is_direct() {
            self.direct.set_led(color);
            return Ok(());
        }
        self.shadows[id.index()].color = color;
        self.write_output(id)
    }

    fn poll_lines(&mut self, id: StationId) -> Result<Option<LineSnapshot>, BusError> {
        if id.is_direct() {
            return Ok(Some(LineSnapshot {
                insert_asserted: self.direct.insert_asserted(),
                fault_asserted: self.direct.fault_asserted(),
            }));
        }
        if !self.int_lines.asserted(id) {
            return Ok(None);
        }
        let raw = self
            .bus
            .read_register(station_address(id), Register::Input)?;
        let word = crate::stations::expander::InputWord(raw);
        Ok(Some(LineSnapshot {
            insert_asserted: word.insert_asserted(),
            fault_asserted: word.fault_asserted(),
        }))
    }
}
