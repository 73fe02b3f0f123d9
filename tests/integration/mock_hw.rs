//! Mock hardware adapters for integration tests.
//!
//! Records every port call so tests can assert on the full command
//! history without touching real GPIO or bus registers.

use progbench::app::events::AppEvent;
use progbench::app::ports::{
    DisplayLine, DisplayPort, EventSink, MediaFlashPort, PacketTransport, RngPort, StationBank,
};
use progbench::error::{BusError, FlashError};
use progbench::proto::codec::RawPacket;
use progbench::stations::{LedColor, LineSnapshot, StationId, STATION_COUNT};
use std::collections::VecDeque;

// ── Station bank ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankCall {
    Power(StationId, bool),
    Led(StationId, LedColor),
}

/// Scriptable station bank: tests set each station's line snapshot and
/// read back the write journal.
pub struct MockBank {
    pub lines: [Option<LineSnapshot>; STATION_COUNT],
    pub calls: Vec<BankCall>,
    /// Station whose polls fail with a bus error, if any.
    pub failing: Option<StationId>,
}

#[allow(dead_code)]
impl MockBank {
    pub fn new() -> Self {
        Self {
            lines: [None; STATION_COUNT],
            calls: Vec::new(),
            failing: None,
        }
    }

    pub fn press(&mut self, id: StationId) {
        self.lines[id.index()] = Some(LineSnapshot {
            insert_asserted: true,
            fault_asserted: false,
        });
    }

    pub fn fault(&mut self, id: StationId) {
        self.lines[id.index()] = Some(LineSnapshot {
            insert_asserted: false,
            fault_asserted: true,
        });
    }

    pub fn release(&mut self, id: StationId) {
        self.lines[id.index()] = None;
    }

    pub fn last_led(&self, id: StationId) -> Option<LedColor> {
        self.calls.iter().rev().find_map(|c| match c {
            BankCall::Led(s, color) if *s == id => Some(*color),
            _ => None,
        })
    }

    pub fn last_power(&self, id: StationId) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            BankCall::Power(s, on) if *s == id => Some(*on),
            _ => None,
        })
    }
}

impl Default for MockBank {
    fn default() -> Self {
        Self::new()
    }
}

impl StationBank for MockBank {
    fn enable_power(&mut self, id: StationId) -> Result<(), BusError> {
        self.calls.push(BankCall::Power(id, true));
        Ok(())
    }

    fn disable_power(&mut self, id: StationId) -> Result<(), BusError> {
        self.calls.push(BankCall::Power(id, false));
        Ok(())
    }

    fn set_led(&mut self, id: StationId, color: LedColor) -> Result<(), BusError> {
        self.calls.push(BankCall::Led(id, color));
        Ok(())
    }

    fn poll_lines(&mut self, id: StationId) -> Result<Option<LineSnapshot>, BusError> {
        if self.failing == Some(id) {
            return Err(BusError::Nak);
        }
        Ok(self.lines[id.index()])
    }
}

// ── Host transport ────────────────────────────────────────────

#[derive(Default)]
pub struct MockTransport {
    pub rx: VecDeque<RawPacket>,
    pub sent: Vec<RawPacket>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_sent(&self) -> &RawPacket {
        self.sent.last().expect("a reply was sent")
    }
}

impl PacketTransport for MockTransport {
    fn recv(&mut self) -> Option<RawPacket> {
        self.rx.pop_front()
    }

    fn send(&mut self, packet: &RawPacket) {
        self.sent.push(*packet);
    }
}

// ── Media flash ───────────────────────────────────────────────

/// Page-buffer model matching the dataflash contract.
#[derive(Default)]
pub struct MockFlash {
    pub buffer: Vec<u8>,
    pub commits: Vec<(u16, Vec<u8>)>,
}

impl MediaFlashPort for MockFlash {
    fn stage(&mut self, data: &[u8], offset: u16) -> Result<(), FlashError> {
        let end = offset as usize + data.len();
        if self.buffer.len() < end {
            self.buffer.resize(end, 0);
        }
        self.buffer[offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self, page: u16) -> Result<(), FlashError> {
        self.commits.push((page, std::mem::take(&mut self.buffer)));
        Ok(())
    }
}

// ── RNG ───────────────────────────────────────────────────────

pub struct MockRng {
    pub words: u8,
}

impl RngPort for MockRng {
    fn fill(&mut self, buf: &mut [u8]) {
        for (i, b) in buf.iter_mut().enumerate() {
            *b = (i as u8) ^ 0xA5;
        }
    }

    fn buffered_words(&mut self) -> u8 {
        self.words
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub lines: Vec<(DisplayLine, String)>,
}

impl DisplayPort for MockDisplay {
    fn write_line(&mut self, line: DisplayLine, text: &str) {
        self.lines.push((line, text.to_string()));
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
