//! Fixture service — the domain core.
//!
//! [`FixtureService`] owns the nine station state machines with their
//! contexts, plus the error-blink scheduler.  All hardware I/O flows
//! through the [`StationBank`] port injected at call sites, so the whole
//! service runs under host-target tests with a mock bank.
//!
//! ```text
//!  StationBank ◀── ┌─────────────────────────────┐ ──▶ EventSink
//!                  │        FixtureService        │
//!  Dispatcher ───▶ │  9 × StationFsm · blink tick │
//!                  └─────────────────────────────┘
//! ```
//!
//! One [`poll`](FixtureService::poll) call is one cooperative loop
//! iteration.  Nothing here blocks except the bank's own bus
//! transactions.

use log::{info, warn};

use crate::config::SystemConfig;
use crate::error::BusError;
use crate::fsm::context::StationContext;
use crate::fsm::{StateId, StationFsm};
use crate::stations::{LedColor, StationId, STATION_COUNT};
use crate::timer::Countdown;

use super::events::AppEvent;
use super::ports::{EventSink, StationBank};

pub struct FixtureService {
    machines: [StationFsm; STATION_COUNT],
    contexts: [StationContext; STATION_COUNT],
    blink: Countdown,
    blink_interval_ms: u32,
}

impl FixtureService {
    pub fn new(config: &SystemConfig) -> Self {
        let contexts =
            core::array::from_fn(|i| StationContext::new(StationId::from_index(i), config));
        Self {
            machines: core::array::from_fn(|_| StationFsm::new()),
            contexts,
            blink: Countdown::new(),
            blink_interval_ms: config.blink_interval_ms,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run every station's initial state entry and apply the resulting
    /// ready indication (power off, LED green) to the hardware.
    pub fn start(&mut self, bank: &mut impl StationBank, sink: &mut impl EventSink) {
        for i in 0..STATION_COUNT {
            self.machines[i].start(&mut self.contexts[i]);
            self.apply_commands(i, bank);
        }
        sink.emit(&AppEvent::Started);
        info!("fixture service started, {} stations idle", STATION_COUNT);
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// One cooperative control-loop iteration: blink-scheduler tick, then
    /// per station a line poll, an FSM tick, and the pending hardware
    /// writes.
    ///
    /// A bus error skips the affected station for this iteration; there
    /// is no crash path.
    pub fn poll(&mut self, now_ms: u32, bank: &mut impl StationBank, sink: &mut impl EventSink) {
        self.blink_tick(now_ms, bank);

        for i in 0..STATION_COUNT {
            let id = self.contexts[i].id;
            self.contexts[i].now_ms = now_ms;
            self.contexts[i].lines = match bank.poll_lines(id) {
                Ok(Some(snapshot)) => snapshot,
                Ok(None) => Default::default(),
                Err(e) => {
                    warn!("{}: line poll failed ({e}), skipping", id);
                    continue;
                }
            };

            let before = self.machines[i].current_state();
            let was_pending = self.contexts[i].button_pending;

            self.machines[i].tick(&mut self.contexts[i]);
            self.apply_commands(i, bank);

            let after = self.machines[i].current_state();
            if after != before {
                sink.emit(&AppEvent::StationStateChanged {
                    station: id,
                    from: before,
                    to: after,
                });
            }
            if self.contexts[i].button_pending && !was_pending {
                sink.emit(&AppEvent::StationReady(id));
            }
        }
    }

    // ── Host report entry points (dispatcher callbacks) ───────

    /// Host reports the board at `id` programmed successfully: power off,
    /// ready indication, back to `Idle` — regardless of prior state.
    pub fn programming_success(
        &mut self,
        id: StationId,
        bank: &mut impl StationBank,
        sink: &mut impl EventSink,
    ) {
        self.report(id, StateId::Idle, bank, sink);
    }

    /// Host reports a programming failure: power off, blinking red,
    /// `Error` until the operator retries.
    pub fn programming_failure(
        &mut self,
        id: StationId,
        bank: &mut impl StationBank,
        sink: &mut impl EventSink,
    ) {
        self.report(id, StateId::Error, bank, sink);
    }

    fn report(
        &mut self,
        id: StationId,
        target: StateId,
        bank: &mut impl StationBank,
        sink: &mut impl EventSink,
    ) {
        let i = id.index();
        let before = self.machines[i].current_state();
        self.machines[i].force_transition(target, &mut self.contexts[i]);
        self.apply_commands(i, bank);
        if before != target {
            sink.emit(&AppEvent::StationStateChanged {
                station: id,
                from: before,
                to: target,
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Drain the nine button-pending flags into a wire array, clearing
    /// them.  An immediate second call returns all zeros.
    pub fn take_button_pending(&mut self) -> [u8; STATION_COUNT] {
        let mut out = [0u8; STATION_COUNT];
        for (i, ctx) in self.contexts.iter_mut().enumerate() {
            out[i] = u8::from(ctx.button_pending);
            ctx.button_pending = false;
        }
        out
    }

    /// Current lifecycle state of one station.
    pub fn station_state(&self, id: StationId) -> StateId {
        self.machines[id.index()].current_state()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Every `blink_interval_ms`, flip the blink phase of each station in
    /// an error state and drive its LED red (phase on) or dark (phase
    /// off).
    fn blink_tick(&mut self, now_ms: u32, bank: &mut impl StationBank) {
        if !self.blink.is_armed() {
            self.blink.arm(now_ms, self.blink_interval_ms);
            return;
        }
        if !self.blink.take_expired(now_ms) {
            return;
        }
        self.blink.arm(now_ms, self.blink_interval_ms);

        for i in 0..STATION_COUNT {
            if !self.machines[i].current_state().is_error() {
                continue;
            }
            let ctx = &mut self.contexts[i];
            ctx.blink_phase = !ctx.blink_phase;
            let color = if ctx.blink_phase {
                LedColor::Red
            } else {
                LedColor::Black
            };
            if let Err(e) = bank.set_led(ctx.id, color) {
                warn!("{}: blink write failed ({e})", ctx.id);
            }
        }
    }

    /// Issue the hardware writes the handlers requested this tick.
    fn apply_commands(&mut self, i: usize, bank: &mut impl StationBank) {
        let id = self.contexts[i].id;

        if let Some(enabled) = self.contexts[i].commands.power.take() {
            let result = if enabled {
                bank.enable_power(id)
            } else {
                bank.disable_power(id)
            };
            log_bus_error(id, "power write", result);
        }
        if let Some(color) = self.contexts[i].commands.led.take() {
            log_bus_error(id, "led write", bank.set_led(id, color));
        }
    }
}

fn log_bus_error(id: StationId, what: &str, result: Result<(), BusError>) {
    if let Err(e) = result {
        warn!("{}: {what} failed ({e})", id);
    }
}
