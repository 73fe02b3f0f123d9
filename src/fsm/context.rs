//! Shared mutable context threaded through every state handler.
//!
//! One `StationContext` exists per station.  It is the blackboard the
//! handlers read from and write to: the latest input-line snapshot, the
//! pending output commands, the blink/button bookkeeping, and the settle
//! countdown.

use crate::config::SystemConfig;
use crate::stations::{LedColor, LineSnapshot, StationId};
use crate::timer::Countdown;

// ---------------------------------------------------------------------------
// Output commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Pending hardware writes requested by state handlers.
///
/// Unlike a level-style command block, these are deltas: a `Some` is a
/// write the service must issue through the station bank and then take.
/// Bus output bytes are expensive, so nothing is re-sent unless a handler
/// asked for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct StationCommands {
    /// LED colour to drive, if changed.
    pub led: Option<LedColor>,
    /// Power-enable state to drive, if changed.
    pub power: Option<bool>,
}

// ---------------------------------------------------------------------------
// StationContext
// ---------------------------------------------------------------------------

/// The per-station blackboard passed to every state handler function.
pub struct StationContext {
    /// This station's identity (stable, also the bus address selector).
    pub id: StationId,

    /// Input-line snapshot for the current loop iteration.  Refreshed by
    /// the service before each tick; default (nothing asserted) when the
    /// station's interrupt line was idle.
    pub lines: LineSnapshot,

    /// Hardware writes requested by the handlers this tick.
    pub commands: StationCommands,

    /// Visual blink phase while in an error state.  Reset on entry to
    /// `Idle` and `Programming`; toggled by the blink scheduler.
    pub blink_phase: bool,

    /// Set when the settle timer fires during `Programming`; the host
    /// drains it through the `ButtonPressed` query.
    pub button_pending: bool,

    /// Settle countdown, armed on entry to `Programming`.
    pub settle: Countdown,

    /// Settle duration (from config).
    pub settle_delay_ms: u32,

    /// Monotonic clock sample for the current iteration.
    pub now_ms: u32,
}

impl StationContext {
    pub fn new(id: StationId, config: &SystemConfig) -> Self {
        Self {
            id,
            lines: LineSnapshot::default(),
            commands: StationCommands::default(),
            blink_phase: false,
            button_pending: false,
            settle: Countdown::new(),
            settle_delay_ms: config.settle_delay_ms,
            now_ms: 0,
        }
    }
}
