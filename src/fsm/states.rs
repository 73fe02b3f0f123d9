//! Concrete state handler functions and the shared state table.
//!
//! Each state is a pair of plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap.  Handlers request hardware writes by filling
//! [`StationContext::commands`](super::context::StationContext); the
//! service applies them through the station bank after the tick.

use super::context::StationContext;
use super::{StateDescriptor, StateId};
use crate::stations::LedColor;
use log::info;

/// The shared state table.  All station machines index into this.
pub fn state_table() -> &'static [StateDescriptor; StateId::COUNT] {
    static TABLE: [StateDescriptor; StateId::COUNT] = [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_update: armable_update,
        },
        // Index 1 — Programming
        StateDescriptor {
            id: StateId::Programming,
            name: "Programming",
            on_enter: Some(programming_enter),
            on_update: programming_update,
        },
        // Index 2 — ErrorShorted
        StateDescriptor {
            id: StateId::ErrorShorted,
            name: "ErrorShorted",
            on_enter: Some(error_shorted_enter),
            on_update: armable_update,
        },
        // Index 3 — Error
        StateDescriptor {
            id: StateId::Error,
            name: "Error",
            on_enter: Some(error_enter),
            on_update: armable_update,
        },
    ];
    &TABLE
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut StationContext) {
    // Ready indication: supply off, LED green.  Entered at boot and on
    // every host success report.
    ctx.commands.power = Some(false);
    ctx.commands.led = Some(LedColor::Green);
    ctx.blink_phase = false;
    ctx.settle.cancel();
}

/// Shared update for `Idle`, `ErrorShorted`, and `Error`: a board insert
/// (re)starts a programming cycle from any of them.
fn armable_update(ctx: &mut StationContext) -> Option<StateId> {
    ctx.lines.insert_asserted.then_some(StateId::Programming)
}

// ═══════════════════════════════════════════════════════════════════════════
//  PROGRAMMING
// ═══════════════════════════════════════════════════════════════════════════

fn programming_enter(ctx: &mut StationContext) {
    ctx.commands.power = Some(true);
    ctx.commands.led = Some(LedColor::Orange);
    ctx.blink_phase = false;
    ctx.settle.arm(ctx.now_ms, ctx.settle_delay_ms);
    info!("{}: board inserted, supply on", ctx.id);
}

fn programming_update(ctx: &mut StationContext) -> Option<StateId> {
    // Settle expiry is a ready signal for the host, not a transition.
    if ctx.settle.take_expired(ctx.now_ms) {
        ctx.button_pending = true;
        info!("{}: settled, ready to program", ctx.id);
    }

    if ctx.lines.fault_asserted {
        return Some(StateId::ErrorShorted);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ERROR STATES
// ═══════════════════════════════════════════════════════════════════════════

fn error_shorted_enter(ctx: &mut StationContext) {
    fault_indication(ctx);
    log::warn!("{}: 5V shorted, supply cut", ctx.id);
}

fn error_enter(ctx: &mut StationContext) {
    fault_indication(ctx);
    log::warn!("{}: programming failed", ctx.id);
}

/// Common fault entry: supply off, solid red, blink phase primed so the
/// scheduler's first flip turns the LED dark.
fn fault_indication(ctx: &mut StationContext) {
    ctx.commands.power = Some(false);
    ctx.commands.led = Some(LedColor::Red);
    ctx.blink_phase = true;
    ctx.settle.cancel();
}
