//! Function-pointer finite state machine for one programming station.
//!
//! Classic embedded FSM pattern: a static table of state descriptors with
//! `on_enter` / `on_update` function pointers, and a tiny engine holding
//! the current-state index.  Nine engine instances share the one table;
//! each carries its own [`StationContext`](context::StationContext).
//!
//! ```text
//!            ┌──[insert]──────────────────────────┐
//!            │                                    │
//!  IDLE ──[insert]──▶ PROGRAMMING ──[5V fault]──▶ ERROR_SHORTED
//!    ▲                 │        ▲                 │
//!    │          [host failure]  └────[insert]─────┘
//!    │                 ▼
//!    │               ERROR
//!    │                 │
//!    └──[host success, from any state]
//! ```
//!
//! Host success/failure reports arrive through
//! [`StationFsm::force_transition`]; everything else advances on the
//! per-iteration [`StationFsm::tick`].

pub mod context;
pub mod states;

use context::StationContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of the station lifecycle states.
/// Must stay in sync with the table in [`states::state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    Programming = 1,
    ErrorShorted = 2,
    Error = 3,
}

impl StateId {
    /// Total number of states — sizes the table array.
    pub const COUNT: usize = 4;

    /// Convert an index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Error` in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Programming,
            2 => Self::ErrorShorted,
            3 => Self::Error,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Error
            }
        }
    }

    /// Whether this state drives the blinking fault indicator.
    pub fn is_error(self) -> bool {
        matches!(self, Self::ErrorShorted | Self::Error)
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` actions, run exactly once per transition.
pub type StateActionFn = fn(&mut StationContext);

/// Per-tick update handler.  Returns `Some(next)` to transition.
pub type StateUpdateFn = fn(&mut StationContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single state.  Stored in a fixed array — no
/// heap, no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// Per-station state machine engine.  All nine instances index into the
/// shared static table.
pub struct StationFsm {
    current: usize,
}

impl StationFsm {
    /// A fresh machine in `Idle`.  Call [`start`](Self::start) before the
    /// first tick to run the initial `on_enter`.
    pub fn new() -> Self {
        Self {
            current: StateId::Idle as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    pub fn start(&mut self, ctx: &mut StationContext) {
        if let Some(enter) = states::state_table()[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance by one control-loop tick: call `on_update` for the current
    /// state and execute any transition it requests.
    pub fn tick(&mut self, ctx: &mut StationContext) {
        let next = (states::state_table()[self.current].on_update)(ctx);
        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Externally reported transition (host success/failure).
    ///
    /// Always executes the entry actions — even when the target equals
    /// the current state — so a success report re-asserts power-off and
    /// the ready indication regardless of prior state.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut StationContext) {
        self.transition(next, ctx);
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut StationContext) {
        let table = states::state_table();
        let next_idx = next_id as usize;

        info!(
            "{}: {} -> {}",
            ctx.id, table[self.current].name, table[next_idx].name
        );

        self.current = next_idx;
        if let Some(enter) = table[self.current].on_enter {
            enter(ctx);
        }
    }
}

impl Default for StationFsm {
    fn default() -> Self {
        Self::new()
    }
}
