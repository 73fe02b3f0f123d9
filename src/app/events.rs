//! Outbound application events.
//!
//! The [`FixtureService`](super::service::FixtureService) and the command
//! dispatcher emit these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them — log to
//! serial, count, feed a production dashboard.

use crate::error::ImportError;
use crate::fsm::StateId;
use crate::stations::StationId;

/// Structured events emitted by the fixture core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The fixture service has started; all stations initialised idle.
    Started,

    /// A station moved between lifecycle states.
    StationStateChanged {
        station: StationId,
        from: StateId,
        to: StateId,
    },

    /// A station's settle timer fired: the board is powered and ready for
    /// the host to program.
    StationReady(StationId),

    /// A media import session was armed.
    ImportStarted,

    /// A full page was committed during import.
    ImportPageFlushed(u16),

    /// An import operation was rejected and the session disarmed.
    ImportRejected(ImportError),

    /// The import session finished and disarmed cleanly.
    ImportFinished,
}
