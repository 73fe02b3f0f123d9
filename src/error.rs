//! Unified error types for the bench firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level control loop's error handling uniform.  All variants are `Copy`
//! so they can be passed through the dispatcher and station machinery
//! without allocation.
//!
//! Nothing in here is fatal: a bus error skips one station for one loop
//! iteration, and every protocol violation is reported to the host as a
//! single status byte.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An expander bus transaction failed.
    Bus(BusError),
    /// A media flash import was rejected.
    Import(ImportError),
    /// The media flash collaborator reported a failure.
    Flash(FlashError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Import(e) => write!(f, "import: {e}"),
            Self::Flash(e) => write!(f, "flash: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Expander bus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// The addressed expander did not acknowledge.
    Nak,
    /// The transaction did not complete in time.
    Timeout,
    /// Generic I/O error from the bus driver.
    Io,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nak => write!(f, "no acknowledge"),
            Self::Timeout => write!(f, "transaction timeout"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Media import errors
// ---------------------------------------------------------------------------

/// Rejection reasons for the flash-import protocol.  Any of these disarms
/// the session; the host must restart from `ImportMediaStart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportError {
    /// `ImportMedia` received without a prior `ImportMediaStart`.
    NotApproved,
    /// The destination page has reached the end of the reserved zone.
    PageOutOfRange,
    /// Appending the payload would overrun the page buffer.
    PageOverflow,
    /// The flash collaborator failed while staging or committing.
    Flash(FlashError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApproved => write!(f, "import not approved"),
            Self::PageOutOfRange => write!(f, "page out of reserved zone"),
            Self::PageOverflow => write!(f, "payload overruns page buffer"),
            Self::Flash(e) => write!(f, "flash: {e}"),
        }
    }
}

impl From<ImportError> for Error {
    fn from(e: ImportError) -> Self {
        Self::Import(e)
    }
}

impl From<FlashError> for ImportError {
    fn from(e: FlashError) -> Self {
        Self::Flash(e)
    }
}

// ---------------------------------------------------------------------------
// Media flash collaborator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashError {
    /// The staging write was rejected by the flash driver.
    StageFailed,
    /// The page commit was rejected by the flash driver.
    CommitFailed,
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StageFailed => write!(f, "buffer stage failed"),
            Self::CommitFailed => write!(f, "page commit failed"),
        }
    }
}

impl From<FlashError> for Error {
    fn from(e: FlashError) -> Self {
        Self::Flash(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
