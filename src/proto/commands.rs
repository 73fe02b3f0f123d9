//! Command tag table — the host tool's wire contract.
//!
//! The numeric values are frozen: existing host tooling addresses the
//! bench by these tags and they must never be renumbered.

/// Generic single-byte reply statuses.
pub const STATUS_OK: u8 = 0x01;
pub const STATUS_ERROR: u8 = 0x00;

/// Commands the bench accepts from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    Ping = 0xA1,
    Version = 0xA2,
    GetRandomNumber = 0xAC,
    ImportMediaStart = 0xAE,
    ImportMedia = 0xAF,
    ImportMediaEnd = 0xB0,
    Status = 0xB9,
    ButtonPressed = 0xC0,
    ProgDone = 0xC1,
    ProgFailure = 0xC2,
    DisplayLine1 = 0xC3,
    DisplayLine2 = 0xC4,
    DisplayLine3 = 0xC5,
    GetAvailableRandomByteCount = 0xC6,
}

impl Command {
    /// Decode a wire tag.  `None` for unrecognized tags, which the
    /// dispatcher drops without a reply.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0xA1 => Self::Ping,
            0xA2 => Self::Version,
            0xAC => Self::GetRandomNumber,
            0xAE => Self::ImportMediaStart,
            0xAF => Self::ImportMedia,
            0xB0 => Self::ImportMediaEnd,
            0xB9 => Self::Status,
            0xC0 => Self::ButtonPressed,
            0xC1 => Self::ProgDone,
            0xC2 => Self::ProgFailure,
            0xC3 => Self::DisplayLine1,
            0xC4 => Self::DisplayLine2,
            0xC5 => Self::DisplayLine3,
            0xC6 => Self::GetAvailableRandomByteCount,
            _ => return None,
        })
    }

    /// The wire tag for this command (replies echo it).
    pub const fn tag(self) -> u8 {
        self as u8
    }
}
