//! Multi-packet media flash import session.
//!
//! The host streams a flash image into the reserved graphic zone across
//! many `ImportMedia` packets.  The session tracks authorization, the
//! destination page, and the fill level of the flash chip's page buffer;
//! the buffer itself lives behind the [`MediaFlashPort`] collaborator
//! (stage bytes, commit page).
//!
//! Any bounds violation disarms the session on the spot — the host gets a
//! single ERROR byte and must restart from `ImportMediaStart`.  There is
//! no partial recovery.

use crate::app::ports::MediaFlashPort;
use crate::error::ImportError;

/// Geometry of the reserved import region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashLayout {
    /// First page of the reserved zone.
    pub first_page: u16,
    /// One past the last page of the reserved zone.
    pub end_page: u16,
    /// Page buffer capacity in bytes.
    pub bytes_per_page: u16,
}

/// The one process-wide import session.  Created disarmed at boot.
pub struct FlashImportSession {
    layout: FlashLayout,
    approved: bool,
    current_page: u16,
    buffer_offset: u16,
}

impl FlashImportSession {
    pub fn new(layout: FlashLayout) -> Self {
        Self {
            layout,
            approved: false,
            current_page: 0,
            buffer_offset: 0,
        }
    }

    /// Arm the session at the start of the reserved zone.
    pub fn start(&mut self) {
        self.approved = true;
        self.current_page = self.layout.first_page;
        self.buffer_offset = 0;
    }

    /// Append payload bytes to the page buffer, committing the page when
    /// it fills exactly.  Returns the committed page, if any.
    ///
    /// Every error disarms the session before returning.
    pub fn import(
        &mut self,
        data: &[u8],
        flash: &mut impl MediaFlashPort,
    ) -> Result<Option<u16>, ImportError> {
        self.guarded(|s| {
            if s.current_page >= s.layout.end_page {
                return Err(ImportError::PageOutOfRange);
            }
            if s.buffer_offset as usize + data.len() > s.layout.bytes_per_page as usize {
                return Err(ImportError::PageOverflow);
            }

            flash.stage(data, s.buffer_offset)?;
            s.buffer_offset += data.len() as u16;

            if s.buffer_offset == s.layout.bytes_per_page {
                let page = s.current_page;
                flash.commit(page)?;
                s.current_page += 1;
                s.buffer_offset = 0;
                return Ok(Some(page));
            }
            Ok(None)
        })
    }

    /// Flush any partial page as-is and disarm.  Disarms even when the
    /// flush fails.
    pub fn finish(&mut self, flash: &mut impl MediaFlashPort) -> Result<(), ImportError> {
        let result = if self.approved && self.buffer_offset != 0 {
            flash.commit(self.current_page).map_err(ImportError::from)
        } else {
            Ok(())
        };
        self.approved = false;
        result
    }

    pub fn is_approved(&self) -> bool {
        self.approved
    }

    pub fn current_page(&self) -> u16 {
        self.current_page
    }

    pub fn buffer_offset(&self) -> u16 {
        self.buffer_offset
    }

    /// Run `op` with the approval gate; disarm on any error.
    fn guarded<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, ImportError>,
    ) -> Result<T, ImportError> {
        if !self.approved {
            return Err(ImportError::NotApproved);
        }
        let result = op(self);
        if result.is_err() {
            self.approved = false;
        }
        result
    }
}
