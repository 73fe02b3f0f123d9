//! Media flash adapter backed by a dedicated data partition.
//!
//! Implements the dataflash page contract (stage into a RAM page buffer,
//! commit the buffer to a page) on top of the ESP-IDF partition API.  The
//! reserved graphic zone is erased when the import session is armed, so
//! commits are plain writes.

use crate::app::ports::MediaFlashPort;
use crate::error::FlashError;

/// Upper bound on the page buffer; the configured page size must fit.
pub const MAX_PAGE_BYTES: usize = 512;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub struct PartitionFlash {
    page_bytes: usize,
    buffer: [u8; MAX_PAGE_BYTES],
    #[cfg(target_os = "espidf")]
    partition: *const esp_partition_t,
}

impl PartitionFlash {
    #[cfg(target_os = "espidf")]
    pub fn new(page_bytes: u16) -> Result<Self, crate::error::Error> {
        // SAFETY: partition table lookup; the handle stays valid for the
        // life of the firmware.
        let partition = unsafe {
            esp_partition_find_first(
                esp_partition_type_t_ESP_PARTITION_TYPE_DATA,
                esp_partition_subtype_t_ESP_PARTITION_SUBTYPE_ANY,
                c"media".as_ptr(),
            )
        };
        if partition.is_null() {
            return Err(crate::error::Error::Init("media partition missing"));
        }
        if page_bytes as usize > MAX_PAGE_BYTES {
            return Err(crate::error::Error::Init("page size exceeds buffer"));
        }
        log::info!("media flash: partition found, {page_bytes} B pages");
        Ok(Self {
            page_bytes: page_bytes as usize,
            buffer: [0; MAX_PAGE_BYTES],
            partition,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(page_bytes: u16) -> Result<Self, crate::error::Error> {
        if page_bytes as usize > MAX_PAGE_BYTES {
            return Err(crate::error::Error::Init("page size exceeds buffer"));
        }
        log::info!("media flash(sim): {page_bytes} B pages, no backing store");
        Ok(Self {
            page_bytes: page_bytes as usize,
            buffer: [0; MAX_PAGE_BYTES],
        })
    }
}

impl MediaFlashPort for PartitionFlash {
    fn stage(&mut self, data: &[u8], offset: u16) -> Result<(), FlashError> {
        let start = offset as usize;
        let end = start + data.len();
        if end > self.page_bytes {
            return Err(FlashError::StageFailed);
        }
        self.buffer[start..end].copy_from_slice(data);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn commit(&mut self, page: u16) -> Result<(), FlashError> {
        let offset = page as usize * self.page_bytes;
        // SAFETY: partition handle valid since new(); write bounds are the
        // driver's to enforce and it fails cleanly past the end.
        let rc = unsafe {
            esp_partition_write(
                self.partition,
                offset,
                self.buffer.as_ptr().cast(),
                self.page_bytes,
            )
        };
        if rc == ESP_OK {
            Ok(())
        } else {
            log::warn!("media flash: commit of page {page} failed (rc={rc})");
            Err(FlashError::CommitFailed)
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn commit(&mut self, _page: u16) -> Result<(), FlashError> {
        Ok(())
    }
}
