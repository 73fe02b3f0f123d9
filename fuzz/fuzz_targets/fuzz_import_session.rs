//! Fuzz target: `FlashImportSession`
//!
//! Interprets the input as a stream of session operations (start, import
//! chunks of arbitrary length, finish) and asserts the bounds invariants
//! hold: the buffer offset never leaves the page, the destination page
//! never leaves the reserved zone, and a disarmed session refuses data.
//!
//! cargo fuzz run fuzz_import_session

#![no_main]

use libfuzzer_sys::fuzz_target;
use progbench::app::ports::MediaFlashPort;
use progbench::error::FlashError;
use progbench::proto::import::{FlashImportSession, FlashLayout};

struct NullFlash;

impl MediaFlashPort for NullFlash {
    fn stage(&mut self, _data: &[u8], _offset: u16) -> Result<(), FlashError> {
        Ok(())
    }

    fn commit(&mut self, _page: u16) -> Result<(), FlashError> {
        Ok(())
    }
}

const LAYOUT: FlashLayout = FlashLayout {
    first_page: 4,
    end_page: 12,
    bytes_per_page: 32,
};

fuzz_target!(|data: &[u8]| {
    let mut session = FlashImportSession::new(LAYOUT);
    let mut flash = NullFlash;
    let chunk = [0u8; 64];

    for op in data {
        match op {
            0x00 => session.start(),
            0x01 => {
                let _ = session.finish(&mut flash);
                assert!(!session.is_approved(), "finish must disarm");
            }
            len => {
                let want = *len as usize % chunk.len();
                let before = (session.current_page(), session.buffer_offset());
                let result = session.import(&chunk[..want], &mut flash);

                if result.is_err() {
                    // Bounds rejections must not move the destination.
                    assert_eq!(
                        (session.current_page(), session.buffer_offset()),
                        before
                    );
                }
            }
        }

        assert!(session.buffer_offset() < LAYOUT.bytes_per_page);
        assert!(
            session.current_page() <= LAYOUT.end_page,
            "page left the reserved zone"
        );
    }
});
