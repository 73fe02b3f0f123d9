//! Fuzz target: `PacketView::parse`
//!
//! Drives arbitrary 64-byte reports into the packet parser and asserts
//! it never panics and never yields a payload outside the report's
//! payload region.
//!
//! cargo fuzz run fuzz_packet_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use progbench::proto::codec::{build_reply, PacketView, MAX_PAYLOAD, PACKET_SIZE};

fuzz_target!(|data: &[u8]| {
    let mut raw = [0u8; PACKET_SIZE];
    let n = data.len().min(PACKET_SIZE);
    raw[..n].copy_from_slice(&data[..n]);

    if let Some(view) = PacketView::parse(&raw) {
        assert!(view.payload.len() <= MAX_PAYLOAD, "payload exceeds report");
        assert_eq!(view.cmd, raw[0]);

        // Re-encoding what was parsed must parse identically.
        let rebuilt = build_reply(view.cmd, view.payload);
        let again = PacketView::parse(&rebuilt).expect("rebuilt report must parse");
        assert_eq!(again.payload, view.payload);
    }
});
