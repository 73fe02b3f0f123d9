//! Packet-level dispatcher round-trips against mock collaborators.

use crate::mock_hw::{MockBank, MockDisplay, MockFlash, MockRng, MockTransport, RecordingSink};
use progbench::app::events::AppEvent;
use progbench::app::ports::DisplayLine;
use progbench::app::service::FixtureService;
use progbench::config::SystemConfig;
use progbench::error::ImportError;
use progbench::fsm::StateId;
use progbench::proto::codec::{build_reply, RawPacket, PACKET_SIZE};
use progbench::proto::commands::{Command, STATUS_ERROR, STATUS_OK};
use progbench::proto::dispatcher::CommandDispatcher;
use progbench::proto::import::FlashLayout;
use progbench::stations::{LedColor, StationId, STATION_COUNT};

/// Everything a dispatch call needs, in one bundle.
struct Bench {
    dispatcher: CommandDispatcher,
    svc: FixtureService,
    bank: MockBank,
    flash: MockFlash,
    rng: MockRng,
    display: MockDisplay,
    transport: MockTransport,
    sink: RecordingSink,
}

/// Page geometry kept small so page-boundary tests stay readable.
const LAYOUT: FlashLayout = FlashLayout {
    first_page: 128,
    end_page: 132,
    bytes_per_page: 256,
};

impl Bench {
    fn new() -> Self {
        let config = SystemConfig::default();
        let mut svc = FixtureService::new(&config);
        let mut bank = MockBank::new();
        let mut sink = RecordingSink::new();
        svc.start(&mut bank, &mut sink);
        bank.calls.clear();

        Self {
            dispatcher: CommandDispatcher::new(LAYOUT),
            svc,
            bank,
            flash: MockFlash::default(),
            rng: MockRng { words: 12 },
            display: MockDisplay::default(),
            transport: MockTransport::new(),
            sink,
        }
    }

    fn send(&mut self, cmd: Command, payload: &[u8]) {
        let raw = build_reply(cmd.tag(), payload);
        self.send_raw(&raw);
    }

    fn send_raw(&mut self, raw: &RawPacket) {
        self.dispatcher.process(
            raw,
            &mut self.svc,
            &mut self.bank,
            &mut self.flash,
            &mut self.rng,
            &mut self.display,
            &mut self.transport,
            &mut self.sink,
        );
    }

    fn last_status(&self) -> (u8, u8) {
        let reply = self.transport.last_sent();
        assert_eq!(reply[1], 1, "generic replies carry one status byte");
        (reply[0], reply[2])
    }
}

// ── Queries ───────────────────────────────────────────────────

#[test]
fn ping_echoes_request_head() {
    let mut bench = Bench::new();
    let raw = build_reply(Command::Ping.tag(), &[0x12, 0x34, 0x56, 0x78, 0x9A]);
    bench.send_raw(&raw);

    let reply = bench.transport.last_sent();
    assert_eq!(&reply[..6], &[0xA1, 5, 0x12, 0x34, 0x56, 0x78]);
}

#[test]
fn version_reports_chip_and_firmware() {
    let mut bench = Bench::new();
    bench.send(Command::Version, &[]);

    let reply = bench.transport.last_sent();
    assert_eq!(reply[0], Command::Version.tag());
    let len = reply[1] as usize;
    let payload = &reply[2..2 + len];
    assert!(payload.starts_with(b"AT45DB011D"));
    assert_eq!(payload.last(), Some(&0));
}

#[test]
fn status_byte_is_fixed() {
    let mut bench = Bench::new();
    bench.send(Command::Status, &[]);

    let reply = bench.transport.last_sent();
    assert_eq!(reply[0], Command::Status.tag());
    assert_eq!(reply[1], 1);
    assert_eq!(reply[2], 0x00);
}

#[test]
fn random_number_reply_is_32_bytes() {
    let mut bench = Bench::new();
    bench.send(Command::GetRandomNumber, &[]);

    let reply = bench.transport.last_sent();
    assert_eq!(reply[0], Command::GetRandomNumber.tag());
    assert_eq!(reply[1], 32);
}

#[test]
fn available_random_bytes_is_words_times_four() {
    let mut bench = Bench::new();
    bench.rng.words = 12;
    bench.send(Command::GetAvailableRandomByteCount, &[]);
    assert_eq!(bench.last_status().1, 48);

    // Saturates rather than wrapping for a full source.
    bench.rng.words = 200;
    bench.send(Command::GetAvailableRandomByteCount, &[]);
    assert_eq!(bench.last_status().1, 255);
}

#[test]
fn unknown_tag_gets_no_reply() {
    let mut bench = Bench::new();
    let mut raw = [0u8; PACKET_SIZE];
    raw[0] = 0x7F;
    bench.send_raw(&raw);
    assert!(bench.transport.sent.is_empty());
}

#[test]
fn malformed_length_gets_no_reply() {
    let mut bench = Bench::new();
    let mut raw = [0u8; PACKET_SIZE];
    raw[0] = Command::Status.tag();
    raw[1] = 63; // exceeds the 62-byte payload region
    bench.send_raw(&raw);
    assert!(bench.transport.sent.is_empty());
}

// ── Button drain ──────────────────────────────────────────────

#[test]
fn button_query_drains_pending_flags() {
    let mut bench = Bench::new();
    let id = StationId::new(2).unwrap();

    // Insert and let the settle timer fire.
    bench.bank.press(id);
    let mut sink = RecordingSink::new();
    bench.svc.poll(0, &mut bench.bank, &mut sink);
    bench.bank.release(id);
    bench.svc.poll(200, &mut bench.bank, &mut sink);

    bench.send(Command::ButtonPressed, &[]);
    let reply = *bench.transport.last_sent();
    assert_eq!(reply[1] as usize, STATION_COUNT);
    let mut expected = [0u8; STATION_COUNT];
    expected[2] = 1;
    assert_eq!(&reply[2..2 + STATION_COUNT], &expected);

    // Drained: a second query is all zeros.
    bench.send(Command::ButtonPressed, &[]);
    let reply = bench.transport.last_sent();
    assert_eq!(&reply[2..2 + STATION_COUNT], &[0u8; STATION_COUNT]);
}

// ── Media import ──────────────────────────────────────────────

#[test]
fn import_split_page_commits_exactly_once() {
    let mut bench = Bench::new();
    bench.send(Command::ImportMediaStart, &[]);
    assert_eq!(bench.last_status(), (Command::ImportMediaStart.tag(), STATUS_OK));

    // 62 × 4 + 8 = 256 bytes across five packets (wire cap is 62).
    bench.send(Command::ImportMedia, &[0xAA; 62]);
    bench.send(Command::ImportMedia, &[0xAA; 62]);
    bench.send(Command::ImportMedia, &[0xAA; 62]);
    bench.send(Command::ImportMedia, &[0xAA; 62]);
    assert!(bench.flash.commits.is_empty());
    bench.send(Command::ImportMedia, &[0xAA; 8]);

    assert_eq!(bench.last_status().1, STATUS_OK);
    assert_eq!(bench.flash.commits.len(), 1);
    assert_eq!(bench.flash.commits[0].0, 128);
    assert_eq!(bench.dispatcher.import_session().current_page(), 129);
    assert_eq!(bench.dispatcher.import_session().buffer_offset(), 0);
    assert!(bench.sink.contains(&AppEvent::ImportPageFlushed(128)));
}

#[test]
fn import_without_start_is_rejected() {
    let mut bench = Bench::new();
    bench.send(Command::ImportMedia, &[0u8; 16]);

    assert_eq!(bench.last_status().1, STATUS_ERROR);
    assert_eq!(bench.dispatcher.import_session().current_page(), 0);
    assert_eq!(bench.dispatcher.import_session().buffer_offset(), 0);
    assert!(bench
        .sink
        .contains(&AppEvent::ImportRejected(ImportError::NotApproved)));
    assert!(bench.flash.commits.is_empty());
}

#[test]
fn import_overflow_disarms_session() {
    let mut bench = Bench::new();
    bench.send(Command::ImportMediaStart, &[]);

    // 250 staged, then 10 more would cross the 256-byte page boundary.
    for _ in 0..5 {
        bench.send(Command::ImportMedia, &[0u8; 50]);
    }
    bench.send(Command::ImportMedia, &[0u8; 10]);
    assert_eq!(bench.last_status().1, STATUS_ERROR);

    // Disarmed: the follow-up is refused too.
    bench.send(Command::ImportMedia, &[0u8; 1]);
    assert_eq!(bench.last_status().1, STATUS_ERROR);
    assert!(bench
        .sink
        .contains(&AppEvent::ImportRejected(ImportError::PageOverflow)));
}

#[test]
fn import_end_flushes_partial_page_only() {
    let mut bench = Bench::new();

    // Nothing buffered: end commits nothing.
    bench.send(Command::ImportMediaStart, &[]);
    bench.send(Command::ImportMediaEnd, &[]);
    assert_eq!(bench.last_status().1, STATUS_OK);
    assert!(bench.flash.commits.is_empty());

    // Partial page: exactly one commit.
    bench.send(Command::ImportMediaStart, &[]);
    bench.send(Command::ImportMedia, &[0x33; 40]);
    bench.send(Command::ImportMediaEnd, &[]);
    assert_eq!(bench.flash.commits.len(), 1);
    assert_eq!(bench.flash.commits[0].1.len(), 40);
    assert!(bench.sink.contains(&AppEvent::ImportFinished));

    // Session is disarmed after end.
    bench.send(Command::ImportMedia, &[0u8; 1]);
    assert_eq!(bench.last_status().1, STATUS_ERROR);
}

// ── Station report callbacks ──────────────────────────────────

#[test]
fn prog_done_resets_station_through_dispatcher() {
    let mut bench = Bench::new();
    let id = StationId::new(4).unwrap();

    bench.bank.press(id);
    let mut sink = RecordingSink::new();
    bench.svc.poll(0, &mut bench.bank, &mut sink);
    assert_eq!(bench.svc.station_state(id), StateId::Programming);

    bench.send(Command::ProgDone, &[4]);
    assert_eq!(bench.last_status().1, STATUS_OK);
    assert_eq!(bench.svc.station_state(id), StateId::Idle);
    assert_eq!(bench.bank.last_power(id), Some(false));
    assert_eq!(bench.bank.last_led(id), Some(LedColor::Green));
}

#[test]
fn prog_failure_parks_station_in_error() {
    let mut bench = Bench::new();
    bench.send(Command::ProgFailure, &[8]);

    assert_eq!(bench.last_status().1, STATUS_OK);
    assert_eq!(bench.svc.station_state(StationId::DIRECT), StateId::Error);
    assert_eq!(bench.bank.last_led(StationId::DIRECT), Some(LedColor::Red));
}

#[test]
fn station_report_bounds_checked() {
    let mut bench = Bench::new();

    bench.send(Command::ProgDone, &[9]);
    assert_eq!(bench.last_status().1, STATUS_ERROR);

    bench.send(Command::ProgFailure, &[]);
    assert_eq!(bench.last_status().1, STATUS_ERROR);

    // No station was touched.
    assert!(bench.bank.calls.is_empty());
    for id in StationId::all() {
        assert_eq!(bench.svc.station_state(id), StateId::Idle);
    }
}

// ── Display forwarding ────────────────────────────────────────

#[test]
fn display_lines_forward_text() {
    let mut bench = Bench::new();
    bench.send(Command::DisplayLine1, b"SERIAL 0042\0");
    bench.send(Command::DisplayLine2, b"FLASHING\0");
    bench.send(Command::DisplayLine3, b"OK\0");

    assert_eq!(bench.last_status().1, STATUS_OK);
    assert_eq!(
        bench.display.lines,
        vec![
            (DisplayLine::One, "SERIAL 0042".to_string()),
            (DisplayLine::Two, "FLASHING".to_string()),
            (DisplayLine::Three, "OK".to_string()),
        ]
    );
}
