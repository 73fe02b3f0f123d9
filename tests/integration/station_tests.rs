//! FixtureService → station FSM → bank scenarios.

use crate::mock_hw::{BankCall, MockBank, RecordingSink};
use progbench::app::events::AppEvent;
use progbench::app::service::FixtureService;
use progbench::config::SystemConfig;
use progbench::fsm::StateId;
use progbench::stations::{LedColor, StationId, STATION_COUNT};

fn service() -> (FixtureService, MockBank, RecordingSink) {
    let config = SystemConfig::default();
    let mut svc = FixtureService::new(&config);
    let mut bank = MockBank::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut bank, &mut sink);
    bank.calls.clear();
    (svc, bank, sink)
}

#[test]
fn boot_leaves_every_station_idle_and_green() {
    let config = SystemConfig::default();
    let mut svc = FixtureService::new(&config);
    let mut bank = MockBank::new();
    let mut sink = RecordingSink::new();
    svc.start(&mut bank, &mut sink);

    for id in StationId::all() {
        assert_eq!(svc.station_state(id), StateId::Idle);
        assert_eq!(bank.last_led(id), Some(LedColor::Green));
        assert_eq!(bank.last_power(id), Some(false));
    }
    assert!(sink.contains(&AppEvent::Started));
}

#[test]
fn insert_powers_station_and_settle_flags_ready() {
    let (mut svc, mut bank, mut sink) = service();
    let id = StationId::new(3).unwrap();

    bank.press(id);
    svc.poll(0, &mut bank, &mut sink);

    assert_eq!(svc.station_state(id), StateId::Programming);
    assert_eq!(bank.last_led(id), Some(LedColor::Orange));
    assert_eq!(bank.last_power(id), Some(true));
    assert!(sink.contains(&AppEvent::StationStateChanged {
        station: id,
        from: StateId::Idle,
        to: StateId::Programming,
    }));

    // Switch released; nothing happens before the settle delay elapses.
    bank.release(id);
    svc.poll(100, &mut bank, &mut sink);
    assert_eq!(svc.take_button_pending(), [0; STATION_COUNT]);
    assert!(!sink.contains(&AppEvent::StationReady(id)));

    // 200 ms without a host report: ready is signalled, state unchanged.
    svc.poll(200, &mut bank, &mut sink);
    assert_eq!(svc.station_state(id), StateId::Programming);
    assert!(sink.contains(&AppEvent::StationReady(id)));

    let mut expected = [0u8; STATION_COUNT];
    expected[3] = 1;
    assert_eq!(svc.take_button_pending(), expected);
    // Drained: an immediate second query is all zeros.
    assert_eq!(svc.take_button_pending(), [0; STATION_COUNT]);
}

#[test]
fn fault_during_programming_cuts_power() {
    let (mut svc, mut bank, mut sink) = service();
    let id = StationId::new(6).unwrap();

    bank.press(id);
    svc.poll(0, &mut bank, &mut sink);
    bank.fault(id);
    svc.poll(10, &mut bank, &mut sink);

    assert_eq!(svc.station_state(id), StateId::ErrorShorted);
    assert_eq!(bank.last_power(id), Some(false));
    assert_eq!(bank.last_led(id), Some(LedColor::Red));

    // The settle timer was cancelled with the supply: no late ready flag.
    bank.release(id);
    svc.poll(500, &mut bank, &mut sink);
    assert_eq!(svc.take_button_pending(), [0; STATION_COUNT]);
}

#[test]
fn fault_line_outside_programming_is_ignored() {
    let (mut svc, mut bank, mut sink) = service();
    let id = StationId::new(2).unwrap();

    bank.fault(id);
    svc.poll(0, &mut bank, &mut sink);
    assert_eq!(svc.station_state(id), StateId::Idle);
}

#[test]
fn error_station_blinks_at_cadence() {
    let (mut svc, mut bank, mut sink) = service();
    let id = StationId::new(1).unwrap();

    bank.press(id);
    svc.poll(0, &mut bank, &mut sink);
    bank.fault(id);
    svc.poll(10, &mut bank, &mut sink);
    bank.release(id);
    bank.calls.clear();

    // First 500 ms boundary: phase flips off.
    svc.poll(520, &mut bank, &mut sink);
    assert_eq!(bank.last_led(id), Some(LedColor::Black));

    // Next boundary: back on.
    svc.poll(1040, &mut bank, &mut sink);
    assert_eq!(bank.last_led(id), Some(LedColor::Red));

    // Healthy stations are never touched by the blink scheduler.
    let healthy = StationId::new(0).unwrap();
    assert!(bank.calls.iter().all(|c| !matches!(c, BankCall::Led(s, _) if *s == healthy)));
}

#[test]
fn blink_stops_after_successful_retry() {
    let (mut svc, mut bank, mut sink) = service();
    let id = StationId::new(4).unwrap();

    bank.press(id);
    svc.poll(0, &mut bank, &mut sink);
    bank.fault(id);
    svc.poll(10, &mut bank, &mut sink);

    // Operator re-inserts; station re-arms and the scheduler leaves it be.
    bank.press(id);
    svc.poll(20, &mut bank, &mut sink);
    assert_eq!(svc.station_state(id), StateId::Programming);
    bank.release(id);
    bank.calls.clear();

    svc.poll(520, &mut bank, &mut sink);
    svc.poll(1040, &mut bank, &mut sink);
    assert!(bank.calls.iter().all(|c| !matches!(c, BankCall::Led(..))));
}

#[test]
fn success_report_restores_ready_from_any_state() {
    let (mut svc, mut bank, mut sink) = service();

    for id in StationId::all() {
        bank.calls.clear();
        svc.programming_success(id, &mut bank, &mut sink);
        assert_eq!(svc.station_state(id), StateId::Idle, "{id}");
        assert_eq!(bank.last_power(id), Some(false));
        assert_eq!(bank.last_led(id), Some(LedColor::Green));
    }
}

#[test]
fn failure_report_parks_station_in_error() {
    let (mut svc, mut bank, mut sink) = service();
    let id = StationId::DIRECT;

    bank.press(id);
    svc.poll(0, &mut bank, &mut sink);
    svc.programming_failure(id, &mut bank, &mut sink);

    assert_eq!(svc.station_state(id), StateId::Error);
    assert_eq!(bank.last_power(id), Some(false));
    assert_eq!(bank.last_led(id), Some(LedColor::Red));
    assert!(sink.contains(&AppEvent::StationStateChanged {
        station: id,
        from: StateId::Programming,
        to: StateId::Error,
    }));
}

#[test]
fn bus_error_on_one_station_spares_the_rest() {
    let (mut svc, mut bank, mut sink) = service();
    let dead = StationId::new(0).unwrap();
    let live = StationId::new(5).unwrap();

    bank.failing = Some(dead);
    bank.press(dead);
    bank.press(live);
    svc.poll(0, &mut bank, &mut sink);

    assert_eq!(svc.station_state(dead), StateId::Idle);
    assert_eq!(svc.station_state(live), StateId::Programming);
}

#[test]
fn assertion_between_polls_is_missed() {
    // Level-polled lines: an insert pulse that rises and falls between
    // two polls never reaches the state machine.  Documented behaviour.
    let (mut svc, mut bank, mut sink) = service();
    let id = StationId::new(7).unwrap();

    svc.poll(0, &mut bank, &mut sink);
    bank.press(id);
    bank.release(id); // gone before the next poll
    svc.poll(10, &mut bank, &mut sink);

    assert_eq!(svc.station_state(id), StateId::Idle);
}
