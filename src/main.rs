//! Progbench firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  EspI2cBus        EspDirectStation    UsbHostLink            │
//! │  (ExpanderBus)    (DirectStationPins) (PacketTransport)      │
//! │  PartitionFlash   EspRng              LogDisplay             │
//! │  (MediaFlashPort) (RngPort)           (DisplayPort)          │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  FixtureService (9 × station FSM · blink scheduler)    │  │
//! │  │  CommandDispatcher (packet decode · import session)    │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Single-threaded cooperative loop; one iteration drains at most one
//! host packet, then advances every station.

#![deny(unused_must_use)]

use anyhow::{anyhow, Result};
use log::info;

use progbench::app::ports::{EventSink, PacketTransport};
use progbench::app::events::AppEvent;
use progbench::app::service::FixtureService;
use progbench::config::SystemConfig;
use progbench::drivers::direct_station::{init_station_gpio, EspDirectStation, EspInterruptLines};
use progbench::drivers::host_link::UsbHostLink;
use progbench::drivers::i2c_bus::EspI2cBus;
use progbench::drivers::media_flash::PartitionFlash;
use progbench::drivers::oled::LogDisplay;
use progbench::drivers::rng::EspRng;
use progbench::drivers::watchdog::Watchdog;
use progbench::proto::dispatcher::CommandDispatcher;
use progbench::stations::bank::FixtureIo;

// ── Event sink ────────────────────────────────────────────────
//
// Structured events go to the serial log.  A production dashboard link
// would implement the same port.

struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::ImportRejected(e) => log::warn!("event: import rejected ({e})"),
            other => info!("event: {other:?}"),
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger_fallback();

    info!("progbench v{}", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();

    // ── 2. Peripheral bring-up ────────────────────────────────
    init_station_gpio().map_err(|e| anyhow!("gpio init: {e}"))?;
    let bus = EspI2cBus::new().map_err(|e| anyhow!("i2c init: {e}"))?;
    let mut transport = UsbHostLink::new().map_err(|e| anyhow!("host link: {e}"))?;
    let mut flash = PartitionFlash::new(config.media_bytes_per_page)
        .map_err(|e| anyhow!("media flash: {e}"))?;
    let mut rng = EspRng;
    let mut display = LogDisplay;
    let watchdog = Watchdog::new();

    // ── 3. Fixture hardware + expander sweep ──────────────────
    let mut hw = FixtureIo::new(bus, EspInterruptLines::new(), EspDirectStation::new());
    hw.init().map_err(|e| anyhow!("expander init: {e}"))?;

    // ── 4. Domain core ────────────────────────────────────────
    let mut sink = LogEventSink;
    let mut svc = FixtureService::new(&config);
    let mut dispatcher = CommandDispatcher::new(config.media_layout());
    svc.start(&mut hw, &mut sink);

    info!("system ready, entering control loop");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        let now = now_ms();

        // At most one host packet per iteration.
        if let Some(packet) = transport.recv() {
            dispatcher.process(
                &packet,
                &mut svc,
                &mut hw,
                &mut flash,
                &mut rng,
                &mut display,
                &mut transport,
                &mut sink,
            );
        }

        svc.poll(now, &mut hw, &mut sink);
        watchdog.feed();

        pace(config.control_loop_interval_ms);
    }
}

// ── Timing helpers ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn now_ms() -> u32 {
    // SAFETY: plain monotonic clock read.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() } / 1000) as u32
}

#[cfg(not(target_os = "espidf"))]
fn now_ms() -> u32 {
    use std::sync::OnceLock;
    use std::time::Instant;
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_millis() as u32
}

#[cfg(target_os = "espidf")]
fn pace(interval_ms: u32) {
    esp_idf_hal::delay::FreeRtos::delay_ms(interval_ms);
}

#[cfg(not(target_os = "espidf"))]
fn pace(interval_ms: u32) {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(interval_ms)));
}

#[cfg(not(target_os = "espidf"))]
fn env_logger_fallback() {
    // Keep sim runs observable without pulling a logger crate into the
    // firmware dependency set.
    struct StderrLog;
    impl log::Log for StderrLog {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }
        fn log(&self, record: &log::Record) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
        fn flush(&self) {}
    }
    static LOGGER: StderrLog = StderrLog;
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(log::LevelFilter::Info));
}
