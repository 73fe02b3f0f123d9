//! Command dispatcher — decodes one report and executes the operation.
//!
//! Query commands (ping, version, status, button drain, RNG) reply with a
//! dedicated payload immediately; every other recognized command performs
//! its mutation and replies with a single OK/ERROR status byte.
//! Unrecognized tags are dropped without a reply.
//!
//! The dispatcher owns the media import session and reaches into the
//! station machinery through [`FixtureService`] — host success/failure
//! reports are the callback path from the host's programmer back into the
//! per-station state machines.

use log::{debug, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{
    DisplayLine, DisplayPort, EventSink, MediaFlashPort, PacketTransport, RngPort, StationBank,
};
use crate::app::service::FixtureService;
use crate::stations::StationId;

use super::codec::{self, PacketView, RawPacket};
use super::commands::{Command, STATUS_ERROR, STATUS_OK};
use super::import::{FlashImportSession, FlashLayout};

/// Identifier of the dataflash fitted to the bench, reported in the
/// version string so host tooling can pick matching image geometry.
const FLASH_CHIP_STR: &str = "AT45DB011D";

/// Bytes returned by `GetRandomNumber`.
const RANDOM_REPLY_LEN: usize = 32;

pub struct CommandDispatcher {
    import: FlashImportSession,
}

impl CommandDispatcher {
    pub fn new(layout: FlashLayout) -> Self {
        Self {
            import: FlashImportSession::new(layout),
        }
    }

    /// Decode and execute one report.  At most one reply is sent.
    #[allow(clippy::too_many_arguments)] // one port per collaborator, injected at the call site
    pub fn process(
        &mut self,
        raw: &RawPacket,
        svc: &mut FixtureService,
        bank: &mut impl StationBank,
        flash: &mut impl MediaFlashPort,
        rng: &mut impl RngPort,
        display: &mut impl DisplayPort,
        transport: &mut impl PacketTransport,
        sink: &mut impl EventSink,
    ) {
        let Some(view) = PacketView::parse(raw) else {
            warn!("dispatcher: malformed report dropped (len byte {})", raw[1]);
            return;
        };
        let Some(cmd) = Command::from_tag(view.cmd) else {
            debug!("dispatcher: unknown tag 0x{:02X} dropped", view.cmd);
            return;
        };

        let status = match cmd {
            // ── Immediate-reply queries ───────────────────────
            Command::Ping => {
                transport.send(&codec::ping_echo(raw));
                return;
            }
            Command::Version => {
                transport.send(&codec::build_reply(cmd.tag(), &version_payload()));
                return;
            }
            Command::Status => {
                transport.send(&codec::build_reply(cmd.tag(), &[0x00]));
                return;
            }
            Command::ButtonPressed => {
                let pending = svc.take_button_pending();
                transport.send(&codec::build_reply(cmd.tag(), &pending));
                return;
            }
            Command::GetRandomNumber => {
                let mut bytes = [0u8; RANDOM_REPLY_LEN];
                rng.fill(&mut bytes);
                transport.send(&codec::build_reply(cmd.tag(), &bytes));
                return;
            }
            Command::GetAvailableRandomByteCount => {
                let count = rng.buffered_words().saturating_mul(4);
                transport.send(&codec::build_reply(cmd.tag(), &[count]));
                return;
            }

            // ── Media flash import ────────────────────────────
            Command::ImportMediaStart => {
                self.import.start();
                sink.emit(&AppEvent::ImportStarted);
                STATUS_OK
            }
            Command::ImportMedia => match self.import.import(view.payload, flash) {
                Ok(Some(page)) => {
                    sink.emit(&AppEvent::ImportPageFlushed(page));
                    STATUS_OK
                }
                Ok(None) => STATUS_OK,
                Err(e) => {
                    warn!("import rejected: {e}");
                    sink.emit(&AppEvent::ImportRejected(e));
                    STATUS_ERROR
                }
            },
            Command::ImportMediaEnd => match self.import.finish(flash) {
                Ok(()) => {
                    sink.emit(&AppEvent::ImportFinished);
                    STATUS_OK
                }
                Err(e) => {
                    warn!("import finish failed: {e}");
                    sink.emit(&AppEvent::ImportRejected(e));
                    STATUS_ERROR
                }
            },

            // ── Station report callbacks ──────────────────────
            Command::ProgDone => match report_target(view.payload) {
                Some(id) => {
                    svc.programming_success(id, bank, sink);
                    STATUS_OK
                }
                None => STATUS_ERROR,
            },
            Command::ProgFailure => match report_target(view.payload) {
                Some(id) => {
                    svc.programming_failure(id, bank, sink);
                    STATUS_OK
                }
                None => STATUS_ERROR,
            },

            // ── Operator display ──────────────────────────────
            Command::DisplayLine1 => {
                display.write_line(DisplayLine::One, line_text(view.payload));
                STATUS_OK
            }
            Command::DisplayLine2 => {
                display.write_line(DisplayLine::Two, line_text(view.payload));
                STATUS_OK
            }
            Command::DisplayLine3 => {
                display.write_line(DisplayLine::Three, line_text(view.payload));
                STATUS_OK
            }
        };

        transport.send(&codec::build_reply(cmd.tag(), &[status]));
    }

    /// The import session (visible for integration assertions).
    pub fn import_session(&self) -> &FlashImportSession {
        &self.import
    }
}

/// Validate a station-report payload: one in-range station id.
/// An out-of-range id must not touch any station state.
fn report_target(payload: &[u8]) -> Option<StationId> {
    payload.first().copied().and_then(StationId::new)
}

/// Display payloads are NUL-terminated text; anything past the first NUL
/// (or any invalid UTF-8 tail) is ignored.
fn line_text(payload: &[u8]) -> &str {
    let text = match payload.iter().position(|&b| b == 0) {
        Some(nul) => &payload[..nul],
        None => payload,
    };
    match core::str::from_utf8(text) {
        Ok(s) => s,
        Err(e) => core::str::from_utf8(&text[..e.valid_up_to()]).unwrap_or(""),
    }
}

/// `<chip>_<firmware version>`, NUL-terminated, as host tooling expects.
fn version_payload() -> heapless::Vec<u8, { codec::MAX_PAYLOAD }> {
    let mut out = heapless::Vec::new();
    // Infallible: chip id + version stay far below the payload cap.
    let _ = out.extend_from_slice(FLASH_CHIP_STR.as_bytes());
    let _ = out.push(b'_');
    let _ = out.extend_from_slice(env!("CARGO_PKG_VERSION").as_bytes());
    let _ = out.push(0);
    out
}
