//! Fixed-size report codec.
//!
//! Wire format (both directions, 64-byte reports):
//! ```text
//! ┌─────────┬─────────┬──────────────────────────┐
//! │ cmd (1B)│ len (1B)│ payload (len B, ≤ 62)    │
//! └─────────┴─────────┴──────────────────────────┘
//! ```
//!
//! Replies echo the request's command tag.  Parsing is zero-copy: the
//! payload view borrows the receive buffer.

/// Transport report size.
pub const PACKET_SIZE: usize = 64;

/// Header: command tag + payload length.
pub const HEADER_SIZE: usize = 2;

/// Maximum payload bytes per report.
pub const MAX_PAYLOAD: usize = PACKET_SIZE - HEADER_SIZE;

/// One raw report as the transport delivers it.
pub type RawPacket = [u8; PACKET_SIZE];

/// Zero-copy decoded view of an incoming report.
#[derive(Debug, Clone, Copy)]
pub struct PacketView<'a> {
    pub cmd: u8,
    pub payload: &'a [u8],
}

impl<'a> PacketView<'a> {
    /// Decode a report.  A length byte beyond [`MAX_PAYLOAD`] is a
    /// malformed report; the caller drops it without a reply.
    pub fn parse(raw: &'a RawPacket) -> Option<Self> {
        let len = raw[1] as usize;
        if len > MAX_PAYLOAD {
            return None;
        }
        Some(Self {
            cmd: raw[0],
            payload: &raw[HEADER_SIZE..HEADER_SIZE + len],
        })
    }
}

/// Build a reply report.  Payloads longer than [`MAX_PAYLOAD`] are
/// truncated (callers only pass bounded buffers).
pub fn build_reply(cmd: u8, payload: &[u8]) -> RawPacket {
    let mut out = [0u8; PACKET_SIZE];
    let len = payload.len().min(MAX_PAYLOAD);
    out[0] = cmd;
    out[1] = len as u8;
    out[HEADER_SIZE..HEADER_SIZE + len].copy_from_slice(&payload[..len]);
    out
}

/// Ping reply: echo the request's header plus its first four payload
/// bytes, so the host can match tokens across the link.
pub fn ping_echo(request: &RawPacket) -> RawPacket {
    let mut out = [0u8; PACKET_SIZE];
    out[..HEADER_SIZE + 4].copy_from_slice(&request[..HEADER_SIZE + 4]);
    out
}
