//! Host-facing packet protocol.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                   Protocol Stack                       │
//! │                                                        │
//! │  ┌───────────┐   ┌─────────┐   ┌────────────────────┐  │
//! │  │ Transport │──▶│  Codec  │──▶│  Dispatcher        │  │
//! │  │ (trait)   │   │ (64B    │   │  → FixtureService  │  │
//! │  └───────────┘   │  report)│   │  → ImportSession   │  │
//! │                  └─────────┘   └────────────────────┘  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! One fixed-size report per command, one reply per report (except for
//! unrecognized tags, which are dropped silently).

pub mod codec;
pub mod commands;
pub mod dispatcher;
pub mod import;
