//! Operator display adapter.
//!
//! The panel itself is driven by the display subsystem; the firmware's
//! contract is three text rows.  Until the panel driver lands on this
//! board revision, line text is mirrored to the log so bench operators
//! watching the serial console still see host status messages.

use crate::app::ports::{DisplayLine, DisplayPort};
use log::info;

pub struct LogDisplay;

impl DisplayPort for LogDisplay {
    fn write_line(&mut self, line: DisplayLine, text: &str) {
        let row = match line {
            DisplayLine::One => 1,
            DisplayLine::Two => 2,
            DisplayLine::Three => 3,
        };
        info!("display[{row}]: {text}");
    }
}
