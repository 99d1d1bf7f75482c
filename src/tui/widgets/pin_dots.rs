//! Entered-PIN indicator: one filled dot per digit, padded to four slots.

use crate::lock::{EnteredDigits, MAX_DIGITS};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

pub const FILLED: &str = "\u{25cf}";
pub const EMPTY: &str = "\u{25cb}";

/// Glyph for each of the fixed slots.
pub fn slot_glyphs(entered: &EnteredDigits) -> [&'static str; MAX_DIGITS] {
    let mut slots = [EMPTY; MAX_DIGITS];
    for slot in slots.iter_mut().take(entered.len()) {
        *slot = FILLED;
    }
    slots
}

/// Slots joined with spacing, e.g. `● ● ○ ○`.
pub fn slot_line(entered: &EnteredDigits) -> String {
    slot_glyphs(entered).join("   ")
}

#[derive(Debug, Clone, Copy)]
pub struct PinDots<'a> {
    pub entered: &'a EnteredDigits,
    pub filled: Color,
    pub empty: Color,
}

impl Widget for PinDots<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let width = (MAX_DIGITS * 4 - 3) as u16;
        let mut x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height / 2;

        for glyph in slot_glyphs(self.entered) {
            if x >= area.right() {
                break;
            }
            let color = if glyph == FILLED { self.filled } else { self.empty };
            buf.set_string(x, y, glyph, Style::default().fg(color));
            x += 4;
        }
    }
}
