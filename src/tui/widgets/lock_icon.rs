//! ASCII lock icon whose shape and color follow the lock state.

use crate::lock::LockState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

/// Width of every icon row.
pub const ICON_WIDTH: u16 = 11;
/// Rows of artwork, not counting the label underneath.
pub const ICON_HEIGHT: u16 = 7;

const LOCKED: [&str; ICON_HEIGHT as usize] = [
    "   .---.   ",
    "  /     \\  ",
    "  |     |  ",
    ".-+-----+-.",
    "|    O    |",
    "|    |    |",
    "'---------'",
];

const UNLOCKED: [&str; ICON_HEIGHT as usize] = [
    "   .---.   ",
    "  /     \\  ",
    "  |        ",
    ".-+-------.",
    "|    O    |",
    "|    |    |",
    "'---------'",
];

const WRONG: [&str; ICON_HEIGHT as usize] = [
    "   .---.   ",
    "  /     \\  ",
    "  |     |  ",
    ".-+-----+-.",
    "|   \\ /   |",
    "|   / \\   |",
    "'---------'",
];

/// Artwork rows for `state`.
pub fn glyph(state: LockState) -> &'static [&'static str; ICON_HEIGHT as usize] {
    match state {
        LockState::Locked => &LOCKED,
        LockState::Unlocked => &UNLOCKED,
        LockState::Wrong => &WRONG,
    }
}

/// Lock artwork centered in its area with the state label below.
#[derive(Debug, Clone, Copy)]
pub struct LockIcon {
    pub state: LockState,
    pub color: Color,
}

impl Widget for LockIcon {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(self.color).add_modifier(Modifier::BOLD);
        let x = area.x + area.width.saturating_sub(ICON_WIDTH) / 2;
        let total = ICON_HEIGHT + 2;
        let top = area.y + area.height.saturating_sub(total) / 2;

        for (row, line) in glyph(self.state).iter().enumerate() {
            let y = top + row as u16;
            if y >= area.bottom() {
                return;
            }
            buf.set_stringn(x, y, line, area.right().saturating_sub(x) as usize, style);
        }

        let label = self.state.label();
        let label_y = top + ICON_HEIGHT + 1;
        if label_y < area.bottom() {
            let label_x = area.x + area.width.saturating_sub(label.len() as u16) / 2;
            buf.set_stringn(
                label_x,
                label_y,
                label,
                area.right().saturating_sub(label_x) as usize,
                style,
            );
        }
    }
}
