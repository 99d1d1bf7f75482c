//! The static 4x4 keypad grid.

use crate::lock::keypad::{cell_origin, grid_size, CELL_HEIGHT, CELL_WIDTH};
use crate::lock::KEYPAD_LAYOUT;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

/// Screen rectangle of key `index` for a grid centered in `area`.
///
/// Returns `None` for indexes outside the layout and for cells that would
/// not fit entirely inside `area`.
pub fn keypad_cell_rect(area: Rect, index: usize) -> Option<Rect> {
    let (grid_w, grid_h) = grid_size();
    let left = area.x + area.width.saturating_sub(grid_w) / 2;
    let top = area.y + area.height.saturating_sub(grid_h) / 2;
    let (dx, dy) = cell_origin(index)?;

    let cell = Rect::new(left + dx, top + dy, CELL_WIDTH, CELL_HEIGHT);
    (cell.right() <= area.right() && cell.bottom() <= area.bottom()).then_some(cell)
}

#[derive(Debug, Clone, Copy)]
pub struct Keypad {
    /// Index of the key to highlight
    pub highlight: Option<usize>,
    pub key_color: Color,
    pub border_color: Color,
    pub highlight_color: Color,
}

impl Widget for Keypad {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (index, label) in KEYPAD_LAYOUT.iter().enumerate() {
            let Some(cell) = keypad_cell_rect(area, index) else {
                continue;
            };

            let highlighted = self.highlight == Some(index);
            let border = if highlighted {
                self.highlight_color
            } else {
                self.border_color
            };
            let mut label_style = Style::default().fg(self.key_color).add_modifier(Modifier::BOLD);
            if highlighted {
                label_style = label_style.fg(self.highlight_color);
            }

            Paragraph::new(Line::styled(*label, label_style))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(border)),
                )
                .render(cell, buf);
        }
    }
}
