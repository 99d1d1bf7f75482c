//! Fixed 4x4 keypad layout and its grid arithmetic.
//!
//! Offsets are in terminal cells relative to the top-left corner of the grid.

pub const KEYPAD_ROWS: usize = 4;
pub const KEYPAD_COLUMNS: usize = 4;

/// Labels of the physical membrane keypad, row-major.
pub const KEYPAD_LAYOUT: [&str; KEYPAD_ROWS * KEYPAD_COLUMNS] = [
    "1", "2", "3", "A", //
    "4", "5", "6", "B", //
    "7", "8", "9", "C", //
    "*", "0", "#", "D",
];

/// Width of one key cell, including its border.
pub const CELL_WIDTH: u16 = 7;
/// Height of one key cell, including its border.
pub const CELL_HEIGHT: u16 = 3;
/// Blank cells between neighbouring keys.
pub const CELL_GAP: u16 = 1;

/// Row and column of the key at `index`.
pub fn cell_position(index: usize) -> Option<(usize, usize)> {
    (index < KEYPAD_LAYOUT.len()).then(|| (index / KEYPAD_COLUMNS, index % KEYPAD_COLUMNS))
}

/// Offset `(x, y)` of the key at `index` from the grid origin.
pub fn cell_origin(index: usize) -> Option<(u16, u16)> {
    cell_position(index).map(|(row, col)| {
        (
            col as u16 * (CELL_WIDTH + CELL_GAP),
            row as u16 * (CELL_HEIGHT + CELL_GAP),
        )
    })
}

/// Total `(width, height)` of the grid.
pub const fn grid_size() -> (u16, u16) {
    let cols = KEYPAD_COLUMNS as u16;
    let rows = KEYPAD_ROWS as u16;
    (
        cols * CELL_WIDTH + (cols - 1) * CELL_GAP,
        rows * CELL_HEIGHT + (rows - 1) * CELL_GAP,
    )
}

/// Index of the key labelled `c`, if the keypad has one.
pub fn index_of(c: char) -> Option<usize> {
    let mut buf = [0u8; 4];
    let label: &str = c.encode_utf8(&mut buf);
    KEYPAD_LAYOUT.iter().position(|l| *l == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_row_major() {
        assert_eq!(cell_position(0), Some((0, 0)));
        assert_eq!(cell_position(3), Some((0, 3)));
        assert_eq!(cell_position(4), Some((1, 0)));
        assert_eq!(cell_position(15), Some((3, 3)));
        assert_eq!(cell_position(16), None);
        assert_eq!(KEYPAD_LAYOUT[13], "0");
        assert_eq!(KEYPAD_LAYOUT[12], "*");
    }

    #[test]
    fn test_cell_origin_includes_gap() {
        assert_eq!(cell_origin(0), Some((0, 0)));
        assert_eq!(cell_origin(1), Some((CELL_WIDTH + CELL_GAP, 0)));
        assert_eq!(cell_origin(5), Some((CELL_WIDTH + CELL_GAP, CELL_HEIGHT + CELL_GAP)));
        assert_eq!(
            cell_origin(15),
            Some((3 * (CELL_WIDTH + CELL_GAP), 3 * (CELL_HEIGHT + CELL_GAP)))
        );
    }

    #[test]
    fn test_last_cell_ends_at_grid_edge() {
        let (w, h) = grid_size();
        let (x, y) = cell_origin(15).unwrap();
        assert_eq!(x + CELL_WIDTH, w);
        assert_eq!(y + CELL_HEIGHT, h);
    }

    #[test]
    fn test_index_of() {
        assert_eq!(index_of('1'), Some(0));
        assert_eq!(index_of('D'), Some(15));
        assert_eq!(index_of('#'), Some(14));
        assert_eq!(index_of('x'), None);
    }
}
