//! The 9×9 sum sheets: a fixed reference table and a fill-in grid drill.
//!
//! The grid drill pairs a shuffled header row with a shuffled header column;
//! every cell asks for the sum of its two headers. Marks are derived from the
//! typed entry on demand, so clearing an entry clears its mark.

/// Rows and columns in both sheets.
pub const GRID_SIZE: usize = 9;
/// Cells in the grid drill.
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;
/// The largest sum on either sheet is 18.
pub const MAX_CELL_DIGITS: usize = 2;

/// Headers in their natural order, `1..=9`.
#[must_use]
pub fn ordered_headers() -> [u32; GRID_SIZE] {
    std::array::from_fn(|i| i as u32 + 1)
}

/// Entry of the fixed sum table at `(row, col)`, both zero-based.
#[must_use]
pub fn table_sum(row: usize, col: usize) -> u32 {
    (row + col + 2) as u32
}

/// How a filled-in drill cell compares with the sum it asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMark {
    Right,
    Wrong,
}

/// Keyboard cursor movement inside the drill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Up,
    Down,
    Left,
    Right,
    /// Row-major successor, wrapping from the last cell to the first.
    Next,
}

#[derive(Debug, Clone)]
pub struct GridDrillState {
    top: [u32; GRID_SIZE],
    left: [u32; GRID_SIZE],
    /// Row-major, `GRID_CELLS` long.
    entries: Vec<String>,
    cursor: (usize, usize),
}

impl GridDrillState {
    /// A blank drill over the given header orders.
    #[must_use]
    pub fn new(top: [u32; GRID_SIZE], left: [u32; GRID_SIZE]) -> Self {
        Self {
            top,
            left,
            entries: vec![String::new(); GRID_CELLS],
            cursor: (0, 0),
        }
    }

    #[must_use]
    pub fn top(&self) -> &[u32; GRID_SIZE] {
        &self.top
    }

    #[must_use]
    pub fn left(&self) -> &[u32; GRID_SIZE] {
        &self.left
    }

    /// `(row, col)` of the cell that receives typed digits.
    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// The sum the cell at `(row, col)` asks for.
    #[must_use]
    pub fn expected(&self, row: usize, col: usize) -> u32 {
        self.left[row] + self.top[col]
    }

    #[must_use]
    pub fn entry(&self, row: usize, col: usize) -> &str {
        self.entries
            .get(row * GRID_SIZE + col)
            .map_or("", String::as_str)
    }

    /// `None` while the cell is blank.
    #[must_use]
    pub fn mark(&self, row: usize, col: usize) -> Option<CellMark> {
        let value = self.entry(row, col).parse::<u32>().ok()?;
        Some(if value == self.expected(row, col) {
            CellMark::Right
        } else {
            CellMark::Wrong
        })
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        (0..GRID_SIZE)
            .flat_map(|row| (0..GRID_SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.mark(row, col) == Some(CellMark::Right))
            .count()
    }

    #[must_use]
    pub fn is_all_correct(&self) -> bool {
        self.correct_count() == GRID_CELLS
    }

    pub(crate) fn move_cursor(&mut self, step: CursorMove) {
        let (row, col) = self.cursor;
        let last = GRID_SIZE - 1;
        self.cursor = match step {
            CursorMove::Up => (row.saturating_sub(1), col),
            CursorMove::Down => ((row + 1).min(last), col),
            CursorMove::Left => (row, col.saturating_sub(1)),
            CursorMove::Right => (row, (col + 1).min(last)),
            CursorMove::Next => {
                let next = (row * GRID_SIZE + col + 1) % GRID_CELLS;
                (next / GRID_SIZE, next % GRID_SIZE)
            }
        };
    }

    /// Append a digit to the cell under the cursor.
    pub(crate) fn push_digit(&mut self, digit: char) -> bool {
        let (row, col) = self.cursor;
        let Some(entry) = self.entries.get_mut(row * GRID_SIZE + col) else {
            return false;
        };
        if !digit.is_ascii_digit() || entry.len() >= MAX_CELL_DIGITS {
            return false;
        }
        entry.push(digit);
        true
    }

    pub(crate) fn backspace(&mut self) {
        let (row, col) = self.cursor;
        if let Some(entry) = self.entries.get_mut(row * GRID_SIZE + col) {
            entry.pop();
        }
    }

    /// Blank every cell. Headers stay where they are.
    pub(crate) fn clear(&mut self) {
        self.entries.iter_mut().for_each(String::clear);
        self.cursor = (0, 0);
    }

    /// New header orders; every cell is blanked.
    pub(crate) fn set_headers(&mut self, top: [u32; GRID_SIZE], left: [u32; GRID_SIZE]) {
        self.top = top;
        self.left = left;
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reversed() -> [u32; GRID_SIZE] {
        let mut headers = ordered_headers();
        headers.reverse();
        headers
    }

    fn fill(drill: &mut GridDrillState, answer: impl Fn(usize, usize) -> u32) {
        drill.cursor = (0, 0);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                for digit in answer(row, col).to_string().chars() {
                    drill.push_digit(digit);
                }
                drill.move_cursor(CursorMove::Next);
            }
        }
    }

    #[test]
    fn sum_table_corners() {
        assert_eq!(table_sum(0, 0), 2);
        assert_eq!(table_sum(8, 8), 18);
        assert_eq!(table_sum(2, 6), 10);
    }

    #[test]
    fn cells_ask_for_left_plus_top() {
        let drill = GridDrillState::new(ordered_headers(), reversed());
        // Row 0 header is 9, column 0 header is 1.
        assert_eq!(drill.expected(0, 0), 10);
        assert_eq!(drill.expected(8, 8), 10);
        assert_eq!(drill.expected(8, 0), 2);
    }

    #[test]
    fn marks_follow_the_entry() {
        let mut drill = GridDrillState::new(ordered_headers(), ordered_headers());
        assert_eq!(drill.mark(0, 0), None);

        drill.push_digit('3');
        assert_eq!(drill.mark(0, 0), Some(CellMark::Wrong));
        drill.backspace();
        assert_eq!(drill.mark(0, 0), None);
        drill.push_digit('2');
        assert_eq!(drill.mark(0, 0), Some(CellMark::Right));
        assert_eq!(drill.correct_count(), 1);
    }

    #[test]
    fn entries_are_capped_at_two_digits() {
        let mut drill = GridDrillState::new(ordered_headers(), ordered_headers());
        assert!(drill.push_digit('1'));
        assert!(drill.push_digit('8'));
        assert!(!drill.push_digit('0'));
        assert!(!drill.push_digit('x'));
        assert_eq!(drill.entry(0, 0), "18");
    }

    #[test]
    fn cursor_clamps_at_edges_and_next_wraps() {
        let mut drill = GridDrillState::new(ordered_headers(), ordered_headers());
        drill.move_cursor(CursorMove::Up);
        drill.move_cursor(CursorMove::Left);
        assert_eq!(drill.cursor(), (0, 0));

        for _ in 0..20 {
            drill.move_cursor(CursorMove::Down);
            drill.move_cursor(CursorMove::Right);
        }
        assert_eq!(drill.cursor(), (8, 8));
        drill.move_cursor(CursorMove::Next);
        assert_eq!(drill.cursor(), (0, 0));

        drill.cursor = (0, 8);
        drill.move_cursor(CursorMove::Next);
        assert_eq!(drill.cursor(), (1, 0));
    }

    #[test]
    fn filling_every_cell_correctly_completes_the_drill() {
        let mut drill = GridDrillState::new(reversed(), ordered_headers());
        let sums: Vec<u32> = (0..GRID_CELLS)
            .map(|i| drill.expected(i / GRID_SIZE, i % GRID_SIZE))
            .collect();
        fill(&mut drill, |row, col| sums[row * GRID_SIZE + col]);
        assert_eq!(drill.correct_count(), GRID_CELLS);
        assert!(drill.is_all_correct());

        drill.cursor = (4, 4);
        drill.backspace();
        assert!(!drill.is_all_correct());
        assert_eq!(drill.correct_count(), GRID_CELLS - 1);
    }

    #[test]
    fn clear_keeps_headers_and_set_headers_blanks_cells() {
        let mut drill = GridDrillState::new(ordered_headers(), ordered_headers());
        fill(&mut drill, |_, _| 7);
        drill.clear();
        assert_eq!(drill.top(), &ordered_headers());
        assert!((0..GRID_SIZE).all(|row| drill.entry(row, 3).is_empty()));

        fill(&mut drill, |_, _| 7);
        drill.set_headers(reversed(), reversed());
        assert_eq!(drill.left(), &reversed());
        assert_eq!(drill.correct_count(), 0);
        assert_eq!(drill.mark(2, 2), None);
        assert_eq!(drill.cursor(), (0, 0));
    }
}
