//! Scroll offset mapping buffer coordinates to screen coordinates.
//!
//! Scrolling always follows the cursor, never the other way round.

use std::ops::Range;

use crate::buffer::Position;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_line: usize,
    pub scroll_column: usize,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scroll just enough that `position.line` is inside the visible rows.
    pub fn follow_cursor(&mut self, position: Position, visible_lines: usize) {
        let visible_lines = visible_lines.max(1);
        if position.line < self.scroll_line {
            self.scroll_line = position.line;
        } else if position.line > self.scroll_line + visible_lines - 1 {
            self.scroll_line = position.line - visible_lines + 1;
        }
    }

    /// Horizontal counterpart of [`Viewport::follow_cursor`].
    pub fn follow_column(&mut self, column: usize, visible_columns: usize) {
        let visible_columns = visible_columns.max(1);
        if column < self.scroll_column {
            self.scroll_column = column;
        } else if column > self.scroll_column + visible_columns - 1 {
            self.scroll_column = column - visible_columns + 1;
        }
    }

    /// Buffer lines that fall on screen.
    pub fn visible_range(&self, line_count: usize, visible_lines: usize) -> Range<usize> {
        let start = self.scroll_line.min(line_count);
        let end = self.scroll_line.saturating_add(visible_lines).min(line_count);
        start..end
    }

    /// Screen-relative `(row, column)` of `position`, or `None` when it is scrolled out.
    pub fn screen_position(
        &self,
        position: Position,
        visible_lines: usize,
        visible_columns: usize,
    ) -> Option<(usize, usize)> {
        let row = position.line.checked_sub(self.scroll_line)?;
        let column = position.column.checked_sub(self.scroll_column)?;
        (row < visible_lines && column < visible_columns).then_some((row, column))
    }
}
