//! Cursor positions, selections and movement.
//!
//! A cursor is a plain `(line, column)` pair into a [`TextBuffer`]. It holds no
//! reference into line storage, so reallocation never invalidates it; instead
//! it is shifted and clamped after every structural edit.

mod set;

use crate::buffer::{LineChange, TextBuffer};
use crate::error::{EditError, EditResult};

pub use crate::buffer::Position;
pub use set::{is_insertable, CursorSet};

/// Cursor movements that never modify the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    LineUp,
    LineDown,
    CharacterLeft,
    CharacterRight,
    LineStart,
    LineEnd,
    BufferStart,
    BufferEnd,
    PageUp(usize),
    PageDown(usize),
}

/// An anchored range. `anchor` stays put while `active` follows the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// `(start, end)` in document order.
    pub fn range(&self) -> (Position, Position) {
        if self.anchor <= self.active {
            (self.anchor, self.active)
        } else {
            (self.active, self.anchor)
        }
    }

    pub fn start(&self) -> Position {
        self.range().0
    }

    pub fn end(&self) -> Position {
        self.range().1
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// Half-open containment: `start <= position < end`.
    pub fn contains(&self, position: Position) -> bool {
        let (start, end) = self.range();
        start <= position && position < end
    }

    pub fn text(&self, buffer: &TextBuffer) -> EditResult<String> {
        buffer.text_between(self.anchor, self.active)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    position: Position,
    anchor: Option<Position>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(position: Position) -> Self {
        Self {
            position,
            anchor: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Jump to `position`, which must exist in `buffer`.
    pub fn set_position(&mut self, buffer: &TextBuffer, position: Position) -> EditResult<()> {
        if position.line >= buffer.line_count() {
            return Err(EditError::index(position.line, buffer.line_count()));
        }
        let len = line_len(buffer, position.line);
        if position.column > len {
            return Err(EditError::index(position.column, len));
        }
        self.position = position;
        Ok(())
    }

    pub fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    /// Start a selection anchored at the current position.
    pub fn begin_selection(&mut self) {
        self.anchor = Some(self.position);
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    pub fn selection(&self) -> Option<Selection> {
        self.anchor.map(|anchor| Selection::new(anchor, self.position))
    }

    pub fn apply(&mut self, movement: Movement, buffer: &TextBuffer) {
        match movement {
            Movement::LineUp => self.move_line_up(buffer),
            Movement::LineDown => self.move_line_down(buffer),
            Movement::CharacterLeft => self.move_character_left(buffer),
            Movement::CharacterRight => self.move_character_right(buffer),
            Movement::LineStart => self.move_line_start(),
            Movement::LineEnd => self.move_line_end(buffer),
            Movement::BufferStart => self.move_buffer_start(),
            Movement::BufferEnd => self.move_buffer_end(buffer),
            Movement::PageUp(lines) => self.move_page_up(buffer, lines),
            Movement::PageDown(lines) => self.move_page_down(buffer, lines),
        }
    }

    /// Up one line. At the top the column snaps to 0.
    pub fn move_line_up(&mut self, buffer: &TextBuffer) {
        if self.position.line > 0 {
            self.position.line -= 1;
            self.position.column = self.position.column.min(line_len(buffer, self.position.line));
        } else {
            self.position.column = 0;
        }
    }

    /// Down one line. At the bottom the column snaps to the end of the last line.
    pub fn move_line_down(&mut self, buffer: &TextBuffer) {
        if self.position.line + 1 < buffer.line_count() {
            self.position.line += 1;
            self.position.column = self.position.column.min(line_len(buffer, self.position.line));
        } else {
            self.position.column = line_len(buffer, self.position.line);
        }
    }

    pub fn move_character_left(&mut self, buffer: &TextBuffer) {
        if self.position.column > 0 {
            self.position.column -= 1;
        } else if self.position.line > 0 {
            self.position.line -= 1;
            self.position.column = line_len(buffer, self.position.line);
        }
    }

    pub fn move_character_right(&mut self, buffer: &TextBuffer) {
        if self.position.column < line_len(buffer, self.position.line) {
            self.position.column += 1;
        } else if self.position.line + 1 < buffer.line_count() {
            self.position.line += 1;
            self.position.column = 0;
        }
    }

    pub fn move_line_start(&mut self) {
        self.position.column = 0;
    }

    pub fn move_line_end(&mut self, buffer: &TextBuffer) {
        self.position.column = line_len(buffer, self.position.line);
    }

    pub fn move_buffer_start(&mut self) {
        self.position = Position::zero();
    }

    pub fn move_buffer_end(&mut self, buffer: &TextBuffer) {
        self.position = buffer.end_position();
    }

    pub fn move_page_up(&mut self, buffer: &TextBuffer, lines: usize) {
        self.position.line = self.position.line.saturating_sub(lines.max(1));
        self.position.column = self.position.column.min(line_len(buffer, self.position.line));
    }

    pub fn move_page_down(&mut self, buffer: &TextBuffer, lines: usize) {
        let last = buffer.line_count() - 1;
        self.position.line = self.position.line.saturating_add(lines.max(1)).min(last);
        self.position.column = self.position.column.min(line_len(buffer, self.position.line));
    }

    /// Pull the position (and anchor) back inside `buffer`.
    pub fn clamp(&mut self, buffer: &TextBuffer) {
        self.position = buffer.clamp(self.position);
        self.anchor = self.anchor.map(|anchor| buffer.clamp(anchor));
    }

    /// Follow an edit made elsewhere in the buffer, then clamp.
    pub fn apply_change(&mut self, change: &LineChange, buffer: &TextBuffer) {
        self.position = buffer.clamp(change.shift(self.position));
        self.anchor = self
            .anchor
            .map(|anchor| buffer.clamp(change.shift(anchor)));
    }
}

fn line_len(buffer: &TextBuffer, line: usize) -> usize {
    buffer.line_len(line).unwrap_or(0)
}
