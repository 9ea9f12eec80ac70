use std::slice;

use tracing::trace;

use super::{Cursor, Movement, Position};
use crate::array::GrowableArray;
use crate::buffer::{Line, LineChange, TextBuffer};
use crate::error::{EditError, EditResult};

/// Characters accepted by text entry: printable ASCII from space to tilde.
pub fn is_insertable(ch: char) -> bool {
    (' '..='~').contains(&ch)
}

/// All cursors of one session. Exactly one of them is the main cursor, which
/// is where edits happen; every other cursor follows the edits it makes.
#[derive(Debug, Clone)]
pub struct CursorSet {
    cursors: GrowableArray<Cursor>,
    main: usize,
}

impl Default for CursorSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorSet {
    pub fn new() -> Self {
        Self {
            cursors: GrowableArray::singleton(Cursor::new()),
            main: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Cursor> {
        self.cursors.iter()
    }

    pub fn main_index(&self) -> usize {
        self.main
    }

    pub fn main(&self) -> &Cursor {
        // `main` is kept in range by every method that changes the set
        &self.cursors.as_slice()[self.main]
    }

    pub fn main_mut(&mut self) -> &mut Cursor {
        &mut self.cursors.as_mut_slice()[self.main]
    }

    pub fn position(&self) -> Position {
        self.main().position()
    }

    /// Add a cursor at `position`, clamped into `buffer`. Returns its index.
    pub fn add(&mut self, buffer: &TextBuffer, position: Position) -> EditResult<usize> {
        let cursor = Cursor::at(buffer.clamp(position));
        self.cursors.append(cursor)?;
        Ok(self.cursors.len() - 1)
    }

    /// Remove a secondary or main cursor. The last cursor cannot be removed.
    pub fn remove(&mut self, index: usize) -> EditResult<Cursor> {
        if self.cursors.len() == 1 {
            return Err(EditError::invalid_input("cannot remove the only cursor"));
        }

        let removed = self.cursors.remove(index)?;
        if index < self.main {
            self.main -= 1;
        } else {
            self.main = self.main.min(self.cursors.len() - 1);
        }
        Ok(removed)
    }

    pub fn set_main(&mut self, index: usize) -> EditResult<()> {
        if index >= self.cursors.len() {
            return Err(EditError::index(index, self.cursors.len()));
        }
        self.main = index;
        Ok(())
    }

    /// Drop every cursor except the main one.
    pub fn collapse(&mut self) {
        let main = *self.main();
        self.cursors = GrowableArray::singleton(main);
        self.main = 0;
    }

    pub fn move_main(&mut self, movement: Movement, buffer: &TextBuffer) {
        self.main_mut().apply(movement, buffer);
    }

    /// Shift every cursor and anchor to follow `change`, then clamp them.
    pub fn apply_change(&mut self, change: LineChange, buffer: &TextBuffer) {
        trace!(?change, cursors = self.cursors.len(), "adjusting cursors");
        for cursor in self.cursors.iter_mut() {
            cursor.apply_change(&change, buffer);
        }
    }

    /// Insert `ch` at the main cursor and step past it.
    pub fn insert_character(&mut self, buffer: &mut TextBuffer, ch: char) -> EditResult<()> {
        if !is_insertable(ch) {
            return Err(EditError::invalid_input(format!(
                "{:?} is not a printable character",
                ch
            )));
        }

        let Position { line, column } = self.position();
        let change = buffer.insert_char(line, column, ch)?;
        self.apply_change(change, buffer);
        self.main_mut().set_position(buffer, Position::new(line, column + 1))
    }

    /// Split the line at the main cursor, which lands at the start of the new line.
    pub fn insert_newline(&mut self, buffer: &mut TextBuffer) -> EditResult<()> {
        let Position { line, column } = self.position();
        let change = buffer.split_line_at(line, column)?;
        self.apply_change(change, buffer);
        self.main_mut().set_position(buffer, Position::new(line + 1, 0))
    }

    /// Delete the character before the main cursor, joining with the previous
    /// line at column 0. Returns `false` at the start of the buffer.
    pub fn delete_backward(&mut self, buffer: &mut TextBuffer) -> EditResult<bool> {
        let Position { line, column } = self.position();
        if column > 0 {
            let change = buffer.remove_char(line, column - 1)?;
            self.apply_change(change, buffer);
            self.main_mut()
                .set_position(buffer, Position::new(line, column - 1))?;
            return Ok(true);
        }

        if line == 0 {
            return Ok(false);
        }

        let join_column = buffer.line_len(line - 1)?;
        let change = buffer.join_line_with_next(line - 1)?;
        self.apply_change(change, buffer);
        self.main_mut()
            .set_position(buffer, Position::new(line - 1, join_column))?;
        Ok(true)
    }

    /// Delete the character under the main cursor, joining with the next line
    /// at the end of a line. Returns `false` at the end of the buffer.
    pub fn delete_forward(&mut self, buffer: &mut TextBuffer) -> EditResult<bool> {
        let Position { line, column } = self.position();
        let change = if column < buffer.line_len(line)? {
            buffer.remove_char(line, column)?
        } else if line + 1 < buffer.line_count() {
            buffer.join_line_with_next(line)?
        } else {
            return Ok(false);
        };

        self.apply_change(change, buffer);
        self.main_mut().set_position(buffer, Position::new(line, column))?;
        Ok(true)
    }

    /// Open an empty line above the main cursor and move onto it.
    pub fn insert_line_above(&mut self, buffer: &mut TextBuffer) -> EditResult<()> {
        let line = self.position().line;
        let change = buffer.insert_line(line, Line::new())?;
        self.apply_change(change, buffer);
        self.main_mut().set_position(buffer, Position::new(line, 0))
    }

    /// Delete the main cursor's line. The cursor keeps its line index, clamped.
    pub fn delete_line(&mut self, buffer: &mut TextBuffer) -> EditResult<()> {
        let position = self.position();
        let change = buffer.remove_line(position.line)?;
        self.apply_change(change, buffer);
        let landing = buffer.clamp(position);
        self.main_mut().set_position(buffer, landing)
    }
}

impl<'a> IntoIterator for &'a CursorSet {
    type Item = &'a Cursor;
    type IntoIter = slice::Iter<'a, Cursor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
