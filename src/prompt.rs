//! One-line text input shown in the status line.

use crate::buffer::Line;
use crate::cursor::is_insertable;
use crate::error::{EditError, EditResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    label: String,
    input: Line,
    cursor: usize,
}

impl Prompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            input: Line::new(),
            cursor: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Typed text, without the label.
    pub fn text(&self) -> String {
        self.input.to_string()
    }

    /// Column of the input cursor within the typed text.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, ch: char) -> EditResult<()> {
        if !is_insertable(ch) {
            return Err(EditError::invalid_input(format!(
                "{:?} is not a printable character",
                ch
            )));
        }
        self.input.insert_at(self.cursor, ch)?;
        self.cursor += 1;
        Ok(())
    }

    /// Remove the character left of the cursor. The label cannot be deleted.
    pub fn delete_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        match self.input.remove_at(self.cursor - 1) {
            Ok(_) => {
                self.cursor -= 1;
                true
            }
            Err(_) => false,
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.len());
    }
}
