use std::fmt;

use crate::array::GrowableArray;
use crate::error::{EditError, EditResult};

/// Starting capacity of a freshly created, empty line.
pub const DEFAULT_LINE_CAPACITY: usize = 16;

/// A single row of text. Never holds a line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    chars: GrowableArray<char>,
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl Line {
    pub fn new() -> Self {
        Self {
            chars: GrowableArray::new(),
        }
    }

    /// Decode one terminator-free line of text.
    pub fn from_text(text: &str) -> EditResult<Self> {
        if let Some(ch) = text.chars().find(|ch| is_terminator(*ch)) {
            return Err(EditError::invalid_input(format!(
                "line text contains terminator {:?}",
                ch
            )));
        }

        let mut chars = GrowableArray::with_capacity(text.chars().count().max(DEFAULT_LINE_CAPACITY))?;
        for ch in text.chars() {
            chars.append(ch)?;
        }
        Ok(Self { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.chars.capacity()
    }

    /// Read-only view of the characters, valid until the next mutation.
    pub fn text(&self) -> &[char] {
        self.chars.as_slice()
    }

    pub fn char_at(&self, column: usize) -> Option<char> {
        self.chars.get(column).ok().copied()
    }

    pub fn append(&mut self, ch: char) -> EditResult<()> {
        self.insert_at(self.len(), ch)
    }

    pub fn insert_at(&mut self, column: usize, ch: char) -> EditResult<()> {
        reject_terminator(ch)?;
        self.chars.insert(column, ch)
    }

    pub fn remove_at(&mut self, column: usize) -> EditResult<char> {
        self.chars.remove(column)
    }

    /// Keep `[0, column)` in place and return `[column, len)` as a new line.
    pub fn split_off(&mut self, column: usize) -> EditResult<Line> {
        Ok(Line {
            chars: self.chars.split_off(column)?,
        })
    }

    /// Split into `[0, column)` and `[column, len)`.
    pub fn split(mut self, column: usize) -> EditResult<(Line, Line)> {
        let right = self.split_off(column)?;
        Ok((self, right))
    }

    /// Append `other` to the end of this line.
    pub fn join_from(&mut self, other: Line) -> EditResult<()> {
        self.chars.append_all(other.chars)
    }

    pub fn join(mut self, other: Line) -> EditResult<Line> {
        self.join_from(other)?;
        Ok(self)
    }

    /// Make sure `additional` characters can be appended without allocating.
    pub fn reserve(&mut self, additional: usize) -> EditResult<()> {
        self.chars.reserve(additional)
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    /// Text of `[start, end)` clamped to the line.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len());
        let start = start.min(end);
        self.text()[start..end].iter().collect()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.chars.iter() {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

fn is_terminator(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

fn reject_terminator(ch: char) -> EditResult<()> {
    if is_terminator(ch) {
        Err(EditError::invalid_input(format!(
            "{:?} cannot be stored inside a line",
            ch
        )))
    } else {
        Ok(())
    }
}
