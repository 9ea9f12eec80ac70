//! # Text Buffer
//!
//! Core text buffer that represents a single document.
//!
//! ## What it does
//!
//! - Stores the document as an ordered array of [`Line`]s, never fewer than one
//! - Decodes raw text into lines and encodes it back for the file writer
//! - Performs the structural edits (insert, remove, split and join lines)
//!
//! ## Cursor tracking
//!
//! The buffer does not know about cursors. Every mutating method returns a
//! [`LineChange`] describing what moved, and the owner of the cursors feeds it
//! to [`crate::cursor::CursorSet::apply_change`] in the same step. Edits either
//! complete fully or fail before touching anything.

mod line;

use std::slice;

use serde::{Deserialize, Serialize};

use crate::array::GrowableArray;
use crate::error::{EditError, EditResult};

pub use line::{Line, DEFAULT_LINE_CAPACITY};

/// Starting line capacity of a buffer decoded from text.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64;

/// Represents a text position (line, column)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub const fn zero() -> Self {
        Self { line: 0, column: 0 }
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, column): (usize, usize)) -> Self {
        Self { line, column }
    }
}

/// The newline sequence written between lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    /// CRLF as soon as the text contains one, LF otherwise.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else {
            Self::Lf
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Whether the encoded text ends with a terminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingNewline {
    /// Re-emit a trailing terminator only if the decoded text had one.
    #[default]
    Preserve,
    Always,
    Never,
}

/// What a buffer edit did, in terms cursors can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    CharInserted { line: usize, column: usize },
    CharRemoved { line: usize, column: usize },
    LineInserted { line: usize },
    LineRemoved { line: usize },
    LineCleared { line: usize },
    /// `line` was split at `column`; the right half is now `line + 1`.
    Split { line: usize, column: usize },
    /// `line + 1` was appended to `line`, whose old length was `column`.
    Joined { line: usize, column: usize },
}

impl LineChange {
    /// Where a position that pointed into the old text points now.
    ///
    /// The result may still need clamping against the buffer.
    pub fn shift(&self, position: Position) -> Position {
        let Position { line, column } = position;
        match *self {
            LineChange::CharInserted { line: l, column: c } => {
                if line == l && column >= c {
                    Position::new(line, column + 1)
                } else {
                    position
                }
            }
            LineChange::CharRemoved { line: l, column: c } => {
                if line == l && column > c {
                    Position::new(line, column - 1)
                } else {
                    position
                }
            }
            LineChange::LineInserted { line: l } => {
                if line >= l {
                    Position::new(line + 1, column)
                } else {
                    position
                }
            }
            LineChange::LineRemoved { line: l } => {
                if line > l {
                    Position::new(line - 1, column)
                } else {
                    position
                }
            }
            LineChange::LineCleared { line: l } => {
                if line == l {
                    Position::new(line, 0)
                } else {
                    position
                }
            }
            LineChange::Split { line: l, column: c } => {
                if line > l {
                    Position::new(line + 1, column)
                } else if line == l && column >= c {
                    Position::new(line + 1, column - c)
                } else {
                    position
                }
            }
            LineChange::Joined { line: l, column: c } => {
                if line == l + 1 {
                    Position::new(l, column + c)
                } else if line > l + 1 {
                    Position::new(line - 1, column)
                } else {
                    position
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: GrowableArray<Line>,
    line_ending: LineEnding,
    trailing_newline: bool,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// An empty document: one empty line.
    pub fn new() -> Self {
        Self {
            lines: GrowableArray::singleton(Line::new()),
            line_ending: LineEnding::Lf,
            trailing_newline: false,
        }
    }

    /// Decode raw text, splitting on `\r\n`, `\n` and lone `\r`.
    ///
    /// A terminator right before the end of input does not start another
    /// line; it is remembered so that [`TextBuffer::to_text`] can write it back.
    pub fn from_text(raw: &str) -> EditResult<Self> {
        let mut lines = GrowableArray::with_capacity(DEFAULT_BUFFER_CAPACITY)?;
        let mut current = Line::new();
        let mut trailing_newline = false;

        let mut chars = raw.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' | '\n' => {
                    if ch == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    lines.append(std::mem::take(&mut current))?;
                    trailing_newline = chars.peek().is_none();
                }
                _ => current.append(ch)?,
            }
        }

        if !trailing_newline {
            lines.append(current)?;
        }

        Ok(Self {
            lines,
            line_ending: LineEnding::detect(raw),
            trailing_newline,
        })
    }

    /// Encode the buffer, keeping the decoded trailing terminator.
    pub fn to_text(&self) -> String {
        self.to_text_with(TrailingNewline::Preserve)
    }

    pub fn to_text_with(&self, policy: TrailingNewline) -> String {
        let terminator = self.line_ending.as_str();
        let total: usize = self
            .lines
            .iter()
            .map(|line| line.len() + terminator.len())
            .sum();
        let mut text = String::with_capacity(total);

        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                text.push_str(terminator);
            }
            text.extend(line.text().iter());
        }

        let trailing = match policy {
            TrailingNewline::Preserve => self.trailing_newline,
            TrailingNewline::Always => true,
            TrailingNewline::Never => false,
        };
        if trailing {
            text.push_str(terminator);
        }

        text
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> EditResult<&Line> {
        self.lines.get(index)
    }

    pub fn line_len(&self, index: usize) -> EditResult<usize> {
        Ok(self.lines.get(index)?.len())
    }

    pub fn lines(&self) -> slice::Iter<'_, Line> {
        self.lines.iter()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn has_trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    /// Position just after the last character of the document.
    pub fn end_position(&self) -> Position {
        let last = self.line_count() - 1;
        Position::new(last, self.lines.last().map_or(0, Line::len))
    }

    /// Nearest valid position to `position`.
    pub fn clamp(&self, position: Position) -> Position {
        let line = position.line.min(self.line_count() - 1);
        let len = self.lines.get(line).map_or(0, Line::len);
        Position::new(line, position.column.min(len))
    }

    pub fn contains(&self, position: Position) -> bool {
        self.lines
            .get(position.line)
            .map(|line| position.column <= line.len())
            .unwrap_or(false)
    }

    pub fn insert_line(&mut self, index: usize, line: Line) -> EditResult<LineChange> {
        self.lines.insert(index, line)?;
        Ok(LineChange::LineInserted { line: index })
    }

    /// Remove a line; the sole remaining line is cleared instead.
    pub fn remove_line(&mut self, index: usize) -> EditResult<LineChange> {
        if self.line_count() == 1 {
            self.lines.get_mut(index)?.clear();
            return Ok(LineChange::LineCleared { line: index });
        }

        self.lines.remove(index)?;
        Ok(LineChange::LineRemoved { line: index })
    }

    /// Split `line` at `column`, moving the right half to a new line just below.
    pub fn split_line_at(&mut self, line: usize, column: usize) -> EditResult<LineChange> {
        let len = self.line_len(line)?;
        if column > len {
            return Err(EditError::index(column, len));
        }

        self.lines.reserve(1)?;
        let right = self.lines.get_mut(line)?.split_off(column)?;
        self.lines.insert(line + 1, right)?;
        Ok(LineChange::Split { line, column })
    }

    /// Append the line after `line` onto it.
    pub fn join_line_with_next(&mut self, line: usize) -> EditResult<LineChange> {
        let next = line + 1;
        if next >= self.line_count() {
            return Err(EditError::index(next, self.line_count()));
        }

        let join_column = self.line_len(line)?;
        let next_len = self.line_len(next)?;
        self.lines.get_mut(line)?.reserve(next_len)?;

        let removed = self.lines.remove(next)?;
        self.lines.get_mut(line)?.join_from(removed)?;
        Ok(LineChange::Joined {
            line,
            column: join_column,
        })
    }

    pub fn insert_char(&mut self, line: usize, column: usize, ch: char) -> EditResult<LineChange> {
        self.lines.get_mut(line)?.insert_at(column, ch)?;
        Ok(LineChange::CharInserted { line, column })
    }

    pub fn remove_char(&mut self, line: usize, column: usize) -> EditResult<LineChange> {
        self.lines.get_mut(line)?.remove_at(column)?;
        Ok(LineChange::CharRemoved { line, column })
    }

    /// Text between two positions, in document order, lines joined by `\n`.
    pub fn text_between(&self, a: Position, b: Position) -> EditResult<String> {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        for position in [start, end] {
            if !self.contains(position) {
                let len = self.line_len(position.line)?;
                return Err(EditError::index(position.column, len));
            }
        }

        if start.line == end.line {
            return Ok(self.line(start.line)?.slice(start.column, end.column));
        }

        let mut text = self.line(start.line)?.slice(start.column, usize::MAX);
        for index in start.line + 1..end.line {
            text.push('\n');
            text.push_str(&self.line(index)?.to_string());
        }
        text.push('\n');
        text.push_str(&self.line(end.line)?.slice(0, end.column));
        Ok(text)
    }
}
