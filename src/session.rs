//! # Edit Session
//!
//! One open document: its [`TextBuffer`], the [`CursorSet`] editing it, the
//! [`Viewport`] showing it and the navigation/text-entry mode machine.
//!
//! Input arrives as abstract [`InputSymbol`]s. Every call to
//! [`EditSession::dispatch`] processes one symbol completely (mode change or
//! edit, then the viewport re-sync) before returning, and a rejected symbol
//! leaves the session exactly as it was.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use crate::buffer::{Position, TextBuffer, TrailingNewline};
use crate::cursor::{CursorSet, Movement};
use crate::error::{EditError, EditResult};
use crate::io;
use crate::viewport::Viewport;

pub const UNTITLED: &str = "untitled";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Navigation,
    TextEntry,
}

impl Mode {
    /// Name shown in the status line.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Navigation => "NORMAL",
            Mode::TextEntry => "EDIT",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract input, independent of the physical key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSymbol {
    LineUp,
    LineDown,
    CharacterLeft,
    CharacterRight,
    LineStart,
    LineEnd,
    BufferStart,
    BufferEnd,
    PageUp,
    PageDown,
    EnterEdit,
    Escape,
    Char(char),
    Newline,
    Backspace,
    Delete,
    InsertLineAbove,
    DeleteLine,
    Quit,
}

impl InputSymbol {
    /// Config name of the symbol. `Char` has none.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            InputSymbol::LineUp => "line_up",
            InputSymbol::LineDown => "line_down",
            InputSymbol::CharacterLeft => "character_left",
            InputSymbol::CharacterRight => "character_right",
            InputSymbol::LineStart => "line_start",
            InputSymbol::LineEnd => "line_end",
            InputSymbol::BufferStart => "buffer_start",
            InputSymbol::BufferEnd => "buffer_end",
            InputSymbol::PageUp => "page_up",
            InputSymbol::PageDown => "page_down",
            InputSymbol::EnterEdit => "enter_edit",
            InputSymbol::Escape => "escape",
            InputSymbol::Newline => "newline",
            InputSymbol::Backspace => "backspace",
            InputSymbol::Delete => "delete",
            InputSymbol::InsertLineAbove => "insert_line_above",
            InputSymbol::DeleteLine => "delete_line",
            InputSymbol::Quit => "quit",
            InputSymbol::Char(_) => return None,
        };
        Some(name)
    }

    fn is_edit(self) -> bool {
        matches!(
            self,
            InputSymbol::Char(_)
                | InputSymbol::Newline
                | InputSymbol::Backspace
                | InputSymbol::Delete
                | InputSymbol::InsertLineAbove
                | InputSymbol::DeleteLine
        )
    }
}

impl FromStr for InputSymbol {
    type Err = EditError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let symbol = match name {
            "line_up" => InputSymbol::LineUp,
            "line_down" => InputSymbol::LineDown,
            "character_left" => InputSymbol::CharacterLeft,
            "character_right" => InputSymbol::CharacterRight,
            "line_start" => InputSymbol::LineStart,
            "line_end" => InputSymbol::LineEnd,
            "buffer_start" => InputSymbol::BufferStart,
            "buffer_end" => InputSymbol::BufferEnd,
            "page_up" => InputSymbol::PageUp,
            "page_down" => InputSymbol::PageDown,
            "enter_edit" => InputSymbol::EnterEdit,
            "escape" => InputSymbol::Escape,
            "newline" => InputSymbol::Newline,
            "backspace" => InputSymbol::Backspace,
            "delete" => InputSymbol::Delete,
            "insert_line_above" => InputSymbol::InsertLineAbove,
            "delete_line" => InputSymbol::DeleteLine,
            "quit" => InputSymbol::Quit,
            other => {
                return Err(EditError::invalid_input(format!(
                    "unknown input symbol '{}'",
                    other
                )))
            }
        };
        Ok(symbol)
    }
}

/// Outcome of dispatching one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The symbol was acted upon (possibly as a no-op at a buffer edge).
    Handled,
    /// The symbol means nothing in the current mode.
    Ignored,
    /// The user asked to quit; the owner decides what that means.
    Quit,
}

/// Where a cursor lands on screen, relative to the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCursor {
    pub row: usize,
    pub column: usize,
    pub main: bool,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    buffer: TextBuffer,
    cursors: CursorSet,
    viewport: Viewport,
    mode: Mode,
    dirty: bool,
    path: Option<PathBuf>,
    name: String,
    text_lines: usize,
    text_columns: usize,
    page_size: usize,
    trailing_newline: TrailingNewline,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    /// An untitled session over an empty buffer.
    pub fn new() -> Self {
        Self::with_buffer(TextBuffer::new())
    }

    pub fn with_buffer(buffer: TextBuffer) -> Self {
        Self {
            buffer,
            cursors: CursorSet::new(),
            viewport: Viewport::new(),
            mode: Mode::Navigation,
            dirty: false,
            path: None,
            name: UNTITLED.to_string(),
            text_lines: 1,
            text_columns: 1,
            page_size: 0,
            trailing_newline: TrailingNewline::Preserve,
        }
    }

    pub fn from_text(text: &str) -> EditResult<Self> {
        Ok(Self::with_buffer(TextBuffer::from_text(text)?))
    }

    /// Open `path`. A file that does not exist yet opens empty and is created on save.
    pub async fn open(path: impl AsRef<Path>) -> EditResult<Self> {
        let path = path.as_ref();
        let mut session = match io::load_text(path).await? {
            Some(text) => Self::from_text(&text)?,
            None => {
                debug!(path = %path.display(), "opening new file");
                Self::new()
            }
        };
        session.set_path(path.to_path_buf());
        info!(
            path = %path.display(),
            lines = session.buffer.line_count(),
            "opened session"
        );
        Ok(session)
    }

    /// Write the buffer to its path. The session stays dirty if writing fails.
    pub async fn save(&mut self) -> EditResult<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| EditError::invalid_input("no file path associated with session"))?;
        self.write_to(&path).await
    }

    /// Write the buffer to `path` and make it the session's path.
    pub async fn save_as(&mut self, path: impl Into<PathBuf>) -> EditResult<()> {
        let path = path.into();
        self.write_to(&path).await?;
        self.set_path(path);
        Ok(())
    }

    async fn write_to(&mut self, path: &Path) -> EditResult<()> {
        let text = self.buffer.to_text_with(self.trailing_newline);
        io::write_text(path, &text).await?;
        self.mark_saved();
        info!(path = %path.display(), lines = self.buffer.line_count(), "saved session");
        Ok(())
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn set_path(&mut self, path: PathBuf) {
        self.name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|s| s.to_owned())
            .unwrap_or_else(|| UNTITLED.to_owned());
        self.path = Some(path);
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    /// Secondary cursors are managed here; edits still happen only at the main cursor.
    pub fn cursors_mut(&mut self) -> (&mut CursorSet, &TextBuffer) {
        (&mut self.cursors, &self.buffer)
    }

    pub fn cursor(&self) -> Position {
        self.cursors.position()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn visible_lines(&self) -> usize {
        self.text_lines
    }

    pub fn visible_columns(&self) -> usize {
        self.text_columns
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
    }

    pub fn set_trailing_newline(&mut self, policy: TrailingNewline) {
        self.trailing_newline = policy;
    }

    /// Record the size of the text area and keep the cursor on screen.
    pub fn resize(&mut self, columns: usize, lines: usize) {
        self.text_columns = columns.max(1);
        self.text_lines = lines.max(1);
        self.follow_cursor();
    }

    /// Move the main cursor to `position`, which must exist in the buffer.
    pub fn goto(&mut self, position: Position) -> EditResult<()> {
        let (cursors, buffer) = (&mut self.cursors, &self.buffer);
        cursors.main_mut().set_position(buffer, position)?;
        self.follow_cursor();
        Ok(())
    }

    /// Process one input symbol.
    pub fn dispatch(&mut self, symbol: InputSymbol) -> EditResult<Dispatch> {
        if symbol == InputSymbol::Quit {
            return Ok(Dispatch::Quit);
        }

        if let Some(movement) = self.movement(symbol) {
            self.cursors.move_main(movement, &self.buffer);
            self.follow_cursor();
            return Ok(Dispatch::Handled);
        }

        let outcome = match (self.mode, symbol) {
            (Mode::Navigation, InputSymbol::EnterEdit) => {
                self.set_mode(Mode::TextEntry);
                Dispatch::Handled
            }
            (Mode::TextEntry, InputSymbol::Escape) => {
                self.set_mode(Mode::Navigation);
                Dispatch::Handled
            }
            (Mode::TextEntry, symbol) if symbol.is_edit() => {
                if let Err(err) = self.edit(symbol) {
                    debug!(?symbol, %err, "edit rejected");
                    return Err(err);
                }
                Dispatch::Handled
            }
            _ => Dispatch::Ignored,
        };

        self.follow_cursor();
        Ok(outcome)
    }

    fn edit(&mut self, symbol: InputSymbol) -> EditResult<()> {
        let buffer = &mut self.buffer;
        let changed = match symbol {
            InputSymbol::Char(ch) => self.cursors.insert_character(buffer, ch).map(|_| true)?,
            InputSymbol::Newline => self.cursors.insert_newline(buffer).map(|_| true)?,
            InputSymbol::Backspace => self.cursors.delete_backward(buffer)?,
            InputSymbol::Delete => self.cursors.delete_forward(buffer)?,
            InputSymbol::InsertLineAbove => self.cursors.insert_line_above(buffer).map(|_| true)?,
            InputSymbol::DeleteLine => self.cursors.delete_line(buffer).map(|_| true)?,
            _ => false,
        };
        if changed {
            self.dirty = true;
        }
        Ok(())
    }

    fn movement(&self, symbol: InputSymbol) -> Option<Movement> {
        let page = if self.page_size == 0 {
            self.text_lines
        } else {
            self.page_size
        };
        let movement = match symbol {
            InputSymbol::LineUp => Movement::LineUp,
            InputSymbol::LineDown => Movement::LineDown,
            InputSymbol::CharacterLeft => Movement::CharacterLeft,
            InputSymbol::CharacterRight => Movement::CharacterRight,
            InputSymbol::LineStart => Movement::LineStart,
            InputSymbol::LineEnd => Movement::LineEnd,
            InputSymbol::BufferStart => Movement::BufferStart,
            InputSymbol::BufferEnd => Movement::BufferEnd,
            InputSymbol::PageUp => Movement::PageUp(page),
            InputSymbol::PageDown => Movement::PageDown(page),
            _ => return None,
        };
        Some(movement)
    }

    fn set_mode(&mut self, mode: Mode) {
        debug!(from = %self.mode, to = %mode, "mode change");
        self.mode = mode;
    }

    fn follow_cursor(&mut self) {
        let position = self.cursors.position();
        self.viewport.follow_cursor(position, self.text_lines);
        self.viewport.follow_column(position.column, self.text_columns);
    }

    /// Screen positions of every cursor currently inside the text area.
    pub fn cursor_screen_positions(&self) -> Vec<ScreenCursor> {
        let main = self.cursors.main_index();
        self.cursors
            .iter()
            .enumerate()
            .filter_map(|(index, cursor)| {
                self.viewport
                    .screen_position(cursor.position(), self.text_lines, self.text_columns)
                    .map(|(row, column)| ScreenCursor {
                        row,
                        column,
                        main: index == main,
                    })
            })
            .collect()
    }
}
