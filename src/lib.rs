//! Line-oriented terminal text editor.

pub mod app;
pub mod array;
pub mod buffer;
pub mod config;
pub mod cursor;
pub mod error;
pub mod input;
pub mod io;
pub mod prompt;
pub mod session;
pub mod ui;
pub mod viewport;
pub mod widgets;

// Re-export main types for convenience
pub use app::App;
pub use array::GrowableArray;
pub use buffer::{Line, Position, TextBuffer};
pub use cursor::{Cursor, CursorSet, Selection};
pub use error::{EditError, EditResult};
pub use session::{Dispatch, EditSession, InputSymbol, Mode};
pub use viewport::Viewport;
