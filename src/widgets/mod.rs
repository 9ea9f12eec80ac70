pub mod editor;
pub mod prompt_bar;
pub mod status_bar;

pub use editor::{gutter_width, Editor};
pub use prompt_bar::PromptBar;
pub use status_bar::StatusBar;
