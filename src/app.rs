use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ratatui::{
    backend::Backend,
    crossterm::event::{self, Event, KeyEvent},
    layout::Rect,
    Terminal,
};
use tracing::{debug, info, warn};

use crate::array::GrowableArray;
use crate::config::Config;
use crate::error::EditError;
use crate::input::{prompt_key, switcher_key, Action, Keymap, PromptKey, SwitcherKey};
use crate::prompt::Prompt;
use crate::session::{Dispatch, EditSession};
use crate::widgets::editor::gutter_width;

/// Shown when quitting with unsaved sessions.
pub const UNSAVED_QUIT_MESSAGE: &str =
    "A file has unsaved changes. Press Ctrl-E to exit without saving.";

pub const OPEN_FILE_PROMPT: &str = "File path to open: ";

/// Shown while stepping through sessions.
pub const SWITCHER_HINT: &str = "Switch file: i/k to move, Enter to return";

/// What receives key presses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Focus {
    /// The active session, through the key map.
    #[default]
    Session,
    /// The open-file prompt in the status line.
    OpenFile(Prompt),
    /// Stepping through open sessions.
    SessionSwitcher,
}

/// Owns every open session and routes input to the active one
pub struct App {
    /// Whether the application is running
    pub running: bool,

    /// Open sessions, never empty
    sessions: GrowableArray<EditSession>,

    /// Index of the session receiving input
    active: usize,

    /// Message to display on the status line
    status_message: Option<String>,

    config: Config,

    keymap: Keymap,

    focus: Focus,
}

impl Default for App {
    fn default() -> Self {
        Self {
            running: true,
            sessions: GrowableArray::singleton(EditSession::new()),
            active: 0,
            status_message: None,
            config: Config::default(),
            keymap: Keymap::new(),
            focus: Focus::Session,
        }
    }
}

impl App {
    /// An app with one untitled session, using `config` for key bindings and editor settings.
    pub fn new(config: Config) -> Result<Self> {
        let keymap = Keymap::from_config(&config.keybindings)
            .context("Failed to build key map from config")?;

        let mut app = Self {
            config,
            keymap,
            ..Self::default()
        };
        let mut first = EditSession::new();
        app.configure(&mut first);
        app.sessions = GrowableArray::singleton(first);
        Ok(app)
    }

    fn configure(&self, session: &mut EditSession) {
        session.set_page_size(self.config.editor.page_size);
        session.set_trailing_newline(self.config.editor.trailing_newline);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn sessions(&self) -> &GrowableArray<EditSession> {
        &self.sessions
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_session(&self) -> &EditSession {
        &self.sessions.as_slice()[self.active]
    }

    pub fn active_session_mut(&mut self) -> &mut EditSession {
        &mut self.sessions.as_mut_slice()[self.active]
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    /// Check if any session has unsaved changes
    pub fn has_unsaved_changes(&self) -> bool {
        self.sessions.iter().any(EditSession::is_dirty)
    }

    /// Index of the session already editing `path`, if any
    pub fn find_session(&self, path: &Path) -> Option<usize> {
        let wanted = comparable(path);
        self.sessions
            .iter()
            .position(|session| session.path().map(comparable).as_ref() == Some(&wanted))
    }

    /// Open `path` in a new session, or switch to the session already showing it.
    pub async fn open(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if let Some(index) = self.find_session(path) {
            debug!(path = %path.display(), index, "file already open");
            self.active = index;
            return Ok(index);
        }

        let mut session = EditSession::open(path)
            .await
            .with_context(|| format!("Failed to open file '{}'", path.display()))?;
        self.configure(&mut session);
        self.add_session(session)
    }

    /// Add an untitled session and make it active.
    pub fn new_session(&mut self) -> Result<usize> {
        let mut session = EditSession::new();
        self.configure(&mut session);
        self.add_session(session)
    }

    fn add_session(&mut self, session: EditSession) -> Result<usize> {
        // A pristine untitled session is replaced instead of kept around
        if self.sessions.len() == 1 && is_scratch(self.active_session()) && session.path().is_some() {
            self.sessions.set(0, session)?;
            self.active = 0;
            return Ok(0);
        }

        self.sessions.append(session)?;
        self.active = self.sessions.len() - 1;
        Ok(self.active)
    }

    /// Switch to a different session by index
    pub fn switch_to(&mut self, index: usize) -> bool {
        if index < self.sessions.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn next_session(&mut self) {
        self.active = (self.active + 1) % self.sessions.len();
    }

    pub fn previous_session(&mut self) {
        self.active = (self.active + self.sessions.len() - 1) % self.sessions.len();
    }

    /// Close the active session. The last session and unsaved sessions stay open.
    pub fn close_active(&mut self) -> Result<bool> {
        if self.sessions.len() <= 1 {
            self.set_status_message("Cannot close the last file");
            return Ok(false);
        }
        if self.active_session().is_dirty() {
            let name = self.active_session().display_name().to_string();
            self.set_status_message(format!("{} has unsaved changes", name));
            return Ok(false);
        }

        let closed = self.sessions.remove(self.active)?;
        info!(name = closed.display_name(), "closed session");
        if self.active >= self.sessions.len() {
            self.active = self.sessions.len() - 1;
        }
        Ok(true)
    }

    /// Save the active session, reporting the outcome on the status line.
    pub async fn save_active(&mut self) -> bool {
        let result = self.active_session_mut().save().await;
        match result {
            Ok(()) => {
                let name = self.active_session().display_name().to_string();
                self.set_status_message(format!("Saved {}", name));
                true
            }
            Err(err) => {
                warn!(%err, "save failed");
                self.set_status_message(format!("Save failed: {}", err));
                false
            }
        }
    }

    /// Quit unless a session has unsaved changes.
    pub fn request_quit(&mut self) {
        if self.has_unsaved_changes() {
            self.set_status_message(UNSAVED_QUIT_MESSAGE);
        } else {
            self.running = false;
        }
    }

    pub fn force_quit(&mut self) {
        info!("exiting without saving");
        self.running = false;
    }

    /// Translate a key press for whatever has focus and act on it.
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.focus {
            Focus::OpenFile(_) => {
                if let Some(key) = prompt_key(&key) {
                    self.handle_prompt_key(key).await;
                }
                Ok(())
            }
            Focus::SessionSwitcher => {
                if let Some(key) = switcher_key(&key) {
                    self.handle_switcher_key(key);
                }
                Ok(())
            }
            Focus::Session => {
                let mode = self.active_session().mode();
                match self.keymap.resolve(mode, &key) {
                    Some(action) => self.handle_action(action).await,
                    None => Ok(()),
                }
            }
        }
    }

    async fn handle_prompt_key(&mut self, key: PromptKey) {
        let Focus::OpenFile(prompt) = &mut self.focus else {
            return;
        };
        match key {
            PromptKey::Insert(ch) => {
                if let Err(err) = prompt.insert(ch) {
                    debug!(%err, "prompt input rejected");
                }
            }
            PromptKey::DeleteLeft => {
                prompt.delete_left();
            }
            PromptKey::Left => prompt.move_left(),
            PromptKey::Right => prompt.move_right(),
            PromptKey::Cancel => self.focus = Focus::Session,
            PromptKey::Submit => {
                let path = prompt.text();
                self.focus = Focus::Session;
                self.open_from_prompt(path.trim()).await;
            }
        }
    }

    /// Open a path typed at the prompt, reporting the outcome on the status line.
    pub async fn open_from_prompt(&mut self, path: &str) {
        if path.is_empty() {
            self.set_status_message("No file opened");
            return;
        }
        match self.open(path).await {
            Ok(_) => {
                let name = self.active_session().display_name().to_string();
                self.set_status_message(format!("Opened {}", name));
            }
            Err(err) => {
                warn!(path, error = %format!("{:#}", err), "open failed");
                self.set_status_message(format!("{:#}", err));
            }
        }
    }

    // Stepping stops at the first and last session.
    fn handle_switcher_key(&mut self, key: SwitcherKey) {
        match key {
            SwitcherKey::Previous => {
                self.active = self.active.saturating_sub(1);
            }
            SwitcherKey::Next => {
                if self.active + 1 < self.sessions.len() {
                    self.active += 1;
                }
            }
            SwitcherKey::Done => {
                self.focus = Focus::Session;
                self.clear_status_message();
            }
        }
    }

    pub async fn handle_action(&mut self, action: Action) -> Result<()> {
        self.clear_status_message();
        match action {
            Action::Input(symbol) => match self.active_session_mut().dispatch(symbol) {
                Ok(Dispatch::Quit) => self.request_quit(),
                Ok(_) => {}
                Err(err) => self.report(err),
            },
            Action::Save => {
                self.save_active().await;
            }
            Action::ForceQuit => self.force_quit(),
            Action::NewSession => {
                self.new_session()?;
            }
            Action::CloseSession => {
                self.close_active()?;
            }
            Action::NextSession => self.next_session(),
            Action::PreviousSession => self.previous_session(),
            Action::OpenFile => {
                self.focus = Focus::OpenFile(Prompt::new(OPEN_FILE_PROMPT));
            }
            Action::SwitchSessions => {
                self.focus = Focus::SessionSwitcher;
                self.set_status_message(SWITCHER_HINT);
            }
        }
        Ok(())
    }

    // Rejected edits leave the session untouched, so they are only reported.
    fn report(&mut self, err: EditError) {
        if err.is_recoverable() {
            debug!(%err, "input rejected");
        } else {
            warn!(%err, "edit aborted");
        }
        self.set_status_message(err.to_string());
    }

    /// Split the frame into the text area and the status line.
    pub fn layout(area: Rect) -> (Rect, Rect) {
        let editor_height = area.height.saturating_sub(1);
        let editor = Rect::new(area.x, area.y, area.width, editor_height);
        let status = Rect::new(area.x, area.y + editor_height, area.width, area.height - editor_height);
        (editor, status)
    }

    /// Give the active session the size of its text area.
    pub fn resize(&mut self, area: Rect) {
        let (editor, _) = Self::layout(area);
        let gutter = gutter_width(self.active_session().buffer().line_count(), &self.config.editor);
        let columns = (editor.width as usize).saturating_sub(gutter);
        self.active_session_mut()
            .resize(columns, editor.height as usize);
    }

    /// Draw, read one event, repeat until the app stops running.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!(sessions = self.sessions.len(), "starting editor loop");

        while self.running {
            terminal.draw(|f| {
                self.resize(f.area());
                self.render(f);
            })?;

            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await?,
                    Event::Resize(width, height) => {
                        debug!(width, height, "terminal resized");
                    }
                    _ => {}
                }
            } else {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }

        Ok(())
    }
}

fn comparable(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn is_scratch(session: &EditSession) -> bool {
    session.path().is_none()
        && !session.is_dirty()
        && session.buffer().line_count() == 1
        && session.buffer().line_len(0).map_or(true, |len| len == 0)
}
