//! Key map: physical key events to abstract actions.
//!
//! Every [`Mode`] has its own table. Text entry additionally turns any
//! unbound printable key into [`InputSymbol::Char`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::config::KeybindingConfig;
use crate::cursor::is_insertable;
use crate::session::{InputSymbol, Mode};

/// What a key press asks for: an edit-session symbol or an application command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Input(InputSymbol),
    Save,
    ForceQuit,
    NewSession,
    CloseSession,
    NextSession,
    PreviousSession,
    /// Ask for a path in the status line and open it.
    OpenFile,
    /// Step through open sessions with `i`/`k` until Enter or Esc.
    SwitchSessions,
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        let action = match name {
            "save" => Action::Save,
            "force_quit" => Action::ForceQuit,
            "new_session" => Action::NewSession,
            "close_session" => Action::CloseSession,
            "next_session" => Action::NextSession,
            "previous_session" => Action::PreviousSession,
            "open_file" => Action::OpenFile,
            "switch_sessions" => Action::SwitchSessions,
            other => Action::Input(other.parse().map_err(|_| anyhow!("Unknown action: {}", other))?),
        };
        Ok(action)
    }
}

impl From<InputSymbol> for Action {
    fn from(symbol: InputSymbol) -> Self {
        Action::Input(symbol)
    }
}

/// A key code plus modifiers, normalized so that lookups match what the terminal reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }.normalized()
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    pub fn alt(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), KeyModifiers::ALT)
    }

    // Shift is already folded into the character, so `alt+D` and `alt+d`
    // stay distinct. Terminals report Shift+Tab as BackTab.
    fn normalized(self) -> Self {
        match self.code {
            KeyCode::Char(_) => Self {
                code: self.code,
                modifiers: self.modifiers.difference(KeyModifiers::SHIFT),
            },
            KeyCode::BackTab => Self {
                code: KeyCode::Tab,
                modifiers: self.modifiers | KeyModifiers::SHIFT,
            },
            _ => self,
        }
    }
}

impl From<&KeyEvent> for KeyChord {
    fn from(key: &KeyEvent) -> Self {
        Self::new(key.code, key.modifiers)
    }
}

impl FromStr for KeyChord {
    type Err = anyhow::Error;

    /// Parse names such as `"i"`, `"ctrl+q"`, `"alt+d"`, `"shift+tab"` or `"pagedown"`.
    fn from_str(text: &str) -> Result<Self> {
        let lower = text.trim().to_ascii_lowercase();
        let mut parts: Vec<&str> = lower.split('+').collect();
        let key = parts
            .pop()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow!("Empty key name: '{}'", text))?;

        let mut modifiers = KeyModifiers::NONE;
        for part in parts {
            modifiers |= match part {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                other => return Err(anyhow!("Unknown modifier '{}' in '{}'", other, text)),
            };
        }

        let code = match key {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "enter" => KeyCode::Enter,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            single if single.chars().count() == 1 => {
                // keep the case the user wrote
                let ch = text
                    .trim()
                    .chars()
                    .last()
                    .ok_or_else(|| anyhow!("Empty key name: '{}'", text))?;
                // `alt+shift+d` names the same key as `alt+D`
                if modifiers.contains(KeyModifiers::SHIFT) {
                    KeyCode::Char(ch.to_ascii_uppercase())
                } else {
                    KeyCode::Char(ch)
                }
            }
            other => return Err(anyhow!("Unknown key '{}'", other)),
        };

        Ok(Self::new(code, modifiers))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(ch) => write!(f, "{}", ch),
            KeyCode::PageUp => f.write_str("pageup"),
            KeyCode::PageDown => f.write_str("pagedown"),
            KeyCode::Esc => f.write_str("esc"),
            other => write!(f, "{}", format!("{:?}", other).to_ascii_lowercase()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Keymap {
    navigation: HashMap<KeyChord, Action>,
    text_entry: HashMap<KeyChord, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

impl Keymap {
    /// The built-in bindings.
    pub fn new() -> Self {
        use InputSymbol::*;

        let mut keymap = Self {
            navigation: HashMap::new(),
            text_entry: HashMap::new(),
        };

        let shared = [
            (KeyChord::plain(KeyCode::Up), Action::Input(LineUp)),
            (KeyChord::plain(KeyCode::Down), Action::Input(LineDown)),
            (KeyChord::plain(KeyCode::Left), Action::Input(CharacterLeft)),
            (KeyChord::plain(KeyCode::Right), Action::Input(CharacterRight)),
            (KeyChord::plain(KeyCode::Home), Action::Input(LineStart)),
            (KeyChord::plain(KeyCode::End), Action::Input(LineEnd)),
            (KeyChord::new(KeyCode::Home, KeyModifiers::CONTROL), Action::Input(BufferStart)),
            (KeyChord::new(KeyCode::End, KeyModifiers::CONTROL), Action::Input(BufferEnd)),
            (KeyChord::plain(KeyCode::PageUp), Action::Input(PageUp)),
            (KeyChord::plain(KeyCode::PageDown), Action::Input(PageDown)),
            (KeyChord::ctrl('q'), Action::Input(Quit)),
            (KeyChord::ctrl('s'), Action::Save),
            (KeyChord::ctrl('e'), Action::ForceQuit),
            (KeyChord::ctrl('n'), Action::NewSession),
            (KeyChord::ctrl('w'), Action::CloseSession),
            (KeyChord::ctrl('o'), Action::OpenFile),
            (KeyChord::ctrl('b'), Action::SwitchSessions),
        ];
        for (chord, action) in shared {
            keymap.navigation.insert(chord, action);
            keymap.text_entry.insert(chord, action);
        }

        let navigation = [
            (KeyChord::plain(KeyCode::Char('i')), Action::Input(LineUp)),
            (KeyChord::plain(KeyCode::Char('k')), Action::Input(LineDown)),
            (KeyChord::plain(KeyCode::Char('j')), Action::Input(CharacterLeft)),
            (KeyChord::plain(KeyCode::Char('l')), Action::Input(CharacterRight)),
            (KeyChord::plain(KeyCode::Char('e')), Action::Input(EnterEdit)),
            (KeyChord::plain(KeyCode::Char('q')), Action::Input(Quit)),
            (KeyChord::plain(KeyCode::Tab), Action::NextSession),
            (KeyChord::new(KeyCode::Tab, KeyModifiers::SHIFT), Action::PreviousSession),
        ];
        keymap.navigation.extend(navigation);

        let text_entry = [
            (KeyChord::plain(KeyCode::Enter), Action::Input(Newline)),
            (KeyChord::plain(KeyCode::Backspace), Action::Input(Backspace)),
            (KeyChord::plain(KeyCode::Delete), Action::Input(Delete)),
            (KeyChord::plain(KeyCode::Esc), Action::Input(Escape)),
            (KeyChord::alt('i'), Action::Input(LineUp)),
            (KeyChord::alt('k'), Action::Input(LineDown)),
            (KeyChord::alt('j'), Action::Input(CharacterLeft)),
            (KeyChord::alt('l'), Action::Input(CharacterRight)),
            (KeyChord::alt('N'), Action::Input(InsertLineAbove)),
            (KeyChord::alt('d'), Action::Input(Delete)),
            (KeyChord::alt('D'), Action::Input(DeleteLine)),
        ];
        keymap.text_entry.extend(text_entry);

        keymap
    }

    /// Defaults overridden by the user's bindings.
    pub fn from_config(config: &KeybindingConfig) -> Result<Self> {
        let mut keymap = Self::new();
        for (mode, table) in [
            (Mode::Navigation, &config.navigation),
            (Mode::TextEntry, &config.text_entry),
        ] {
            for (key, action) in table {
                let chord: KeyChord = key
                    .parse()
                    .with_context(|| format!("Invalid key binding '{}'", key))?;
                let action: Action = action
                    .parse()
                    .with_context(|| format!("Invalid action for key '{}'", key))?;
                debug!(%chord, ?action, ?mode, "custom key binding");
                keymap.bind(mode, chord, action);
            }
        }
        Ok(keymap)
    }

    pub fn bind(&mut self, mode: Mode, chord: KeyChord, action: Action) {
        self.table_mut(mode).insert(chord, action);
    }

    pub fn unbind(&mut self, mode: Mode, chord: KeyChord) -> Option<Action> {
        self.table_mut(mode).remove(&chord)
    }

    pub fn lookup(&self, mode: Mode, chord: KeyChord) -> Option<Action> {
        self.table(mode).get(&chord).copied()
    }

    /// Translate a terminal key event. Releases and unbound keys resolve to `None`.
    pub fn resolve(&self, mode: Mode, key: &KeyEvent) -> Option<Action> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        let chord = KeyChord::from(key);
        if let Some(action) = self.lookup(mode, chord) {
            return Some(action);
        }

        match (mode, chord.code) {
            (Mode::TextEntry, KeyCode::Char(ch))
                if chord.modifiers.is_empty() && is_insertable(ch) =>
            {
                Some(Action::Input(InputSymbol::Char(ch)))
            }
            _ => None,
        }
    }

    fn table(&self, mode: Mode) -> &HashMap<KeyChord, Action> {
        match mode {
            Mode::Navigation => &self.navigation,
            Mode::TextEntry => &self.text_entry,
        }
    }

    fn table_mut(&mut self, mode: Mode) -> &mut HashMap<KeyChord, Action> {
        match mode {
            Mode::Navigation => &mut self.navigation,
            Mode::TextEntry => &mut self.text_entry,
        }
    }
}

/// Editing keys of the status-line prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKey {
    Insert(char),
    DeleteLeft,
    Left,
    Right,
    Submit,
    Cancel,
}

/// Translate a key event while a prompt has focus.
pub fn prompt_key(key: &KeyEvent) -> Option<PromptKey> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let chord = KeyChord::from(key);
    let prompt_key = match (chord.code, chord.modifiers) {
        (KeyCode::Enter, _) => PromptKey::Submit,
        (KeyCode::Esc, _) => PromptKey::Cancel,
        (KeyCode::Backspace, _) => PromptKey::DeleteLeft,
        (KeyCode::Left, _) => PromptKey::Left,
        (KeyCode::Right, _) => PromptKey::Right,
        (KeyCode::Char('j'), modifiers) if modifiers == KeyModifiers::ALT => PromptKey::Left,
        (KeyCode::Char('l'), modifiers) if modifiers == KeyModifiers::ALT => PromptKey::Right,
        (KeyCode::Char(ch), modifiers) if modifiers.is_empty() && is_insertable(ch) => {
            PromptKey::Insert(ch)
        }
        _ => return None,
    };
    Some(prompt_key)
}

/// Keys of the session switcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitcherKey {
    Previous,
    Next,
    Done,
}

/// Translate a key event while the session switcher has focus.
pub fn switcher_key(key: &KeyEvent) -> Option<SwitcherKey> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let chord = KeyChord::from(key);
    let letter_ok = chord.modifiers.difference(KeyModifiers::ALT).is_empty();
    let switcher_key = match chord.code {
        KeyCode::Up => SwitcherKey::Previous,
        KeyCode::Down => SwitcherKey::Next,
        KeyCode::Char('i') if letter_ok => SwitcherKey::Previous,
        KeyCode::Char('k') if letter_ok => SwitcherKey::Next,
        KeyCode::Enter | KeyCode::Esc => SwitcherKey::Done,
        _ => return None,
    };
    Some(switcher_key)
}
