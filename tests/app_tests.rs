//! Integration tests for the application: session management, key routing,
//! saving and the quit guard

use std::fs;
use tempfile::TempDir;

use ledit::app::{Focus, OPEN_FILE_PROMPT, SWITCHER_HINT, UNSAVED_QUIT_MESSAGE};
use ledit::config::Config;
use ledit::input::Action;
use ledit::{App, InputSymbol, Mode};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

fn app() -> App {
    App::new(Config::default()).unwrap()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

async fn type_keys(app: &mut App, text: &str) {
    for ch in text.chars() {
        app.handle_key(key(KeyCode::Char(ch))).await.unwrap();
    }
}

fn active_lines(app: &App) -> Vec<String> {
    app.active_session()
        .buffer()
        .lines()
        .map(|line| line.to_string())
        .collect()
}

#[test]
fn test_app_creation() {
    let app = app();

    assert!(app.running);
    assert_eq!(app.session_count(), 1);
    assert_eq!(app.active_index(), 0);
    assert!(app.status_message().is_none());
    assert!(!app.has_unsaved_changes());
    assert_eq!(app.active_session().mode(), Mode::Navigation);
}

#[test]
fn test_invalid_key_binding_fails_app_creation() {
    let mut config = Config::default();
    config
        .keybindings
        .navigation
        .insert("hyper+x".to_string(), "quit".to_string());
    assert!(App::new(config).is_err());
}

#[tokio::test]
async fn test_open_replaces_pristine_scratch_session() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.txt");
    let second = temp_dir.path().join("second.txt");
    fs::write(&first, "Hello World\nSecond Line").unwrap();
    fs::write(&second, "other").unwrap();

    let mut app = app();
    assert_eq!(app.open(&first).await.unwrap(), 0);
    assert_eq!(app.session_count(), 1);
    assert_eq!(app.active_session().display_name(), "first.txt");
    assert_eq!(active_lines(&app), vec!["Hello World", "Second Line"]);

    assert_eq!(app.open(&second).await.unwrap(), 1);
    assert_eq!(app.session_count(), 2);
}

#[tokio::test]
async fn test_opening_an_open_file_switches_to_it() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("a.txt");
    let second = temp_dir.path().join("b.txt");
    fs::write(&first, "a").unwrap();
    fs::write(&second, "b").unwrap();

    let mut app = app();
    app.open(&first).await.unwrap();
    app.open(&second).await.unwrap();
    assert_eq!(app.active_index(), 1);

    // same file through a different spelling of the path
    let dotted = temp_dir.path().join(".").join("a.txt");
    assert_eq!(app.open(&dotted).await.unwrap(), 0);
    assert_eq!(app.session_count(), 2);
    assert_eq!(app.active_index(), 0);
    assert_eq!(app.find_session(&second), Some(1));
}

#[tokio::test]
async fn test_key_routing_follows_mode() {
    let mut app = app();

    // plain letters do not edit in navigation mode
    type_keys(&mut app, "x").await;
    assert_eq!(active_lines(&app), vec![""]);

    app.handle_key(key(KeyCode::Char('e'))).await.unwrap();
    assert_eq!(app.active_session().mode(), Mode::TextEntry);

    type_keys(&mut app, "hi").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    type_keys(&mut app, "!").await;
    assert_eq!(active_lines(&app), vec!["hi", "!"]);
    assert!(app.active_session().is_dirty());

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert_eq!(app.active_session().mode(), Mode::Navigation);

    // navigation letters move the cursor
    app.handle_key(key(KeyCode::Char('i'))).await.unwrap();
    assert_eq!(app.active_session().cursor().line, 0);
}

#[tokio::test]
async fn test_key_release_is_ignored() {
    let mut app = app();
    let mut release = key(KeyCode::Char('e'));
    release.kind = KeyEventKind::Release;
    app.handle_key(release).await.unwrap();
    assert_eq!(app.active_session().mode(), Mode::Navigation);
}

#[tokio::test]
async fn test_quit_guard_with_unsaved_changes() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('e'))).await.unwrap();
    type_keys(&mut app, "draft").await;

    app.handle_key(ctrl('q')).await.unwrap();
    assert!(app.running);
    assert_eq!(app.status_message(), Some(UNSAVED_QUIT_MESSAGE));

    app.handle_key(ctrl('e')).await.unwrap();
    assert!(!app.running);
}

#[tokio::test]
async fn test_quit_without_changes_stops_app() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
    assert!(!app.running);
}

#[tokio::test]
async fn test_session_cycling_wraps() {
    let mut app = app();
    app.handle_key(ctrl('n')).await.unwrap();
    app.handle_key(ctrl('n')).await.unwrap();
    assert_eq!(app.session_count(), 3);
    assert_eq!(app.active_index(), 2);

    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    assert_eq!(app.active_index(), 0);

    app.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT))
        .await
        .unwrap();
    assert_eq!(app.active_index(), 2);

    assert!(app.switch_to(1));
    assert!(!app.switch_to(3));
    assert_eq!(app.active_index(), 1);
}

#[tokio::test]
async fn test_close_refuses_last_and_dirty_sessions() {
    let mut app = app();
    assert!(!app.close_active().unwrap());
    assert_eq!(app.status_message(), Some("Cannot close the last file"));

    app.new_session().unwrap();
    app.handle_action(Action::Input(InputSymbol::EnterEdit))
        .await
        .unwrap();
    app.handle_action(Action::Input(InputSymbol::Char('x')))
        .await
        .unwrap();
    assert!(!app.close_active().unwrap());
    assert_eq!(app.session_count(), 2);

    app.switch_to(0);
    assert!(app.close_active().unwrap());
    assert_eq!(app.session_count(), 1);
    assert_eq!(app.active_index(), 0);
    assert!(app.active_session().is_dirty());
}

#[tokio::test]
async fn test_save_reports_on_status_line() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("save.txt");
    fs::write(&file_path, "one\n").unwrap();

    let mut app = app();
    app.open(&file_path).await.unwrap();
    app.handle_key(key(KeyCode::Char('e'))).await.unwrap();
    app.handle_key(key(KeyCode::End)).await.unwrap();
    type_keys(&mut app, "!").await;

    app.handle_key(ctrl('s')).await.unwrap();
    assert_eq!(app.status_message(), Some("Saved save.txt"));
    assert!(!app.has_unsaved_changes());
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "one!\n");

    // the next key clears the message
    app.handle_key(key(KeyCode::Left)).await.unwrap();
    assert!(app.status_message().is_none());
}

#[tokio::test]
async fn test_save_failure_keeps_changes() {
    let mut app = app();
    app.handle_key(key(KeyCode::Char('e'))).await.unwrap();
    type_keys(&mut app, "x").await;

    assert!(!app.save_active().await);
    assert!(app.status_message().unwrap().starts_with("Save failed"));
    assert!(app.has_unsaved_changes());
}

#[tokio::test]
async fn test_rejected_edit_is_reported_not_propagated() {
    let mut app = app();
    app.handle_action(Action::Input(InputSymbol::EnterEdit))
        .await
        .unwrap();
    app.handle_action(Action::Input(InputSymbol::Char('\u{7}')))
        .await
        .unwrap();
    assert!(app.status_message().is_some());
    assert!(!app.has_unsaved_changes());
    assert!(app.running);
}

#[tokio::test]
async fn test_open_file_from_prompt() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("x.txt");
    fs::write(&file_path, "hello\n").unwrap();

    let mut app = app();
    app.handle_key(ctrl('o')).await.unwrap();
    match app.focus() {
        Focus::OpenFile(prompt) => {
            assert_eq!(prompt.label(), OPEN_FILE_PROMPT);
            assert_eq!(prompt.text(), "");
        }
        other => panic!("expected the open prompt, got {:?}", other),
    }

    type_keys(&mut app, &file_path.display().to_string()).await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();

    assert_eq!(app.focus(), &Focus::Session);
    assert_eq!(app.status_message(), Some("Opened x.txt"));
    // the untouched scratch session is replaced
    assert_eq!(app.session_count(), 1);
    assert_eq!(app.active_session().path(), Some(file_path.as_path()));
    assert_eq!(active_lines(&app), vec!["hello"]);
}

#[tokio::test]
async fn test_open_prompt_editing_and_cancel() {
    let mut app = app();
    app.handle_key(ctrl('o')).await.unwrap();

    // letters bound in navigation are text here
    type_keys(&mut app, "qe").await;
    assert!(app.running);
    app.handle_key(key(KeyCode::Left)).await.unwrap();
    type_keys(&mut app, "x").await;
    app.handle_key(key(KeyCode::Backspace)).await.unwrap();
    app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::ALT))
        .await
        .unwrap();
    type_keys(&mut app, "!").await;
    match app.focus() {
        Focus::OpenFile(prompt) => {
            assert_eq!(prompt.text(), "qe!");
            assert_eq!(prompt.cursor(), 3);
        }
        other => panic!("expected the open prompt, got {:?}", other),
    }

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert_eq!(app.focus(), &Focus::Session);
    assert_eq!(app.session_count(), 1);
    assert!(app.active_session().path().is_none());
    assert_eq!(app.active_session().mode(), Mode::Navigation);
}

#[tokio::test]
async fn test_open_prompt_reports_empty_and_failed_paths() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = app();

    app.handle_key(ctrl('o')).await.unwrap();
    type_keys(&mut app, "   ").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.status_message(), Some("No file opened"));

    // a directory cannot be read as text
    app.handle_key(ctrl('o')).await.unwrap();
    type_keys(&mut app, &temp_dir.path().display().to_string()).await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.focus(), &Focus::Session);
    assert!(app
        .status_message()
        .unwrap()
        .starts_with("Failed to open file"));
    assert_eq!(app.session_count(), 1);
    assert!(app.active_session().path().is_none());
}

#[tokio::test]
async fn test_session_switcher_steps_without_wrapping() {
    let mut app = app();
    app.handle_key(ctrl('n')).await.unwrap();
    app.handle_key(ctrl('n')).await.unwrap();
    assert_eq!(app.active_index(), 2);

    app.handle_key(ctrl('b')).await.unwrap();
    assert_eq!(app.focus(), &Focus::SessionSwitcher);
    assert_eq!(app.status_message(), Some(SWITCHER_HINT));

    app.handle_key(key(KeyCode::Char('k'))).await.unwrap();
    assert_eq!(app.active_index(), 2);
    app.handle_key(key(KeyCode::Char('i'))).await.unwrap();
    app.handle_key(key(KeyCode::Up)).await.unwrap();
    app.handle_key(key(KeyCode::Char('i'))).await.unwrap();
    assert_eq!(app.active_index(), 0);
    app.handle_key(key(KeyCode::Down)).await.unwrap();
    assert_eq!(app.active_index(), 1);

    // other keys are swallowed
    app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
    assert!(app.running);
    assert_eq!(app.status_message(), Some(SWITCHER_HINT));

    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.focus(), &Focus::Session);
    assert!(app.status_message().is_none());
    assert_eq!(app.active_index(), 1);

    app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
    assert!(!app.running);
}
