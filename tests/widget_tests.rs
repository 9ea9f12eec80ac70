//! Integration tests for the widget system
//!
//! Renders the editor and status line into a test backend and inspects the cells

use ledit::app::SWITCHER_HINT;
use ledit::config::{Config, EditorConfig};
use ledit::cursor::Movement;
use ledit::input::Action;
use ledit::widgets::{Editor, StatusBar};
use ledit::{App, EditSession, InputSymbol, Position};
use ratatui::{
    backend::TestBackend,
    buffer::Buffer as TuiBuffer,
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    layout::Rect,
    style::{Color, Modifier},
    widgets::Widget,
    Terminal,
};

fn row_text(buffer: &TuiBuffer, y: u16) -> String {
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol().to_string())
        .collect()
}

fn render_app(app: &mut App, width: u16, height: u16) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal
        .draw(|f| {
            app.resize(f.area());
            app.render(f);
        })
        .unwrap();
    terminal
}

fn app_with_text(config: Config, text: &str) -> App {
    let mut app = App::new(config).unwrap();
    *app.active_session_mut() = EditSession::from_text(text).unwrap();
    app
}

#[test]
fn test_editor_draws_gutter_and_fill() {
    let session = EditSession::from_text("hello\nworld").unwrap();
    let config = EditorConfig::default();
    let area = Rect::new(0, 0, 20, 4);
    let mut buffer = TuiBuffer::empty(area);

    Editor::new(&session, &config).render(area, &mut buffer);

    assert!(row_text(&buffer, 0).starts_with(" 1 hello"));
    assert!(row_text(&buffer, 1).starts_with(" 2 world"));
    assert_eq!(row_text(&buffer, 2).trim_end(), " ~");
    assert_eq!(row_text(&buffer, 3).trim_end(), " ~");
}

#[test]
fn test_editor_without_line_numbers() {
    let session = EditSession::from_text("text").unwrap();
    let config = EditorConfig {
        show_line_numbers: false,
        ..EditorConfig::default()
    };
    let area = Rect::new(0, 0, 10, 2);
    let mut buffer = TuiBuffer::empty(area);

    Editor::new(&session, &config).render(area, &mut buffer);

    assert_eq!(row_text(&buffer, 0).trim_end(), "text");
    assert_eq!(row_text(&buffer, 1).trim_end(), "~");
}

#[test]
fn test_editor_draws_from_scroll_position() {
    let text: Vec<String> = (1..=30).map(|i| format!("row{}", i)).collect();
    let mut session = EditSession::from_text(&text.join("\n")).unwrap();
    session.resize(16, 5);
    session.goto(Position::new(20, 0)).unwrap();
    assert_eq!(session.viewport().scroll_line, 16);

    let config = EditorConfig::default();
    let area = Rect::new(0, 0, 20, 5);
    let mut buffer = TuiBuffer::empty(area);
    Editor::new(&session, &config).render(area, &mut buffer);

    assert!(row_text(&buffer, 0).starts_with("17 row17"));
    assert!(row_text(&buffer, 4).starts_with("21 row21"));
}

#[test]
fn test_status_bar_rendering() {
    let mut session = EditSession::from_text("abc").unwrap();
    session.dispatch(InputSymbol::EnterEdit).unwrap();
    session.dispatch(InputSymbol::Char('x')).unwrap();

    let area = Rect::new(0, 0, 60, 1);
    let mut buffer = TuiBuffer::empty(area);
    StatusBar::new(&session)
        .with_sessions(1, 2)
        .with_message(Some("hello"))
        .render(area, &mut buffer);

    let row = row_text(&buffer, 0);
    assert!(row.starts_with(" EDIT | *untitled | Ln 1, Col 2"));
    assert!(row.ends_with("hello | 2/2 "));
}

#[test]
fn test_narrow_status_bar_keeps_left_side() {
    let session = EditSession::new();
    let area = Rect::new(0, 0, 20, 1);
    let mut buffer = TuiBuffer::empty(area);
    StatusBar::new(&session)
        .with_message(Some("a long status message"))
        .render(area, &mut buffer);

    assert!(row_text(&buffer, 0).starts_with(" NORMAL | untitled"));
}

#[test]
fn test_app_frame_layout_and_cursor() {
    let mut app = app_with_text(Config::default(), "hello\nworld");
    app.resize(Rect::new(0, 0, 60, 5));
    app.active_session_mut()
        .goto(Position::new(1, 3))
        .unwrap();

    let mut terminal = render_app(&mut app, 60, 5);
    let buffer = terminal.backend().buffer().clone();

    assert!(row_text(&buffer, 0).starts_with(" 1 hello"));
    assert!(row_text(&buffer, 1).starts_with(" 2 world"));
    assert!(row_text(&buffer, 2).starts_with(" ~"));

    let status = row_text(&buffer, 4);
    assert!(status.starts_with(" NORMAL | untitled | Ln 2, Col 4"));
    assert!(status.ends_with("1/1 "));

    // gutter is three columns wide
    let cursor = terminal.get_cursor_position().unwrap();
    assert_eq!((cursor.x, cursor.y), (6, 1));
}

#[test]
fn test_app_resize_sets_text_area() {
    let mut app = app_with_text(Config::default(), "a");
    app.resize(Rect::new(0, 0, 40, 12));

    let session = app.active_session();
    assert_eq!(session.visible_lines(), 11);
    assert_eq!(session.visible_columns(), 37);
}

#[test]
fn test_editor_highlights_selection() {
    let mut session = EditSession::from_text("hello world").unwrap();
    session.resize(17, 2);
    session.goto(Position::new(0, 1)).unwrap();
    {
        let (cursors, buffer) = session.cursors_mut();
        cursors.main_mut().begin_selection();
        for _ in 0..3 {
            cursors.move_main(Movement::CharacterRight, buffer);
        }
    }

    let config = EditorConfig::default();
    let area = Rect::new(0, 0, 20, 2);
    let mut buffer = TuiBuffer::empty(area);
    Editor::new(&session, &config).render(area, &mut buffer);

    // text starts after the three-column gutter; columns 1..4 are selected
    assert!(row_text(&buffer, 0).starts_with(" 1 hello world"));
    assert_eq!(buffer[(3, 0)].bg, Color::Black);
    for x in 4..7 {
        assert_eq!(buffer[(x, 0)].bg, Color::DarkGray, "cell {}", x);
    }
    assert_eq!(buffer[(7, 0)].bg, Color::Black);
}

#[test]
fn test_editor_marks_secondary_cursors() {
    let mut session = EditSession::from_text("abc\ndefg").unwrap();
    session.resize(17, 2);
    {
        let (cursors, buffer) = session.cursors_mut();
        cursors.add(buffer, Position::new(1, 2)).unwrap();
        // just past the end of "abc"
        cursors.add(buffer, Position::new(0, 3)).unwrap();
    }

    let config = EditorConfig::default();
    let area = Rect::new(0, 0, 20, 2);
    let mut buffer = TuiBuffer::empty(area);
    Editor::new(&session, &config).render(area, &mut buffer);

    let reversed = |x: u16, y: u16| buffer[(x, y)].modifier.contains(Modifier::REVERSED);
    assert_eq!(buffer[(5, 1)].symbol(), "f");
    assert!(reversed(5, 1));
    assert_eq!(buffer[(6, 0)].symbol(), " ");
    assert!(reversed(6, 0));
    // the main cursor is drawn by the terminal, not styled
    assert!(!reversed(3, 0));
    assert!(!reversed(4, 1));
}

#[test]
fn test_editor_scrolls_horizontally() {
    let mut session = EditSession::from_text("abcdefghijklmnopqrstuvwxyz0123\nshort").unwrap();
    session.resize(10, 3);
    session.goto(Position::new(0, 25)).unwrap();
    assert_eq!(session.viewport().scroll_column, 16);

    let config = EditorConfig::default();
    let area = Rect::new(0, 0, 13, 3);
    let mut buffer = TuiBuffer::empty(area);
    Editor::new(&session, &config).render(area, &mut buffer);

    assert_eq!(row_text(&buffer, 0), " 1 qrstuvwxyz");
    // shorter than the scroll offset: only the gutter shows
    assert_eq!(row_text(&buffer, 1).trim_end(), " 2");

    let cursors = session.cursor_screen_positions();
    assert_eq!((cursors[0].row, cursors[0].column), (0, 9));
}

#[tokio::test]
async fn test_open_file_prompt_replaces_status_line() {
    let mut app = App::new(Config::default()).unwrap();
    app.handle_action(Action::OpenFile).await.unwrap();
    for ch in ['a', 'b'] {
        app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE))
            .await
            .unwrap();
    }

    let mut terminal = render_app(&mut app, 40, 4);
    let buffer = terminal.backend().buffer().clone();
    assert_eq!(row_text(&buffer, 3).trim_end(), "File path to open: ab");

    let cursor = terminal.get_cursor_position().unwrap();
    assert_eq!((cursor.x, cursor.y), (21, 3));
}

#[tokio::test]
async fn test_session_switcher_shows_hint() {
    let mut app = App::new(Config::default()).unwrap();
    app.handle_action(Action::SwitchSessions).await.unwrap();

    let terminal = render_app(&mut app, 80, 3);
    let status = row_text(terminal.backend().buffer(), 2);
    assert!(status.contains(SWITCHER_HINT));
}
