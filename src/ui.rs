use ratatui::prelude::*;

use crate::app::Focus;
use crate::widgets::{gutter_width, Editor, PromptBar, StatusBar};
use crate::App;

impl App {
    /// Main render function for the application UI
    pub fn render(&self, f: &mut Frame) {
        let (editor_area, status_area) = Self::layout(f.area());

        self.render_editor(f, editor_area);
        self.render_status_line(f, status_area);
    }

    /// Render the active session's text and place the terminal cursor on its main cursor
    fn render_editor(&self, f: &mut Frame, area: Rect) {
        let session = self.active_session();
        let config = &self.config().editor;
        f.render_widget(Editor::new(session, config), area);

        let gutter = gutter_width(session.buffer().line_count(), config) as u16;
        let main = session
            .cursor_screen_positions()
            .into_iter()
            .find(|cursor| cursor.main);
        if let Some(cursor) = main {
            let x = area.x + gutter + cursor.column as u16;
            let y = area.y + cursor.row as u16;
            if x < area.right() && y < area.bottom() {
                f.set_cursor_position((x, y));
            }
        }
    }

    /// Status line, or the prompt when one has focus
    fn render_status_line(&self, f: &mut Frame, area: Rect) {
        if let Focus::OpenFile(prompt) = self.focus() {
            let bar = PromptBar::new(prompt);
            let x = area.x + bar.cursor_column() as u16;
            f.render_widget(bar, area);
            if x < area.right() && area.height > 0 {
                f.set_cursor_position((x, area.y));
            }
            return;
        }

        let status = StatusBar::new(self.active_session())
            .with_sessions(self.active_index(), self.session_count())
            .with_message(self.status_message());
        f.render_widget(status, area);
    }
}
