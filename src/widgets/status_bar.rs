use ratatui::{
    buffer::Buffer as TuiBuffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::session::{EditSession, Mode};

/// One row: mode, file and cursor on the left, session count and message on the right.
pub struct StatusBar<'a> {
    session: &'a EditSession,
    index: usize,
    count: usize,
    message: Option<&'a str>,
    background_style: Style,
}

const SEPARATOR: &str = " | ";

impl<'a> StatusBar<'a> {
    pub fn new(session: &'a EditSession) -> Self {
        Self {
            session,
            index: 0,
            count: 1,
            message: None,
            background_style: Style::default().bg(Color::LightBlue).fg(Color::White),
        }
    }

    /// Position of this session among all open ones (0-based index).
    pub fn with_sessions(mut self, index: usize, count: usize) -> Self {
        self.index = index;
        self.count = count;
        self
    }

    pub fn with_message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }

    fn mode_style(mode: Mode) -> Style {
        match mode {
            Mode::Navigation => Style::default().fg(Color::White).bg(Color::DarkGray),
            Mode::TextEntry => Style::default().fg(Color::Black).bg(Color::Yellow),
        }
    }

    fn mode_text(&self) -> String {
        format!(" {}", self.session.mode().as_str())
    }

    fn file_text(&self) -> String {
        let position = self.session.cursor();
        let dirty = if self.session.is_dirty() { "*" } else { "" };
        format!(
            "{sep}{dirty}{name}{sep}Ln {line}, Col {column}",
            sep = SEPARATOR,
            name = self.session.display_name(),
            line = position.line + 1,
            column = position.column + 1,
        )
    }

    /// Left-hand text: ` NORMAL | *name | Ln 1, Col 1`.
    pub fn left_text(&self) -> String {
        self.mode_text() + &self.file_text()
    }

    /// Right-hand text: `message | 1/2`.
    pub fn right_text(&self) -> String {
        let sessions = format!("{}/{} ", self.index + 1, self.count);
        match self.message {
            Some(message) if !message.is_empty() => {
                format!("{}{}{}", message, SEPARATOR, sessions)
            }
            _ => sessions,
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mode_text = self.mode_text();
        let file_text = self.file_text();
        let right = self.right_text();

        let available = area.width as usize;
        let left_width = mode_text.chars().count() + file_text.chars().count();
        let right_width = right.chars().count();

        let mut spans = vec![
            Span::styled(mode_text, Self::mode_style(self.session.mode())),
            Span::styled(file_text, self.background_style),
        ];
        // Left side wins when the row is too narrow for both
        if left_width + right_width <= available {
            spans.push(Span::styled(
                " ".repeat(available - left_width - right_width),
                self.background_style,
            ));
            spans.push(Span::styled(right, self.background_style));
        }

        Paragraph::new(Line::from(spans))
            .style(self.background_style)
            .render(area, buf);
    }
}
