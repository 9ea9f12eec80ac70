use ratatui::{
    buffer::Buffer as TuiBuffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::prompt::Prompt;

/// The status line while a prompt is asking for input.
pub struct PromptBar<'a> {
    prompt: &'a Prompt,
}

impl<'a> PromptBar<'a> {
    pub fn new(prompt: &'a Prompt) -> Self {
        Self { prompt }
    }

    /// Column of the input cursor, relative to the left edge of the bar.
    pub fn cursor_column(&self) -> usize {
        self.prompt.label().chars().count() + self.prompt.cursor()
    }
}

impl Widget for PromptBar<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        let line = Line::from(vec![
            Span::styled(
                self.prompt.label().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(self.prompt.text()),
        ]);
        Paragraph::new(line)
            .style(Style::default().fg(Color::White).bg(Color::Black))
            .render(area, buf);
    }
}
