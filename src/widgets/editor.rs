use ratatui::{
    buffer::Buffer as TuiBuffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::buffer::Position;
use crate::config::EditorConfig;
use crate::cursor::Selection;
use crate::session::EditSession;

const GUTTER_STYLE: Style = Style::new().fg(Color::Rgb(100, 100, 120));
const SELECTION_STYLE: Style = Style::new().bg(Color::DarkGray).fg(Color::White);
const SECONDARY_CURSOR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

fn digits(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        digits += 1;
        n /= 10;
    }
    digits
}

/// Columns taken by the line-number gutter, including its separating space.
///
/// Sized from the whole buffer rather than the visible rows so the text does
/// not shift sideways while scrolling.
pub fn gutter_width(line_count: usize, config: &EditorConfig) -> usize {
    if config.show_line_numbers {
        digits(line_count.max(1)).max(config.min_gutter_width) + 1
    } else {
        0
    }
}

/// Renders the visible slice of a session's buffer.
pub struct Editor<'a> {
    pub session: &'a EditSession,
    pub config: &'a EditorConfig,
}

impl<'a> Editor<'a> {
    pub fn new(session: &'a EditSession, config: &'a EditorConfig) -> Self {
        Self { session, config }
    }

    fn gutter(&self, row: Option<usize>, width: usize) -> Vec<Span<'a>> {
        if width == 0 {
            return Vec::new();
        }
        let label = match row {
            Some(index) => format!("{:>width$}", index + 1, width = width - 1),
            None => format!("{:>width$}", self.config.empty_line_fill, width = width - 1),
        };
        vec![Span::styled(label, GUTTER_STYLE), Span::raw(" ")]
    }

    fn text_spans(
        &self,
        index: usize,
        columns: usize,
        selections: &[Selection],
        secondary: &[Position],
    ) -> Vec<Span<'a>> {
        let Ok(line) = self.session.buffer().line(index) else {
            return Vec::new();
        };
        let scroll_column = self.session.viewport().scroll_column;
        let end = line.len().min(scroll_column.saturating_add(columns));

        let mut spans: Vec<Span<'a>> = Vec::new();
        let mut run = String::new();
        let mut run_style = Style::default();
        for column in scroll_column..end {
            let position = Position::new(index, column);
            let style = if secondary.contains(&position) {
                SECONDARY_CURSOR_STYLE
            } else if selections.iter().any(|s| s.contains(position)) {
                SELECTION_STYLE
            } else {
                Style::default()
            };
            if style != run_style && !run.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut run), run_style));
            }
            run_style = style;
            if let Some(ch) = line.char_at(column) {
                run.push(ch);
            }
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, run_style));
        }

        // A secondary cursor past the last character still needs a cell
        let after_end = Position::new(index, line.len());
        if secondary.contains(&after_end)
            && line.len() >= scroll_column
            && line.len() < scroll_column.saturating_add(columns)
        {
            spans.push(Span::styled(" ", SECONDARY_CURSOR_STYLE));
        }

        spans
    }
}

impl Widget for Editor<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        let buffer = self.session.buffer();
        let gutter = gutter_width(buffer.line_count(), self.config);
        let columns = (area.width as usize).saturating_sub(gutter);
        let rows = area.height as usize;

        let cursors = self.session.cursors();
        let main = cursors.main_index();
        let selections: Vec<Selection> = cursors
            .iter()
            .filter_map(|cursor| cursor.selection())
            .filter(|selection| !selection.is_empty())
            .collect();
        let secondary: Vec<Position> = cursors
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != main)
            .map(|(_, cursor)| cursor.position())
            .collect();

        let scroll_line = self.session.viewport().scroll_line;
        let mut lines = Vec::with_capacity(rows);
        for row in 0..rows {
            let index = scroll_line + row;
            if index < buffer.line_count() {
                let mut spans = self.gutter(Some(index), gutter);
                spans.extend(self.text_spans(index, columns, &selections, &secondary));
                lines.push(Line::from(spans));
            } else if gutter > 0 {
                lines.push(Line::from(self.gutter(None, gutter)));
            } else {
                lines.push(Line::from(Span::styled(
                    self.config.empty_line_fill.clone(),
                    GUTTER_STYLE,
                )));
            }
        }

        Paragraph::new(lines)
            .style(Style::default().fg(Color::White).bg(Color::Black))
            .render(area, buf);
    }
}
