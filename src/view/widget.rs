//! Terminal rendering of a code block
//!
//! Draws the rendered view model with ratatui: a header row (filename and copy
//! button) followed by one row per line, with a line-number gutter.

use crate::view::code_block::{Header, RenderedCodeBlock, RenderedLine};
use crate::view::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

/// Separator between the line-number gutter and the code
const GUTTER_SEPARATOR: &str = " │ ";

/// Tab stops for terminal display
const TAB_WIDTH: usize = 8;

/// Calculate tab expansion width at a given column
#[inline]
fn tab_expansion_width(column: usize) -> usize {
    TAB_WIDTH - (column % TAB_WIDTH)
}

/// Replace tabs with spaces up to the next tab stop.
///
/// `column` is the code column the text starts at and is advanced past it,
/// so consecutive spans of one line share tab stops. Columns count chars.
fn expand_tabs(text: &str, column: &mut usize) -> String {
    if !text.contains('\t') {
        *column += text.chars().count();
        return text.to_string();
    }

    let mut expanded = String::with_capacity(text.len() + TAB_WIDTH);
    for c in text.chars() {
        if c == '\t' {
            let width = tab_expansion_width(*column);
            expanded.extend(std::iter::repeat(' ').take(width));
            *column += width;
        } else {
            expanded.push(c);
            *column += 1;
        }
    }
    expanded
}

/// Renders a [`RenderedCodeBlock`] into a ratatui buffer
pub struct CodeBlockWidget<'a> {
    block: &'a RenderedCodeBlock,
    theme: &'a Theme,
}

impl<'a> CodeBlockWidget<'a> {
    pub fn new(block: &'a RenderedCodeBlock, theme: &'a Theme) -> Self {
        Self { block, theme }
    }

    /// Rows needed to show the whole block
    pub fn height(&self) -> u16 {
        let rows = self.block.lines.len() + usize::from(self.block.header.is_some());
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    /// The block as styled lines, header first
    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.block.lines.len() + 1);
        if let Some(header) = &self.block.header {
            lines.push(self.header_line(header));
        }
        lines.extend(self.block.lines.iter().map(|line| self.code_line(line)));
        lines
    }

    fn header_line(&self, header: &Header) -> Line<'static> {
        let mut spans = Vec::new();

        if let Some(filename) = &header.filename {
            spans.push(Span::styled(
                filename.clone(),
                Style::default()
                    .fg(self.theme.filename_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        if let Some(button) = &header.copy_button {
            if !spans.is_empty() {
                spans.push(Span::styled("  ", Style::default().fg(self.theme.header_fg)));
            }
            let color = if button.copied {
                self.theme.copied_fg
            } else {
                self.theme.copy_button_fg
            };
            spans.push(Span::styled(
                format!("[{}]", button.label),
                Style::default().fg(color),
            ));
        }

        Line::from(spans)
    }

    fn code_line(&self, line: &RenderedLine) -> Line<'static> {
        let mut spans = Vec::with_capacity(line.spans.len() + 1);

        if let Some(label) = &line.number_label {
            spans.push(Span::styled(
                format!("{label}{GUTTER_SEPARATOR}"),
                Style::default().fg(self.theme.line_number_fg),
            ));
        }

        let mut column = 0;
        spans.extend(line.spans.iter().map(|span| {
            Span::styled(
                expand_tabs(&span.text, &mut column),
                self.theme.span_style(span.category),
            )
        }));

        Line::from(spans)
    }
}

impl Widget for CodeBlockWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let base = Style::default()
            .fg(self.theme.text_fg)
            .bg(self.theme.background);
        Paragraph::new(self.lines()).style(base).render(area, buf);
    }
}
