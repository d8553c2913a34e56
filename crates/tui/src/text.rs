use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{ContentStyle, Print, PrintStyledContent};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: ContentStyle,
}

/// Styled text split into lines, laid out as one centered block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledText {
    lines: Vec<Vec<Span>>,
}

impl Default for StyledText {
    fn default() -> Self {
        Self::new()
    }
}

impl StyledText {
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
        }
    }

    /// Appends `text`; every `\n` in it starts a new line.
    pub fn append(&mut self, text: &str, style: ContentStyle) {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            self.push_span(first, style);
        }
        for part in parts {
            self.newline();
            self.push_span(part, style);
        }
    }

    pub fn newline(&mut self) {
        self.lines.push(Vec::new());
    }

    fn push_span(&mut self, text: &str, style: ContentStyle) {
        let text = text.strip_suffix('\r').unwrap_or(text);
        if text.is_empty() {
            return;
        }
        if let Some(line) = self.lines.last_mut() {
            line.push(Span {
                text: text.to_string(),
                style,
            });
        }
    }

    pub fn lines(&self) -> &[Vec<Span>] {
        &self.lines
    }

    /// The text without styling, lines joined by `\n`.
    pub fn plain(&self) -> String {
        self.lines
            .iter()
            .map(|line| line_text(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Width of the widest line in terminal cells, trailing whitespace excluded.
    pub fn width(&self) -> usize {
        self.lines.iter().map(|l| visible_width(l)).max().unwrap_or(0)
    }

    /// Writes the block centered in `term_width` columns. Each line is
    /// centered within the block; lines wider than the terminal are not
    /// wrapped.
    pub fn write_centered<W: Write>(
        &self,
        out: &mut W,
        term_width: u16,
        color: bool,
    ) -> io::Result<()> {
        let block = self.width();
        let offset = usize::from(term_width).saturating_sub(block) / 2;
        let last = self
            .lines
            .iter()
            .rposition(|l| visible_width(l) > 0)
            .map_or(0, |i| i + 1);

        for line in &self.lines[..last] {
            let spans = trim_trailing(line);
            let pad = offset + (block - visible_width(line)) / 2;
            if !spans.is_empty() {
                queue!(out, Print(" ".repeat(pad)))?;
            }
            for span in &spans {
                if color {
                    queue!(out, PrintStyledContent(span.style.apply(span.text.as_str())))?;
                } else {
                    queue!(out, Print(span.text.as_str()))?;
                }
            }
            queue!(out, Print("\n"))?;
        }
        out.flush()
    }
}

fn line_text(line: &[Span]) -> String {
    line.iter().map(|s| s.text.as_str()).collect()
}

fn visible_width(line: &[Span]) -> usize {
    line_text(line).trim_end().width()
}

fn trim_trailing(line: &[Span]) -> Vec<Span> {
    let mut spans = line.to_vec();
    while let Some(last) = spans.last_mut() {
        let len = last.text.trim_end().len();
        if len == 0 {
            spans.pop();
        } else {
            last.text.truncate(len);
            break;
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_output(text: &StyledText, width: u16) -> String {
        let mut out = Vec::new();
        text.write_centered(&mut out, width, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn append_splits_lines() {
        let mut text = StyledText::new();
        text.append("ab\ncd", ContentStyle::new());
        text.append("ef\n", ContentStyle::new());
        assert_eq!(text.plain(), "ab\ncdef\n");
        assert_eq!(text.lines().len(), 3);
    }

    #[test]
    fn carriage_returns_dropped() {
        let mut text = StyledText::new();
        text.append("ab\r\ncd\r\n", ContentStyle::new());
        assert_eq!(text.plain(), "ab\ncd\n");
    }

    #[test]
    fn width_counts_cells_and_ignores_trailing_space() {
        let mut text = StyledText::new();
        text.append("⣠⣤⣤\nabcdef   \n全角", ContentStyle::new());
        assert_eq!(text.width(), 6);
    }

    #[test]
    fn block_is_centered_line_by_line() {
        let mut text = StyledText::new();
        text.append("abcd\nab   ", ContentStyle::new());
        assert_eq!(plain_output(&text, 10), "   abcd\n    ab\n");
    }

    #[test]
    fn leading_blank_lines_kept_trailing_dropped() {
        let mut text = StyledText::new();
        text.append("\nxy\n\n", ContentStyle::new());
        assert_eq!(plain_output(&text, 4), "\n xy\n");
    }

    #[test]
    fn narrow_terminal_does_not_truncate() {
        let mut text = StyledText::new();
        text.append("abcdef", ContentStyle::new());
        assert_eq!(plain_output(&text, 3), "abcdef\n");
    }

    #[test]
    fn color_output_wraps_spans() {
        let mut text = StyledText::new();
        text.append("hi", crate::style::parse_style("bold red"));
        let mut out = Vec::new();
        text.write_centered(&mut out, 2, true).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("hi"));
        assert!(out.contains('\u{1b}'));
    }
}
