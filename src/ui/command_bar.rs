use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthChar;

/// `:` command input rendered at the bottom in command mode.
///
/// Shows the prompt and text with a cursor block at the end; when the line is
/// wider than the area, the rightmost part stays visible.
pub struct CommandBar<'a> {
    pub text: &'a str,
}

impl<'a> CommandBar<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl Widget for CommandBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let display = format!(":{}\u{2588}", self.text);
        let visible = tail_fitting(&display, area.width as usize);
        buf.set_string(area.x, area.y, visible, Style::default().fg(Color::White));
    }
}

/// Longest suffix of `s` that fits in `max` columns.
fn tail_fitting(s: &str, max: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in s.char_indices().rev() {
        used += ch.width().unwrap_or(0);
        if used > max {
            return &s[idx + ch.len_utf8()..];
        }
    }
    s
}
