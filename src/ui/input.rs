use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthChar;

/// A simple single-line text input renderer.
///
/// Renders the prompt + text content, with a cursor indicator at the end.
pub struct TextInput<'a> {
    pub prompt: &'a str,
    pub text: &'a str,
    pub style: Style,
}

impl<'a> TextInput<'a> {
    pub fn new(prompt: &'a str, text: &'a str) -> Self {
        Self {
            prompt,
            text,
            style: Style::default().fg(Color::White),
        }
    }
}

/// The widest suffix of `s` that fits in `max_width` columns.
fn tail_fitting(s: &str, max_width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > max_width {
            return &s[idx + c.len_utf8()..];
        }
    }
    s
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let display = format!("{}{}\u{2588}", self.prompt, self.text);
        // If the display is wider than the area, show the rightmost portion.
        let visible = tail_fitting(&display, area.width as usize);
        buf.set_string(area.x, area.y, visible, self.style);
    }
}

#[cfg(test)]
mod tests {
    use super::tail_fitting;

    #[test]
    fn keeps_short_text() {
        assert_eq!(tail_fitting("abc", 5), "abc");
    }

    #[test]
    fn cuts_from_the_left_on_char_boundaries() {
        assert_eq!(tail_fitting("héllo wörld", 5), "wörld");
        assert_eq!(tail_fitting("日本語", 4), "本語");
    }
}
