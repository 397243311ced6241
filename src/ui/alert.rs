use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::ui::status_card::wrap_text;

const MAX_WIDTH: u16 = 64;

/// Centered modal for failures the user must acknowledge, such as a reply
/// the server refused. Keys are swallowed until it is dismissed.
pub struct AlertPopup<'a> {
    message: &'a str,
}

impl<'a> AlertPopup<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }

    fn panel(&self, area: Rect) -> (Rect, Vec<String>) {
        let width = MAX_WIDTH.min(area.width.saturating_sub(4)).max(10);
        let lines = wrap_text(self.message, width.saturating_sub(4) as usize);
        // borders, body, blank row, hint
        let wanted = lines.len() as u16 + 4;
        let height = wanted.min(area.height);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        (Rect::new(x, y, width.min(area.width), height), lines)
    }
}

impl Widget for AlertPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (panel, body) = self.panel(area);
        Clear.render(panel, buf);

        let red = Style::default().fg(Color::Red);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(red)
            .title(Span::styled(" Alert ", red.add_modifier(Modifier::BOLD)));
        let inner = block.inner(panel);
        block.render(panel, buf);
        if inner.height == 0 {
            return;
        }

        let mut lines: Vec<Line> = body
            .into_iter()
            .map(|l| Line::from(format!(" {l}")))
            .collect();
        let hint = Line::from(Span::styled(
            " Esc/Enter: dismiss",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        // Long messages are clipped; the hint always stays on the last row.
        let body_rows = inner.height.saturating_sub(1) as usize;
        lines.truncate(body_rows);
        Paragraph::new(lines).render(inner, buf);
        let hint_row = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
        Paragraph::new(hint).render(hint_row, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn render(message: &str, w: u16, h: u16) -> Buffer {
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        AlertPopup::new(message).render(area, &mut buf);
        buf
    }

    #[test]
    fn shows_message_and_hint() {
        let buf = render("Could not send reply: HTTP 500", 80, 20);
        let text: String = (0..20).map(|y| row(&buf, y)).collect();
        assert!(text.contains("Alert"));
        assert!(text.contains("Could not send reply: HTTP 500"));
        assert!(text.contains("Esc/Enter: dismiss"));
    }

    #[test]
    fn panel_is_centered_and_bounded() {
        let popup = AlertPopup::new("short");
        let (panel, lines) = popup.panel(Rect::new(0, 0, 100, 30));
        assert_eq!(panel.width, MAX_WIDTH);
        assert_eq!(panel.x, (100 - MAX_WIDTH) / 2);
        assert_eq!(lines.len(), 1);
        assert_eq!(panel.height, 5);
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let buf = render(&"word ".repeat(200), 12, 4);
        assert_eq!(buf.area.width, 12);
    }
}
