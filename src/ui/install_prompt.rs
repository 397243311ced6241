use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::install_prompt::DOWNLOAD_URL;
use crate::ui::logo::{Logo, LogoVariant};

pub const BANNER_HEIGHT: u16 = 4;

/// Bottom banner offering the Android app.
pub struct InstallBanner;

impl Widget for InstallBanner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 4 || inner.height == 0 {
            return;
        }

        Logo::new(LogoVariant::Icon).render(Rect::new(inner.x + 1, inner.y, 1, 1), buf);

        let text_area = Rect::new(inner.x + 3, inner.y, inner.width - 3, inner.height);
        let lines = vec![
            Line::from(vec![
                Span::styled("Get the Kronk App", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled("  (x to dismiss)", Style::default().fg(Color::DarkGray)),
            ]),
            Line::from(vec![
                Span::raw("Download the app for the best experience: "),
                Span::styled(DOWNLOAD_URL, Style::default().fg(Color::Blue)),
            ]),
        ];
        Paragraph::new(lines).render(text_area, buf);
    }
}
