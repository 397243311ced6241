use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};

use crate::app::{App, AppMode};
use crate::ui::replies::RepliesView;
use crate::ui::status_card::{StatusCard, status_card_height};

/// A single status with its reply preview and quick-reply box.
pub struct StatusView<'a> {
    pub app: &'a App,
}

impl<'a> StatusView<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for StatusView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Status ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(ref subject) = self.app.subject else {
            buf.set_string(
                inner.x + 1,
                inner.y,
                "Loading...",
                Style::default().fg(Color::DarkGray),
            );
            return;
        };

        let content_width = inner.width.saturating_sub(2);
        let card_h = status_card_height(subject, content_width, true).min(inner.height);
        StatusCard::new(subject).render(Rect::new(inner.x + 1, inner.y, content_width, card_h), buf);

        let below = inner.height.saturating_sub(card_h + 1);
        if below == 0 {
            return;
        }
        if let Some(ref replies) = self.app.replies {
            let replies_area = Rect::new(inner.x + 1, inner.y + card_h + 1, content_width, below);
            RepliesView::new(replies, self.app.signed_in)
                .composing(self.app.mode == AppMode::Compose)
                .render(replies_area, buf);
        }
    }
}
