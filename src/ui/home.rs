use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::logo::{Logo, LogoVariant};

/// Start screen: wordmark plus how to open a status.
pub struct HomeView<'a> {
    pub instance: &'a str,
}

impl<'a> HomeView<'a> {
    pub fn new(instance: &'a str) -> Self {
        Self { instance }
    }
}

impl Widget for HomeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let logo = Logo::new(LogoVariant::Wordmark);
        let [logo_area, _, text_area] = Layout::vertical([
            Constraint::Length(logo.height()),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .flex(Flex::Center)
        .areas(area);
        let [logo_area] = Layout::horizontal([Constraint::Length(20)])
            .flex(Flex::Center)
            .areas(logo_area);
        logo.render(logo_area, buf);

        let dim = Style::default().fg(Color::DarkGray);
        Paragraph::new(vec![
            Line::styled(self.instance.to_string(), dim).centered(),
            Line::from(":open <status id or url> to view a conversation").centered(),
            Line::styled("? for help", dim).centered(),
        ])
        .render(text_area, buf);
    }
}
