use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::app::{App, AppMode};
use crate::ui::input::TextInput;

/// Input bar rendered at the bottom in command or compose mode.
pub struct CommandBar<'a> {
    pub app: &'a App,
}

impl<'a> CommandBar<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for CommandBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.app.mode {
            AppMode::Command => {
                TextInput::new(":", &self.app.command_input).render(area, buf);
            }
            AppMode::Compose => {
                let acct = self
                    .app
                    .replies
                    .as_ref()
                    .map_or("", |r| r.subject.acct.as_str());
                buf.set_string(
                    area.x,
                    area.y,
                    format!("Replying to @{acct}: Enter to send, Esc to leave"),
                    Style::default().fg(Color::DarkGray),
                );
            }
            AppMode::Normal => {}
        }
    }
}
