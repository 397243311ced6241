use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::{App, AppMode};
use crate::event::ViewKind;
use crate::replies::{Panel, RepliesState};

/// Bottom bar: mode badge, where we are, who we are, and the last message.
pub struct StatusBar<'a> {
    pub app: &'a App,
}

impl<'a> StatusBar<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

fn mode_badge(mode: &AppMode) -> Span<'static> {
    let (label, color) = match mode {
        AppMode::Normal => (" NORMAL ", Color::Blue),
        AppMode::Command => (" COMMAND ", Color::Magenta),
        AppMode::Compose => (" REPLY ", Color::Green),
    };
    Span::styled(
        label,
        Style::default()
            .bg(color)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
}

fn view_label(view: Option<&ViewKind>, replies: Option<&RepliesState>) -> String {
    match view {
        Some(ViewKind::Home) | None => "Home".to_string(),
        Some(ViewKind::Help) => "Help".to_string(),
        Some(ViewKind::Thread(id)) => {
            let n = replies.map_or(0, |r| r.descendants.len());
            format!("Thread {id} ({n})")
        }
        Some(ViewKind::Status(id)) => match replies {
            Some(r) => {
                let panel = match r.panel {
                    Panel::Collapsed => "collapsed",
                    Panel::Loading => "loading",
                    Panel::Expanded => "expanded",
                };
                format!("Status {id} [{}, {panel}]", r.subject.visibility)
            }
            None => format!("Status {id}"),
        },
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let bar = Style::default().bg(Color::DarkGray).fg(Color::White);
        let dim = bar.fg(Color::Gray);
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), bar);

        let app = self.app;
        let mut spans = vec![
            mode_badge(&app.mode),
            Span::styled(" ", bar),
            Span::styled(view_label(app.current_view(), app.replies.as_ref()), bar),
        ];
        match app.current_account {
            Some(ref me) => spans.push(Span::styled(format!("  @{}", me.acct), dim)),
            None if !app.signed_in => spans.push(Span::styled("  (read-only)", dim)),
            None => {}
        }
        spans.push(Span::styled(format!("  {} cached", app.store.len()), dim));
        if app.is_busy() {
            spans.push(Span::styled("  loading...", bar.fg(Color::Yellow)));
        }

        // Right-align the message, clipping it to the bar width.
        if let Some(ref msg) = app.status_message {
            let used: usize = spans.iter().map(Span::width).sum();
            let msg: String = msg.chars().take(area.width as usize).collect();
            let pad = (area.width as usize).saturating_sub(used + msg.chars().count());
            spans.push(Span::styled(" ".repeat(pad), bar));
            spans.push(Span::styled(msg, bar.fg(Color::LightCyan)));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Visibility;
    use crate::replies::{Msg, Subject};

    fn state() -> RepliesState {
        RepliesState::new(Subject {
            id: "7".into(),
            acct: "bob".into(),
            visibility: Visibility::Unlisted,
            replies_count: 3,
        })
    }

    #[test]
    fn status_label_reports_panel_and_visibility() {
        let mut s = state();
        let view = ViewKind::Status("7".into());
        assert_eq!(
            view_label(Some(&view), Some(&s)),
            "Status 7 [unlisted, collapsed]"
        );
        s.update(Msg::Toggle);
        assert_eq!(
            view_label(Some(&view), Some(&s)),
            "Status 7 [unlisted, loading]"
        );
    }

    #[test]
    fn thread_label_counts_descendants() {
        let view = ViewKind::Thread("7".into());
        assert_eq!(view_label(Some(&view), Some(&state())), "Thread 7 (0)");
        assert_eq!(view_label(None, None), "Home");
    }

    #[test]
    fn compose_badge_is_reply() {
        assert_eq!(mode_badge(&AppMode::Compose).content, " REPLY ");
    }
}
