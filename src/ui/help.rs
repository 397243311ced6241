use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::ui::logo::{Logo, LogoVariant};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j/k", "Move through the thread"),
            ("Enter", "Open the selected reply"),
            ("Esc/q", "Go back / quit"),
            ("?", "This help"),
        ],
    ),
    (
        "Replies",
        &[
            ("r", "Show / hide replies"),
            ("R", "Retry after a failed load"),
            ("a", "View all replies"),
            ("i", "Write a reply (Enter sends)"),
        ],
    ),
    (
        "Other",
        &[
            (":open ID", "Open a status by ID or URL"),
            (":home", "Back to the start screen"),
            ("x", "Dismiss the app banner"),
            ("Ctrl-C", "Quit"),
        ],
    ),
];

/// Keybinding overlay, drawn over the previous view.
#[derive(Default)]
pub struct HelpView;

impl HelpView {
    pub fn new() -> Self {
        Self
    }
}

fn help_lines() -> Vec<Line<'static>> {
    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    for (i, (title, bindings)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(*title, heading)));
        lines.extend(bindings.iter().map(|(k, desc)| {
            Line::from(vec![
                Span::styled(format!("  {k:<10}"), key),
                Span::raw(*desc),
            ])
        }));
    }
    lines
}

impl Widget for HelpView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let logo = Logo::new(LogoVariant::Symbol);
        let lines = help_lines();
        // borders + logo + gap + bindings
        let wanted = 2 + logo.height() + 1 + lines.len() as u16;

        let width = 56u16.min(area.width.saturating_sub(4));
        let height = wanted.min(area.height.saturating_sub(2));
        let panel = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );
        Clear.render(panel, buf);

        let cyan = Style::default().fg(Color::Cyan);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(cyan)
            .title(Span::styled(" Keys ", cyan.add_modifier(Modifier::BOLD)));
        let inner = block.inner(panel);
        block.render(panel, buf);

        let [logo_area, _, body] = Layout::vertical([
            Constraint::Length(logo.height()),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);
        logo.render(logo_area, buf);
        Paragraph::new(lines).render(body, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_is_listed() {
        let text: Vec<String> = help_lines().iter().map(|l| l.to_string()).collect();
        for (title, _) in SECTIONS {
            assert!(text.iter().any(|l| l == title));
        }
        let bindings: usize = SECTIONS.iter().map(|(_, b)| b.len()).sum();
        assert_eq!(text.iter().filter(|l| l.starts_with("  ")).count(), bindings);
        assert!(text.iter().any(|l| l.contains("Retry after a failed load")));
    }

    #[test]
    fn renders_inside_small_area() {
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        HelpView::new().render(area, &mut buf);
    }
}
