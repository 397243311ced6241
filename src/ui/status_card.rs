use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::api::types::{Status, Visibility};
use crate::ui::html::to_plain_text;

/// Renders a single status as a compact card.
///
/// Layout:
///   Display Name @acct · 2h                        [unlisted]
///   Status text (may wrap) ...
///   ↩ 5  ↻ 3  ★ 12
pub struct StatusCard<'a> {
    pub status: &'a Status,
    pub selected: bool,
    pub show_metrics: bool,
}

impl<'a> StatusCard<'a> {
    pub fn new(status: &'a Status) -> Self {
        Self {
            status,
            selected: false,
            show_metrics: true,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn show_metrics(mut self, show: bool) -> Self {
        self.show_metrics = show;
        self
    }
}

impl Widget for StatusCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let highlight_style = if self.selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let mut y = area.y;
        let account = &self.status.account;

        // -- Line 1: author, time, visibility --
        let mut header_spans = vec![
            Span::styled(account.name(), highlight_style.add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(
                format!("@{}", account.acct),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!(" \u{00B7} {}", format_time_ago(self.status.created_at)),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        if self.status.visibility != Visibility::Public {
            header_spans.push(Span::styled(
                format!(" [{}]", self.status.visibility),
                Style::default().fg(Color::Yellow),
            ));
        }

        buf.set_line(area.x, y, &Line::from(header_spans), area.width);
        y += 1;

        // -- Line 2+: body (wrapped) --
        let text = card_text(self.status);
        let reserved = u16::from(self.show_metrics);
        let max_text_lines = (area.height - (y - area.y)).saturating_sub(reserved).max(1) as usize;

        let text_style = if self.selected {
            Style::default().fg(Color::White)
        } else {
            Style::default()
        };
        for (i, line_text) in wrap_text(&text, area.width as usize).into_iter().enumerate() {
            if i >= max_text_lines || y >= area.y + area.height {
                break;
            }
            buf.set_string(area.x, y, &line_text, text_style);
            y += 1;
        }

        if !self.show_metrics || y >= area.y + area.height {
            return;
        }

        // -- Last line: metrics --
        let metrics_line = Line::from(vec![
            Span::styled(
                format!("\u{21A9} {}", format_count(self.status.replies_count)),
                Style::default().fg(Color::Blue),
            ),
            Span::raw("  "),
            Span::styled(
                format!("\u{21BB} {}", format_count(self.status.reblogs_count)),
                Style::default().fg(Color::Green),
            ),
            Span::raw("  "),
            Span::styled(
                format!("\u{2605} {}", format_count(self.status.favourites_count)),
                Style::default().fg(Color::Yellow),
            ),
        ]);
        buf.set_line(area.x, y, &metrics_line, area.width);
    }
}

/// Body text with the content warning, if any, on top.
fn card_text(status: &Status) -> String {
    let body = to_plain_text(&status.content);
    if status.spoiler_text.is_empty() {
        body
    } else {
        format!("CW: {}\n{body}", status.spoiler_text)
    }
}

/// Height in lines needed for a status card.
pub fn status_card_height(status: &Status, width: u16, show_metrics: bool) -> u16 {
    let text_lines = wrap_text(&card_text(status), width as usize).len() as u16;
    // header + text + metrics
    1 + text_lines + u16::from(show_metrics)
}

pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![];
    }
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.width() + 1 + word.width() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn format_time_ago(dt: chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let diff = now.signed_duration_since(dt);

    if diff.num_seconds() < 60 {
        format!("{}s", diff.num_seconds().max(0))
    } else if diff.num_minutes() < 60 {
        format!("{}m", diff.num_minutes())
    } else if diff.num_hours() < 24 {
        format!("{}h", diff.num_hours())
    } else if diff.num_days() < 30 {
        format!("{}d", diff.num_days())
    } else {
        dt.format("%b %d").to_string()
    }
}

fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::fixtures::status;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("the quick brown fox", 9),
            vec!["the quick", "brown fox"]
        );
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
        assert!(wrap_text("abc", 0).is_empty());
    }

    #[test]
    fn counts_abbreviate() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_500), "1.5K");
        assert_eq!(format_count(2_000_000), "2.0M");
    }

    #[test]
    fn height_includes_header_and_metrics() {
        let s = status("1", None, 0);
        assert_eq!(status_card_height(&s, 40, true), 3);
        assert_eq!(status_card_height(&s, 40, false), 2);
    }

    #[test]
    fn content_warning_goes_first() {
        let mut s = status("1", None, 0);
        s.spoiler_text = "spoilers".into();
        assert_eq!(card_text(&s), "CW: spoilers\nstatus 1");
    }
}
