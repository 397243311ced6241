use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

use crate::replies::tree::MAX_DEPTH;
use crate::replies::{Composer, Panel, RepliesState, ReplyNode};
use crate::ui::input::TextInput;
use crate::ui::status_card::{StatusCard, status_card_height};

const INDENT: u16 = 2;

/// Reply preview and quick-reply box shown under a status.
pub struct RepliesView<'a> {
    pub state: &'a RepliesState,
    pub signed_in: bool,
    pub composing: bool,
}

impl<'a> RepliesView<'a> {
    pub fn new(state: &'a RepliesState, signed_in: bool) -> Self {
        Self {
            state,
            signed_in,
            composing: false,
        }
    }

    pub fn composing(mut self, composing: bool) -> Self {
        self.composing = composing;
        self
    }
}

pub fn toggle_label(state: &RepliesState) -> String {
    match state.panel {
        Panel::Collapsed => {
            let count = state.subject.replies_count;
            let noun = if count == 1 { "reply" } else { "replies" };
            format!("View {count} {noun}")
        }
        Panel::Loading | Panel::Expanded => "Hide replies".to_string(),
    }
}

/// Draws nodes top-down, stopping at the bottom of `area`.
struct Cursor<'b> {
    buf: &'b mut Buffer,
    area: Rect,
    y: u16,
}

impl Cursor<'_> {
    fn remaining(&self) -> u16 {
        (self.area.y + self.area.height).saturating_sub(self.y)
    }

    fn line(&mut self, indent: u16, text: &str, style: Style) {
        if self.remaining() == 0 {
            return;
        }
        let x = self.area.x + indent.min(self.area.width);
        let width = self.area.width.saturating_sub(indent) as usize;
        let text: String = text.chars().take(width).collect();
        self.buf.set_string(x, self.y, text, style);
        self.y += 1;
    }

    fn node(&mut self, node: &ReplyNode, depth: usize) {
        let indent = INDENT * depth.min(MAX_DEPTH) as u16;
        let width = self.area.width.saturating_sub(indent + 2);
        let height = status_card_height(&node.status, width, false).min(self.remaining());
        if height == 0 || width == 0 {
            return;
        }

        let marker = if depth == 0 { "\u{2502}" } else { "\u{2514}" };
        self.buf.set_string(
            self.area.x + indent,
            self.y,
            marker,
            Style::default().fg(Color::DarkGray),
        );
        let card_area = Rect::new(self.area.x + indent + 2, self.y, width, height);
        StatusCard::new(&node.status)
            .show_metrics(false)
            .render(card_area, self.buf);
        self.y += height;

        if depth + 1 < MAX_DEPTH {
            for child in &node.nested {
                self.node(child, depth + 1);
            }
        }
    }
}

impl Widget for RepliesView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        if area.height == 0 || area.width == 0 {
            return;
        }
        if state.subject.replies_count == 0 && !self.signed_in {
            return;
        }

        let mut cursor = Cursor { buf, area, y: area.y };
        let dim = Style::default().fg(Color::DarkGray);

        if state.subject.replies_count > 0 {
            cursor.line(
                0,
                &format!("\u{1F4AC} {}  (r)", toggle_label(state)),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            );
        }

        match state.panel {
            Panel::Collapsed => {}
            Panel::Loading => cursor.line(INDENT, "Loading replies...", dim),
            Panel::Expanded => {
                if state.fetch_failed {
                    cursor.line(
                        INDENT,
                        "Could not load replies, press R to retry",
                        Style::default().fg(Color::Red),
                    );
                }
                for node in &state.replies {
                    cursor.node(node, 0);
                }
                if state.shows_view_all() {
                    cursor.line(
                        INDENT,
                        &format!("View all {} replies  (a)", state.subject.replies_count),
                        Style::default().fg(Color::Blue),
                    );
                }
            }
        }

        if !self.signed_in || cursor.remaining() == 0 {
            return;
        }

        // -- Quick reply --
        cursor.y += u16::from(cursor.remaining() > 1);
        let input_area = Rect::new(area.x, cursor.y, area.width, 1);
        if state.composer == Composer::Submitting {
            cursor.line(0, &format!("> {}  sending...", state.draft), dim);
        } else if self.composing {
            TextInput::new("> ", &state.draft).render(input_area, cursor.buf);
        } else if state.draft.is_empty() {
            cursor.line(0, "> Write a reply...  (i)", dim);
        } else {
            cursor.line(0, &format!("> {}", state.draft), Style::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Visibility;
    use crate::api::types::fixtures::status;
    use crate::replies::{Msg, Subject};

    fn state(replies_count: u64) -> RepliesState {
        RepliesState::new(Subject {
            id: "1".into(),
            acct: "bob".into(),
            visibility: Visibility::Public,
            replies_count,
        })
    }

    fn render(view: RepliesView<'_>) -> String {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn expanded(replies_count: u64) -> RepliesState {
        let mut s = state(replies_count);
        s.update(Msg::Toggle);
        s.update(Msg::FetchCompleted {
            generation: 1,
            result: Ok(vec![
                status("2", Some("1"), 10),
                status("3", Some("1"), 20),
                status("4", Some("2"), 15),
            ]),
        });
        s
    }

    #[test]
    fn labels_pluralize() {
        assert_eq!(toggle_label(&state(1)), "View 1 reply");
        assert_eq!(toggle_label(&state(4)), "View 4 replies");
        assert_eq!(toggle_label(&expanded(4)), "Hide replies");
    }

    #[test]
    fn nothing_for_anonymous_without_replies() {
        let s = state(0);
        assert!(render(RepliesView::new(&s, false)).trim().is_empty());
    }

    #[test]
    fn composer_only_when_signed_in() {
        let s = state(0);
        let out = render(RepliesView::new(&s, true));
        assert!(out.contains("Write a reply..."));
        assert!(!out.contains("View"));
    }

    #[test]
    fn expanded_tree_with_view_all() {
        let s = expanded(5);
        let out = render(RepliesView::new(&s, false));
        assert!(out.contains("Hide replies"));
        let pos3 = out.find("status 3").unwrap();
        let pos2 = out.find("status 2").unwrap();
        let pos4 = out.find("status 4").unwrap();
        assert!(pos3 < pos2 && pos2 < pos4);
        assert!(out.contains("View all 5 replies"));
    }

    #[test]
    fn no_view_all_when_everything_is_shown() {
        let s = expanded(2);
        assert!(!render(RepliesView::new(&s, false)).contains("View all"));
    }

    #[test]
    fn loading_and_failure_messages() {
        let mut s = state(2);
        s.update(Msg::Toggle);
        assert!(render(RepliesView::new(&s, false)).contains("Loading replies..."));

        s.update(Msg::FetchCompleted {
            generation: 1,
            result: Err(std::sync::Arc::new("down".into())),
        });
        assert!(render(RepliesView::new(&s, false)).contains("press R to retry"));
    }
}
