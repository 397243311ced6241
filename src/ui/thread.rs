use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};

use crate::api::types::Status;
use crate::app::App;
use crate::ui::status_card::{StatusCard, status_card_height};

/// Deepest indentation level drawn; anything below is drawn at this level.
const MAX_INDENT_LEVEL: usize = 6;

/// Full conversation view: the subject status at top, every descendant below.
pub struct ThreadView<'a> {
    pub root: Option<&'a Status>,
    pub descendants: &'a [Status],
    pub selected_index: usize,
    pub app: &'a App,
}

impl<'a> ThreadView<'a> {
    pub fn new(root: Option<&'a Status>, descendants: &'a [Status], app: &'a App) -> Self {
        Self {
            root,
            descendants,
            selected_index: app.selected_index(),
            app,
        }
    }
}

/// Reply depth of each descendant below `root_id` (direct replies are 0).
pub fn reply_depths<'s>(root_id: &str, descendants: &'s [Status]) -> Vec<usize> {
    let mut depth_of: HashMap<&'s str, usize> = HashMap::new();
    descendants
        .iter()
        .map(|s| {
            let depth = match s.in_reply_to_id.as_deref() {
                Some(parent) if parent == root_id => 0,
                Some(parent) => depth_of.get(parent).map_or(0, |d| d + 1),
                None => 0,
            };
            depth_of.insert(&s.id, depth);
            depth
        })
        .collect()
}

impl Widget for ThreadView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Thread \u{00B7} {} replies ", self.descendants.len()))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        let content_width = inner.width.saturating_sub(1);
        let mut y = inner.y;

        // Render root status (if available)
        if let Some(root) = self.root {
            let root_h = status_card_height(root, content_width, true);
            let render_h = root_h.min(inner.height);

            if render_h > 0 {
                let root_area = Rect::new(inner.x + 1, y, content_width, render_h);
                StatusCard::new(root).render(root_area, buf);
                y += render_h;
            }

            // Separator
            if y < inner.y + inner.height {
                let sep = "\u{2550}".repeat(content_width as usize);
                buf.set_string(inner.x + 1, y, &sep, Style::default().fg(Color::Cyan));
                y += 1;
            }
        }

        if self.descendants.is_empty() {
            if y < inner.y + inner.height {
                buf.set_string(
                    inner.x + 2,
                    y,
                    "No replies",
                    Style::default().fg(Color::DarkGray),
                );
            }
            return;
        }

        let root_id = self.root.map_or("", |r| r.id.as_str());
        let depths = reply_depths(root_id, self.descendants);
        let widths: Vec<u16> = depths
            .iter()
            .map(|&d| content_width.saturating_sub(2 + 2 * d.min(MAX_INDENT_LEVEL) as u16))
            .collect();
        let heights: Vec<u16> = self
            .descendants
            .iter()
            .zip(&widths)
            .map(|(s, w)| status_card_height(s, *w, false) + 1)
            .collect();

        let available = (inner.y + inner.height).saturating_sub(y);
        let start = compute_scroll_start(&heights, self.selected_index, available);

        for i in start..self.descendants.len() {
            if y >= inner.y + inner.height {
                break;
            }
            let status = &self.descendants[i];
            let indent = 2 * depths[i].min(MAX_INDENT_LEVEL) as u16;
            let remaining = (inner.y + inner.height).saturating_sub(y);
            let render_h = heights[i].saturating_sub(1).min(remaining);

            if render_h > 0 {
                // Thread connector
                buf.set_string(
                    inner.x + 1 + indent,
                    y,
                    "\u{2502}",
                    Style::default().fg(Color::DarkGray),
                );

                // "in reply to" hint for replies to someone other than the root author.
                let parent_account = status
                    .in_reply_to_account_id
                    .as_deref()
                    .filter(|_| depths[i] > 0)
                    .and_then(|id| self.app.lookup_account(id));

                let reply_area = Rect::new(inner.x + 3 + indent, y, widths[i], render_h);
                StatusCard::new(status)
                    .show_metrics(false)
                    .selected(i == self.selected_index)
                    .render(reply_area, buf);

                if let Some(parent) = parent_account {
                    let hint = format!(" \u{21B3} @{}", parent.acct);
                    let x = (reply_area.x + reply_area.width).saturating_sub(hint.chars().count() as u16);
                    buf.set_string(x, y, &hint, Style::default().fg(Color::DarkGray));
                }

                y += render_h + 1;
            }
        }
    }
}

/// Find the smallest scroll start index so that the selected item fits
/// within the available height.
fn compute_scroll_start(heights: &[u16], selected: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }

    let selected = selected.min(heights.len() - 1);
    if available == 0 {
        return selected;
    }

    let mut start = selected;
    let mut used = heights[selected];

    while start > 0 {
        let next = used.saturating_add(heights[start - 1]);
        if next > available {
            break;
        }
        start -= 1;
        used = next;
    }

    start
}
