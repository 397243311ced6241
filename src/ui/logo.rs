use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

pub const BRAND: &str = "Kronk";

const WORDMARK: [&str; 2] = [
    "\u{2588}\u{2584}\u{2580} \u{2588}\u{2580}\u{2588} \u{2588}\u{2580}\u{2588} \u{2588}\u{2584} \u{2588} \u{2588}\u{2584}\u{2580}",
    "\u{2588} \u{2588} \u{2588}\u{2580}\u{2584} \u{2588}\u{2584}\u{2588} \u{2588} \u{2580}\u{2588} \u{2588} \u{2588}",
];

const ICON: &str = "\u{25C6}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoVariant {
    /// Block-letter brand name for splash screens.
    Wordmark,
    /// Single glyph.
    Icon,
    /// Glyph plus name, sized for the header bar.
    Symbol,
}

pub struct Logo {
    pub variant: LogoVariant,
}

impl Logo {
    pub fn new(variant: LogoVariant) -> Self {
        Self { variant }
    }

    pub fn height(&self) -> u16 {
        match self.variant {
            LogoVariant::Wordmark => WORDMARK.len() as u16,
            LogoVariant::Icon | LogoVariant::Symbol => 1,
        }
    }
}

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let brand_style = Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD);

        match self.variant {
            LogoVariant::Wordmark => {
                for (i, row) in WORDMARK.iter().enumerate().take(area.height as usize) {
                    buf.set_stringn(area.x, area.y + i as u16, row, area.width as usize, brand_style);
                }
            }
            LogoVariant::Icon => {
                buf.set_string(area.x, area.y, ICON, brand_style);
            }
            LogoVariant::Symbol => {
                let line = Line::from(vec![
                    Span::styled(ICON, brand_style),
                    Span::raw(" "),
                    Span::styled(BRAND, brand_style),
                ]);
                buf.set_line(area.x, area.y, &line, area.width);
            }
        }
    }
}
