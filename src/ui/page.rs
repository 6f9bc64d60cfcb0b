//! Page shell: window metadata and the chrome around the chat card

use crate::config::PageConfig;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Title shown by the terminal emulator
pub fn window_title(page: &PageConfig) -> String {
    format!("{} | {}", page.title, page.description)
}

/// Areas produced by the chrome layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeLayout {
    pub heading: Rect,
    pub card_header: Rect,
    pub content: Rect,
}

/// Page title, subtitle and the bot header; the conversation goes in `content`
pub struct PageChrome<'a> {
    page: &'a PageConfig,
    bot_name: &'a str,
}

impl<'a> PageChrome<'a> {
    pub fn new(page: &'a PageConfig, bot_name: &'a str) -> Self {
        Self { page, bot_name }
    }

    pub fn layout(area: Rect) -> ChromeLayout {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // title + description
                Constraint::Length(3), // bot header
                Constraint::Min(0),    // content slot
            ])
            .split(area);

        ChromeLayout {
            heading: chunks[0],
            card_header: chunks[1],
            content: chunks[2],
        }
    }
}

impl Widget for PageChrome<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = Self::layout(area);

        if layout.heading.height > 0 {
            let title = Line::from(vec![Span::styled(
                self.page.title.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )]);
            buf.set_line(layout.heading.x, layout.heading.y, &title, layout.heading.width);
        }
        if layout.heading.height > 1 {
            let description = Line::from(vec![Span::styled(
                self.page.description.clone(),
                Style::default().fg(Color::Gray),
            )]);
            buf.set_line(layout.heading.x, layout.heading.y + 1, &description, layout.heading.width);
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(layout.card_header);
        block.render(layout.card_header, buf);
        if inner.height > 0 {
            let header = Line::from(vec![
                Span::styled("‹ ", Style::default().fg(Color::Gray)),
                Span::styled("🤖 ", Style::default().bg(Color::Green)),
                Span::raw(" "),
                Span::styled(
                    self.bot_name.to_string(),
                    Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
                ),
            ]);
            buf.set_line(inner.x, inner.y, &header, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_title() {
        assert_eq!(window_title(&PageConfig::default()), "Chatbot | Beep Boop 🤖");
    }

    #[test]
    fn test_layout_leaves_content_slot() {
        let layout = PageChrome::layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.heading.height, 2);
        assert_eq!(layout.card_header.y, 2);
        assert_eq!(layout.content, Rect::new(0, 5, 80, 19));
    }

    #[test]
    fn test_render_title_and_bot_name() {
        let page = PageConfig::default();
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        PageChrome::new(&page, "Frankenstein Bot").render(area, &mut buf);

        let rows: Vec<String> = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf.get(x, y).symbol().to_string()).collect())
            .collect();
        assert!(rows[0].starts_with("Chatbot"));
        assert!(rows[3].contains("Frankenstein Bot"));
    }
}
