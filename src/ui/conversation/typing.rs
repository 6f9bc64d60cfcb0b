use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// "Bot is typing" placeholder shown on the bot's side of the transcript
#[derive(Debug, Clone, Copy)]
pub struct TypingIndicator<'a> {
    bot_name: &'a str,
    dots: &'a str,
}

impl<'a> TypingIndicator<'a> {
    pub fn new(bot_name: &'a str, dots: &'a str) -> Self {
        Self { bot_name, dots }
    }

    pub fn text(&self) -> String {
        format!("{} is typing{}", self.bot_name, self.dots)
    }

    pub fn line(&self) -> Line<'static> {
        Line::from(vec![
            Span::styled("🤖 ", Style::default().fg(Color::Green)),
            Span::styled(
                self.text(),
                Style::default().fg(Color::Green).add_modifier(Modifier::ITALIC),
            ),
        ])
    }
}

impl Widget for TypingIndicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        buf.set_line(area.x, area.y, &self.line(), area.width);
    }
}
