//! Transcript display component

use crate::events::{AuthorRole, Message};
use crate::locale::Locale;
use crate::ui::conversation::TypingIndicator;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Renders the transcript, always anchored to the newest message
pub struct TranscriptView<'a> {
    messages: &'a [Message],
    locale: Locale,
    typing: Option<TypingIndicator<'a>>,
}

impl<'a> TranscriptView<'a> {
    pub fn new(messages: &'a [Message], locale: Locale) -> Self {
        Self {
            messages,
            locale,
            typing: None,
        }
    }

    pub fn with_typing(mut self, typing: Option<TypingIndicator<'a>>) -> Self {
        self.typing = typing;
        self
    }

    /// Every rendered row with its horizontal alignment, oldest first
    fn collect_lines(&self, width: u16) -> Vec<(Line<'static>, Alignment)> {
        let mut all_lines = Vec::new();
        for message in self.messages {
            let alignment = match message.role() {
                AuthorRole::Bot => Alignment::Left,
                AuthorRole::User => Alignment::Right,
            };
            for line in self.render_message(message, width) {
                all_lines.push((line, alignment));
            }
            all_lines.push((Line::from(""), Alignment::Left));
        }

        if let Some(typing) = &self.typing {
            all_lines.push((typing.line(), Alignment::Left));
        }

        all_lines
    }

    /// Render a single message into lines
    fn render_message(&self, message: &Message, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        let role_icon = match message.role() {
            AuthorRole::Bot => "🤖",
            AuthorRole::User => "👤",
        };
        let timestamp = self.locale.format_medium(&message.created_at.naive_local());
        let header = format!("{} {} · {}", role_icon, message.author.name, timestamp);
        let content_width = (width as usize).saturating_sub(2).max(1);
        for header_line in wrap_text(&header, content_width) {
            lines.push(Line::from(vec![Span::styled(
                header_line,
                Style::default().fg(Color::DarkGray),
            )]));
        }

        for content_line in wrap_text(&message.text, content_width) {
            lines.push(Line::from(vec![Span::styled(
                content_line,
                content_style(message.role()),
            )]));
        }

        lines
    }
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL);
        let inner_area = block.inner(area);
        block.render(area, buf);

        if inner_area.width == 0 || inner_area.height == 0 {
            return;
        }

        let all_lines = self.collect_lines(inner_area.width);

        // bottom-anchored: newest rows stay visible
        let height = inner_area.height as usize;
        let start = all_lines.len().saturating_sub(height);
        for (i, (line, alignment)) in all_lines[start..].iter().enumerate() {
            let line_width = (line.width() as u16).min(inner_area.width);
            let x = match alignment {
                Alignment::Right => inner_area.x + inner_area.width - line_width,
                _ => inner_area.x,
            };
            buf.set_line(x, inner_area.y + i as u16, line, inner_area.width - (x - inner_area.x));
        }
    }
}

fn content_style(role: AuthorRole) -> Style {
    match role {
        AuthorRole::User => Style::default().fg(Color::Magenta),
        AuthorRole::Bot => Style::default().fg(Color::White),
    }
}

/// Terminal columns `text` occupies; wide CJK and emoji glyphs take two
fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// Split off the longest prefix of `word` that fits in `width` columns.
/// Always takes at least one char so a glyph wider than the line still moves on.
fn split_at_width(word: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (index, c) in word.char_indices() {
        let mut encoded = [0u8; 4];
        let char_width = display_width(c.encode_utf8(&mut encoded));
        if index > 0 && used + char_width > width {
            return word.split_at(index);
        }
        used += char_width;
    }
    (word, "")
}

/// Word-wrap `text` to `width` columns. Words longer than a line are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word = word;
        let mut word_len = display_width(word);

        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current_line));
            current_len = 0;
        }

        while word_len > width {
            let (head, rest) = split_at_width(word, width);
            word = rest;
            word_len = display_width(word);
            if current_len > 0 {
                lines.push(std::mem::take(&mut current_line));
                current_len = 0;
            }
            lines.push(head.to_string());
        }

        if word_len == 0 {
            continue;
        }
        if current_len > 0 {
            current_line.push(' ');
            current_len += 1;
        }
        current_line.push_str(word);
        current_len += word_len;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        // whitespace-only messages still occupy a row
        lines.push(text.to_string());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::Session;
    use chrono::{Local, TimeZone};

    fn buffer_rows(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf.get(area.x + x, area.y + y).symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("Hi, there anggiedimasta", 10), vec!["Hi, there", "anggiedima", "sta"]);
        assert_eq!(wrap_text("a b c", 80), vec!["a b c"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_text_counts_display_columns() {
        assert_eq!(wrap_text("一二三四五六七八九十", 8), vec!["一二三四", "五六七八", "九十"]);
        assert_eq!(wrap_text("ab 一二三", 5), vec!["ab", "一二", "三"]);
        // a glyph wider than the line still gets its own row
        assert_eq!(wrap_text("一二", 1), vec!["一", "二"]);
        assert_eq!(wrap_text("一二", 3), vec!["一", "二"]);
    }

    #[test]
    fn test_wide_message_is_not_truncated() {
        let session = Session::new(&Config::default());
        let text = "一二三四五六七八九十";
        let messages = vec![Message::new(session.user.clone(), text, Local::now())];

        let area = Rect::new(0, 0, 12, 12);
        let mut buf = Buffer::empty(area);
        TranscriptView::new(&messages, session.locale).render(area, &mut buf);

        let screen = buffer_rows(&buf).join("\n");
        for c in text.chars() {
            assert!(screen.contains(c), "{c} missing from\n{screen}");
        }
    }

    #[test]
    fn test_narrow_header_keeps_timestamp() {
        let session = Session::new(&Config::default());
        let at = Local.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap();
        let messages = vec![Message::new(session.user.clone(), "hello", at)];

        let area = Rect::new(0, 0, 20, 12);
        let mut buf = Buffer::empty(area);
        TranscriptView::new(&messages, session.locale).render(area, &mut buf);

        let rows = buffer_rows(&buf);
        assert!(rows.iter().any(|row| row.contains("anggiedimasta")));
        assert!(rows.iter().any(|row| row.contains("19 Oktober")));
        assert!(rows.iter().any(|row| row.contains("pukul 14.05")));
    }

    #[test]
    fn test_newest_message_is_visible() {
        let session = Session::new(&Config::default());
        let messages: Vec<Message> = (0..20)
            .map(|i| Message::new(session.user.clone(), format!("message {i}"), Local::now()))
            .collect();

        let area = Rect::new(0, 0, 60, 8);
        let mut buf = Buffer::empty(area);
        TranscriptView::new(&messages, session.locale).render(area, &mut buf);

        let rows = buffer_rows(&buf).join("\n");
        assert!(rows.contains("message 19│"));
        assert!(!rows.contains("message 0│"));
    }

    #[test]
    fn test_user_right_bot_left() {
        let session = Session::new(&Config::default());
        let messages = vec![
            Message::new(session.user.clone(), "hello", Local::now()),
            Message::new(session.bot.clone(), "Hi, there anggiedimasta", Local::now()),
        ];

        let area = Rect::new(0, 0, 80, 10);
        let mut buf = Buffer::empty(area);
        TranscriptView::new(&messages, session.locale).render(area, &mut buf);

        let rows = buffer_rows(&buf);
        let user_row = rows.iter().find(|row| row.contains("hello")).unwrap();
        assert!(user_row.ends_with("hello│"));
        assert!(user_row.starts_with("│ "));
        let bot_row = rows.iter().find(|row| row.contains("Hi, there")).unwrap();
        assert!(bot_row.starts_with("│Hi, there"));
    }

    #[test]
    fn test_typing_indicator_row() {
        let session = Session::new(&Config::default());
        let area = Rect::new(0, 0, 60, 6);
        let mut buf = Buffer::empty(area);
        TranscriptView::new(&[], session.locale)
            .with_typing(Some(TypingIndicator::new(&session.bot.name, "..")))
            .render(area, &mut buf);

        assert!(buffer_rows(&buf).join("\n").contains("Frankenstein Bot is typing.."));
    }
}
