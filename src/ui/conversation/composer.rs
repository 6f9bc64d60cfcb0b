use crate::ui::conversation::commands::{quick_reply_options, CommandName};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Widget},
};

const PLACEHOLDER: &str = "Write a message...";

/// Result returned when the user interacts with the composer
#[derive(Debug, PartialEq, Eq)]
pub enum ComposerResult {
    /// The form was submitted with this exact text (possibly empty)
    Submitted(String),
    /// The user asked to leave
    Exit,
    None,
}

/// State for the single-line input field
#[derive(Debug, Clone, Default)]
pub struct TextAreaState {
    pub content: String,
    /// Byte offset, always on a char boundary
    pub cursor_position: usize,
}

impl TextAreaState {
    fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
    }

    fn backspace(&mut self) -> bool {
        let Some(prev) = self.content[..self.cursor_position].chars().next_back() else {
            return false;
        };
        self.cursor_position -= prev.len_utf8();
        self.content.remove(self.cursor_position);
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor_position < self.content.len() {
            self.content.remove(self.cursor_position);
            true
        } else {
            false
        }
    }

    fn move_left(&mut self) {
        if let Some(prev) = self.content[..self.cursor_position].chars().next_back() {
            self.cursor_position -= prev.len_utf8();
        }
    }

    fn move_right(&mut self) {
        if let Some(next) = self.content[self.cursor_position..].chars().next() {
            self.cursor_position += next.len_utf8();
        }
    }

    fn set(&mut self, content: &str) {
        self.content = content.to_string();
        self.cursor_position = self.content.len();
    }

    fn take(&mut self) -> String {
        self.cursor_position = 0;
        std::mem::take(&mut self.content)
    }
}

/// Input form plus the quick-reply buttons above it
#[derive(Debug, Clone)]
pub struct ConversationComposer {
    state: TextAreaState,
    options: Vec<CommandName>,
    selected_option: Option<usize>,
}

impl Default for ConversationComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationComposer {
    pub fn new() -> Self {
        Self {
            state: TextAreaState::default(),
            options: quick_reply_options(),
            selected_option: None,
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }

        match key.code {
            KeyCode::Esc => return ComposerResult::Exit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return ComposerResult::Exit;
            }
            KeyCode::Enter => {
                self.selected_option = None;
                return ComposerResult::Submitted(self.state.take());
            }
            KeyCode::Tab => self.cycle_option(1),
            KeyCode::BackTab => self.cycle_option(-1),
            KeyCode::Char(c) => self.state.insert_char(c),
            KeyCode::Backspace => {
                self.state.backspace();
            }
            KeyCode::Delete => {
                self.state.delete();
            }
            KeyCode::Left => self.state.move_left(),
            KeyCode::Right => self.state.move_right(),
            KeyCode::Home => self.state.cursor_position = 0,
            KeyCode::End => self.state.cursor_position = self.state.content.len(),
            _ => {}
        }

        ComposerResult::None
    }

    fn cycle_option(&mut self, delta: isize) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len() as isize;
        let next = match self.selected_option {
            Some(current) => (current as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.choose_option(next as usize);
    }

    /// Stage a quick-reply option in the input field. Never submits.
    pub fn choose_option(&mut self, index: usize) {
        let Some(option) = self.options.get(index) else {
            return;
        };
        self.selected_option = Some(index);
        self.state.set(option.keyword());
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    /// Get current content
    pub fn content(&self) -> &str {
        &self.state.content
    }

    pub fn quick_replies(&self) -> QuickReplyBar<'_> {
        QuickReplyBar {
            options: &self.options,
            selected: self.selected_option,
        }
    }
}

impl Widget for &ConversationComposer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Title::from(" Sent ⏎ ").alignment(Alignment::Right))
            .style(Style::default().fg(Color::Magenta));

        let inner_area = block.inner(area);
        block.render(area, buf);
        if inner_area.width == 0 || inner_area.height == 0 {
            return;
        }

        let line = if self.state.content.is_empty() {
            Line::from(vec![Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))])
        } else {
            let mut content = self.state.content.clone();
            content.insert(self.state.cursor_position.min(content.len()), '▌');
            Line::from(vec![Span::styled(content, Style::default().fg(Color::White))])
        };
        buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
    }
}

/// Row of quick-reply buttons, one per command name
pub struct QuickReplyBar<'a> {
    options: &'a [CommandName],
    selected: Option<usize>,
}

impl Widget for QuickReplyBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut spans = vec![Span::styled("Tab ▸ ", Style::default().fg(Color::DarkGray))];
        for (index, option) in self.options.iter().enumerate() {
            let style = if self.selected == Some(index) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
            };
            spans.push(Span::styled(format!("( {} )", option.keyword()), style));
            spans.push(Span::raw(" "));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
