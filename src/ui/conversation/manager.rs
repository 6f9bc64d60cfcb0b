use crate::dispatcher::{DispatchState, MessageDispatcher, SubmitOutcome};
use crate::events::Message;
use crate::session::Session;
use crate::ui::conversation::{ComposerResult, ConversationComposer, TranscriptView, TypingIndicator};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Widget,
};

/// Actions the panel asks the application to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    None,
    Exit,
}

/// Owns the transcript (through the dispatcher) and the input form
pub struct ConversationPanel {
    dispatcher: MessageDispatcher,
    composer: ConversationComposer,
}

impl ConversationPanel {
    pub fn new(session: Session) -> Self {
        Self {
            dispatcher: MessageDispatcher::new(session),
            composer: ConversationComposer::new(),
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> PanelAction {
        match self.composer.handle_key(key) {
            ComposerResult::Submitted(text) => {
                self.submit(&text);
                PanelAction::None
            }
            ComposerResult::Exit => PanelAction::Exit,
            ComposerResult::None => PanelAction::None,
        }
    }

    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        self.dispatcher.submit(text)
    }

    /// Apply reply progress (called from the main loop). Returns true if a redraw is due.
    pub fn tick(&mut self) -> bool {
        self.dispatcher.process_events()
    }

    /// Stage a quick-reply option by index, as a click on its button would
    pub fn choose_quick_reply(&mut self, index: usize) {
        self.composer.choose_option(index);
    }

    /// Abort pending replies before the panel goes away
    pub fn shutdown(&mut self) {
        self.dispatcher.cancel_pending();
    }

    pub fn transcript(&self) -> &[Message] {
        self.dispatcher.transcript()
    }

    pub fn state(&self) -> DispatchState {
        self.dispatcher.state()
    }

    pub fn composer(&self) -> &ConversationComposer {
        &self.composer
    }
}

impl Widget for &ConversationPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // transcript
                Constraint::Length(1), // quick replies
                Constraint::Length(3), // input form
            ])
            .split(area);

        let session = self.dispatcher.session();
        let typing = self
            .dispatcher
            .is_typing()
            .then(|| TypingIndicator::new(&session.bot.name, self.dispatcher.dots()));

        TranscriptView::new(self.dispatcher.transcript(), session.locale)
            .with_typing(typing)
            .render(chunks[0], buf);
        self.composer.quick_replies().render(chunks[1], buf);
        self.composer.render(chunks[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::events::AuthorRole;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::Duration;

    fn panel() -> ConversationPanel {
        ConversationPanel::new(Session::new(&Config::default()))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_reply_never_touches_transcript() {
        let mut panel = panel();
        for _ in 0..10 {
            panel.handle_key(press(KeyCode::Tab));
        }
        panel.choose_quick_reply(0);
        tokio::time::sleep(Duration::from_secs(10)).await;
        panel.tick();
        assert!(panel.transcript().is_empty());
        assert_eq!(panel.composer().content(), "hello");
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_reply_then_enter_gets_reply() {
        let mut panel = panel();
        panel.choose_quick_reply(0);
        panel.handle_key(press(KeyCode::Enter));
        assert_eq!(panel.transcript().len(), 1);
        assert_eq!(panel.composer().content(), "");

        tokio::time::sleep(Duration::from_millis(4600)).await;
        assert!(panel.tick());
        let last = panel.transcript().last().unwrap();
        assert_eq!(last.role(), AuthorRole::Bot);
        assert_eq!(last.text, "Hi, there anggiedimasta");
    }

    #[tokio::test(start_paused = true)]
    async fn test_weather_quick_reply_is_dead() {
        let mut panel = panel();
        panel.choose_quick_reply(5);
        assert_eq!(panel.composer().content(), "weather");
        panel.handle_key(press(KeyCode::Enter));

        tokio::time::sleep(Duration::from_secs(30)).await;
        panel.tick();
        assert_eq!(panel.transcript().len(), 1);
        assert_eq!(panel.state(), DispatchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_enter_is_noop() {
        let mut panel = panel();
        assert_eq!(panel.handle_key(press(KeyCode::Enter)), PanelAction::None);
        assert!(panel.transcript().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_reply() {
        let mut panel = panel();
        panel.submit("skills");
        panel.shutdown();
        tokio::time::sleep(Duration::from_secs(10)).await;
        panel.tick();
        assert_eq!(panel.transcript().len(), 1);
    }

    #[test]
    fn test_render_shows_form_and_options() {
        let panel = panel();
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        (&panel).render(area, &mut buf);

        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf.get(x, y).symbol().to_string())
            .collect();
        assert!(text.contains("Write a message..."));
        assert!(text.contains("( weather )"));
        assert!(text.contains("Sent"));
    }
}
