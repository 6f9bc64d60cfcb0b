use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io;
use std::panic;
use std::time::Duration;

use crate::config::Config;
use crate::session::Session;
use crate::ui::conversation::{ConversationPanel, PanelAction};
use crate::ui::{window_title, PageChrome};

/// How long the loop sleeps when there is nothing to do
const IDLE_SLEEP: Duration = Duration::from_millis(50);

/// Interactive chat application
pub struct App {
    config: Config,
    panel: ConversationPanel,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let session = Session::new(&config);
        Self {
            config,
            panel: ConversationPanel::new(session),
            should_quit: false,
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.size();
        let bot_name = &self.config.bot.name;
        frame.render_widget(PageChrome::new(&self.config.page, bot_name), area);
        let content = PageChrome::layout(area).content;
        if content.height > 0 {
            frame.render_widget(&self.panel, content);
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press && self.panel.handle_key(key) == PanelAction::Exit {
                self.should_quit = true;
            }
        }
    }
}

/// Raw mode plus the alternate screen. Restores the terminal when dropped,
/// so every early return and unwind leaves the shell usable.
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    fn enter(title: String) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = TerminalGuard {
            restore: restore_terminal,
        };
        execute!(io::stdout(), EnterAlternateScreen, SetTitle(title))
            .context("Failed to enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Restore the terminal before the default hook prints the panic message
fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));
}

/// Set up the terminal, run the chat until the user leaves, then restore it
pub async fn run(config: Config) -> Result<()> {
    install_panic_hook();
    let guard = TerminalGuard::enter(window_title(&config.page))?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout())).context("Failed to create terminal")?;

    let mut app = App::new(config);
    tracing::info!("Chat started");
    let res = run_app(&mut terminal, &mut app).await;
    app.panel.shutdown();

    drop(guard);
    tracing::info!(messages = app.panel.transcript().len(), "Chat ended");
    res
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut needs_redraw = true;

    loop {
        if app.panel.tick() {
            needs_redraw = true;
        }
        if needs_redraw {
            terminal.draw(|frame| app.draw(frame))?;
            needs_redraw = false;
        }

        // Process all available events without blocking
        let mut handled_event = false;
        while event::poll(Duration::from_millis(0))? {
            let event = event::read()?;
            app.handle_event(event);
            handled_event = true;
        }
        if handled_event {
            needs_redraw = true;
        } else {
            tokio::time::sleep(IDLE_SLEEP).await;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_exchange_renders() {
        let mut app = App::new(Config::default());
        for c in "hello".chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
        app.handle_event(key(KeyCode::Enter));

        tokio::time::sleep(Duration::from_millis(2000)).await;
        app.panel.tick();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Chatbot"));
        assert!(screen.contains("Frankenstein Bot is typing"));
        assert!(screen.contains("hello│"));

        tokio::time::sleep(Duration::from_millis(3000)).await;
        app.panel.tick();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Hi, there anggiedimasta"));
        assert!(!screen.contains("is typing"));
    }

    static RESTORES: AtomicUsize = AtomicUsize::new(0);

    fn count_restore() {
        RESTORES.fetch_add(1, Ordering::SeqCst);
    }

    fn fail_after_setup() -> Result<()> {
        let _guard = TerminalGuard {
            restore: count_restore,
        };
        anyhow::bail!("alternate screen unavailable");
    }

    #[test]
    fn test_terminal_restored_on_error_and_panic() {
        let before = RESTORES.load(Ordering::SeqCst);
        assert!(fail_after_setup().is_err());
        assert_eq!(RESTORES.load(Ordering::SeqCst), before + 1);

        let result: std::thread::Result<()> = panic::catch_unwind(|| {
            let _guard = TerminalGuard {
                restore: count_restore,
            };
            panic!("draw failed");
        });
        assert!(result.is_err());
        assert_eq!(RESTORES.load(Ordering::SeqCst), before + 2);
    }

    #[test]
    fn test_escape_quits() {
        let mut app = App::new(Config::default());
        app.handle_event(key(KeyCode::Esc));
        assert!(app.should_quit);
    }
}
