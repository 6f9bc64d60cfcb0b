//! Message dispatch: records user lines and schedules simulated bot replies.
//!
//! Each matching submission spawns one reply task. The task only reports
//! progress over a channel; the transcript is mutated solely by the owner
//! of [`MessageDispatcher`] when it drains those events.

use chrono::Local;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::events::{DispatchEvent, Message};
use crate::session::Session;

/// Delay between the trigger and the typing indicator appearing
pub const TYPING_START_DELAY: Duration = Duration::from_millis(1500);
/// Delay between the trigger and the reply being appended
pub const REPLY_DELAY: Duration = Duration::from_millis(4500);
/// Period of the typing dots animation
pub const DOTS_INTERVAL: Duration = Duration::from_millis(750);

/// Longest dots string before the animation wraps back to empty
const MAX_DOTS: usize = 2;

/// Observable dispatcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    AwaitingBotTyping,
    BotTyping,
}

/// Result of submitting a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input, nothing recorded
    Ignored,
    /// Recorded as a user message, no reply will follow
    Recorded,
    /// Recorded and a bot reply is scheduled
    ReplyScheduled,
}

/// Advance the typing dots one step
pub fn next_dots(dots: &str) -> String {
    if dots.len() > MAX_DOTS {
        String::new()
    } else {
        format!("{dots}.")
    }
}

/// Owns a scheduled reply task and aborts it when dropped.
#[derive(Debug)]
struct ReplyTimer {
    id: u64,
    handle: JoinHandle<()>,
    typing: bool,
}

impl Drop for ReplyTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Conversation state plus the pending reply timers.
pub struct MessageDispatcher {
    session: Session,
    transcript: Vec<Message>,
    pending: Vec<ReplyTimer>,
    dots: String,
    next_id: u64,
    event_tx: mpsc::UnboundedSender<(u64, DispatchEvent)>,
    event_rx: mpsc::UnboundedReceiver<(u64, DispatchEvent)>,
}

impl MessageDispatcher {
    pub fn new(session: Session) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            session,
            transcript: Vec::new(),
            pending: Vec::new(),
            dots: String::new(),
            next_id: 0,
            event_tx,
            event_rx,
        }
    }

    /// Record a submitted line and schedule the bot's answer if it is a known command.
    ///
    /// Must be called from within a tokio runtime when the text matches a command.
    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        if text.is_empty() {
            tracing::debug!("Ignoring empty submission");
            return SubmitOutcome::Ignored;
        }

        let message = Message::new(self.session.user.clone(), text, Local::now());
        self.transcript.push(message);

        let Some(reply) = self.session.replies.lookup(text).cloned() else {
            tracing::debug!(text, "No canned reply for submission");
            return SubmitOutcome::Recorded;
        };

        let id = self.next_id;
        self.next_id += 1;
        let handle = tokio::spawn(run_reply_timer(id, reply, Instant::now(), self.event_tx.clone()));
        self.pending.push(ReplyTimer {
            id,
            handle,
            typing: false,
        });

        tracing::info!(text, id, "Scheduled bot reply");
        SubmitOutcome::ReplyScheduled
    }

    /// Drain reply progress without blocking. Returns true if anything changed.
    pub fn process_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok((id, event)) = self.event_rx.try_recv() {
            changed = true;
            self.apply(id, event);
        }
        changed
    }

    fn apply(&mut self, id: u64, event: DispatchEvent) {
        let Some(index) = self.pending.iter().position(|timer| timer.id == id) else {
            // the timer was cancelled after the event was queued
            return;
        };

        match event {
            DispatchEvent::TypingStarted => {
                // a later trigger joins the animation already on screen
                if !self.is_typing() {
                    self.dots.clear();
                }
                self.pending[index].typing = true;
            }
            DispatchEvent::Dots(dots) => {
                if self.animating_timer() == Some(index) {
                    self.dots = dots;
                }
            }
            DispatchEvent::Reply(message) => {
                // completed timers drop here; the task has already returned
                self.pending.remove(index);
                tracing::info!(id, text = %message.text, "Bot replied");
                self.transcript.push(message);
                if !self.is_typing() {
                    self.dots.clear();
                }
            }
        }
    }

    /// The oldest typing timer drives the dots; the others stay silent.
    fn animating_timer(&self) -> Option<usize> {
        self.pending.iter().position(|timer| timer.typing)
    }

    /// Abort every scheduled reply. The transcript is kept.
    pub fn cancel_pending(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(count = self.pending.len(), "Cancelling pending replies");
        }
        self.pending.clear();
        self.dots.clear();
        while self.event_rx.try_recv().is_ok() {}
    }

    pub fn state(&self) -> DispatchState {
        if self.is_typing() {
            DispatchState::BotTyping
        } else if self.pending.is_empty() {
            DispatchState::Idle
        } else {
            DispatchState::AwaitingBotTyping
        }
    }

    pub fn is_typing(&self) -> bool {
        self.pending.iter().any(|timer| timer.typing)
    }

    /// Current typing placeholder dots
    pub fn dots(&self) -> &str {
        &self.dots
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }
}

/// The timeline of one reply, measured from `triggered_at`.
async fn run_reply_timer(
    id: u64,
    reply: Message,
    triggered_at: Instant,
    tx: mpsc::UnboundedSender<(u64, DispatchEvent)>,
) {
    time::sleep_until(triggered_at + TYPING_START_DELAY).await;
    if tx.send((id, DispatchEvent::TypingStarted)).is_err() {
        return;
    }

    let reply_at = triggered_at + REPLY_DELAY;
    let mut dots_timer = time::interval_at(Instant::now() + DOTS_INTERVAL, DOTS_INTERVAL);
    dots_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut dots = String::new();

    loop {
        tokio::select! {
            biased;
            _ = time::sleep_until(reply_at) => break,
            _ = dots_timer.tick() => {
                dots = next_dots(&dots);
                if tx.send((id, DispatchEvent::Dots(dots.clone()))).is_err() {
                    return;
                }
            }
        }
    }

    drop(dots_timer);
    let _ = tx.send((id, DispatchEvent::Reply(reply)));
}
