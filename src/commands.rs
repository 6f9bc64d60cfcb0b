use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use strum::IntoEnumIterator;

use crate::config::Config;
use crate::dispatcher::{MessageDispatcher, SubmitOutcome, REPLY_DELAY};
use crate::events::Message;
use crate::session::Session;
use crate::ui::conversation::CommandName;
use crate::ui::conversation::TypingIndicator;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Serialize)]
struct ReplyEntry<'a> {
    command: &'static str,
    description: &'static str,
    reply: Option<&'a str>,
}

/// Print the quick-reply options and their canned answers
pub fn list_replies(config: &Config, json: bool, out: &mut impl Write) -> Result<()> {
    let session = Session::new(config);
    let entries: Vec<ReplyEntry> = CommandName::iter()
        .map(|command| ReplyEntry {
            command: command.keyword(),
            description: command.description(),
            reply: session.replies.get(command).map(|message| message.text.as_str()),
        })
        .collect();

    if json {
        serde_json::to_writer_pretty(&mut *out, &entries).context("Failed to serialize replies")?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "💬 {} answers:", session.bot.name)?;
    writeln!(out, "{}", "=".repeat(50))?;
    for entry in entries {
        match entry.reply {
            Some(reply) => writeln!(out, "  {:<8} → {}", entry.command, reply)?,
            None => writeln!(out, "  {:<8} (no reply)", entry.command)?,
        }
    }
    Ok(())
}

fn format_message(session: &Session, message: &Message) -> String {
    format!(
        "[{}] {}: {}",
        session.locale.format_medium(&message.created_at.naive_local()),
        message.author.name,
        message.text
    )
}

/// Run one exchange without the TUI and print the transcript as it grows
pub async fn say(config: &Config, text: &str, out: &mut impl Write) -> Result<()> {
    let session = Session::new(config);
    let mut dispatcher = MessageDispatcher::new(session.clone());

    match dispatcher.submit(text) {
        SubmitOutcome::Ignored => {
            writeln!(out, "Nothing to send.")?;
            return Ok(());
        }
        SubmitOutcome::Recorded | SubmitOutcome::ReplyScheduled => {}
    }

    let mut printed = 0;
    let mut was_typing = false;
    // bounded so a lost timer can't hang the command
    let deadline = tokio::time::Instant::now() + REPLY_DELAY * 2;

    loop {
        dispatcher.process_events();
        for message in &dispatcher.transcript()[printed..] {
            writeln!(out, "{}", format_message(&session, message))?;
        }
        printed = dispatcher.transcript().len();

        if dispatcher.is_typing() && !was_typing {
            writeln!(out, "{}", TypingIndicator::new(&session.bot.name, "...").text())?;
        }
        was_typing = dispatcher.is_typing();

        if dispatcher.pending_replies() == 0 {
            break;
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!("Gave up waiting for the bot reply");
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    Ok(())
}

/// Print the effective config, or write the defaults to `path` when `init` is set
pub fn show_config(config: &Config, init: bool, path: &Path, out: &mut impl Write) -> Result<()> {
    if init {
        if path.exists() {
            writeln!(out, "❌ {} already exists.", path.display())?;
            return Ok(());
        }
        Config::default().save(path)?;
        writeln!(out, "✅ Wrote default config to {}", path.display())?;
        return Ok(());
    }

    writeln!(out, "# {}", path.display())?;
    write!(out, "{}", config.to_toml_string()?)?;
    Ok(())
}
