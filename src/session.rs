use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::Config;
use crate::events::{Author, AuthorRole, Message};
use crate::locale::Locale;
use crate::ui::conversation::CommandName;

/// Canned replies keyed by command name. Built once per session.
#[derive(Debug, Clone)]
pub struct BotReplyTable {
    replies: BTreeMap<CommandName, Message>,
}

impl BotReplyTable {
    /// Build the table at `now`; day/date/time texts are frozen at this instant.
    pub fn build(bot: &Arc<Author>, user: &Author, locale: Locale, now: DateTime<Local>) -> Self {
        let at = now.naive_local();
        let mut replies = BTreeMap::new();

        let mut insert = |name: CommandName, text: String| {
            replies.insert(name, Message::new(Arc::clone(bot), text, now));
        };

        insert(CommandName::Hello, format!("Hi, there {}", user.name));
        insert(
            CommandName::Skills,
            "I can say hello and tell you the day, the date and the time.".to_string(),
        );
        insert(CommandName::Day, format!("Today is {}", locale.format_weekday(&at)));
        insert(CommandName::Date, format!("Today's date is {}", locale.format_long_date(&at)));
        insert(CommandName::Time, format!("It is {} right now", locale.format_time(&at)));

        Self { replies }
    }

    pub fn get(&self, name: CommandName) -> Option<&Message> {
        self.replies.get(&name)
    }

    /// Exact lookup by the submitted text
    pub fn lookup(&self, text: &str) -> Option<&Message> {
        crate::ui::conversation::commands::parse_command_name(text).and_then(|name| self.get(name))
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }
}

/// Immutable per-session data: the two authors and the reply table.
#[derive(Debug, Clone)]
pub struct Session {
    pub bot: Arc<Author>,
    pub user: Arc<Author>,
    pub locale: Locale,
    pub replies: Arc<BotReplyTable>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self::new_at(config, Local::now())
    }

    pub fn new_at(config: &Config, now: DateTime<Local>) -> Self {
        let bot = Arc::new(config.bot.to_author(AuthorRole::Bot));
        let user = Arc::new(config.user.to_author(AuthorRole::User));
        let replies = Arc::new(BotReplyTable::build(&bot, &user, config.locale, now));

        tracing::debug!(
            bot = %bot.name,
            user = %user.name,
            locale = %config.locale,
            replies = replies.len(),
            "Session initialised"
        );

        Self {
            bot,
            user,
            locale: config.locale,
            replies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn monday_afternoon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_hello_greets_configured_user() {
        let session = Session::new_at(&Config::default(), monday_afternoon());
        let reply = session.replies.lookup("hello").unwrap();
        assert_eq!(reply.text, "Hi, there anggiedimasta");
        assert_eq!(reply.role(), AuthorRole::Bot);
        assert!(Arc::ptr_eq(&reply.author, &session.bot));
    }

    #[test]
    fn test_time_replies_are_frozen_at_build() {
        let session = Session::new_at(&Config::default(), monday_afternoon());
        assert_eq!(session.replies.lookup("day").unwrap().text, "Today is Senin");
        assert_eq!(
            session.replies.lookup("date").unwrap().text,
            "Today's date is 19 Oktober 2026"
        );
        assert_eq!(session.replies.lookup("time").unwrap().text, "It is 14.05 right now");
    }

    #[test]
    fn test_english_locale_replies() {
        let config = Config {
            locale: Locale::En,
            ..Config::default()
        };
        let session = Session::new_at(&config, monday_afternoon());
        assert_eq!(session.replies.lookup("day").unwrap().text, "Today is Monday");
        assert_eq!(session.replies.lookup("time").unwrap().text, "It is 2:05 PM right now");
    }

    #[test]
    fn test_weather_and_unknown_have_no_reply() {
        let session = Session::new_at(&Config::default(), monday_afternoon());
        assert_eq!(session.replies.len(), 5);
        assert!(session.replies.lookup("weather").is_none());
        assert!(session.replies.lookup("HELLO").is_none());
        assert!(session.replies.lookup("hi").is_none());
    }
}
