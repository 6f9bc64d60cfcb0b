use std::str::FromStr;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Trigger words offered as quick replies and used as reply-table keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum CommandName {
    /// Greet the user
    Hello,
    /// Describe what the bot can do
    Skills,
    /// Today's weekday
    Day,
    /// Today's date
    Date,
    /// The current time
    Time,
    /// Offered as an option but never answered
    Weather,
}

impl CommandName {
    /// The literal text that triggers this command.
    pub fn keyword(self) -> &'static str {
        self.into()
    }

    /// User-visible description shown by `frankenbot replies`.
    pub fn description(self) -> &'static str {
        match self {
            CommandName::Hello => "greet the user",
            CommandName::Skills => "list what the bot can do",
            CommandName::Day => "tell today's weekday",
            CommandName::Date => "tell today's date",
            CommandName::Time => "tell the current time",
            CommandName::Weather => "no reply (not answered by the bot)",
        }
    }
}

/// Quick-reply options in display order
pub fn quick_reply_options() -> Vec<CommandName> {
    CommandName::iter().collect()
}

/// Exact lookup of a submitted line. No trimming, no case folding.
pub fn parse_command_name(input: &str) -> Option<CommandName> {
    let command = CommandName::from_str(input).ok()?;
    // strum may accept aliases; only the canonical keyword counts
    (command.keyword() == input).then_some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_reply_order() {
        let keywords: Vec<_> = quick_reply_options().into_iter().map(CommandName::keyword).collect();
        assert_eq!(keywords, vec!["hello", "skills", "day", "date", "time", "weather"]);
    }

    #[test]
    fn test_exact_match_only() {
        assert_eq!(parse_command_name("hello"), Some(CommandName::Hello));
        assert_eq!(parse_command_name("weather"), Some(CommandName::Weather));
        assert_eq!(parse_command_name("Hello"), None);
        assert_eq!(parse_command_name("hello "), None);
        assert_eq!(parse_command_name(" hello"), None);
        assert_eq!(parse_command_name("hel"), None);
        assert_eq!(parse_command_name(""), None);
    }
}
