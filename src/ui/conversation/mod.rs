//! Conversation UI components for the chat panel

pub mod commands;
pub mod composer;
pub mod history;
pub mod manager;
pub mod typing;

pub use commands::CommandName;
pub use composer::{ComposerResult, ConversationComposer};
pub use history::TranscriptView;
pub use manager::{ConversationPanel, PanelAction};
pub use typing::TypingIndicator;
