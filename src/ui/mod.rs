pub mod conversation;
pub mod page;

pub use page::{window_title, PageChrome};
