pub mod get;
pub mod post;

pub use get::{get_chat_recipients, get_conversation_with};
pub use post::post_message;

pub const MAX_MESSAGE_LENGTH: usize = 2000;
