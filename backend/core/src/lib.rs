pub mod error;
pub mod message;
pub mod prompt;
pub mod transport;

pub use error::ParleyError;
pub use message::{conversation_key, ChatMessage};
pub use prompt::{Prompt, PromptTone};
pub use transport::MessageTransport;
