pub mod config;
pub mod controller;
pub mod error;
pub mod labels;
pub mod prompts;
pub mod state;

// Re-export main types for convenience
pub use config::Config;
pub use controller::ChatController;
pub use error::{ConfigError, RequestError};
pub use labels::{Label, LabelsClient};
pub use prompts::{ExamplePrompt, Icon, EXAMPLE_PROMPTS};
pub use state::{
    reduce, ChatMessage, ChatRole, ConversationState, LabelState, ViewEvent, ViewState,
};
