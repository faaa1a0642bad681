pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod message;
pub mod session;
pub mod verdict;

// Re-export main types for convenience
pub use chat::Chat;
pub use config::Config;
pub use error::{ClassifyError, SessionError};
pub use gateway::{Classification, Classifier, SentimentClient};
pub use message::{Message, MessageBody, Role};
pub use session::{Session, SubmitOutcome};
pub use verdict::{Verdict, POSITIVE_LABEL};
