pub mod client;
pub mod error;
pub mod types;

pub use client::OutletApiClient;
pub use error::ClientError;
pub use types::{ChatbotReply, ChatbotRequest};
