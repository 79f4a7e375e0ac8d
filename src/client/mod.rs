//! Listing client: filter state, feed state and the HTTP fetch that joins them.

mod feed;
mod filter;
mod fetch;

pub use feed::*;
pub use filter::*;
pub use fetch::*;

/// Errors surfaced by the listing client.
#[derive(Debug)]
pub enum ClientError {
    /// Transport failure or undecodable body
    Http(reqwest::Error),
    /// The server answered with a failure envelope
    Api { status: u16, message: String },
    /// The body decoded but is not a usable listing
    Decode(String),
    /// Reading or writing persisted filter state failed
    Io(std::io::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "request failed: {}", e),
            ClientError::Api { status, message } => write!(f, "{} ({})", message, status),
            ClientError::Decode(msg) => write!(f, "invalid response: {}", msg),
            ClientError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io(err)
    }
}

impl ClientError {
    /// Message suitable for the feed's error state.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            _ => "Failed to fetch blogs".to_string(),
        }
    }
}
