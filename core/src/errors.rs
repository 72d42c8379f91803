//! User-facing wording for failures.
//!
//! Raw errors go to the log; the UI only ever shows these short, sanitized
//! single-line messages.

use rideready_client::ApiError;
use rideready_types::{single_line, truncate_with_ellipsis};

use crate::storage::StorageError;

/// The one bubble shown when the chat call itself fails.
pub const CHAT_NETWORK_ERROR: &str = "Network error. Please try again.";

const MAX_SERVER_MESSAGE_CHARS: usize = 120;

/// Inline notice for a failed recommendation run.
#[must_use]
pub fn describe_api_error(err: &ApiError) -> String {
    match err {
        ApiError::InvalidBaseUrl { url, .. } => {
            format!("The server address {url:?} is not a valid URL.")
        }
        ApiError::Transport { source, .. } if source.is_timeout() => {
            "The advisor server took too long to respond.".to_string()
        }
        ApiError::Transport { source, .. } if source.is_connect() => {
            "Could not reach the advisor server.".to_string()
        }
        ApiError::Transport { .. } => "The request to the advisor server failed.".to_string(),
        ApiError::Status {
            status, message, ..
        } => {
            let message = truncate_with_ellipsis(&single_line(message), MAX_SERVER_MESSAGE_CHARS);
            format!("Server error ({status}): {message}")
        }
        ApiError::Decode { .. } => "The advisor server sent an unexpected response.".to_string(),
    }
}

#[must_use]
pub fn describe_storage_error(err: &StorageError) -> String {
    match err {
        StorageError::Io { path, .. } => {
            format!("Could not save session to {}; changes may not survive a restart.", path.display())
        }
        StorageError::Encode(_) => "Could not encode session data.".to_string(),
    }
}
