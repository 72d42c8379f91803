//! Session state and policy for RideReady.
//!
//! This crate owns everything that outlives a single frame but is not
//! orchestration: the key/value session store and its typed schema,
//! bootstrapping against the backend boot id, the one-time warning gates,
//! the chat transcript, and user-facing error wording.

pub mod errors;
pub mod gate;
pub mod session;
pub mod storage;
mod transcript;

pub use errors::{CHAT_NETWORK_ERROR, describe_api_error, describe_storage_error};
pub use gate::LinkDecision;
pub use session::{Flag, LoadedSession, Session};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use transcript::{ChatEntry, ChatTranscript, MAX_ECHO_CARDS};
