//! Shared infrastructure utilities for RideReady.
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)

pub mod atomic_write;

pub use atomic_write::{WriteOptions, atomic_write, atomic_write_with_options, recover_bak_file};
