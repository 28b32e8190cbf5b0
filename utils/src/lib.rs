//! Shared infrastructure utilities for Tally.
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename), used for
//!   the player roster and the config file.

pub mod atomic_write;

pub use atomic_write::{
    AtomicWriteOptions, FileSyncPolicy, atomic_write, atomic_write_with_options, recover_bak_file,
};
