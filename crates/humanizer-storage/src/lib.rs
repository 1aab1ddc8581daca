//! Humanizer Storage Library
//!
//! Transient local storage for uploaded documents. Files are written once under
//! `{epoch_ms}_{filename}` inside a single directory and removed by age-based cleanup
//! or explicitly after processing.

pub mod error;
pub mod local;

pub use error::{StorageError, StorageResult};
pub use local::{CleanupReport, FileStore};
