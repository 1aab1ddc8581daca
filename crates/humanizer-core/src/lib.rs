//! Humanizer Core Library
//!
//! This crate provides the domain models, error types and configuration shared by
//! every Humanizer component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    HumanizeFileRequest, HumanizeParameters, HumanizeRequest, HumanizeResult, LengthOption,
    SimilarityOption, SourceMode, SourceText, StyleOption, TransferMode, UploadResponse,
};
