//! Humanizer Services
//!
//! The rewriting backends behind the `Humanizer` trait (the OpenAI chat completions
//! client and a local mock), the prompt assembler they share, and the background
//! upload cleanup service.

pub mod cleanup;
pub mod humanizer;
pub mod mock;
pub mod openai;
pub mod prompt;

pub use cleanup::CleanupService;
pub use humanizer::{HumanizeError, Humanizer};
pub use mock::MockHumanizer;
pub use openai::{OpenAiConfig, OpenAiHumanizer};
