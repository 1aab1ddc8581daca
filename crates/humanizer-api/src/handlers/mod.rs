pub mod health;
pub mod humanize;
pub mod humanize_file;
pub mod upload;
