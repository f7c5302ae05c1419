//! Common utilities and shared types for shiftedblog.
//!
//! This crate provides foundational components used across all shiftedblog crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Storage**: Uploaded media storage on the local filesystem
//!
//! # Example
//!
//! ```no_run
//! use shiftedblog_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("Serving {}", config.server.url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use storage::{LocalStorage, StorageBackend, UploadedFile};
