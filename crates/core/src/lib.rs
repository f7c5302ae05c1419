//! Core business logic for shiftedblog.

pub mod services;

pub use services::*;
