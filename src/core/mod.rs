//! Core framework components

pub mod error;

pub use error::{Result, TtsError};
