pub mod config;
pub mod error;
pub mod formatter;
pub mod git_ops;
pub mod ui;
pub mod version;

pub use error::{Result, TagScopeError};
