pub mod app;
pub mod commit;
pub mod config;
pub mod error;
pub mod gemini;
pub mod git;
pub mod output;
pub mod profiling;

// Re-exports
pub use error::{Error, Result, Stage};
pub use profiling::Profile;
