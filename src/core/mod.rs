//! Core Module - infrastructural components
//!
//! - Configuration
//! - Error handling
//! - Application state

pub mod config;
pub mod error;
pub mod state;

// Re-exports to keep imports short
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
