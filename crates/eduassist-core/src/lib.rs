pub mod assistant;
pub mod backend;
pub mod calendar;
pub mod config;
pub mod conversation;
pub mod error;
pub mod notify;
pub mod performance;
pub mod phrase;
pub mod roster;
pub mod routes;
pub mod session_store;
pub mod view;

// Re-export common error type
pub use error::{EduError, Result};
