pub mod config_service;
pub mod file_session_store;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::file_session_store::FileSessionStore;
pub use crate::paths::EduPaths;
