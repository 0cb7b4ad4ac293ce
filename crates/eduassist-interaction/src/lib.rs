//! HTTP and WebSocket access to the EduAssist backend.

pub mod auth_guard;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod http_backend;
pub mod performance_feed;

pub use crate::auth_guard::{AuthGuard, AuthScope, RequestKind};
pub use crate::client::ApiClient;
pub use crate::error::ApiError;
pub use crate::http_backend::HttpAssistantBackend;
pub use crate::performance_feed::PerformanceFeed;
