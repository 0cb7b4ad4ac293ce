//! Application layer for EduAssist.
//!
//! Use cases and services that coordinate the conversation core, the
//! session store and the backend client.

pub mod app_context;
pub mod assistant_usecase;
pub mod auth_service;
pub mod chat_service;
pub mod dashboard_service;
pub mod student_portal;

pub use app_context::AppContext;
pub use assistant_usecase::{AssistantReply, AssistantUseCase};
pub use auth_service::AuthService;
pub use chat_service::{EnhancedAssistantService, SimpleChatService};
pub use dashboard_service::DashboardService;
pub use student_portal::{StudentPortal, StudentTab};
