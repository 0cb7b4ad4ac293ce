//! Typed wrappers over the backend's REST endpoints, one module per area.

pub mod assistant;
pub mod communications;
pub mod educators;
pub mod performance;
pub mod scheduling;
pub mod student_portal;
pub mod students;

pub use assistant::QuickAction;
pub use communications::{BulkSendRequest, BulkStudentQuery};
pub use educators::{LoginRequest, LoginResponse, RegisterRequest};
pub use performance::{PerformanceFilter, ReportFormat, SendReportRequest};
pub use scheduling::CalendarRange;
pub use student_portal::{ContactTeacherRequest, StudentLoginResponse};
