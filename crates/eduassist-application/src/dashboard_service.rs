//! Data behind the teacher dashboard tabs.
//!
//! Views that re-fetch on filter changes go through a [`ViewSlot`] so a
//! slow earlier response never replaces a newer one.

use chrono::NaiveDate;
use eduassist_core::Result;
use eduassist_core::calendar::{self, CalendarBuckets};
use eduassist_core::roster::{self, StudentSort};
use eduassist_core::session_store::{SessionStore, SessionStoreExt, StorageKey};
use eduassist_core::view::ViewSlot;
use eduassist_interaction::ApiClient;
use eduassist_interaction::endpoints::{
    BulkSendRequest, BulkStudentQuery, CalendarRange, PerformanceFilter, ReportFormat,
    SendReportRequest,
};
use serde_json::{Value, json};
use std::sync::Arc;

pub struct DashboardService {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
    overview: ViewSlot<Value>,
    performance: ViewSlot<Value>,
    calendar: ViewSlot<CalendarBuckets>,
    students: ViewSlot<Vec<Value>>,
}

impl DashboardService {
    pub fn new(client: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            store,
            overview: ViewSlot::new("overview"),
            performance: ViewSlot::new("performance"),
            calendar: ViewSlot::new("calendar"),
            students: ViewSlot::new("students"),
        }
    }

    /// Refreshes the overview. Returns `None` when a newer refresh already
    /// superseded this one.
    pub async fn refresh_overview(&self) -> Result<Option<Value>> {
        let ticket = self.overview.begin();
        let data = self.client.performance_overview().await?;
        Ok(self.overview.apply(ticket, data.clone()).then_some(data))
    }

    pub async fn filter_performance(&self, filter: &PerformanceFilter) -> Result<Option<Value>> {
        let ticket = self.performance.begin();
        let data = self.client.filtered_performance(filter).await?;
        Ok(self.performance.apply(ticket, data.clone()).then_some(data))
    }

    pub async fn load_calendar(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Option<CalendarBuckets>> {
        let ticket = self.calendar.begin();
        let response = self
            .client
            .calendar(&CalendarRange {
                start_date,
                end_date,
            })
            .await?;
        let buckets = calendar::bucket_events(&event_list(&response));
        tracing::debug!("[Dashboard] Calendar has {} busy day(s)", buckets.len());
        Ok(self.calendar.apply(ticket, buckets.clone()).then_some(buckets))
    }

    /// Loads a section roster, remembers the section and applies the
    /// client-side search and sort.
    pub async fn section_students(
        &self,
        section_id: &str,
        query: &str,
        sort: StudentSort,
    ) -> Result<Option<Vec<Value>>> {
        let ticket = self.students.begin();
        self.select_section(section_id)?;
        let response = self.client.section_students(section_id).await?;
        let mut students: Vec<Value> = roster::filter_students(&list_field(&response, "students"), query)
            .into_iter()
            .cloned()
            .collect();
        roster::sort_students(&mut students, sort);
        Ok(self.students.apply(ticket, students.clone()).then_some(students))
    }

    pub async fn sections(&self) -> Result<Value> {
        Ok(self.client.sections().await?)
    }

    pub async fn student_profile(&self, student_id: &str) -> Result<Value> {
        Ok(self.client.student_profile(student_id).await?)
    }

    pub async fn student_performance(&self, student_id: &str) -> Result<Value> {
        Ok(self.client.student_performance(student_id).await?)
    }

    pub fn select_section(&self, section_id: &str) -> Result<()> {
        self.store
            .set(StorageKey::SelectedSectionId, json!(section_id))
    }

    pub fn selected_section(&self) -> Result<Option<String>> {
        self.store.get_string(StorageKey::SelectedSectionId)
    }

    /// Hands a set of students to the bulk communication view.
    pub fn preselect_users(&self, users: &[Value]) -> Result<()> {
        tracing::debug!("[Dashboard] Preselecting {} user(s)", users.len());
        self.store
            .set(StorageKey::PreselectedUsers, Value::Array(users.to_vec()))
    }

    /// Reads and clears the preselection; it is consumed once.
    pub fn take_preselected_users(&self) -> Result<Vec<Value>> {
        let users = self
            .store
            .get_json::<Vec<Value>>(StorageKey::PreselectedUsers)?
            .unwrap_or_default();
        self.store.clear(StorageKey::PreselectedUsers)?;
        Ok(users)
    }

    pub async fn tasks(&self) -> Result<Value> {
        Ok(self.client.tasks().await?)
    }

    pub async fn create_task(&self, task: &Value) -> Result<Value> {
        Ok(self.client.create_task(task).await?)
    }

    pub async fn update_task(&self, task_id: &str, task: &Value) -> Result<Value> {
        Ok(self.client.update_task(task_id, task).await?)
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<()> {
        Ok(self.client.delete_task(task_id).await?)
    }

    pub async fn send_report(&self, request: &SendReportRequest) -> Result<Value> {
        Ok(self.client.send_report(request).await?)
    }

    pub async fn sent_reports(&self) -> Result<Value> {
        Ok(self.client.sent_reports().await?)
    }

    pub async fn download_report(&self, student_id: &str, format: ReportFormat) -> Result<Vec<u8>> {
        Ok(self.client.download_student_report(student_id, format).await?)
    }

    pub async fn communications(&self) -> Result<Value> {
        Ok(self.client.communications().await?)
    }

    pub async fn bulk_sections(&self) -> Result<Value> {
        Ok(self.client.bulk_sections().await?)
    }

    pub async fn bulk_students(&self, query: &BulkStudentQuery) -> Result<Value> {
        Ok(self.client.bulk_students(query).await?)
    }

    pub async fn bulk_templates(&self) -> Result<Value> {
        Ok(self.client.bulk_templates().await?)
    }

    pub async fn bulk_sent(&self) -> Result<Value> {
        Ok(self.client.bulk_sent().await?)
    }

    pub async fn bulk_send(&self, request: &BulkSendRequest) -> Result<Value> {
        Ok(self.client.bulk_send(request).await?)
    }
}

/// Events from a calendar response, which is either a bare array or an
/// object carrying one under `events`.
pub fn event_list(response: &Value) -> Vec<Value> {
    list_field(response, "events")
}

fn list_field(response: &Value, field: &str) -> Vec<Value> {
    match response {
        Value::Array(items) => items.clone(),
        Value::Object(obj) => obj
            .get(field)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_list_shapes() {
        assert_eq!(event_list(&json!([{"id": 1}])), vec![json!({"id": 1})]);
        assert_eq!(
            event_list(&json!({"events": [{"id": 2}], "total": 1})),
            vec![json!({"id": 2})]
        );
        assert!(event_list(&json!({"detail": "none"})).is_empty());
        assert!(event_list(&Value::Null).is_empty());
    }
}
