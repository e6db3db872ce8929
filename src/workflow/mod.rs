//! Meeting-completed workflow pipeline.
//!
//! A fixed linear sequence: generate summary, email it to attendees,
//! optionally create a follow-up task, notify attendees. There is no
//! branching beyond the per-action conditions and no rollback: a failed
//! action is logged and recorded in the result list, and the remaining
//! actions still run.

mod relay;

pub use relay::*;

use std::sync::Arc;

use serde::Serialize;

use crate::db::Repository;
use crate::models::{CalendarEvent, CreateTaskRequest, TaskStatus};

/// Outcome of one pipeline action.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Completed,
    Skipped,
    Failed,
}

/// Per-action result entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub action: &'static str,
    pub status: ActionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ActionResult {
    fn completed(action: &'static str, detail: Option<String>) -> Self {
        Self {
            action,
            status: ActionStatus::Completed,
            detail,
        }
    }

    fn skipped(action: &'static str, reason: &str) -> Self {
        Self {
            action,
            status: ActionStatus::Skipped,
            detail: Some(reason.to_string()),
        }
    }

    fn failed(action: &'static str, error: impl std::fmt::Display) -> Self {
        Self {
            action,
            status: ActionStatus::Failed,
            detail: Some(error.to_string()),
        }
    }
}

/// Runs the meeting-completed pipeline against the relay seams.
pub struct WorkflowEngine {
    summarizer: Arc<dyn Summarizer>,
    mailer: Arc<dyn Mailer>,
}

impl WorkflowEngine {
    pub fn new(summarizer: Arc<dyn Summarizer>, mailer: Arc<dyn Mailer>) -> Self {
        Self { summarizer, mailer }
    }

    /// Run the full pipeline for a completed meeting.
    pub async fn run_meeting_completed(
        &self,
        repo: &Repository,
        event: &CalendarEvent,
        create_follow_up_task: bool,
    ) -> Vec<ActionResult> {
        let mut results = Vec::with_capacity(4);
        let has_notes = event.notes.as_deref().is_some_and(|n| !n.trim().is_empty());
        let has_attendees = !event.attendees.is_empty();

        // 1. Generate summary
        let mut summary: Option<String> = None;
        if has_notes {
            let notes = event.notes.as_deref().unwrap_or_default();
            match self.summarizer.summarize(&event.title, notes).await {
                Ok(text) => {
                    summary = Some(text);
                    results.push(ActionResult::completed("generate_summary", None));
                }
                Err(e) => {
                    tracing::warn!(event_id = %event.id, "Summary generation failed: {}", e);
                    results.push(ActionResult::failed("generate_summary", e));
                }
            }
        } else {
            results.push(ActionResult::skipped("generate_summary", "Event has no notes"));
        }

        // 2. Email summary to attendees
        if has_attendees {
            let body = summary
                .clone()
                .or_else(|| event.notes.clone())
                .unwrap_or_else(|| format!("Meeting '{}' was completed.", event.title));
            let subject = format!("Summary: {}", event.title);
            match self.mailer.send(&event.attendees, &subject, &body).await {
                Ok(()) => results.push(ActionResult::completed(
                    "send_summary_email",
                    Some(format!("Sent to {} attendees", event.attendees.len())),
                )),
                Err(e) => {
                    tracing::warn!(event_id = %event.id, "Summary email failed: {}", e);
                    results.push(ActionResult::failed("send_summary_email", e));
                }
            }
        } else {
            results.push(ActionResult::skipped("send_summary_email", "Event has no attendees"));
        }

        // 3. Create follow-up task
        if create_follow_up_task {
            let request = CreateTaskRequest {
                title: format!("Follow up: {}", event.title),
                description: summary.clone(),
                assigned_to: Some(event.created_by.clone()),
                due_date: None,
                status: TaskStatus::Todo,
                created_by: event.created_by.clone(),
            };
            match repo.create_task(&request).await {
                Ok(task) => results.push(ActionResult::completed(
                    "create_follow_up_task",
                    Some(task.id),
                )),
                Err(e) => {
                    tracing::warn!(event_id = %event.id, "Follow-up task creation failed: {}", e);
                    results.push(ActionResult::failed("create_follow_up_task", e));
                }
            }
        } else {
            results.push(ActionResult::skipped("create_follow_up_task", "Not requested"));
        }

        // 4. Notify attendees
        if has_attendees {
            let mut notified = 0usize;
            let mut last_error = None;
            for attendee in &event.attendees {
                let body = format!("The meeting '{}' on {} was completed.", event.title, event.date);
                match repo
                    .create_notification(attendee, "Meeting completed", &body)
                    .await
                {
                    Ok(_) => notified += 1,
                    Err(e) => {
                        tracing::warn!(event_id = %event.id, attendee, "Notification failed: {}", e);
                        last_error = Some(e);
                    }
                }
            }
            match last_error {
                None => results.push(ActionResult::completed(
                    "notify_attendees",
                    Some(format!("Notified {} attendees", notified)),
                )),
                Some(e) => results.push(ActionResult::failed("notify_attendees", e)),
            }
        } else {
            results.push(ActionResult::skipped("notify_attendees", "Event has no attendees"));
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::errors::AppError;
    use crate::models::CreateEventRequest;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct StubSummarizer {
        fail: bool,
    }

    #[async_trait]
    impl Summarizer for StubSummarizer {
        async fn summarize(&self, _title: &str, notes: &str) -> Result<String, AppError> {
            if self.fail {
                Err(AppError::Upstream("summary service down".to_string()))
            } else {
                Ok(format!("Summary of: {}", notes))
            }
        }
    }

    struct StubMailer;

    #[async_trait]
    impl Mailer for StubMailer {
        async fn send(&self, _to: &[String], _subject: &str, _body: &str) -> Result<(), AppError> {
            Ok(())
        }
    }

    async fn fixture(fail_summary: bool) -> (TempDir, Repository, WorkflowEngine) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .unwrap();
        let repo = Repository::new(pool);
        let engine = WorkflowEngine::new(
            Arc::new(StubSummarizer { fail: fail_summary }),
            Arc::new(StubMailer),
        );
        (temp_dir, repo, engine)
    }

    async fn meeting(repo: &Repository, notes: Option<&str>, attendees: Vec<&str>) -> CalendarEvent {
        repo.create_event(&CreateEventRequest {
            title: "Sprint review".to_string(),
            date: "2024-06-05".to_string(),
            start_time: Some("10:00".to_string()),
            end_time: Some("11:00".to_string()),
            event_type: "meeting".to_string(),
            attendees: attendees.into_iter().map(|s| s.to_string()).collect(),
            notes: notes.map(|s| s.to_string()),
            created_by: "admin@example.com".to_string(),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn full_pipeline_with_notes_and_attendees() {
        let (_dir, repo, engine) = fixture(false).await;
        let event = meeting(&repo, Some("Decided on Q3 roadmap"), vec!["a@example.com"]).await;

        let results = engine.run_meeting_completed(&repo, &event, true).await;
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.status == ActionStatus::Completed));

        let tasks = repo.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Follow up: Sprint review");

        let notifications = repo
            .list_notifications(&Default::default())
            .await
            .unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].recipient, "a@example.com");
    }

    #[tokio::test]
    async fn no_notes_skips_summary_but_runs_rest() {
        let (_dir, repo, engine) = fixture(false).await;
        let event = meeting(&repo, None, vec!["a@example.com"]).await;

        let results = engine.run_meeting_completed(&repo, &event, false).await;
        assert_eq!(results[0].action, "generate_summary");
        assert_eq!(results[0].status, ActionStatus::Skipped);
        assert_eq!(results[1].status, ActionStatus::Completed);
        assert_eq!(results[3].status, ActionStatus::Completed);
    }

    #[tokio::test]
    async fn summary_failure_does_not_halt_pipeline() {
        let (_dir, repo, engine) = fixture(true).await;
        let event = meeting(&repo, Some("notes"), vec!["a@example.com", "b@example.com"]).await;

        let results = engine.run_meeting_completed(&repo, &event, true).await;
        assert_eq!(results[0].status, ActionStatus::Failed);
        // Later actions still run
        assert_eq!(results[1].status, ActionStatus::Completed);
        assert_eq!(results[2].status, ActionStatus::Completed);
        assert_eq!(results[3].status, ActionStatus::Completed);

        let notifications = repo
            .list_notifications(&Default::default())
            .await
            .unwrap();
        assert_eq!(notifications.len(), 2);
    }

    #[tokio::test]
    async fn no_attendees_skips_email_and_notify() {
        let (_dir, repo, engine) = fixture(false).await;
        let event = meeting(&repo, Some("notes"), vec![]).await;

        let results = engine.run_meeting_completed(&repo, &event, false).await;
        assert_eq!(results[1].status, ActionStatus::Skipped);
        assert_eq!(results[3].status, ActionStatus::Skipped);
    }
}
