//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    Availability, AvailabilityFilter, AvailableShift, AvailableShiftFilter, CalendarEvent,
    CreateAvailableShiftRequest, CreateEventRequest, CreateMemberRequest, CreateShiftRequest,
    CreateTaskRequest, MemberRole, Notification, NotificationFilter, RevisionInfo, Shift,
    ShiftFilter, ShiftStatus, Task, TaskStatus, TeamMember, UpdateEventRequest,
    UpdateMemberRequest, UpdateShiftRequest, UpdateTaskRequest, UpsertAvailabilityRequest,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    // ==================== MEMBER OPERATIONS ====================

    /// List all members.
    pub async fn list_members(&self) -> Result<Vec<TeamMember>, AppError> {
        let rows = sqlx::query(
            "SELECT id, email, name, role, competence_level, hourly_rate, updated_at, version FROM members ORDER BY name"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(member_from_row).collect())
    }

    /// Get a member by ID.
    pub async fn get_member(&self, id: &str) -> Result<Option<TeamMember>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, name, role, competence_level, hourly_rate, updated_at, version FROM members WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(member_from_row))
    }

    /// Get a member by email.
    pub async fn get_member_by_email(&self, email: &str) -> Result<Option<TeamMember>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, name, role, competence_level, hourly_rate, updated_at, version FROM members WHERE email = ?"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(member_from_row))
    }

    /// Create a new member.
    pub async fn create_member(
        &self,
        request: &CreateMemberRequest,
    ) -> Result<TeamMember, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO members (id, email, name, role, competence_level, hourly_rate, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, 1)"
        )
        .bind(&id)
        .bind(&request.email)
        .bind(&request.name)
        .bind(request.role.as_str())
        .bind(request.competence_level)
        .bind(request.hourly_rate)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(TeamMember {
            id,
            email: request.email.clone(),
            name: request.name.clone(),
            role: request.role,
            competence_level: request.competence_level,
            hourly_rate: request.hourly_rate,
            updated_at: now,
            version: 1,
        })
    }

    /// Update a member with optimistic concurrency control.
    pub async fn update_member(
        &self,
        id: &str,
        request: &UpdateMemberRequest,
    ) -> Result<TeamMember, AppError> {
        let existing = self
            .get_member(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))?;

        // Check version for optimistic concurrency
        if let Some(expected) = request.expected_version {
            if existing.version != expected {
                return Err(AppError::Conflict {
                    message: format!(
                        "Version mismatch: expected {}, current {}",
                        expected, existing.version
                    ),
                    current_version: existing.version,
                });
            }
        }

        let now = Utc::now().to_rfc3339();
        let new_version = existing.version + 1;

        let name = request.name.as_ref().unwrap_or(&existing.name);
        let role = request.role.unwrap_or(existing.role);
        let competence_level = request.competence_level.unwrap_or(existing.competence_level);
        let hourly_rate = request.hourly_rate.unwrap_or(existing.hourly_rate);

        // Conditional UPDATE with version check to prevent race conditions
        let result = sqlx::query(
            "UPDATE members SET name = ?, role = ?, competence_level = ?, hourly_rate = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(name)
        .bind(role.as_str())
        .bind(competence_level)
        .bind(hourly_rate)
        .bind(&now)
        .bind(new_version)
        .bind(id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Race condition - version changed between read and write
            let current = self.get_member(id).await?;
            return Err(AppError::Conflict {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|m| m.version).unwrap_or(0),
            });
        }

        self.increment_revision().await?;

        Ok(TeamMember {
            id: id.to_string(),
            email: existing.email,
            name: name.clone(),
            role,
            competence_level,
            hourly_rate,
            updated_at: now,
            version: new_version,
        })
    }

    /// Delete a member.
    pub async fn delete_member(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== SHIFT OPERATIONS ====================

    /// List shifts with optional assignee and date-range filters.
    pub async fn list_shifts(&self, filter: &ShiftFilter) -> Result<Vec<Shift>, AppError> {
        let mut sql = String::from(
            "SELECT id, assigned_to, date, start_time, end_time, shift_type, status, notes, created_by, updated_at, version FROM shifts WHERE 1=1"
        );
        if filter.assigned_to.is_some() {
            sql.push_str(" AND assigned_to = ?");
        }
        if filter.from.is_some() {
            sql.push_str(" AND date >= ?");
        }
        if filter.to.is_some() {
            sql.push_str(" AND date <= ?");
        }
        sql.push_str(" ORDER BY date, start_time");

        let mut query = sqlx::query(&sql);
        if let Some(assigned_to) = &filter.assigned_to {
            query = query.bind(assigned_to);
        }
        if let Some(from) = &filter.from {
            query = query.bind(from);
        }
        if let Some(to) = &filter.to {
            query = query.bind(to);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(shift_from_row).collect())
    }

    /// Get a shift by ID.
    pub async fn get_shift(&self, id: &str) -> Result<Option<Shift>, AppError> {
        let row = sqlx::query(
            "SELECT id, assigned_to, date, start_time, end_time, shift_type, status, notes, created_by, updated_at, version FROM shifts WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(shift_from_row))
    }

    /// Create a new shift.
    pub async fn create_shift(&self, request: &CreateShiftRequest) -> Result<Shift, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO shifts (id, assigned_to, date, start_time, end_time, shift_type, status, notes, created_by, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)"
        )
        .bind(&id)
        .bind(&request.assigned_to)
        .bind(&request.date)
        .bind(&request.start_time)
        .bind(&request.end_time)
        .bind(&request.shift_type)
        .bind(request.status.as_str())
        .bind(&request.notes)
        .bind(&request.created_by)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(Shift {
            id,
            assigned_to: request.assigned_to.clone(),
            date: request.date.clone(),
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
            shift_type: request.shift_type.clone(),
            status: request.status,
            notes: request.notes.clone(),
            created_by: request.created_by.clone(),
            updated_at: now,
            version: 1,
        })
    }

    /// Insert a batch of generated shifts inside one transaction.
    ///
    /// The revision is incremented once for the entire batch.
    pub async fn insert_shifts_batch(
        &self,
        requests: &[CreateShiftRequest],
    ) -> Result<Vec<Shift>, AppError> {
        let mut results = Vec::with_capacity(requests.len());
        let mut tx = self.pool.begin().await?;

        for request in requests {
            let id = uuid::Uuid::new_v4().to_string();
            let now = Utc::now().to_rfc3339();

            sqlx::query(
                "INSERT INTO shifts (id, assigned_to, date, start_time, end_time, shift_type, status, notes, created_by, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)"
            )
            .bind(&id)
            .bind(&request.assigned_to)
            .bind(&request.date)
            .bind(&request.start_time)
            .bind(&request.end_time)
            .bind(&request.shift_type)
            .bind(request.status.as_str())
            .bind(&request.notes)
            .bind(&request.created_by)
            .bind(&now)
            .execute(&mut *tx)
            .await?;

            results.push(Shift {
                id,
                assigned_to: request.assigned_to.clone(),
                date: request.date.clone(),
                start_time: request.start_time.clone(),
                end_time: request.end_time.clone(),
                shift_type: request.shift_type.clone(),
                status: request.status,
                notes: request.notes.clone(),
                created_by: request.created_by.clone(),
                updated_at: now,
                version: 1,
            });
        }

        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(results)
    }

    /// Update a shift with optimistic concurrency control.
    pub async fn update_shift(
        &self,
        id: &str,
        request: &UpdateShiftRequest,
    ) -> Result<Shift, AppError> {
        let existing = self
            .get_shift(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Shift {} not found", id)))?;

        if let Some(expected) = request.expected_version {
            if existing.version != expected {
                return Err(AppError::Conflict {
                    message: format!(
                        "Version mismatch: expected {}, current {}",
                        expected, existing.version
                    ),
                    current_version: existing.version,
                });
            }
        }

        let now = Utc::now().to_rfc3339();
        let new_version = existing.version + 1;

        let assigned_to = request.assigned_to.clone().or(existing.assigned_to.clone());
        let date = request.date.as_ref().unwrap_or(&existing.date);
        let start_time = request.start_time.as_ref().unwrap_or(&existing.start_time);
        let end_time = request.end_time.as_ref().unwrap_or(&existing.end_time);
        let shift_type = request.shift_type.as_ref().unwrap_or(&existing.shift_type);
        let status = request.status.unwrap_or(existing.status);
        let notes = request.notes.clone().or(existing.notes.clone());

        let result = sqlx::query(
            "UPDATE shifts SET assigned_to = ?, date = ?, start_time = ?, end_time = ?, shift_type = ?, status = ?, notes = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(&assigned_to)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(shift_type)
        .bind(status.as_str())
        .bind(&notes)
        .bind(&now)
        .bind(new_version)
        .bind(id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.get_shift(id).await?;
            return Err(AppError::Conflict {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|s| s.version).unwrap_or(0),
            });
        }

        self.increment_revision().await?;

        Ok(Shift {
            id: id.to_string(),
            assigned_to,
            date: date.clone(),
            start_time: start_time.clone(),
            end_time: end_time.clone(),
            shift_type: shift_type.clone(),
            status,
            notes,
            created_by: existing.created_by,
            updated_at: now,
            version: new_version,
        })
    }

    /// Delete a shift.
    pub async fn delete_shift(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM shifts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Shift {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== AVAILABLE SHIFT OPERATIONS ====================

    /// List available shifts, optionally restricted to unclaimed ones.
    pub async fn list_available_shifts(
        &self,
        filter: &AvailableShiftFilter,
    ) -> Result<Vec<AvailableShift>, AppError> {
        let unclaimed_only = filter.unclaimed_only.unwrap_or(false);
        let sql = if unclaimed_only {
            "SELECT id, date, start_time, end_time, competence_required, claimed_by, created_by, updated_at FROM available_shifts WHERE claimed_by IS NULL ORDER BY date, start_time"
        } else {
            "SELECT id, date, start_time, end_time, competence_required, claimed_by, created_by, updated_at FROM available_shifts ORDER BY date, start_time"
        };

        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(available_shift_from_row).collect())
    }

    /// Get an available shift by ID.
    pub async fn get_available_shift(
        &self,
        id: &str,
    ) -> Result<Option<AvailableShift>, AppError> {
        let row = sqlx::query(
            "SELECT id, date, start_time, end_time, competence_required, claimed_by, created_by, updated_at FROM available_shifts WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(available_shift_from_row))
    }

    /// Publish a new available shift.
    pub async fn create_available_shift(
        &self,
        request: &CreateAvailableShiftRequest,
    ) -> Result<AvailableShift, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO available_shifts (id, date, start_time, end_time, competence_required, claimed_by, created_by, updated_at) VALUES (?, ?, ?, ?, ?, NULL, ?, ?)"
        )
        .bind(&id)
        .bind(&request.date)
        .bind(&request.start_time)
        .bind(&request.end_time)
        .bind(request.competence_required)
        .bind(&request.created_by)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(AvailableShift {
            id,
            date: request.date.clone(),
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
            competence_required: request.competence_required,
            claimed_by: None,
            created_by: request.created_by.clone(),
            updated_at: now,
        })
    }

    /// Claim an available shift for a member.
    ///
    /// The claim is an atomic check-and-set: the UPDATE only matches while
    /// `claimed_by` is still NULL, so of two concurrent claimers exactly one
    /// sees a row change and the other gets a conflict.
    pub async fn claim_available_shift(
        &self,
        id: &str,
        member_email: &str,
    ) -> Result<AvailableShift, AppError> {
        let existing = self
            .get_available_shift(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Available shift {} not found", id)))?;

        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE available_shifts SET claimed_by = ?, updated_at = ? WHERE id = ? AND claimed_by IS NULL"
        )
        .bind(member_email)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict {
                message: format!(
                    "Shift already claimed by {}",
                    existing.claimed_by.as_deref().unwrap_or("another member")
                ),
                current_version: 0,
            });
        }

        self.increment_revision().await?;

        Ok(AvailableShift {
            claimed_by: Some(member_email.to_string()),
            updated_at: now,
            ..existing
        })
    }

    /// Delete an available shift.
    pub async fn delete_available_shift(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM available_shifts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Available shift {} not found",
                id
            )));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== AVAILABILITY OPERATIONS ====================

    /// List availability rows with optional member and date-range filters.
    pub async fn list_availability(
        &self,
        filter: &AvailabilityFilter,
    ) -> Result<Vec<Availability>, AppError> {
        let mut sql = String::from(
            "SELECT member_email, date, is_available, preferred_start_time, preferred_end_time, notes, updated_at FROM availability WHERE 1=1"
        );
        if filter.member_email.is_some() {
            sql.push_str(" AND member_email = ?");
        }
        if filter.from.is_some() {
            sql.push_str(" AND date >= ?");
        }
        if filter.to.is_some() {
            sql.push_str(" AND date <= ?");
        }
        sql.push_str(" ORDER BY date, member_email");

        let mut query = sqlx::query(&sql);
        if let Some(member_email) = &filter.member_email {
            query = query.bind(member_email);
        }
        if let Some(from) = &filter.from {
            query = query.bind(from);
        }
        if let Some(to) = &filter.to {
            query = query.bind(to);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(availability_from_row).collect())
    }

    /// Upsert an availability row for (member, date). Last write wins.
    ///
    /// A single INSERT .. ON CONFLICT keeps the operation atomic; there is no
    /// read-check-write window between concurrent savers.
    pub async fn upsert_availability(
        &self,
        request: &UpsertAvailabilityRequest,
    ) -> Result<Availability, AppError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO availability (member_email, date, is_available, preferred_start_time, preferred_end_time, notes, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(member_email, date) DO UPDATE SET
                   is_available = excluded.is_available,
                   preferred_start_time = excluded.preferred_start_time,
                   preferred_end_time = excluded.preferred_end_time,
                   notes = excluded.notes,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&request.member_email)
        .bind(&request.date)
        .bind(request.is_available as i32)
        .bind(&request.preferred_start_time)
        .bind(&request.preferred_end_time)
        .bind(&request.notes)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(Availability {
            member_email: request.member_email.clone(),
            date: request.date.clone(),
            is_available: request.is_available,
            preferred_start_time: request.preferred_start_time.clone(),
            preferred_end_time: request.preferred_end_time.clone(),
            notes: request.notes.clone(),
            updated_at: now,
        })
    }

    // ==================== CALENDAR EVENT OPERATIONS ====================

    /// List all calendar events.
    pub async fn list_events(&self) -> Result<Vec<CalendarEvent>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, date, start_time, end_time, event_type, attendees, notes, created_by, updated_at, version FROM calendar_events ORDER BY date, start_time"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(event_from_row).collect())
    }

    /// Get a calendar event by ID.
    pub async fn get_event(&self, id: &str) -> Result<Option<CalendarEvent>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, date, start_time, end_time, event_type, attendees, notes, created_by, updated_at, version FROM calendar_events WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(event_from_row))
    }

    /// Create a new calendar event.
    pub async fn create_event(
        &self,
        request: &CreateEventRequest,
    ) -> Result<CalendarEvent, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let attendees_json = serde_json::to_string(&request.attendees).unwrap_or_default();

        sqlx::query(
            "INSERT INTO calendar_events (id, title, date, start_time, end_time, event_type, attendees, notes, created_by, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)"
        )
        .bind(&id)
        .bind(&request.title)
        .bind(&request.date)
        .bind(&request.start_time)
        .bind(&request.end_time)
        .bind(&request.event_type)
        .bind(&attendees_json)
        .bind(&request.notes)
        .bind(&request.created_by)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(CalendarEvent {
            id,
            title: request.title.clone(),
            date: request.date.clone(),
            start_time: request.start_time.clone(),
            end_time: request.end_time.clone(),
            event_type: request.event_type.clone(),
            attendees: request.attendees.clone(),
            notes: request.notes.clone(),
            created_by: request.created_by.clone(),
            updated_at: now,
            version: 1,
        })
    }

    /// Update a calendar event with optimistic concurrency control.
    pub async fn update_event(
        &self,
        id: &str,
        request: &UpdateEventRequest,
    ) -> Result<CalendarEvent, AppError> {
        let existing = self
            .get_event(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))?;

        if let Some(expected) = request.expected_version {
            if existing.version != expected {
                return Err(AppError::Conflict {
                    message: format!(
                        "Version mismatch: expected {}, current {}",
                        expected, existing.version
                    ),
                    current_version: existing.version,
                });
            }
        }

        let now = Utc::now().to_rfc3339();
        let new_version = existing.version + 1;

        let title = request.title.as_ref().unwrap_or(&existing.title);
        let date = request.date.as_ref().unwrap_or(&existing.date);
        let start_time = request.start_time.clone().or(existing.start_time.clone());
        let end_time = request.end_time.clone().or(existing.end_time.clone());
        let event_type = request.event_type.as_ref().unwrap_or(&existing.event_type);
        let attendees = request
            .attendees
            .clone()
            .unwrap_or(existing.attendees.clone());
        let notes = request.notes.clone().or(existing.notes.clone());
        let attendees_json = serde_json::to_string(&attendees).unwrap_or_default();

        let result = sqlx::query(
            "UPDATE calendar_events SET title = ?, date = ?, start_time = ?, end_time = ?, event_type = ?, attendees = ?, notes = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(title)
        .bind(date)
        .bind(&start_time)
        .bind(&end_time)
        .bind(event_type)
        .bind(&attendees_json)
        .bind(&notes)
        .bind(&now)
        .bind(new_version)
        .bind(id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.get_event(id).await?;
            return Err(AppError::Conflict {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|e| e.version).unwrap_or(0),
            });
        }

        self.increment_revision().await?;

        Ok(CalendarEvent {
            id: id.to_string(),
            title: title.clone(),
            date: date.clone(),
            start_time,
            end_time,
            event_type: event_type.clone(),
            attendees,
            notes,
            created_by: existing.created_by,
            updated_at: now,
            version: new_version,
        })
    }

    /// Delete a calendar event.
    pub async fn delete_event(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== TASK OPERATIONS ====================

    /// List all tasks.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, description, assigned_to, due_date, status, created_by, updated_at, version FROM tasks ORDER BY due_date, title"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(task_from_row).collect())
    }

    /// Get a task by ID.
    pub async fn get_task(&self, id: &str) -> Result<Option<Task>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, description, assigned_to, due_date, status, created_by, updated_at, version FROM tasks WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(task_from_row))
    }

    /// Create a new task.
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO tasks (id, title, description, assigned_to, due_date, status, created_by, updated_at, version) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1)"
        )
        .bind(&id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.assigned_to)
        .bind(&request.due_date)
        .bind(request.status.as_str())
        .bind(&request.created_by)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(Task {
            id,
            title: request.title.clone(),
            description: request.description.clone(),
            assigned_to: request.assigned_to.clone(),
            due_date: request.due_date.clone(),
            status: request.status,
            created_by: request.created_by.clone(),
            updated_at: now,
            version: 1,
        })
    }

    /// Update a task with optimistic concurrency control.
    pub async fn update_task(
        &self,
        id: &str,
        request: &UpdateTaskRequest,
    ) -> Result<Task, AppError> {
        let existing = self
            .get_task(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))?;

        if let Some(expected) = request.expected_version {
            if existing.version != expected {
                return Err(AppError::Conflict {
                    message: format!(
                        "Version mismatch: expected {}, current {}",
                        expected, existing.version
                    ),
                    current_version: existing.version,
                });
            }
        }

        let now = Utc::now().to_rfc3339();
        let new_version = existing.version + 1;

        let title = request.title.as_ref().unwrap_or(&existing.title);
        let description = request.description.clone().or(existing.description.clone());
        let assigned_to = request.assigned_to.clone().or(existing.assigned_to.clone());
        let due_date = request.due_date.clone().or(existing.due_date.clone());
        let status = request.status.unwrap_or(existing.status);

        let result = sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, assigned_to = ?, due_date = ?, status = ?, updated_at = ?, version = ? WHERE id = ? AND version = ?"
        )
        .bind(title)
        .bind(&description)
        .bind(&assigned_to)
        .bind(&due_date)
        .bind(status.as_str())
        .bind(&now)
        .bind(new_version)
        .bind(id)
        .bind(existing.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.get_task(id).await?;
            return Err(AppError::Conflict {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|t| t.version).unwrap_or(0),
            });
        }

        self.increment_revision().await?;

        Ok(Task {
            id: id.to_string(),
            title: title.clone(),
            description,
            assigned_to,
            due_date,
            status,
            created_by: existing.created_by,
            updated_at: now,
            version: new_version,
        })
    }

    /// Delete a task.
    pub async fn delete_task(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Task {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    // ==================== NOTIFICATION OPERATIONS ====================

    /// List notifications, optionally for a single recipient.
    pub async fn list_notifications(
        &self,
        filter: &NotificationFilter,
    ) -> Result<Vec<Notification>, AppError> {
        let rows = match &filter.recipient {
            Some(recipient) => {
                sqlx::query(
                    "SELECT id, recipient, subject, body, created_at FROM notifications WHERE recipient = ? ORDER BY created_at DESC"
                )
                .bind(recipient)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, recipient, subject, body, created_at FROM notifications ORDER BY created_at DESC"
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(notification_from_row).collect())
    }

    /// Record a notification for a recipient.
    pub async fn create_notification(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<Notification, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO notifications (id, recipient, subject, body, created_at) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(recipient)
        .bind(subject)
        .bind(body)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Notification {
            id,
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            created_at: now,
        })
    }
}

// Helper functions for row conversion

fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> TeamMember {
    let role_str: String = row.get("role");
    TeamMember {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        role: MemberRole::from_str(&role_str).unwrap_or(MemberRole::Member),
        competence_level: row.get("competence_level"),
        hourly_rate: row.get("hourly_rate"),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}

fn shift_from_row(row: &sqlx::sqlite::SqliteRow) -> Shift {
    let status_str: String = row.get("status");
    Shift {
        id: row.get("id"),
        assigned_to: row.get("assigned_to"),
        date: row.get("date"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        shift_type: row.get("shift_type"),
        status: ShiftStatus::from_str(&status_str).unwrap_or(ShiftStatus::Scheduled),
        notes: row.get("notes"),
        created_by: row.get("created_by"),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}

fn available_shift_from_row(row: &sqlx::sqlite::SqliteRow) -> AvailableShift {
    AvailableShift {
        id: row.get("id"),
        date: row.get("date"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        competence_required: row.get("competence_required"),
        claimed_by: row.get("claimed_by"),
        created_by: row.get("created_by"),
        updated_at: row.get("updated_at"),
    }
}

fn availability_from_row(row: &sqlx::sqlite::SqliteRow) -> Availability {
    let is_available: i32 = row.get("is_available");
    Availability {
        member_email: row.get("member_email"),
        date: row.get("date"),
        is_available: is_available != 0,
        preferred_start_time: row.get("preferred_start_time"),
        preferred_end_time: row.get("preferred_end_time"),
        notes: row.get("notes"),
        updated_at: row.get("updated_at"),
    }
}

fn event_from_row(row: &sqlx::sqlite::SqliteRow) -> CalendarEvent {
    let attendees_str: Option<String> = row.get("attendees");
    CalendarEvent {
        id: row.get("id"),
        title: row.get("title"),
        date: row.get("date"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        event_type: row.get("event_type"),
        attendees: attendees_str
            .map(|s| parse_json_array(&s))
            .unwrap_or_default(),
        notes: row.get("notes"),
        created_by: row.get("created_by"),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}

fn task_from_row(row: &sqlx::sqlite::SqliteRow) -> Task {
    let status_str: String = row.get("status");
    Task {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        assigned_to: row.get("assigned_to"),
        due_date: row.get("due_date"),
        status: TaskStatus::from_str(&status_str).unwrap_or(TaskStatus::Todo),
        created_by: row.get("created_by"),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}

fn notification_from_row(row: &sqlx::sqlite::SqliteRow) -> Notification {
    Notification {
        id: row.get("id"),
        recipient: row.get("recipient"),
        subject: row.get("subject"),
        body: row.get("body"),
        created_at: row.get("created_at"),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}
