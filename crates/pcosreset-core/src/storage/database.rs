//! SQLite-backed storage.
//!
//! Provides persistent storage for:
//! - Key-value store for application state (the quiz session lives here)
//! - Generated meal plans, per funnel session
//! - Local log of lead submissions

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::{data_dir, migrations};
use crate::error::{CoreError, DatabaseError};
use crate::integrations::meal_plan::WeeklyMealPlan;
use crate::integrations::submission::SubmissionOutcome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanRecord {
    pub id: i64,
    pub session_id: String,
    pub provider: String,
    pub model: String,
    pub plan: WeeklyMealPlan,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: i64,
    pub session_id: String,
    pub success: bool,
    pub remote_id: Option<String>,
    pub error: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// SQLite database for funnel state and generated artefacts.
pub struct Database {
    conn: Connection,
}

fn parse_time(key: &str, raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DatabaseError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/pcosreset/pcosreset.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("pcosreset.db");
        Ok(Self::open_at(&path)?)
    }

    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        Ok(stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Store a generated plan for `session_id`.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn save_meal_plan(
        &self,
        session_id: &str,
        provider: &str,
        model: &str,
        plan: &WeeklyMealPlan,
    ) -> Result<i64, DatabaseError> {
        let plan_json = serde_json::to_string(plan).map_err(|e| DatabaseError::Corrupt {
            key: "meal_plans.plan_json".into(),
            message: e.to_string(),
        })?;
        self.conn.execute(
            "INSERT INTO meal_plans (session_id, provider, model, plan_json, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![session_id, provider, model, plan_json, Utc::now().to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent plan for `session_id`.
    pub fn latest_meal_plan(&self, session_id: &str) -> Result<Option<MealPlanRecord>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, session_id, provider, model, plan_json, created_at
                 FROM meal_plans
                 WHERE session_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT 1",
                params![session_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, session_id, provider, model, plan_json, created_at)) = row else {
            return Ok(None);
        };
        let plan = serde_json::from_str(&plan_json).map_err(|e| DatabaseError::Corrupt {
            key: format!("meal_plans.{id}"),
            message: e.to_string(),
        })?;
        Ok(Some(MealPlanRecord {
            id,
            session_id,
            provider,
            model,
            plan,
            created_at: parse_time("meal_plans.created_at", &created_at)?,
        }))
    }

    /// Log the outcome of a lead submission.
    pub fn record_submission(
        &self,
        session_id: &str,
        outcome: &SubmissionOutcome,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO funnel_submissions (session_id, success, remote_id, error, submitted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session_id,
                outcome.success,
                outcome.id,
                outcome.error,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Submission attempts for `session_id`, oldest first.
    pub fn submissions(&self, session_id: &str) -> Result<Vec<SubmissionRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, success, remote_id, error, submitted_at
             FROM funnel_submissions
             WHERE session_id = ?1
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![session_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, session_id, success, remote_id, error, submitted_at) = row?;
            out.push(SubmissionRecord {
                id,
                session_id,
                success,
                remote_id,
                error,
                submitted_at: parse_time("funnel_submissions.submitted_at", &submitted_at)?,
            });
        }
        Ok(out)
    }
}
