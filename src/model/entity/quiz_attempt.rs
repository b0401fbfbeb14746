use std::collections::HashMap;

use crate::content::GradeReport;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Append-only attempt history; the latest outcome is mirrored into
/// `lesson_progress`.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct QuizAttempt {
    id: Uuid,
    user_id: Uuid,
    lesson_id: Uuid,
    #[schema(value_type = Object)]
    answers: serde_json::Value,
    score: i32,
    max_score: i32,
    percentage: i32,
    passed: bool,
    submitted_at: DateTime<Utc>,
}

impl ResourceTyped for QuizAttempt {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::QuizAttempt
    }
}

impl QuizAttempt {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn max_score(&self) -> i32 {
        self.max_score
    }

    pub fn percentage(&self) -> i32 {
        self.percentage
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub async fn record(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        lesson_id: Uuid,
        answers: &HashMap<u32, u8>,
        report: &GradeReport,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO quiz_attempts (id, user_id, lesson_id, answers, score, max_score, percentage, passed)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(lesson_id)
        .bind(serde_json::to_value(answers)?)
        .bind(report.score as i32)
        .bind(report.max_score as i32)
        .bind(i32::from(report.percentage))
        .bind(report.passed)
        .fetch_one(mm.executor())
        .await?;
        Ok(row)
    }

    pub async fn list_for_lesson(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT * FROM quiz_attempts
            WHERE user_id = $1 AND lesson_id = $2
            ORDER BY submitted_at DESC
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }
}
