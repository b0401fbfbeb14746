use crate::content::GradeReport;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// At most one live row per (user, lesson); resubmissions overwrite it.
/// Quiz attempt history lives in `quiz_attempts`.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct LessonProgress {
    id: Uuid,
    user_id: Uuid,
    lesson_id: Uuid,
    is_completed: bool,
    last_score: Option<i32>,
    last_passed: Option<bool>,
    completed_at: Option<DateTime<Utc>>,
}

impl ResourceTyped for LessonProgress {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::LessonProgress
    }
}

impl LessonProgress {
    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn last_score(&self) -> Option<i32> {
        self.last_score
    }

    pub fn last_passed(&self) -> Option<bool> {
        self.last_passed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub async fn mark_complete(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO lesson_progress (id, user_id, lesson_id, is_completed, completed_at)
            VALUES ($1, $2, $3, TRUE, now())
            ON CONFLICT (user_id, lesson_id) DO UPDATE
                SET is_completed = TRUE,
                    completed_at = COALESCE(lesson_progress.completed_at, now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(lesson_id)
        .fetch_one(mm.executor())
        .await?;
        Ok(row)
    }

    /// Stores the latest quiz outcome. A failing retry keeps an earlier
    /// completion: passing is a ratchet, the score is not.
    pub async fn record_quiz_outcome(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        lesson_id: Uuid,
        report: &GradeReport,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO lesson_progress (id, user_id, lesson_id, is_completed, last_score, last_passed, completed_at)
            VALUES ($1, $2, $3, $4, $5, $4, CASE WHEN $4 THEN now() END)
            ON CONFLICT (user_id, lesson_id) DO UPDATE
                SET last_score = EXCLUDED.last_score,
                    last_passed = EXCLUDED.last_passed,
                    is_completed = lesson_progress.is_completed OR EXCLUDED.is_completed,
                    completed_at = COALESCE(lesson_progress.completed_at, EXCLUDED.completed_at)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(lesson_id)
        .bind(report.passed)
        .bind(i32::from(report.percentage))
        .fetch_one(mm.executor())
        .await?;
        Ok(row)
    }

    pub async fn find(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        lesson_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM lesson_progress WHERE user_id = $1 AND lesson_id = $2",
        )
        .bind(user_id)
        .bind(lesson_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn all_for_course(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT lp.*
            FROM lesson_progress lp
            JOIN lessons l ON l.id = lp.lesson_id
            WHERE lp.user_id = $1 AND l.course_id = $2
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    /// Completed lessons that count towards course progress: published only.
    pub async fn count_completed_published(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM lesson_progress lp
            JOIN lessons l ON l.id = lp.lesson_id
            WHERE lp.user_id = $1 AND l.course_id = $2
              AND lp.is_completed AND l.is_published
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(mm.executor())
        .await?;
        Ok(count)
    }
}
