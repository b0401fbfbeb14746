use crate::model::repo::ResourceTyped;
use crate::model::{DatabaseError, ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// One row per (user, course); the database enforces the uniqueness
/// invariant, not the application.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Enrollment {
    id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    enrolled_at: DateTime<Utc>,
}

impl ResourceTyped for Enrollment {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Enrollment
    }
}

impl Enrollment {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn enrolled_at(&self) -> DateTime<Utc> {
        self.enrolled_at
    }

    /// A second enrollment for the same pair surfaces as
    /// `DatabaseError::Conflict`.
    pub async fn enroll(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<Self> {
        let result = sqlx::query_as(
            "INSERT INTO enrollments (id, user_id, course_id) VALUES ($1,$2,$3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(course_id)
        .fetch_one(mm.executor())
        .await
        .map_err(DatabaseError::from_sqlx)?;

        Ok(result)
    }

    pub async fn find(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM enrollments WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn list_for_user(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM enrollments WHERE user_id = $1 ORDER BY enrolled_at")
                .bind(user_id)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    pub async fn unenroll(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM enrollments WHERE user_id = $1 AND course_id = $2")
            .bind(user_id)
            .bind(course_id)
            .execute(mm.executor())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
