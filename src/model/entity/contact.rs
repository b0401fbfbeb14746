use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct ContactInquiry {
    id: Uuid,
    name: String,
    email: String,
    subject: String,
    message: String,
    is_read: bool,
    reply_notes: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ContactInquiryCreate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ResourceTyped for ContactInquiry {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::ContactInquiry
    }
}

impl ContactInquiry {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_read(&self) -> bool {
        self.is_read
    }

    pub async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ContactInquiryCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            "INSERT INTO contact_inquiries (id, name, email, subject, message) VALUES ($1,$2,$3,$4,$5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.subject)
        .bind(&data.message)
        .fetch_one(mm.executor())
        .await?;
        Ok(row)
    }

    pub async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT * FROM contact_inquiries
            WHERE (NOT $1 OR NOT is_read)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM contact_inquiries WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn mark_read(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        reply_notes: Option<String>,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            "UPDATE contact_inquiries SET is_read = TRUE, reply_notes = COALESCE($1, reply_notes) WHERE id = $2",
        )
        .bind(&reply_notes)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.is_read = true;
        if reply_notes.is_some() {
            self.reply_notes = reply_notes;
        }
        Ok(self)
    }

    pub async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM contact_inquiries WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }
}
