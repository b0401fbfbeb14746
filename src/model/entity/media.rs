use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Metadata row for a file in the uploads directory. The bytes themselves
/// are served statically, never through the database.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct MediaFile {
    id: Uuid,
    filename: String,
    original_filename: String,
    kind: String,
    file_size: i64,
    folder: String,
    uploaded_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct MediaFileCreate {
    pub filename: String,
    pub original_filename: String,
    pub kind: String,
    pub file_size: i64,
    pub folder: String,
}

impl ResourceTyped for MediaFile {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::MediaFile
    }
}

impl MediaFile {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub async fn create(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: MediaFileCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            "INSERT INTO media_files (id, filename, original_filename, kind, file_size, folder, uploaded_by) VALUES ($1,$2,$3,$4,$5,$6,$7) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.filename)
        .bind(&data.original_filename)
        .bind(&data.kind)
        .bind(data.file_size)
        .bind(&data.folder)
        .bind(actor.user_id())
        .fetch_one(mm.executor())
        .await?;
        Ok(row)
    }

    pub async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        folder: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT * FROM media_files
            WHERE ($1::varchar IS NULL OR folder = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(folder)
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
        let result = sqlx::query_as("SELECT * FROM media_files WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM media_files WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }
}
