use crate::impl_paginatable_for;
use crate::model::access::HasOwner;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct CourseEntity {
    id: Uuid,
    title: String,
    slug: String,
    description: String,
    category: Option<String>,
    difficulty: String,
    thumbnail_url: Option<String>,
    preview_video_url: Option<String>,
    is_published: bool,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

impl ResourceTyped for CourseEntity {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Course
    }
}

impl CourseEntity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }

    pub fn preview_video_url(&self) -> Option<&str> {
        self.preview_video_url.as_deref()
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn created_by(&self) -> Uuid {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CourseCreate {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub difficulty: String,
    pub thumbnail_url: Option<String>,
    pub preview_video_url: Option<String>,
}

/// URL-friendly slug: lowercase, non-alphanumerics collapsed to single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut dash_pending = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if dash_pending && !slug.is_empty() {
                slug.push('-');
            }
            dash_pending = false;
            slug.extend(c.to_lowercase());
        } else {
            dash_pending = true;
        }
    }
    slug
}

#[async_trait]
impl CrudRepository<CourseEntity, CourseCreate, Uuid> for CourseEntity {
    async fn create(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: CourseCreate,
    ) -> DatabaseResult<Self> {
        let slug = Self::unique_slug(mm, &data.title).await?;
        let result = sqlx::query("INSERT INTO courses (id, title, slug, description, category, difficulty, thumbnail_url, preview_video_url, created_by) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9) RETURNING id, created_at")
            .bind(Uuid::new_v4())
            .bind(&data.title)
            .bind(&slug)
            .bind(&data.description)
            .bind(&data.category)
            .bind(&data.difficulty)
            .bind(&data.thumbnail_url)
            .bind(&data.preview_video_url)
            .bind(actor.user_id())
            .fetch_one(mm.executor())
            .await?;

        let id = result.try_get("id")?;
        let created_at = result.try_get("created_at")?;
        Ok(CourseEntity {
            id,
            title: data.title,
            slug,
            description: data.description,
            category: data.category,
            difficulty: data.difficulty,
            thumbnail_url: data.thumbnail_url,
            preview_video_url: data.preview_video_url,
            is_published: false,
            created_by: actor.user_id(),
            created_at,
            published_at: None,
        })
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: CourseCreate,
    ) -> DatabaseResult<Self> {
        // the slug stays stable so published links keep working
        sqlx::query("UPDATE courses SET title = $1, description = $2, category = $3, difficulty = $4, thumbnail_url = $5, preview_video_url = $6 WHERE id = $7")
            .bind(&data.title)
            .bind(&data.description)
            .bind(&data.category)
            .bind(&data.difficulty)
            .bind(&data.thumbnail_url)
            .bind(&data.preview_video_url)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.title = data.title;
        self.description = data.description;
        self.category = data.category;
        self.difficulty = data.difficulty;
        self.thumbnail_url = data.thumbnail_url;
        self.preview_video_url = data.preview_video_url;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        // lessons, enrollments and progress rows go with it (FK cascade)
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM courses ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(CourseEntity, CourseCreate, Uuid);

#[async_trait]
impl HasOwner for CourseEntity {
    type OwnerId = Uuid;

    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId> {
        Ok(self.created_by)
    }
}

// Utils

/// Derived counts; always recomputed from the underlying rows so they cannot
/// drift under concurrent writes.
#[derive(Debug, Clone, Copy, Serialize, FromRow, utoipa::ToSchema)]
pub struct CourseStats {
    pub total_lessons: i64,
    pub enrolled_count: i64,
}

impl CourseEntity {
    async fn unique_slug(mm: &ModelManager, title: &str) -> DatabaseResult<String> {
        let base = slugify(title);
        let mut slug = base.clone();
        let mut counter = 1;
        loop {
            let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE slug = $1")
                .bind(&slug)
                .fetch_one(mm.executor())
                .await?;
            if taken == 0 {
                return Ok(slug);
            }
            slug = format!("{base}-{counter}");
            counter += 1;
        }
    }

    pub async fn find_by_slug(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        slug: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE slug = $1")
            .bind(slug)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }
        Ok(Some(result?))
    }

    pub async fn list_catalog(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        published_only: bool,
        category: Option<&str>,
        difficulty: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT *
            FROM courses
            WHERE (NOT $1 OR is_published)
              AND ($2::varchar IS NULL OR category = $2)
              AND ($3::varchar IS NULL OR difficulty = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(published_only)
        .bind(category)
        .bind(difficulty)
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn stats(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        course_id: Uuid,
    ) -> DatabaseResult<CourseStats> {
        let stats = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM lessons WHERE course_id = $1) AS total_lessons,
                (SELECT COUNT(*) FROM enrollments WHERE course_id = $1) AS enrolled_count
            "#,
        )
        .bind(course_id)
        .fetch_one(mm.executor())
        .await?;
        Ok(stats)
    }

    pub async fn set_published(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        published: bool,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            "UPDATE courses SET is_published = $1, published_at = COALESCE(published_at, CASE WHEN $1 THEN now() END) WHERE id = $2",
        )
        .bind(published)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.is_published = published;
        if published && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
        Ok(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Intro to Rust!"), "intro-to-rust");
        assert_eq!(slugify("  Already -- slugged  "), "already-slugged");
        assert_eq!(slugify("Ünïcode Träining"), "ünïcode-träining");
    }

    #[test]
    fn slugify_never_edges_with_dashes() {
        assert_eq!(slugify("?!hello?!"), "hello");
        assert_eq!(slugify(""), "");
    }
}
