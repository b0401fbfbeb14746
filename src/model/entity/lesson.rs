use crate::content::{CatalogEntry, ContentType, LessonContent, QuizDefinition, QuizQuestion};
use crate::impl_paginatable_for;
use crate::model::access::HasOwner;
use crate::model::repo::ResourceTyped;
use crate::model::{
    DatabaseError, ModelManager, error::DatabaseResult, repo::CrudRepository,
};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

use super::course::slugify;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct LessonEntity {
    id: Uuid,
    course_id: Uuid,
    title: String,
    slug: String,
    description: String,
    position: i32,
    section: Option<String>,
    content_type: String,
    text_body: Option<String>,
    video_url: Option<String>,
    video_duration_minutes: i32,
    #[schema(value_type = Object)]
    quiz_questions: serde_json::Value,
    quiz_passing_score: i32,
    quiz_time_limit: Option<i32>,
    is_published: bool,
    is_free_preview: bool,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for LessonEntity {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lesson
    }
}

impl LessonEntity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
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

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn is_free_preview(&self) -> bool {
        self.is_free_preview
    }

    pub fn quiz_passing_score(&self) -> i32 {
        self.quiz_passing_score
    }

    pub fn content_type(&self) -> DatabaseResult<ContentType> {
        ContentType::parse(&self.content_type).ok_or_else(|| {
            DatabaseError::InvalidContent(format!("unknown content type {}", self.content_type))
        })
    }

    /// Rebuilds the typed content variant out of the row's columns.
    pub fn content(&self) -> DatabaseResult<LessonContent> {
        let content = match self.content_type()? {
            ContentType::Video => LessonContent::Video {
                url: self.video_url.clone().unwrap_or_default(),
                duration_minutes: self.video_duration_minutes.max(0) as u32,
            },
            ContentType::Text => LessonContent::Text {
                body: self.text_body.clone().unwrap_or_default(),
            },
            ContentType::Quiz => LessonContent::Quiz(self.quiz_definition()?),
        };
        Ok(content)
    }

    pub fn quiz_definition(&self) -> DatabaseResult<QuizDefinition> {
        let questions: Vec<QuizQuestion> = serde_json::from_value(self.quiz_questions.clone())?;
        let passing_score = u8::try_from(self.quiz_passing_score).map_err(|_| {
            DatabaseError::InvalidContent(format!(
                "passing score {} out of range",
                self.quiz_passing_score
            ))
        })?;
        let time_limit_minutes = match self.quiz_time_limit {
            Some(minutes) => Some(u32::try_from(minutes).map_err(|_| {
                DatabaseError::InvalidContent(format!("time limit {minutes} out of range"))
            })?),
            None => None,
        };

        Ok(QuizDefinition {
            questions,
            passing_score,
            time_limit_minutes,
        })
    }
}

impl CatalogEntry for LessonEntity {
    fn position(&self) -> i32 {
        self.position
    }

    fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    fn is_published(&self) -> bool {
        self.is_published
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonCreate {
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    pub section: Option<String>,
    pub is_published: bool,
    pub is_free_preview: bool,
    pub content_type: String,
    pub text_body: Option<String>,
    pub video_url: Option<String>,
    pub video_duration_minutes: i32,
    #[schema(value_type = Object)]
    pub quiz_questions: serde_json::Value,
    pub quiz_passing_score: i32,
    pub quiz_time_limit: Option<i32>,
}

impl LessonCreate {
    /// Maps an already-validated content variant onto the row's columns.
    pub fn from_content(
        course_id: Uuid,
        title: String,
        description: String,
        section: Option<String>,
        is_published: bool,
        is_free_preview: bool,
        content: &LessonContent,
    ) -> DatabaseResult<Self> {
        let mut data = Self {
            course_id,
            title,
            description,
            section,
            is_published,
            is_free_preview,
            content_type: content.content_type().to_string(),
            text_body: None,
            video_url: None,
            video_duration_minutes: 0,
            quiz_questions: serde_json::Value::Array(vec![]),
            quiz_passing_score: 70,
            quiz_time_limit: None,
        };

        match content {
            LessonContent::Video { url, duration_minutes } => {
                data.video_url = Some(url.clone());
                data.video_duration_minutes = *duration_minutes as i32;
            }
            LessonContent::Text { body } => {
                data.text_body = Some(body.clone());
            }
            LessonContent::Quiz(definition) => {
                data.quiz_questions = serde_json::to_value(&definition.questions)?;
                data.quiz_passing_score = i32::from(definition.passing_score);
                data.quiz_time_limit = definition.time_limit_minutes.map(|m| m as i32);
            }
        }

        Ok(data)
    }
}

#[async_trait]
impl CrudRepository<LessonEntity, LessonCreate, Uuid> for LessonEntity {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonCreate,
    ) -> DatabaseResult<Self> {
        // new lessons append at the end of the course order
        let position: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE course_id = $1")
            .bind(data.course_id)
            .fetch_one(mm.executor())
            .await?;
        let position = position as i32;
        let slug = slugify(&data.title);

        let result = sqlx::query(
            r#"
            INSERT INTO lessons (id, course_id, title, slug, description, position, section,
                content_type, text_body, video_url, video_duration_minutes,
                quiz_questions, quiz_passing_score, quiz_time_limit,
                is_published, is_free_preview)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16)
            RETURNING id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.course_id)
        .bind(&data.title)
        .bind(&slug)
        .bind(&data.description)
        .bind(position)
        .bind(&data.section)
        .bind(&data.content_type)
        .bind(&data.text_body)
        .bind(&data.video_url)
        .bind(data.video_duration_minutes)
        .bind(&data.quiz_questions)
        .bind(data.quiz_passing_score)
        .bind(data.quiz_time_limit)
        .bind(data.is_published)
        .bind(data.is_free_preview)
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        let created_at = result.try_get("created_at")?;
        Ok(LessonEntity {
            id,
            course_id: data.course_id,
            title: data.title,
            slug,
            description: data.description,
            position,
            section: data.section,
            content_type: data.content_type,
            text_body: data.text_body,
            video_url: data.video_url,
            video_duration_minutes: data.video_duration_minutes,
            quiz_questions: data.quiz_questions,
            quiz_passing_score: data.quiz_passing_score,
            quiz_time_limit: data.quiz_time_limit,
            is_published: data.is_published,
            is_free_preview: data.is_free_preview,
            created_at,
        })
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            r#"
            UPDATE lessons SET title = $1, description = $2, section = $3,
                content_type = $4, text_body = $5, video_url = $6,
                video_duration_minutes = $7, quiz_questions = $8,
                quiz_passing_score = $9, quiz_time_limit = $10,
                is_published = $11, is_free_preview = $12
            WHERE id = $13
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.section)
        .bind(&data.content_type)
        .bind(&data.text_body)
        .bind(&data.video_url)
        .bind(data.video_duration_minutes)
        .bind(&data.quiz_questions)
        .bind(data.quiz_passing_score)
        .bind(data.quiz_time_limit)
        .bind(data.is_published)
        .bind(data.is_free_preview)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.title = data.title;
        self.description = data.description;
        self.section = data.section;
        self.content_type = data.content_type;
        self.text_body = data.text_body;
        self.video_url = data.video_url;
        self.video_duration_minutes = data.video_duration_minutes;
        self.quiz_questions = data.quiz_questions;
        self.quiz_passing_score = data.quiz_passing_score;
        self.quiz_time_limit = data.quiz_time_limit;
        self.is_published = data.is_published;
        self.is_free_preview = data.is_free_preview;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM lessons ORDER BY created_at LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(LessonEntity, LessonCreate, Uuid);

#[async_trait]
impl HasOwner for LessonEntity {
    type OwnerId = Uuid;

    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId> {
        Ok(self.course_id)
    }
}

// Utils

impl LessonEntity {
    /// Creation order breaks position ties, which keeps the catalog sort
    /// stable.
    pub async fn all_by_course(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        course_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM lessons WHERE course_id = $1 ORDER BY position, created_at",
        )
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn ids_by_course(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        course_id: Uuid,
    ) -> DatabaseResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar(
            "SELECT id FROM lessons WHERE course_id = $1 ORDER BY position, created_at",
        )
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(ids)
    }

    pub async fn count_published(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        course_id: Uuid,
    ) -> DatabaseResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM lessons WHERE course_id = $1 AND is_published",
        )
        .bind(course_id)
        .fetch_one(mm.executor())
        .await?;
        Ok(count)
    }

    /// Rewrites positions to match `order`, which the caller has already
    /// validated as a permutation of the course's lessons.
    pub async fn apply_order(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        course_id: Uuid,
        order: &[Uuid],
    ) -> DatabaseResult<()> {
        let mut tx = mm.executor().begin().await?;
        for (position, lesson_id) in order.iter().enumerate() {
            sqlx::query("UPDATE lessons SET position = $1 WHERE id = $2 AND course_id = $3")
                .bind(position as i32)
                .bind(lesson_id)
                .bind(course_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
