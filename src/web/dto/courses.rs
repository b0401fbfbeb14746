use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{ValidationError, Violation};
use crate::model::entity::{CourseCreate, CourseEntity, CourseStats};

pub const DIFFICULTY_LEVELS: [&str; 3] = ["beginner", "intermediate", "advanced"];

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CourseCreateBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub thumbnail_url: Option<String>,
    pub preview_video_url: Option<String>,
}

impl CourseCreateBody {
    /// Checks the difficulty enum before anything touches the database.
    pub fn into_create(self) -> Result<CourseCreate, ValidationError> {
        let difficulty = self.difficulty.unwrap_or_else(|| String::from("beginner"));
        if !DIFFICULTY_LEVELS.contains(&difficulty.as_str()) {
            return Err(ValidationError::single(Violation::field(
                "difficulty",
                format!("must be one of {DIFFICULTY_LEVELS:?}"),
            )));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::single(Violation::field(
                "title",
                "must not be empty",
            )));
        }

        Ok(CourseCreate {
            title: self.title,
            description: self.description,
            category: self.category,
            difficulty,
            thumbnail_url: self.thumbnail_url,
            preview_video_url: self.preview_video_url,
        })
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CourseUpdateBody {
    #[serde(flatten)]
    pub fields: CourseCreateBody,
    /// Publishing stamps `published_at` on the first transition.
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: Option<String>,
    pub difficulty: String,
    pub thumbnail_url: Option<String>,
    pub preview_video_url: Option<String>,
    pub is_published: bool,
    pub total_lessons: i64,
    pub enrolled_count: i64,
    pub created_at: DateTime<Utc>,
}

impl CourseResponse {
    pub fn from_entity(course: &CourseEntity, stats: CourseStats) -> Self {
        Self {
            id: course.id(),
            title: course.title().to_string(),
            slug: course.slug().to_string(),
            description: course.description().to_string(),
            category: course.category().map(str::to_owned),
            difficulty: course.difficulty().to_string(),
            thumbnail_url: course.thumbnail_url().map(str::to_owned),
            preview_video_url: course.preview_video_url().map(str::to_owned),
            is_published: course.is_published(),
            total_lessons: stats.total_lessons,
            enrolled_count: stats.enrolled_count,
            created_at: course.created_at(),
        }
    }
}
