use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{
    ContentType, LessonContent, QuizDefinition, QuizQuestion, RawContent, SectionGroup,
    ValidationError, Violation,
};
use crate::model::DatabaseResult;
use crate::model::entity::LessonEntity;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LessonCreateBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content_type: String,
    pub section: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_free_preview: bool,

    // content payload, interpreted per content_type
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub video_duration_minutes: Option<u32>,
    pub quiz_questions: Option<Vec<QuizQuestion>>,
    pub quiz_passing_score: Option<u8>,
    pub quiz_time_limit: Option<u32>,
}

impl LessonCreateBody {
    /// Applies the declared content type to the flat payload, collecting all
    /// violations.
    pub fn assemble_content(&self) -> Result<LessonContent, ValidationError> {
        let kind = ContentType::parse(&self.content_type).ok_or_else(|| {
            ValidationError::single(Violation::field(
                "content_type",
                format!("unknown content type {:?}", self.content_type),
            ))
        })?;

        let quiz = self.quiz_questions.as_ref().map(|questions| QuizDefinition {
            questions: questions.clone(),
            passing_score: self.quiz_passing_score.unwrap_or(70),
            time_limit_minutes: self.quiz_time_limit,
        });

        LessonContent::assemble(
            kind,
            RawContent {
                text_body: self.content.clone(),
                video_url: self.video_url.clone(),
                video_duration_minutes: self.video_duration_minutes.unwrap_or(0),
                quiz,
            },
        )
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ReorderBody {
    /// Permutation of the course's lesson ids.
    pub order: Vec<Uuid>,
}

/// Learner-facing question: the answer key never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuizQuestionPublic {
    pub id: u32,
    pub prompt: String,
    pub options: Vec<String>,
    pub points: u32,
}

impl From<&QuizQuestion> for QuizQuestionPublic {
    fn from(question: &QuizQuestion) -> Self {
        Self {
            id: question.id,
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            points: question.points,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuizPublic {
    pub questions: Vec<QuizQuestionPublic>,
    pub passing_score: u8,
    pub time_limit_minutes: Option<u32>,
}

impl From<&QuizDefinition> for QuizPublic {
    fn from(definition: &QuizDefinition) -> Self {
        Self {
            questions: definition.questions.iter().map(Into::into).collect(),
            passing_score: definition.passing_score,
            time_limit_minutes: definition.time_limit_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub position: i32,
    pub section: Option<String>,
    pub content_type: String,
    pub is_published: bool,
    pub is_free_preview: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizPublic>,
}

impl LessonResponse {
    pub fn from_entity(lesson: &LessonEntity) -> DatabaseResult<Self> {
        let mut response = Self {
            id: lesson.id(),
            course_id: lesson.course_id(),
            title: lesson.title().to_string(),
            slug: lesson.slug().to_string(),
            description: lesson.description().to_string(),
            position: lesson.position(),
            section: lesson.section().map(str::to_owned),
            content_type: lesson.content_type()?.to_string(),
            is_published: lesson.is_published(),
            is_free_preview: lesson.is_free_preview(),
            content: None,
            video_url: None,
            video_duration_minutes: None,
            quiz: None,
        };

        match lesson.content()? {
            LessonContent::Video { url, duration_minutes } => {
                response.video_url = Some(url);
                response.video_duration_minutes = Some(duration_minutes);
            }
            LessonContent::Text { body } => {
                response.content = Some(body);
            }
            LessonContent::Quiz(definition) => {
                response.quiz = Some(QuizPublic::from(&definition));
            }
        }

        Ok(response)
    }
}

/// Admin view: everything, answer key included.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonAdminResponse {
    #[serde(flatten)]
    pub lesson: LessonResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_definition: Option<QuizDefinition>,
}

impl LessonAdminResponse {
    pub fn from_entity(entity: &LessonEntity) -> DatabaseResult<Self> {
        let lesson = LessonResponse::from_entity(entity)?;
        let quiz_definition = match entity.content()? {
            LessonContent::Quiz(definition) => Some(definition),
            _ => None,
        };
        Ok(Self {
            lesson,
            quiz_definition,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SectionResponse {
    pub section: Option<String>,
    pub lessons: Vec<LessonResponse>,
}

impl SectionResponse {
    pub fn from_groups(groups: Vec<SectionGroup<LessonEntity>>) -> DatabaseResult<Vec<Self>> {
        groups
            .into_iter()
            .map(|group| {
                let lessons = group
                    .lessons
                    .iter()
                    .map(LessonResponse::from_entity)
                    .collect::<DatabaseResult<Vec<_>>>()?;
                Ok(Self {
                    section: group.section,
                    lessons,
                })
            })
            .collect()
    }
}
