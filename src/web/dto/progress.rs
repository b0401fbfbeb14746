use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::GradeReport;
use crate::model::entity::{Enrollment, QuizAttempt};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTime<Utc>,
}

impl From<&Enrollment> for EnrollmentResponse {
    fn from(enrollment: &Enrollment) -> Self {
        Self {
            id: enrollment.id(),
            course_id: enrollment.course_id(),
            enrolled_at: enrollment.enrolled_at(),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct QuizSubmission {
    /// question id -> selected option index
    #[schema(value_type = Object)]
    pub answers: HashMap<u32, u8>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct QuizResultResponse {
    pub score: u32,
    pub max_score: u32,
    pub percentage: u8,
    pub passed: bool,
    /// Revealed after grading so the client can show corrections.
    #[schema(value_type = Object)]
    pub correct_answers: HashMap<u32, u8>,
}

impl QuizResultResponse {
    pub fn new(report: GradeReport, correct_answers: HashMap<u32, u8>) -> Self {
        Self {
            score: report.score,
            max_score: report.max_score,
            percentage: report.percentage,
            passed: report.passed,
            correct_answers,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct QuizAttemptResponse {
    pub id: Uuid,
    pub score: i32,
    pub max_score: i32,
    pub percentage: i32,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
}

impl From<&QuizAttempt> for QuizAttemptResponse {
    fn from(attempt: &QuizAttempt) -> Self {
        Self {
            id: attempt.id(),
            score: attempt.score(),
            max_score: attempt.max_score(),
            percentage: attempt.percentage(),
            passed: attempt.passed(),
            submitted_at: attempt.submitted_at(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LessonProgressStatus {
    pub lesson_id: Uuid,
    pub title: String,
    pub content_type: String,
    pub position: i32,
    pub is_completed: bool,
    /// Sequential gating: first lesson, or everything before it is complete.
    pub is_unlocked: bool,
    pub last_score: Option<i32>,
    pub passing_score: Option<u8>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CourseProgressResponse {
    pub course_id: Uuid,
    /// Completed published lessons over total published lessons, rounded.
    pub percentage: i32,
    pub lessons: Vec<LessonProgressStatus>,
}
