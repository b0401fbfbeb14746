use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    content,
    model::{
        CrudRepository, DatabaseError, ResourceTyped,
        entity::{CourseEntity, Enrollment, LessonEntity, LessonProgress},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::progress::{CourseProgressResponse, EnrollmentResponse, LessonProgressStatus},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(enrollments_list_handler))
        .route(
            "/{course_id}",
            post(enrollments_enroll_handler).delete(enrollments_unenroll_handler),
        )
        .route("/{course_id}/progress", get(enrollments_progress_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/enrollments/{course_id}",
    description = "Enroll the current user. At most one enrollment per user and course",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course to enroll in")
    ),
    responses(
        (status = 200, description = "Enrolled", body = EnrollmentResponse),
        (status = 400, description = "Course not open for enrollment", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Already enrolled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "enrollments"
)]
pub async fn enrollments_enroll_handler(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let course = CourseEntity::find_by_id(state.pool(), user, course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(CourseEntity::get_resource_type()))?;

    if !course.is_published() && !user.is_admin() {
        return Err(WebError::course_unavailable());
    }

    let enrollment = Enrollment::enroll(state.pool(), user, user.user_id(), course.id())
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict => WebError::enrollment_conflict(),
            e => WebError::resource_fetch_error(Enrollment::get_resource_type(), e),
        })?;

    Ok((StatusCode::OK, Json(EnrollmentResponse::from(&enrollment))))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/",
    description = "The current user's enrollments",
    responses(
        (status = 200, description = "Enrollments collected", body = Vec<EnrollmentResponse>),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "enrollments"
)]
pub async fn enrollments_list_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let enrollments = Enrollment::list_for_user(state.pool(), user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    let out: Vec<EnrollmentResponse> = enrollments.iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(out)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/enrollments/{course_id}",
    description = "Drop the enrollment. Progress rows are kept in case the user re-enrolls",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course to leave")
    ),
    responses(
        (status = 200, description = "Unenrolled"),
        (status = 404, description = "No enrollment for this course", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "enrollments"
)]
pub async fn enrollments_unenroll_handler(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let removed = Enrollment::unenroll(state.pool(), user, user.user_id(), course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    if !removed {
        return Err(WebError::resource_not_found(Enrollment::get_resource_type()));
    }
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/{course_id}/progress",
    description = "Per-lesson completion for the current user plus the rounded course percentage",
    params(
        ("course_id" = Uuid, Path, description = "ID of the enrolled course")
    ),
    responses(
        (status = 200, description = "Progress collected", body = CourseProgressResponse),
        (status = 403, description = "Not enrolled in this course", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "enrollments"
)]
pub async fn enrollments_progress_handler(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;

    let course = CourseEntity::find_by_id(state.pool(), user, course_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(CourseEntity::get_resource_type()))?;

    if !user.is_admin() {
        let enrollment = Enrollment::find(state.pool(), user, user.user_id(), course.id())
            .await
            .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;
        if enrollment.is_none() {
            return Err(WebError::enrollment_required());
        }
    }

    let (total_published, completed) = tokio::try_join!(
        LessonEntity::count_published(state.pool(), user, course.id()),
        LessonProgress::count_completed_published(state.pool(), user, user.user_id(), course.id()),
    )
    .map_err(|e| WebError::resource_fetch_error(LessonProgress::get_resource_type(), e))?;

    let percentage = content::progress_percentage(completed, total_published);

    let lessons = LessonEntity::all_by_course(state.pool(), user, course.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;
    let progress = LessonProgress::all_for_course(state.pool(), user, user.user_id(), course.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(LessonProgress::get_resource_type(), e))?;
    let progress_by_lesson: std::collections::HashMap<Uuid, &LessonProgress> =
        progress.iter().map(|p| (p.lesson_id(), p)).collect();

    let mut statuses = Vec::new();
    let mut previous_completed = true; // the first lesson is always unlocked
    for lesson in lessons.iter().filter(|l| l.is_published()) {
        let record = progress_by_lesson.get(&lesson.id());
        let is_completed = record.is_some_and(|p| p.is_completed());
        let kind = lesson
            .content_type()
            .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;

        statuses.push(LessonProgressStatus {
            lesson_id: lesson.id(),
            title: lesson.title().to_string(),
            content_type: kind.to_string(),
            position: lesson.position(),
            is_completed,
            is_unlocked: previous_completed,
            last_score: record.and_then(|p| p.last_score()),
            passing_score: (kind == crate::content::ContentType::Quiz)
                .then(|| u8::try_from(lesson.quiz_passing_score()).unwrap_or(100)),
            completed_at: record.and_then(|p| p.completed_at()),
        });

        previous_completed = is_completed;
    }

    Ok((
        StatusCode::OK,
        Json(CourseProgressResponse {
            course_id: course.id(),
            percentage,
            lessons: statuses,
        }),
    ))
}
