use std::collections::HashMap;

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
    content::ContentType,
    model::{
        CrudRepository, ResourceTyped,
        entity::{Enrollment, LessonCreate, LessonEntity, LessonProgress, QuizAttempt},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            lessons::{LessonAdminResponse, LessonCreateBody, LessonResponse},
            progress::{QuizAttemptResponse, QuizResultResponse, QuizSubmission},
        },
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route(
            "/{id}",
            get(lessons_get_handler)
                .put(lessons_update_handler)
                .delete(lessons_delete_handler),
        )
        .route("/{id}/complete", post(lessons_complete_handler))
        .route("/{id}/quiz/submit", post(lessons_quiz_submit_handler))
        .route("/{id}/quiz/attempts", get(lessons_quiz_attempts_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

pub async fn fetch_lesson(state: &AppState, ctx: &RequestContext, id: Uuid) -> WebResult<LessonEntity> {
    let actor = ctx
        .maybe_user()
        .cloned()
        .unwrap_or_else(crate::web::AuthenticatedUser::admin);
    LessonEntity::find_by_id(state.pool(), &actor, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(LessonEntity::get_resource_type()))
}

/// Access gate: free-preview lessons are open to everyone, otherwise the
/// caller must hold an enrollment in the lesson's course or be an admin.
pub async fn ensure_lesson_access(
    state: &AppState,
    ctx: &RequestContext,
    lesson: &LessonEntity,
) -> WebResult<()> {
    if lesson.is_free_preview() {
        return Ok(());
    }

    let user = ctx.user()?;
    if user.is_admin() {
        return Ok(());
    }

    // drafts stay invisible to learners, enrolled or not
    if !lesson.is_published() {
        return Err(WebError::resource_not_found(LessonEntity::get_resource_type()));
    }

    let enrollment = Enrollment::find(state.pool(), user, user.user_id(), lesson.course_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    if enrollment.is_none() {
        return Err(WebError::enrollment_required());
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/{lesson_id}",
    description = "Fetch a lesson with its content. Quiz answer keys are only included for admins",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to get")
    ),
    responses(
        (status = 200, description = "Lesson found", body = LessonResponse),
        (status = 403, description = "Not enrolled in this course", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub async fn lessons_get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<axum::response::Response> {
    let lesson = fetch_lesson(&state, &ctx, id).await?;
    ensure_lesson_access(&state, &ctx, &lesson).await?;

    let is_admin = ctx.maybe_user().is_some_and(|u| u.is_admin());
    if is_admin {
        let response = LessonAdminResponse::from_entity(&lesson)
            .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;
        return Ok((StatusCode::OK, Json(response)).into_response());
    }

    let response = LessonResponse::from_entity(&lesson)
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;
    Ok((StatusCode::OK, Json(response)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/v1/lessons/{lesson_id}",
    request_body = LessonCreateBody,
    description = "Replaces the lesson, revalidating the payload against its declared content type",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to update")
    ),
    responses(
        (status = 200, description = "Lesson updated", body = LessonAdminResponse),
        (status = 400, description = "Payload does not match the content type", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub async fn lessons_update_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
    Json(payload): Json<LessonCreateBody>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;
    let lesson = fetch_lesson(&state, &ctx, id).await?;

    let lesson_content = payload.assemble_content()?;
    let data = LessonCreate::from_content(
        lesson.course_id(),
        payload.title,
        payload.description,
        payload.section,
        payload.is_published,
        payload.is_free_preview,
        &lesson_content,
    )
    .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;

    let updated = lesson
        .update(state.pool(), admin, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;

    let response = LessonAdminResponse::from_entity(&updated)
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/lessons/{lesson_id}",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to delete")
    ),
    responses(
        (status = 200, description = "Lesson deleted"),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub async fn lessons_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;
    let lesson = fetch_lesson(&state, &ctx, id).await?;

    lesson
        .delete(state.pool(), admin)
        .await
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons/{lesson_id}/complete",
    description = "Mark a video or text lesson as completed. Quiz lessons complete by passing the quiz",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the lesson to mark")
    ),
    responses(
        (status = 200, description = "Lesson marked"),
        (status = 400, description = "Quiz lessons cannot be completed this way", body = ErrorResponse),
        (status = 403, description = "Not enrolled in this course", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub async fn lessons_complete_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let lesson = fetch_lesson(&state, &ctx, id).await?;
    ensure_lesson_access(&state, &ctx, &lesson).await?;
    let user = ctx.user()?;

    let kind = lesson
        .content_type()
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;
    if kind == ContentType::Quiz {
        return Err(WebError::resource_bad_request(
            LessonEntity::get_resource_type(),
            "quiz lessons are completed by passing the quiz",
        ));
    }

    LessonProgress::mark_complete(state.pool(), user, user.user_id(), lesson.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(LessonProgress::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons/{lesson_id}/quiz/submit",
    request_body = QuizSubmission,
    description = "Grade a quiz submission. The attempt is recorded and the lesson completes on a pass",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the quiz lesson")
    ),
    responses(
        (status = 200, description = "Submission graded", body = QuizResultResponse),
        (status = 400, description = "Lesson is not a quiz", body = ErrorResponse),
        (status = 403, description = "Not enrolled in this course", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub async fn lessons_quiz_submit_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
    Json(submission): Json<QuizSubmission>,
) -> WebResult<impl IntoResponse> {
    let lesson = fetch_lesson(&state, &ctx, id).await?;
    ensure_lesson_access(&state, &ctx, &lesson).await?;
    let user = ctx.user()?;

    let kind = lesson
        .content_type()
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;
    if kind != ContentType::Quiz {
        return Err(WebError::resource_bad_request(
            LessonEntity::get_resource_type(),
            "this lesson is not a quiz",
        ));
    }

    let definition = lesson
        .quiz_definition()
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;

    let report = definition.grade(&submission.answers);

    QuizAttempt::record(
        state.pool(),
        user,
        user.user_id(),
        lesson.id(),
        &submission.answers,
        &report,
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(QuizAttempt::get_resource_type(), e))?;

    LessonProgress::record_quiz_outcome(state.pool(), user, user.user_id(), lesson.id(), &report)
        .await
        .map_err(|e| WebError::resource_fetch_error(LessonProgress::get_resource_type(), e))?;

    let correct_answers: HashMap<u32, u8> = definition
        .questions
        .iter()
        .map(|q| (q.id, q.correct_answer))
        .collect();

    Ok((
        StatusCode::OK,
        Json(QuizResultResponse::new(report, correct_answers)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/{lesson_id}/quiz/attempts",
    description = "The caller's attempt history for this quiz, newest first",
    params(
        ("lesson_id" = Uuid, Path, description = "ID of the quiz lesson")
    ),
    responses(
        (status = 200, description = "Attempts collected", body = Vec<QuizAttemptResponse>),
        (status = 403, description = "Not enrolled in this course", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "lessons"
)]
pub async fn lessons_quiz_attempts_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let lesson = fetch_lesson(&state, &ctx, id).await?;
    ensure_lesson_access(&state, &ctx, &lesson).await?;
    let user = ctx.user()?;

    let attempts = QuizAttempt::list_for_lesson(state.pool(), user, user.user_id(), lesson.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(QuizAttempt::get_resource_type(), e))?;

    let out: Vec<QuizAttemptResponse> = attempts.iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(out)))
}
