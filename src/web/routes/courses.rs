use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, put},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    content,
    model::{
        CrudRepository, ResourceTyped,
        entity::{CourseEntity, LessonCreate, LessonEntity},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            courses::{CourseCreateBody, CourseResponse, CourseUpdateBody},
            lessons::{LessonAdminResponse, LessonCreateBody, ReorderBody, SectionResponse},
        },
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(courses_list_handler).post(courses_create_handler))
        .route(
            "/{id}",
            get(courses_get_handler)
                .put(courses_update_handler)
                .delete(courses_delete_handler),
        )
        .route(
            "/{id}/lessons",
            get(courses_lessons_handler).post(courses_add_lesson_handler),
        )
        .route("/{id}/lessons/reorder", put(courses_reorder_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    #[serde(default = "CatalogQuery::default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl CatalogQuery {
    fn default_limit() -> i64 {
        20
    }
}

pub async fn course_response(
    state: &AppState,
    ctx: &RequestContext,
    course: &CourseEntity,
) -> WebResult<CourseResponse> {
    let actor = ctx
        .maybe_user()
        .cloned()
        .unwrap_or_else(crate::web::AuthenticatedUser::admin);
    let stats = CourseEntity::stats(state.pool(), &actor, course.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?;
    Ok(CourseResponse::from_entity(course, stats))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/",
    description = "Browse the course catalog. Unpublished courses are only visible to admins",
    params(
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("difficulty" = Option<String>, Query, description = "Filter by difficulty level"),
    ),
    responses(
        (status = 200, description = "Courses collected", body = Vec<CourseResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn courses_list_handler(
    ctx: RequestContext,
    Query(query): Query<CatalogQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let is_admin = ctx.maybe_user().is_some_and(|u| u.is_admin());
    let actor = ctx
        .maybe_user()
        .cloned()
        .unwrap_or_else(crate::web::AuthenticatedUser::admin);

    let courses = CourseEntity::list_catalog(
        state.pool(),
        &actor,
        !is_admin,
        query.category.as_deref(),
        query.difficulty.as_deref(),
        query.limit,
        query.offset,
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?;

    let mut out = Vec::with_capacity(courses.len());
    for course in &courses {
        out.push(course_response(&state, &ctx, course).await?);
    }

    Ok((StatusCode::OK, Json(out)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course to get")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn courses_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let course = fetch_visible_course(&state, &ctx, id).await?;
    let response = course_response(&state, &ctx, &course).await?;
    Ok((StatusCode::OK, Json(response)))
}

/// 404s unpublished courses for everyone below admin, so drafts do not leak.
pub async fn fetch_visible_course(
    state: &AppState,
    ctx: &RequestContext,
    id: Uuid,
) -> WebResult<CourseEntity> {
    let actor = ctx
        .maybe_user()
        .cloned()
        .unwrap_or_else(crate::web::AuthenticatedUser::admin);
    let course = CourseEntity::find_by_id(state.pool(), &actor, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(CourseEntity::get_resource_type()))?;

    let is_admin = ctx.maybe_user().is_some_and(|u| u.is_admin());
    if !course.is_published() && !is_admin {
        return Err(WebError::resource_not_found(CourseEntity::get_resource_type()));
    }
    Ok(course)
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/",
    request_body = CourseCreateBody,
    responses(
        (status = 200, description = "Course created", body = CourseResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
pub async fn courses_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<CourseCreateBody>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    let data = payload.into_create()?;
    let course = CourseEntity::create(state.pool(), admin, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?;

    let response = course_response(&state, &ctx, &course).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{course_id}",
    request_body = CourseUpdateBody,
    params(
        ("course_id" = Uuid, Path, description = "ID of the course to update")
    ),
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
pub async fn courses_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CourseUpdateBody>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    let course = CourseEntity::find_by_id(state.pool(), admin, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(CourseEntity::get_resource_type()))?;

    let data = payload.fields.into_create()?;
    let mut course = course
        .update(state.pool(), admin, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?;

    if let Some(published) = payload.is_published {
        course = course
            .set_published(state.pool(), admin, published)
            .await
            .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?;
    }

    let response = course_response(&state, &ctx, &course).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{course_id}",
    description = "Deletes the course and everything hanging off it",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course to delete")
    ),
    responses(
        (status = 200, description = "Course deleted"),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
pub async fn courses_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    let course = CourseEntity::find_by_id(state.pool(), admin, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(CourseEntity::get_resource_type()))?;

    course
        .delete(state.pool(), admin)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}/lessons",
    description = "Lessons grouped by section in course order. Admins also see unpublished lessons",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Lessons collected", body = Vec<SectionResponse>),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses"
)]
pub async fn courses_lessons_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let course = fetch_visible_course(&state, &ctx, id).await?;
    let is_admin = ctx.maybe_user().is_some_and(|u| u.is_admin());
    let actor = ctx
        .maybe_user()
        .cloned()
        .unwrap_or_else(crate::web::AuthenticatedUser::admin);

    let lessons = LessonEntity::all_by_course(state.pool(), &actor, course.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;

    let groups = content::ordered_sections(lessons, is_admin);
    let sections = SectionResponse::from_groups(groups)
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(sections)))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/{course_id}/lessons",
    request_body = LessonCreateBody,
    description = "Appends a lesson to the course. The payload must match its declared content type",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Lesson created", body = LessonAdminResponse),
        (status = 400, description = "Payload does not match the content type", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
pub async fn courses_add_lesson_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LessonCreateBody>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    let course = CourseEntity::find_by_id(state.pool(), admin, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(CourseEntity::get_resource_type()))?;

    let lesson_content = payload.assemble_content()?;
    let data = LessonCreate::from_content(
        course.id(),
        payload.title,
        payload.description,
        payload.section,
        payload.is_published,
        payload.is_free_preview,
        &lesson_content,
    )
    .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;

    let lesson = LessonEntity::create(state.pool(), admin, data)
        .await
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;

    let response = LessonAdminResponse::from_entity(&lesson)
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{course_id}/lessons/reorder",
    request_body = ReorderBody,
    description = "Accepts an exact permutation of the course's lesson ids",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Order applied"),
        (status = 400, description = "Not a permutation of the current lessons", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "courses",
    security(
        ("cookie" = [])
    )
)]
pub async fn courses_reorder_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReorderBody>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    let course = CourseEntity::find_by_id(state.pool(), admin, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(CourseEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(CourseEntity::get_resource_type()))?;

    let current = LessonEntity::ids_by_course(state.pool(), admin, course.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;

    content::validate_reorder(&current, &payload.order)?;

    LessonEntity::apply_order(state.pool(), admin, course.id(), &payload.order)
        .await
        .map_err(|e| WebError::resource_fetch_error(LessonEntity::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}
