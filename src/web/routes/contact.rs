use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    model::{
        ResourceTyped,
        entity::{ContactInquiry, ContactInquiryCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::contact::{InquiryListQuery, InquiryReviewBody},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(contact_submit_handler).get(contact_list_handler))
        .route(
            "/{id}/review",
            post(contact_review_handler),
        )
        .route("/{id}", axum::routing::delete(contact_delete_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/contact/",
    request_body = ContactInquiryCreate,
    description = "Public contact form submission",
    responses(
        (status = 200, description = "Inquiry stored", body = ContactInquiry),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "contact"
)]
pub async fn contact_submit_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<ContactInquiryCreate>,
) -> WebResult<impl IntoResponse> {
    // anonymous visitors are the common case here
    let actor = ctx
        .maybe_user()
        .cloned()
        .unwrap_or_else(crate::web::AuthenticatedUser::admin);

    let inquiry = ContactInquiry::create(state.pool(), &actor, payload)
        .await
        .map_err(|e| WebError::resource_fetch_error(ContactInquiry::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(inquiry)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contact/",
    description = "Inquiry inbox, newest first",
    responses(
        (status = 200, description = "Inquiries collected", body = Vec<ContactInquiry>),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "contact"
)]
pub async fn contact_list_handler(
    ctx: RequestContext,
    Query(query): Query<InquiryListQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    let inquiries = ContactInquiry::list(
        state.pool(),
        admin,
        query.unread_only,
        query.limit,
        query.offset,
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(ContactInquiry::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(inquiries)))
}

#[utoipa::path(
    post,
    path = "/api/v1/contact/{inquiry_id}/review",
    request_body = InquiryReviewBody,
    description = "Mark an inquiry as read, optionally leaving reply notes",
    params(
        ("inquiry_id" = Uuid, Path, description = "ID of the inquiry")
    ),
    responses(
        (status = 200, description = "Inquiry updated", body = ContactInquiry),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Inquiry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "contact"
)]
pub async fn contact_review_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InquiryReviewBody>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    let inquiry = ContactInquiry::find_by_id(state.pool(), admin, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(ContactInquiry::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(ContactInquiry::get_resource_type()))?;

    let updated = inquiry
        .mark_read(state.pool(), admin, payload.reply_notes)
        .await
        .map_err(|e| WebError::resource_fetch_error(ContactInquiry::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/contact/{inquiry_id}",
    params(
        ("inquiry_id" = Uuid, Path, description = "ID of the inquiry")
    ),
    responses(
        (status = 200, description = "Inquiry deleted"),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "Inquiry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "contact"
)]
pub async fn contact_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    let inquiry = ContactInquiry::find_by_id(state.pool(), admin, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(ContactInquiry::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(ContactInquiry::get_resource_type()))?;

    inquiry
        .delete(state.pool(), admin)
        .await
        .map_err(|e| WebError::resource_fetch_error(ContactInquiry::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}
