use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};

use crate::{
    model::{
        ResourceTyped,
        entity::{SiteConfigEntity, SiteConfigUpdate},
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::site::SiteConfigResponse, error::ErrorResponse, middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(site_get_handler).put(site_update_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/site/",
    description = "Public site configuration including the homepage builder sections",
    responses(
        (status = 200, description = "Site configuration", body = SiteConfigResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "site"
)]
pub async fn site_get_handler(State(state): State<AppState>) -> WebResult<impl IntoResponse> {
    // homepage rendering needs this without a session
    let actor = AuthenticatedUser::admin();
    let config = SiteConfigEntity::get(state.pool(), &actor)
        .await
        .map_err(|e| WebError::resource_fetch_error(SiteConfigEntity::get_resource_type(), e))?;

    let response = SiteConfigResponse::from_entity(&config)
        .map_err(|e| WebError::resource_fetch_error(SiteConfigEntity::get_resource_type(), e))?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/v1/site/",
    request_body = SiteConfigUpdate,
    description = "Replace the whole site configuration. The builder always submits a full document",
    responses(
        (status = 200, description = "Configuration saved", body = SiteConfigResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "site"
)]
pub async fn site_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<SiteConfigUpdate>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    let updated = SiteConfigEntity::replace(state.pool(), admin, payload)
        .await
        .map_err(|e| WebError::resource_fetch_error(SiteConfigEntity::get_resource_type(), e))?;

    let response = SiteConfigResponse::from_entity(&updated)
        .map_err(|e| WebError::resource_fetch_error(SiteConfigEntity::get_resource_type(), e))?;
    Ok((StatusCode::OK, Json(response)))
}
