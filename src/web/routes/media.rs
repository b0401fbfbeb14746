use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    Config,
    model::{
        ResourceTyped,
        entity::{MediaFile, MediaFileCreate},
    },
    utils::uploads,
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::media::{MediaListQuery, MediaUploadQuery},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/upload", post(media_upload_handler))
        .route("/", get(media_list_handler))
        .route("/{id}", delete(media_delete_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/media/upload",
    description = "Upload a file into the media library. The body is the raw file content",
    request_body(content = Vec<u8>, description = "Raw file content", content_type = "application/octet-stream"),
    params(
        ("filename" = String, Query, description = "Original filename, used to derive the media kind"),
        ("folder" = Option<String>, Query, description = "Library folder, defaults to 'general'"),
    ),
    responses(
        (status = 200, description = "File stored", body = MediaFile),
        (status = 400, description = "File type not allowed", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "media"
)]
pub async fn media_upload_handler(
    ctx: RequestContext,
    Query(query): Query<MediaUploadQuery>,
    State(state): State<AppState>,
    body: Bytes,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    let kind = uploads::kind_for(&query.filename).ok_or_else(|| {
        WebError::resource_bad_request(
            MediaFile::get_resource_type(),
            "file type is not allowed",
        )
    })?;

    let config = Config::get_or_init(false).await;
    let dir = uploads::get_uploads_dir(config.app().uploads_dir())
        .map_err(WebError::server_io_error)?;
    let filename = uploads::storage_filename(&query.filename);

    uploads::store_file(&dir, &filename, &body)
        .await
        .map_err(WebError::server_io_error)?;

    let record = MediaFile::create(
        state.pool(),
        admin,
        MediaFileCreate {
            filename,
            original_filename: query.filename,
            kind: kind.to_string(),
            file_size: body.len() as i64,
            folder: query.folder.unwrap_or_else(|| String::from("general")),
        },
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(MediaFile::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/v1/media/",
    description = "Browse the media library, optionally scoped to a folder",
    responses(
        (status = 200, description = "Files collected", body = Vec<MediaFile>),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "media"
)]
pub async fn media_list_handler(
    ctx: RequestContext,
    Query(query): Query<MediaListQuery>,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    let files = MediaFile::list(
        state.pool(),
        admin,
        query.folder.as_deref(),
        query.limit,
        query.offset,
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(MediaFile::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(files)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/media/{file_id}",
    description = "Remove a file from the library and from disk",
    params(
        ("file_id" = Uuid, Path, description = "ID of the media file")
    ),
    responses(
        (status = 200, description = "File deleted"),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "media"
)]
pub async fn media_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let admin = ctx.admin_user()?;

    let file = MediaFile::find_by_id(state.pool(), admin, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(MediaFile::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(MediaFile::get_resource_type()))?;

    let config = Config::get_or_init(false).await;
    let dir = uploads::get_uploads_dir(config.app().uploads_dir())
        .map_err(WebError::server_io_error)?;
    uploads::remove_file(&dir, file.filename())
        .await
        .map_err(WebError::server_io_error)?;

    file.delete(state.pool(), admin)
        .await
        .map_err(|e| WebError::resource_fetch_error(MediaFile::get_resource_type(), e))?;

    Ok(StatusCode::OK)
}
