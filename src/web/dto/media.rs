use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct MediaUploadQuery {
    /// Original client-side filename; the stored name is derived from it.
    pub filename: String,
    pub folder: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct MediaListQuery {
    pub folder: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
