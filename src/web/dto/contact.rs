use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct InquiryReviewBody {
    /// Free-form notes an admin leaves when handling the inquiry.
    pub reply_notes: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct InquiryListQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: i64,
    pub offset: i64,
}
