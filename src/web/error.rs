use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{
    auth::CryptError,
    content::{ValidationError, Violation},
    error::log_error,
    model::{DatabaseError, ResourceType},
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("RegistrationUserConflict")]
    RegistrationUserConflict,
}

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("AuthenticationCookieNotFound, cookie: {cookie}")]
    AuthenticationCookieNotFound { cookie: String },

    #[error("AuthenticationCookieInvalid, cookie: {cookie}. Error: {error}")]
    AuthenticationCookieInvalid {
        cookie: String,
        error: jsonwebtoken::errors::Error,
    },

    #[error("AuthenticationRequired")]
    AuthenticationRequired,

    #[error("AuthenticationAdminRequired")]
    AuthenticationAdminRequired,

    #[error("AuthenticationInvalidCredentials")]
    AuthenticationInvalidCredentials,
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type:?}")]
    ResourceNotFound { resource_type: ResourceType },

    #[error("ResourceForbidden: {resource_type:?}")]
    ResourceForbidden { resource_type: ResourceType },

    #[error("ResourceFetchError: {resource_type:?}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceBadRequest: {resource_type:?}, {details}")]
    ResourceBadRequest {
        resource_type: ResourceType,
        details: String,
    },
}

#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("EnrollmentConflict")]
    EnrollmentConflict,

    #[error("EnrollmentRequired")]
    EnrollmentRequired,

    #[error("EnrollmentCourseUnavailable")]
    EnrollmentCourseUnavailable,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("ServerCryptError: {0}")]
    ServerCryptError(#[from] crate::auth::CryptError),

    #[error("ServerIoError: {0}")]
    ServerIoError(#[from] std::io::Error),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn client_display(&self) -> String {
        String::from("Internal server error.")
    }
}

impl RegistrationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RegistrationUserConflict => StatusCode::CONFLICT,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::RegistrationUserConflict => {
                String::from("Registration error, user already exists.")
            }
        }
    }
}

impl AuthenticationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::AuthenticationAdminRequired => StatusCode::FORBIDDEN,
            Self::AuthenticationCookieNotFound { .. } => StatusCode::NOT_FOUND,
            Self::AuthenticationInvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::AuthenticationCookieInvalid { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::AuthenticationCookieInvalid { .. } => {
                String::from("Authentication error, cookie invalid.")
            }
            Self::AuthenticationCookieNotFound { .. } => {
                String::from("Authentication error, cookie not found.")
            }
            Self::AuthenticationRequired => String::from("Authentication required."),
            Self::AuthenticationAdminRequired => {
                String::from("Authentication error, administrator access required.")
            }
            Self::AuthenticationInvalidCredentials => {
                String::from("Authentication error, user not found or password is invalid.")
            }
        }
    }
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceForbidden { .. } => StatusCode::FORBIDDEN,
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ResourceBadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceNotFound { .. } => String::from("Resource error, resource not found."),
            Self::ResourceForbidden { .. } => String::from("Resource error, resource forbidden."),
            Self::ResourceFetchError { .. } => {
                String::from("Resource error, unable to fetch resource.")
            }
            Self::ResourceBadRequest { details, .. } => {
                format!("Resource error, bad request: {details}")
            }
        }
    }
}

impl EnrollmentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EnrollmentConflict => StatusCode::CONFLICT,
            Self::EnrollmentRequired => StatusCode::FORBIDDEN,
            Self::EnrollmentCourseUnavailable => StatusCode::BAD_REQUEST,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::EnrollmentConflict => String::from("Enrollment error, already enrolled."),
            Self::EnrollmentRequired => {
                String::from("Enrollment error, you are not enrolled in this course.")
            }
            Self::EnrollmentCourseUnavailable => {
                String::from("Enrollment error, this course is not available for enrollment.")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
    #[error("AuthenticationError - {0}")]
    AuthenticationError(#[from] AuthenticationError),
    #[error("RegistrationError - {0}")]
    RegistrationError(#[from] RegistrationError),
    #[error("EnrollmentError - {0}")]
    EnrollmentError(#[from] EnrollmentError),
    #[error("ValidationError - {0}")]
    ValidationError(#[from] ValidationError),
    #[error("ServerError - {0}")]
    ServerError(#[from] ServerError),
}

impl WebError {
    pub fn resource_not_found(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
        })
    }

    pub fn resource_forbidden(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceForbidden {
            resource_type: r#type,
        })
    }

    pub fn resource_fetch_error(r#type: ResourceType, error: DatabaseError) -> Self {
        Self::ResourceError(ResourceError::ResourceFetchError {
            resource_type: r#type,
            error,
        })
    }

    pub fn resource_bad_request<S: Into<String>>(r#type: ResourceType, details: S) -> Self {
        Self::ResourceError(ResourceError::ResourceBadRequest {
            resource_type: r#type,
            details: details.into(),
        })
    }

    pub fn auth_cookie_not_found<S: Into<String>>(cookie: S) -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationCookieNotFound {
            cookie: cookie.into(),
        })
    }

    pub fn auth_cookie_invalid<S: Into<String>>(
        cookie: S,
        error: jsonwebtoken::errors::Error,
    ) -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationCookieInvalid {
            cookie: cookie.into(),
            error,
        })
    }

    pub fn auth_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationRequired)
    }

    pub fn admin_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationAdminRequired)
    }

    pub fn auth_invalid_credentials() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationInvalidCredentials)
    }

    pub fn registration_conflict() -> Self {
        Self::RegistrationError(RegistrationError::RegistrationUserConflict)
    }

    pub fn enrollment_conflict() -> Self {
        Self::EnrollmentError(EnrollmentError::EnrollmentConflict)
    }

    pub fn enrollment_required() -> Self {
        Self::EnrollmentError(EnrollmentError::EnrollmentRequired)
    }

    pub fn course_unavailable() -> Self {
        Self::EnrollmentError(EnrollmentError::EnrollmentCourseUnavailable)
    }

    pub fn server_crypt_error(e: CryptError) -> Self {
        Self::ServerError(ServerError::ServerCryptError(e))
    }

    pub fn server_io_error(e: std::io::Error) -> Self {
        Self::ServerError(ServerError::ServerIoError(e))
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            Self::ResourceError(e) => e.status_code(),
            Self::RegistrationError(e) => e.status_code(),
            Self::AuthenticationError(e) => e.status_code(),
            Self::EnrollmentError(e) => e.status_code(),
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::ServerError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceError(e) => e.client_display(),
            Self::RegistrationError(e) => e.client_display(),
            Self::AuthenticationError(e) => e.client_display(),
            Self::EnrollmentError(e) => e.client_display(),
            Self::ValidationError(e) => format!("Validation error: {e}"),
            Self::ServerError(e) => e.client_display(),
        }
    }

    fn violations(&self) -> Option<Vec<Violation>> {
        match self {
            Self::ValidationError(e) => Some(e.violations().to_vec()),
            _ => None,
        }
    }
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code (stringified)
    pub status_code: String,
    /// Per-field violations for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
    /// Optional debug details (only in debug mode)
    pub details: Option<String>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        log_error(&self);

        let status_code = self.status_code();
        let display = self.client_display();
        let violations = self.violations();

        let body = ErrorResponse {
            message: display,
            status_code: status_code.as_str().to_string(),
            violations,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        };

        (status_code, Json(body)).into_response()
    }
}
