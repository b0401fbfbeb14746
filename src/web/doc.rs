use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "SID",
                    "JWT token for current user",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::user::user_signup_handler,
        crate::web::routes::user::user_signin_handler,
        crate::web::routes::user::user_list_handler,
        crate::web::routes::user::user_update_handler,
        crate::web::routes::user::user_delete_handler,
        crate::web::routes::courses::courses_list_handler,
        crate::web::routes::courses::courses_get_handler,
        crate::web::routes::courses::courses_create_handler,
        crate::web::routes::courses::courses_update_handler,
        crate::web::routes::courses::courses_delete_handler,
        crate::web::routes::courses::courses_lessons_handler,
        crate::web::routes::courses::courses_add_lesson_handler,
        crate::web::routes::courses::courses_reorder_handler,
        crate::web::routes::lessons::lessons_get_handler,
        crate::web::routes::lessons::lessons_update_handler,
        crate::web::routes::lessons::lessons_delete_handler,
        crate::web::routes::lessons::lessons_complete_handler,
        crate::web::routes::lessons::lessons_quiz_submit_handler,
        crate::web::routes::lessons::lessons_quiz_attempts_handler,
        crate::web::routes::enrollments::enrollments_enroll_handler,
        crate::web::routes::enrollments::enrollments_list_handler,
        crate::web::routes::enrollments::enrollments_unenroll_handler,
        crate::web::routes::enrollments::enrollments_progress_handler,
        crate::web::routes::site::site_get_handler,
        crate::web::routes::site::site_update_handler,
        crate::web::routes::contact::contact_submit_handler,
        crate::web::routes::contact::contact_list_handler,
        crate::web::routes::contact::contact_review_handler,
        crate::web::routes::contact::contact_delete_handler,
        crate::web::routes::media::media_upload_handler,
        crate::web::routes::media::media_list_handler,
        crate::web::routes::media::media_delete_handler,
    ),
    modifiers(&CookieAuthModifier),
)]
pub struct ApiDoc;
