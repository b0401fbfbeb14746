mod common;
use axum::http::StatusCode;
use serde_json::json;

use crate::common::{Action, Flow, setup_server, setup_test_db, signin_admin_action, signup_action};

#[tokio::test]
async fn route_site_config_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    let full_config = json!({
        "site_name": "Night School",
        "site_description": "Learn after dark",
        "contact_email": "hello@nightschool.test",
        "primary_color": "#112233",
        "hero": {
            "title": "Welcome in",
            "subtitle": "Pick a course",
            "button_text": "Browse",
            "button_link": "/courses",
            "background_image": null,
        },
        "features": [
            {"icon": "zap", "title": "Fast", "description": "Short lessons"},
        ],
        "stats": [
            {"number": "1000+", "label": "Students"},
        ],
        "testimonials": [
            {"name": "Ada", "role": "Engineer", "text": "Great", "image": null},
        ],
        "gallery": [
            {"url": "/static/campus.jpg", "title": "Campus", "description": "Our campus"},
        ],
        "cta": {
            "title": "Ready?",
            "subtitle": "Join now",
            "button_text": "Sign up",
            "button_link": "/register",
        },
        "footer_links": [
            {"title": "About", "url": "/about"},
        ],
    });

    Flow::new()
        // defaults exist before anyone configured anything
        .step(
            Action::new("site_defaults", "GET", "/api/v1/site/")
                .assert_body(|body| assert!(body.contains("\"site_name\":\"Campus\""))),
        )
        // the builder is an admin surface
        .step(signup_action("decorator", "hunter2"))
        .step(
            Action::new("site_update_denied", "PUT", "/api/v1/site/")
                .with_body(full_config.clone())
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(signin_admin_action().with_clear_cookies(true))
        .step(
            Action::new("site_update", "PUT", "/api/v1/site/")
                .with_body(full_config)
                .assert_body(|body| {
                    assert!(body.contains("Night School"));
                    assert!(body.contains("1000+"));
                }),
        )
        // the saved sections come back typed on the public endpoint
        .step(
            Action::new("site_public", "GET", "/api/v1/site/")
                .with_clear_cookies(true)
                .with_save_cookies(false)
                .assert_body(|body| {
                    assert!(body.contains("Night School"));
                    assert!(body.contains("\"label\":\"Students\""));
                    assert!(body.contains("\"name\":\"Ada\""));
                }),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_contact_inquiry_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        // anyone can write in
        .step(
            Action::new("submit_inquiry", "POST", "/api/v1/contact/")
                .with_save_cookies(false)
                .with_body(json!({
                    "name": "Visitor",
                    "email": "visitor@example.test",
                    "subject": "general",
                    "message": "When do enrollments open?",
                }))
                .with_save_as("inquiry"),
        )
        // the inbox is admin-only
        .step(
            Action::new("inbox_denied", "GET", "/api/v1/contact/")
                .with_param("limit", "10")
                .with_param("offset", "0")
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .step(signin_admin_action())
        .step(
            Action::new("inbox", "GET", "/api/v1/contact/")
                .with_param("limit", "10")
                .with_param("offset", "0")
                .assert_body(|body| {
                    assert!(body.contains("When do enrollments open?"));
                    assert!(body.contains("\"is_read\":false"));
                }),
        )
        .step(
            Action::new("review_inquiry", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/contact/{}/review", ctx.id_of("inquiry")))
                .with_body(json!({"reply_notes": "answered by mail"}))
                .assert_body(|body| assert!(body.contains("\"is_read\":true"))),
        )
        // read inquiries drop out of the unread filter
        .step(
            Action::new("inbox_unread", "GET", "/api/v1/contact/")
                .with_param("limit", "10")
                .with_param("offset", "0")
                .with_param("unread_only", "true")
                .assert_body(|body| assert!(!body.contains("Visitor"))),
        )
        .step(
            Action::new("delete_inquiry", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/contact/{}", ctx.id_of("inquiry"))),
        )
        .run(&mut server, pool)
        .await;
}
