mod common;
use axum::http::StatusCode;
use serde_json::json;

use crate::common::{
    Action, Flow, create_course_action, publish_course_action, setup_server, setup_test_db,
    signin_admin_action, signup_action,
};

#[tokio::test]
async fn route_course_crud_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        // regular users cannot author courses
        .step(signup_action("learner", "hunter2"))
        .step(
            Action::new("create_course_denied", "POST", "/api/v1/courses/")
                .with_body(json!({"title": "Nope"}))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(signin_admin_action().with_clear_cookies(true))
        .step(
            Action::new("create_course_bad_difficulty", "POST", "/api/v1/courses/")
                .with_body(json!({"title": "Rust 101", "difficulty": "expert"}))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(body.contains("difficulty"))),
        )
        .step(create_course_action("Rust 101", "course").assert_body(|body| {
            assert!(body.contains("rust-101")); // slug
            assert!(body.contains("\"total_lessons\":0"));
        }))
        // drafts are invisible to the public catalog
        .step(
            Action::new("catalog_anonymous", "GET", "/api/v1/courses/")
                .with_clear_cookies(true)
                .with_save_cookies(false)
                .assert_body(|body| assert!(!body.contains("Rust 101"))),
        )
        .step(signin_admin_action())
        .step(publish_course_action("course", "Rust 101"))
        .step(
            Action::new("catalog_public", "GET", "/api/v1/courses/")
                .with_clear_cookies(true)
                .with_save_cookies(false)
                .assert_body(|body| assert!(body.contains("Rust 101"))),
        )
        .step(signin_admin_action())
        .step(
            Action::new("delete_course", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}", ctx.id_of("course")))
                .with_expect(StatusCode::OK),
        )
        .step(
            Action::new("get_deleted_course", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}", ctx.id_of("course")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_lesson_content_validation_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signin_admin_action())
        .step(create_course_action("Validation", "course"))
        // video lesson without a source url
        .step(
            Action::new("video_without_url", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({"title": "Broken video", "content_type": "video"}))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(body.contains("video_url"))),
        )
        // quiz with a 3-option question and an out-of-range answer index:
        // both violations must be reported at once
        .step(
            Action::new("quiz_all_violations", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({
                    "title": "Broken quiz",
                    "content_type": "quiz",
                    "quiz_questions": [
                        {"id": 1, "prompt": "q1", "options": ["a", "b", "c"], "correct_answer": 0},
                        {"id": 2, "prompt": "q2", "options": ["a", "b", "c", "d"], "correct_answer": 7},
                    ],
                }))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    assert!(body.contains("\"question\":0"));
                    assert!(body.contains("\"question\":1"));
                }),
        )
        // unknown content type
        .step(
            Action::new("unknown_content_type", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({"title": "Podcast", "content_type": "podcast"}))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        // a well-formed text lesson passes with an empty body
        .step(
            Action::new("text_lesson", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({"title": "Notes", "content_type": "text", "content": ""}))
                .with_expect(StatusCode::OK),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_lesson_reorder_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signin_admin_action())
        .step(create_course_action("Ordering", "course"))
        .step(
            Action::new("lesson_a", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({"title": "A", "content_type": "text", "content": "a"}))
                .with_save_as("lesson_a"),
        )
        .step(
            Action::new("lesson_b", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({"title": "B", "content_type": "text", "content": "b"}))
                .with_save_as("lesson_b"),
        )
        // dropping a lesson id is rejected
        .step(
            Action::new("reorder_dropped_id", "PUT", "dynamic")
                .with_dyn_path(|ctx| {
                    format!("/api/v1/courses/{}/lessons/reorder", ctx.id_of("course"))
                })
                .with_dyn_body(|ctx| json!({"order": [ctx.id_of("lesson_a")]}))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(body.contains("missing"))),
        )
        // duplicating a lesson id is rejected
        .step(
            Action::new("reorder_duplicate_id", "PUT", "dynamic")
                .with_dyn_path(|ctx| {
                    format!("/api/v1/courses/{}/lessons/reorder", ctx.id_of("course"))
                })
                .with_dyn_body(|ctx| {
                    json!({"order": [ctx.id_of("lesson_a"), ctx.id_of("lesson_a")]})
                })
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(body.contains("duplicate"))),
        )
        // the original order survives rejected permutations
        .step(
            Action::new("order_unchanged", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .assert_body(|body| {
                    let a = body.find("\"title\":\"A\"").expect("lesson A missing");
                    let b = body.find("\"title\":\"B\"").expect("lesson B missing");
                    assert!(a < b);
                }),
        )
        // a true permutation is applied
        .step(
            Action::new("reorder_valid", "PUT", "dynamic")
                .with_dyn_path(|ctx| {
                    format!("/api/v1/courses/{}/lessons/reorder", ctx.id_of("course"))
                })
                .with_dyn_body(|ctx| {
                    json!({"order": [ctx.id_of("lesson_b"), ctx.id_of("lesson_a")]})
                })
                .with_expect(StatusCode::OK),
        )
        .step(
            Action::new("order_flipped", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .assert_body(|body| {
                    let a = body.find("\"title\":\"A\"").expect("lesson A missing");
                    let b = body.find("\"title\":\"B\"").expect("lesson B missing");
                    assert!(b < a);
                }),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_lesson_section_grouping_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signin_admin_action())
        .step(create_course_action("Sections", "course"))
        .step(
            Action::new("lesson_intro", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({
                    "title": "Welcome",
                    "content_type": "text",
                    "content": "hi",
                    "section": "Intro",
                    "is_published": true,
                })),
        )
        .step(
            Action::new("lesson_draft", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({
                    "title": "Unfinished",
                    "content_type": "text",
                    "content": "wip",
                    "section": "Later",
                })),
        )
        .step(publish_course_action("course", "Sections"))
        // admins see drafts grouped under their section
        .step(
            Action::new("sections_admin", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .assert_body(|body| {
                    assert!(body.contains("Intro"));
                    assert!(body.contains("Unfinished"));
                }),
        )
        // the public only sees published lessons
        .step(
            Action::new("sections_public", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_clear_cookies(true)
                .with_save_cookies(false)
                .assert_body(|body| {
                    assert!(body.contains("Welcome"));
                    assert!(!body.contains("Unfinished"));
                }),
        )
        .run(&mut server, pool)
        .await;
}
