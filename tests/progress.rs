mod common;
use axum::http::StatusCode;
use serde_json::json;

use crate::common::{
    Action, Flow, create_course_action, enroll_action, publish_course_action, setup_server,
    setup_test_db, signin_admin_action, signup_action,
};

#[tokio::test]
async fn route_enroll_conflict_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signin_admin_action())
        .step(create_course_action("Conflicts", "course"))
        .step(publish_course_action("course", "Conflicts"))
        .step(signup_action("student", "hunter2").with_clear_cookies(true))
        .step(enroll_action("course"))
        // enrolling twice hits the uniqueness invariant
        .step(enroll_action("course").with_expect(StatusCode::CONFLICT))
        .step(
            Action::new("my_enrollments", "GET", "/api/v1/enrollments/").assert_body(|body| {
                let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
                assert_eq!(parsed.as_array().unwrap().len(), 1); // no duplicate row
            }),
        )
        // empty course: zero published lessons means 0%, not a vacuous pass
        .step(
            Action::new("empty_progress", "GET", "dynamic")
                .with_dyn_path(|ctx| {
                    format!("/api/v1/enrollments/{}/progress", ctx.id_of("course"))
                })
                .assert_body(|body| assert!(body.contains("\"percentage\":0"))),
        )
        .step(
            Action::new("unenroll", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/enrollments/{}", ctx.id_of("course"))),
        )
        .step(
            Action::new("unenroll_again", "DELETE", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/enrollments/{}", ctx.id_of("course")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_enroll_unpublished_course_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signin_admin_action())
        .step(create_course_action("Draft course", "course"))
        .step(signup_action("student", "hunter2").with_clear_cookies(true))
        .step(enroll_action("course").with_expect(StatusCode::BAD_REQUEST))
        .run(&mut server, pool)
        .await;
}

#[tokio::test]
async fn route_free_preview_access_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    Flow::new()
        .step(signin_admin_action())
        .step(create_course_action("Previews", "course"))
        .step(
            Action::new("preview_lesson", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({
                    "title": "Teaser",
                    "content_type": "video",
                    "video_url": "https://videos.example/teaser.mp4",
                    "is_published": true,
                    "is_free_preview": true,
                }))
                .with_save_as("preview"),
        )
        .step(
            Action::new("locked_lesson", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({
                    "title": "Members only",
                    "content_type": "video",
                    "video_url": "https://videos.example/full.mp4",
                    "is_published": true,
                }))
                .with_save_as("locked"),
        )
        .step(publish_course_action("course", "Previews"))
        // free preview works without any session at all
        .step(
            Action::new("preview_anonymous", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}", ctx.id_of("preview")))
                .with_clear_cookies(true)
                .with_save_cookies(false)
                .assert_body(|body| assert!(body.contains("teaser.mp4"))),
        )
        // a signed-in but unenrolled learner is rejected from the rest
        .step(signup_action("visitor", "hunter2").with_clear_cookies(true))
        .step(
            Action::new("locked_unenrolled", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}", ctx.id_of("locked")))
                .with_expect(StatusCode::FORBIDDEN),
        )
        // enrollment unlocks it
        .step(enroll_action("course"))
        .step(
            Action::new("locked_enrolled", "GET", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}", ctx.id_of("locked")))
                .assert_body(|body| {
                    assert!(body.contains("full.mp4"));
                    // learners never receive the answer key field
                    assert!(!body.contains("correct_answer"));
                }),
        )
        .run(&mut server, pool)
        .await;
}

/// The canonical three-lesson walkthrough: video and text complete directly,
/// the quiz only counts once it is passed.
#[tokio::test]
async fn route_course_progress_scenario_test() {
    let pool = setup_test_db().await;
    let mut server = setup_server(&pool).await;

    let quiz_questions = json!([
        {"id": 1, "prompt": "q1", "options": ["a", "b", "c", "d"], "correct_answer": 0, "points": 10},
        {"id": 2, "prompt": "q2", "options": ["a", "b", "c", "d"], "correct_answer": 1, "points": 10},
        {"id": 3, "prompt": "q3", "options": ["a", "b", "c", "d"], "correct_answer": 2, "points": 10},
    ]);

    Flow::new()
        .step(signin_admin_action())
        .step(create_course_action("Walkthrough", "course"))
        .step(
            Action::new("video_lesson", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({
                    "title": "Watch",
                    "content_type": "video",
                    "video_url": "https://videos.example/watch.mp4",
                    "is_published": true,
                }))
                .with_save_as("video"),
        )
        .step(
            Action::new("text_lesson", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({
                    "title": "Read",
                    "content_type": "text",
                    "content": "read me",
                    "is_published": true,
                }))
                .with_save_as("text"),
        )
        .step(
            Action::new("quiz_lesson", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/courses/{}/lessons", ctx.id_of("course")))
                .with_body(json!({
                    "title": "Prove it",
                    "content_type": "quiz",
                    "quiz_questions": quiz_questions,
                    "quiz_passing_score": 70,
                    "is_published": true,
                }))
                .with_save_as("quiz"),
        )
        .step(publish_course_action("course", "Walkthrough"))
        .step(signup_action("walker", "hunter2").with_clear_cookies(true))
        .step(enroll_action("course"))
        // marking the quiz complete directly is not allowed
        .step(
            Action::new("complete_quiz_directly", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}/complete", ctx.id_of("quiz")))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("complete_video", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}/complete", ctx.id_of("video"))),
        )
        .step(
            Action::new("complete_text", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}/complete", ctx.id_of("text"))),
        )
        // 2 of 3 questions correct: 67%, below the 70% bar
        .step(
            Action::new("quiz_failing_attempt", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}/quiz/submit", ctx.id_of("quiz")))
                .with_body(json!({"answers": {"1": 0, "2": 1, "3": 3}}))
                .assert_body(|body| {
                    assert!(body.contains("\"percentage\":67"));
                    assert!(body.contains("\"passed\":false"));
                }),
        )
        // the quiz is not complete, so the course sits at 2/3
        .step(
            Action::new("progress_after_fail", "GET", "dynamic")
                .with_dyn_path(|ctx| {
                    format!("/api/v1/enrollments/{}/progress", ctx.id_of("course"))
                })
                .assert_body(|body| {
                    assert!(body.contains("\"percentage\":67"));
                    // the failed score is still visible for the retry UI
                    assert!(body.contains("\"last_score\":67"));
                }),
        )
        // retry with everything correct
        .step(
            Action::new("quiz_passing_attempt", "POST", "dynamic")
                .with_dyn_path(|ctx| format!("/api/v1/lessons/{}/quiz/submit", ctx.id_of("quiz")))
                .with_body(json!({"answers": {"1": 0, "2": 1, "3": 2}}))
                .assert_body(|body| {
                    assert!(body.contains("\"percentage\":100"));
                    assert!(body.contains("\"passed\":true"));
                }),
        )
        .step(
            Action::new("progress_after_pass", "GET", "dynamic")
                .with_dyn_path(|ctx| {
                    format!("/api/v1/enrollments/{}/progress", ctx.id_of("course"))
                })
                .assert_body(|body| assert!(body.contains("\"percentage\":100"))),
        )
        // both attempts are in the history, newest first
        .step(
            Action::new("attempt_history", "GET", "dynamic")
                .with_dyn_path(|ctx| {
                    format!("/api/v1/lessons/{}/quiz/attempts", ctx.id_of("quiz"))
                })
                .assert_body(|body| {
                    let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
                    let attempts = parsed.as_array().unwrap();
                    assert_eq!(attempts.len(), 2);
                    assert_eq!(attempts[0]["percentage"], 100);
                    assert_eq!(attempts[1]["percentage"], 67);
                }),
        )
        .run(&mut server, pool)
        .await;
}
