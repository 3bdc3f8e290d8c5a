// SPDX-License-Identifier: MIT
// Copyright 2026 The study-tracker authors

//! End-to-end study flow over the HTTP API with an in-memory store.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::send;

fn days_from_today(days: i64) -> String {
    (chrono::Utc::now().date_naive() + chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn test_goal_dashboard_and_summary() {
    let (app, _) = common::create_test_app();
    let token = common::register(&app, "ada").await;
    let token = Some(token.as_str());

    let (status, physics) = send(
        &app,
        "POST",
        "/api/subjects",
        token,
        Some(json!({ "name": "Physics", "difficulty": "Hard" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(physics["difficulty"], "Hard");

    // Difficulty defaults to Easy
    let (status, history) = send(
        &app,
        "POST",
        "/api/subjects",
        token,
        Some(json!({ "name": "History" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(history["difficulty"], "Easy");

    // (50 + 20) hours over 30 days
    let (status, goal) = send(
        &app,
        "PUT",
        "/api/goal",
        token,
        Some(json!({ "exam_date": days_from_today(30) })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(goal["total_required_minutes"], 4200);
    assert_eq!(goal["recommended_daily_minutes"], 140);

    for (subject, minutes, date) in [
        (&physics, 60, "2026-01-10"),
        (&history, 90, "2026-01-11"),
        (&physics, 60, "2026-01-12"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/sessions",
            token,
            Some(json!({
                "subject_id": subject["id"],
                "duration_minutes": minutes,
                "date": date,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, dashboard) = send(&app, "GET", "/api/dashboard", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["username"], "ada");
    assert_eq!(dashboard["total_subjects"], 2);
    assert_eq!(dashboard["total_sessions"], 3);
    assert_eq!(dashboard["total_minutes"], 210);
    assert_eq!(
        dashboard["minutes_per_subject"],
        json!({ "History": 90, "Physics": 120 })
    );
    assert_eq!(dashboard["goal"]["recommended_daily_minutes"], 140);
    // 210 / 4200 = 5%
    assert_eq!(dashboard["progress_percent"], 5.0);

    let (status, summary) = send(&app, "GET", "/api/summary", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_minutes"], 210);
    let dates: Vec<&str> = summary["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, ["2026-01-12", "2026-01-11", "2026-01-10"]);
    assert_eq!(summary["sessions"][1]["subject_name"], "History");
}

#[tokio::test]
async fn test_dashboard_without_goal_has_no_progress() {
    let (app, _) = common::create_test_app();
    let token = common::register(&app, "grace").await;

    let (status, dashboard) = send(&app, "GET", "/api/dashboard", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["total_minutes"], 0);
    assert_eq!(dashboard["minutes_per_subject"], json!({}));
    assert!(dashboard["goal"].is_null());
    assert!(dashboard["progress_percent"].is_null());

    let (status, _) = send(&app, "GET", "/api/goal", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_subject_removes_its_sessions() {
    let (app, _) = common::create_test_app();
    let token = common::register(&app, "ada").await;
    let token = Some(token.as_str());

    let (_, math) = send(
        &app,
        "POST",
        "/api/subjects",
        token,
        Some(json!({ "name": "Math", "difficulty": "Medium" })),
    )
    .await;
    let math_id = math["id"].as_u64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/sessions",
        token,
        Some(json!({ "subject_id": math_id, "duration_minutes": 45 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "DELETE", &format!("/api/subjects/{}", math_id), token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, sessions) = send(&app, "GET", "/api/sessions", token, None).await;
    assert_eq!(sessions, json!([]));

    let (status, _) = send(&app, "DELETE", &format!("/api/subjects/{}", math_id), token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_edit_and_delete() {
    let (app, _) = common::create_test_app();
    let token = common::register(&app, "ada").await;
    let token = Some(token.as_str());

    let (_, subject) = send(
        &app,
        "POST",
        "/api/subjects",
        token,
        Some(json!({ "name": "Chemistry" })),
    )
    .await;
    let (_, session) = send(
        &app,
        "POST",
        "/api/sessions",
        token,
        Some(json!({ "subject_id": subject["id"], "duration_minutes": 30, "date": "2026-03-01" })),
    )
    .await;
    let uri = format!("/api/sessions/{}", session["id"]);

    let (status, updated) = send(
        &app,
        "PUT",
        &uri,
        token,
        Some(json!({ "subject_id": subject["id"], "duration_minutes": 75, "date": "2026-03-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["duration_minutes"], 75);
    assert_eq!(updated["date"], "2026-03-02");

    let (status, _) = send(&app, "DELETE", &uri, token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &uri, token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_users_cannot_see_each_others_records() {
    let (app, _) = common::create_test_app();
    let ada = common::register(&app, "ada").await;
    let grace = common::register(&app, "grace").await;

    let (_, subject) = send(
        &app,
        "POST",
        "/api/subjects",
        Some(&ada),
        Some(json!({ "name": "Biology" })),
    )
    .await;

    let (_, listed) = send(&app, "GET", "/api/subjects", Some(&grace), None).await;
    assert_eq!(listed, json!([]));

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/subjects/{}", subject["id"]),
        Some(&grace),
        Some(json!({ "name": "Stolen" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(&grace),
        Some(json!({ "subject_id": subject["id"], "duration_minutes": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_account_deletion_revokes_access_to_data() {
    let (app, _) = common::create_test_app();
    let token = common::register(&app, "ada").await;
    let token = Some(token.as_str());

    send(
        &app,
        "POST",
        "/api/subjects",
        token,
        Some(json!({ "name": "Latin" })),
    )
    .await;

    let (status, body) = send(&app, "DELETE", "/api/account", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["records_deleted"], 2);

    // The token is still well-formed but the profile is gone
    let (status, _) = send(&app, "GET", "/api/me", token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
