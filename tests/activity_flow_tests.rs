// SPDX-License-Identifier: MIT

//! End-to-end widget flow: submit, query, mark displayed, stats.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

async fn get_recent(app: &axum::Router) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/activity/recent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    common::body_json(response).await
}

#[tokio::test]
async fn test_submit_then_display_lifecycle() {
    let (app, _state) = common::create_test_app().await;

    // Submit
    let response = app
        .clone()
        .oneshot(common::post_json(
            "/activity",
            json!({
                "name": "Sarah",
                "location": "Chelsea",
                "actionType": "signup",
                "actionText": "joined",
                "verified": true
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let created = common::body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(created["name"], "Sarah");
    assert_eq!(created["displayed"], false);
    assert_eq!(created["verified"], true);

    // Recent query includes it, still undisplayed
    let recent = get_recent(&app).await;
    assert_eq!(recent.as_array().unwrap().len(), 1);
    assert_eq!(recent[0]["id"], id);
    assert_eq!(recent[0]["displayed"], false);

    // Mark displayed
    let response = app
        .clone()
        .oneshot(common::post_json(
            "/activity/mark-displayed",
            json!({"ids": [id]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["updated"], 1);

    // Second call with the same id changes nothing
    let response = app
        .clone()
        .oneshot(common::post_json(
            "/activity/mark-displayed",
            json!({"ids": [id]}),
        ))
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["updated"], 0);

    // Recent query now excludes it
    let recent = get_recent(&app).await;
    assert!(recent.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recent_returns_newest_first() {
    let (app, _state) = common::create_test_app().await;

    for name in ["First", "Second", "Third"] {
        let response = app
            .clone()
            .oneshot(common::post_json(
                "/activity",
                json!({
                    "name": name,
                    "location": "Soho",
                    "actionType": "purchase",
                    "actionText": "bought a tub"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let recent = get_recent(&app).await;
    let names: Vec<&str> = recent
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn test_recent_limit_is_capped() {
    let (app, _state) = common::create_test_app().await;

    for i in 0..4 {
        app.clone()
            .oneshot(common::post_json(
                "/activity",
                json!({
                    "name": format!("Customer{i}"),
                    "location": "Soho",
                    "actionType": "signup",
                    "actionText": "joined"
                }),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/activity/recent?limit=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let recent = common::body_json(response).await;
    assert_eq!(recent.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_stats_reflect_recorded_activities() {
    let (app, _state) = common::create_test_app().await;

    for (name, action_type) in [("A", "signup"), ("B", "signup"), ("C", "purchase")] {
        app.clone()
            .oneshot(common::post_json(
                "/activity",
                json!({
                    "name": name,
                    "location": "Soho",
                    "actionType": action_type,
                    "actionText": "did a thing"
                }),
            ))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/activity/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stats = common::body_json(response).await;
    assert_eq!(stats["totalActivities"], 3);
    assert_eq!(stats["signups"], 2);
    assert_eq!(stats["purchases"], 1);
    assert_eq!(stats["reviews"], 0);
    assert_eq!(stats["displayed"], 0);
}
