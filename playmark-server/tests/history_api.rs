use anyhow::Result;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use playmark_core::api::routes::{health, users, utils as route_utils};
use playmark_core::database::ports::viewing_history::{
    FinalProgress, ViewingHistoryRepository,
};
use playmark_model::{ContentId, UserId};
use serde_json::Value;

#[path = "support/mod.rs"]
mod support;
use support::{DOCUMENTARY, EPISODE, MOVIE, SHORT, TestApp, build_test_app};

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).expect("valid timestamp")
}

/// Four rows for user 7: MOVIE completed, the rest in progress, watched in
/// the order SHORT, EPISODE, MOVIE, DOCUMENTARY.
async fn seed_history(app: &TestApp) -> Result<()> {
    let repo = &app.state.unit_of_work().viewing_history;
    let user = UserId(7);

    repo.upsert_position(user, ContentId(SHORT), 120.0, at(10)).await?;
    repo.upsert_position(user, ContentId(EPISODE), 900.0, at(20)).await?;
    repo.upsert_final(
        user,
        ContentId(MOVIE),
        FinalProgress {
            final_position: 1150.0,
            watch_duration: 1150.0,
            is_completed: true,
        },
        at(30),
    )
    .await?;
    repo.upsert_position(user, ContentId(DOCUMENTARY), 60.0, at(40)).await?;
    Ok(())
}

fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|row| row["content_id"].as_i64().expect("content id"))
        .collect()
}

#[tokio::test]
async fn continue_watching_lists_in_progress_newest_first() -> Result<()> {
    let app = build_test_app().await?;
    seed_history(&app).await?;

    let response = app
        .server
        .get(users::CONTINUE_WATCHING)
        .add_header("Authorization", app.token_for(7))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["status"], "success");
    assert_eq!(ids(&body), vec![DOCUMENTARY, EPISODE, SHORT]);

    let episode = &body["data"][1];
    assert_eq!(episode["title"], "Pilot");
    assert_eq!(episode["duration"], 1800.0);
    assert_eq!(episode["last_position"], 900.0);
    assert_eq!(episode["progress_percent"], 50.0);
    assert_eq!(episode["is_completed"], false);
    Ok(())
}

#[tokio::test]
async fn continue_watching_honours_limit() -> Result<()> {
    let app = build_test_app().await?;
    seed_history(&app).await?;
    let token = app.token_for(7);

    let body: Value = app
        .server
        .get(&route_utils::with_query(users::CONTINUE_WATCHING, &[("limit", "2")]))
        .add_header("Authorization", token.clone())
        .await
        .json();
    assert_eq!(ids(&body), vec![DOCUMENTARY, EPISODE]);

    let body: Value = app
        .server
        .get(&route_utils::with_query(users::CONTINUE_WATCHING, &[("limit", "0")]))
        .add_header("Authorization", token.clone())
        .await
        .json();
    assert!(ids(&body).is_empty());

    let body: Value = app
        .server
        .get(&route_utils::with_query(users::VIEWING_HISTORY, &[("limit", "0")]))
        .add_header("Authorization", token)
        .await
        .json();
    assert!(ids(&body).is_empty());
    Ok(())
}

#[tokio::test]
async fn viewing_history_includes_completed_rows() -> Result<()> {
    let app = build_test_app().await?;
    seed_history(&app).await?;

    let body: Value = app
        .server
        .get(users::VIEWING_HISTORY)
        .add_header("Authorization", app.token_for(7))
        .await
        .json();

    assert_eq!(ids(&body), vec![DOCUMENTARY, MOVIE, EPISODE, SHORT]);
    assert_eq!(body["data"][1]["is_completed"], true);
    assert_eq!(body["data"][1]["watch_duration"], 1150.0);
    Ok(())
}

#[tokio::test]
async fn other_users_see_an_empty_history() -> Result<()> {
    let app = build_test_app().await?;
    seed_history(&app).await?;

    let body: Value = app
        .server
        .get(users::CONTINUE_WATCHING)
        .add_header("Authorization", app.token_for(8))
        .await
        .json();
    assert!(ids(&body).is_empty());
    Ok(())
}

#[tokio::test]
async fn history_views_require_authentication() -> Result<()> {
    let app = build_test_app().await?;

    app.server
        .get(users::VIEWING_HISTORY)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn liveness_endpoints_are_public() -> Result<()> {
    let app = build_test_app().await?;

    let ping = app.server.get(health::PING).await;
    ping.assert_status_ok();
    let body: Value = ping.json();
    assert_eq!(body["status"], "ok");

    let health = app.server.get(health::HEALTH).await;
    health.assert_status_ok();
    let body: Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
    Ok(())
}

#[tokio::test]
async fn non_numeric_limit_is_a_json_bad_request() -> Result<()> {
    let app = build_test_app().await?;
    let token = app.token_for(7);

    let response = app
        .server
        .get(&route_utils::with_query(users::CONTINUE_WATCHING, &[("limit", "many")]))
        .add_header("Authorization", token)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["status"], 400);
    Ok(())
}
