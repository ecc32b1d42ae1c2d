#![allow(dead_code)]

use std::net::SocketAddr;

use anyhow::Result;
use axum_test::TestServer;
use chrono::Duration;
use playmark_config::{
    AuthConfig, Config, ConfigMetadata, ContentSeed, CorsConfig, DatabaseConfig,
    ServerConfig, StorageBackend,
};
use playmark_model::UserId;
use playmark_server::{
    AppState, infra::startup::build_app_state, routes::build_router,
};

pub const TEST_SECRET: &str = "playmark-integration-secret-0123456789abcdef";

pub const MOVIE: i64 = 1;
pub const SHORT: i64 = 2;
pub const EPISODE: i64 = 3;
pub const DOCUMENTARY: i64 = 4;

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    pub fn token_for(&self, user_id: i64) -> String {
        bearer(&self.state, UserId(user_id))
    }
}

pub fn seed(id: i64, title: &str, duration: f64) -> ContentSeed {
    ContentSeed {
        id,
        title: title.to_string(),
        thumbnail_url: format!("https://cdn.example.com/thumbs/{id}.jpg"),
        video_url: format!("https://cdn.example.com/videos/{id}.mp4"),
        duration,
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
        },
        storage: StorageBackend::Memory,
        auth: AuthConfig {
            jwt_secret: TEST_SECRET.into(),
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".into()],
            allow_credentials: false,
        },
        dev_mode: true,
        seed_contents: vec![
            seed(MOVIE, "Test Movie", 1200.0),
            seed(SHORT, "Short Clip", 600.0),
            seed(EPISODE, "Pilot", 1800.0),
            seed(DOCUMENTARY, "Documentary", 3000.0),
        ],
        metadata: ConfigMetadata::default(),
    }
}

pub async fn build_test_app() -> Result<TestApp> {
    let state = build_app_state(test_config()).await?;
    let make_service = build_router(state.clone())
        .into_make_service_with_connect_info::<SocketAddr>();
    let server = TestServer::builder()
        .http_transport()
        .build(make_service)
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;

    Ok(TestApp { server, state })
}

pub fn bearer(state: &AppState, user_id: UserId) -> String {
    let token = state
        .tokens
        .issue(user_id, Duration::minutes(15))
        .expect("issue test token");
    format!("Bearer {}", token)
}
