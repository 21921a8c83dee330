//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::response::Response;
use beat_battle_elo::config::AppConfig;
use beat_battle_elo::service::{AppState, ADMIN_PASSWORD_HEADER};
use beat_battle_elo::session::EloSession;
use beat_battle_elo::types::BattleResult;
use std::sync::Arc;

pub const ADMIN_PASSWORD: &str = "admin123";

pub const CSV_HEADER: &str = "Name,ELO,Rank,Battles Missed,Placements Remaining\n";

/// A mid-season roster spanning every default tier
pub fn season_roster_csv() -> String {
    format!(
        "{CSV_HEADER}\
         Ayo,1450,headliner,0,0\n\
         Bex,1320,nork,0,0\n\
         Cato,1210,plat,1,0\n\
         Dune,1100,more,0,1\n\
         Echo,1000,serum2,2,2\n\
         Fern,950,bamboo,0,0\n"
    )
}

/// Session with the given names added at default rating
pub fn session_with(names: &[&str]) -> EloSession {
    let mut session = EloSession::default();
    session.import_names(names.iter().copied());
    session
}

/// Session loaded from [`season_roster_csv`]
pub fn season_session() -> EloSession {
    let mut session = EloSession::default();
    session
        .import_csv(season_roster_csv().as_bytes())
        .expect("season roster should import");
    session
}

pub fn results(pairs: &[(&str, &str)]) -> Vec<BattleResult> {
    pairs
        .iter()
        .map(|(name, grade)| BattleResult::new(*name, *grade))
        .collect()
}

pub fn create_test_state() -> Arc<AppState> {
    Arc::new(AppState::new(AppConfig::default()).expect("default config should be valid"))
}

pub fn admin_request(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD)
        .header("content-type", "application/json")
        .body(body.into())
        .expect("request should build")
}

pub fn public_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("body should be JSON")
}
