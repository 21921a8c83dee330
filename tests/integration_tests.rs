//! Integration tests for the beat-battle-elo service
//!
//! These tests drive the whole system the way an admin would over a season:
//! - Roster import from CSV and from extracted name lists
//! - Battle batches with grades, failures and decay
//! - Leaderboard ordering and tier placement
//! - Export and re-import
//! - The HTTP surface, including admin authentication

mod fixtures;

use axum::http::StatusCode;
use beat_battle_elo::error::EloError;
use beat_battle_elo::service::create_router;
use beat_battle_elo::session::EloSession;
use beat_battle_elo::types::BattleResult;
use serde_json::json;
use tower::ServiceExt;

use fixtures::{
    admin_request, body_json, body_text, create_test_state, public_request, results,
    season_roster_csv, season_session, session_with, CSV_HEADER,
};

#[test]
fn test_season_battle_with_decay() {
    let mut session = season_session();

    let outcome = session.run_battle(
        &results(&[("Bex", "Winner"), ("Cato", "Brown"), ("Fern", "Red")]),
        true,
    );

    // Three grades, then decay for everyone below the miss cap (Echo is capped)
    assert_eq!(outcome.applied.len(), 8);
    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.battle, Some(1));

    let board = session.leaderboard();
    let summary: Vec<(&str, i64, &str)> = board
        .iter()
        .map(|row| (row.name.as_str(), row.elo, row.rank.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Ayo", 1425, "headliner"),
            ("Bex", 1395, "nork"),
            ("Cato", 1135, "more"),
            ("Dune", 1075, "serum2"),
            ("Echo", 1000, "serum2"),
            ("Fern", 975, "bamboo"),
        ]
    );

    let echo = session.roster().get("Echo").unwrap();
    assert_eq!(echo.battles_missed, 2);
    assert_eq!(echo.placements_remaining, 2);

    let bex = session.roster().get("Bex").unwrap();
    assert_eq!(bex.battles_missed, 1);

    println!("✅ Season battle with decay test passed");
}

#[test]
fn test_whitespace_padded_names_round_trip() {
    let mut session = EloSession::default();
    session.import_extracted_text("Alice\n");
    session.import_names([" DJ Spin ", " Alice"]);
    assert_eq!(session.roster().len(), 2);

    let exported = session.export_csv().unwrap();
    let mut restored = EloSession::default();
    restored.import_csv(exported.as_bytes()).unwrap();
    assert_eq!(restored.roster(), session.roster());
}

#[test]
fn test_placements_never_go_negative() {
    let mut session = season_session();

    for _ in 0..3 {
        session.run_battle(&[BattleResult::new("Ayo", "White")], false);
    }

    assert_eq!(session.roster().get("Ayo").unwrap().placements_remaining, 0);
    assert_eq!(session.roster().get("Ayo").unwrap().rating, 1450);
    assert_eq!(session.log().len(), 3);
}

#[test]
fn test_battle_resets_missed_counter() {
    let mut session = season_session();
    session.apply_decay();
    session.apply_decay();
    assert_eq!(session.roster().get("Ayo").unwrap().battles_missed, 2);

    session.run_battle(&[BattleResult::new("Ayo", "Green")], false);
    let ayo = session.roster().get("Ayo").unwrap();
    assert_eq!(ayo.battles_missed, 0);
    assert_eq!(ayo.rating, 1450 - 25 - 25 - 25);
    assert_eq!(ayo.tier, "nork");
}

#[test]
fn test_unknown_name_wins_over_bad_grade() {
    let mut session = session_with(&["Alice"]);
    let outcome = session.run_battle(&[BattleResult::new("Nobody", "Purple")], false);

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(
        outcome.failures[0].error,
        EloError::UnknownParticipant {
            name: "Nobody".to_string()
        }
    );
    assert_eq!(outcome.battle, None);
}

#[test]
fn test_grade_labels_are_case_sensitive() {
    let mut session = session_with(&["Alice"]);
    let outcome = session.run_battle(&[BattleResult::new("Alice", "red")], false);

    assert_eq!(outcome.failures[0].kind, "invalid_grade");
    assert_eq!(session.roster().get("Alice").unwrap().rating, 1000);
}

#[test]
fn test_leaderboard_ties_sorted_by_name() {
    let session = session_with(&["Zed", "Amy", "Mo"]);
    let names: Vec<String> = session.leaderboard().into_iter().map(|row| row.name).collect();
    assert_eq!(names, vec!["Amy", "Mo", "Zed"]);
}

#[test]
fn test_export_then_import_restores_roster() {
    let mut session = season_session();
    session.run_battle(&results(&[("Dune", "Winner"), ("Echo", "Orange")]), true);

    let exported = session.export_csv().unwrap();
    let mut restored = EloSession::default();
    let count = restored.import_csv(exported.as_bytes()).unwrap();

    assert_eq!(count, 6);
    assert_eq!(restored.roster(), session.roster());
    assert_eq!(restored.leaderboard(), session.leaderboard());
    // History is not part of the table
    assert!(restored.log().is_empty());
}

#[test]
fn test_names_then_table_import() {
    let mut session = EloSession::default();
    let added = session.import_extracted_text("Ayo\n  Newcomer  \n\nAyo\n");
    assert_eq!(added, vec!["Ayo", "Newcomer"]);

    // A table import replaces everything, including names added above
    session.import_csv(season_roster_csv().as_bytes()).unwrap();
    assert!(!session.roster().contains("Newcomer"));
    assert_eq!(session.roster().get("Ayo").unwrap().rating, 1450);

    // A name list after that only adds who is missing
    let added = session.import_names(["Ayo", "Newcomer"]);
    assert_eq!(added, vec!["Newcomer"]);
    assert_eq!(session.roster().get("Ayo").unwrap().rating, 1450);
    assert_eq!(session.roster().len(), 7);
}

#[tokio::test]
async fn test_http_season_workflow() {
    let app = create_router(create_test_state());

    let response = app
        .clone()
        .oneshot(admin_request("POST", "/admin/import/csv", season_roster_csv()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["imported"], 6);

    let battle = json!({
        "results": [
            { "name": "Fern", "grade": "Winner" },
            { "name": "Ghost", "grade": "Red" },
            { "name": "Ayo", "grade": "Gold" }
        ],
        "decay": false
    });
    let response = app
        .clone()
        .oneshot(admin_request("POST", "/admin/battle", battle.to_string()))
        .await
        .unwrap();
    let outcome = body_json(response).await;
    assert_eq!(outcome["battle"], 1);
    assert_eq!(outcome["applied"].as_array().unwrap().len(), 1);
    assert_eq!(outcome["applied"][0]["adjustment"], "Winner");
    assert_eq!(outcome["failures"][0]["kind"], "unknown_participant");
    assert_eq!(outcome["failures"][1]["kind"], "invalid_grade");

    let response = app
        .clone()
        .oneshot(admin_request("POST", "/admin/decay", ""))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["battle"], 2);

    let response = app.clone().oneshot(public_request("/battles")).await.unwrap();
    let battles = body_json(response).await;
    assert_eq!(battles.as_array().unwrap().len(), 2);
    assert_eq!(battles[1]["sequence"], 2);

    let response = app
        .clone()
        .oneshot(public_request("/leaderboard"))
        .await
        .unwrap();
    let board = body_json(response).await;
    assert_eq!(board[0], json!({ "Name": "Ayo", "ELO": 1425, "Rank": "headliner" }));
    let fern = board
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["Name"] == "Fern")
        .unwrap();
    assert_eq!(fern["ELO"], 1025);
    assert_eq!(fern["Rank"], "serum2");

    let response = app
        .oneshot(admin_request("GET", "/admin/export", ""))
        .await
        .unwrap();
    let exported = body_text(response).await;
    assert!(exported.starts_with(CSV_HEADER));
    assert!(exported.contains("Fern,1025,serum2,1,0\n"));
    assert!(exported.contains("Echo,1000,serum2,2,2\n"));

    println!("✅ HTTP season workflow test passed");
}

#[tokio::test]
async fn test_http_rejected_admin_changes_nothing() {
    let state = create_test_state();
    let app = create_router(state.clone());

    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/admin/import/names")
                .body(axum::body::Body::from("Alice\nBob"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(state.leaderboard().await.is_empty());
    assert_eq!(state.metrics().roster().auth_failures_total.get(), 1);

    let response = app.oneshot(public_request("/metrics")).await.unwrap();
    let metrics = body_text(response).await;
    assert!(metrics.contains("elo_auth_failures_total 1"));
}

#[tokio::test]
async fn test_http_import_error_reports_line() {
    let app = create_router(create_test_state());
    let csv = format!("{CSV_HEADER}Ayo,1450,headliner,0,0\nBex,many,nork,0,0\n");

    let response = app
        .oneshot(admin_request("POST", "/admin/import/csv", csv))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["kind"], "malformed_import_row");
    assert!(body["error"].as_str().unwrap().contains("row 3"));
}
