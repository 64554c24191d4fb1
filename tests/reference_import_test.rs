mod common;
use common::provider;
use common::utils::{spawn_app, stage_reference_data, BUNDESLIGA, PREMIER_LEAGUE, SERIE_A};

use chrono::{DateTime, Utc};
use tippspiel_backend::models::errors::SyncError;

#[tokio::test]
async fn countries_are_inserted_once_and_never_updated() {
    let app = spawn_app().await;
    stage_reference_data(&app);
    let importer = app.importer();

    let first = importer.import_countries().await.expect("First import failed");
    assert_eq!(first.fetched, 3);
    assert_eq!(first.created, 3);

    // The provider changes a flag; existing countries keep theirs
    app.provider.set(|data| {
        data.countries[0]["flag"] = serde_json::json!("https://example.com/new-flag.svg");
    });
    let second = importer.import_countries().await.expect("Second import failed");
    assert_eq!(second.created, 0);

    let flag: Option<String> = sqlx::query_scalar("SELECT flag FROM countries WHERE name = 'Austria'")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(flag.as_deref(), Some("https://media.api-sports.io/flags/at.svg"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn league_import_is_idempotent_and_only_takes_relevant_leagues() {
    let app = spawn_app().await;
    stage_reference_data(&app);
    let importer = app.importer();
    let relevant = app.sync_settings.relevant_leagues.clone();
    importer.import_countries().await.unwrap();

    let first = importer.import_leagues(&relevant).await.expect("First import failed");
    assert_eq!(first.created, 2);
    assert_eq!(first.updated, 0);

    let before: Vec<(i64, bool, String)> =
        sqlx::query_as("SELECT api_id, is_current, name FROM leagues ORDER BY api_id")
            .fetch_all(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(
        before.iter().map(|l| l.0).collect::<Vec<_>>(),
        vec![PREMIER_LEAGUE, BUNDESLIGA]
    );
    assert!(before.iter().all(|l| l.1));

    let second = importer.import_leagues(&relevant).await.expect("Second import failed");
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 2);

    let after: Vec<(i64, bool, String)> =
        sqlx::query_as("SELECT api_id, is_current, name FROM leagues ORDER BY api_id")
            .fetch_all(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(before, after);

    let serie_a: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leagues WHERE api_id = $1")
        .bind(SERIE_A)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(serie_a, 0);
}

#[tokio::test]
async fn league_update_reflects_new_values() {
    let app = spawn_app().await;
    stage_reference_data(&app);
    let importer = app.importer();
    let relevant = app.sync_settings.relevant_leagues.clone();
    importer.import_countries().await.unwrap();
    importer.import_leagues(&relevant).await.unwrap();

    app.provider.set(|data| {
        data.leagues[0]["name"] = serde_json::json!("Admiral Bundesliga");
    });
    importer.import_leagues(&relevant).await.unwrap();

    let name: String = sqlx::query_scalar("SELECT name FROM leagues WHERE api_id = $1")
        .bind(BUNDESLIGA)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(name, "Admiral Bundesliga");
}

#[tokio::test]
async fn league_with_unknown_country_is_skipped_not_fatal() {
    let app = spawn_app().await;
    stage_reference_data(&app);
    app.provider.set(|data| {
        data.leagues[1]["country"] = serde_json::json!("Atlantis");
    });
    let importer = app.importer();
    let relevant = app.sync_settings.relevant_leagues.clone();
    importer.import_countries().await.unwrap();

    let report = importer.import_leagues(&relevant).await.expect("Import should not fail");

    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn teams_listed_under_several_leagues_are_written_once() {
    let app = spawn_app().await;
    stage_reference_data(&app);
    let importer = app.importer();
    let relevant = app.sync_settings.relevant_leagues.clone();
    importer.import_countries().await.unwrap();
    importer.import_leagues(&relevant).await.unwrap();

    let report = importer.import_teams(&relevant).await.expect("Team import failed");
    assert_eq!(report.fetched, 8);
    assert_eq!(report.created, 7);
    assert_eq!(report.updated, 0);

    let again = importer.import_teams(&relevant).await.expect("Team import failed");
    assert_eq!(again.created, 0);
    assert_eq!(again.updated, 7);

    let rapid: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams WHERE api_id = 10")
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    assert_eq!(rapid, 1);
}

#[tokio::test]
async fn provider_outage_is_reported_as_upstream_failure() {
    let app = spawn_app().await;
    stage_reference_data(&app);
    app.provider.set(|data| data.unavailable = true);

    let err = app.importer().import_countries().await.expect_err("Import should fail");

    assert!(matches!(err, SyncError::Api { processed: 0, .. }));
    assert!(err.is_upstream());
}

#[tokio::test]
async fn fixture_payload_builder_uses_utc_kickoff() {
    // Guards the helper the other suites rely on
    let kickoff: DateTime<Utc> = "2024-05-11T15:00:00Z".parse().unwrap();
    let payload = provider::fixture(1, BUNDESLIGA, kickoff, 10, 11, "NS", None);
    assert_eq!(payload["event_timestamp"], kickoff.timestamp());
    assert!(payload["goalsHomeTeam"].is_null());
}

#[tokio::test]
async fn malformed_league_and_team_rows_are_skipped() {
    let app = spawn_app().await;
    stage_reference_data(&app);
    app.provider.set(|data| {
        data.leagues[0].as_object_mut().unwrap().remove("name");
        data.teams.get_mut(&PREMIER_LEAGUE).unwrap().push(serde_json::json!({ "team_id": 23 }));
    });
    let importer = app.importer();
    let relevant = app.sync_settings.relevant_leagues.clone();
    importer.import_countries().await.unwrap();

    let leagues = importer.import_leagues(&relevant).await.expect("League import failed");
    assert_eq!(leagues.fetched, 3);
    assert_eq!(leagues.skipped, 1);
    assert_eq!(leagues.created, 1);

    let teams = importer.import_teams(&relevant).await.expect("Team import failed");
    assert_eq!(teams.fetched, 9);
    assert_eq!(teams.skipped, 1);
    assert_eq!(teams.created, 7);
}
