use chrono::{DateTime, Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use once_cell::sync::Lazy;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;
use uuid::Uuid;

use tippspiel_backend::config::settings::{get_config, get_jwt_settings, DatabaseSettings};
use tippspiel_backend::config::sync::SyncSettings;
use tippspiel_backend::run;
use tippspiel_backend::services::{
    FixtureSyncService, FootballApiClient, ReferenceImportService, ScoringService, UpdateSchedulerService,
};
use tippspiel_backend::telemetry::{get_subscriber, init_subscriber};

use super::provider::{self, StubProvider};

pub const BUNDESLIGA: i64 = 218;
pub const PREMIER_LEAGUE: i64 = 39;
pub const SERIE_A: i64 = 135;

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub provider: StubProvider,
    pub football_api: FootballApiClient,
    pub sync_settings: SyncSettings,
    jwt_secret: String,
}

#[derive(Debug, Serialize)]
struct TestClaims {
    sub: String,
    username: String,
    role: String,
    exp: usize,
}

pub struct TestUser {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

impl TestApp {
    pub fn user(&self, username: &str) -> TestUser {
        self.user_with_role(username, "player")
    }

    pub fn admin(&self, username: &str) -> TestUser {
        self.user_with_role(username, "admin")
    }

    fn user_with_role(&self, username: &str, role: &str) -> TestUser {
        let user_id = Uuid::new_v4();
        let claims = TestClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .expect("Failed to encode token");

        TestUser {
            user_id,
            username: username.to_string(),
            token,
        }
    }

    pub fn importer(&self) -> ReferenceImportService {
        ReferenceImportService::new(self.db_pool.clone(), self.football_api.clone())
    }

    pub fn fixture_sync(&self) -> FixtureSyncService {
        FixtureSyncService::new(
            self.db_pool.clone(),
            self.football_api.clone(),
            self.sync_settings.clone(),
        )
    }

    pub fn scoring(&self) -> ScoringService {
        ScoringService::new(self.db_pool.clone(), self.sync_settings.clone())
    }

    pub fn updater(&self) -> UpdateSchedulerService {
        UpdateSchedulerService::new(
            self.db_pool.clone(),
            self.football_api.clone(),
            self.sync_settings.clone(),
        )
    }
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let provider = StubProvider::spawn();

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    configuration.database.db_url = None;
    configuration.football_api.base_url = provider.address.clone();
    configuration.football_api.timeout_seconds = 5;
    configuration.sync.relevant_leagues = vec![BUNDESLIGA, PREMIER_LEAGUE];
    configuration.sync.enable_scheduler = false;

    let connection_pool = configure_db(&configuration.database).await;
    let jwt_settings = get_jwt_settings(&configuration);
    let jwt_secret = jwt_settings.secret.expose_secret().to_string();
    let football_api = FootballApiClient::new(&configuration.football_api)
        .expect("Failed to build football API client");

    let server = run(
        listener,
        connection_pool.clone(),
        jwt_settings,
        football_api.clone(),
        configuration.sync.clone(),
        None,
    )
    .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
        provider,
        football_api,
        sync_settings: configuration.sync,
        jwt_secret,
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

/// Two countries, the tracked Bundesliga and Premier League plus an untracked
/// Serie A, and four teams per tracked league. Rapid (10) also shows up in
/// the Premier League list to exercise team deduplication.
pub fn stage_reference_data(app: &TestApp) {
    app.provider.set(|data| {
        data.countries = vec![
            provider::country("Austria", "AT"),
            provider::country("England", "GB"),
            provider::country("Italy", "IT"),
        ];
        data.leagues = vec![
            provider::league(BUNDESLIGA, "Bundesliga", "Austria"),
            provider::league(PREMIER_LEAGUE, "Premier League", "England"),
            provider::league(SERIE_A, "Serie A", "Italy"),
        ];
        data.teams.insert(
            BUNDESLIGA,
            vec![
                provider::team(10, "Rapid Wien", "Austria"),
                provider::team(11, "Sturm Graz", "Austria"),
                provider::team(12, "Red Bull Salzburg", "Austria"),
                provider::team(13, "Austria Wien", "Austria"),
            ],
        );
        data.teams.insert(
            PREMIER_LEAGUE,
            vec![
                provider::team(10, "Rapid Wien", "Austria"),
                provider::team(20, "Arsenal", "England"),
                provider::team(21, "Chelsea", "England"),
                provider::team(22, "Liverpool", "England"),
            ],
        );
    });
}

/// Stage and import countries, leagues and teams
pub async fn import_reference_data(app: &TestApp) {
    stage_reference_data(app);
    let importer = app.importer();
    let relevant = app.sync_settings.relevant_leagues.clone();
    importer.import_countries().await.expect("Failed to import countries");
    importer.import_leagues(&relevant).await.expect("Failed to import leagues");
    importer.import_teams(&relevant).await.expect("Failed to import teams");
}

pub async fn league_id(app: &TestApp, api_id: i64) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM leagues WHERE api_id = $1")
        .bind(api_id)
        .fetch_one(&app.db_pool)
        .await
        .expect("League not imported")
}

pub async fn fixture_id(app: &TestApp, api_id: i64) -> Uuid {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM fixtures WHERE api_id = $1")
        .bind(api_id)
        .fetch_one(&app.db_pool)
        .await
        .expect("Fixture not synced")
}

/// Create the caller's player profile through the API and return its id
pub async fn register_player(app: &TestApp, user: &TestUser) -> Uuid {
    let response = Client::new()
        .post(format!("{}/players/me", app.address))
        .bearer_auth(&user.token)
        .json(&json!({ "pic": null }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success(), "player registration failed");

    let body: Value = response.json().await.expect("Failed to parse response");
    Uuid::parse_str(body["data"]["id"].as_str().expect("No player id")).unwrap()
}

/// Create a game through the API and return its id
pub async fn create_game(
    app: &TestApp,
    creator: &TestUser,
    name: &str,
    league_ids: &[Uuid],
    player_ids: &[Uuid],
) -> Uuid {
    let response = Client::new()
        .post(format!("{}/games", app.address))
        .bearer_auth(&creator.token)
        .json(&json!({
            "name": name,
            "pts_exact": 5,
            "pts_difference": 3,
            "pts_winner": 1,
            "pts_wrong": 0,
            "league_ids": league_ids,
            "player_ids": player_ids
        }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 201, "game creation failed");

    let body: Value = response.json().await.expect("Failed to parse response");
    Uuid::parse_str(body["data"]["id"].as_str().expect("No game id")).unwrap()
}

/// Kickoff at `hour:minute` UTC on `day`
pub fn kickoff(day: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    day.and_hms_opt(hour, minute, 0).expect("Invalid time").and_utc()
}

/// Make fixture payloads available both per match day and per league,
/// replacing anything staged before under the same fixture id
pub fn stage_fixtures(app: &TestApp, fixtures: Vec<Value>) {
    app.provider.set(|data| {
        for fixture in fixtures {
            let fixture_id = fixture["fixture_id"].as_i64().expect("No fixture id");
            let league_id = fixture["league_id"].as_i64().expect("No league id");
            let day = DateTime::from_timestamp(fixture["event_timestamp"].as_i64().expect("No timestamp"), 0)
                .expect("Invalid timestamp")
                .date_naive();

            for rows in data.fixtures_by_date.values_mut().chain(data.fixtures_by_league.values_mut()) {
                rows.retain(|f| f["fixture_id"].as_i64() != Some(fixture_id));
            }
            data.fixtures_by_date.entry(day).or_default().push(fixture.clone());
            data.fixtures_by_league.entry(league_id).or_default().push(fixture);
        }
    });
}

pub async fn accept_invitation(app: &TestApp, user: &TestUser, game_id: Uuid) {
    let response = Client::new()
        .post(format!("{}/games/{}/accept", app.address, game_id))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success(), "accepting the invitation failed");
}

pub async fn submit_tipp(
    app: &TestApp,
    user: &TestUser,
    game_id: Uuid,
    fixture_id: Uuid,
    tipp: (i32, i32),
) -> reqwest::Response {
    Client::new()
        .post(format!("{}/tipps", app.address))
        .bearer_auth(&user.token)
        .json(&json!({
            "game_id": game_id,
            "fixture_id": fixture_id,
            "tipp_home": tipp.0,
            "tipp_away": tipp.1
        }))
        .send()
        .await
        .expect("Failed to execute request.")
}

/// A game over the Bundesliga created by the first user, every other user
/// invited and already accepted
pub async fn game_with_players(app: &TestApp, users: &[&TestUser]) -> Uuid {
    let mut player_ids = Vec::new();
    for user in users {
        player_ids.push(register_player(app, user).await);
    }
    let bundesliga = league_id(app, BUNDESLIGA).await;
    let game_id = create_game(app, users[0], "Stammtisch", &[bundesliga], &player_ids[1..]).await;
    for user in &users[1..] {
        accept_invitation(app, user, game_id).await;
    }
    game_id
}
