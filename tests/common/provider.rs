use actix_web::{web, App, HttpResponse, HttpServer};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

/// Payloads served by the stub football provider. Anything not set is an
/// empty collection.
#[derive(Debug, Default)]
pub struct ProviderData {
    pub countries: Vec<Value>,
    pub leagues: Vec<Value>,
    pub teams: HashMap<i64, Vec<Value>>,
    pub fixtures_by_league: HashMap<i64, Vec<Value>>,
    pub fixtures_by_date: HashMap<NaiveDate, Vec<Value>>,
    pub odds: HashMap<i64, Vec<Value>>,
    /// Answer every request with 503
    pub unavailable: bool,
    /// Answer requests whose path starts with one of these with 503
    pub failing_paths: Vec<String>,
    pub requests: Vec<String>,
}

#[derive(Clone)]
pub struct StubProvider {
    pub address: String,
    pub data: Arc<Mutex<ProviderData>>,
}

impl StubProvider {
    pub fn spawn() -> StubProvider {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let data = Arc::new(Mutex::new(ProviderData::default()));

        let state = web::Data::new(data.clone());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .route("/countries", web::get().to(countries))
                .route("/leagues/current", web::get().to(leagues))
                .route("/teams/league/{id}", web::get().to(teams))
                .route("/fixtures/league/{id}", web::get().to(fixtures_by_league))
                .route("/fixtures/date/{date}", web::get().to(fixtures_by_date))
                .route("/odds/fixture/{id}/label/{label}", web::get().to(odds))
        })
        .workers(1)
        .listen(listener)
        .expect("Failed to listen")
        .run();
        let _ = tokio::spawn(server);

        StubProvider {
            address: format!("http://127.0.0.1:{}", port),
            data,
        }
    }

    pub fn set<F: FnOnce(&mut ProviderData)>(&self, f: F) {
        let mut data = self.data.lock().unwrap();
        f(&mut data);
    }

    pub fn requests(&self) -> Vec<String> {
        self.data.lock().unwrap().requests.clone()
    }
}

type State = web::Data<Arc<Mutex<ProviderData>>>;

fn envelope(key: &str, rows: Vec<Value>) -> HttpResponse {
    let mut body = serde_json::Map::new();
    body.insert("results".to_string(), json!(rows.len()));
    body.insert(key.to_string(), Value::Array(rows));
    HttpResponse::Ok().json(json!({ "api": body }))
}

fn record(state: &State, path: String) -> Option<HttpResponse> {
    let mut data = state.lock().unwrap();
    let failing = data.unavailable || data.failing_paths.iter().any(|p| path.starts_with(p.as_str()));
    data.requests.push(path);
    if failing {
        Some(HttpResponse::ServiceUnavailable().body("provider down"))
    } else {
        None
    }
}

async fn countries(state: State) -> HttpResponse {
    if let Some(down) = record(&state, "/countries".to_string()) {
        return down;
    }
    let rows = state.lock().unwrap().countries.clone();
    envelope("countries", rows)
}

async fn leagues(state: State) -> HttpResponse {
    if let Some(down) = record(&state, "/leagues/current".to_string()) {
        return down;
    }
    let rows = state.lock().unwrap().leagues.clone();
    envelope("leagues", rows)
}

async fn teams(state: State, path: web::Path<i64>) -> HttpResponse {
    let id = path.into_inner();
    if let Some(down) = record(&state, format!("/teams/league/{}", id)) {
        return down;
    }
    let rows = state.lock().unwrap().teams.get(&id).cloned().unwrap_or_default();
    envelope("teams", rows)
}

async fn fixtures_by_league(state: State, path: web::Path<i64>) -> HttpResponse {
    let id = path.into_inner();
    if let Some(down) = record(&state, format!("/fixtures/league/{}", id)) {
        return down;
    }
    let rows = state.lock().unwrap().fixtures_by_league.get(&id).cloned().unwrap_or_default();
    envelope("fixtures", rows)
}

async fn fixtures_by_date(state: State, path: web::Path<String>) -> HttpResponse {
    let date = path.into_inner();
    if let Some(down) = record(&state, format!("/fixtures/date/{}", date)) {
        return down;
    }
    let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d").expect("Invalid date in path");
    let rows = state.lock().unwrap().fixtures_by_date.get(&day).cloned().unwrap_or_default();
    envelope("fixtures", rows)
}

async fn odds(state: State, path: web::Path<(i64, i64)>) -> HttpResponse {
    let (id, _label) = path.into_inner();
    if let Some(down) = record(&state, format!("/odds/fixture/{}", id)) {
        return down;
    }
    match state.lock().unwrap().odds.get(&id).cloned() {
        Some(rows) => envelope("odds", rows),
        // Fixtures without odds come back without the collection at all
        None => HttpResponse::Ok().json(json!({ "api": { "results": 0 } })),
    }
}

// Payload builders in the provider's v2 shape

pub fn country(name: &str, code: &str) -> Value {
    json!({
        "country": name,
        "code": code,
        "flag": format!("https://media.api-sports.io/flags/{}.svg", code.to_lowercase())
    })
}

pub fn league(league_id: i64, name: &str, country: &str) -> Value {
    json!({
        "league_id": league_id,
        "name": name,
        "type": "League",
        "country": country,
        "country_code": null,
        "season": 2024,
        "season_start": "2024-07-26",
        "season_end": "2025-05-25",
        "logo": format!("https://media.api-sports.io/football/leagues/{}.png", league_id),
        "is_current": 1
    })
}

pub fn team(team_id: i64, name: &str, country: &str) -> Value {
    json!({
        "team_id": team_id,
        "name": name,
        "code": null,
        "logo": format!("https://media.api-sports.io/football/teams/{}.png", team_id),
        "country": country,
        "founded": 1899,
        "venue_name": null
    })
}

pub fn fixture(
    fixture_id: i64,
    league_id: i64,
    kickoff: DateTime<Utc>,
    home_team: i64,
    away_team: i64,
    status_short: &str,
    goals: Option<(i32, i32)>,
) -> Value {
    json!({
        "fixture_id": fixture_id,
        "league_id": league_id,
        "event_date": kickoff.to_rfc3339(),
        "event_timestamp": kickoff.timestamp(),
        "round": "Regular Season - 1",
        "status": status_long(status_short),
        "statusShort": status_short,
        "homeTeam": { "team_id": home_team, "team_name": format!("Team {}", home_team), "logo": null },
        "awayTeam": { "team_id": away_team, "team_name": format!("Team {}", away_team), "logo": null },
        "goalsHomeTeam": goals.map(|g| g.0),
        "goalsAwayTeam": goals.map(|g| g.1)
    })
}

/// Match Winner quotes of several bookmakers, each as (home, draw, away)
pub fn odds_entry(fixture_id: i64, bookmakers: &[(&str, &str, &str)]) -> Value {
    let bookmakers: Vec<Value> = bookmakers
        .iter()
        .enumerate()
        .map(|(i, (home, draw, away))| {
            json!({
                "bookmaker_id": i + 1,
                "bookmaker_name": format!("Bookie {}", i + 1),
                "bets": [{
                    "label_id": 1,
                    "label_name": "Match Winner",
                    "values": [
                        { "value": "Home", "odd": home },
                        { "value": "Draw", "odd": draw },
                        { "value": "Away", "odd": away }
                    ]
                }]
            })
        })
        .collect();

    json!({
        "fixture": { "league_id": 218, "fixture_id": fixture_id, "updateAt": 1715000000 },
        "bookmakers": bookmakers
    })
}

fn status_long(status_short: &str) -> &'static str {
    match status_short {
        "NS" => "Not Started",
        "1H" => "First Half",
        "HT" => "Halftime",
        "2H" => "Second Half",
        "FT" => "Match Finished",
        "AET" => "Match Finished After Extra Time",
        "PEN" => "Match Finished After Penalty",
        _ => "Unknown",
    }
}
