// Payload shapes of the football data provider (v2 API). Every collection is
// wrapped as `{"api": {"results": n, "<collection>": [...]}}`.
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::fixture::FixtureRow;
use crate::models::reference::{CountryRow, LeagueRow, TeamRow};

#[derive(Debug, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub api: Option<T>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CountriesBody {
    pub countries: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LeaguesBody {
    pub leagues: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TeamsBody {
    pub teams: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FixturesBody {
    pub fixtures: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OddsBody {
    pub odds: Option<Vec<Value>>,
}

/// A collection parsed row by row. Rows that do not have the expected shape
/// are logged and counted instead of failing the whole batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    pub rows: Vec<T>,
    pub malformed: usize,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            malformed: 0,
        }
    }
}

impl<T: DeserializeOwned> Collection<T> {
    pub fn parse(raw: Vec<Value>, kind: &str) -> Self {
        let mut collection = Collection::default();
        for (index, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<T>(value) {
                Ok(row) => collection.rows.push(row),
                Err(e) => {
                    tracing::warn!("Skipping malformed {} row {}: {}", kind, index, e);
                    collection.malformed += 1;
                }
            }
        }
        collection
    }

    /// Number of rows the provider sent
    pub fn fetched(&self) -> usize {
        self.rows.len() + self.malformed
    }

    /// Append another page of the same collection
    pub fn extend(&mut self, other: Collection<T>) {
        self.rows.extend(other.rows);
        self.malformed += other.malformed;
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiCountry {
    pub country: String,
    pub code: Option<String>,
    pub flag: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiLeague {
    pub league_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub country: Option<String>,
    pub season: Option<i32>,
    pub season_start: Option<String>,
    pub season_end: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiTeam {
    pub team_id: i64,
    pub name: String,
    pub logo: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiFixture {
    pub fixture_id: i64,
    pub league_id: i64,
    pub event_date: Option<String>,
    pub event_timestamp: Option<i64>,
    pub round: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "statusShort")]
    pub status_short: Option<String>,
    #[serde(rename = "homeTeam")]
    pub home_team: ApiFixtureTeam,
    #[serde(rename = "awayTeam")]
    pub away_team: ApiFixtureTeam,
    #[serde(rename = "goalsHomeTeam")]
    pub goals_home_team: Option<i32>,
    #[serde(rename = "goalsAwayTeam")]
    pub goals_away_team: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiFixtureTeam {
    pub team_id: i64,
    pub team_name: Option<String>,
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiFixtureOdds {
    pub fixture: ApiOddsFixture,
    #[serde(default)]
    pub bookmakers: Vec<ApiBookmaker>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiOddsFixture {
    pub fixture_id: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiBookmaker {
    pub bookmaker_id: Option<i64>,
    pub bookmaker_name: Option<String>,
    #[serde(default)]
    pub bets: Vec<ApiBet>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiBet {
    pub label_id: Option<i64>,
    pub label_name: String,
    #[serde(default)]
    pub values: Vec<ApiBetValue>,
}

/// One quote, e.g. `{"value": "Home", "odd": "1.65"}`. The provider sends odds as
/// strings, occasionally as something that is not a number at all.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiBetValue {
    pub value: String,
    pub odd: serde_json::Value,
}

impl ApiBetValue {
    pub fn odd_value(&self) -> Option<f64> {
        let parsed = match &self.odd {
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            serde_json::Value::Number(n) => n.as_f64(),
            _ => None,
        };
        parsed.filter(|odd| odd.is_finite())
    }
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

impl From<ApiCountry> for CountryRow {
    fn from(country: ApiCountry) -> Self {
        CountryRow {
            name: country.country,
            code: country.code,
            flag: country.flag,
        }
    }
}

impl From<ApiLeague> for LeagueRow {
    fn from(league: ApiLeague) -> Self {
        LeagueRow {
            api_id: league.league_id,
            name: league.name,
            country: league.country,
            season: league.season,
            season_start: parse_date(league.season_start.as_deref()),
            season_end: parse_date(league.season_end.as_deref()),
            logo: league.logo,
        }
    }
}

impl From<ApiTeam> for TeamRow {
    fn from(team: ApiTeam) -> Self {
        TeamRow {
            api_id: team.team_id,
            name: team.name,
            logo: team.logo,
            country: team.country,
        }
    }
}

impl TryFrom<ApiFixture> for FixtureRow {
    type Error = String;

    fn try_from(fixture: ApiFixture) -> Result<Self, Self::Error> {
        let from_date = fixture
            .event_date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|d| d.with_timezone(&Utc));
        let match_start = from_date
            .or_else(|| fixture.event_timestamp.and_then(|ts| DateTime::from_timestamp(ts, 0)))
            .ok_or_else(|| format!("fixture {} has no parsable kickoff", fixture.fixture_id))?;

        Ok(FixtureRow {
            api_id: fixture.fixture_id,
            league_api_id: fixture.league_id,
            match_start,
            status: fixture.status,
            status_short: fixture.status_short,
            home_team_api_id: fixture.home_team.team_id,
            away_team_api_id: fixture.away_team.team_id,
            home_goals: fixture.goals_home_team,
            away_goals: fixture.goals_away_team,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_fixture_payload_converts_to_row() {
        let payload = json!({
            "api": {
                "results": 1,
                "fixtures": [{
                    "fixture_id": 65,
                    "league_id": 2,
                    "event_date": "2018-08-10T19:00:00+00:00",
                    "event_timestamp": 1533927600,
                    "round": "Regular Season - 1",
                    "status": "Match Finished",
                    "statusShort": "FT",
                    "elapsed": 90,
                    "venue": "Old Trafford (Manchester)",
                    "homeTeam": {"team_id": 33, "team_name": "Manchester United", "logo": "https://media.api-football.com/teams/33.png"},
                    "awayTeam": {"team_id": 46, "team_name": "Leicester", "logo": "https://media.api-football.com/teams/46.png"},
                    "goalsHomeTeam": 2,
                    "goalsAwayTeam": 1,
                    "score": {"halftime": "1-0", "fulltime": "2-1"}
                }]
            }
        });

        let envelope: Envelope<FixturesBody> = serde_json::from_value(payload).unwrap();
        let fixtures = Collection::<ApiFixture>::parse(envelope.api.unwrap().fixtures.unwrap(), "fixture");
        assert_eq!(fixtures.malformed, 0);
        let row = FixtureRow::try_from(fixtures.rows[0].clone()).unwrap();

        assert_eq!(row.api_id, 65);
        assert_eq!(row.league_api_id, 2);
        assert_eq!(row.match_start, Utc.with_ymd_and_hms(2018, 8, 10, 19, 0, 0).unwrap());
        assert_eq!(row.status_short.as_deref(), Some("FT"));
        assert_eq!(row.home_team_api_id, 33);
        assert_eq!(row.away_team_api_id, 46);
        assert_eq!(row.home_goals, Some(2));
        assert_eq!(row.away_goals, Some(1));
    }

    #[test]
    fn test_fixture_not_started_has_no_goals() {
        let fixture: ApiFixture = serde_json::from_value(json!({
            "fixture_id": 7,
            "league_id": 2,
            "event_date": "2020-02-06T14:00:00+01:00",
            "status": "Not Started",
            "statusShort": "NS",
            "homeTeam": {"team_id": 1},
            "awayTeam": {"team_id": 2},
            "goalsHomeTeam": null,
            "goalsAwayTeam": null
        }))
        .unwrap();

        let row = FixtureRow::try_from(fixture).unwrap();
        assert_eq!(row.home_goals, None);
        assert_eq!(row.away_goals, None);
        // Offsets are normalised to UTC
        assert_eq!(row.match_start, Utc.with_ymd_and_hms(2020, 2, 6, 13, 0, 0).unwrap());
    }

    #[test]
    fn test_fixture_falls_back_to_timestamp_and_rejects_missing_kickoff() {
        let with_timestamp: ApiFixture = serde_json::from_value(json!({
            "fixture_id": 8,
            "league_id": 2,
            "event_date": "not a date",
            "event_timestamp": 1533927600,
            "homeTeam": {"team_id": 1},
            "awayTeam": {"team_id": 2}
        }))
        .unwrap();
        let row = FixtureRow::try_from(with_timestamp).unwrap();
        assert_eq!(row.match_start, Utc.with_ymd_and_hms(2018, 8, 10, 19, 0, 0).unwrap());

        let without_kickoff: ApiFixture = serde_json::from_value(json!({
            "fixture_id": 9,
            "league_id": 2,
            "homeTeam": {"team_id": 1},
            "awayTeam": {"team_id": 2}
        }))
        .unwrap();
        assert!(FixtureRow::try_from(without_kickoff).is_err());
    }

    #[test]
    fn test_malformed_rows_are_counted_not_fatal() {
        let raw = vec![
            json!({
                "fixture_id": 1, "league_id": 218,
                "event_date": "2024-05-11T17:00:00+02:00",
                "homeTeam": {"team_id": 10}, "awayTeam": {"team_id": 11}
            }),
            // Opponent not decided yet
            json!({
                "fixture_id": 2, "league_id": 218,
                "event_date": "2024-05-18T17:00:00+02:00",
                "homeTeam": null, "awayTeam": {"team_id": 11}
            }),
            json!("garbage"),
        ];

        let fixtures = Collection::<ApiFixture>::parse(raw, "fixture");

        assert_eq!(fixtures.rows.len(), 1);
        assert_eq!(fixtures.rows[0].fixture_id, 1);
        assert_eq!(fixtures.malformed, 2);
        assert_eq!(fixtures.fetched(), 3);

        let leagues = Collection::<ApiLeague>::parse(
            vec![json!({"league_id": 218, "country": "Austria"}), json!({"league_id": 219, "name": "2. Liga"})],
            "league",
        );
        assert_eq!(leagues.rows.len(), 1);
        assert_eq!(leagues.rows[0].name, "2. Liga");
        assert_eq!(leagues.malformed, 1);
    }

    #[test]
    fn test_league_payload_parses_season_dates() {
        let league: ApiLeague = serde_json::from_value(json!({
            "league_id": 524,
            "name": "Premier League",
            "type": "League",
            "country": "England",
            "country_code": "GB",
            "season": 2019,
            "season_start": "2019-08-09",
            "season_end": "2020-05-17",
            "logo": "https://media.api-football.com/leagues/2.png",
            "is_current": 1
        }))
        .unwrap();

        let row = LeagueRow::from(league);
        assert_eq!(row.api_id, 524);
        assert_eq!(row.country.as_deref(), Some("England"));
        assert_eq!(row.season_start, NaiveDate::from_ymd_opt(2019, 8, 9));
        assert_eq!(row.season_end, NaiveDate::from_ymd_opt(2020, 5, 17));
    }

    #[test]
    fn test_missing_odds_collection_is_tolerated() {
        let envelope: Envelope<OddsBody> = serde_json::from_value(json!({
            "api": {"results": 0}
        }))
        .unwrap();
        assert!(envelope.api.unwrap().odds.is_none());

        let envelope: Envelope<OddsBody> = serde_json::from_value(json!({
            "message": "Too many requests"
        }))
        .unwrap();
        assert!(envelope.api.is_none());
    }

    #[test]
    fn test_odd_values_accept_strings_and_numbers_only() {
        let quote = |odd: serde_json::Value| ApiBetValue { value: "Home".to_string(), odd };
        assert_eq!(quote(json!("1.65")).odd_value(), Some(1.65));
        assert_eq!(quote(json!(2.5)).odd_value(), Some(2.5));
        assert_eq!(quote(json!("")).odd_value(), None);
        assert_eq!(quote(json!("N/A")).odd_value(), None);
        assert_eq!(quote(json!("NaN")).odd_value(), None);
        assert_eq!(quote(json!(null)).odd_value(), None);
    }
}
