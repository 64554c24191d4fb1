use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::football_api::FootballApiSettings;
use crate::models::errors::FootballApiError;
use crate::models::football_api::{
    ApiCountry, ApiFixture, ApiFixtureOdds, ApiLeague, ApiTeam, Collection, CountriesBody, Envelope,
    FixturesBody, LeaguesBody, OddsBody, TeamsBody,
};

/// HTTP client for the football data provider. Cheap to clone; the
/// underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct FootballApiClient {
    base_url: String,
    api_host: String,
    api_key: SecretString,
    timezone: Tz,
    match_winner_label_id: i64,
    client: Client,
}

impl FootballApiClient {
    pub fn new(settings: &FootballApiSettings) -> Result<Self, FootballApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .connect_timeout(Duration::from_secs(settings.timeout_seconds.min(10)))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|source| FootballApiError::Network {
                url: settings.base_url.clone(),
                source,
            })?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_host: settings.api_host.clone(),
            api_key: settings.api_key.clone(),
            timezone: settings.timezone,
            match_winner_label_id: settings.match_winner_label_id,
            client,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The provider's current match day
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    pub async fn countries(&self) -> Result<Collection<ApiCountry>, FootballApiError> {
        let url = format!("{}/countries", self.base_url);
        let body: Option<CountriesBody> = self.get_envelope(&url, false).await?;
        body.and_then(|b| b.countries)
            .map(|rows| Collection::parse(rows, "country"))
            .ok_or(FootballApiError::MissingCollection { url, key: "countries" })
    }

    pub async fn current_leagues(&self) -> Result<Collection<ApiLeague>, FootballApiError> {
        let url = format!("{}/leagues/current", self.base_url);
        let body: Option<LeaguesBody> = self.get_envelope(&url, false).await?;
        body.and_then(|b| b.leagues)
            .map(|rows| Collection::parse(rows, "league"))
            .ok_or(FootballApiError::MissingCollection { url, key: "leagues" })
    }

    pub async fn teams_by_league(&self, league_api_id: i64) -> Result<Collection<ApiTeam>, FootballApiError> {
        let url = format!("{}/teams/league/{}", self.base_url, league_api_id);
        let body: Option<TeamsBody> = self.get_envelope(&url, false).await?;
        body.and_then(|b| b.teams)
            .map(|rows| Collection::parse(rows, "team"))
            .ok_or(FootballApiError::MissingCollection { url, key: "teams" })
    }

    pub async fn fixtures_by_league(&self, league_api_id: i64) -> Result<Collection<ApiFixture>, FootballApiError> {
        let url = format!("{}/fixtures/league/{}", self.base_url, league_api_id);
        let body: Option<FixturesBody> = self.get_envelope(&url, true).await?;
        body.and_then(|b| b.fixtures)
            .map(|rows| Collection::parse(rows, "fixture"))
            .ok_or(FootballApiError::MissingCollection { url, key: "fixtures" })
    }

    pub async fn fixtures_by_date(&self, date: NaiveDate) -> Result<Collection<ApiFixture>, FootballApiError> {
        let url = format!("{}/fixtures/date/{}", self.base_url, date.format("%Y-%m-%d"));
        let body: Option<FixturesBody> = self.get_envelope(&url, true).await?;
        body.and_then(|b| b.fixtures)
            .map(|rows| Collection::parse(rows, "fixture"))
            .ok_or(FootballApiError::MissingCollection { url, key: "fixtures" })
    }

    /// "Match Winner" odds of one fixture. Many fixtures have none, so a
    /// missing collection is an empty result rather than an error.
    pub async fn odds_by_fixture(&self, fixture_api_id: i64) -> Result<Vec<ApiFixtureOdds>, FootballApiError> {
        let url = format!(
            "{}/odds/fixture/{}/label/{}",
            self.base_url, fixture_api_id, self.match_winner_label_id
        );
        let body: Option<OddsBody> = self.get_envelope(&url, true).await?;
        let rows = body.and_then(|b| b.odds).unwrap_or_default();
        Ok(Collection::parse(rows, "odds").rows)
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        url: &str,
        with_timezone: bool,
    ) -> Result<Option<T>, FootballApiError> {
        tracing::debug!("⚽ Calling football API at {}", url);

        let mut request = self
            .client
            .get(url)
            .header("x-rapidapi-key", self.api_key.expose_secret())
            .header("x-rapidapi-host", &self.api_host);
        if with_timezone {
            request = request.query(&[("timezone", self.timezone.name())]);
        }

        let response = request.send().await.map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(url, e))?;

        if !status.is_success() {
            tracing::error!("❌ Football API returned error {} for {}: {}", status, url, body);
            return Err(FootballApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|source| {
            FootballApiError::InvalidResponse {
                url: url.to_string(),
                source,
            }
        })?;

        Ok(envelope.api)
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> FootballApiError {
        if e.is_timeout() {
            FootballApiError::Timeout { url: url.to_string() }
        } else {
            FootballApiError::Network {
                url: url.to_string(),
                source: e,
            }
        }
    }
}
