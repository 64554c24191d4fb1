use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::sync::SyncSettings;
use crate::db::{FixtureQueries, ReferenceQueries, ScheduleQueries};
use crate::models::errors::SyncError;
use crate::models::fixture::{AverageOdds, FixtureRow, FixtureUpsert, SyncMode, SyncReport};
use crate::models::football_api::{ApiFixture, ApiFixtureOdds, Collection};
use crate::services::football_api_client::FootballApiClient;
use crate::services::odds::average_match_winner_odds;
use crate::services::scoring_service::ScoringService;
use crate::utils::dedupe::dedupe_exact;

/// A provider fixture whose league is tracked locally
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedFixture {
    pub league_id: Uuid,
    pub row: FixtureRow,
}

#[derive(Debug, Clone)]
pub struct FixtureSyncService {
    client: FootballApiClient,
    reference: ReferenceQueries,
    fixtures: FixtureQueries,
    schedule: ScheduleQueries,
    scoring: ScoringService,
    settings: SyncSettings,
}

impl FixtureSyncService {
    pub fn new(pool: PgPool, client: FootballApiClient, settings: SyncSettings) -> Self {
        Self {
            client,
            reference: ReferenceQueries::new(pool.clone()),
            fixtures: FixtureQueries::new(pool.clone()),
            schedule: ScheduleQueries::new(pool.clone()),
            scoring: ScoringService::new(pool, settings.clone()),
            settings,
        }
    }

    /// The provider's current match day, the usual `today` for a sync
    pub fn today(&self) -> NaiveDate {
        self.client.today()
    }

    /// Pull fixtures for `mode`, merge them into the fixture table, stamp the
    /// refresh time and re-score all open tipps.
    pub async fn sync_fixtures(&self, mode: SyncMode, today: NaiveDate) -> Result<SyncReport, SyncError> {
        tracing::info!("🔄 Starting {} fixture sync for {}", mode, today);

        let fetched = self.fetch(mode, today).await?;
        let mut report = SyncReport {
            fetched: fetched.fetched(),
            unparsable: fetched.malformed,
            ..SyncReport::default()
        };

        let rows = parse_fixtures(fetched.rows, &mut report);
        let (rows, duplicates) = dedupe_exact(rows);
        report.duplicates = duplicates;

        let leagues = self
            .reference
            .league_ids_by_api_id()
            .await
            .map_err(|e| SyncError::database(e, 0))?;
        let tracked = retain_tracked(rows, &leagues, &mut report);

        let odds = if mode.refreshes_odds() {
            let timezone = self.client.timezone();
            let in_window: Vec<i64> = tracked
                .iter()
                .filter(|f| in_odds_window(f.row.match_start, today, timezone))
                .map(|f| f.row.api_id)
                .collect();
            report.odds_requested = in_window.len();
            self.fetch_odds(&in_window).await?
        } else {
            HashMap::new()
        };

        let teams = self
            .reference
            .team_ids_by_api_id()
            .await
            .map_err(|e| SyncError::database(e, 0))?;
        let upserts = plan_upserts(tracked, &teams, &odds, mode, &mut report);

        for upsert in &upserts {
            let created = self
                .fixtures
                .upsert_fixture(upsert)
                .await
                .map_err(|e| SyncError::database(e, report.written()))?;
            if created {
                report.created += 1;
            } else {
                report.updated += 1;
            }
        }

        self.schedule
            .touch_last_fixture_update(Utc::now())
            .await
            .map_err(|e| SyncError::database(e, report.written()))?;

        report.tipps_evaluated = self
            .scoring
            .evaluate_open_tipps()
            .await
            .map_err(|e| SyncError::database(e, report.written()))?;

        tracing::info!(
            "✅ {} fixture sync: {} fetched, {} created, {} updated, {} dropped (league {}, team {}, unparsable {}), {} tipps scored",
            mode,
            report.fetched,
            report.created,
            report.updated,
            report.unknown_league + report.unknown_team + report.unparsable,
            report.unknown_league,
            report.unknown_team,
            report.unparsable,
            report.tipps_evaluated
        );
        Ok(report)
    }

    async fn fetch(&self, mode: SyncMode, today: NaiveDate) -> Result<Collection<ApiFixture>, SyncError> {
        let mut fetched = Collection::default();
        match mode {
            SyncMode::ByLeagues => {
                for league_id in &self.settings.relevant_leagues {
                    let fixtures = self
                        .client
                        .fixtures_by_league(*league_id)
                        .await
                        .map_err(|e| SyncError::api(e, 0))?;
                    fetched.extend(fixtures);
                }
            }
            SyncMode::ByDateRange | SyncMode::Live => {
                for day in mode.match_days(today) {
                    let fixtures = self
                        .client
                        .fixtures_by_date(day)
                        .await
                        .map_err(|e| SyncError::api(e, 0))?;
                    fetched.extend(fixtures);
                }
            }
        }
        Ok(fetched)
    }

    async fn fetch_odds(&self, fixture_ids: &[i64]) -> Result<HashMap<i64, AverageOdds>, SyncError> {
        let mut entries: Vec<ApiFixtureOdds> = Vec::new();
        for fixture_id in fixture_ids {
            let odds = self
                .client
                .odds_by_fixture(*fixture_id)
                .await
                .map_err(|e| SyncError::api(e, 0))?;
            entries.extend(odds);
        }
        let averaged = average_match_winner_odds(&entries);
        tracing::debug!(
            "Averaged odds for {} of {} fixtures",
            averaged.len(),
            fixture_ids.len()
        );
        Ok(averaged)
    }
}

/// Fixtures without a usable kickoff are counted and dropped
pub fn parse_fixtures(fetched: Vec<ApiFixture>, report: &mut SyncReport) -> Vec<FixtureRow> {
    fetched
        .into_iter()
        .filter_map(|fixture| match FixtureRow::try_from(fixture) {
            Ok(row) => Some(row),
            Err(reason) => {
                tracing::warn!("Skipping fixture: {}", reason);
                report.unparsable += 1;
                None
            }
        })
        .collect()
}

/// Keep only fixtures of leagues known locally
pub fn retain_tracked(
    rows: Vec<FixtureRow>,
    leagues: &HashMap<i64, Uuid>,
    report: &mut SyncReport,
) -> Vec<TrackedFixture> {
    rows.into_iter()
        .filter_map(|row| match leagues.get(&row.league_api_id) {
            Some(league_id) => Some(TrackedFixture {
                league_id: *league_id,
                row,
            }),
            None => {
                report.unknown_league += 1;
                None
            }
        })
        .collect()
}

/// Kickoff strictly after yesterday 00:00 and strictly before the day after
/// tomorrow 00:00, both midnights local to `timezone`
pub fn in_odds_window(match_start: DateTime<Utc>, today: NaiveDate, timezone: Tz) -> bool {
    let (start, end) = odds_window(today, timezone);
    match_start > start && match_start < end
}

fn odds_window(today: NaiveDate, timezone: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        local_midnight(today - Duration::days(1), timezone),
        local_midnight(today + Duration::days(2), timezone),
    )
}

fn local_midnight(day: NaiveDate, timezone: Tz) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    match timezone.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // Midnight skipped by a DST jump
        None => timezone.from_utc_datetime(&naive).with_timezone(&Utc),
    }
}

/// Resolve both teams and attach odds. Odds are attached only in the mode
/// that refreshes them, so other syncs can never overwrite stored odds.
pub fn plan_upserts(
    tracked: Vec<TrackedFixture>,
    teams: &HashMap<i64, Uuid>,
    odds: &HashMap<i64, AverageOdds>,
    mode: SyncMode,
    report: &mut SyncReport,
) -> Vec<FixtureUpsert> {
    let mut upserts = Vec::with_capacity(tracked.len());

    for TrackedFixture { league_id, row } in tracked {
        let (Some(home_team_id), Some(away_team_id)) = (
            teams.get(&row.home_team_api_id),
            teams.get(&row.away_team_api_id),
        ) else {
            tracing::warn!(
                "Skipping fixture {}: unknown team ({} vs {})",
                row.api_id, row.home_team_api_id, row.away_team_api_id
            );
            report.unknown_team += 1;
            continue;
        };

        let fixture_odds = if mode.refreshes_odds() {
            odds.get(&row.api_id).copied().filter(|o| !o.is_empty())
        } else {
            None
        };

        upserts.push(FixtureUpsert {
            api_id: row.api_id,
            league_id,
            home_team_id: *home_team_id,
            away_team_id: *away_team_id,
            match_start: row.match_start,
            status: row.status,
            status_short: row.status_short,
            home_goals: row.home_goals,
            away_goals: row.away_goals,
            odds: fixture_odds,
        });
    }

    upserts
}
