use chrono::{Duration, NaiveDate};
use sqlx::PgPool;

use crate::config::sync::SyncSettings;
use crate::db::{ReferenceQueries, ScheduleQueries};
use crate::models::errors::SyncError;
use crate::models::fixture::{SyncMode, SyncReport};
use crate::models::schedule::{
    CadenceOutcome, LeagueRefreshReport, ScheduledUpdateReport, UpdatePlan, UpdateSchedule,
};
use crate::services::fixture_sync::FixtureSyncService;
use crate::services::football_api_client::FootballApiClient;
use crate::services::reference_import::ReferenceImportService;

pub const LEAGUE_UPDATE_INTERVAL_DAYS: i64 = 7;
pub const FIXTURE_UPDATE_INTERVAL_DAYS: i64 = 1;

/// Both cadences are checked independently
pub fn plan_updates(today: NaiveDate, schedule: &UpdateSchedule) -> UpdatePlan {
    UpdatePlan {
        refresh_leagues: today >= schedule.next_league_update,
        refresh_fixtures: today >= schedule.next_fixture_update,
    }
}

/// Next cadence dates after a run. A cadence that ran successfully moves
/// forward from today; one that failed or was not due keeps its date.
pub fn advance_schedule(
    schedule: &UpdateSchedule,
    today: NaiveDate,
    leagues_done: bool,
    fixtures_done: bool,
) -> UpdateSchedule {
    let mut next = schedule.clone();
    if leagues_done {
        next.next_league_update = today + Duration::days(LEAGUE_UPDATE_INTERVAL_DAYS);
    }
    if fixtures_done {
        next.next_fixture_update = today + Duration::days(FIXTURE_UPDATE_INTERVAL_DAYS);
    }
    next
}

#[derive(Debug, Clone)]
pub struct UpdateSchedulerService {
    importer: ReferenceImportService,
    fixtures: FixtureSyncService,
    reference: ReferenceQueries,
    schedule: ScheduleQueries,
    settings: SyncSettings,
}

impl UpdateSchedulerService {
    pub fn new(pool: PgPool, client: FootballApiClient, settings: SyncSettings) -> Self {
        Self {
            importer: ReferenceImportService::new(pool.clone(), client.clone()),
            fixtures: FixtureSyncService::new(pool.clone(), client, settings.clone()),
            reference: ReferenceQueries::new(pool.clone()),
            schedule: ScheduleQueries::new(pool),
            settings,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.fixtures.today()
    }

    /// Read the schedule, run whatever is due for `today` and write the
    /// advanced schedule back. Provider and sync failures are reported per
    /// cadence; only failing to read or write the schedule itself is an error.
    pub async fn run_scheduled_update(&self, today: NaiveDate) -> Result<ScheduledUpdateReport, sqlx::Error> {
        let current = self.schedule.load().await?;
        let plan = plan_updates(today, &current);
        tracing::info!(
            "📅 Scheduled update for {}: leagues due {}, fixtures due {}",
            today, plan.refresh_leagues, plan.refresh_fixtures
        );

        let league_refresh = if plan.refresh_leagues {
            match self.refresh_leagues(today).await {
                Ok(report) => CadenceOutcome::Completed(report),
                Err(e) => {
                    tracing::error!("❌ League refresh failed, retrying on next run: {}", e);
                    CadenceOutcome::Failed { error: e.to_string() }
                }
            }
        } else {
            CadenceOutcome::NotDue
        };

        let fixture_refresh = if plan.refresh_fixtures {
            match self.refresh_fixtures(today).await {
                Ok(report) => CadenceOutcome::Completed(report),
                Err(e) => {
                    tracing::error!("❌ Fixture refresh failed, retrying on next run: {}", e);
                    CadenceOutcome::Failed { error: e.to_string() }
                }
            }
        } else {
            CadenceOutcome::NotDue
        };

        let next = advance_schedule(
            &current,
            today,
            matches!(league_refresh, CadenceOutcome::Completed(_)),
            matches!(fixture_refresh, CadenceOutcome::Completed(_)),
        );
        self.schedule.save_cadence(&next).await?;

        // The fixture refreshes above stamp the last update time themselves
        let schedule = self.schedule.load().await?;

        Ok(ScheduledUpdateReport {
            league_refresh,
            fixture_refresh,
            schedule,
        })
    }

    /// Countries and leagues; teams and all league fixtures only while a
    /// relevant league still waits for them. A league counts as waiting until
    /// both imports finished, so a refresh that failed halfway picks them up
    /// again on the retry.
    async fn refresh_leagues(&self, today: NaiveDate) -> Result<LeagueRefreshReport, SyncError> {
        let relevant = &self.settings.relevant_leagues;

        let countries = self.importer.import_countries().await?;
        let leagues = self.importer.import_leagues(relevant).await?;

        let awaiting = self
            .reference
            .leagues_awaiting_teams(relevant)
            .await
            .map_err(|e| SyncError::database(e, 0))?;
        if awaiting.is_empty() {
            return Ok(LeagueRefreshReport {
                countries,
                leagues,
                teams: None,
                fixtures: None,
            });
        }

        tracing::info!(
            "{} new leagues, {} awaiting teams and fixtures: {:?}",
            leagues.created,
            awaiting.len(),
            awaiting
        );
        let teams = self.importer.import_teams(relevant).await?;
        let fixtures = self.fixtures.sync_fixtures(SyncMode::ByLeagues, today).await?;
        self.reference
            .mark_teams_imported(&awaiting)
            .await
            .map_err(|e| SyncError::database(e, fixtures.written()))?;

        Ok(LeagueRefreshReport {
            countries,
            leagues,
            teams: Some(teams),
            fixtures: Some(fixtures),
        })
    }

    async fn refresh_fixtures(&self, today: NaiveDate) -> Result<SyncReport, SyncError> {
        self.fixtures.sync_fixtures(SyncMode::ByDateRange, today).await
    }
}
