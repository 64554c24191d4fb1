use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::db::ReferenceQueries;
use crate::models::errors::SyncError;
use crate::models::football_api::{ApiTeam, Collection};
use crate::models::reference::{CountryRow, ImportReport, LeagueRow, TeamRow};
use crate::services::football_api_client::FootballApiClient;
use crate::utils::dedupe::dedupe_exact;

/// Pulls countries, current leagues and their teams from the provider into
/// the reference tables. Rows that cannot be joined to a known country are
/// skipped and counted; provider and database failures abort the run.
#[derive(Debug, Clone)]
pub struct ReferenceImportService {
    client: FootballApiClient,
    queries: ReferenceQueries,
}

impl ReferenceImportService {
    pub fn new(pool: PgPool, client: FootballApiClient) -> Self {
        Self {
            client,
            queries: ReferenceQueries::new(pool),
        }
    }

    /// Insert countries not seen before. Existing countries are left untouched.
    pub async fn import_countries(&self) -> Result<ImportReport, SyncError> {
        let fetched = self.client.countries().await.map_err(|e| SyncError::api(e, 0))?;

        let mut report = ImportReport {
            fetched: fetched.fetched(),
            skipped: fetched.malformed,
            ..ImportReport::default()
        };

        let rows: Vec<CountryRow> = fetched.rows.into_iter().map(CountryRow::from).collect();
        let (rows, duplicates) = dedupe_exact(rows);
        report.skipped += duplicates;

        for row in &rows {
            let created = self
                .queries
                .insert_country_if_absent(row)
                .await
                .map_err(|e| SyncError::database(e, report.created))?;
            if created {
                report.created += 1;
            }
        }

        tracing::info!(
            "🌍 Country import: {} fetched, {} created",
            report.fetched, report.created
        );
        Ok(report)
    }

    /// Upsert the relevant current-season leagues. `report.created` is the
    /// number of leagues that did not exist before.
    pub async fn import_leagues(&self, relevant: &[i64]) -> Result<ImportReport, SyncError> {
        let fetched = self.client.current_leagues().await.map_err(|e| SyncError::api(e, 0))?;

        let mut report = ImportReport {
            fetched: fetched.fetched(),
            skipped: fetched.malformed,
            ..ImportReport::default()
        };

        let relevant: HashSet<i64> = relevant.iter().copied().collect();
        let rows: Vec<LeagueRow> = fetched
            .rows
            .into_iter()
            .map(LeagueRow::from)
            .filter(|row| relevant.contains(&row.api_id))
            .collect();
        let (rows, _) = dedupe_exact(rows);

        let countries = self
            .queries
            .country_ids_by_name()
            .await
            .map_err(|e| SyncError::database(e, 0))?;

        for row in &rows {
            let Some(country_id) = resolve_country(&countries, row.country.as_deref()) else {
                tracing::warn!(
                    "Skipping league {} ({}): unknown country {:?}",
                    row.api_id, row.name, row.country
                );
                report.skipped += 1;
                continue;
            };

            let created = self
                .queries
                .upsert_league(row, country_id)
                .await
                .map_err(|e| SyncError::database(e, report.created + report.updated))?;
            if created {
                report.created += 1;
            } else {
                report.updated += 1;
            }
        }

        tracing::info!(
            "🏆 League import: {} fetched, {} relevant, {} created, {} updated, {} skipped",
            report.fetched,
            rows.len(),
            report.created,
            report.updated,
            report.skipped
        );
        Ok(report)
    }

    /// Upsert the teams of every relevant league. A team playing in several
    /// leagues is reported once per league and written once.
    pub async fn import_teams(&self, relevant: &[i64]) -> Result<ImportReport, SyncError> {
        let mut fetched: Collection<ApiTeam> = Collection::default();
        for league_id in relevant {
            let teams = self
                .client
                .teams_by_league(*league_id)
                .await
                .map_err(|e| SyncError::api(e, 0))?;
            fetched.extend(teams);
        }

        let mut report = ImportReport {
            fetched: fetched.fetched(),
            skipped: fetched.malformed,
            ..ImportReport::default()
        };
        let rows: Vec<TeamRow> = fetched.rows.into_iter().map(TeamRow::from).collect();
        let (rows, duplicates) = dedupe_exact(rows);
        tracing::debug!("Dropped {} duplicate team rows", duplicates);

        let countries = self
            .queries
            .country_ids_by_name()
            .await
            .map_err(|e| SyncError::database(e, 0))?;

        for row in &rows {
            let Some(country_id) = resolve_country(&countries, row.country.as_deref()) else {
                tracing::warn!(
                    "Skipping team {} ({}): unknown country {:?}",
                    row.api_id, row.name, row.country
                );
                report.skipped += 1;
                continue;
            };

            let created = self
                .queries
                .upsert_team(row, country_id)
                .await
                .map_err(|e| SyncError::database(e, report.created + report.updated))?;
            if created {
                report.created += 1;
            } else {
                report.updated += 1;
            }
        }

        tracing::info!(
            "👕 Team import for {} leagues: {} fetched, {} created, {} updated, {} skipped",
            relevant.len(),
            report.fetched,
            report.created,
            report.updated,
            report.skipped
        );
        Ok(report)
    }
}

fn resolve_country(countries: &HashMap<String, Uuid>, name: Option<&str>) -> Option<Uuid> {
    name.and_then(|n| countries.get(n)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_join_is_by_exact_name() {
        let austria = Uuid::new_v4();
        let countries: HashMap<String, Uuid> = [("Austria".to_string(), austria)].into_iter().collect();

        assert_eq!(resolve_country(&countries, Some("Austria")), Some(austria));
        assert_eq!(resolve_country(&countries, Some("austria")), None);
        assert_eq!(resolve_country(&countries, None), None);
    }
}
