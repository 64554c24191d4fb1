use sqlx::PgPool;

use crate::config::sync::SyncSettings;
use crate::db::tipp_queries::{ScoreUpdate, ScoringCandidate};
use crate::db::TippQueries;
use crate::game::tipp_evaluator::{award_points, Score};
use crate::models::errors::SyncError;
use crate::models::game::PointSchedule;

/// Re-scores every open tipp whose fixture has goals. Tipps of fixtures in a
/// final state are marked final and never touched again.
#[derive(Debug, Clone)]
pub struct ScoringService {
    tipps: TippQueries,
    settings: SyncSettings,
}

impl ScoringService {
    pub fn new(pool: PgPool, settings: SyncSettings) -> Self {
        Self {
            tipps: TippQueries::new(pool),
            settings,
        }
    }

    /// Full recompute pass. Returns the number of tipps evaluated.
    pub async fn recompute_scores(&self) -> Result<usize, SyncError> {
        self.evaluate_open_tipps()
            .await
            .map_err(|e| SyncError::database(e, 0))
    }

    pub(crate) async fn evaluate_open_tipps(&self) -> Result<usize, sqlx::Error> {
        let candidates = self.tipps.scoring_candidates().await?;
        if candidates.is_empty() {
            tracing::debug!("No open tipps with results to score");
            return Ok(0);
        }

        let updates: Vec<ScoreUpdate> = candidates
            .iter()
            .map(|candidate| evaluate_candidate(candidate, &self.settings))
            .collect();
        let finalized = updates.iter().filter(|u| u.is_final).count();

        let written = self.tipps.apply_scores(&updates).await?;

        tracing::info!(
            "🎯 Scored {} tipps ({} written, {} now final)",
            candidates.len(),
            written,
            finalized
        );
        Ok(candidates.len())
    }
}

pub fn evaluate_candidate(candidate: &ScoringCandidate, settings: &SyncSettings) -> ScoreUpdate {
    let points = PointSchedule {
        exact: candidate.pts_exact,
        difference: candidate.pts_difference,
        winner: candidate.pts_winner,
        wrong: candidate.pts_wrong,
    };
    let score = award_points(
        Score::new(candidate.tipp_home, candidate.tipp_away),
        Score::new(candidate.home_goals, candidate.away_goals),
        &points,
    );

    ScoreUpdate {
        tipp_id: candidate.tipp_id,
        score,
        is_final: settings.is_final_status(candidate.status_short.as_deref()),
    }
}
