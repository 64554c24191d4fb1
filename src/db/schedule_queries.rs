use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::schedule::UpdateSchedule;

#[derive(Debug, Clone)]
pub struct ScheduleQueries {
    pool: PgPool,
}

impl ScheduleQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn load(&self) -> Result<UpdateSchedule, sqlx::Error> {
        sqlx::query_as::<_, UpdateSchedule>(
            r#"
            SELECT next_league_update, next_fixture_update, last_fixture_update
            FROM update_schedule
            WHERE id = TRUE
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    /// Persist the cadence dates. The last refresh timestamp is owned by the
    /// synchroniser and left untouched here.
    pub async fn save_cadence(&self, schedule: &UpdateSchedule) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO update_schedule (id, next_league_update, next_fixture_update)
            VALUES (TRUE, $1, $2)
            ON CONFLICT (id) DO UPDATE SET
                next_league_update = EXCLUDED.next_league_update,
                next_fixture_update = EXCLUDED.next_fixture_update
            "#,
        )
        .bind(schedule.next_league_update)
        .bind(schedule.next_fixture_update)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn touch_last_fixture_update(&self, at: DateTime<Utc>) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO update_schedule (id, next_league_update, next_fixture_update, last_fixture_update)
            VALUES (TRUE, CURRENT_DATE, CURRENT_DATE, $1)
            ON CONFLICT (id) DO UPDATE SET last_fixture_update = EXCLUDED.last_fixture_update
            "#,
        )
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
