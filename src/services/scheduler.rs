use std::error::Error;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use uuid::Uuid;

use crate::services::update_scheduler::UpdateSchedulerService;

pub struct SchedulerService {
    scheduler: Arc<Mutex<JobScheduler>>,
    updater: UpdateSchedulerService,
    daily_job: Arc<Mutex<Option<Uuid>>>,
}

impl SchedulerService {
    pub async fn new(updater: UpdateSchedulerService) -> Result<Self, Box<dyn Error>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
            updater,
            daily_job: Arc::new(Mutex::new(None)),
        })
    }

    pub async fn start(&self) -> Result<(), Box<dyn Error>> {
        let scheduler = self.scheduler.lock().await;
        scheduler.start().await?;

        tracing::info!("✅ Scheduler service started");
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), Box<dyn Error>> {
        let mut scheduler = self.scheduler.lock().await;
        scheduler.shutdown().await?;

        tracing::info!("🛑 Scheduler service stopped");
        Ok(())
    }

    /// Run the scheduled update on `cron_expr` (six fields, UTC). Scheduling
    /// again replaces the previous job.
    pub async fn schedule_daily_update(&self, cron_expr: &str) -> Result<(), JobSchedulerError> {
        let scheduler = self.scheduler.lock().await;
        let updater = self.updater.clone();

        let job = Job::new_async(cron_expr, move |_uuid, _l| {
            let updater = updater.clone();

            Box::pin(async move {
                let today = updater.today();
                tracing::info!("⏰ Running scheduled data update for {}", today);

                match updater.run_scheduled_update(today).await {
                    Ok(report) => {
                        tracing::info!(
                            "✅ Scheduled update finished: leagues {:?}, fixtures {:?}, next league update {}, next fixture update {}",
                            report.league_refresh,
                            report.fixture_refresh,
                            report.schedule.next_league_update,
                            report.schedule.next_fixture_update
                        );
                    }
                    Err(e) => {
                        tracing::error!("❌ Scheduled update failed: {}", e);
                    }
                }
            })
        })?;

        let job_id = job.guid();
        let mut daily_job = self.daily_job.lock().await;
        if let Some(previous) = daily_job.take() {
            scheduler.remove(&previous).await?;
        }
        scheduler.add(job).await?;
        *daily_job = Some(job_id);

        tracing::info!("✅ Scheduled data update with cron '{}'", cron_expr);
        Ok(())
    }
}
