mod common;
use common::utils::spawn_app;

use tippspiel_backend::services::SchedulerService;

#[tokio::test]
async fn scheduler_lifecycle() {
    let app = spawn_app().await;

    let scheduler = SchedulerService::new(app.updater())
        .await
        .expect("Failed to create scheduler service");

    scheduler.start().await.expect("Failed to start scheduler");
    scheduler.stop().await.expect("Failed to stop scheduler");
}

#[tokio::test]
async fn daily_update_can_be_rescheduled() {
    let app = spawn_app().await;
    let scheduler = SchedulerService::new(app.updater())
        .await
        .expect("Failed to create scheduler service");
    scheduler.start().await.expect("Failed to start scheduler");

    scheduler
        .schedule_daily_update("0 30 4 * * *")
        .await
        .expect("Failed to schedule daily update");
    scheduler
        .schedule_daily_update("0 0 6 * * *")
        .await
        .expect("Failed to replace daily update");

    scheduler.stop().await.expect("Failed to stop scheduler");
}

#[tokio::test]
async fn invalid_cron_expression_is_rejected() {
    let app = spawn_app().await;
    let scheduler = SchedulerService::new(app.updater())
        .await
        .expect("Failed to create scheduler service");

    let result = scheduler.schedule_daily_update("every morning").await;

    assert!(result.is_err());
}
