use std::net::TcpListener;
use std::sync::Arc;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use tippspiel_backend::run;
use tippspiel_backend::config::settings::{get_config, get_jwt_settings};
use tippspiel_backend::telemetry::{get_subscriber, init_subscriber};
use tippspiel_backend::services::{FootballApiClient, SchedulerService, UpdateSchedulerService};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "tippspiel-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    let jwt_settings = get_jwt_settings(&config);

    // Only try to establish connection when actually used
    let connection_pool = PgPoolOptions::new()
        .max_connections(16)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy(
            config.database.connection_string().expose_secret()
        )
        .expect("Failed to create Postgres connection pool");

    if let Err(e) = sqlx::migrate!("./migrations").run(&connection_pool).await {
        tracing::error!("❌ Failed to run database migrations: {}", e);
        std::process::exit(1);
    }

    let football_api = match FootballApiClient::new(&config.football_api) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("❌ Failed to create football API client: {}", e);
            std::process::exit(1);
        }
    };

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;

    let scheduler_service = if config.sync.enable_scheduler {
        let updater = UpdateSchedulerService::new(
            connection_pool.clone(),
            football_api.clone(),
            config.sync.clone(),
        );
        let scheduler = match SchedulerService::new(updater).await {
            Ok(scheduler) => scheduler,
            Err(e) => {
                tracing::error!("❌ Failed to create scheduler service: {}", e);
                std::process::exit(1);
            }
        };
        if let Err(e) = scheduler.schedule_daily_update(&config.sync.scheduled_update_cron).await {
            tracing::error!("❌ Invalid update schedule '{}': {}", config.sync.scheduled_update_cron, e);
            std::process::exit(1);
        }
        if let Err(e) = scheduler.start().await {
            tracing::error!("❌ Failed to start scheduler: {}", e);
            std::process::exit(1);
        }
        Some(Arc::new(scheduler))
    } else {
        tracing::info!("Scheduler disabled by configuration");
        None
    };

    run(
        listener,
        connection_pool,
        jwt_settings,
        football_api,
        config.sync.clone(),
        scheduler_service
    )?.await
}
