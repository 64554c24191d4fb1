pub mod fixture_sync;
pub mod football_api_client;
pub mod game_service;
pub mod odds;
pub mod reference_import;
pub mod scheduler;
pub mod scoring_service;
pub mod tipp_service;
pub mod update_scheduler;

pub use fixture_sync::FixtureSyncService;
pub use football_api_client::FootballApiClient;
pub use game_service::GameService;
pub use reference_import::ReferenceImportService;
pub use scheduler::SchedulerService;
pub use scoring_service::ScoringService;
pub use tipp_service::TippService;
pub use update_scheduler::UpdateSchedulerService;
