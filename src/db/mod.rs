pub mod fixture_queries;
pub mod game_queries;
pub mod reference_queries;
pub mod schedule_queries;
pub mod tipp_queries;
pub mod tipp_query;

pub use fixture_queries::FixtureQueries;
pub use game_queries::GameQueries;
pub use reference_queries::ReferenceQueries;
pub use schedule_queries::ScheduleQueries;
pub use tipp_queries::TippQueries;
pub use tipp_query::TippQuery;
