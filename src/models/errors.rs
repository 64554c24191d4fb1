use thiserror::Error as ThisError;

/// Failures talking to the football data provider. All of them are recoverable:
/// a scheduled run retries on its next tick, an interactive refresh reports it.
#[derive(Debug, ThisError)]
pub enum FootballApiError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Network error calling {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Provider returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response format from {url}: {source}")]
    InvalidResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response from {url} has no `{key}` collection")]
    MissingCollection { url: String, key: &'static str },
}

/// Whole-operation failure of an import, sync or scoring pass.
/// `processed` counts the rows written before the failure.
#[derive(Debug, ThisError)]
pub enum SyncError {
    #[error("Football API failure after {processed} rows: {source}")]
    Api {
        #[source]
        source: FootballApiError,
        processed: usize,
    },

    #[error("Database error after {processed} rows: {source}")]
    Database {
        #[source]
        source: sqlx::Error,
        processed: usize,
    },
}

impl SyncError {
    pub fn api(source: FootballApiError, processed: usize) -> Self {
        SyncError::Api { source, processed }
    }

    pub fn database(source: sqlx::Error, processed: usize) -> Self {
        SyncError::Database { source, processed }
    }

    pub fn processed(&self) -> usize {
        match self {
            SyncError::Api { processed, .. } => *processed,
            SyncError::Database { processed, .. } => *processed,
        }
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, SyncError::Api { .. })
    }
}

#[derive(Debug, ThisError)]
pub enum TippError {
    #[error("Tipps can not be captured if the match has already started!")]
    MatchStarted,

    #[error("Tipp not found")]
    NotFound,

    #[error("Fixture not found")]
    FixtureNotFound,

    #[error("You are not an active player of this game")]
    NotMember,

    #[error("This fixture is not part of the game")]
    FixtureNotInGame,

    #[error("The tipp is final and can no longer be changed")]
    AlreadyFinal,

    #[error("Goals must not be negative")]
    InvalidGoals,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, ThisError)]
pub enum GameError {
    #[error("Point values must not be negative")]
    InvalidPoints,

    #[error("Game name must not be empty")]
    InvalidName,

    #[error("Game not found")]
    NotFound,

    #[error("Player profile not found")]
    PlayerNotFound,

    #[error("No open invitation for this game")]
    InvalidTransition,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
