use chrono_tz::Tz;
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct FootballApiSettings {
    pub base_url: String,
    pub api_host: String,
    pub api_key: SecretString,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Sent with fixture and odds requests so kickoff times come back in this
    /// zone. Match days are calendar days in this zone too.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    /// Bet label of the "Match Winner" market
    #[serde(default = "default_match_winner_label_id")]
    pub match_winner_label_id: i64,
}

fn default_timeout_seconds() -> u64 {
    20
}

fn default_timezone() -> Tz {
    chrono_tz::Europe::Vienna
}

fn default_match_winner_label_id() -> i64 {
    1
}
