use serde::Deserialize;

pub const DEFAULT_FINAL_STATUS_CODES: [&str; 5] = ["FT", "AET", "PEN", "ABD", "AWD"];

#[derive(Debug, Deserialize, Clone)]
pub struct SyncSettings {
    /// External ids of the leagues that are imported and scored
    pub relevant_leagues: Vec<i64>,
    /// Short status codes after which a fixture's result can no longer change
    #[serde(default = "default_final_status_codes")]
    pub final_status_codes: Vec<String>,
    #[serde(default = "default_scheduled_update_cron")]
    pub scheduled_update_cron: String,
    #[serde(default = "default_enable_scheduler")]
    pub enable_scheduler: bool,
}

impl SyncSettings {
    pub fn is_final_status(&self, status_short: Option<&str>) -> bool {
        match status_short {
            Some(code) => self.final_status_codes.iter().any(|c| c == code),
            None => false,
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            relevant_leagues: Vec::new(),
            final_status_codes: default_final_status_codes(),
            scheduled_update_cron: default_scheduled_update_cron(),
            enable_scheduler: default_enable_scheduler(),
        }
    }
}

fn default_final_status_codes() -> Vec<String> {
    DEFAULT_FINAL_STATUS_CODES.iter().map(|c| c.to_string()).collect()
}

fn default_scheduled_update_cron() -> String {
    // Every day at 05:00 UTC
    "0 0 5 * * *".to_string()
}

fn default_enable_scheduler() -> bool {
    true
}
