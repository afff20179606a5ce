use serde::{Deserialize, Serialize};

/// Main configuration (~/.visitday/config.json). Every field is optional on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Simultaneous schedule fetches in a batch.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Tab holding the schedule in each candidate's spreadsheet.
    #[serde(default = "default_schedule_sheet_name")]
    pub schedule_sheet_name: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_concurrency() -> usize {
    10
}

fn default_schedule_sheet_name() -> String {
    "Schedule".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("visitday/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            schedule_sheet_name: default_schedule_sheet_name(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}
