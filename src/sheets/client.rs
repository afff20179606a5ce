//! TSV export over HTTP.
//!
//! No auth: the schedules are shared "anyone with the link". No retries here
//! either; a failed export drops that one schedule from a batch.

use std::time::Duration;

use async_trait::async_trait;

use super::{SheetError, SheetSelector, TableSource};
use crate::types::Config;

const SHEETS_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

/// Export URL for one sheet of a spreadsheet.
pub fn export_url(document_id: &str, sheet: &SheetSelector) -> String {
    match sheet {
        SheetSelector::Gid(gid) => {
            format!("{}/{}/export?gid={}&format=tsv", SHEETS_BASE_URL, document_id, gid)
        }
        SheetSelector::Name(name) => format!(
            "{}/{}/gviz/tq?tqx=out:tsv&sheet={}",
            SHEETS_BASE_URL,
            document_id,
            ::url::form_urlencoded::byte_serialize(name.as_bytes()).collect::<String>()
        ),
    }
}

pub struct SheetsClient {
    client: reqwest::Client,
}

impl SheetsClient {
    pub fn new(config: &Config) -> Result<Self, SheetError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TableSource for SheetsClient {
    async fn fetch_raw_table(
        &self,
        document_id: &str,
        sheet: &SheetSelector,
    ) -> Result<String, SheetError> {
        let url = export_url(document_id, sheet);
        log::debug!("fetching sheet export {}", url);

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SheetError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp.text().await?)
    }
}
