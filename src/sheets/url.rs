//! Spreadsheet URL parsing.
//!
//! Accepted shapes:
//!   https://docs.google.com/spreadsheets/d/<id>/edit
//!   https://docs.google.com/spreadsheets/d/<id>/edit#gid=<gid>
//!   https://docs.google.com/spreadsheets/d/<id>/edit?gid=<gid>#gid=<gid>

use ::url::Url;

use super::{SheetError, SheetSelector};

const SHEETS_HOST: &str = "docs.google.com";

/// Document id plus the optional `gid` carried by a spreadsheet URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetUrl {
    pub document_id: String,
    pub gid: Option<String>,
}

impl SheetUrl {
    pub fn parse(raw: &str) -> Result<Self, SheetError> {
        let invalid = || SheetError::InvalidUrl(raw.to_string());
        let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
        if url.host_str() != Some(SHEETS_HOST) {
            return Err(invalid());
        }

        let segments: Vec<&str> = url.path_segments().ok_or_else(invalid)?.collect();
        let document_id = match segments.as_slice() {
            ["spreadsheets", "d", id, ..] if is_document_id(id) => id.to_string(),
            _ => return Err(invalid()),
        };

        let from_fragment = url
            .fragment()
            .and_then(|f| f.split('&').find_map(|kv| kv.strip_prefix("gid=")))
            .map(str::to_string);
        let from_query = url
            .query_pairs()
            .find(|(k, _)| k == "gid")
            .map(|(_, v)| v.into_owned());
        let gid = from_fragment
            .or(from_query)
            .filter(|g| !g.is_empty() && g.chars().all(|c| c.is_ascii_digit()));

        Ok(Self { document_id, gid })
    }

    /// Pick the sheet to export. An explicit name wins over the URL's gid.
    pub fn selector(
        &self,
        sheet_name: Option<&str>,
        raw: &str,
    ) -> Result<SheetSelector, SheetError> {
        if let Some(name) = sheet_name.filter(|n| !n.is_empty()) {
            return Ok(SheetSelector::Name(name.to_string()));
        }
        self.gid
            .clone()
            .map(SheetSelector::Gid)
            .ok_or_else(|| SheetError::MissingGid(raw.to_string()))
    }
}

/// Parse `raw` and pick its sheet in one step.
pub fn resolve_reference(
    raw: &str,
    sheet_name: Option<&str>,
) -> Result<(String, SheetSelector), SheetError> {
    let parsed = SheetUrl::parse(raw)?;
    let selector = parsed.selector(sheet_name, raw)?;
    Ok((parsed.document_id, selector))
}

fn is_document_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Document id of a spreadsheet URL, or `None` if it is not one.
pub fn docs_id(raw: &str) -> Option<String> {
    SheetUrl::parse(raw).ok().map(|u| u.document_id)
}

pub fn docs_id_to_url(id: &str) -> String {
    format!("https://{}/spreadsheets/d/{}/edit", SHEETS_HOST, id)
}
