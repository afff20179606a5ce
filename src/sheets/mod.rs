//! Spreadsheet export access.
//!
//! The schedule pipeline only needs raw TSV text for a (document, sheet)
//! pair. [`TableSource`] is that seam; [`client::SheetsClient`] implements it
//! over HTTP against the public export endpoint, and tests substitute
//! in-memory sources.
//!
//! Modules:
//! - url: spreadsheet URL parsing (document id, gid)
//! - client: reqwest-backed TSV export fetch

pub mod client;
pub mod url;

use async_trait::async_trait;

pub use self::client::SheetsClient;
pub use self::url::{docs_id, docs_id_to_url, SheetUrl};

/// Which sheet (tab) of a spreadsheet to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    /// Numeric sheet id from the `gid` URL parameter.
    Gid(String),
    /// Sheet tab name, e.g. `Schedule`.
    Name(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("could not parse URL: {0}")]
    InvalidUrl(String),
    #[error("missing #gid in URL: {0}")]
    MissingGid(String),
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("export failed with status {status}: {message}")]
    Api { status: u16, message: String },
}

impl SheetError {
    /// The reference itself is unusable; fetching again will not help.
    pub fn is_malformed_reference(&self) -> bool {
        matches!(self, SheetError::InvalidUrl(_) | SheetError::MissingGid(_))
    }
}

/// Source of raw tab-separated sheet text.
#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch_raw_table(
        &self,
        document_id: &str,
        sheet: &SheetSelector,
    ) -> Result<String, SheetError>;
}
