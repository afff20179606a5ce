//! Top-level error type for the command line surface.
//!
//! Errors are classified by what the user can do about them:
//! - Malformed reference: fix the URL (or pass a sheet name)
//! - Transport: network or export failure, usually worth retrying
//! - Everything else: local files and config

use thiserror::Error;

use crate::config::ConfigError;
use crate::sheets::SheetError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The spreadsheet reference could not be turned into a fetch.
    pub fn is_malformed_reference(&self) -> bool {
        matches!(self, Error::Sheet(e) if e.is_malformed_reference())
    }

    /// Returns true if the export request itself failed
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Sheet(SheetError::Http(_)) | Error::Sheet(SheetError::Api { .. })
        )
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Error::Sheet(SheetError::InvalidUrl(_)) => {
                "Use a link of the form https://docs.google.com/spreadsheets/d/<id>/edit#gid=<gid>"
            }
            Error::Sheet(SheetError::MissingGid(_)) => {
                "Copy the link while the schedule tab is open, or pass --sheet <NAME>."
            }
            Error::Sheet(SheetError::Http(_)) => "Check your internet connection and try again.",
            Error::Sheet(SheetError::Api { status: 401 | 403, .. }) => {
                "Share the spreadsheet as \"anyone with the link can view\"."
            }
            Error::Sheet(SheetError::Api { .. }) => {
                "Check that the spreadsheet and sheet tab exist."
            }
            Error::Config(_) => "Check your configuration in ~/.visitday/config.json",
            Error::Json(_) => "Report this as a bug.",
            Error::Io(_) => "Check file permissions and disk space.",
        }
    }
}
