//! Store error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Title not found")]
    TitleNotFound,
    #[error("Version label is required")]
    VersionLabelRequired,
    #[error("Version already exists")]
    VersionExists,
    #[error("No active version found")]
    NoActiveVersion,
    #[error("From version not found")]
    FromVersionNotFound,
    #[error("To version not found")]
    ToVersionNotFound,
    #[error("Versions must belong to the same title")]
    CrossTitlePatch,
    #[error("Patch already exists")]
    PatchExists,
    #[error("Patch size must not be negative")]
    NegativePatchSize,
    #[error("Patch not found")]
    PatchNotFound,
    #[error("Download not found")]
    DownloadNotFound,
}

impl StoreError {
    /// Whether the error means a referenced record does not exist, as opposed
    /// to the request itself being invalid.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::TitleNotFound
                | StoreError::NoActiveVersion
                | StoreError::FromVersionNotFound
                | StoreError::ToVersionNotFound
                | StoreError::PatchNotFound
                | StoreError::DownloadNotFound
        )
    }
}
