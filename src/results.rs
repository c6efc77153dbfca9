use crate::capture::CaptureError;
use crate::metadata::Metadata;

/// Result of capturing a single URL
#[derive(Debug)]
pub struct CaptureOutcome {
    /// URL as supplied by the caller
    pub url: String,

    /// What happened to it
    pub status: CaptureStatus,
}

/// Per-URL success/failure signal
#[derive(Debug)]
pub enum CaptureStatus {
    /// Page was fetched and persisted
    Captured(CaptureReport),

    /// Page could not be captured; nothing was persisted
    Failed(CaptureError),
}

impl CaptureStatus {
    /// Whether the page made it to disk
    pub fn is_success(&self) -> bool {
        matches!(self, CaptureStatus::Captured(_))
    }
}

/// Summary of a successful capture, compared against the previous fetch
#[derive(Debug, Clone)]
pub struct CaptureReport {
    /// Metadata extracted by this fetch
    pub current: Metadata,

    /// Metadata recorded by the previous fetch, when a sidecar existed and
    /// metadata reporting was requested
    pub previous: Option<Metadata>,

    /// File the document was saved as, relative to the output directory
    pub document_file: String,

    /// Deep fetch was requested but at least one image was not localized
    pub localization_failed: bool,
}
