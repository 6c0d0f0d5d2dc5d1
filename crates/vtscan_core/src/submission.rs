use bytes::Bytes;
use thiserror::Error;

use crate::indicator::{classify, IndicatorKind};

/// Largest upload accepted, inclusive.
pub const MAX_FILE_BYTES: u64 = 32 * 1024 * 1024;

/// Terminal failure of one scan. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("file size {size} exceeds the {limit} byte limit")]
    SizeExceeded { size: u64, limit: u64 },
    #[error("upload failed: {message}")]
    UploadFailed { message: String },
    #[error("submission failed: {message}")]
    SubmissionFailed { message: String },
    #[error("missing analysis id")]
    MissingAnalysisId,
    #[error("failed to get analysis status")]
    StatusCheckFailed,
    #[error("analysis failed")]
    AnalysisFailed,
    #[error("analysis timed out")]
    AnalysisTimedOut,
    #[error("invalid query: enter a domain, IPv4 address or hash")]
    InvalidQuery,
    #[error("failed to get {subject} report")]
    ReportFetchFailed { subject: String },
    #[error("request failed: {message}")]
    Transport { message: String },
    #[error("scan cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSubmission {
    name: String,
    bytes: Bytes,
}

impl FileSubmission {
    /// Rejects content larger than [`MAX_FILE_BYTES`].
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Result<Self, ScanError> {
        let bytes = bytes.into();
        let size = bytes.len() as u64;
        if size > MAX_FILE_BYTES {
            return Err(ScanError::SizeExceeded {
                size,
                limit: MAX_FILE_BYTES,
            });
        }
        Ok(Self {
            name: name.into(),
            bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSubmission {
    text: String,
}

impl UrlSubmission {
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A search query together with the kind it was classified as at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSubmission {
    text: String,
    kind: IndicatorKind,
}

impl IndicatorSubmission {
    pub fn new(text: impl Into<String>) -> Result<Self, ScanError> {
        let text = text.into();
        let kind = classify(&text).ok_or(ScanError::InvalidQuery)?;
        Ok(Self { text, kind })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> IndicatorKind {
        self.kind
    }
}

/// One user request. Constructors validate up front so an invalid request
/// never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    File(FileSubmission),
    Url(UrlSubmission),
    Indicator(IndicatorSubmission),
}

impl Submission {
    pub fn file(name: impl Into<String>, bytes: impl Into<Bytes>) -> Result<Self, ScanError> {
        FileSubmission::new(name, bytes).map(Submission::File)
    }

    pub fn url(text: impl Into<String>) -> Self {
        Submission::Url(UrlSubmission { text: text.into() })
    }

    pub fn indicator(text: impl Into<String>) -> Result<Self, ScanError> {
        IndicatorSubmission::new(text).map(Submission::Indicator)
    }

    /// Short human description used in progress output.
    pub fn subject(&self) -> String {
        match self {
            Submission::File(file) => format!("file {} ({} bytes)", file.name, file.size()),
            Submission::Url(url) => format!("url {}", url.text),
            Submission::Indicator(query) => format!("{} {}", query.kind, query.text),
        }
    }
}
