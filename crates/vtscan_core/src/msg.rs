use bytes::Bytes;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User switched between the file, URL and search inputs.
    ModeChanged(crate::Mode),
    /// User dropped or picked a file.
    FileSubmitted { name: String, bytes: Bytes },
    /// User submitted the URL input.
    UrlSubmitted(String),
    /// User submitted the search input.
    QuerySubmitted(String),
    /// Engine progress for a scan.
    ScanProgress {
        scan_id: crate::ScanId,
        stage: crate::Stage,
        attempt: u32,
    },
    /// Engine completion for a scan.
    ScanFinished {
        scan_id: crate::ScanId,
        result: Result<crate::Report, crate::ScanError>,
    },
}
