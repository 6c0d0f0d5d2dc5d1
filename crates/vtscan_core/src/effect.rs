use crate::{ScanId, Submission};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartScan {
        scan_id: ScanId,
        submission: Submission,
    },
    /// Stop observing a scan; the remote analysis itself keeps running.
    AbandonScan { scan_id: ScanId },
}
