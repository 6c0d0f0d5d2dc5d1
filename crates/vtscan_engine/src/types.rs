use std::future::Future;

use tokio_util::sync::CancellationToken;
use vtscan_core::{Report, ScanError, ScanId, Stage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanProgress {
    pub scan_id: ScanId,
    pub stage: Stage,
    pub attempt: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Progress(ScanProgress),
    Completed {
        scan_id: ScanId,
        result: Result<Report, ScanError>,
    },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ScanEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<ScanEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<ScanEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: ScanEvent) {
        let _ = self.tx.send(event);
    }
}

/// Per-scan plumbing shared by every step of one scan.
pub struct ScanContext<'a> {
    scan_id: ScanId,
    sink: &'a dyn ProgressSink,
    cancel: CancellationToken,
}

impl<'a> ScanContext<'a> {
    pub fn new(scan_id: ScanId, sink: &'a dyn ProgressSink, cancel: CancellationToken) -> Self {
        Self {
            scan_id,
            sink,
            cancel,
        }
    }

    pub fn scan_id(&self) -> ScanId {
        self.scan_id
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub(crate) fn stage(&self, stage: Stage, attempt: u32) {
        self.sink.emit(ScanEvent::Progress(ScanProgress {
            scan_id: self.scan_id,
            stage,
            attempt,
        }));
    }

    pub(crate) fn ensure_live(&self) -> Result<(), ScanError> {
        if self.cancel.is_cancelled() {
            Err(ScanError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Awaits `step` unless the scan is cancelled first. Every network round
    /// trip and every sleep goes through here.
    pub(crate) async fn until_cancelled<T>(
        &self,
        step: impl Future<Output = T>,
    ) -> Result<T, ScanError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ScanError::Cancelled),
            output = step => Ok(output),
        }
    }
}
