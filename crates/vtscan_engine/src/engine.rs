use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use vtscan_core::{ScanId, Submission};
use vtscan_logging::{scan_debug, scan_info};

use crate::poll::PollSettings;
use crate::types::ChannelProgressSink;
use crate::{Orchestrator, ScanContext, ScanEvent, VtApi};

enum EngineCommand {
    Start {
        scan_id: ScanId,
        submission: Submission,
    },
    Abandon {
        scan_id: ScanId,
    },
}

/// Runs scans on a background tokio runtime and reports back over a channel.
///
/// At most one scan is observed at a time: starting a scan cancels the one
/// before it.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<ScanEvent>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn VtApi>, poll: PollSettings) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let orchestrator = Orchestrator::new(api, poll);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("vtscan-engine".into())
            .spawn(move || {
                let mut active: Option<(ScanId, CancellationToken)> = None;
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::Start {
                            scan_id,
                            submission,
                        } => {
                            if let Some((previous, token)) = active.take() {
                                scan_debug!("scan {} superseded by scan {}", previous, scan_id);
                                token.cancel();
                            }
                            let token = CancellationToken::new();
                            active = Some((scan_id, token.clone()));
                            let orchestrator = orchestrator.clone();
                            let event_tx = event_tx.clone();
                            runtime.spawn(async move {
                                let sink = ChannelProgressSink::new(event_tx.clone());
                                let ctx = ScanContext::new(scan_id, &sink, token);
                                let result = orchestrator.run(&submission, &ctx).await;
                                let _ = event_tx.send(ScanEvent::Completed { scan_id, result });
                            });
                        }
                        EngineCommand::Abandon { scan_id } => {
                            if matches!(&active, Some((id, _)) if *id == scan_id) {
                                if let Some((_, token)) = active.take() {
                                    scan_info!("scan {} abandoned", scan_id);
                                    token.cancel();
                                }
                            }
                        }
                    }
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start(&self, scan_id: ScanId, submission: Submission) {
        let _ = self.cmd_tx.send(EngineCommand::Start {
            scan_id,
            submission,
        });
    }

    pub fn abandon(&self, scan_id: ScanId) {
        let _ = self.cmd_tx.send(EngineCommand::Abandon { scan_id });
    }

    /// Blocks until the next event, or returns `None` once the engine is gone.
    pub fn recv(&self) -> Option<ScanEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ScanEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}
