use vtscan_core::{Effect, Msg};
use vtscan_engine::{EngineHandle, ScanEvent};
use vtscan_logging::{scan_info, scan_warn};

/// Executes core effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartScan {
                    scan_id,
                    submission,
                } => {
                    scan_info!("StartScan scan_id={} {}", scan_id, submission.subject());
                    self.engine.start(scan_id, submission);
                }
                Effect::AbandonScan { scan_id } => {
                    scan_info!("AbandonScan scan_id={}", scan_id);
                    self.engine.abandon(scan_id);
                }
            }
        }
    }

    /// Blocks for the next engine event. `None` once the engine has shut down.
    pub fn next_msg(&self) -> Option<Msg> {
        self.engine.recv().map(map_event)
    }
}

fn map_event(event: ScanEvent) -> Msg {
    match event {
        ScanEvent::Progress(progress) => Msg::ScanProgress {
            scan_id: progress.scan_id,
            stage: progress.stage,
            attempt: progress.attempt,
        },
        ScanEvent::Completed { scan_id, result } => {
            if let Err(reason) = &result {
                scan_warn!("Scan {} failed: {}", scan_id, reason);
            }
            Msg::ScanFinished { scan_id, result }
        }
    }
}
