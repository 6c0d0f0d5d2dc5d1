use std::fmt;

use crate::view_model::{AppViewModel, ReportView, ScanStatusView};
use crate::{Effect, Report, ScanError, Submission};

pub type ScanId = u64;

/// Input tab the user is working in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    File,
    Url,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Queued,
    Hashing,
    CheckingExisting,
    Uploading,
    Submitting,
    Polling,
    FetchingReport,
    LookingUp,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Queued => "queued",
            Stage::Hashing => "hashing",
            Stage::CheckingExisting => "checking for an existing report",
            Stage::Uploading => "uploading",
            Stage::Submitting => "submitting",
            Stage::Polling => "waiting for analysis",
            Stage::FetchingReport => "fetching report",
            Stage::LookingUp => "looking up",
        };
        f.write_str(label)
    }
}

/// Lifecycle of the single live scan: `Idle -> InFlight -> Succeeded | Failed`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    InFlight {
        scan_id: ScanId,
        submission: Submission,
        stage: Stage,
        attempt: u32,
    },
    Succeeded {
        report: Report,
    },
    Failed {
        reason: ScanError,
    },
}

impl ScanState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanState::Succeeded { .. } | ScanState::Failed { .. })
    }

    pub fn in_flight_id(&self) -> Option<ScanId> {
        match self {
            ScanState::InFlight { scan_id, .. } => Some(*scan_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    mode: Mode,
    scan: ScanState,
    next_scan_id: ScanId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn scan(&self) -> &ScanState {
        &self.scan
    }

    pub fn view(&self) -> AppViewModel {
        let status = match &self.scan {
            ScanState::Idle => ScanStatusView::Idle,
            ScanState::InFlight {
                submission,
                stage,
                attempt,
                ..
            } => ScanStatusView::InProgress {
                subject: submission.subject(),
                stage: *stage,
                attempt: *attempt,
            },
            ScanState::Succeeded { report } => {
                ScanStatusView::Completed(ReportView::from_report(report))
            }
            ScanState::Failed { reason } => ScanStatusView::Error(reason.to_string()),
        };
        AppViewModel {
            mode: self.mode,
            status,
        }
    }

    /// Returns whether the view changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            self.mode = mode;
            self.dirty = true;
        }
    }

    /// Drops interest in the in-flight scan, if any, and returns to `Idle`.
    pub(crate) fn reset(&mut self) -> Vec<Effect> {
        let effects = self.abandon_in_flight();
        if self.scan != ScanState::Idle {
            self.scan = ScanState::Idle;
            self.dirty = true;
        }
        effects
    }

    /// Replaces whatever scan is live with a new one built from `submission`.
    pub(crate) fn begin(&mut self, submission: Result<Submission, ScanError>) -> Vec<Effect> {
        let mut effects = self.abandon_in_flight();
        self.dirty = true;
        match submission {
            Ok(submission) => {
                self.next_scan_id += 1;
                let scan_id = self.next_scan_id;
                self.scan = ScanState::InFlight {
                    scan_id,
                    submission: submission.clone(),
                    stage: Stage::Queued,
                    attempt: 0,
                };
                effects.push(Effect::StartScan {
                    scan_id,
                    submission,
                });
            }
            Err(reason) => {
                self.scan = ScanState::Failed { reason };
            }
        }
        effects
    }

    pub(crate) fn apply_progress(&mut self, id: ScanId, new_stage: Stage, new_attempt: u32) {
        if let ScanState::InFlight {
            scan_id,
            stage,
            attempt,
            ..
        } = &mut self.scan
        {
            if *scan_id == id && (*stage != new_stage || *attempt != new_attempt) {
                *stage = new_stage;
                *attempt = new_attempt;
                self.dirty = true;
            }
        }
    }

    pub(crate) fn apply_finished(&mut self, id: ScanId, result: Result<Report, ScanError>) {
        if self.scan.in_flight_id() != Some(id) {
            return;
        }
        self.scan = match result {
            Ok(report) => ScanState::Succeeded { report },
            Err(reason) => ScanState::Failed { reason },
        };
        self.dirty = true;
    }

    fn abandon_in_flight(&mut self) -> Vec<Effect> {
        match self.scan.in_flight_id() {
            Some(scan_id) => vec![Effect::AbandonScan { scan_id }],
            None => Vec::new(),
        }
    }
}
