//! Vtscan core: indicator classification, submissions and the pure scan state machine.
mod effect;
mod indicator;
mod msg;
mod report;
mod state;
mod submission;
mod update;
mod view_model;

pub use effect::Effect;
pub use indicator::{classify, IndicatorKind};
pub use msg::Msg;
pub use report::{AnalysisStats, EngineVerdict, Report};
pub use state::{AppState, Mode, ScanId, ScanState, Stage};
pub use submission::{
    FileSubmission, IndicatorSubmission, ScanError, Submission, UrlSubmission, MAX_FILE_BYTES,
};
pub use update::update;
pub use view_model::{AppViewModel, ReportView, ScanStatusView};
