use crate::{AnalysisStats, EngineVerdict, Mode, Report, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub mode: Mode,
    pub status: ScanStatusView,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanStatusView {
    #[default]
    Idle,
    InProgress {
        subject: String,
        stage: Stage,
        attempt: u32,
    },
    /// `None` when the report carries no analysis attributes to show.
    Completed(Option<ReportView>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    pub stats: AnalysisStats,
    pub verdicts: Vec<EngineVerdict>,
    pub last_analysis_date: Option<i64>,
}

impl ReportView {
    pub fn from_report(report: &Report) -> Option<Self> {
        report.attributes()?;
        Some(Self {
            stats: report.stats(),
            verdicts: report.verdicts(),
            last_analysis_date: report.last_analysis_date(),
        })
    }
}
