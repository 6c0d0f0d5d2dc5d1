use std::fmt::Write;

use chrono::DateTime;
use vtscan_core::{AppViewModel, EngineVerdict, IndicatorKind, ReportView, ScanStatusView};

/// Writes view changes to the terminal: progress and errors on stderr,
/// the verdict summary on stdout.
pub struct Presenter {
    json: bool,
    last_progress: Option<String>,
}

impl Presenter {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            last_progress: None,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) {
        match &view.status {
            ScanStatusView::Idle => {}
            ScanStatusView::InProgress {
                subject,
                stage,
                attempt,
            } => {
                let line = progress_line(subject, &stage.to_string(), *attempt);
                if self.last_progress.as_deref() != Some(line.as_str()) {
                    eprintln!("{line}");
                    self.last_progress = Some(line);
                }
            }
            // JSON output is written by the caller from the raw report.
            ScanStatusView::Completed(_) if self.json => {}
            ScanStatusView::Completed(report) => print!("{}", format_report(report.as_ref())),
            ScanStatusView::Error(message) => eprintln!("error: {message}"),
        }
    }
}

fn progress_line(subject: &str, stage: &str, attempt: u32) -> String {
    if attempt > 0 {
        format!("{subject}: {stage} (check {attempt})")
    } else {
        format!("{subject}: {stage}")
    }
}

pub fn format_report(report: Option<&ReportView>) -> String {
    let Some(report) = report else {
        return "No analysis results in report\n".to_string();
    };

    let mut out = String::new();
    let stats = &report.stats;
    let _ = writeln!(out, "Scan results");
    let _ = writeln!(out, "  Clean:      {}", stats.clean());
    let _ = writeln!(out, "  Malicious:  {}", stats.malicious);
    let _ = writeln!(out, "  Suspicious: {}", stats.suspicious);
    if let Some(date) = report
        .last_analysis_date
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
    {
        let _ = writeln!(out, "  Analysed:   {}", date.to_rfc3339());
    }

    if !report.verdicts.is_empty() {
        let width = report
            .verdicts
            .iter()
            .map(|verdict| verdict.engine.len())
            .max()
            .unwrap_or(0);
        let _ = writeln!(out, "Detailed results");
        for verdict in &report.verdicts {
            let _ = writeln!(out, "  {}", verdict_line(verdict, width));
        }
    }
    out
}

fn verdict_line(verdict: &EngineVerdict, width: usize) -> String {
    let marker = if verdict.is_malicious() {
        "!!"
    } else if verdict.is_suspicious() {
        "? "
    } else {
        "  "
    };
    match &verdict.result {
        Some(result) if verdict.is_malicious() || verdict.is_suspicious() => format!(
            "{marker} {:<width$}  {}  {}",
            verdict.engine, verdict.category, result
        ),
        _ => format!("{marker} {:<width$}  {}", verdict.engine, verdict.category),
    }
}

pub fn format_classification(query: &str, kind: Option<IndicatorKind>) -> String {
    match kind {
        Some(kind) => format!("{query}: {kind}"),
        None => format!("{query}: unrecognized"),
    }
}
