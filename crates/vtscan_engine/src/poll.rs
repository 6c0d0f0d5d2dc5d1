use std::time::Duration;

use vtscan_core::{ScanError, Stage};
use vtscan_logging::{scan_debug, scan_warn};

use crate::{ScanContext, VtApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(5),
        }
    }
}

/// Where the fixed delay sits relative to each status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOrder {
    /// Check immediately, sleep between checks. Used after file uploads.
    CheckFirst,
    /// Sleep before every check, including the first. Used after URL submissions.
    WaitFirst,
}

/// Polls `GET /analyses/{id}` until it reports `completed`.
///
/// Returns the number of status checks issued. A `failed` status, a
/// non-success response or running out of attempts ends the scan.
pub async fn wait_for_analysis(
    api: &dyn VtApi,
    analysis_id: &str,
    settings: PollSettings,
    order: PollOrder,
    ctx: &ScanContext<'_>,
) -> Result<u32, ScanError> {
    for attempt in 1..=settings.max_attempts {
        if order == PollOrder::WaitFirst {
            ctx.until_cancelled(tokio::time::sleep(settings.interval)).await?;
        }
        ctx.ensure_live()?;
        ctx.stage(Stage::Polling, attempt);

        let response = ctx
            .until_cancelled(api.analysis(analysis_id))
            .await?
            .map_err(|err| ScanError::Transport {
                message: err.to_string(),
            })?;
        if !response.is_success() {
            scan_warn!(
                "scan {} analysis {} status check returned {}",
                ctx.scan_id(),
                analysis_id,
                response.status
            );
            return Err(ScanError::StatusCheckFailed);
        }

        match response.analysis_status() {
            Some("completed") => return Ok(attempt),
            Some("failed") => return Err(ScanError::AnalysisFailed),
            status => {
                scan_debug!(
                    "scan {} analysis {} attempt {}/{} status {:?}",
                    ctx.scan_id(),
                    analysis_id,
                    attempt,
                    settings.max_attempts,
                    status
                );
            }
        }

        if order == PollOrder::CheckFirst && attempt < settings.max_attempts {
            ctx.until_cancelled(tokio::time::sleep(settings.interval)).await?;
        }
    }

    Err(ScanError::AnalysisTimedOut)
}
