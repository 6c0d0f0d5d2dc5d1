use std::sync::Arc;

use bytes::Bytes;
use vtscan_core::{FileSubmission, IndicatorSubmission, Report, ScanError, Stage, Submission};
use vtscan_logging::{scan_debug, scan_info, scan_warn};

use crate::poll::{wait_for_analysis, PollOrder, PollSettings};
use crate::{sha256_hex, url_identifier, ApiError, ScanContext, VtApi};

/// Drives one submission from request to final report.
#[derive(Clone)]
pub struct Orchestrator {
    api: Arc<dyn VtApi>,
    poll: PollSettings,
}

impl Orchestrator {
    pub fn new(api: Arc<dyn VtApi>, poll: PollSettings) -> Self {
        Self { api, poll }
    }

    pub async fn run(
        &self,
        submission: &Submission,
        ctx: &ScanContext<'_>,
    ) -> Result<Report, ScanError> {
        match submission {
            Submission::File(file) => self.scan_file(file, ctx).await,
            Submission::Url(url) => self.scan_url(url.text(), ctx).await,
            Submission::Indicator(query) => self.lookup(query, ctx).await,
        }
    }

    /// Size check, existing-report shortcut, upload, poll, then report by digest.
    pub async fn submit_file(
        &self,
        name: &str,
        bytes: impl Into<Bytes>,
        ctx: &ScanContext<'_>,
    ) -> Result<Report, ScanError> {
        let file = FileSubmission::new(name, bytes)?;
        self.scan_file(&file, ctx).await
    }

    pub async fn submit_url(&self, url: &str, ctx: &ScanContext<'_>) -> Result<Report, ScanError> {
        self.scan_url(url, ctx).await
    }

    /// Classifies `text` and fetches the matching report. Unrecognised text
    /// fails before any request is made.
    pub async fn lookup_indicator(
        &self,
        text: &str,
        ctx: &ScanContext<'_>,
    ) -> Result<Report, ScanError> {
        let query = IndicatorSubmission::new(text)?;
        self.lookup(&query, ctx).await
    }

    async fn scan_file(
        &self,
        file: &FileSubmission,
        ctx: &ScanContext<'_>,
    ) -> Result<Report, ScanError> {
        ctx.stage(Stage::Hashing, 0);
        let sha256 = sha256_hex(file.bytes());

        ctx.stage(Stage::CheckingExisting, 0);
        if let Some(report) = self.existing_report(&sha256, ctx).await? {
            scan_info!("scan {} reused existing report for {}", ctx.scan_id(), sha256);
            return Ok(report);
        }

        ctx.stage(Stage::Uploading, 0);
        let response = ctx
            .until_cancelled(self.api.upload_file(file))
            .await?
            .map_err(transport)?;
        if !response.is_success() {
            let message = response
                .error_message()
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            return Err(ScanError::UploadFailed { message });
        }
        let analysis_id = response
            .analysis_id()
            .ok_or(ScanError::MissingAnalysisId)?
            .to_owned();
        scan_info!(
            "scan {} uploaded {} ({} bytes) as analysis {}",
            ctx.scan_id(),
            file.name(),
            file.size(),
            analysis_id
        );

        wait_for_analysis(
            self.api.as_ref(),
            &analysis_id,
            self.poll,
            PollOrder::CheckFirst,
            ctx,
        )
        .await?;

        // The analysis object has no engine results; the file report does.
        ctx.stage(Stage::FetchingReport, 0);
        let response = ctx
            .until_cancelled(self.api.file_report(&sha256))
            .await?
            .map_err(transport)?;
        if !response.is_success() {
            return Err(report_failed("file"));
        }
        Ok(Report::new(response.body))
    }

    async fn scan_url(&self, url: &str, ctx: &ScanContext<'_>) -> Result<Report, ScanError> {
        ctx.stage(Stage::Submitting, 0);
        let response = ctx
            .until_cancelled(self.api.submit_url(url))
            .await?
            .map_err(transport)?;
        if !response.is_success() {
            let message = response
                .error_message()
                .unwrap_or("failed to submit URL for scanning")
                .to_owned();
            return Err(ScanError::SubmissionFailed { message });
        }
        let analysis_id = response
            .analysis_id()
            .ok_or(ScanError::MissingAnalysisId)?
            .to_owned();
        scan_info!("scan {} submitted url as analysis {}", ctx.scan_id(), analysis_id);

        wait_for_analysis(
            self.api.as_ref(),
            &analysis_id,
            self.poll,
            PollOrder::WaitFirst,
            ctx,
        )
        .await?;

        ctx.stage(Stage::FetchingReport, 0);
        let url_id = url_identifier(url);
        let response = ctx
            .until_cancelled(self.api.url_report(&url_id))
            .await?
            .map_err(transport)?;
        if !response.is_success() {
            return Err(report_failed("url"));
        }
        Ok(Report::new(response.body))
    }

    async fn lookup(
        &self,
        query: &IndicatorSubmission,
        ctx: &ScanContext<'_>,
    ) -> Result<Report, ScanError> {
        ctx.stage(Stage::LookingUp, 0);
        let response = ctx
            .until_cancelled(self.api.indicator_report(query.kind(), query.text()))
            .await?
            .map_err(transport)?;
        if !response.is_success() {
            return Err(report_failed(query.kind().label()));
        }
        Ok(Report::new(response.body))
    }

    /// Best-effort lookup by digest. Every failure reads as "no report";
    /// only cancellation ends the scan here.
    async fn existing_report(
        &self,
        sha256: &str,
        ctx: &ScanContext<'_>,
    ) -> Result<Option<Report>, ScanError> {
        let outcome = ctx.until_cancelled(self.api.file_report(sha256)).await?;
        let report = match outcome {
            Ok(response) if response.is_success() => {
                let report = Report::new(response.body);
                if report.has_data() {
                    Some(report)
                } else {
                    scan_debug!(
                        "scan {} existing report for {} had no data",
                        ctx.scan_id(),
                        sha256
                    );
                    None
                }
            }
            Ok(response) if response.status == 404 => {
                scan_debug!("scan {} no existing report for {}", ctx.scan_id(), sha256);
                None
            }
            Ok(response) => {
                scan_warn!(
                    "scan {} existing report lookup returned {}, uploading anyway",
                    ctx.scan_id(),
                    response.status
                );
                None
            }
            Err(err) => {
                scan_warn!(
                    "scan {} existing report lookup failed, uploading anyway: {}",
                    ctx.scan_id(),
                    err
                );
                None
            }
        };
        Ok(report)
    }
}

fn transport(err: ApiError) -> ScanError {
    ScanError::Transport {
        message: err.to_string(),
    }
}

fn report_failed(subject: &str) -> ScanError {
    ScanError::ReportFetchFailed {
        subject: subject.to_string(),
    }
}
