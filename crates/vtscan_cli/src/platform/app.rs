use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use vtscan_core::{classify, update, AppState, Msg, ScanError, ScanState, MAX_FILE_BYTES};
use vtscan_engine::{sha256_hex, EngineHandle, ReqwestVtClient};
use vtscan_logging::{level_for_verbosity, scan_info};

use super::cli::{Args, Command};
use super::config::Settings;
use super::effects::EffectRunner;
use super::logging;
use super::render::{format_classification, Presenter};

pub fn run_app() -> Result<ExitCode> {
    let args = Args::parse();
    logging::initialize(level_for_verbosity(args.verbose), args.log_file.as_deref());

    let msg = match &args.command {
        Command::Classify { query } => {
            let kind = classify(query);
            println!("{}", format_classification(query, kind));
            return Ok(exit_code(kind.is_some()));
        }
        Command::Digest { path } => {
            let bytes = read_file(path)?;
            println!("{}  {}", sha256_hex(&bytes), path.display());
            return Ok(ExitCode::SUCCESS);
        }
        Command::Config => {
            let settings = load_settings(&args)?;
            println!("{}", settings.to_display_ron()?);
            return Ok(ExitCode::SUCCESS);
        }
        Command::File { path } => {
            let size = fs::metadata(path)
                .with_context(|| format!("Cannot read {}", path.display()))?
                .len();
            if size > MAX_FILE_BYTES {
                // Same message the core would produce, without reading the file.
                let reason = ScanError::SizeExceeded {
                    size,
                    limit: MAX_FILE_BYTES,
                };
                eprintln!("error: {reason}");
                return Ok(ExitCode::FAILURE);
            }
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Msg::FileSubmitted {
                name,
                bytes: read_file(path)?.into(),
            }
        }
        Command::Url { url } => Msg::UrlSubmitted(url.clone()),
        Command::Lookup { query } => Msg::QuerySubmitted(query.clone()),
    };

    let settings = load_settings(&args)?;
    let api_key = settings.api_key().context(
        "No API key: pass --api-key, set VIRUSTOTAL_API_KEY or add api_key to the settings file",
    )?;
    let client = ReqwestVtClient::new(settings.client_settings(api_key))?;
    let engine = EngineHandle::new(Arc::new(client), settings.poll_settings())
        .context("Failed to start scan engine")?;

    let mut app = App::new(EffectRunner::new(engine), Presenter::new(args.json));
    app.dispatch(msg);
    app.run_until_settled();

    match app.state.scan() {
        ScanState::Succeeded { report } => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(report.as_json())?);
            }
            Ok(ExitCode::SUCCESS)
        }
        ScanState::Idle => {
            eprintln!("error: nothing to submit");
            Ok(ExitCode::FAILURE)
        }
        ScanState::InFlight { .. } | ScanState::Failed { .. } => Ok(ExitCode::FAILURE),
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let settings = Settings::load(&args.config)?.with_api_key(args.api_key.clone());
    scan_info!("Using API base {}", settings.base_url);
    Ok(settings)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Cannot read {}", path.display()))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

struct App {
    state: AppState,
    runner: EffectRunner,
    presenter: Presenter,
}

impl App {
    fn new(runner: EffectRunner, presenter: Presenter) -> Self {
        Self {
            state: AppState::new(),
            runner,
            presenter,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        if was_dirty {
            self.presenter.render(&self.state.view());
        }
    }

    /// Feeds engine events back through `update` until the scan settles.
    fn run_until_settled(&mut self) {
        while matches!(self.state.scan(), ScanState::InFlight { .. }) {
            match self.runner.next_msg() {
                Some(msg) => self.dispatch(msg),
                None => break,
            }
        }
    }
}
