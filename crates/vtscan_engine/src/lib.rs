//! Vtscan engine: remote API client, polling and scan execution.
mod client;
mod digest;
mod engine;
mod orchestrator;
mod poll;
mod types;
mod url_id;

pub use client::{ApiError, ApiResponse, ClientSettings, ReqwestVtClient, VtApi, DEFAULT_BASE_URL};
pub use digest::sha256_hex;
pub use engine::EngineHandle;
pub use orchestrator::Orchestrator;
pub use poll::{wait_for_analysis, PollOrder, PollSettings};
pub use types::{ChannelProgressSink, ProgressSink, ScanContext, ScanEvent, ScanProgress};
pub use url_id::url_identifier;
