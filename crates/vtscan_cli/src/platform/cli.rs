use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "vtscan",
    version,
    about = "Check files, URLs, domains, IPs and hashes against VirusTotal"
)]
pub struct Args {
    /// API key sent with every request
    #[arg(long, env = "VIRUSTOTAL_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// RON settings file; a missing file means defaults
    #[arg(long, default_value = "vtscan.ron", global = true)]
    pub config: PathBuf,

    /// Print the raw report JSON instead of a summary
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a file (32 MiB max); reuses an existing report when the service knows the content
    File { path: PathBuf },
    /// Submit a URL for scanning and wait for the report
    Url { url: String },
    /// Look up a domain, IPv4 address or file hash
    Lookup { query: String },
    /// Show how a query would be classified, without contacting the service
    Classify { query: String },
    /// Print the SHA-256 used to look a file up
    Digest { path: PathBuf },
    /// Print the effective settings
    Config,
}
