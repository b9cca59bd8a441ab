use std::path::PathBuf;
use std::time::Duration;

use chatrelay_core::config::BackendConfig;
use clap::{ArgAction, Parser, Subcommand};

/// Backend flags override `BACKEND_URL`, `BACKEND_TIMEOUT_SECS` and
/// `BACKEND_ACCEPT_INVALID_CERTS`.
#[derive(Parser, Debug)]
#[command(name = "chatrelay", version, about = "Talk to the conversational backend")]
pub struct Cli {
    /// Base URL of the conversational backend.
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Skip TLS certificate verification.
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Raise log verbosity (-v debug, -vv trace); `RUST_LOG` still wins.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Layers the backend flags over `base`.
    pub fn backend_config(&self, mut base: BackendConfig) -> BackendConfig {
        if let Some(url) = &self.backend_url {
            base.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            base.timeout = Duration::from_secs(secs);
        }
        if self.insecure {
            base.accept_invalid_certs = true;
        }
        base
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// Send one message and print the replies as JSON.
    Send {
        /// Conversation identifier.
        #[arg(long)]
        sender: String,

        /// Message text.
        #[arg(long)]
        text: String,

        /// File to attach; repeat for several.
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },

    /// Print the conversation tracker for a sender as JSON.
    Tracker {
        #[arg(long)]
        sender: String,
    },
}
