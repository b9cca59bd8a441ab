// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::path::Path;

use chatrelay_core::config::BackendConfig;
use chatrelay_core::message::{Attachment, OutboundMessage, require};
use chatrelay_core::messaging::MessagingClient;
use chatrelay_core::messaging::rasa::RasaClient;
use clap::Parser;
use cli::{Cli, Commands};

mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    logging::init(args.verbose)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(dispatch(args))
}

async fn dispatch(args: Cli) -> Result<()> {
    let config = args.backend_config(BackendConfig::from_env());

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Send {
            sender,
            text,
            files,
        } => {
            // Validate before touching the filesystem or the network.
            let message = OutboundMessage::new(Some(sender), Some(text), Vec::new())?;

            let mut attachments = Vec::with_capacity(files.len());
            for path in &files {
                attachments.push(read_attachment(path).await?);
            }
            let message = message.with_files(attachments);

            let client = RasaClient::new(&config)?;
            log::debug!("sending to {}", client.base_url());
            let replies = client.send(&message).await?;
            println!("{}", serde_json::to_string_pretty(&replies)?);
            Ok(())
        }
        Commands::Tracker { sender } => {
            let sender = require("sender", Some(sender))?;
            let client = RasaClient::new(&config)?;
            let tracker = client.tracker(&sender).await?;
            println!("{}", serde_json::to_string_pretty(&tracker)?);
            Ok(())
        }
    }
}

async fn read_attachment(path: &Path) -> Result<Attachment> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| Error::Custom(format!("cannot read {}: {e}", path.display())))?;
    Ok(Attachment {
        file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
        content_type: mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string()),
        data,
    })
}
