//! Command-line interface parsing and entry point.

use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::core::config::{ApiFlavor, Config};
use crate::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "causette")]
#[command(about = "A minimal terminal chat client for remote completion APIs")]
#[command(
    long_about = "Causette is a small full-screen terminal chat client. It sends each \
message to a remote completion endpoint (a bare proxy or an OpenAI-compatible \
chat-completion API) and shows the reply in the transcript.\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down           Scroll through the transcript\n\
  Ctrl+L            Clear the conversation\n\
  Ctrl+C            Quit"
)]
pub struct Args {
    /// Model to use for chat (OpenAI flavor only)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Completion endpoint: the API base URL, or the full URL with --proxy
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// API key sent as a bearer token (OpenAI flavor only)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// System instruction prepended to the context window
    #[arg(short, long)]
    pub system: Option<String>,

    /// Talk to a bare proxy endpoint instead of an OpenAI-compatible API
    #[arg(long)]
    pub proxy: bool,

    /// Append the transcript to the specified file
    #[arg(short, long)]
    pub log: Option<String>,
}

/// Static defaults overlaid with whatever the CLI specifies.
pub fn build_config(args: &Args) -> Config {
    let mut config = Config::default();

    if args.proxy {
        config.flavor = ApiFlavor::Proxy;
    }
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(api_key) = &args.api_key {
        config.api_key = Some(api_key.clone());
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(system) = &args.system {
        config.system_instruction = Some(system.clone());
    }

    config
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args);

    run_chat(config, args.log).await
}
