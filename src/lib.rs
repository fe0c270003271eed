pub mod args;
pub mod config;
pub mod credentials;
pub mod editor;
pub mod logging;
pub mod openai;
pub mod output;
pub mod prompt;

use anyhow::{Context, Result};
use reqwest::Client;
use std::env;
use std::fs;
use std::process::ExitCode;
use tracing::{info, warn};

use config::Config;

/// Runs the whole pipeline: parse arguments, gather the input (editor
/// fallback when none was given), resolve the credential, call the chat
/// API, and format the reply onto stdout.
pub async fn run() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cfg = Config::from_env();
    info!(
        model = %cfg.model,
        api_base_url = %cfg.api_base_url,
        "loaded runtime configuration"
    );

    let tokens: Vec<String> = env::args().skip(1).collect();
    let invocation = match args::parse(&tokens) {
        Ok(invocation) => invocation,
        Err(err) => {
            warn!(error = %err, "invalid command line");
            println!("{}", args::USAGE);
            return Ok(ExitCode::FAILURE);
        }
    };

    let context = match &invocation.context_file {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read context file '{}'", path.display()))?,
        ),
        None => None,
    };

    let input = match invocation.input {
        Some(text) => text,
        None => editor::compose_input()?,
    };

    let credential = credentials::resolve()?;
    let messages = prompt::build_messages(&input, invocation.language.as_deref(), context.as_deref());

    let client = Client::builder()
        .build()
        .context("Failed to initialize HTTP client")?;
    let raw = openai::complete_chat(&client, &cfg, &credential, &messages).await?;

    output::render(&raw, invocation.language.as_deref())?;
    Ok(ExitCode::SUCCESS)
}
