use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::prompt::Message;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

fn chat_url(base_url: &str) -> String {
    format!("{}/v1/chat/completions", base_url.trim_end_matches('/'))
}

fn to_chat_messages(messages: &[Message]) -> Vec<ChatMessage> {
    messages
        .iter()
        .map(|msg| ChatMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        })
        .collect()
}

fn api_request_error(err: reqwest::Error, api_url: &str) -> anyhow::Error {
    if err.is_connect() {
        return anyhow!(
            "Failed to connect to chat API at '{}'. \
             Check CLAI_API_BASE_URL and network connectivity.",
            api_url
        );
    }
    anyhow!("Failed to call chat API at '{}': {}", api_url, err)
}

/// Sends the conversation as a single bearer-authenticated POST and
/// returns the raw response body. One attempt; a non-success status echoes
/// the body to stderr and fails with a status-derived error.
pub async fn complete_chat(
    client: &Client,
    cfg: &Config,
    credential: &str,
    messages: &[Message],
) -> Result<String> {
    let api_url = chat_url(&cfg.api_base_url);
    let body = ChatCompletionRequest {
        model: cfg.model.clone(),
        messages: to_chat_messages(messages),
    };
    debug!(
        api_url = %api_url,
        model = %cfg.model,
        message_count = messages.len(),
        "sending chat completion request"
    );

    let response = client
        .post(&api_url)
        .bearer_auth(credential)
        .json(&body)
        .send()
        .await
        .map_err(|err| {
            warn!(api_url = %api_url, model = %cfg.model, error = %err, "chat request failed");
            api_request_error(err, &api_url)
        })?;

    let status = response.status();
    if !status.is_success() {
        let response_body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read response body>".to_string());
        warn!(
            api_url = %api_url,
            status = %status,
            response_body_len = response_body.len(),
            "chat API returned non-success status"
        );
        eprintln!("{response_body}");
        return Err(anyhow!("Chat request failed with status {status}"));
    }

    let raw = response
        .text()
        .await
        .context("Failed to read chat completion response body")?;
    debug!(model = %cfg.model, response_len = raw.len(), "received chat completion response");
    Ok(raw)
}
