use anyhow::{Context, Result, anyhow};
use regex::RegexBuilder;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Pulls `choices[0].message.content` out of the raw response body.
/// A missing shape, empty choices, or null content is a data-integrity
/// error.
fn extract_content(raw: &str) -> Result<String> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(raw).context("Failed to parse chat completion response")?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Chat completion response contained no choices"))?;
    choice
        .message
        .content
        .ok_or_else(|| anyhow!("Chat completion message contained no content"))
}

/// Collects the interiors of fenced code blocks whose opening fence is
/// tagged with exactly `language` (literal and case-sensitive, so `cs`
/// never matches a `csharp` fence). Matching is non-greedy across
/// newlines; a fence that never closes matches nothing.
fn extract_code_blocks(content: &str, language: &str) -> Result<Vec<String>> {
    let pattern = format!(r"```{}[ \t]*\r?\n(.*?)```", regex::escape(language));
    let fence = RegexBuilder::new(&pattern)
        .dot_matches_new_line(true)
        .build()
        .with_context(|| format!("Failed to build code fence pattern for '{language}'"))?;

    Ok(fence
        .captures_iter(content)
        .filter_map(|captures| captures.get(1))
        .map(|interior| interior.as_str().trim().to_string())
        .collect())
}

/// Formats the raw response body onto stdout: the full content string when
/// no language hint was given, otherwise one trimmed code block per line
/// group. Zero matching blocks prints nothing and is not an error.
pub fn render(raw: &str, language: Option<&str>) -> Result<()> {
    let content = extract_content(raw)?;

    match language {
        None => println!("{content}"),
        Some(language) => {
            let blocks = extract_code_blocks(&content, language)?;
            debug!(
                language = %language,
                block_count = blocks.len(),
                "extracted code blocks from reply"
            );
            for block in blocks {
                println!("{block}");
            }
        }
    }
    Ok(())
}
