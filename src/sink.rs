use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;

use crate::config::Config;
use crate::error::AppError;

/// Longest message a chat webhook accepts, in characters
pub const WEBHOOK_MESSAGE_LIMIT: usize = 2000;

/// Delivers the finished message to people
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<(), AppError>;
}

/// Prints the message, used when no webhook is configured
pub struct StdoutSink;

#[async_trait]
impl MessageSink for StdoutSink {
    async fn deliver(&self, text: &str) -> Result<(), AppError> {
        println!("\n===== FINAL SUMMARY =====");
        println!("{}", text);
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts the message to a chat webhook, split into allowed sizes
pub struct WebhookSink<'a> {
    client: reqwest::Client,
    url: &'a Url,
}

impl<'a> WebhookSink<'a> {
    pub fn new(url: &'a Url) -> Self {
        WebhookSink {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl MessageSink for WebhookSink<'_> {
    async fn deliver(&self, text: &str) -> Result<(), AppError> {
        let chunks = split_message(text, WEBHOOK_MESSAGE_LIMIT);
        tracing::info!(chunks = chunks.len(), "posting digest to webhook");

        for chunk in &chunks {
            let response = self
                .client
                .post(self.url.clone())
                .json(&WebhookPayload { content: chunk })
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AppError::HttpStatus {
                    service: "webhook",
                    status: status.as_u16(),
                    body,
                });
            }
        }
        Ok(())
    }
}

/// Webhook when configured, stdout otherwise
pub fn sink_for(config: &Config) -> Box<dyn MessageSink + '_> {
    match &config.webhook_url {
        Some(url) => Box::new(WebhookSink::new(url)),
        None => Box::new(StdoutSink),
    }
}

fn push_chunk(chunks: &mut Vec<String>, chunk: String) {
    if !chunk.trim().is_empty() {
        chunks.push(chunk);
    }
}

/// Splits text into chunks of at most `limit` characters, breaking between
/// lines. A line longer than the limit is cut on character boundaries.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line_len = line.chars().count();
        let needed = if current.is_empty() {
            line_len
        } else {
            current_len + 1 + line_len
        };

        if needed <= limit {
            if !current.is_empty() {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(line);
            current_len += line_len;
            continue;
        }

        push_chunk(&mut chunks, std::mem::take(&mut current));
        current_len = 0;

        let chars: Vec<char> = line.chars().collect();
        let mut pieces = chars.chunks(limit).peekable();
        while let Some(piece) = pieces.next() {
            let piece: String = piece.iter().collect();
            if pieces.peek().is_some() {
                push_chunk(&mut chunks, piece);
            } else {
                current_len = piece.chars().count();
                current = piece;
            }
        }
    }

    push_chunk(&mut chunks, current);
    chunks
}
