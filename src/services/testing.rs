//! In-memory completion client for tests

use crate::services::bedrock::{
    BedrockError, CompletionClient, ContentBlock, ConverseOutput, ConverseResponse, Message,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the mock answers with
#[derive(Debug, Clone)]
pub enum MockReply {
    Response(ConverseResponse),
    ApiError(u16, String),
}

impl MockReply {
    /// A well-formed assistant reply with a single text block
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Response(ConverseResponse {
            output: Some(ConverseOutput {
                message: Some(Message {
                    role: "assistant".to_string(),
                    content: vec![ContentBlock::text(text)],
                }),
            }),
            stop_reason: Some("end_turn".to_string()),
            usage: None,
        })
    }

    pub fn response(&self) -> ConverseResponse {
        match self {
            MockReply::Response(response) => response.clone(),
            MockReply::ApiError(..) => ConverseResponse::default(),
        }
    }
}

pub struct MockCompletionClient {
    reply: MockReply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String)>>,
}

impl MockCompletionClient {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (system, user) of the most recent call
    pub fn last_prompt(&self) -> Option<(String, String)> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn converse(&self, system: &str, user_message: &str) -> Result<ConverseResponse, BedrockError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user_message.to_string()));

        match &self.reply {
            MockReply::Response(response) => Ok(response.clone()),
            MockReply::ApiError(status, message) => Err(BedrockError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}
