//! Translation service - batches all terms of a request into one model prompt
//!
//! The model is asked for one translation per line. Its reply is split back
//! into lines; a count that differs from the input is logged and tolerated.

use crate::services::bedrock::{BedrockError, CompletionClient, ConverseResponse};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    #[error("invalid model response")]
    InvalidModelResponse,
    #[error("completion request failed: {0}")]
    Completion(#[from] BedrockError),
}

/// Translates term batches through a completion client
pub struct TranslatorService {
    client: Arc<dyn CompletionClient>,
}

impl TranslatorService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Translate `terms` from `origin` to `destination` in a single model call
    pub async fn translate_terms(
        &self,
        origin: &str,
        destination: &str,
        terms: &[String],
    ) -> Result<Vec<String>, TranslateError> {
        info!(
            "Starting translation of {} terms from {} to {}",
            terms.len(),
            origin,
            destination
        );

        let system = build_system_prompt(origin, destination);
        let user_message = build_user_message(terms);

        let response = self
            .client
            .converse(&system, &user_message)
            .await
            .inspect_err(|e| error!("Translation failed: {}", e))?;

        let content = extract_translated_content(&response)
            .inspect_err(|e| error!("Translation failed: {}", e))?;
        let translated = parse_translated_terms(&content, terms.len());

        info!("Translation finished for {} terms", translated.len());
        Ok(translated)
    }
}

/// System instruction naming both locales and the output rules
pub fn build_system_prompt(origin: &str, destination: &str) -> String {
    format!(
        "You are a professional translator specialized in accurate, context-aware translation. \
         Your task is to translate terms from the language '{}' to the language '{}'. \
         Important rules: \
         1. Keep the original context and tone \
         2. Keep proper nouns unchanged unless they have an established translation \
         3. Return ONLY the translations, one per line, in the same order as the original terms \
         4. Do not add explanations, numbering or extra formatting \
         5. If a term cannot be translated, keep the original term",
        origin, destination
    )
}

/// User message listing one term per line
pub fn build_user_message(terms: &[String]) -> String {
    let mut message = String::from("Translate the following terms:\n\n");
    for term in terms {
        message.push_str(term);
        message.push('\n');
    }
    message
}

/// Text of the first content block of the reply, trimmed
pub fn extract_translated_content(response: &ConverseResponse) -> Result<String, TranslateError> {
    response
        .output
        .as_ref()
        .and_then(|output| output.message.as_ref())
        .and_then(|message| message.content.first())
        .and_then(|block| block.text.as_deref())
        .map(|text| text.trim().to_string())
        .ok_or(TranslateError::InvalidModelResponse)
}

/// One trimmed, non-empty line per translated term
pub fn parse_translated_terms(content: &str, expected: usize) -> Vec<String> {
    let terms: Vec<String> = content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if terms.len() != expected {
        warn!(
            "Number of translations ({}) does not match expected ({})",
            terms.len(),
            expected
        );
    }

    terms
}
