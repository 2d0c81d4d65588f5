//! Outbound services: the Bedrock client and the translator built on it

pub mod bedrock;
pub mod translator;

#[cfg(test)]
pub(crate) mod testing;

pub use bedrock::{BedrockClient, BedrockError, CompletionClient};
pub use translator::{TranslateError, TranslatorService};
