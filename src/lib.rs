//! Term Translate - Batch term translation over Amazon Bedrock
//!
//! A single HTTP endpoint that takes a locale pair and up to 100 terms,
//! sends them to a Bedrock-hosted model in one prompt, and returns the
//! translated terms one per line of the model's reply.

pub mod api;
pub mod config;
pub mod services;

pub use config::Config;
