//! Request and response bodies of the translation endpoint

use serde::{Deserialize, Serialize};

/// Inbound body as sent by the caller.
///
/// Every field is optional so a missing or null value is reported by
/// validation with a field-level message instead of a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub origin_locale: Option<String>,
    #[serde(default)]
    pub destination_locale: Option<String>,
    #[serde(default)]
    pub terms: Option<Vec<String>>,
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub origin_locale: String,
    pub destination_locale: String,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub terms_translated: Vec<String>,
}
