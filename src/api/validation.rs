//! Field-level validation of translation requests

use crate::api::models::{TranslateRequest, TranslationRequest};
use std::collections::BTreeMap;
use std::fmt;

/// Most terms accepted in one request
pub const MAX_TERMS: usize = 100;

/// Validation failures keyed by JSON field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", field, message)?;
        }
        f.write_str("}")
    }
}

impl TranslateRequest {
    /// Check every field, collecting all failures before giving up
    pub fn validate(self) -> Result<TranslationRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        let origin_locale = non_blank(self.origin_locale);
        if origin_locale.is_none() {
            errors.add("origin_locale", "Origin locale is required");
        }

        let destination_locale = non_blank(self.destination_locale);
        if destination_locale.is_none() {
            errors.add("destination_locale", "Destination locale is required");
        }

        match &self.terms {
            None => errors.add("terms", "Terms list must not be null"),
            Some(terms) if terms.is_empty() => errors.add("terms", "Terms list must not be empty"),
            Some(terms) if terms.len() > MAX_TERMS => errors.add("terms", "Maximum of 100 terms per request"),
            Some(_) => {}
        }

        match (origin_locale, destination_locale, self.terms) {
            (Some(origin_locale), Some(destination_locale), Some(terms)) if errors.is_empty() => {
                Ok(TranslationRequest {
                    origin_locale,
                    destination_locale,
                    terms,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Blank means empty after trimming; the value itself is kept as sent
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(origin: Option<&str>, destination: Option<&str>, terms: Option<Vec<&str>>) -> TranslateRequest {
        TranslateRequest {
            origin_locale: origin.map(str::to_string),
            destination_locale: destination.map(str::to_string),
            terms: terms.map(|t| t.into_iter().map(str::to_string).collect()),
        }
    }

    #[test]
    fn test_valid_request() {
        let validated = request(Some("pt-BR"), Some("en-US"), Some(vec!["Olá"]))
            .validate()
            .unwrap();
        assert_eq!(
            validated,
            TranslationRequest {
                origin_locale: "pt-BR".to_string(),
                destination_locale: "en-US".to_string(),
                terms: vec!["Olá".to_string()],
            }
        );
    }

    #[test]
    fn test_blank_locales_rejected() {
        let errors = request(Some("  "), None, Some(vec!["Olá"])).validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("origin_locale"), Some("Origin locale is required"));
        assert_eq!(errors.get("destination_locale"), Some("Destination locale is required"));
        assert_eq!(errors.get("terms"), None);
    }

    #[test]
    fn test_terms_rules() {
        let missing = request(Some("pt"), Some("en"), None).validate().unwrap_err();
        assert_eq!(missing.get("terms"), Some("Terms list must not be null"));

        let empty = request(Some("pt"), Some("en"), Some(vec![])).validate().unwrap_err();
        assert_eq!(empty.get("terms"), Some("Terms list must not be empty"));

        let too_many = request(Some("pt"), Some("en"), Some(vec!["x"; MAX_TERMS + 1]))
            .validate()
            .unwrap_err();
        assert_eq!(too_many.get("terms"), Some("Maximum of 100 terms per request"));

        assert!(request(Some("pt"), Some("en"), Some(vec!["x"; MAX_TERMS]))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_display_is_sorted() {
        let errors = request(None, None, Some(vec![])).validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "{destination_locale=Destination locale is required, \
             origin_locale=Origin locale is required, \
             terms=Terms list must not be empty}"
        );
    }
}
