use serde::{Deserialize, Serialize};
use url::Url;

/// One business listing as read from its detail view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BusinessRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl BusinessRecord {
    /// A record for an entry whose extraction failed. Every field is left empty
    /// until the caller names it.
    pub fn failed(message: impl Into<String>) -> Self {
        BusinessRecord {
            error_message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Dedup key: exact `(name, address)`, an absent address counting as empty.
    pub fn identity(&self) -> (String, String) {
        (self.name.clone(), self.address.clone().unwrap_or_default())
    }

    pub fn has_website(&self) -> bool {
        self.website.as_deref().map_or(false, |w| !w.trim().is_empty())
    }

    pub fn is_error(&self) -> bool {
        self.error_message.as_deref().map_or(false, |m| !m.is_empty())
    }
}

/// Panels show bare hosts ("example.com"); stored websites always carry a scheme.
pub fn normalize_website(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(trimmed.to_string());
    }
    let candidate = format!("https://{}", trimmed);
    match Url::parse(&candidate) {
        Ok(_) => Some(candidate),
        // Keep whatever the panel showed rather than losing the website entirely.
        Err(_) => Some(trimmed.to_string()),
    }
}
