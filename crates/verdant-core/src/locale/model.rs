//! Locale identifier model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Short locale identifier such as `"en"` or `"vi"`.
///
/// Tags are normalized on construction: surrounding whitespace is trimmed
/// and the value is lowercased, so `" VI "` and `"vi"` compare equal. An
/// empty tag does not exist; parsing one fails.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Parses and normalizes a tag. Returns `None` for blank input.
    pub fn parse<S: AsRef<str>>(raw: S) -> Option<Self> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// English, the locale shipped with the app.
    pub fn english() -> Self {
        Self("en".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageTag {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageTag({})", self.0)
    }
}

impl TryFrom<String> for LanguageTag {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| format!("invalid language tag: {:?}", raw))
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0
    }
}
