//! Pronunciation substitution for spoken text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rewrites spellings the voice engine mispronounces.
///
/// Maps a phonetic spelling to every original spelling it replaces.
///
/// # Examples
///
/// ```
/// use bulletin_core::PhoneticReplacer;
///
/// let replacer = PhoneticReplacer::from_json(r#"{"Mamaroneck": ["Mamaronek"], "Larchmont": []}"#).unwrap();
/// assert_eq!(replacer.replace("Mamaronek library"), "Mamaroneck library");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneticReplacer {
    substitutions: BTreeMap<String, Vec<String>>,
}

impl PhoneticReplacer {
    /// Creates a replacer from a substitution map.
    pub fn new(substitutions: BTreeMap<String, Vec<String>>) -> Self {
        Self { substitutions }
    }

    /// Parses a JSON object of phonetic spelling to original spellings.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Applies every substitution to `text`.
    pub fn replace(&self, text: &str) -> String {
        self.substitutions
            .iter()
            .fold(text.to_string(), |acc, (phonetic, originals)| {
                originals
                    .iter()
                    .fold(acc, |acc, original| acc.replace(original.as_str(), phonetic))
            })
    }
}
