//! Safety documents attached to a permit.

use serde::{Deserialize, Serialize};
use sika_core::{AppError, AppResult};

/// One safety document checkbox with its reference number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedDocument {
    /// Whether the document is attached.
    pub checked: bool,
    /// Document reference number. Empty when not attached.
    #[serde(default)]
    pub number: String,
}

/// The fixed set of safety documents tracked per permit.
///
/// Serialized keys are `jsa`, `ra`, `csep`, `icc`, `tkiTko` and `other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedDocuments {
    /// Job safety analysis.
    #[serde(default)]
    pub jsa: RelatedDocument,
    /// Risk assessment.
    #[serde(default)]
    pub ra: RelatedDocument,
    /// Confined space entry permit.
    #[serde(default)]
    pub csep: RelatedDocument,
    /// Isolation confirmation certificate.
    #[serde(default)]
    pub icc: RelatedDocument,
    /// Tag-in / tag-out record.
    #[serde(default)]
    pub tki_tko: RelatedDocument,
    /// Any other document.
    #[serde(default)]
    pub other: RelatedDocument,
}

impl RelatedDocuments {
    /// Storage keys in display order.
    pub const KEYS: [&'static str; 6] = ["jsa", "ra", "csep", "icc", "tkiTko", "other"];

    /// Returns each document with its storage key.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, &RelatedDocument); 6] {
        [
            ("jsa", &self.jsa),
            ("ra", &self.ra),
            ("csep", &self.csep),
            ("icc", &self.icc),
            ("tkiTko", &self.tki_tko),
            ("other", &self.other),
        ]
    }

    /// Returns a mutable slot for a canonical storage key.
    pub fn slot_mut(&mut self, key: &str) -> Option<&mut RelatedDocument> {
        match key {
            "jsa" => Some(&mut self.jsa),
            "ra" => Some(&mut self.ra),
            "csep" => Some(&mut self.csep),
            "icc" => Some(&mut self.icc),
            "tkiTko" => Some(&mut self.tki_tko),
            "other" => Some(&mut self.other),
            _ => None,
        }
    }

    /// Requires a reference number for every checked document.
    pub fn validate(&self) -> AppResult<()> {
        for (key, document) in self.entries() {
            if document.checked && document.number.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "related document '{key}' is checked but has no number"
                )));
            }
        }

        Ok(())
    }

    /// Returns how many documents are attached.
    #[must_use]
    pub fn checked_count(&self) -> usize {
        self.entries()
            .iter()
            .filter(|(_, document)| document.checked)
            .count()
    }
}
