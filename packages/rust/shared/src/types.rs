//! Core domain types for the past-events listing.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One past event, as read from a row of the records CSV.
///
/// Every attribute is kept as the raw string from the source; nothing is
/// parsed, only formatted at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Asset folder name under the media root; also the carousel key.
    #[serde(rename = "Folder Name")]
    pub identifier: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Time")]
    pub time: String,
    /// Free text; split into paragraphs when long.
    #[serde(rename = "Description")]
    pub description: String,
}

// ---------------------------------------------------------------------------
// AssetSet
// ---------------------------------------------------------------------------

/// Media file names located for one record, in carousel order.
///
/// The first entry becomes the active slide. An empty set is a normal state
/// (assets not uploaded yet) and renders as a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSet {
    identifier: String,
    files: Vec<String>,
}

impl AssetSet {
    pub fn new(identifier: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            identifier: identifier.into(),
            files,
        }
    }

    /// An empty set for `identifier`.
    pub fn empty(identifier: impl Into<String>) -> Self {
        Self::new(identifier, Vec::new())
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_set_preserves_given_order() {
        let set = AssetSet::new(
            "summerFair",
            vec!["b.jpg".into(), "a.jpg".into(), "c.png".into()],
        );
        assert_eq!(set.identifier(), "summerFair");
        assert_eq!(set.iter().collect::<Vec<_>>(), ["b.jpg", "a.jpg", "c.png"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn empty_asset_set() {
        let set = AssetSet::empty("midWinterFair");
        assert!(set.is_empty());
        assert_eq!(set.files().len(), 0);
    }
}
