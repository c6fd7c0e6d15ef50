//! Page text input.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Extracted text of a document, keyed by page number.
///
/// Pages are iterated in ascending page order. Page numbers are positive but
/// need not be contiguous. Deserializing follows the same rules as
/// [`PageMap::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageMap {
    pages: BTreeMap<u32, String>,
}

impl PageMap {
    /// Create an empty page map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a page map from a JSON object keyed by page number.
    ///
    /// Keys that are not positive integers are skipped. Values that are not
    /// strings are treated as empty pages.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let Some(object) = value.as_object() else {
            warn!("Page text is not a JSON object, treating as empty");
            return Self::new();
        };

        let mut pages = Self::new();
        for (key, text) in object {
            match key.trim().parse::<u32>() {
                Ok(page) if page > 0 => {
                    pages.insert(page, text.as_str().unwrap_or_default());
                }
                _ => warn!(key = %key, "Skipping page with invalid page number"),
            }
        }
        pages
    }

    /// Insert or replace the text of a page. Page 0 is ignored.
    pub fn insert(&mut self, page: u32, text: impl Into<String>) {
        if page == 0 {
            warn!("Ignoring page number 0");
            return;
        }
        self.pages.insert(page, text.into());
    }

    /// Get the text of a page.
    pub fn get(&self, page: u32) -> Option<&str> {
        self.pages.get(&page).map(String::as_str)
    }

    /// Iterate pages in ascending page order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.pages.iter().map(|(page, text)| (*page, text.as_str()))
    }

    /// Page numbers in ascending order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if the map holds no pages at all.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Check if every page is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.pages.values().all(|text| text.trim().is_empty())
    }
}

impl<'de> Deserialize<'de> for PageMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for PageMap {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        let mut pages = Self::new();
        for (page, text) in iter {
            pages.insert(page, text);
        }
        pages
    }
}
