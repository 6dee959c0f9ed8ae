use std::collections::HashSet;
use std::path::Path;

use log::info;

use crate::corpus::read_text;
use crate::error::Result;
use crate::normalize::{arabic_runs, remove_diacritics};

/// Stopword membership test. Words are stored without diacritics, and every
/// query is stripped before lookup, so vocalised and bare spellings match.
#[derive(Debug, Clone, Default)]
pub struct StopFilter {
    words: HashSet<String>,
}

impl StopFilter {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the set from free text: every Arabic-letter run becomes one entry.
    pub fn from_text(text: &str) -> Self {
        let stripped = remove_diacritics(text);
        let words = arabic_runs(&stripped).map(String::from).collect();
        Self { words }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let filter = Self::from_text(&read_text(path)?);
        info!(
            "Loaded {} stopwords from {}",
            filter.words.len(),
            path.display()
        );
        Ok(filter)
    }

    pub fn is_stop(&self, token: &str) -> bool {
        self.words.contains(&remove_diacritics(token))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
