use std::fmt;

use crate::error::{Error, Result};
use crate::normalize::{arabic_runs, remove_diacritics};
use crate::stopwords::StopFilter;

/// How tokens are normalised before counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Mode 1: diacritics kept verbatim, so vocalised variants count separately.
    Exact,
    /// Mode 2: diacritics stripped, variants merge.
    Stripped,
    /// Mode 3: tokens passed through unchanged.
    Raw,
}

impl TryFrom<u8> for MatchMode {
    type Error = Error;

    fn try_from(mode: u8) -> Result<Self> {
        match mode {
            1 => Ok(MatchMode::Exact),
            2 => Ok(MatchMode::Stripped),
            3 => Ok(MatchMode::Raw),
            other => Err(Error::InvalidMode(other)),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = match self {
            MatchMode::Exact => 1,
            MatchMode::Stripped => 2,
            MatchMode::Raw => 3,
        };
        write!(f, "{n}")
    }
}

/// Splits text into Arabic tokens, normalises them and drops stopwords.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    mode: MatchMode,
    stops: StopFilter,
}

impl Tokenizer {
    pub fn new(mode: MatchMode, stops: StopFilter) -> Self {
        Self { mode, stops }
    }

    /// Fails with [`Error::InvalidMode`] unless `mode` is 1, 2 or 3.
    pub fn with_mode(mode: u8, stops: StopFilter) -> Result<Self> {
        Ok(Self::new(MatchMode::try_from(mode)?, stops))
    }

    pub fn normalize(&self, word: &str) -> String {
        match self.mode {
            MatchMode::Stripped => remove_diacritics(word),
            MatchMode::Exact | MatchMode::Raw => word.to_string(),
        }
    }

    /// Filtered token sequence of one file.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        arabic_runs(text)
            .filter(|w| !self.stops.is_stop(w))
            .map(|w| self.normalize(w))
            .collect()
    }
}
