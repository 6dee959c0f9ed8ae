//! Corpus-wide aggregation of unigram, bigram and context statistics.
//!
//! A [`CorpusIndex`] is built one file at a time with [`CorpusIndex::add_file`]
//! or per file in parallel and combined with [`CorpusIndex::merge`]. Counts
//! and spread sets do not depend on the order files are added; only the order
//! of stored [`Occurrence`]s does.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;

/// Ordered pair of adjacent tokens. `(a, b)` and `(b, a)` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BigramKey {
    pub first: String,
    pub second: String,
}

impl BigramKey {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// A key whose space-joined form splits back into exactly two tokens.
    pub fn is_well_formed(&self) -> bool {
        let ok = |t: &str| !t.is_empty() && !t.chars().any(char::is_whitespace);
        ok(self.first.as_str()) && ok(self.second.as_str())
    }
}

impl fmt::Display for BigramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first, self.second)
    }
}

/// One occurrence of a bigram with up to two tokens of context on each side.
/// `highlight_start..highlight_end` is the pair's char range inside `context`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub file: String,
    pub context: String,
    pub position: usize,
    pub highlight_start: usize,
    pub highlight_end: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BigramRecord {
    pub frequency: u64,
    pub files: BTreeSet<String>,
    pub left: HashMap<String, u64>,
    pub right: HashMap<String, u64>,
    pub occurrences: Vec<Occurrence>,
}

impl BigramRecord {
    pub fn spread(&self) -> usize {
        self.files.len()
    }

    fn merge(&mut self, other: BigramRecord) {
        self.frequency += other.frequency;
        self.files.extend(other.files);
        add_counts(&mut self.left, other.left);
        add_counts(&mut self.right, other.right);
        self.occurrences.extend(other.occurrences);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileStats {
    pub total_words: u64,
    pub bigrams: u64,
}

/// Global aggregates over the whole corpus.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    unigrams: HashMap<String, u64>,
    bigrams: HashMap<BigramKey, BigramRecord>,
    files: HashMap<String, FileStats>,
}

impl CorpusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of a single file.
    pub fn from_file(file: &str, tokens: &[String]) -> Self {
        let mut index = Self::new();
        index.add_file(file, tokens);
        index
    }

    /// Counts one file's filtered token sequence. Pairs never cross files.
    pub fn add_file(&mut self, file: &str, tokens: &[String]) {
        let stats = self.files.entry(file.to_string()).or_default();
        stats.total_words += tokens.len() as u64;

        for token in tokens {
            *self.unigrams.entry(token.clone()).or_insert(0) += 1;
        }

        for i in 0..tokens.len().saturating_sub(1) {
            let key = BigramKey::new(tokens[i].as_str(), tokens[i + 1].as_str());
            let record = self.bigrams.entry(key).or_default();
            record.frequency += 1;
            record.files.insert(file.to_string());
            stats.bigrams += 1;

            record.occurrences.push(occurrence(file, tokens, i));

            if i > 0 {
                *record.left.entry(tokens[i - 1].clone()).or_insert(0) += 1;
            }
            if let Some(next) = tokens.get(i + 2) {
                *record.right.entry(next.clone()).or_insert(0) += 1;
            }
        }
    }

    /// Combines two partial indexes: counts add, spread sets union,
    /// occurrence lists concatenate (`self` first).
    pub fn merge(mut self, other: CorpusIndex) -> CorpusIndex {
        add_counts(&mut self.unigrams, other.unigrams);
        for (key, record) in other.bigrams {
            self.bigrams.entry(key).or_default().merge(record);
        }
        for (file, stats) in other.files {
            let entry = self.files.entry(file).or_default();
            entry.total_words += stats.total_words;
            entry.bigrams += stats.bigrams;
        }
        self
    }

    /// N: total bigram occurrences in the corpus.
    pub fn total_bigrams(&self) -> u64 {
        self.bigrams.values().map(|r| r.frequency).sum()
    }

    pub fn unigram_count(&self, token: &str) -> u64 {
        self.unigrams.get(token).copied().unwrap_or(0)
    }

    pub fn bigram(&self, key: &BigramKey) -> Option<&BigramRecord> {
        self.bigrams.get(key)
    }

    pub fn bigrams(&self) -> impl Iterator<Item = (&BigramKey, &BigramRecord)> {
        self.bigrams.iter()
    }

    pub fn file_stats(&self) -> &HashMap<String, FileStats> {
        &self.files
    }

    pub fn distinct_unigrams(&self) -> usize {
        self.unigrams.len()
    }

    pub fn distinct_bigrams(&self) -> usize {
        self.bigrams.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Most frequent unigrams, count descending then token ascending.
    pub fn top_unigrams(&self, n: usize) -> Vec<(String, u64)> {
        top_n(self.unigrams.iter().map(|(k, v)| (k.clone(), *v)), n)
    }

    /// Most frequent bigrams as space-joined compounds.
    pub fn top_bigrams(&self, n: usize) -> Vec<(String, u64)> {
        top_n(
            self.bigrams.iter().map(|(k, r)| (k.to_string(), r.frequency)),
            n,
        )
    }
}

fn occurrence(file: &str, tokens: &[String], i: usize) -> Occurrence {
    let start = i.saturating_sub(2);
    let end = (i + 4).min(tokens.len());
    let before = joined_chars(&tokens[start..i]);
    let highlight_start = before + usize::from(start < i);
    Occurrence {
        file: file.to_string(),
        context: tokens[start..end].join(" "),
        position: i,
        highlight_start,
        highlight_end: joined_chars(&tokens[start..i + 2]),
    }
}

/// Char length of `tokens` joined by single spaces.
fn joined_chars(tokens: &[String]) -> usize {
    let letters: usize = tokens.iter().map(|t| t.chars().count()).sum();
    letters + tokens.len().saturating_sub(1)
}

fn add_counts(into: &mut HashMap<String, u64>, from: HashMap<String, u64>) {
    for (key, count) in from {
        *into.entry(key).or_insert(0) += count;
    }
}

fn top_n(items: impl Iterator<Item = (String, u64)>, n: usize) -> Vec<(String, u64)> {
    let mut sorted: Vec<(String, u64)> = items.collect();
    sorted.sort_by(|a, b| match b.1.cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    sorted.truncate(n);
    sorted
}
