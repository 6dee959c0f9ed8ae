//! The three passes: index the corpus, score and filter every bigram, then
//! attach population z-scores and rank by PMI.

use std::cmp::Ordering;
use std::path::Path;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::classify::{Criteria, Tier, classify_basic, classify_comprehensive};
use crate::corpus::{collect_files, file_id, read_text};
use crate::error::Result;
use crate::index::{BigramKey, BigramRecord, CorpusIndex};
use crate::stats::{self, Population};
use crate::stopwords::StopFilter;
use crate::tokenizer::{MatchMode, Tokenizer};

/// Acceptance floors applied in pass 2.
pub const MIN_PMI: f64 = 3.0;
pub const MIN_T_SCORE: f64 = 2.0;
pub const MIN_LOG_LIKELIHOOD: f64 = 10.0;
pub const MIN_ENTROPY: f64 = 1.0;

/// Metrics, tiers and z-scores of one accepted compound.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundScore {
    pub key: BigramKey,
    pub frequency: u64,
    pub spread: usize,
    pub density: f64,
    pub entropy: f64,
    pub strong_parts: bool,
    pub pmi_ratio: f64,
    pub pmi: f64,
    pub t_score: f64,
    pub log_likelihood: f64,
    pub basic: Tier,
    pub comprehensive: Tier,
    pub pmi_z: f64,
    pub t_z: f64,
    pub ll_z: f64,
}

impl CompoundScore {
    /// The space-joined pair.
    pub fn compound(&self) -> String {
        self.key.to_string()
    }

    fn criteria(&self) -> Criteria {
        Criteria {
            pmi: self.pmi,
            t_score: self.t_score,
            log_likelihood: self.log_likelihood,
            spread: self.spread,
            density: self.density,
            strong_parts: self.strong_parts,
            pmi_ll_ratio: self.pmi_ratio,
            entropy: self.entropy,
        }
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub index: CorpusIndex,
    /// Accepted compounds, PMI descending.
    pub compounds: Vec<CompoundScore>,
    /// Files skipped because they could not be read: (file id, reason).
    pub failed_files: Vec<(String, String)>,
}

/// Pass 2 for a single bigram: full metric set and both tiers, z-scores zeroed.
pub fn score_bigram(
    key: &BigramKey,
    record: &BigramRecord,
    index: &CorpusIndex,
    n: u64,
) -> CompoundScore {
    let f12 = record.frequency;
    let f1 = index.unigram_count(&key.first);
    let f2 = index.unigram_count(&key.second);
    let spread = record.spread();

    let pmi = stats::pmi(f12, f1, f2, n);
    let t_score = stats::t_score(f12, f1, f2, n);
    let log_likelihood = stats::log_likelihood(f12, f1, f2, n);

    let mut score = CompoundScore {
        key: key.clone(),
        frequency: f12,
        spread,
        density: stats::density(f12, spread),
        entropy: stats::context_entropy(&record.left, &record.right),
        strong_parts: stats::strong_parts(f1, f2),
        pmi_ratio: stats::pmi_ll_ratio(pmi, log_likelihood),
        pmi,
        t_score,
        log_likelihood,
        basic: classify_basic(pmi, t_score, log_likelihood),
        comprehensive: Tier::VeryWeak,
        pmi_z: 0.0,
        t_z: 0.0,
        ll_z: 0.0,
    };
    score.comprehensive = classify_comprehensive(&score.criteria());
    score
}

/// Thresholds apply to full-precision values; rounding happens only in reports.
pub fn is_accepted(score: &CompoundScore) -> bool {
    score.pmi >= MIN_PMI
        && score.t_score >= MIN_T_SCORE
        && score.log_likelihood >= MIN_LOG_LIKELIHOOD
        && score.entropy >= MIN_ENTROPY
}

/// Passes 2 and 3 over a finished index.
pub fn score_corpus(index: &CorpusIndex) -> Vec<CompoundScore> {
    let n = index.total_bigrams();
    info!(
        "Scoring {} distinct bigrams (N = {})",
        index.distinct_bigrams(),
        n
    );

    let mut accepted: Vec<CompoundScore> = Vec::new();
    for (key, record) in index.bigrams() {
        if !key.is_well_formed() {
            debug!("Dropping malformed bigram key {:?}", key);
            continue;
        }
        let score = score_bigram(key, record, index, n);
        if is_accepted(&score) {
            accepted.push(score);
        }
    }
    info!("{} bigrams passed the filters", accepted.len());

    attach_z_scores(&mut accepted);
    rank_by_pmi(&mut accepted);
    accepted
}

/// Pass 3: z-scores relative to exactly the accepted population.
pub fn attach_z_scores(accepted: &mut [CompoundScore]) {
    let column = |f: fn(&CompoundScore) -> f64| -> Vec<f64> {
        accepted.iter().map(f).collect()
    };
    let pmi = Population::of(&column(|s| s.pmi));
    let t = Population::of(&column(|s| s.t_score));
    let ll = Population::of(&column(|s| s.log_likelihood));
    debug!("Population PMI {:?}, t {:?}, LL {:?}", pmi, t, ll);

    for score in accepted.iter_mut() {
        score.pmi_z = pmi.z(score.pmi);
        score.t_z = t.z(score.t_score);
        score.ll_z = ll.z(score.log_likelihood);
    }
}

fn rank_by_pmi(scores: &mut [CompoundScore]) {
    scores.sort_by(|a, b| match b.pmi.total_cmp(&a.pmi) {
        Ordering::Equal => a.key.cmp(&b.key),
        other => other,
    });
}

/// Pass 1 over in-memory files, then scoring. `files` holds (file id, text).
pub fn analyze_texts(files: &[(String, String)], tokenizer: &Tokenizer) -> Analysis {
    let index = files
        .par_iter()
        .map(|(id, text)| CorpusIndex::from_file(id, &tokenizer.tokenize(text)))
        .reduce(CorpusIndex::new, CorpusIndex::merge);
    finish(index, Vec::new())
}

/// Full run over the `.txt` files of `folder`.
///
/// The match mode is validated before anything is read. Files that cannot be
/// read are skipped with a warning and reported in [`Analysis::failed_files`].
pub fn analyze_folder(folder: &Path, stopwords: &Path, mode: u8) -> Result<Analysis> {
    let mode = MatchMode::try_from(mode)?;
    let tokenizer = Tokenizer::new(mode, StopFilter::from_path(stopwords)?);
    let paths = collect_files(folder)?;
    info!(
        "Indexing {} files from {} (mode {})",
        paths.len(),
        folder.display(),
        mode
    );

    let tokenized: Vec<(String, Result<Vec<String>>)> = paths
        .par_iter()
        .map(|path| {
            let tokens = read_text(path).map(|text| tokenizer.tokenize(&text));
            (file_id(path), tokens)
        })
        .collect();

    let (readable, failed_files) = split_readable(tokenized);
    let index = readable
        .par_iter()
        .map(|(id, tokens)| CorpusIndex::from_file(id, tokens))
        .reduce(CorpusIndex::new, CorpusIndex::merge);
    Ok(finish(index, failed_files))
}

/// Separates files that were read and tokenised from those that failed.
/// Failures are logged and kept as (file id, error message).
fn split_readable(
    tokenized: Vec<(String, Result<Vec<String>>)>,
) -> (Vec<(String, Vec<String>)>, Vec<(String, String)>) {
    let mut failed_files = Vec::new();
    let mut readable = Vec::with_capacity(tokenized.len());
    for (id, tokens) in tokenized {
        match tokens {
            Ok(tokens) => readable.push((id, tokens)),
            Err(e) => {
                warn!("Skipping {}: {}", id, e);
                failed_files.push((id, e.to_string()));
            }
        }
    }
    (readable, failed_files)
}

fn finish(index: CorpusIndex, failed_files: Vec<(String, String)>) -> Analysis {
    info!(
        "Indexed {} files: {} distinct tokens, {} distinct bigrams",
        index.file_count(),
        index.distinct_unigrams(),
        index.distinct_bigrams()
    );
    let compounds = score_corpus(&index);
    Analysis {
        index,
        compounds,
        failed_files,
    }
}
