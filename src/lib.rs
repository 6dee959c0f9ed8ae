//! # tarkib
//!
//! Finds statistically significant two-word compounds in a folder of Arabic
//! `.txt` files. Text is split into Arabic-letter tokens, stopwords are
//! dropped, and every adjacent pair is scored with PMI, t-score,
//! log-likelihood and context entropy. Pairs passing the filters are ranked by
//! PMI and labelled by two independent tier schemes.
//!
//! ```no_run
//! use std::path::Path;
//! use tarkib::{AnalysisOptions, run};
//!
//! let report = run(
//!     Path::new("corpus"),
//!     Path::new("stop_words.txt"),
//!     &AnalysisOptions::default(),
//! ).unwrap();
//! println!("{}", report.result);
//! ```

pub mod classify;
pub mod corpus;
pub mod error;
pub mod export;
pub mod index;
pub mod normalize;
pub mod pipeline;
pub mod stats;
pub mod stopwords;
pub mod tokenizer;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use log::info;

pub use classify::{Criteria, Tier, classify_basic, classify_comprehensive};
pub use corpus::{collect_files, read_text};
pub use error::{Error, Result};
pub use export::{ExportFormat, csv_safe_cell, write_json_file, write_table_file};
pub use index::{BigramKey, BigramRecord, CorpusIndex, FileStats, Occurrence};
pub use normalize::remove_diacritics;
pub use pipeline::{Analysis, CompoundScore, analyze_folder, analyze_texts, score_corpus};
pub use stopwords::StopFilter;
pub use tokenizer::{MatchMode, Tokenizer};

/// Settings fixed for one run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// 1 = keep diacritics, 2 = strip diacritics, 3 = raw tokens.
    pub mode: u8,
    pub export_format: ExportFormat,
    /// Destination of the ranked table.
    pub output: PathBuf,
    /// Destination of the JSON document. Setting it also adds z-score
    /// columns to the table.
    pub json_output: Option<PathBuf>,
    /// Rows echoed in the text summary.
    pub top: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            mode: 2,
            export_format: ExportFormat::Csv,
            output: PathBuf::from("compounds.csv"),
            json_output: None,
            top: 20,
        }
    }
}

impl AnalysisOptions {
    pub fn extended(&self) -> bool {
        self.json_output.is_some()
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Human-readable summary.
    pub result: String,
    pub written: Vec<PathBuf>,
    pub failed_files: Vec<(String, String)>,
}

/// Analyzes `corpus` and writes the reports. Nothing is written when no
/// compound passes the filters.
pub fn run(corpus: &Path, stopwords: &Path, options: &AnalysisOptions) -> Result<RunReport> {
    let analysis = analyze_folder(corpus, stopwords, options.mode)?;
    let mut written = Vec::new();

    if !analysis.compounds.is_empty() {
        write_table_file(
            &options.output,
            options.export_format,
            &analysis.compounds,
            options.extended(),
        )?;
        info!("Wrote {}", options.output.display());
        written.push(options.output.clone());

        if let Some(json) = &options.json_output {
            write_json_file(json, &analysis)?;
            info!("Wrote {}", json.display());
            written.push(json.clone());
        }
    }

    Ok(RunReport {
        result: format_summary(&analysis, options.top),
        written,
        failed_files: analysis.failed_files,
    })
}

/// Corpus totals followed by the `top` highest-PMI compounds.
pub fn format_summary(analysis: &Analysis, top: usize) -> String {
    let index = &analysis.index;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Files: {}, distinct tokens: {}, distinct bigrams: {}, bigram occurrences: {}",
        index.file_count(),
        index.distinct_unigrams(),
        index.distinct_bigrams(),
        index.total_bigrams()
    );
    if analysis.compounds.is_empty() {
        let _ = writeln!(out, "No compounds passed the filters.");
        return out;
    }
    let _ = writeln!(out, "Accepted compounds: {}", analysis.compounds.len());
    for score in analysis.compounds.iter().take(top) {
        let _ = writeln!(
            out,
            "{}\tf={}\tPMI={:.3}\tt={:.3}\tLL={:.3}\t{}\t{}",
            score.compound(),
            score.frequency,
            score.pmi,
            score.t_score,
            score.log_likelihood,
            score.basic,
            score.comprehensive
        );
    }
    out
}

pub fn print_failed_files(failed: &[(String, String)]) {
    eprintln!("\nSkipped {} file(s):", failed.len());
    for (file, reason) in failed {
        eprintln!("  {file}: {reason}");
    }
}
