//! Report sinks: the ranked table (CSV/TSV) and the structured JSON document.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use clap::ValueEnum;
use csv::WriterBuilder;
use serde::Serialize;

use crate::classify::Tier;
use crate::error::Result;
use crate::index::{FileStats, Occurrence};
use crate::pipeline::{Analysis, CompoundScore};

/// Number of most frequent unigrams/bigrams listed in the JSON document.
pub const TOP_FREQUENT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn delimiter(self) -> u8 {
        match self {
            ExportFormat::Csv => b',',
            ExportFormat::Tsv => b'\t',
        }
    }
}

///Neutralises cells a spreadsheet would evaluate as a formula by prefixing a `'`.
///Cells already starting with `'` are left alone.
/// # Example
/// ```
/// use tarkib::csv_safe_cell;
/// assert_eq!(csv_safe_cell("=SUM(A1)".to_string()), "'=SUM(A1)");
/// assert_eq!(csv_safe_cell("كتاب".to_string()), "كتاب");
/// ```
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

pub fn strong_label(strong: bool) -> &'static str {
    if strong { "نعم" } else { "لا" }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

const BASE_COLUMNS: [&str; 12] = [
    "compound",
    "frequency",
    "spread",
    "density",
    "entropy",
    "strong_parts",
    "pmi_ratio",
    "pmi",
    "t_score",
    "log_likelihood",
    "basic_classification",
    "comprehensive_classification",
];

const Z_COLUMNS: [&str; 3] = ["pmi_z", "t_z", "ll_z"];

pub fn table_header(extended: bool) -> Vec<&'static str> {
    let mut header = BASE_COLUMNS.to_vec();
    if extended {
        header.extend(Z_COLUMNS);
    }
    header
}

pub fn table_row(score: &CompoundScore, extended: bool) -> Vec<String> {
    let num = |v: f64, places: i32| round_to(v, places).to_string();
    let mut row = vec![
        csv_safe_cell(score.compound()),
        score.frequency.to_string(),
        score.spread.to_string(),
        num(score.density, 3),
        num(score.entropy, 3),
        strong_label(score.strong_parts).to_string(),
        num(score.pmi_ratio, 5),
        num(score.pmi, 3),
        num(score.t_score, 3),
        num(score.log_likelihood, 3),
        csv_safe_cell(score.basic.label().to_string()),
        csv_safe_cell(score.comprehensive.label().to_string()),
    ];
    if extended {
        row.push(num(score.pmi_z, 3));
        row.push(num(score.t_z, 3));
        row.push(num(score.ll_z, 3));
    }
    row
}

/// Writes one row per compound, in the given (ranked) order.
pub fn write_table<W: Write>(
    writer: W,
    format: ExportFormat,
    compounds: &[CompoundScore],
    extended: bool,
) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(writer);
    wtr.write_record(table_header(extended))?;
    for score in compounds {
        wtr.write_record(table_row(score, extended))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_table_file(
    path: &Path,
    format: ExportFormat,
    compounds: &[CompoundScore],
    extended: bool,
) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    write_table(file, format, compounds, extended)
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub generated_at: String,
    pub total_unigrams: usize,
    pub total_bigrams: usize,
    pub total_files: usize,
}

#[derive(Debug, Serialize)]
pub struct CountEntry {
    pub item: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct Statistics {
    pub unigrams: Vec<CountEntry>,
    pub bigrams: Vec<CountEntry>,
}

#[derive(Debug, Serialize)]
pub struct BigramEntry<'a> {
    pub compound: String,
    pub frequency: u64,
    pub spread: usize,
    pub density: f64,
    pub entropy: f64,
    pub strong_parts: &'static str,
    pub pmi_ratio: f64,
    pub pmi: f64,
    pub t_score: f64,
    pub log_likelihood: f64,
    pub pmi_z: f64,
    pub t_z: f64,
    pub ll_z: f64,
    pub basic_classification: Tier,
    pub comprehensive_classification: Tier,
    pub contexts: &'a [Occurrence],
}

/// The structured report of an analysis.
#[derive(Debug, Serialize)]
pub struct Document<'a> {
    pub metadata: Metadata,
    pub statistics: Statistics,
    pub file_stats: BTreeMap<&'a str, FileStats>,
    pub bigrams: Vec<BigramEntry<'a>>,
}

fn count_entries(items: Vec<(String, u64)>) -> Vec<CountEntry> {
    items
        .into_iter()
        .map(|(item, count)| CountEntry { item, count })
        .collect()
}

pub fn build_document(analysis: &Analysis, generated_at: DateTime<Local>) -> Document<'_> {
    let index = &analysis.index;
    let bigrams = analysis
        .compounds
        .iter()
        .map(|score| BigramEntry {
            compound: score.compound(),
            frequency: score.frequency,
            spread: score.spread,
            density: round_to(score.density, 3),
            entropy: round_to(score.entropy, 3),
            strong_parts: strong_label(score.strong_parts),
            pmi_ratio: round_to(score.pmi_ratio, 5),
            pmi: round_to(score.pmi, 3),
            t_score: round_to(score.t_score, 3),
            log_likelihood: round_to(score.log_likelihood, 3),
            pmi_z: round_to(score.pmi_z, 3),
            t_z: round_to(score.t_z, 3),
            ll_z: round_to(score.ll_z, 3),
            basic_classification: score.basic,
            comprehensive_classification: score.comprehensive,
            contexts: index
                .bigram(&score.key)
                .map(|r| r.occurrences.as_slice())
                .unwrap_or(&[]),
        })
        .collect();

    Document {
        metadata: Metadata {
            generated_at: generated_at.to_rfc3339(),
            total_unigrams: index.distinct_unigrams(),
            total_bigrams: index.distinct_bigrams(),
            total_files: index.file_count(),
        },
        statistics: Statistics {
            unigrams: count_entries(index.top_unigrams(TOP_FREQUENT)),
            bigrams: count_entries(index.top_bigrams(TOP_FREQUENT)),
        },
        file_stats: index
            .file_stats()
            .iter()
            .map(|(file, stats)| (file.as_str(), *stats))
            .collect(),
        bigrams,
    }
}

pub fn write_json<W: Write>(writer: W, analysis: &Analysis) -> Result<()> {
    let document = build_document(analysis, Local::now());
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}

pub fn write_json_file(path: &Path, analysis: &Analysis) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_json(&mut file, analysis)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{BigramKey, CorpusIndex};

    fn sample_score() -> CompoundScore {
        CompoundScore {
            key: BigramKey::new("بيت", "المال"),
            frequency: 12,
            spread: 4,
            density: 3.0,
            entropy: 2.123456,
            strong_parts: false,
            pmi_ratio: 0.0123456,
            pmi: 6.54321,
            t_score: 3.3333,
            log_likelihood: 120.55555,
            basic: Tier::VeryPossible,
            comprehensive: Tier::Strong,
            pmi_z: -0.12345,
            t_z: 1.0,
            ll_z: 0.5,
        }
    }

    #[test]
    fn header_grows_with_z_columns() {
        assert_eq!(table_header(false).len(), 12);
        assert_eq!(table_header(true).len(), 15);
        assert_eq!(table_header(true)[14], "ll_z");
    }

    #[test]
    fn row_is_rounded_and_labelled() {
        let row = table_row(&sample_score(), true);
        assert_eq!(row[0], "بيت المال");
        assert_eq!(row[4], "2.123");
        assert_eq!(row[5], "لا");
        assert_eq!(row[6], "0.01235");
        assert_eq!(row[7], "6.543");
        assert_eq!(row[10], Tier::VeryPossible.label());
        assert_eq!(row[11], Tier::Strong.label());
        // numbers are not treated as formulas
        assert_eq!(row[12], "-0.123");
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let mut buf = Vec::new();
        write_table(&mut buf, ExportFormat::Tsv, &[sample_score()], false).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let mut lines = out.lines();
        assert!(lines.next().unwrap().starts_with("compound\tfrequency\t"));
        assert!(lines.next().unwrap().starts_with("بيت المال\t12\t4\t"));
    }

    #[test]
    fn document_carries_contexts_and_totals() {
        let tokens: Vec<String> = "بيت المال كبير".split(' ').map(String::from).collect();
        let index = CorpusIndex::from_file("a.txt", &tokens);
        let analysis = Analysis {
            index,
            compounds: vec![sample_score()],
            failed_files: Vec::new(),
        };
        let doc = build_document(&analysis, Local::now());
        assert_eq!(doc.metadata.total_files, 1);
        assert_eq!(doc.metadata.total_unigrams, 3);
        assert_eq!(doc.metadata.total_bigrams, 2);
        assert_eq!(doc.bigrams[0].contexts.len(), 1);
        assert_eq!(doc.bigrams[0].contexts[0].context, "بيت المال كبير");
        assert_eq!(doc.file_stats["a.txt"].bigrams, 2);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json["bigrams"][0]["basic_classification"],
            Tier::VeryPossible.label()
        );
        assert_eq!(json["statistics"]["unigrams"].as_array().unwrap().len(), 3);
    }
}
