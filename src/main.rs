#![forbid(unsafe_code)]
//! # tarkib CLI
//!
//! Command-line front end of the `tarkib` crate: point it at a folder of
//! Arabic `.txt` files and a stopword list, get a ranked table of candidate
//! compounds and, optionally, a JSON document with their contexts.
//!
//! ## Example
//! ```bash
//! cargo run --release -- corpus/ --stopwords stop_words.txt --mode 2 \
//!     --output compounds.csv --json compounds.json
//! ```
//!
//! See `--help` for all available options.

use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process;
use tarkib::{AnalysisOptions, ExportFormat, print_failed_files, run};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Folder containing the corpus `.txt` files
    path: PathBuf,

    /// Stopword file (any text; every Arabic word in it is a stopword)
    #[arg(long)]
    stopwords: PathBuf,

    /// Token matching: 1 = keep diacritics, 2 = strip diacritics, 3 = raw
    #[arg(long, default_value_t = 2)]
    mode: u8,

    /// Path of the ranked table
    #[arg(long, default_value = "compounds.csv")]
    output: PathBuf,

    /// Table format (csv, tsv)
    #[arg(long, default_value = "csv")]
    export_format: ExportFormat,

    /// Also write a JSON document with contexts and z-scores to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Number of compounds echoed to stdout
    #[arg(long, default_value_t = 20)]
    top: usize,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let options = AnalysisOptions {
        mode: cli.mode,
        export_format: cli.export_format,
        output: cli.output,
        json_output: cli.json,
        top: cli.top,
    };

    match run(&cli.path, &cli.stopwords, &options) {
        Ok(report) => {
            println!("{}", report.result);
            for path in &report.written {
                println!("Created: {}", path.display());
            }
            if !report.failed_files.is_empty() {
                print_failed_files(&report.failed_files);
            }
        }
        Err(e) => {
            error!("Error: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
