//! `tfidf-rec`: recommend similar documents for every file in a directory.
//!
//! ```bash
//! tfidf-rec --input ./posts --k 5 --min-score 0.4 --output recommendations.jsonl
//! RUST_LOG=debug tfidf-rec --input ./posts --config rec.toml
//! tfidf-rec --input ./posts --similar-to 3,17 --min-score 0.3
//! ```
//!
//! Files are read in name order; the position of a file is its document id and
//! its stem is its title. One JSON line is written per document.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use tf_idf_recommender::{Candidate, Document, Recommendations, Recommender, RecommenderConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Batch top-K similar document recommendation over TF-IDF vectors.
///
/// Command line values override the config file, which overrides the defaults.
#[derive(Parser, Debug)]
#[command(name = "tfidf-rec", version)]
struct Cli {
    /// Directory holding one document per file
    #[arg(long)]
    input: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSONL output file (stdout when absent)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Maximum recommendations per document
    #[arg(long)]
    k: Option<usize>,

    /// Minimum cosine score of a recommendation
    #[arg(long)]
    min_score: Option<f64>,

    /// Rows per similarity block
    #[arg(long)]
    block_size: Option<usize>,

    /// Normalization worker threads
    #[arg(long)]
    workers: Option<usize>,

    /// Write the fitted model as CBOR
    #[arg(long)]
    save_model: Option<PathBuf>,

    /// Instead of top-k for every document, list every document similar to any of these ids
    #[arg(long, value_delimiter = ',')]
    similar_to: Option<Vec<usize>>,
}

#[derive(Serialize)]
struct RecommendationRecord<'a> {
    post_id: usize,
    title: &'a str,
    recommendations: Vec<CandidateRecord<'a>>,
}

#[derive(Serialize)]
struct CandidateRecord<'a> {
    id: usize,
    title: &'a str,
    score: f64,
}

impl<'a> CandidateRecord<'a> {
    fn new(candidate: &Candidate, titles: &'a [String]) -> Self {
        Self {
            id: candidate.id,
            title: titles.get(candidate.id).map(String::as_str).unwrap_or_default(),
            score: candidate.score,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let (documents, titles) = load_documents(&cli.input)?;
    if documents.is_empty() {
        bail!("no documents found in {}", cli.input.display());
    }

    let recommender = Recommender::new(config.clone())?;
    let model = recommender.fit(&documents)?;
    if let Some(path) = &cli.save_model {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        model.to_cbor_writer(BufWriter::new(file))?;
        info!(path = %path.display(), "model saved");
    }

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match &cli.similar_to {
        Some(seeds) => {
            let found = model.engine().similar_to_any(seeds, config.min_score)?;
            let records: Vec<CandidateRecord> = found.iter().map(|c| CandidateRecord::new(c, &titles)).collect();
            serde_json::to_writer(&mut out, &records)?;
            writeln!(out)?;
        }
        None => {
            let recommendations = recommender.recommend_fitted(&model)?;
            write_jsonl(&mut out, &recommendations, &titles)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<RecommenderConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => RecommenderConfig::default(),
    };
    if let Some(k) = cli.k {
        config.k = k;
    }
    if let Some(min_score) = cli.min_score {
        config.min_score = min_score;
    }
    if let Some(block_size) = cli.block_size {
        config.block_size = block_size;
    }
    if let Some(workers) = cli.workers {
        config.worker_count = workers;
    }
    Ok(config)
}

/// Regular files of `dir` sorted by name, with their stems as titles.
/// A file that cannot be read still gets a slot so ids stay dense.
fn load_documents(dir: &Path) -> anyhow::Result<(Vec<Document>, Vec<String>)> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    let mut titles = Vec::with_capacity(paths.len());
    for (id, path) in paths.iter().enumerate() {
        let document = match fs::read(path) {
            Ok(bytes) => Document::from_bytes(id, bytes),
            Err(error) => {
                warn!(path = %path.display(), %error, "unreadable document");
                Document::unreadable(id, error.to_string())
            }
        };
        documents.push(document);
        titles.push(
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
    }
    info!(documents = documents.len(), dir = %dir.display(), "documents loaded");
    Ok((documents, titles))
}

fn write_jsonl<W: Write>(out: &mut W, recommendations: &Recommendations, titles: &[String]) -> anyhow::Result<()> {
    for rec in recommendations {
        let record = RecommendationRecord {
            post_id: rec.source_id,
            title: titles.get(rec.source_id).map(String::as_str).unwrap_or_default(),
            recommendations: rec.candidates.iter().map(|c| CandidateRecord::new(c, titles)).collect(),
        };
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
    }
    Ok(())
}
