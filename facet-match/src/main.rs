//! CLI demo: build an in-memory dictionary from a newline-delimited word
//! list and run approximate matches against it.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use facet_match::{ApproximateMatcher, FeatureExtractor, MemoryIndexStore, SearchOptions, Similarity};

#[derive(Parser)]
#[command(name = "facet-match-cli", about = "Approximate dictionary matching demo")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a newline-delimited dictionary and search it for one query.
    Search {
        /// Path to a file with one dictionary entry per line.
        #[arg(long)]
        dictionary: PathBuf,
        /// Query string to match against the dictionary.
        #[arg(long)]
        query: String,
        /// Similarity threshold in [0.01, 1.0].
        #[arg(long, default_value_t = 0.7)]
        alpha: f64,
        /// Similarity measure: cosine, dice, jaccard, overlap, exact, hamming.
        #[arg(long, default_value = "jaccard")]
        similarity: String,
        /// N-gram granularity: character or word.
        #[arg(long, default_value = "character")]
        ngram_mode: String,
        /// N-gram length.
        #[arg(long, default_value_t = 3)]
        n: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Search { dictionary, query, alpha, similarity, ngram_mode, n } => {
            run_search(&dictionary, &query, alpha, &similarity, &ngram_mode, n)
        }
    }
}

fn run_search(
    dictionary: &PathBuf,
    query: &str,
    alpha: f64,
    similarity: &str,
    ngram_mode: &str,
    n: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let similarity = parse_similarity(similarity)?;
    let extractor = match ngram_mode.to_lowercase().as_str() {
        "character" => FeatureExtractor::character(n, ' ', 0),
        "word" => FeatureExtractor::word(n, " ", " "),
        other => return Err(format!("unknown ngram mode {other:?}").into()),
    };
    let mut matcher = ApproximateMatcher::new(Box::new(MemoryIndexStore::new()), extractor, similarity);

    let text = fs::read_to_string(dictionary)?;
    for line in text.lines() {
        let line = line.trim();
        if !line.is_empty() {
            matcher.insert(line)?;
        }
    }

    let hits = matcher.search(query, SearchOptions { alpha, similarity: None, rank: true })?;
    if hits.is_empty() {
        println!("no matches for {query:?} at alpha >= {alpha}");
    }
    for (candidate, sim) in hits {
        println!("{sim:.4}\t{candidate}");
    }
    Ok(())
}

fn parse_similarity(s: &str) -> Result<Similarity, Box<dyn std::error::Error>> {
    Ok(match s.to_lowercase().as_str() {
        "cosine" => Similarity::Cosine,
        "dice" => Similarity::Dice,
        "jaccard" => Similarity::Jaccard,
        "overlap" => Similarity::Overlap,
        "exact" => Similarity::Exact,
        "hamming" => Similarity::Hamming,
        other => return Err(format!("unknown similarity measure {other:?}").into()),
    })
}
