use std::process;

use clap::{Parser, ValueEnum};
use log::warn;
use vigenere_analysis::{
    crack, normalize, to_indices, AnalysisError, BruteForce, Candidate, KeyLengthStrategy, Language,
    Scoring, PREVIEW_WIDTH,
};

/// Command-line arguments for the Vigenère decryptor program.
#[derive(Parser, Debug)]
#[command(author, version, about = "Recovers the key and plaintext of a Vigenère ciphertext", long_about = None)]
struct Cli {
    /// Path to the input file containing encrypted text
    #[arg(short, long, help = "Path to the input file containing encrypted text")]
    file: String,

    /// Path to the output file where decrypted text will be saved
    #[arg(short, long, help = "Path to the output file for decrypted text")]
    output: Option<String>,

    /// Language of the expected plaintext
    #[arg(short, long, value_enum, default_value_t = LanguageArg::Portuguese)]
    language: LanguageArg,

    /// Attack to run
    #[arg(short, long, value_enum, default_value_t = Method::Kasiski)]
    method: Method,

    /// Skip key-length estimation and use this length
    #[arg(short, long, help = "Known key length (frequency methods only)")]
    key_length: Option<usize>,

    /// Largest key length scanned by the index of coincidence
    #[arg(long, default_value_t = 20)]
    max_key_length: usize,

    /// Shortest key length tried by brute force
    #[arg(long, default_value_t = 1)]
    min_length: usize,

    /// Longest key length tried by brute force
    #[arg(long, default_value_t = 3)]
    max_length: usize,

    /// Number of brute-force results to keep
    #[arg(long, default_value_t = 10)]
    limit: usize,

    /// Scoring strategy used by brute force
    #[arg(long, value_enum, default_value_t = ScoringArg::Deviation)]
    scoring: ScoringArg,

    /// Maximum number of keys tried per key length
    #[arg(long)]
    max_candidates: Option<u64>,

    /// Spread the brute-force search over all CPU cores
    #[arg(long)]
    parallel: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LanguageArg {
    Portuguese,
    English,
    German,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Portuguese => Language::Portuguese,
            LanguageArg::English => Language::English,
            LanguageArg::German => Language::German,
        }
    }
}

/// Attack used to recover the key.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Method {
    /// Kasiski examination, then frequency analysis
    Kasiski,
    /// Index of coincidence, then frequency analysis
    Coincidence,
    /// Try every key and keep the best scoring ones
    BruteForce,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScoringArg {
    Deviation,
    LogLikelihood,
    ChiSquared,
}

impl From<ScoringArg> for Scoring {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::Deviation => Scoring::AbsoluteDeviation,
            ScoringArg::LogLikelihood => Scoring::LogLikelihood,
            ScoringArg::ChiSquared => Scoring::ChiSquared,
        }
    }
}

fn main() {
    env_logger::init();

    let cli: Cli = Cli::parse();
    let input: String = std::fs::read_to_string(&cli.file)
        .expect("Failed to read input file");

    // Clean text: only alphabetic characters, uppercase
    let clean_text = normalize(&input);

    if clean_text.len() < 50 {
        warn!("Text may be too short for reliable analysis ({} letters)", clean_text.len());
    }

    let outcome = match cli.method {
        Method::BruteForce => run_brute_force(&cli, &clean_text),
        Method::Kasiski | Method::Coincidence => run_frequency_attack(&cli, &clean_text),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Estimates the key length, recovers the key and writes the plaintext.
fn run_frequency_attack(cli: &Cli, ciphertext: &str) -> Result<(), AnalysisError> {
    let strategy = match (cli.key_length, cli.method) {
        (Some(length), _) => KeyLengthStrategy::Fixed(length),
        (None, Method::Coincidence) => KeyLengthStrategy::IndexOfCoincidence {
            max_length: cli.max_key_length,
        },
        (None, _) => KeyLengthStrategy::Kasiski,
    };

    let result = crack(ciphertext, strategy, cli.language.into())?;

    println!("Estimated key length: {}", result.key_length);
    println!("Estimated key: {}", result.raw_key);
    println!("Minimal period key: {}", result.key);

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &result.plaintext)
                .expect("Failed to write output file");
            println!("Plaintext saved to: {}", path);
        }
        None => println!("Plaintext: {}", result.plaintext),
    }

    Ok(())
}

/// Tries every key in the length range and prints the best candidates.
fn run_brute_force(cli: &Cli, ciphertext: &str) -> Result<(), AnalysisError> {
    let mut search = BruteForce::new(cli.language.into())
        .scoring(cli.scoring.into())
        .parallel(cli.parallel);
    if let Some(budget) = cli.max_candidates {
        search = search.max_candidates(budget);
    }

    let results = search.run_all(&to_indices(ciphertext), cli.min_length..=cli.max_length, cli.limit)?;

    for candidate in &results {
        print_candidate(candidate);
    }

    if let (Some(path), Some(best)) = (&cli.output, results.first()) {
        std::fs::write(path, &best.plaintext)
            .expect("Failed to write output file");
        println!("Best plaintext saved to: {}", path);
    }

    Ok(())
}

fn print_candidate(candidate: &Candidate) {
    println!("Key: {} | Score: {}", candidate.key, candidate.score);
    println!("Plaintext: {}", candidate.preview(PREVIEW_WIDTH));
    println!();
}
