//! Reference letter frequencies and the scoring strategies that compare against them

use std::cmp::Ordering;
use std::fmt;

use crate::error::{AnalysisError, Result};
use crate::normalize::{letter_counts, ALPHABET_SIZE};

/// Keeps `ln` and the chi-squared divisor finite for letters the language never uses.
pub const EPSILON: f64 = 1e-6;

/// Portuguese letter frequencies (A-Z), without diacritics
const PORTUGUESE_FREQUENCIES: [f64; ALPHABET_SIZE] = [
    0.1463, 0.0104, 0.0388, 0.0499, 0.1257, 0.0102, 0.0130, 0.0128,
    0.0618, 0.0040, 0.0002, 0.0278, 0.0474, 0.0505, 0.1073, 0.0252,
    0.0120, 0.0653, 0.0781, 0.0434, 0.0463, 0.0167, 0.0001, 0.0021,
    0.0001, 0.0047,
];

/// English letter frequencies (A-Z)
const ENGLISH_FREQUENCIES: [f64; ALPHABET_SIZE] = [
    0.08167, 0.01492, 0.02782, 0.04253, 0.12702, 0.02228, 0.02015, 0.06094,
    0.06966, 0.00153, 0.00772, 0.04025, 0.02406, 0.06749, 0.07507, 0.01929,
    0.00095, 0.05987, 0.06327, 0.09056, 0.02758, 0.00978, 0.02360, 0.00150,
    0.01974, 0.00074,
];

/// German letter frequencies (A-Z)
const GERMAN_FREQUENCIES: [f64; ALPHABET_SIZE] = [
    0.0558, 0.0196, 0.0316, 0.0498, 0.1693, 0.0149, 0.0302, 0.0498,
    0.0802, 0.0024, 0.0132, 0.0360, 0.0255, 0.1053, 0.0224, 0.0067,
    0.0002, 0.0689, 0.0642, 0.0579, 0.0383, 0.0084, 0.0178, 0.0005,
    0.0005, 0.0121,
];

/// Natural language whose letter distribution the plaintext is expected to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Portuguese,
    English,
    German,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Portuguese, Language::English, Language::German];

    /// Expected relative frequency of each letter A-Z.
    pub fn frequencies(&self) -> &'static [f64; ALPHABET_SIZE] {
        match self {
            Language::Portuguese => &PORTUGUESE_FREQUENCIES,
            Language::English => &ENGLISH_FREQUENCIES,
            Language::German => &GERMAN_FREQUENCIES,
        }
    }

    /// Index of coincidence of text drawn from this language: `Σ p_i²`.
    pub fn natural_ic(&self) -> f64 {
        self.frequencies().iter().map(|p| p * p).sum()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Portuguese => "Portuguese",
            Language::English => "English",
            Language::German => "German",
        };
        f.write_str(name)
    }
}

/// How an observed letter distribution is compared with the expected one.
///
/// Absolute deviation and log-likelihood are "higher is better", chi-squared is
/// "lower is better". Use [`Scoring::compare`] or [`Scoring::fitness`] instead
/// of comparing raw scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scoring {
    /// `-Σ|observed_i - expected_i|`
    #[default]
    AbsoluteDeviation,
    /// `Σ observed_i · ln(expected_i + ε)`
    LogLikelihood,
    /// `Σ (observed_i - expected_i)² / expected_i`
    ChiSquared,
}

impl Scoring {
    /// Scores letter counts against an expected distribution.
    ///
    /// # Errors
    ///
    /// `EmptyInput` if all counts are zero.
    pub fn score(&self, counts: &[u32; ALPHABET_SIZE], expected: &[f64; ALPHABET_SIZE]) -> Result<f64> {
        let total: u32 = counts.iter().sum();
        if total == 0 {
            return Err(AnalysisError::EmptyInput);
        }
        let total = total as f64;

        let observed = counts.iter().map(|&count| count as f64 / total);
        let pairs = observed.zip(expected.iter().copied());

        let score = match self {
            Scoring::AbsoluteDeviation => -pairs.map(|(o, e)| (o - e).abs()).sum::<f64>(),
            Scoring::LogLikelihood => pairs.map(|(o, e)| o * (e + EPSILON).ln()).sum::<f64>(),
            Scoring::ChiSquared => pairs.map(|(o, e)| (o - e).powi(2) / (e + EPSILON)).sum::<f64>(),
        };

        Ok(score)
    }

    /// Maps a raw score onto a "higher is better" scale.
    pub fn fitness(&self, score: f64) -> f64 {
        match self {
            Scoring::ChiSquared => -score,
            Scoring::AbsoluteDeviation | Scoring::LogLikelihood => score,
        }
    }

    /// `Ordering::Greater` when `a` is the better score.
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        self.fitness(a).total_cmp(&self.fitness(b))
    }

    pub fn is_better(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

impl fmt::Display for Scoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scoring::AbsoluteDeviation => "absolute deviation",
            Scoring::LogLikelihood => "log-likelihood",
            Scoring::ChiSquared => "chi-squared",
        };
        f.write_str(name)
    }
}

/// A language paired with the strategy used to score candidate plaintexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LanguageModel {
    pub language: Language,
    pub scoring: Scoring,
}

impl LanguageModel {
    pub fn new(language: Language, scoring: Scoring) -> Self {
        Self { language, scoring }
    }

    /// Scores text given in the alphabet index domain.
    pub fn score(&self, indices: &[u8]) -> Result<f64> {
        self.score_counts(&letter_counts(indices))
    }

    pub fn score_counts(&self, counts: &[u32; ALPHABET_SIZE]) -> Result<f64> {
        self.scoring.score(counts, self.language.frequencies())
    }
}
