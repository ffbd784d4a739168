//! Exhaustive key search with bounded top-K retention
//!
//! Every key of a given length is tried, so the cost is `26^key_length`
//! decryptions. Keep key lengths small (3–4 in practice); lengths above
//! [`MAX_BRUTE_FORCE_KEY_LENGTH`] are rejected outright.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;

use crate::cipher::decrypt_into;
use crate::error::{AnalysisError, Result};
use crate::key::Key;
use crate::language::{Language, LanguageModel, Scoring};
use crate::normalize::{from_indices, to_indices, ALPHABET_SIZE};

/// Longest key the enumerator accepts (26^10 keys already take days).
pub const MAX_BRUTE_FORCE_KEY_LENGTH: usize = 10;

/// Number of plaintext characters shown by [`Candidate::preview`] by default.
pub const PREVIEW_WIDTH: usize = 100;

/// A scored decryption produced by the key search.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub key: Key,
    /// Raw score under the search's scoring strategy.
    pub score: f64,
    pub plaintext: String,
}

impl Candidate {
    /// Plaintext cut to `width` characters, with `...` appended when cut.
    pub fn preview(&self, width: usize) -> String {
        if self.plaintext.len() > width {
            format!("{}...", &self.plaintext[..width])
        } else {
            self.plaintext.clone()
        }
    }
}

/// Lexicographic enumeration of keys of one length (`AA..A`, `AA..B`, ... `ZZ..Z`).
///
/// Keys are produced by incrementing a base-26 counter, so long keys need no recursion.
#[derive(Debug, Clone)]
pub struct KeySpace {
    digits: Vec<u8>,
    remaining: u64,
}

impl KeySpace {
    /// Every key of `length`.
    pub fn new(length: usize) -> Result<Self> {
        let size = Self::size(length)?;
        Self::range(length, 0, size)
    }

    /// Number of keys of `length`.
    pub fn size(length: usize) -> Result<u64> {
        validate_key_length(length)?;
        Ok((ALPHABET_SIZE as u64).pow(length as u32))
    }

    /// Keys whose lexicographic ordinal lies in `start..end`.
    pub fn range(length: usize, start: u64, end: u64) -> Result<Self> {
        let size = Self::size(length)?;
        let end = end.min(size);
        let start = start.min(end);

        let mut digits = vec![0u8; length];
        let mut rest = start;
        for digit in digits.iter_mut().rev() {
            *digit = (rest % ALPHABET_SIZE as u64) as u8;
            rest /= ALPHABET_SIZE as u64;
        }

        Ok(Self {
            digits,
            remaining: end - start,
        })
    }

    fn advance(&mut self) {
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if (*digit as usize) < ALPHABET_SIZE {
                return;
            }
            *digit = 0;
        }
    }
}

impl Iterator for KeySpace {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let current = self.digits.clone();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, usize::try_from(self.remaining).ok())
    }
}

/// Position of a candidate in the ranking: better fitness first, then the
/// shorter key, then the key enumerated first.
#[derive(Debug, Clone, Copy)]
struct Rank {
    fitness: f64,
    key_length: usize,
    ordinal: u64,
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fitness
            .total_cmp(&other.fitness)
            .then_with(|| other.key_length.cmp(&self.key_length))
            .then_with(|| other.ordinal.cmp(&self.ordinal))
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rank {}

#[derive(Debug)]
struct Ranked {
    rank: Rank,
    candidate: Candidate,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank)
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
    }
}

impl Eq for Ranked {}

/// Keeps the `limit` best candidates; the worst one sits on top of the min-heap.
#[derive(Debug)]
struct TopK {
    heap: BinaryHeap<Reverse<Ranked>>,
    limit: usize,
}

impl TopK {
    fn new(limit: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(limit.saturating_add(1).min(4096)),
            limit,
        }
    }

    fn admits(&self, rank: &Rank) -> bool {
        match self.heap.peek() {
            _ if self.heap.len() < self.limit => true,
            Some(Reverse(worst)) => *rank > worst.rank,
            None => false,
        }
    }

    fn push(&mut self, ranked: Ranked) {
        if !self.admits(&ranked.rank) {
            return;
        }

        self.heap.push(Reverse(ranked));
        if self.heap.len() > self.limit {
            self.heap.pop();
        }
    }

    fn merge(mut self, other: TopK) -> Self {
        for Reverse(ranked) in other.heap {
            self.push(ranked);
        }
        self
    }

    fn into_sorted_vec(self) -> Vec<Candidate> {
        let mut ranked: Vec<Ranked> = self.heap.into_iter().map(|Reverse(r)| r).collect();
        ranked.sort_by(|a, b| b.cmp(a));
        ranked.into_iter().map(|r| r.candidate).collect()
    }
}

fn validate_key_length(length: usize) -> Result<()> {
    if length == 0 || length > MAX_BRUTE_FORCE_KEY_LENGTH {
        return Err(AnalysisError::InvalidKeyLength {
            length,
            max: MAX_BRUTE_FORCE_KEY_LENGTH,
        });
    }
    Ok(())
}

/// Configuration of an exhaustive key search.
///
/// ```rust
/// use vigenere_analysis::{BruteForce, Language, to_indices};
///
/// let results = BruteForce::new(Language::English).run(&to_indices("KHOOR"), 1, 3)?;
/// assert_eq!(results[0].plaintext, "HELLO");
/// # Ok::<(), vigenere_analysis::AnalysisError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct BruteForce {
    model: LanguageModel,
    max_candidates: Option<u64>,
    parallel: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl BruteForce {
    /// Absolute-deviation scoring against `language`, sequential, unbounded.
    pub fn new(language: Language) -> Self {
        Self {
            model: LanguageModel::new(language, Scoring::AbsoluteDeviation),
            ..Self::default()
        }
    }

    pub fn with_model(model: LanguageModel) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    pub fn scoring(mut self, scoring: Scoring) -> Self {
        self.model.scoring = scoring;
        self
    }

    /// Caps the keys tried per key length; the first `limit` keys in
    /// lexicographic order are tried.
    pub fn max_candidates(mut self, limit: u64) -> Self {
        self.max_candidates = Some(limit);
        self
    }

    /// Splits the key space across the rayon thread pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Stops the search once the flag is set; results gathered so far are returned.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn model(&self) -> &LanguageModel {
        &self.model
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(AtomicOrdering::Relaxed))
    }

    /// Scores keys with ordinals in `start..end` into a local top-K.
    fn search_range(&self, ciphertext: &[u8], key_length: usize, start: u64, end: u64, limit: usize) -> Result<TopK> {
        let mut top = TopK::new(limit);
        let mut plaintext = Vec::with_capacity(ciphertext.len());

        for (ordinal, shifts) in (start..).zip(KeySpace::range(key_length, start, end)?) {
            if self.cancelled() {
                debug!("Search cancelled at key ordinal {}", ordinal);
                break;
            }

            decrypt_into(ciphertext, &shifts, &mut plaintext)?;
            let score = self.model.score(&plaintext)?;
            let rank = Rank {
                fitness: self.model.scoring.fitness(score),
                key_length,
                ordinal,
            };

            if top.admits(&rank) {
                top.push(Ranked {
                    rank,
                    candidate: Candidate {
                        key: Key::new(shifts)?,
                        score,
                        plaintext: from_indices(&plaintext),
                    },
                });
            }
        }

        Ok(top)
    }

    fn search(&self, ciphertext: &[u8], key_length: usize, limit: usize) -> Result<TopK> {
        validate_key_length(key_length)?;
        if limit == 0 {
            return Err(AnalysisError::InvalidResultLimit);
        }
        if ciphertext.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let size = KeySpace::size(key_length)?;
        let total = self.max_candidates.map_or(size, |budget| budget.min(size));
        if total < size {
            info!("Trying {} of {} keys of length {}", total, size, key_length);
        } else {
            info!("Trying key length: {}", key_length);
        }

        if !self.parallel {
            return self.search_range(ciphertext, key_length, 0, total, limit);
        }

        let partitions = (rayon::current_num_threads() as u64 * 4).clamp(1, total.max(1));
        let chunk = total.div_ceil(partitions);

        (0..partitions)
            .into_par_iter()
            .map(|p| {
                let start = p * chunk;
                let end = (start + chunk).min(total);
                self.search_range(ciphertext, key_length, start, end, limit)
            })
            .try_reduce(|| TopK::new(limit), |a, b| Ok(a.merge(b)))
    }

    /// Best `limit` candidates among all keys of `key_length`, best first.
    ///
    /// # Errors
    ///
    /// * `InvalidKeyLength` if `key_length` is 0 or above [`MAX_BRUTE_FORCE_KEY_LENGTH`].
    /// * `InvalidResultLimit` if `limit` is 0.
    /// * `EmptyInput` if the ciphertext is empty.
    pub fn run(&self, ciphertext: &[u8], key_length: usize, limit: usize) -> Result<Vec<Candidate>> {
        Ok(self.search(ciphertext, key_length, limit)?.into_sorted_vec())
    }

    /// Best `limit` candidates over every key length in `lengths`, best first.
    ///
    /// On equal scores the shorter key ranks first, then the key enumerated first.
    pub fn run_all(&self, ciphertext: &[u8], lengths: RangeInclusive<usize>, limit: usize) -> Result<Vec<Candidate>> {
        let (min, max) = (*lengths.start(), *lengths.end());
        if min > max {
            return Err(AnalysisError::InvalidRange { min, max });
        }
        validate_key_length(min)?;
        validate_key_length(max)?;

        let mut top = TopK::new(limit);
        for key_length in lengths {
            top = top.merge(self.search(ciphertext, key_length, limit)?);
            if self.cancelled() {
                break;
            }
        }

        Ok(top.into_sorted_vec())
    }
}

/// Exhaustive search over one key length with the given model.
pub fn brute_force(ciphertext: &[u8], key_length: usize, limit: usize, model: &LanguageModel) -> Result<Vec<Candidate>> {
    BruteForce::with_model(*model).run(ciphertext, key_length, limit)
}

/// Exhaustive search over `min_length..=max_length`, merged into one top-K.
pub fn brute_force_all(
    ciphertext: &[u8],
    min_length: usize,
    max_length: usize,
    limit: usize,
    model: &LanguageModel,
) -> Result<Vec<Candidate>> {
    BruteForce::with_model(*model).run_all(ciphertext, min_length..=max_length, limit)
}

/// Text-level exhaustive search scored by absolute deviation.
pub fn brute_force_top_k(
    ciphertext: &str,
    lengths: RangeInclusive<usize>,
    limit: usize,
    language: Language,
) -> Result<Vec<Candidate>> {
    BruteForce::new(language).run_all(&to_indices(ciphertext), lengths, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::encrypt_text;

    fn assert_ranked(results: &[Candidate], scoring: Scoring) {
        for pair in results.windows(2) {
            assert_ne!(scoring.compare(pair[0].score, pair[1].score), Ordering::Less);
        }
    }

    #[test]
    fn test_key_space_order() {
        let keys: Vec<String> = KeySpace::new(2).unwrap().map(|k| from_indices(&k)).collect();

        assert_eq!(keys.len(), 676);
        assert_eq!(keys[0], "AA");
        assert_eq!(keys[1], "AB");
        assert_eq!(keys[26], "BA");
        assert_eq!(keys[675], "ZZ");
    }

    #[test]
    fn test_key_space_range() {
        let keys: Vec<String> = KeySpace::range(3, 25, 28).unwrap().map(|k| from_indices(&k)).collect();
        assert_eq!(keys, vec!["AAZ", "ABA", "ABB"]);

        assert_eq!(KeySpace::range(1, 30, 40).unwrap().count(), 0);
        assert_eq!(KeySpace::size(3).unwrap(), 17_576);
    }

    #[test]
    fn test_caesar_hello() {
        let results = brute_force_top_k("KHOOR", 1..=1, 5, Language::English).unwrap();

        assert_eq!(results[0].key.to_string(), "D");
        assert_eq!(results[0].plaintext, "HELLO");
    }

    #[test]
    fn test_caesar_hello_portuguese() {
        let results = brute_force_top_k("KHOOR", 1..=1, 3, Language::Portuguese).unwrap();
        assert!(results.iter().any(|c| c.key.to_string() == "D" && c.plaintext == "HELLO"));
    }

    #[test]
    fn test_result_limit_and_order() {
        let ciphertext = encrypt_text("the treasure is buried under the old oak tree", "OK").unwrap();

        for limit in [1, 7, 40] {
            let results = brute_force_top_k(&ciphertext, 1..=2, limit, Language::English).unwrap();
            assert_eq!(results.len(), limit);
            assert_ranked(&results, Scoring::AbsoluteDeviation);
        }
    }

    #[test]
    fn test_fewer_keys_than_limit() {
        let results = brute_force_top_k("KHOOR", 1..=1, 100, Language::English).unwrap();
        assert_eq!(results.len(), 26);
    }

    #[test]
    fn test_chi_squared_ranks_ascending() {
        let results = BruteForce::new(Language::English)
            .scoring(Scoring::ChiSquared)
            .run(&to_indices("KHOOR"), 1, 26)
            .unwrap();

        assert_ranked(&results, Scoring::ChiSquared);
        assert!(results[0].score <= results[25].score);
    }

    #[test]
    fn test_deterministic_tie_break() {
        // Swapping which position holds which letter gives identical scores.
        let ciphertext = to_indices("AB");
        let search = BruteForce::new(Language::English);

        let first = search.run(&ciphertext, 2, 50).unwrap();
        let second = search.run(&ciphertext, 2, 50).unwrap();
        assert_eq!(first, second);

        for pair in first.windows(2) {
            if pair[0].score == pair[1].score {
                assert!(pair[0].key < pair[1].key);
            }
        }
    }

    #[test]
    fn test_shorter_key_wins_tie() {
        // "D" and "DD" decrypt KHOOR to the same text.
        let results = brute_force_top_k("KHOOR", 1..=2, 1000, Language::English).unwrap();
        let single = results.iter().position(|c| c.key.to_string() == "D").unwrap();
        let double = results.iter().position(|c| c.key.to_string() == "DD").unwrap();
        assert!(single < double);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let ciphertext = to_indices(&encrypt_text("meet me by the river at midnight", "GO").unwrap());
        let sequential = BruteForce::new(Language::English).run(&ciphertext, 2, 15).unwrap();
        let parallel = BruteForce::new(Language::English)
            .parallel(true)
            .run(&ciphertext, 2, 15)
            .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_candidate_budget() {
        let results = BruteForce::new(Language::English)
            .max_candidates(26)
            .run(&to_indices("KHOORZRUOG"), 2, 100)
            .unwrap();

        assert_eq!(results.len(), 26);
        assert!(results.iter().all(|c| c.key.to_string().starts_with('A')));
    }

    #[test]
    fn test_cancelled_search_keeps_partial_results() {
        let flag = Arc::new(AtomicBool::new(true));
        let results = BruteForce::new(Language::English)
            .cancel_flag(flag)
            .run_all(&to_indices("KHOOR"), 1..=3, 10)
            .unwrap();

        assert!(results.is_empty());
    }

    #[test]
    fn test_preview() {
        let candidate = Candidate {
            key: Key::parse("A").unwrap(),
            score: 0.0,
            plaintext: "ABCDEFGHIJ".to_string(),
        };

        assert_eq!(candidate.preview(4), "ABCD...");
        assert_eq!(candidate.preview(PREVIEW_WIDTH), "ABCDEFGHIJ");
    }

    #[test]
    fn test_invalid_arguments() {
        let ciphertext = to_indices("KHOOR");
        let model = LanguageModel::new(Language::English, Scoring::AbsoluteDeviation);

        assert!(matches!(
            brute_force(&ciphertext, 0, 5, &model),
            Err(AnalysisError::InvalidKeyLength { length: 0, .. })
        ));
        assert!(matches!(
            brute_force(&ciphertext, MAX_BRUTE_FORCE_KEY_LENGTH + 1, 5, &model),
            Err(AnalysisError::InvalidKeyLength { .. })
        ));
        assert!(matches!(
            brute_force(&ciphertext, 1, 0, &model),
            Err(AnalysisError::InvalidResultLimit)
        ));
        assert!(matches!(
            brute_force_all(&ciphertext, 3, 2, 5, &model),
            Err(AnalysisError::InvalidRange { min: 3, max: 2 })
        ));
        assert!(matches!(brute_force(&[], 1, 5, &model), Err(AnalysisError::EmptyInput)));
    }
}
