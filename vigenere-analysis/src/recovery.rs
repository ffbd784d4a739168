//! Frequency-based key recovery and the complete ciphertext-only attack

use log::{debug, info};

use crate::cipher::decrypt;
use crate::error::{AnalysisError, Result};
use crate::key::Key;
use crate::language::{Language, LanguageModel, Scoring};
use crate::normalize::{cosets, from_indices, letter_counts, to_indices, ALPHABET_SIZE};
use crate::period::{estimate_key_length, KeyLengthStrategy};

/// Finds the shift that makes a coset look most like the model's language.
///
/// Shift `s` is tried by subtracting it from every letter; ties keep the smaller shift.
pub fn best_shift(coset: &[u8], model: &LanguageModel) -> Result<u8> {
    let counts = letter_counts(coset);
    let mut best: Option<(u8, f64)> = None;

    for shift in 0..ALPHABET_SIZE {
        let mut shifted = [0u32; ALPHABET_SIZE];
        for (plain, slot) in shifted.iter_mut().enumerate() {
            *slot = counts[(plain + shift) % ALPHABET_SIZE];
        }

        let score = model.score_counts(&shifted)?;
        if best.map_or(true, |(_, best_score)| model.scoring.is_better(score, best_score)) {
            best = Some((shift as u8, score));
        }
    }

    best.map(|(shift, _)| shift).ok_or(AnalysisError::EmptyInput)
}

/// Recovers one key letter per coset, without reducing the key.
///
/// # Errors
///
/// * `EmptyInput` if the ciphertext is empty.
/// * `InvalidKeyLength` if `key_length` is 0 or exceeds the ciphertext length.
pub fn recover_key_unreduced(indices: &[u8], key_length: usize, model: &LanguageModel) -> Result<Key> {
    if indices.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    if key_length == 0 || key_length > indices.len() {
        return Err(AnalysisError::InvalidKeyLength {
            length: key_length,
            max: indices.len(),
        });
    }

    let shifts = cosets(indices, key_length)
        .iter()
        .map(|coset| best_shift(coset, model))
        .collect::<Result<Vec<u8>>>()?;

    Key::new(shifts)
}

/// Recovers the key for a fixed key length and reduces it to its minimal period.
///
/// Runs in `O(key_length · coset_length · 26)`.
pub fn recover_key(indices: &[u8], key_length: usize, model: &LanguageModel) -> Result<Key> {
    let key = recover_key_unreduced(indices, key_length, model)?;
    let reduced = key.minimal_period();

    debug!("Recovered key {} (minimal period {})", key, reduced);
    Ok(reduced)
}

/// Text-level key recovery scored by log-likelihood.
///
/// # Returns
///
/// The recovered key as uppercase letters, reduced to its minimal period.
pub fn recover_key_by_frequency(ciphertext: &str, key_length: usize, language: Language) -> Result<String> {
    let model = LanguageModel::new(language, Scoring::LogLikelihood);
    recover_key(&to_indices(ciphertext), key_length, &model).map(|key| key.to_string())
}

/// Outcome of a complete ciphertext-only attack.
#[derive(Debug, Clone, PartialEq)]
pub struct Crack {
    /// Key length chosen by the estimator.
    pub key_length: usize,
    /// Key recovered for `key_length`, before reduction.
    pub raw_key: Key,
    /// `raw_key` reduced to its minimal period.
    pub key: Key,
    pub plaintext: String,
}

/// Breaks a ciphertext: estimate the key length, recover the key by
/// frequency analysis, reduce it, and decrypt.
///
/// ```rust
/// use vigenere_analysis::{crack, encrypt_text, KeyLengthStrategy, Language};
///
/// let ciphertext = encrypt_text("attack at dawn", "K")?;
/// let result = crack(&ciphertext, KeyLengthStrategy::Fixed(1), Language::English)?;
/// assert_eq!(result.key.len(), 1);
/// # Ok::<(), vigenere_analysis::AnalysisError>(())
/// ```
pub fn crack(ciphertext: &str, strategy: KeyLengthStrategy, language: Language) -> Result<Crack> {
    let indices = to_indices(ciphertext);
    let key_length = estimate_key_length(&indices, strategy)?;
    info!("Estimated key length: {}", key_length);

    let model = LanguageModel::new(language, Scoring::LogLikelihood);
    let raw_key = recover_key_unreduced(&indices, key_length, &model)?;
    let key = raw_key.minimal_period();
    let plaintext = from_indices(&decrypt(&indices, key.shifts())?);

    info!("Recovered key: {} (minimal period {})", raw_key, key);

    Ok(Crack {
        key_length,
        raw_key,
        key,
        plaintext,
    })
}
