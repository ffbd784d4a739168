//! Key-length estimation: Kasiski examination and index of coincidence

use std::collections::{BTreeMap, HashMap};

use log::{debug, trace};

use crate::error::{AnalysisError, Result};
use crate::normalize::{cosets, letter_counts};

/// Smallest key length the Kasiski tally considers plausible.
pub const KASISKI_MIN_PERIOD: usize = 2;
/// Largest key length the Kasiski tally considers plausible.
pub const KASISKI_MAX_PERIOD: usize = 20;
/// Upper bound of the index-of-coincidence scan when the caller gives none.
pub const DEFAULT_MAX_KEY_LENGTH: usize = 20;
/// A shorter key length wins when its IC reaches this share of the best IC.
const SHORTER_KEY_TOLERANCE: f64 = 0.90;

/// How the key length of a ciphertext is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyLengthStrategy {
    /// Kasiski examination, falling back to the IC scan when no period is found.
    #[default]
    Kasiski,
    /// Average index of coincidence over lengths `1..=max_length`.
    IndexOfCoincidence { max_length: usize },
    /// Caller already knows the key length.
    Fixed(usize),
}

/// Greatest common divisor (Euclid).
pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Distances between consecutive occurrences of every repeated trigram.
fn trigram_distances(indices: &[u8]) -> Vec<usize> {
    let mut positions: HashMap<&[u8], Vec<usize>> = HashMap::new();

    for (i, trigram) in indices.windows(3).enumerate() {
        positions.entry(trigram).or_default().push(i);
    }

    let mut distances: Vec<usize> = positions
        .values()
        .filter(|p| p.len() > 1)
        .flat_map(|p| p.windows(2).map(|w| w[1] - w[0]))
        .collect();

    // HashMap order is random; keep the tally input reproducible.
    distances.sort_unstable();
    distances
}

/// Tallies how often each plausible key length occurs as the GCD of two
/// repeated-trigram distances.
///
/// Every pair of distances is combined, even when the two distances come from
/// different trigrams, so unrelated repeats add noise to the tally. A lone
/// distance has no partner and is tallied as its own GCD.
///
/// # Returns
///
/// Map from candidate key length (within `2..=20`) to its occurrence count.
pub fn kasiski_tally(indices: &[u8]) -> BTreeMap<usize, usize> {
    let distances = trigram_distances(indices);
    let plausible = KASISKI_MIN_PERIOD..=KASISKI_MAX_PERIOD;
    let mut tally: BTreeMap<usize, usize> = BTreeMap::new();

    trace!("Kasiski distances: {:?}", distances);

    if let [only] = distances.as_slice() {
        if plausible.contains(only) {
            tally.insert(*only, 1);
        }
        return tally;
    }

    for (i, &a) in distances.iter().enumerate() {
        for &b in &distances[i + 1..] {
            let divisor = gcd(a, b);
            if plausible.contains(&divisor) {
                *tally.entry(divisor).or_insert(0) += 1;
            }
        }
    }

    tally
}

/// Estimates the key length by Kasiski examination.
///
/// # Returns
///
/// The most frequent GCD in the tally (the smaller length on ties), or `1`
/// when no trigram repeats or no GCD falls into `2..=20`.
pub fn estimate_key_length_kasiski(indices: &[u8]) -> usize {
    let tally = kasiski_tally(indices);

    let mut best: Option<(usize, usize)> = None;
    for (&length, &count) in &tally {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((length, count));
        }
    }

    let estimate = best.map_or(1, |(length, _)| length);
    debug!("Kasiski estimate: {} (tally {:?})", estimate, tally);
    estimate
}

/// Index of coincidence of a single coset.
///
/// # Returns
///
/// `Σ count_i·(count_i−1) / (N·(N−1))`, or 0.0 if the coset has fewer than 2 letters.
pub fn coincidence(indices: &[u8]) -> f64 {
    let total = indices.len();
    if total < 2 {
        return 0.0;
    }

    let numerator: u64 = letter_counts(indices)
        .iter()
        .map(|&count| count as u64 * (count as u64).saturating_sub(1))
        .sum();

    numerator as f64 / (total as f64 * (total as f64 - 1.0))
}

/// Average index of coincidence over the `key_length` cosets of the text.
///
/// Cosets with fewer than 2 letters carry no information and are skipped.
///
/// # Errors
///
/// * `EmptyInput` if the text is empty.
/// * `InvalidKeyLength` if `key_length` is 0 or longer than the text.
pub fn index_of_coincidence(indices: &[u8], key_length: usize) -> Result<f64> {
    if indices.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    if key_length == 0 || key_length > indices.len() {
        return Err(AnalysisError::InvalidKeyLength {
            length: key_length,
            max: indices.len(),
        });
    }

    let (total, valid) = cosets(indices, key_length)
        .iter()
        .filter(|coset| coset.len() >= 2)
        .fold((0.0, 0usize), |(sum, n), coset| (sum + coincidence(coset), n + 1));

    if valid == 0 {
        return Ok(0.0);
    }

    Ok(total / valid as f64)
}

/// Average index of coincidence for every key length in `1..=max_length`.
///
/// Lengths beyond the text length are left out.
pub fn coincidence_profile(indices: &[u8], max_length: usize) -> Result<Vec<(usize, f64)>> {
    if indices.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    (1..=max_length.min(indices.len()))
        .map(|length| index_of_coincidence(indices, length).map(|ic| (length, ic)))
        .collect()
}

/// Estimates the key length from the index-of-coincidence profile.
///
/// The length with the highest average IC wins, except that a shorter length
/// whose IC is within 10% of the best is preferred. Multiples of the real key
/// length score as high as the key length itself, so this picks the period.
pub fn estimate_key_length_ic(indices: &[u8], max_length: usize) -> Result<usize> {
    let profile = coincidence_profile(indices, max_length)?;

    let best_ic = profile
        .iter()
        .map(|&(_, ic)| ic)
        .fold(0.0, f64::max);

    let estimate = profile
        .iter()
        .find(|&&(_, ic)| ic >= best_ic * SHORTER_KEY_TOLERANCE)
        .map_or(1, |&(length, _)| length);

    debug!("IC estimate: {} (best average IC {:.4})", estimate, best_ic);
    Ok(estimate)
}

/// Decides the key length of a ciphertext with the given strategy.
///
/// # Errors
///
/// * `EmptyInput` if the ciphertext is empty.
/// * `InvalidKeyLength` for `Fixed(0)` or `IndexOfCoincidence { max_length: 0 }`.
pub fn estimate_key_length(indices: &[u8], strategy: KeyLengthStrategy) -> Result<usize> {
    if indices.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    match strategy {
        KeyLengthStrategy::Fixed(0) | KeyLengthStrategy::IndexOfCoincidence { max_length: 0 } => {
            Err(AnalysisError::InvalidKeyLength {
                length: 0,
                max: indices.len(),
            })
        }
        KeyLengthStrategy::Fixed(length) => Ok(length),
        KeyLengthStrategy::IndexOfCoincidence { max_length } => {
            estimate_key_length_ic(indices, max_length)
        }
        KeyLengthStrategy::Kasiski => match estimate_key_length_kasiski(indices) {
            1 => {
                debug!("Kasiski found no period, falling back to index of coincidence");
                estimate_key_length_ic(indices, DEFAULT_MAX_KEY_LENGTH)
            }
            length => Ok(length),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::encrypt;
    use crate::fixtures::ENGLISH_SAMPLE;
    use crate::key::Key;
    use crate::normalize::to_indices;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn encrypted_sample(key: &str) -> Vec<u8> {
        let key = Key::parse(key).unwrap();
        encrypt(&to_indices(ENGLISH_SAMPLE), key.shifts()).unwrap()
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 13), 1);
        assert_eq!(gcd(0, 5), 5);
    }

    #[test]
    fn test_kasiski_forced_repeat() {
        // "QWE" at offsets 0 and 12, every other trigram unique
        let text = to_indices("QWERTYUIOPASQWEDFGHJKL");
        let estimate = estimate_key_length_kasiski(&text);

        assert!(estimate >= 2);
        assert_eq!(12 % estimate, 0);
        assert_eq!(kasiski_tally(&text).get(&12), Some(&1));
    }

    #[test]
    fn test_kasiski_tally_combines_distances() {
        // "ABC" at 0, 12, 24 and "XYZ" at 30, 38: distances 12, 12, 8
        let text = to_indices("ABCDEFGHIJKLABCMNOPQRSTUABCVGJXYZKMQRTXYZ");
        let tally = kasiski_tally(&text);

        assert_eq!(tally.get(&12), Some(&1));
        assert_eq!(tally.get(&4), Some(&2));
        assert_eq!(estimate_key_length_kasiski(&text), 4);
    }

    #[test]
    fn test_kasiski_no_repeats() {
        assert_eq!(estimate_key_length_kasiski(&to_indices("ABCDEFGHIJKLMNOP")), 1);
        assert_eq!(estimate_key_length_kasiski(&to_indices("AB")), 1);
        assert_eq!(estimate_key_length_kasiski(&[]), 1);
    }

    #[test]
    fn test_ic_calculation() {
        let uniform = to_indices("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        assert_eq!(index_of_coincidence(&uniform, 1).unwrap(), 0.0);

        let repeated = to_indices("AAAA");
        assert_eq!(index_of_coincidence(&repeated, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_ic_random_text_converges() {
        let mut rng = StdRng::seed_from_u64(26);
        let text: Vec<u8> = (0..5000).map(|_| rng.gen_range(0..26)).collect();

        let ic = index_of_coincidence(&text, 1).unwrap();
        assert!((ic - 1.0 / 26.0).abs() < 0.003, "IC {ic}");
    }

    #[test]
    fn test_ic_natural_text() {
        let ic = index_of_coincidence(&to_indices(ENGLISH_SAMPLE), 1).unwrap();
        assert!((0.06..0.08).contains(&ic), "IC {ic}");
    }

    #[test]
    fn test_ic_errors() {
        assert!(matches!(index_of_coincidence(&[], 1), Err(AnalysisError::EmptyInput)));
        assert!(matches!(
            index_of_coincidence(&[1, 2, 3], 0),
            Err(AnalysisError::InvalidKeyLength { length: 0, .. })
        ));
        assert!(matches!(
            index_of_coincidence(&[1, 2, 3], 4),
            Err(AnalysisError::InvalidKeyLength { length: 4, .. })
        ));
    }

    #[test]
    fn test_coincidence_profile_peaks_at_key_length() {
        let ciphertext = encrypted_sample("LEMON");
        let profile = coincidence_profile(&ciphertext, 20).unwrap();

        assert_eq!(profile.len(), 20);
        let (_, at_one) = profile[0];
        let (_, at_five) = profile[4];
        assert!(at_five > 0.06);
        assert!(at_one < 0.05);
    }

    #[test]
    fn test_estimate_key_length_ic() {
        let cases = [("LEMON", 5), ("KEY", 3), ("CRYPTOGRAPHY", 12), ("SECRETKEYS", 10), ("B", 1)];

        for (key, expected) in cases {
            let ciphertext = encrypted_sample(key);
            assert_eq!(estimate_key_length_ic(&ciphertext, 20).unwrap(), expected, "key {key}");
        }
    }

    #[test]
    fn test_estimate_key_length_strategies() {
        let ciphertext = encrypted_sample("KEY");

        assert_eq!(estimate_key_length(&ciphertext, KeyLengthStrategy::Fixed(7)).unwrap(), 7);
        assert_eq!(
            estimate_key_length(&ciphertext, KeyLengthStrategy::IndexOfCoincidence { max_length: 20 }).unwrap(),
            3
        );
        assert!(matches!(
            estimate_key_length(&ciphertext, KeyLengthStrategy::Fixed(0)),
            Err(AnalysisError::InvalidKeyLength { .. })
        ));
        assert!(matches!(
            estimate_key_length(&[], KeyLengthStrategy::Kasiski),
            Err(AnalysisError::EmptyInput)
        ));
    }

    #[test]
    fn test_kasiski_falls_back_to_ic() {
        let text = to_indices("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        assert_eq!(estimate_key_length_kasiski(&text), 1);
        assert!(estimate_key_length(&text, KeyLengthStrategy::Kasiski).is_ok());
    }
}
