//! Text normalization and conversion into the alphabet index domain

/// Number of letters in the Latin alphabet the cipher operates on.
pub const ALPHABET_SIZE: usize = 26;

/// Cleans text by keeping only ASCII letters and converting them to uppercase.
///
/// # Arguments
///
/// * `text` - Raw input text.
///
/// # Returns
///
/// A `String` containing only `A`-`Z`. Empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Normalizes text and maps each letter to its alphabet index (A=0, B=1, ...).
pub fn to_indices(text: &str) -> Vec<u8> {
    text.bytes()
        .filter(|b| b.is_ascii_alphabetic())
        .map(|b| b.to_ascii_uppercase() - b'A')
        .collect()
}

/// Maps alphabet indices back to uppercase letters.
///
/// Indices outside `0..26` are reduced modulo 26.
pub fn from_indices(indices: &[u8]) -> String {
    indices
        .iter()
        .map(|&i| (b'A' + i % ALPHABET_SIZE as u8) as char)
        .collect()
}

/// Counts how often each alphabet index occurs.
///
/// # Arguments
///
/// * `indices` - Text in the alphabet index domain.
///
/// # Returns
///
/// An array of 26 counts for letters A-Z.
pub fn letter_counts(indices: &[u8]) -> [u32; ALPHABET_SIZE] {
    let mut counts: [u32; ALPHABET_SIZE] = [0; ALPHABET_SIZE];

    for &index in indices {
        counts[index as usize % ALPHABET_SIZE] += 1;
    }

    counts
}

/// Splits text into `key_length` cosets.
/// Coset `i` holds every letter at a position congruent to `i` modulo `key_length`.
pub fn cosets(indices: &[u8], key_length: usize) -> Vec<Vec<u8>> {
    let mut cosets = vec![Vec::with_capacity(indices.len() / key_length.max(1) + 1); key_length];

    if key_length == 0 {
        return cosets;
    }

    for (i, &index) in indices.iter().enumerate() {
        cosets[i % key_length].push(index);
    }

    cosets
}
