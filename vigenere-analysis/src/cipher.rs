//! Additive (Vigenère) encryption and decryption over the alphabet index domain

use crate::error::{AnalysisError, Result};
use crate::key::Key;
use crate::normalize::{from_indices, to_indices, ALPHABET_SIZE};

const MODULUS: u8 = ALPHABET_SIZE as u8;

/// Encrypts alphabet indices with a repeating key.
///
/// Position `i` becomes `(plain[i] + key[i mod len(key)]) mod 26`.
///
/// # Errors
///
/// `InvalidKey` if `key` is empty.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(AnalysisError::InvalidKey);
    }

    Ok(plaintext
        .iter()
        .zip(key.iter().cycle())
        .map(|(&p, &k)| (p % MODULUS + k % MODULUS) % MODULUS)
        .collect())
}

/// Decrypts alphabet indices with a repeating key.
///
/// Position `i` becomes `(cipher[i] - key[i mod len(key)] + 26) mod 26`.
///
/// # Errors
///
/// `InvalidKey` if `key` is empty.
pub fn decrypt(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let mut plaintext = Vec::with_capacity(ciphertext.len());
    decrypt_into(ciphertext, key, &mut plaintext)?;
    Ok(plaintext)
}

/// Like [`decrypt`], but reuses `out` so hot loops avoid reallocating.
pub fn decrypt_into(ciphertext: &[u8], key: &[u8], out: &mut Vec<u8>) -> Result<()> {
    if key.is_empty() {
        return Err(AnalysisError::InvalidKey);
    }

    out.clear();
    out.extend(
        ciphertext
            .iter()
            .zip(key.iter().cycle())
            .map(|(&c, &k)| (c % MODULUS + MODULUS - k % MODULUS) % MODULUS),
    );

    Ok(())
}

/// Normalizes `text` and `key`, then encrypts.
///
/// # Returns
///
/// Uppercase letters-only ciphertext.
pub fn encrypt_text(text: &str, key: &str) -> Result<String> {
    let key = Key::parse(key)?;
    encrypt(&to_indices(text), key.shifts()).map(|c| from_indices(&c))
}

/// Normalizes `text` and `key`, then decrypts.
///
/// # Returns
///
/// Uppercase letters-only plaintext.
pub fn decrypt_text(text: &str, key: &str) -> Result<String> {
    let key = Key::parse(key)?;
    decrypt(&to_indices(text), key.shifts()).map(|p| from_indices(&p))
}
