//! # Vigenère Analysis Library
//!
//! Ciphertext-only cryptanalysis of the Vigenère cipher over the 26-letter Latin alphabet.
//!
//! ## Components
//!
//! - **Normalizer** - strips non-letters and upper-cases the rest
//! - **Cipher** - additive encryption and decryption with a repeating key
//! - **Language model** - reference letter frequencies and three scoring strategies
//! - **Period estimation** - Kasiski examination and index of coincidence
//! - **Frequency recovery** - per-coset shift search, reduced to the key's minimal period
//! - **Brute force** - exhaustive key search keeping only the best K candidates
//!
//! ## Usage
//!
//! ```rust
//! use vigenere_analysis::{crack, encrypt_text, KeyLengthStrategy, Language};
//!
//! let ciphertext = encrypt_text("Hello, World!", "KEY")?;
//! assert_eq!(ciphertext, "RIJVSUYVJN");
//!
//! // Longer texts can be broken without the key
//! let result = crack(&ciphertext, KeyLengthStrategy::Fixed(3), Language::English)?;
//! assert_eq!(result.key.len(), 3);
//! # Ok::<(), vigenere_analysis::AnalysisError>(())
//! ```
//!
//! This is a teaching and forensics tool against a cipher that has been broken
//! since the 19th century. Nothing here is meant to protect data.

pub mod brute_force;
pub mod cipher;
pub mod error;
pub mod key;
pub mod language;
pub mod normalize;
pub mod period;
pub mod recovery;

#[cfg(test)]
mod fixtures;

pub use brute_force::{
    brute_force, brute_force_all, brute_force_top_k, BruteForce, Candidate, KeySpace,
    MAX_BRUTE_FORCE_KEY_LENGTH, PREVIEW_WIDTH,
};
pub use cipher::{decrypt, decrypt_text, encrypt, encrypt_text};
pub use error::{AnalysisError, Result};
pub use key::Key;
pub use language::{Language, LanguageModel, Scoring};
pub use normalize::{from_indices, letter_counts, normalize, to_indices};
pub use period::{
    coincidence_profile, estimate_key_length, estimate_key_length_ic, estimate_key_length_kasiski,
    index_of_coincidence, kasiski_tally, KeyLengthStrategy,
};
pub use recovery::{crack, recover_key, recover_key_by_frequency, Crack};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
