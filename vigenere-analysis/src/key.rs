//! Repeating Vigenère key

use std::fmt;

use crate::error::{AnalysisError, Result};
use crate::normalize::{from_indices, to_indices, ALPHABET_SIZE};

/// A non-empty sequence of shifts applied cyclically over the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    shifts: Vec<u8>,
}

impl Key {
    /// Create a key from alphabet indices.
    ///
    /// # Errors
    ///
    /// * `InvalidKey` if `shifts` is empty.
    /// * `InvalidKeyCharacter` if an index is outside `0..26`.
    pub fn new(shifts: Vec<u8>) -> Result<Self> {
        if shifts.is_empty() {
            return Err(AnalysisError::InvalidKey);
        }

        if let Some(&bad) = shifts.iter().find(|&&s| s as usize >= ALPHABET_SIZE) {
            return Err(AnalysisError::InvalidKeyCharacter(bad as char));
        }

        Ok(Self { shifts })
    }

    /// Parse a key from text. Non-letters are dropped, case is ignored.
    ///
    /// ```rust
    /// use vigenere_analysis::Key;
    ///
    /// let key = Key::parse("le-mon")?;
    /// assert_eq!(key.to_string(), "LEMON");
    /// # Ok::<(), vigenere_analysis::AnalysisError>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        Self::new(to_indices(text))
    }

    pub fn shifts(&self) -> &[u8] {
        &self.shifts
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    /// Shortest prefix that reproduces the whole key when repeated.
    ///
    /// `ABCABC` reduces to `ABC`. The period length always divides `len()`.
    pub fn minimal_period(&self) -> Key {
        let n = self.shifts.len();

        for period in 1..=n {
            if n % period != 0 {
                continue;
            }

            let prefix = &self.shifts[..period];
            if self.shifts.chunks(period).all(|chunk| chunk == prefix) {
                return Key {
                    shifts: prefix.to_vec(),
                };
            }
        }

        self.clone()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&from_indices(&self.shifts))
    }
}

impl std::str::FromStr for Key {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
