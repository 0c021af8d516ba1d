//! Local password generation for the generate-password view.

use crate::{OplaunchError, Result};
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()-_=+[]{};:,.?";

/// Allowed password lengths.
pub const LENGTH_RANGE: RangeInclusive<usize> = 8..=64;

/// Generator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordOptions {
    /// Number of characters
    pub length: usize,
    /// Include at least one digit
    pub include_numbers: bool,
    /// Include at least one symbol
    pub include_symbols: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 20,
            include_numbers: true,
            include_symbols: true,
        }
    }
}

/// Generates a random password.
///
/// Every enabled character class appears at least once; the remaining
/// characters are drawn from the union of enabled classes and the result is
/// shuffled.
///
/// # Errors
///
/// Returns [`OplaunchError::InvalidInput`] when `length` is outside
/// [`LENGTH_RANGE`].
///
/// # Example
///
/// ```
/// use oplaunch::generator::{generate, PasswordOptions};
///
/// let password = generate(&PasswordOptions { length: 12, ..Default::default() }).unwrap();
/// assert_eq!(password.chars().count(), 12);
/// ```
pub fn generate(options: &PasswordOptions) -> Result<String> {
    if !LENGTH_RANGE.contains(&options.length) {
        return Err(OplaunchError::InvalidInput(format!(
            "password length must be between {} and {}",
            LENGTH_RANGE.start(),
            LENGTH_RANGE.end()
        )));
    }

    let mut classes: Vec<&[u8]> = vec![LETTERS];
    if options.include_numbers {
        classes.push(DIGITS);
    }
    if options.include_symbols {
        classes.push(SYMBOLS);
    }

    let mut rng = OsRng;
    let mut chars = Vec::with_capacity(options.length);
    for class in &classes {
        if let Some(c) = class.choose(&mut rng) {
            chars.push(*c);
        }
    }

    let pool: Vec<u8> = classes.concat();
    while chars.len() < options.length {
        if let Some(c) = pool.choose(&mut rng) {
            chars.push(*c);
        }
    }
    chars.shuffle(&mut rng);

    Ok(chars.into_iter().map(char::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let password = generate(&PasswordOptions::default()).unwrap();
        assert_eq!(password.len(), 20);
        assert!(password.bytes().any(|b| DIGITS.contains(&b)));
        assert!(password.bytes().any(|b| SYMBOLS.contains(&b)));
    }

    #[test]
    fn test_letters_only() {
        let options = PasswordOptions {
            length: 32,
            include_numbers: false,
            include_symbols: false,
        };
        let password = generate(&options).unwrap();
        assert!(password.bytes().all(|b| LETTERS.contains(&b)));
    }

    #[test]
    fn test_length_bounds() {
        for length in [0, 7, 65] {
            let options = PasswordOptions {
                length,
                ..Default::default()
            };
            assert!(matches!(generate(&options), Err(OplaunchError::InvalidInput(_))));
        }
        assert_eq!(
            generate(&PasswordOptions { length: 8, ..Default::default() })
                .unwrap()
                .len(),
            8
        );
    }

    #[test]
    fn test_passwords_differ() {
        let options = PasswordOptions::default();
        assert_ne!(generate(&options).unwrap(), generate(&options).unwrap());
    }
}
