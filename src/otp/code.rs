//! Passcode generation.

use rand::{rngs::OsRng, Rng};

pub const CODE_LENGTH: usize = 6;

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// Draw a fresh 6-digit passcode from the OS CSPRNG.
///
/// Every call is an independent draw; nothing about previously issued codes is kept.
#[must_use]
pub fn generate() -> String {
    OsRng.gen_range(CODE_MIN..=CODE_MAX).to_string()
}

/// True when `code` has the shape of an issued passcode (6 ASCII digits, no leading zero).
#[must_use]
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH
        && code.bytes().all(|b| b.is_ascii_digit())
        && !code.starts_with('0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_codes_are_six_digits_in_range() {
        for _ in 0..1_000 {
            let code = generate();
            assert!(is_well_formed(&code), "unexpected code shape: {code}");

            let value: u32 = code.parse().unwrap_or_default();
            assert!((CODE_MIN..=CODE_MAX).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn generated_codes_vary() {
        let codes: HashSet<String> = (0..100).map(|_| generate()).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn is_well_formed_rejects_bad_shapes() {
        assert!(is_well_formed("123456"));
        assert!(!is_well_formed("12345"));
        assert!(!is_well_formed("1234567"));
        assert!(!is_well_formed("012345"));
        assert!(!is_well_formed("12a456"));
        assert!(!is_well_formed(" 23456"));
        assert!(!is_well_formed("１２３４５６"));
    }
}
