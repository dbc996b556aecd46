use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

/// Validates the CPF check digits. Formatting characters are ignored; the
/// eleven digits must satisfy both verifier positions.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 {
        return false;
    }

    let first = check_digit(&digits[..9], 10);
    if first != digits[9] {
        return false;
    }

    let second = check_digit(&digits[..10], 11);
    second == digits[10]
}

fn check_digit(digits: &[u32], initial_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(index, digit)| digit * (initial_weight - index as u32))
        .sum();
    let rest = (sum * 10) % 11;
    if rest >= 10 {
        0
    } else {
        rest
    }
}

/// Eighteenth birthday reached as of `today`.
pub fn is_adult(birth_date: NaiveDate, today: NaiveDate) -> bool {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age >= 18
}

/// Phone numbers are captured masked: `(dd) dddd-dddd` or `(dd) ddddd-dddd`.
pub fn is_valid_phone(phone: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^\(\d{2}\) \d{4,5}-\d{4}$").expect("phone pattern is well-formed")
    });
    pattern.is_match(phone)
}
