//! CPF / CNPJ generation and validation (mod-11 check digits).

use crate::sampling::ValueProvider;

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Headquarters branch suffix of a CNPJ.
const CNPJ_BRANCH: [u32; 4] = [0, 0, 0, 1];

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

fn cpf_weights(len: usize) -> Vec<u32> {
    (2..=len as u32 + 1).rev().collect()
}

fn random_digits(values: &mut dyn ValueProvider, count: usize) -> Vec<u32> {
    (0..count).map(|_| values.between(0, 9) as u32).collect()
}

fn is_repdigit(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

fn render(digits: &[u32]) -> String {
    digits
        .iter()
        .filter_map(|d| char::from_digit(*d, 10))
        .collect()
}

fn parse_digits(document: &str, len: usize) -> Option<Vec<u32>> {
    if document.len() != len {
        return None;
    }
    document.chars().map(|c| c.to_digit(10)).collect()
}

/// Random 11-digit CPF with valid check digits.
pub fn cpf(values: &mut dyn ValueProvider) -> String {
    let mut digits = random_digits(values, 9);
    while is_repdigit(&digits) {
        digits = random_digits(values, 9);
    }
    let first = check_digit(&digits, &cpf_weights(9));
    digits.push(first);
    let second = check_digit(&digits, &cpf_weights(10));
    digits.push(second);
    render(&digits)
}

/// Random 14-digit headquarters CNPJ with valid check digits.
pub fn cnpj(values: &mut dyn ValueProvider) -> String {
    let mut digits = random_digits(values, 8);
    while is_repdigit(&digits) {
        digits = random_digits(values, 8);
    }
    digits.extend_from_slice(&CNPJ_BRANCH);
    let first = check_digit(&digits, &CNPJ_FIRST_WEIGHTS);
    digits.push(first);
    let second = check_digit(&digits, &CNPJ_SECOND_WEIGHTS);
    digits.push(second);
    render(&digits)
}

pub fn is_valid_cpf(document: &str) -> bool {
    let Some(digits) = parse_digits(document, 11) else {
        return false;
    };
    !is_repdigit(&digits)
        && check_digit(&digits[..9], &cpf_weights(9)) == digits[9]
        && check_digit(&digits[..10], &cpf_weights(10)) == digits[10]
}

pub fn is_valid_cnpj(document: &str) -> bool {
    let Some(digits) = parse_digits(document, 14) else {
        return false;
    };
    !is_repdigit(&digits)
        && check_digit(&digits[..12], &CNPJ_FIRST_WEIGHTS) == digits[12]
        && check_digit(&digits[..13], &CNPJ_SECOND_WEIGHTS) == digits[13]
}
