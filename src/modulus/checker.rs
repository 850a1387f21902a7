//! Modulus Checker
//!
//! UK sort code / account number validation following the VocaLink
//! modulus checking rules, including the numbered exceptions.

use std::path::Path;

use super::weights::{ModulusMethod, SubstitutionTable, WeightRow, WeightTable, WEIGHT_COUNT};
use super::{BankAccountValidator, ModulusError};

/// Seed subset of the weight table, in valacdos.txt format
const SEED_WEIGHT_TABLE: &str = include_str!("../../data/valacdos.txt");

/// Weights replacing the table row under exception 2 when a != 0 and g != 9
const EXCEPTION_2_WEIGHTS: [i32; WEIGHT_COUNT] = [0, 0, 1, 2, 5, 3, 6, 4, 8, 7, 10, 9, 3, 1];

/// Weights replacing the table row under exception 2 when a != 0 and g == 9
const EXCEPTION_2_G9_WEIGHTS: [i32; WEIGHT_COUNT] = [0, 0, 0, 0, 0, 0, 0, 0, 8, 7, 10, 9, 3, 1];

/// Sort code used for the check under exception 8
const EXCEPTION_8_SORT_CODE: u32 = 90126;

/// Sort code used for the second check under exception 9
const EXCEPTION_9_SORT_CODE: u32 = 309634;

// Digit positions within the fourteen-digit string u v w x y z a b c d e f g h
const A: usize = 6;
const B: usize = 7;
const C: usize = 8;
const G: usize = 12;
const H: usize = 13;

/// A sort code and account number as the fourteen digits the checks run over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountDigits {
    digits: [i32; WEIGHT_COUNT],
}

impl AccountDigits {
    /// Normalise user input. Returns `None` when no check can be applied.
    pub fn normalize(sort_code: &str, account_number: &str) -> Option<Self> {
        let sort = strip_separators(sort_code);
        let account = strip_separators(account_number);

        if sort.len() != 6 || !all_digits(&sort) || !all_digits(&account) {
            return None;
        }

        let (sort, account) = match account.len() {
            6 => (sort, format!("00{}", account)),
            7 => (sort, format!("0{}", account)),
            8 => (sort, account),
            // Nine digits: first account digit replaces the last sort code digit
            9 => (format!("{}{}", &sort[..5], &account[..1]), account[1..].to_string()),
            10 => (sort, account[2..].to_string()),
            _ => return None,
        };

        let mut digits = [0i32; WEIGHT_COUNT];
        for (slot, byte) in digits.iter_mut().zip(sort.bytes().chain(account.bytes())) {
            *slot = i32::from(byte - b'0');
        }

        Some(Self { digits })
    }

    pub fn sort_code(&self) -> u32 {
        self.digits[..A]
            .iter()
            .fold(0u32, |acc, digit| acc * 10 + *digit as u32)
    }

    fn with_sort_code(mut self, sort_code: u32) -> Self {
        let mut remaining = sort_code;
        for slot in self.digits[..A].iter_mut().rev() {
            *slot = (remaining % 10) as i32;
            remaining /= 10;
        }
        self
    }

    /// Drop h and shift a..g one place right (exception 14)
    fn shifted_right(mut self) -> Self {
        for index in (A + 1..WEIGHT_COUNT).rev() {
            self.digits[index] = self.digits[index - 1];
        }
        self.digits[A] = 0;
        self
    }

    /// Foreign currency accounts are not checked (exception 6)
    fn is_foreign_currency(&self) -> bool {
        (4..=8).contains(&self.digits[A]) && self.digits[G] == self.digits[H]
    }

    fn digit(&self, position: usize) -> i32 {
        self.digits[position]
    }
}

/// How much of the sort code space a weight table describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCoverage {
    /// The published table: a sort code without a row has no checks and is valid
    Complete,
    /// A subset: a sort code without a row may still have checks and is rejected
    Partial,
}

/// Validator backed by a weight table and a substitution table
#[derive(Debug, Clone)]
pub struct ModulusChecker {
    weights: WeightTable,
    substitutions: SubstitutionTable,
    coverage: TableCoverage,
}

impl ModulusChecker {
    /// Checker over a complete weight table
    pub fn new(weights: WeightTable, substitutions: SubstitutionTable) -> Self {
        Self {
            weights,
            substitutions,
            coverage: TableCoverage::Complete,
        }
    }

    pub fn with_coverage(mut self, coverage: TableCoverage) -> Self {
        self.coverage = coverage;
        self
    }

    /// Checker over the embedded seed table
    ///
    /// The seed only covers a handful of sort codes, so every other sort
    /// code is rejected.
    pub fn seeded() -> Result<Self, ModulusError> {
        Ok(Self::new(
            WeightTable::parse(SEED_WEIGHT_TABLE)?,
            SubstitutionTable::default(),
        )
        .with_coverage(TableCoverage::Partial))
    }

    /// Load tables from disk, falling back to the seed weight table
    pub fn load(
        weights_path: Option<&Path>,
        substitutions_path: Option<&Path>,
    ) -> Result<Self, ModulusError> {
        let substitutions = match substitutions_path {
            Some(path) => SubstitutionTable::parse(&read_table(path)?)?,
            None => SubstitutionTable::default(),
        };

        let checker = match weights_path {
            Some(path) => Self::new(WeightTable::parse(&read_table(path)?)?, substitutions),
            None => {
                tracing::warn!(
                    "MODULUS_WEIGHTS_PATH not set; using the seed weight table, \
                     sort codes outside it are rejected"
                );
                Self::seeded()?.with_substitutions(substitutions)
            }
        };

        tracing::info!(
            rows = checker.weights.len(),
            coverage = ?checker.coverage,
            "Modulus weight table loaded"
        );

        Ok(checker)
    }

    fn with_substitutions(mut self, substitutions: SubstitutionTable) -> Self {
        self.substitutions = substitutions;
        self
    }

    pub fn coverage(&self) -> TableCoverage {
        self.coverage
    }

    /// Validate a sort code / account number pair
    pub fn validate(&self, sort_code: &str, account_number: &str) -> bool {
        let Some(account) = AccountDigits::normalize(sort_code, account_number) else {
            return false;
        };

        let rows = self.weights.lookup(account.sort_code());
        match rows.as_slice() {
            [] => self.coverage == TableCoverage::Complete,
            [row] => self.check_single(row, &account),
            [first, second, ..] => self.check_pair(first, second, &account),
        }
    }

    fn check_single(&self, row: &WeightRow, account: &AccountDigits) -> bool {
        match row.exception {
            Some(6) if account.is_foreign_currency() => true,
            Some(5) => self.exception_5_first(row, account),
            Some(14) => {
                if passes(row, account) {
                    return true;
                }
                matches!(account.digit(H), 0 | 1 | 9) && passes(row, &account.shifted_right())
            }
            _ => passes(row, account),
        }
    }

    fn check_pair(&self, first: &WeightRow, second: &WeightRow, account: &AccountDigits) -> bool {
        let foreign_currency_row = first.exception == Some(6) || second.exception == Some(6);
        if foreign_currency_row && account.is_foreign_currency() {
            return true;
        }

        match (first.exception, second.exception) {
            (Some(5), Some(5)) => {
                self.exception_5_first(first, account) && exception_5_second(second, account)
            }
            (Some(2), Some(9)) => {
                passes(first, account)
                    || passes(second, &account.with_sort_code(EXCEPTION_9_SORT_CODE))
            }
            (Some(10), Some(11))
            | (Some(11), Some(10))
            | (Some(12), Some(13))
            | (Some(13), Some(12)) => passes(first, account) || passes(second, account),
            _ => {
                if !passes(first, account) {
                    return false;
                }
                if second.exception == Some(3) && matches!(account.digit(C), 6 | 9) {
                    return true;
                }
                passes(second, account)
            }
        }
    }

    /// First check under exception 5: the check digit is g
    fn exception_5_first(&self, row: &WeightRow, account: &AccountDigits) -> bool {
        let account = match self.substitutions.substitute(account.sort_code()) {
            Some(substitute) => account.with_sort_code(substitute),
            None => *account,
        };

        let g = account.digit(G);
        match weighted_total(row.method, &row.weights, &account).rem_euclid(11) {
            0 => g == 0,
            1 => false,
            remainder => 11 - remainder == g,
        }
    }
}

impl BankAccountValidator for ModulusChecker {
    fn is_valid(&self, sort_code: &str, account_number: &str) -> bool {
        self.validate(sort_code, account_number)
    }
}

/// Second check under exception 5: the check digit is h
fn exception_5_second(row: &WeightRow, account: &AccountDigits) -> bool {
    let h = account.digit(H);
    match weighted_total(row.method, &row.weights, account).rem_euclid(10) {
        0 => h == 0,
        remainder => 10 - remainder == h,
    }
}

/// Run one row's check, applying the row-level exceptions
fn passes(row: &WeightRow, account: &AccountDigits) -> bool {
    let account = if row.exception == Some(8) {
        account.with_sort_code(EXCEPTION_8_SORT_CODE)
    } else {
        *account
    };

    let weights = effective_weights(row, &account);
    let total = weighted_total(row.method, &weights, &account);

    match row.method {
        ModulusMethod::Mod10 => total.rem_euclid(10) == 0,
        ModulusMethod::Mod11 if row.exception == Some(4) => {
            total.rem_euclid(11) == account.digit(G) * 10 + account.digit(H)
        }
        ModulusMethod::Mod11 => total.rem_euclid(11) == 0,
        ModulusMethod::DoubleAlternate if row.exception == Some(1) => {
            (total + 27).rem_euclid(10) == 0
        }
        ModulusMethod::DoubleAlternate => total.rem_euclid(10) == 0,
    }
}

fn effective_weights(row: &WeightRow, account: &AccountDigits) -> [i32; WEIGHT_COUNT] {
    let a = account.digit(A);
    let b = account.digit(B);
    let g = account.digit(G);

    match row.exception {
        Some(2) if a != 0 && g != 9 => EXCEPTION_2_WEIGHTS,
        Some(2) if a != 0 => EXCEPTION_2_G9_WEIGHTS,
        Some(7) if g == 9 => zero_through_b(row.weights),
        Some(10) if g == 9 && b == 9 && (a == 0 || a == 9) => zero_through_b(row.weights),
        _ => row.weights,
    }
}

/// Zeroise weight positions u through b
fn zero_through_b(mut weights: [i32; WEIGHT_COUNT]) -> [i32; WEIGHT_COUNT] {
    weights[..=B].iter_mut().for_each(|weight| *weight = 0);
    weights
}

fn weighted_total(
    method: ModulusMethod,
    weights: &[i32; WEIGHT_COUNT],
    account: &AccountDigits,
) -> i32 {
    account
        .digits
        .iter()
        .zip(weights.iter())
        .map(|(digit, weight)| {
            let product = digit * weight;
            if method == ModulusMethod::DoubleAlternate {
                sum_of_digits(product)
            } else {
                product
            }
        })
        .sum()
}

fn sum_of_digits(mut value: i32) -> i32 {
    let mut sum = 0;
    value = value.abs();
    while value > 0 {
        sum += value % 10;
        value /= 10;
    }
    sum
}

fn strip_separators(value: &str) -> String {
    value.chars().filter(|c| *c != '-' && !c.is_whitespace()).collect()
}

fn all_digits(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

fn read_table(path: &Path) -> Result<String, ModulusError> {
    std::fs::read_to_string(path).map_err(|source| ModulusError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(table: &str) -> ModulusChecker {
        ModulusChecker::new(WeightTable::parse(table).unwrap(), SubstitutionTable::default())
    }

    #[test]
    fn test_seed_table_examples() {
        let checker = ModulusChecker::seeded().unwrap();

        // Standard modulus 10
        assert!(checker.validate("089999", "66374958"));
        assert!(!checker.validate("089999", "66374959"));

        // Standard modulus 11
        assert!(checker.validate("107999", "88837491"));
        assert!(!checker.validate("107999", "88837493"));
        assert!(checker.validate("100000", "31510604"));

        // Double alternate with exception 1
        assert!(checker.validate("118765", "64371389"));
        assert!(!checker.validate("118765", "64371388"));
        assert!(!checker.validate("111111", "11111111"));
    }

    #[test]
    fn test_unknown_sort_code_with_complete_table_is_accepted() {
        let checker = checker("100000 101099 MOD11 0 0 0 0 0 0 8 7 6 5 4 3 2 1\n");
        assert!(checker.validate("200052", "75849855"));
    }

    #[test]
    fn test_seed_table_rejects_sort_codes_it_does_not_cover() {
        let checker = ModulusChecker::load(None, None).unwrap();
        assert_eq!(checker.coverage(), TableCoverage::Partial);

        // Published test case 202959/63748472 with the last digit changed
        assert!(!checker.validate("202959", "63748473"));
        assert!(!checker.validate("400000", "12345678"));
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        let checker = ModulusChecker::seeded().unwrap();

        assert!(!checker.validate("10000", "31510604"));
        assert!(!checker.validate("100000", "3151060A"));
        assert!(!checker.validate("100000", "12345"));
        assert!(!checker.validate("100000", "12345678901"));
        assert!(!checker.validate("", ""));
    }

    #[test]
    fn test_separators_are_ignored() {
        let checker = ModulusChecker::seeded().unwrap();
        assert!(checker.validate("10-00-00", "3151 0604"));
    }

    #[test]
    fn test_normalize_account_lengths() {
        let six = AccountDigits::normalize("100000", "123456").unwrap();
        assert_eq!(six, AccountDigits::normalize("100000", "00123456").unwrap());

        let seven = AccountDigits::normalize("100000", "1234567").unwrap();
        assert_eq!(seven, AccountDigits::normalize("100000", "01234567").unwrap());

        let nine = AccountDigits::normalize("123456", "712345678").unwrap();
        assert_eq!(nine.sort_code(), 123457);
        assert_eq!(nine, AccountDigits::normalize("123457", "12345678").unwrap());

        let ten = AccountDigits::normalize("100000", "9912345678").unwrap();
        assert_eq!(ten, AccountDigits::normalize("100000", "12345678").unwrap());
    }

    #[test]
    fn test_two_rows_must_both_pass() {
        let checker = checker(
            "600000 600000 MOD11 0 0 0 0 0 0 0 0 0 0 0 0 0 1\n\
             600000 600000 DBLAL 0 0 0 0 0 0 0 0 1 0 0 0 0 0\n",
        );

        assert!(checker.validate("600000", "00000000"));
        assert!(!checker.validate("600000", "00500000"));
    }

    #[test]
    fn test_exception_3_skips_second_check() {
        let checker = checker(
            "600000 600000 MOD11 0 0 0 0 0 0 0 0 0 0 0 0 0 1\n\
             600000 600000 DBLAL 0 0 0 0 0 0 0 0 1 0 0 0 0 0 3\n",
        );

        assert!(checker.validate("600000", "00600000"));
        assert!(checker.validate("600000", "00900000"));
        assert!(!checker.validate("600000", "00500000"));
    }

    #[test]
    fn test_exception_4_remainder_matches_gh() {
        let checker = checker("134000 134099 MOD11 0 0 0 0 0 0 7 6 5 4 3 2 0 0 4\n");

        assert!(checker.validate("134020", "12345600"));
        assert!(!checker.validate("134020", "12345601"));
    }

    #[test]
    fn test_exception_5_check_digits() {
        let checker = checker(
            "938000 938000 MOD11 0 0 0 0 0 0 7 6 5 4 3 2 0 0 5\n\
             938000 938000 DBLAL 0 0 0 0 0 0 2 1 2 1 2 1 2 0 5\n",
        );

        assert!(checker.validate("938000", "12345609"));
        assert!(!checker.validate("938000", "12345608"));
        assert!(!checker.validate("938000", "12345619"));
    }

    #[test]
    fn test_exception_6_foreign_currency() {
        let checker = checker("200000 200000 MOD11 0 0 0 0 0 0 8 7 6 5 4 3 2 1 6\n");

        assert!(checker.validate("200000", "41234566"));
        assert!(!checker.validate("200000", "31234566"));
    }

    #[test]
    fn test_exception_7_zeroises_when_g_is_9() {
        let checker = checker("700000 700099 MOD11 1 1 1 1 1 1 1 1 0 0 0 0 0 1 7\n");

        assert!(checker.validate("700000", "30000090"));
        assert!(checker.validate("700000", "10000083"));
        assert!(!checker.validate("700000", "30000080"));
    }

    #[test]
    fn test_exception_8_substitutes_sort_code() {
        let checker = checker("090128 090128 MOD11 0 0 0 0 0 1 0 0 0 0 0 0 0 1 8\n");

        assert!(checker.validate("090128", "00000005"));
        assert!(!checker.validate("090128", "00000003"));
    }

    #[test]
    fn test_exception_2_and_9() {
        let checker = checker(
            "300000 300000 MOD11 0 0 0 0 0 0 8 7 6 5 4 3 2 1 2\n\
             300000 300000 MOD11 0 0 1 0 0 0 0 0 0 0 0 0 0 1 9\n",
        );

        // Exception 2 replaces the weights when a != 0
        assert!(checker.validate("300000", "10000005"));
        // Second check runs against sort code 309634
        assert!(checker.validate("300000", "00000002"));
        assert!(!checker.validate("300000", "00000003"));
    }

    #[test]
    fn test_paired_exceptions_accept_either_check() {
        for (first, second) in [(10, 11), (12, 13)] {
            let checker = checker(&format!(
                "500000 500000 MOD11 0 0 0 0 0 0 8 7 6 5 4 3 2 1 {}\n\
                 500000 500000 MOD11 0 0 0 0 0 0 0 0 0 0 0 0 0 1 {}\n",
                first, second
            ));

            assert!(checker.validate("500000", "31510604"));
            assert!(checker.validate("500000", "31510600"));
            assert!(!checker.validate("500000", "31510605"));
        }

        let without_exceptions = checker(
            "500000 500000 MOD11 0 0 0 0 0 0 8 7 6 5 4 3 2 1\n\
             500000 500000 MOD11 0 0 0 0 0 0 0 0 0 0 0 0 0 1\n",
        );
        assert!(!without_exceptions.validate("500000", "31510600"));
    }

    #[test]
    fn test_exception_14_shifts_account_number() {
        let checker = checker("180000 180099 MOD11 0 0 0 0 0 0 8 7 6 5 4 3 2 1 14\n");

        assert!(checker.validate("180002", "00000190"));
        assert!(checker.validate("180002", "00000191"));
        assert!(!checker.validate("180002", "00000195"));
    }

    #[test]
    fn test_load_without_paths_uses_seed() {
        let checker = ModulusChecker::load(None, None).unwrap();
        assert!(checker.validate("100000", "31510604"));
    }

    #[test]
    fn test_load_from_file_is_complete() {
        let path = std::env::temp_dir().join(format!("valacdos-{}.txt", std::process::id()));
        std::fs::write(&path, SEED_WEIGHT_TABLE).unwrap();

        let checker = ModulusChecker::load(Some(&path), None).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(checker.coverage(), TableCoverage::Complete);
        assert!(checker.validate("107999", "88837491"));
        assert!(!checker.validate("107999", "88837490"));
        assert!(checker.validate("400000", "12345678"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ModulusChecker::load(Some(Path::new("/nonexistent/valacdos.txt")), None);
        assert!(matches!(result, Err(ModulusError::Io { .. })));
    }
}
