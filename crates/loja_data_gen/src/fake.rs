//! Locale-aware fake data.
//!
//! Wraps the `fake` crate behind a small provider that also owns the random
//! number generator used for every uniform draw, so one seed reproduces a
//! whole run.

use chrono::{Duration, NaiveDate};
use fake::faker::address::raw::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::internet::raw::SafeEmail;
use fake::faker::lorem::raw::Sentence;
use fake::faker::name::raw::Name;
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::{EN, PT_BR};
use fake::Fake;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Locales the provider can produce text for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// Brazilian Portuguese (CPF tax ids)
    #[default]
    PtBr,
    /// English (SSN-shaped tax ids)
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pt_br" | "pt" => Ok(Locale::PtBr),
            "en" | "en_us" => Ok(Locale::En),
            _ => Err(format!("Unsupported locale: {}. Use pt_BR or en", s)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::PtBr => write!(f, "pt_BR"),
            Locale::En => write!(f, "en"),
        }
    }
}

macro_rules! localized {
    ($self:ident, $faker:ident $(, $arg:expr)*) => {
        match $self.locale {
            Locale::PtBr => $faker(PT_BR $(, $arg)*).fake_with_rng(&mut $self.rng),
            Locale::En => $faker(EN $(, $arg)*).fake_with_rng(&mut $self.rng),
        }
    };
}

/// Fake data generator over a caller-supplied RNG
pub struct FakeData<R: Rng> {
    rng: R,
    locale: Locale,
}

impl<R: Rng> FakeData<R> {
    pub fn new(rng: R, locale: Locale) -> Self {
        Self { rng, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Direct access to the RNG, for draws that live outside this provider
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Generate a full name
    pub fn name(&mut self) -> String {
        localized!(self, Name)
    }

    /// Generate a single-line street address
    pub fn address(&mut self) -> String {
        let street: String = localized!(self, StreetName);
        let number: String = localized!(self, BuildingNumber);
        let city: String = localized!(self, CityName);
        let state: String = localized!(self, StateAbbr);
        let zip: String = localized!(self, ZipCode);
        match self.locale {
            Locale::PtBr => format!("{}, {} - {}/{}, CEP {}", street, number, city, state, zip),
            Locale::En => format!("{} {}, {}, {} {}", number, street, city, state, zip),
        }
    }

    pub fn phone(&mut self) -> String {
        localized!(self, PhoneNumber)
    }

    pub fn email(&mut self) -> String {
        localized!(self, SafeEmail)
    }

    /// Generate a national tax id: a CPF with valid check digits for pt_BR,
    /// an SSN-shaped number for en
    pub fn tax_id(&mut self) -> String {
        match self.locale {
            Locale::PtBr => self.cpf(),
            Locale::En => format!(
                "{:03}-{:02}-{:04}",
                self.rng.random_range(100..900),
                self.rng.random_range(10..100),
                self.rng.random_range(1000..10000)
            ),
        }
    }

    fn cpf(&mut self) -> String {
        let mut digits = [0u32; 11];
        loop {
            for d in digits.iter_mut().take(9) {
                *d = self.rng.random_range(0..10);
            }
            // Repeated-digit CPFs pass the checksum but are rejected by the registry
            if digits[..9].iter().any(|&d| d != digits[0]) {
                break;
            }
        }
        digits[9] = cpf_check_digit(&digits[..9]);
        digits[10] = cpf_check_digit(&digits[..10]);

        let s: String = digits
            .iter()
            .filter_map(|&d| char::from_digit(d, 10))
            .collect();
        format!("{}.{}.{}-{}", &s[0..3], &s[3..6], &s[6..9], &s[9..11])
    }

    /// Generate a sentence with exactly `word_count` words
    pub fn sentence(&mut self, word_count: usize) -> String {
        let range = word_count..word_count + 1;
        localized!(self, Sentence, range)
    }

    /// Pick a date uniformly in `[start, end]` (bounds in either order)
    pub fn date_between(&mut self, start: NaiveDate, end: NaiveDate) -> NaiveDate {
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        let span = (end - start).num_days();
        start + Duration::days(self.rng.random_range(0..=span))
    }

    /// Generate a price rounded to cents
    pub fn price(&mut self, min: f64, max: f64) -> f64 {
        let value = self.rng.random_range(min..=max);
        ((value * 100.0).round() / 100.0).clamp(min, max)
    }

    pub fn float_range(&mut self, min: f64, max: f64) -> f64 {
        self.rng.random_range(min..=max)
    }

    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    /// Pick a random element from a slice, `None` when it is empty
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Pick a random element from a fixed, non-empty set
    pub fn pick<T: Copy, const N: usize>(&mut self, items: [T; N]) -> T {
        *items
            .choose(&mut self.rng)
            .expect("pick needs a non-empty set")
    }
}

/// Modulo-11 check digit over the weights `len + 1, len, ..., 2`
pub fn cpf_check_digit(digits: &[u32]) -> u32 {
    let weight_start = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();
    match sum % 11 {
        0 | 1 => 0,
        r => 11 - r,
    }
}

/// Check a formatted or bare CPF against its two check digits
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || digits.iter().all(|&d| d == digits[0]) {
        return false;
    }
    digits[9] == cpf_check_digit(&digits[..9]) && digits[10] == cpf_check_digit(&digits[..10])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fake(locale: Locale) -> FakeData<StdRng> {
        FakeData::new(StdRng::seed_from_u64(42), locale)
    }

    #[test]
    fn test_deterministic_generation() {
        let mut fake1 = fake(Locale::PtBr);
        let mut fake2 = fake(Locale::PtBr);

        assert_eq!(fake1.name(), fake2.name());
        assert_eq!(fake1.tax_id(), fake2.tax_id());
        assert_eq!(fake1.price(10.0, 500.0), fake2.price(10.0, 500.0));
    }

    #[test]
    fn test_cpf_is_valid() {
        let mut fake = fake(Locale::PtBr);
        for _ in 0..200 {
            let cpf = fake.tax_id();
            assert_eq!(cpf.len(), 14, "{}", cpf);
            assert!(is_valid_cpf(&cpf), "{}", cpf);
        }
    }

    #[test]
    fn test_known_cpf() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(!is_valid_cpf("529.982.247-26"));
        assert!(!is_valid_cpf("111.111.111-11"));
    }

    #[test]
    fn test_en_tax_id_shape() {
        let id = fake(Locale::En).tax_id();
        assert_eq!(id.len(), 11);
        assert_eq!(id.matches('-').count(), 2);
    }

    #[test]
    fn test_email_and_address() {
        let mut fake = fake(Locale::PtBr);
        assert!(fake.email().contains('@'));
        assert!(fake.address().contains("CEP"));
        assert!(!fake.phone().is_empty());
    }

    #[test]
    fn test_sentence_word_count() {
        let mut fake = fake(Locale::PtBr);
        let sentence = fake.sentence(4);
        assert_eq!(sentence.split_whitespace().count(), 4, "{}", sentence);
    }

    #[test]
    fn test_date_between_bounds() {
        let mut fake = fake(Locale::PtBr);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        for _ in 0..500 {
            let d = fake.date_between(start, end);
            assert!(d >= start && d <= end);
        }
        assert_eq!(fake.date_between(end, end), end);
        let swapped = fake.date_between(end, start);
        assert!(swapped >= start && swapped <= end);
    }

    #[test]
    fn test_price_precision() {
        let mut fake = fake(Locale::PtBr);
        for _ in 0..500 {
            let price = fake.price(10.0, 500.0);
            assert_eq!(price, (price * 100.0).round() / 100.0);
            assert!((10.0..=500.0).contains(&price));
        }
    }

    #[test]
    fn test_choose_and_pick_reach_every_item() {
        let mut fake = fake(Locale::PtBr);
        let items = ["a", "b", "c"];
        let mut chosen = std::collections::HashSet::new();
        let mut picked = std::collections::HashSet::new();
        for _ in 0..300 {
            chosen.insert(*fake.choose(&items).unwrap());
            picked.insert(fake.pick(items));
        }
        assert_eq!(chosen.len(), 3);
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn test_choose_empty() {
        let mut fake = fake(Locale::En);
        let empty: [u8; 0] = [];
        assert!(fake.choose(&empty).is_none());
        assert_eq!(fake.choose(&[7]), Some(&7));
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("pt_BR".parse::<Locale>(), Ok(Locale::PtBr));
        assert_eq!("pt-br".parse::<Locale>(), Ok(Locale::PtBr));
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert!("fr_FR".parse::<Locale>().is_err());
    }
}
