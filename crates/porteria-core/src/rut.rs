//! Chilean national id (RUT) normalization and check-digit validation.
//!
//! A RUT is a numeric body plus one trailing verifier character, validated
//! with weighted modulo-11 arithmetic. Input arrives from free-form text
//! fields, so normalization strips punctuation before anything else.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A normalized, checksum-verified national id.
///
/// The inner string is the normalized form: digits followed by one digit or
/// `K`, with no dots or dash. Construction goes through [`Rut::parse`], so a
/// held value is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rut(String);

impl Rut {
  /// Strip everything but digits and `K`/`k`, uppercase, and collapse the
  /// trailing-`11` encoding artifact (a dangling verifier digit that some
  /// sources emit in place of `K`) into `K`.
  pub fn normalize(raw: &str) -> String {
    let mut cleaned: String = raw
      .chars()
      .filter(|c| c.is_ascii_digit() || *c == 'k' || *c == 'K')
      .collect::<String>()
      .to_ascii_uppercase();

    if cleaned.ends_with("11") {
      cleaned.truncate(cleaned.len() - 2);
      cleaned.push('K');
    }
    cleaned
  }

  /// Normalize and validate `raw`.
  ///
  /// Empty input is [`Error::InvalidArgument`]; a malformed or
  /// checksum-failing id is [`Error::InvalidNationalId`].
  pub fn parse(raw: &str) -> Result<Self> {
    if raw.trim().is_empty() {
      return Err(Error::InvalidArgument("national id must not be empty"));
    }

    let cleaned = Self::normalize(raw);
    if Self::check(&cleaned) {
      Ok(Self(cleaned))
    } else {
      Err(Error::InvalidNationalId(raw.to_string()))
    }
  }

  /// `true` if `raw` normalizes to a well-formed id with a correct verifier.
  pub fn is_valid(raw: &str) -> bool { Self::check(&Self::normalize(raw)) }

  /// Reconstruct from an already-normalized string (e.g. a storage column).
  ///
  /// Skips normalization on purpose: a valid id whose body ends in `1` and
  /// whose verifier is `1` would otherwise trip the trailing-`11` rule.
  pub fn from_normalized(s: &str) -> Result<Self> {
    if Self::check(s) {
      Ok(Self(s.to_string()))
    } else {
      Err(Error::InvalidNationalId(s.to_string()))
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }

  /// The numeric body, without the verifier character.
  pub fn body(&self) -> &str { &self.0[..self.0.len() - 1] }

  /// The verifier character.
  pub fn verifier(&self) -> char {
    // Invariant: the inner string is never empty.
    self.0.chars().next_back().unwrap_or('0')
  }

  /// Validate an already-normalized string: `digits+` then exactly one digit
  /// or `K`, body length >= 7, and a matching modulo-11 check digit.
  fn check(cleaned: &str) -> bool {
    let mut chars = cleaned.chars();
    let Some(verifier) = chars.next_back() else {
      return false;
    };
    if !(verifier.is_ascii_digit() || verifier == 'K') {
      return false;
    }

    let body = chars.as_str();
    if body.len() < 7 || !body.chars().all(|c| c.is_ascii_digit()) {
      return false;
    }

    Self::expected_verifier(body) == verifier
  }

  /// Weighted modulo-11 check digit: weights 2,3,4,5,6,7 cycling from the
  /// least significant body digit; `11 - (sum % 11)`, with 11 -> '0' and
  /// 10 -> 'K'.
  fn expected_verifier(body: &str) -> char {
    let mut sum = 0u32;
    let mut weight = 2u32;

    for c in body.chars().rev() {
      sum += c.to_digit(10).unwrap_or(0) * weight;
      weight += 1;
      if weight > 7 {
        weight = 2;
      }
    }

    match 11 - (sum % 11) {
      11 => '0',
      10 => 'K',
      d => char::from_digit(d, 10).unwrap_or('0'),
    }
  }
}

impl fmt::Display for Rut {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.body(), self.verifier())
  }
}
