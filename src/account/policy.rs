//! Password strength policy.
//!
//! A password is acceptable when it is at least eight characters long and
//! contains a decimal digit, a punctuation or symbol character, and an
//! uppercase character. There is no maximum length and no dictionary check.

use std::fmt;

const MIN_LENGTH: usize = 8;
const MIN_DIGITS: usize = 1;
const MIN_SYMBOLS: usize = 1;
const MIN_UPPERCASE: usize = 1;

/// Why a password was rejected, or [`PolicyReason::Ok`] when it was not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyReason {
    Ok,
    TooShort,
    MissingDigit,
    MissingSymbol,
    MissingUppercase,
}

impl fmt::Display for PolicyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Ok => "password accepted",
            Self::TooShort => "shorter than 8 characters",
            Self::MissingDigit => "no digit",
            Self::MissingSymbol => "no punctuation or symbol",
            Self::MissingUppercase => "no uppercase character",
        };
        write!(f, "{reason}")
    }
}

/// Outcome of a single policy evaluation. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyVerdict {
    pub accepted: bool,
    pub reason: PolicyReason,
}

impl PolicyVerdict {
    const fn accept() -> Self {
        Self {
            accepted: true,
            reason: PolicyReason::Ok,
        }
    }

    const fn reject(reason: PolicyReason) -> Self {
        Self {
            accepted: false,
            reason,
        }
    }
}

/// Check a candidate password against the strength policy.
///
/// Length is counted in Unicode code points, not bytes. Each character is
/// attributed to at most one class: digit, then punctuation/symbol, then
/// uppercase.
#[must_use]
pub fn evaluate(password: &str) -> PolicyVerdict {
    if password.chars().count() < MIN_LENGTH {
        return PolicyVerdict::reject(PolicyReason::TooShort);
    }

    let mut digits = 0;
    let mut symbols = 0;
    let mut uppercase = 0;

    for ch in password.chars() {
        if ch.is_numeric() {
            digits += 1;
        } else if is_symbol_or_punctuation(ch) {
            symbols += 1;
        } else if ch.is_uppercase() {
            uppercase += 1;
        }
    }

    if digits < MIN_DIGITS {
        return PolicyVerdict::reject(PolicyReason::MissingDigit);
    }

    if symbols < MIN_SYMBOLS {
        return PolicyVerdict::reject(PolicyReason::MissingSymbol);
    }

    if uppercase < MIN_UPPERCASE {
        return PolicyVerdict::reject(PolicyReason::MissingUppercase);
    }

    PolicyVerdict::accept()
}

// Anything printable that is neither alphanumeric nor whitespace counts as
// punctuation or symbol, which also covers non-ASCII symbols such as `€`.
fn is_symbol_or_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation()
        || (!ch.is_alphanumeric() && !ch.is_whitespace() && !ch.is_control())
}
