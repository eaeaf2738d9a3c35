// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation for every principal kind.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password does not mix enough character classes.
    #[error(
        "Password must contain at least {required} of: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password repeats an identifying field of the principal.
    #[error("Password must not match the {field}")]
    MatchesForbiddenField { field: &'static str },

    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// The identifying fields a password may not repeat.
#[derive(Debug, Clone, Copy)]
pub struct PasswordSubject<'a> {
    pub login_name: &'a str,
    pub display_name: &'a str,
    pub phone: Option<&'a str>,
}

/// Password policy configuration.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    /// Minimum password length in characters.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 10,
            min_complexity: 3,
        }
    }
}

impl PasswordPolicy {
    /// Validates a new password.
    ///
    /// # Errors
    ///
    /// Returns the first rule the password breaks.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        subject: &PasswordSubject<'_>,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let complexity: usize = character_classes(password);
        if complexity < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found: complexity,
            });
        }

        let forbidden: [(&'static str, Option<&str>); 3] = [
            ("login name", Some(subject.login_name)),
            ("display name", Some(subject.display_name)),
            ("phone number", subject.phone),
        ];
        for (field, value) in forbidden {
            if value.is_some_and(|v| v.trim().eq_ignore_ascii_case(password.trim())) {
                return Err(PasswordPolicyError::MatchesForbiddenField { field });
            }
        }

        Ok(())
    }
}

/// Counts the character classes present: upper, lower, digit, symbol.
fn character_classes(password: &str) -> usize {
    let checks: [fn(&char) -> bool; 4] = [
        char::is_ascii_uppercase,
        char::is_ascii_lowercase,
        char::is_ascii_digit,
        |c: &char| !c.is_alphanumeric() && !c.is_whitespace(),
    ];
    checks
        .iter()
        .filter(|check| password.chars().any(|c| check(&c)))
        .count()
}
