use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use thiserror::Error;

use crate::domain::phone_number::PhoneNumber;
use crate::domain::user::UserId;

#[derive(Debug, Error, PartialEq)]
pub enum VerificationCodeError {
    #[error("Verification code must be {0} digits")]
    WrongLength(usize),
    #[error("Verification code must be numeric")]
    NotNumeric,
}

/// One-time numeric code sent over SMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Generate a random code of `length` digits. Leading zeros are allowed.
    pub fn generate(length: usize) -> Self {
        let mut rng = rand::rng();
        let digits = (0..length)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();
        Self(digits)
    }

    pub fn parse(value: impl Into<String>, length: usize) -> Result<Self, VerificationCodeError> {
        let value = value.into();
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(VerificationCodeError::NotNumeric);
        }
        if value.len() != length {
            return Err(VerificationCodeError::WrongLength(length));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Outcome of submitting a code against a pending verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeConfirmation {
    /// Code matched; the record must be discarded.
    Verified,
    /// Past `expires_at`; the record must be discarded.
    Expired,
    /// Attempt budget spent before this submission. The record is kept so
    /// later submissions keep reporting exhaustion instead of vanishing
    /// into "not found".
    Exhausted,
    /// Wrong code; one attempt deducted.
    Mismatch { attempts_remaining: u32 },
}

/// A phone verification in flight: one code, one expiry, a bounded
/// attempt budget. Owned by the verification code store; never part
/// of the user record until confirmed.
#[derive(Debug, Clone)]
pub struct PendingVerification {
    user_id: UserId,
    phone_number: PhoneNumber,
    code: VerificationCode,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    attempts_remaining: u32,
}

impl PendingVerification {
    pub fn new(
        user_id: UserId,
        phone_number: PhoneNumber,
        code: VerificationCode,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        max_attempts: u32,
    ) -> Self {
        Self {
            user_id,
            phone_number,
            code,
            issued_at,
            expires_at: issued_at + ttl,
            attempts_remaining: max_attempts,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    /// Run one step of the verification state machine.
    ///
    /// Expiry is checked before the attempt budget, and the budget before
    /// the code itself, so a correct code can no longer succeed once the
    /// window has closed or the attempts are spent.
    pub fn confirm(&mut self, submitted: &VerificationCode, now: DateTime<Utc>) -> CodeConfirmation {
        if now >= self.expires_at {
            return CodeConfirmation::Expired;
        }
        if self.attempts_remaining == 0 {
            return CodeConfirmation::Exhausted;
        }
        if submitted != &self.code {
            self.attempts_remaining -= 1;
            return CodeConfirmation::Mismatch {
                attempts_remaining: self.attempts_remaining,
            };
        }
        CodeConfirmation::Verified
    }
}
