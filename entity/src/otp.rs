use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of digits in every ride passcode.
pub const OTP_LENGTH: usize = 6;

/// One-time passcode a rider shares with their captain to start a ride.
///
/// `Debug` never prints the digits so the code cannot end up in logs by way
/// of a `{:?}` on a ride.
#[derive(Clone, Eq, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Otp(String);

impl Otp {
    /// Wraps an already generated code. Generation lives in the domain layer.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares a submitted code against this one without short-circuiting on
    /// the first differing digit. Any length mismatch is a mismatch.
    pub fn matches(&self, submitted: &str) -> bool {
        let expected = self.0.as_bytes();
        let submitted = submitted.as_bytes();
        if expected.len() != submitted.len() {
            return false;
        }
        expected
            .iter()
            .zip(submitted)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for Otp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Otp(******)")
    }
}
