//! Numeric verification codes

use std::fmt;

use rand::{distributions::Uniform, Rng};

/// Number of digits in a code unless configured otherwise
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// A code made only of decimal digits
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Generates `length` independent, uniformly chosen digits.
    ///
    /// Draws from the thread-local RNG, which is reseeded from the OS.
    pub fn generate(length: usize) -> Self {
        let digits = Uniform::new_inclusive(b'0', b'9');

        let code = rand::thread_rng()
            .sample_iter(digits)
            .take(length)
            .map(char::from)
            .collect();

        Self(code)
    }

    /// Wraps a known code
    #[cfg(test)]
    pub fn new_unchecked(code: &str) -> Self {
        Self(code.to_string())
    }

    /// The code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Codes stay out of debug output
impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerificationCode(******)")
    }
}

impl From<VerificationCode> for String {
    fn from(code: VerificationCode) -> Self {
        code.0
    }
}
