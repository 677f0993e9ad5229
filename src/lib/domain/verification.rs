//! Verification codes: generation and short-lived storage

mod code;
mod errors;
mod memory;
mod store;

pub use code::{VerificationCode, DEFAULT_CODE_LENGTH};
pub use errors::StoreError;
pub use memory::{Clock, InMemoryVerificationStore, SystemClock};
pub use store::{VerificationRecord, VerificationStore, DEFAULT_CODE_TTL_MINUTES};

#[cfg(test)]
pub mod tests {
    pub use super::memory::tests::ManualClock;
    pub use super::store::MockVerificationStore;
}
