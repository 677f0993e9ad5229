//! Verification store contract

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::EmailAddress;

use super::{StoreError, VerificationCode};

/// Minutes a code stays valid unless configured otherwise
pub const DEFAULT_CODE_TTL_MINUTES: i64 = 15;

/// A stored code and the instant it stops being valid
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRecord {
    /// The issued code
    pub code: VerificationCode,

    /// Expiry; the record is dead from this instant on
    pub expires_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Whether the record is expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Storage for at most one live verification code per recipient
#[async_trait]
pub trait VerificationStore: Send + Sync + 'static {
    /// Stores `code` for `email`, replacing any existing record.
    ///
    /// # Returns
    /// The expiry of the new record.
    async fn put(
        &self,
        email: &EmailAddress,
        code: &VerificationCode,
        ttl: Duration,
    ) -> Result<DateTime<Utc>, StoreError>;

    /// Checks `code` against the live record for `email`.
    ///
    /// Expired records are removed and reported as `false`. A match does not
    /// consume the record.
    async fn check(&self, email: &EmailAddress, code: &str) -> Result<bool, StoreError>;

    /// Removes the record for `email`. Removing a missing record is not an error.
    async fn clear(&self, email: &EmailAddress) -> Result<(), StoreError>;
}

#[cfg(test)]
mock! {
    pub VerificationStore {}

    #[async_trait]
    impl VerificationStore for VerificationStore {
        async fn put(&self, email: &EmailAddress, code: &VerificationCode, ttl: Duration) -> Result<DateTime<Utc>, StoreError>;
        async fn check(&self, email: &EmailAddress, code: &str) -> Result<bool, StoreError>;
        async fn clear(&self, email: &EmailAddress) -> Result<(), StoreError>;
    }
}
