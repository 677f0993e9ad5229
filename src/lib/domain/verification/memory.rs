//! In-memory verification store

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use tracing::debug;

use crate::domain::communication::EmailAddress;

use super::{StoreError, VerificationCode, VerificationRecord, VerificationStore};

/// Source of the current time
pub trait Clock: Send + Sync + 'static {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Process-local [`VerificationStore`].
///
/// One lock guards the whole map, so a code and its expiry are always written and
/// read together. Records live only as long as the process and are not shared
/// between instances.
pub struct InMemoryVerificationStore {
    records: Mutex<HashMap<EmailAddress, VerificationRecord>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryVerificationStore {
    /// Creates an empty store on the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store on the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Returns the stored record for `email` as is, without expiring it
    #[cfg(test)]
    pub(crate) fn peek(&self, email: &EmailAddress) -> Result<Option<VerificationRecord>, StoreError> {
        Ok(self.records()?.get(email).cloned())
    }

    fn records(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<EmailAddress, VerificationRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("verification store lock poisoned".to_string()))
    }
}

impl Default for InMemoryVerificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemoryVerificationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.records.lock().map(|r| r.len()).ok();

        f.debug_struct("InMemoryVerificationStore")
            .field("records", &len)
            .finish()
    }
}

#[async_trait]
impl VerificationStore for InMemoryVerificationStore {
    async fn put(
        &self,
        email: &EmailAddress,
        code: &VerificationCode,
        ttl: Duration,
    ) -> Result<DateTime<Utc>, StoreError> {
        let expires_at = self.clock.now() + ttl;

        self.records()?.insert(
            email.clone(),
            VerificationRecord {
                code: code.clone(),
                expires_at,
            },
        );

        debug!(email = %email, %expires_at, "stored verification code");

        Ok(expires_at)
    }

    async fn check(&self, email: &EmailAddress, code: &str) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let mut records = self.records()?;

        let Some(record) = records.get(email) else {
            return Ok(false);
        };

        if record.is_expired_at(now) {
            records.remove(email);
            debug!(email = %email, "verification code expired");

            return Ok(false);
        }

        Ok(constant_time_eq(
            record.code.as_str().as_bytes(),
            code.as_bytes(),
        ))
    }

    async fn clear(&self, email: &EmailAddress) -> Result<(), StoreError> {
        self.records()?.remove(email);

        Ok(())
    }
}
