//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::domain::notifications::NotificationService;

/// Global application state
#[derive(Clone)]
pub struct AppState<N: NotificationService> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// Notification service
    pub notifications: Arc<N>,
}

impl<N: NotificationService> AppState<N> {
    /// Create a new application state
    pub fn new(notifications: N) -> Self {
        Self {
            start_time: Utc::now(),
            notifications: Arc::new(notifications),
        }
    }
}

impl<N: NotificationService> fmt::Debug for AppState<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("notifications", &"NotificationService")
            .finish()
    }
}

#[cfg(test)]
use crate::domain::notifications::tests::MockNotificationService;

#[cfg(test)]
pub fn test_state(
    notifications: Option<MockNotificationService>,
) -> AppState<MockNotificationService> {
    let notifications = notifications
        .map(Arc::new)
        .unwrap_or_else(|| Arc::new(MockNotificationService::new()));

    AppState {
        start_time: Utc::now(),
        notifications,
    }
}
