//! Waiting for asynchronously provisioned resources.

use std::time::Duration;

use crate::core::config::{POLL_INTERVAL, POLL_MAX_WAIT};
use crate::core::error::AppError;
use crate::core::models::{Database, ResourceStatus};

/// Something that can report the current state of a resource.
#[allow(async_fn_in_trait)]
pub trait StatusSource {
    async fn fetch_status(&mut self, resource_id: &str) -> Result<Database, AppError>;
}

/// Result of waiting on a resource.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// The resource reached `active`.
    Active(Database),
    /// The budget ran out while the resource was still provisioning.
    TimedOut { resource: Database, waited: Duration },
}

impl PollOutcome {
    /// The last fetched resource.
    pub fn resource(&self) -> &Database {
        match self {
            Self::Active(resource) | Self::TimedOut { resource, .. } => resource,
        }
    }

    pub fn into_resource(self) -> Database {
        match self {
            Self::Active(resource) | Self::TimedOut { resource, .. } => resource,
        }
    }

    /// Advisory error for a timed out wait, meant to be shown as a warning.
    pub fn warning(&self) -> Option<AppError> {
        match self {
            Self::Active(_) => None,
            Self::TimedOut { resource, waited } => Some(AppError::ProvisioningTimeout {
                resource_id: resource.id.clone(),
                waited: *waited,
            }),
        }
    }
}

/// Fixed-interval poller: sleep, check, repeat until terminal or out of budget.
#[derive(Debug, Clone, Copy)]
pub struct ProvisioningPoller {
    interval: Duration,
    max_wait: Duration,
}

impl Default for ProvisioningPoller {
    fn default() -> Self {
        Self::new(POLL_INTERVAL, POLL_MAX_WAIT)
    }
}

impl ProvisioningPoller {
    pub fn new(interval: Duration, max_wait: Duration) -> Self {
        // A zero interval would never accumulate wait time
        Self {
            interval: interval.max(Duration::from_millis(1)),
            max_wait,
        }
    }

    /// Polls until the resource is `active` or `error`, or the budget is spent.
    ///
    /// `error` fails with [`AppError::ProvisioningFailed`]. Running out of time
    /// is not an error: the last fetched resource comes back as
    /// [`PollOutcome::TimedOut`]. Errors from `source` are returned as is.
    pub async fn await_terminal<S: StatusSource>(
        &self,
        resource_id: &str,
        source: &mut S,
    ) -> Result<PollOutcome, AppError> {
        let mut waited = Duration::ZERO;

        loop {
            let step = self.interval.min(self.max_wait.saturating_sub(waited));
            tokio::time::sleep(step).await;
            waited += step;

            let resource = source.fetch_status(resource_id).await?;
            tracing::debug!(resource_id, status = %resource.status, waited = ?waited, "polled resource");

            match resource.status {
                ResourceStatus::Active => return Ok(PollOutcome::Active(resource)),
                ResourceStatus::Error => {
                    let message = resource
                        .error_message
                        .unwrap_or_else(|| "Unknown error".to_string());
                    return Err(AppError::ProvisioningFailed(message));
                }
                ResourceStatus::Provisioning if waited >= self.max_wait => {
                    return Ok(PollOutcome::TimedOut { resource, waited });
                }
                ResourceStatus::Provisioning => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tokio::time::Instant;

    /// Replays a fixed list of statuses, repeating the last one.
    struct Scripted {
        statuses: VecDeque<ResourceStatus>,
        calls: usize,
        error_message: Option<String>,
    }

    impl Scripted {
        fn new(statuses: &[ResourceStatus]) -> Self {
            Self {
                statuses: statuses.iter().copied().collect(),
                calls: 0,
                error_message: None,
            }
        }
    }

    impl StatusSource for Scripted {
        async fn fetch_status(&mut self, resource_id: &str) -> Result<Database, AppError> {
            self.calls += 1;
            let status = if self.statuses.len() > 1 {
                self.statuses.pop_front().unwrap()
            } else {
                *self.statuses.front().unwrap()
            };
            Ok(Database {
                id: resource_id.to_string(),
                name: "shop_abcdef_db".into(),
                db_type: "mysql".into(),
                status,
                host: None,
                port: None,
                username: None,
                password: None,
                error_message: self.error_message.clone(),
            })
        }
    }

    fn assert_elapsed(start: Instant, expected: Duration) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(50),
            "elapsed {:?}, expected {:?}",
            elapsed,
            expected
        );
    }

    struct Failing;

    impl StatusSource for Failing {
        async fn fetch_status(&mut self, _resource_id: &str) -> Result<Database, AppError> {
            Err(AppError::Transport("connection refused".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_active_after_three_checks() {
        use ResourceStatus::*;
        let mut source = Scripted::new(&[Provisioning, Provisioning, Active]);
        let start = Instant::now();

        let outcome = ProvisioningPoller::default()
            .await_terminal("db-1", &mut source)
            .await
            .unwrap();

        assert!(matches!(outcome, PollOutcome::Active(_)));
        assert_eq!(source.calls, 3);
        assert_elapsed(start, Duration::from_secs(6));
        assert!(outcome.warning().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_before_first_check() {
        let mut source = Scripted::new(&[ResourceStatus::Active]);
        let start = Instant::now();

        ProvisioningPoller::default()
            .await_terminal("db-1", &mut source)
            .await
            .unwrap();

        assert_elapsed(start, Duration::from_secs(2));
        assert_eq!(source.calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_returns_last_resource() {
        let mut source = Scripted::new(&[ResourceStatus::Provisioning]);
        let start = Instant::now();

        let outcome = ProvisioningPoller::default()
            .await_terminal("db-7", &mut source)
            .await
            .unwrap();

        assert_elapsed(start, Duration::from_secs(60));
        assert_eq!(source.calls, 30);
        assert_eq!(outcome.resource().status, ResourceStatus::Provisioning);
        assert!(matches!(
            outcome.warning(),
            Some(AppError::ProvisioningTimeout { ref resource_id, .. }) if resource_id == "db-7"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_exceeds_budget_with_uneven_interval() {
        let mut source = Scripted::new(&[ResourceStatus::Provisioning]);
        let start = Instant::now();

        let poller = ProvisioningPoller::new(Duration::from_secs(4), Duration::from_secs(10));
        let outcome = poller.await_terminal("db-1", &mut source).await.unwrap();

        assert_elapsed(start, Duration::from_secs(10));
        assert_eq!(source.calls, 3);
        assert!(matches!(outcome, PollOutcome::TimedOut { waited, .. } if waited == Duration::from_secs(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_status_fails_immediately() {
        use ResourceStatus::*;
        let mut source = Scripted::new(&[Provisioning, Error]);
        source.error_message = Some("quota exceeded".into());

        let result = ProvisioningPoller::default()
            .await_terminal("db-1", &mut source)
            .await;

        assert!(matches!(result, Err(AppError::ProvisioningFailed(ref m)) if m == "quota exceeded"));
        assert_eq!(source.calls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_errors_propagate() {
        let result = ProvisioningPoller::default()
            .await_terminal("db-1", &mut Failing)
            .await;

        assert!(matches!(result, Err(AppError::Transport(_))));
    }
}
