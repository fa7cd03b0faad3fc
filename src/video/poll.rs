//! Bounded status polling.

use std::time::Duration;

use super::client::VideoService;
use super::error::VideoError;
use super::job::{Job, JobStatus};

/// Default wait before each status query (5 seconds).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default maximum number of status queries.
pub const DEFAULT_MAX_POLLS: u32 = 60;

/// Polling interval and ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_POLLS,
        }
    }
}

impl PollSettings {
    /// Total time the poller may wait: interval × max attempts.
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

/// Poll `id` until it reaches a terminal status or the attempt ceiling.
///
/// Sleeps `settings.interval` before every query, including the first.
/// Queries are issued one at a time.
///
/// # Errors
///
/// - `VideoError::JobFailed` as soon as a failure status is observed
/// - `VideoError::PollTimeout` after `max_attempts` non-terminal results
/// - any error from the service itself, unchanged
pub async fn poll_until_ready<S>(
    service: &S,
    id: &str,
    settings: &PollSettings,
) -> Result<Job, VideoError>
where
    S: VideoService + ?Sized,
{
    for attempt in 1..=settings.max_attempts {
        tokio::time::sleep(settings.interval).await;

        let job = service.retrieve(id).await?;
        log::info!(
            "Poll {}/{} -> status={}",
            attempt,
            settings.max_attempts,
            job.status_label()
        );

        match job.classify() {
            JobStatus::Succeeded => return Ok(job),
            JobStatus::Failed => {
                if let Some(reason) = job.failure_reason() {
                    log::error!("Video {} failed: {}", id, reason);
                }
                return Err(VideoError::JobFailed {
                    id: id.to_string(),
                    status: job.status_label().to_string(),
                });
            }
            JobStatus::Waiting => {}
        }
    }

    Err(VideoError::PollTimeout {
        id: id.to_string(),
        budget: settings.budget(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PollSettings::default();
        assert_eq!(settings.interval, Duration::from_secs(5));
        assert_eq!(settings.max_attempts, 60);
    }

    #[test]
    fn test_default_budget_is_300s() {
        assert_eq!(PollSettings::default().budget(), Duration::from_secs(300));
    }

    #[test]
    fn test_budget_scales_with_settings() {
        let settings = PollSettings {
            interval: Duration::from_millis(250),
            max_attempts: 8,
        };
        assert_eq!(settings.budget(), Duration::from_secs(2));
    }
}
