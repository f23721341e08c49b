//! Remote publishing
//!
//! [`CommandPublisher`] makes exactly one upload attempt through an external
//! program. [`RetryingPublisher`] wraps any [`Publisher`] with exponential
//! backoff without changing its contract.

use crate::command::{diagnostic, CommandTemplate};
use serde::{Deserialize, Serialize};
use snapkeep_domain::traits::Publisher;
use snapkeep_domain::PublishError;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

/// Publisher backed by an external upload program
///
/// Placeholders: `{artifact}` (path of the artifact) and `{destination}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPublisher {
    /// Command line to run
    #[serde(flatten)]
    pub template: CommandTemplate,
}

impl Default for CommandPublisher {
    /// `gdrive upload --parent {destination} {artifact}`
    fn default() -> Self {
        Self {
            template: CommandTemplate::new(
                "gdrive",
                ["upload", "--parent", "{destination}", "{artifact}"],
            ),
        }
    }
}

impl CommandPublisher {
    /// Publisher running `template`
    pub fn new(template: CommandTemplate) -> Self {
        Self { template }
    }
}

impl Publisher for CommandPublisher {
    fn publish(&self, artifact: &Path, destination: &str) -> Result<(), PublishError> {
        if !artifact.is_file() {
            return Err(PublishError::MissingArtifact(artifact.to_path_buf()));
        }

        let vars = [
            ("artifact", artifact.as_os_str()),
            ("destination", OsStr::new(destination)),
        ];
        let program = self.template.program.clone();

        let output = self
            .template
            .run(&vars, None)
            .map_err(|source| PublishError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PublishError::Transport {
                program,
                status: output.status.to_string(),
                diagnostic: diagnostic(&output),
            });
        }

        Ok(())
    }
}

/// Backoff policy for retried uploads
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first; values below 1 behave as 1
    pub max_attempts: u32,

    /// Delay before the first retry
    pub base_delay: Duration,

    /// Backoff multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    /// A single attempt, no retries
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_secs(2),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` attempts starting at `base_delay`
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            ..Default::default()
        }
    }

    /// Delay after the given number of failed attempts (1-indexed)
    ///
    /// `base_delay * multiplier^(attempts - 1)`, so with a 2s base and a
    /// multiplier of 2: 2s, 4s, 8s, ...
    pub fn next_delay(&self, attempts: u32) -> Duration {
        let exponent = attempts.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

/// Retries a [`Publisher`] with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryingPublisher<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: Publisher> RetryingPublisher<P> {
    /// Wrap `inner` with `policy`
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<P: Publisher> Publisher for RetryingPublisher<P> {
    fn publish(&self, artifact: &Path, destination: &str) -> Result<(), PublishError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.inner.publish(artifact, destination) {
                Ok(()) => return Ok(()),
                Err(e @ PublishError::MissingArtifact(_)) => return Err(e),
                Err(e) if attempt >= max_attempts => return Err(e),
                Err(e) => {
                    let delay = self.policy.next_delay(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        error = %e,
                        "Upload attempt failed, retrying in {:?}",
                        delay
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;

    /// Fails a fixed number of times, then succeeds
    struct FlakyPublisher {
        failures: u32,
        calls: Cell<u32>,
    }

    impl Publisher for FlakyPublisher {
        fn publish(&self, _artifact: &Path, _destination: &str) -> Result<(), PublishError> {
            let call = self.calls.get() + 1;
            self.calls.set(call);
            if call <= self.failures {
                return Err(PublishError::Transport {
                    program: "fake".to_string(),
                    status: "exit status: 1".to_string(),
                    diagnostic: "timeout".to_string(),
                });
            }
            Ok(())
        }
    }

    fn flaky(failures: u32) -> FlakyPublisher {
        FlakyPublisher {
            failures,
            calls: Cell::new(0),
        }
    }

    #[test]
    fn test_exponential_backoff_increases() {
        let policy = RetryPolicy::new(5, Duration::from_secs(2));
        assert_eq!(policy.next_delay(1), Duration::from_secs(2));
        assert_eq!(policy.next_delay(2), Duration::from_secs(4));
        assert_eq!(policy.next_delay(3), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = RetryPolicy::new(5, Duration::from_secs(2));
        assert_eq!(policy.next_delay(u32::MAX), Duration::MAX);
    }

    #[test]
    fn test_retry_until_success() {
        let publisher = RetryingPublisher::new(flaky(2), RetryPolicy::new(3, Duration::ZERO));
        assert!(publisher.publish(Path::new("a.zip"), "dest").is_ok());
        assert_eq!(publisher.inner.calls.get(), 3);
    }

    #[test]
    fn test_retry_gives_up_with_last_error() {
        let publisher = RetryingPublisher::new(flaky(5), RetryPolicy::new(2, Duration::ZERO));
        let err = publisher.publish(Path::new("a.zip"), "dest").unwrap_err();
        assert!(err.to_string().contains("timeout"));
        assert_eq!(publisher.inner.calls.get(), 2);
    }

    #[test]
    fn test_default_policy_makes_one_attempt() {
        let publisher = RetryingPublisher::new(flaky(1), RetryPolicy::default());
        assert!(publisher.publish(Path::new("a.zip"), "dest").is_err());
        assert_eq!(publisher.inner.calls.get(), 1);
    }

    #[test]
    fn test_missing_artifact_not_uploaded() {
        let dir = tempfile::tempdir().unwrap();
        let err = CommandPublisher::default()
            .publish(&dir.path().join("gone.zip"), "dest")
            .unwrap_err();
        assert!(matches!(err, PublishError::MissingArtifact(_)));
    }

    #[test]
    fn test_unknown_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("a.zip");
        fs::write(&artifact, "PK").unwrap();

        let publisher = CommandPublisher::new(CommandTemplate::new(
            "snapkeep-no-such-uploader",
            ["{artifact}"],
        ));
        let err = publisher.publish(&artifact, "dest").unwrap_err();
        assert!(matches!(err, PublishError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_transport_failure_carries_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("a.zip");
        fs::write(&artifact, "PK").unwrap();

        let publisher = CommandPublisher::new(CommandTemplate::new(
            "sh",
            ["-c", "echo \"403 forbidden for $0\" >&2; exit 1", "{destination}"],
        ));
        let err = publisher.publish(&artifact, "folder-42").unwrap_err();

        match err {
            PublishError::Transport { diagnostic, .. } => {
                assert_eq!(diagnostic, "403 forbidden for folder-42");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_upload() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("a.zip");
        fs::write(&artifact, "PK").unwrap();
        let remote = dir.path().join("remote");
        fs::create_dir(&remote).unwrap();

        let publisher = CommandPublisher::new(CommandTemplate::new(
            "cp",
            ["{artifact}", "{destination}"],
        ));
        publisher.publish(&artifact, remote.to_str().unwrap()).unwrap();
        assert!(remote.join("a.zip").is_file());
    }
}
