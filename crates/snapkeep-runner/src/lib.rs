//! Snapkeep Runner
//!
//! Runs one backup: create an archive of a project directory, upload it,
//! apply retention to the backup directory, and report the outcome.
//!
//! # Components
//!
//! - [`DirectoryArchiver`]: names the artifact, stages it, moves it into place
//! - [`CommandPublisher`] / [`RetryingPublisher`]: upload through an external tool
//! - [`WebhookNotifier`]: posts the completion event as JSON
//! - [`DirectoryStore`]: the backup directory as an artifact store
//! - [`DirectoryLock`]: one run per backup directory at a time
//! - [`RunController`]: sequences the stages and decides what is fatal
//!
//! # Usage
//!
//! ```no_run
//! use snapkeep_janitor::Janitor;
//! use snapkeep_runner::{
//!     CommandPacker, CommandPublisher, DirectoryArchiver, RunController, RunRequest,
//!     WebhookNotifier,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = RunController::new(
//!     DirectoryArchiver::new(CommandPacker::default()),
//!     CommandPublisher::default(),
//!     Some(WebhookNotifier::new("https://hooks.example.com/backup")?),
//!     Janitor::default_config(),
//! );
//!
//! let outcome = controller.execute(&RunRequest {
//!     project_dir: "/srv/webapp".into(),
//!     backup_dir: "/var/backups/webapp".into(),
//!     destination: "drive-folder-id".into(),
//! })?;
//! println!("{} -> {}", outcome.artifact.file_name, outcome.status());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod archive;
pub mod command;
pub mod controller;
pub mod error;
pub mod lock;
pub mod notify;
pub mod publish;
pub mod store;

pub use archive::{project_name, CommandPacker, DirectoryArchiver, Packer};
pub use command::CommandTemplate;
pub use controller::{NotificationOutcome, RunController, RunOutcome, RunRequest};
pub use error::{LockError, RunError};
pub use lock::{DirectoryLock, LOCK_FILE_NAME};
pub use notify::WebhookNotifier;
pub use publish::{CommandPublisher, RetryPolicy, RetryingPublisher};
pub use store::DirectoryStore;
