pub mod archive;
pub mod config;
pub mod deploy;
pub mod error;
pub mod exclusion;
pub mod manifest;
pub mod models;
pub mod poller;
pub mod secrets;
pub mod session;

pub use archive::{ArchiveBuilder, PackagedArchive};
pub use config::{
    PlatformConfig, DEFAULT_API_URL, IGNORE_FILE, MANIFEST_FILE, POLL_INTERVAL, POLL_MAX_WAIT,
    TOKENS_FILE,
};
pub use deploy::{format_duration, format_size, DeployResult, DeployStep, Deployer};
pub use error::AppError;
pub use exclusion::{ExclusionMatcher, DEFAULT_IGNORE};
pub use manifest::{ensure_gitignore, GitignoreChange, ProjectManifest};
pub use models::{Credentials, Database, Deployment, Domain, ResourceStatus, User, Website};
pub use poller::{PollOutcome, ProvisioningPoller, StatusSource};
pub use secrets::{DatabaseEnv, SecretsManager};
pub use session::{Session, SessionStore};
