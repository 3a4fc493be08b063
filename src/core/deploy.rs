//! Deployment orchestration: package, upload, trigger.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::core::archive::{ArchiveBuilder, PackagedArchive};
use crate::core::error::AppError;
use crate::core::manifest::ProjectManifest;
use crate::providers::platform::ApiClient;

/// Deployment step for progress tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStep {
    Package,
    Upload,
    Trigger,
}

impl DeployStep {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Package => "Creating ZIP archive",
            Self::Upload => "Uploading files",
            Self::Trigger => "Triggering deployment",
        }
    }
}

/// Result of a deployment.
#[derive(Debug, Clone)]
pub struct DeployResult {
    pub url: String,
    /// Status reported by the platform, `queued` when it sent none.
    pub status: String,
    pub files: usize,
    pub archive_size: u64,
    pub duration: Duration,
}

/// Deploys a project directory to the website recorded in its manifest.
pub struct Deployer<'a> {
    client: &'a mut ApiClient,
    project_dir: &'a Path,
}

impl<'a> Deployer<'a> {
    pub fn new(client: &'a mut ApiClient, project_dir: &'a Path) -> Self {
        Self {
            client,
            project_dir,
        }
    }

    /// Packages the project (or its build folder) into a temporary archive.
    pub fn package(&self, manifest: &ProjectManifest) -> Result<PackagedArchive, AppError> {
        ArchiveBuilder::new(self.project_dir)
            .subfolder(manifest.archive_subfolder())
            .build()
    }

    /// Uploads the archive. The archive file is removed whatever the outcome.
    pub async fn upload(
        &mut self,
        manifest: &ProjectManifest,
        archive: PackagedArchive,
    ) -> Result<(), AppError> {
        let result = self
            .client
            .upload_zip(&manifest.website_id, &archive.path)
            .await;
        archive.remove();

        match result {
            Ok(_) => Ok(()),
            Err(e @ (AppError::AuthenticationRequired | AppError::AuthenticationFailed)) => Err(e),
            Err(AppError::Upload(message)) => Err(AppError::Upload(message)),
            Err(e) => Err(AppError::Upload(e.to_string())),
        }
    }

    /// Asks the platform to deploy the uploaded files.
    pub async fn trigger(&mut self, manifest: &ProjectManifest) -> Result<String, AppError> {
        let deployment = self.client.deploy_website(&manifest.website_id).await?;
        Ok(deployment.status.unwrap_or_else(|| "queued".to_string()))
    }

    /// Runs all steps, reporting each one before it starts.
    pub async fn deploy(
        &mut self,
        manifest: &ProjectManifest,
        mut on_step: impl FnMut(DeployStep),
    ) -> Result<DeployResult, AppError> {
        if manifest.website_id.is_empty() {
            return Err(AppError::Config(
                "website_id not found in .ufazien.json".into(),
            ));
        }

        let start = Instant::now();

        on_step(DeployStep::Package);
        let archive = self.package(manifest)?;
        let files = archive.entries;
        let archive_size = archive.size;
        tracing::info!(files, archive_size, website_id = %manifest.website_id, "archive ready");

        on_step(DeployStep::Upload);
        self.upload(manifest, archive).await?;

        on_step(DeployStep::Trigger);
        let status = self.trigger(manifest).await?;

        Ok(DeployResult {
            url: format!("https://{}", manifest.domain),
            status,
            files,
            archive_size,
            duration: start.elapsed(),
        })
    }
}

/// Formats a duration for display (e.g. "1.2s").
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}m {}s", mins, remaining_secs)
    }
}

/// Formats a byte count for display.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f >= MB {
        format!("{:.1} MB", bytes_f / MB)
    } else if bytes_f >= KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{} B", bytes)
    }
}
