//! Deployment command handler.

use std::path::Path;

use crate::core::config::{PlatformConfig, MANIFEST_FILE};
use crate::core::deploy::{format_duration, format_size, DeployStep, Deployer};
use crate::core::error::AppError;
use crate::core::manifest::ProjectManifest;
use crate::providers::ApiClient;
use crate::ui;

/// Executes the deploy command.
pub async fn deploy(project_dir: &Path) -> Result<(), AppError> {
    let manifest = ProjectManifest::find(project_dir).ok_or_else(|| {
        AppError::Config(format!(
            "{} not found. Run 'ufazien create' first.",
            MANIFEST_FILE
        ))
    })?;

    let config = PlatformConfig::from_env()?;
    let mut client = ApiClient::from_config(&config)?;
    client.require_session()?;

    ui::section(&format!("Deploying {}", manifest.website_name));

    let spinner = ui::ProgressBar::spinner("Preparing deployment");
    let mut deployer = Deployer::new(&mut client, project_dir);
    let mut current_step = None;

    let outcome = deployer
        .deploy(&manifest, |step| {
            current_step = Some(step);
            spinner.set_label(step.display_name());
        })
        .await;

    match outcome {
        Ok(result) => {
            spinner.finish(&format!(
                "{} files ({}) uploaded",
                result.files,
                format_size(result.archive_size)
            ));
            println!();
            ui::success(&format!(
                "Deployment {} in {}",
                result.status,
                format_duration(result.duration)
            ));
            println!();
            ui::url(&result.url);
            Ok(())
        }
        Err(e) => {
            spinner.finish_error("deployment failed");
            println!();
            if let Some(hint) = failure_hint(current_step, &e, &manifest) {
                ui::info(hint);
            }
            Err(e)
        }
    }
}

/// Advice printed after a failed deployment, depending on where it stopped.
fn failure_hint(
    step: Option<DeployStep>,
    error: &AppError,
    manifest: &ProjectManifest,
) -> Option<&'static str> {
    match (step, error) {
        (_, e) if e.is_auth_error() => None,
        (Some(DeployStep::Trigger), _) => {
            Some("Files have been uploaded. Deployment may start automatically.")
        }
        (_, AppError::Archive(_)) if manifest.archive_subfolder().is_some() => {
            Some("Build your project before deploying")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(website_type: &str) -> ProjectManifest {
        ProjectManifest {
            website_id: "12".into(),
            website_name: "Shop".into(),
            subdomain: "shop".into(),
            website_type: website_type.into(),
            domain: "shop.ufazien.com".into(),
            database_id: None,
            build_folder: Some("dist".into()),
        }
    }

    #[test]
    fn test_trigger_failure_mentions_uploaded_files() {
        let error = AppError::Remote {
            status: 500,
            message: "Internal error".into(),
        };
        let hint = failure_hint(Some(DeployStep::Trigger), &error, &manifest("php"));
        assert_eq!(
            hint,
            Some("Files have been uploaded. Deployment may start automatically.")
        );
    }

    #[test]
    fn test_missing_build_output_hint() {
        let error = AppError::Archive("Build folder 'dist' not found".into());
        assert_eq!(
            failure_hint(Some(DeployStep::Package), &error, &manifest("build")),
            Some("Build your project before deploying")
        );
        assert_eq!(
            failure_hint(Some(DeployStep::Package), &error, &manifest("php")),
            None
        );
    }

    #[test]
    fn test_upload_failure_has_no_hint() {
        let error = AppError::Upload("File too large".into());
        assert_eq!(
            failure_hint(Some(DeployStep::Upload), &error, &manifest("php")),
            None
        );
        assert_eq!(
            failure_hint(Some(DeployStep::Trigger), &AppError::AuthenticationFailed, &manifest("php")),
            None
        );
    }
}
