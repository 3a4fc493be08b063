//! Website creation command handler.

use std::fs;
use std::path::Path;

use crate::core::config::{ignore_path, PlatformConfig, IGNORE_FILE, MANIFEST_FILE};
use crate::core::error::AppError;
use crate::core::exclusion::DEFAULT_IGNORE;
use crate::core::manifest::{
    ensure_gitignore, GitignoreChange, ProjectManifest, BUILD_WEBSITE_TYPE,
};
use crate::core::models::{Database, ResourceStatus};
use crate::core::poller::{PollOutcome, ProvisioningPoller};
use crate::core::secrets::{DatabaseEnv, SecretsManager};
use crate::providers::ApiClient;
use crate::ui;
use crate::utils::{validate_subdomain, validate_website_type};

/// Options collected from the command line.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub name: String,
    pub subdomain: String,
    pub website_type: String,
    pub description: Option<String>,
    pub database: bool,
    pub build_folder: String,
    pub force: bool,
}

/// Type sent to the platform. Build projects are hosted as static sites.
fn remote_website_type(website_type: &str) -> &str {
    if website_type == BUILD_WEBSITE_TYPE {
        "static"
    } else {
        website_type
    }
}

/// Executes the create command.
pub async fn create(project_dir: &Path, options: CreateOptions) -> Result<(), AppError> {
    if options.name.trim().is_empty() {
        return Err(AppError::Validation("Website name is required".into()));
    }
    validate_subdomain(&options.subdomain)?;
    validate_website_type(&options.website_type)?;

    if !options.force && ProjectManifest::find(project_dir).is_some() {
        return Err(AppError::Config(format!(
            "{} already exists. Use --force to overwrite it.",
            MANIFEST_FILE
        )));
    }

    let config = PlatformConfig::from_env()?;
    let mut client = ApiClient::from_config(&config)?;
    client.require_session()?;

    ui::section(&format!("Creating {}", options.name));

    let spinner = ui::ProgressBar::spinner("Creating website");
    let website = match client
        .create_website(
            &options.name,
            &options.subdomain,
            remote_website_type(&options.website_type),
            options.description.as_deref(),
            None,
            None,
        )
        .await
    {
        Ok(website) => {
            spinner.finish("website created");
            website
        }
        Err(e) => {
            spinner.finish_error("website creation failed");
            return Err(e);
        }
    };
    tracing::info!(website_id = %website.id, domain = %website.domain.name, "website created");

    let database_id = if options.database {
        create_database(
            &mut client,
            project_dir,
            &options,
            ProvisioningPoller::default(),
        )
        .await
    } else {
        None
    };

    let is_build = options.website_type == BUILD_WEBSITE_TYPE;
    if !is_build && !ignore_path(project_dir).exists() {
        fs::write(ignore_path(project_dir), DEFAULT_IGNORE).map_err(|e| {
            AppError::Config(format!("Failed to write {}: {}", IGNORE_FILE, e))
        })?;
        ui::success(&format!("Created {}", IGNORE_FILE));
    }

    match ensure_gitignore(project_dir)? {
        GitignoreChange::Created => ui::success("Created .gitignore"),
        GitignoreChange::Updated => ui::success("Updated .gitignore"),
        GitignoreChange::Unchanged => {}
    }

    let manifest = ProjectManifest {
        website_id: website.id,
        website_name: website.name,
        subdomain: options.subdomain.clone(),
        website_type: options.website_type.clone(),
        domain: website.domain.name,
        database_id,
        build_folder: is_build.then(|| options.build_folder.clone()),
    };
    manifest.save(project_dir)?;
    ui::success(&format!("Saved {}", MANIFEST_FILE));

    println!();
    ui::success("Website created");
    ui::url(&format!("https://{}", manifest.domain));
    println!();
    ui::info("To deploy, run:");
    ui::info("  ufazien deploy");
    if is_build {
        ui::info(&format!(
            "Build your project into '{}' before deploying",
            options.build_folder
        ));
    }

    Ok(())
}

/// Creates the project database and writes `.env` once credentials are known.
///
/// Failures are reported and the website stays usable, so this never errors.
/// Returns the id to record in the manifest.
async fn create_database(
    client: &mut ApiClient,
    project_dir: &Path,
    options: &CreateOptions,
    poller: ProvisioningPoller,
) -> Option<String> {
    let name = SecretsManager::database_name(&options.subdomain);
    let description = format!("Database for {}", options.name);

    let spinner = ui::ProgressBar::spinner("Creating database");
    let database = match client.create_database(&name, "mysql", Some(description.as_str())).await {
        Ok(database) => database,
        Err(e) => {
            spinner.finish_error("database creation failed");
            ui::error(&format!("Database creation failed: {}", e));
            return None;
        }
    };
    let database_id = database.id.clone();

    let database = if database.status == ResourceStatus::Active {
        database
    } else {
        spinner.set_label("Waiting for database provisioning");
        match poller.await_terminal(&database_id, client).await {
            Ok(PollOutcome::Active(database)) => database,
            Ok(outcome @ PollOutcome::TimedOut { .. }) => {
                spinner.finish_error("database still provisioning");
                if let Some(warning) = outcome.warning() {
                    ui::warning(&warning.to_string());
                }
                ui::warning("Add the credentials to .env yourself once it is active");
                return Some(database_id);
            }
            Err(e @ AppError::ProvisioningFailed(_)) => {
                spinner.finish_error("database provisioning failed");
                ui::error(&e.to_string());
                return None;
            }
            Err(e) => {
                // The database may still come up
                spinner.finish_error("database status unknown");
                ui::error(&e.to_string());
                return Some(database_id);
            }
        }
    };

    // Active records do not always carry credentials
    let database = if database.credentials().is_none() {
        match client.database(&database_id).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!(database_id = %database_id, error = %e, "credential fetch failed");
                ui::warning(&format!("Could not fetch database credentials: {}", e));
                database
            }
        }
    } else {
        database
    };
    spinner.finish(&format!("database {} ready", database.name));

    write_env(project_dir, &database);
    Some(database_id)
}

fn write_env(project_dir: &Path, database: &Database) {
    match DatabaseEnv::from_database(database) {
        Some(env) => match SecretsManager::write_env_file(project_dir, &env) {
            Ok(()) => ui::success("Database credentials written to .env"),
            Err(e) => ui::error(&format!("Could not write .env: {}", e)),
        },
        None => ui::warning("Database credentials are not available yet"),
    }
}
