//! Login, logout and status command handlers.

use std::path::Path;

use crate::core::config::PlatformConfig;
use crate::core::error::AppError;
use crate::core::manifest::ProjectManifest;
use crate::providers::ApiClient;
use crate::ui;
use crate::utils::validate_email;

/// Executes the login command.
pub async fn login(email: &str, password: &str) -> Result<(), AppError> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }

    let config = PlatformConfig::from_env()?;
    let mut client = ApiClient::from_config(&config)?;

    let spinner = ui::ProgressBar::spinner("Logging in");
    match client.login(email, password).await {
        Ok(user) => {
            spinner.finish("logged in");
            println!();
            let name = user.full_name().unwrap_or_else(|| user.email.clone());
            ui::success(&format!("Welcome, {}!", name));
            Ok(())
        }
        Err(e) => {
            spinner.finish_error("login failed");
            Err(e)
        }
    }
}

/// Executes the logout command.
pub async fn logout() -> Result<(), AppError> {
    let config = PlatformConfig::from_env()?;
    let mut client = ApiClient::from_config(&config)?;

    if !client.is_authenticated() {
        ui::info("Not logged in");
        return Ok(());
    }

    client.logout().await;
    ui::success("Logged out");
    Ok(())
}

/// Executes the status command.
pub async fn status(project_dir: &Path) -> Result<(), AppError> {
    let config = PlatformConfig::from_env()?;
    let mut client = ApiClient::from_config(&config)?;

    ui::section("Account");
    if client.is_authenticated() {
        let user = client.profile().await?;
        ui::success(&format!("Logged in as {}", user.email));
        if let Some(name) = user.full_name() {
            ui::info(&name);
        }
    } else {
        ui::warning("Not logged in. Run 'ufazien login' first.");
    }
    ui::info(&format!("API: {}", config.api_url));

    println!();
    ui::section("Project");
    match ProjectManifest::find(project_dir) {
        Some(manifest) => {
            ui::info(&format!(
                "{} ({}, id {})",
                manifest.website_name, manifest.website_type, manifest.website_id
            ));
            if let Some(database_id) = &manifest.database_id {
                ui::info(&format!("Database id {}", database_id));
            }
            ui::url(&format!("https://{}", manifest.domain));
        }
        None => ui::info("No .ufazien.json in this directory"),
    }

    Ok(())
}
