use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ufazien::cli::create::CreateOptions;
use ufazien::cli::{Cli, Commands};
use ufazien::core::AppError;
use ufazien::ui;

fn init_tracing(verbose: bool) {
    let default = if verbose { "ufazien=debug" } else { "ufazien=warn" };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
    );

    // stdout belongs to the command output
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(command) => {
            if let Err(e) = run_command(command).await {
                if e.is_auth_error() {
                    ui::error_with_hint(&e.to_string(), "Run 'ufazien login' to sign in again");
                } else {
                    ui::error(&e.to_string());
                }
                std::process::exit(1);
            }
            Ok(())
        }
        None => {
            ui::header();
            println!(
                "Use {} for available commands",
                console::style("ufazien --help").cyan()
            );
            Ok(())
        }
    }
}

async fn run_command(command: Commands) -> Result<(), AppError> {
    let project_dir = std::env::current_dir()?;

    match command {
        Commands::Login { email, password } => ufazien::cli::auth::login(&email, &password).await,

        Commands::Logout => ufazien::cli::auth::logout().await,

        Commands::Status => ufazien::cli::auth::status(&project_dir).await,

        Commands::Create {
            name,
            subdomain,
            website_type,
            description,
            database,
            build_folder,
            force,
        } => {
            let options = CreateOptions {
                name,
                subdomain,
                website_type,
                description,
                database,
                build_folder,
                force,
            };
            ufazien::cli::create::create(&project_dir, options).await
        }

        Commands::Deploy => ufazien::cli::deploy::deploy(&project_dir).await,
    }
}
