use clap::{Parser, Subcommand};

pub mod auth;
pub mod create;
pub mod deploy;

/// Ufazien CLI - Deploy websites to the Ufazien hosting platform
#[derive(Parser)]
#[command(
    name = "ufazien",
    bin_name = "ufazien",
    version,
    about = "A CLI tool for deploying websites to Ufazien",
    long_about = None,
    after_help = "For more information, visit: https://ufazien.com"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in to your Ufazien account
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long, env = "UFAZIEN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and remove stored tokens
    Logout,

    /// Show the logged in account and the linked project
    Status,

    /// Create a website for the current directory
    Create {
        /// Website name
        #[arg(short, long)]
        name: String,

        /// Subdomain (served as <subdomain>.ufazien.com)
        #[arg(short, long)]
        subdomain: String,

        /// Website type: static, php or build
        #[arg(short = 't', long = "type", default_value = "static")]
        website_type: String,

        /// Website description
        #[arg(short, long)]
        description: Option<String>,

        /// Also create a MySQL database and write its credentials to .env
        #[arg(long)]
        database: bool,

        /// Folder deployed for build projects
        #[arg(long, default_value = "dist")]
        build_folder: String,

        /// Overwrite an existing .ufazien.json
        #[arg(short, long)]
        force: bool,
    },

    /// Deploy the current directory
    Deploy,
}
