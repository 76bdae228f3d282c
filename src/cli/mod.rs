pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use utils::ApiClient;

pub const DEFAULT_URL: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(name = "vidshare")]
#[command(about = "vidshare CLI - Command-line client for the video sharing API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "VIDSHARE_URL", default_value = DEFAULT_URL, help = "API base URL")]
    pub url: String,

    #[arg(long, global = true, env = "VIDSHARE_TOKEN", help = "Session token from `vidshare login`")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check server health status from API /health endpoint")]
    Health,

    #[command(about = "Register new user")]
    Register {
        #[arg(help = "Email")]
        email: String,
        #[arg(help = "Password")]
        password: String,
        #[arg(help = "Display name")]
        name: String,
    },

    #[command(about = "Login and print a session token")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(help = "Password")]
        password: String,
    },

    #[command(about = "Show the session attached to --token")]
    Session,

    #[command(about = "List and publish videos")]
    Videos {
        #[command(subcommand)]
        cmd: commands::videos::VideoCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ApiClient::new(&cli.url, cli.token.clone())?;

    match cli.command {
        Commands::Health => commands::server::health(&client, output_format).await,
        Commands::Register { email, password, name } => {
            commands::auth::register(&client, &email, &password, &name, output_format).await
        }
        Commands::Login { email, password } => {
            commands::auth::login(&client, &email, &password, output_format).await
        }
        Commands::Session => commands::auth::session(&client, output_format).await,
        Commands::Videos { cmd } => commands::videos::handle(&client, cmd, output_format).await,
    }
}
