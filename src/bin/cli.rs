use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use edugate::cli::{AdminAccount, create_admin};
use edugate::edugate_config::{AppConfig, DatabaseConfig, PasswordConfig};
use edugate::edugate_db::{Database, PgStore, init_db_pool, run_migrations};
use edugate::logging::init_tracing;

#[derive(Parser)]
#[command(name = "edugate-cli")]
#[command(about = "EduGate CLI - Administrative tools for EduGate", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a verified administrator account
    CreateAdmin {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// First name
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name
        #[arg(short = 'l', long)]
        last_name: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
    /// Check that the configuration loads
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            email,
            password,
            first_name,
            last_name,
        } => handle_create_admin(email, password, first_name, last_name).await,
        Commands::Migrate => {
            let database = DatabaseConfig::from_env()?;
            let pool = init_db_pool(&database).await?;
            run_migrations(&pool).await?;
            println!("Migrations applied");
            Ok(())
        }
        Commands::CheckConfig => {
            let config = AppConfig::from_env()?;
            println!("{config:#?}");
            Ok(())
        }
    }
}

async fn handle_create_admin(
    email: Option<String>,
    password: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
) -> anyhow::Result<()> {
    let database = DatabaseConfig::from_env()?;
    let password_config = PasswordConfig::from_env()?;

    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("failed to read email")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("failed to read password")?,
    };

    let first_name = match first_name {
        Some(name) => Some(name),
        None => prompt_optional("First name (optional)")?,
    };
    let last_name = match last_name {
        Some(name) => Some(name),
        None => prompt_optional("Last name (optional)")?,
    };

    let pool = init_db_pool(&database).await?;
    run_migrations(&pool).await?;
    let db: Arc<dyn Database> = Arc::new(PgStore::new(pool));

    let account = AdminAccount {
        email: &email,
        password: &password,
        first_name,
        last_name,
    };
    let user = create_admin(db.as_ref(), account, password_config.bcrypt_cost)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.error))?;

    println!("\nAdmin created");
    println!("   Id:    {}", user.id);
    println!("   Email: {}", user.email);
    Ok(())
}

fn prompt_optional(prompt: &str) -> anyhow::Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .with_context(|| format!("failed to read {prompt}"))?;
    let value = value.trim().to_string();
    Ok((!value.is_empty()).then_some(value))
}
