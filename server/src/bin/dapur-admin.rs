use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dapur_core::Role;
use dapur_server::auth::hash_password;
use dapur_server::db;
use dapur_server::store::{PgStore, RecipeStore, StoreError, UserStore};

#[derive(Parser)]
#[command(name = "dapur-admin")]
#[command(about = "Maintenance tasks for the Dapur database", long_about = None)]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a recipe category
    AddCategory {
        #[arg(value_parser = non_blank)]
        name: String,
    },
    /// List every category with its id
    ListCategories,
    /// Create a user account
    CreateUser {
        #[arg(value_parser = non_blank)]
        username: String,
        #[arg(long, value_parser = non_empty)]
        password: String,
        /// Grant the Administrator role
        #[arg(long)]
        admin: bool,
    },
}

/// Trimmed argument that must keep at least one character.
fn non_blank(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("must not be empty".to_string());
    }
    if trimmed.chars().count() > 255 {
        return Err("must not be greater than 255 characters".to_string());
    }
    Ok(trimmed.to_string())
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let pool = db::create_pool(&cli.database_url).context("failed to connect to database")?;
    let store = PgStore::new(pool);

    match cli.command {
        Commands::AddCategory { name } => {
            let category = store
                .create_category(&name)
                .await
                .context("failed to add category")?;
            println!("{}\t{}", category.id, category.name);
        }
        Commands::ListCategories => {
            for category in store.list_categories().await? {
                println!("{}\t{}", category.id, category.name);
            }
        }
        Commands::CreateUser {
            username,
            password,
            admin,
        } => {
            let role = if admin { Role::Administrator } else { Role::User };
            let password_hash = hash_password(&password)?;
            match store.create_user(&username, &password_hash, role).await {
                Ok(user) => println!("{}\t{}\t{}", user.id, user.username, user.role.as_str()),
                Err(StoreError::UsernameTaken(name)) => {
                    anyhow::bail!("username {name} is already taken")
                }
                Err(e) => return Err(e).context("failed to create user"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let mut argv = vec!["dapur-admin", "--database-url", "postgres://localhost/dapur"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv)
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_names_are_trimmed() {
        let cli = parse(&["add-category", "  Dessert "]).unwrap();
        assert!(matches!(cli.command, Commands::AddCategory { name } if name == "Dessert"));
    }

    #[test]
    fn test_blank_names_are_rejected() {
        assert!(parse(&["add-category", "   "]).is_err());
        assert!(parse(&["create-user", " ", "--password", "s3cret"]).is_err());
        assert!(parse(&["create-user", "alice", "--password", ""]).is_err());
    }
}
