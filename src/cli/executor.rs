//! Dispatches a parsed command to its handler.

use super::handlers::{MigrateCommandHandler, SeedArgs, SeedCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::{AppError, AppResult};

/// Execute a CLI command with the given settings. No subcommand means `serve`.
///
/// # Errors
/// Returns errors from argument validation or from the command handler.
/// `seed` reports its own failures and always succeeds.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })?;

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
        Some(Commands::Seed {
            name,
            email,
            password,
            yes,
        }) => {
            SeedCommandHandler::new(settings)
                .execute(SeedArgs {
                    name: name.clone(),
                    email: email.clone(),
                    password: password.clone(),
                    yes: *yes,
                })
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn create_valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/test".to_string();
        config.jwt.secret = "s".repeat(40);
        config
    }

    #[tokio::test]
    async fn test_execute_serve_dry_run() {
        let cli = Cli::try_parse_from(["vcard-rs", "serve", "--dry-run"]).unwrap();
        assert!(execute_command(&cli, create_valid_config()).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_rejected_before_dispatch() {
        let cli = Cli::try_parse_from(["vcard-rs", "seed", "--name", " "]).unwrap();

        match execute_command(&cli, create_valid_config()).await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "cli_arguments"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_seed_failure_still_succeeds() {
        let cli = Cli::try_parse_from([
            "vcard-rs",
            "seed",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--password",
            "long-enough",
            "--yes",
        ])
        .unwrap();

        // An empty database URL fails validation inside the handler
        assert!(execute_command(&cli, Settings::default()).await.is_ok());
    }
}
