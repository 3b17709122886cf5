//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use colored::Colorize;

use crate::config::Settings;
use crate::error::AppResult;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Starts the server, or with `dry_run` only checks that it could.
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config).run().await?;
        Ok(())
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        self.config.jwt.validate()?;

        println!("{} Configuration is valid", "✓".green());
        println!(
            "{} Server would bind to: {}",
            "✓".green(),
            self.config.server.address()
        );
        println!(
            "{} Pending migrations applied on start: {}",
            "✓".green(),
            self.config.database.auto_migrate
        );
        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
