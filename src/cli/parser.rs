//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Digital business card backend
#[derive(Parser, Debug)]
#[command(name = "vcard-rs")]
#[command(about = "Digital business card backend: themes, users and their vCards")]
#[command(long_about = "
vcard-rs serves the REST API behind a multi-tenant digital business card
product. Admins manage visual themes; users own a vCard rendered with one
of them.

EXAMPLES:
    # Start the server with default configuration
    vcard-rs serve

    # Start server on custom host and port
    vcard-rs serve --host 0.0.0.0 --port 8080

    # Use custom configuration file
    vcard-rs --config /path/to/config.toml serve

    # Check configuration without starting server
    vcard-rs serve --dry-run

    # Run database migrations
    vcard-rs migrate

    # Rollback last 2 migrations
    vcard-rs migrate --rollback 2

    # Wipe themes and users, then create the default theme and an admin
    DB_CONNECTION=postgres://localhost/vcard vcard-rs seed

    # Same, without any prompt
    vcard-rs seed --name Admin --email admin@example.com --password s3cret-pass --yes
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered `config/` directory.
    /// The file must exist and be readable.
    ///
    /// Example: --config /etc/vcard-rs/production.toml
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` layer is loaded instead of
    /// reading `VCARD_APP_ENV`.
    ///
    /// Available values: development (dev), staging (stage), production (prod), test
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Raises the log level to debug. Cannot be used with --quiet.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Lowers the log level to error. Cannot be used with --verbose.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Launches the HTTP server with the configured settings. The server
    /// binds to the configured host and port, opens the database pool,
    /// applies migrations when `database.auto_migrate` is set, and begins
    /// accepting requests.
    ///
    /// Examples:
    ///   vcard-rs serve                           # Start with defaults
    ///   vcard-rs serve --host 0.0.0.0 --port 80  # Bind to all interfaces on port 80
    ///   vcard-rs serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        ///
        /// Use 127.0.0.1 for localhost only, or 0.0.0.0 to accept
        /// connections from any interface.
        ///
        /// Default: 127.0.0.1
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        ///
        /// Must be between 1 and 65535.
        ///
        /// Default: 3000
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Takes precedence over the configuration file and the global
        /// --verbose/--quiet flags.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Database migration operations
    ///
    /// Examples:
    ///   vcard-rs migrate                    # Apply all pending migrations
    ///   vcard-rs migrate --dry-run          # Show pending migrations without applying
    ///   vcard-rs migrate --rollback 3       # Rollback the last 3 migrations
    Migrate {
        /// Show pending migrations without applying
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Number of migrations to rollback (1 to 100)
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = super::validation::validate_rollback_steps)]
        rollback: Option<u32>,
    },
    /// Reset the database to a fresh install
    ///
    /// Deletes every theme and user, inserts the default theme and creates
    /// one admin account linked to it. Missing credentials are prompted
    /// for on the terminal.
    ///
    /// Examples:
    ///   vcard-rs seed
    ///   vcard-rs seed --email admin@example.com --yes
    Seed {
        /// Admin display name
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Admin e-mail address
        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,

        /// Admin password
        #[arg(long, value_name = "PASSWORD", env = "VCARD_SEED_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Skip the confirmation before existing data is deleted (implied when
        /// stdin is not a terminal)
        #[arg(short, long)]
        yes: bool,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "test")]
    Test,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// Validate argument combinations clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        match &self.command {
            Some(Commands::Migrate { dry_run, rollback }) if *dry_run && rollback.is_some() => {
                Err("Cannot use --dry-run and --rollback together".to_string())
            }
            Some(Commands::Seed { name, email, .. }) => {
                if name.as_deref().is_some_and(|n| n.trim().is_empty()) {
                    return Err("--name cannot be blank".to_string());
                }
                if email.as_deref().is_some_and(|e| e.trim().is_empty()) {
                    return Err("--email cannot be blank".to_string());
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Logger level requested on the command line, if any.
    pub fn log_level_override(&self) -> Option<&'static str> {
        if let Some(Commands::Serve {
            log_level: Some(level),
            ..
        }) = &self.command
        {
            return Some(level.as_str());
        }

        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
            Environment::Test => crate::config::Environment::Test,
        }
    }
}
