//! Seed command handler
//!
//! Collects the admin credentials (flags first, terminal prompts for the
//! rest), asks before destroying data, then runs the [`Seeder`]. Failures are
//! reported and swallowed so the process still exits normally.
//!
//! The wipe confirmation is only asked on a terminal. Piped input counts as
//! `--yes`.

use std::io::{self, BufRead, IsTerminal, Write};

use colored::Colorize;
use validator::ValidateEmail;

use crate::config::Settings;
use crate::db::establish_async_connection_pool;
use crate::error::{AppError, AppResult};
use crate::services::{AdminAccount, SeedReport, Seeder};

const MIN_PASSWORD_LEN: usize = 8;

/// Values given on the command line; `None` means "ask".
#[derive(Debug, Clone, Default)]
pub struct SeedArgs {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub yes: bool,
}

pub struct SeedCommandHandler {
    config: Settings,
}

impl SeedCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the seed against stdin/stdout. Always returns `Ok`.
    pub async fn execute(&self, args: SeedArgs) -> AppResult<()> {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        let mut input = stdin.lock();
        let mut output = io::stdout();

        match self.seed(args, interactive, &mut input, &mut output).await {
            Ok(Some(report)) => print_report(&report),
            Ok(None) => println!("{}", "Seed cancelled, nothing was changed.".yellow()),
            Err(e) => {
                tracing::error!(error = %e, "Seed failed");
                eprintln!("{} {}", "Seed failed:".red().bold(), e.to_string().red());
            }
        }

        Ok(())
    }

    /// `Ok(None)` when the operator declines the wipe.
    async fn seed<R: BufRead, W: Write>(
        &self,
        args: SeedArgs,
        interactive: bool,
        input: &mut R,
        output: &mut W,
    ) -> AppResult<Option<SeedReport>> {
        self.config.database.validate()?;
        self.config.password.validate()?;

        let admin = collect_admin(&args, input, output)?;
        if needs_confirmation(&args, interactive) {
            if !confirm_wipe(input, output)? {
                return Ok(None);
            }
        } else if !args.yes {
            tracing::info!("stdin is not a terminal, skipping the wipe confirmation");
        }

        let pool = establish_async_connection_pool(&self.config.database).await?;
        let report = Seeder::new(pool, self.config.password).run(admin).await?;
        Ok(Some(report))
    }
}

fn print_report(report: &SeedReport) {
    println!(
        "{} Removed {} theme(s) and {} user(s)",
        "✓".green(),
        report.deleted_themes,
        report.deleted_users
    );
    println!(
        "{} Created theme {} ({})",
        "✓".green(),
        report.theme.theme_id.bold(),
        report.theme.name
    );
    println!(
        "{} Created admin {} <{}>",
        "✓".green(),
        report.admin.name.bold(),
        report.admin.email
    );
    println!("{}", "Seed completed successfully".green().bold());
}

fn io_error(e: io::Error) -> AppError {
    AppError::Internal {
        source: anyhow::Error::from(e).context("Failed to read from the terminal"),
    }
}

/// Ask until `check` accepts the trimmed answer. EOF is an error.
fn prompt<R, W, F>(input: &mut R, output: &mut W, label: &str, check: F) -> AppResult<String>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Result<(), String>,
{
    loop {
        write!(output, "{} ", format!("{}:", label).cyan().bold()).map_err(io_error)?;
        output.flush().map_err(io_error)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(io_error)? == 0 {
            return Err(AppError::BadRequest {
                message: format!("No value entered for {}", label),
            });
        }

        let answer = line.trim();
        match check(answer) {
            Ok(()) => return Ok(answer.to_string()),
            Err(reason) => writeln!(output, "{}", reason.red()).map_err(io_error)?,
        }
    }
}

fn check_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        Err("Name cannot be empty".to_string())
    } else {
        Ok(())
    }
}

fn check_email(email: &str) -> Result<(), String> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(format!("'{}' is not a valid e-mail address", email))
    }
}

fn check_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ))
    } else {
        Ok(())
    }
}

/// Flag values are checked once; missing ones are prompted for.
fn collect_admin<R: BufRead, W: Write>(
    args: &SeedArgs,
    input: &mut R,
    output: &mut W,
) -> AppResult<AdminAccount> {
    let mut field = |value: &Option<String>,
                     key: &str,
                     label: &str,
                     check: fn(&str) -> Result<(), String>|
     -> AppResult<String> {
        match value {
            Some(v) => {
                let v = v.trim();
                check(v).map_err(|reason| AppError::Validation {
                    field: key.to_string(),
                    reason,
                })?;
                Ok(v.to_string())
            }
            None => prompt(input, output, label, check),
        }
    };

    Ok(AdminAccount {
        name: field(&args.name, "name", "Admin name", check_name)?,
        email: field(&args.email, "email", "Admin e-mail", check_email)?,
        password: field(&args.password, "password", "Admin password", check_password)?,
    })
}

fn needs_confirmation(args: &SeedArgs, interactive: bool) -> bool {
    interactive && !args.yes
}

fn confirm_wipe<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> AppResult<bool> {
    write!(
        output,
        "{} ",
        "This deletes every theme and user. Continue? [y/N]"
            .yellow()
            .bold()
    )
    .map_err(io_error)?;
    output.flush().map_err(io_error)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(io_error)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
