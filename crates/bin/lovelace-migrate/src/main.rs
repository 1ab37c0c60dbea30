//! # lovelace-migrate
//!
//! Composition root that wires the adapters together and runs one migration.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Install the `tracing` subscriber (stderr, so dry-run output stays clean)
//! - Select the states source (API URL, dump file, stdin) and credentials
//! - Construct the `MigrationService` with the YAML renderer and output sink
//! - Re-prompt for the password and retry when the API rejects the request
//! - Map the result to the process exit status
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod config;
mod input;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use lovelace_adapter_render_yaml::YamlRenderer;
use lovelace_adapter_source_http::Credentials;
use lovelace_adapter_writer_fs::OutputSink;
use lovelace_app::ports::WriteOutcome;
use lovelace_app::services::migration_service::{MigrationOptions, MigrationReport, MigrationService};
use lovelace_domain::filter::EntityFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::config::{Config, OutputConfig};
use crate::input::Input;

/// Total tries against an API that keeps rejecting the credentials.
const MAX_AUTH_ATTEMPTS: usize = 3;

/// Exit status when the password prompt is interrupted.
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Debug, thiserror::Error)]
#[error("password prompt interrupted")]
struct PromptInterrupted;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is::<PromptInterrupted>() => {
            eprintln!();
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_to(&mut config);
    config.validate()?;
    init_tracing(&config.logging.filter, cli.debug);

    let mut input = Input::select(
        &cli.input,
        &config.source,
        cli.targets_api(),
        Credentials::None,
    );
    if matches!(input, Input::Http(_)) {
        input = input.with_credentials(initial_credentials(cli)?);
    }

    let options = MigrationOptions {
        title: cli.title.clone(),
        default_title: config.migration.title.clone(),
        filter: EntityFilter::default()
            .exclude_domains(config.migration.exclude_domains.iter().cloned())
            .skip_hidden(config.migration.skip_hidden),
        domain_cards: config.migration.domain_cards,
    };

    let report = migrate(input, &options, &config.output, cli.dry_run)?;
    match &report.outcome {
        WriteOutcome::Written { path, backup } => tracing::info!(
            path = %path.display(),
            backup = ?backup,
            title = %report.title,
            views = report.views,
            "dashboard written"
        ),
        WriteOutcome::Printed => tracing::info!(
            title = %report.title,
            views = report.views,
            "dry run, nothing written"
        ),
    }
    Ok(())
}

/// Run the migration, prompting for a new password after an auth failure.
fn migrate(
    mut input: Input,
    options: &MigrationOptions,
    output: &OutputConfig,
    dry_run: bool,
) -> anyhow::Result<MigrationReport> {
    let mut attempt = 1;
    loop {
        let sink = OutputSink::new(&output.path, &output.backup_suffix, dry_run);
        let mut service = MigrationService::new(input.clone(), YamlRenderer, sink, options.clone());
        match service.run() {
            Ok(report) => return Ok(report),
            Err(err) if err.is_auth() && attempt < MAX_AUTH_ATTEMPTS => {
                tracing::warn!(attempt, error = %err, "authentication required");
                input = input.with_credentials(Credentials::Password(prompt_password()?));
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Token wins over password; `-p` without a value prompts.
fn initial_credentials(cli: &Cli) -> anyhow::Result<Credentials> {
    if let Some(token) = cli.token.as_deref().filter(|token| !token.is_empty()) {
        return Ok(Credentials::Token(token.to_string()));
    }
    match cli.password.as_deref() {
        None => Ok(Credentials::None),
        Some("") => Ok(Credentials::Password(prompt_password()?)),
        Some(password) => Ok(Credentials::Password(password.to_string())),
    }
}

fn prompt_password() -> anyhow::Result<String> {
    match rpassword::prompt_password("Enter password: ") {
        Ok(password) => Ok(password),
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof
            ) =>
        {
            Err(PromptInterrupted.into())
        }
        Err(err) => Err(anyhow::Error::new(err).context("failed to read password")),
    }
}

/// `RUST_LOG` wins, then `--debug`, then the configured filter.
fn init_tracing(filter: &str, debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(filter)
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}
