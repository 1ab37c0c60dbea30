//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use lovelace_adapter_source_file::STDIN_ARG;

use crate::config::Config;

/// Migrate a Home Assistant states snapshot to a Lovelace dashboard.
///
/// Reads the entity states from the REST API, a JSON dump, or standard
/// input, and writes `ui-lovelace.yaml`. The previous file is kept as a
/// backup.
#[derive(Debug, Parser)]
#[command(name = "lovelace-migrate", version, about, long_about = None)]
pub struct Cli {
    /// API base URL (`http://hass.local:8123/api`), states dump, or `-` for stdin.
    #[arg(value_name = "API-URL|FILE", default_value = STDIN_ARG)]
    pub input: String,

    /// Dashboard title (defaults to the configured location name).
    #[arg(short, long)]
    pub title: Option<String>,

    /// Output file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the dashboard instead of writing it.
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,

    /// API password; prompts when given without a value.
    #[arg(
        short,
        long,
        num_args = 0..=1,
        default_missing_value = "",
        env = "LOVELACE_MIGRATE_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Long-lived access token (sent as a bearer token).
    #[arg(long, env = "LOVELACE_MIGRATE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// API scheme.
    #[arg(long)]
    pub scheme: Option<String>,

    /// API host.
    #[arg(long)]
    pub host: Option<String>,

    /// API port.
    #[arg(long)]
    pub port: Option<u16>,

    /// API path prefix.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Configuration file (defaults to `./lovelace-migrate.toml` if present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Leave out every entity of this domain (repeatable).
    #[arg(long = "exclude-domain", value_name = "DOMAIN")]
    pub exclude_domains: Vec<String>,

    /// Keep entities marked `hidden`.
    #[arg(long)]
    pub include_hidden: bool,

    /// List cameras, media players, plants and weather in entities cards.
    #[arg(long)]
    pub no_domain_cards: bool,
}

impl Cli {
    /// Whether any API location flag was given.
    #[must_use]
    pub fn targets_api(&self) -> bool {
        self.scheme.is_some() || self.host.is_some() || self.port.is_some() || self.endpoint.is_some()
    }

    /// Layer the flags over the file and environment configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(scheme) = &self.scheme {
            config.source.scheme.clone_from(scheme);
        }
        if let Some(host) = &self.host {
            config.source.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.source.port = port;
        }
        if let Some(endpoint) = &self.endpoint {
            config.source.endpoint.clone_from(endpoint);
        }
        if let Some(output) = &self.output {
            config.output.path.clone_from(output);
        }
        config
            .migration
            .exclude_domains
            .extend(self.exclude_domains.iter().cloned());
        if self.include_hidden {
            config.migration.skip_hidden = false;
        }
        if self.no_domain_cards {
            config.migration.domain_cards = false;
        }
    }
}
