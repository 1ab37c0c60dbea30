//! Migration service: one full run from states snapshot to written dashboard.

use lovelace_domain::error::MigrateError;
use lovelace_domain::filter::EntityFilter;
use lovelace_domain::naming::{DEFAULT_TITLE, resolve_title};
use lovelace_domain::snapshot::Snapshot;
use lovelace_domain::warning::UnresolvedGroupWarning;

use crate::builder::build;
use crate::classifier::{ClassifyOptions, classify};
use crate::ports::{DocumentRenderer, DocumentSink, StatesSource, WriteOutcome};

/// Settings for a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Explicit dashboard title; wins over the fetched location name.
    pub title: Option<String>,
    /// Title used when neither the override nor the location name is usable.
    pub default_title: String,
    pub filter: EntityFilter,
    pub domain_cards: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            title: None,
            default_title: DEFAULT_TITLE.to_string(),
            filter: EntityFilter::default(),
            domain_cards: true,
        }
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub title: String,
    /// Entities kept after filtering.
    pub entities: usize,
    /// Entities removed by the filter.
    pub excluded: usize,
    pub views: usize,
    pub cards: usize,
    pub warnings: Vec<UnresolvedGroupWarning>,
    pub outcome: WriteOutcome,
}

/// Runs the migration pipeline against the given ports.
pub struct MigrationService<S, R, W> {
    source: S,
    renderer: R,
    sink: W,
    options: MigrationOptions,
}

impl<S, R, W> MigrationService<S, R, W>
where
    S: StatesSource,
    R: DocumentRenderer,
    W: DocumentSink,
{
    pub fn new(source: S, renderer: R, sink: W, options: MigrationOptions) -> Self {
        Self {
            source,
            renderer,
            sink,
            options,
        }
    }

    /// Fetch, classify, build, render and write.
    ///
    /// Group resolution problems do not fail the run; they are returned in
    /// [`MigrationReport::warnings`].
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError`] when the snapshot cannot be acquired or is
    /// malformed, or when rendering or writing fails. Nothing is written
    /// unless every earlier step succeeded.
    #[tracing::instrument(skip(self), fields(source = %self.source.describe()))]
    pub fn run(&mut self) -> Result<MigrationReport, MigrateError> {
        let payload = self.source.fetch_states()?;
        let snapshot = Snapshot::from_json(&payload)?.filtered(&self.options.filter);
        tracing::info!(
            entities = snapshot.len(),
            excluded = snapshot.excluded_count(),
            "snapshot loaded"
        );

        let title = self.resolve_title()?;
        let classification = classify(
            &snapshot,
            ClassifyOptions {
                domain_cards: self.options.domain_cards,
            },
        );
        let configuration = build(&snapshot, &classification, &title);
        let document = self.renderer.render(&configuration)?;
        let outcome = self.sink.write(&document)?;

        let report = MigrationReport {
            title,
            entities: snapshot.len(),
            excluded: snapshot.excluded_count(),
            views: configuration.views.len(),
            cards: configuration.cards().count(),
            warnings: classification.warnings,
            outcome,
        };
        tracing::info!(
            views = report.views,
            cards = report.cards,
            warnings = report.warnings.len(),
            "migration complete"
        );
        Ok(report)
    }

    fn resolve_title(&self) -> Result<String, MigrateError> {
        let location = if self.options.title.is_some() {
            None
        } else {
            match self.source.fetch_location_name() {
                Ok(name) => name,
                Err(err) if err.is_auth() => return Err(err.into()),
                Err(err) => {
                    tracing::warn!(error = %err, "could not fetch location name");
                    None
                }
            }
        };

        let title = resolve_title([
            self.options.title.as_deref(),
            location.as_deref(),
            Some(self.options.default_title.as_str()),
        ])
        .unwrap_or(DEFAULT_TITLE);
        Ok(title.to_string())
    }
}
