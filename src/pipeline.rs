use crate::crd::CrdDefinition;
use crate::error::{Error, FailureKind, Result};
use crate::k8sclient::CrdProvider;
use crate::metrics::{failure, l, NUM_CONVERSIONS_FAILED, NUM_CONVERSIONS_SUCCEEDED};
use crate::openapi::{build_document, serialize};
use crate::schema::{duplicate_versions, select_schema};
use crate::sink::ArtifactSink;
use crate::util::artifact_file_name;
use std::fmt;
use std::path::PathBuf;

pub struct BatchConfig {
    /// names of the CRDs to convert, processed in order
    pub crds: Vec<String>,
    /// version label whose schema is extracted
    pub version: String,
}

#[derive(Debug)]
pub enum ItemOutcome {
    Written { crd: String, path: PathBuf },
    Skipped { crd: String, reason: Error },
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemOutcome::Written { crd, path } => write!(
                f,
                "OpenAPI spec for {crd} created successfully at {}.",
                path.display()
            ),
            ItemOutcome::Skipped { crd, reason } => match reason {
                Error::SchemaNotFound { version, .. } => {
                    write!(f, "Schema not found for version {version} of CRD: {crd}")
                }
                _ => match reason.kind() {
                    FailureKind::Fetch => write!(f, "Failed to fetch CRD {crd}: {reason}"),
                    FailureKind::Serialization => {
                        write!(f, "Failed to marshal OpenAPI spec for {crd}: {reason}")
                    }
                    FailureKind::Persistence => {
                        write!(f, "Failed to write OpenAPI spec for {crd}: {reason}")
                    }
                    _ => write!(f, "Failed to process CRD {crd}: {reason}"),
                },
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct Report {
    pub outcomes: Vec<ItemOutcome>,
}

impl Report {
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Written { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.written()
    }
}

/// Selects the schema for `version` and renders the OpenAPI document as YAML.
pub fn render_document(crd: &CrdDefinition, version: &str) -> Result<String> {
    for duplicate in duplicate_versions(crd) {
        tracing::warn!(
            "CRD {} lists version {duplicate} more than once, using the first entry",
            crd.name
        );
    }
    let schema = select_schema(crd, version)?;
    let doc = build_document(&crd.name, schema);
    serialize(&doc)
}

/// Runs the whole conversion for one CRD, from lookup to persisted file.
pub async fn convert_crd(
    provider: &impl CrdProvider,
    sink: &impl ArtifactSink,
    name: &str,
    version: &str,
) -> Result<PathBuf> {
    let crd = provider.get_crd(name).await?;
    let mut definition = CrdDefinition::try_from(&crd)?;
    // documents are always keyed by the requested name
    definition.name = name.to_owned();
    let data = render_document(&definition, version)?;
    let path = sink.persist(&artifact_file_name(name), data.as_bytes())?;
    Ok(path)
}

/// Processes every CRD of the worklist. Failures are recorded per item and never abort the batch.
///
/// `on_outcome` sees each outcome as soon as its CRD is done.
pub async fn run_batch(
    provider: &impl CrdProvider,
    sink: &impl ArtifactSink,
    config: &BatchConfig,
    mut on_outcome: impl FnMut(&ItemOutcome),
) -> Report {
    let mut report = Report::default();
    for name in &config.crds {
        tracing::info!("Converting CRD {name} at version {}", config.version);
        let outcome = match convert_crd(provider, sink, name, &config.version).await {
            Ok(path) => {
                NUM_CONVERSIONS_SUCCEEDED.get_or_create(&l(name)).inc();
                ItemOutcome::Written {
                    crd: name.clone(),
                    path,
                }
            }
            Err(reason) => {
                NUM_CONVERSIONS_FAILED
                    .get_or_create(&failure(name, reason.kind()))
                    .inc();
                tracing::debug!("Skipping CRD {name}: {reason:?}");
                ItemOutcome::Skipped {
                    crd: name.clone(),
                    reason,
                }
            }
        };
        on_outcome(&outcome);
        report.outcomes.push(outcome);
    }
    tracing::info!(
        "Finished conversion: {} written, {} skipped",
        report.written(),
        report.skipped()
    );
    report
}
