mod crd;
mod error;
mod k8sclient;
mod manifest;
mod metrics;
mod openapi;
mod pipeline;
mod schema;
mod sink;
mod util;

use argh::FromArgs;
use error::Result;
use k8sclient::KubeCrdProvider;
use manifest::ManifestCrdProvider;
use pipeline::{run_batch, BatchConfig, Report};
use sink::DirectorySink;
use std::path::PathBuf;
use tracing_subscriber::{prelude::*, EnvFilter};
use util::{parse_timeout, DEFAULT_CRDS, DEFAULT_TIMEOUT, DEFAULT_VERSION};

#[derive(FromArgs)]
/// Generate standalone OpenAPI 3.0 documents from CustomResourceDefinition schemas.
struct Args {
    /// name of a CRD to convert, may be repeated (defaults to the hypershift CRDs)
    #[argh(option)]
    crd: Vec<String>,
    /// API version whose schema is extracted
    #[argh(option, default = "DEFAULT_VERSION.to_owned()")]
    api_version: String,
    /// directory the documents are written to
    #[argh(option, default = "PathBuf::from(\".\")")]
    output_dir: PathBuf,
    /// kubeconfig context to use instead of the current one
    #[argh(option)]
    context: Option<String>,
    /// timeout for each CRD lookup, e.g. 30s or 1m
    #[argh(option, default = "DEFAULT_TIMEOUT.to_owned()")]
    timeout: String,
    /// read CRDs from this manifest file instead of a cluster, may be repeated
    #[argh(option)]
    manifest: Vec<PathBuf>,
    /// write metrics of this run to the given file
    #[argh(option)]
    metrics_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();
    let args: Args = argh::from_env();
    metrics::init_metrics().await;

    let report = match run(&args).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };
    tracing::debug!(
        "{} of {} CRDs converted",
        report.written(),
        report.outcomes.len()
    );
    if let Some(path) = args.metrics_file.as_ref() {
        metrics::write_metrics(path).await;
    }
}

async fn run(args: &Args) -> Result<Report> {
    let config = BatchConfig {
        crds: if args.crd.is_empty() {
            DEFAULT_CRDS.iter().map(|name| name.to_string()).collect()
        } else {
            args.crd.clone()
        },
        version: args.api_version.clone(),
    };
    let sink = DirectorySink::new(&args.output_dir);

    if args.manifest.is_empty() {
        let timeout = parse_timeout(&args.timeout)?;
        let client = k8sclient::connect(args.context.clone()).await?;
        let provider = KubeCrdProvider::new(client, timeout);
        Ok(run_batch(&provider, &sink, &config, print_outcome).await)
    } else {
        let provider = ManifestCrdProvider::from_files(args.manifest.as_slice())?;
        if provider.is_empty() {
            tracing::warn!("No CustomResourceDefinitions found in the given manifests");
        } else {
            tracing::info!("Loaded {} CustomResourceDefinitions from manifests", provider.len());
        }
        Ok(run_batch(&provider, &sink, &config, print_outcome).await)
    }
}

fn print_outcome(outcome: &pipeline::ItemOutcome) {
    println!("{outcome}");
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("Could not init logging");

    let subscriber = tracing_subscriber::registry().with(filter);

    // stdout is reserved for status lines
    let log_mode = std::env::var("LOGGING_MODE").unwrap_or_else(|_| "plain".to_string());
    if log_mode.to_lowercase() == "json" {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::from_args(&["crd-openapi-gen"], &[]).unwrap();
        assert!(args.crd.is_empty());
        assert_eq!(args.api_version, "v1alpha1");
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!(args.timeout, "30s");
        assert!(args.manifest.is_empty());
    }

    #[test]
    fn test_args_repeated_crds() {
        let args = Args::from_args(
            &["crd-openapi-gen"],
            &[
                "--crd",
                "widgets.example.io",
                "--crd",
                "gadgets.example.io",
                "--api-version",
                "v1",
            ],
        )
        .unwrap();
        assert_eq!(args.crd, vec!["widgets.example.io", "gadgets.example.io"]);
        assert_eq!(args.api_version, "v1");
    }
}
