use crate::error::FailureKind;
use lazy_static::lazy_static;
use prometheus_client::{
    encoding::{text::encode, EncodeLabelSet},
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};
use std::path::Path;
use tokio::sync::Mutex;

lazy_static! {
    static ref REGISTRY: Mutex<Registry> = Mutex::new(<Registry>::default());
    pub static ref NUM_CONVERSIONS_SUCCEEDED: Family<CrdLabels, Counter> =
        Family::<CrdLabels, Counter>::default();
    pub static ref NUM_CONVERSIONS_FAILED: Family<FailureLabels, Counter> =
        Family::<FailureLabels, Counter>::default();
}

#[derive(Clone, Hash, PartialEq, Eq, EncodeLabelSet, Debug)]
pub struct CrdLabels {
    pub crd: String,
}

#[derive(Clone, Hash, PartialEq, Eq, EncodeLabelSet, Debug)]
pub struct FailureLabels {
    pub crd: String,
    pub reason: String,
}

pub fn l(crd: &str) -> CrdLabels {
    CrdLabels {
        crd: crd.to_owned(),
    }
}

pub fn failure(crd: &str, kind: FailureKind) -> FailureLabels {
    FailureLabels {
        crd: crd.to_owned(),
        reason: kind.as_str().to_owned(),
    }
}

pub async fn init_metrics() {
    let base = "crd_openapi";
    let mut registry = REGISTRY.lock().await;
    registry.register(
        format!("{base}_conversions_succeeded"),
        "Number of CRDs converted and written",
        NUM_CONVERSIONS_SUCCEEDED.clone(),
    );
    registry.register(
        format!("{base}_conversions_failed"),
        "Number of CRDs skipped because of an error",
        NUM_CONVERSIONS_FAILED.clone(),
    );
}

pub async fn metrics() -> Result<String, std::fmt::Error> {
    let mut buffer = String::new();
    let registry = REGISTRY.lock().await;
    encode(&mut buffer, &registry)?;
    Ok(buffer)
}

/// Writes the current metrics in text format, for node-exporter style textfile collection.
pub async fn write_metrics(path: &Path) {
    match metrics().await {
        Ok(body) => {
            if let Err(e) = std::fs::write(path, body) {
                tracing::error!("Could not write metrics to {}: {e}", path.display());
            }
        }
        Err(e) => tracing::error!("Failed to generate metrics: {e}"),
    }
}
