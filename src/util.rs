use crate::error::{Error, Result};
use std::time::Duration;

pub static DEFAULT_CRDS: &[&str] = &[
    "hostedclusters.hypershift.openshift.io",
    "nodepools.hypershift.openshift.io",
];
pub static DEFAULT_VERSION: &str = "v1alpha1";
pub static DEFAULT_TIMEOUT: &str = "30s";

pub fn artifact_file_name(crd_name: &str) -> String {
    format!("{crd_name}_openapi_spec.yaml")
}

pub fn parse_timeout(input: &str) -> Result<Duration> {
    parse_duration::parse(input)
        .map_err(|e| Error::InvalidArgument(format!("Invalid timeout '{input}': {e}")))
}
