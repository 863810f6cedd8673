use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ConnectionError: {0}")]
    Connection(String),
    #[error("KubernetesClientError: {0}")]
    KubernetesClient(#[from] kube::Error),
    #[error("FetchError: {0}")]
    Fetch(String),
    #[error("SchemaNotFound: no schema for version {version} of CRD {crd}")]
    SchemaNotFound { crd: String, version: String },
    #[error("SerializationError: {0}")]
    SerializationYaml(#[from] serde_yaml::Error),
    #[error("SerializationError: {0}")]
    SerializationJson(#[from] serde_json::Error),
    #[error("PersistenceError: {0}")]
    Persistence(#[from] std::io::Error),
    #[error("Invalid manifest: {0}")]
    Manifest(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification used for status lines and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Connection,
    Fetch,
    SchemaNotFound,
    Serialization,
    Persistence,
    Startup,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Connection => "connection",
            FailureKind::Fetch => "fetch",
            FailureKind::SchemaNotFound => "schema_not_found",
            FailureKind::Serialization => "serialization",
            FailureKind::Persistence => "persistence",
            FailureKind::Startup => "startup",
        }
    }
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Connection(_) => FailureKind::Connection,
            Error::KubernetesClient(_) | Error::Fetch(_) => FailureKind::Fetch,
            Error::SchemaNotFound { .. } => FailureKind::SchemaNotFound,
            Error::SerializationYaml(_) | Error::SerializationJson(_) => {
                FailureKind::Serialization
            }
            Error::Persistence(_) => FailureKind::Persistence,
            Error::Manifest(_) | Error::InvalidArgument(_) => FailureKind::Startup,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
