use crate::error::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::client::Client;
use kube::config::{Config, KubeConfigOptions};
use kube::Api;
use std::time::Duration;
use tokio::time;

#[async_trait]
pub trait CrdProvider {
    async fn get_crd(&self, name: &str) -> Result<CustomResourceDefinition>;
}

/// Builds a client from KUBECONFIG, ~/.kube/config or the in-cluster environment.
pub async fn connect(context: Option<String>) -> Result<Client> {
    let config = match context {
        Some(context) => {
            let options = KubeConfigOptions {
                context: Some(context),
                ..Default::default()
            };
            Config::from_kubeconfig(&options)
                .await
                .map_err(|e| Error::Connection(e.to_string()))?
        }
        None => Config::infer()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?,
    };
    tracing::debug!("Using cluster {}", config.cluster_url);
    Client::try_from(config).map_err(|e| Error::Connection(e.to_string()))
}

pub struct KubeCrdProvider {
    client: Client,
    timeout: Duration,
}

impl KubeCrdProvider {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl CrdProvider for KubeCrdProvider {
    async fn get_crd(&self, name: &str) -> Result<CustomResourceDefinition> {
        let api = Api::<CustomResourceDefinition>::all(self.client.clone());
        match time::timeout(self.timeout, api.get(name)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(Error::Fetch(format!(
                "timed out after {}s",
                self.timeout.as_secs_f64()
            ))),
        }
    }
}
