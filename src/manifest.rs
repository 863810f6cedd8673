use crate::error::{Error, Result};
use crate::k8sclient::CrdProvider;
use async_trait::async_trait;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::ResourceExt;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

const CRD_KIND: &str = "CustomResourceDefinition";
const CRD_API_VERSION: &str = "apiextensions.k8s.io/v1";
const LIST_KIND: &str = "List";

/// Serves CRDs read from local manifest files instead of a cluster.
#[derive(Default)]
pub struct ManifestCrdProvider {
    crds: HashMap<String, CustomResourceDefinition>,
}

impl ManifestCrdProvider {
    pub fn from_files(paths: &[impl AsRef<Path>]) -> Result<Self> {
        let mut provider = Self::default();
        for path in paths {
            let path = path.as_ref();
            let data = std::fs::read_to_string(path)
                .map_err(|e| Error::Manifest(format!("{}: {e}", path.display())))?;
            provider
                .load_str(&data)
                .map_err(|e| Error::Manifest(format!("{}: {e}", path.display())))?;
        }
        Ok(provider)
    }

    /// Adds every CRD contained in a (possibly multi-document) YAML string.
    pub fn load_str(&mut self, data: &str) -> Result<()> {
        for document in serde_yaml::Deserializer::from_str(data) {
            let value = Value::deserialize(document)?;
            self.load_value(value)?;
        }
        Ok(())
    }

    fn load_value(&mut self, value: Value) -> Result<()> {
        match value.get("kind").and_then(Value::as_str) {
            Some(CRD_KIND) => {
                let api_version = value.get("apiVersion").and_then(Value::as_str);
                if api_version != Some(CRD_API_VERSION) {
                    tracing::warn!(
                        "Ignoring CRD {} with unsupported apiVersion {}",
                        value["metadata"]["name"].as_str().unwrap_or("<unnamed>"),
                        api_version.unwrap_or("<none>")
                    );
                    return Ok(());
                }
                let crd: CustomResourceDefinition = serde_json::from_value(value)?;
                let name = crd.name_any();
                if self.crds.insert(name.clone(), crd).is_some() {
                    tracing::warn!("CRD {name} defined more than once, using the last definition");
                }
            }
            Some(LIST_KIND) => {
                if let Some(Value::Array(items)) = value.get("items") {
                    for item in items.clone() {
                        self.load_value(item)?;
                    }
                }
            }
            Some(kind) => tracing::debug!("Ignoring manifest document of kind {kind}"),
            None => {
                if !value.is_null() {
                    tracing::debug!("Ignoring manifest document without kind");
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.crds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crds.is_empty()
    }
}

#[async_trait]
impl CrdProvider for ManifestCrdProvider {
    async fn get_crd(&self, name: &str) -> Result<CustomResourceDefinition> {
        self.crds
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Fetch(format!("CRD {name} not found in manifests")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MANIFEST: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.io
spec:
  group: example.io
  names:
    kind: Widget
    plural: widgets
  scope: Namespaced
  versions:
    - name: v1alpha1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
            foo:
              type: string
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: unrelated
---
apiVersion: v1
kind: List
items:
  - apiVersion: apiextensions.k8s.io/v1
    kind: CustomResourceDefinition
    metadata:
      name: gadgets.example.io
    spec:
      group: example.io
      names:
        kind: Gadget
        plural: gadgets
      scope: Cluster
      versions:
        - name: v1
          served: true
          storage: true
"#;

    #[tokio::test]
    async fn test_load_multi_document_manifest() {
        let mut provider = ManifestCrdProvider::default();
        provider.load_str(MANIFEST).unwrap();
        assert_eq!(provider.len(), 2);

        let crd = provider.get_crd("widgets.example.io").await.unwrap();
        assert_eq!(crd.spec.versions[0].name, "v1alpha1");
        let crd = provider.get_crd("gadgets.example.io").await.unwrap();
        assert_eq!(crd.spec.versions[0].name, "v1");
    }

    #[tokio::test]
    async fn test_missing_crd_is_fetch_error() {
        let provider = ManifestCrdProvider::default();
        let result = provider.get_crd("widgets.example.io").await;
        assert!(matches!(result, Err(Error::Fetch(_))));
    }

    #[test]
    fn test_from_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();
        let provider = ManifestCrdProvider::from_files(&[file.path()]).unwrap();
        assert_eq!(provider.len(), 2);
    }

    #[test]
    fn test_from_missing_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = ManifestCrdProvider::from_files(&[dir.path().join("missing.yaml")]);
        assert!(matches!(result, Err(Error::Manifest(_))));
    }

    #[test]
    fn test_invalid_crd_document_fails() {
        let mut provider = ManifestCrdProvider::default();
        let result = provider.load_str(
            "apiVersion: apiextensions.k8s.io/v1\nkind: CustomResourceDefinition\nspec: 3\n",
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_legacy_crd_versions_are_skipped() {
        let legacy = r#"
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: legacies.example.io
spec:
  group: example.io
  version: v1alpha1
  names:
    kind: Legacy
    plural: legacies
  scope: Namespaced
---
"#;
        let mut provider = ManifestCrdProvider::default();
        provider.load_str(&format!("{legacy}{MANIFEST}")).unwrap();

        assert_eq!(provider.len(), 2);
        assert!(provider.get_crd("widgets.example.io").await.is_ok());
        assert!(matches!(
            provider.get_crd("legacies.example.io").await,
            Err(Error::Fetch(_))
        ));
    }
}
