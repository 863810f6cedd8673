use crate::error::Result;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::ResourceExt;
use serde_json::Value;

/// Schema of a single CRD version. Treated as opaque and copied verbatim.
pub type SchemaDocument = Value;

#[derive(Debug, Clone, PartialEq)]
pub struct CrdDefinition {
    pub name: String,
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VersionEntry {
    /// version label, e.g. v1alpha1
    pub name: String,
    /// openAPIV3Schema of the version, if any is attached
    pub schema: Option<SchemaDocument>,
}

impl TryFrom<&CustomResourceDefinition> for CrdDefinition {
    type Error = crate::error::Error;

    fn try_from(crd: &CustomResourceDefinition) -> Result<Self> {
        let versions = crd
            .spec
            .versions
            .iter()
            .map(|version| -> Result<VersionEntry> {
                let schema = version
                    .schema
                    .as_ref()
                    .and_then(|s| s.open_api_v3_schema.as_ref())
                    .map(serde_json::to_value)
                    .transpose()?;
                Ok(VersionEntry {
                    name: version.name.clone(),
                    schema,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(CrdDefinition {
            name: crd.name_any(),
            versions,
        })
    }
}
