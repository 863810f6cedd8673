use crate::crd::SchemaDocument;
use crate::error::Result;
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const OPENAPI_VERSION: &str = "3.0.0";
pub const INFO_TITLE: &str = "Generated API for CRD";
pub const INFO_VERSION: &str = "1.0.0";

/// Minimal OpenAPI 3.0 document used purely as a container for one schema.
///
/// Field order is the serialized key order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub paths: BTreeMap<String, Value>,
    pub components: Components,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Info {
    pub title: String,
    pub version: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Components {
    pub schemas: BTreeMap<String, SchemaDocument>,
}

pub fn build_document(crd_name: &str, schema: &SchemaDocument) -> OpenApiDocument {
    OpenApiDocument {
        openapi: OPENAPI_VERSION.to_owned(),
        info: Info {
            title: INFO_TITLE.to_owned(),
            version: INFO_VERSION.to_owned(),
        },
        paths: BTreeMap::new(),
        components: Components {
            schemas: BTreeMap::from([(crd_name.to_owned(), schema.clone())]),
        },
    }
}

pub fn serialize(doc: &OpenApiDocument) -> Result<String> {
    Ok(serde_yaml::to_string(doc)?)
}
