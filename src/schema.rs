use crate::crd::{CrdDefinition, SchemaDocument};
use crate::error::{Error, Result};

/// Returns the schema of the first version entry labelled `version`.
///
/// Later entries with the same label are never consulted. A matching entry
/// without a schema counts as not found.
pub fn select_schema<'a>(crd: &'a CrdDefinition, version: &str) -> Result<&'a SchemaDocument> {
    crd.versions
        .iter()
        .find(|entry| entry.name == version)
        .and_then(|entry| entry.schema.as_ref())
        .ok_or_else(|| Error::SchemaNotFound {
            crd: crd.name.clone(),
            version: version.to_owned(),
        })
}

/// Version labels that occur more than once, in order of their first repeat.
pub fn duplicate_versions(crd: &CrdDefinition) -> Vec<&str> {
    let mut duplicates: Vec<&str> = Vec::new();
    for (i, entry) in crd.versions.iter().enumerate() {
        let label = entry.name.as_str();
        if crd.versions[..i].iter().any(|e| e.name == label) && !duplicates.contains(&label) {
            duplicates.push(label);
        }
    }
    duplicates
}
