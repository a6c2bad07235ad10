//! Schema-driven field projection.
//!
//! The projector is computed once per (full, lite) pairing: the indexed field
//! set is the lite schema's declared field list minus [`SYSTEM_FIELDS`].
//! Field values move between representations by JSON name lookup, which
//! deliberately tolerates schema drift — a declared field missing from a
//! given full record is skipped, not an error.

use crate::error::{ModelError, ModelResult};
use crate::meta::{RecordMeta, SYSTEM_FIELDS};
use crate::record::FullRecord;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Projects full records onto their lite counterparts.
pub struct FieldProjector<F: FullRecord> {
    indexed: Vec<&'static str>,
    _full: PhantomData<F>,
}

impl<F: FullRecord> FieldProjector<F> {
    /// Computes the indexed field set for the pairing.
    #[must_use]
    pub fn new() -> Self {
        let indexed = <F::Lite as crate::LiteRecord>::FIELDS
            .iter()
            .copied()
            .filter(|name| !SYSTEM_FIELDS.contains(name))
            .collect();
        Self {
            indexed,
            _full: PhantomData,
        }
    }

    /// The indexed field set: lite schema fields minus system-managed ones.
    #[must_use]
    pub fn indexed_fields(&self) -> &[&'static str] {
        &self.indexed
    }

    /// Extracts the indexed field values from a full record as a JSON map.
    ///
    /// Fields the full record does not carry (or carries as `null`) are
    /// omitted from the result.
    pub fn indexed_values(&self, full: &F) -> ModelResult<Map<String, Value>> {
        let source = to_object(full)?;
        let mut out = Map::new();
        for name in &self.indexed {
            if let Some(value) = source.get(*name) {
                if !value.is_null() {
                    out.insert((*name).to_string(), value.clone());
                }
            }
        }
        Ok(out)
    }

    /// Builds the lite record for a full record: identity (when present)
    /// plus every indexed field the full record carries.
    pub fn project(&self, full: &F) -> ModelResult<F::Lite> {
        let mut fields = self.indexed_values(full)?;
        if let Some(id) = full.meta().id {
            fields.insert("id".to_string(), serde_json::to_value(id)?);
        }
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

impl<F: FullRecord> Default for FieldProjector<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Merges system metadata and an indexed-field map into a typed record.
///
/// Used to materialize lite records from indexed rows, and full records for
/// full-fidelity pairings. Metadata keys win over field keys of the same name.
pub fn assemble<T: DeserializeOwned>(
    meta: &RecordMeta,
    fields: &Map<String, Value>,
) -> ModelResult<T> {
    let mut merged = fields.clone();
    if let Value::Object(meta_map) = serde_json::to_value(meta)? {
        for (key, value) in meta_map {
            merged.insert(key, value);
        }
    }
    Ok(serde_json::from_value(Value::Object(merged))?)
}

/// Applies a by-name patch to a record, returning the patched copy.
///
/// System-managed fields in the patch are ignored: identity and audit stamps
/// belong to the storage layer. Patch keys unknown to the record's schema are
/// dropped during deserialization, mirroring the indexed-field tolerance.
pub fn apply_patch<T: FullRecord>(record: &T, patch: &Map<String, Value>) -> ModelResult<T> {
    let mut merged = to_object(record)?;
    for (key, value) in patch {
        if SYSTEM_FIELDS.contains(&key.as_str()) {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }
    Ok(serde_json::from_value(Value::Object(merged))?)
}

fn to_object<T: serde::Serialize>(record: &T) -> ModelResult<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(ModelError::Projection(format!(
            "record serialized to {other:?}, expected a JSON object"
        ))),
    }
}
