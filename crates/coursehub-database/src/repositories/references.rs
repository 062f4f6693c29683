//! Read-side expansion of links between collections.
//!
//! Each helper issues one batched lookup per call, however many documents
//! are being expanded.

use std::collections::HashMap;

use serde_json::Value;

use coursehub_core::result::AppResult;
use coursehub_core::traits::{Document, DocumentStore};
use coursehub_core::types::filter::scalar_text;
use coursehub_core::types::{Collection, Predicate};

/// Replace id links in `field` with the documents they name.
///
/// The field may hold a single id or an array of ids. Missing targets
/// become `null` for single links and are dropped from arrays; values
/// that are not id strings are left as they are.
pub async fn embed_by_id(
    store: &dyn DocumentStore,
    target: Collection,
    docs: &mut [Document],
    field: &str,
) -> AppResult<()> {
    let mut ids: Vec<String> = Vec::new();
    for doc in docs.iter() {
        match doc.get(field) {
            Some(Value::String(id)) => ids.push(id.clone()),
            Some(Value::Array(items)) => {
                ids.extend(items.iter().filter_map(Value::as_str).map(str::to_string));
            }
            _ => {}
        }
    }
    ids.sort();
    ids.dedup();
    if ids.is_empty() {
        return Ok(());
    }

    let lookup = index_by(store, target, "id", ids).await?;

    for doc in docs.iter_mut() {
        let Some(value) = doc.get_mut(field) else {
            continue;
        };
        match value {
            Value::String(id) => {
                *value = lookup.get(id.as_str()).cloned().unwrap_or(Value::Null);
            }
            Value::Array(items) => {
                let resolved = std::mem::take(items)
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(id) => lookup.get(id.as_str()).cloned(),
                        other => Some(other),
                    })
                    .collect();
                *items = resolved;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Attach to each document, under `into`, the target whose `foreign`
/// field equals the document's `local` field. Documents with no match are
/// left without `into`.
pub async fn embed_by_key(
    store: &dyn DocumentStore,
    target: Collection,
    docs: &mut [Document],
    local: &str,
    foreign: &str,
    into: &str,
) -> AppResult<()> {
    let mut keys: Vec<String> = docs
        .iter()
        .filter_map(|doc| doc.get(local).and_then(scalar_text))
        .collect();
    keys.sort();
    keys.dedup();
    if keys.is_empty() {
        return Ok(());
    }

    let lookup = index_by(store, target, foreign, keys).await?;

    for doc in docs.iter_mut() {
        let found = doc
            .get(local)
            .and_then(scalar_text)
            .and_then(|key| lookup.get(&key).cloned());
        if let (Some(found), Some(object)) = (found, doc.as_object_mut()) {
            object.insert(into.to_string(), found);
        }
    }
    Ok(())
}

async fn index_by(
    store: &dyn DocumentStore,
    target: Collection,
    field: &str,
    keys: Vec<String>,
) -> AppResult<HashMap<String, Document>> {
    let filter = Predicate::In {
        field: field.to_string(),
        values: keys.into_iter().map(Value::String).collect(),
    };
    let found = store.find(target, &filter, None).await?;
    let mut index = HashMap::with_capacity(found.len());
    for doc in found {
        if let Some(key) = doc.get(field).and_then(scalar_text) {
            index.entry(key).or_insert(doc);
        }
    }
    Ok(index)
}
