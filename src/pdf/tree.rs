use anyhow::{anyhow, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeSet;

/// The page followed by its ancestors in the page tree, nearest first.
///
/// A `/Parent` chain that loops back on itself is an error. A chain that
/// ends in a missing or non-dictionary object simply stops there.
pub fn page_lineage(doc: &Document, page_id: ObjectId) -> Result<Vec<ObjectId>> {
    let mut lineage = vec![page_id];
    let mut visited = BTreeSet::from([page_id]);
    let mut current = page_id;

    while let Some(parent_id) = doc
        .get_dictionary(current)
        .ok()
        .and_then(|node| node.get(b"Parent").and_then(Object::as_reference).ok())
    {
        if !visited.insert(parent_id) {
            return Err(anyhow!(
                "Page tree cycle: object {} {} is its own ancestor",
                parent_id.0,
                parent_id.1
            ));
        }
        if doc.get_dictionary(parent_id).is_err() {
            break;
        }
        lineage.push(parent_id);
        current = parent_id;
    }

    Ok(lineage)
}

/// Look `key` up on the page, falling back to the nearest ancestor that
/// defines it.
pub fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    for node_id in page_lineage(doc, page_id)? {
        if let Ok(value) = doc.get_dictionary(node_id).and_then(|node| node.get(key)) {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// An owned copy of `object` as a dictionary, following one reference.
pub fn resolve_dictionary(doc: &Document, object: &Object) -> Option<Dictionary> {
    match object {
        Object::Dictionary(dict) => Some(dict.clone()),
        Object::Reference(id) => doc.get_dictionary(*id).ok().cloned(),
        _ => None,
    }
}
