use super::tree::page_lineage;
use anyhow::{Context, Result};
use log::debug;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Concatenate the pages of `documents`, in order, into a new document.
///
/// Each input is renumbered above the objects already taken, its page tree
/// is dropped and its pages are re-parented under a single new root.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    if documents.len() < 2 {
        anyhow::bail!(
            "At least 2 files are required to merge, got {}",
            documents.len()
        );
    }

    let mut merged = Document::with_version("1.5");
    let mut next_id = 1;
    let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();

    for (n, mut doc) in documents.into_iter().enumerate() {
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        let page_ids = doc.get_pages();
        debug!("Merging input {} with {} page(s)", n + 1, page_ids.len());

        for (num, page_id) in page_ids {
            let page = flattened_page(&doc, page_id)
                .with_context(|| format!("Failed to read input {} page {}", n + 1, num))?;
            pages.push((page_id, page));
        }

        for (object_id, object) in doc.objects {
            match object.type_name().unwrap_or(b"") {
                b"Catalog" | b"Pages" | b"Page" | b"Outlines" | b"Outline" => {}
                _ => {
                    merged.objects.insert(object_id, object);
                }
            }
        }
    }

    merged.max_id = next_id;
    let pages_id = merged.new_object_id();

    let mut kids = Vec::with_capacity(pages.len());
    for (page_id, mut page) in pages {
        page.set("Parent", Object::Reference(pages_id));
        merged.objects.insert(page_id, Object::Dictionary(page));
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ])),
    );

    let catalog_id = merged.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    merged.trailer.set("Root", Object::Reference(catalog_id));

    Ok(merged)
}

/// A copy of the page dictionary with inherited attributes pulled down from
/// its ancestors, since those ancestors are not carried into the merge.
fn flattened_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut page = doc.get_dictionary(page_id)?.clone();

    for ancestor_id in page_lineage(doc, page_id)?.into_iter().skip(1) {
        let node = doc.get_dictionary(ancestor_id)?;
        for key in INHERITABLE {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{make_parent_cycle, page_labels, sample_document};

    #[test]
    fn test_merge_requires_two_inputs() {
        assert!(merge_documents(vec![]).is_err());
        assert!(merge_documents(vec![sample_document(2)]).is_err());
    }

    #[test]
    fn test_merge_keeps_input_order() {
        let merged = merge_documents(vec![sample_document(2), sample_document(3)]).unwrap();
        assert_eq!(
            page_labels(&merged),
            vec!["Page 1", "Page 2", "Page 1", "Page 2", "Page 3"]
        );
    }

    #[test]
    fn test_merged_pages_inherit_attributes() {
        let merged = merge_documents(vec![sample_document(1), sample_document(1)]).unwrap();
        for page_id in merged.get_pages().into_values() {
            let page = merged.get_dictionary(page_id).unwrap();
            assert!(page.has(b"MediaBox"));
            assert!(page.has(b"Resources"));
        }
    }

    #[test]
    fn test_merged_document_round_trips() {
        let mut merged = merge_documents(vec![sample_document(2), sample_document(2)]).unwrap();
        let mut bytes = Vec::new();
        merged.save_to(&mut bytes).unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 4);
    }

    #[test]
    fn test_merge_rejects_parent_cycle() {
        let mut looped = sample_document(1);
        make_parent_cycle(&mut looped);

        let err = merge_documents(vec![looped, sample_document(1)]).unwrap_err();
        assert!(format!("{:#}", err).contains("cycle"));
    }
}
