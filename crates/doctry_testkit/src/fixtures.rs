//! Payload fixtures shared across workspace tests.

use doctry_client::Document;
use serde_json::json;

/// Builds a small user payload document with the given id.
pub fn user_document(id: &str, name: &str, age: u32) -> Document {
    Document::new(id, json!({ "name": name, "age": age }))
}

/// Builds `count` numbered documents with ids `"0"` through
/// `"count - 1"`, suitable for ordered batch assertions.
pub fn numbered_documents(count: usize) -> Vec<Document> {
    (0..count)
        .map(|n| Document::new(n.to_string(), json!({ "seq": n })))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_documents_are_ordered() {
        let docs = numbered_documents(3);
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].id(), Some("0"));
        assert_eq!(docs[2].id(), Some("2"));
        assert_eq!(docs[1].body()["seq"], 1);
    }
}
