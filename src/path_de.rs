use serde::de::DeserializeOwned;

/// Deserialize with JSON-path context in error messages.
pub fn from_value_with_path<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, String> {
    match serde_path_to_error::deserialize::<_, T>(value) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Document;
    use serde_json::json;

    #[test]
    fn reports_path_of_bad_node() {
        let err = from_value_with_path::<Document>(json!({
            "package": "demo",
            "structs": [{
                "name": "Person",
                "fields": [
                    { "name": "ok", "type": "string" },
                    { "name": "bad", "type": { "integer": { "width": "wide" } } }
                ]
            }]
        }))
        .unwrap_err();
        assert!(err.starts_with("at JSON path structs[0].fields[1].type"), "{err}");
    }

    #[test]
    fn decodes_valid_document() {
        let doc: Document = from_value_with_path(json!({ "package": "demo" })).unwrap();
        assert_eq!(doc.package, "demo");
        assert!(doc.structs.is_empty());
    }
}
