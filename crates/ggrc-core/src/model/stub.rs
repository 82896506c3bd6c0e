use serde::{Deserialize, Serialize};

/// Weak reference to another object: identifier and model type only
///
/// Mirrors the `{ "id": .., "type": .. }` stubs the server embeds in place
/// of full objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stub {
    pub id: i64,
    #[serde(rename = "type")]
    pub model_type: String,
}

impl Stub {
    pub fn new(id: i64, model_type: impl Into<String>) -> Self {
        Self {
            id,
            model_type: model_type.into(),
        }
    }
}

impl std::fmt::Display for Stub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.model_type, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stub_uses_type_key_on_the_wire() {
        let stub: Stub = serde_json::from_value(json!({"id": 7, "type": "Audit"})).unwrap();
        assert_eq!(stub, Stub::new(7, "Audit"));
        assert_eq!(stub.to_string(), "Audit:7");
    }

    #[test]
    fn test_stub_ignores_extra_server_fields() {
        let stub: Stub = serde_json::from_value(json!({
            "id": 3,
            "type": "Person",
            "href": "/api/people/3",
            "context_id": null
        }))
        .unwrap();
        assert_eq!(stub.id, 3);
    }
}
