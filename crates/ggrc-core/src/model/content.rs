//! Label helpers over captured object content
//!
//! Object content (live attributes or a revision's captured copy) is an
//! untyped JSON object; these helpers pick the fields the UI shows.

use serde_json::Value;

/// Non-empty string value of `key`, if any
pub fn text_field<'a>(content: &'a Value, key: &str) -> Option<&'a str> {
    content
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn first_text(content: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| text_field(content, key))
        .map(str::to_string)
}

/// Human name of an object: `title`, then `name`, then `email`
pub fn display_name(content: &Value) -> Option<String> {
    first_text(content, &["title", "name", "email"])
}

/// Model type label of an object
pub fn display_type(content: &Value) -> Option<String> {
    first_text(content, &["type"])
}

/// Title shown for a row in the mapper results list
pub fn item_title(content: &Value) -> Option<String> {
    first_text(content, &["title", "description_inline", "name", "email"])
}

/// JavaScript-style truthiness of an attribute value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name_prefers_title() {
        let content = json!({"title": "Control 1", "name": "ctrl", "email": "a@b.c"});
        assert_eq!(display_name(&content).as_deref(), Some("Control 1"));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let content = json!({"title": "", "email": "user@example.com"});
        assert_eq!(display_name(&content).as_deref(), Some("user@example.com"));
    }

    #[test]
    fn test_item_title_uses_description_before_name() {
        let content = json!({"description_inline": "desc", "name": "n"});
        assert_eq!(item_title(&content).as_deref(), Some("desc"));
    }

    #[test]
    fn test_non_string_fields_are_skipped() {
        let content = json!({"title": 12, "name": "Named"});
        assert_eq!(display_name(&content).as_deref(), Some("Named"));
        assert_eq!(display_type(&json!({})), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("123")));
        assert!(is_truthy(&json!(5)));
        assert!(is_truthy(&json!([])));
    }
}
