use serde_json::Value;

use crate::models::{Tag, TagList};

use super::error::TaggingError;

/// Parses model output into a bounded tag list.
///
/// # Errors
///
/// Returns `TaggingError::MalformedOutput` when `content` is not JSON. Valid
/// JSON of the wrong shape is not an error; it yields an empty list.
pub fn parse_tags(content: &str, limit: usize) -> Result<TagList, TaggingError> {
    let value: Value = serde_json::from_str(content).map_err(TaggingError::MalformedOutput)?;
    Ok(validate_tags(value, limit))
}

/// Filters a parsed model answer down to well-formed tags.
///
/// # Rules
///
/// - Anything other than an array yields an empty list
/// - Elements must be objects whose `name` and `value` are strings
/// - Both strings are trimmed; elements with an empty part are dropped
/// - At most `limit` tags are kept, in their original order
pub fn validate_tags(value: Value, limit: usize) -> TagList {
    let Value::Array(items) = value else {
        return TagList::empty();
    };

    TagList::from_iter_capped(items.iter().filter_map(tag_from_item), limit)
}

fn tag_from_item(item: &Value) -> Option<Tag> {
    let object = item.as_object()?;
    let name = object.get("name")?.as_str()?;
    let value = object.get("value")?.as_str()?;
    Tag::new(name, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MAX_TAGS;
    use serde_json::json;

    fn pairs(list: &TagList) -> Vec<(&str, &str)> {
        list.iter().map(|t| (t.name(), t.value())).collect()
    }

    #[test]
    fn valid_array_is_returned_trimmed_in_order() {
        let content = r#"[
            {"name": "  foo  ", "value": " bar "},
            {"name": "Category", "value": "documentation"}
        ]"#;
        let tags = parse_tags(content, MAX_TAGS).unwrap();

        assert_eq!(pairs(&tags), vec![("foo", "bar"), ("Category", "documentation")]);
    }

    #[test]
    fn more_than_limit_keeps_first_twenty() {
        let items: Vec<Value> = (0..30)
            .map(|i| json!({"name": format!("n{i}"), "value": format!("v{i}")}))
            .collect();
        let tags = validate_tags(Value::Array(items), MAX_TAGS);

        assert_eq!(tags.len(), 20);
        assert_eq!(tags.as_slice().first().unwrap().name(), "n0");
        assert_eq!(tags.as_slice().last().unwrap().name(), "n19");
    }

    #[test]
    fn cap_applies_after_filtering() {
        let mut items = vec![json!({"name": "", "value": "dropped"}); 5];
        items.extend((0..20).map(|i| json!({"name": format!("n{i}"), "value": "v"})));
        let tags = validate_tags(Value::Array(items), MAX_TAGS);

        assert_eq!(tags.len(), 20);
        assert_eq!(tags.as_slice()[0].name(), "n0");
    }

    #[test]
    fn non_array_json_yields_empty_list() {
        for content in [r#"{"name": "a", "value": "b"}"#, "42", "\"text\"", "null", "true"] {
            let tags = parse_tags(content, MAX_TAGS).unwrap();
            assert!(tags.is_empty(), "expected empty list for {content}");
        }
    }

    #[test]
    fn invalid_json_is_an_error() {
        let result = parse_tags("Here are your tags: [", MAX_TAGS);
        assert!(matches!(result, Err(TaggingError::MalformedOutput(_))));

        let result = parse_tags("", MAX_TAGS);
        assert!(matches!(result, Err(TaggingError::MalformedOutput(_))));
    }

    #[test]
    fn malformed_elements_are_skipped() {
        let value = json!([
            null,
            "Topic",
            42,
            ["name", "value"],
            {"name": "Topic"},
            {"value": "greeting"},
            {"name": 1, "value": "x"},
            {"name": "x", "value": false},
            {"name": "   ", "value": "x"},
            {"name": "x", "value": "\t\n"},
            {"name": "Language", "value": "en", "extra": "ignored"}
        ]);
        let tags = validate_tags(value, MAX_TAGS);

        assert_eq!(pairs(&tags), vec![("Language", "en")]);
    }

    #[test]
    fn duplicates_are_kept() {
        let value = json!([
            {"name": "Topic", "value": "a"},
            {"name": "Topic", "value": "a"}
        ]);
        assert_eq!(validate_tags(value, MAX_TAGS).len(), 2);
    }

    #[test]
    fn custom_limit_is_honoured() {
        let value = json!([
            {"name": "a", "value": "1"},
            {"name": "b", "value": "2"},
            {"name": "c", "value": "3"}
        ]);
        assert_eq!(pairs(&validate_tags(value, 2)), vec![("a", "1"), ("b", "2")]);
    }
}
