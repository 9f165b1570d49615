use serde::Serialize;

/// Default upper bound on the number of tags returned for one input.
pub const MAX_TAGS: usize = 20;

/// A descriptive `name`/`value` pair attached to submitted content.
///
/// Both fields are trimmed on construction and are never empty, so a `Tag`
/// that exists is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    name: String,
    value: String,
}

impl Tag {
    /// Creates a tag from untrimmed parts.
    ///
    /// Returns `None` when either part is empty after trimming.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagsmith::Tag;
    ///
    /// let tag = Tag::new("  Topic ", " greeting").unwrap();
    /// assert_eq!(tag.name(), "Topic");
    /// assert_eq!(tag.value(), "greeting");
    ///
    /// assert!(Tag::new("Topic", "   ").is_none());
    /// ```
    pub fn new(name: &str, value: &str) -> Option<Self> {
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    /// Returns the tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tag value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An ordered, bounded list of tags.
///
/// Order is whatever order the model emitted the tags in. The list never
/// holds more entries than the limit it was built with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagList {
    tags: Vec<Tag>,
}

impl TagList {
    /// Builds a list from `tags`, keeping at most the first `limit` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagsmith::{Tag, TagList};
    ///
    /// let tags = (0..5).filter_map(|i| Tag::new("n", &i.to_string()));
    /// let list = TagList::from_iter_capped(tags, 3);
    /// assert_eq!(list.len(), 3);
    /// ```
    pub fn from_iter_capped(tags: impl IntoIterator<Item = Tag>, limit: usize) -> Self {
        Self {
            tags: tags.into_iter().take(limit).collect(),
        }
    }

    /// Returns an empty list.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.tags
    }

    pub fn into_vec(self) -> Vec<Tag> {
        self.tags
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl IntoIterator for TagList {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_name_and_value() {
        let tag = Tag::new("  foo  ", " bar ").unwrap();

        assert_eq!(tag.name(), "foo");
        assert_eq!(tag.value(), "bar");
    }

    #[test]
    fn new_rejects_whitespace_only_parts() {
        assert!(Tag::new("", "bar").is_none());
        assert!(Tag::new("foo", "").is_none());
        assert!(Tag::new(" \t\n", "bar").is_none());
        assert!(Tag::new("foo", "   ").is_none());
    }

    #[test]
    fn tag_serializes_as_name_value_object() {
        let tag = Tag::new("Content-Type", "text/plain").unwrap();
        let json = serde_json::to_string(&tag).unwrap();

        assert_eq!(json, r#"{"name":"Content-Type","value":"text/plain"}"#);
    }

    #[test]
    fn tag_list_keeps_first_entries_up_to_limit() {
        let tags = (0..25).filter_map(|i| Tag::new(&format!("tag-{i}"), "v"));
        let list = TagList::from_iter_capped(tags, MAX_TAGS);

        assert_eq!(list.len(), MAX_TAGS);
        assert_eq!(list.as_slice()[0].name(), "tag-0");
        assert_eq!(list.as_slice()[19].name(), "tag-19");
    }

    #[test]
    fn tag_list_serializes_as_bare_array() {
        let list = TagList::from_iter_capped(Tag::new("Topic", "greeting"), MAX_TAGS);
        let json = serde_json::to_string(&list).unwrap();

        assert_eq!(json, r#"[{"name":"Topic","value":"greeting"}]"#);
    }

    #[test]
    fn empty_tag_list_serializes_as_empty_array() {
        let json = serde_json::to_string(&TagList::empty()).unwrap();
        assert_eq!(json, "[]");
    }
}
