use crate::models::MAX_TAGS;

/// Default number of input characters embedded in the prompt.
pub const MAX_INPUT_CHARS: usize = 2000;

/// Appended to the embedded input when it was truncated.
pub const ELLIPSIS: &str = "...";

/// System message fixing the assistant's role for every request.
pub const SYSTEM_PROMPT: &str = "You are an expert at analyzing data and generating relevant tags for Arweave storage. Always respond with valid JSON only.";

/// Prompt template for tag generation.
///
/// `{data}` receives the (possibly truncated) input and `{max_tags}` the tag
/// cap.
const PROMPT_TEMPLATE: &str = r#"Analyze the following data and generate relevant tags for Arweave storage.

Data to analyze:
{data}

Generate up to {max_tags} tags that would be useful for:
- Searching and discovering this data
- Categorizing the content
- Understanding the data type and purpose
- Organizing related content

Return your response as a JSON array of objects with "name" and "value" properties.
Example format: [{"name": "Content-Type", "value": "text/plain"}, {"name": "Category", "value": "documentation"}]

Guidelines:
- Use descriptive but concise tag names
- Values should be specific and searchable
- Include semantic tags (topic, purpose, domain)
- Include technical tags (format, type, structure)
- Use standard naming conventions when possible
- Avoid overly generic tags like "data" or "file"
- Ensure all tags are relevant to the content

Only return valid JSON. Do not include any explanations or additional text."#;

/// Renders the user prompt for one input.
///
/// # Examples
///
/// ```
/// use tagsmith::tagger::PromptTemplate;
///
/// let template = PromptTemplate::new(5, 3);
/// let prompt = template.render("abcdefgh");
///
/// assert!(prompt.contains("abcde...\n"));
/// assert!(prompt.contains("Generate up to 3 tags"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    max_input_chars: usize,
    max_tags: usize,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(MAX_INPUT_CHARS, MAX_TAGS)
    }
}

impl PromptTemplate {
    pub fn new(max_input_chars: usize, max_tags: usize) -> Self {
        Self {
            max_input_chars,
            max_tags,
        }
    }

    pub fn max_input_chars(&self) -> usize {
        self.max_input_chars
    }

    pub fn max_tags(&self) -> usize {
        self.max_tags
    }

    /// Embeds `data` into the template, truncated to `max_input_chars`
    /// characters.
    #[must_use]
    pub fn render(&self, data: &str) -> String {
        let excerpt = truncate_chars(data, self.max_input_chars);
        PROMPT_TEMPLATE
            .replace("{max_tags}", &self.max_tags.to_string())
            .replace("{data}", &excerpt)
    }
}

/// Keeps the first `limit` characters, appending [`ELLIPSIS`] when anything
/// was cut.
fn truncate_chars(data: &str, limit: usize) -> String {
    match data.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &data[..cut], ELLIPSIS),
        None => data.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_section(prompt: &str) -> &str {
        let start = prompt.find("Data to analyze:\n").unwrap() + "Data to analyze:\n".len();
        let end = prompt.find("\n\nGenerate up to").unwrap();
        &prompt[start..end]
    }

    #[test]
    fn long_input_is_cut_to_limit_with_ellipsis() {
        let input: String = "a".repeat(2000) + &"b".repeat(500);
        let prompt = PromptTemplate::default().render(&input);

        let embedded = data_section(&prompt);
        assert_eq!(embedded, format!("{}...", "a".repeat(2000)));
        assert!(!embedded.contains('b'));
    }

    #[test]
    fn short_input_is_embedded_in_full_without_ellipsis() {
        let input = "x".repeat(1500);
        let prompt = PromptTemplate::default().render(&input);

        assert_eq!(data_section(&prompt), input);
        assert!(!data_section(&prompt).ends_with(ELLIPSIS));
    }

    #[test]
    fn input_of_exactly_the_limit_is_not_marked_truncated() {
        let input = "y".repeat(MAX_INPUT_CHARS);
        let prompt = PromptTemplate::default().render(&input);

        assert_eq!(data_section(&prompt), input);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let input = "é".repeat(10);
        assert_eq!(truncate_chars(&input, 4), "éééé...");
        assert_eq!(truncate_chars("日本語", 3), "日本語");
    }

    #[test]
    fn template_states_cap_shape_and_json_only_rule() {
        let prompt = PromptTemplate::default().render("hello");

        assert!(prompt.contains("Generate up to 20 tags"));
        assert!(prompt.contains(r#"JSON array of objects with "name" and "value" properties"#));
        assert!(prompt.contains(r#"{"name": "Content-Type", "value": "text/plain"}"#));
        assert!(prompt.contains(r#"Avoid overly generic tags like "data" or "file""#));
        assert!(prompt.ends_with("Only return valid JSON. Do not include any explanations or additional text."));
    }

    #[test]
    fn placeholders_inside_input_are_left_alone() {
        let prompt = PromptTemplate::default().render("literal {max_tags} marker");
        assert!(prompt.contains("literal {max_tags} marker"));
    }

    #[test]
    fn render_is_deterministic() {
        let template = PromptTemplate::new(10, 5);
        assert_eq!(template.render("same input"), template.render("same input"));
    }
}
