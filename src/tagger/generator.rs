//! Tag generator tying the pipeline stages to a completion client.

use std::sync::Arc;

use crate::llm::{ChatMessage, CompletionClientTrait};
use crate::models::{MAX_TAGS, RawInput, TagList};

use super::error::TaggingError;
use super::input::normalize_input;
use super::prompt::{MAX_INPUT_CHARS, PromptTemplate, SYSTEM_PROMPT};
use super::validator::parse_tags;

/// Model used when the builder is not given one.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b";

/// Builder for constructing `TagGenerator` instances.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tagsmith::llm::CompletionClientBuilder;
/// use tagsmith::tagger::TagGeneratorBuilder;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CompletionClientBuilder::new().api_key("gsk_test").build()?;
///
/// let generator = TagGeneratorBuilder::new(Arc::new(client))
///     .model("llama-3.1-8b-instant")
///     .max_input_chars(4000)
///     .max_tags(10)
///     .build();
/// # Ok(())
/// # }
/// ```
pub struct TagGeneratorBuilder {
    client: Arc<dyn CompletionClientTrait>,
    model: String,
    max_input_chars: usize,
    max_tags: usize,
}

impl TagGeneratorBuilder {
    /// Creates a builder around `client` with default model and limits.
    pub fn new(client: Arc<dyn CompletionClientTrait>) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            max_input_chars: MAX_INPUT_CHARS,
            max_tags: MAX_TAGS,
        }
    }

    /// Sets the provider model identifier sent with every request.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets how many input characters are embedded in the prompt.
    pub fn max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    /// Sets the tag cap, both requested in the prompt and enforced on output.
    pub fn max_tags(mut self, max_tags: usize) -> Self {
        self.max_tags = max_tags;
        self
    }

    #[must_use]
    pub fn build(self) -> TagGenerator {
        TagGenerator {
            client: self.client,
            model: self.model,
            template: PromptTemplate::new(self.max_input_chars, self.max_tags),
        }
    }
}

/// Generates descriptive tags for arbitrary input with one model call.
///
/// Holds no per-request state, so a single instance can serve concurrent
/// requests behind an `Arc`.
pub struct TagGenerator {
    client: Arc<dyn CompletionClientTrait>,
    model: String,
    template: PromptTemplate,
}

impl TagGenerator {
    /// Creates a generator with default model and limits.
    ///
    /// Prefer `TagGeneratorBuilder` when anything needs configuring.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClientTrait>) -> Self {
        TagGeneratorBuilder::new(client).build()
    }

    /// Returns the model identifier this generator sends.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the prompt template in use.
    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Generates tags for `input`.
    ///
    /// Normalizes the input, renders the prompt, sends a system + user
    /// conversation to the model, and validates the answer.
    ///
    /// # Errors
    ///
    /// Returns `TaggingError::Provider` if the model call fails or returns no
    /// content, and `TaggingError::MalformedOutput` if the content is not JSON.
    pub async fn generate_tags(&self, input: &RawInput) -> Result<TagList, TaggingError> {
        let normalized = normalize_input(input);
        let prompt = self.template.render(&normalized);

        tracing::debug!(
            input_chars = normalized.chars().count(),
            model = %self.model,
            "Requesting tags"
        );

        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let content = self.client.chat(&self.model, &messages).await?;

        let tags = parse_tags(&content, self.template.max_tags())?;
        tracing::info!(tag_count = tags.len(), model = %self.model, "Generated tags");

        Ok(tags)
    }
}
