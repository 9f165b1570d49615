//! tagsmith: descriptive key/value tags for arbitrary content, generated by
//! an LLM behind a single HTTP endpoint.

pub mod config;
pub mod llm;
pub mod models;
pub mod server;
pub mod tagger;
pub mod telemetry;

pub use config::Config;
pub use llm::{CompletionClient, CompletionClientBuilder, CompletionClientTrait, CompletionError};
pub use models::{MAX_TAGS, RawInput, Tag, TagList};
pub use tagger::{TagGenerator, TagGeneratorBuilder, TaggingError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_accessible_from_crate_root() {
        let tag = Tag::new("Topic", "greeting").unwrap();
        let list = TagList::from_iter_capped([tag], MAX_TAGS);
        assert_eq!(list.len(), 1);

        let input = RawInput::from("Hello world");
        assert!(!input.is_falsy());

        let error = TaggingError::from(CompletionError::NoResponse);
        assert!(error.to_string().contains("No response from LLM"));
    }
}
